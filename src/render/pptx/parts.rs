//! PresentationML parts.

use crate::render::package::{xml_escape, XML_DECL};

pub(super) const P_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub(super) const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(super) const R_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(super) const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
pub(super) const CT_SLIDE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
pub(super) const CT_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
pub(super) const CT_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
pub(super) const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

pub(super) const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub(super) const REL_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub(super) const REL_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub(super) const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

/// 16:9 slide size in EMU.
pub const SLIDE_WIDTH: i64 = 12_192_000;
pub const SLIDE_HEIGHT: i64 = 6_858_000;

/// Position and size of a shape in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

fn xfrm(frame: Frame) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        frame.x, frame.y, frame.cx, frame.cy
    )
}

const EMPTY_GROUP: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// Builds the shape tree of one slide.
#[derive(Debug, Default)]
pub(super) struct SlideXml {
    shapes: String,
    next_id: u32,
}

impl SlideXml {
    pub fn new() -> Self {
        Self {
            shapes: String::new(),
            next_id: 2,
        }
    }

    fn id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Text box with one paragraph per line.
    pub fn text_box(&mut self, frame: Frame, lines: &[&str], size: u32, bold: bool, centered: bool) {
        let id = self.id();
        let mut paragraphs = String::new();
        for line in lines {
            paragraphs.push_str("<a:p>");
            if centered {
                paragraphs.push_str(r#"<a:pPr algn="ctr"/>"#);
            }
            paragraphs.push_str(&format!(
                r#"<a:r><a:rPr lang="en-US" sz="{}"{} dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
                size,
                if bold { r#" b="1""# } else { "" },
                xml_escape(line)
            ));
        }
        if paragraphs.is_empty() {
            paragraphs.push_str("<a:p/>");
        }
        self.shapes.push_str(&format!(
            concat!(
                r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#,
                r#"<p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#,
                r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>{body}</p:txBody></p:sp>"#
            ),
            id = id,
            xfrm = xfrm(frame),
            body = paragraphs
        ));
    }

    /// Picture referencing an image relationship.
    pub fn picture(&mut self, frame: Frame, rel_id: &str, name: &str) {
        let id = self.id();
        self.shapes.push_str(&format!(
            concat!(
                r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="{name}"/>"#,
                r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
                r#"<p:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
                r#"<p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
            ),
            id = id,
            name = xml_escape(name),
            rel = rel_id,
            xfrm = xfrm(frame)
        ));
    }

    pub fn to_xml(&self) -> String {
        format!(
            r#"{}<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:spTree>{}{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
            XML_DECL, A_NS, R_NS, P_NS, EMPTY_GROUP, self.shapes
        )
    }
}

pub(super) fn presentation_xml(slide_rel_ids: &[String], master_rel_id: &str) -> String {
    let mut slides = String::new();
    for (i, rel) in slide_rel_ids.iter().enumerate() {
        slides.push_str(&format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 256 + i, rel));
    }
    let slide_list = if slides.is_empty() {
        String::new()
    } else {
        format!("<p:sldIdLst>{}</p:sldIdLst>", slides)
    };
    format!(
        concat!(
            "{}",
            r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
            r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="{}"/></p:sldMasterIdLst>"#,
            "{}",
            r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
            "</p:presentation>"
        ),
        XML_DECL, A_NS, R_NS, P_NS, master_rel_id, slide_list, SLIDE_WIDTH, SLIDE_HEIGHT
    )
}

pub(super) fn slide_master_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
            r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{}</p:spTree></p:cSld>"#,
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
            r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
            r#"<p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="3200"/></a:lvl1pPr></p:titleStyle>"#,
            r#"<p:bodyStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:bodyStyle>"#,
            r#"<p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle></p:txStyles>"#,
            "</p:sldMaster>"
        ),
        XML_DECL, A_NS, R_NS, P_NS, EMPTY_GROUP
    )
}

pub(super) fn slide_layout_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="blank" preserve="1">"#,
            r#"<p:cSld name="Blank"><p:spTree>{}</p:spTree></p:cSld>"#,
            r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
        ),
        XML_DECL, A_NS, R_NS, P_NS, EMPTY_GROUP
    )
}

pub(super) fn theme_xml() -> String {
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#;
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    format!(
        concat!(
            "{decl}",
            r#"<a:theme xmlns:a="{a}" name="Review">"#,
            r#"<a:themeElements><a:clrScheme name="Review">"#,
            r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#,
            r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
            r#"<a:dk2><a:srgbClr val="1F2937"/></a:dk2><a:lt2><a:srgbClr val="F3F4F6"/></a:lt2>"#,
            r#"<a:accent1><a:srgbClr val="1D4ED8"/></a:accent1><a:accent2><a:srgbClr val="0F766E"/></a:accent2>"#,
            r#"<a:accent3><a:srgbClr val="B45309"/></a:accent3><a:accent4><a:srgbClr val="7C3AED"/></a:accent4>"#,
            r#"<a:accent5><a:srgbClr val="BE123C"/></a:accent5><a:accent6><a:srgbClr val="4D7C0F"/></a:accent6>"#,
            r#"<a:hlink><a:srgbClr val="2563EB"/></a:hlink><a:folHlink><a:srgbClr val="6D28D9"/></a:folHlink>"#,
            "</a:clrScheme>",
            r#"<a:fontScheme name="Review"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
            r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme>"#,
            r#"<a:fmtScheme name="Review"><a:fillStyleLst>{s}{s}{s}</a:fillStyleLst>"#,
            "<a:lnStyleLst>{l}{l}{l}</a:lnStyleLst>",
            "<a:effectStyleLst>{e}{e}{e}</a:effectStyleLst>",
            "<a:bgFillStyleLst>{s}{s}{s}</a:bgFillStyleLst></a:fmtScheme>",
            "</a:themeElements></a:theme>"
        ),
        decl = XML_DECL,
        a = A_NS,
        s = solid,
        l = line,
        e = effect
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_shape_ids_are_unique() {
        let frame = Frame { x: 0, y: 0, cx: 10, cy: 10 };
        let mut slide = SlideXml::new();
        slide.text_box(frame, &["Title"], 3200, true, false);
        slide.picture(frame, "rId2", "image1.png");
        let xml = slide.to_xml();
        assert!(xml.contains(r#"<p:cNvPr id="2" name="TextBox 2"/>"#));
        assert!(xml.contains(r#"<p:cNvPr id="3" name="image1.png"/>"#));
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));
    }

    #[test]
    fn test_text_box_escapes_lines() {
        let frame = Frame { x: 1, y: 2, cx: 3, cy: 4 };
        let mut slide = SlideXml::new();
        slide.text_box(frame, &["a < b", "c"], 1600, false, true);
        let xml = slide.to_xml();
        assert_eq!(xml.matches("<a:p>").count(), 2);
        assert!(xml.contains("<a:t>a &lt; b</a:t>"));
        assert!(xml.contains(r#"<a:pPr algn="ctr"/>"#));
    }

    #[test]
    fn test_presentation_lists_slides() {
        let xml = presentation_xml(&["rId2".to_string(), "rId3".to_string()], "rId1");
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
    }
}
