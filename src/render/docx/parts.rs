//! Static WordprocessingML parts: styles, numbering, header, footer and
//! section properties.

use std::collections::HashMap;

use crate::render::options::{half_points, line_240ths, twips, FormattingConfig, Margins};
use crate::render::package::{xml_escape, XML_DECL};

pub(super) const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(super) const R_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(super) const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub(super) const CT_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
pub(super) const CT_NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
pub(super) const CT_HEADER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
pub(super) const CT_FOOTER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

pub(super) const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
pub(super) const REL_NUMBERING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
pub(super) const REL_HEADER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
pub(super) const REL_FOOTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";

const DECIMAL_ABSTRACT: u32 = 0;
const BULLET_ABSTRACT: u32 = 1;

/// Document-wide defaults plus the two heading styles.
pub(super) fn styles_xml(config: &FormattingConfig) -> String {
    let font = xml_escape(&config.font_family);
    let fonts = format!(
        r#"<w:rFonts w:ascii="{f}" w:hAnsi="{f}" w:eastAsia="{f}" w:cs="{f}"/>"#,
        f = font
    );
    let body_sz = half_points(config.body_size);

    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!(r#"<w:styles xmlns:w="{}">"#, W_NS));
    xml.push_str(&format!(
        concat!(
            "<w:docDefaults><w:rPrDefault><w:rPr>{}",
            r#"<w:sz w:val="{}"/><w:szCs w:val="{}"/><w:lang w:val="en-US"/>"#,
            "</w:rPr></w:rPrDefault><w:pPrDefault><w:pPr>",
            r#"<w:spacing w:after="{}" w:line="{}" w:lineRule="auto"/>"#,
            "</w:pPr></w:pPrDefault></w:docDefaults>"
        ),
        fonts,
        body_sz,
        body_sz,
        (config.paragraph_spacing_after * 20.0).round() as u32,
        line_240ths(config.line_spacing),
    ));
    xml.push_str(
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
    );
    for level in 1..=2u8 {
        let sz = half_points(config.heading_size(level));
        xml.push_str(&format!(
            concat!(
                r#"<w:style w:type="paragraph" w:styleId="Heading{l}">"#,
                r#"<w:name w:val="heading {l}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/>"#,
                r#"<w:uiPriority w:val="9"/><w:qFormat/>"#,
                r#"<w:pPr><w:keepNext/><w:keepLines/><w:spacing w:before="240" w:after="120"/>"#,
                r#"<w:outlineLvl w:val="{o}"/></w:pPr>"#,
                r#"<w:rPr><w:b/><w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/></w:rPr></w:style>"#
            ),
            l = level,
            o = level - 1,
            sz = sz
        ));
    }
    xml.push_str(
        r#"<w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:tblPr><w:tblBorders>"#,
    );
    for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        xml.push_str(&format!(
            r#"<w:{} w:val="single" w:sz="4" w:space="0" w:color="000000"/>"#,
            side
        ));
    }
    xml.push_str(
        r#"</w:tblBorders><w:tblCellMar><w:left w:w="108" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style>"#,
    );
    xml.push_str("</w:styles>");
    xml
}

/// Numbering instances, one per ordered-list scope plus a shared bullet.
#[derive(Debug, Default)]
pub(super) struct Numbering {
    scopes: HashMap<String, u32>,
    bullet: Option<u32>,
    // (numId, abstractNumId, restart)
    instances: Vec<(u32, u32, bool)>,
}

impl Numbering {
    /// numId for an ordered list in `scope`; allocated on first use.
    pub fn ordered(&mut self, scope: &str) -> u32 {
        if let Some(id) = self.scopes.get(scope) {
            return *id;
        }
        let id = self.allocate(DECIMAL_ABSTRACT, true);
        self.scopes.insert(scope.to_string(), id);
        id
    }

    /// numId shared by all bulleted items.
    pub fn bullet(&mut self) -> u32 {
        match self.bullet {
            Some(id) => id,
            None => {
                let id = self.allocate(BULLET_ABSTRACT, false);
                self.bullet = Some(id);
                id
            }
        }
    }

    fn allocate(&mut self, abstract_id: u32, restart: bool) -> u32 {
        let id = self.instances.len() as u32 + 1;
        self.instances.push((id, abstract_id, restart));
        id
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECL);
        xml.push_str(&format!(r#"<w:numbering xmlns:w="{}">"#, W_NS));
        xml.push_str(&abstract_num(DECIMAL_ABSTRACT, "decimal", "%1."));
        xml.push_str(&abstract_num(BULLET_ABSTRACT, "bullet", "\u{2022}"));
        for (num_id, abstract_id, restart) in &self.instances {
            xml.push_str(&format!(
                r#"<w:num w:numId="{}"><w:abstractNumId w:val="{}"/>"#,
                num_id, abstract_id
            ));
            if *restart {
                xml.push_str(
                    r#"<w:lvlOverride w:ilvl="0"><w:startOverride w:val="1"/></w:lvlOverride>"#,
                );
            }
            xml.push_str("</w:num>");
        }
        xml.push_str("</w:numbering>");
        xml
    }
}

fn abstract_num(id: u32, format: &str, text: &str) -> String {
    format!(
        concat!(
            r#"<w:abstractNum w:abstractNumId="{}"><w:multiLevelType w:val="singleLevel"/>"#,
            r#"<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="{}"/>"#,
            r#"<w:lvlText w:val="{}"/><w:lvlJc w:val="left"/>"#,
            r#"<w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl></w:abstractNum>"#
        ),
        id, format, text
    )
}

/// Header part with right-aligned text.
pub(super) fn header_xml(text: &str) -> String {
    format!(
        concat!(
            "{}",
            r#"<w:hdr xmlns:w="{}" xmlns:r="{}"><w:p><w:pPr><w:jc w:val="right"/>"#,
            r#"<w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr>"#,
            r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p></w:hdr>"#
        ),
        XML_DECL,
        W_NS,
        R_NS,
        xml_escape(text)
    )
}

/// Footer part: optional text and a centered page number field.
pub(super) fn footer_xml(text: Option<&str>, page_numbers: bool) -> String {
    let mut xml = format!(
        r#"{}<w:ftr xmlns:w="{}" xmlns:r="{}">"#,
        XML_DECL, W_NS, R_NS
    );
    let ppr = r#"<w:pPr><w:jc w:val="center"/><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr>"#;
    if let Some(text) = text {
        xml.push_str(&format!(
            r#"<w:p>{}<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            ppr,
            xml_escape(text)
        ));
    }
    if page_numbers {
        xml.push_str(&format!(
            r#"<w:p>{}<w:fldSimple w:instr=" PAGE "><w:r><w:t>1</w:t></w:r></w:fldSimple></w:p>"#,
            ppr
        ));
    }
    if text.is_none() && !page_numbers {
        xml.push_str("<w:p/>");
    }
    xml.push_str("</w:ftr>");
    xml
}

/// Header and footer relationship ids of a section.
#[derive(Debug, Clone, Default)]
pub(super) struct HeaderFooterRefs {
    pub header: Option<String>,
    pub footer: Option<String>,
}

/// Section properties.
pub(super) fn sect_pr(
    config: &FormattingConfig,
    margins: &Margins,
    refs: Option<&HeaderFooterRefs>,
    restart_numbering: bool,
) -> String {
    let mut xml = String::from("<w:sectPr>");
    if let Some(refs) = refs {
        if let Some(id) = &refs.header {
            xml.push_str(&format!(
                r#"<w:headerReference w:type="default" r:id="{}"/>"#,
                id
            ));
        }
        if let Some(id) = &refs.footer {
            xml.push_str(&format!(
                r#"<w:footerReference w:type="default" r:id="{}"/>"#,
                id
            ));
        }
    }
    xml.push_str(&format!(
        r#"<w:pgSz w:w="{}" w:h="{}"/>"#,
        twips(config.page_width),
        twips(config.page_height)
    ));
    xml.push_str(&format!(
        r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="720" w:footer="720" w:gutter="0"/>"#,
        twips(margins.top),
        twips(margins.right),
        twips(margins.bottom),
        twips(margins.left)
    ));
    if restart_numbering {
        xml.push_str(r#"<w:pgNumType w:start="1"/>"#);
    }
    xml.push_str("</w:sectPr>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_scopes() {
        let mut numbering = Numbering::default();
        let gaps = numbering.ordered("Gaps");
        let methods = numbering.ordered("Methods");
        let bullet = numbering.bullet();

        assert_ne!(gaps, methods);
        assert_eq!(numbering.ordered("Gaps"), gaps);
        assert_eq!(numbering.bullet(), bullet);

        let xml = numbering.to_xml();
        assert_eq!(xml.matches("<w:startOverride w:val=\"1\"/>").count(), 2);
        assert_eq!(xml.matches("<w:num w:numId=").count(), 3);
    }

    #[test]
    fn test_styles_use_half_points() {
        let xml = styles_xml(&FormattingConfig::general());
        assert!(xml.contains(r#"<w:sz w:val="24"/>"#));
        assert!(xml.contains(r#"<w:sz w:val="32"/>"#));
        assert!(xml.contains(r#"<w:sz w:val="28"/>"#));
        assert!(xml.contains(r#"w:line="360""#));
        assert!(xml.contains(r#"w:ascii="Times New Roman""#));
    }

    #[test]
    fn test_sect_pr_margins_in_twips() {
        let config = FormattingConfig::general();
        let title = sect_pr(&config, &config.title_page_margins, None, false);
        assert!(title.contains(r#"w:top="2160""#));
        assert!(!title.contains("headerReference"));

        let refs = HeaderFooterRefs {
            header: Some("rId3".into()),
            footer: Some("rId4".into()),
        };
        let body = sect_pr(&config, &config.margins, Some(&refs), true);
        assert!(body.contains(r#"<w:headerReference w:type="default" r:id="rId3"/>"#));
        assert!(body.contains(r#"<w:pgNumType w:start="1"/>"#));
    }

    #[test]
    fn test_footer_variants() {
        assert!(footer_xml(None, true).contains(" PAGE "));
        let xml = footer_xml(Some("Draft"), false);
        assert!(xml.contains("Draft"));
        assert!(!xml.contains("PAGE"));
        assert!(footer_xml(None, false).contains("<w:p/>"));
    }
}
