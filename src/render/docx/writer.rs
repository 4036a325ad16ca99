//! WordprocessingML body writer.

use crate::error::Result;
use crate::fetch::{resolve_image, ImageFetcher};
use crate::model::{Alignment, Block, Heading, ImageAsset, ListItem, Paragraph, Table, TextRun};
use crate::render::options::{emu, line_240ths, twips, DocxOptions, FormattingConfig};
use crate::render::package::{xml_escape, Package, Relationships, REL_IMAGE, XML_DECL};
use crate::render::ExportStats;

use super::parts::{
    footer_xml, header_xml, sect_pr, styles_xml, HeaderFooterRefs, Numbering, CT_DOCUMENT,
    CT_FOOTER, CT_HEADER, CT_NUMBERING, CT_STYLES, REL_FOOTER, REL_HEADER, REL_NUMBERING,
    REL_STYLES, R_NS, W_NS,
};

const FALLBACK_IMAGE_SIZE: (f64, f64) = (6.0, 4.0);
const PX_PER_INCH: f64 = 96.0;

/// Builds `word/document.xml` and its related parts.
pub(super) struct DocxWriter<'a> {
    options: &'a DocxOptions,
    title: String,
    body: String,
    rels: Relationships,
    numbering: Numbering,
    images: Vec<(String, ImageAsset)>,
    header_footer: HeaderFooterRefs,
    section_has_content: bool,
    pub stats: ExportStats,
}

impl<'a> DocxWriter<'a> {
    pub fn new(options: &'a DocxOptions, title: &str) -> Self {
        let title = options
            .title
            .clone()
            .unwrap_or_else(|| title.trim().to_string());
        let mut rels = Relationships::new();
        rels.add(REL_STYLES, "styles.xml");
        rels.add(REL_NUMBERING, "numbering.xml");

        let mut header_footer = HeaderFooterRefs::default();
        if options.header_text.is_some() || !title.is_empty() {
            header_footer.header = Some(rels.add(REL_HEADER, "header1.xml"));
        }
        header_footer.footer = Some(rels.add(REL_FOOTER, "footer1.xml"));

        Self {
            options,
            title,
            body: String::new(),
            rels,
            numbering: Numbering::default(),
            images: Vec::new(),
            header_footer,
            section_has_content: false,
            stats: ExportStats::new(),
        }
    }

    fn config(&self) -> &'a FormattingConfig {
        &self.options.formatting
    }

    /// Whether anything was written since the last section break.
    pub fn section_has_content(&self) -> bool {
        self.section_has_content
    }

    /// Close the title page section: its own margins, no header or footer.
    pub fn end_title_section(&mut self) {
        let props = sect_pr(self.config(), &self.config().title_page_margins, None, false);
        self.body.push_str(&format!("<w:p><w:pPr>{}</w:pPr></w:p>", props));
        self.section_has_content = false;
    }

    pub fn page_break(&mut self) {
        self.body
            .push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);
        self.stats.add_page_break();
        self.section_has_content = false;
    }

    /// Write converted blocks, resolving images through `fetcher`.
    pub async fn push_blocks<F: ImageFetcher + ?Sized>(&mut self, blocks: &[Block], fetcher: &F) {
        for block in blocks {
            match block {
                Block::Paragraph(p) => self.paragraph(p),
                Block::Heading(h) => self.heading(h),
                Block::Table(t) => self.table(t),
                Block::OrderedListItem(item) => {
                    let num_id = self.numbering.ordered(item.scope.as_deref().unwrap_or(""));
                    self.list_item(item, num_id);
                }
                Block::UnorderedListItem(item) => {
                    let num_id = self.numbering.bullet();
                    self.list_item(item, num_id);
                }
                Block::Image { source } => match resolve_image(fetcher, source).await {
                    Some(asset) => self.image(asset),
                    None => self.stats.skip_image(),
                },
            }
        }
    }

    pub fn heading(&mut self, heading: &Heading) {
        let level = heading.level.clamp(1, 2);
        let mut ppr = format!(r#"<w:pStyle w:val="Heading{}"/>"#, level);
        if let Some(alignment) = heading.alignment {
            ppr.push_str(&jc(alignment));
        }
        self.body.push_str(&format!(
            r#"<w:p><w:pPr>{}</w:pPr>{}</w:p>"#,
            ppr,
            run_xml(&TextRun::plain(heading.text.clone()))
        ));
        self.stats.add_heading();
        self.section_has_content = true;
    }

    pub fn paragraph(&mut self, paragraph: &Paragraph) {
        if paragraph.is_empty() {
            return;
        }
        let config = self.config();
        let alignment = paragraph.style.alignment.unwrap_or(if config.justify {
            Alignment::Justify
        } else {
            Alignment::Left
        });
        let mut ppr = jc(alignment);
        if !paragraph.style.no_first_line_indent && config.first_line_indent > 0.0 {
            ppr.push_str(&format!(
                r#"<w:ind w:firstLine="{}"/>"#,
                twips(config.first_line_indent)
            ));
        }
        let runs: String = paragraph.runs.iter().map(run_xml).collect();
        self.body
            .push_str(&format!("<w:p><w:pPr>{}</w:pPr>{}</w:p>", ppr, runs));
        self.stats.add_paragraph();
        self.section_has_content = true;
    }

    fn list_item(&mut self, item: &ListItem, num_id: u32) {
        let jc_xml = jc(if self.config().justify {
            Alignment::Justify
        } else {
            Alignment::Left
        });
        let runs: String = item.runs.iter().map(run_xml).collect();
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="{}"/></w:numPr>{}</w:pPr>{}</w:p>"#,
            num_id, jc_xml, runs
        ));
        self.stats.add_list_item();
        self.section_has_content = true;
    }

    fn table(&mut self, table: &Table) {
        let columns = table.column_count();
        if columns == 0 {
            return;
        }
        let col_width = twips(self.config().content_width()) / columns as u32;

        let mut xml = String::from(
            r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="5000" w:type="pct"/></w:tblPr><w:tblGrid>"#,
        );
        for _ in 0..columns {
            xml.push_str(&format!(r#"<w:gridCol w:w="{}"/>"#, col_width));
        }
        xml.push_str("</w:tblGrid>");

        // single spacing keeps cells compact regardless of the body line spacing
        let cell_ppr = format!(
            r#"<w:pPr><w:spacing w:after="0" w:line="{}" w:lineRule="auto"/></w:pPr>"#,
            line_240ths(1.0)
        );
        for row in &table.rows {
            xml.push_str("<w:tr>");
            if row.is_header {
                xml.push_str("<w:trPr><w:tblHeader/></w:trPr>");
            }
            for i in 0..columns {
                let text = row.cells.get(i).map(|c| c.text.as_str()).unwrap_or(" ");
                let run = TextRun {
                    text: text.to_string(),
                    bold: row.is_header,
                    italic: false,
                };
                xml.push_str(&format!(
                    r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/></w:tcPr><w:p>{}{}</w:p></w:tc>"#,
                    col_width,
                    cell_ppr,
                    run_xml(&run)
                ));
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");
        // a paragraph must separate adjacent tables
        xml.push_str("<w:p/>");

        self.body.push_str(&xml);
        self.stats.add_table();
        self.section_has_content = true;
    }

    fn image(&mut self, asset: ImageAsset) {
        let index = self.images.len() + 1;
        let name = asset.media_name(index);
        let rel_id = self.rels.add(REL_IMAGE, format!("media/{}", name));
        let (width, height) = self.image_size(&asset);
        let (cx, cy) = (emu(width), emu(height));

        self.body.push_str(&format!(
            concat!(
                r#"<w:p><w:pPr><w:jc w:val="center"/><w:spacing w:line="240" w:lineRule="auto"/></w:pPr><w:r><w:drawing>"#,
                r#"<wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{cx}" cy="{cy}"/>"#,
                r#"<wp:docPr id="{id}" name="Picture {id}"/><wp:cNvGraphicFramePr>"#,
                r#"<a:graphicFrameLocks xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" noChangeAspect="1"/>"#,
                r#"</wp:cNvGraphicFramePr><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#,
                r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
                r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
                r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic>"#,
                r#"</a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#
            ),
            cx = cx,
            cy = cy,
            id = index,
            name = name,
            rel = rel_id
        ));
        self.images.push((name, asset));
        self.stats.add_image();
        self.section_has_content = true;
    }

    /// Natural size at 96 dpi, shrunk to the content width.
    fn image_size(&self, asset: &ImageAsset) -> (f64, f64) {
        let max_width = self.config().content_width() as f64;
        match (asset.width, asset.aspect_ratio()) {
            (Some(px), Some(ratio)) => {
                let width = (px as f64 / PX_PER_INCH).min(max_width);
                (width, width * ratio)
            }
            _ => {
                let (w, h) = FALLBACK_IMAGE_SIZE;
                let width = w.min(max_width);
                (width, h * width / w)
            }
        }
    }

    /// Close the body section and write the complete package.
    pub fn finish(self) -> Result<(Vec<u8>, ExportStats)> {
        let config = self.config();
        let final_sect = sect_pr(config, &config.margins, Some(&self.header_footer), true);

        let document = format!(
            concat!(
                "{}",
                r#"<w:document xmlns:w="{}" xmlns:r="{}" "#,
                r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing">"#,
                "<w:body>{}{}</w:body></w:document>"
            ),
            XML_DECL, W_NS, R_NS, self.body, final_sect
        );

        let mut package = Package::new();
        package.add_part("word/document.xml", CT_DOCUMENT, &document)?;
        package.add_part("word/styles.xml", CT_STYLES, &styles_xml(config))?;
        package.add_part("word/numbering.xml", CT_NUMBERING, &self.numbering.to_xml())?;
        if self.header_footer.header.is_some() {
            let text = self.options.effective_header().unwrap_or(&self.title);
            package.add_part("word/header1.xml", CT_HEADER, &header_xml(text))?;
        }
        let footer = footer_xml(
            self.options.footer_text.as_deref(),
            !self.options.hide_page_numbers,
        );
        package.add_part("word/footer1.xml", CT_FOOTER, &footer)?;
        for (name, asset) in &self.images {
            package.add_default(asset.format.extension(), asset.format.mime_type());
            package.add_file(&format!("word/media/{}", name), &asset.data)?;
        }
        package.add_file(
            "word/_rels/document.xml.rels",
            self.rels.to_xml().as_bytes(),
        )?;
        package.add_core_properties(&self.title)?;
        package.add_root_rels("word/document.xml")?;

        log::debug!(
            "docx assembled: {} paragraphs, {} list items, {} images ({} skipped)",
            self.stats.paragraph_count,
            self.stats.list_item_count,
            self.stats.image_count,
            self.stats.skipped_image_count
        );
        Ok((package.finish()?, self.stats))
    }
}

fn jc(alignment: Alignment) -> String {
    format!(r#"<w:jc w:val="{}"/>"#, alignment.ooxml_jc())
}

fn run_xml(run: &TextRun) -> String {
    if run.text.is_empty() {
        return String::new();
    }
    let mut xml = String::from("<w:r>");
    if run.bold || run.italic {
        xml.push_str("<w:rPr>");
        if run.bold {
            xml.push_str("<w:b/>");
        }
        if run.italic {
            xml.push_str("<w:i/>");
        }
        xml.push_str("</w:rPr>");
    }
    xml.push_str(r#"<w:t xml:space="preserve">"#);
    xml.push_str(&xml_escape(&run.text));
    xml.push_str("</w:t></w:r>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_xml() {
        assert_eq!(
            run_xml(&TextRun::plain("Hello ")),
            r#"<w:r><w:t xml:space="preserve">Hello </w:t></w:r>"#
        );
        assert_eq!(
            run_xml(&TextRun::bold("A&B")),
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">A&amp;B</w:t></w:r>"#
        );
        assert_eq!(run_xml(&TextRun::plain("")), "");
    }

    #[test]
    fn test_paragraph_indent_and_alignment() {
        let options = DocxOptions::new();
        let mut writer = DocxWriter::new(&options, "T");
        writer.paragraph(&Paragraph::with_text("body"));
        writer.paragraph(&Paragraph::with_text("flush").without_indent().align(Alignment::Center));
        writer.paragraph(&Paragraph::with_text("  "));

        assert!(writer.body.contains(r#"<w:jc w:val="both"/><w:ind w:firstLine="720"/>"#));
        assert!(writer.body.contains(r#"<w:jc w:val="center"/></w:pPr>"#));
        assert_eq!(writer.stats.paragraph_count, 2);
    }

    #[test]
    fn test_image_size_fits_content_width() {
        let options = DocxOptions::new();
        let writer = DocxWriter::new(&options, "T");
        let png = crate::detect::tests::png_header;

        let wide = ImageAsset::from_bytes("w", png(1300, 650)).unwrap();
        assert_eq!(writer.image_size(&wide), (6.5, 3.25));

        let small = ImageAsset::from_bytes("s", png(192, 96)).unwrap();
        assert_eq!(writer.image_size(&small), (2.0, 1.0));
    }

    #[test]
    fn test_section_content_tracking() {
        let options = DocxOptions::new();
        let mut writer = DocxWriter::new(&options, "T");
        assert!(!writer.section_has_content());
        writer.heading(&Heading::centered("Intro", 1));
        assert!(writer.section_has_content());
        writer.page_break();
        assert!(!writer.section_has_content());
        assert_eq!(writer.stats.page_break_count, 1);
    }
}
