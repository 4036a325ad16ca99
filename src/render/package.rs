//! OOXML package writer.
//!
//! Every exporter builds its parts as XML strings and hands them to a
//! [`Package`], which tracks content types and writes the zip container.

use std::io::{Cursor, Write};

use chrono::{SecondsFormat, Utc};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::Result;

pub(crate) const XML_DECL: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(crate) const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub(crate) const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";

/// Escape text for XML content and attribute values.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // control characters are not allowed in XML 1.0
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 => {}
            _ => out.push(ch),
        }
    }
    out
}

/// A relationship part being built.
#[derive(Debug, Default)]
pub(crate) struct Relationships {
    entries: Vec<(String, &'static str, String)>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its id.
    pub fn add(&mut self, rel_type: &'static str, target: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push((id.clone(), rel_type, target.into()));
        id
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECL);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, rel_type, target) in &self.entries {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                id,
                rel_type,
                xml_escape(target)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// In-memory OOXML zip package.
pub(crate) struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl Package {
    pub fn new() -> Self {
        let mut package = Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
            defaults: Vec::new(),
            overrides: Vec::new(),
        };
        package.add_default("rels", CT_RELS);
        package.add_default("xml", "application/xml");
        package
    }

    /// Register a content type for a file extension.
    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        if !self.defaults.iter().any(|(e, _)| e == extension) {
            self.defaults
                .push((extension.to_string(), content_type.to_string()));
        }
    }

    /// Write an XML part with an explicit content type override.
    pub fn add_part(&mut self, name: &str, content_type: &str, xml: &str) -> Result<()> {
        self.overrides
            .push((format!("/{}", name), content_type.to_string()));
        self.write_file(name, xml.as_bytes())
    }

    /// Write a part whose content type comes from its extension.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.write_file(name, data)
    }

    /// Write `docProps/core.xml` and return its package-relative name.
    pub fn add_core_properties(&mut self, title: &str) -> Result<&'static str> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let xml = format!(
            concat!(
                "{}",
                r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
                r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
                r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
                "<dc:title>{}</dc:title><dc:creator>reviewdoc</dc:creator>",
                r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
                r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
                "</cp:coreProperties>"
            ),
            XML_DECL,
            xml_escape(title),
            now,
            now
        );
        self.add_part("docProps/core.xml", CT_CORE, &xml)?;
        Ok("docProps/core.xml")
    }

    /// Write the root relationships for a main part plus core properties.
    pub fn add_root_rels(&mut self, main_part: &str) -> Result<()> {
        let mut rels = Relationships::new();
        rels.add(REL_OFFICE_DOCUMENT, main_part);
        rels.add(REL_CORE_PROPERTIES, "docProps/core.xml");
        self.write_file("_rels/.rels", rels.to_xml().as_bytes())
    }

    /// Write `[Content_Types].xml` and close the archive.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let mut xml = String::from(XML_DECL);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                ext, ct
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part, ct
            ));
        }
        xml.push_str("</Types>");
        self.write_file("[Content_Types].xml", xml.as_bytes())?;

        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(xml_escape("x\u{1}y\tz"), "xy\tz");
    }

    #[test]
    fn test_relationship_ids_are_sequential() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add(REL_IMAGE, "media/image1.png"), "rId1");
        assert_eq!(rels.add(REL_IMAGE, "media/image2.png"), "rId2");
        assert!(rels.to_xml().contains(r#"Target="media/image2.png""#));
    }

    #[test]
    fn test_package_roundtrip() {
        let mut package = Package::new();
        package.add_default("png", "image/png");
        package
            .add_part("word/document.xml", "application/test+xml", "<doc/>")
            .unwrap();
        package.add_core_properties("T & C").unwrap();
        package.add_root_rels("word/document.xml").unwrap();
        let bytes = package.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut types = String::new();
        archive
            .by_name("[Content_Types].xml")
            .unwrap()
            .read_to_string(&mut types)
            .unwrap();
        assert!(types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(types.contains(r#"PartName="/word/document.xml""#));

        let mut core = String::new();
        archive
            .by_name("docProps/core.xml")
            .unwrap()
            .read_to_string(&mut core)
            .unwrap();
        assert!(core.contains("<dc:title>T &amp; C</dc:title>"));
    }
}
