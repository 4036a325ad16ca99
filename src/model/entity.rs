//! Exportable entities: the caller-supplied sources of an export.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Title that marks a chapter as the document's title page.
pub const TITLE_PAGE: &str = "TITLE PAGE";

/// Any entity the pipeline can export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportableEntity {
    /// A single chapter
    Chapter(Chapter),
    /// An authored paper with ordered sections
    Paper(AuthoredPaper),
    /// Chapters plus review analysis, literature and references
    Synopsis(SynopsisDataset),
    /// A row/column dataset
    Dataset(TabularDataset),
}

impl ExportableEntity {
    /// Display title of the entity, used for file names.
    pub fn title(&self) -> &str {
        match self {
            ExportableEntity::Chapter(c) => &c.title,
            ExportableEntity::Paper(p) => &p.title,
            ExportableEntity::Synopsis(s) => &s.title,
            ExportableEntity::Dataset(d) => &d.name,
        }
    }
}

/// A chapter of rich HTML content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter title
    pub title: String,

    /// Editor HTML
    #[serde(default)]
    pub body_html: String,
}

impl Chapter {
    /// Create a chapter.
    pub fn new(title: impl Into<String>, body_html: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body_html: body_html.into(),
        }
    }

    /// Check if this chapter is the title page (case-insensitive exact match).
    pub fn is_title_page(&self) -> bool {
        self.title.trim().eq_ignore_ascii_case(TITLE_PAGE)
    }
}

/// A paper authored in the portal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthoredPaper {
    /// Paper title
    pub title: String,

    /// Author names, in byline order
    #[serde(default)]
    pub authors: Vec<String>,

    /// Ordered sections
    #[serde(default)]
    pub sections: Vec<PaperSection>,
}

/// One section of an authored paper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperSection {
    /// Section title
    pub title: String,

    /// Editor HTML
    #[serde(default)]
    pub body_html: String,
}

/// Synopsis export source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynopsisDataset {
    /// Synopsis title
    pub title: String,

    /// Chapters, in export order
    #[serde(default)]
    pub chapters: Vec<Chapter>,

    /// Named review-analysis sections holding HTML lists
    #[serde(default)]
    pub review_analysis: Vec<AnalysisSection>,

    /// Reviewed literature items
    #[serde(default)]
    pub literature: Vec<LiteratureItem>,

    /// Citations for the references list
    #[serde(default)]
    pub citations: Vec<Citation>,
}

impl SynopsisDataset {
    /// Citations paired with their reference number.
    ///
    /// The explicit `order` field wins; citations without one are numbered by
    /// their 1-based position. The result is sorted by number, keeping array
    /// order for ties.
    pub fn numbered_citations(&self) -> Vec<(u32, &Citation)> {
        let mut numbered: Vec<(u32, &Citation)> = self
            .citations
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.text.trim().is_empty())
            .map(|(i, c)| (c.order.unwrap_or(i as u32 + 1), c))
            .collect();
        numbered.sort_by_key(|(n, _)| *n);
        numbered
    }

    /// Check whether any review-analysis section has content.
    pub fn has_review_analysis(&self) -> bool {
        self.review_analysis
            .iter()
            .any(|s| !s.body_html.trim().is_empty())
    }

    /// Check whether any literature item has content.
    pub fn has_literature(&self) -> bool {
        self.literature.iter().any(|l| !l.body_html.trim().is_empty())
    }

    /// Check whether any citation has text.
    pub fn has_citations(&self) -> bool {
        self.citations.iter().any(|c| !c.text.trim().is_empty())
    }
}

/// A named review-analysis section whose HTML is usually a list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSection {
    /// Section title; also the numbering scope
    pub title: String,

    /// Editor HTML
    #[serde(default)]
    pub body_html: String,
}

/// A reviewed literature item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiteratureItem {
    /// Optional heading line (usually the paper title)
    #[serde(default)]
    pub title: Option<String>,

    /// Editor HTML
    #[serde(default)]
    pub body_html: String,
}

/// A citation in the references list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Citation {
    /// Formatted citation text
    pub text: String,

    /// Explicit reference number
    #[serde(default)]
    pub order: Option<u32>,
}

/// A row/column dataset for spreadsheet export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabularDataset {
    /// Template name; becomes the sheet name
    pub name: String,

    /// Columns in display order
    pub columns: Vec<Column>,

    /// Rows keyed by column key
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
}

impl TabularDataset {
    /// Cell text for a row and column key.
    ///
    /// Strings are taken as-is, numbers and booleans are formatted, arrays
    /// are joined with `", "` and missing or null values are empty.
    pub fn cell_text(row: &Map<String, Value>, key: &str) -> String {
        row.get(key).map(value_text).unwrap_or_default()
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// A dataset column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Column {
    /// Row key
    pub key: String,

    /// Header label; the key is used when absent
    #[serde(default)]
    pub label: Option<String>,
}

impl Column {
    /// Create a column with no explicit label.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
        }
    }

    /// Set the header label and return self.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Header text shown in the sheet.
    pub fn header(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_page_detection() {
        assert!(Chapter::new("Title Page", "").is_title_page());
        assert!(Chapter::new("  TITLE PAGE ", "").is_title_page());
        assert!(!Chapter::new("Title Pages", "").is_title_page());
        assert!(!Chapter::new("Introduction", "").is_title_page());
    }

    #[test]
    fn test_citations_follow_order_field() {
        let synopsis = SynopsisDataset {
            citations: vec![
                Citation { text: "C".into(), order: Some(3) },
                Citation { text: "A".into(), order: Some(1) },
                Citation { text: "B".into(), order: Some(2) },
            ],
            ..Default::default()
        };
        let numbered: Vec<(u32, &str)> = synopsis
            .numbered_citations()
            .into_iter()
            .map(|(n, c)| (n, c.text.as_str()))
            .collect();
        assert_eq!(numbered, vec![(1, "A"), (2, "B"), (3, "C")]);
    }

    #[test]
    fn test_citations_fall_back_to_position() {
        let synopsis = SynopsisDataset {
            citations: vec![
                Citation { text: "first".into(), order: None },
                Citation { text: "second".into(), order: None },
            ],
            ..Default::default()
        };
        let numbers: Vec<u32> = synopsis.numbered_citations().iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_entity_deserialize() {
        let entity: ExportableEntity = serde_json::from_value(json!({
            "kind": "chapter",
            "title": "Intro",
            "body_html": "<p>Hello</p>"
        }))
        .unwrap();
        assert_eq!(entity.title(), "Intro");
    }

    #[test]
    fn test_cell_text_formats_values() {
        let row = json!({"year": 2021, "authors": ["A", "B"], "doi": null})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(TabularDataset::cell_text(&row, "year"), "2021");
        assert_eq!(TabularDataset::cell_text(&row, "authors"), "A, B");
        assert_eq!(TabularDataset::cell_text(&row, "doi"), "");
        assert_eq!(TabularDataset::cell_text(&row, "missing"), "");
    }

    #[test]
    fn test_column_header_falls_back_to_key() {
        assert_eq!(Column::new("title").header(), "title");
        assert_eq!(Column::new("title").with_label("Title").header(), "Title");
    }
}
