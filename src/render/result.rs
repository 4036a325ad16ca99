//! Export result with statistics.

use serde::{Deserialize, Serialize};

/// A finished export: the package bytes plus what went into them.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// The complete OOXML package
    pub bytes: Vec<u8>,

    /// MIME type of the package
    pub mime_type: &'static str,

    /// Suggested file name, already sanitized
    pub filename: String,

    /// Assembly statistics
    pub stats: ExportStats,
}

impl ExportResult {
    /// Create a new export result.
    pub fn new(
        bytes: Vec<u8>,
        mime_type: &'static str,
        filename: String,
        stats: ExportStats,
    ) -> Self {
        Self {
            bytes,
            mime_type,
            filename,
            stats,
        }
    }

    /// Size of the package in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the package is empty (never true for a written package).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Statistics collected while assembling a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStats {
    /// Number of paragraphs written
    pub paragraph_count: u32,

    /// Number of headings written
    pub heading_count: u32,

    /// Number of tables written
    pub table_count: u32,

    /// Number of list items written
    pub list_item_count: u32,

    /// Number of images embedded
    pub image_count: u32,

    /// Number of images left out because they could not be resolved
    pub skipped_image_count: u32,

    /// Number of explicit page breaks
    pub page_break_count: u32,

    /// Number of spreadsheet data rows
    pub row_count: u32,

    /// Number of slides
    pub slide_count: u32,
}

impl ExportStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Increment heading count.
    pub fn add_heading(&mut self) {
        self.heading_count += 1;
    }

    /// Increment table count.
    pub fn add_table(&mut self) {
        self.table_count += 1;
    }

    /// Increment list item count.
    pub fn add_list_item(&mut self) {
        self.list_item_count += 1;
    }

    /// Increment embedded image count.
    pub fn add_image(&mut self) {
        self.image_count += 1;
    }

    /// Increment skipped image count.
    pub fn skip_image(&mut self) {
        self.skipped_image_count += 1;
    }

    /// Increment page break count.
    pub fn add_page_break(&mut self) {
        self.page_break_count += 1;
    }

    /// Increment slide count.
    pub fn add_slide(&mut self) {
        self.slide_count += 1;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ExportStats) {
        self.paragraph_count += other.paragraph_count;
        self.heading_count += other.heading_count;
        self.table_count += other.table_count;
        self.list_item_count += other.list_item_count;
        self.image_count += other.image_count;
        self.skipped_image_count += other.skipped_image_count;
        self.page_break_count += other.page_break_count;
        self.row_count += other.row_count;
        self.slide_count += other.slide_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_stats_merge() {
        let mut stats1 = ExportStats::new();
        stats1.paragraph_count = 5;
        stats1.table_count = 2;

        let stats2 = ExportStats {
            paragraph_count: 3,
            table_count: 1,
            image_count: 4,
            skipped_image_count: 1,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.paragraph_count, 8);
        assert_eq!(stats1.table_count, 3);
        assert_eq!(stats1.image_count, 4);
        assert_eq!(stats1.skipped_image_count, 1);
    }

    #[test]
    fn test_export_result_len() {
        let result = ExportResult::new(
            vec![1, 2, 3],
            "application/zip",
            "a.zip".into(),
            ExportStats::new(),
        );
        assert_eq!(result.len(), 3);
        assert!(!result.is_empty());
    }
}
