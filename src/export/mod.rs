//! Export entry points: entity + options + fetcher to a finished package.
//!
//! # Example
//!
//! ```no_run
//! use reviewdoc::export::{export_entity, save_to_dir, ExportFormat, ExportOptions};
//! use reviewdoc::fetch::NoImages;
//! use reviewdoc::model::ExportableEntity;
//!
//! # async fn run() -> reviewdoc::Result<()> {
//! let json = std::fs::read_to_string("paper.json")?;
//! let entity: ExportableEntity = serde_json::from_str(&json)?;
//! let result = export_entity(&entity, ExportFormat::Docx, &ExportOptions::default(), &NoImages).await?;
//! save_to_dir(&result, ".")?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::fetch::ImageFetcher;
use crate::model::{Chapter, ExportableEntity};
use crate::render::{docx, pptx, xlsx, DocxOptions, ExportResult, SlideOptions, TabularOptions};

/// Package format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// WordprocessingML document
    Docx,
    /// SpreadsheetML workbook
    Xlsx,
    /// PresentationML deck
    Pptx,
}

impl ExportFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pptx => "pptx",
        }
    }

    /// MIME type of the package.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ExportFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "docx" => Ok(ExportFormat::Docx),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "pptx" => Ok(ExportFormat::Pptx),
            other => Err(Error::InvalidInput(format!("unknown export format: {}", other))),
        }
    }
}

/// Options for every exporter, picked by format.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Document options for DOCX
    pub docx: DocxOptions,

    /// Workbook options for XLSX
    pub tabular: TabularOptions,

    /// Deck options for PPTX
    pub slides: SlideOptions,
}

impl ExportOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set DOCX options.
    pub fn with_docx(mut self, options: DocxOptions) -> Self {
        self.docx = options;
        self
    }

    /// Set XLSX options.
    pub fn with_tabular(mut self, options: TabularOptions) -> Self {
        self.tabular = options;
        self
    }

    /// Set PPTX options.
    pub fn with_slides(mut self, options: SlideOptions) -> Self {
        self.slides = options;
        self
    }
}

/// Export any entity to the requested format.
///
/// Datasets only export to XLSX. Chapters and synopses export to DOCX or
/// PPTX (a synopsis deck uses its chapters). Papers export to DOCX or PPTX,
/// one slide per section.
pub async fn export_entity<F: ImageFetcher + ?Sized>(
    entity: &ExportableEntity,
    format: ExportFormat,
    options: &ExportOptions,
    fetcher: &F,
) -> Result<ExportResult> {
    log::debug!("exporting {:?} as {}", entity.title(), format);
    match (entity, format) {
        (ExportableEntity::Chapter(chapter), ExportFormat::Docx) => {
            docx::export_chapters(
                &chapter.title,
                std::slice::from_ref(chapter),
                &options.docx,
                fetcher,
            )
            .await
        }
        (ExportableEntity::Chapter(chapter), ExportFormat::Pptx) => {
            pptx::export_slides(
                &chapter.title,
                std::slice::from_ref(chapter),
                &options.slides,
                fetcher,
            )
            .await
        }
        (ExportableEntity::Paper(paper), ExportFormat::Docx) => {
            docx::export_paper(paper, &options.docx, fetcher).await
        }
        (ExportableEntity::Paper(paper), ExportFormat::Pptx) => {
            let chapters: Vec<Chapter> = paper
                .sections
                .iter()
                .map(|s| Chapter::new(s.title.clone(), s.body_html.clone()))
                .collect();
            pptx::export_slides(&paper.title, &chapters, &options.slides, fetcher).await
        }
        (ExportableEntity::Synopsis(synopsis), ExportFormat::Docx) => {
            docx::export_synopsis(synopsis, &options.docx, fetcher).await
        }
        (ExportableEntity::Synopsis(synopsis), ExportFormat::Pptx) => {
            pptx::export_slides(&synopsis.title, &synopsis.chapters, &options.slides, fetcher)
                .await
        }
        (ExportableEntity::Dataset(dataset), ExportFormat::Xlsx) => {
            xlsx::export_tabular(dataset, &options.tabular)
        }
        (entity, format) => Err(Error::InvalidInput(format!(
            "{} cannot be exported as {}",
            entity_kind(entity),
            format
        ))),
    }
}

fn entity_kind(entity: &ExportableEntity) -> &'static str {
    match entity {
        ExportableEntity::Chapter(_) => "chapter",
        ExportableEntity::Paper(_) => "paper",
        ExportableEntity::Synopsis(_) => "synopsis",
        ExportableEntity::Dataset(_) => "dataset",
    }
}

/// Replace every character outside `A-Za-z0-9._-` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "export".to_string()
    } else {
        sanitized
    }
}

/// Suggested file name for an export of `title`.
pub fn output_file_name(title: &str, format: ExportFormat) -> String {
    format!("{}.{}", sanitize_file_name(title), format.extension())
}

/// Write an export into `dir` under its suggested file name.
pub fn save_to_dir(result: &ExportResult, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&result.filename);
    std::fs::write(&path, &result.bytes)?;
    log::debug!("wrote {} bytes to {}", result.bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::NoImages;
    use crate::model::{Column, TabularDataset};

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Review"), "Review");
        assert_eq!(sanitize_file_name("My Review: v2/final"), "My_Review__v2_final");
        assert_eq!(sanitize_file_name("résumé.v1-a_b"), "r_sum_.v1-a_b");
        assert_eq!(sanitize_file_name("   "), "export");
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("Review", ExportFormat::Docx), "Review.docx");
        assert_eq!(output_file_name("", ExportFormat::Xlsx), "export.xlsx");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("DOCX".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert_eq!(".pptx".parse::<ExportFormat>().unwrap(), ExportFormat::Pptx);
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Xlsx.to_string(), "xlsx");
    }

    #[tokio::test]
    async fn test_dataset_only_exports_to_xlsx() {
        let entity = ExportableEntity::Dataset(TabularDataset {
            name: "Matrix".into(),
            columns: vec![Column::new("title")],
            rows: Vec::new(),
        });
        let options = ExportOptions::default();

        let err = export_entity(&entity, ExportFormat::Docx, &options, &NoImages).await;
        assert!(matches!(err, Err(Error::InvalidInput(_))));

        let result = export_entity(&entity, ExportFormat::Xlsx, &options, &NoImages)
            .await
            .unwrap();
        assert_eq!(result.mime_type, ExportFormat::Xlsx.mime_type());
    }

    #[tokio::test]
    async fn test_chapter_exports_to_docx() {
        let entity = ExportableEntity::Chapter(Chapter::new("Intro", "<p>Hi</p>"));
        let result = export_entity(&entity, ExportFormat::Docx, &ExportOptions::new(), &NoImages)
            .await
            .unwrap();
        assert_eq!(result.filename, "Intro.docx");
        assert_eq!(result.stats.paragraph_count, 1);
    }

    #[test]
    fn test_save_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = ExportResult::new(
            b"PK".to_vec(),
            ExportFormat::Docx.mime_type(),
            "out.docx".into(),
            Default::default(),
        );
        let path = save_to_dir(&result, dir.path().join("nested")).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"PK");
    }
}
