//! # reviewdoc
//!
//! Export rich HTML review content to Office Open XML documents.
//!
//! This library turns chapters, authored papers, synopses and tabular
//! datasets written in a rich text editor into DOCX, XLSX and PPTX packages.
//!
//! ## Quick Start
//!
//! ```no_run
//! use reviewdoc::fetch::NoImages;
//! use reviewdoc::{export_file, save_to_dir, ExportFormat, ExportOptions};
//!
//! # async fn run() -> reviewdoc::Result<()> {
//! let result = export_file(
//!     "chapters.json",
//!     ExportFormat::Docx,
//!     &ExportOptions::default(),
//!     &NoImages,
//! )
//! .await?;
//! save_to_dir(&result, "out")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **DOCX**: title page section, headers, footers with page numbers,
//!   per-section list numbering, justified text, tables and images
//! - **XLSX**: frozen header row, autofilter, sampled column widths and
//!   wrapped row heights, numeric column detection
//! - **PPTX**: title slide plus one slide per chapter with stacked images
//! - **Pluggable fetching**: images come from any [`fetch::ImageFetcher`],
//!   including the editor proxy (`proxy` feature)

pub mod detect;
pub mod error;
pub mod export;
pub mod fetch;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_image_format, image_dimensions, is_supported_image, ImageFormat};
pub use error::{Error, Result};
pub use export::{
    export_entity, output_file_name, sanitize_file_name, save_to_dir, ExportFormat, ExportOptions,
};
pub use fetch::{ImageFetcher, MemoizedFetcher, NoImages};
pub use model::{
    AuthoredPaper, Block, Chapter, ExportableEntity, ImageAsset, SynopsisDataset, TabularDataset,
};
pub use parser::{BlockConverter, ParseOptions};
pub use render::{
    DocxOptions, ExportResult, ExportStats, FormattingConfig, SlideOptions, TabularOptions,
};

use std::path::Path;

/// Read an entity from JSON text.
///
/// The JSON must carry a `kind` tag: `chapter`, `paper`, `synopsis` or
/// `dataset`.
///
/// # Example
///
/// ```
/// use reviewdoc::{load_entity_str, ExportableEntity};
///
/// let entity = load_entity_str(r#"{"kind":"chapter","title":"Intro","body_html":"<p>Hi</p>"}"#)
///     .unwrap();
/// assert!(matches!(entity, ExportableEntity::Chapter(_)));
/// ```
pub fn load_entity_str(json: &str) -> Result<ExportableEntity> {
    Ok(serde_json::from_str(json)?)
}

/// Read an entity from a JSON file.
pub fn load_entity<P: AsRef<Path>>(path: P) -> Result<ExportableEntity> {
    let json = std::fs::read_to_string(path)?;
    load_entity_str(&json)
}

/// Load an entity from a JSON file and export it.
pub async fn export_file<P, F>(
    path: P,
    format: ExportFormat,
    options: &ExportOptions,
    fetcher: &F,
) -> Result<ExportResult>
where
    P: AsRef<Path>,
    F: ImageFetcher + ?Sized,
{
    let entity = load_entity(path)?;
    export_entity(&entity, format, options, fetcher).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_entity_str_kinds() {
        let paper = load_entity_str(
            r#"{"kind":"paper","title":"P","authors":["A"],"sections":[{"title":"S","body_html":""}]}"#,
        )
        .unwrap();
        assert_eq!(paper.title(), "P");

        let dataset =
            load_entity_str(r#"{"kind":"dataset","name":"D","columns":[],"rows":[]}"#).unwrap();
        assert!(matches!(dataset, ExportableEntity::Dataset(_)));
    }

    #[test]
    fn test_load_entity_str_rejects_garbage() {
        assert!(matches!(load_entity_str("not json"), Err(Error::Json(_))));
        assert!(load_entity_str(r#"{"kind":"poster","title":"x"}"#).is_err());
    }

    #[test]
    fn test_load_entity_missing_file() {
        let result = load_entity("/nonexistent/entity.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_export_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chapter.json");
        std::fs::write(
            &path,
            r#"{"kind":"chapter","title":"Intro","body_html":"<p>Hello</p>"}"#,
        )
        .unwrap();

        let result = export_file(&path, ExportFormat::Pptx, &ExportOptions::default(), &NoImages)
            .await
            .unwrap();
        assert_eq!(result.filename, "Intro.pptx");
        assert_eq!(result.stats.slide_count, 2);
    }
}
