//! Content model shared by the HTML converter and the exporters.
//!
//! Blocks are the intermediate representation between parsed HTML and the
//! binary documents. They are built fresh for every export call and dropped
//! once the package has been written. Entities are the caller-owned sources
//! of an export and are never mutated by the pipeline.

mod block;
mod entity;
mod resource;
mod table;

pub use block::{Alignment, Block, Heading, ListItem, Paragraph, ParagraphStyle, TextRun};
pub use entity::{
    AnalysisSection, AuthoredPaper, Chapter, Citation, Column, ExportableEntity, LiteratureItem,
    PaperSection, SynopsisDataset, TabularDataset, TITLE_PAGE,
};
pub use resource::ImageAsset;
pub use table::{Table, TableCell, TableRow};
