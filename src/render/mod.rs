//! Rendering of content into OOXML packages (DOCX, XLSX, PPTX).

pub mod docx;
mod options;
mod package;
pub mod plain;
pub mod pptx;
mod result;
pub mod xlsx;

pub use options::{
    emu, half_points, line_240ths, twips, DocxOptions, FormattingConfig, Margins, SlideOptions,
    TabularOptions, EMU_PER_INCH, EMU_PER_PX,
};
pub use package::xml_escape;
pub use result::{ExportResult, ExportStats};
