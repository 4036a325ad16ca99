//! Export options, formatting configuration and OOXML unit conversions.

use crate::parser::UnknownInlineMode;

/// EMUs per inch (DrawingML).
pub const EMU_PER_INCH: i64 = 914_400;

/// EMUs per CSS pixel at 96 dpi.
pub const EMU_PER_PX: i64 = 9_525;

/// Point size to half-points (`w:sz`).
pub fn half_points(pt: f32) -> u32 {
    (pt * 2.0).round() as u32
}

/// Inches to twentieths of a point (page geometry, indents).
pub fn twips(inches: f32) -> u32 {
    (inches * 1440.0).round() as u32
}

/// Line spacing multiple to 240ths of a line (`w:spacing w:line`).
pub fn line_240ths(multiple: f32) -> u32 {
    (multiple * 240.0).round() as u32
}

/// Inches to EMUs.
pub fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH as f64).round() as i64
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    /// Top margin
    pub top: f32,
    /// Right margin
    pub right: f32,
    /// Bottom margin
    pub bottom: f32,
    /// Left margin
    pub left: f32,
}

impl Margins {
    /// Same margin on every side.
    pub fn uniform(inches: f32) -> Self {
        Self {
            top: inches,
            right: inches,
            bottom: inches,
            left: inches,
        }
    }
}

/// Static document formatting: fonts, spacing and page geometry.
///
/// Sizes are in points and distances in inches. Conversion to OOXML units
/// happens only when XML is written.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattingConfig {
    /// Font family for all text
    pub font_family: String,

    /// Body text size in points
    pub body_size: f32,

    /// Heading 1 size in points
    pub heading1_size: f32,

    /// Heading 2 size in points
    pub heading2_size: f32,

    /// Justify body paragraphs
    pub justify: bool,

    /// Line spacing multiple (1.0 single, 2.0 double)
    pub line_spacing: f32,

    /// First-line indent of body paragraphs in inches
    pub first_line_indent: f32,

    /// Space after body paragraphs in points
    pub paragraph_spacing_after: f32,

    /// Page width in inches
    pub page_width: f32,

    /// Page height in inches
    pub page_height: f32,

    /// Body section margins
    pub margins: Margins,

    /// Title page section margins
    pub title_page_margins: Margins,
}

impl FormattingConfig {
    /// General-purpose chapter formatting.
    pub fn general() -> Self {
        Self {
            font_family: "Times New Roman".to_string(),
            body_size: 12.0,
            heading1_size: 16.0,
            heading2_size: 14.0,
            justify: true,
            line_spacing: 1.5,
            first_line_indent: 0.5,
            paragraph_spacing_after: 6.0,
            page_width: 8.5,
            page_height: 11.0,
            margins: Margins::uniform(1.0),
            title_page_margins: Margins {
                top: 1.5,
                right: 1.0,
                bottom: 1.5,
                left: 1.0,
            },
        }
    }

    /// Journal-safe paper formatting: smaller headings, double spacing.
    pub fn paper() -> Self {
        Self {
            heading1_size: 14.0,
            heading2_size: 12.0,
            line_spacing: 2.0,
            paragraph_spacing_after: 0.0,
            title_page_margins: Margins::uniform(1.0),
            ..Self::general()
        }
    }

    /// Set the font family.
    pub fn with_font(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the line spacing multiple.
    pub fn with_line_spacing(mut self, multiple: f32) -> Self {
        self.line_spacing = multiple.max(0.5);
        self
    }

    /// Set the body margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Heading size in points for a heading level.
    pub fn heading_size(&self, level: u8) -> f32 {
        if level <= 1 {
            self.heading1_size
        } else {
            self.heading2_size
        }
    }

    /// Usable body width in inches.
    pub fn content_width(&self) -> f32 {
        (self.page_width - self.margins.left - self.margins.right).max(1.0)
    }
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self::general()
    }
}

/// Options for DOCX exports.
#[derive(Debug, Clone, Default)]
pub struct DocxOptions {
    /// Fonts, spacing and page geometry
    pub formatting: FormattingConfig,

    /// Document title, used for core properties and the default header
    pub title: Option<String>,

    /// Header text; falls back to the title
    pub header_text: Option<String>,

    /// Footer text shown above the page number
    pub footer_text: Option<String>,

    /// Hide the page number field in the footer
    pub hide_page_numbers: bool,

    /// Handling of inline tags other than bold and italic
    pub inline_mode: UnknownInlineMode,
}

impl DocxOptions {
    /// Create DOCX options with general formatting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with the journal-safe paper formatting.
    pub fn paper() -> Self {
        Self {
            formatting: FormattingConfig::paper(),
            ..Self::default()
        }
    }

    /// Set the formatting configuration.
    pub fn with_formatting(mut self, formatting: FormattingConfig) -> Self {
        self.formatting = formatting;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the header text.
    pub fn with_header(mut self, text: impl Into<String>) -> Self {
        self.header_text = Some(text.into());
        self
    }

    /// Set the footer text.
    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.footer_text = Some(text.into());
        self
    }

    /// Enable or disable page numbers.
    pub fn with_page_numbers(mut self, enabled: bool) -> Self {
        self.hide_page_numbers = !enabled;
        self
    }

    /// Set the handling of unknown inline tags.
    pub fn with_inline_mode(mut self, mode: UnknownInlineMode) -> Self {
        self.inline_mode = mode;
        self
    }

    /// Header text actually written, if any.
    pub fn effective_header(&self) -> Option<&str> {
        self.header_text
            .as_deref()
            .or(self.title.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Options for XLSX exports.
#[derive(Debug, Clone)]
pub struct TabularOptions {
    /// Rows sampled for column widths
    pub width_sample_rows: usize,

    /// Rows sampled for numeric column detection
    pub numeric_sample_rows: usize,

    /// Header row height in points
    pub header_height: f32,

    /// Minimum data row height in points
    pub base_row_height: f32,

    /// Height per wrapped line in points
    pub line_height: f32,

    /// Maximum data row height in points
    pub max_row_height: f32,

    /// Sheet name override; the dataset name is used otherwise
    pub sheet_name: Option<String>,
}

impl TabularOptions {
    /// Create tabular options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the sheet name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Set the width and numeric sample sizes.
    pub fn with_samples(mut self, width_rows: usize, numeric_rows: usize) -> Self {
        self.width_sample_rows = width_rows;
        self.numeric_sample_rows = numeric_rows;
        self
    }
}

impl Default for TabularOptions {
    fn default() -> Self {
        Self {
            width_sample_rows: 200,
            numeric_sample_rows: 50,
            header_height: 28.0,
            base_row_height: 18.0,
            line_height: 15.0,
            max_row_height: 300.0,
            sheet_name: None,
        }
    }
}

/// Options for PPTX exports.
#[derive(Debug, Clone)]
pub struct SlideOptions {
    /// Title slide heading; the entity title is used otherwise
    pub title: Option<String>,

    /// Title slide subtitle
    pub subtitle: Option<String>,

    /// Image left edge in inches
    pub image_x: f64,

    /// First image top edge in inches
    pub image_y: f64,

    /// Vertical distance between stacked images in inches
    pub image_step: f64,

    /// Image box width in inches
    pub image_width: f64,

    /// Image box height in inches
    pub image_height: f64,
}

impl SlideOptions {
    /// Create slide options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title slide heading.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the title slide subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

impl Default for SlideOptions {
    fn default() -> Self {
        Self {
            title: None,
            subtitle: None,
            image_x: 8.9,
            image_y: 1.4,
            image_step: 1.6,
            image_width: 3.9,
            image_height: 1.5,
        }
    }
}
