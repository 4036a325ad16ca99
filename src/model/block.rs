//! Block and inline-level content types.

use super::Table;
use serde::{Deserialize, Serialize};

/// A top-level content block produced from one HTML fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of styled runs
    Paragraph(Paragraph),

    /// A heading (level 1 or 2)
    Heading(Heading),

    /// A table of plain-text cells
    Table(Table),

    /// An image reference, resolved to bytes at assembly time
    Image {
        /// The `src` attribute as written in the HTML
        source: String,
    },

    /// An item of a numbered list
    OrderedListItem(ListItem),

    /// An item of a bulleted list
    UnorderedListItem(ListItem),
}

impl Block {
    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph(p) => p.plain_text(),
            Block::Heading(h) => h.text.clone(),
            Block::Table(t) => t.plain_text(),
            Block::Image { .. } => String::new(),
            Block::OrderedListItem(item) | Block::UnorderedListItem(item) => item.plain_text(),
        }
    }

    /// Check if this is a list item of either kind.
    pub fn is_list_item(&self) -> bool {
        matches!(
            self,
            Block::OrderedListItem(_) | Block::UnorderedListItem(_)
        )
    }
}

/// A paragraph of text content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in the paragraph
    pub runs: Vec<TextRun>,

    /// Paragraph style overrides
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with a single plain run.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::from_runs(vec![TextRun::plain(text)])
    }

    /// Create a paragraph from runs.
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            style: ParagraphStyle::default(),
        }
    }

    /// Add a styled text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Set the alignment and return self.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.style.alignment = Some(alignment);
        self
    }

    /// Drop the configured first-line indent for this paragraph.
    pub fn without_indent(mut self) -> Self {
        self.style.no_first_line_indent = true;
        self
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }
}

/// Paragraph styling overrides. Anything left unset comes from the
/// formatting configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Alignment override
    pub alignment: Option<Alignment>,

    /// Suppress the body first-line indent
    pub no_first_line_indent: bool,
}

/// A heading block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level (1 or 2)
    pub level: u8,

    /// Heading text
    pub text: String,

    /// Alignment taken from the inline style, if any
    pub alignment: Option<Alignment>,
}

impl Heading {
    /// Create a heading with default alignment.
    pub fn new(text: impl Into<String>, level: u8) -> Self {
        Self {
            level: level.clamp(1, 2),
            text: text.into(),
            alignment: None,
        }
    }

    /// Create a centered heading.
    pub fn centered(text: impl Into<String>, level: u8) -> Self {
        Self {
            alignment: Some(Alignment::Center),
            ..Self::new(text, level)
        }
    }
}

/// A list item with its own runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Text runs of the item
    pub runs: Vec<TextRun>,

    /// 1-based position within the numbering scope
    pub index: u32,

    /// Numbering scope (the enclosing named section), if any
    pub scope: Option<String>,
}

impl ListItem {
    /// Create a list item.
    pub fn new(runs: Vec<TextRun>, index: u32, scope: Option<String>) -> Self {
        Self { runs, index, scope }
    }

    /// Get plain text content of the item.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,
}

impl TextRun {
    /// Create an unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            italic: false,
        }
    }

    /// Create an italic run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: true,
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    /// Parse a CSS `text-align` value.
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }

    /// WordprocessingML `w:jc` value.
    pub fn ooxml_jc(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}
