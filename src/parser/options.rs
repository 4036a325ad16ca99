//! HTML conversion options.

/// Options for converting HTML fragments into blocks.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// What to do with top-level tags that have no dedicated conversion
    pub unknown_tags: UnknownTagMode,

    /// What to do with inline tags other than bold and italic
    pub unknown_inline: UnknownInlineMode,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unknown top-level tag mode.
    pub fn with_unknown_tags(mut self, mode: UnknownTagMode) -> Self {
        self.unknown_tags = mode;
        self
    }

    /// Skip unknown top-level tags (paper exporter behavior).
    pub fn skip_unknown_tags(mut self) -> Self {
        self.unknown_tags = UnknownTagMode::Skip;
        self
    }

    /// Set the unknown inline tag mode.
    pub fn with_unknown_inline(mut self, mode: UnknownInlineMode) -> Self {
        self.unknown_inline = mode;
        self
    }

    /// Keep the text of unknown inline tags as plain runs.
    pub fn flatten_inline(mut self) -> Self {
        self.unknown_inline = UnknownInlineMode::Flatten;
        self
    }
}

/// Handling of top-level tags without a dedicated conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTagMode {
    /// Emit the trimmed text content as a paragraph
    #[default]
    TextContent,
    /// Drop the node
    Skip,
}

/// Handling of inline tags other than `strong`/`b` and `em`/`i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownInlineMode {
    /// Drop the tag and its text
    #[default]
    Drop,
    /// Descend into the tag and keep its runs
    Flatten,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new().skip_unknown_tags().flatten_inline();

        assert_eq!(options.unknown_tags, UnknownTagMode::Skip);
        assert_eq!(options.unknown_inline, UnknownInlineMode::Flatten);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.unknown_tags, UnknownTagMode::TextContent);
        assert_eq!(options.unknown_inline, UnknownInlineMode::Drop);
    }
}
