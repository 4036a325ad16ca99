//! Inline run extraction.

use super::dom::{collapse_whitespace, Node};
use super::options::UnknownInlineMode;
use crate::model::TextRun;

const BOLD_TAGS: &[&str] = &["strong", "b"];
const ITALIC_TAGS: &[&str] = &["em", "i"];

/// Convert the immediate children of a block node into styled runs.
///
/// Text nodes become plain runs, `strong`/`b` become bold runs and `em`/`i`
/// become italic runs. Formatting nested inside a bold or italic element is
/// flattened into that element's text. Whitespace-only pieces are skipped.
/// Other inline elements are dropped unless `mode` is
/// [`UnknownInlineMode::Flatten`], in which case their children are
/// extracted recursively.
pub fn extract_runs(node: &Node, mode: UnknownInlineMode) -> Vec<TextRun> {
    let mut runs = Vec::new();
    for child in node.children() {
        if child.is_text() {
            let text = collapse_whitespace(child.value.as_deref().unwrap_or(""));
            if !text.trim().is_empty() {
                runs.push(TextRun::plain(text));
            }
            continue;
        }

        if child.is_any(BOLD_TAGS) {
            if let Some(text) = inner_text(child) {
                runs.push(TextRun::bold(text));
            }
        } else if child.is_any(ITALIC_TAGS) {
            if let Some(text) = inner_text(child) {
                runs.push(TextRun::italic(text));
            }
        } else if mode == UnknownInlineMode::Flatten {
            runs.extend(extract_runs(child, mode));
        }
    }
    runs
}

fn inner_text(node: &Node) -> Option<String> {
    let text = collapse_whitespace(&node.text_content());
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;

    fn runs_of(html: &str, mode: UnknownInlineMode) -> Vec<TextRun> {
        let root = parse_html(html);
        let p = root.find_first("p").unwrap();
        extract_runs(p, mode)
    }

    #[test]
    fn test_plain_and_bold_runs() {
        let runs = runs_of("<p>Hello <strong>World</strong></p>", UnknownInlineMode::Drop);
        assert_eq!(runs, vec![TextRun::plain("Hello "), TextRun::bold("World")]);
    }

    #[test]
    fn test_italic_and_b_i_aliases() {
        let runs = runs_of("<p><b>B</b><i>I</i><em>E</em></p>", UnknownInlineMode::Drop);
        assert_eq!(
            runs,
            vec![TextRun::bold("B"), TextRun::italic("I"), TextRun::italic("E")]
        );
    }

    #[test]
    fn test_nested_formatting_is_flattened() {
        let runs = runs_of(
            "<p><strong>bold <em>and italic</em></strong></p>",
            UnknownInlineMode::Drop,
        );
        assert_eq!(runs, vec![TextRun::bold("bold and italic")]);
    }

    #[test]
    fn test_unknown_inline_dropped_by_default() {
        let runs = runs_of("<p>a <span>hidden</span> b</p>", UnknownInlineMode::Drop);
        let text: String = runs.iter().map(|r| r.text.as_str()).collect();
        assert!(!text.contains("hidden"));
    }

    #[test]
    fn test_unknown_inline_flattened() {
        let runs = runs_of(
            "<p>a <span>kept <strong>bold</strong></span></p>",
            UnknownInlineMode::Flatten,
        );
        assert_eq!(
            runs,
            vec![
                TextRun::plain("a "),
                TextRun::plain("kept "),
                TextRun::bold("bold")
            ]
        );
    }

    #[test]
    fn test_whitespace_only_pieces_skipped() {
        let runs = runs_of("<p>  <strong> </strong>\n</p>", UnknownInlineMode::Drop);
        assert!(runs.is_empty());
    }
}
