//! HTML to plain text for spreadsheet cells and slide bodies.

use unicode_normalization::UnicodeNormalization;

use crate::parser::{collapse_whitespace, parse_html, Node};

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "table", "tr", "figure",
    "figcaption", "blockquote", "section", "article", "pre",
];

/// Plain text of an editor HTML value for a spreadsheet cell.
///
/// Ordered lists become `"N. text"` lines, unordered lists `"- text"` lines.
/// Anything else is reduced to its text with one line per block element and
/// whitespace collapsed. The result is NFC-normalized.
pub fn html_to_plain(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let root = parse_html(html);
    let lists = root.find_any(&["ol", "ul"]);
    let text = if lists.is_empty() {
        block_text(&root)
    } else {
        list_lines(&lists)
    };
    text.nfc().collect()
}

/// Slide body text: one line per block element, `<br>` as a line break and
/// images removed without a trace.
pub fn html_to_slide_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    block_text(&parse_html(html)).nfc().collect()
}

/// Every `img` source in document order.
pub fn image_sources(html: &str) -> Vec<String> {
    parse_html(html)
        .find_all("img")
        .into_iter()
        .filter_map(|img| img.attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string)
        .collect()
}

/// Prefix values a spreadsheet would treat as a formula with an apostrophe.
pub fn escape_formula(text: &str) -> String {
    match text.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{}", text),
        _ => text.to_string(),
    }
}

/// One line per item across `lists`; numbering restarts for every `ol`.
fn list_lines(lists: &[&Node]) -> String {
    let mut lines = Vec::new();
    for list in lists {
        let ordered = list.tag == "ol";
        let mut index = 0;
        for li in list.element_children().filter(|n| n.tag == "li") {
            let text = collapse_whitespace(&li.text_content()).trim().to_string();
            if text.is_empty() {
                continue;
            }
            index += 1;
            if ordered {
                lines.push(format!("{}. {}", index, text));
            } else {
                lines.push(format!("- {}", text));
            }
        }
    }
    lines.join("\n")
}

fn block_text(root: &Node) -> String {
    let mut raw = String::new();
    walk(root, &mut raw);
    raw.split('\n')
        .map(|line| collapse_whitespace(line).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn walk(node: &Node, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            if let Some(text) = &child.value {
                // source newlines are formatting, not content
                out.push_str(&text.replace(['\n', '\r'], " "));
            }
            continue;
        }
        match child.tag.as_str() {
            "br" => out.push('\n'),
            "img" | "script" | "style" => {}
            "td" | "th" => {
                walk(child, out);
                out.push(' ');
            }
            tag if BLOCK_TAGS.contains(&tag) => {
                out.push('\n');
                walk(child, out);
                out.push('\n');
            }
            _ => walk(child, out),
        }
    }
}
