//! Block conversion: top-level HTML nodes to content blocks.

use std::collections::HashMap;

use super::dom::{collapse_whitespace, HtmlParser, Node, ScraperParser};
use super::inline::extract_runs;
use super::options::{ParseOptions, UnknownTagMode};
use crate::model::{Alignment, Block, Heading, ListItem, Paragraph, Table, TableCell, TableRow, TextRun};

/// Converts HTML fragments into an ordered block sequence.
///
/// Only the fragment's top-level nodes are dispatched; output order is
/// sibling order and nothing is reordered. Fragments holding only whitespace
/// or empty elements yield no blocks.
///
/// # Example
///
/// ```rust
/// use reviewdoc::model::{Block, TextRun};
/// use reviewdoc::parser::{BlockConverter, ParseOptions};
///
/// let converter = BlockConverter::new(ParseOptions::default());
/// let blocks = converter.convert_html("<p>Hello <strong>World</strong></p>");
/// match &blocks[0] {
///     Block::Paragraph(p) => assert_eq!(p.runs[1], TextRun::bold("World")),
///     other => panic!("unexpected block {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlockConverter<P: HtmlParser = ScraperParser> {
    parser: P,
    options: ParseOptions,
}

impl BlockConverter<ScraperParser> {
    /// Create a converter using the default parser.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            parser: ScraperParser,
            options,
        }
    }
}

impl<P: HtmlParser> BlockConverter<P> {
    /// Create a converter with a custom parser implementation.
    pub fn with_parser(parser: P, options: ParseOptions) -> Self {
        Self { parser, options }
    }

    /// Get the conversion options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse `html` and convert its top-level nodes.
    pub fn convert_html(&self, html: &str) -> Vec<Block> {
        if html.trim().is_empty() {
            return Vec::new();
        }
        let root = self.parser.parse(html);
        let blocks = self.convert_nodes(root.children());
        log::debug!("converted fragment into {} blocks", blocks.len());
        blocks
    }

    /// Convert a sequence of sibling nodes.
    pub fn convert_nodes<'a>(&self, nodes: impl IntoIterator<Item = &'a Node>) -> Vec<Block> {
        let mut blocks = Vec::new();
        for node in nodes {
            self.convert_node(node, &mut blocks);
        }
        blocks
    }

    fn convert_node(&self, node: &Node, out: &mut Vec<Block>) {
        if node.is_text() {
            let text = collapse_whitespace(node.value.as_deref().unwrap_or(""));
            let text = text.trim();
            if !text.is_empty() {
                out.push(Block::Paragraph(Paragraph::with_text(text)));
            }
            return;
        }
        if !node.is_element() {
            return;
        }

        match node.tag.as_str() {
            // Editor headings of either tag map to level 1
            "h1" | "h2" => {
                let text = collapse_whitespace(&node.text_content()).trim().to_string();
                if !text.is_empty() {
                    out.push(Block::Heading(Heading {
                        level: 1,
                        text,
                        alignment: inline_alignment(node),
                    }));
                }
            }
            "p" => {
                let runs = extract_runs(node, self.options.unknown_inline);
                if !runs.is_empty() {
                    let mut paragraph = Paragraph::from_runs(runs);
                    paragraph.style.alignment = inline_alignment(node);
                    out.push(Block::Paragraph(paragraph));
                }
            }
            "table" => push_table(node, out),
            "img" => push_image(node, out),
            "figure" if node.contains("table") => {
                if let Some(table) = node.find_first("table") {
                    push_table(table, out);
                }
            }
            "figure" if node.contains("img") => {
                if let Some(img) = node.find_first("img") {
                    push_image(img, out);
                }
            }
            _ => self.convert_unknown(node, out),
        }
    }

    fn convert_unknown(&self, node: &Node, out: &mut Vec<Block>) {
        match self.options.unknown_tags {
            UnknownTagMode::Skip => {}
            UnknownTagMode::TextContent => {
                let text = collapse_whitespace(&node.text_content()).trim().to_string();
                if !text.is_empty() {
                    out.push(Block::Paragraph(Paragraph::with_text(text)));
                }
            }
        }
    }

    /// Convert a list fragment of a named section.
    ///
    /// Every `ol` and `ul` in the fragment is walked in document order.
    /// Items of an `ol` become ordered list items numbered within `scope`;
    /// items of a `ul` become bulleted items. Fragments without lists fall
    /// back to [`convert_html`](Self::convert_html). Numbering restarts for
    /// every distinct scope name and continues when the same scope name is
    /// seen again through the same `scopes`.
    pub fn convert_list(&self, html: &str, scope: &str, scopes: &mut ListScopes) -> Vec<Block> {
        if html.trim().is_empty() {
            return Vec::new();
        }
        let root = self.parser.parse(html);

        let lists = root.find_any(&["ol", "ul"]);
        if lists.is_empty() {
            return self.convert_nodes(root.children());
        }

        let mut blocks = Vec::new();
        let mut bullet_index = 0;
        for list in lists {
            let ordered = list.tag == "ol";
            for li in list.element_children().filter(|n| n.tag == "li") {
                let runs = self.item_runs(li);
                if runs.is_empty() {
                    continue;
                }
                if ordered {
                    let index = scopes.next(scope);
                    blocks.push(Block::OrderedListItem(ListItem::new(
                        runs,
                        index,
                        Some(scope.to_string()),
                    )));
                } else {
                    bullet_index += 1;
                    blocks.push(Block::UnorderedListItem(ListItem::new(
                        runs,
                        bullet_index,
                        Some(scope.to_string()),
                    )));
                }
            }
        }
        log::debug!("converted {} list items in {:?}", blocks.len(), scope);
        blocks
    }

    /// Runs for one `li`: inline runs of the item itself, or of its
    /// paragraphs when the editor wrapped the item text in `p`.
    fn item_runs(&self, li: &Node) -> Vec<TextRun> {
        let mut runs = extract_runs(li, self.options.unknown_inline);
        if runs.is_empty() {
            for p in li.element_children().filter(|n| n.tag == "p") {
                runs.extend(extract_runs(p, self.options.unknown_inline));
            }
        }
        if runs.is_empty() {
            let text = collapse_whitespace(&li.text_content()).trim().to_string();
            if !text.is_empty() {
                runs.push(TextRun::plain(text));
            }
        }
        runs
    }
}

/// Per-section ordered-list counters.
#[derive(Debug, Clone, Default)]
pub struct ListScopes {
    counters: HashMap<String, u32>,
}

impl ListScopes {
    /// Create an empty set of scopes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next 1-based index within `scope`.
    pub fn next(&mut self, scope: &str) -> u32 {
        let counter = self.counters.entry(scope.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Number of distinct scopes seen so far.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// Check if no scope has been used.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

fn inline_alignment(node: &Node) -> Option<Alignment> {
    node.style_property("text-align")
        .as_deref()
        .and_then(Alignment::from_css)
}

fn push_table(node: &Node, out: &mut Vec<Block>) {
    let mut table = Table::new();
    for tr in node.find_all("tr") {
        let cells: Vec<&Node> = tr
            .element_children()
            .filter(|c| c.tag == "th" || c.tag == "td")
            .collect();
        let is_header = !cells.is_empty() && cells.iter().all(|c| c.tag == "th");
        let cells: Vec<TableCell> = cells
            .into_iter()
            .map(|c| TableCell::text(collapse_whitespace(&c.text_content())))
            .collect();
        table.add_row(if is_header {
            TableRow::header(cells)
        } else {
            TableRow::new(cells)
        });
    }
    if !table.is_empty() {
        out.push(Block::Table(table));
    }
}

fn push_image(node: &Node, out: &mut Vec<Block>) {
    match node.attr("src").map(str::trim) {
        Some(src) if !src.is_empty() => out.push(Block::Image {
            source: src.to_string(),
        }),
        _ => log::debug!("skipping <img> without src"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> BlockConverter {
        BlockConverter::new(ParseOptions::default())
    }

    #[test]
    fn test_empty_fragments_yield_nothing() {
        let converter = lenient();
        assert!(converter.convert_html("").is_empty());
        assert!(converter.convert_html("  \n ").is_empty());
        assert!(converter
            .convert_html("<p> </p><p>&nbsp;</p><div></div>\n<h1> </h1>")
            .is_empty());
    }

    #[test]
    fn test_paragraph_order_preserved() {
        let blocks = lenient().convert_html("<p>one</p><p>two</p><p>three</p>");
        let texts: Vec<String> = blocks.iter().map(|b| b.plain_text()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_heading_alignment_from_style() {
        let blocks =
            lenient().convert_html(r#"<h1 style="text-align:center">Title</h1><h2>Sub</h2>"#);
        assert_eq!(
            blocks[0],
            Block::Heading(Heading {
                level: 1,
                text: "Title".into(),
                alignment: Some(Alignment::Center)
            })
        );
        assert_eq!(blocks[1], Block::Heading(Heading::new("Sub", 1)));
    }

    #[test]
    fn test_table_cells_and_blank_cells() {
        let html = "<figure class=\"table\"><table><tbody>\
                    <tr><th>A</th><th>B</th></tr>\
                    <tr><td>1</td><td></td></tr>\
                    <tr></tr>\
                    </tbody></table></figure>";
        let blocks = lenient().convert_html(html);
        assert_eq!(blocks.len(), 1);
        let Block::Table(table) = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.row_count(), 2);
        assert!(table.rows[0].is_header);
        assert_eq!(table.rows[1].cells[1].text, " ");
    }

    #[test]
    fn test_images_and_figures() {
        let html = r#"<img src="https://a/x.png"><figure class="image"><img src="/media/y.jpg"><figcaption>cap</figcaption></figure><img>"#;
        let blocks = lenient().convert_html(html);
        assert_eq!(
            blocks,
            vec![
                Block::Image { source: "https://a/x.png".into() },
                Block::Image { source: "/media/y.jpg".into() },
            ]
        );
    }

    #[test]
    fn test_bare_text_node_becomes_paragraph() {
        let blocks = lenient().convert_html("  loose text  <p>p</p>");
        assert_eq!(blocks[0], Block::Paragraph(Paragraph::with_text("loose text")));
    }

    #[test]
    fn test_unknown_tags_by_mode() {
        let html = "<blockquote>quoted <b>words</b></blockquote><p>kept</p>";
        let lenient_blocks = lenient().convert_html(html);
        assert_eq!(lenient_blocks.len(), 2);
        assert_eq!(lenient_blocks[0].plain_text(), "quoted words");

        let strict = BlockConverter::new(ParseOptions::new().skip_unknown_tags());
        let strict_blocks = strict.convert_html(html);
        assert_eq!(strict_blocks.len(), 1);
        assert_eq!(strict_blocks[0].plain_text(), "kept");
    }

    #[test]
    fn test_ordered_list_restarts_per_scope() {
        let converter = lenient();
        let mut scopes = ListScopes::new();
        let a = converter.convert_list("<ol><li>x</li><li>y</li></ol>", "Gaps", &mut scopes);
        let b = converter.convert_list("<ol><li>z</li></ol>", "Methods", &mut scopes);

        let indices = |blocks: &[Block]| -> Vec<u32> {
            blocks
                .iter()
                .map(|b| match b {
                    Block::OrderedListItem(item) => item.index,
                    _ => 0,
                })
                .collect()
        };
        assert_eq!(indices(&a), vec![1, 2]);
        assert_eq!(indices(&b), vec![1]);
        assert_eq!(scopes.len(), 2);
    }

    #[test]
    fn test_same_scope_continues_numbering() {
        let converter = lenient();
        let mut scopes = ListScopes::new();
        converter.convert_list("<ol><li>x</li></ol>", "Gaps", &mut scopes);
        let again = converter.convert_list("<ol><li><p>y</p></li></ol>", "Gaps", &mut scopes);
        assert!(matches!(&again[0], Block::OrderedListItem(item) if item.index == 2));
    }

    #[test]
    fn test_mixed_lists_keep_document_order() {
        let converter = lenient();
        let mut scopes = ListScopes::new();
        let html = "<ul><li>note</li></ul><ol><li>first</li><li>second</li></ol><ul><li>tail</li></ul>";
        let blocks = converter.convert_list(html, "Gaps", &mut scopes);

        let texts: Vec<String> = blocks.iter().map(|b| b.plain_text()).collect();
        assert_eq!(texts, vec!["note", "first", "second", "tail"]);
        assert!(matches!(&blocks[0], Block::UnorderedListItem(item) if item.index == 1));
        assert!(matches!(&blocks[2], Block::OrderedListItem(item) if item.index == 2));
        assert!(matches!(&blocks[3], Block::UnorderedListItem(item) if item.index == 2));
    }

    #[test]
    fn test_unordered_list_and_fallback() {
        let converter = lenient();
        let mut scopes = ListScopes::new();
        let bullets = converter.convert_list("<ul><li>a</li><li> </li><li>b</li></ul>", "S", &mut scopes);
        assert_eq!(bullets.len(), 2);
        assert!(matches!(bullets[0], Block::UnorderedListItem(_)));

        let plain = converter.convert_list("<p>no list</p>", "S", &mut scopes);
        assert!(matches!(plain[0], Block::Paragraph(_)));
        assert!(scopes.is_empty());
    }
}
