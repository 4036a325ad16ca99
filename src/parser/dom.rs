//! Detached DOM tree and the HTML parser seam.
//!
//! Exporters never touch a concrete HTML library directly. They ask an
//! [`HtmlParser`] for a [`Node`] tree whose root is a fragment holding the
//! top-level nodes of the input in document order. The default
//! implementation is backed by `scraper` (html5ever), which recovers from
//! malformed markup the same way browsers do and never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node as ScraperNode};

/// Node types kept in the tree. Comments, doctypes and processing
/// instructions are dropped during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node
    Element,
    /// Text node
    Text,
    /// Fragment root
    Fragment,
}

/// A node of a parsed HTML fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node type
    pub node_type: NodeType,

    /// Lowercase tag name for elements, empty otherwise
    pub tag: String,

    /// Text content for text nodes
    pub value: Option<String>,

    /// Attributes in source order
    pub attributes: Vec<(String, String)>,

    /// Child nodes
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new element node.
    pub fn element(tag: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            tag: tag.to_ascii_lowercase(),
            value: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node with attributes.
    pub fn element_with_attrs(tag: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag);
        node.attributes = attrs
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect();
        node
    }

    /// Create a new text node.
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            tag: String::new(),
            value: Some(content.to_string()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an empty fragment root.
    pub fn fragment() -> Self {
        Self {
            node_type: NodeType::Fragment,
            tag: String::new(),
            value: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Check if this is an element node.
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node.
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Check if this is an element with one of the given tag names.
    pub fn is_any(&self, tags: &[&str]) -> bool {
        self.is_element() && tags.contains(&self.tag.as_str())
    }

    /// Get an attribute value by name (case-insensitive).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a property from the inline `style` attribute.
    pub fn style_property(&self, property: &str) -> Option<String> {
        let style = self.attr("style")?;
        style.split(';').find_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            if name.trim().eq_ignore_ascii_case(property) {
                Some(value.trim().to_string())
            } else {
                None
            }
        })
    }

    /// Add a child node.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Iterate over child nodes.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    /// Iterate over element children only.
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => {
                if let Some(ref v) = self.value {
                    out.push_str(v);
                }
            }
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// First descendant element with the given tag, in document order.
    pub fn find_first(&self, tag: &str) -> Option<&Node> {
        for child in &self.children {
            if child.is_element() && child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.find_first(tag) {
                return Some(found);
            }
        }
        None
    }

    /// All descendant elements with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&Node> {
        self.find_any(&[tag])
    }

    /// All descendant elements matching any of `tags`, in document order.
    pub fn find_any(&self, tags: &[&str]) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect_tagged(tags, &mut found);
        found
    }

    fn collect_tagged<'a>(&'a self, tags: &[&str], found: &mut Vec<&'a Node>) {
        for child in &self.children {
            if child.is_any(tags) {
                found.push(child);
            }
            child.collect_tagged(tags, found);
        }
    }

    /// Check if any descendant element has the given tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.find_first(tag).is_some()
    }
}

/// Parses an HTML fragment into a detached [`Node`] tree.
///
/// Implementations must be tolerant: malformed markup is recovered on a best
/// effort basis and never produces an error. Nothing is executed and nothing
/// is fetched while parsing.
pub trait HtmlParser {
    /// Parse `html` and return a fragment node holding its top-level nodes.
    fn parse(&self, html: &str) -> Node;
}

/// Default parser backed by `scraper` / html5ever.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperParser;

impl HtmlParser for ScraperParser {
    fn parse(&self, html: &str) -> Node {
        let document = Html::parse_fragment(html);
        let mut root = Node::fragment();
        // parse_fragment wraps the input in a synthetic <html> element
        append_children(document.root_element(), &mut root);
        root
    }
}

/// Parse an HTML fragment with the default parser.
///
/// # Example
///
/// ```rust
/// use reviewdoc::parser::parse_html;
///
/// let root = parse_html("<p>Hello <em>World</em></p>");
/// assert_eq!(root.children().count(), 1);
/// assert_eq!(root.text_content(), "Hello World");
/// ```
pub fn parse_html(html: &str) -> Node {
    ScraperParser.parse(html)
}

fn append_children(element: ElementRef, parent: &mut Node) {
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                parent.add_child(Node::text(&text.text));
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    parent.add_child(convert_element(child_element));
                }
            }
            _ => {}
        }
    }
}

fn convert_element(element: ElementRef) -> Node {
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();
    let mut node = Node::element_with_attrs(element.value().name(), attrs);
    append_children(element, &mut node);
    node
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapse every whitespace run (including newlines and non-breaking
/// spaces) into a single space. Leading and trailing spaces are kept.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_top_level_order() {
        let root = parse_html("<h1>A</h1><p>B</p>tail");
        let tags: Vec<&str> = root
            .children()
            .map(|n| if n.is_text() { "#text" } else { n.tag.as_str() })
            .collect();
        assert_eq!(tags, vec!["h1", "p", "#text"]);
    }

    #[test]
    fn test_parse_malformed_html_recovers() {
        let root = parse_html("<p>open <strong>bold<p>next");
        assert!(root.find_all("p").len() >= 2);
        assert!(root.text_content().contains("next"));
    }

    #[test]
    fn test_comments_are_dropped() {
        let root = parse_html("<p>safe</p><!-- note -->");
        assert_eq!(root.children().count(), 1);
    }

    #[test]
    fn test_attributes_and_style() {
        let root = parse_html(r#"<h1 style="text-align: center; color:red">T</h1>"#);
        let h1 = root.find_first("h1").unwrap();
        assert_eq!(h1.style_property("text-align").as_deref(), Some("center"));
        assert_eq!(h1.style_property("margin"), None);
        assert!(h1.attr("STYLE").is_some());
    }

    #[test]
    fn test_find_all_document_order() {
        let root = parse_html("<table><tr><td>1</td></tr><tr><td>2</td></tr></table>");
        let texts: Vec<String> = root.find_all("td").iter().map(|n| n.text_content()).collect();
        assert_eq!(texts, vec!["1", "2"]);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("Hello "), "Hello ");
        assert_eq!(collapse_whitespace("x\u{a0}\u{a0}y"), "x y");
    }
}
