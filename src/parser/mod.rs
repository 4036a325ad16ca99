//! HTML parsing and block conversion.

mod blocks;
mod dom;
mod inline;
mod options;

pub use blocks::{BlockConverter, ListScopes};
pub use dom::{collapse_whitespace, parse_html, HtmlParser, Node, NodeType, ScraperParser};
pub use inline::extract_runs;
pub use options::{ParseOptions, UnknownInlineMode, UnknownTagMode};
