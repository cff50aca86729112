//! Small helpers for searching parsed HTML documents.

use ego_tree::NodeRef;
use scraper::{Html, Node};

/// A node of a parsed HTML document.
pub type HtmlNode<'a> = NodeRef<'a, Node>;

/// Parse an HTML document. Malformed markup is repaired, never rejected.
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// Depth-first, pre-order search starting at (and including) `root`.
///
/// Returns the first node for which `pred` holds.
pub fn find_node<'a, P>(root: HtmlNode<'a>, mut pred: P) -> Option<HtmlNode<'a>>
where
    P: FnMut(&HtmlNode<'a>) -> bool,
{
    root.descendants().find(|node| pred(node))
}

/// Value of attribute `key`, or `""` when absent or `node` is not an element.
pub fn attribute<'a>(node: &HtmlNode<'a>, key: &str) -> &'a str {
    node.value()
        .as_element()
        .and_then(|element| element.attr(key))
        .unwrap_or("")
}

/// `node` is an element with the given tag name.
pub fn is_element(node: &HtmlNode<'_>, tag: &str) -> bool {
    node.value()
        .as_element()
        .is_some_and(|element| element.name() == tag)
}
