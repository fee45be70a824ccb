//! HTML parsing support.
//!
//! Parses HTML strings with scraper (html5ever) and converts the result to the
//! owned [`Node`] structure the serializer walks.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Parse an HTML fragment into a Node tree.
///
/// The returned root is the `<html>` element html5ever wraps every fragment
/// in; it has no serialization rule and passes its content through.
///
/// # Example
///
/// ```rust
/// use markbridge::{parse_html, Converter};
///
/// let node = parse_html("<h1>Hello <em>World</em></h1>");
/// let markdown = Converter::new().node_to_markdown(&node);
/// assert_eq!(markdown, "# Hello *World*");
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    scraper_to_node(document.root_element())
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef) -> Node {
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();
    let mut node = Node::element_with_attrs(element.value().name(), attrs);

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                node.add_child(Node::text(&text.text));
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(scraper_to_node(child_element));
                }
            }
            _ => {}
        }
    }

    node
}
