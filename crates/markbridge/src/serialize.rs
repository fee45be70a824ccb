//! Post-order walk of a DOM tree into markdown text.

use crate::node::{DomNode, NodeRef, NodeType};
use crate::options::Options;
use crate::rules::Rules;

/// Render a node and its descendants to markdown.
///
/// Children are rendered first; the element's rule then combines their
/// output. The tree is only read, never modified.
pub(crate) fn render_node(
    node: &dyn DomNode,
    parent_tag: Option<&str>,
    rules: &Rules,
    options: &Options,
) -> String {
    match node.node_type() {
        NodeType::Text => node.node_value().unwrap_or_default().to_string(),
        NodeType::Comment => String::new(),
        NodeType::Document | NodeType::DocumentFragment => node
            .child_nodes()
            .into_iter()
            .map(|child| render_node(child, parent_tag, rules, options))
            .collect(),
        NodeType::Element => {
            let tag = node.tag_name();
            let rendered: Vec<String> = node
                .child_nodes()
                .into_iter()
                .map(|child| render_node(child, Some(tag.as_str()), rules, options))
                .collect();
            let content = rendered.concat();

            let node_ref = NodeRef::with_parent(node, parent_tag).with_rendered_children(&rendered);
            match rules.for_node(&tag, &node_ref, options) {
                Some(rule) => rule.replace(&node_ref, &content, options),
                None => content,
            }
        }
    }
}
