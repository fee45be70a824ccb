//! Serialization rules for the markdown dialect.

use super::{Filter, Rule};
use crate::node::{DomNode, NodeRef};
use crate::utilities::clean_attribute;

/// Create all dialect rules
pub fn dialect_rules() -> Vec<Rule> {
    vec![
        line_break_rule(),
        strong_rule(),
        emphasis_rule(),
        code_rule(),
        link_rule(),
        image_rule(),
        video_rule(),
        attachment_rule(),
        heading_rule(),
        blockquote_rule(),
        unordered_list_rule(),
        ordered_list_rule(),
        list_item_rule(),
        code_block_rule(),
        paragraph_rule(),
        span_rule(),
    ]
}

fn line_break_rule() -> Rule {
    Rule::for_tag("br", |_, _, _| "\n".to_string())
}

fn strong_rule() -> Rule {
    Rule::for_tags(&["strong", "b"], |_, content, _| format!("**{}**", content))
}

fn emphasis_rule() -> Rule {
    Rule::for_tags(&["em", "i"], |_, content, _| format!("*{}*", content))
}

fn code_rule() -> Rule {
    Rule::for_tag("code", |node, content, _| {
        // Code blocks are emitted verbatim by the enclosing <pre>.
        if node.parent_tag() == Some("pre") {
            return node.text_content();
        }
        format!("`{}`", content)
    })
}

fn link_rule() -> Rule {
    Rule::for_tag("a", |node, content, _| {
        let href = clean_attribute(node.attr("href")).unwrap_or_else(|| "#".to_string());
        let label = match content.trim() {
            "" => href.as_str(),
            label => label,
        };
        format!("[{}]({})", label, href)
    })
}

fn image_rule() -> Rule {
    Rule::for_tag("img", |node, _, _| {
        let Some(src) = clean_attribute(node.attr("src")) else {
            return String::new();
        };
        let alt = clean_attribute(node.attr("alt")).unwrap_or_else(|| "image".to_string());
        format!("![{}]({})", alt, src)
    })
}

fn video_rule() -> Rule {
    Rule::for_tag("video", |node, _, _| {
        let src = clean_attribute(node.attr("src"))
            .or_else(|| find_source(node.node).and_then(|src| clean_attribute(Some(src))));
        match src {
            Some(src) => format!("![video]({})", src),
            None => String::new(),
        }
    })
}

/// First nested `<source src>` in document order
fn find_source(node: &dyn DomNode) -> Option<&str> {
    node.element_children().into_iter().find_map(|child| {
        if child.tag_name() == "source" {
            if let Some(src) = child.attr("src") {
                return Some(src);
            }
        }
        find_source(child)
    })
}

fn attachment_rule() -> Rule {
    Rule::for_tags(&["object", "embed", "iframe"], |node, _, _| {
        let src = clean_attribute(node.attr("data")).or_else(|| clean_attribute(node.attr("src")));
        match src {
            Some(src) => format!("![attachment]({})", src),
            None => String::new(),
        }
    })
}

fn heading_rule() -> Rule {
    Rule::for_tags(&["h1", "h2", "h3", "h4", "h5", "h6"], |node, content, _| {
        let level: usize = node.tag_name()[1..].parse().unwrap_or(1);
        format!("{} {}\n\n", "#".repeat(level), content.trim())
    })
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content, _| {
        let quoted: Vec<String> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| format!("> {}", line.trim_end()))
            .collect();
        if quoted.is_empty() {
            return String::new();
        }
        format!("{}\n\n", quoted.join("\n"))
    })
}

/// Rendered `<li>` children of a list, trimmed
fn list_items<'a>(node: &NodeRef<'a>) -> Vec<&'a str> {
    node.rendered_elements()
        .into_iter()
        .filter(|(child, _)| child.tag_name() == "li")
        .map(|(_, item)| item.trim())
        .collect()
}

fn unordered_list_rule() -> Rule {
    Rule::for_tag("ul", |node, _, _| {
        let items: Vec<String> = list_items(node)
            .into_iter()
            .map(|item| format!("- {}", item))
            .collect();
        if items.is_empty() {
            return String::new();
        }
        format!("{}\n\n", items.join("\n"))
    })
}

fn ordered_list_rule() -> Rule {
    Rule::for_tag("ol", |node, _, _| {
        let items: Vec<String> = list_items(node)
            .into_iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item))
            .collect();
        if items.is_empty() {
            return String::new();
        }
        format!("{}\n\n", items.join("\n"))
    })
}

fn list_item_rule() -> Rule {
    // The enclosing list adds the marker.
    Rule::for_tag("li", |_, content, _| content.to_string())
}

fn code_block_rule() -> Rule {
    Rule::for_tag("pre", |node, _, _| {
        let code = node.text_content();
        format!("```\n{}\n```\n\n", code.trim_end_matches('\n'))
    })
}

fn paragraph_rule() -> Rule {
    Rule::for_tags(&["p", "div", "section", "article"], |_, content, _| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        format!("{}\n\n", content)
    })
}

fn span_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| tag == "span" && node.attr("style").is_some()),
        |node, content, _| {
            let style = node
                .attr("style")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .replace(": ", ":");
            let bold = style.contains("font-weight:bold");
            let italic = style.contains("font-style:italic");

            if content.trim().is_empty() {
                return content.to_string();
            }
            match (bold, italic) {
                (true, true) => format!("***{}***", content),
                (true, false) => format!("**{}**", content),
                (false, true) => format!("*{}*", content),
                (false, false) => content.to_string(),
            }
        },
    )
}
