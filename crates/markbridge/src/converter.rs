//! Converter - the entry point for both conversion directions.

use crate::block::render_document;
use crate::node::DomNode;
use crate::normalize::normalize_markdown;
use crate::options::Options;
use crate::rules::{Rule, Rules};
use crate::serialize::render_node;
use crate::Result;

/// Converts markdown to HTML and back with a fixed set of options
pub struct Converter {
    options: Options,
    rules: Rules,
}

impl Converter {
    /// Create a new Converter with default options
    pub fn new() -> Self {
        Self {
            options: Options::default(),
            rules: Rules::new(),
        }
    }

    /// Create a Converter with custom options
    pub fn with_options(options: Options) -> Result<Self> {
        Ok(Self {
            options: options.validate()?,
            rules: Rules::new(),
        })
    }

    /// Get the current options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Add a custom serialization rule, checked before the built-in ones
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Convert markdown to sanitized HTML
    pub fn markdown_to_html(&self, markdown: &str) -> String {
        render_document(markdown, &self.options)
    }

    /// Convert an HTML string to markdown
    #[cfg(feature = "html")]
    pub fn html_to_markdown(&self, html: &str) -> String {
        if html.trim().is_empty() {
            return String::new();
        }
        let root = crate::html::parse_html(html);
        self.node_to_markdown(&root)
    }

    /// Convert an already parsed DOM tree to markdown
    pub fn node_to_markdown(&self, node: &dyn DomNode) -> String {
        let output = render_node(node, None, &self.rules, &self.options);
        normalize_markdown(&output)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}
