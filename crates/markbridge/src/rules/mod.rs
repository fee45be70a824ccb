//! Rule system for HTML to Markdown conversion.

mod dialect;
mod rule;

pub use dialect::dialect_rules;
pub use rule::{Filter, Rule};

use indexmap::IndexMap;

use crate::node::NodeRef;
use crate::options::Options;

/// Collection of rules for conversion
pub struct Rules {
    /// Custom rules added by the user (checked first, in insertion order)
    custom_rules: IndexMap<String, Rule>,
    /// Built-in dialect rules
    dialect_rules: Vec<Rule>,
}

impl Rules {
    /// Create a new Rules instance with the dialect rules
    pub fn new() -> Self {
        Self {
            custom_rules: IndexMap::new(),
            dialect_rules: dialect_rules(),
        }
    }

    /// Add a custom rule, replacing any earlier rule with the same key
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.custom_rules.insert(key.to_string(), rule);
    }

    /// Find the rule for an element. Unmatched elements pass their content through.
    pub fn for_node<'r>(
        &'r self,
        tag: &str,
        node: &NodeRef,
        options: &Options,
    ) -> Option<&'r Rule> {
        self.custom_rules
            .values()
            .chain(self.dialect_rules.iter())
            .find(|rule| rule.filter.matches(tag, node, options))
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}
