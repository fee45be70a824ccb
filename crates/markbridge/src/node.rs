//! Read-only DOM abstraction for HTML to Markdown conversion.
//!
//! The serializer only needs four capabilities from a parsed tree: the tag
//! name, attribute lookup, ordered children and text content. [`DomNode`]
//! captures exactly that, so any HTML parser can feed the converter. [`Node`]
//! is the owned implementation produced by [`parse_html`](crate::parse_html).

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

/// Minimal read-only view of a parsed HTML node.
pub trait DomNode {
    /// Kind of this node
    fn node_type(&self) -> NodeType;

    /// Lower-case tag name for elements, empty for everything else
    fn tag_name(&self) -> String;

    /// Attribute value, looked up case-insensitively
    fn attr(&self, name: &str) -> Option<&str>;

    /// Ordered child nodes
    fn child_nodes(&self) -> Vec<&dyn DomNode>;

    /// Raw text of a text node
    fn node_value(&self) -> Option<&str>;

    /// Concatenated text of this node and all descendants
    fn text_content(&self) -> String {
        match self.node_type() {
            NodeType::Text => self.node_value().unwrap_or_default().to_string(),
            NodeType::Comment => String::new(),
            _ => self
                .child_nodes()
                .into_iter()
                .map(|child| child.text_content())
                .collect(),
        }
    }

    /// Check if this is an element node
    fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// Only the element children
    fn element_children(&self) -> Vec<&dyn DomNode> {
        self.child_nodes()
            .into_iter()
            .filter(|child| child.is_element())
            .collect()
    }
}

/// A DOM node following the CDP DOM.Node structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node type (1 = Element, 3 = Text, etc.)
    pub node_type: NodeType,

    /// Node name (uppercase for elements, e.g., "DIV", "#text" for text nodes)
    pub node_name: String,

    /// Text content for text nodes
    pub node_value: Option<String>,

    /// Attributes as flat array [name, value, name, value, ...] (CDP style)
    pub attributes: Vec<String>,

    /// Child nodes
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_uppercase(),
            node_value: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        node.attributes = attrs
            .into_iter()
            .flat_map(|(k, v)| [k.to_string(), v.to_string()])
            .collect();
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a comment node
    pub fn comment(content: &str) -> Self {
        Self {
            node_type: NodeType::Comment,
            node_name: "#comment".to_string(),
            node_value: Some(content.to_string()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a document fragment node
    pub fn document_fragment() -> Self {
        Self {
            node_type: NodeType::DocumentFragment,
            node_name: "#document-fragment".to_string(),
            node_value: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Builder form of [`Node::add_child`]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let mut i = 0;
        while i + 1 < self.attributes.len() {
            if self.attributes[i].eq_ignore_ascii_case(name) {
                self.attributes[i + 1] = value.to_string();
                return;
            }
            i += 2;
        }
        self.attributes.push(name.to_string());
        self.attributes.push(value.to_string());
    }
}

impl DomNode for Node {
    fn node_type(&self) -> NodeType {
        self.node_type
    }

    fn tag_name(&self) -> String {
        match self.node_type {
            NodeType::Element => self.node_name.to_lowercase(),
            _ => String::new(),
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        // CDP stores attributes as flat array: [name, value, name, value, ...]
        self.attributes
            .chunks_exact(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
            .map(|pair| pair[1].as_str())
    }

    fn child_nodes(&self) -> Vec<&dyn DomNode> {
        self.children.iter().map(|c| c as &dyn DomNode).collect()
    }

    fn node_value(&self) -> Option<&str> {
        match self.node_type {
            NodeType::Text => self.node_value.as_deref(),
            _ => None,
        }
    }
}

/// A reference to a node with parent context.
/// This allows rules to look one level up the tree without parent pointers,
/// and to see the rendered output of each child individually.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    /// The node itself
    pub node: &'a dyn DomNode,
    parent_tag: Option<&'a str>,
    rendered: &'a [String],
}

impl<'a> NodeRef<'a> {
    /// Create a new NodeRef without parent context
    pub fn new(node: &'a dyn DomNode) -> Self {
        Self {
            node,
            parent_tag: None,
            rendered: &[],
        }
    }

    /// Create a new NodeRef with parent tag context
    pub fn with_parent(node: &'a dyn DomNode, parent_tag: Option<&'a str>) -> Self {
        Self {
            node,
            parent_tag,
            rendered: &[],
        }
    }

    /// Attach the rendered output of each child, in `child_nodes()` order
    pub fn with_rendered_children(mut self, rendered: &'a [String]) -> Self {
        self.rendered = rendered;
        self
    }

    /// Get the parent tag name if known
    pub fn parent_tag(&self) -> Option<&str> {
        self.parent_tag
    }

    /// Element children paired with their rendered output
    pub fn rendered_elements(&self) -> Vec<(&'a dyn DomNode, &'a str)> {
        self.node
            .child_nodes()
            .into_iter()
            .zip(self.rendered.iter())
            .filter(|(child, _)| child.is_element())
            .map(|(child, out)| (child, out.as_str()))
            .collect()
    }

    pub fn tag_name(&self) -> String {
        self.node.tag_name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn element_children(&self) -> Vec<&'a dyn DomNode> {
        self.node.element_children()
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }
}
