//! # markbridge
//!
//! Convert between a small markdown dialect and sanitized HTML, in both
//! directions.
//!
//! ## Design
//!
//! Rich text is stored as plain markdown and rendered or edited as HTML. The
//! dialect is small and fixed: paragraphs, ATX headings, flat lists, quotes,
//! fenced code, bold, italic, inline code, links and media embeds (images,
//! videos, PDFs).
//!
//! - **markdown → HTML** runs a line-based block parser and an inline parser
//!   over escaped text. Link targets are checked against a scheme allow-list.
//! - **HTML → markdown** walks a parsed DOM tree with per-tag rules. The walker
//!   only needs the [`DomNode`] trait, so any HTML parser can feed it.
//!
//! Both directions are total: malformed input degrades instead of failing, and
//! markdown produced by this crate survives a round trip unchanged.
//!
//! ## Example
//!
//! ```rust
//! use markbridge::{html_to_markdown, markdown_to_html};
//!
//! let html = markdown_to_html("# Notes\n\n- **one**\n- two");
//! assert_eq!(html, "<h1>Notes</h1>\n<ul><li><strong>one</strong></li><li>two</li></ul>");
//!
//! let markdown = html_to_markdown(&html);
//! assert_eq!(markdown, "# Notes\n\n- **one**\n- two");
//! ```

pub mod block;
mod converter;
#[cfg(feature = "html")]
pub mod html;
pub mod inline;
pub mod links;
pub mod node;
mod normalize;
mod options;
mod rules;
mod serialize;
mod utilities;

use once_cell::sync::Lazy;

pub use converter::Converter;
#[cfg(feature = "html")]
pub use html::parse_html;
pub use inline::{parse_inline, parse_inline_with};
pub use links::{classify_media, sanitize_link_url, sanitize_link_url_with, MediaKind};
pub use node::{DomNode, Node, NodeRef, NodeType};
pub use normalize::normalize_markdown;
pub use options::Options;
pub use rules::{Filter, Rule};
pub use utilities::*;

/// Error type for markbridge operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

static DEFAULT_CONVERTER: Lazy<Converter> = Lazy::new(Converter::new);

/// Convert markdown to sanitized HTML with default options.
///
/// Empty or whitespace-only input yields an empty string.
pub fn markdown_to_html(markdown: &str) -> String {
    DEFAULT_CONVERTER.markdown_to_html(markdown)
}

/// Convert HTML to markdown with default options.
///
/// Empty or whitespace-only input yields an empty string without parsing.
#[cfg(feature = "html")]
pub fn html_to_markdown(html: &str) -> String {
    DEFAULT_CONVERTER.html_to_markdown(html)
}
