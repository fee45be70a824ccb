//! Line-oriented block parser.
//!
//! Groups raw lines into paragraphs, headings, lists, quotes and fenced code,
//! then renders each block through the inline parser. Only one block is open
//! at any time; every transition flushes it first.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::inline::parse_inline_with;
use crate::options::Options;
use crate::utilities::escape_html;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());
static QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^>\s?(.*)$").unwrap());
static UNORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*]\s+(.+)$").unwrap());
static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+(.+)$").unwrap());

const FENCE: &str = "```";

/// List flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// A block of markdown source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<String>),
    Heading { level: u8, text: String },
    List { kind: ListKind, items: Vec<String> },
    Quote(Vec<String>),
    /// Verbatim lines; never inline-parsed
    CodeFence(Vec<String>),
}

impl Block {
    /// Render this block to HTML.
    pub fn to_html(&self, options: &Options) -> String {
        match self {
            Block::Paragraph(lines) => {
                let html = parse_inline_with(&lines.join("\n"), options);
                format!("<p>{}</p>", html.replace('\n', "<br/>"))
            }
            Block::Heading { level, text } => {
                format!("<h{level}>{}</h{level}>", parse_inline_with(text, options))
            }
            Block::List { kind, items } => {
                let tag = kind.tag();
                let items: String = items
                    .iter()
                    .map(|item| format!("<li>{}</li>", parse_inline_with(item, options)))
                    .collect();
                format!("<{tag}>{items}</{tag}>")
            }
            Block::Quote(lines) => {
                let lines: Vec<String> = lines
                    .iter()
                    .map(|line| parse_inline_with(line, options))
                    .collect();
                format!("<blockquote><p>{}</p></blockquote>", lines.join("<br/>"))
            }
            Block::CodeFence(lines) => {
                format!("<pre><code>{}</code></pre>", escape_html(&lines.join("\n")))
            }
        }
    }
}

/// The block currently accumulating lines
#[derive(Debug, Default)]
enum OpenBlock {
    #[default]
    None,
    Paragraph(Vec<String>),
    List(ListKind, Vec<String>),
    Quote(Vec<String>),
    CodeFence(Vec<String>),
}

impl OpenBlock {
    fn into_block(self) -> Option<Block> {
        match self {
            OpenBlock::None => None,
            OpenBlock::Paragraph(lines) => Some(Block::Paragraph(lines)),
            OpenBlock::List(kind, items) => Some(Block::List { kind, items }),
            OpenBlock::Quote(lines) => Some(Block::Quote(lines)),
            OpenBlock::CodeFence(lines) => Some(Block::CodeFence(lines)),
        }
    }
}

/// Block state machine over a sequence of lines
#[derive(Debug, Default)]
struct BlockParser {
    open: OpenBlock,
    blocks: Vec<Block>,
}

impl BlockParser {
    fn flush(&mut self) {
        if let Some(block) = std::mem::take(&mut self.open).into_block() {
            self.blocks.push(block);
        }
    }

    fn feed(&mut self, line: &str) {
        let trimmed = line.trim();

        if let OpenBlock::CodeFence(lines) = &mut self.open {
            if trimmed.starts_with(FENCE) {
                self.flush();
            } else {
                lines.push(line.to_string());
            }
            return;
        }

        if trimmed.starts_with(FENCE) {
            self.flush();
            self.open = OpenBlock::CodeFence(Vec::new());
            return;
        }

        if trimmed.is_empty() {
            self.flush();
            return;
        }

        let line = line.trim_end();

        if let Some(caps) = HEADING.captures(line) {
            self.flush();
            self.blocks.push(Block::Heading {
                level: caps[1].len() as u8,
                text: caps[2].trim().to_string(),
            });
            return;
        }

        if let Some(caps) = QUOTE.captures(line) {
            let rest = caps[1].to_string();
            match &mut self.open {
                OpenBlock::Quote(lines) => lines.push(rest),
                _ => {
                    self.flush();
                    self.open = OpenBlock::Quote(vec![rest]);
                }
            }
            return;
        }

        // Quotes do not continue across non-quote lines.
        if matches!(self.open, OpenBlock::Quote(_)) {
            self.flush();
        }

        let item = UNORDERED_ITEM
            .captures(line)
            .map(|caps| (ListKind::Unordered, caps[1].to_string()))
            .or_else(|| {
                ORDERED_ITEM
                    .captures(line)
                    .map(|caps| (ListKind::Ordered, caps[1].to_string()))
            });

        match item {
            Some((kind, item)) => match &mut self.open {
                OpenBlock::List(open_kind, items) if *open_kind == kind => items.push(item),
                _ => {
                    self.flush();
                    self.open = OpenBlock::List(kind, vec![item]);
                }
            },
            None => match &mut self.open {
                OpenBlock::Paragraph(lines) => lines.push(line.to_string()),
                _ => {
                    self.flush();
                    self.open = OpenBlock::Paragraph(vec![line.to_string()]);
                }
            },
        }
    }

    fn finish(mut self) -> Vec<Block> {
        if matches!(self.open, OpenBlock::CodeFence(_)) {
            tracing::debug!("Closing unterminated code fence at end of input");
        }
        self.flush();
        self.blocks
    }
}

/// Split a markdown document into blocks.
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let normalized = markdown.replace("\r\n", "\n").replace('\r', "\n");
    let document = normalized.trim_matches('\n');

    let mut parser = BlockParser::default();
    for line in document.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Convert a markdown document to HTML.
pub fn render_document(markdown: &str, options: &Options) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }

    let blocks = parse_blocks(markdown);
    tracing::trace!(blocks = blocks.len(), "Parsed markdown blocks");

    blocks
        .iter()
        .map(|block| block.to_html(options))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(markdown: &str) -> String {
        render_document(markdown, &Options::default())
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
        assert_eq!(render("   \n  "), "");
        assert_eq!(render("\n\n\n"), "");
    }

    #[test]
    fn test_heading() {
        assert_eq!(render("# Title"), "<h1>Title</h1>");
        assert_eq!(render("###### Six"), "<h6>Six</h6>");
        assert_eq!(render("####### Seven"), "<p>####### Seven</p>");
        assert_eq!(render("#NoSpace"), "<p>#NoSpace</p>");
    }

    #[test]
    fn test_paragraph_lines_become_breaks() {
        assert_eq!(render("one\ntwo"), "<p>one<br/>two</p>");
    }

    #[test]
    fn test_blank_line_separates_paragraphs() {
        assert_eq!(render("one\n\ntwo"), "<p>one</p>\n<p>two</p>");
    }

    #[test]
    fn test_unordered_list_is_single_block() {
        assert_eq!(render("- a\n- b"), "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(render("* a\n- b"), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(render("1. one\n2. two"), "<ol><li>one</li><li>two</li></ol>");
    }

    #[test]
    fn test_switching_list_kind_flushes() {
        assert_eq!(
            render("- a\n1. b"),
            "<ul><li>a</li></ul>\n<ol><li>b</li></ol>"
        );
    }

    #[test]
    fn test_paragraph_after_list() {
        assert_eq!(render("- a\ntext"), "<ul><li>a</li></ul>\n<p>text</p>");
        assert_eq!(render("text\n- a"), "<p>text</p>\n<ul><li>a</li></ul>");
    }

    #[test]
    fn test_quote() {
        assert_eq!(
            render("> first\n>second"),
            "<blockquote><p>first<br/>second</p></blockquote>"
        );
    }

    #[test]
    fn test_quote_ends_at_non_quote_line() {
        assert_eq!(
            render("> quoted\nplain"),
            "<blockquote><p>quoted</p></blockquote>\n<p>plain</p>"
        );
    }

    #[test]
    fn test_quote_flushes_paragraph_and_list() {
        assert_eq!(
            render("text\n> q"),
            "<p>text</p>\n<blockquote><p>q</p></blockquote>"
        );
        assert_eq!(
            render("- a\n> q"),
            "<ul><li>a</li></ul>\n<blockquote><p>q</p></blockquote>"
        );
        assert_eq!(
            parse_blocks("text\n> q\n- a\n> r"),
            vec![
                Block::Paragraph(vec!["text".to_string()]),
                Block::Quote(vec!["q".to_string()]),
                Block::List { kind: ListKind::Unordered, items: vec!["a".to_string()] },
                Block::Quote(vec!["r".to_string()]),
            ]
        );
    }

    #[test]
    fn test_heading_flushes_paragraph() {
        assert_eq!(render("text\n# Head"), "<p>text</p>\n<h1>Head</h1>");
    }

    #[test]
    fn test_code_fence_is_verbatim() {
        assert_eq!(
            render("```\n*not italic*\n<b>\n```"),
            "<pre><code>*not italic*\n&lt;b&gt;</code></pre>"
        );
    }

    #[test]
    fn test_code_fence_keeps_markdown_syntax() {
        assert_eq!(
            render("```rust\n# not a heading\n- not a list\n\n> nor a quote\n```"),
            "<pre><code># not a heading\n- not a list\n\n&gt; nor a quote</code></pre>"
        );
    }

    #[test]
    fn test_unterminated_fence_closes_at_end() {
        assert_eq!(render("intro\n```\ncode"), "<p>intro</p>\n<pre><code>code</code></pre>");
    }

    #[test]
    fn test_windows_line_endings() {
        assert_eq!(render("# A\r\n\r\nb\r\n"), "<h1>A</h1>\n<p>b</p>");
    }

    #[test]
    fn test_parse_blocks() {
        let blocks = parse_blocks("## Sub\n\n- x\n\n> q");
        assert_eq!(
            blocks,
            vec![
                Block::Heading { level: 2, text: "Sub".to_string() },
                Block::List { kind: ListKind::Unordered, items: vec!["x".to_string()] },
                Block::Quote(vec!["q".to_string()]),
            ]
        );
    }
}
