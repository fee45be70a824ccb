//! Inline markdown parsing: code spans, media, links, bold and italic.
//!
//! Passes run in a fixed order over already-escaped text. Spans rendered by an
//! early pass are swapped for placeholder tokens so that later passes never see
//! their content; the tokens are resolved once at the very end.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::links::{
    classify_media, sanitize_link_url_with, sanitize_media_url, MediaKind, UNSAFE_URL,
};
use crate::options::Options;
use crate::utilities::{escape_html, unescape_html};

const TOKEN_OPEN: char = '\u{E000}';
const TOKEN_CLOSE: char = '\u{E001}';

static CODE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+?)`").unwrap());
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\n]+)\*").unwrap());
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new("\u{E000}([0-9]+)\u{E001}").unwrap());
static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Render one block's text as inline HTML using default options.
///
/// ```rust
/// use markbridge::parse_inline;
///
/// assert_eq!(parse_inline("**bold** and `*code*`"), "<strong>bold</strong> and <code>*code*</code>");
/// ```
pub fn parse_inline(text: &str) -> String {
    parse_inline_with(text, &Options::default())
}

/// Render one block's text as inline HTML.
pub fn parse_inline_with(text: &str, options: &Options) -> String {
    let mut placeholders = Placeholders::default();

    let text = text.replace([TOKEN_OPEN, TOKEN_CLOSE], "");
    let escaped = escape_html(&text);

    let with_code = CODE_SPAN.replace_all(&escaped, |caps: &Captures| {
        placeholders.push(format!("<code>{}</code>", &caps[1]))
    });

    let with_media = IMAGE.replace_all(&with_code, |caps: &Captures| {
        let (label, raw_url) = (&caps[1], unescape_html(&caps[2]));
        let kind = classify_media(&raw_url);
        let src = sanitize_media_url(&raw_url, &options.allowed_schemes);
        let alt = placeholders.plain_text(label);

        match render_media(kind, &src, &alt, options) {
            Some(html) if src != UNSAFE_URL && !has_token(&caps[2]) => placeholders.push(html),
            _ => {
                tracing::debug!(url = %raw_url, "Keeping media syntax as literal text");
                placeholders.push(caps[0].to_string())
            }
        }
    });

    let with_links = LINK.replace_all(&with_media, |caps: &Captures| {
        if has_token(&caps[2]) {
            return caps[0].to_string();
        }
        let (label, raw_url) = (&caps[1], unescape_html(&caps[2]));

        let kind = classify_media(&raw_url);
        if kind.is_media() {
            let src = sanitize_media_url(&raw_url, &options.allowed_schemes);
            if src != UNSAFE_URL {
                let alt = placeholders.plain_text(label);
                if let Some(html) = render_media(kind, &src, &alt, options) {
                    return placeholders.push(html);
                }
            }
        }

        let href = sanitize_link_url_with(&raw_url, &options.allowed_schemes);
        placeholders.push(render_anchor(&href, label, options))
    });

    let with_bold = BOLD.replace_all(&with_links, "<strong>$1</strong>");
    let with_italic = replace_italic(&with_bold);

    placeholders.resolve(&with_italic)
}

/// Side table of rendered spans keyed by dense index.
#[derive(Default)]
struct Placeholders {
    rendered: Vec<String>,
}

impl Placeholders {
    /// Store rendered HTML and return the token standing in for it.
    fn push(&mut self, html: String) -> String {
        let index = self.rendered.len();
        self.rendered.push(html);
        format!("{TOKEN_OPEN}{index}{TOKEN_CLOSE}")
    }

    /// Text of `text` with every token replaced by its entry stripped of markup.
    fn plain_text(&self, text: &str) -> String {
        TOKEN
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.rendered.get(i))
                    .map(|html| MARKUP.replace_all(html, "").into_owned())
                    .unwrap_or_default()
            })
            .into_owned()
    }

    /// Substitute every token in `text`.
    ///
    /// An entry can only contain tokens pushed before it, so entries are
    /// resolved in index order and each is substituted exactly once.
    fn resolve(self, text: &str) -> String {
        let mut resolved: Vec<String> = Vec::with_capacity(self.rendered.len());
        for html in self.rendered {
            let expanded = substitute(&html, &resolved);
            resolved.push(expanded);
        }
        substitute(text, &resolved)
    }
}

fn substitute(text: &str, resolved: &[String]) -> String {
    TOKEN
        .replace_all(text, |caps: &Captures| {
            match caps[1].parse::<usize>().ok().and_then(|i| resolved.get(i)) {
                Some(html) => html.clone(),
                None => {
                    tracing::trace!(token = &caps[1], "Dropping unresolved placeholder");
                    String::new()
                }
            }
        })
        .into_owned()
}

fn has_token(text: &str) -> bool {
    text.contains(TOKEN_OPEN)
}

/// `*text*` not touching a word character or another `*` on either side.
fn replace_italic(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    let mut search = 0;

    while let Some(caps) = ITALIC.captures_at(text, search) {
        let Some(whole) = caps.get(0) else { break };

        let before = text[..whole.start()].chars().next_back();
        let after = text[whole.end()..].chars().next();

        if is_emphasis_boundary(before) && is_emphasis_boundary(after) {
            result.push_str(&text[last..whole.start()]);
            result.push_str("<em>");
            result.push_str(&caps[1]);
            result.push_str("</em>");
            last = whole.end();
            search = whole.end();
        } else {
            // Opening '*' is one byte; retry from the next character.
            search = whole.start() + 1;
        }
    }

    result.push_str(&text[last..]);
    result
}

fn is_emphasis_boundary(c: Option<char>) -> bool {
    !matches!(c, Some(c) if c == '*' || c == '_' || c.is_ascii_alphanumeric())
}

/// Render a media embed. `src` must be sanitized; `alt` is the escaped label
/// without placeholder tokens.
fn render_media(kind: MediaKind, src: &str, alt: &str, options: &Options) -> Option<String> {
    let src = escape_html(src);
    match kind {
        MediaKind::Image => Some(format!(r#"<img src="{src}" alt="{alt}" />"#)),
        MediaKind::Video => Some(format!(r#"<video src="{src}" controls></video>"#)),
        MediaKind::Pdf => Some(format!(
            r#"<object data="{src}" type="application/pdf"><a href="{src}"{} rel="noreferrer">{}</a></object>"#,
            target_attr(options),
            escape_html(&options.pdf_link_label),
        )),
        MediaKind::None => None,
    }
}

fn render_anchor(href: &str, label: &str, options: &Options) -> String {
    format!(
        r#"<a href="{}"{} rel="noreferrer">{}</a>"#,
        escape_html(href),
        target_attr(options),
        label
    )
}

fn target_attr(options: &Options) -> &'static str {
    if options.open_links_in_new_tab {
        r#" target="_blank""#
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_escaped() {
        assert_eq!(parse_inline("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(parse_inline("**bold**"), "<strong>bold</strong>");
        assert_eq!(parse_inline("*italic*"), "<em>italic</em>");
        assert_eq!(
            parse_inline("**bold** and *italic*"),
            "<strong>bold</strong> and <em>italic</em>"
        );
    }

    #[test]
    fn test_italic_word_boundaries() {
        assert_eq!(parse_inline("a*b*c"), "a*b*c");
        assert_eq!(parse_inline("snake_*case*"), "snake_*case*");
        assert_eq!(parse_inline("(*aside*)"), "(<em>aside</em>)");
        assert_eq!(parse_inline("*a*b"), "*a*b");
    }

    #[test]
    fn test_italic_does_not_span_lines() {
        assert_eq!(parse_inline("*one\ntwo*"), "*one\ntwo*");
    }

    #[test]
    fn test_code_span_protects_content() {
        assert_eq!(parse_inline("`**not bold**`"), "<code>**not bold**</code>");
        assert_eq!(parse_inline("`<b>`"), "<code>&lt;b&gt;</code>");
        assert_eq!(
            parse_inline("`[x](https://example.com/)`"),
            "<code>[x](https://example.com/)</code>"
        );
    }

    #[test]
    fn test_image() {
        assert_eq!(
            parse_inline("![pic](photo.png)"),
            r#"<img src="photo.png" alt="pic" />"#
        );
    }

    #[test]
    fn test_image_unsafe_url_stays_literal() {
        assert_eq!(parse_inline("![pic](javascript:x)"), "![pic](javascript:x)");
    }

    #[test]
    fn test_image_syntax_for_non_media_stays_literal() {
        assert_eq!(
            parse_inline("![doc](https://example.com/page)"),
            "![doc](https://example.com/page)"
        );
    }

    #[test]
    fn test_video_and_pdf() {
        assert_eq!(
            parse_inline("![clip](/media/clip.mp4)"),
            r#"<video src="/media/clip.mp4" controls></video>"#
        );
        assert_eq!(
            parse_inline("![report](files/report.pdf)"),
            r#"<object data="files/report.pdf" type="application/pdf"><a href="files/report.pdf" target="_blank" rel="noreferrer">Open PDF</a></object>"#
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            parse_inline("[site](https://example.com/docs)"),
            r#"<a href="https://example.com/docs" target="_blank" rel="noreferrer">site</a>"#
        );
    }

    #[test]
    fn test_link_unsafe_url() {
        assert_eq!(
            parse_inline("[click](javascript:alert)"),
            r##"<a href="#" target="_blank" rel="noreferrer">click</a>"##
        );
    }

    #[test]
    fn test_link_to_media_renders_embed() {
        assert_eq!(
            parse_inline("[pic](https://cdn.example.com/a.png)"),
            r#"<img src="https://cdn.example.com/a.png" alt="pic" />"#
        );
    }

    #[test]
    fn test_link_label_is_literal() {
        assert_eq!(
            parse_inline("[**x**](/a)"),
            r#"<a href="/a" target="_blank" rel="noreferrer">**x**</a>"#
        );
    }

    #[test]
    fn test_link_url_query_is_escaped_once() {
        assert_eq!(
            parse_inline("[q](/search?a=1&b=2)"),
            r#"<a href="/search?a=1&amp;b=2" target="_blank" rel="noreferrer">q</a>"#
        );
    }

    #[test]
    fn test_emphasis_skips_urls() {
        assert_eq!(
            parse_inline("*see* [x](/a*b*c)"),
            r#"<em>see</em> <a href="/a*b*c" target="_blank" rel="noreferrer">x</a>"#
        );
    }

    #[test]
    fn test_same_tab_option() {
        let options = Options {
            open_links_in_new_tab: false,
            ..Default::default()
        };
        assert_eq!(
            parse_inline_with("[a](/b)", &options),
            r#"<a href="/b" rel="noreferrer">a</a>"#
        );
    }

    #[test]
    fn test_sentinels_in_input_never_reach_output() {
        assert_eq!(parse_inline("a\u{E000}0\u{E001}b"), "a0b");
    }

    #[test]
    fn test_unknown_placeholder_resolves_empty() {
        let placeholders = Placeholders::default();
        assert_eq!(placeholders.resolve("x\u{E000}7\u{E001}y"), "xy");
    }

    #[test]
    fn test_code_span_text_kept_in_alt() {
        assert_eq!(
            parse_inline("![run `make` first](steps.png)"),
            r#"<img src="steps.png" alt="run make first" />"#
        );
        assert_eq!(
            parse_inline("[`a<b`](diagram.png)"),
            r#"<img src="diagram.png" alt="a&lt;b" />"#
        );
    }

    #[test]
    fn test_data_uri_with_media_suffix_is_not_embedded() {
        let pdf = "data:text/html,%3Cscript%3Ealert%281%29%3C%2Fscript%3E.pdf";
        let png = "data:text/html,%3Cscript%3Ealert%281%29%3C%2Fscript%3Ex.png";

        for url in [pdf, png] {
            let image = parse_inline(&format!("![x]({url})"));
            assert_eq!(image, format!("![x]({url})"));
            assert!(!image.contains("<object") && !image.contains("<img"));

            let link = parse_inline(&format!("[x]({url})"));
            assert_eq!(link, r##"<a href="#" target="_blank" rel="noreferrer">x</a>"##);
        }
    }

    #[test]
    fn test_data_uri_image() {
        assert_eq!(
            parse_inline("![dot](data:image/png;base64,AAAA)"),
            r#"<img src="data:image/png;base64,AAAA" alt="dot" />"#
        );
    }

    #[test]
    fn test_nested_placeholders() {
        assert_eq!(
            parse_inline("[`code`](/a)"),
            r#"<a href="/a" target="_blank" rel="noreferrer"><code>code</code></a>"#
        );
    }
}
