//! URL safety checks and media classification for link targets.

use url::{ParseError, Url};

/// Schemes allowed in rendered links unless configured otherwise.
pub const DEFAULT_ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Target used whenever a URL is rejected.
pub const UNSAFE_URL: &str = "#";

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "avif", "ico",
];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "ogv", "mov", "m4v"];
const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// What a link target points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Pdf,
    None,
}

impl MediaKind {
    /// Check if the target should be embedded rather than linked
    pub fn is_media(self) -> bool {
        self != MediaKind::None
    }
}

/// Sanitize a link target against the default scheme allow-list.
///
/// ```rust
/// use markbridge::sanitize_link_url;
///
/// assert_eq!(sanitize_link_url("javascript:alert(1)"), "#");
/// assert_eq!(sanitize_link_url("/internal/path"), "/internal/path");
/// assert_eq!(sanitize_link_url("https://example.com"), "https://example.com/");
/// ```
pub fn sanitize_link_url(raw: &str) -> String {
    sanitize_link_url_with(raw, DEFAULT_ALLOWED_SCHEMES)
}

/// Sanitize a link target against a custom scheme allow-list.
///
/// Same-document (`#...`) and relative references pass through unchanged.
/// Absolute URLs are returned in canonical form when their scheme is allowed
/// and replaced by `#` otherwise.
pub fn sanitize_link_url_with<S: AsRef<str>>(raw: &str, allowed_schemes: &[S]) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return UNSAFE_URL.to_string();
    }
    if trimmed.starts_with('/') || trimmed.starts_with('#') {
        return trimmed.to_string();
    }

    match Url::parse(trimmed) {
        Ok(url) => {
            let scheme = url.scheme();
            if allowed_schemes
                .iter()
                .any(|s| s.as_ref().eq_ignore_ascii_case(scheme))
            {
                url.to_string()
            } else {
                tracing::debug!(url = %trimmed, scheme, "Rejected URL with disallowed scheme");
                UNSAFE_URL.to_string()
            }
        }
        // No scheme at all: a path relative to the current document.
        Err(ParseError::RelativeUrlWithoutBase) => trimmed.to_string(),
        Err(err) => {
            tracing::debug!(url = %trimmed, error = %err, "Rejected malformed URL");
            UNSAFE_URL.to_string()
        }
    }
}

/// Sanitize a media source.
///
/// Behaves like [`sanitize_link_url_with`], but additionally accepts `data:`
/// URIs whose MIME prefix is a recognized media type.
pub fn sanitize_media_url<S: AsRef<str>>(raw: &str, allowed_schemes: &[S]) -> String {
    let trimmed = raw.trim();
    if trimmed
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("data:"))
    {
        return if data_uri_kind(&trimmed.to_lowercase()).is_media() {
            trimmed.to_string()
        } else {
            tracing::debug!("Rejected data URI without a media type");
            UNSAFE_URL.to_string()
        };
    }
    sanitize_link_url_with(trimmed, allowed_schemes)
}

/// Classify a URL as image, video, PDF or plain link.
///
/// Query string and fragment are ignored; matching is case-insensitive.
/// `data:` URIs are classified by their MIME type only.
pub fn classify_media(url: &str) -> MediaKind {
    let lower = url.trim().to_lowercase();
    if lower.starts_with("data:") {
        return data_uri_kind(&lower);
    }
    let path = match lower.find(['?', '#']) {
        Some(pos) => &lower[..pos],
        None => lower.as_str(),
    };

    [
        (MediaKind::Image, IMAGE_EXTENSIONS),
        (MediaKind::Video, VIDEO_EXTENSIONS),
        (MediaKind::Pdf, PDF_EXTENSIONS),
    ]
    .into_iter()
    .find(|(_, extensions)| has_extension(path, extensions))
    .map(|(kind, _)| kind)
    .unwrap_or(MediaKind::None)
}

/// Media kind of a lower-cased `data:` URI, from its MIME prefix alone
fn data_uri_kind(lower: &str) -> MediaKind {
    if lower.starts_with("data:image/") {
        MediaKind::Image
    } else if lower.starts_with("data:video/") {
        MediaKind::Video
    } else if lower.starts_with("data:application/pdf") {
        MediaKind::Pdf
    } else {
        MediaKind::None
    }
}

fn has_extension(path: &str, extensions: &[&str]) -> bool {
    let Some((stem, ext)) = path.rsplit_once('.') else {
        return false;
    };
    !stem.is_empty() && !ext.contains('/') && extensions.contains(&ext)
}
