//! Conversion options.

use crate::links::DEFAULT_ALLOWED_SCHEMES;
use crate::{Error, Result};

/// Options for [`Converter`](crate::Converter)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Schemes an absolute link or media URL may use
    pub allowed_schemes: Vec<String>,

    /// Text of the fallback anchor rendered inside PDF embeds
    pub pdf_link_label: String,

    /// Emit `target="_blank"` on rendered links
    pub open_links_in_new_tab: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            allowed_schemes: DEFAULT_ALLOWED_SCHEMES.iter().map(|s| s.to_string()).collect(),
            pdf_link_label: "Open PDF".to_string(),
            open_links_in_new_tab: true,
        }
    }
}

impl Options {
    /// Check the options and normalize scheme names to lower case.
    pub fn validate(mut self) -> Result<Self> {
        for scheme in &mut self.allowed_schemes {
            let trimmed = scheme.trim().trim_end_matches(':');
            if !is_valid_scheme(trimmed) {
                return Err(Error::InvalidOption(format!(
                    "invalid URL scheme {:?}",
                    scheme
                )));
            }
            *scheme = trimmed.to_ascii_lowercase();
        }

        if self
            .allowed_schemes
            .iter()
            .any(|s| matches!(s.as_str(), "javascript" | "vbscript" | "data"))
        {
            return Err(Error::InvalidOption(
                "script and data schemes cannot be allowed for links".to_string(),
            ));
        }

        if self.pdf_link_label.trim().is_empty() {
            return Err(Error::InvalidOption("PDF link label must not be empty".to_string()));
        }

        Ok(self)
    }
}

/// RFC 3986 scheme: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.allowed_schemes, vec!["http", "https", "mailto"]);
        assert_eq!(options.pdf_link_label, "Open PDF");
        assert!(options.open_links_in_new_tab);
    }

    #[test]
    fn test_validate_normalizes_schemes() {
        let options = Options {
            allowed_schemes: vec!["HTTPS:".to_string(), " ftp ".to_string()],
            ..Default::default()
        };
        let options = options.validate().unwrap();
        assert_eq!(options.allowed_schemes, vec!["https", "ftp"]);
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let options = Options {
            allowed_schemes: vec!["1http".to_string()],
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(Error::InvalidOption(_))));
    }

    #[test]
    fn test_validate_rejects_script_scheme() {
        let options = Options {
            allowed_schemes: vec!["JavaScript".to_string()],
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_pdf_label() {
        let options = Options {
            pdf_link_label: "  ".to_string(),
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }
}
