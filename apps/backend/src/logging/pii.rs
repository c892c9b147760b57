//! Redaction for anything that ends up in a log line.
//!
//! Session tokens are long hex runs, so any hex or base64-looking run of 16+
//! characters is masked along with email addresses and JSON password values.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest body excerpt that is ever logged.
pub const PREVIEW_LIMIT: usize = 512;

const REDACTED_TOKEN: &str = "[REDACTED_TOKEN]";

// Literal patterns; covered by the tests below.
#[allow(clippy::unwrap_used)]
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap());

#[allow(clippy::unwrap_used)]
static PASSWORD_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)("password"\s*:\s*)"(?:[^"\\]|\\.)*""#).unwrap());

#[allow(clippy::unwrap_used)]
static OPAQUE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9+/]{16,}={0,2}").unwrap());

/// Mask emails (first character and domain kept), password values and opaque tokens.
pub fn redact(input: &str) -> String {
    let masked = PASSWORD_FIELD.replace_all(input, r#"$1"[REDACTED]""#);

    let masked = EMAIL.replace_all(&masked, |caps: &regex::Captures| {
        let address = &caps[0];
        match address.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) => format!("{first}***@{domain}"),
                None => format!("@{domain}"),
            },
            None => address.to_string(),
        }
    });

    OPAQUE_TOKEN
        .replace_all(&masked, REDACTED_TOKEN)
        .into_owned()
}

/// Redacted excerpt of a request or response body for diagnostics.
///
/// Binary bodies are summarized by length only.
pub fn body_preview(content_type: Option<&str>, body: &[u8]) -> String {
    if body.is_empty() {
        return String::new();
    }

    let textual = content_type.map_or(true, |ct| {
        ct.starts_with("text/") || ct.contains("json") || ct.contains("x-www-form-urlencoded")
    });
    if !textual {
        return format!("<{} bytes of {}>", body.len(), content_type.unwrap_or_default());
    }

    let cut = body.len().min(PREVIEW_LIMIT);
    let text = String::from_utf8_lossy(&body[..cut]);
    let mut preview = redact(&text);
    if body.len() > PREVIEW_LIMIT {
        preview.push_str("...");
    }
    preview
}

/// Display wrapper that redacts on format.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
