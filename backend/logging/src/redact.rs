//! Log Redaction
//!
//! Scrubs bearer tokens, OAuth access tokens and API keys from free-form text
//! (error chains, response bodies) before it is logged.

use regex::Regex;
use std::sync::LazyLock;

static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[A-Za-z0-9\-\._~+/]+=*").unwrap());
static OAUTH_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ya29\.[A-Za-z0-9\-_\.]+").unwrap());
static QUERY_SECRET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(key|access_token)=[^&\s]+").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BEARER_RE.replace_all(input, "Bearer [REDACTED_TOKEN]");
    let redacted = OAUTH_TOKEN_RE.replace_all(&redacted, "[REDACTED_TOKEN]");
    QUERY_SECRET_RE
        .replace_all(&redacted, "$1=[REDACTED]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_bearer_header() {
        let clean = redact_sensitive_data("sent Authorization: Bearer abc.def-ghi_jkl");
        assert!(!clean.contains("abc.def-ghi_jkl"));
        assert!(clean.contains("Bearer [REDACTED_TOKEN]"));
    }

    #[test]
    fn redacts_bare_oauth_token() {
        let clean = redact_sensitive_data("token ya29.a0AfH6SMC-xyz_123 rejected");
        assert_eq!(clean, "token [REDACTED_TOKEN] rejected");
    }

    #[test]
    fn redacts_query_string_secrets() {
        let clean = redact_sensitive_data(
            "error sending request for url (https://vision.googleapis.com/v1/images:annotate?key=AIzaSyExample&alt=json)",
        );
        assert!(!clean.contains("AIzaSyExample"));
        assert!(clean.contains("key=[REDACTED]&alt=json"));
    }

    #[test]
    fn leaves_plain_text_alone() {
        let raw = "connection refused (os error 111)";
        assert_eq!(redact_sensitive_data(raw), raw);
    }
}
