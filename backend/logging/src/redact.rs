//! Log redaction.
//!
//! Scrubs API keys and bearer tokens from strings prior to logging.

use once_cell::sync::Lazy;
use regex::Regex;

static API_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(sk-[a-zA-Z0-9]{20,})|(tvly-[a-zA-Z0-9\-]{16,})|(AIza[a-zA-Z0-9\-_]{30,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)",
    )
    .unwrap()
});

static PASSWORD_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"("password"\s*:\s*)"[^"]*""#).unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    PASSWORD_FIELD_RE
        .replace_all(&redacted, r#"$1"[REDACTED]""#)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_api_keys_and_bearer_tokens() {
        let raw = "calling with sk-abcdefghijklmnopqrstuv and Bearer eyJhbGciOiJIUzI1NiJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("sk-abcdefghijklmnopqrstuv"));
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiJ9"));
        assert!(clean.contains("[REDACTED_TOKEN]"));
    }

    #[test]
    fn redacts_password_json_fields() {
        let raw = r#"{"user":"neo4j","password":"hunter2"}"#;
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("hunter2"));
        assert!(clean.contains(r#""password":"[REDACTED]""#));
    }

    #[test]
    fn leaves_plain_text_alone() {
        let raw = "future trends and disruption";
        assert_eq!(redact_sensitive_data(raw), raw);
    }
}
