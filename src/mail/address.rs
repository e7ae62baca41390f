//! Recipient extraction from free text

use regex::Regex;
use std::sync::LazyLock;

/// Local part, "@", dotted domain, and a top-level label of at least two letters.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("email pattern is valid")
});

/// Return the first email address in `text`, verbatim.
///
/// Syntactic match only; deliverability is never checked.
pub fn extract_address(text: &str) -> Option<&str> {
    EMAIL_RE.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_address_from_sentence() {
        assert_eq!(
            extract_address("Please follow up with jane.doe@example.com about the invoice."),
            Some("jane.doe@example.com")
        );
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            extract_address("cc bob@corp.io and then alice@corp.io, not carol@x.org"),
            Some("bob@corp.io")
        );
    }

    #[test]
    fn test_no_address() {
        assert_eq!(extract_address(""), None);
        assert_eq!(extract_address("email jane about the invoice"), None);
        assert_eq!(extract_address("reach me at jane@localhost"), None);
        assert_eq!(extract_address("tld too short: jane@example.c"), None);
        assert_eq!(extract_address("just an @ sign"), None);
    }

    #[test]
    fn test_plus_and_percent_local_parts() {
        assert_eq!(
            extract_address("<first.last+billing@sub.example.co.uk>"),
            Some("first.last+billing@sub.example.co.uk")
        );
        assert_eq!(extract_address("x%y@host.net!"), Some("x%y@host.net"));
    }

    #[test]
    fn test_case_preserved() {
        assert_eq!(
            extract_address("Write to Jane.Doe@Example.COM today"),
            Some("Jane.Doe@Example.COM")
        );
    }
}
