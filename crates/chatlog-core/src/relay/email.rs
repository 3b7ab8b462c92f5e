//! Best-effort email detection in user messages.

use std::sync::LazyLock;

use regex::Regex;

// `[A-Z|a-z]` also admits a literal `|`; kept for parity with the widget
// prompt's pattern. Word boundaries are ASCII-only so an address glued to
// non-ASCII text (`邮箱是jo@example.com`) is still found.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}(?-u:\b)")
        .expect("email pattern is valid")
});

/// First email-looking substring of `text`.
pub fn find_email(text: &str) -> Option<&str> {
    EMAIL_PATTERN.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_email_inside_sentence() {
        assert_eq!(
            find_email("sure, it's jane.doe+chat@example.co.uk thanks"),
            Some("jane.doe+chat@example.co.uk")
        );
    }

    #[test]
    fn takes_first_match() {
        assert_eq!(find_email("a@b.com or c@d.org"), Some("a@b.com"));
    }

    #[test]
    fn finds_email_after_non_ascii_text() {
        assert_eq!(find_email("émail:éjo@example.com"), Some("jo@example.com"));
        assert_eq!(find_email("我的邮箱是jo@example.com"), Some("jo@example.com"));
        assert_eq!(find_email("jo@example.com谢谢"), Some("jo@example.com"));
    }

    #[test]
    fn rejects_non_emails() {
        assert_eq!(find_email("hello there"), None);
        assert_eq!(find_email("user@localhost"), None);
        assert_eq!(find_email("@example.com"), None);
    }
}
