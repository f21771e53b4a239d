//! Input normalization helpers
//!
//! Textual event fields are trimmed and HTML-escaped before storage so a
//! stored title or description can never smuggle markup back out to a
//! client.

/// Trim surrounding whitespace and escape HTML-significant characters.
pub fn sanitize(input: &str) -> String {
    escape_html(input.trim())
}

/// Trim only, for fields that must stay machine-parseable (e.g. price).
pub fn trim(input: &str) -> String {
    input.trim().to_string()
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

/// Identifiers coming off the wire must be purely alphanumeric before they
/// are used in a lookup. Rejects crafted ids outright.
pub fn is_alphanumeric(input: &str) -> bool {
    !input.is_empty() && input.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_escapes_markup() {
        assert_eq!(
            sanitize("  <script>alert('x')</script> "),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;&#x2F;script&gt;"
        );
    }

    #[test]
    fn test_sanitize_trims() {
        assert_eq!(sanitize("  Launch Party  "), "Launch Party");
    }

    #[test]
    fn test_is_alphanumeric() {
        assert!(is_alphanumeric("42"));
        assert!(is_alphanumeric("abc123"));
        assert!(!is_alphanumeric(""));
        assert!(!is_alphanumeric("1; DROP TABLE events"));
        assert!(!is_alphanumeric("1 OR 1=1"));
    }
}
