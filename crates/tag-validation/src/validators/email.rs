//! Email format validator

use regex::Regex;
use std::sync::OnceLock;

// Structural check only; not a full RFC 5322 parser
fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9]([a-zA-Z0-9._%+-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$",
        )
        .expect("email pattern compiles")
    })
}

/// Validate email format
pub fn is_email(email: &str) -> bool {
    if email.is_empty() || email.len() > 254 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.len() > 64 || domain.contains('@') {
        return false;
    }

    if local.contains("..") || domain.contains("..") {
        return false;
    }

    email_regex().is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_email("pastikan93@gmail.com"));
        assert!(is_email("user.name+tag@example.co.uk"));
        assert!(is_email("asdjf@gmail.com"));
        assert!(is_email("a@b.io"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_email("error"));
        assert!(!is_email("pastikansalah"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("user@"));
        assert!(!is_email("user@@example.com"));
        assert!(!is_email("user..name@example.com"));
        assert!(!is_email("user@example"));
        assert!(!is_email("user name@example.com"));
        assert!(!is_email(""));
    }

    #[test]
    fn test_length_limits() {
        let long_local = format!("{}@example.com", "a".repeat(65));
        assert!(!is_email(&long_local));
    }
}
