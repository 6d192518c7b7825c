//! Shape checks for contact fields. These mirror what the intake forms
//! warn about; records with odd-looking values are still accepted.

/// Loose email check: one `@`, a non-empty local part, and a domain with a
/// dot separating non-empty labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

/// Loose phone check: after stripping separators and one leading `+`, the
/// rest must be 7 to 15 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    let stripped: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '(' | ')' | '-' | '.'))
        .collect();
    let digits = stripped.strip_prefix('+').unwrap_or(&stripped);
    (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_emails() {
        assert!(is_valid_email("sarah.j@example.com"));
        assert!(is_valid_email("contact@pharmacorp.co.uk"));
    }

    #[test]
    fn rejects_shapeless_emails() {
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("sarah@nodot"));
        assert!(!is_valid_email("sarah@double..dot"));
        assert!(!is_valid_email("spaced out@example.com"));
    }

    #[test]
    fn accepts_formatted_phone_numbers() {
        assert!(is_valid_phone("(555) 123-4567"));
        assert!(is_valid_phone("+1 555.123.4567"));
        assert!(is_valid_phone("5551234"));
    }

    #[test]
    fn rejects_non_numbers() {
        assert!(!is_valid_phone("555-CALL-NOW"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone(""));
    }
}
