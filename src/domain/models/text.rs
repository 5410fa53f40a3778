//! Normalization of user-supplied text.
//!
//! Everything typed by a user passes through one of these helpers before it
//! reaches a store query or a write: free text loses quoting and control
//! characters, names are lower-cased, phones are reduced to a `+`-prefixed
//! digit string, and birth dates are reshaped from `DD.MM.YYYY` to
//! `YYYY-MM-DD`.

use std::sync::LazyLock;

use regex::Regex;

static BIRTH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2})\.([0-9]{2})\.([0-9]{4})$").expect("valid regex"));

/// Strip characters that would break a store query or a spreadsheet cell:
/// double and single quotes, CR/LF, semicolons and backslashes.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '\n' | '\r' | ';' | '\\'))
        .collect()
}

/// Sanitize and lower-case a family or given name.
pub fn normalize_name(input: &str) -> String {
    sanitize(input).to_lowercase()
}

/// Normalize a phone number to `+<digits>`.
///
/// Everything but digits and `+` is dropped. A national number starting
/// with `8` becomes `+7…`; any other number without a leading `+` gains
/// one. Input without a single digit normalizes to the empty string.
pub fn normalize_phone(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return String::new();
    }
    if cleaned.starts_with('+') {
        return cleaned;
    }
    match cleaned.strip_prefix('8') {
        Some(rest) => format!("+7{rest}"),
        None => format!("+{cleaned}"),
    }
}

/// Strip a leading `@` from a Telegram handle.
pub fn normalize_handle(input: &str) -> String {
    input.trim_start_matches('@').to_string()
}

/// Parse a strict `DD.MM.YYYY` birth date into `YYYY-MM-DD`.
///
/// This is a pure reshaping of the digits: `31.02.2000` is accepted and
/// becomes `2000-02-31`.
pub fn parse_birth_date(input: &str) -> Option<String> {
    let caps = BIRTH_DATE.captures(input)?;
    Some(format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_strips_quotes_and_controls() {
        assert_eq!(sanitize("O'Brien \"Jr\";\\\r\n"), "OBrien Jr");
    }

    #[test]
    fn test_normalize_name_lowercases() {
        assert_eq!(normalize_name("Иванов'"), "иванов");
    }

    #[test]
    fn test_phone_eight_prefix_becomes_plus_seven() {
        assert_eq!(normalize_phone("89991234567"), "+79991234567");
        assert_eq!(normalize_phone("8 (999) 123-45-67"), "+79991234567");
    }

    #[test]
    fn test_phone_bare_national_gains_plus() {
        assert_eq!(normalize_phone("79991234567"), "+79991234567");
        assert_eq!(normalize_phone("380501234567"), "+380501234567");
    }

    #[test]
    fn test_phone_already_normalized_is_unchanged() {
        assert_eq!(normalize_phone("+79991234567"), "+79991234567");
    }

    #[test]
    fn test_phone_without_digits_is_empty() {
        assert_eq!(normalize_phone(""), "");
        assert_eq!(normalize_phone("abc"), "");
    }

    #[test]
    fn test_handle_drops_at_sign() {
        assert_eq!(normalize_handle("@ivan_i"), "ivan_i");
        assert_eq!(normalize_handle("ivan_i"), "ivan_i");
    }

    #[test]
    fn test_birth_date_is_reshaped_without_calendar_checks() {
        assert_eq!(parse_birth_date("01.02.1990").as_deref(), Some("1990-02-01"));
        assert_eq!(parse_birth_date("31.02.2000").as_deref(), Some("2000-02-31"));
    }

    #[test]
    fn test_birth_date_rejects_loose_formats() {
        assert_eq!(parse_birth_date("1.2.1990"), None);
        assert_eq!(parse_birth_date("01/02/1990"), None);
        assert_eq!(parse_birth_date("01.02.1990 "), None);
        assert_eq!(parse_birth_date("1990-02-01"), None);
    }

    proptest! {
        #[test]
        fn prop_normalize_phone_is_idempotent(raw in "[0-9 +()-]{0,16}") {
            let once = normalize_phone(&raw);
            prop_assert_eq!(normalize_phone(&once), once);
        }

        #[test]
        fn prop_normalized_phone_is_plus_digits(raw in "[0-9 ()-]{1,16}") {
            let phone = normalize_phone(&raw);
            prop_assert!(phone.is_empty() || phone.starts_with('+'));
            prop_assert!(phone.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }
}
