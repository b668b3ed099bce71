//! Phone number normalisation for message delivery.

pub const MIN_DIGITS: usize = 10;
pub const MAX_DIGITS: usize = 15;

/// Normalises a phone number to international digits without `+`.
///
/// Spaces, dashes, dots and parentheses are dropped. `+<cc>...` keeps its
/// country code and a leading `0` is replaced by `country_code`. Returns `None`
/// when anything other than digits remains or the result is not
/// [`MIN_DIGITS`]..=[`MAX_DIGITS`] long.
///
/// ```
/// use alumni_core::notification::normalize_phone;
///
/// assert_eq!(normalize_phone("0812-3456-7890", "62").as_deref(), Some("6281234567890"));
/// assert_eq!(normalize_phone("+62 812 3456 7890", "62").as_deref(), Some("6281234567890"));
/// assert_eq!(normalize_phone("12345", "62"), None);
/// ```
pub fn normalize_phone(raw: &str, country_code: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    let digits = match cleaned.strip_prefix('+') {
        Some(rest) => rest.to_string(),
        None => match cleaned.strip_prefix('0') {
            Some(rest) => format!("{country_code}{rest}"),
            None => cleaned,
        },
    };

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    (MIN_DIGITS..=MAX_DIGITS)
        .contains(&digits.len())
        .then_some(digits)
}
