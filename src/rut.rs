//! Normalization and checksum validation for Chilean tax identifiers (RUT).
//!
//! A RUT is written `body-checkDigit`, e.g. `76.660.180-4`. Storage and
//! lookups always use the normalized form: digits with leading zeros
//! stripped, a single dash, and an uppercase check character.

/// Normalize a raw RUT into `body-DV` form.
///
/// Dots, dashes, spaces and non-breaking spaces are stripped and the result
/// uppercased before splitting off the final character as the check digit.
/// Returns `None` when fewer than two characters remain. A numeric body is
/// reparsed so leading zeros do not produce distinct identities.
pub fn normalize(raw: &str) -> Option<String> {
    let clean: String = raw
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | ' ' | '\u{00A0}'))
        .collect::<String>()
        .to_uppercase();

    if clean.len() < 2 {
        return None;
    }

    let (body, check) = clean.split_at(clean.len() - 1);
    match body.parse::<u64>() {
        Ok(number) => Some(format!("{}-{}", number, check)),
        Err(_) => Some(format!("{}-{}", body, check)),
    }
}

/// Validate a RUT check digit using the modulo-11 algorithm.
///
/// Body digits are weighted right-to-left with the cycle 2,3,4,5,6,7,2,…;
/// `remainder = 11 - (sum % 11)` maps to '0' (11), 'K' (10) or the decimal
/// digit otherwise. Bodies made of one repeated digit (11111111, 22222222,
/// …) are placeholder values and always rejected.
pub fn validate(raw: &str) -> bool {
    let normalized = match normalize(raw) {
        Some(value) => value,
        None => return false,
    };

    let (body, check) = match normalized.split_once('-') {
        Some(parts) => parts,
        None => return false,
    };

    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let mut chars = body.chars();
    let first = chars.next();
    if body.len() > 1 && chars.all(|c| Some(c) == first) {
        return false;
    }

    let mut sum: u32 = 0;
    let mut factor: u32 = 2;
    for digit in body.chars().rev() {
        sum += digit.to_digit(10).unwrap_or(0) * factor;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }

    let expected = match 11 - (sum % 11) {
        11 => "0".to_string(),
        10 => "K".to_string(),
        remainder => remainder.to_string(),
    };

    expected == check
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_punctuation_and_case() {
        assert_eq!(normalize("76.660.180-4").as_deref(), Some("76660180-4"));
        assert_eq!(normalize(" 9.306.689-k ").as_deref(), Some("9306689-K"));
    }

    #[test]
    fn normalization_strips_leading_zeros() {
        assert_eq!(normalize("076660180-4").as_deref(), Some("76660180-4"));
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["76.660.180-4", "9306689-K", "00012345-5"] {
            let once = normalize(raw).expect("first pass");
            let twice = normalize(&once).expect("second pass");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn too_short_input_does_not_normalize() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("5"), None);
        assert_eq!(normalize(".-"), None);
    }

    #[test]
    fn accepts_known_valid_ruts() {
        assert!(validate("76660180-4"));
        assert!(validate("76.660.180-4"));
        assert!(validate("76660180-4".to_lowercase().as_str()));
    }

    #[test]
    fn rejects_repeated_digit_placeholders() {
        assert!(!validate("11111111-1"));
        assert!(!validate("22.222.222-2"));
    }

    #[test]
    fn rejects_non_numeric_body() {
        assert!(!validate("ABCDEF-5"));
    }

    #[test]
    fn check_digit_k_is_case_insensitive() {
        // 10000013 carries check digit K
        assert!(validate("10000013-k"));
        assert!(validate("10.000.013-K"));
    }

    #[test]
    fn wrong_check_digit_is_rejected() {
        assert!(!validate("76660180-5"));
        assert!(!validate("76660180-K"));
    }
}
