//! Request payloads, their validation and the CSV upload parsers.
//!
//! Forms turn loosely typed client input into domain payloads. Validation
//! failures surface as per-form `*FormError` enums which the services map to
//! [`crate::services::ServiceError::Form`].

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

pub mod auth;
pub mod beat_plans;
pub mod collections;
pub mod customers;
pub mod locations;
pub mod orders;
pub mod price_list;
pub mod products;
pub mod routes;
pub mod telecalling;
pub mod uploads;
pub mod users;

/// Collapse runs of whitespace and drop control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitize each line while keeping paragraph breaks.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    let first = lines.iter().position(|line| !line.is_empty());
    let last = lines.iter().rposition(|line| !line.is_empty());

    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

/// Sanitized inline text, or `None` when nothing is left.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(sanitize_inline_text)
        .filter(|value| !value.is_empty())
}

pub(crate) fn optional_multiline(value: Option<&str>) -> Option<String> {
    value
        .map(sanitize_multiline_text)
        .filter(|value| !value.is_empty())
}

/// Byte length of the longest float literal at the start of `value`.
fn numeric_prefix_len(value: &str) -> usize {
    let bytes = value.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer = digits_from(end);
    end += integer;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if integer > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if integer == 0 && fraction == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = digits_from(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }
    end
}

/// Parse a free-form numeric cell by its leading number, so `"10 pcs"` is
/// `10`. Anything without one reads as zero.
pub(crate) fn parse_lenient(value: &str) -> f64 {
    let value = value.trim_start();
    value[..numeric_prefix_len(value)]
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .unwrap_or(0.0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    /// `None` for blank text, a lenient parse otherwise.
    fn into_number(self) -> Option<f64> {
        match self {
            NumberOrText::Number(number) => Some(number),
            NumberOrText::Text(text) if text.trim().is_empty() => None,
            NumberOrText::Text(text) => Some(parse_lenient(&text)),
        }
    }
}

/// Accept a JSON number or numeric string; null, blank or garbage read as `0`.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(value.and_then(NumberOrText::into_number).unwrap_or(0.0))
}

/// Like [`lenient_number`], but null and blank mean "not supplied".
pub(crate) fn lenient_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(value.and_then(NumberOrText::into_number))
}

/// Optional foreign key sent as a number, a numeric string or `""`.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrText::Number(number)) if number.fract() == 0.0 => Some(number as i32),
        Some(NumberOrText::Text(text)) => text.trim().parse::<i32>().ok(),
        _ => None,
    })
}

/// Mobile numbers are exactly ten ASCII digits.
pub(crate) fn is_mobile_number(value: &str) -> bool {
    value.len() == 10 && value.bytes().all(|byte| byte.is_ascii_digit())
}

pub(crate) fn validate_mobile(value: &str) -> Result<(), ValidationError> {
    if is_mobile_number(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("mobile_no")
            .with_message("mobile number must be 10 digits".into()))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Numbers {
        #[serde(default, deserialize_with = "lenient_number")]
        quantity: f64,
        #[serde(default, deserialize_with = "lenient_optional_number")]
        price: Option<f64>,
    }

    fn numbers(json: &str) -> Numbers {
        serde_json::from_str(json).expect("payload parses")
    }

    #[test]
    fn numbers_accept_strings_and_numbers() {
        let parsed = numbers(r#"{"quantity": "2.5", "price": 10}"#);
        assert_eq!(parsed.quantity, 2.5);
        assert_eq!(parsed.price, Some(10.0));
    }

    #[test]
    fn garbage_and_blank_quantity_read_as_zero() {
        assert_eq!(numbers(r#"{"quantity": "abc"}"#).quantity, 0.0);
        assert_eq!(numbers(r#"{"quantity": ""}"#).quantity, 0.0);
        assert_eq!(numbers(r#"{"quantity": null}"#).quantity, 0.0);
        assert_eq!(numbers("{}").quantity, 0.0);
    }

    #[test]
    fn leading_number_is_kept_when_text_follows() {
        assert_eq!(numbers(r#"{"quantity": "10 pcs"}"#).quantity, 10.0);
        assert_eq!(numbers(r#"{"price": "100.50abc"}"#).price, Some(100.5));
        assert_eq!(parse_lenient("  -2.5e2kg"), -250.0);
        assert_eq!(parse_lenient(".5"), 0.5);
        assert_eq!(parse_lenient("3e"), 3.0);
        assert_eq!(parse_lenient("-."), 0.0);
        assert_eq!(parse_lenient("1e999"), 0.0);
    }

    #[test]
    fn blank_optional_number_is_not_supplied() {
        assert_eq!(numbers(r#"{"price": ""}"#).price, None);
        assert_eq!(numbers(r#"{"price": null}"#).price, None);
        assert_eq!(numbers(r#"{"price": "x"}"#).price, Some(0.0));
        assert_eq!(numbers(r#"{"price": "-5"}"#).price, Some(-5.0));
    }

    #[test]
    fn inline_text_collapses_whitespace() {
        assert_eq!(sanitize_inline_text("  Acme \t Traders\u{7} "), "Acme Traders");
        assert_eq!(optional_text(Some("   ")), None);
    }

    #[test]
    fn multiline_text_trims_blank_edges() {
        assert_eq!(sanitize_multiline_text("\n  first \n\n second\n\n"), "first\n\nsecond");
    }

    #[test]
    fn mobile_numbers_need_ten_digits() {
        assert!(is_mobile_number("9876543210"));
        assert!(!is_mobile_number("98765"));
        assert!(!is_mobile_number("98765432ab"));
    }
}
