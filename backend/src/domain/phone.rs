//! Canonical client phone numbers.
//!
//! Phones arrive from the messaging channel (`15551234567`), from staff input
//! (`+1 (555) 123-4567`) and from booking forms. Storing one canonical form lets
//! cancellation and rescheduling match regardless of formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum number of digits accepted for a client phone.
pub const PHONE_MIN_DIGITS: usize = 8;
/// Maximum number of digits accepted (E.164 limit).
pub const PHONE_MAX_DIGITS: usize = 15;

/// Validation errors raised by [`ClientPhone::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhoneValidationError {
    #[error("client phone must not be empty")]
    Empty,
    #[error("client phone may only contain digits, spaces, dashes, dots, parentheses and a leading '+'")]
    InvalidCharacters,
    #[error("client phone must contain between {min} and {max} digits, got {digits}")]
    InvalidLength { min: usize, max: usize, digits: usize },
}

/// Client phone in canonical international form: `+` followed by digits.
///
/// Input may omit the `+`, as messaging channels deliver sender numbers
/// without it.
///
/// # Examples
/// ```
/// use salon_booking::domain::ClientPhone;
///
/// let phone = ClientPhone::parse("+1 (555) 123-4567").expect("valid phone");
/// assert_eq!(phone.as_str(), "+15551234567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientPhone(String);

impl ClientPhone {
    /// Normalise and validate a raw phone string.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, PhoneValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PhoneValidationError::Empty);
        }

        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let mut digits = String::with_capacity(rest.len());
        for ch in rest.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                ' ' | '-' | '.' | '(' | ')' => {}
                _ => return Err(PhoneValidationError::InvalidCharacters),
            }
        }

        if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len()) {
            return Err(PhoneValidationError::InvalidLength {
                min: PHONE_MIN_DIGITS,
                max: PHONE_MAX_DIGITS,
                digits: digits.len(),
            });
        }

        Ok(Self(format!("+{digits}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ClientPhone {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ClientPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ClientPhone {
    type Error = PhoneValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ClientPhone> for String {
    fn from(value: ClientPhone) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("+15551234567", "+15551234567")]
    #[case("+1 (555) 123-4567", "+15551234567")]
    #[case("  15551234567 ", "+15551234567")]
    #[case("44.20.7946.0958", "+442079460958")]
    fn normalises_formatting(#[case] raw: &str, #[case] expected: &str) {
        let phone = ClientPhone::parse(raw).expect("valid phone");
        assert_eq!(phone.as_str(), expected);
    }

    #[rstest]
    #[case("", PhoneValidationError::Empty)]
    #[case("   ", PhoneValidationError::Empty)]
    #[case("+1555abc4567", PhoneValidationError::InvalidCharacters)]
    #[case("1+5551234567", PhoneValidationError::InvalidCharacters)]
    #[case("12345", PhoneValidationError::InvalidLength { min: 8, max: 15, digits: 5 })]
    fn rejects_invalid_input(#[case] raw: &str, #[case] expected: PhoneValidationError) {
        assert_eq!(ClientPhone::parse(raw), Err(expected));
    }

    #[rstest]
    fn deserialises_through_normalisation() {
        let phone: ClientPhone =
            serde_json::from_value(serde_json::json!("+1 555 123 4567")).expect("valid phone");
        assert_eq!(phone.as_str(), "+15551234567");
    }
}
