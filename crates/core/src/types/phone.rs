//! Phone number type.
//!
//! Phone numbers are the account identifier: login, registration and OTP
//! verification all key on them. The backend only accepts digits, and the
//! registration form submits numbers in international form (`62…`).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Indonesian country calling code.
pub const COUNTRY_CODE: &str = "62";

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input contains no digits.
    #[error("phone number cannot be empty")]
    Empty,
    /// Fewer digits than any valid number.
    #[error("phone number must have at least {min} digits")]
    TooShort {
        /// Minimum number of digits.
        min: usize,
    },
    /// More digits than E.164 allows.
    #[error("phone number must have at most {max} digits")]
    TooLong {
        /// Maximum number of digits.
        max: usize,
    },
}

/// Strip every non-digit character from `input`.
///
/// ```
/// use warung_core::phone::digits_only;
///
/// assert_eq!(digits_only("0812-3456 7890"), "081234567890");
/// assert_eq!(digits_only("+62 812 3456"), "628123456");
/// ```
#[must_use]
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// A phone number reduced to its digits.
///
/// ## Constraints
///
/// - 8-15 digits after stripping separators
///
/// ## Examples
///
/// ```
/// use warung_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("0812 3456 7890").unwrap();
/// assert_eq!(phone.as_str(), "081234567890");
/// assert_eq!(phone.to_international(), "6281234567890");
///
/// assert!(PhoneNumber::parse("").is_err());
/// assert!(PhoneNumber::parse("12345").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 8;

    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `PhoneNumber`, discarding separators such as spaces and dashes.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits, or too few or too many.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digits = digits_only(s);

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }
        if digits.len() < Self::MIN_DIGITS {
            return Err(PhoneError::TooShort {
                min: Self::MIN_DIGITS,
            });
        }
        if digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(digits))
    }

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its digits.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Registration form of the number.
    ///
    /// A leading `0` becomes `62`, numbers already starting with `62` are
    /// unchanged, and anything else gets `62` prepended.
    #[must_use]
    pub fn to_international(&self) -> String {
        if let Some(rest) = self.0.strip_prefix('0') {
            format!("{COUNTRY_CODE}{rest}")
        } else if self.0.starts_with(COUNTRY_CODE) {
            self.0.clone()
        } else {
            format!("{COUNTRY_CODE}{}", self.0)
        }
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_only_passthrough() {
        assert_eq!(digits_only("081234567890"), "081234567890");
    }

    #[test]
    fn test_digits_only_strips_separators() {
        assert_eq!(digits_only("(0812) 3456-7890"), "081234567890");
        assert_eq!(digits_only("abc"), "");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PhoneNumber::parse(" - "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            PhoneNumber::parse("0812"),
            Err(PhoneError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            PhoneNumber::parse("0812345678901234567"),
            Err(PhoneError::TooLong { .. })
        ));
    }

    #[test]
    fn test_international_from_leading_zero() {
        let phone = PhoneNumber::parse("081234567890").unwrap();
        assert_eq!(phone.to_international(), "6281234567890");
    }

    #[test]
    fn test_international_keeps_country_code() {
        let phone = PhoneNumber::parse("6281234567890").unwrap();
        assert_eq!(phone.to_international(), "6281234567890");
    }

    #[test]
    fn test_international_prepends_country_code() {
        let phone = PhoneNumber::parse("81234567890").unwrap();
        assert_eq!(phone.to_international(), "6281234567890");
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = PhoneNumber::parse("0812-3456-7890").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"081234567890\"");
    }
}
