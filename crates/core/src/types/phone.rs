//! Brazilian phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input contains no digits at all.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input has fewer digits than a BR number with area code.
    #[error("phone number must have at least {min} digits, found {found}")]
    TooShort {
        /// Minimum digit count (area code + subscriber number).
        min: usize,
        /// Digits actually present.
        found: usize,
    },
}

/// A customer phone number.
///
/// Validation only checks the digit count (area code plus an 8 or 9 digit
/// subscriber number); the text the customer typed is kept verbatim for
/// display, with digits extracted on demand for API calls.
///
/// ## Examples
///
/// ```
/// use forneria_core::Phone;
///
/// let phone = Phone::parse("(11) 91234-5678").unwrap();
/// assert_eq!(phone.digits(), "11912345678");
/// assert_eq!(phone.as_str(), "(11) 91234-5678");
///
/// assert!(Phone::parse("912345").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Minimum digits for a valid number (2-digit area code + 8 digits).
    pub const MIN_DIGITS: usize = 10;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits or fewer than ten.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digit_count = s.chars().filter(char::is_ascii_digit).count();

        if digit_count == 0 {
            return Err(PhoneError::Empty);
        }

        if digit_count < Self::MIN_DIGITS {
            return Err(PhoneError::TooShort {
                min: Self::MIN_DIGITS,
                found: digit_count,
            });
        }

        Ok(Self(s.trim().to_owned()))
    }

    /// The number exactly as the customer typed it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Only the digits, for API payloads and lookups.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Phone {
    type Error = PhoneError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}
