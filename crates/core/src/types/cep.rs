//! CEP (Brazilian postal code) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Cep`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CepError {
    /// The input contains no digits at all.
    #[error("CEP cannot be empty")]
    Empty,
    /// The input does not contain exactly eight digits.
    #[error("CEP must have exactly {expected} digits, found {found}")]
    WrongLength {
        /// Required digit count.
        expected: usize,
        /// Digits actually present.
        found: usize,
    },
}

/// A Brazilian postal code (CEP).
///
/// Punctuation and spacing are stripped on parse; only the digit count is
/// validated. Whether the code exists is for the geocoder to decide.
///
/// ## Examples
///
/// ```
/// use forneria_core::Cep;
///
/// let cep = Cep::parse("01310-100").unwrap();
/// assert_eq!(cep.as_digits(), "01310100");
/// assert_eq!(cep.to_string(), "01310-100");
///
/// assert!(Cep::parse("0131").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cep(String);

impl Cep {
    /// Number of digits in a CEP.
    pub const LENGTH: usize = 8;

    /// Parse a `Cep` from a string, ignoring punctuation.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits, or any digit count other
    /// than eight.
    pub fn parse(s: &str) -> Result<Self, CepError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(CepError::Empty);
        }

        if digits.len() != Self::LENGTH {
            return Err(CepError::WrongLength {
                expected: Self::LENGTH,
                found: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// The eight digits without separator.
    #[must_use]
    pub fn as_digits(&self) -> &str {
        &self.0
    }

    /// Render with the conventional separator, e.g. "01310-100".
    #[must_use]
    pub fn formatted(&self) -> String {
        let (prefix, suffix) = self.0.split_at(5);
        format!("{prefix}-{suffix}")
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl std::str::FromStr for Cep {
    type Err = CepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_dash() {
        let cep = Cep::parse("01310-100").unwrap();
        assert_eq!(cep.as_digits(), "01310100");
    }

    #[test]
    fn test_parse_bare_digits() {
        assert!(Cep::parse("01310100").is_ok());
    }

    #[test]
    fn test_parse_with_surrounding_text() {
        let cep = Cep::parse("  13480-970 ").unwrap();
        assert_eq!(cep.as_digits(), "13480970");
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Cep::parse("0131"),
            Err(CepError::WrongLength {
                expected: 8,
                found: 4
            })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            Cep::parse("013101000"),
            Err(CepError::WrongLength { found: 9, .. })
        ));
    }

    #[test]
    fn test_parse_no_digits() {
        assert!(matches!(Cep::parse("rua augusta"), Err(CepError::Empty)));
        assert!(matches!(Cep::parse(""), Err(CepError::Empty)));
    }

    #[test]
    fn test_display_formats_with_dash() {
        let cep = Cep::parse("01310100").unwrap();
        assert_eq!(cep.to_string(), "01310-100");
    }

    #[test]
    fn test_serde_roundtrip() {
        let cep = Cep::parse("01310-100").unwrap();
        let json = serde_json::to_string(&cep).unwrap();
        assert_eq!(json, "\"01310100\"");
        let back: Cep = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cep);
    }
}
