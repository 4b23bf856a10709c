//! Engineer's Line Reference codes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors returned by [`Elr::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElrError {
    /// The code was empty.
    #[error("ELR code must not be empty")]
    Empty,
    /// The code contained a character outside `A-Z`, `a-z`, `0-9`.
    #[error("ELR code {code:?} contains invalid character {character:?}")]
    InvalidCharacter {
        /// The rejected code as supplied by the caller.
        code: String,
        /// The first offending character.
        character: char,
    },
}

/// An Engineer's Line Reference: the opaque code identifying one railway
/// line.
///
/// Codes are ASCII alphanumeric and compared case-insensitively by storing
/// them uppercase. Ordering is lexicographic; the resolvers rely on it for
/// deterministic tie-breaking between equidistant lines.
///
/// # Examples
///
/// ```
/// use linref_core::Elr;
///
/// # fn main() -> Result<(), linref_core::ElrError> {
/// let elr = Elr::new("ftc")?;
/// assert_eq!(elr.as_str(), "FTC");
/// assert_eq!(elr, "FTC".parse()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Elr(String);

impl Elr {
    /// Validates and constructs an [`Elr`], normalising to uppercase.
    ///
    /// # Errors
    /// Returns [`ElrError::Empty`] for an empty code and
    /// [`ElrError::InvalidCharacter`] when the code contains anything other
    /// than ASCII letters and digits.
    pub fn new(code: &str) -> Result<Self, ElrError> {
        if code.is_empty() {
            return Err(ElrError::Empty);
        }
        if let Some(character) = code.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(ElrError::InvalidCharacter {
                code: code.to_owned(),
                character,
            });
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// The normalised (uppercase) code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Elr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Elr {
    type Err = ElrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("FTC")]
    #[case("xtd")]
    #[case("MLN1")]
    fn accepts_alphanumeric_codes(#[case] code: &str) {
        let elr = Elr::new(code).unwrap();
        assert_eq!(elr.as_str(), code.to_ascii_uppercase());
    }

    #[rstest]
    fn rejects_empty_code() {
        assert_eq!(Elr::new(""), Err(ElrError::Empty));
    }

    #[rstest]
    #[case("FT C", ' ')]
    #[case("FT-1", '-')]
    #[case("ÉLR", 'É')]
    fn rejects_invalid_characters(#[case] code: &str, #[case] character: char) {
        assert_eq!(
            Elr::new(code),
            Err(ElrError::InvalidCharacter {
                code: code.to_owned(),
                character,
            })
        );
    }

    #[rstest]
    fn comparison_is_case_insensitive_via_normalisation() {
        assert_eq!(Elr::new("ftc").unwrap(), Elr::new("FTC").unwrap());
    }

    #[rstest]
    fn orders_lexicographically() {
        assert!(Elr::new("AAA").unwrap() < Elr::new("BBB").unwrap());
    }
}
