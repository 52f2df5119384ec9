//! Vehicle identification number key
//!
//! Every store and decoder operation is keyed by a [`Vin`], which can only be
//! obtained through [`Vin::normalize`]. The canonical form is upper case.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Number of characters in a VIN
pub const VIN_LENGTH: usize = 17;

/// Reasons a raw string cannot be used as a VIN
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VinFormatError {
    #[error("expected 17 characters, got {length}")]
    WrongLength { length: usize },

    #[error("character {character:?} at position {position} is not alphanumeric")]
    InvalidCharacter { character: char, position: usize },
}

/// A validated, upper-cased 17 character VIN
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vin(String);

impl Vin {
    /// Validate `raw` and fold it to the canonical upper-case form.
    ///
    /// Fails when `raw` is not exactly 17 characters long or contains
    /// anything outside `[A-Za-z0-9]`. No trimming is applied.
    pub fn normalize(raw: &str) -> Result<Self, VinFormatError> {
        let length = raw.chars().count();
        if length != VIN_LENGTH {
            return Err(VinFormatError::WrongLength { length });
        }

        if let Some((position, character)) = raw
            .chars()
            .enumerate()
            .find(|(_, c)| !c.is_ascii_alphanumeric())
        {
            return Err(VinFormatError::InvalidCharacter {
                character,
                position: position + 1,
            });
        }

        Ok(Self(raw.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Vin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Vin {
    type Err = VinFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl Serialize for Vin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_normalize_uppercases() {
        let vin = Vin::normalize("1xpwd40x1ed215307").unwrap();
        assert_eq!(vin.as_str(), "1XPWD40X1ED215307");
    }

    #[test]
    fn test_normalize_keeps_canonical_input() {
        let vin = Vin::normalize("19XZE4F96KE027095").unwrap();
        assert_eq!(vin.to_string(), "19XZE4F96KE027095");
    }

    #[rstest]
    #[case("", 0)]
    #[case("1XPWD40X1ED21530", 16)]
    #[case("1XPWD40X1ED2153077", 18)]
    #[case(" 1XPWD40X1ED215307", 18)]
    fn test_normalize_rejects_wrong_length(#[case] raw: &str, #[case] expected: usize) {
        assert_eq!(
            Vin::normalize(raw),
            Err(VinFormatError::WrongLength { length: expected })
        );
    }

    #[rstest]
    #[case("1XPWD40X1ED21530-", '-', 17)]
    #[case(" XPWD40X1ED215307", ' ', 1)]
    #[case("1XPWD40X1ÉD215307", 'É', 10)]
    #[case("1XPWD40X1ED2153_7", '_', 16)]
    fn test_normalize_rejects_non_alphanumeric(
        #[case] raw: &str,
        #[case] character: char,
        #[case] position: usize,
    ) {
        assert_eq!(
            Vin::normalize(raw),
            Err(VinFormatError::InvalidCharacter { character, position })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 17 characters but 18 bytes
        let raw = "1XPWD40X1ÉD215307";
        assert_eq!(raw.chars().count(), 17);
        assert!(matches!(
            Vin::normalize(raw),
            Err(VinFormatError::InvalidCharacter { character: 'É', .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(raw in "[A-Za-z0-9]{17}") {
            let once = Vin::normalize(&raw).unwrap();
            let twice = Vin::normalize(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_rejects_other_lengths(raw in "[A-Za-z0-9]{0,40}") {
            prop_assume!(raw.len() != VIN_LENGTH);
            prop_assert!(Vin::normalize(&raw).is_err());
        }
    }
}
