//! Pet record and gender.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes.
//! - `weight` is never negative.
//! - `gender` only takes the three stored codes `0`, `1`, `2`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned row id.
pub type PetId = i64;

/// Stored code for [`Gender::Unknown`].
pub const GENDER_UNKNOWN: i64 = 0;
/// Stored code for [`Gender::Male`].
pub const GENDER_MALE: i64 = 1;
/// Stored code for [`Gender::Female`].
pub const GENDER_FEMALE: i64 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Integer code written to the `gender` column.
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => GENDER_UNKNOWN,
            Self::Male => GENDER_MALE,
            Self::Female => GENDER_FEMALE,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            GENDER_UNKNOWN => Some(Self::Unknown),
            GENDER_MALE => Some(Self::Male),
            GENDER_FEMALE => Some(Self::Female),
            _ => None,
        }
    }

    pub fn is_valid(code: i64) -> bool {
        Self::from_code(code).is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGenderError(String);

impl Display for ParseGenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown gender `{}`; expected unknown|male|female",
            self.0
        )
    }
}

impl Error for ParseGenderError {}

impl FromStr for Gender {
    type Err = ParseGenderError;

    /// Accepts names (case-insensitive) or the stored integer codes.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "unknown" | "0" => Ok(Self::Unknown),
            "male" | "1" => Ok(Self::Male),
            "female" | "2" => Ok(Self::Female),
            _ => Err(ParseGenderError(value.trim().to_string())),
        }
    }
}

/// One row of the `Pets` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    /// `None` when the breed was never recorded.
    pub breed: Option<String>,
    pub gender: Gender,
    /// Whole kilograms.
    pub weight: i64,
}

impl Pet {
    /// Breed text for display, falling back to `"Unknown breed"`.
    pub fn breed_or_unknown(&self) -> &str {
        match self.breed.as_deref() {
            Some(breed) if !breed.trim().is_empty() => breed,
            _ => UNKNOWN_BREED,
        }
    }
}

/// Display text for a pet without a recorded breed.
pub const UNKNOWN_BREED: &str = "Unknown breed";

#[cfg(test)]
mod tests {
    use super::{Gender, Pet, UNKNOWN_BREED};

    #[test]
    fn gender_codes_roundtrip() {
        for gender in [Gender::Unknown, Gender::Male, Gender::Female] {
            assert_eq!(Gender::from_code(gender.code()), Some(gender));
        }
        assert!(!Gender::is_valid(3));
        assert!(!Gender::is_valid(-1));
    }

    #[test]
    fn gender_parses_names_and_codes() {
        assert_eq!(" Male ".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("2".parse::<Gender>().unwrap(), Gender::Female);
        let err = "cat".parse::<Gender>().unwrap_err();
        assert!(err.to_string().contains("cat"));
    }

    #[test]
    fn gender_serializes_as_snake_case() {
        let json = serde_json::to_string(&Gender::Female).unwrap();
        assert_eq!(json, "\"female\"");
    }

    #[test]
    fn blank_breed_renders_as_unknown() {
        let mut pet = Pet {
            id: 1,
            name: "Toto".to_string(),
            breed: None,
            gender: Gender::Male,
            weight: 7,
        };
        assert_eq!(pet.breed_or_unknown(), UNKNOWN_BREED);

        pet.breed = Some("  ".to_string());
        assert_eq!(pet.breed_or_unknown(), UNKNOWN_BREED);

        pet.breed = Some("Terrier".to_string());
        assert_eq!(pet.breed_or_unknown(), "Terrier");
    }
}
