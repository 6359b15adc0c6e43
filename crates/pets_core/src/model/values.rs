//! Insert/update payloads.
//!
//! # Responsibility
//! - Carry a loosely typed column -> value bag, the way UI forms hand values
//!   to the provider.
//! - Coerce values to the column type before they reach SQL.
//! - Validate payloads for insert and update.
//!
//! # Invariants
//! - Only the four writable columns can be set; `_id` is never writable.
//! - Validation runs before any statement is prepared.

use crate::model::pet::{Gender, Pet};
use rusqlite::types::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Writable column of the `Pets` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PetField {
    Name,
    Breed,
    Gender,
    Weight,
}

impl PetField {
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Breed => "breed",
            Self::Gender => "gender",
            Self::Weight => "weight",
        }
    }

    fn is_integer(self) -> bool {
        matches!(self, Self::Gender | Self::Weight)
    }
}

/// Payload validation failure. Display text is the user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetValidationError {
    NameRequired,
    WeightNegative(i64),
    WeightNotInteger,
    GenderInvalid,
}

impl Display for PetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "name required"),
            Self::WeightNegative(value) => {
                write!(f, "weight cannot be negative (got {value})")
            }
            Self::WeightNotInteger => write!(f, "weight must be a whole number"),
            Self::GenderInvalid => {
                write!(f, "gender must be 0 (unknown), 1 (male) or 2 (female)")
            }
        }
    }
}

impl Error for PetValidationError {}

/// Column values for an insert or update.
///
/// Setting a field to [`Value::Null`] is different from leaving it out: a
/// present null is validated (and rejected for `name`), an absent field is
/// left to the column default on insert and untouched on update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetValues {
    entries: BTreeMap<PetField, Value>,
}

impl PetValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with(PetField::Name, Value::Text(name.into()))
    }

    pub fn with_breed(self, breed: impl Into<String>) -> Self {
        self.with(PetField::Breed, Value::Text(breed.into()))
    }

    pub fn with_gender(self, gender: Gender) -> Self {
        self.with(PetField::Gender, gender.code())
    }

    pub fn with_weight(self, weight: i64) -> Self {
        self.with(PetField::Weight, weight)
    }

    pub fn with(mut self, field: PetField, value: impl Into<Value>) -> Self {
        self.put(field, value);
        self
    }

    /// Sets a raw value, replacing any previous one.
    pub fn put(&mut self, field: PetField, value: impl Into<Value>) {
        self.entries.insert(field, value.into());
    }

    pub fn put_null(&mut self, field: PetField) {
        self.entries.insert(field, Value::Null);
    }

    pub fn remove(&mut self, field: PetField) -> Option<Value> {
        self.entries.remove(&field)
    }

    pub fn contains(&self, field: PetField) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn get(&self, field: PetField) -> Option<&Value> {
        self.entries.get(&field)
    }

    /// Text view of a field. `None` when absent or null.
    pub fn get_as_string(&self, field: PetField) -> Option<String> {
        self.get(field).and_then(value_as_string)
    }

    /// Integer view of a field. `None` when absent, null or not integral.
    pub fn get_as_integer(&self, field: PetField) -> Option<i64> {
        self.get(field).and_then(value_as_integer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks an insert payload.
    ///
    /// Order: name present and non-null, weight (when present and non-null)
    /// integral and >= 0, gender (when present and non-null) a known code.
    /// A present null weight or gender is left to the column constraints.
    pub fn validate_for_insert(&self) -> Result<(), PetValidationError> {
        if self.get_as_string(PetField::Name).is_none() {
            return Err(PetValidationError::NameRequired);
        }

        if let Some(value) = self.get(PetField::Weight) {
            if !matches!(value, Value::Null) {
                check_weight(value)?;
            }
        }

        if let Some(value) = self.get(PetField::Gender) {
            if !matches!(value, Value::Null) {
                check_gender(value)?;
            }
        }

        Ok(())
    }

    /// Checks an update payload. Only fields that are present are checked,
    /// and a present null is rejected for name, weight and gender.
    pub fn validate_for_update(&self) -> Result<(), PetValidationError> {
        if self.contains(PetField::Name) && self.get_as_string(PetField::Name).is_none() {
            return Err(PetValidationError::NameRequired);
        }

        if let Some(value) = self.get(PetField::Weight) {
            check_weight(value)?;
        }

        if let Some(value) = self.get(PetField::Gender) {
            check_gender(value)?;
        }

        Ok(())
    }

    /// Column/value pairs with values coerced to the column type.
    ///
    /// Integer columns receive [`Value::Integer`] when the raw value parses;
    /// text columns receive [`Value::Text`] for numeric input.
    pub(crate) fn bindings(&self) -> Vec<(&'static str, Value)> {
        self.entries
            .iter()
            .map(|(field, value)| (field.column_name(), coerce(*field, value)))
            .collect()
    }
}

impl From<&Pet> for PetValues {
    /// Every writable column of `pet`; the id is not carried.
    fn from(pet: &Pet) -> Self {
        let mut values = PetValues::new()
            .with_name(pet.name.as_str())
            .with_gender(pet.gender)
            .with_weight(pet.weight);
        match &pet.breed {
            Some(breed) => values.put(PetField::Breed, breed.clone()),
            None => values.put_null(PetField::Breed),
        }
        values
    }
}

fn check_weight(value: &Value) -> Result<(), PetValidationError> {
    match value_as_integer(value) {
        Some(weight) if weight < 0 => Err(PetValidationError::WeightNegative(weight)),
        Some(_) => Ok(()),
        None => Err(PetValidationError::WeightNotInteger),
    }
}

fn check_gender(value: &Value) -> Result<(), PetValidationError> {
    match value_as_integer(value) {
        Some(code) if Gender::is_valid(code) => Ok(()),
        _ => Err(PetValidationError::GenderInvalid),
    }
}

fn coerce(field: PetField, value: &Value) -> Value {
    if field.is_integer() {
        return value_as_integer(value).map_or_else(|| value.clone(), Value::Integer);
    }
    match value {
        Value::Integer(_) | Value::Real(_) => {
            value_as_string(value).map_or_else(|| value.clone(), Value::Text)
        }
        _ => value.clone(),
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Blob(_) => None,
        Value::Integer(number) => Some(number.to_string()),
        Value::Real(number) => Some(number.to_string()),
        Value::Text(text) => Some(text.clone()),
    }
}

fn value_as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(number) => Some(*number),
        // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
        Value::Real(number)
            if number.fract() == 0.0
                && *number >= i64::MIN as f64
                && *number < i64::MAX as f64 =>
        {
            Some(*number as i64)
        }
        Value::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}
