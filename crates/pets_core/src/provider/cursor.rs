//! Row sequence returned by pet queries.

use crate::model::pet::{Gender, Pet, PetId};
use crate::provider::contract::{PetColumn, PetUri};
use crate::provider::{ProviderError, ProviderResult};
use rusqlite::types::Value;

/// One result row, holding only the projected columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PetRow {
    values: Vec<(PetColumn, Value)>,
}

impl PetRow {
    pub(crate) fn new(values: Vec<(PetColumn, Value)>) -> Self {
        Self { values }
    }

    /// Raw value of a projected column.
    pub fn get(&self, column: PetColumn) -> Option<&Value> {
        self.values
            .iter()
            .find(|(projected, _)| *projected == column)
            .map(|(_, value)| value)
    }

    pub fn id(&self) -> Option<PetId> {
        self.integer(PetColumn::Id)
    }

    pub fn name(&self) -> Option<&str> {
        self.text(PetColumn::Name)
    }

    pub fn breed(&self) -> Option<&str> {
        self.text(PetColumn::Breed)
    }

    pub fn gender(&self) -> Option<Gender> {
        self.integer(PetColumn::Gender).and_then(Gender::from_code)
    }

    pub fn weight(&self) -> Option<i64> {
        self.integer(PetColumn::Weight)
    }

    /// Converts a full-projection row into a [`Pet`].
    ///
    /// # Errors
    /// - [`ProviderError::InvalidData`] when a column is missing from the
    ///   projection or holds a value the schema does not allow.
    pub fn to_pet(&self) -> ProviderResult<Pet> {
        let id = self.id().ok_or_else(|| missing(PetColumn::Id))?;
        let name = self.name().ok_or_else(|| missing(PetColumn::Name))?;
        let gender_code = self
            .integer(PetColumn::Gender)
            .ok_or_else(|| missing(PetColumn::Gender))?;
        let gender = Gender::from_code(gender_code).ok_or_else(|| {
            ProviderError::InvalidData(format!(
                "invalid gender `{gender_code}` in Pets.gender for _id {id}"
            ))
        })?;
        let weight = self.weight().ok_or_else(|| missing(PetColumn::Weight))?;
        if weight < 0 {
            return Err(ProviderError::InvalidData(format!(
                "negative weight `{weight}` in Pets.weight for _id {id}"
            )));
        }

        let breed = match self.get(PetColumn::Breed) {
            Some(Value::Null) => None,
            Some(Value::Text(breed)) => Some(breed.clone()),
            Some(_) => {
                return Err(ProviderError::InvalidData(format!(
                    "non-text value in Pets.breed for _id {id}"
                )))
            }
            None => return Err(missing(PetColumn::Breed)),
        };

        Ok(Pet {
            id,
            name: name.to_string(),
            breed,
            gender,
            weight,
        })
    }

    fn integer(&self, column: PetColumn) -> Option<i64> {
        match self.get(column)? {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    fn text(&self, column: PetColumn) -> Option<&str> {
        match self.get(column)? {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

fn missing(column: PetColumn) -> ProviderError {
    ProviderError::InvalidData(format!(
        "column `{}` missing or null in result row",
        column.name()
    ))
}

/// Finite, single-pass sequence of query rows.
///
/// Rows are read before `query` returns, so iterating never holds the
/// connection and later mutations do not show up in an existing cursor.
///
/// Remembers the identifier the query ran against so a caller can register
/// for changes to exactly the data it is showing.
#[derive(Debug)]
pub struct PetCursor {
    uri: PetUri,
    columns: Vec<PetColumn>,
    rows: std::vec::IntoIter<PetRow>,
}

impl PetCursor {
    pub(crate) fn new(uri: PetUri, columns: Vec<PetColumn>, rows: Vec<PetRow>) -> Self {
        Self {
            uri,
            columns,
            rows: rows.into_iter(),
        }
    }

    /// Identifier whose changes invalidate this cursor.
    pub fn notification_uri(&self) -> &PetUri {
        &self.uri
    }

    pub fn columns(&self) -> &[PetColumn] {
        &self.columns
    }

    /// Rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Drains the cursor into [`Pet`] records.
    pub fn into_pets(self) -> ProviderResult<Vec<Pet>> {
        self.map(|row| row.to_pet()).collect()
    }
}

impl Iterator for PetCursor {
    type Item = PetRow;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for PetCursor {}
