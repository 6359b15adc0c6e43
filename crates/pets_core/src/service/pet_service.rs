//! Editor and catalog use-cases over a [`PetRepository`].
//!
//! # Responsibility
//! - Turn raw editor form input into insert/update payloads.
//! - Provide list/detail/delete entry points for UI callers.
//!
//! # Invariants
//! - Service APIs never bypass provider validation.
//! - A new pet with an entirely blank form is never written.
//! - Names are trimmed and must be non-empty before reaching the provider.

use crate::model::pet::{Gender, Pet, PetId, UNKNOWN_BREED};
use crate::model::values::{PetField, PetValidationError, PetValues};
use crate::provider::{PetColumn, PetRepository, PetUri, ProviderError, ProviderResult};

const LIST_SORT_ORDER: &str = "_id ASC";

/// Raw editor input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetForm {
    pub name: String,
    pub breed: String,
    /// Whole number text; empty means 0.
    pub weight: String,
    pub gender: Gender,
}

impl PetForm {
    /// Form pre-filled from a stored pet.
    pub fn from_pet(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            breed: pet.breed.clone().unwrap_or_default(),
            weight: pet.weight.to_string(),
            gender: pet.gender,
        }
    }

    /// True when nothing was entered and gender is still unknown.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.breed.trim().is_empty()
            && self.weight.trim().is_empty()
            && self.gender == Gender::Unknown
    }

    /// Converts the form into a full payload.
    ///
    /// # Errors
    /// - [`PetValidationError::NameRequired`] for a blank name.
    /// - [`PetValidationError::WeightNotInteger`] for non-numeric weight text.
    pub fn to_values(&self) -> Result<PetValues, PetValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PetValidationError::NameRequired);
        }

        let weight_text = self.weight.trim();
        let weight = if weight_text.is_empty() {
            0
        } else {
            weight_text
                .parse::<i64>()
                .map_err(|_| PetValidationError::WeightNotInteger)?
        };

        let mut values = PetValues::new()
            .with_name(name)
            .with_gender(self.gender)
            .with_weight(weight);
        let breed = self.breed.trim();
        if breed.is_empty() {
            values.put_null(PetField::Breed);
        } else {
            values.put(PetField::Breed, breed.to_string());
        }
        Ok(values)
    }
}

/// Result of [`PetService::save_pet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// New pet form was blank; nothing written.
    Skipped,
    Inserted(PetUri),
    /// The store rejected the new row.
    InsertFailed,
    /// Rows changed by an edit. Zero means the pet no longer exists.
    Updated(usize),
}

/// List item for the catalog screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetSummary {
    pub uri: PetUri,
    pub name: String,
    /// Breed, or `"Unknown breed"` when none was recorded.
    pub summary: String,
}

/// Editor screen state: which pet is open and whether input changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetEditState {
    current: Option<PetUri>,
    changed: bool,
}

impl PetEditState {
    /// State for adding a new pet.
    pub fn new_pet() -> Self {
        Self::default()
    }

    /// State for editing the pet at `uri`.
    pub fn editing(uri: PetUri) -> Self {
        Self {
            current: Some(uri),
            changed: false,
        }
    }

    pub fn current(&self) -> Option<&PetUri> {
        self.current.as_ref()
    }

    pub fn is_new(&self) -> bool {
        self.current.is_none()
    }

    /// Delete is only offered for a pet that already exists.
    pub fn allows_delete(&self) -> bool {
        !self.is_new()
    }

    /// Records that the user touched an input.
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Leaving now would discard input; the caller should confirm.
    pub fn has_unsaved_changes(&self) -> bool {
        self.changed
    }
}

/// Use-case wrapper for pet screens.
pub struct PetService<R: PetRepository> {
    repo: R,
}

impl<R: PetRepository> PetService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Saves editor input.
    ///
    /// # Contract
    /// - `current = None`: inserts a new pet unless the form is blank.
    /// - `current = Some(uri)`: replaces every field of that pet.
    pub fn save_pet(&self, current: Option<&PetUri>, form: &PetForm) -> ProviderResult<SaveOutcome> {
        match current {
            None => {
                if form.is_blank() {
                    return Ok(SaveOutcome::Skipped);
                }
                let values = form.to_values()?;
                Ok(match self.repo.insert(&PetUri::collection(), &values)? {
                    Some(uri) => SaveOutcome::Inserted(uri),
                    None => SaveOutcome::InsertFailed,
                })
            }
            Some(uri) => {
                let values = form.to_values()?;
                let changed = self.repo.update(uri, &values, None)?;
                Ok(SaveOutcome::Updated(changed))
            }
        }
    }

    /// Loads one pet for the editor. `None` when it no longer exists.
    pub fn load_pet(&self, uri: &PetUri) -> ProviderResult<Option<Pet>> {
        if uri.parse_id().is_none() {
            return Err(ProviderError::InvalidResource(uri.clone()));
        }
        let mut cursor = self.repo.query(uri, None, None, None)?;
        cursor.next().map(|row| row.to_pet()).transpose()
    }

    /// Every pet, oldest first.
    pub fn list_pets(&self) -> ProviderResult<Vec<Pet>> {
        self.repo
            .query(&PetUri::collection(), None, None, Some(LIST_SORT_ORDER))?
            .into_pets()
    }

    /// Catalog rows: name plus breed summary.
    pub fn list_summaries(&self) -> ProviderResult<Vec<PetSummary>> {
        let projection = [PetColumn::Id, PetColumn::Name, PetColumn::Breed];
        let cursor = self.repo.query(
            &PetUri::collection(),
            Some(&projection[..]),
            None,
            Some(LIST_SORT_ORDER),
        )?;

        cursor
            .map(|row| -> ProviderResult<PetSummary> {
                let id: PetId = row.id().ok_or_else(|| {
                    ProviderError::InvalidData("pet row without _id".to_string())
                })?;
                let summary = match row.breed() {
                    Some(breed) if !breed.trim().is_empty() => breed.to_string(),
                    _ => UNKNOWN_BREED.to_string(),
                };
                Ok(PetSummary {
                    uri: PetUri::item(id),
                    name: row.name().unwrap_or_default().to_string(),
                    summary,
                })
            })
            .collect()
    }

    /// Deletes the pet at an item identifier.
    pub fn delete_pet(&self, uri: &PetUri) -> ProviderResult<usize> {
        self.repo.delete(uri, None)
    }

    /// Deletes every pet.
    pub fn delete_all_pets(&self) -> ProviderResult<usize> {
        self.repo.delete(&PetUri::collection(), None)
    }
}
