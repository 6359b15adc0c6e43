//! Pets content provider: identifier routing, validated CRUD and change
//! notification.
//!
//! # Responsibility
//! - Define the repository contract used by service and UI callers.
//! - Map identifiers to SQL against the single `Pets` table.
//! - Announce successful mutations to registered observers.
//!
//! # Invariants
//! - Identifier and payload errors are raised before any statement runs.
//! - Item identifiers always replace the caller's selection with the id.
//! - Observers are only notified after a write that changed at least one row.

use crate::db::DbError;
use crate::model::values::{PetValidationError, PetValues};
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod contract;
pub mod cursor;
pub mod observer;
mod pet_provider;

pub use contract::{PetColumn, PetResource, PetUri};
pub use cursor::{PetCursor, PetRow};
pub use observer::{ChangeObserver, ObserverHandle, ObserverRegistry};
pub use pet_provider::PetProvider;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug)]
pub enum ProviderError {
    /// Identifier is neither the collection nor an item.
    InvalidResource(PetUri),
    /// Operation is not defined for this identifier kind.
    UnsupportedOperation {
        operation: &'static str,
        uri: PetUri,
    },
    Validation(PetValidationError),
    /// Store could not be opened, read or written.
    Io(DbError),
    /// Stored row violates the pet invariants.
    InvalidData(String),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidResource(uri) => write!(f, "unknown pets identifier: {uri}"),
            Self::UnsupportedOperation { operation, uri } => {
                write!(f, "{operation} is not supported for {uri}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "storage failure: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted pet data: {message}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::InvalidResource(_)
            | Self::UnsupportedOperation { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<PetValidationError> for ProviderError {
    fn from(value: PetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for ProviderError {
    fn from(value: DbError) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for ProviderError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Io(DbError::Sqlite(value))
    }
}

/// SQL `WHERE` fragment with positional `?` arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub clause: String,
    pub args: Vec<Value>,
}

impl Selection {
    pub fn new(clause: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            clause: clause.into(),
            args,
        }
    }

    /// Selection without arguments.
    pub fn clause(clause: impl Into<String>) -> Self {
        Self::new(clause, Vec::new())
    }

    /// Exact match on the `_id` column.
    pub fn by_id(id: i64) -> Self {
        Self::new(
            format!("{} = ?", PetColumn::Id.name()),
            vec![Value::Integer(id)],
        )
    }
}

/// Data access contract for pets, as seen by UI and service callers.
pub trait PetRepository {
    /// Rows for `uri`. `projection = None` selects every column.
    fn query(
        &self,
        uri: &PetUri,
        projection: Option<&[PetColumn]>,
        selection: Option<&Selection>,
        sort_order: Option<&str>,
    ) -> ProviderResult<PetCursor>;

    /// Inserts one pet. `Ok(None)` means the store rejected the row.
    fn insert(&self, uri: &PetUri, values: &PetValues) -> ProviderResult<Option<PetUri>>;

    fn update(
        &self,
        uri: &PetUri,
        values: &PetValues,
        selection: Option<&Selection>,
    ) -> ProviderResult<usize>;

    fn delete(&self, uri: &PetUri, selection: Option<&Selection>) -> ProviderResult<usize>;

    /// Resource-type tag for `uri`.
    fn resource_type(&self, uri: &PetUri) -> ProviderResult<&'static str>;
}

impl<R: PetRepository + ?Sized> PetRepository for &R {
    fn query(
        &self,
        uri: &PetUri,
        projection: Option<&[PetColumn]>,
        selection: Option<&Selection>,
        sort_order: Option<&str>,
    ) -> ProviderResult<PetCursor> {
        (**self).query(uri, projection, selection, sort_order)
    }

    fn insert(&self, uri: &PetUri, values: &PetValues) -> ProviderResult<Option<PetUri>> {
        (**self).insert(uri, values)
    }

    fn update(
        &self,
        uri: &PetUri,
        values: &PetValues,
        selection: Option<&Selection>,
    ) -> ProviderResult<usize> {
        (**self).update(uri, values, selection)
    }

    fn delete(&self, uri: &PetUri, selection: Option<&Selection>) -> ProviderResult<usize> {
        (**self).delete(uri, selection)
    }

    fn resource_type(&self, uri: &PetUri) -> ProviderResult<&'static str> {
        (**self).resource_type(uri)
    }
}
