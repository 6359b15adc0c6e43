//! Pets store core: schema bootstrap, content provider and screen use-cases.
//! UI layers talk to this crate only through the provider contract.

pub mod db;
pub mod logging;
pub mod model;
pub mod provider;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, PetStore, StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::pet::{Gender, Pet, PetId, UNKNOWN_BREED};
pub use model::values::{PetField, PetValidationError, PetValues};
pub use provider::contract::{CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE};
pub use provider::{
    ChangeObserver, ObserverHandle, PetColumn, PetCursor, PetProvider, PetRepository,
    PetResource, PetRow, PetUri, ProviderError, ProviderResult, Selection,
};
pub use service::pet_service::{PetEditState, PetForm, PetService, PetSummary, SaveOutcome};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
