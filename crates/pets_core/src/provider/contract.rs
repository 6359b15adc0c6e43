//! Identifier scheme, resource tags and column names for the pets provider.
//!
//! # Responsibility
//! - Build collection/item identifiers.
//! - Resolve an identifier to [`PetResource`] with a matcher built once.
//! - Expose the resource-type tags and column names.
//!
//! # Invariants
//! - Resolution is pure: the same text always resolves the same way.
//! - Item ids are non-negative decimal integers that fit in `i64`.

use crate::model::pet::PetId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Authority part of every pets identifier.
pub const CONTENT_AUTHORITY: &str = "com.example.android.pets";
/// Collection path under [`CONTENT_AUTHORITY`].
pub const PATH_PETS: &str = "Pets";
/// Optional scheme prefix accepted (and dropped) on parse.
pub const CONTENT_SCHEME: &str = "content://";

/// Backing table name.
pub const TABLE_NAME: &str = "Pets";

/// Tag returned by `resource_type` for the collection identifier.
pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/com.example.android.pets/Pets";
/// Tag returned by `resource_type` for item identifiers.
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/com.example.android.pets/Pets";

static PET_URI_MATCHER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{}/{}(?:/([0-9]+))?$",
        regex::escape(CONTENT_AUTHORITY),
        regex::escape(PATH_PETS)
    ))
    .expect("pets identifier pattern is a valid regex")
});

/// Result of resolving a [`PetUri`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PetResource {
    /// Every row of the pets table.
    Collection,
    /// One row, by id.
    Item(PetId),
}

impl PetResource {
    /// Canonical identifier for this resource.
    pub fn uri(self) -> PetUri {
        match self {
            Self::Collection => PetUri::collection(),
            Self::Item(id) => PetUri::item(id),
        }
    }
}

/// Column that may appear in a query projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PetColumn {
    Id,
    Name,
    Breed,
    Gender,
    Weight,
}

impl PetColumn {
    /// Full projection in table order.
    pub const ALL: [PetColumn; 5] = [
        Self::Id,
        Self::Name,
        Self::Breed,
        Self::Gender,
        Self::Weight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "_id",
            Self::Name => "name",
            Self::Breed => "breed",
            Self::Gender => "gender",
            Self::Weight => "weight",
        }
    }
}

/// Logical identifier for pets data.
///
/// Holds the text as given by the caller; nothing is validated until the
/// identifier is resolved. The `content://` prefix is dropped on
/// construction so both spellings compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetUri(String);

impl PetUri {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        match value.strip_prefix(CONTENT_SCHEME) {
            Some(rest) => Self(rest.to_string()),
            None => Self(value),
        }
    }

    /// `<authority>/<path>`, the collection identifier.
    pub fn collection() -> Self {
        Self(format!("{CONTENT_AUTHORITY}/{PATH_PETS}"))
    }

    /// `<authority>/<path>/<id>`.
    pub fn item(id: PetId) -> Self {
        Self::collection().with_appended_id(id)
    }

    /// Appends `/<id>` to this identifier.
    pub fn with_appended_id(&self, id: PetId) -> Self {
        Self(format!("{}/{id}", self.0.trim_end_matches('/')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the identifier shape.
    ///
    /// Returns `None` for anything other than the collection or an item.
    pub fn resolve(&self) -> Option<PetResource> {
        let captures = PET_URI_MATCHER.captures(&self.0)?;
        match captures.get(1) {
            None => Some(PetResource::Collection),
            Some(id) => id.as_str().parse::<PetId>().ok().map(PetResource::Item),
        }
    }

    /// Id of an item identifier.
    pub fn parse_id(&self) -> Option<PetId> {
        match self.resolve()? {
            PetResource::Item(id) => Some(id),
            PetResource::Collection => None,
        }
    }

    /// Canonical spelling when the identifier resolves, `None` otherwise.
    ///
    /// `.../Pets/007` and `.../Pets/7` share the canonical form.
    pub fn canonical(&self) -> Option<PetUri> {
        self.resolve().map(PetResource::uri)
    }

    /// Whether `other` lies strictly below this identifier.
    pub fn is_ancestor_of(&self, other: &PetUri) -> bool {
        let prefix = self.0.trim_end_matches('/');
        other
            .0
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.len() > 1 && rest.starts_with('/'))
    }
}

impl Display for PetUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{CONTENT_SCHEME}{}", self.0)
    }
}

impl From<&str> for PetUri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PetUri {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Resource-type tag for a resolved identifier.
pub fn resource_type_of(resource: PetResource) -> &'static str {
    match resource {
        PetResource::Collection => CONTENT_LIST_TYPE,
        PetResource::Item(_) => CONTENT_ITEM_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::{PetResource, PetUri, CONTENT_AUTHORITY};

    #[test]
    fn collection_and_item_resolve() {
        assert_eq!(
            PetUri::collection().resolve(),
            Some(PetResource::Collection)
        );
        assert_eq!(PetUri::item(3).resolve(), Some(PetResource::Item(3)));
        assert_eq!(
            PetUri::new("content://com.example.android.pets/Pets/42").resolve(),
            Some(PetResource::Item(42))
        );
    }

    #[test]
    fn malformed_shapes_do_not_resolve() {
        for text in [
            "",
            "com.example.android.pets",
            "com.example.android.pets/Pets/",
            "com.example.android.pets/Pets/abc",
            "com.example.android.pets/Pets/-1",
            "com.example.android.pets/Pets/1/2",
            "com.example.android.pets/pets",
            "com.example.android.pets/Dogs/1",
            "comXexampleXandroidXpets/Pets",
            "other.authority/Pets/1",
            "com.example.android.pets/Pets/99999999999999999999",
        ] {
            assert_eq!(PetUri::new(text).resolve(), None, "`{text}` should not resolve");
        }
    }

    #[test]
    fn scheme_prefix_is_optional() {
        assert_eq!(
            PetUri::new(format!("content://{CONTENT_AUTHORITY}/Pets")),
            PetUri::collection()
        );
        assert_eq!(
            PetUri::item(5).to_string(),
            "content://com.example.android.pets/Pets/5"
        );
    }

    #[test]
    fn padded_item_ids_share_the_canonical_form() {
        let padded = PetUri::new("content://com.example.android.pets/Pets/007");
        assert_ne!(padded, PetUri::item(7));
        assert_eq!(padded.canonical(), Some(PetUri::item(7)));
        assert_eq!(
            PetUri::new("com.example.android.pets/Pets").canonical(),
            Some(PetUri::collection())
        );
        assert_eq!(PetUri::new("other/Pets/7").canonical(), None);
    }

    #[test]
    fn parse_id_only_for_items() {
        assert_eq!(PetUri::item(8).parse_id(), Some(8));
        assert_eq!(PetUri::collection().parse_id(), None);
    }

    #[test]
    fn ancestor_check_requires_a_path_segment() {
        let collection = PetUri::collection();
        assert!(collection.is_ancestor_of(&PetUri::item(1)));
        assert!(!collection.is_ancestor_of(&collection));
        assert!(!collection.is_ancestor_of(&PetUri::new("com.example.android.pets/Petsy")));
        assert!(!PetUri::item(1).is_ancestor_of(&PetUri::item(12)));
    }
}
