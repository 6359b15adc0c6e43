//! SQLite-backed pets provider.

use crate::db::{PetStore, StoreConfig};
use crate::model::values::PetValues;
use crate::provider::contract::{resource_type_of, PetColumn, PetResource, PetUri, TABLE_NAME};
use crate::provider::cursor::{PetCursor, PetRow};
use crate::provider::observer::{ChangeObserver, ObserverHandle, ObserverRegistry};
use crate::provider::{PetRepository, ProviderError, ProviderResult, Selection};
use log::{debug, error, info, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Row};
use std::sync::Arc;

/// Pets provider over one lazily opened connection.
///
/// The connection is shared by every call and opened on the first one.
/// Each call runs a single statement; no call spans a transaction.
pub struct PetProvider {
    store: PetStore,
    observers: ObserverRegistry,
}

impl PetProvider {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            store: PetStore::new(config),
            observers: ObserverRegistry::new(),
        }
    }

    /// Provider over a private in-memory database.
    pub fn in_memory() -> Self {
        Self::new(StoreConfig::in_memory())
    }

    pub fn store(&self) -> &PetStore {
        &self.store
    }

    /// Registers `observer` for changes at `uri`, and below it when
    /// `notify_for_descendants` is set. Resolvable identifiers are stored in
    /// canonical form.
    pub fn register_observer(
        &self,
        uri: &PetUri,
        notify_for_descendants: bool,
        observer: Arc<dyn ChangeObserver>,
    ) -> ObserverHandle {
        let uri = uri.canonical().unwrap_or_else(|| uri.clone());
        self.observers.register(uri, notify_for_descendants, observer)
    }

    pub fn unregister_observer(&self, handle: ObserverHandle) -> bool {
        self.observers.unregister(handle)
    }

    fn resolve(&self, uri: &PetUri, operation: &'static str) -> ProviderResult<PetResource> {
        uri.resolve().ok_or_else(|| {
            warn!(
                "event=pet_{operation} module=provider status=error error_code=invalid_resource uri={uri}"
            );
            ProviderError::InvalidResource(uri.clone())
        })
    }

    fn notify_change(&self, uri: &PetUri) {
        self.observers.notify_change(uri);
    }
}

impl PetRepository for PetProvider {
    fn query(
        &self,
        uri: &PetUri,
        projection: Option<&[PetColumn]>,
        selection: Option<&Selection>,
        sort_order: Option<&str>,
    ) -> ProviderResult<PetCursor> {
        let resource = self.resolve(uri, "query")?;
        let canonical = resource.uri();
        let selection = effective_selection(resource, selection);

        let columns = match projection {
            Some(columns) if !columns.is_empty() => columns.to_vec(),
            _ => PetColumn::ALL.to_vec(),
        };
        let column_list = columns
            .iter()
            .map(|column| column.name())
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("SELECT {column_list} FROM {TABLE_NAME}");
        let mut args: Vec<Value> = Vec::new();
        if let Some(selection) = selection {
            sql.push_str(&format!(" WHERE {}", selection.clause));
            args = selection.args;
        }
        if let Some(order) = sort_order.map(str::trim).filter(|order| !order.is_empty()) {
            sql.push_str(&format!(" ORDER BY {order}"));
        }

        let rows = {
            let conn = self.store.connection()?;
            let mut stmt = conn.prepare(&sql)?;
            let mapped = stmt.query_map(params_from_iter(args.iter()), |row| {
                read_row(row, &columns)
            })?;
            mapped.collect::<rusqlite::Result<Vec<_>>>()?
        };

        debug!(
            "event=pet_query module=provider status=ok uri={uri} rows={}",
            rows.len()
        );
        Ok(PetCursor::new(canonical, columns, rows))
    }

    fn insert(&self, uri: &PetUri, values: &PetValues) -> ProviderResult<Option<PetUri>> {
        let resource = self.resolve(uri, "insert")?;
        if let PetResource::Item(_) = resource {
            return Err(ProviderError::UnsupportedOperation {
                operation: "insert",
                uri: uri.clone(),
            });
        }
        let canonical = resource.uri();
        values.validate_for_insert()?;

        let bindings = values.bindings();
        let column_list = bindings
            .iter()
            .map(|(column, _)| *column)
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; bindings.len()].join(", ");
        let sql = format!("INSERT INTO {TABLE_NAME} ({column_list}) VALUES ({placeholders});");

        let inserted = {
            let conn = self.store.connection()?;
            conn.execute(&sql, params_from_iter(bindings.iter().map(|(_, value)| value)))
                .map(|_| conn.last_insert_rowid())
        };

        match inserted {
            Ok(id) => {
                info!("event=pet_insert module=provider status=ok id={id}");
                self.notify_change(&canonical);
                Ok(Some(canonical.with_appended_id(id)))
            }
            Err(err) => {
                error!(
                    "event=pet_insert module=provider status=error error_code=insert_rejected uri={uri} error={err}"
                );
                Ok(None)
            }
        }
    }

    fn update(
        &self,
        uri: &PetUri,
        values: &PetValues,
        selection: Option<&Selection>,
    ) -> ProviderResult<usize> {
        let resource = self.resolve(uri, "update")?;
        values.validate_for_update()?;

        if values.is_empty() {
            debug!("event=pet_update module=provider status=skipped reason=empty_values uri={uri}");
            return Ok(0);
        }

        let bindings = values.bindings();
        let assignments = bindings
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {TABLE_NAME} SET {assignments}");
        let mut args: Vec<Value> = bindings.into_iter().map(|(_, value)| value).collect();
        if let Some(selection) = effective_selection(resource, selection) {
            sql.push_str(&format!(" WHERE {}", selection.clause));
            args.extend(selection.args);
        }

        let changed = {
            let conn = self.store.connection()?;
            conn.execute(&sql, params_from_iter(args.iter()))?
        };

        info!("event=pet_update module=provider status=ok uri={uri} rows={changed}");
        if changed > 0 {
            self.notify_change(&resource.uri());
        }
        Ok(changed)
    }

    fn delete(&self, uri: &PetUri, selection: Option<&Selection>) -> ProviderResult<usize> {
        let resource = self.resolve(uri, "delete")?;

        let mut sql = format!("DELETE FROM {TABLE_NAME}");
        let mut args: Vec<Value> = Vec::new();
        if let Some(selection) = effective_selection(resource, selection) {
            sql.push_str(&format!(" WHERE {}", selection.clause));
            args = selection.args;
        }

        let deleted = {
            let conn = self.store.connection()?;
            conn.execute(&sql, params_from_iter(args.iter()))?
        };

        info!("event=pet_delete module=provider status=ok uri={uri} rows={deleted}");
        if deleted > 0 {
            self.notify_change(&resource.uri());
        }
        Ok(deleted)
    }

    fn resource_type(&self, uri: &PetUri) -> ProviderResult<&'static str> {
        self.resolve(uri, "resource_type").map(resource_type_of)
    }
}

/// Selection actually applied: the caller's for the collection, an exact
/// id match for items.
fn effective_selection(resource: PetResource, selection: Option<&Selection>) -> Option<Selection> {
    match resource {
        PetResource::Collection => selection.cloned(),
        PetResource::Item(id) => Some(Selection::by_id(id)),
    }
}

fn read_row(row: &Row<'_>, columns: &[PetColumn]) -> rusqlite::Result<PetRow> {
    let values = columns
        .iter()
        .enumerate()
        .map(|(index, column)| Ok((*column, row.get::<_, Value>(index)?)))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(PetRow::new(values))
}

#[cfg(test)]
mod tests {
    use super::effective_selection;
    use crate::provider::contract::PetResource;
    use crate::provider::Selection;
    use rusqlite::types::Value;

    #[test]
    fn item_selection_overrides_caller_selection() {
        let caller = Selection::new("name = ?", vec![Value::Text("Rex".to_string())]);
        let applied = effective_selection(PetResource::Item(9), Some(&caller)).unwrap();
        assert_eq!(applied, Selection::by_id(9));
    }

    #[test]
    fn collection_selection_passes_through() {
        let caller = Selection::clause("weight > 10");
        assert_eq!(
            effective_selection(PetResource::Collection, Some(&caller)),
            Some(caller)
        );
        assert_eq!(effective_selection(PetResource::Collection, None), None);
    }
}
