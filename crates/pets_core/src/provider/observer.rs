//! Change observers owned by the provider.
//!
//! # Responsibility
//! - Keep the list of observers registered against pets identifiers.
//! - Deliver change notifications synchronously on the mutating thread.
//!
//! # Invariants
//! - Delivery happens outside the registry lock, so an observer may register
//!   or unregister while being notified.
//! - An observer registered for descendants also hears about item changes
//!   under its identifier.

use crate::provider::contract::PetUri;
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Receiver of change notifications.
pub trait ChangeObserver: Send + Sync {
    fn on_change(&self, uri: &PetUri);
}

impl<F> ChangeObserver for F
where
    F: Fn(&PetUri) + Send + Sync,
{
    fn on_change(&self, uri: &PetUri) {
        self(uri)
    }
}

/// Token returned by registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

struct Registration {
    handle: ObserverHandle,
    uri: PetUri,
    notify_for_descendants: bool,
    observer: Arc<dyn ChangeObserver>,
}

impl Registration {
    fn wants(&self, changed: &PetUri) -> bool {
        self.uri == *changed || (self.notify_for_descendants && self.uri.is_ancestor_of(changed))
    }
}

#[derive(Default)]
struct RegistryState {
    next_handle: u64,
    registrations: Vec<Registration>,
}

/// Observer list keyed by identifier.
#[derive(Default)]
pub struct ObserverRegistry {
    state: Mutex<RegistryState>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        uri: PetUri,
        notify_for_descendants: bool,
        observer: Arc<dyn ChangeObserver>,
    ) -> ObserverHandle {
        let mut state = self.lock();
        state.next_handle += 1;
        let handle = ObserverHandle(state.next_handle);
        state.registrations.push(Registration {
            handle,
            uri,
            notify_for_descendants,
            observer,
        });
        handle
    }

    /// Returns `false` when the handle was not registered.
    pub fn unregister(&self, handle: ObserverHandle) -> bool {
        let mut state = self.lock();
        let before = state.registrations.len();
        state
            .registrations
            .retain(|registration| registration.handle != handle);
        state.registrations.len() != before
    }

    pub fn len(&self) -> usize {
        self.lock().registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notifies every observer interested in `uri`; returns how many were
    /// called.
    pub fn notify_change(&self, uri: &PetUri) -> usize {
        let targets: Vec<Arc<dyn ChangeObserver>> = self
            .lock()
            .registrations
            .iter()
            .filter(|registration| registration.wants(uri))
            .map(|registration| Arc::clone(&registration.observer))
            .collect();

        for observer in &targets {
            observer.on_change(uri);
        }

        debug!(
            "event=change_notify module=provider status=ok uri={} delivered={}",
            uri,
            targets.len()
        );
        targets.len()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::ObserverRegistry;
    use crate::provider::contract::PetUri;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&PetUri) + Send + Sync) {
        let count = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&count);
        (count, move |_: &PetUri| {
            observed.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn exact_registration_ignores_items_without_descendants() {
        let registry = ObserverRegistry::new();
        let (count, observer) = counter();
        registry.register(PetUri::collection(), false, Arc::new(observer));

        assert_eq!(registry.notify_change(&PetUri::item(1)), 0);
        assert_eq!(registry.notify_change(&PetUri::collection()), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn descendant_registration_hears_item_changes() {
        let registry = ObserverRegistry::new();
        let (count, observer) = counter();
        registry.register(PetUri::collection(), true, Arc::new(observer));

        registry.notify_change(&PetUri::item(4));
        registry.notify_change(&PetUri::collection());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn item_registration_ignores_other_items() {
        let registry = ObserverRegistry::new();
        let (count, observer) = counter();
        registry.register(PetUri::item(2), true, Arc::new(observer));

        registry.notify_change(&PetUri::item(3));
        registry.notify_change(&PetUri::collection());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unregister_stops_delivery() {
        let registry = ObserverRegistry::new();
        let (count, observer) = counter();
        let handle = registry.register(PetUri::collection(), true, Arc::new(observer));

        assert!(registry.unregister(handle));
        assert!(!registry.unregister(handle));
        assert!(registry.is_empty());

        registry.notify_change(&PetUri::collection());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn observer_can_unregister_itself_during_delivery() {
        let registry = Arc::new(ObserverRegistry::new());
        let inner = Arc::clone(&registry);
        let handle_slot = Arc::new(std::sync::Mutex::new(None));
        let slot = Arc::clone(&handle_slot);

        let handle = registry.register(
            PetUri::collection(),
            false,
            Arc::new(move |_: &PetUri| {
                if let Some(handle) = slot.lock().unwrap().take() {
                    inner.unregister(handle);
                }
            }),
        );
        *handle_slot.lock().unwrap() = Some(handle);

        assert_eq!(registry.notify_change(&PetUri::collection()), 1);
        assert!(registry.is_empty());
    }
}
