use std::collections::HashMap;
use std::sync::Mutex;

use super::{ConfigStore, Scope, StoreError, StoreValue};

/// In-memory [`ConfigStore`] backed by nested maps.
///
/// Lookups are case-insensitive on both path and value name, matching the
/// registry's behavior.
#[derive(Debug, Default)]
pub struct MemoryStore {
    keys: Mutex<HashMap<(Scope, String), HashMap<String, StoreValue>>>,
}

fn norm(s: &str) -> String {
    s.to_ascii_lowercase()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty path without writing any value
    pub fn create_path(&self, scope: Scope, path: &str) {
        self.keys
            .lock()
            .unwrap()
            .entry((scope, norm(path)))
            .or_default();
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, scope: Scope, path: &str, name: &str) -> Result<Option<StoreValue>, StoreError> {
        let keys = self.keys.lock().unwrap();
        Ok(keys
            .get(&(scope, norm(path)))
            .and_then(|values| values.get(&norm(name)))
            .cloned())
    }

    fn set(
        &self,
        scope: Scope,
        path: &str,
        name: &str,
        value: &StoreValue,
    ) -> Result<(), StoreError> {
        let mut keys = self.keys.lock().unwrap();
        keys.entry((scope, norm(path)))
            .or_default()
            .insert(norm(name), value.clone());
        Ok(())
    }

    fn delete_value(&self, scope: Scope, path: &str, name: &str) -> Result<(), StoreError> {
        let mut keys = self.keys.lock().unwrap();
        if let Some(values) = keys.get_mut(&(scope, norm(path))) {
            values.remove(&norm(name));
        }
        Ok(())
    }

    fn path_exists(&self, scope: Scope, path: &str) -> Result<bool, StoreError> {
        let keys = self.keys.lock().unwrap();
        Ok(keys.contains_key(&(scope, norm(path))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_roundtrip() {
        let store = MemoryStore::new();
        store
            .set(
                Scope::Machine,
                "Software\\Test",
                "Value",
                &StoreValue::Dword(7),
            )
            .unwrap();

        let got = store.get(Scope::Machine, "Software\\Test", "Value").unwrap();
        assert_eq!(got, Some(StoreValue::Dword(7)));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let store = MemoryStore::new();
        store
            .set(
                Scope::CurrentUser,
                "Software\\Test",
                "Value",
                &StoreValue::Text("on".into()),
            )
            .unwrap();

        let got = store
            .get(Scope::CurrentUser, "SOFTWARE\\TEST", "value")
            .unwrap();
        assert_eq!(got, Some(StoreValue::Text("on".into())));
        assert!(store
            .path_exists(Scope::CurrentUser, "software\\test")
            .unwrap());
    }

    #[test]
    fn test_scopes_are_isolated() {
        let store = MemoryStore::new();
        store
            .set(
                Scope::Machine,
                "Software\\Test",
                "Value",
                &StoreValue::Dword(1),
            )
            .unwrap();

        let got = store
            .get(Scope::CurrentUser, "Software\\Test", "Value")
            .unwrap();
        assert_eq!(got, None);
    }

    #[test]
    fn test_delete_value_is_idempotent() {
        let store = MemoryStore::new();
        store
            .set(
                Scope::Machine,
                "Software\\Test",
                "Value",
                &StoreValue::Dword(1),
            )
            .unwrap();

        store
            .delete_value(Scope::Machine, "Software\\Test", "Value")
            .unwrap();
        assert_eq!(
            store.get(Scope::Machine, "Software\\Test", "Value").unwrap(),
            None
        );

        // Deleting again, and deleting under a missing path, both succeed
        store
            .delete_value(Scope::Machine, "Software\\Test", "Value")
            .unwrap();
        store
            .delete_value(Scope::Machine, "Software\\Missing", "Value")
            .unwrap();
    }

    #[test]
    fn test_delete_keeps_path() {
        let store = MemoryStore::new();
        store
            .set(
                Scope::Machine,
                "Software\\Test",
                "Value",
                &StoreValue::Dword(1),
            )
            .unwrap();
        store
            .delete_value(Scope::Machine, "Software\\Test", "Value")
            .unwrap();

        assert!(store.path_exists(Scope::Machine, "Software\\Test").unwrap());
    }

    #[test]
    fn test_create_path_without_values() {
        let store = MemoryStore::new();
        assert!(!store.path_exists(Scope::Machine, "Software\\Empty").unwrap());

        store.create_path(Scope::Machine, "Software\\Empty");
        assert!(store.path_exists(Scope::Machine, "Software\\Empty").unwrap());
        assert_eq!(
            store.get(Scope::Machine, "Software\\Empty", "Value").unwrap(),
            None
        );
    }
}
