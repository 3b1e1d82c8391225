//! A2UI Data Model
//!
//! A path-addressed, in-memory store for the data a surface's components
//! bind against: a flat path map with exact dirty-path tracking,
//! subscriptions, and batching (see DESIGN.md for how this relates to the
//! nested-`Value` store it started from).

use std::collections::{BTreeMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use serde_json::{json, Value};

use super::message::{DataContent, DataValue};
use super::value::BoundValue;

/// One immediate child of a data-model path, as used for template-list expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub path: String,
    pub value: Value,
}

type Listener = Box<dyn Fn(&str, Option<&Value>) + Send + Sync>;

#[derive(Default)]
struct Inner {
    store: BTreeMap<String, Value>,
    dirty: HashSet<String>,
    subscribers: Vec<(u64, Listener)>,
    next_sub_id: u64,
    batch_touched: Option<Vec<String>>,
    revision: u64,
}

/// A cheaply cloneable handle onto a shared, path-addressed data store.
///
/// Clones share state: the host bridge hands out clones to any task that
/// needs to read or write the model, guarded by a mutex since writes can
/// originate from the transport's stream-reader task, the action-response
/// handler, and user-interaction callbacks concurrently.
#[derive(Clone)]
pub struct DataModel {
    inner: Arc<Mutex<Inner>>,
}

/// A handle returned by [`DataModel::subscribe`]. Disposing it removes the
/// listener; disposing more than once, or after the model has been dropped,
/// is a no-op.
pub struct Disposer {
    model: Weak<Mutex<Inner>>,
    id: u64,
    disposed: AtomicU64,
}

impl Disposer {
    pub fn dispose(&self) {
        if self.disposed.swap(1, Ordering::SeqCst) == 1 {
            return;
        }
        if let Some(inner) = self.model.upgrade() {
            if let Ok(mut guard) = inner.lock() {
                guard.subscribers.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn join(base: &str, key: &str) -> String {
    let base = normalize(base);
    let key = key.trim_start_matches('/');
    if base == "/" {
        format!("/{key}")
    } else {
        format!("{base}/{key}")
    }
}

/// Compose a (possibly relative) path beneath `context_path`, the rule
/// [`DataModel::resolve`] applies to a `BoundValue::path` — shared with the
/// renderer so template `dataBinding` strings and two-way binding paths
/// compose identically.
pub fn compose_path(path: &str, context_path: Option<&str>) -> String {
    if path.starts_with('/') {
        normalize(path)
    } else {
        match context_path {
            Some(ctx) => join(ctx, path),
            None => normalize(path),
        }
    }
}

fn prefix_for(path: &str) -> String {
    let n = normalize(path);
    if n == "/" {
        "/".to_string()
    } else {
        format!("{n}/")
    }
}

fn decode_value_map(entries: &[DataContent]) -> Value {
    let mut map = serde_json::Map::new();
    for e in entries {
        map.insert(e.key.clone(), decode_data_value(&e.value));
    }
    Value::Object(map)
}

fn decode_data_value(value: &DataValue) -> Value {
    match value {
        DataValue::ValueString(s) => Value::String(s.clone()),
        DataValue::ValueNumber(n) => json!(*n),
        DataValue::ValueBoolean(b) => Value::Bool(*b),
        DataValue::ValueMap(entries) => decode_value_map(entries),
        DataValue::ValueArray(items) => Value::Array(items.iter().map(decode_data_value).collect()),
    }
}

impl Default for DataModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DataModel {
    pub fn new() -> Self {
        DataModel {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Decode a `DataModelUpdate`'s contents and write them under `base_path`.
    ///
    /// Any path already marked dirty is left untouched (user writes win over
    /// a server push until the dirty flag is cleared). An `items` entry
    /// carrying a `valueMap` first clears every existing descendant of
    /// `<base_path>/items` so stale list rows do not linger after a
    /// server-driven list refresh.
    pub fn update(&self, base_path: &str, contents: &[DataContent]) {
        let base = normalize(base_path);
        for content in contents {
            self.apply_content(&base, content);
        }
    }

    fn apply_content(&self, base: &str, content: &DataContent) {
        let dest = join(base, &content.key);

        if content.key == "items" {
            if let DataValue::ValueMap(_) = &content.value {
                self.clear_descendants(&dest);
            }
        }

        match &content.value {
            DataValue::ValueString(s) => self.write_if_not_dirty(&dest, Value::String(s.clone())),
            DataValue::ValueNumber(n) => self.write_if_not_dirty(&dest, json!(*n)),
            DataValue::ValueBoolean(b) => self.write_if_not_dirty(&dest, Value::Bool(*b)),
            DataValue::ValueMap(entries) => {
                self.write_if_not_dirty(&dest, decode_value_map(entries));
                for entry in entries {
                    self.apply_content(&dest, entry);
                }
            }
            DataValue::ValueArray(items) => {
                let decoded = Value::Array(items.iter().map(decode_data_value).collect());
                self.write_if_not_dirty(&dest, decoded);
            }
        }
    }

    fn write_if_not_dirty(&self, path: &str, value: Value) {
        let is_dirty = self.inner.lock().unwrap().dirty.contains(path);
        if is_dirty {
            return;
        }
        self.raw_write(path, value);
    }

    fn raw_write(&self, path: &str, value: Value) {
        let mut guard = self.inner.lock().unwrap();
        guard.store.insert(path.to_string(), value.clone());
        guard.revision += 1;
        if let Some(touched) = guard.batch_touched.as_mut() {
            if !touched.iter().any(|p| p == path) {
                touched.push(path.to_string());
            }
        } else {
            drop(guard);
            self.notify(path, Some(&value));
        }
    }

    fn notify(&self, path: &str, value: Option<&Value>) {
        let ids: Vec<u64> = {
            let guard = self.inner.lock().unwrap();
            guard.subscribers.iter().map(|(id, _)| *id).collect()
        };

        for id in ids {
            let called = {
                let guard = self.inner.lock().unwrap();
                guard.subscribers.iter().find(|(sid, _)| *sid == id).map(|(_, f)| {
                    // Box<dyn Fn> is not Clone; call it while still holding
                    // the lock rather than smuggling a raw pointer out.
                    let result = catch_unwind(AssertUnwindSafe(|| f(path, value)));
                    result
                })
            };
            if let Some(Err(_)) = called {
                log::warn!("a2ui data model listener panicked for path {path}");
            }
        }
    }

    /// Read the value at `path`. If no value is stored directly there but
    /// descendants exist, compose an object from the immediate children.
    pub fn get(&self, path: &str) -> Option<Value> {
        let guard = self.inner.lock().unwrap();
        let path = normalize(path);
        if let Some(v) = guard.store.get(&path) {
            return Some(v.clone());
        }
        let prefix = prefix_for(&path);
        let mut map = serde_json::Map::new();
        for (key, value) in guard.store.range(prefix.clone()..) {
            if !key.starts_with(&prefix) {
                break;
            }
            let rest = &key[prefix.len()..];
            let Some(segment) = rest.split('/').next() else {
                continue;
            };
            if !map.contains_key(segment) {
                let child_path = format!("{prefix}{segment}");
                let child_value = guard.store.get(&child_path).cloned().unwrap_or_else(|| value.clone());
                map.insert(segment.to_string(), child_value);
            }
        }
        if map.is_empty() {
            None
        } else {
            Some(Value::Object(map))
        }
    }

    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn get_number(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(|v| v.as_f64())
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }

    pub fn get_array(&self, path: &str) -> Option<Vec<Value>> {
        self.get(path).and_then(|v| v.as_array().cloned())
    }

    /// Write `value` at `path`. User-originated writes (the default) mark the
    /// path dirty, protecting it from subsequent server overwrites until
    /// cleared. Unlike `update`, non-scalar values are stored opaquely and are
    /// not decomposed into per-leaf paths.
    pub fn set(&self, path: &str, value: Value, mark_dirty: bool) {
        let path = normalize(path);
        self.raw_write(&path, value);
        if mark_dirty {
            self.inner.lock().unwrap().dirty.insert(path);
        }
    }

    pub fn set_string(&self, path: &str, value: impl Into<String>, mark_dirty: bool) {
        self.set(path, Value::String(value.into()), mark_dirty);
    }

    pub fn set_number(&self, path: &str, value: f64, mark_dirty: bool) {
        self.set(path, json!(value), mark_dirty);
    }

    pub fn set_bool(&self, path: &str, value: bool, mark_dirty: bool) {
        self.set(path, Value::Bool(value), mark_dirty);
    }

    /// Remove `path` and every descendant, clearing their dirty flags too.
    pub fn delete(&self, path: &str) {
        let path = normalize(path);
        self.clear_descendants(&path);
        let mut guard = self.inner.lock().unwrap();
        guard.store.remove(&path);
        guard.dirty.remove(&path);
        drop(guard);
        self.notify(&path, None);
    }

    fn clear_descendants(&self, path: &str) {
        let prefix = prefix_for(path);
        let removed: Vec<String> = {
            let mut guard = self.inner.lock().unwrap();
            let keys: Vec<String> = guard
                .store
                .range(prefix.clone()..)
                .take_while(|(k, _)| k.starts_with(&prefix))
                .map(|(k, _)| k.clone())
                .collect();
            for k in &keys {
                guard.store.remove(k);
                guard.dirty.remove(k);
            }
            keys
        };
        for k in removed {
            self.notify(&k, None);
        }
    }

    /// Remove every stored path and dirty flag, notifying subscribers of each
    /// removed path. Used for surface teardown, where the whole namespace
    /// goes away rather than a single subtree.
    pub fn clear_all(&self) {
        self.clear_descendants("/");
        let mut guard = self.inner.lock().unwrap();
        guard.store.clear();
        guard.dirty.clear();
    }

    pub fn clear_dirty(&self, path: &str) {
        self.inner.lock().unwrap().dirty.remove(&normalize(path));
    }

    pub fn clear_all_dirty(&self) {
        self.inner.lock().unwrap().dirty.clear();
    }

    pub fn dirty_paths(&self) -> Vec<String> {
        let guard = self.inner.lock().unwrap();
        let mut paths: Vec<String> = guard.dirty.iter().cloned().collect();
        paths.sort();
        paths
    }

    pub fn is_dirty(&self, path: &str) -> bool {
        self.inner.lock().unwrap().dirty.contains(&normalize(path))
    }

    /// Resolve a bound value: literals pass through unchanged; a path is
    /// composed beneath `context_path` when relative, or used as-is when
    /// absolute.
    pub fn resolve(&self, value: &BoundValue, context_path: Option<&str>) -> Option<Value> {
        if let Some(literal) = value.literal_to_json() {
            return Some(literal);
        }
        let p = value.as_path()?;
        self.get(&compose_path(p, context_path))
    }

    /// Immediate children of `path`, in stored (lexicographic) order, for
    /// template-list expansion.
    pub fn entries(&self, path: &str) -> Vec<Entry> {
        let prefix = prefix_for(path);
        let children: Vec<(String, String)> = {
            let guard = self.inner.lock().unwrap();
            let mut seen = HashSet::new();
            let mut out = Vec::new();
            for (key, _) in guard.store.range(prefix.clone()..) {
                if !key.starts_with(&prefix) {
                    break;
                }
                let rest = &key[prefix.len()..];
                let Some(segment) = rest.split('/').next() else {
                    continue;
                };
                if seen.insert(segment.to_string()) {
                    out.push((segment.to_string(), format!("{prefix}{segment}")));
                }
            }
            out
        };
        children
            .into_iter()
            .filter_map(|(key, path)| self.get(&path).map(|value| Entry { key, path, value }))
            .collect()
    }

    /// Register a listener invoked with `(changed_path, new_value)` for every
    /// write or delete (`None`). Returns a disposer; disposal is idempotent
    /// and safe from inside a notification.
    pub fn subscribe<F>(&self, listener: F) -> Disposer
    where
        F: Fn(&str, Option<&Value>) + Send + Sync + 'static,
    {
        let mut guard = self.inner.lock().unwrap();
        let id = guard.next_sub_id;
        guard.next_sub_id += 1;
        guard.subscribers.push((id, Box::new(listener)));
        Disposer {
            model: Arc::downgrade(&self.inner),
            id,
            disposed: AtomicU64::new(0),
        }
    }

    /// Run `f`, coalescing every write it performs into one notification per
    /// touched path, delivered in first-touch order once `f` returns.
    pub fn batch<F: FnOnce(&DataModel)>(&self, f: F) {
        {
            let mut guard = self.inner.lock().unwrap();
            assert!(
                guard.batch_touched.is_none(),
                "nested DataModel::batch is not supported"
            );
            guard.batch_touched = Some(Vec::new());
        }
        f(self);
        let touched = {
            let mut guard = self.inner.lock().unwrap();
            guard.batch_touched.take().unwrap_or_default()
        };
        for path in touched {
            let value = self.inner.lock().unwrap().store.get(&path).cloned();
            self.notify(&path, value.as_ref());
        }
    }

    /// A flat snapshot of every stored path, for debugging / DevTools.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.inner.lock().unwrap().store.clone()
    }

    pub fn revision(&self) -> u64 {
        self.inner.lock().unwrap().revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_str(key: &str, s: &str) -> DataContent {
        DataContent {
            key: key.to_string(),
            value: DataValue::ValueString(s.to_string()),
        }
    }

    #[test]
    fn scalar_leaf_round_trips() {
        let dm = DataModel::new();
        dm.update("/user", &[content_str("name", "Ada")]);
        assert_eq!(dm.get_string("/user/name"), Some("Ada".to_string()));
    }

    #[test]
    fn dirty_path_blocks_server_overwrite() {
        let dm = DataModel::new();
        dm.set_string("/form/name", "xy", true);
        assert!(dm.is_dirty("/form/name"));
        dm.update("/form", &[content_str("name", "server")]);
        assert_eq!(dm.get_string("/form/name"), Some("xy".to_string()));
    }

    #[test]
    fn clear_all_dirty_unblocks_next_update() {
        let dm = DataModel::new();
        dm.set_string("/form/name", "xy", true);
        dm.clear_all_dirty();
        dm.update("/form", &[content_str("name", "server")]);
        assert_eq!(dm.get_string("/form/name"), Some("server".to_string()));
    }

    #[test]
    fn items_replacement_clears_previous_descendants() {
        let dm = DataModel::new();
        let entry_a = DataContent {
            key: "a".to_string(),
            value: DataValue::ValueMap(vec![content_str("title", "Alpha")]),
        };
        let entry_b = DataContent {
            key: "b".to_string(),
            value: DataValue::ValueMap(vec![content_str("title", "Beta")]),
        };
        dm.update("/app/items", &[entry_a, entry_b]);
        assert_eq!(dm.get_string("/app/items/a/title"), Some("Alpha".to_string()));

        let replacement = DataContent {
            key: "items".to_string(),
            value: DataValue::ValueMap(vec![DataContent {
                key: "c".to_string(),
                value: DataValue::ValueMap(vec![content_str("title", "Gamma")]),
            }]),
        };
        dm.update("/app", &[replacement]);

        assert_eq!(dm.get_string("/app/items/a/title"), None);
        assert_eq!(dm.get_string("/app/items/b/title"), None);
        assert_eq!(dm.get_string("/app/items/c/title"), Some("Gamma".to_string()));
    }

    #[test]
    fn batch_coalesces_notifications_per_path() {
        let dm = DataModel::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        let _disposer = dm.subscribe(move |path, _| {
            seen2.lock().unwrap().push(path.to_string());
        });

        dm.batch(|model| {
            model.set_string("/a", "1", false);
            model.set_string("/b", "2", false);
            model.set_string("/a", "3", false);
        });

        assert_eq!(*seen.lock().unwrap(), vec!["/a".to_string(), "/b".to_string()]);
        assert_eq!(dm.get_string("/a"), Some("3".to_string()));
    }

    #[test]
    fn delete_removes_path_and_descendants() {
        let dm = DataModel::new();
        dm.update(
            "/app",
            &[DataContent {
                key: "items".to_string(),
                value: DataValue::ValueMap(vec![DataContent {
                    key: "a".to_string(),
                    value: DataValue::ValueMap(vec![content_str("title", "Alpha")]),
                }]),
            }],
        );
        dm.delete("/app/items");
        assert_eq!(dm.get("/app/items"), None);
        assert_eq!(dm.get("/app/items/a/title"), None);
    }

    #[test]
    fn delete_is_idempotent() {
        let dm = DataModel::new();
        dm.set_string("/x", "1", false);
        dm.delete("/x");
        dm.delete("/x");
        assert_eq!(dm.get("/x"), None);
    }

    #[test]
    fn resolve_composes_relative_path_under_context() {
        let dm = DataModel::new();
        dm.set_string("/items/a/title", "Alpha", false);
        let bound = BoundValue::path("title");
        assert_eq!(
            dm.resolve(&bound, Some("/items/a")),
            Some(Value::String("Alpha".to_string()))
        );
    }

    #[test]
    fn resolve_absolute_path_ignores_context() {
        let dm = DataModel::new();
        dm.set_string("/abs", "value", false);
        let bound = BoundValue::path("/abs");
        assert_eq!(
            dm.resolve(&bound, Some("/irrelevant")),
            Some(Value::String("value".to_string()))
        );
    }

    #[test]
    fn resolve_literal_ignores_data_model_entirely() {
        let dm = DataModel::new();
        let bound = BoundValue::literal_string("hi");
        assert_eq!(dm.resolve(&bound, None), Some(Value::String("hi".to_string())));
    }

    #[test]
    fn entries_iterate_immediate_children_in_order() {
        let dm = DataModel::new();
        dm.update(
            "/app/items",
            &[
                DataContent {
                    key: "a".to_string(),
                    value: DataValue::ValueMap(vec![content_str("title", "Alpha")]),
                },
                DataContent {
                    key: "b".to_string(),
                    value: DataValue::ValueMap(vec![content_str("title", "Beta")]),
                },
            ],
        );
        let entries = dm.entries("/app/items");
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(entries[0].path, "/app/items/a");
    }

    #[test]
    fn disposer_unsubscribes_and_is_idempotent() {
        let dm = DataModel::new();
        let count = Arc::new(Mutex::new(0));
        let count2 = count.clone();
        let disposer = dm.subscribe(move |_, _| {
            *count2.lock().unwrap() += 1;
        });
        dm.set_string("/a", "1", false);
        disposer.dispose();
        disposer.dispose();
        dm.set_string("/a", "2", false);
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn clear_all_removes_every_path_and_dirty_flag() {
        let dm = DataModel::new();
        dm.update(
            "/app",
            &[DataContent {
                key: "items".to_string(),
                value: DataValue::ValueMap(vec![content_str("title", "Alpha")]),
            }],
        );
        dm.set_string("/app/form/name", "xy", true);
        dm.clear_all();
        assert_eq!(dm.get("/app/items"), None);
        assert_eq!(dm.get("/app/form/name"), None);
        assert!(dm.dirty_paths().is_empty());
        assert_eq!(dm.snapshot().len(), 0);
    }

    #[test]
    fn set_object_is_stored_opaquely_not_decomposed() {
        let dm = DataModel::new();
        dm.set("/blob", serde_json::json!({"nested": {"x": 1}}), false);
        assert_eq!(dm.get("/blob/nested/x"), None);
        assert_eq!(dm.get("/blob"), Some(serde_json::json!({"nested": {"x": 1}})));
    }
}
