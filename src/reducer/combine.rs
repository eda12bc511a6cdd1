use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::action::{Action, ActionEnvelope};
use crate::error::ShapeError;
use crate::reducer::Reducer;

/// A keyed state object whose slices are owned by independent reducers.
///
/// Slices are shared behind `Arc`, so cloning a `Slices` is cheap and
/// "did anything change" reduces to pointer identity. The combined reducer
/// returns the same `Slices` (pointer-equal, observable through
/// [`Slices::ptr_eq`]) whenever no slice changed.
#[derive(Debug)]
pub struct Slices<V> {
    map: Arc<BTreeMap<String, Arc<V>>>,
}

impl<V> Slices<V> {
    /// The slice stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.map.get(key).map(Arc::as_ref)
    }

    pub(crate) fn get_arc(&self, key: &str) -> Option<Arc<V>> {
        self.map.get(key).map(Arc::clone)
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The slice keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Iterate over `(key, slice)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.map.iter().map(|(key, value)| (key.as_str(), value.as_ref()))
    }

    /// Whether two values are the same state object, not merely equal.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.map, &b.map)
    }
}

impl<V> Clone for Slices<V> {
    fn clone(&self) -> Self {
        Self {
            map: Arc::clone(&self.map),
        }
    }
}

impl<V> Default for Slices<V> {
    fn default() -> Self {
        Self {
            map: Arc::new(BTreeMap::new()),
        }
    }
}

impl<V: PartialEq> PartialEq for Slices<V> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Slices<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: Arc::new(
                iter.into_iter()
                    .map(|(key, value)| (key.into(), Arc::new(value)))
                    .collect(),
            ),
        }
    }
}

/// A transition function over one slice of a keyed state object.
pub type SliceReducer<V, A> =
    Box<dyn Fn(Option<Arc<V>>, &ActionEnvelope<A>) -> Option<Arc<V>> + Send + Sync>;

/// An ordered set of named slice reducers, ready to be combined.
pub struct SliceReducers<V, A> {
    entries: Vec<(String, SliceReducer<V, A>)>,
}

impl<V, A> SliceReducers<V, A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a reducer for the slice stored under `key`.
    pub fn slice<F>(mut self, key: impl Into<String>, reducer: F) -> Self
    where
        F: Fn(Option<Arc<V>>, &ActionEnvelope<A>) -> Option<Arc<V>> + Send + Sync + 'static,
    {
        self.entries.push((key.into(), Box::new(reducer)));
        self
    }
}

impl<V, A> Default for SliceReducers<V, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge named slice reducers into a single reducer over [`Slices`].
///
/// Every slice reducer is validated up front: invoked with no previous
/// state it must produce a concrete initial state, both for the
/// initialization marker and for an unknown-action probe. A validation
/// failure is captured and returned from every subsequent reduction until
/// a new combination is built.
///
/// ```
/// use std::sync::Arc;
/// use canister::{combine_reducers, ActionEnvelope, SliceReducers, Store};
/// use serde_json::{json, Value};
///
/// fn count(state: Option<Arc<Value>>, action: &ActionEnvelope<&'static str>) -> Option<Arc<Value>> {
///     let state = state.unwrap_or_else(|| Arc::new(json!(0)));
///     match action.action() {
///         Some(&"add") => Some(Arc::new(json!(state.as_i64()? + 1))),
///         _ => Some(state),
///     }
/// }
///
/// let store = Store::new(combine_reducers(SliceReducers::new().slice("count", count))).unwrap();
/// store.dispatch("add").unwrap();
/// assert_eq!(store.get_state().unwrap().get("count"), Some(&json!(1)));
/// ```
pub fn combine_reducers<V, A>(slices: SliceReducers<V, A>) -> CombinedReducer<V, A>
where
    V: Send + Sync + 'static,
    A: Action,
{
    let entries = slices.entries;
    let shape_error = assert_slice_shapes(&entries).err();
    CombinedReducer {
        entries,
        shape_error,
        warned_keys: Mutex::new(HashSet::new()),
    }
}

fn assert_slice_shapes<V, A: Action>(
    entries: &[(String, SliceReducer<V, A>)],
) -> Result<(), ShapeError> {
    for (key, reducer) in entries {
        if reducer(None, &ActionEnvelope::init()).is_none() {
            return Err(ShapeError::SliceInit { key: key.clone() });
        }
        if reducer(None, &ActionEnvelope::probe()).is_none() {
            return Err(ShapeError::SliceProbe { key: key.clone() });
        }
    }
    Ok(())
}

/// The reducer produced by [`combine_reducers`].
pub struct CombinedReducer<V, A> {
    entries: Vec<(String, SliceReducer<V, A>)>,
    shape_error: Option<ShapeError>,
    warned_keys: Mutex<HashSet<String>>,
}

impl<V, A> CombinedReducer<V, A>
where
    V: Send + Sync + 'static,
    A: Action,
{
    fn warn_unexpected_keys(&self, state: &Slices<V>, action: &ActionEnvelope<A>) {
        // Hot-swapping reducers legitimately leaves stale keys behind.
        if action.is_replace() {
            return;
        }
        if self.entries.is_empty() {
            log::warn!("the combined reducer has no slice reducers; every reduction yields an empty state");
            return;
        }
        let source = if action.is_init() {
            "the preloaded state"
        } else {
            "the previous state"
        };
        let mut warned = self.warned_keys.lock().unwrap();
        for key in state.keys() {
            if !self.entries.iter().any(|(known, _)| known == key)
                && warned.insert(key.to_string())
            {
                log::warn!(
                    "unexpected key \"{}\" found in {}; no slice reducer is registered for it and it will be dropped",
                    key,
                    source
                );
            }
        }
    }
}

impl<V, A> Reducer<Slices<V>, A> for CombinedReducer<V, A>
where
    V: Send + Sync + 'static,
    A: Action,
{
    fn reduce(
        &self,
        state: Option<Slices<V>>,
        action: &ActionEnvelope<A>,
    ) -> Result<Slices<V>, ShapeError> {
        if let Some(error) = &self.shape_error {
            return Err(error.clone());
        }
        let state = state.unwrap_or_default();
        if cfg!(debug_assertions) {
            self.warn_unexpected_keys(&state, action);
        }

        let mut next = BTreeMap::new();
        let mut has_changed = false;
        for (key, reducer) in &self.entries {
            let previous = state.get_arc(key);
            match reducer(previous.clone(), action) {
                Some(slice) => {
                    has_changed =
                        has_changed || previous.map_or(true, |prev| !Arc::ptr_eq(&prev, &slice));
                    next.insert(key.clone(), slice);
                }
                None => {
                    return Err(ShapeError::Slice {
                        key: key.clone(),
                        action_kind: action.kind_label().to_string(),
                    })
                }
            }
        }
        has_changed = has_changed || next.len() != state.len();

        Ok(if has_changed {
            Slices {
                map: Arc::new(next),
            }
        } else {
            state
        })
    }
}
