//! Per-request key/value store shared by the middleware chain and the handler.
//!
//! A fresh `Context` is created for every converted request and dropped with
//! it. Clones of one `Context` (and therefore clones of one `Request`) share
//! the same store, so values written by an outer middleware are visible to
//! everything nested inside it. Values are type-erased; reading with the wrong
//! type yields `None`.
use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

type Store = HashMap<String, Box<dyn Any + Send + Sync>>;

#[derive(Clone, Default)]
pub struct Context {
    state: Arc<RwLock<Store>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn insert<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), Box::new(value));
    }

    /// Clone out the value under `key` if it exists and has type `T`.
    pub fn get<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)?
            .downcast_ref::<T>()
            .cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Remove `key`; returns whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    pub fn clear(&self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.state.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_set().entries(state.keys()).finish()
    }
}
