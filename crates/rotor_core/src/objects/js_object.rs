//! Ordinary objects.
//!
//! A [`JsObject`] is a string-keyed map of property [`Handle`]s plus an
//! optional constructor reference and an optional prototype reference.
//! Property lookup is own-properties only; the prototype reference is
//! recorded at construction but never traversed.

use std::collections::HashMap;
use std::fmt;

use crate::objects::value::Handle;

/// A string-keyed property object.
pub struct JsObject {
    /// Constructor reference; unused by object literals.
    pub constructor: Option<Handle>,
    /// Prototype reference: a user-named value or the global object
    /// prototype.  Recorded but not traversed on lookup.
    pub proto: Option<Handle>,
    /// Own properties.
    pub properties: HashMap<String, Handle>,
}

impl JsObject {
    /// Creates an empty object with the given prototype.
    pub fn new(proto: Option<Handle>) -> Self {
        Self {
            constructor: None,
            proto,
            properties: HashMap::new(),
        }
    }

    /// Returns the own property cell for `key`, or `None` when absent.
    pub fn get(&self, key: &str) -> Option<Handle> {
        self.properties.get(key).cloned()
    }

    /// Inserts or replaces the property cell for `key`.
    pub fn set(&mut self, key: impl Into<String>, value: Handle) {
        self.properties.insert(key.into(), value);
    }
}

impl fmt::Debug for JsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.properties.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("JsObject").field("keys", &keys).finish()
    }
}
