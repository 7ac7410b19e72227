//! Lexical scope chain.
//!
//! Scopes form a tree rooted at the global frame.  Frames are shared
//! through [`Rc`] because multiple closures may capture the same ancestor;
//! a captured frame stays alive as long as any closure references it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::objects::value::{undefined_handle, Handle};

/// A shared scope frame.
pub type ScopeRef = Rc<Scope>;

/// One lexical frame: a name → cell map plus an optional parent.
pub struct Scope {
    parent: Option<ScopeRef>,
    env: RefCell<HashMap<String, Handle>>,
}

impl Scope {
    /// Creates the root (global) frame.
    pub fn root() -> ScopeRef {
        Rc::new(Scope {
            parent: None,
            env: RefCell::new(HashMap::new()),
        })
    }

    /// Creates a child frame of `parent`.
    pub fn child(parent: &ScopeRef) -> ScopeRef {
        Rc::new(Scope {
            parent: Some(Rc::clone(parent)),
            env: RefCell::new(HashMap::new()),
        })
    }

    /// Resolves `name` against this frame and its ancestors.
    ///
    /// Missing names yield a fresh cell holding undefined; lookup never
    /// fails.  Writes to such a cell are not retained anywhere.
    pub fn get(&self, name: &str) -> Handle {
        if let Some(cell) = self.env.borrow().get(name) {
            return Rc::clone(cell);
        }
        match &self.parent {
            Some(parent) => parent.get(name),
            None => undefined_handle(),
        }
    }

    /// Binds `name` to `value` in this frame, shadowing any ancestor
    /// binding of the same name.
    pub fn set(&self, name: impl Into<String>, value: Handle) {
        self.env.borrow_mut().insert(name.into(), value);
    }

    /// Rebinds the nearest existing binding of `name` to `value` and
    /// returns the new cell.
    ///
    /// When no binding exists anywhere on the chain, an undefined binding
    /// is created in the outermost frame reached (the global frame) and an
    /// undefined cell is returned.
    pub fn update(&self, name: &str, value: Handle) -> Handle {
        if self.env.borrow().contains_key(name) {
            self.env
                .borrow_mut()
                .insert(name.to_string(), Rc::clone(&value));
            return value;
        }
        match &self.parent {
            Some(parent) => parent.update(name, value),
            None => {
                let undef = undefined_handle();
                self.env
                    .borrow_mut()
                    .insert(name.to_string(), Rc::clone(&undef));
                undef
            }
        }
    }

    /// Returns `true` when this frame (not an ancestor) binds `name`.
    pub fn binds(&self, name: &str) -> bool {
        self.env.borrow().contains_key(name)
    }

    /// Number of frames from this one to the root, inclusive.
    pub fn depth(&self) -> usize {
        match &self.parent {
            Some(parent) => parent.depth() + 1,
            None => 1,
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Cells may reference closures that reference this scope again, so
        // only the bound names are printed.
        let mut names: Vec<String> = self.env.borrow().keys().cloned().collect();
        names.sort_unstable();
        f.debug_struct("Scope")
            .field("depth", &self.depth())
            .field("names", &names)
            .finish()
    }
}
