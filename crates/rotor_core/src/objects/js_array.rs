//! Array objects.
//!
//! A [`JsArray`] owns a vector of element [`Handle`]s plus an explicit
//! `length` counter.  The counter always equals the element count after
//! every mutation performed through [`push`][JsArray::push] and
//! [`splice`][JsArray::splice]; this invariant is what user code observes
//! through the array built-ins.

use std::fmt;

use crate::objects::value::Handle;

/// A dynamic array of shared value cells.
pub struct JsArray {
    /// Element cells in index order.
    pub elements: Vec<Handle>,
    /// Element count; kept equal to `elements.len()` by every mutator.
    pub length: usize,
}

impl JsArray {
    /// Creates an array over `elements`.
    pub fn new(elements: Vec<Handle>) -> Self {
        let length = elements.len();
        Self { elements, length }
    }

    /// Returns the element cell at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<Handle> {
        self.elements.get(index).cloned()
    }

    /// Appends `items` and returns the new length.
    pub fn push(&mut self, items: impl IntoIterator<Item = Handle>) -> usize {
        self.elements.extend(items);
        self.length = self.elements.len();
        self.length
    }

    /// Removes `delete_count` elements starting at `index`, inserts `items`
    /// in their place, and returns the removed elements as a new array.
    ///
    /// `index` clamps to the current length and `delete_count` clamps to
    /// the elements actually available after `index`.
    pub fn splice(&mut self, index: usize, delete_count: usize, items: Vec<Handle>) -> JsArray {
        let index = index.min(self.length);
        let delete_count = delete_count.min(self.length - index);
        let deleted: Vec<Handle> = self
            .elements
            .splice(index..index + delete_count, items)
            .collect();
        self.length = self.elements.len();
        JsArray::new(deleted)
    }
}

impl fmt::Debug for JsArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsArray")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}
