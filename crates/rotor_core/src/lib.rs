//! `rotor_core` — a tree-walking interpreter for a small dynamically typed
//! scripting language with JavaScript-like syntax.
//!
//! Source text flows through three stages: the scanner produces tokens, the
//! recursive-descent parser produces an AST with source locations, and the
//! evaluator walks the tree against a lexically scoped environment with
//! first-class closures and shared mutable value cells.  [`Interpreter`]
//! wires the stages together for the `r8` shell and for embedding.
//!
//! # Crate layout
//!
//! - [`error`] — engine error types and the `RotorResult` alias.
//! - [`diagnostics`] — source-excerpt rendering for reported errors.
//! - [`parser`] — scanner, AST definitions, and the parser.
//! - [`objects`] — runtime value representation and built-ins.
//! - [`interp`] — scope chain, evaluator, and the driver API.
//!
//! # Example
//!
//! ```
//! use rotor_core::Interpreter;
//!
//! let mut out = Vec::new();
//! {
//!     let mut interp = Interpreter::new(&mut out);
//!     interp.run("console.log(\"a\" + 1);");
//! }
//! assert_eq!(out, b"a1.00000\n");
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

/// Source-excerpt rendering for reported errors.
pub mod diagnostics;
/// Engine error types and [`RotorResult`] alias.
pub mod error;
/// Scope chain, evaluator, and the driver API.
pub mod interp;
/// Runtime value representation and built-ins.
pub mod objects;
/// Scanner, AST definitions, and the parser.
pub mod parser;

pub use error::{RotorError, RotorResult};
pub use interp::Interpreter;
