//! Function objects.
//!
//! Two closely related types live here:
//!
//! * [`JsFunction`] — a user closure: the shared function definition
//!   ([`FnExpr`]) paired with the scope captured at the point the
//!   `function` expression was evaluated.
//!
//! * [`BuiltinFn`] — a native host callback implementing built-in
//!   behaviour directly in Rust, invoked as `(interpreter, this, args)`.

use std::fmt;
use std::rc::Rc;

use crate::error::RotorResult;
use crate::interp::scope::ScopeRef;
use crate::interp::Interpreter;
use crate::objects::value::Value;
use crate::parser::ast::FnExpr;

/// A user closure.
///
/// The captured scope stays alive as long as any closure references it,
/// which is what makes free identifiers resolve against the definition
/// site regardless of the caller.
pub struct JsFunction {
    /// The scope live at the definition site.
    pub closure: ScopeRef,
    /// The shared function definition (name, parameters, body).
    pub decl: Rc<FnExpr>,
}

impl fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsFunction")
            .field("name", &self.decl.name)
            .field("params", &self.decl.params)
            .finish_non_exhaustive()
    }
}

/// Signature of a native built-in: `(interpreter, this, args) → value`.
pub type NativeFn = fn(&mut Interpreter<'_>, Value, &[Value]) -> RotorResult<Value>;

/// A native built-in function value.
#[derive(Clone, Copy)]
pub struct BuiltinFn {
    /// Name used in diagnostics.
    pub name: &'static str,
    /// The host callback.
    pub func: NativeFn,
}

impl fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinFn({})", self.name)
    }
}

impl PartialEq for BuiltinFn {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.func as *const (), other.func as *const ())
    }
}
