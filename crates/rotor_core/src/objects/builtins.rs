//! Native built-ins: the global `console` object, the object prototype,
//! and the auto-box used for property access on non-object values.
//!
//! # Auto-boxing
//!
//! When a `.` member access lands on a value that is neither an object nor
//! a builtin object, the evaluator wraps it in a transient
//! [`Value::BuiltinObject`] produced by [`wrap`].  The box always exposes
//! `toString` and `toNumber`; arrays additionally expose `push` and
//! `splice`, which is how the array methods are reached.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{RotorError, RotorResult};
use crate::interp::Interpreter;
use crate::objects::js_function::{BuiltinFn, NativeFn};
use crate::objects::js_object::JsObject;
use crate::objects::value::{handle, Handle, Value};
use crate::parser::scanner::Loc;

fn builtin(name: &'static str, func: NativeFn) -> Handle {
    handle(Value::Builtin(BuiltinFn { name, func }))
}

/// Builds the global `console` object with its `log` method.
pub fn console_object() -> Handle {
    let mut console = JsObject::new(None);
    console.set("log", builtin("log", console_log));
    handle(Value::Object(Rc::new(RefCell::new(console))))
}

/// Builds the global object prototype: a builtin object exposing
/// `toString`.  Every object literal without a named prototype points here.
pub fn object_prototype() -> Handle {
    let mut map = HashMap::new();
    map.insert("toString".to_string(), builtin("toString", to_string));
    handle(Value::BuiltinObject(Rc::new(RefCell::new(map))))
}

/// Builds the transient auto-box for a `.` access on `value`.
pub fn wrap(value: &Value) -> Rc<RefCell<HashMap<String, Handle>>> {
    let mut map = HashMap::new();
    if matches!(value, Value::Array(_)) {
        map.insert("push".to_string(), builtin("push", array_push));
        map.insert("splice".to_string(), builtin("splice", array_splice));
    }
    map.insert("toString".to_string(), builtin("toString", to_string));
    map.insert("toNumber".to_string(), builtin("toNumber", to_number));
    Rc::new(RefCell::new(map))
}

// ─────────────────────────────────────────────────────────────────────────────
// Native implementations
// ─────────────────────────────────────────────────────────────────────────────

/// `console.log(args…)` — one line per argument, string-coerced.
fn console_log(interp: &mut Interpreter<'_>, _this: Value, args: &[Value]) -> RotorResult<Value> {
    for arg in args {
        interp.write_line(&arg.to_js_string())?;
    }
    Ok(Value::Undefined)
}

/// `v.toString()` — string coercion of the receiver.
fn to_string(_interp: &mut Interpreter<'_>, this: Value, _args: &[Value]) -> RotorResult<Value> {
    Ok(Value::String(this.to_js_string()))
}

/// `v.toNumber()` — numeric coercion of the receiver.
fn to_number(_interp: &mut Interpreter<'_>, this: Value, _args: &[Value]) -> RotorResult<Value> {
    Ok(Value::Number(this.to_number()))
}

/// `arr.push(items…)` — appends and returns the new length.
fn array_push(_interp: &mut Interpreter<'_>, this: Value, args: &[Value]) -> RotorResult<Value> {
    let Value::Array(arr) = this else {
        return Err(RotorError::type_error(
            Loc::default(),
            "push called on a non-array",
        ));
    };
    let new_len = arr
        .borrow_mut()
        .push(args.iter().map(|v| handle(v.clone())));
    Ok(Value::Number(new_len as f64))
}

/// `arr.splice(index, deleteCount, items…)` — deletes and inserts in
/// place, returning the removed elements as a new array.
fn array_splice(_interp: &mut Interpreter<'_>, this: Value, args: &[Value]) -> RotorResult<Value> {
    let Value::Array(arr) = this else {
        return Err(RotorError::type_error(
            Loc::default(),
            "splice called on a non-array",
        ));
    };
    if args.len() < 2 {
        return Err(RotorError::range(
            Loc::default(),
            "splice expects at least 2 arguments",
        ));
    }
    let index = args[0].to_number().max(0.0) as usize;
    let delete_count = args[1].to_number().max(0.0) as usize;
    let items: Vec<Handle> = args[2..].iter().map(|v| handle(v.clone())).collect();
    let deleted = arr.borrow_mut().splice(index, delete_count, items);
    Ok(Value::Array(Rc::new(RefCell::new(deleted))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_object_exposes_log() {
        let console = console_object();
        let value = console.borrow().clone();
        match value {
            Value::Object(obj) => {
                let log = obj.borrow().get("log").expect("log is missing");
                assert!(log.borrow().is_callable());
            }
            other => panic!("console is not an object: {other:?}"),
        }
    }

    #[test]
    fn test_object_prototype_exposes_to_string() {
        let proto = object_prototype();
        let value = proto.borrow().clone();
        match value {
            Value::BuiltinObject(map) => assert!(map.borrow().contains_key("toString")),
            other => panic!("prototype is not a builtin object: {other:?}"),
        }
    }

    #[test]
    fn test_wrap_exposes_coercions() {
        let boxed = wrap(&Value::Number(1.0));
        let map = boxed.borrow();
        assert!(map.contains_key("toString"));
        assert!(map.contains_key("toNumber"));
        assert!(!map.contains_key("push"));
    }

    #[test]
    fn test_wrap_of_array_exposes_array_methods() {
        use crate::objects::js_array::JsArray;
        let arr = Value::Array(Rc::new(RefCell::new(JsArray::new(Vec::new()))));
        let boxed = wrap(&arr);
        let map = boxed.borrow();
        assert!(map.contains_key("push"));
        assert!(map.contains_key("splice"));
    }
}
