//! The interpreter driver.
//!
//! - [`scope`] — the lexical scope chain.
//! - [`eval`] — statement/expression walkers and unwind signals.
//! - [`Interpreter`] — the driver-facing API: owns the global scope and the
//!   output sink, and evaluates program units against live state.

/// Statement and expression evaluation.
pub(crate) mod eval;
/// Lexical scope chain.
pub mod scope;

use std::fmt;
use std::io::Write;

use crate::diagnostics::Diagnostics;
use crate::error::{RotorError, RotorResult};
use crate::interp::eval::Signal;
use crate::interp::scope::{Scope, ScopeRef};
use crate::objects::builtins;
use crate::objects::value::Handle;
use crate::parser::ast::Stmt;
use crate::parser::Parser;

/// Tree-walking interpreter.
///
/// The interpreter owns the global scope, so consecutive
/// [`run`][Interpreter::run] calls share state — declarations made by one
/// unit are visible to the next.  This is what the interactive shell
/// builds on.
///
/// # Example
///
/// ```
/// use rotor_core::Interpreter;
///
/// let mut out = Vec::new();
/// {
///     let mut interp = Interpreter::new(&mut out);
///     interp.run("function double(x) { return x * 2; };");
///     interp.run("console.log(double(21));");
/// }
/// assert_eq!(out, b"42.00000\n");
/// ```
pub struct Interpreter<'out> {
    /// The current scope; the global frame between program units.
    scope: ScopeRef,
    /// The shared prototype given to fresh object literals.
    object_prototype: Handle,
    /// Sink for program output (`console.log`).
    out: &'out mut dyn Write,
}

impl<'out> Interpreter<'out> {
    /// Creates an interpreter writing program output to `out`.
    ///
    /// The global scope starts with `console` bound.
    pub fn new(out: &'out mut dyn Write) -> Self {
        let scope = Scope::root();
        scope.set("console", builtins::console_object());
        Self {
            scope,
            object_prototype: builtins::object_prototype(),
            out,
        }
    }

    /// Parses and evaluates one program unit, rendering every diagnostic.
    ///
    /// Never fails: lex and parse errors skip evaluation, runtime errors
    /// end the unit.  State changes made before a runtime error are kept.
    pub fn run(&mut self, source: &str) {
        let mut parser = Parser::new(source);
        let program = parser.parse();
        if parser.has_error() {
            eprintln!("program stops due to error");
            return;
        }
        if let Err(err) = self.eval_program(&program) {
            Diagnostics::new(source).report(&err);
        }
    }

    /// Evaluates a parsed program against the live global scope.
    ///
    /// A `break`, `continue`, or `return` that unwinds all the way to the
    /// program boundary is reported as a runtime error.
    pub fn eval_program(&mut self, program: &Stmt) -> RotorResult<()> {
        match self.eval_stmt(program) {
            Ok(()) => Ok(()),
            Err(Signal::Error(err)) => Err(err),
            Err(Signal::Break) => Err(RotorError::type_error(
                program.loc,
                "break outside of a loop",
            )),
            Err(Signal::Continue) => Err(RotorError::type_error(
                program.loc,
                "continue outside of a loop",
            )),
            Err(Signal::Return(_)) => Err(RotorError::type_error(
                program.loc,
                "return outside of a function",
            )),
        }
    }

    /// Number of frames on the current scope chain; 1 between program
    /// units.
    pub fn scope_depth(&self) -> usize {
        self.scope.depth()
    }

    pub(crate) fn scope(&self) -> &ScopeRef {
        &self.scope
    }

    pub(crate) fn write_line(&mut self, text: &str) -> RotorResult<()> {
        writeln!(self.out, "{text}").map_err(|err| RotorError::Internal(err.to_string()))
    }
}

impl fmt::Debug for Interpreter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("scope_depth", &self.scope.depth())
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Parses and evaluates `source`, asserting success, and returns the
    /// program output.
    fn interpret(source: &str) -> String {
        let mut out = Vec::new();
        {
            let mut interp = Interpreter::new(&mut out);
            let mut parser = Parser::new(source);
            let program = parser.parse();
            assert!(!parser.has_error(), "parse error for {source:?}");
            interp
                .eval_program(&program)
                .unwrap_or_else(|err| panic!("runtime error for {source:?}: {err}"));
            assert_eq!(interp.scope_depth(), 1, "scope chain not restored");
        }
        String::from_utf8(out).expect("output is not UTF-8")
    }

    /// Evaluates `source` and returns the runtime error it must produce.
    fn eval_err(source: &str) -> RotorError {
        let mut out = Vec::new();
        let mut interp = Interpreter::new(&mut out);
        let mut parser = Parser::new(source);
        let program = parser.parse();
        assert!(!parser.has_error(), "parse error for {source:?}");
        let err = interp
            .eval_program(&program)
            .expect_err("evaluation unexpectedly succeeded");
        assert_eq!(interp.scope_depth(), 1, "scope chain not restored");
        err
    }

    // ── End-to-end scenarios ─────────────────────────────────────────────────

    #[test]
    fn test_arithmetic_and_coercion() {
        assert_eq!(
            interpret("console.log(1 + 2); console.log(\"a\" + 1);"),
            "3.00000\na1.00000\n"
        );
    }

    #[test]
    fn test_closures_capture_definition_scope() {
        let source = r#"
            function make(x) { return function (y) { return x + y; }; }
            let f = make(10);
            console.log(f(5));
        "#;
        assert_eq!(interpret(source), "15.00000\n");
    }

    #[test]
    fn test_for_with_break_and_continue() {
        let source = r#"
            for (let i = 0; i < 5; i++) {
                if (i == 2) { continue; }
                if (i == 4) { break; }
                console.log(i);
            }
        "#;
        assert_eq!(interpret(source), "0.00000\n1.00000\n3.00000\n");
    }

    #[test]
    fn test_array_push_and_splice() {
        let source = r#"
            let a = [1, 2, 3];
            a.push(4);
            a.splice(1, 1);
            console.log(a[0]);
            console.log(a[1]);
            console.log(a[2]);
        "#;
        assert_eq!(interpret(source), "1.00000\n3.00000\n4.00000\n");
    }

    #[test]
    fn test_object_property_read_and_write() {
        let source = r#"
            let o = { name: "x", v: 1 };
            o.v = 7;
            console.log(o.name);
            console.log(o.v);
        "#;
        assert_eq!(interpret(source), "x\n7.00000\n");
    }

    #[test]
    fn test_empty_string_is_falsy_in_if() {
        let source = r#"
            if ("") { console.log("t"); } else { console.log("f"); }
        "#;
        assert_eq!(interpret(source), "f\n");
    }

    // ── Boundary behaviors ──────────────────────────────────────────────────

    #[test]
    fn test_empty_program_has_no_output() {
        assert_eq!(interpret(""), "");
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let source = r#"
            function one(a) { return a; }
            console.log(one(1, 2, 3));
        "#;
        assert_eq!(interpret(source), "1.00000\n");
    }

    #[test]
    fn test_missing_arguments_resolve_to_undefined() {
        let source = r#"
            function two(a, b) { return b; }
            console.log(two(1));
        "#;
        assert_eq!(interpret(source), "undefined\n");
    }

    #[test]
    fn test_indexing_at_length_is_undefined() {
        assert_eq!(
            interpret("let a = [1, 2]; console.log(a[2]);"),
            "undefined\n"
        );
    }

    #[test]
    fn test_negative_index_is_undefined() {
        assert_eq!(
            interpret("let a = [1]; console.log(a[0 - 1]);"),
            "undefined\n"
        );
    }

    #[test]
    fn test_fractional_index_truncates() {
        assert_eq!(
            interpret("let a = [1, 2]; console.log(a[1.5]);"),
            "2.00000\n"
        );
    }

    #[test]
    fn test_function_without_return_yields_undefined() {
        assert_eq!(
            interpret("function f() { }; console.log(f());"),
            "undefined\n"
        );
    }

    #[test]
    fn test_return_stops_the_body() {
        let source = r#"
            function f() { return 1; console.log("unreachable"); }
            console.log(f());
        "#;
        assert_eq!(interpret(source), "1.00000\n");
    }

    #[test]
    fn test_missing_identifier_reads_as_undefined() {
        assert_eq!(interpret("console.log(ghost);"), "undefined\n");
    }

    #[test]
    fn test_missing_property_reads_as_undefined() {
        assert_eq!(
            interpret("let o = { a: 1 }; console.log(o.b);"),
            "undefined\n"
        );
    }

    #[test]
    fn test_console_log_prints_one_line_per_argument() {
        assert_eq!(interpret("console.log(1, \"a\", true);"), "1.00000\na\ntrue\n");
    }

    // ── Value and handle semantics ──────────────────────────────────────────

    #[test]
    fn test_bindings_initialized_from_an_identifier_alias_one_cell() {
        let source = r#"
            let x = 1;
            let y = x;
            y = 2;
            console.log(x);
        "#;
        assert_eq!(interpret(source), "2.00000\n");
    }

    #[test]
    fn test_arrays_share_interiors_across_bindings() {
        let source = r#"
            function grow(list) { list.push(2); }
            let a = [1];
            grow(a);
            console.log(a[1]);
        "#;
        assert_eq!(interpret(source), "2.00000\n");
    }

    #[test]
    fn test_indexed_assignment_in_range() {
        let source = r#"
            let a = [1, 2];
            a[0] = 9;
            console.log(a[0]);
            console.log(a[1]);
        "#;
        assert_eq!(interpret(source), "9.00000\n2.00000\n");
    }

    #[test]
    fn test_indexed_assignment_out_of_range_is_dropped() {
        let source = r#"
            let a = [1];
            a[5] = 9;
            console.log(a[5]);
        "#;
        assert_eq!(interpret(source), "undefined\n");
    }

    #[test]
    fn test_assignment_to_undeclared_name_is_dropped() {
        assert_eq!(
            interpret("ghost = 1; console.log(ghost);"),
            "undefined\n"
        );
    }

    #[test]
    fn test_postfix_increment_returns_old_value() {
        let source = r#"
            let i = 1;
            console.log(i++);
            console.log(i);
        "#;
        assert_eq!(interpret(source), "1.00000\n2.00000\n");
    }

    #[test]
    fn test_prefix_increment_returns_new_value() {
        let source = r#"
            let i = 1;
            console.log(++i);
            console.log(i);
        "#;
        assert_eq!(interpret(source), "2.00000\n2.00000\n");
    }

    #[test]
    fn test_member_increment_mutates_in_place() {
        let source = r#"
            let o = { v: 1 };
            o.v++;
            console.log(o.v);
        "#;
        assert_eq!(interpret(source), "2.00000\n");
    }

    #[test]
    fn test_member_postfix_increment_yields_new_value() {
        assert_eq!(
            interpret("let o = { v: 1 }; console.log(o.v++);"),
            "2.00000\n"
        );
    }

    // ── Operator semantics ──────────────────────────────────────────────────

    #[test]
    fn test_subtraction_is_right_associative() {
        assert_eq!(interpret("console.log(1 - 2 - 3);"), "2.00000\n");
    }

    #[test]
    fn test_modulo_truncates_to_integers() {
        assert_eq!(interpret("console.log(7 % 3);"), "1.00000\n");
        assert_eq!(interpret("console.log(7.5 % 2);"), "1.00000\n");
    }

    #[test]
    fn test_modulo_by_zero_is_a_range_error() {
        assert!(matches!(
            eval_err("console.log(1 % 0);"),
            RotorError::Range { .. }
        ));
    }

    #[test]
    fn test_plus_prefers_string_concatenation() {
        assert_eq!(interpret("console.log(1 + \"a\");"), "1.00000a\n");
        assert_eq!(interpret("console.log(true + 1);"), "2.00000\n");
    }

    #[test]
    fn test_loose_equality_does_not_coerce() {
        let source = r#"
            if (1 == "1") { console.log("eq"); } else { console.log("ne"); }
        "#;
        assert_eq!(interpret(source), "ne\n");
    }

    #[test]
    fn test_ordered_comparison_requires_numbers() {
        assert!(matches!(
            eval_err("console.log(\"a\" < \"b\");"),
            RotorError::Type { .. }
        ));
    }

    #[test]
    fn test_strict_equality_has_no_semantics() {
        assert!(matches!(
            eval_err("console.log(1 === 1);"),
            RotorError::Type { .. }
        ));
    }

    #[test]
    fn test_unary_minus_has_no_semantics() {
        assert!(matches!(eval_err("console.log(-1);"), RotorError::Type { .. }));
    }

    #[test]
    fn test_bang_negates_truthiness() {
        assert_eq!(interpret("console.log(!0);"), "true\n");
        assert_eq!(interpret("console.log(!\"x\");"), "false\n");
    }

    // ── Calls, methods, boxing ──────────────────────────────────────────────

    #[test]
    fn test_calling_a_non_callable_is_a_type_error() {
        assert!(matches!(
            eval_err("let x = 1; x();"),
            RotorError::Type { .. }
        ));
    }

    #[test]
    fn test_primitive_to_string_through_auto_box() {
        assert_eq!(
            interpret("let n = 5; console.log(n.toString());"),
            "5.00000\n"
        );
        assert_eq!(interpret("console.log(\"x\".toString());"), "x\n");
    }

    #[test]
    fn test_object_lookup_ignores_the_prototype() {
        // `toString` lives on the prototype, which is never traversed.
        assert!(matches!(
            eval_err("let o = { a: 1 }; o.toString();"),
            RotorError::Type { .. }
        ));
    }

    #[test]
    fn test_splice_requires_two_arguments() {
        assert!(matches!(
            eval_err("let a = [1]; a.splice(0);"),
            RotorError::Range { .. }
        ));
    }

    #[test]
    fn test_splice_returns_the_deleted_elements() {
        let source = r#"
            let a = [1, 2, 3];
            let d = a.splice(0, 2);
            console.log(d[0]);
            console.log(d[1]);
            console.log(a[0]);
        "#;
        assert_eq!(interpret(source), "1.00000\n2.00000\n3.00000\n");
    }

    #[test]
    fn test_push_returns_the_new_length() {
        assert_eq!(
            interpret("let a = [1]; console.log(a.push(2, 3));"),
            "3.00000\n"
        );
    }

    #[test]
    fn test_shadowing_in_function_scope() {
        let source = r#"
            let v = 1;
            function f() { let v = 2; console.log(v); }
            f();
            console.log(v);
        "#;
        assert_eq!(interpret(source), "2.00000\n1.00000\n");
    }

    #[test]
    fn test_closures_see_later_mutations_of_captured_scope() {
        let source = r#"
            let n = 1;
            function get() { return n; }
            n = 2;
            console.log(get());
        "#;
        assert_eq!(interpret(source), "2.00000\n");
    }

    #[test]
    fn test_recursion() {
        let source = r#"
            function fact(n) {
                if (n < 2) { return 1; }
                return n * fact(n - 1);
            }
            console.log(fact(5));
        "#;
        assert_eq!(interpret(source), "120.00000\n");
    }

    #[test]
    fn test_nested_loops_with_inner_break() {
        let source = r#"
            for (let i = 0; i < 2; i++) {
                for (let j = 0; j < 5; j++) {
                    if (j == 1) { break; }
                    console.log(i + j);
                }
            }
        "#;
        assert_eq!(interpret(source), "0.00000\n1.00000\n");
    }

    #[test]
    fn test_else_if_chain_takes_first_truthy_branch() {
        let source = r#"
            let x = 2;
            if (x == 1) { console.log("a"); }
            else if (x == 2) { console.log("b"); }
            else { console.log("c"); }
        "#;
        assert_eq!(interpret(source), "b\n");
    }

    #[test]
    fn test_numeric_object_keys_use_number_formatting() {
        use crate::objects::value::Value;

        let mut out = Vec::new();
        let mut interp = Interpreter::new(&mut out);
        let mut parser = Parser::new("let o = { 1: \"one\", other: 2 };");
        let program = parser.parse();
        assert!(!parser.has_error());
        interp.eval_program(&program).expect("evaluation failed");

        let o = interp.scope().get("o");
        let value = o.borrow().clone();
        match value {
            Value::Object(obj) => {
                let obj = obj.borrow();
                assert!(obj.get("1.00000").is_some(), "numeric key was not coerced");
                assert!(obj.get("other").is_some());
            }
            other => panic!("o is not an object: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_object_key_type_is_a_type_error() {
        assert!(matches!(
            eval_err("let o = { [[1]]: 1 };"),
            RotorError::Type { .. }
        ));
    }

    // ── Control-flow boundaries ─────────────────────────────────────────────

    #[test]
    fn test_break_outside_a_loop_is_a_runtime_error() {
        assert!(matches!(eval_err("break;"), RotorError::Type { .. }));
        assert!(matches!(eval_err("continue;"), RotorError::Type { .. }));
    }

    #[test]
    fn test_return_outside_a_function_is_a_runtime_error() {
        assert!(matches!(eval_err("return 1;"), RotorError::Type { .. }));
    }

    #[test]
    fn test_break_propagates_through_an_intervening_call() {
        // A stray break inside a called function unwinds through the call
        // into the caller's loop.
        let source = r#"
            function stop() { break; }
            for (let i = 0; i < 5; i++) {
                console.log(i);
                stop();
            }
        "#;
        assert_eq!(interpret(source), "0.00000\n");
    }

    #[test]
    fn test_class_evaluation_is_a_type_error() {
        assert!(matches!(
            eval_err("class A { }"),
            RotorError::Type { .. }
        ));
    }

    // ── Driver behavior ─────────────────────────────────────────────────────

    #[test]
    fn test_state_persists_across_run_calls() {
        let mut out = Vec::new();
        {
            let mut interp = Interpreter::new(&mut out);
            interp.run("let x = 41;");
            interp.run("x = x + 1;");
            interp.run("console.log(x);");
        }
        assert_eq!(String::from_utf8(out).unwrap(), "42.00000\n");
    }

    #[test]
    fn test_run_skips_evaluation_on_parse_error() {
        let mut out = Vec::new();
        {
            let mut interp = Interpreter::new(&mut out);
            interp.run("console.log(1); let = ;");
        }
        // The unit never evaluates, so nothing is printed.
        assert_eq!(String::from_utf8(out).unwrap(), "");
    }

    #[test]
    fn test_run_survives_runtime_errors() {
        let mut out = Vec::new();
        {
            let mut interp = Interpreter::new(&mut out);
            interp.run("let x = 1; x();");
            interp.run("console.log(x);");
        }
        assert_eq!(String::from_utf8(out).unwrap(), "1.00000\n");
    }

    #[test]
    fn test_incomplete_trailing_expression_reads_as_undefined() {
        let mut out = Vec::new();
        {
            let mut interp = Interpreter::new(&mut out);
            interp.run("let x =");
            interp.run("console.log(x);");
        }
        assert_eq!(String::from_utf8(out).unwrap(), "undefined\n");
    }

    #[test]
    fn test_scope_depth_restored_after_unwinds() {
        let source = r#"
            function f() { for (let i = 0; i < 3; i++) { if (i == 1) { return i; } } }
            console.log(f());
        "#;
        assert_eq!(interpret(source), "1.00000\n");
    }
}
