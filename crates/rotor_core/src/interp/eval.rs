//! The tree-walking evaluator.
//!
//! # Unwind signals
//!
//! `return`, `break`, and `continue` must jump over arbitrary intervening
//! statements, so they ride the `Err` channel of [`EvalResult`] as
//! [`Signal`] values and bubble through `?` like errors.  The sites that
//! introduce a dynamic boundary pattern-match the `Err`: function calls
//! consume `Return`, the `for` statement consumes `Break` and `Continue`,
//! and everything else propagates.  Signals never surface to the user;
//! [`Interpreter::eval_program`](crate::interp::Interpreter::eval_program)
//! converts any stray signal into a runtime error at the program boundary.
//!
//! # Scope discipline
//!
//! Function calls, `for`, and `if` each run in a fresh child scope.  The
//! previous scope is saved before entry and restored unconditionally after
//! the construct finishes, whether it completed, unwound, or failed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RotorError;
use crate::interp::scope::Scope;
use crate::interp::Interpreter;
use crate::objects::builtins;
use crate::objects::js_array::JsArray;
use crate::objects::js_function::JsFunction;
use crate::objects::js_object::JsObject;
use crate::objects::value::{handle, number_to_string, undefined_handle, Handle, Value};
use crate::parser::ast::{Branch, Expr, ExprData, Fixity, FnExpr, ForStmt, Stmt, StmtData};
use crate::parser::scanner::{Loc, TokenKind};

/// A non-local unwind: a genuine error or a control-flow jump.
#[derive(Debug)]
pub(crate) enum Signal {
    /// A runtime error on its way to the driver.
    Error(RotorError),
    /// `return value` unwinding to the nearest call.
    Return(Handle),
    /// `break` unwinding to the nearest loop.
    Break,
    /// `continue` unwinding to the nearest loop.
    Continue,
}

impl From<RotorError> for Signal {
    fn from(err: RotorError) -> Self {
        Signal::Error(err)
    }
}

pub(crate) type EvalResult<T> = Result<T, Signal>;

impl Interpreter<'_> {
    // ── Statements ──────────────────────────────────────────────────────────

    pub(crate) fn eval_stmt(&mut self, stmt: &Stmt) -> EvalResult<()> {
        match &stmt.data {
            StmtData::Program(body) | StmtData::Block(body) => self.eval_stmts(body),
            StmtData::Empty => Ok(()),
            StmtData::VarDecl { name, init, .. } => {
                let cell = match init {
                    Some(expr) => self.eval_expr(expr)?,
                    None => undefined_handle(),
                };
                self.scope.set(name.clone(), cell);
                Ok(())
            }
            StmtData::FunctionDecl(decl) => {
                self.make_function(decl);
                Ok(())
            }
            StmtData::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(())
            }
            StmtData::Return(expr) => {
                let value = self.eval_expr(expr)?;
                Err(Signal::Return(value))
            }
            StmtData::Break => Err(Signal::Break),
            StmtData::Continue => Err(Signal::Continue),
            StmtData::Condition(branches) => {
                let saved = Rc::clone(&self.scope);
                self.scope = Scope::child(&saved);
                let result = self.eval_branches(branches);
                self.scope = saved;
                result
            }
            StmtData::For(for_stmt) => {
                let saved = Rc::clone(&self.scope);
                self.scope = Scope::child(&saved);
                let result = self.run_for(for_stmt);
                self.scope = saved;
                // A break or continue escaping the initializer or the
                // condition ends the loop quietly.
                match result {
                    Err(Signal::Break) | Err(Signal::Continue) => Ok(()),
                    other => other,
                }
            }
            // The parser does not produce `while` yet.
            StmtData::While(_) => Ok(()),
            StmtData::Class(_) => Err(RotorError::type_error(
                stmt.loc,
                "class declarations are not supported",
            )
            .into()),
        }
    }

    pub(crate) fn eval_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<()> {
        for stmt in stmts {
            self.eval_stmt(stmt)?;
        }
        Ok(())
    }

    /// Runs the first branch whose condition is truthy; a branch without a
    /// condition (the trailing `else`) always runs.
    fn eval_branches(&mut self, branches: &[Branch]) -> EvalResult<()> {
        for branch in branches {
            let taken = match &branch.condition {
                Some(condition) => self.eval_expr(condition)?.borrow().is_truthy(),
                None => true,
            };
            if taken {
                return self.eval_stmts(&branch.body.block);
            }
        }
        Ok(())
    }

    /// The loop proper; the caller owns the loop scope.
    fn run_for(&mut self, stmt: &ForStmt) -> EvalResult<()> {
        self.eval_stmt(&stmt.init)?;
        loop {
            if !self.eval_expr(&stmt.condition)?.borrow().is_truthy() {
                break;
            }
            match self.eval_stmts(&stmt.body.block) {
                // A continue falls through to the reset statement.
                Ok(()) | Err(Signal::Continue) => {}
                Err(Signal::Break) => break,
                Err(other) => return Err(other),
            }
            match self.eval_stmt(&stmt.reset) {
                Ok(()) => {}
                Err(Signal::Break) => break,
                Err(Signal::Continue) => {}
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    // ── Expressions ─────────────────────────────────────────────────────────

    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Handle> {
        match &expr.data {
            ExprData::Empty => Ok(undefined_handle()),
            ExprData::NumberLit(raw) => Ok(handle(Value::Number(raw.parse().unwrap_or(0.0)))),
            ExprData::StringLit(text) => Ok(handle(Value::String(text.clone()))),
            ExprData::BoolLit(b) => Ok(handle(Value::Boolean(*b))),
            ExprData::Identifier(name) => Ok(self.scope.get(name)),
            ExprData::Paren(inner) => self.eval_expr(inner),
            ExprData::Function(decl) => Ok(self.make_function(decl)),
            ExprData::Binary { op, left, right } => self.eval_binary(expr.loc, *op, left, right),
            ExprData::Unary {
                op,
                operand,
                fixity,
            } => self.eval_unary(expr.loc, *op, operand, *fixity),
            ExprData::Assign { target, value } => {
                let target = self.eval_expr(target)?;
                let value = self.eval_expr(value)?;
                let contents = value.borrow().clone();
                *target.borrow_mut() = contents;
                Ok(target)
            }
            ExprData::Member { object, property } => self.eval_member(object, property),
            ExprData::Index { target, index } => self.eval_index(expr.loc, target, index),
            ExprData::Call { callee, args } => self.eval_call(expr.loc, callee, args),
            ExprData::ArrayLit { elements, .. } => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.eval_expr(element)?);
                }
                Ok(handle(Value::Array(Rc::new(RefCell::new(JsArray::new(
                    items,
                ))))))
            }
            ExprData::ObjectLit { properties, proto } => {
                self.eval_object_literal(expr.loc, properties, proto.as_deref())
            }
        }
    }

    /// Builds a closure over the current scope; named functions also bind
    /// their name in the current scope.
    fn make_function(&mut self, decl: &Rc<FnExpr>) -> Handle {
        let function = handle(Value::Function(Rc::new(JsFunction {
            closure: Rc::clone(&self.scope),
            decl: Rc::clone(decl),
        })));
        if let Some(name) = &decl.name {
            self.scope.set(name.clone(), Rc::clone(&function));
        }
        function
    }

    fn eval_binary(
        &mut self,
        loc: Loc,
        op: TokenKind,
        left: &Expr,
        right: &Expr,
    ) -> EvalResult<Handle> {
        let lhs = self.eval_expr(left)?;
        let rhs = self.eval_expr(right)?;
        let l = lhs.borrow().clone();
        let r = rhs.borrow().clone();

        let value = match op {
            TokenKind::Minus | TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
                let ln = l.to_number();
                let rn = r.to_number();
                match op {
                    TokenKind::Minus => Value::Number(ln - rn),
                    TokenKind::Star => Value::Number(ln * rn),
                    TokenKind::Slash => Value::Number(ln / rn),
                    _ => {
                        // Truncated integer modulo, not float remainder.
                        let divisor = rn as i64;
                        if divisor == 0 {
                            return Err(RotorError::range(loc, "modulo by zero").into());
                        }
                        Value::Number((ln as i64 % divisor) as f64)
                    }
                }
            }
            TokenKind::Plus => {
                if l.is_string() || r.is_string() {
                    Value::String(format!("{}{}", l.to_js_string(), r.to_js_string()))
                } else {
                    Value::Number(l.to_number() + r.to_number())
                }
            }
            TokenKind::EqualEqual => Value::Boolean(l.loosely_equals(&r)),
            TokenKind::Less | TokenKind::LessEqual | TokenKind::Greater | TokenKind::GreaterEqual => {
                match (&l, &r) {
                    (Value::Number(ln), Value::Number(rn)) => Value::Boolean(match op {
                        TokenKind::Less => ln < rn,
                        TokenKind::LessEqual => ln <= rn,
                        TokenKind::Greater => ln > rn,
                        _ => ln >= rn,
                    }),
                    _ => {
                        return Err(RotorError::type_error(
                            loc,
                            "ordered comparison requires number operands",
                        )
                        .into());
                    }
                }
            }
            _ => return Err(RotorError::type_error(loc, "unknown operator").into()),
        };
        Ok(handle(value))
    }

    fn eval_unary(
        &mut self,
        loc: Loc,
        op: TokenKind,
        operand: &Expr,
        fixity: Fixity,
    ) -> EvalResult<Handle> {
        let cell = self.eval_expr(operand)?;
        match op {
            TokenKind::Bang => {
                let b = cell.borrow().to_boolean();
                Ok(handle(Value::Boolean(!b)))
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let n = match &*cell.borrow() {
                    Value::Number(n) => *n,
                    _ => {
                        return Err(RotorError::type_error(
                            loc,
                            "increment and decrement require a number operand",
                        )
                        .into());
                    }
                };
                let next = if op == TokenKind::PlusPlus {
                    n + 1.0
                } else {
                    n - 1.0
                };
                match &operand.data {
                    ExprData::Identifier(name) => {
                        let updated = self.scope.update(name, handle(Value::Number(next)));
                        match fixity {
                            // The rebind leaves the old cell untouched, so
                            // the postfix result keeps the previous value.
                            Fixity::Postfix => Ok(cell),
                            Fixity::Prefix => Ok(updated),
                        }
                    }
                    ExprData::Member { .. } => {
                        // Property cells mutate in place so aliases observe
                        // the change; both fixities yield the new value.
                        *cell.borrow_mut() = Value::Number(next);
                        Ok(handle(Value::Number(next)))
                    }
                    _ => Err(RotorError::type_error(
                        loc,
                        "invalid increment or decrement target",
                    )
                    .into()),
                }
            }
            _ => Err(RotorError::type_error(loc, "unknown unary operator").into()),
        }
    }

    fn eval_member(&mut self, object: &Expr, property: &str) -> EvalResult<Handle> {
        let object = self.eval_expr(object)?;
        let value = object.borrow().clone();
        let cell = match value {
            Value::Object(obj) => obj.borrow().get(property),
            Value::BuiltinObject(map) => map.borrow().get(property).cloned(),
            other => builtins::wrap(&other).borrow().get(property).cloned(),
        };
        Ok(cell.unwrap_or_else(undefined_handle))
    }

    fn eval_index(&mut self, loc: Loc, target: &Expr, index: &Expr) -> EvalResult<Handle> {
        let target = self.eval_expr(target)?;
        let index = self.eval_expr(index)?;
        let value = target.borrow().clone();
        match value {
            Value::Array(arr) => {
                let n = index.borrow().to_number();
                let arr = arr.borrow();
                if n < 0.0 || n >= arr.length as f64 {
                    return Ok(undefined_handle());
                }
                Ok(arr.get(n as usize).unwrap_or_else(undefined_handle))
            }
            _ => Err(RotorError::type_error(loc, "index expression can only be used on an array")
                .into()),
        }
    }

    fn eval_call(&mut self, loc: Loc, callee: &Expr, args: &[Expr]) -> EvalResult<Handle> {
        let callee_value = self.eval_expr(callee)?.borrow().clone();
        if !callee_value.is_callable() {
            return Err(RotorError::type_error(
                loc,
                format!("{} is not a function", callee_value.type_name()),
            )
            .into());
        }

        // A method call evaluates its receiver once more to obtain `this`.
        let this = match &callee.data {
            ExprData::Member { object, .. } => self.eval_expr(object)?.borrow().clone(),
            _ => Value::Undefined,
        };

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.eval_expr(arg)?.borrow().clone());
        }

        match callee_value {
            Value::Builtin(b) => {
                let result = (b.func)(self, this, &arg_values).map_err(Signal::Error)?;
                Ok(handle(result))
            }
            Value::Function(f) => self.call_function(&f, arg_values),
            _ => unreachable!("is_callable covers exactly these variants"),
        }
    }

    /// Calls a user closure.
    ///
    /// The call scope is a fresh child of the *captured* scope, not of the
    /// caller's.  Parameters bind pairwise to argument values; extra
    /// arguments are dropped and unbound parameters stay absent, resolving
    /// to undefined through ordinary lookup.  The caller's scope is
    /// restored on every exit path.
    pub(crate) fn call_function(&mut self, f: &JsFunction, args: Vec<Value>) -> EvalResult<Handle> {
        let saved = Rc::clone(&self.scope);
        self.scope = Scope::child(&f.closure);
        for (param, arg) in f.decl.params.iter().zip(args) {
            self.scope.set(param.clone(), handle(arg));
        }
        let result = self.eval_stmts(&f.decl.body.block);
        self.scope = saved;
        match result {
            Ok(()) => Ok(undefined_handle()),
            Err(Signal::Return(value)) => Ok(value),
            Err(other) => Err(other),
        }
    }

    fn eval_object_literal(
        &mut self,
        loc: Loc,
        properties: &[Expr],
        proto: Option<&str>,
    ) -> EvalResult<Handle> {
        let mut map = HashMap::new();
        for pair in properties.chunks(2) {
            let [key_expr, value_expr] = pair else { break };
            let key = self.eval_expr(key_expr)?.borrow().clone();
            let value = self.eval_expr(value_expr)?;
            let key = match key {
                Value::String(s) => s,
                Value::Number(n) => number_to_string(n),
                other => {
                    return Err(RotorError::type_error(
                        loc,
                        format!("{} is not allowed as an object key", other.type_name()),
                    )
                    .into());
                }
            };
            map.insert(key, value);
        }

        let proto = match proto {
            Some(name) => self.scope.get(name),
            None => Rc::clone(&self.object_prototype),
        };
        Ok(handle(Value::Object(Rc::new(RefCell::new(JsObject {
            constructor: None,
            proto: Some(proto),
            properties: map,
        })))))
    }
}
