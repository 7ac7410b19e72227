//! Abstract Syntax Tree node definitions.
//!
//! Every statement and expression is a `{loc, data}` pair: a [`Loc`] span
//! plus one enum variant per node shape.  The evaluator dispatches by
//! pattern-matching on the `data` enums; no visitor indirection is needed.
//!
//! Function bodies ([`FnExpr`]) are shared through [`Rc`] so that closure
//! values and the tree that produced them reference one body.

use std::rc::Rc;

use crate::parser::scanner::{Loc, TokenKind};

/// Source location attached to every AST node.
pub type SourceLocation = Loc;

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// Source location of the entire statement.
    pub loc: Loc,
    /// The statement shape.
    pub data: StmtData,
}

/// The shape of a [`Stmt`].
#[derive(Debug, Clone, PartialEq)]
pub enum StmtData {
    /// The root node: the ordered top-level statements of one program unit.
    Program(Vec<Stmt>),
    /// `{ … }` block statement.
    Block(Vec<Stmt>),
    /// `let / const / var` declaration.
    VarDecl {
        /// Declared name.
        name: String,
        /// Declaration keyword.  Recorded by the parser; the evaluator does
        /// not distinguish the three kinds.
        kind: VarKind,
        /// Initializer, if present.
        init: Option<Box<Expr>>,
    },
    /// Expression statement.
    Expr(Box<Expr>),
    /// `function` declaration in statement position.  The parser currently
    /// reaches function definitions through the expression grammar, so this
    /// variant is produced only by future statement-level parsing.
    FunctionDecl(Rc<FnExpr>),
    /// `return expr;` — the expression may be [`ExprData::Empty`].
    Return(Box<Expr>),
    /// `for (init; condition; reset) { … }`
    For(Box<ForStmt>),
    /// `while (condition) { … }` — declared but not yet produced by the
    /// parser.
    While(Box<WhileStmt>),
    /// An `if / else if / else` chain, flattened into ordered branches.
    Condition(Vec<Branch>),
    /// `break;`
    Break,
    /// `continue;`
    Continue,
    /// A lone `;`.
    Empty,
    /// `class Name extends Super { … }` — parsed, never evaluated.
    Class(Box<ClassDecl>),
}

/// The declaration keyword of a [`StmtData::VarDecl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// `let`
    Let,
    /// `const`
    Const,
    /// `var`
    Var,
}

/// A block with its own location, used as a function, loop, or branch body.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Source location of the `{ … }` region.
    pub loc: Loc,
    /// Statements in the body.
    pub block: Vec<Stmt>,
}

/// `for (init; condition; reset) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    /// Initializer statement, run once in the loop scope.
    pub init: Stmt,
    /// Loop condition, checked before every iteration.
    pub condition: Expr,
    /// Reset statement, run after every iteration.
    pub reset: Stmt,
    /// Loop body.
    pub body: Body,
}

/// `while (condition) body`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    /// Loop condition.
    pub condition: Expr,
    /// Loop body.
    pub body: Body,
}

/// One arm of a [`StmtData::Condition`] chain.  A branch without a
/// condition is the trailing `else`.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    /// Branch condition; `None` for `else`.
    pub condition: Option<Expr>,
    /// Branch body.
    pub body: Body,
}

/// `class Name extends Super { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Class name.
    pub name: String,
    /// The `extends` expression, if present.
    pub super_class: Option<Expr>,
    /// Method and property members, in declaration order.
    pub members: Vec<ClassMember>,
}

/// One member of a [`ClassDecl`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// `name(params) { … }`
    Method {
        /// Source location of the member.
        loc: Loc,
        /// Method name.
        key: String,
        /// Method body.
        func: Rc<FnExpr>,
    },
    /// `name = expr`
    Property {
        /// Source location of the member.
        loc: Loc,
        /// Property name.
        key: String,
        /// Initializer, if present.
        init: Option<Expr>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Source location of the entire expression.
    pub loc: Loc,
    /// The expression shape.
    pub data: ExprData,
}

/// The shape of an [`Expr`].
#[derive(Debug, Clone, PartialEq)]
pub enum ExprData {
    /// Numeric literal, kept as raw source text until evaluation.
    NumberLit(String),
    /// String literal with the outer quotes already stripped.
    StringLit(String),
    /// `true` or `false`.
    BoolLit(bool),
    /// Identifier reference.
    Identifier(String),
    /// Parenthesized expression.
    Paren(Box<Expr>),
    /// Prefix or postfix unary expression.
    Unary {
        /// Operator (a punctuator [`TokenKind`]).
        op: TokenKind,
        /// Operand.
        operand: Box<Expr>,
        /// Whether the operator was written before or after the operand.
        fixity: Fixity,
    },
    /// Binary expression.
    Binary {
        /// Operator (a punctuator [`TokenKind`]).
        op: TokenKind,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// `target = value`
    Assign {
        /// Assignment target; evaluated for its value cell.
        target: Box<Expr>,
        /// Assigned value.
        value: Box<Expr>,
    },
    /// `object.property`
    Member {
        /// The object expression.
        object: Box<Expr>,
        /// Property name.
        property: String,
    },
    /// `target[index]`
    Index {
        /// The indexed expression.
        target: Box<Expr>,
        /// Index expression.
        index: Box<Expr>,
    },
    /// `callee(args…)`
    Call {
        /// Callee expression.
        callee: Box<Expr>,
        /// Arguments in source order.
        args: Vec<Expr>,
    },
    /// `[e0, e1, …]`
    ArrayLit {
        /// Element expressions.
        elements: Vec<Expr>,
        /// Element count recorded at parse time.
        length: usize,
    },
    /// `{ k0: v0, k1: v1, … }`
    ObjectLit {
        /// Interleaved key/value expressions: `k0, v0, k1, v1, …`.
        properties: Vec<Expr>,
        /// Prototype identifier, resolved by name at evaluation time.
        /// The grammar currently never fills this in; fresh objects fall
        /// back to the global object prototype.
        proto: Option<String>,
    },
    /// `function name(params) { … }` in expression position.
    Function(Rc<FnExpr>),
    /// The empty expression; evaluates to undefined.  Produced only when
    /// the parser reaches end-of-input where an expression was expected.
    Empty,
}

/// Whether a unary operator was written before or after its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    /// `++x`
    Prefix,
    /// `x++`
    Postfix,
}

/// A function definition: shared by [`ExprData::Function`],
/// [`StmtData::FunctionDecl`], and every closure value created from it.
#[derive(Debug, Clone, PartialEq)]
pub struct FnExpr {
    /// Function name; anonymous functions have none.
    pub name: Option<String>,
    /// Parameter names in declaration order.
    pub params: Vec<String>,
    /// Function body.
    pub body: Body,
}
