//! Parser infrastructure.
//!
//! - [`scanner`] — lexer that converts raw source text into [`scanner::Token`]s.
//! - [`ast`] — Abstract Syntax Tree node definitions.
//! - [`Parser`] — hand-written recursive-descent parser producing a
//!   [`ast::StmtData::Program`] root node.
//!
//! Binary operators parse right-associatively: every precedence level
//! recurses into itself for its right operand, so `1 - 2 - 3` groups as
//! `1 - (2 - 3)`.  This is part of the language definition.

/// Abstract Syntax Tree node types.
pub mod ast;
/// Lexer.
pub mod scanner;

use std::rc::Rc;

use crate::diagnostics::Diagnostics;
use crate::error::{RotorError, RotorResult};
use crate::parser::ast::{
    Body, Branch, ClassDecl, ClassMember, Expr, ExprData, Fixity, FnExpr, ForStmt, Stmt, StmtData,
    VarKind,
};
use crate::parser::scanner::{Loc, Scanner, Token, TokenKind};

/// Recursive-descent parser over a scanned token list.
///
/// Parsing aborts on the first syntax error: the error is rendered through
/// [`Diagnostics`], [`Parser::has_error`] is set, and [`Parser::parse`]
/// returns the program built so far.  Callers must skip evaluation when the
/// error flag is set.
#[derive(Debug)]
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    cur: usize,
    has_error: bool,
}

impl<'src> Parser<'src> {
    /// Scans `source` and prepares a parser over the resulting tokens.
    ///
    /// Lexical errors reported by the scanner carry over into
    /// [`Parser::has_error`].
    pub fn new(source: &'src str) -> Self {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.tokenize();
        Self {
            source,
            tokens,
            cur: 0,
            has_error: scanner.has_error(),
        }
    }

    /// Returns `true` when a lexical or syntax error was reported.
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    // ── Token-cursor helpers ────────────────────────────────────────────────

    fn is_end(&self) -> bool {
        self.cur >= self.tokens.len()
    }

    /// Returns the current token, or a synthesized `Eof` token positioned at
    /// the previous token once the list is exhausted.
    fn cur_token(&self) -> Token {
        match self.tokens.get(self.cur) {
            Some(t) => *t,
            None => Token {
                kind: TokenKind::Eof,
                loc: self.prev_loc(),
            },
        }
    }

    /// Consumes and returns the current token.  A no-op at end of input.
    fn step(&mut self) -> Token {
        let token = self.cur_token();
        if !self.is_end() {
            self.cur += 1;
        }
        token
    }

    /// Consumes the current token if it has kind `expected`, or aborts with
    /// an "expected X, but found Y" diagnostic.
    fn consume(&mut self, expected: TokenKind) -> RotorResult<Token> {
        let token = self.cur_token();
        if token.kind == expected {
            return Ok(self.step());
        }
        Err(RotorError::syntax(
            token.loc,
            format!(
                "expected {expected}, but found {}",
                self.describe(&token)
            ),
        ))
    }

    /// Returns `true` when the current token matches one of `kinds`.
    fn check(&self, kinds: &[TokenKind]) -> bool {
        if self.is_end() {
            return false;
        }
        let kind = self.cur_token().kind;
        kinds.contains(&kind)
    }

    fn prev_loc(&self) -> Loc {
        match self.cur.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(t) => t.loc,
            None => Loc::default(),
        }
    }

    /// Raw source text of `token`.
    fn raw(&self, token: &Token) -> &'src str {
        token.loc.slice(self.source)
    }

    /// Raw text of `token`, readable even at end of input.
    fn describe(&self, token: &Token) -> String {
        if token.kind == TokenKind::Eof {
            return "end of file".to_string();
        }
        self.raw(token).to_string()
    }

    /// Extends `start` through the last consumed token.
    fn loc_from_prev(&self, start: Loc) -> Loc {
        let prev = self.prev_loc();
        Loc {
            offset: start.offset,
            len: (prev.offset + prev.len).saturating_sub(start.offset),
            line: start.line,
        }
    }

    // ── Entry point ─────────────────────────────────────────────────────────

    /// Parses zero or more top-level statements until end of input and
    /// returns the `Program` root node.
    ///
    /// On a syntax error the diagnostic is rendered, [`Parser::has_error`]
    /// is set, and the statements parsed so far are returned.
    pub fn parse(&mut self) -> Stmt {
        let start = Loc {
            line: 1,
            ..Loc::default()
        };
        let mut body = Vec::new();
        while !self.is_end() {
            match self.stmt() {
                Ok(stmt) => body.push(stmt),
                Err(err) => {
                    self.has_error = true;
                    Diagnostics::new(self.source).report(&err);
                    break;
                }
            }
        }
        let loc = if self.cur > 0 {
            self.loc_from_prev(start)
        } else {
            start
        };
        Stmt {
            loc,
            data: StmtData::Program(body),
        }
    }

    // ── Statements ──────────────────────────────────────────────────────────

    fn stmt(&mut self) -> RotorResult<Stmt> {
        let token = self.cur_token();
        let stmt = match token.kind {
            TokenKind::LeftBrace => self.block_stmt()?,
            TokenKind::Class => self.class_stmt()?,
            TokenKind::Let | TokenKind::Const | TokenKind::Var => self.var_decl_stmt()?,
            TokenKind::Semicolon => {
                self.step();
                Stmt {
                    loc: token.loc,
                    data: StmtData::Empty,
                }
            }
            TokenKind::For => self.for_stmt()?,
            TokenKind::If => self.condition_stmt()?,
            TokenKind::Break => {
                self.step();
                Stmt {
                    loc: token.loc,
                    data: StmtData::Break,
                }
            }
            TokenKind::Continue => {
                self.step();
                Stmt {
                    loc: token.loc,
                    data: StmtData::Continue,
                }
            }
            TokenKind::Return => self.return_stmt()?,
            _ => {
                let expr = self.expr()?;
                Stmt {
                    loc: expr.loc,
                    data: StmtData::Expr(Box::new(expr)),
                }
            }
        };

        // One trailing semicolon per statement is consumed when present.
        if self.check(&[TokenKind::Semicolon]) {
            self.step();
        }
        Ok(stmt)
    }

    fn var_decl_stmt(&mut self) -> RotorResult<Stmt> {
        let keyword = self.step();
        let kind = match keyword.kind {
            TokenKind::Let => VarKind::Let,
            TokenKind::Const => VarKind::Const,
            _ => VarKind::Var,
        };
        let name_token = self.consume(TokenKind::Identifier)?;
        let name = self.raw(&name_token).to_string();

        let init = if self.check(&[TokenKind::Equal]) {
            self.step();
            Some(Box::new(self.expr()?))
        } else {
            None
        };

        Ok(Stmt {
            loc: self.loc_from_prev(keyword.loc),
            data: StmtData::VarDecl { name, kind, init },
        })
    }

    fn return_stmt(&mut self) -> RotorResult<Stmt> {
        let start = self.cur_token().loc;
        self.consume(TokenKind::Return)?;
        let expr = self.expr()?;
        Ok(Stmt {
            loc: self.loc_from_prev(start),
            data: StmtData::Return(Box::new(expr)),
        })
    }

    fn block_stmt(&mut self) -> RotorResult<Stmt> {
        let start = self.cur_token().loc;
        let block = self.block()?;
        Ok(Stmt {
            loc: self.loc_from_prev(start),
            data: StmtData::Block(block),
        })
    }

    fn block(&mut self) -> RotorResult<Vec<Stmt>> {
        self.consume(TokenKind::LeftBrace)?;
        let mut stmts = Vec::new();
        while !self.is_end() && self.cur_token().kind != TokenKind::RightBrace {
            stmts.push(self.stmt()?);
        }
        if self.is_end() {
            return Err(RotorError::syntax(
                self.cur_token().loc,
                "missing closing brace",
            ));
        }
        self.consume(TokenKind::RightBrace)?;
        Ok(stmts)
    }

    fn body(&mut self) -> RotorResult<Body> {
        let start = self.cur_token().loc;
        let block = self.block()?;
        Ok(Body {
            loc: self.loc_from_prev(start),
            block,
        })
    }

    fn for_stmt(&mut self) -> RotorResult<Stmt> {
        let for_token = self.consume(TokenKind::For)?;
        self.consume(TokenKind::LeftParen)?;
        // The initializer goes through `stmt`, which consumes its own
        // trailing semicolon.
        let init = self.stmt()?;
        let condition = self.expr()?;
        self.consume(TokenKind::Semicolon)?;
        let reset = self.stmt()?;
        self.consume(TokenKind::RightParen)?;
        let body = self.body()?;
        Ok(Stmt {
            loc: self.loc_from_prev(for_token.loc),
            data: StmtData::For(Box::new(ForStmt {
                init,
                condition,
                reset,
                body,
            })),
        })
    }

    fn condition_stmt(&mut self) -> RotorResult<Stmt> {
        let if_token = self.consume(TokenKind::If)?;
        self.consume(TokenKind::LeftParen)?;
        let condition = self.expr()?;
        self.consume(TokenKind::RightParen)?;
        let body = self.body()?;

        let mut branches = vec![Branch {
            condition: Some(condition),
            body,
        }];
        while self.check(&[TokenKind::Else]) {
            self.step();
            if self.cur_token().kind == TokenKind::If {
                self.step();
                self.consume(TokenKind::LeftParen)?;
                let condition = self.expr()?;
                self.consume(TokenKind::RightParen)?;
                let body = self.body()?;
                branches.push(Branch {
                    condition: Some(condition),
                    body,
                });
            } else {
                let body = self.body()?;
                branches.push(Branch {
                    condition: None,
                    body,
                });
                break;
            }
        }

        Ok(Stmt {
            loc: self.loc_from_prev(if_token.loc),
            data: StmtData::Condition(branches),
        })
    }

    fn class_stmt(&mut self) -> RotorResult<Stmt> {
        let start = self.cur_token().loc;
        self.consume(TokenKind::Class)?;
        let name_token = self.consume(TokenKind::Identifier)?;
        let name = self.raw(&name_token).to_string();

        let super_class = if self.check(&[TokenKind::Extends]) {
            self.step();
            Some(self.expr()?)
        } else {
            None
        };

        self.consume(TokenKind::LeftBrace)?;
        let mut members = Vec::new();
        while !self.is_end() {
            let token = self.cur_token();
            match token.kind {
                TokenKind::RightBrace => break,
                TokenKind::Identifier => {
                    let member_start = token.loc;
                    let key = self.raw(&token).to_string();
                    self.step();
                    match self.cur_token().kind {
                        TokenKind::LeftParen => {
                            let func = self.function_rest(Some(key.clone()))?;
                            members.push(ClassMember::Method {
                                loc: self.loc_from_prev(member_start),
                                key,
                                func: Rc::new(func),
                            });
                        }
                        TokenKind::Equal => {
                            self.step();
                            let init = self.expr()?;
                            members.push(ClassMember::Property {
                                loc: self.loc_from_prev(member_start),
                                key,
                                init: Some(init),
                            });
                            if self.check(&[TokenKind::Semicolon]) {
                                self.step();
                            }
                        }
                        _ => {
                            return Err(RotorError::syntax(
                                self.cur_token().loc,
                                "expected '(' or '=' in class body",
                            ));
                        }
                    }
                }
                _ => {
                    return Err(RotorError::syntax(token.loc, "unexpected token in class body"));
                }
            }
        }
        if self.is_end() {
            return Err(RotorError::syntax(start, "missing closing brace"));
        }
        self.consume(TokenKind::RightBrace)?;

        Ok(Stmt {
            loc: self.loc_from_prev(start),
            data: StmtData::Class(Box::new(ClassDecl {
                name,
                super_class,
                members,
            })),
        })
    }

    // ── Expressions, highest binding last ───────────────────────────────────

    fn expr(&mut self) -> RotorResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> RotorResult<Expr> {
        if self.is_end() {
            return Ok(Expr {
                loc: self.prev_loc(),
                data: ExprData::Empty,
            });
        }
        let start = self.cur_token().loc;
        let mut expr = self.equals()?;
        if self.check(&[TokenKind::Equal]) {
            self.step();
            let value = self.assignment()?;
            expr = Expr {
                loc: self.loc_from_prev(start),
                data: ExprData::Assign {
                    target: Box::new(expr),
                    value: Box::new(value),
                },
            };
        }
        Ok(expr)
    }

    fn equals(&mut self) -> RotorResult<Expr> {
        let mut expr = self.or()?;
        while self.check(&[TokenKind::EqualEqual, TokenKind::EqualEqualEqual]) {
            let op = self.step().kind;
            let right = self.equals()?;
            expr = self.binary(expr, op, right);
        }
        Ok(expr)
    }

    fn or(&mut self) -> RotorResult<Expr> {
        let mut expr = self.and()?;
        while self.check(&[TokenKind::PipePipe]) {
            let op = self.step().kind;
            let right = self.or()?;
            expr = self.binary(expr, op, right);
        }
        Ok(expr)
    }

    fn and(&mut self) -> RotorResult<Expr> {
        let mut expr = self.compare()?;
        while self.check(&[TokenKind::AmpersandAmpersand]) {
            let op = self.step().kind;
            let right = self.and()?;
            expr = self.binary(expr, op, right);
        }
        Ok(expr)
    }

    fn compare(&mut self) -> RotorResult<Expr> {
        let mut expr = self.plus()?;
        while self.check(&[
            TokenKind::Less,
            TokenKind::LessEqual,
            TokenKind::Greater,
            TokenKind::GreaterEqual,
        ]) {
            let op = self.step().kind;
            let right = self.compare()?;
            expr = self.binary(expr, op, right);
        }
        Ok(expr)
    }

    fn plus(&mut self) -> RotorResult<Expr> {
        let mut expr = self.mul()?;
        while self.check(&[TokenKind::Plus, TokenKind::Minus]) {
            let op = self.step().kind;
            let right = self.plus()?;
            expr = self.binary(expr, op, right);
        }
        Ok(expr)
    }

    fn mul(&mut self) -> RotorResult<Expr> {
        let mut expr = self.unary()?;
        while self.check(&[TokenKind::Star, TokenKind::Slash, TokenKind::Percent]) {
            let op = self.step().kind;
            let right = self.mul()?;
            expr = self.binary(expr, op, right);
        }
        Ok(expr)
    }

    fn binary(&mut self, left: Expr, op: TokenKind, right: Expr) -> Expr {
        let loc = self.loc_from_prev(left.loc);
        Expr {
            loc,
            data: ExprData::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    fn unary(&mut self) -> RotorResult<Expr> {
        let token = self.cur_token();
        let start = token.loc;
        let mut expr = match token.kind {
            TokenKind::Bang
            | TokenKind::Minus
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus => {
                self.step();
                let operand = self.unary()?;
                Expr {
                    loc: self.loc_from_prev(start),
                    data: ExprData::Unary {
                        op: token.kind,
                        operand: Box::new(operand),
                        fixity: Fixity::Prefix,
                    },
                }
            }
            _ => self.call()?,
        };

        // Postfix increment / decrement, e.g. `count++`.
        if self.check(&[TokenKind::PlusPlus, TokenKind::MinusMinus]) {
            let op = self.step().kind;
            expr = Expr {
                loc: self.loc_from_prev(start),
                data: ExprData::Unary {
                    op,
                    operand: Box::new(expr),
                    fixity: Fixity::Postfix,
                },
            };
        }
        Ok(expr)
    }

    fn call(&mut self) -> RotorResult<Expr> {
        let mut expr = self.member()?;
        if self.check(&[TokenKind::LeftParen]) {
            self.step();
            let start = expr.loc;
            let mut args = Vec::new();
            while !self.is_end() && self.cur_token().kind != TokenKind::RightParen {
                args.push(self.expr()?);
                if self.check(&[TokenKind::Comma]) {
                    self.step();
                }
            }
            self.consume(TokenKind::RightParen)?;
            expr = Expr {
                loc: self.loc_from_prev(start),
                data: ExprData::Call {
                    callee: Box::new(expr),
                    args,
                },
            };
        }
        Ok(expr)
    }

    fn member(&mut self) -> RotorResult<Expr> {
        let mut expr = self.paren()?;
        while self.check(&[TokenKind::Dot]) {
            self.step();
            let start = expr.loc;
            let property = self.paren()?;
            let name = match property.data {
                ExprData::Identifier(name) => name,
                _ => {
                    return Err(RotorError::syntax(
                        property.loc,
                        "expected property name after '.'",
                    ));
                }
            };
            expr = Expr {
                loc: self.loc_from_prev(start),
                data: ExprData::Member {
                    object: Box::new(expr),
                    property: name,
                },
            };
        }
        Ok(expr)
    }

    fn paren(&mut self) -> RotorResult<Expr> {
        let token = self.cur_token();
        if token.kind == TokenKind::LeftParen {
            self.step();
            let inner = self.assignment()?;
            self.consume(TokenKind::RightParen)?;
            return Ok(Expr {
                loc: self.loc_from_prev(token.loc),
                data: ExprData::Paren(Box::new(inner)),
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> RotorResult<Expr> {
        let token = self.cur_token();
        let loc = token.loc;
        let data = match token.kind {
            TokenKind::NumericLiteral => {
                let raw = self.raw(&token).to_string();
                self.step();
                ExprData::NumberLit(raw)
            }
            TokenKind::True => {
                self.step();
                ExprData::BoolLit(true)
            }
            TokenKind::False => {
                self.step();
                ExprData::BoolLit(false)
            }
            TokenKind::StringLiteral => {
                let text = self.string_contents(&token)?;
                self.step();
                ExprData::StringLit(text)
            }
            TokenKind::Identifier => {
                let name = self.raw(&token).to_string();
                self.step();
                ExprData::Identifier(name)
            }
            TokenKind::Function => {
                self.step();
                let name = if self.cur_token().kind == TokenKind::Identifier {
                    let t = self.step();
                    Some(self.raw(&t).to_string())
                } else {
                    None
                };
                let func = self.function_rest(name)?;
                return Ok(Expr {
                    loc: self.loc_from_prev(loc),
                    data: ExprData::Function(Rc::new(func)),
                });
            }
            TokenKind::LeftBrace => return self.object_literal(),
            TokenKind::LeftBracket => return self.array_literal(),
            _ => {
                self.step();
                return Err(RotorError::syntax(loc, "unexpected token"));
            }
        };

        let mut expr = Expr { loc, data };

        // A single index suffix, e.g. `arr[0]`.
        if self.check(&[TokenKind::LeftBracket]) {
            self.step();
            let index = self.expr()?;
            self.consume(TokenKind::RightBracket)?;
            expr = Expr {
                loc: self.loc_from_prev(loc),
                data: ExprData::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                },
            };
        }
        Ok(expr)
    }

    /// Strips the matching outer quotes off a string-literal token.
    fn string_contents(&self, token: &Token) -> RotorResult<String> {
        let raw = self.raw(token);
        let bytes = raw.as_bytes();
        let quoted = bytes.len() >= 2
            && (bytes[0] == b'"' || bytes[0] == b'\'')
            && bytes[bytes.len() - 1] == bytes[0];
        if !quoted {
            return Err(RotorError::syntax(
                token.loc,
                "string literal should be wrapped in ' or \"",
            ));
        }
        Ok(raw[1..raw.len() - 1].to_string())
    }

    /// Parses a parameter list and body; `function` (and the optional name)
    /// have already been consumed.
    fn function_rest(&mut self, name: Option<String>) -> RotorResult<FnExpr> {
        self.consume(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        while !self.is_end() {
            let token = self.cur_token();
            match token.kind {
                TokenKind::RightParen => break,
                TokenKind::Comma => {
                    self.step();
                    return Err(RotorError::syntax(
                        token.loc,
                        "unexpected ',' before parameter",
                    ));
                }
                TokenKind::Identifier => {
                    params.push(self.raw(&token).to_string());
                    self.step();
                    if self.cur_token().kind == TokenKind::Comma {
                        self.step();
                    }
                }
                _ => {
                    return Err(RotorError::syntax(token.loc, "expected parameter name"));
                }
            }
        }
        if self.is_end() {
            return Err(RotorError::syntax(
                self.cur_token().loc,
                "missing closing parenthesis",
            ));
        }
        self.consume(TokenKind::RightParen)?;
        let body = self.body()?;
        Ok(FnExpr { name, params, body })
    }

    fn object_literal(&mut self) -> RotorResult<Expr> {
        let start = self.cur_token().loc;
        self.step(); // `{`
        let mut properties = Vec::new();
        while !self.is_end() {
            let token = self.cur_token();
            match token.kind {
                TokenKind::RightBrace => break,
                TokenKind::LeftBracket => {
                    // Computed key: `[expr]: value`.
                    self.step();
                    let key = self.expr()?;
                    self.consume(TokenKind::RightBracket)?;
                    self.consume(TokenKind::Colon)?;
                    let value = self.expr()?;
                    properties.push(key);
                    properties.push(value);
                    if self.check(&[TokenKind::Comma]) {
                        self.step();
                    } else {
                        break;
                    }
                }
                TokenKind::Identifier | TokenKind::StringLiteral | TokenKind::NumericLiteral => {
                    let key = match token.kind {
                        TokenKind::StringLiteral => {
                            let text = self.string_contents(&token)?;
                            self.step();
                            Expr {
                                loc: token.loc,
                                data: ExprData::StringLit(text),
                            }
                        }
                        TokenKind::NumericLiteral => {
                            // Numeric keys are coerced to strings when the
                            // literal is evaluated.
                            let raw = self.raw(&token).to_string();
                            self.step();
                            Expr {
                                loc: token.loc,
                                data: ExprData::NumberLit(raw),
                            }
                        }
                        _ => {
                            let name = self.raw(&token).to_string();
                            self.step();
                            Expr {
                                loc: token.loc,
                                data: ExprData::StringLit(name),
                            }
                        }
                    };
                    self.consume(TokenKind::Colon)?;
                    let value = self.expr()?;
                    properties.push(key);
                    properties.push(value);
                    if self.check(&[TokenKind::Comma]) {
                        self.step();
                    } else {
                        break;
                    }
                }
                _ => {
                    return Err(RotorError::syntax(
                        token.loc,
                        "unexpected token in object literal",
                    ));
                }
            }
        }
        self.consume(TokenKind::RightBrace)?;
        Ok(Expr {
            loc: self.loc_from_prev(start),
            data: ExprData::ObjectLit {
                properties,
                proto: None,
            },
        })
    }

    fn array_literal(&mut self) -> RotorResult<Expr> {
        let start = self.cur_token().loc;
        self.step(); // `[`
        let mut elements = Vec::new();
        while !self.is_end() {
            match self.cur_token().kind {
                // Stray commas separate elements but never create holes.
                TokenKind::Comma => {
                    self.step();
                }
                TokenKind::RightBracket => break,
                _ => elements.push(self.expr()?),
            }
        }
        self.consume(TokenKind::RightBracket)?;
        let length = elements.len();
        Ok(Expr {
            loc: self.loc_from_prev(start),
            data: ExprData::ArrayLit { elements, length },
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
