// Copyright 2026 The Skarn Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the Skarn front-end.
//!
//! Errors carry source locations ([`Span`]) for precise diagnostics and
//! integrate with [`miette`] for error reporting. The parse stops at the
//! first error; everything collected up to that point is returned to the
//! caller alongside the partial result.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use super::Span;

/// Marker returned by parser internals once a diagnostic has been recorded.
///
/// Carrying no data keeps the `?`-propagation cheap; the error itself
/// already lives in the parser's diagnostic sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ErrorReported;

/// A lexical error encountered during tokenization.
///
/// The lexer records these while producing an [`Illegal`] token so the
/// parser can keep driving the token stream; they surface in the final
/// diagnostic list.
///
/// [`Illegal`]: super::TokenKind::Illegal
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct LexError {
    /// The kind of lexical error.
    #[source]
    pub kind: LexErrorKind,
    /// The source location of the error.
    #[label("here")]
    pub span: Span,
    /// The 1-based line the error starts on.
    pub line: u32,
}

impl LexError {
    /// Creates a new lexical error.
    #[must_use]
    pub fn new(kind: LexErrorKind, span: Span, line: u32) -> Self {
        Self { kind, span, line }
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A string literal ran to the end of the buffer without closing.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A character literal was malformed (`'ab'`, unclosed quote).
    #[error("invalid character literal")]
    InvalidCharacterLiteral,

    /// A byte with no assigned meaning appeared outside any literal.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
}

/// A parse error.
///
/// Reported with the source position and line of the offending token, or a
/// caller-supplied position for nested contexts.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct ParseError {
    /// The kind of parse error.
    #[source]
    pub kind: ParseErrorKind,
    /// The source location of the error.
    #[label("here")]
    pub span: Span,
    /// The 1-based line the error starts on.
    pub line: u32,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span, line: u32) -> Self {
        Self { kind, span, line }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A lexical error surfaced through the token stream.
    #[error(transparent)]
    Lex(LexErrorKind),

    /// The current token cannot open an expression.
    #[error("invalid token at the beginning of an expression")]
    InvalidExpressionStart,

    /// An expression was parsed but the following token fits no rule.
    #[error("unexpected token following expression")]
    UnexpectedAfterExpression,

    /// `;` or `,` appeared inside a parenthesized expression.
    #[error("unexpected token inside of parenthesized expression")]
    TerminatorInsideParens,

    /// A specific token or construct was required.
    #[error("expected {0}")]
    Expected(&'static str),

    /// This node kind cannot be used as a component of a larger expression.
    #[error("invalid subexpression in this position")]
    InvalidSubexpression,

    /// A keyword appeared where its construct is not allowed.
    #[error("this keyword is not allowed here")]
    KeywordNotAllowed,

    /// An identifier did not resolve in any enclosing scope.
    #[error("symbol \"{0}\" does not exist in this scope")]
    UnknownSymbol(EcoString),

    /// A name was declared twice in the same scope.
    #[error("symbol redeclaration, \"{0}\" already exists at the current scope")]
    Redeclaration(EcoString),

    /// A call target resolved to a non-procedure symbol.
    #[error("attempt to call \"{0}\", which is not a procedure")]
    CallNotProcedure(EcoString),

    /// A procedure was declared below global scope.
    #[error("declaration of procedure at non-global scope")]
    ProcedureNotGlobal,

    /// A procedure was declared with `:` instead of `::`.
    #[error("procedures must be declared as constant, using \"::\"")]
    ProcedureNotConstant,

    /// `void` used anywhere but a procedure return type.
    #[error("\"void\" can only be used as a procedure return type")]
    VoidOutsideReturn,

    /// `proc` used as a parameter type.
    #[error("procedures cannot be used as procedure parameters")]
    ProcAsParameter,

    /// A static array type in parameter position.
    #[error("static arrays cannot be used as parameters, pass a pointer instead")]
    StaticArrayParameter,

    /// The type position held a name that is neither primitive nor alias.
    #[error("unrecognized type identifier")]
    UnknownTypeName,

    /// An array was declared with length zero.
    #[error("array length cannot be 0")]
    ArraySizeZero,

    /// The array size literal did not convert to an integer.
    #[error("array size must be a valid non-negative integer literal")]
    InvalidArraySize,

    /// A construct that may not appear inside a procedure body.
    #[error("illegal expression inside of procedure body")]
    IllegalInProcedureBody,

    /// A construct that may not appear at the top level.
    #[error("this is not allowed at global scope")]
    IllegalAtTopLevel,

    /// A string or character literal held an unknown escape sequence.
    #[error("literal contains one or more invalid escaped characters")]
    InvalidEscape,

    /// `@alias` below global scope.
    #[error("type alias definition at non-global scope")]
    AliasNotGlobal,

    /// A struct or enum definition below global scope.
    #[error("type definition at non-global scope")]
    TypeDefNotGlobal,

    /// A namespace definition below global scope.
    #[error("namespace definition at non-global scope")]
    NamespaceNotGlobal,

    /// A type or alias name was defined twice.
    #[error("type or type alias \"{0}\" already exists within this namespace")]
    TypeNameClash(EcoString),

    /// An `@` directive the compiler does not recognize.
    #[error("invalid compiler directive")]
    UnknownDirective,

    /// The left side of `=` was not an lvalue.
    #[error("invalid assignment target")]
    InvalidAssignTarget,

    /// Expression nesting exceeded the parser's depth cap.
    #[error("expression nesting is too deep")]
    NestingTooDeep,
}
