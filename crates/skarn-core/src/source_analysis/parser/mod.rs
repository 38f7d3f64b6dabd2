// Copyright 2026 The Skarn Authors
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Skarn source code.
//!
//! The parser drives the lexer one token at a time and does three jobs at
//! once: it builds AST nodes into the arena, it manages lexical scopes, and
//! it resolves identifier references against the symbol table as it parses.
//!
//! # Structure
//!
//! - This module holds the [`Parser`] state, token management, the binding
//!   power table, and the top-level driver.
//! - [`expressions`] holds expression parsing (primaries, unary, binary with
//!   precedence climbing, calls, subscripts, braced initializers).
//! - [`declarations`] holds variable/procedure declarations, procedure
//!   pointers, compiler directives, and type definitions.
//! - [`statements`] holds the keyword statement entry points (`ret`, `if`,
//!   `while`, `for`, `switch`).
//!
//! # Binary Operator Precedence
//!
//! Binary expressions use precedence climbing driven by a binding-power
//! table. Higher binds tighter; every level is left-associative except the
//! assignment family, which is right-associative:
//!
//! | Level | Operators |
//! |-------|-----------|
//! | 130 | `&&` |
//! | 120 | `\|\|` |
//! | 80  | `*` `/` `%` |
//! | 70  | `+` `-` |
//! | 60  | `<<` `>>` |
//! | 50  | `<` `<=` `>` `>=` |
//! | 40  | `==` `!=` |
//! | 30  | `&` |
//! | 20  | `^` |
//! | 10  | `\|` |
//! | 0   | `=` `+=` `-=` `*=` `/=` `%=` `<<=` `>>=` `&=` `\|=` `^=` |
//!
//! # Error Policy
//!
//! The first error stops the parse. Internal methods return
//! `Result<_, ErrorReported>`; the diagnostic has already been pushed into
//! the sink when `ErrorReported` comes back, so errors propagate with `?`
//! and the driver returns everything collected so far.
//!
//! # Usage
//!
//! ```
//! use skarn_core::source_analysis::parse;
//!
//! let (module, errors) = parse("x :: i32 = 42;");
//! assert!(errors.is_empty());
//! assert_eq!(module.declarations.len(), 1);
//! ```

use ecow::EcoString;
use tracing::debug;

use crate::analyse::{SymbolId, SymbolTable, TypeAliasTable, TypeDescriptor, TypeTable};
use crate::ast::{Ast, NodeId};
use crate::source_analysis::error::{ErrorReported, ParseError, ParseErrorKind};
use crate::source_analysis::{Lexer, Span, Token, TokenKind};

mod declarations;
mod expressions;
mod statements;

#[cfg(test)]
mod property_tests;

/// Recursion cap for nested expressions; exceeding it is a diagnostic
/// rather than a stack overflow.
const MAX_NESTING_DEPTH: u32 = 64;

pub(crate) type ParseResult<T> = Result<T, ErrorReported>;

// ============================================================================
// Precedence Climbing for Binary Operator Precedence
// ============================================================================

/// Binding power for binary operators.
///
/// Left and right binding powers differ for associativity:
/// - Left-associative: `left < right`
/// - Right-associative: `left > right`
#[derive(Debug, Clone, Copy)]
pub(super) struct BindingPower {
    /// How tightly this operator binds to its left operand.
    pub(super) left: u8,
    /// How tightly this operator binds to its right operand.
    pub(super) right: u8,
}

impl BindingPower {
    /// Creates a left-associative binding power.
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }

    /// Creates a right-associative binding power.
    const fn right_assoc(precedence: u8) -> Self {
        Self {
            left: precedence + 1,
            right: precedence,
        }
    }
}

/// Gets the binding power for a binary operator token.
///
/// Returns `None` for binary-class tokens that never join two operands
/// (`:` and `::`), which ends the precedence-climbing loop and lets the
/// caller report the token in context.
pub(super) fn binding_power(op: TokenKind) -> Option<BindingPower> {
    use TokenKind::*;
    let bp = match op {
        AmpAmp => BindingPower::left_assoc(130),
        PipePipe => BindingPower::left_assoc(120),
        Star | Slash | Percent => BindingPower::left_assoc(80),
        Plus | Minus => BindingPower::left_assoc(70),
        Shl | Shr => BindingPower::left_assoc(60),
        Lt | LtEq | Gt | GtEq => BindingPower::left_assoc(50),
        EqEq | BangEq => BindingPower::left_assoc(40),
        Amp => BindingPower::left_assoc(30),
        Caret => BindingPower::left_assoc(20),
        Pipe => BindingPower::left_assoc(10),
        Assign | PlusAssign | MinusAssign | StarAssign | SlashAssign | PercentAssign
        | ShlAssign | ShrAssign | AmpAssign | PipeAssign | CaretAssign => {
            BindingPower::right_assoc(0)
        }
        _ => return None,
    };
    Some(bp)
}

/// The result of a successful (or partially successful) parse.
///
/// The AST arena, symbol table, and type tables are returned together so a
/// caller can walk declarations and resolve every `Identifier` leaf by id.
#[derive(Debug)]
pub struct Module {
    /// The AST arena. May contain nodes orphaned by a failed parse.
    pub ast: Ast,
    /// All symbols created during the parse.
    pub symbols: SymbolTable,
    /// User-declared type aliases.
    pub aliases: TypeAliasTable,
    /// User-defined struct and enum types.
    pub types: TypeTable,
    /// Top-level declarations in source order.
    pub declarations: Vec<NodeId>,
}

/// Parses a complete source buffer.
///
/// Always returns a [`Module`]; an empty error list means success. The
/// parse stops at the first error, so the error list holds at most the
/// diagnostics encountered up to that point (a lexical error and the parse
/// error that tripped over it can both be present).
///
/// # Examples
///
/// ```
/// use skarn_core::source_analysis::parse;
///
/// let (module, errors) = parse("");
/// assert!(errors.is_empty());
/// assert!(module.declarations.is_empty());
/// ```
#[must_use]
pub fn parse(source: &str) -> (Module, Vec<ParseError>) {
    let mut parser = Parser::new(source);
    let declarations = parser.parse_toplevel();
    parser.finish(declarations)
}

/// The parser state.
///
/// Exclusively owns the lexer, the AST arena, and all analysis tables for
/// one parse session.
pub(crate) struct Parser<'src> {
    /// The token source.
    lexer: Lexer<'src>,
    /// The AST arena under construction.
    ast: Ast,
    /// Symbol records plus the scope stack.
    symbols: SymbolTable,
    /// `@alias` table.
    aliases: TypeAliasTable,
    /// Struct/enum table.
    types: TypeTable,
    /// Enclosing namespace segments, outermost first.
    namespaces: Vec<EcoString>,
    /// Open parenthesis count, for terminator diagnostics.
    paren_depth: u32,
    /// Expression recursion depth, bounded by [`MAX_NESTING_DEPTH`].
    nesting_depth: u32,
    /// The diagnostic sink.
    diagnostics: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            ast: Ast::new(),
            symbols: SymbolTable::new(),
            aliases: TypeAliasTable::new(),
            types: TypeTable::new(),
            namespaces: Vec::new(),
            paren_depth: 0,
            nesting_depth: 0,
            diagnostics: Vec::new(),
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// The current token.
    fn current(&self) -> Token<'src> {
        self.lexer.current()
    }

    /// Consumes `n` tokens.
    fn advance(&mut self, n: u32) {
        self.lexer.advance(n);
    }

    /// Looks `n` tokens ahead without consuming.
    fn peek(&mut self, n: u32) -> Token<'src> {
        self.lexer.peek(n)
    }

    /// Consumes the current token if it has the given kind.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current().kind() == kind {
            self.advance(1);
            true
        } else {
            false
        }
    }

    /// Requires the current token to have the given kind and consumes it.
    fn expect(&mut self, kind: TokenKind, what: &'static str) -> ParseResult<Token<'src>> {
        let token = self.current();
        if token.kind() == kind {
            self.advance(1);
            Ok(token)
        } else {
            Err(self.error_here(ParseErrorKind::Expected(what)))
        }
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Records a diagnostic at an explicit position.
    fn error(&mut self, kind: ParseErrorKind, span: Span, line: u32) -> ErrorReported {
        self.diagnostics.push(ParseError::new(kind, span, line));
        ErrorReported
    }

    /// Records a diagnostic at the current token.
    fn error_here(&mut self, kind: ParseErrorKind) -> ErrorReported {
        let token = self.current();
        self.error(kind, token.span(), token.line())
    }

    /// Bumps the nesting depth, failing once the cap is exceeded.
    fn enter_nesting(&mut self) -> ParseResult<()> {
        if self.nesting_depth >= MAX_NESTING_DEPTH {
            return Err(self.error_here(ParseErrorKind::NestingTooDeep));
        }
        self.nesting_depth += 1;
        Ok(())
    }

    fn leave_nesting(&mut self) {
        self.nesting_depth -= 1;
    }

    // ========================================================================
    // Namespaces
    // ========================================================================

    /// Joins the first `depth` namespace segments with `name`.
    fn qualify_at(&self, depth: usize, name: &str) -> EcoString {
        let mut out = EcoString::new();
        for segment in &self.namespaces[..depth] {
            out.push_str(segment);
            out.push('\\');
        }
        out.push_str(name);
        out
    }

    /// Qualifies `name` with the full current namespace path.
    fn qualified(&self, name: &str) -> EcoString {
        self.qualify_at(self.namespaces.len(), name)
    }

    /// Resolves a name against the scope stack, trying enclosing namespace
    /// prefixes innermost-first before the bare name.
    fn resolve_name(&self, name: &str) -> Option<SymbolId> {
        (0..=self.namespaces.len())
            .rev()
            .find_map(|depth| self.symbols.lookup_scoped(&self.qualify_at(depth, name)))
    }

    /// Resolves an alias name the same way identifiers resolve.
    fn resolve_alias(&self, name: &str) -> Option<TypeDescriptor> {
        (0..=self.namespaces.len())
            .rev()
            .find_map(|depth| self.aliases.lookup(&self.qualify_at(depth, name)))
    }

    // ========================================================================
    // Node helpers
    // ========================================================================

    /// Links each child to `parent`.
    fn adopt(&mut self, parent: NodeId, children: &[NodeId]) {
        for &child in children {
            self.ast.set_parent(child, parent);
        }
    }

    // ========================================================================
    // Top-level driver
    // ========================================================================

    /// Parses top-level declarations until end of file or the first error.
    ///
    /// Pushes the global scope if no scope is open yet and pops it again on
    /// every path, so the scope stack is balanced even after a failed parse.
    fn parse_toplevel(&mut self) -> Vec<NodeId> {
        if self.symbols.scope_depth() == 0 {
            self.symbols.push_scope();
        }

        let mut declarations = Vec::new();
        while !self.current().kind().is_eof() {
            let at = self.current();
            match self.parse_expression(false, false) {
                Ok(node) => {
                    if !self.ast.kind(node).is_valid_toplevel() {
                        self.error(ParseErrorKind::IllegalAtTopLevel, at.span(), at.line());
                        break;
                    }
                    declarations.push(node);
                }
                Err(ErrorReported) => break,
            }
        }

        self.symbols.pop_scope();
        declarations
    }

    /// Folds lexer errors into the diagnostic list and assembles the module.
    fn finish(self, declarations: Vec<NodeId>) -> (Module, Vec<ParseError>) {
        let mut errors: Vec<ParseError> = self
            .lexer
            .errors()
            .iter()
            .map(|lex| ParseError::new(ParseErrorKind::Lex(lex.kind.clone()), lex.span, lex.line))
            .collect();
        errors.extend(self.diagnostics);
        errors.sort_by_key(|error| error.span.start());

        debug!(
            declarations = declarations.len(),
            symbols = self.symbols.len(),
            errors = errors.len(),
            "parse finished"
        );

        let module = Module {
            ast: self.ast,
            symbols: self.symbols,
            aliases: self.aliases,
            types: self.types,
            declarations,
        };
        (module, errors)
    }
}
