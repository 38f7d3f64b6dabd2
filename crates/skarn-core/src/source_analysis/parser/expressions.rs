// Copyright 2026 The Skarn Authors
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing for Skarn.
//!
//! [`Parser::parse_expression`] is the central routine. It dispatches on the
//! leading token (identifier, parenthesis, brace, literal, keyword, unary
//! operator), then handles suffixes: subscript applications and a binary
//! expression parsed by precedence climbing. Two flags shape the contract:
//!
//! - `subexpression` — the expression is a component of a larger one; return
//!   without requiring a `;`/`,` terminator.
//! - `parse_single` — parse only the primary, no suffixes. Used for unary
//!   operands so they do not absorb a following binary operator.
//!
//! Plain `=` builds an [`Assign`] node (target must be an lvalue); compound
//! assignments stay ordinary [`Binary`] nodes.
//!
//! [`Assign`]: NodeKind::Assign
//! [`Binary`]: NodeKind::Binary

use ecow::EcoString;

use crate::analyse::SymbolKind;
use crate::ast::{LiteralKind, NodeId, NodeKind};
use crate::source_analysis::error::ParseErrorKind;
use crate::source_analysis::{Span, TokenClass, TokenKind};

use super::{binding_power, ParseResult, Parser};

/// Maps an escape-sequence character to the byte it denotes.
pub(super) fn escaped_char(c: char) -> Option<char> {
    let real = match c {
        'n' => '\n',
        'b' => '\u{0008}',
        'a' => '\u{0007}',
        'r' => '\r',
        't' => '\t',
        '0' => '\0',
        '\'' => '\'',
        '"' => '"',
        '\\' => '\\',
        _ => return None,
    };
    Some(real)
}

/// Decodes the escape sequences in a literal's body (quotes already
/// stripped). Returns `None` if any escape is unrecognized or a backslash
/// ends the input.
pub(super) fn unescape(text: &str) -> Option<EcoString> {
    let mut out = EcoString::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(escaped_char(chars.next()?)?);
        } else {
            out.push(c);
        }
    }
    Some(out)
}

impl Parser<'_> {
    // ========================================================================
    // Expression Parsing
    // ========================================================================

    /// Parses any expression.
    ///
    /// Entry point for expression parsing; see the module docs for the
    /// meaning of the two flags. Uses `stacker::maybe_grow` to extend the
    /// stack on the heap when remaining space runs low, and a nesting-depth
    /// guard that turns pathological nesting into a diagnostic.
    pub(super) fn parse_expression(
        &mut self,
        subexpression: bool,
        parse_single: bool,
    ) -> ParseResult<NodeId> {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            self.enter_nesting()?;
            let result = self.parse_expression_inner(subexpression, parse_single);
            self.leave_nesting();
            result
        })
    }

    fn parse_expression_inner(
        &mut self,
        subexpression: bool,
        parse_single: bool,
    ) -> ParseResult<NodeId> {
        let token = self.current();

        let mut expr = match token.kind() {
            TokenKind::Identifier => self.parse_identifier()?,
            TokenKind::LeftParen => self.parse_parenthesized()?,
            TokenKind::LeftBrace => self.parse_braced()?,
            TokenKind::At => self.parse_directive()?,
            _ if token.class() == TokenClass::Literal => self.parse_singleton_literal()?,
            _ if token.class() == TokenClass::Keyword => self.parse_keyword()?,
            _ if token.kind().is_valid_unary() => self.parse_unary()?,
            _ => return Err(self.error_here(ParseErrorKind::InvalidExpressionStart)),
        };

        // Brace-terminated constructs take no suffixes and no terminator.
        if self.ast.kind(expr).never_needs_terminator() {
            return Ok(expr);
        }

        while self.current().kind() == TokenKind::LeftBracket && !parse_single {
            expr = self.parse_subscript(expr)?;
        }

        if self.current().class() == TokenClass::BinaryOperator && !parse_single {
            expr = self.parse_binary(expr)?;
        }

        if subexpression {
            return Ok(expr);
        }

        match self.current().kind() {
            TokenKind::Semicolon | TokenKind::Comma => {
                if self.paren_depth > 0 {
                    return Err(self.error_here(ParseErrorKind::TerminatorInsideParens));
                }
                self.advance(1);
                Ok(expr)
            }
            _ => Err(self.error_here(ParseErrorKind::UnexpectedAfterExpression)),
        }
    }

    // ========================================================================
    // Binary expressions (precedence climbing)
    // ========================================================================

    /// Parses the binary suffix of an expression given its left operand.
    fn parse_binary(&mut self, lhs: NodeId) -> ParseResult<NodeId> {
        self.parse_binary_bp(lhs, 0)
    }

    /// The precedence-climbing loop.
    ///
    /// `min_bp` is the minimum left binding power required to keep
    /// consuming operators; recursion with each operator's right binding
    /// power yields left- or right-leaning trees per associativity.
    fn parse_binary_bp(&mut self, mut left: NodeId, min_bp: u8) -> ParseResult<NodeId> {
        loop {
            let token = self.current();
            if token.class() != TokenClass::BinaryOperator {
                break;
            }
            let Some(bp) = binding_power(token.kind()) else {
                break;
            };
            if bp.left < min_bp {
                break;
            }

            let op = token.kind();
            let op_span = token.span();
            let op_line = token.line();
            self.advance(1);

            let rhs_at = self.current();
            let operand = self.parse_operand()?;
            let right = self.parse_binary_bp(operand, bp.right)?;
            if !self.ast.kind(right).is_valid_subexpression() {
                return Err(self.error(
                    ParseErrorKind::InvalidSubexpression,
                    rhs_at.span(),
                    rhs_at.line(),
                ));
            }

            let span = self.ast.node(left).span.merge(self.ast.node(right).span);
            let line = self.ast.node(left).line;

            left = if op == TokenKind::Assign {
                if !matches!(
                    self.ast.kind(left),
                    NodeKind::Identifier { .. } | NodeKind::Subscript { .. }
                ) {
                    return Err(self.error(ParseErrorKind::InvalidAssignTarget, op_span, op_line));
                }
                let node = self.ast.alloc(
                    NodeKind::Assign {
                        target: left,
                        value: right,
                    },
                    span,
                    line,
                );
                self.ast.set_parent(left, node);
                self.ast.set_parent(right, node);
                node
            } else {
                let node = self.ast.alloc(
                    NodeKind::Binary {
                        op,
                        lhs: left,
                        rhs: right,
                    },
                    span,
                    line,
                );
                self.ast.set_parent(left, node);
                self.ast.set_parent(right, node);
                node
            };
        }
        Ok(left)
    }

    /// Parses one operand of a binary expression: a primary plus any
    /// subscript applications, but no binary operators.
    fn parse_operand(&mut self) -> ParseResult<NodeId> {
        let mut expr = self.parse_expression(true, true)?;
        while self.current().kind() == TokenKind::LeftBracket {
            if !self.ast.kind(expr).is_valid_subexpression() {
                break;
            }
            expr = self.parse_subscript(expr)?;
        }
        Ok(expr)
    }

    // ========================================================================
    // Primaries
    // ========================================================================

    /// Parses an identifier in expression position.
    ///
    /// Dispatch: `name :` / `name ::` starts a declaration, `name(` a call;
    /// anything else is a reference that must resolve in an enclosing scope.
    /// References and calls may be namespace-qualified with `\`.
    fn parse_identifier(&mut self) -> ParseResult<NodeId> {
        if matches!(
            self.peek(1).kind(),
            TokenKind::Colon | TokenKind::ColonColon
        ) {
            return self.parse_decl();
        }

        let first = self.current();
        let (name, span) = self.qualified_name()?;

        if self.current().kind() == TokenKind::LeftParen {
            return self.parse_call(name, span, first.line());
        }

        let Some(symbol) = self.resolve_name(&name) else {
            return Err(self.error(ParseErrorKind::UnknownSymbol(name), span, first.line()));
        };
        Ok(self
            .ast
            .alloc(NodeKind::Identifier { symbol }, span, first.line()))
    }

    /// Consumes `ident (\ ident)*` and returns the joined name and span.
    pub(super) fn qualified_name(&mut self) -> ParseResult<(EcoString, Span)> {
        let first = self.current();
        let mut name = EcoString::from(first.lexeme());
        let mut span = first.span();
        self.advance(1);

        while self.current().kind() == TokenKind::NamespaceAccess {
            if self.peek(1).kind() != TokenKind::Identifier {
                return Err(self.error_here(ParseErrorKind::Expected(
                    "identifier after namespace access",
                )));
            }
            self.advance(1);
            let segment = self.current();
            name.push('\\');
            name.push_str(segment.lexeme());
            span = span.merge(segment.span());
            self.advance(1);
        }

        Ok((name, span))
    }

    /// Parses a call to an already-named procedure.
    ///
    /// The referenced symbol must exist and be a procedure; arguments are
    /// comma-separated subexpressions.
    fn parse_call(&mut self, name: EcoString, span: Span, line: u32) -> ParseResult<NodeId> {
        let Some(symbol) = self.resolve_name(&name) else {
            return Err(self.error(ParseErrorKind::UnknownSymbol(name), span, line));
        };
        if self.symbols.symbol(symbol).kind() != SymbolKind::Procedure {
            return Err(self.error(ParseErrorKind::CallNotProcedure(name), span, line));
        }
        let callee = self.ast.alloc(NodeKind::Identifier { symbol }, span, line);

        self.advance(1); // (
        self.paren_depth += 1;
        let result = self.parse_call_arguments();
        self.paren_depth -= 1;
        let (arguments, close) = result?;

        let children = arguments.clone();
        let node = self
            .ast
            .alloc(NodeKind::Call { callee, arguments }, span.merge(close), line);
        self.ast.set_parent(callee, node);
        self.adopt(node, &children);
        Ok(node)
    }

    fn parse_call_arguments(&mut self) -> ParseResult<(Vec<NodeId>, Span)> {
        let mut arguments = Vec::new();
        loop {
            if self.current().kind() == TokenKind::RightParen {
                let close = self.current().span();
                self.advance(1);
                return Ok((arguments, close));
            }
            if self.current().kind().is_eof() {
                return Err(self.error_here(ParseErrorKind::Expected("\")\"")));
            }

            let at = self.current();
            let argument = self.parse_expression(true, false)?;
            if !self.ast.kind(argument).is_valid_subexpression() {
                return Err(self.error(
                    ParseErrorKind::InvalidSubexpression,
                    at.span(),
                    at.line(),
                ));
            }
            arguments.push(argument);

            if self.current().kind() == TokenKind::Comma {
                self.advance(1);
            } else if self.current().kind() != TokenKind::RightParen {
                return Err(self.error_here(ParseErrorKind::Expected("\",\" or \")\"")));
            }
        }
    }

    /// Parses `( <subexpression> )`. The parenthesis depth feeds the
    /// terminator diagnostics; the inner expression is returned unwrapped.
    fn parse_parenthesized(&mut self) -> ParseResult<NodeId> {
        self.advance(1); // (
        self.paren_depth += 1;
        let result = self.parse_parenthesized_inner();
        self.paren_depth -= 1;
        result
    }

    fn parse_parenthesized_inner(&mut self) -> ParseResult<NodeId> {
        let at = self.current();
        let expr = self.parse_expression(true, false)?;
        if !self.ast.kind(expr).is_valid_subexpression() {
            return Err(self.error(ParseErrorKind::InvalidSubexpression, at.span(), at.line()));
        }
        if matches!(
            self.current().kind(),
            TokenKind::Semicolon | TokenKind::Comma
        ) {
            return Err(self.error_here(ParseErrorKind::TerminatorInsideParens));
        }
        self.expect(TokenKind::RightParen, "\")\"")?;
        Ok(expr)
    }

    /// Parses `{ <subexpression>, ... }`. Commas between members are
    /// optional; the list may be empty.
    fn parse_braced(&mut self) -> ParseResult<NodeId> {
        let open = self.current();
        self.advance(1);

        let mut members = Vec::new();
        while self.current().kind() != TokenKind::RightBrace {
            if self.current().kind().is_eof() {
                return Err(self.error_here(ParseErrorKind::Expected("\"}\"")));
            }
            let at = self.current();
            let member = self.parse_expression(true, false)?;
            if !self.ast.kind(member).is_valid_subexpression() {
                return Err(self.error(
                    ParseErrorKind::InvalidSubexpression,
                    at.span(),
                    at.line(),
                ));
            }
            members.push(member);
            self.eat(TokenKind::Comma);
        }

        let close = self.current();
        self.advance(1);

        let children = members.clone();
        let node = self.ast.alloc(
            NodeKind::Braced { members },
            open.span().merge(close.span()),
            open.line(),
        );
        self.adopt(node, &children);
        Ok(node)
    }

    /// Parses a literal and decodes its payload.
    ///
    /// String and character literals are unescaped through the escape table;
    /// an unknown escape fails the literal. Numeric and boolean literals
    /// keep their lexeme as the value.
    fn parse_singleton_literal(&mut self) -> ParseResult<NodeId> {
        let token = self.current();
        let (kind, value) = match token.kind() {
            TokenKind::IntegerLiteral => (LiteralKind::Integer, EcoString::from(token.lexeme())),
            TokenKind::FloatLiteral => (LiteralKind::Float, EcoString::from(token.lexeme())),
            TokenKind::BooleanLiteral => (LiteralKind::Boolean, EcoString::from(token.lexeme())),
            TokenKind::StringLiteral | TokenKind::CharacterLiteral => {
                let body = &token.lexeme()[1..token.lexeme().len() - 1];
                let Some(decoded) = unescape(body) else {
                    return Err(self.error_here(ParseErrorKind::InvalidEscape));
                };
                let kind = if token.kind() == TokenKind::StringLiteral {
                    LiteralKind::String
                } else {
                    LiteralKind::Character
                };
                (kind, decoded)
            }
            _ => unreachable!("dispatch guarantees a literal token"),
        };

        self.advance(1);
        Ok(self
            .ast
            .alloc(NodeKind::Literal { kind, value }, token.span(), token.line()))
    }

    /// Parses a unary operator application. The operand is parsed with
    /// `parse_single` set so it does not absorb a following binary operator.
    fn parse_unary(&mut self) -> ParseResult<NodeId> {
        let op_token = self.current();
        self.advance(1);

        let operand = self.parse_expression(true, true)?;
        if !self.ast.kind(operand).is_valid_subexpression() {
            return Err(self.error(
                ParseErrorKind::InvalidSubexpression,
                op_token.span(),
                op_token.line(),
            ));
        }

        let span = op_token.span().merge(self.ast.node(operand).span);
        let node = self.ast.alloc(
            NodeKind::Unary {
                op: op_token.kind(),
                operand,
            },
            span,
            op_token.line(),
        );
        self.ast.set_parent(operand, node);
        Ok(node)
    }

    /// Wraps the current expression in a subscript application.
    fn parse_subscript(&mut self, operand: NodeId) -> ParseResult<NodeId> {
        self.advance(1); // [

        let at = self.current();
        let index = self.parse_expression(true, false)?;
        if !self.ast.kind(index).is_valid_subexpression() {
            return Err(self.error(ParseErrorKind::InvalidSubexpression, at.span(), at.line()));
        }
        let close = self.expect(TokenKind::RightBracket, "\"]\"")?;

        let span = self.ast.node(operand).span.merge(close.span());
        let line = self.ast.node(operand).line;
        let node = self.ast.alloc(NodeKind::Subscript { operand, index }, span, line);
        self.ast.set_parent(operand, node);
        self.ast.set_parent(index, node);
        Ok(node)
    }
}
