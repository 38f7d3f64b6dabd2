// Copyright 2026 The Skarn Authors
// SPDX-License-Identifier: Apache-2.0

//! Declaration parsing for Skarn.
//!
//! This module handles everything reached from `name :` / `name ::`:
//! variable declarations, procedure definitions, procedure-pointer
//! declarations, plus compiler directives (`@alias`), struct/enum
//! definitions, and namespaces.
//!
//! Declaration rules enforced here:
//! - Procedures must be global and declared with `::`.
//! - `void` appears only as a procedure return type; `proc` never as a
//!   parameter type.
//! - Parameters cannot be static arrays (pass a pointer instead).
//! - Array lengths are positive; `[]` is an unsized array.
//! - A declaration without an initializer is flagged default-initialized.

use ecow::EcoString;
use tracing::trace;

use crate::analyse::{
    SymbolFlags, SymbolId, SymbolKind, TypeDescriptor, TypeMember, VarType,
};
use crate::ast::{NodeId, NodeKind};
use crate::source_analysis::error::ParseErrorKind;
use crate::source_analysis::{Span, Token, TokenClass, TokenKind};

use super::{ParseResult, Parser};

/// Converts an integer-literal lexeme (decimal, `0x`, `0b`) to its value.
pub(super) fn parse_int_literal(lexeme: &str) -> Option<u64> {
    if let Some(hex) = lexeme.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lexeme.strip_prefix("0b") {
        u64::from_str_radix(bin, 2).ok()
    } else {
        lexeme.parse().ok()
    }
}

impl Parser<'_> {
    // ========================================================================
    // Declarations
    // ========================================================================

    /// Parses a declaration. The current token is the declared name and the
    /// next is `:` or `::`.
    pub(super) fn parse_decl(&mut self) -> ParseResult<NodeId> {
        let name_token = self.current();
        let name = EcoString::from(name_token.lexeme());
        let name_span = name_token.span();
        let line = name_token.line();
        let mut flags = SymbolFlags::NONE;

        self.advance(1);
        match self.current().kind() {
            TokenKind::ColonColon => flags.insert(SymbolFlags::CONSTANT),
            TokenKind::Colon => {}
            _ => return Err(self.error_here(ParseErrorKind::Expected("\":\" or \"::\""))),
        }

        // Global declarations carry the namespace-qualified name; locals
        // stay bare (their scope expires with the enclosing block).
        let global = self.symbols.scope_depth() <= 1;
        if global {
            flags.insert(SymbolFlags::GLOBAL);
        }
        let symbol_name = if global {
            self.qualified(&name)
        } else {
            name.clone()
        };

        if self.symbols.exists_in_current_scope(&symbol_name) {
            return Err(self.error(ParseErrorKind::Redeclaration(name), name_span, line));
        }

        self.advance(1);
        let type_token = self.current();

        if type_token.kind() == TokenKind::KwVoid {
            return Err(self.error_here(ParseErrorKind::VoidOutsideReturn));
        }

        if type_token.kind() == TokenKind::KwProc {
            let Some(proc_id) = self.symbols.create_symbol(
                symbol_name,
                name_span,
                line,
                SymbolKind::Procedure,
                flags,
            ) else {
                return Err(self.error(ParseErrorKind::Redeclaration(name), name_span, line));
            };
            trace!(name = %name, "procedure declaration");

            if self.peek(1).kind() == TokenKind::Caret {
                self.symbols
                    .symbol_mut(proc_id)
                    .flags
                    .insert(SymbolFlags::POINTER);
                return self.parse_proc_ptr(proc_id, name_span, line);
            }
            return self.parse_procdecl(proc_id, name_span, line);
        }

        // A variable's type position holds a primitive type or an alias name.
        if type_token.class() != TokenClass::TypeIdentifier
            && !(type_token.kind() == TokenKind::Identifier
                && self.resolve_alias(type_token.lexeme()).is_some())
        {
            return Err(self.error_here(ParseErrorKind::Expected("type identifier")));
        }

        let Some(var_id) = self.symbols.create_symbol(
            symbol_name,
            name_span,
            line,
            SymbolKind::Variable,
            flags,
        ) else {
            return Err(self.error(ParseErrorKind::Redeclaration(name), name_span, line));
        };
        self.parse_vardecl(var_id, name_span, line)
    }

    /// Parses the tail of a variable declaration: type, pointer markers,
    /// array suffix, optional initializer.
    fn parse_vardecl(&mut self, var: SymbolId, name_span: Span, line: u32) -> ParseResult<NodeId> {
        let (descriptor, type_span) = self.parse_type()?;

        {
            let symbol = self.symbols.symbol_mut(var);
            if descriptor.pointer_depth > 0 {
                symbol.flags.insert(SymbolFlags::POINTER);
            }
            if descriptor.is_array {
                symbol.flags.insert(SymbolFlags::ARRAY);
            }
            if let Some(data) = symbol.as_variable_mut() {
                data.var_type = Some(descriptor.base);
                data.pointer_depth = descriptor.pointer_depth;
                data.array_length = descriptor.array_length;
            }
        }

        let ident = self
            .ast
            .alloc(NodeKind::Identifier { symbol: var }, name_span, line);

        if self.current().kind() == TokenKind::Assign {
            let eq = self.current();
            self.advance(1);
            let init = self.parse_expression(true, false)?;
            if !self.ast.kind(init).is_valid_subexpression() {
                return Err(self.error(
                    ParseErrorKind::InvalidSubexpression,
                    eq.span(),
                    eq.line(),
                ));
            }
            let span = name_span.merge(self.ast.node(init).span);
            let node = self.ast.alloc(
                NodeKind::VarDecl {
                    name: ident,
                    init: Some(init),
                },
                span,
                line,
            );
            self.ast.set_parent(ident, node);
            self.ast.set_parent(init, node);
            return Ok(node);
        }

        self.symbols
            .symbol_mut(var)
            .flags
            .insert(SymbolFlags::DEFAULT_INIT);
        let node = self.ast.alloc(
            NodeKind::VarDecl {
                name: ident,
                init: None,
            },
            name_span.merge(type_span),
            line,
        );
        self.ast.set_parent(ident, node);
        Ok(node)
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Parses a type as written in a declaration: a primitive type or alias
    /// name, `^` pointer markers, and an optional `[N]` / `[]` array suffix.
    pub(super) fn parse_type(&mut self) -> ParseResult<(TypeDescriptor, Span)> {
        let token = self.current();
        let mut span = token.span();

        let mut descriptor = match token.kind() {
            TokenKind::KwVoid => {
                return Err(self.error_here(ParseErrorKind::VoidOutsideReturn));
            }
            TokenKind::Identifier => {
                let Some(alias) = self.resolve_alias(token.lexeme()) else {
                    return Err(self.error_here(ParseErrorKind::UnknownTypeName));
                };
                alias
            }
            kind => match VarType::from_token(kind) {
                Some(base) => TypeDescriptor::plain(base),
                None => return Err(self.error_here(ParseErrorKind::Expected("type identifier"))),
            },
        };
        self.advance(1);

        while self.current().kind() == TokenKind::Caret {
            descriptor.pointer_depth = descriptor.pointer_depth.saturating_add(1);
            span = span.merge(self.current().span());
            self.advance(1);
        }

        if self.current().kind() == TokenKind::LeftBracket {
            descriptor.is_array = true;
            self.advance(1);
            if self.current().kind() == TokenKind::IntegerLiteral {
                descriptor.array_length = self.parse_array_length()?;
                self.advance(1);
            }
            let close = self.expect(TokenKind::RightBracket, "\"]\"")?;
            span = span.merge(close.span());
        }

        Ok((descriptor, span))
    }

    /// Converts the current integer literal to an array length, rejecting
    /// zero and values that do not fit.
    fn parse_array_length(&mut self) -> ParseResult<u32> {
        let lexeme = self.current().lexeme();
        let Some(length) = parse_int_literal(lexeme).and_then(|v| u32::try_from(v).ok()) else {
            return Err(self.error_here(ParseErrorKind::InvalidArraySize));
        };
        if length == 0 {
            return Err(self.error_here(ParseErrorKind::ArraySizeZero));
        }
        Ok(length)
    }

    /// Parses the return type after `->`.
    fn parse_return_type(&mut self) -> ParseResult<VarType> {
        let token = self.current();
        match VarType::from_token(token.kind()) {
            Some(ty) => {
                self.advance(1);
                Ok(ty)
            }
            None => Err(self.error_here(ParseErrorKind::UnknownTypeName)),
        }
    }

    // ========================================================================
    // Procedures
    // ========================================================================

    /// Parses one parameter: `name : type` with pointer markers, no arrays,
    /// no `void`, no `proc`.
    fn parse_parameterized_vardecl(&mut self) -> ParseResult<NodeId> {
        let name_token = self.current();
        let name = EcoString::from(name_token.lexeme());
        let name_span = name_token.span();
        let line = name_token.line();
        let mut flags = SymbolFlags::PROC_ARG;

        self.advance(1);
        match self.current().kind() {
            TokenKind::ColonColon => flags.insert(SymbolFlags::CONSTANT),
            TokenKind::Colon => {}
            _ => return Err(self.error_here(ParseErrorKind::Expected("\":\" or \"::\""))),
        }

        self.advance(1);
        let type_token = self.current();
        let mut descriptor = match type_token.kind() {
            TokenKind::KwVoid => {
                return Err(self.error_here(ParseErrorKind::VoidOutsideReturn));
            }
            TokenKind::KwProc => {
                return Err(self.error_here(ParseErrorKind::ProcAsParameter));
            }
            TokenKind::Identifier => {
                let Some(alias) = self.resolve_alias(type_token.lexeme()) else {
                    return Err(self.error_here(ParseErrorKind::UnknownTypeName));
                };
                if alias.is_array {
                    return Err(self.error_here(ParseErrorKind::StaticArrayParameter));
                }
                alias
            }
            kind => match VarType::from_token(kind) {
                Some(base) => TypeDescriptor::plain(base),
                None => return Err(self.error_here(ParseErrorKind::Expected("type identifier"))),
            },
        };
        self.advance(1);

        while self.current().kind() == TokenKind::Caret {
            descriptor.pointer_depth = descriptor.pointer_depth.saturating_add(1);
            self.advance(1);
        }

        if self.current().kind() == TokenKind::LeftBracket {
            return Err(self.error_here(ParseErrorKind::StaticArrayParameter));
        }
        if !matches!(
            self.current().kind(),
            TokenKind::Comma | TokenKind::RightParen
        ) {
            return Err(self.error_here(ParseErrorKind::Expected("\",\" or \")\"")));
        }

        if descriptor.pointer_depth > 0 {
            flags.insert(SymbolFlags::POINTER);
        }
        let Some(var_id) = self.symbols.create_symbol(
            name.clone(),
            name_span,
            line,
            SymbolKind::Variable,
            flags,
        ) else {
            return Err(self.error(ParseErrorKind::Redeclaration(name), name_span, line));
        };
        if let Some(data) = self.symbols.symbol_mut(var_id).as_variable_mut() {
            data.var_type = Some(descriptor.base);
            data.pointer_depth = descriptor.pointer_depth;
            data.array_length = 0;
        }

        let ident = self
            .ast
            .alloc(NodeKind::Identifier { symbol: var_id }, name_span, line);
        let node = self.ast.alloc(
            NodeKind::VarDecl {
                name: ident,
                init: None,
            },
            name_span,
            line,
        );
        self.ast.set_parent(ident, node);
        Ok(node)
    }

    /// Parses a full procedure definition. The current token is `proc`.
    ///
    /// A fresh scope covers the parameters and the body; it is popped on
    /// every path, success or failure.
    pub(super) fn parse_procdecl(
        &mut self,
        proc_id: SymbolId,
        name_span: Span,
        line: u32,
    ) -> ParseResult<NodeId> {
        let flags = self.symbols.symbol(proc_id).flags;
        if !flags.contains(SymbolFlags::GLOBAL) {
            return Err(self.error_here(ParseErrorKind::ProcedureNotGlobal));
        }
        if !flags.contains(SymbolFlags::CONSTANT) {
            return Err(self.error_here(ParseErrorKind::ProcedureNotConstant));
        }

        self.advance(1);
        if self.current().kind() != TokenKind::LeftParen {
            return Err(self.error_here(ParseErrorKind::Expected("parameter list")));
        }

        self.symbols.push_scope();
        let result = self.parse_procdecl_inner(proc_id, name_span, line);
        self.symbols.pop_scope();
        result
    }

    fn parse_procdecl_inner(
        &mut self,
        proc_id: SymbolId,
        name_span: Span,
        line: u32,
    ) -> ParseResult<NodeId> {
        self.advance(1); // (

        let mut parameters = Vec::new();
        while self.current().kind() != TokenKind::RightParen {
            if self.current().kind().is_eof() {
                return Err(self.error_here(ParseErrorKind::Expected("\")\"")));
            }
            if self.current().kind() != TokenKind::Identifier {
                return Err(self.error_here(ParseErrorKind::Expected("procedure parameter")));
            }
            let parameter = self.parse_parameterized_vardecl()?;
            parameters.push(parameter);
            self.eat(TokenKind::Comma);
        }
        self.advance(1); // )

        if self.current().kind() != TokenKind::Arrow {
            return Err(self.error_here(ParseErrorKind::Expected(
                "procedure return type, e.g. \"-> i32\"",
            )));
        }
        self.advance(1);
        let return_type = self.parse_return_type()?;

        // Record parameter types on the procedure symbol for later lookups.
        let mut parameter_types = Vec::new();
        for &parameter in &parameters {
            if let NodeKind::VarDecl { name, .. } = self.ast.kind(parameter) {
                if let NodeKind::Identifier { symbol } = *self.ast.kind(*name) {
                    if let Some(ty) =
                        self.symbols.symbol(symbol).as_variable().and_then(|v| v.var_type)
                    {
                        parameter_types.push(ty);
                    }
                }
            }
        }
        if let Some(data) = self.symbols.symbol_mut(proc_id).as_procedure_mut() {
            data.return_type = Some(return_type);
            data.parameters = parameter_types;
        }

        if self.current().kind() != TokenKind::LeftBrace {
            return Err(self.error_here(ParseErrorKind::Expected("start of procedure body")));
        }
        self.advance(1);

        let mut body = Vec::new();
        while self.current().kind() != TokenKind::RightBrace {
            if self.current().kind().is_eof() {
                return Err(self.error_here(ParseErrorKind::Expected("\"}\"")));
            }
            let at = self.current();
            let expr = self.parse_expression(false, false)?;
            if matches!(
                self.ast.kind(expr),
                NodeKind::StructDef { .. } | NodeKind::EnumDef { .. } | NodeKind::ProcDecl { .. }
            ) {
                return Err(self.error(
                    ParseErrorKind::IllegalInProcedureBody,
                    at.span(),
                    at.line(),
                ));
            }
            body.push(expr);
        }
        let close = self.current();
        self.advance(1);

        let ident = self
            .ast
            .alloc(NodeKind::Identifier { symbol: proc_id }, name_span, line);
        let parameter_children = parameters.clone();
        let body_children = body.clone();
        let node = self.ast.alloc(
            NodeKind::ProcDecl {
                name: ident,
                parameters,
                body,
            },
            name_span.merge(close.span()),
            line,
        );
        self.ast.set_parent(ident, node);
        self.adopt(node, &parameter_children);
        self.adopt(node, &body_children);
        Ok(node)
    }

    /// Parses a procedure-pointer declaration:
    /// `proc^...(ParamTypes) -> RetType [= initializer]`.
    ///
    /// Produces a [`NodeKind::VarDecl`] over a procedure symbol carrying the
    /// pointer flag. The current token is `proc` and the next is `^`.
    fn parse_proc_ptr(
        &mut self,
        proc_id: SymbolId,
        name_span: Span,
        line: u32,
    ) -> ParseResult<NodeId> {
        self.advance(1);

        let mut pointer_depth: u8 = 0;
        while self.current().kind() == TokenKind::Caret {
            pointer_depth = pointer_depth.saturating_add(1);
            self.advance(1);
        }

        let mut is_array = false;
        let mut array_length: u32 = 0;
        if self.current().kind() == TokenKind::LeftBracket {
            is_array = true;
            self.advance(1);
            if self.current().kind() == TokenKind::IntegerLiteral {
                array_length = self.parse_array_length()?;
                self.advance(1);
            }
            self.expect(TokenKind::RightBracket, "\"]\"")?;
        }

        if self.current().kind() != TokenKind::LeftParen {
            return Err(self.error_here(ParseErrorKind::Expected(
                "parameter type list, e.g. \"(i32, bool)\"",
            )));
        }
        self.advance(1);

        let mut parameter_types = Vec::new();
        while self.current().kind() != TokenKind::RightParen {
            if self.current().kind().is_eof() {
                return Err(self.error_here(ParseErrorKind::Expected("\")\"")));
            }
            let token = self.current();
            match token.kind() {
                TokenKind::KwVoid => {
                    return Err(self.error_here(ParseErrorKind::VoidOutsideReturn));
                }
                TokenKind::KwProc => {
                    return Err(self.error_here(ParseErrorKind::ProcAsParameter));
                }
                kind => match VarType::from_token(kind) {
                    Some(ty) => parameter_types.push(ty),
                    None => {
                        return Err(self.error_here(ParseErrorKind::Expected("type identifier")));
                    }
                },
            }
            self.advance(1);
            self.eat(TokenKind::Comma);
        }
        self.advance(1); // )

        if self.current().kind() != TokenKind::Arrow {
            return Err(self.error_here(ParseErrorKind::Expected(
                "procedure return type, e.g. \"-> i32\"",
            )));
        }
        self.advance(1);
        let return_type = self.parse_return_type()?;

        {
            let symbol = self.symbols.symbol_mut(proc_id);
            if is_array {
                symbol.flags.insert(SymbolFlags::ARRAY);
            }
            if let Some(data) = symbol.as_procedure_mut() {
                data.return_type = Some(return_type);
                data.parameters = parameter_types;
                data.pointer_depth = pointer_depth;
                data.array_length = array_length;
            }
        }

        let ident = self
            .ast
            .alloc(NodeKind::Identifier { symbol: proc_id }, name_span, line);

        if self.current().kind() == TokenKind::Assign {
            let eq = self.current();
            self.advance(1);
            let init = self.parse_expression(true, false)?;
            if !self.ast.kind(init).is_valid_subexpression() {
                return Err(self.error(
                    ParseErrorKind::InvalidSubexpression,
                    eq.span(),
                    eq.line(),
                ));
            }
            let span = name_span.merge(self.ast.node(init).span);
            let node = self.ast.alloc(
                NodeKind::VarDecl {
                    name: ident,
                    init: Some(init),
                },
                span,
                line,
            );
            self.ast.set_parent(ident, node);
            self.ast.set_parent(init, node);
            return Ok(node);
        }

        self.symbols
            .symbol_mut(proc_id)
            .flags
            .insert(SymbolFlags::DEFAULT_INIT);
        let node = self.ast.alloc(
            NodeKind::VarDecl {
                name: ident,
                init: None,
            },
            name_span,
            line,
        );
        self.ast.set_parent(ident, node);
        Ok(node)
    }

    // ========================================================================
    // Compiler directives
    // ========================================================================

    /// Parses `@<name>`. Only the `alias` directive is recognized.
    pub(super) fn parse_directive(&mut self) -> ParseResult<NodeId> {
        let at_token = self.current();
        self.advance(1);
        if self.current().kind() != TokenKind::Identifier {
            return Err(self.error_here(ParseErrorKind::Expected("directive name")));
        }
        if self.current().lexeme() == "alias" {
            return self.parse_type_alias(at_token);
        }
        Err(self.error_here(ParseErrorKind::UnknownDirective))
    }

    /// Parses `@alias Name = <type>` at global scope.
    fn parse_type_alias(&mut self, at_token: Token<'_>) -> ParseResult<NodeId> {
        if self.symbols.scope_depth() > 1 {
            return Err(self.error_here(ParseErrorKind::AliasNotGlobal));
        }

        self.advance(1); // "alias"
        if self.current().kind() != TokenKind::Identifier {
            return Err(self.error_here(ParseErrorKind::Expected("alias name")));
        }
        let name_token = self.current();
        let name = EcoString::from(name_token.lexeme());
        let qualified = self.qualified(&name);
        if self.aliases.exists(&qualified) || self.types.exists(&qualified) {
            return Err(self.error_here(ParseErrorKind::TypeNameClash(name)));
        }

        if self.peek(1).kind() != TokenKind::Assign {
            return Err(self.error_here(ParseErrorKind::Expected("\"=\" after type alias name")));
        }
        self.advance(2);

        let (descriptor, _) = self.parse_type()?;
        let created = self.aliases.create(qualified.clone(), descriptor);
        debug_assert!(created, "collision checked above");
        trace!(name = %qualified, "type alias created");

        Ok(self.ast.alloc(
            NodeKind::TypeAlias { name: qualified },
            at_token.span().merge(name_token.span()),
            at_token.line(),
        ))
    }

    // ========================================================================
    // Type definitions and namespaces
    // ========================================================================

    /// Parses `struct Name { member: type; ... }` at global scope and
    /// registers the members in the type table.
    pub(super) fn parse_structdef(&mut self) -> ParseResult<NodeId> {
        let kw = self.current();
        if self.symbols.scope_depth() > 1 {
            return Err(self.error_here(ParseErrorKind::TypeDefNotGlobal));
        }

        self.advance(1);
        if self.current().kind() != TokenKind::Identifier {
            return Err(self.error_here(ParseErrorKind::Expected("struct name")));
        }
        let name = EcoString::from(self.current().lexeme());
        let qualified = self.qualified(&name);
        if self.types.exists(&qualified) || self.aliases.exists(&qualified) {
            return Err(self.error_here(ParseErrorKind::TypeNameClash(name)));
        }
        self.advance(1);
        self.expect(TokenKind::LeftBrace, "\"{\"")?;

        let mut members = Vec::new();
        while self.current().kind() != TokenKind::RightBrace {
            if self.current().kind().is_eof() {
                return Err(self.error_here(ParseErrorKind::Expected("\"}\"")));
            }
            if self.current().kind() != TokenKind::Identifier {
                return Err(self.error_here(ParseErrorKind::Expected("member name")));
            }
            let member_name = EcoString::from(self.current().lexeme());
            self.advance(1);
            self.expect(TokenKind::Colon, "\":\"")?;
            let (ty, _) = self.parse_type()?;
            self.expect(TokenKind::Semicolon, "\";\"")?;
            members.push(TypeMember {
                name: member_name,
                ty,
            });
        }
        let close = self.current();
        self.advance(1);

        self.types.create(qualified.clone(), members);
        Ok(self.ast.alloc(
            NodeKind::StructDef { name: qualified },
            kw.span().merge(close.span()),
            kw.line(),
        ))
    }

    /// Parses `enum Name { Variant, ... }` at global scope.
    pub(super) fn parse_enumdef(&mut self) -> ParseResult<NodeId> {
        let kw = self.current();
        if self.symbols.scope_depth() > 1 {
            return Err(self.error_here(ParseErrorKind::TypeDefNotGlobal));
        }

        self.advance(1);
        if self.current().kind() != TokenKind::Identifier {
            return Err(self.error_here(ParseErrorKind::Expected("enum name")));
        }
        let name = EcoString::from(self.current().lexeme());
        let qualified = self.qualified(&name);
        if self.types.exists(&qualified) || self.aliases.exists(&qualified) {
            return Err(self.error_here(ParseErrorKind::TypeNameClash(name)));
        }
        self.advance(1);
        self.expect(TokenKind::LeftBrace, "\"{\"")?;

        let mut members = Vec::new();
        while self.current().kind() != TokenKind::RightBrace {
            if self.current().kind().is_eof() {
                return Err(self.error_here(ParseErrorKind::Expected("\"}\"")));
            }
            if self.current().kind() != TokenKind::Identifier {
                return Err(self.error_here(ParseErrorKind::Expected("variant name")));
            }
            members.push(TypeMember {
                name: EcoString::from(self.current().lexeme()),
                ty: TypeDescriptor::plain(VarType::I64),
            });
            self.advance(1);
            self.eat(TokenKind::Comma);
        }
        let close = self.current();
        self.advance(1);

        self.types.create(qualified.clone(), members);
        Ok(self.ast.alloc(
            NodeKind::EnumDef { name: qualified },
            kw.span().merge(close.span()),
            kw.line(),
        ))
    }

    /// Parses `namespace Name { declarations }` at global scope.
    ///
    /// Members are ordinary global declarations whose names are qualified
    /// with the namespace path; the segment is popped on every path.
    pub(super) fn parse_namespace(&mut self) -> ParseResult<NodeId> {
        let kw = self.current();
        if self.symbols.scope_depth() > 1 {
            return Err(self.error_here(ParseErrorKind::NamespaceNotGlobal));
        }

        self.advance(1);
        if self.current().kind() != TokenKind::Identifier {
            return Err(self.error_here(ParseErrorKind::Expected("namespace name")));
        }
        let segment = EcoString::from(self.current().lexeme());
        let qualified = self.qualified(&segment);
        self.advance(1);
        self.expect(TokenKind::LeftBrace, "\"{\"")?;

        self.namespaces.push(segment);
        let result = self.parse_namespace_members();
        self.namespaces.pop();
        let members = result?;

        let close = self.current();
        self.advance(1);

        let children = members.clone();
        let node = self.ast.alloc(
            NodeKind::NamespaceDef {
                name: qualified,
                members,
            },
            kw.span().merge(close.span()),
            kw.line(),
        );
        self.adopt(node, &children);
        Ok(node)
    }

    fn parse_namespace_members(&mut self) -> ParseResult<Vec<NodeId>> {
        let mut members = Vec::new();
        while self.current().kind() != TokenKind::RightBrace {
            if self.current().kind().is_eof() {
                return Err(self.error_here(ParseErrorKind::Expected("\"}\"")));
            }
            let at = self.current();
            let member = self.parse_expression(false, false)?;
            if !self.ast.kind(member).is_valid_toplevel() {
                return Err(self.error(
                    ParseErrorKind::IllegalAtTopLevel,
                    at.span(),
                    at.line(),
                ));
            }
            members.push(member);
        }
        Ok(members)
    }
}
