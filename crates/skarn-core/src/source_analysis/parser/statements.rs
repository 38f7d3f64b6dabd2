// Copyright 2026 The Skarn Authors
// SPDX-License-Identifier: Apache-2.0

//! Keyword statement parsing for Skarn.
//!
//! Entry points reached when an expression opens with a keyword: `ret`,
//! `if`/`elif`/`else`, `switch`/`case`, `while`, `for`, plus the global
//! type constructs (`struct`, `enum`, `namespace`) which live in the
//! declarations module. Any other keyword in expression position —
//! `brk`, `cont`, `do`, a stray `case`/`else`/`elif` — is rejected here.
//!
//! Braced statement bodies open a scope, so declarations inside a body
//! shadow enclosing names and expire at the closing brace.

use crate::ast::{BranchArm, NodeId, NodeKind, SwitchCase};
use crate::source_analysis::error::ParseErrorKind;
use crate::source_analysis::{Span, TokenKind};

use super::{ParseResult, Parser};

impl Parser<'_> {
    /// Dispatches a keyword in expression position.
    pub(super) fn parse_keyword(&mut self) -> ParseResult<NodeId> {
        match self.current().kind() {
            TokenKind::KwRet => self.parse_ret(),
            TokenKind::KwIf => self.parse_branch(),
            TokenKind::KwSwitch => self.parse_switch(),
            TokenKind::KwWhile => self.parse_while(),
            TokenKind::KwFor => self.parse_for(),
            TokenKind::KwStruct => self.parse_structdef(),
            TokenKind::KwEnum => self.parse_enumdef(),
            TokenKind::KwNamespace => self.parse_namespace(),
            _ => Err(self.error_here(ParseErrorKind::KeywordNotAllowed)),
        }
    }

    /// Parses `ret;` or `ret <subexpression>;`. The terminator itself is
    /// consumed by the enclosing expression parse.
    fn parse_ret(&mut self) -> ParseResult<NodeId> {
        let kw = self.current();
        self.advance(1);

        if self.current().kind() == TokenKind::Semicolon {
            return Ok(self
                .ast
                .alloc(NodeKind::Ret { value: None }, kw.span(), kw.line()));
        }

        let at = self.current();
        let value = self.parse_expression(true, false)?;
        if !self.ast.kind(value).is_valid_subexpression() {
            return Err(self.error(ParseErrorKind::InvalidSubexpression, at.span(), at.line()));
        }

        let span = kw.span().merge(self.ast.node(value).span);
        let node = self
            .ast
            .alloc(NodeKind::Ret { value: Some(value) }, span, kw.line());
        self.ast.set_parent(value, node);
        Ok(node)
    }

    /// Parses an `if <cond> { .. } elif <cond> { .. } else { .. }` chain.
    fn parse_branch(&mut self) -> ParseResult<NodeId> {
        let kw = self.current();
        let mut arms = Vec::new();
        let mut end = kw.span();

        loop {
            self.advance(1); // if / elif
            let at = self.current();
            let condition = self.parse_expression(true, false)?;
            if !self.ast.kind(condition).is_valid_subexpression() {
                return Err(self.error(
                    ParseErrorKind::InvalidSubexpression,
                    at.span(),
                    at.line(),
                ));
            }
            let (body, close) = self.parse_block()?;
            end = close;
            arms.push(BranchArm { condition, body });

            if self.current().kind() != TokenKind::KwElif {
                break;
            }
        }

        let else_body = if self.current().kind() == TokenKind::KwElse {
            self.advance(1);
            let (body, close) = self.parse_block()?;
            end = close;
            Some(body)
        } else {
            None
        };

        let mut children: Vec<NodeId> = Vec::new();
        for arm in &arms {
            children.push(arm.condition);
            children.extend_from_slice(&arm.body);
        }
        if let Some(body) = &else_body {
            children.extend_from_slice(body);
        }

        let node = self.ast.alloc(
            NodeKind::Branch { arms, else_body },
            kw.span().merge(end),
            kw.line(),
        );
        self.adopt(node, &children);
        Ok(node)
    }

    /// Parses `while <cond> { .. }`.
    fn parse_while(&mut self) -> ParseResult<NodeId> {
        let kw = self.current();
        self.advance(1);

        let at = self.current();
        let condition = self.parse_expression(true, false)?;
        if !self.ast.kind(condition).is_valid_subexpression() {
            return Err(self.error(ParseErrorKind::InvalidSubexpression, at.span(), at.line()));
        }
        let (body, close) = self.parse_block()?;

        let children: Vec<NodeId> = std::iter::once(condition)
            .chain(body.iter().copied())
            .collect();
        let node = self.ast.alloc(
            NodeKind::While { condition, body },
            kw.span().merge(close),
            kw.line(),
        );
        self.adopt(node, &children);
        Ok(node)
    }

    /// Parses `for <init?>; <cond?>; <update?> { .. }`.
    ///
    /// The header gets its own scope so an init declaration is visible in
    /// the body and expires with the loop.
    fn parse_for(&mut self) -> ParseResult<NodeId> {
        let kw = self.current();
        self.advance(1);

        self.symbols.push_scope();
        let result = self.parse_for_inner(kw.span(), kw.line());
        self.symbols.pop_scope();
        result
    }

    fn parse_for_inner(&mut self, kw_span: Span, kw_line: u32) -> ParseResult<NodeId> {
        // Init clause: expression or declaration, terminated by `;`.
        let init = if self.eat(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression(false, false)?)
        };

        // Condition clause, terminated by `;`.
        let condition = if self.eat(TokenKind::Semicolon) {
            None
        } else {
            let at = self.current();
            let condition = self.parse_expression(false, false)?;
            if !self.ast.kind(condition).is_valid_subexpression() {
                return Err(self.error(
                    ParseErrorKind::InvalidSubexpression,
                    at.span(),
                    at.line(),
                ));
            }
            Some(condition)
        };

        // Update clause runs to the body's opening brace.
        let update = if self.current().kind() == TokenKind::LeftBrace {
            None
        } else {
            let at = self.current();
            let update = self.parse_expression(true, false)?;
            if !self.ast.kind(update).is_valid_subexpression() {
                return Err(self.error(
                    ParseErrorKind::InvalidSubexpression,
                    at.span(),
                    at.line(),
                ));
            }
            Some(update)
        };

        let (body, close) = self.parse_block()?;

        let mut children: Vec<NodeId> = Vec::new();
        children.extend(init);
        children.extend(condition);
        children.extend(update);
        children.extend_from_slice(&body);

        let node = self.ast.alloc(
            NodeKind::For {
                init,
                condition,
                update,
                body,
            },
            kw_span.merge(close),
            kw_line,
        );
        self.adopt(node, &children);
        Ok(node)
    }

    /// Parses `switch <operand> { case <value> { .. } ... else { .. } }`.
    fn parse_switch(&mut self) -> ParseResult<NodeId> {
        let kw = self.current();
        self.advance(1);

        let at = self.current();
        let operand = self.parse_expression(true, false)?;
        if !self.ast.kind(operand).is_valid_subexpression() {
            return Err(self.error(ParseErrorKind::InvalidSubexpression, at.span(), at.line()));
        }
        self.expect(TokenKind::LeftBrace, "\"{\"")?;

        let mut cases = Vec::new();
        let mut default = None;
        let close;
        loop {
            match self.current().kind() {
                TokenKind::KwCase => {
                    self.advance(1);
                    let at = self.current();
                    let value = self.parse_expression(true, false)?;
                    if !self.ast.kind(value).is_valid_subexpression() {
                        return Err(self.error(
                            ParseErrorKind::InvalidSubexpression,
                            at.span(),
                            at.line(),
                        ));
                    }
                    let (body, _) = self.parse_block()?;
                    cases.push(SwitchCase { value, body });
                }
                TokenKind::KwElse => {
                    if default.is_some() {
                        return Err(self.error_here(ParseErrorKind::KeywordNotAllowed));
                    }
                    self.advance(1);
                    let (body, _) = self.parse_block()?;
                    default = Some(body);
                }
                TokenKind::RightBrace => {
                    close = self.current().span();
                    self.advance(1);
                    break;
                }
                _ => {
                    return Err(self.error_here(ParseErrorKind::Expected(
                        "\"case\", \"else\", or \"}\"",
                    )));
                }
            }
        }

        let mut children: Vec<NodeId> = vec![operand];
        for case in &cases {
            children.push(case.value);
            children.extend_from_slice(&case.body);
        }
        if let Some(body) = &default {
            children.extend_from_slice(body);
        }

        let node = self.ast.alloc(
            NodeKind::Switch {
                operand,
                cases,
                default,
            },
            kw.span().merge(close),
            kw.line(),
        );
        self.adopt(node, &children);
        Ok(node)
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Parses `{ <statements> }` with its own scope, returning the body and
    /// the span of the closing brace. The scope pops on every path.
    fn parse_block(&mut self) -> ParseResult<(Vec<NodeId>, Span)> {
        if self.current().kind() != TokenKind::LeftBrace {
            return Err(self.error_here(ParseErrorKind::Expected("\"{\"")));
        }
        self.advance(1);

        self.symbols.push_scope();
        let result = self.parse_block_body();
        self.symbols.pop_scope();
        let body = result?;

        let close = self.current().span();
        self.advance(1); // }
        Ok((body, close))
    }

    /// Parses statements until the closing brace, rejecting the node kinds
    /// a procedure body rejects.
    fn parse_block_body(&mut self) -> ParseResult<Vec<NodeId>> {
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
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_err, parse_ok};
    use super::*;
    use crate::ast::LiteralKind;

    /// Returns the body of the first (procedure) declaration.
    fn proc_body(module: &super::super::Module) -> Vec<NodeId> {
        let NodeKind::ProcDecl { body, .. } = module.ast.kind(module.declarations[0]) else {
            panic!("expected a procedure declaration");
        };
        body.clone()
    }

    // ========================================================================
    // ret
    // ========================================================================

    #[test]
    fn ret_without_value() {
        let module = parse_ok("f :: proc() -> void { ret; }");
        let body = proc_body(&module);
        assert!(matches!(
            module.ast.kind(body[0]),
            NodeKind::Ret { value: None }
        ));
    }

    #[test]
    fn ret_with_expression() {
        let module = parse_ok("f :: proc(x: i32) -> i32 { ret x + 1; }");
        let body = proc_body(&module);
        let NodeKind::Ret { value: Some(value) } = *module.ast.kind(body[0]) else {
            panic!("expected a ret with a value");
        };
        assert!(matches!(
            module.ast.kind(value),
            NodeKind::Binary { op: TokenKind::Plus, .. }
        ));
        assert_eq!(module.ast.parent(value), Some(body[0]));
    }

    // ========================================================================
    // if / elif / else
    // ========================================================================

    #[test]
    fn branch_chain_collects_arms() {
        let module = parse_ok(
            "f :: proc(x: i32) -> i32 {
                 if x == 0 { ret 0; }
                 elif x == 1 { ret 1; }
                 else { ret 2; }
             }",
        );
        let body = proc_body(&module);
        let NodeKind::Branch { arms, else_body } = module.ast.kind(body[0]) else {
            panic!("expected a branch");
        };
        assert_eq!(arms.len(), 2);
        assert_eq!(arms[0].body.len(), 1);
        assert_eq!(else_body.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn branch_without_else() {
        let module = parse_ok("f :: proc(x: i32) -> void { if x > 0 { x = 0; } }");
        let body = proc_body(&module);
        assert!(matches!(
            module.ast.kind(body[0]),
            NodeKind::Branch { arms, else_body: None } if arms.len() == 1
        ));
    }

    #[test]
    fn branch_at_toplevel_is_rejected() {
        let error = parse_err("if true { }");
        assert!(matches!(error.kind, ParseErrorKind::IllegalAtTopLevel));
    }

    // ========================================================================
    // while / for
    // ========================================================================

    #[test]
    fn while_loop_with_body() {
        let module = parse_ok(
            "f :: proc() -> void { i : i32 = 0; while i < 10 { i = i + 1; } }",
        );
        let body = proc_body(&module);
        let NodeKind::While { condition, body: loop_body } = module.ast.kind(body[1]) else {
            panic!("expected a while loop");
        };
        assert!(matches!(
            module.ast.kind(*condition),
            NodeKind::Binary { op: TokenKind::Lt, .. }
        ));
        assert_eq!(loop_body.len(), 1);
    }

    #[test]
    fn for_loop_full_header() {
        let module = parse_ok(
            "f :: proc() -> void { for i : i32 = 0; i < 4; i = i + 1 { ret; } }",
        );
        let body = proc_body(&module);
        let NodeKind::For {
            init,
            condition,
            update,
            body: loop_body,
        } = module.ast.kind(body[0])
        else {
            panic!("expected a for loop");
        };
        assert!(matches!(
            module.ast.kind(init.unwrap()),
            NodeKind::VarDecl { .. }
        ));
        assert!(condition.is_some());
        assert!(matches!(
            module.ast.kind(update.unwrap()),
            NodeKind::Assign { .. }
        ));
        assert_eq!(loop_body.len(), 1);
    }

    #[test]
    fn for_loop_empty_header() {
        let module = parse_ok("f :: proc() -> void { for ;; { ret; } }");
        let body = proc_body(&module);
        assert!(matches!(
            module.ast.kind(body[0]),
            NodeKind::For {
                init: None,
                condition: None,
                update: None,
                ..
            }
        ));
    }

    #[test]
    fn for_init_variable_expires_with_the_loop() {
        let error = parse_err(
            "f :: proc() -> void { for i : i32 = 0; i < 4; { ret; } x : i32 = i; }",
        );
        assert!(matches!(error.kind, ParseErrorKind::UnknownSymbol(ref n) if n == "i"));
    }

    // ========================================================================
    // switch
    // ========================================================================

    #[test]
    fn switch_with_cases_and_default() {
        let module = parse_ok(
            "f :: proc(x: i32) -> i32 {
                 switch x {
                     case 0 { ret 10; }
                     case 1 { ret 11; }
                     else { ret 12; }
                 }
             }",
        );
        let body = proc_body(&module);
        let NodeKind::Switch { cases, default, .. } = module.ast.kind(body[0]) else {
            panic!("expected a switch");
        };
        assert_eq!(cases.len(), 2);
        assert!(matches!(
            module.ast.kind(cases[1].value),
            NodeKind::Literal { kind: LiteralKind::Integer, value } if value == "1"
        ));
        assert!(default.is_some());
    }

    #[test]
    fn switch_rejects_duplicate_default() {
        let error = parse_err(
            "f :: proc(x: i32) -> void { switch x { else { } else { } } }",
        );
        assert!(matches!(error.kind, ParseErrorKind::KeywordNotAllowed));
    }

    // ========================================================================
    // Scoping and keyword policy
    // ========================================================================

    #[test]
    fn block_declarations_shadow_and_expire() {
        let module = parse_ok(
            "f :: proc() -> void {
                 x : i32 = 1;
                 if true { x : i32 = 2; }
                 y : i32 = x;
             }",
        );
        assert_eq!(module.symbols.scope_depth(), 0);

        let error = parse_err(
            "f :: proc() -> void { if true { y : i32 = 1; } z : i32 = y; }",
        );
        assert!(matches!(error.kind, ParseErrorKind::UnknownSymbol(ref n) if n == "y"));
    }

    #[test]
    fn reserved_keywords_are_rejected_in_expression_position() {
        for source in [
            "f :: proc() -> void { brk; }",
            "f :: proc() -> void { cont; }",
            "f :: proc() -> void { do { } while true; }",
            "f :: proc() -> void { case 1 { } }",
            "f :: proc() -> void { else { } }",
        ] {
            let error = parse_err(source);
            assert!(
                matches!(error.kind, ParseErrorKind::KeywordNotAllowed),
                "{source} should reject its keyword, got {:?}",
                error.kind
            );
        }
    }

    #[test]
    fn nested_branches_parse() {
        let module = parse_ok(
            "f :: proc(x: i32) -> void { if x > 0 { if x > 1 { ret; } } }",
        );
        let body = proc_body(&module);
        let NodeKind::Branch { arms, .. } = module.ast.kind(body[0]) else {
            panic!("expected a branch");
        };
        assert!(matches!(
            module.ast.kind(arms[0].body[0]),
            NodeKind::Branch { .. }
        ));
    }
}
