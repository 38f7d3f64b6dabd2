// Copyright 2026 The Skarn Authors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end parse scenarios against the public API.
//!
//! Each test feeds literal source text through [`parse`] and checks the
//! resulting declarations, symbols, and diagnostics.

use skarn_core::analyse::{SymbolFlags, SymbolKind, VarType};
use skarn_core::ast::{LiteralKind, NodeKind};
use skarn_core::source_analysis::{parse, Module, ParseErrorKind};

fn parse_ok(source: &str) -> Module {
    let (module, errors) = parse(source);
    assert!(errors.is_empty(), "expected no errors, got: {errors:?}");
    module
}

#[test]
fn s1_global_constant_with_integer_initializer() {
    let module = parse_ok("x :: i32 = 42;");
    assert_eq!(module.declarations.len(), 1);

    let NodeKind::VarDecl { name, init } = module.ast.kind(module.declarations[0]) else {
        panic!("expected a variable declaration");
    };
    let NodeKind::Identifier { symbol } = *module.ast.kind(*name) else {
        panic!("expected an identifier node");
    };
    let sym = module.symbols.symbol(symbol);
    assert_eq!(sym.name, "x");
    assert!(sym.flags.contains(SymbolFlags::GLOBAL | SymbolFlags::CONSTANT));

    assert!(matches!(
        module.ast.kind(init.unwrap()),
        NodeKind::Literal { kind: LiteralKind::Integer, value } if value == "42"
    ));
}

#[test]
fn s2_minimal_procedure_with_ret() {
    let module = parse_ok("main :: proc() -> i32 { ret 0; }");
    assert_eq!(module.declarations.len(), 1);

    let NodeKind::ProcDecl {
        name,
        parameters,
        body,
    } = module.ast.kind(module.declarations[0])
    else {
        panic!("expected a procedure declaration");
    };
    assert!(parameters.is_empty());
    assert_eq!(body.len(), 1);

    let NodeKind::Identifier { symbol } = *module.ast.kind(*name) else {
        panic!("expected an identifier node");
    };
    let data = module.symbols.symbol(symbol).as_procedure().unwrap();
    assert_eq!(data.return_type, Some(VarType::I32));

    let NodeKind::Ret { value } = module.ast.kind(body[0]) else {
        panic!("expected a ret statement");
    };
    assert!(matches!(
        module.ast.kind(value.unwrap()),
        NodeKind::Literal { kind: LiteralKind::Integer, value } if value == "0"
    ));
}

#[test]
fn s3_precedence_of_addition_and_multiplication() {
    let module = parse_ok("a : i32 = 1 + 2 * 3;");
    let NodeKind::VarDecl { init, .. } = module.ast.kind(module.declarations[0]) else {
        panic!("expected a variable declaration");
    };

    let root = init.unwrap();
    let NodeKind::Binary { op, lhs, rhs } = *module.ast.kind(root) else {
        panic!("expected a binary initializer");
    };
    assert_eq!(op.to_string(), "+");
    assert!(matches!(
        module.ast.kind(lhs),
        NodeKind::Literal { value, .. } if value == "1"
    ));

    let NodeKind::Binary { op, lhs, rhs } = *module.ast.kind(rhs) else {
        panic!("expected multiplication on the right");
    };
    assert_eq!(op.to_string(), "*");
    assert!(matches!(
        module.ast.kind(lhs),
        NodeKind::Literal { value, .. } if value == "2"
    ));
    assert!(matches!(
        module.ast.kind(rhs),
        NodeKind::Literal { value, .. } if value == "3"
    ));
}

#[test]
fn s4_call_resolves_to_procedure_symbol() {
    let module = parse_ok("f :: proc(x: i32) -> i32 { ret x + 1; } y :: i32 = f(41);");
    assert_eq!(module.declarations.len(), 2);

    let NodeKind::VarDecl { init, .. } = module.ast.kind(module.declarations[1]) else {
        panic!("expected a variable declaration");
    };
    let NodeKind::Call { callee, arguments } = module.ast.kind(init.unwrap()) else {
        panic!("expected a call initializer");
    };
    let NodeKind::Identifier { symbol } = *module.ast.kind(*callee) else {
        panic!("expected an identifier callee");
    };

    let sym = module.symbols.symbol(symbol);
    assert_eq!(sym.name, "f");
    assert_eq!(sym.kind(), SymbolKind::Procedure);
    assert_eq!(
        sym.as_procedure().unwrap().parameters,
        vec![VarType::I32]
    );

    assert_eq!(arguments.len(), 1);
    assert!(matches!(
        module.ast.kind(arguments[0]),
        NodeKind::Literal { value, .. } if value == "41"
    ));
}

#[test]
fn s5_redeclaration_errors_at_the_second_name() {
    let (_module, errors) = parse("x :: i32 = 1; x :: i32 = 2;");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0].kind, ParseErrorKind::Redeclaration(ref n) if n == "x"));
    // Position of the second `x`.
    assert_eq!(errors[0].span.start(), 14);
    assert_eq!(errors[0].line, 1);
}

#[test]
fn s6_alias_declares_and_resolves() {
    let module = parse_ok("@alias Byte = u8; b :: Byte = 0;");
    assert!(module.aliases.exists("Byte"));
    assert_eq!(module.aliases.lookup("Byte").unwrap().base, VarType::U8);

    let sym = module
        .symbols
        .iter()
        .find(|s| s.name == "b")
        .expect("b should be declared");
    assert_eq!(sym.as_variable().unwrap().var_type, Some(VarType::U8));
}

// ============================================================================
// Boundary behaviors
// ============================================================================

#[test]
fn empty_source_is_success_with_no_declarations() {
    let module = parse_ok("");
    assert!(module.declarations.is_empty());
    assert!(module.symbols.is_empty());
    assert_eq!(module.symbols.scope_depth(), 0);
}

#[test]
fn unterminated_block_comment_is_silent_eof() {
    let module = parse_ok("x :: i32 = 1; /* runs to the end");
    assert_eq!(module.declarations.len(), 1);
}

#[test]
fn unterminated_string_is_an_error() {
    let (module, errors) = parse("s :: u8 = \"never closed");
    assert!(module.declarations.is_empty());
    assert!(!errors.is_empty());
}

#[test]
fn character_literal_boundaries() {
    // Valid rows.
    for source in ["c :: u8 = 'x';", "c :: u8 = '';", r"c :: u8 = '\n';", r"c :: u8 = '\'';"] {
        let (_module, errors) = parse(source);
        assert!(errors.is_empty(), "{source} should parse, got: {errors:?}");
    }

    // 'ab' is illegal.
    let (_module, errors) = parse("c :: u8 = 'ab';");
    assert!(!errors.is_empty());
}

#[test]
fn multi_line_programs_report_line_numbers() {
    let (_module, errors) = parse("x :: i32 = 1;\ny :: i32 = 1;\nx :: i32 = 2;\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 3);
}

#[test]
fn first_error_stops_the_parse() {
    // Both statements are bad; only the first is reported.
    let (_module, errors) = parse("x :: i32 = missing; y :: i32 = also_missing;");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0].kind, ParseErrorKind::UnknownSymbol(ref n) if n == "missing"));
}

#[test]
fn committed_declarations_survive_a_later_error() {
    let (module, errors) = parse("x :: i32 = 1; y :: i32 = oops;");
    assert!(!errors.is_empty());
    assert_eq!(module.declarations.len(), 1);
    assert!(module.symbols.iter().any(|s| s.name == "x"));
}

#[test]
fn larger_program_parses_end_to_end() {
    let module = parse_ok(
        "// vector math
         @alias Scalar = f64;

         namespace vec {
             scale :: Scalar = 2.0;
         }

         length_squared :: proc(x: f64, y: f64) -> f64 {
             ret x * x + y * y;
         }

         main :: proc() -> i32 {
             l : f64 = length_squared(3.0, 4.0);
             if l > 24.0 { ret 1; }
             ret 0;
         }",
    );
    assert_eq!(module.declarations.len(), 4);
    assert!(module.aliases.exists("Scalar"));
    assert!(module.symbols.iter().any(|s| s.name == "vec\\scale"));
}
