// Copyright 2026 The Skarn Authors
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Skarn lexer.
//!
//! These tests use `proptest` to verify lexer invariants over generated
//! inputs:
//!
//! 1. **Lexer never panics** — arbitrary string input always tokenizes
//! 2. **Token spans within input** — every span satisfies `end <= len`
//! 3. **Token spans are ordered** — spans never overlap or go backwards
//! 4. **EOF is sticky** — once produced, `advance` keeps producing it
//! 5. **Lexer is deterministic** — same input, same token stream
//! 6. **Peek equals later advance** — `peek(n)` returns exactly the token
//!    `advance(n)` makes current, field for field
//! 7. **Valid fragments lex cleanly** — known-good inputs produce no
//!    illegal tokens and no errors

use proptest::prelude::*;

use super::lexer::Lexer;
use super::token::{Token, TokenKind};

// ============================================================================
// Generators
// ============================================================================

/// Known-valid single-token fragments that must lex without errors.
const VALID_SINGLE_TOKENS: &[&str] = &[
    "42",
    "0xFF",
    "0b1010",
    "3.14",
    "\"hello\"",
    "'c'",
    "''",
    r"'\n'",
    "true",
    "false",
    "main",
    "_tmp",
    "ret",
    "proc",
    "i32",
    "f64",
    "+",
    "-",
    "->",
    "--",
    "<<=",
    ">>",
    "::",
    ":",
    "^",
    "&&",
    "|=",
    "(",
    ")",
    "[",
    "]",
    "{",
    "}",
    ";",
    ",",
    "@",
    "\\",
];

/// Multi-token fragments that must lex cleanly.
const VALID_FRAGMENTS: &[&str] = &[
    "x :: i32 = 42;",
    "main :: proc() -> i32 { ret 0; }",
    "a : i32 = 1 + 2 * 3;",
    "v :: i32[3] = {1, 2, 3};",
    "@alias Byte = u8;",
    "p : i64^^;",
    "while i < 10 { i = i + 1; }",
    "// comment\nx : bool = true;",
    "/* block\ncomment */ y : f32 = 1.5;",
];

fn valid_single_token() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_SINGLE_TOKENS).prop_map(std::string::ToString::to_string)
}

fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_FRAGMENTS).prop_map(std::string::ToString::to_string)
}

/// Collects the token stream up to and including the first EOF.
///
/// Capped well above anything the generators produce so a lexer bug cannot
/// hang the test run.
fn collect_tokens(source: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = vec![lexer.current()];
    while !lexer.current().kind().is_eof() && tokens.len() < 10_000 {
        lexer.advance(1);
        tokens.push(lexer.current());
    }
    tokens
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

    /// Property 1: the lexer never panics on arbitrary input.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,500}") {
        let _tokens = collect_tokens(&input);
    }

    /// Property 2: every token span stays inside the input.
    #[test]
    fn token_spans_within_input(input in "\\PC{0,500}") {
        let input_len = u32::try_from(input.len()).unwrap_or(u32::MAX);
        for token in collect_tokens(&input) {
            let span = token.span();
            prop_assert!(
                span.start() <= span.end(),
                "token {:?} has start {} > end {} for input {:?}",
                token.kind(),
                span.start(),
                span.end(),
                input,
            );
            prop_assert!(
                span.end() <= input_len,
                "token {:?} span end {} exceeds input length {} for input {:?}",
                token.kind(),
                span.end(),
                input_len,
                input,
            );
        }
    }

    /// Property 3: token spans are ordered and non-overlapping.
    #[test]
    fn token_spans_are_ordered(input in "\\PC{0,500}") {
        let tokens = collect_tokens(&input);
        for window in tokens.windows(2) {
            prop_assert!(
                window[1].span().start() >= window[0].span().end(),
                "overlapping spans {:?} and {:?} for input {:?}",
                window[0].span(),
                window[1].span(),
                input,
            );
        }
    }

    /// Property 4: end of file is sticky at a fixed position.
    #[test]
    fn eof_is_sticky(input in "\\PC{0,200}") {
        let mut lexer = Lexer::new(&input);
        let mut guard = 0;
        while !lexer.current().kind().is_eof() && guard < 10_000 {
            lexer.advance(1);
            guard += 1;
        }
        let eof = lexer.current();
        prop_assert!(eof.kind().is_eof());
        lexer.advance(5);
        prop_assert_eq!(lexer.current(), eof);
    }

    /// Property 5: lexing is deterministic.
    #[test]
    fn lexer_is_deterministic(input in "\\PC{0,200}") {
        let first = collect_tokens(&input);
        let second = collect_tokens(&input);
        prop_assert_eq!(first, second);
    }

    /// Property 6: `peek(n)` equals the token a later `advance(n)` yields,
    /// in every field.
    #[test]
    fn peek_matches_later_advance(input in "\\PC{0,200}", n in 1u32..5) {
        let mut lexer = Lexer::new(&input);
        let peeked = lexer.peek(n);
        let errors_before = lexer.errors().len();
        lexer.advance(n);
        prop_assert_eq!(lexer.current(), peeked);
        // Peeking recorded nothing; only the real advance may add errors.
        prop_assert!(lexer.errors().len() >= errors_before);
    }

    /// Property 7a: valid single tokens produce no illegal tokens.
    #[test]
    fn valid_tokens_lex_cleanly(input in valid_single_token()) {
        let mut lexer = Lexer::new(&input);
        prop_assert!(
            lexer.current().kind() != TokenKind::Illegal,
            "valid input {:?} produced an illegal token",
            input,
        );
        lexer.advance(1);
        prop_assert!(lexer.current().kind().is_eof());
        prop_assert!(lexer.errors().is_empty());
    }

    /// Property 7b: valid fragments produce no illegal tokens or errors.
    #[test]
    fn valid_fragments_lex_cleanly(input in valid_fragment()) {
        for token in collect_tokens(&input) {
            prop_assert!(
                token.kind() != TokenKind::Illegal,
                "valid fragment {:?} produced an illegal token",
                input,
            );
        }
        let lexer = {
            let mut lexer = Lexer::new(&input);
            while !lexer.current().kind().is_eof() {
                lexer.advance(1);
            }
            lexer
        };
        prop_assert!(lexer.errors().is_empty());
    }

    /// Lexemes are exact slices of the source at their spans.
    #[test]
    fn lexemes_match_spans(input in "\\PC{0,300}") {
        for token in collect_tokens(&input) {
            prop_assert_eq!(
                token.lexeme(),
                &input[token.span().as_range()],
                "lexeme does not match span slice for input {:?}",
                input,
            );
        }
    }
}
