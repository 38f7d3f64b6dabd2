// Copyright 2026 The Skarn Authors
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Skarn source code.
//!
//! The lexer is hand-written and streaming: the parser drives it one token
//! at a time through [`Lexer::current`], [`Lexer::advance`], and
//! [`Lexer::peek`]. Dispatch is on the first byte of a candidate lexeme,
//! with maximal munch inside each operator family (`<` → `<=`, `<<=`, `<<`).
//!
//! # Contract
//!
//! - After [`Lexer::new`], `current()` already holds the first real token.
//! - `advance(n)` produces `n` tokens; whitespace and comments produce none.
//! - End of file is sticky: once produced, further `advance` calls keep
//!   producing it at the same position.
//! - `peek(n)` returns the token `advance(n)` would make current, without
//!   observable side effects (cursor, line counter, and recorded errors are
//!   all restored).
//!
//! Malformed input (unterminated string, stray byte) produces an
//! [`TokenKind::Illegal`] token and records a [`LexError`]; the parser stops
//! when it reaches the illegal token.

use super::error::{LexError, LexErrorKind};
use super::token::lookup_keyword;
use super::{Span, Token, TokenKind};

/// A streaming lexer over a complete in-memory source buffer.
#[derive(Debug)]
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Current byte position in the source.
    index: usize,
    /// 1-based line number at the cursor.
    line: u32,
    /// The most recently produced token.
    current: Token<'src>,
    /// Lexical errors recorded so far.
    errors: Vec<LexError>,
    /// Sticky failure flag, set by the first recorded error.
    failed: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer and primes it so `current()` holds the first token.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Self {
            source,
            index: 0,
            line: 1,
            current: Token::new(TokenKind::Illegal, Span::new(0, 0), 1, ""),
            errors: Vec::new(),
            failed: false,
        };
        lexer.advance(1);
        lexer
    }

    /// Returns the most recently produced token.
    #[must_use]
    pub fn current(&self) -> Token<'src> {
        self.current
    }

    /// Produces `n` more tokens, leaving the last one in `current()`.
    ///
    /// Once end of file has been reached this is a no-op.
    pub fn advance(&mut self, n: u32) {
        for _ in 0..n {
            if self.current.kind().is_eof() {
                return;
            }
            loop {
                if let Some(token) = self.scan_token() {
                    self.current = token;
                    break;
                }
            }
        }
    }

    /// Returns the token that `advance(n)` would make current.
    ///
    /// Realized as a saved-and-restored scan: any errors recorded during the
    /// speculative scan are discarded, so peeking is side-effect free.
    pub fn peek(&mut self, n: u32) -> Token<'src> {
        let saved_index = self.index;
        let saved_line = self.line;
        let saved_current = self.current;
        let saved_errors = self.errors.len();
        let saved_failed = self.failed;

        self.advance(n);
        let token = self.current;

        self.index = saved_index;
        self.line = saved_line;
        self.current = saved_current;
        self.errors.truncate(saved_errors);
        self.failed = saved_failed;
        token
    }

    /// Returns `true` once any lexical error has been recorded.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Returns the lexical errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    /// Consumes the lexer, returning its recorded errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    // === Cursor helpers ===

    fn at_end(&self) -> bool {
        self.index >= self.source.len()
    }

    /// Byte at `index + offset`, or 0 past the end.
    fn byte_at(&self, offset: usize) -> u8 {
        *self.source.as_bytes().get(self.index + offset).unwrap_or(&0)
    }

    fn bump(&mut self, n: usize) {
        self.index += n;
    }

    /// Advances past one whole character, however many bytes it takes.
    /// Keeps the cursor on a UTF-8 boundary when the input is not ASCII.
    fn bump_char(&mut self) {
        let len = self.source[self.index..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        self.index += len;
    }

    fn record_error(&mut self, kind: LexErrorKind, span: Span, line: u32) {
        self.failed = true;
        self.errors.push(LexError::new(kind, span, line));
    }

    /// Builds a token spanning `start..index` on the given line.
    fn make(&self, kind: TokenKind, start: usize, line: u32) -> Token<'src> {
        Token::new(
            kind,
            Span::from(start..self.index),
            line,
            &self.source[start..self.index],
        )
    }

    /// The sticky end-of-file token.
    fn eof(&self) -> Token<'src> {
        let end = self.source.len();
        Token::new(TokenKind::Eof, Span::from(end..end), self.line, "")
    }

    // === Scanning ===

    /// Scans one lexical element. Returns `None` for whitespace, newlines,
    /// and comments (the "no token produced" cases).
    fn scan_token(&mut self) -> Option<Token<'src>> {
        if self.at_end() {
            return Some(self.eof());
        }

        let start = self.index;
        let line = self.line;

        let token = match self.byte_at(0) {
            b' ' | b'\t' | b'\r' => {
                self.bump(1);
                return None;
            }
            b'\n' => {
                self.line += 1;
                self.bump(1);
                return None;
            }

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(start, line),
            b'0'..=b'9' => self.scan_number(start, line),
            b'"' => self.scan_string(start, line),
            b'\'' => self.scan_character(start, line),

            b'/' => match self.byte_at(1) {
                b'/' => {
                    self.skip_line_comment();
                    return None;
                }
                b'*' => {
                    self.skip_block_comment();
                    return None;
                }
                b'=' => self.take(TokenKind::SlashAssign, 2, start, line),
                _ => self.take(TokenKind::Slash, 1, start, line),
            },

            b'-' => match self.byte_at(1) {
                b'>' => self.take(TokenKind::Arrow, 2, start, line),
                b'=' => self.take(TokenKind::MinusAssign, 2, start, line),
                b'-' => self.take(TokenKind::MinusMinus, 2, start, line),
                _ => self.take(TokenKind::Minus, 1, start, line),
            },
            b'+' => match self.byte_at(1) {
                b'=' => self.take(TokenKind::PlusAssign, 2, start, line),
                b'+' => self.take(TokenKind::PlusPlus, 2, start, line),
                _ => self.take(TokenKind::Plus, 1, start, line),
            },
            b'*' => match self.byte_at(1) {
                b'=' => self.take(TokenKind::StarAssign, 2, start, line),
                _ => self.take(TokenKind::Star, 1, start, line),
            },
            b'%' => match self.byte_at(1) {
                b'=' => self.take(TokenKind::PercentAssign, 2, start, line),
                _ => self.take(TokenKind::Percent, 1, start, line),
            },
            b'=' => match self.byte_at(1) {
                b'=' => self.take(TokenKind::EqEq, 2, start, line),
                _ => self.take(TokenKind::Assign, 1, start, line),
            },
            b'<' => match (self.byte_at(1), self.byte_at(2)) {
                (b'=', _) => self.take(TokenKind::LtEq, 2, start, line),
                (b'<', b'=') => self.take(TokenKind::ShlAssign, 3, start, line),
                (b'<', _) => self.take(TokenKind::Shl, 2, start, line),
                _ => self.take(TokenKind::Lt, 1, start, line),
            },
            b'>' => match (self.byte_at(1), self.byte_at(2)) {
                (b'=', _) => self.take(TokenKind::GtEq, 2, start, line),
                (b'>', b'=') => self.take(TokenKind::ShrAssign, 3, start, line),
                (b'>', _) => self.take(TokenKind::Shr, 2, start, line),
                _ => self.take(TokenKind::Gt, 1, start, line),
            },
            b'&' => match self.byte_at(1) {
                b'&' => self.take(TokenKind::AmpAmp, 2, start, line),
                b'=' => self.take(TokenKind::AmpAssign, 2, start, line),
                _ => self.take(TokenKind::Amp, 1, start, line),
            },
            b'|' => match self.byte_at(1) {
                b'|' => self.take(TokenKind::PipePipe, 2, start, line),
                b'=' => self.take(TokenKind::PipeAssign, 2, start, line),
                _ => self.take(TokenKind::Pipe, 1, start, line),
            },
            b'!' => match self.byte_at(1) {
                b'=' => self.take(TokenKind::BangEq, 2, start, line),
                _ => self.take(TokenKind::Bang, 1, start, line),
            },
            b'^' => match self.byte_at(1) {
                b'=' => self.take(TokenKind::CaretAssign, 2, start, line),
                _ => self.take(TokenKind::Caret, 1, start, line),
            },
            b':' => match self.byte_at(1) {
                b':' => self.take(TokenKind::ColonColon, 2, start, line),
                _ => self.take(TokenKind::Colon, 1, start, line),
            },

            b'~' => self.take(TokenKind::Tilde, 1, start, line),
            b'.' => self.take(TokenKind::Dot, 1, start, line),
            b',' => self.take(TokenKind::Comma, 1, start, line),
            b';' => self.take(TokenKind::Semicolon, 1, start, line),
            b'(' => self.take(TokenKind::LeftParen, 1, start, line),
            b')' => self.take(TokenKind::RightParen, 1, start, line),
            b'{' => self.take(TokenKind::LeftBrace, 1, start, line),
            b'}' => self.take(TokenKind::RightBrace, 1, start, line),
            b'[' => self.take(TokenKind::LeftBracket, 1, start, line),
            b']' => self.take(TokenKind::RightBracket, 1, start, line),
            b'?' => self.take(TokenKind::Question, 1, start, line),
            b'@' => self.take(TokenKind::At, 1, start, line),
            b'\\' => self.take(TokenKind::NamespaceAccess, 1, start, line),

            // Reserved characters: tokenized as illegal without a lex error,
            // the parser rejects them in context.
            b'`' | b'#' => self.take(TokenKind::Illegal, 1, start, line),

            _ => {
                let c = self.source[self.index..]
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                self.bump(c.len_utf8());
                let token = self.make(TokenKind::Illegal, start, line);
                self.record_error(LexErrorKind::UnexpectedCharacter(c), token.span(), line);
                token
            }
        };

        Some(token)
    }

    /// Consumes `len` bytes and builds a token of the given kind.
    fn take(&mut self, kind: TokenKind, len: usize, start: usize, line: u32) -> Token<'src> {
        self.bump(len);
        self.make(kind, start, line)
    }

    /// Skips `// ...` to the end of the line (the newline stays unconsumed).
    fn skip_line_comment(&mut self) {
        self.bump(2);
        while !self.at_end() && self.byte_at(0) != b'\n' {
            self.bump(1);
        }
    }

    /// Skips `/* ... */`, counting newlines. An unterminated block comment
    /// consumes the rest of the buffer; the next scan produces end of file.
    fn skip_block_comment(&mut self) {
        self.bump(2);
        while !self.at_end() {
            if self.byte_at(0) == b'*' && self.byte_at(1) == b'/' {
                self.bump(2);
                return;
            }
            if self.byte_at(0) == b'\n' {
                self.line += 1;
            }
            self.bump(1);
        }
    }

    /// Scans `[A-Za-z_][A-Za-z0-9_]*` and classifies it through the keyword
    /// table.
    fn scan_identifier(&mut self, start: usize, line: u32) -> Token<'src> {
        while matches!(self.byte_at(0), b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_') {
            self.bump(1);
        }
        let text = &self.source[start..self.index];
        let kind = lookup_keyword(text).unwrap_or(TokenKind::Identifier);
        self.make(kind, start, line)
    }

    /// Scans an integer (decimal, `0x`, `0b`) or float (`digits.digits`).
    fn scan_number(&mut self, start: usize, line: u32) -> Token<'src> {
        if self.byte_at(0) == b'0' && matches!(self.byte_at(1), b'x' | b'b') {
            let binary = self.byte_at(1) == b'b';
            self.bump(2);
            while if binary {
                matches!(self.byte_at(0), b'0' | b'1')
            } else {
                self.byte_at(0).is_ascii_hexdigit()
            } {
                self.bump(1);
            }
            return self.make(TokenKind::IntegerLiteral, start, line);
        }

        while self.byte_at(0).is_ascii_digit() {
            self.bump(1);
        }

        if self.byte_at(0) == b'.' && self.byte_at(1).is_ascii_digit() {
            self.bump(1);
            while self.byte_at(0).is_ascii_digit() {
                self.bump(1);
            }
            return self.make(TokenKind::FloatLiteral, start, line);
        }

        self.make(TokenKind::IntegerLiteral, start, line)
    }

    /// Scans a string literal. The lexeme keeps its quotes; a backslash
    /// followed by the opening byte is consumed as two bytes and does not
    /// terminate. End of buffer before closure records an error.
    fn scan_string(&mut self, start: usize, line: u32) -> Token<'src> {
        let opening = self.byte_at(0);
        self.bump(1);

        loop {
            if self.at_end() {
                let token = self.make(TokenKind::Illegal, start, line);
                self.record_error(LexErrorKind::UnterminatedString, token.span(), line);
                return token;
            }
            if self.byte_at(0) == opening {
                self.bump(1);
                return self.make(TokenKind::StringLiteral, start, line);
            }
            if self.byte_at(0) == b'\\' && self.byte_at(1) == opening {
                self.bump(2);
            } else {
                if self.byte_at(0) == b'\n' {
                    self.line += 1;
                }
                self.bump(1);
            }
        }
    }

    /// Scans a character literal: `'c'`, `''`, or `'\X'`. Anything else is
    /// illegal.
    fn scan_character(&mut self, start: usize, line: u32) -> Token<'src> {
        self.bump(1);

        if self.byte_at(0) == b'\\' {
            self.bump(1);
            self.bump_char();
        } else if self.byte_at(0) == b'\'' {
            // Empty literal: ''
            self.bump(1);
            return self.make(TokenKind::CharacterLiteral, start, line);
        } else if !self.at_end() {
            self.bump_char();
        }

        if self.at_end() {
            let token = self.make(TokenKind::Illegal, start, line);
            self.record_error(LexErrorKind::InvalidCharacterLiteral, token.span(), line);
            return token;
        }

        if self.byte_at(0) == b'\'' {
            self.bump(1);
            return self.make(TokenKind::CharacterLiteral, start, line);
        }

        let token = self.make(TokenKind::Illegal, start, line);
        self.record_error(LexErrorKind::InvalidCharacterLiteral, token.span(), line);
        token
    }
}
