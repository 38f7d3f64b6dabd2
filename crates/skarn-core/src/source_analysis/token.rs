// Copyright 2026 The Skarn Authors
// SPDX-License-Identifier: Apache-2.0

//! Token types for Skarn lexical analysis.
//!
//! This module defines the closed set of tokens produced by the lexer. Each
//! token carries its [`TokenKind`], a coarse [`TokenClass`] used by the
//! parser for position-independent dispatch ("is this a unary operator?",
//! "is this a type identifier?"), its [`Span`], the 1-based line number of
//! its first byte, and a lexeme borrowed from the source buffer.
//!
//! Tokens are `Copy`: the lexeme is a `&str` slice of the source, so a token
//! lives no longer than the buffer it was scanned from.

use super::Span;

/// The kind of token.
///
/// This enum is the closed set of syntactic elements in Skarn source. It
/// carries no payload; the token's text is available through
/// [`Token::lexeme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Special ===
    /// A token the lexer could not form (reserved character, unterminated
    /// literal). The parser reports these when it reaches them.
    Illegal,
    /// End of file. Sticky: once produced, `advance` keeps producing it.
    Eof,

    // === Names and literals ===
    /// An identifier: `main`, `buf_len`, `_tmp`
    Identifier,
    /// An integer literal: `42`, `0xFF`, `0b1010`
    IntegerLiteral,
    /// A floating-point literal: `3.14`
    FloatLiteral,
    /// A string literal including its quotes: `"hello\n"`
    StringLiteral,
    /// A character literal including its quotes: `'a'`, `'\n'`, `''`
    CharacterLiteral,
    /// A boolean literal: `true` or `false`
    BooleanLiteral,

    // === Punctuators ===
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `?`
    Question,
    /// `.`
    Dot,
    /// `\` — namespace access
    NamespaceAccess,
    /// `@` — compiler directive introducer
    At,

    // === Assignment family (precedence 0, right-associative) ===
    /// `=`
    Assign,
    /// `+=`
    PlusAssign,
    /// `-=`
    MinusAssign,
    /// `*=`
    StarAssign,
    /// `/=`
    SlashAssign,
    /// `%=`
    PercentAssign,
    /// `<<=`
    ShlAssign,
    /// `>>=`
    ShrAssign,
    /// `&=`
    AmpAssign,
    /// `|=`
    PipeAssign,
    /// `^=`
    CaretAssign,

    // === Comparison and logical ===
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `!` — logical not (unary)
    Bang,

    // === Arithmetic and bitwise ===
    /// `+` — addition, or unary plus
    Plus,
    /// `-` — subtraction, or unary minus
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `&` — bitwise and, or address-of in unary position
    Amp,
    /// `|`
    Pipe,
    /// `^` — bitwise xor, pointer marker in types, dereference in unary position
    Caret,
    /// `~` — bitwise not (unary)
    Tilde,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `++` (unary)
    PlusPlus,
    /// `--` (unary)
    MinusMinus,

    // === Type forms ===
    /// `:` — type assignment
    Colon,
    /// `::` — constant type assignment
    ColonColon,
    /// `->` — return type
    Arrow,

    // === Keywords ===
    /// `ret`
    KwRet,
    /// `brk`
    KwBrk,
    /// `cont`
    KwCont,
    /// `if`
    KwIf,
    /// `elif`
    KwElif,
    /// `else`
    KwElse,
    /// `for`
    KwFor,
    /// `while`
    KwWhile,
    /// `do`
    KwDo,
    /// `switch`
    KwSwitch,
    /// `case`
    KwCase,
    /// `struct`
    KwStruct,
    /// `enum`
    KwEnum,
    /// `namespace`
    KwNamespace,

    // === Type identifiers ===
    /// `proc` — only legal in declaration type position
    KwProc,
    /// `void` — only legal as a procedure return type
    KwVoid,
    /// `i8`
    KwI8,
    /// `u8`
    KwU8,
    /// `i16`
    KwI16,
    /// `u16`
    KwU16,
    /// `i32`
    KwI32,
    /// `u32`
    KwU32,
    /// `i64`
    KwI64,
    /// `u64`
    KwU64,
    /// `f32`
    KwF32,
    /// `f64`
    KwF64,
    /// `bool`
    KwBool,
}

/// A coarse category over token kinds.
///
/// The parser dispatches on classes rather than enumerating kinds wherever a
/// whole family behaves alike (literals, keywords, binary operators).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Tokens that belong to no other family (`->`, `\`, `Illegal`, `Eof`).
    Unspecific,
    /// Punctuation: `; , ( ) { } [ ] ? . @`
    Punctuator,
    /// Integer, float, string, character, and boolean literals.
    Literal,
    /// Statement keywords (`ret`, `if`, ...).
    Keyword,
    /// Primitive type names plus `proc` and `void`.
    TypeIdentifier,
    /// Operators that only appear in unary position: `! ~ ++ --`
    UnaryOperator,
    /// Operators that can join two operands, including `:` and `::`.
    BinaryOperator,
    /// Identifiers.
    Identifier,
}

impl TokenKind {
    /// Returns the class this kind belongs to.
    #[must_use]
    pub const fn class(self) -> TokenClass {
        use TokenKind::*;
        match self {
            Illegal | Eof | Arrow | NamespaceAccess => TokenClass::Unspecific,

            Semicolon | Comma | LeftParen | RightParen | LeftBrace | RightBrace | LeftBracket
            | RightBracket | Question | Dot | At => TokenClass::Punctuator,

            IntegerLiteral | FloatLiteral | StringLiteral | CharacterLiteral | BooleanLiteral => {
                TokenClass::Literal
            }

            Identifier => TokenClass::Identifier,

            KwRet | KwBrk | KwCont | KwIf | KwElif | KwElse | KwFor | KwWhile | KwDo | KwSwitch
            | KwCase | KwStruct | KwEnum | KwNamespace => TokenClass::Keyword,

            KwProc | KwVoid | KwI8 | KwU8 | KwI16 | KwU16 | KwI32 | KwU32 | KwI64 | KwU64
            | KwF32 | KwF64 | KwBool => TokenClass::TypeIdentifier,

            Bang | Tilde | PlusPlus | MinusMinus => TokenClass::UnaryOperator,

            Assign | PlusAssign | MinusAssign | StarAssign | SlashAssign | PercentAssign
            | ShlAssign | ShrAssign | AmpAssign | PipeAssign | CaretAssign | EqEq | BangEq | Lt
            | LtEq | Gt | GtEq | AmpAmp | PipePipe | Plus | Minus | Star | Slash | Percent
            | Amp | Pipe | Caret | Shl | Shr | Colon | ColonColon => TokenClass::BinaryOperator,
        }
    }

    /// Returns `true` if this is the end-of-file marker.
    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` if this token can begin a unary expression.
    ///
    /// Besides the dedicated unary operators, `+ - & ^` double as unary
    /// operators when they open an expression (`&` address-of, `^`
    /// dereference).
    #[must_use]
    pub const fn is_valid_unary(self) -> bool {
        matches!(
            self,
            Self::Bang
                | Self::Tilde
                | Self::PlusPlus
                | Self::MinusMinus
                | Self::Plus
                | Self::Minus
                | Self::Amp
                | Self::Caret
        )
    }
}

/// Looks up a scanned identifier in the keyword and type-identifier table.
///
/// Returns `None` for plain identifiers.
#[must_use]
pub(super) fn lookup_keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "ret" => TokenKind::KwRet,
        "brk" => TokenKind::KwBrk,
        "cont" => TokenKind::KwCont,
        "if" => TokenKind::KwIf,
        "elif" => TokenKind::KwElif,
        "else" => TokenKind::KwElse,
        "for" => TokenKind::KwFor,
        "while" => TokenKind::KwWhile,
        "do" => TokenKind::KwDo,
        "switch" => TokenKind::KwSwitch,
        "case" => TokenKind::KwCase,
        "struct" => TokenKind::KwStruct,
        "enum" => TokenKind::KwEnum,
        "namespace" => TokenKind::KwNamespace,
        "proc" => TokenKind::KwProc,
        "void" => TokenKind::KwVoid,
        "i8" => TokenKind::KwI8,
        "u8" => TokenKind::KwU8,
        "i16" => TokenKind::KwI16,
        "u16" => TokenKind::KwU16,
        "i32" => TokenKind::KwI32,
        "u32" => TokenKind::KwU32,
        "i64" => TokenKind::KwI64,
        "u64" => TokenKind::KwU64,
        "f32" => TokenKind::KwF32,
        "f64" => TokenKind::KwF64,
        "bool" => TokenKind::KwBool,
        "true" | "false" => TokenKind::BooleanLiteral,
        _ => return None,
    };
    Some(kind)
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Illegal => "<illegal>",
            Self::Eof => "<eof>",
            Self::Identifier => "identifier",
            Self::IntegerLiteral => "integer literal",
            Self::FloatLiteral => "float literal",
            Self::StringLiteral => "string literal",
            Self::CharacterLiteral => "character literal",
            Self::BooleanLiteral => "boolean literal",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::Question => "?",
            Self::Dot => ".",
            Self::NamespaceAccess => "\\",
            Self::At => "@",
            Self::Assign => "=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::StarAssign => "*=",
            Self::SlashAssign => "/=",
            Self::PercentAssign => "%=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::AmpAssign => "&=",
            Self::PipeAssign => "|=",
            Self::CaretAssign => "^=",
            Self::EqEq => "==",
            Self::BangEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::AmpAmp => "&&",
            Self::PipePipe => "||",
            Self::Bang => "!",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Amp => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Tilde => "~",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::Colon => ":",
            Self::ColonColon => "::",
            Self::Arrow => "->",
            Self::KwRet => "ret",
            Self::KwBrk => "brk",
            Self::KwCont => "cont",
            Self::KwIf => "if",
            Self::KwElif => "elif",
            Self::KwElse => "else",
            Self::KwFor => "for",
            Self::KwWhile => "while",
            Self::KwDo => "do",
            Self::KwSwitch => "switch",
            Self::KwCase => "case",
            Self::KwStruct => "struct",
            Self::KwEnum => "enum",
            Self::KwNamespace => "namespace",
            Self::KwProc => "proc",
            Self::KwVoid => "void",
            Self::KwI8 => "i8",
            Self::KwU8 => "u8",
            Self::KwI16 => "i16",
            Self::KwU16 => "u16",
            Self::KwI32 => "i32",
            Self::KwU32 => "u32",
            Self::KwI64 => "i64",
            Self::KwU64 => "u64",
            Self::KwF32 => "f32",
            Self::KwF64 => "f64",
            Self::KwBool => "bool",
        };
        f.write_str(text)
    }
}

/// A token with its source location and lexeme.
///
/// # Examples
///
/// ```
/// use skarn_core::source_analysis::{Token, TokenKind, TokenClass, Span};
///
/// let token = Token::new(TokenKind::Identifier, Span::new(0, 3), 1, "foo");
/// assert_eq!(token.kind(), TokenKind::Identifier);
/// assert_eq!(token.class(), TokenClass::Identifier);
/// assert_eq!(token.lexeme(), "foo");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    kind: TokenKind,
    span: Span,
    line: u32,
    lexeme: &'src str,
}

impl<'src> Token<'src> {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span, line: u32, lexeme: &'src str) -> Self {
        Self {
            kind,
            span,
            line,
            lexeme,
        }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub const fn kind(self) -> TokenKind {
        self.kind
    }

    /// Returns the class of this token's kind.
    #[must_use]
    pub const fn class(self) -> TokenClass {
        self.kind.class()
    }

    /// Returns the source span of this token.
    #[must_use]
    pub const fn span(self) -> Span {
        self.span
    }

    /// Returns the 1-based line number of the token's first byte.
    #[must_use]
    pub const fn line(self) -> u32 {
        self.line
    }

    /// Returns the source bytes this token was produced from.
    #[must_use]
    pub const fn lexeme(self) -> &'src str {
        self.lexeme
    }
}
