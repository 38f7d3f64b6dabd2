// Copyright 2026 The Skarn Authors
// SPDX-License-Identifier: Apache-2.0

//! Primitive types, type descriptors, and the user-type tables.
//!
//! `VarType` is the closed set of primitive value types. A
//! [`TypeDescriptor`] is a primitive plus pointer depth and array shape, as
//! written in a declaration's type position. User-declared names live in two
//! tables: [`TypeAliasTable`] for `@alias` directives and [`TypeTable`] for
//! struct/enum definitions; both are keyed by namespace-qualified name and
//! participate in name-collision checks.

use std::collections::HashMap;

use ecow::EcoString;

use crate::source_analysis::TokenKind;

/// A primitive value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    /// 8-bit signed integer.
    I8,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit signed integer.
    I16,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit signed integer.
    I32,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit signed integer.
    I64,
    /// 64-bit unsigned integer.
    U64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// Boolean.
    Bool,
    /// Only legal as a procedure return type.
    Void,
}

impl VarType {
    /// Maps a type-identifier token to its primitive type.
    ///
    /// Returns `None` for every other token, including `proc`.
    #[must_use]
    pub const fn from_token(kind: TokenKind) -> Option<Self> {
        let ty = match kind {
            TokenKind::KwI8 => Self::I8,
            TokenKind::KwU8 => Self::U8,
            TokenKind::KwI16 => Self::I16,
            TokenKind::KwU16 => Self::U16,
            TokenKind::KwI32 => Self::I32,
            TokenKind::KwU32 => Self::U32,
            TokenKind::KwI64 => Self::I64,
            TokenKind::KwU64 => Self::U64,
            TokenKind::KwF32 => Self::F32,
            TokenKind::KwF64 => Self::F64,
            TokenKind::KwBool => Self::Bool,
            TokenKind::KwVoid => Self::Void,
            _ => return None,
        };
        Some(ty)
    }

    /// Size of a value of this type in bytes. `void` has no size.
    #[must_use]
    pub const fn size_bytes(self) -> Option<u16> {
        let size = match self {
            Self::I8 | Self::U8 | Self::Bool => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
            Self::Void => return None,
        };
        Some(size)
    }
}

impl std::fmt::Display for VarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Void => "void",
        };
        f.write_str(text)
    }
}

/// A type as written in a declaration: primitive, pointer depth, array shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// The primitive base type.
    pub base: VarType,
    /// Number of `^` pointer markers.
    pub pointer_depth: u8,
    /// `true` if an array suffix was written.
    pub is_array: bool,
    /// Declared array length; 0 means unknown/dynamic (`[]`).
    pub array_length: u32,
}

impl TypeDescriptor {
    /// A plain descriptor with no pointer or array shape.
    #[must_use]
    pub const fn plain(base: VarType) -> Self {
        Self {
            base,
            pointer_depth: 0,
            is_array: false,
            array_length: 0,
        }
    }
}

/// One named member of a user-defined type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMember {
    /// Member name.
    pub name: EcoString,
    /// Member type.
    pub ty: TypeDescriptor,
}

/// User-declared type aliases, keyed by namespace-qualified name.
#[derive(Debug, Clone, Default)]
pub struct TypeAliasTable {
    aliases: HashMap<EcoString, TypeDescriptor>,
}

impl TypeAliasTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if an alias with this name exists.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Registers an alias. Fails if the name is already taken.
    pub fn create(&mut self, name: EcoString, descriptor: TypeDescriptor) -> bool {
        if self.exists(&name) {
            return false;
        }
        self.aliases.insert(name, descriptor);
        true
    }

    /// Looks up the descriptor an alias stands for.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<TypeDescriptor> {
        self.aliases.get(name).copied()
    }
}

/// User-defined struct and enum types, keyed by namespace-qualified name.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: HashMap<EcoString, Vec<TypeMember>>,
}

impl TypeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a type with this name exists.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registers a type with its members. Fails if the name is already taken.
    pub fn create(&mut self, name: EcoString, members: Vec<TypeMember>) -> bool {
        if self.exists(&name) {
            return false;
        }
        self.types.insert(name, members);
        true
    }

    /// Looks up the members of a type.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&[TypeMember]> {
        self.types.get(name).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_to_var_type() {
        assert_eq!(VarType::from_token(TokenKind::KwI32), Some(VarType::I32));
        assert_eq!(VarType::from_token(TokenKind::KwBool), Some(VarType::Bool));
        assert_eq!(VarType::from_token(TokenKind::KwVoid), Some(VarType::Void));
        assert_eq!(VarType::from_token(TokenKind::KwProc), None);
        assert_eq!(VarType::from_token(TokenKind::Identifier), None);
    }

    #[test]
    fn primitive_widths() {
        assert_eq!(VarType::U8.size_bytes(), Some(1));
        assert_eq!(VarType::I8.size_bytes(), Some(1));
        assert_eq!(VarType::U16.size_bytes(), Some(2));
        assert_eq!(VarType::I32.size_bytes(), Some(4));
        assert_eq!(VarType::U64.size_bytes(), Some(8));
        assert_eq!(VarType::F32.size_bytes(), Some(4));
        assert_eq!(VarType::F64.size_bytes(), Some(8));
        assert_eq!(VarType::Bool.size_bytes(), Some(1));
        assert_eq!(VarType::Void.size_bytes(), None);
    }

    #[test]
    fn alias_table_rejects_duplicates() {
        let mut aliases = TypeAliasTable::new();
        assert!(aliases.create("Byte".into(), TypeDescriptor::plain(VarType::U8)));
        assert!(!aliases.create("Byte".into(), TypeDescriptor::plain(VarType::I8)));
        assert_eq!(
            aliases.lookup("Byte"),
            Some(TypeDescriptor::plain(VarType::U8))
        );
        assert!(aliases.lookup("Word").is_none());
    }

    #[test]
    fn type_table_stores_members() {
        let mut types = TypeTable::new();
        let members = vec![TypeMember {
            name: "x".into(),
            ty: TypeDescriptor::plain(VarType::I32),
        }];
        assert!(types.create("Point".into(), members));
        assert!(!types.create("Point".into(), Vec::new()));
        assert_eq!(types.lookup("Point").unwrap().len(), 1);
    }
}
