//! The `Type` sum type.

use crate::ids::DeclId;

/// Every kind of type a `Field`, method signature, or alias target can hold.
///
/// `UnresolvedUserType` is the AST Builder's placeholder for a named type
/// reference; semantic analysis (`bond-sema`) replaces every reachable
/// occurrence with `UserDefined`, a primitive, or reports `UnresolvedType`.
/// No `UnresolvedUserType` may remain in an AST handed to the compatibility
/// checker or any other consumer.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Type {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
    Bool,
    String,
    WString,
    Blob,

    List(Box<Type>),
    Vector(Box<Type>),
    Set(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Nullable(Box<Type>),
    Bonded(Box<Type>),

    /// Emitted when a field's default is `nothing`; wraps the declared type.
    Maybe(Box<Type>),

    /// A resolved reference to a declaration, plus actual type arguments.
    UserDefined(DeclId, Vec<Type>),

    /// A reference to an enclosing generic parameter.
    TypeParameter(String),

    /// An integer used as a generic argument (e.g. a fixed-width type).
    IntTypeArg(i64),

    /// `bond_meta::name` -- compiler-intrinsic field type.
    MetaName,
    /// `bond_meta::full_name` -- compiler-intrinsic field type.
    MetaFullName,

    /// The method result marker for a method with no return value.
    Void,

    /// Placeholder produced by the AST Builder for a named type reference
    /// that has not yet been resolved against the symbol table.
    UnresolvedUserType(String, Vec<Type>),
}

impl Type {
    /// Whether this node (not recursing into children) is still unresolved.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Type::UnresolvedUserType(..))
    }

    /// `set`/`map` keys must be scalar, string, enum, or a type parameter
    /// (checked at instantiation sites for the latter, out of scope here --
    /// we accept it unconditionally).
    pub fn is_valid_key(&self, arena: &crate::ids::DeclArena) -> bool {
        match self {
            Type::Int8
            | Type::Int16
            | Type::Int32
            | Type::Int64
            | Type::Uint8
            | Type::Uint16
            | Type::Uint32
            | Type::Uint64
            | Type::Float
            | Type::Double
            | Type::Bool
            | Type::String
            | Type::WString
            | Type::TypeParameter(_) => true,
            Type::UserDefined(id, _) => matches!(arena.get(*id), crate::decl::Declaration::Enum(_)),
            _ => false,
        }
    }

    /// Recursively visit every `Type` node reachable from this one,
    /// including `self`. Used by the resolver to walk containers, bonded
    /// types, and nested user-type arguments uniformly.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Type)) {
        f(self);
        match self {
            Type::List(t) | Type::Vector(t) | Type::Set(t) | Type::Nullable(t) | Type::Bonded(t) | Type::Maybe(t) => {
                t.walk(f)
            }
            Type::Map(k, v) => {
                k.walk(f);
                v.walk(f);
            }
            Type::UserDefined(_, args) | Type::UnresolvedUserType(_, args) => {
                for a in args {
                    a.walk(f);
                }
            }
            _ => {}
        }
    }

    /// Mutable counterpart of [`Type::walk`], used by the resolver to
    /// rewrite `UnresolvedUserType` nodes in place.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Type)) {
        f(self);
        match self {
            Type::List(t) | Type::Vector(t) | Type::Set(t) | Type::Nullable(t) | Type::Bonded(t) | Type::Maybe(t) => {
                t.walk_mut(f)
            }
            Type::Map(k, v) => {
                k.walk_mut(f);
                v.walk_mut(f);
            }
            Type::UserDefined(_, args) | Type::UnresolvedUserType(_, args) => {
                for a in args {
                    a.walk_mut(f);
                }
            }
            _ => {}
        }
    }

    /// Case-insensitive primitive name -> `Type`, used by both the AST
    /// Builder's generic-parameter disambiguation and the resolver's
    /// final fallback for unresolved single-segment names.
    pub fn primitive_from_name(name: &str) -> Option<Type> {
        Some(match bond_common::token::primitive_name_ci(name)? {
            "int8" => Type::Int8,
            "int16" => Type::Int16,
            "int32" => Type::Int32,
            "int64" => Type::Int64,
            "uint8" => Type::Uint8,
            "uint16" => Type::Uint16,
            "uint32" => Type::Uint32,
            "uint64" => Type::Uint64,
            "float" => Type::Float,
            "double" => Type::Double,
            "bool" => Type::Bool,
            "string" => Type::String,
            "wstring" => Type::WString,
            "blob" => Type::Blob,
            _ => return None,
        })
    }

    /// Numeric width in bits, for integral and enum-backing-type purposes.
    /// `None` for non-integral types.
    pub fn int_width(&self) -> Option<u8> {
        match self {
            Type::Int8 | Type::Uint8 => Some(8),
            Type::Int16 | Type::Uint16 => Some(16),
            Type::Int32 | Type::Uint32 => Some(32),
            Type::Int64 | Type::Uint64 => Some(64),
            _ => None,
        }
    }

    pub fn is_signed_int(&self) -> bool {
        matches!(self, Type::Int8 | Type::Int16 | Type::Int32 | Type::Int64)
    }

    pub fn is_unsigned_int(&self) -> bool {
        matches!(self, Type::Uint8 | Type::Uint16 | Type::Uint32 | Type::Uint64)
    }
}
