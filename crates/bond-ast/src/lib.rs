//! AST Builder: turns a `bond-parser` CST into the owned, arena-backed AST
//! that semantic analysis and compatibility checking operate on.
//!
//! The builder performs no cross-declaration resolution. Every named type
//! it can't settle locally (anything but the enclosing declaration's own
//! generic parameters) is left as [`ty::Type::UnresolvedUserType`]; turning
//! those into real declaration references is `bond-sema`'s job.

mod build;
mod decl;
mod default;
mod file;
mod ids;
mod literals;
mod ty;

pub use build::build_file;
pub use decl::{
    namespaces_match, AliasDecl, Attribute, Declaration, EnumConstant, EnumDecl, Field,
    ForwardDecl, Lang, Method, MethodKind, MethodType, Modifier, NamespaceRef, ServiceDecl,
    StructDecl, ViewOf,
};
pub use default::Default;
pub use file::{BondFile, Import, NamespaceDecl};
pub use ids::{DeclArena, DeclId};
pub use literals::{parse_float_literal, parse_int_literal, parse_ordinal, unescape_string};
pub use ty::Type;
