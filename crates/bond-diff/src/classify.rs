//! Type change classification: decides whether two field,
//! alias, or method types that differ structurally are still wire- or
//! text-compatible.

use bond_ast::{DeclArena, Declaration, Type};

use crate::ChangeCategory;

fn is_enum(ty: &Type, arena: &DeclArena) -> bool {
    matches!(ty, Type::UserDefined(id, _) if matches!(arena.get(*id), Declaration::Enum(_)))
}

/// Structural equality across two (possibly different) compilations: a
/// `UserDefined` reference compares by qualified declaration name and kind
/// rather than by `DeclId`, since the two ASTs being diffed allocate their
/// arenas independently.
pub(crate) fn structurally_equal(a: &Type, arena_a: &DeclArena, b: &Type, arena_b: &DeclArena) -> bool {
    match (a, b) {
        (Type::Int8, Type::Int8)
        | (Type::Int16, Type::Int16)
        | (Type::Int32, Type::Int32)
        | (Type::Int64, Type::Int64)
        | (Type::Uint8, Type::Uint8)
        | (Type::Uint16, Type::Uint16)
        | (Type::Uint32, Type::Uint32)
        | (Type::Uint64, Type::Uint64)
        | (Type::Float, Type::Float)
        | (Type::Double, Type::Double)
        | (Type::Bool, Type::Bool)
        | (Type::String, Type::String)
        | (Type::WString, Type::WString)
        | (Type::Blob, Type::Blob)
        | (Type::Void, Type::Void)
        | (Type::MetaName, Type::MetaName)
        | (Type::MetaFullName, Type::MetaFullName) => true,

        (Type::List(x), Type::List(y))
        | (Type::Vector(x), Type::Vector(y))
        | (Type::Set(x), Type::Set(y))
        | (Type::Nullable(x), Type::Nullable(y))
        | (Type::Bonded(x), Type::Bonded(y))
        | (Type::Maybe(x), Type::Maybe(y)) => structurally_equal(x, arena_a, y, arena_b),

        (Type::Map(k1, v1), Type::Map(k2, v2)) => {
            structurally_equal(k1, arena_a, k2, arena_b) && structurally_equal(v1, arena_a, v2, arena_b)
        }

        (Type::UserDefined(id1, args1), Type::UserDefined(id2, args2)) => {
            let d1 = arena_a.get(*id1);
            let d2 = arena_b.get(*id2);
            d1.qualified_name() == d2.qualified_name()
                && d1.kind_name() == d2.kind_name()
                && args1.len() == args2.len()
                && args1.iter().zip(args2).all(|(x, y)| structurally_equal(x, arena_a, y, arena_b))
        }

        (Type::TypeParameter(n1), Type::TypeParameter(n2)) => n1 == n2,
        (Type::IntTypeArg(n1), Type::IntTypeArg(n2)) => n1 == n2,
        (Type::UnresolvedUserType(n1, _), Type::UnresolvedUserType(n2, _)) => n1 == n2,

        _ => false,
    }
}

/// Classify a type change once structural equality has already determined
/// the two types differ. Returns the category and, for promotions with a
/// recommended rollout order, a recommendation string.
pub fn classify_type_change(old: &Type, old_arena: &DeclArena, new: &Type, new_arena: &DeclArena) -> (ChangeCategory, Option<String>) {
    use ChangeCategory::{BreakingWire, Compatible};

    if structurally_equal(old, old_arena, new, new_arena) {
        return (Compatible, None);
    }

    match (old, new) {
        (Type::Int32, _) if is_enum(new, new_arena) => (Compatible, None),
        (_, Type::Int32) if is_enum(old, old_arena) => (Compatible, None),

        (Type::Vector(a), Type::List(b)) | (Type::List(a), Type::Vector(b))
            if structurally_equal(a, old_arena, b, new_arena) =>
        {
            (Compatible, None)
        }

        (Type::Blob, Type::Vector(t)) | (Type::Vector(t), Type::Blob) | (Type::Blob, Type::List(t)) | (Type::List(t), Type::Blob)
            if matches!(t.as_ref(), Type::Int8) =>
        {
            (Compatible, None)
        }

        (Type::Bonded(inner), other) if structurally_equal(inner, old_arena, other, new_arena) => (Compatible, None),
        (other, Type::Bonded(inner)) if structurally_equal(other, old_arena, inner, new_arena) => (Compatible, None),

        (Type::Float, Type::Double) => (Compatible, None),
        (Type::Uint8, Type::Uint16 | Type::Uint32 | Type::Uint64) => (Compatible, None),
        (Type::Uint16, Type::Uint32 | Type::Uint64) => (Compatible, None),
        (Type::Uint32, Type::Uint64) => (Compatible, None),
        (Type::Int8, Type::Int16 | Type::Int32 | Type::Int64) => (Compatible, None),
        (Type::Int16, Type::Int32 | Type::Int64) => (Compatible, None),
        (Type::Int32, Type::Int64) => (Compatible, None),

        (Type::Int8, _) | (Type::Int16, _) if is_enum(new, new_arena) => (
            Compatible,
            Some("roll consumers out before producers start emitting the enum-typed field".to_string()),
        ),

        _ => (BreakingWire, None),
    }
}
