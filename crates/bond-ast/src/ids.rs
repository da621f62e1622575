//! Arena + index storage for declarations.
//!
//! Every declaration in a compilation (the root file's own declarations plus
//! everything pulled in transitively through imports) lives in one
//! [`DeclArena`], addressed by [`DeclId`]. `UserDefined` type nodes hold a
//! `DeclId` rather than a name or a pointer: looking a declaration up and
//! mutating it in place (as the resolver does across fixpoint passes, see
//! `bond-sema`) is automatically visible to every other node that refers to
//! it by id, which is exactly the by-identity reference discipline the data
//! model calls for without reference counting or raw pointers.

use crate::decl::Declaration;

/// An index into a [`DeclArena`]. Cheap to copy, compare, and hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct DeclId(pub u32);

/// Owns every declaration produced while building a compilation's AST.
///
/// A `DeclArena` is shared across every file in the compilation (the root
/// file and everything reached through imports): declarations are added as
/// each file is built, and later mutated in place during type resolution.
/// Nothing is ever removed; synthesized forward declarations (self-reference
/// cycle breaking) get their own slot like any other declaration.
#[derive(Debug, Default)]
pub struct DeclArena {
    decls: Vec<Declaration>,
}

impl DeclArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration, returning the id that refers to it.
    pub fn alloc(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, d)| (DeclId(i as u32), d))
    }

    pub fn ids(&self) -> impl Iterator<Item = DeclId> {
        (0..self.decls.len()).map(|i| DeclId(i as u32))
    }
}
