//! The symbol table: two namespaces of symbols.
//!
//! Global declarations (struct/enum/service/forward) are visible across the
//! whole compilation and looked up by qualified or bare name. Aliases are
//! *not* global -- each file gets its own scope, keyed by file path, so two
//! files may alias the same name to different types without conflict.

use rustc_hash::FxHashMap;

use bond_ast::{namespaces_match, DeclArena, DeclId, NamespaceRef};

/// Split a possibly-dotted type reference into (namespace prefix, simple
/// name): `"ns.sub.Name"` -> `(Some("ns.sub"), "Name")`, `"Name"` -> `(None,
/// "Name")`.
fn split_qualified(text: &str) -> (Option<&str>, &str) {
    match text.rfind('.') {
        Some(i) => (Some(&text[..i]), &text[i + 1..]),
        None => (None, text),
    }
}

/// Global declaration symbols, keyed by bare (last-segment) name.
#[derive(Debug, Default)]
pub struct SymbolTable {
    by_name: FxHashMap<String, Vec<DeclId>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, id: DeclId) {
        self.by_name.entry(name.to_string()).or_default().push(id);
    }

    /// Swap `old` for `new` under `name`, or append `new` if `old` is not
    /// present. Used to let a struct prevail over a forward it reconciles
    /// with, without disturbing lookup order for other names.
    pub fn replace(&mut self, name: &str, old: DeclId, new: DeclId) {
        let list = self.by_name.entry(name.to_string()).or_default();
        match list.iter().position(|&id| id == old) {
            Some(i) => list[i] = new,
            None => list.push(new),
        }
    }

    /// Every global declaration registered under `simple_name`, regardless
    /// of namespace. Used by duplicate-detection to find candidates to
    /// reconcile against before inserting a new one.
    pub fn candidates(&self, simple_name: &str) -> &[DeclId] {
        self.by_name.get(simple_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve a (possibly dotted) type reference written inside a file
    /// belonging to `file_namespaces`. A namespace-qualified reference
    /// matches any candidate carrying a matching namespace (language-tag
    /// tolerance, via [`namespaces_match`]); a bare reference
    /// is restricted to the referencing file's own namespaces.
    pub fn lookup(&self, arena: &DeclArena, text: &str, file_namespaces: &[NamespaceRef]) -> Option<DeclId> {
        let (ns_prefix, simple) = split_qualified(text);
        let candidates = self.by_name.get(simple)?;
        match ns_prefix {
            Some(prefix) => {
                let query = NamespaceRef { name: prefix.to_string(), lang: None };
                candidates
                    .iter()
                    .find(|&&id| arena.get(id).namespaces().iter().any(|ns| namespaces_match(ns, &query)))
                    .copied()
            }
            None => candidates
                .iter()
                .find(|&&id| {
                    arena
                        .get(id)
                        .namespaces()
                        .iter()
                        .any(|ns| file_namespaces.iter().any(|fns| namespaces_match(ns, fns)))
                })
                .copied(),
        }
    }
}

/// File-scoped alias symbols: one map per file path, never merged into
/// [`SymbolTable`].
#[derive(Debug, Default)]
pub struct AliasScopes {
    scopes: FxHashMap<Option<String>, FxHashMap<String, DeclId>>,
}

impl AliasScopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_path: Option<String>, name: &str, id: DeclId) {
        self.scopes.entry(file_path).or_default().insert(name.to_string(), id);
    }

    /// Look up `name` within the alias scope of the file at `file_path`.
    /// Aliases from other files are never visible, matching a per-file
    /// push/pop scoping discipline.
    pub fn lookup(&self, file_path: Option<&str>, name: &str) -> Option<DeclId> {
        let key = file_path.map(str::to_string);
        self.scopes.get(&key)?.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_ast::{Declaration, EnumDecl, Lang};
    use bond_common::span::Span;

    fn enum_decl(name: &str, ns: &str, lang: Option<Lang>, file: Option<&str>) -> Declaration {
        Declaration::Enum(EnumDecl {
            name: name.to_string(),
            namespaces: vec![NamespaceRef { name: ns.to_string(), lang }],
            constants: vec![],
            attributes: vec![],
            span: Span::new(0, 0),
            file_path: file.map(str::to_string),
        })
    }

    #[test]
    fn bare_lookup_restricted_to_file_namespaces() {
        let mut arena = DeclArena::new();
        let id = arena.alloc(enum_decl("Color", "a.b", None, None));
        let mut table = SymbolTable::new();
        table.insert("Color", id);

        let matching = vec![NamespaceRef { name: "a.b".to_string(), lang: None }];
        let other = vec![NamespaceRef { name: "x.y".to_string(), lang: None }];
        assert_eq!(table.lookup(&arena, "Color", &matching), Some(id));
        assert_eq!(table.lookup(&arena, "Color", &other), None);
    }

    #[test]
    fn qualified_lookup_ignores_file_namespaces() {
        let mut arena = DeclArena::new();
        let id = arena.alloc(enum_decl("Color", "a.b", None, None));
        let mut table = SymbolTable::new();
        table.insert("Color", id);

        assert_eq!(table.lookup(&arena, "a.b.Color", &[]), Some(id));
        assert_eq!(table.lookup(&arena, "x.y.Color", &[]), None);
    }

    #[test]
    fn language_qualified_namespace_matches_unqualified() {
        let mut arena = DeclArena::new();
        let id = arena.alloc(enum_decl("Color", "a.b", Some(Lang::Cpp), None));
        let mut table = SymbolTable::new();
        table.insert("Color", id);
        assert_eq!(table.lookup(&arena, "a.b.Color", &[]), Some(id));
    }

    #[test]
    fn alias_scopes_are_per_file() {
        let mut arena = DeclArena::new();
        let id_a = arena.alloc(enum_decl("Id", "ns", None, Some("a.bond")));
        let id_b = arena.alloc(enum_decl("Id", "ns", None, Some("b.bond")));
        let mut scopes = AliasScopes::new();
        scopes.insert(Some("a.bond".to_string()), "Id", id_a);
        scopes.insert(Some("b.bond".to_string()), "Id", id_b);
        assert_eq!(scopes.lookup(Some("a.bond"), "Id"), Some(id_a));
        assert_eq!(scopes.lookup(Some("b.bond"), "Id"), Some(id_b));
        assert_eq!(scopes.lookup(Some("c.bond"), "Id"), None);
    }
}
