//! Import graph loading: recursive, idempotent per canonical
//! path, registering every loaded file's global declarations and alias
//! scope into the shared symbol table as it goes.

use rustc_hash::FxHashSet;

use bond_ast::{build_file, BondFile, DeclArena, DeclId, Declaration};
use bond_common::cancel::CancellationToken;
use bond_common::diagnostics::{ErrorKind, ParseError};
use bond_common::import::ImportResolver;
use bond_common::span::LineIndex;

use crate::symtab::{AliasScopes, SymbolTable};

pub struct Loader<'a> {
    pub arena: DeclArena,
    pub symbols: SymbolTable,
    pub aliases: AliasScopes,
    pub line_indices: rustc_hash::FxHashMap<Option<String>, LineIndex>,
    pub errors: Vec<ParseError>,
    resolver: &'a dyn ImportResolver,
    ignore_imports: bool,
    cancellation: Option<&'a CancellationToken>,
    visited: FxHashSet<String>,
    cancelled: bool,
}

impl<'a> Loader<'a> {
    pub fn new(resolver: &'a dyn ImportResolver, ignore_imports: bool, cancellation: Option<&'a CancellationToken>) -> Self {
        Self {
            arena: DeclArena::new(),
            symbols: SymbolTable::new(),
            aliases: AliasScopes::new(),
            line_indices: rustc_hash::FxHashMap::default(),
            errors: Vec::new(),
            resolver,
            ignore_imports,
            cancellation,
            visited: FxHashSet::default(),
            cancelled: false,
        }
    }

    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    /// Load and register the root file, following its imports transitively.
    /// Returns the root file's own `BondFile` (imported files are folded
    /// into `arena`/`symbols` but not individually surfaced).
    pub fn load_root(&mut self, source: &str, virtual_path: Option<String>) -> BondFile {
        if let Some(path) = &virtual_path {
            self.visited.insert(path.clone());
        }
        self.load_file(source, virtual_path)
    }

    fn load_file(&mut self, source: &str, path: Option<String>) -> BondFile {
        self.line_indices.insert(path.clone(), LineIndex::new(source));

        let parse = bond_parser::parse(source);
        for err in parse.errors() {
            let mut err = err.clone();
            if err.file_path.is_none() {
                if let Some(p) = &path {
                    err = err.with_file(p.clone());
                }
            }
            self.errors.push(err);
        }

        let (file, build_errors) = build_file(&parse, source, path.as_deref(), &mut self.arena);
        self.errors.extend(build_errors);

        for &id in &file.declarations {
            self.register(id, path.as_deref());
        }

        if !self.ignore_imports {
            self.load_imports(&file, path.as_deref());
        }

        file
    }

    fn load_imports(&mut self, file: &BondFile, from_path: Option<&str>) {
        for import in &file.imports {
            if let Some(token) = self.cancellation {
                if token.is_cancelled() {
                    self.cancelled = true;
                    self.push_error(ErrorKind::Cancelled, "compilation cancelled", from_path, import.span.start);
                    return;
                }
            }

            match self.resolver.resolve(from_path, &import.path) {
                Ok(resolved) => {
                    if !self.visited.insert(resolved.canonical_path.clone()) {
                        continue;
                    }
                    self.load_file(&resolved.content, Some(resolved.canonical_path));
                }
                Err(resolver_err) => {
                    self.push_error(
                        ErrorKind::ImportFailure,
                        &resolver_err.message,
                        from_path,
                        import.span.start,
                    );
                }
            }
        }
    }

    fn push_error(&mut self, kind: ErrorKind, message: &str, file_path: Option<&str>, offset: u32) {
        let (line, column) = file_path
            .and_then(|p| self.line_indices.get(&Some(p.to_string())))
            .or_else(|| self.line_indices.get(&None))
            .map(|idx| idx.line_col(offset))
            .unwrap_or((0, 0));
        let mut err = ParseError::new(kind, message, line, column);
        if let Some(p) = file_path {
            err = err.with_file(p);
        }
        self.errors.push(err);
    }

    /// Apply the duplicate/reconciliation rules while registering one
    /// freshly built declaration.
    fn register(&mut self, id: DeclId, file_path: Option<&str>) {
        let decl = self.arena.get(id).clone();

        if let Declaration::Alias(alias) = &decl {
            self.aliases.insert(file_path.map(str::to_string), &alias.name, id);
            return;
        }

        let name = decl.name().to_string();
        let namespaces = decl.namespaces().to_vec();
        let conflict = self
            .symbols
            .candidates(&name)
            .iter()
            .copied()
            .find(|&existing| {
                let existing_decl = self.arena.get(existing);
                namespaces
                    .iter()
                    .any(|ns| existing_decl.namespaces().iter().any(|ens| bond_ast::namespaces_match(ns, ens)))
            });

        match conflict {
            None => self.symbols.insert(&name, id),
            Some(existing) => {
                let existing_decl = self.arena.get(existing).clone();
                let reconciles = match (&existing_decl, &decl) {
                    (Declaration::Forward(_), Declaration::Struct(_)) => {
                        existing_decl.type_params().len() == decl.type_params().len()
                    }
                    (Declaration::Struct(_), Declaration::Forward(_)) => {
                        existing_decl.type_params().len() == decl.type_params().len()
                    }
                    _ => false,
                };
                if reconciles {
                    if matches!(decl, Declaration::Struct(_)) {
                        self.symbols.replace(&name, existing, id);
                    }
                    // Forward registered after its struct: the struct already
                    // prevails, nothing to do.
                } else {
                    self.push_error(
                        ErrorKind::DuplicateDeclaration,
                        &format!("declaration `{name}` is already defined in this namespace"),
                        file_path,
                        decl.span().start,
                    );
                }
            }
        }
    }
}
