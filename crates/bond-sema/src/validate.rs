//! Per-declaration validation: runs after every symbol is
//! registered but before type resolution, so it still sees
//! `UnresolvedUserType` nodes and must flatten aliases itself rather than
//! rely on the resolver's output.

use std::collections::HashSet;

use bond_ast::{DeclArena, DeclId, Declaration, Modifier, NamespaceRef, StructDecl, Type};
use bond_common::diagnostics::ErrorKind;

use crate::symtab::{AliasScopes, SymbolTable};
use crate::Analysis;

/// Chase a possibly-aliased type reference to the declaration or primitive
/// it ultimately names, without mutating the AST. Mirrors the resolver's
/// own lookup order but is cycle-tracked independently as its own
/// recursive walk.
fn flatten(
    ty: &Type,
    file_path: Option<&str>,
    file_namespaces: &[NamespaceRef],
    symbols: &SymbolTable,
    aliases: &AliasScopes,
    arena: &DeclArena,
    visiting: &mut HashSet<String>,
) -> Type {
    match ty {
        Type::UnresolvedUserType(name, args) => {
            if !name.contains('.') && !visiting.contains(name) {
                if let Some(alias_id) = aliases.lookup(file_path, name) {
                    if let Declaration::Alias(alias) = arena.get(alias_id) {
                        visiting.insert(name.clone());
                        let flattened = flatten(&alias.target, file_path, file_namespaces, symbols, aliases, arena, visiting);
                        visiting.remove(name);
                        return flattened;
                    }
                }
            }
            if let Some(id) = symbols.lookup(arena, name, file_namespaces) {
                return Type::UserDefined(id, args.clone());
            }
            if args.is_empty() {
                if let Some(prim) = Type::primitive_from_name(name) {
                    return prim;
                }
            }
            ty.clone()
        }
        _ => ty.clone(),
    }
}

pub fn run(analysis: &mut Analysis) {
    resolve_views(analysis);

    let ids: Vec<DeclId> = analysis.arena.ids().collect();
    for id in ids {
        let decl = analysis.arena.get(id).clone();
        match decl {
            Declaration::Struct(s) => validate_struct(analysis, id, &s),
            Declaration::Enum(e) => {
                let mut seen = HashSet::new();
                for c in &e.constants {
                    if !seen.insert(c.name.as_str()) {
                        analysis.error(ErrorKind::DuplicateConstant, format!("duplicate enum constant `{}`", c.name), c.span, e.file_path.as_deref());
                    }
                }
            }
            Declaration::Service(svc) => validate_service(analysis, &svc),
            Declaration::Alias(_) | Declaration::Forward(_) => {}
        }
    }
}

/// Populate `view_of` structs' `fields` by projecting the named fields out
/// of their base struct. Must run before per-field validation so views
/// get checked like any other struct.
fn resolve_views(analysis: &mut Analysis) {
    let view_ids: Vec<DeclId> = analysis
        .arena
        .iter()
        .filter_map(|(id, d)| match d {
            Declaration::Struct(s) if s.view_of.is_some() => Some(id),
            _ => None,
        })
        .collect();

    for id in view_ids {
        let (view_of, namespaces, file_path, span) = {
            let Declaration::Struct(s) = analysis.arena.get(id) else { unreachable!() };
            (s.view_of.clone().unwrap(), s.namespaces.clone(), s.file_path.clone(), s.span)
        };

        let base_id = analysis.symbols.lookup(&analysis.arena, &view_of.base_name, &namespaces);
        let base_fields = match base_id {
            Some(base_id) => match analysis.arena.get(base_id) {
                Declaration::Struct(base) => Some(base.fields.clone()),
                _ => {
                    analysis.error(
                        ErrorKind::IllegalInheritance,
                        format!("`view_of {}` does not name a struct", view_of.base_name),
                        view_of.span,
                        file_path.as_deref(),
                    );
                    None
                }
            },
            None => {
                analysis.error(
                    ErrorKind::IllegalInheritance,
                    format!("`view_of` base `{}` could not be found", view_of.base_name),
                    view_of.span,
                    file_path.as_deref(),
                );
                None
            }
        };

        let Some(base_fields) = base_fields else { continue };

        let mut projected = Vec::with_capacity(view_of.field_names.len());
        for name in &view_of.field_names {
            match base_fields.iter().find(|f| &f.name == name) {
                Some(field) => projected.push(field.clone()),
                None => analysis.error(
                    ErrorKind::UnresolvedViewField,
                    format!("view field `{name}` is not a member of `{}`", view_of.base_name),
                    span,
                    file_path.as_deref(),
                ),
            }
        }

        if let Declaration::Struct(s) = analysis.arena.get_mut(id) {
            s.fields = projected;
        }
    }
}

fn validate_struct(analysis: &mut Analysis, id: DeclId, s: &StructDecl) {
    let _ = id;
    let mut seen_ordinals = HashSet::new();
    let mut seen_names = HashSet::new();
    for field in &s.fields {
        if !seen_ordinals.insert(field.ordinal) {
            analysis.error(ErrorKind::DuplicateOrdinal, format!("duplicate field ordinal {}", field.ordinal), field.span, s.file_path.as_deref());
        }
        if !seen_names.insert(field.name.as_str()) {
            analysis.error(ErrorKind::DuplicateField, format!("duplicate field name `{}`", field.name), field.span, s.file_path.as_deref());
        }
        validate_field(analysis, s, field);
    }
}

fn validate_field(analysis: &mut Analysis, s: &StructDecl, field: &bond_ast::Field) {
    let file_path = s.file_path.as_deref();

    // (a) key-type validity, at every nesting depth.
    let mut key_errors = Vec::new();
    field.ty.walk(&mut |node| {
        let (key, label) = match node {
            Type::Set(elem) => (elem.as_ref(), "set"),
            Type::Map(k, _) => (k.as_ref(), "map"),
            _ => return,
        };
        let mut visiting = HashSet::new();
        let flat_key = flatten(key, file_path, &s.namespaces, &analysis.symbols, &analysis.aliases, &analysis.arena, &mut visiting);
        if !flat_key.is_valid_key(&analysis.arena) {
            key_errors.push(label);
        }
    });
    for label in key_errors {
        analysis.error(
            ErrorKind::InvalidKeyType,
            format!("`{label}` key type is not a valid key"),
            field.span,
            file_path,
        );
    }

    let mut visiting = HashSet::new();
    let flat = flatten(&field.ty, file_path, &s.namespaces, &analysis.symbols, &analysis.aliases, &analysis.arena, &mut visiting);

    // (d) a struct-typed field (after unwrapping Maybe) may not default to `nothing`.
    if matches!(field.default, Some(bond_ast::Default::Nothing)) {
        let inner = match &flat {
            Type::Maybe(inner) => inner.as_ref().clone(),
            other => other.clone(),
        };
        let mut visiting = HashSet::new();
        let flat_inner = flatten(&inner, file_path, &s.namespaces, &analysis.symbols, &analysis.aliases, &analysis.arena, &mut visiting);
        if let Type::UserDefined(decl_id, _) = &flat_inner {
            if matches!(analysis.arena.get(*decl_id), Declaration::Struct(_)) {
                analysis.error(
                    ErrorKind::InvalidStructDefault,
                    format!("field `{}` cannot default a struct-typed field to `nothing`", field.name),
                    field.span,
                    file_path,
                );
            }
        }
        return;
    }

    match &field.default {
        None => {
            if let Type::UserDefined(decl_id, _) = &flat {
                if matches!(analysis.arena.get(*decl_id), Declaration::Enum(_)) && field.modifier != Modifier::Required {
                    analysis.error(
                        ErrorKind::RequiredDefault,
                        format!("field `{}` of enum type requires a default", field.name),
                        field.span,
                        file_path,
                    );
                }
            }
        }
        Some(bond_ast::Default::Bool(_)) => {
            if !matches!(flat, Type::Bool) {
                analysis.error(ErrorKind::InvalidDefault, format!("field `{}` has a bool default but a non-bool type", field.name), field.span, file_path);
            }
        }
        Some(bond_ast::Default::Integer(v)) => {
            let ok = match &flat {
                Type::Int8 => i8::try_from(*v).is_ok(),
                Type::Int16 => i16::try_from(*v).is_ok(),
                Type::Int32 => i32::try_from(*v).is_ok(),
                Type::Int64 => true,
                Type::Uint8 => u8::try_from(*v).is_ok(),
                Type::Uint16 => u16::try_from(*v).is_ok(),
                Type::Uint32 => u32::try_from(*v).is_ok(),
                Type::Uint64 => *v >= 0,
                Type::Float | Type::Double => true,
                Type::TypeParameter(_) => true,
                _ => false,
            };
            if !ok {
                analysis.error(ErrorKind::InvalidDefault, format!("default value {v} does not fit field `{}`'s type", field.name), field.span, file_path);
            }
        }
        Some(bond_ast::Default::Float(_)) => {
            if !matches!(flat, Type::Float | Type::Double) {
                analysis.error(ErrorKind::InvalidDefault, format!("field `{}` has a float default but an incompatible type", field.name), field.span, file_path);
            }
        }
        Some(bond_ast::Default::String(_)) => {
            if !matches!(flat, Type::String | Type::WString) {
                analysis.error(ErrorKind::InvalidDefault, format!("field `{}` has a string default but a non-string type", field.name), field.span, file_path);
            }
        }
        Some(bond_ast::Default::Enum(name)) => {
            match &flat {
                Type::Bool => {
                    if name != "true" && name != "false" {
                        analysis.error(ErrorKind::InvalidDefault, format!("`{name}` is not a valid bool default"), field.span, file_path);
                    }
                }
                Type::UserDefined(decl_id, _) => match analysis.arena.get(*decl_id) {
                    Declaration::Enum(e) => {
                        if !e.constants.iter().any(|c| &c.name == name) {
                            analysis.error(ErrorKind::InvalidDefault, format!("`{name}` does not name a constant of enum `{}`", e.name), field.span, file_path);
                        }
                    }
                    _ => analysis.error(ErrorKind::InvalidDefault, format!("`{name}` used as a default on a non-enum field"), field.span, file_path),
                },
                Type::TypeParameter(_) => {}
                _ => analysis.error(ErrorKind::InvalidDefault, format!("`{name}` used as a default on a non-enum field"), field.span, file_path),
            }
        }
        Some(bond_ast::Default::Nothing) => unreachable!("handled above"),
    }
}

fn validate_service(analysis: &mut Analysis, svc: &bond_ast::ServiceDecl) {
    let mut seen = HashSet::new();
    for m in &svc.methods {
        if !seen.insert(m.name.as_str()) {
            analysis.error(ErrorKind::DuplicateMethod, format!("duplicate method `{}`", m.name), m.span, svc.file_path.as_deref());
        }
        if let bond_ast::MethodKind::Event { input } = &m.kind {
            if matches!(input, bond_ast::MethodType::Streaming(_)) {
                analysis.error(ErrorKind::IllegalEventInput, format!("event `{}` cannot take a streaming input", m.name), m.span, svc.file_path.as_deref());
            }
        }
    }

    if let Some(base) = &svc.base {
        let mut visiting = HashSet::new();
        let flat = flatten(base, svc.file_path.as_deref(), &svc.namespaces, &analysis.symbols, &analysis.aliases, &analysis.arena, &mut visiting);
        let ok = matches!(&flat, Type::UserDefined(id, _) if matches!(analysis.arena.get(*id), Declaration::Service(_)));
        if !ok {
            analysis.error(ErrorKind::IllegalInheritance, format!("service `{}` base does not resolve to a service", svc.name), svc.span, svc.file_path.as_deref());
        }
    }
}
