//! Multi-pass fixpoint type resolution.
//!
//! Every `UnresolvedUserType` reachable from a declaration is rewritten in
//! place to `UserDefined`, a primitive, or left alone (reported afterward as
//! `UnresolvedType`). A struct field that names its own enclosing struct is
//! redirected through a synthesized forward declaration instead, so the
//! fixpoint never needs to "unfold" the struct into itself.

use rustc_hash::FxHashMap;

use bond_ast::{DeclArena, DeclId, Declaration, ForwardDecl, MethodKind, MethodType, Type};
use bond_common::diagnostics::ErrorKind;

use crate::Analysis;

const MAX_PASSES: usize = 10;

pub fn run(analysis: &mut Analysis) {
    let decl_ids: Vec<DeclId> = analysis.arena.ids().collect();
    let mut self_forwards: FxHashMap<DeclId, DeclId> = FxHashMap::default();
    let mut converged = false;

    for _ in 0..MAX_PASSES {
        let snapshot: Vec<Declaration> = decl_ids.iter().map(|&id| analysis.arena.get(id).clone()).collect();

        for &id in &decl_ids {
            resolve_decl(analysis, id, &mut self_forwards);
        }

        let changed = decl_ids.iter().zip(snapshot.iter()).any(|(&id, old)| analysis.arena.get(id) != old);
        if !changed {
            converged = true;
            break;
        }
    }

    fixup_bool_enum_defaults(analysis, &decl_ids);

    if converged {
        report_unresolved(analysis, &decl_ids);
    } else {
        analysis.errors.push(bond_common::diagnostics::ParseError::new(
            ErrorKind::ResolutionDivergence,
            "type resolution did not converge within the pass limit",
            0,
            0,
        ));
    }
}

fn resolve_type_in_place(
    analysis: &mut Analysis,
    ty: &mut Type,
    enclosing_id: DeclId,
    enclosing_is_struct: bool,
    file_path: Option<&str>,
    namespaces: &[bond_ast::NamespaceRef],
    self_forwards: &mut FxHashMap<DeclId, DeclId>,
) {
    ty.walk_mut(&mut |node| {
        if let Type::UnresolvedUserType(name, args) = node {
            *node = resolve_name(analysis, name, args, enclosing_id, enclosing_is_struct, file_path, namespaces, self_forwards);
        }
    });
}

fn resolve_decl(analysis: &mut Analysis, id: DeclId, self_forwards: &mut FxHashMap<DeclId, DeclId>) {
    let mut decl = analysis.arena.get(id).clone();
    let file_path = decl.file_path().map(str::to_string);
    let namespaces = decl.namespaces().to_vec();
    let is_struct = matches!(decl, Declaration::Struct(_));

    match &mut decl {
        Declaration::Struct(s) => {
            if let Some(base) = &mut s.base {
                resolve_type_in_place(analysis, base, id, is_struct, file_path.as_deref(), &namespaces, self_forwards);
            }
            for field in &mut s.fields {
                resolve_type_in_place(analysis, &mut field.ty, id, is_struct, file_path.as_deref(), &namespaces, self_forwards);
            }
        }
        Declaration::Service(svc) => {
            if let Some(base) = &mut svc.base {
                resolve_type_in_place(analysis, base, id, is_struct, file_path.as_deref(), &namespaces, self_forwards);
            }
            for method in &mut svc.methods {
                let (result, input) = match &mut method.kind {
                    MethodKind::Function { result, input } => (Some(result), input),
                    MethodKind::Event { input } => (None, input),
                };
                if let Some(MethodType::Unary(t) | MethodType::Streaming(t)) = result {
                    resolve_type_in_place(analysis, t, id, is_struct, file_path.as_deref(), &namespaces, self_forwards);
                }
                if let MethodType::Unary(t) | MethodType::Streaming(t) = input {
                    resolve_type_in_place(analysis, t, id, is_struct, file_path.as_deref(), &namespaces, self_forwards);
                }
            }
        }
        Declaration::Alias(a) => resolve_type_in_place(analysis, &mut a.target, id, is_struct, file_path.as_deref(), &namespaces, self_forwards),
        Declaration::Enum(_) | Declaration::Forward(_) => {}
    }

    *analysis.arena.get_mut(id) = decl;
}

fn resolve_name(
    analysis: &mut Analysis,
    name: &str,
    args: &[Type],
    enclosing_id: DeclId,
    enclosing_is_struct: bool,
    file_path: Option<&str>,
    namespaces: &[bond_ast::NamespaceRef],
    self_forwards: &mut FxHashMap<DeclId, DeclId>,
) -> Type {
    let resolved = if !name.contains('.') {
        analysis.aliases.lookup(file_path, name)
    } else {
        None
    }
    .or_else(|| analysis.symbols.lookup(&analysis.arena, name, namespaces));

    match resolved {
        Some(rid) if rid == enclosing_id && enclosing_is_struct => {
            let forward_id = *self_forwards.entry(enclosing_id).or_insert_with(|| {
                let enclosing = analysis.arena.get(enclosing_id);
                let forward = ForwardDecl {
                    name: enclosing.name().to_string(),
                    namespaces: enclosing.namespaces().to_vec(),
                    type_params: enclosing.type_params().to_vec(),
                    span: enclosing.span(),
                    file_path: enclosing.file_path().map(str::to_string),
                    synthesized: true,
                };
                analysis.arena.alloc(Declaration::Forward(forward))
            });
            Type::UserDefined(forward_id, args.to_vec())
        }
        Some(rid) => Type::UserDefined(rid, args.to_vec()),
        None => {
            if args.is_empty() {
                if let Some(prim) = Type::primitive_from_name(name) {
                    return prim;
                }
            }
            Type::UnresolvedUserType(name.to_string(), args.to_vec())
        }
    }
}

/// A bare-identifier default (`Default::Enum(text)`) that the builder could
/// not disambiguate from a bool literal at build time, now that the field's
/// type is known to be `Bool`.
fn fixup_bool_enum_defaults(analysis: &mut Analysis, decl_ids: &[DeclId]) {
    for &id in decl_ids {
        if let Declaration::Struct(s) = analysis.arena.get_mut(id) {
            for field in &mut s.fields {
                if field.ty == Type::Bool {
                    if let Some(bond_ast::Default::Enum(text)) = &field.default {
                        let value = match text.as_str() {
                            "true" => Some(true),
                            "false" => Some(false),
                            _ => None,
                        };
                        if let Some(value) = value {
                            field.default = Some(bond_ast::Default::Bool(value));
                        }
                    }
                }
            }
        }
    }
}

fn report_unresolved(analysis: &mut Analysis, decl_ids: &[DeclId]) {
    for &id in decl_ids {
        let decl = analysis.arena.get(id).clone();
        let file_path = decl.file_path().map(str::to_string);

        let mut check = |ty: &Type, span: bond_common::span::Span| {
            let mut found = None;
            ty.walk(&mut |node| {
                if let Type::UnresolvedUserType(name, _) = node {
                    if found.is_none() {
                        found = Some(name.clone());
                    }
                }
            });
            if let Some(name) = found {
                analysis.error(ErrorKind::UnresolvedType, format!("unresolved type `{name}`"), span, file_path.as_deref());
            }
        };

        match &decl {
            Declaration::Struct(s) => {
                if let Some(base) = &s.base {
                    check(base, s.span);
                }
                for field in &s.fields {
                    check(&field.ty, field.span);
                }
            }
            Declaration::Service(svc) => {
                if let Some(base) = &svc.base {
                    check(base, svc.span);
                }
                for method in &svc.methods {
                    let types: Vec<&Type> = match &method.kind {
                        MethodKind::Function { result, input } => [method_type_ref(result), method_type_ref(input)]
                            .into_iter()
                            .flatten()
                            .collect(),
                        MethodKind::Event { input } => method_type_ref(input).into_iter().collect(),
                    };
                    for t in types {
                        check(t, method.span);
                    }
                }
            }
            Declaration::Alias(a) => check(&a.target, a.span),
            Declaration::Enum(_) | Declaration::Forward(_) => {}
        }
    }
}

fn method_type_ref(mt: &MethodType) -> Option<&Type> {
    match mt {
        MethodType::Unary(t) | MethodType::Streaming(t) => Some(t),
        MethodType::Void => None,
    }
}
