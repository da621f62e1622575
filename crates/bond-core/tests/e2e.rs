//! End-to-end scenarios exercised through the public facade rather than
//! any individual component crate.

use bond_core::{check_compatibility, parse_file, parse_string, ChangeCategory, ParseOptions};

fn compile(src: &str) -> bond_core::Ast {
    let result = parse_string(src, None, ParseOptions::default());
    assert!(result.success, "{:?}", result.errors);
    result.ast.unwrap()
}

/// Adding an optional field is compatible.
#[test]
fn adding_optional_field_is_compatible() {
    let old = compile("namespace T\nstruct U { 0: required string id; }\n");
    let new = compile("namespace T\nstruct U { 0: required string id; 1: optional string email; }\n");
    let changes = check_compatibility(&old.arena, &new.arena);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].category, ChangeCategory::Compatible);
    assert!(changes[0].description.contains("email"));
}

/// Changing a field's ordinal is a remove + add, both breaking.
#[test]
fn ordinal_change_is_remove_plus_add() {
    let old = compile("namespace T\nstruct U { 0: required string id; }\n");
    let new = compile("namespace T\nstruct U { 1: required string id; }\n");
    let changes = check_compatibility(&old.arena, &new.arena);
    assert_eq!(changes.len(), 2);
    assert!(changes.iter().all(|c| c.category == ChangeCategory::BreakingWire));
    assert!(changes.iter().any(|c| c.description.contains("removed")));
    assert!(changes.iter().any(|c| c.description.contains("added")));
}

/// vector<T> <-> list<T> is compatible and mentions both names.
#[test]
fn vector_list_equivalence() {
    let old = compile("namespace T\nstruct U { 0: required vector<string> tags; }\n");
    let new = compile("namespace T\nstruct U { 0: required list<string> tags; }\n");
    let changes = check_compatibility(&old.arena, &new.arena);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].category, ChangeCategory::Compatible);
    assert!(changes[0].description.contains("vector"));
    assert!(changes[0].description.contains("list"));
    assert!(!changes.iter().any(|c| c.category == ChangeCategory::BreakingWire));
}

/// Alias of alias resolves transitively.
#[test]
fn alias_of_alias_resolves() {
    let result = parse_string(
        "namespace T\nusing Inner = string;\nusing Outer = Inner;\nstruct U { 0: required Outer id; }\n",
        None,
        ParseOptions::default(),
    );
    assert!(result.success, "{:?}", result.errors);
    let ast = result.ast.unwrap();

    let u_id = *ast.root.declarations.last().unwrap();
    let bond_ast::Declaration::Struct(u) = ast.arena.get(u_id) else { panic!() };
    let bond_ast::Type::UserDefined(outer_id, _) = &u.fields[0].ty else {
        panic!("expected field to resolve to the Outer alias, got {:?}", u.fields[0].ty);
    };
    let bond_ast::Declaration::Alias(outer) = ast.arena.get(*outer_id) else { panic!() };
    assert_eq!(outer.name, "Outer");
    let bond_ast::Type::UserDefined(inner_id, _) = &outer.target else {
        panic!("expected Outer's target to resolve to the Inner alias, got {:?}", outer.target);
    };
    let bond_ast::Declaration::Alias(inner) = ast.arena.get(*inner_id) else { panic!() };
    assert_eq!(inner.target, bond_ast::Type::String);
}

/// An optional enum field without a default fails, with a located error.
#[test]
fn optional_enum_field_without_default_fails() {
    let result = parse_string(
        "namespace T\nenum S { A = 0 }\nstruct U { 0: optional S f; }\n",
        None,
        ParseOptions::default(),
    );
    assert!(!result.success);
    let err = result
        .errors
        .iter()
        .find(|e| e.kind == bond_core::ErrorKind::RequiredDefault)
        .expect("expected a RequiredDefault error");
    assert!(err.message.contains("default"));
    assert!(err.line > 0);
}

/// Inserting an enum constant in the middle without an explicit value
/// is breaking (it shifts every subsequent implicit value).
#[test]
fn enum_mid_insertion_without_value_is_breaking() {
    let old = compile("namespace T\nenum S { A, B, C }\n");
    let new = compile("namespace T\nenum S { A, X, B, C }\n");
    let changes = check_compatibility(&old.arena, &new.arena);
    assert!(changes.iter().any(|c| c.category == ChangeCategory::BreakingWire));
}

/// Rewriting an alias target from vector<int32> to list<int32> is not
/// breaking (type-change classification applies to aliases too).
#[test]
fn alias_vector_to_list_is_not_breaking() {
    let old = compile("namespace T\nusing Items = vector<int32>;\n");
    let new = compile("namespace T\nusing Items = list<int32>;\n");
    let changes = check_compatibility(&old.arena, &new.arena);
    assert!(!changes.iter().any(|c| c.category == ChangeCategory::BreakingWire));
}

/// Circular imports terminate and still produce a usable result.
#[test]
fn circular_imports_terminate() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("a.bond"),
        "import \"b.bond\";\nnamespace ns\nstruct A { 0: optional B b; }\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("b.bond"),
        "import \"a.bond\";\nnamespace ns\nstruct B { 0: optional A a; }\n",
    )
    .unwrap();

    let result = parse_file(dir.path().join("a.bond"), None, ParseOptions::default());
    assert!(result.success, "{:?}", result.errors);
    assert!(result.ast.is_some());
}

/// Diffing identical ASTs yields an empty set, and the checker is
/// deterministic across repeated invocations.
#[test]
fn identical_schemas_diff_to_nothing_and_deterministically() {
    let src = "namespace T\nstruct U { 0: required string id; 1: optional vector<int32> tags; }\nenum Color { Red, Green, Blue }\n";
    let a = compile(src);
    let b = compile(src);
    let changes = check_compatibility(&a.arena, &b.arena);
    assert!(changes.is_empty(), "{changes:?}");

    let c = compile(src);
    let again = check_compatibility(&a.arena, &c.arena);
    assert_eq!(changes, again);
}
