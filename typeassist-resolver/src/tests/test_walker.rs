use crate::*;
use pretty_assertions::assert_eq;
use typeassist_parser::parse_program;

fn top_level<'a>(index: &SourceIndex<'a>, name: &str) -> Declaration<'a> {
    index
        .top_level_values()
        .find(|declaration| declaration.name() == name)
        .unwrap_or_else(|| panic!("no top-level declaration named {name}"))
}

fn names(path: &[Declaration<'_>]) -> Vec<String> {
    path.iter().map(|declaration| declaration.name().to_string()).collect()
}

const ALIAS_CHAIN: &str = r#"
declare function f(n: number): (s: string) => (b: boolean) => (x: number) => string;
const a = f(5);
const b = a("x");
const c = b(true);
"#;

#[test]
fn test_alias_chain_collects_calls_in_application_order() {
    let program = parse_program(ALIAS_CHAIN).unwrap();
    let index = SourceIndex::new(&program);

    let walk = AliasWalker::new(&index, 64, "any")
        .walk(top_level(&index, "c"))
        .unwrap();

    let arguments: Vec<&str> = walk
        .call_sites
        .iter()
        .map(|site| site.argument_text.as_str())
        .collect();
    assert_eq!(arguments, vec!["(5)", "(\"x\")", "(true)"]);
    assert_eq!(names(&walk.path), vec!["c", "b", "a", "f"]);
    assert_eq!(walk.terminal.name(), "f");
    assert_eq!(
        walk.resolved.value.signature(),
        "(n: number) => (s: string) => (b: boolean) => (x: number) => string"
    );
}

#[test]
fn test_function_declaration_keeps_generic_names() {
    let program = parse_program(
        "declare function print4<T, A, C>(t1: Type1, t2: number): (t: T, a: A) => (c: A) => (d: T) => (e: C) => string;",
    )
    .unwrap();
    let index = SourceIndex::new(&program);

    let walk = AliasWalker::new(&index, 64, "any")
        .walk(top_level(&index, "print4"))
        .unwrap();

    assert!(walk.call_sites.is_empty());
    assert_eq!(walk.resolved.declared_generic_names, vec!["T", "A", "C"]);
    assert_eq!(walk.resolved.all_return_types().len(), 6);
}

#[test]
fn test_plain_return_type_keeps_generic_names() {
    let program =
        parse_program("declare function load<T>(url: string): Promise<T>;").unwrap();
    let index = SourceIndex::new(&program);

    let walk = AliasWalker::new(&index, 64, "any")
        .walk(top_level(&index, "load"))
        .unwrap();

    assert!(!walk.resolved.value.is_function());
    assert_eq!(walk.resolved.declared_generic_names, vec!["T"]);
}

#[test]
fn test_inline_arrow_is_a_function_expression() {
    let program =
        parse_program("const add = (a: number) => (b: number): number => a + b;").unwrap();
    let index = SourceIndex::new(&program);

    let walk = AliasWalker::new(&index, 64, "any")
        .walk(top_level(&index, "add"))
        .unwrap();

    assert!(matches!(
        walk.resolved.value,
        FunctionValue::FunctionExpression { .. }
    ));
    assert_eq!(
        walk.resolved.value.signature(),
        "(a: number) => (b: number) => number"
    );
}

#[test]
fn test_annotated_variable_ends_the_walk() {
    let program = parse_program(
        "declare const handler: (event: string) => (payload: unknown) => void;\nconst h = handler;",
    )
    .unwrap();
    let index = SourceIndex::new(&program);

    let walk = AliasWalker::new(&index, 64, "any")
        .walk(top_level(&index, "h"))
        .unwrap();

    assert_eq!(names(&walk.path), vec!["h", "handler"]);
    assert_eq!(
        walk.resolved.value.signature(),
        "(event: string) => (payload: unknown) => void"
    );
}

#[test]
fn test_type_assertion_initializer_uses_asserted_type() {
    let program = parse_program(
        "declare const raw: unknown;\nconst parse = raw as (text: string) => number;",
    )
    .unwrap();
    let index = SourceIndex::new(&program);

    let walk = AliasWalker::new(&index, 64, "any")
        .walk(top_level(&index, "parse"))
        .unwrap();

    assert_eq!(walk.resolved.value.signature(), "(text: string) => number");
}

#[test]
fn test_alias_cycle_is_reported() {
    let program = parse_program("const a = b;\nconst b = a;").unwrap();
    let index = SourceIndex::new(&program);

    let error = AliasWalker::new(&index, 64, "any")
        .walk(top_level(&index, "a"))
        .unwrap_err();

    match error {
        ResolveError::AliasCycle { path, .. } => assert_eq!(path, "a -> b -> a"),
        other => panic!("Expected alias cycle, got {:?}", other),
    }
}

#[test]
fn test_depth_limit_is_enforced() {
    let program = parse_program(
        "declare function f(n: number): (m: number) => number;\nconst a = f;\nconst b = a;\nconst c = b;",
    )
    .unwrap();
    let index = SourceIndex::new(&program);

    let error = AliasWalker::new(&index, 2, "any")
        .walk(top_level(&index, "c"))
        .unwrap_err();

    assert!(matches!(error, ResolveError::AliasDepthExceeded { limit: 2, .. }));

    let walk = AliasWalker::new(&index, 4, "any")
        .walk(top_level(&index, "c"))
        .unwrap();
    assert_eq!(walk.terminal.name(), "f");
}

#[test]
fn test_literal_initializer_has_no_function_value() {
    let program = parse_program("const count = 5;").unwrap();
    let index = SourceIndex::new(&program);

    let error = AliasWalker::new(&index, 64, "any")
        .walk(top_level(&index, "count"))
        .unwrap_err();

    assert!(matches!(error, ResolveError::NoFunctionValue { ref name, .. } if name == "count"));
}

#[test]
fn test_unresolved_alias_target() {
    let program = parse_program("const a = missing(1);").unwrap();
    let index = SourceIndex::new(&program);

    let error = AliasWalker::new(&index, 64, "any")
        .walk(top_level(&index, "a"))
        .unwrap_err();

    assert!(matches!(error, ResolveError::UnresolvedReference { ref name, .. } if name == "missing"));
}
