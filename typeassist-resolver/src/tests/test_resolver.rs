use crate::*;
use pretty_assertions::assert_eq;
use typeassist_parser::{parse_program, StatementKind};

/// Resolve the final expression statement of `source`
fn resolve_last_with(source: &str, config: &ResolverConfig) -> Result<Resolution, ResolveError> {
    let program = parse_program(source).unwrap();
    let index = SourceIndex::new(&program);
    let expression = match &program.statements.last().unwrap().kind {
        StatementKind::Expression(expression) => expression,
        other => panic!("Expected expression statement, got {:?}", other),
    };
    TypeResolver::new(&index, config).resolve(expression)
}

fn resolve_last(source: &str) -> Result<Resolution, ResolveError> {
    resolve_last_with(source, &ResolverConfig::default())
}

/// Resolve the expression statement that contains `needle`
fn resolve_at(source: &str, needle: &str) -> TypeReport {
    let offset = source.find(needle).unwrap();
    resolve_type_at(source, offset, &AssistConfig::default()).unwrap()
}

fn typed(type_text: &str, source: TypeSource) -> Resolution {
    Resolution::Typed {
        type_text: type_text.to_string(),
        source,
    }
}

const PRINT4: &str = r#"
interface House { rooms: number }
declare const t1Value: Type1;
function print4<T, A, C>(t1: Type1, t2: number): (t: T, a: A) => (c: A) => (d: T) => (e: C) => string {
    return null;
}
"#;

#[test]
fn test_generic_partial_application() {
    let source = format!("{PRINT4}print4<string, number, House>(t1Value, 5);");

    assert_eq!(
        resolve_last(&source).unwrap(),
        typed(
            "(t: string, a: number) => (c: number) => (d: string) => (e: House) => string",
            TypeSource::FunctionType
        )
    );
}

#[test]
fn test_each_call_peels_one_layer() {
    let two = format!("{PRINT4}print4<string, number, House>(t1Value, 5)(\"a\", 1);");
    let all = format!(
        "{PRINT4}print4<string, number, House>(t1Value, 5)(\"a\", 1)(2)(\"d\")(house);"
    );

    assert_eq!(
        resolve_last(&two).unwrap().type_text(),
        Some("(c: number) => (d: string) => (e: House) => string")
    );
    assert_eq!(resolve_last(&all).unwrap().type_text(), Some("string"));
}

#[test]
fn test_uncalled_curried_function_is_its_full_signature() {
    let source = format!("{PRINT4}print4;");

    assert_eq!(
        resolve_last(&source).unwrap(),
        typed(
            "(t1: Type1, t2: number) => (t: T, a: A) => (c: A) => (d: T) => (e: C) => string",
            TypeSource::FullTypeFunction
        )
    );
}

#[test]
fn test_alias_chain_with_generics_on_first_call() {
    let source = r#"
declare function wrap<T>(value: T): (other: T) => (last: T) => T[];
const first = wrap<string>("x");
const second = first("y");
second;
"#;

    assert_eq!(
        resolve_last(source).unwrap(),
        typed("(last: string) => string[]", TypeSource::FunctionType)
    );
}

#[test]
fn test_calls_on_an_alias_continue_the_chain() {
    let source = r#"
declare function f(n: number): (s: string) => (b: boolean) => (x: number) => string;
const a = f(5);
const b = a("x");
const c = b(true);
c(1);
"#;

    assert_eq!(resolve_last(source).unwrap().type_text(), Some("string"));
}

#[test]
fn test_leaf_field_reports_declared_type() {
    let source = r#"
interface Person { name: string; age: number }
function show(person: Person) {
    person.age;
}
"#;

    let report = resolve_at(source, "person.age;");
    assert_eq!(report.resolution, typed("number", TypeSource::Leaf));
    assert_eq!(report.evaluator, None);
    assert!(report.call_sites.is_empty());
}

#[test]
fn test_unannotated_parameter_is_a_placeholder_leaf() {
    let source = "function show(value) {\n    value;\n}";

    let report = resolve_at(source, "value;");
    assert_eq!(report.resolution, typed("any", TypeSource::Leaf));
}

#[test]
fn test_parameters_visible_when_function_spans_whole_file() {
    let whole_file = "function show(value: number) {\n    value;\n}";
    let with_newline = format!("{whole_file}\n");

    for source in [whole_file, with_newline.as_str()] {
        let report = resolve_at(source, "value;");
        assert_eq!(report.resolution, typed("number", TypeSource::Leaf));
    }

    let program = parse_program(whole_file).unwrap();
    let index = SourceIndex::new(&program);
    assert!(matches!(
        index.lookup_value("value", whole_file.find("value;").unwrap()),
        Some(Declaration::Parameter(_))
    ));
}

#[test]
fn test_uncalled_plain_function() {
    let source = "function greet(name: string): string { return name; }\ngreet;";

    assert_eq!(
        resolve_last(source).unwrap(),
        typed("(name: string) => string", TypeSource::UncalledFunction)
    );
}

#[test]
fn test_called_plain_function_is_its_return_type() {
    let source = "declare function greet(name: string): string;\ngreet(\"x\");";

    assert_eq!(
        resolve_last(source).unwrap(),
        typed("string", TypeSource::FunctionType)
    );
}

#[test]
fn test_inline_arrow_chain() {
    let source = "const multiply = (x: number) => (y: number) => x * y;\nmultiply(2);";

    assert_eq!(
        resolve_last(source).unwrap().type_text(),
        Some("(y: number) => any")
    );
}

#[test]
fn test_generic_inline_arrow() {
    let source =
        "const pair = <T>(first: T) => (second: T): T[] => [first, second];\npair<string>(\"a\");";

    assert_eq!(
        resolve_last(source).unwrap().type_text(),
        Some("(second: string) => string[]")
    );
}

#[test]
fn test_type_alias_annotation_is_expanded() {
    let source = r#"
type Curried<T> = (a: T) => (b: T) => T;
function run(combine: Curried<number>) {
    combine(1);
}
"#;

    let report = resolve_at(source, "combine(1);");
    assert_eq!(report.resolution.type_text(), Some("(b: number) => number"));
    assert_eq!(report.call_sites, vec!["(1)"]);
}

#[test]
fn test_interface_method_with_generics() {
    let source = r#"
interface Api {
    fetch<T>(url: string): (retries: number) => Promise<T>;
}
function load(api: Api) {
    api.fetch<User>("/users");
}
"#;

    let report = resolve_at(source, "api.fetch");
    assert_eq!(
        report.resolution,
        typed("(retries: number) => Promise<User>", TypeSource::FunctionType)
    );
    assert_eq!(report.declared_generic_names, vec!["T"]);
    assert_eq!(report.generic_arguments, vec!["User"]);
}

#[test]
fn test_object_literal_property() {
    let source =
        "const ops = { twice: (n: number) => (m: number): number => n * m };\nops.twice(3);";

    assert_eq!(
        resolve_last(source).unwrap().type_text(),
        Some("(m: number) => number")
    );
}

#[test]
fn test_report_describes_the_alias_walk() {
    let source = r#"
declare function f(n: number): (s: string) => (b: boolean) => (x: number) => string;
const a = f(5);
const b = a("x");
const c = b(true);
c;
"#;

    let report = resolve_at(source, "c;");
    assert_eq!(report.expression, "c");
    assert_eq!(report.alias_path, vec!["c", "b", "a", "f"]);
    assert_eq!(report.call_sites, vec!["(5)", "(\"x\")", "(true)"]);
    assert_eq!(report.evaluator, Some(EvaluatorKind::FunctionType));
    assert_eq!(report.resolution.type_text(), Some("(x: number) => string"));
    assert_eq!(report.all_return_types.len(), 5);
}

#[test]
fn test_literal_alias_is_untyped() {
    let source = "const count = 5;\ncount;";

    assert_eq!(resolve_last(source).unwrap(), Resolution::Untyped);
}

#[test]
fn test_type_names_are_not_values() {
    let source = "interface Person { age: number }\nPerson;";

    assert!(matches!(
        resolve_last(source).unwrap_err(),
        ResolveError::NotAValue { ref name, .. } if name == "Person"
    ));
}

#[test]
fn test_unknown_reference() {
    assert!(matches!(
        resolve_last("missing(1);").unwrap_err(),
        ResolveError::UnresolvedReference { ref name, .. } if name == "missing"
    ));
}

#[test]
fn test_non_reference_root() {
    assert!(matches!(
        resolve_last("\"abc\".trim();").unwrap_err(),
        ResolveError::NotAReference { .. }
    ));
}

#[test]
fn test_conflicting_generics_follow_policy() {
    let source = r#"
declare function wrap<T>(value: T): (other: T) => T[];
const partial = wrap<string>("x");
partial<number>(1);
"#;

    assert_eq!(
        resolve_last(source).unwrap().type_text(),
        Some("string[]")
    );

    let strict = ResolverConfig {
        generic_arguments: GenericArgumentPolicy::RejectConflicts,
        ..ResolverConfig::default()
    };
    assert!(matches!(
        resolve_last_with(source, &strict).unwrap_err(),
        ResolveError::ConflictingGenericArguments { .. }
    ));
}

#[test]
fn test_inner_scope_shadows_outer_declaration() {
    let source = r#"
declare function handler(a: string): (b: string) => string;
function setup(handler: (n: number) => (m: number) => number) {
    handler(1);
}
"#;

    let report = resolve_at(source, "handler(1);");
    assert_eq!(report.resolution.type_text(), Some("(m: number) => number"));

    let program = parse_program(source).unwrap();
    let index = SourceIndex::new(&program);
    let inside = source.find("handler(1);").unwrap();
    assert!(matches!(
        index.lookup_value("handler", inside),
        Some(Declaration::Parameter(_))
    ));
    assert!(matches!(
        index.lookup_value("handler", 0),
        Some(Declaration::Function(_))
    ));
}

#[test]
fn test_expression_against_top_level_declarations() {
    let program = parse_program(PRINT4).unwrap();

    let report = resolve_expression_in(
        &program,
        "print4<boolean, string, House>(t1Value, 5)(\"a\", \"b\")",
        &AssistConfig::default(),
    )
    .unwrap();

    assert_eq!(
        report.resolution.type_text(),
        Some("(c: string) => (d: boolean) => (e: House) => string")
    );
}
