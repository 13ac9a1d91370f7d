use crate::*;
use pretty_assertions::assert_eq;
use typeassist_parser::parse_expression;

fn typed(type_text: &str) -> Resolution {
    Resolution::Typed {
        type_text: type_text.to_string(),
        source: TypeSource::FunctionType,
    }
}

#[test]
fn test_compose_typed_declaration() {
    let format = FormatConfig::default();

    assert_eq!(
        compose("foo(1)(2);", &typed("(c: number) => string"), "val", &format).unwrap(),
        "const val: (c: number) => string = foo(1)(2);"
    );
}

#[test]
fn test_compose_untyped_declaration() {
    let format = FormatConfig::default();

    assert_eq!(
        compose("count", &Resolution::Untyped, "val", &format).unwrap(),
        "const val = count;"
    );
}

#[test]
fn test_compose_honours_keyword_and_terminator() {
    let format = FormatConfig {
        declaration: DeclarationKeyword::Let,
        end_with_semicolon: false,
        ..FormatConfig::default()
    };

    assert_eq!(
        compose("foo(1);", &typed("string"), "result", &format).unwrap(),
        "let result: string = foo(1)"
    );
}

#[test]
fn test_absent_values_cannot_be_assigned() {
    let format = FormatConfig::default();

    for type_text in ["void", "undefined", "null", "never"] {
        let error = compose("log(1)", &typed(type_text), "val", &format).unwrap_err();
        assert!(
            matches!(error, AssignmentError::UnassignableType { type_text: ref found, .. } if found == type_text)
        );
    }
    assert!(compose("log(1)", &typed("void | string"), "val", &format).is_ok());
}

#[test]
fn test_suggested_name() {
    let member = parse_expression("user.profile.name").unwrap();
    let call = parse_expression("user.load(1)").unwrap();

    assert_eq!(suggested_name(&member, "val"), "name");
    assert_eq!(suggested_name(&call, "val"), "val");
}

const SOURCE: &str = r#"declare function add(a: number): (b: number) => (c: number) => number;
add(1)(2);
"#;

#[test]
fn test_suggest_assignment_rewrites_the_statement() {
    let offset = SOURCE.find("add(1)").unwrap();

    let edit = suggest_assignment(SOURCE, offset, &AssistConfig::default()).unwrap();

    assert_eq!(edit.replacement, "const val: (c: number) => number = add(1)(2);");
    let applied = edit.apply(SOURCE);
    assert_eq!(
        applied,
        "declare function add(a: number): (b: number) => (c: number) => number;\nconst val: (c: number) => number = add(1)(2);\n"
    );
    assert_eq!(&applied[edit.cursor..edit.cursor + 3], "val");
}

#[test]
fn test_suggest_assignment_with_let_keyword() {
    let offset = SOURCE.find("add(1)").unwrap();
    let mut config = AssistConfig::default();
    config.format.declaration = DeclarationKeyword::Let;

    let edit = suggest_assignment(SOURCE, offset, &config).unwrap();
    let applied = edit.apply(SOURCE);

    assert!(applied.contains("let val: (c: number) => number = add(1)(2);"));
    assert_eq!(&applied[edit.cursor..edit.cursor + 3], "val");
}

#[test]
fn test_cursor_outside_an_expression_statement() {
    let error = suggest_assignment(SOURCE, 0, &AssistConfig::default()).unwrap_err();

    assert!(matches!(
        error,
        AssistError::Assignment(AssignmentError::NoExpressionAtCursor { offset: 0 })
    ));
}

#[test]
fn test_void_result_is_rejected_with_location() {
    let source = "declare function log(message: string): void;\nlog(\"hi\");";
    let offset = source.find("log(\"hi\")").unwrap();

    let error = suggest_assignment(source, offset, &AssistConfig::default()).unwrap_err();

    match error {
        AssistError::Assignment(AssignmentError::UnassignableType { type_text, span }) => {
            assert_eq!(type_text, "void");
            assert!(span.is_some());
        }
        other => panic!("Expected unassignable type, got {:?}", other),
    }
}

#[test]
fn test_function_declared_to_return_any_is_refused() {
    let source = "declare function parse(text: string): any;\nparse(\"1\");\nparse;";
    let config = AssistConfig::default();

    for needle in ["parse(\"1\")", "parse;"] {
        let offset = source.rfind(needle).unwrap();
        match suggest_assignment(source, offset, &config).unwrap_err() {
            AssistError::Assignment(AssignmentError::UnassignableType { type_text, .. }) => {
                assert_eq!(type_text, "any");
            }
            other => panic!("Expected unassignable type, got {:?}", other),
        }
    }
}

#[test]
fn test_implicit_any_from_an_unannotated_arrow_is_assigned() {
    let source = "const make = (a: number) => (b: number) => a + b;\nmake(1);";
    let offset = source.find("make(1)").unwrap();

    let edit = suggest_assignment(source, offset, &AssistConfig::default()).unwrap();
    assert_eq!(edit.replacement, "const val: (b: number) => any = make(1);");
}

#[test]
fn test_statement_inside_arrow_body() {
    let source = r#"declare function fetchUser(id: number): (fields: string[]) => Promise<User>;
const handler = () => {
    fetchUser(1);
};
"#;
    let offset = source.find("fetchUser(1)").unwrap();

    let program = typeassist_parser::parse_program(source).unwrap();
    assert!(expression_statement_at(&program, offset).is_some());

    let edit = suggest_assignment(source, offset, &AssistConfig::default()).unwrap();
    assert_eq!(
        edit.replacement,
        "const val: (fields: string[]) => Promise<User> = fetchUser(1);"
    );
}

#[test]
fn test_offset_at_line_and_column() {
    let source = "let a = 1;\nfoo(é, 2);\n";

    assert_eq!(offset_at(source, 1, 1), Some(0));
    assert_eq!(offset_at(source, 2, 1), Some(11));
    // é is two bytes wide
    assert_eq!(offset_at(source, 2, 7), Some(18));
    assert_eq!(offset_at(source, 0, 1), None);
    assert_eq!(offset_at(source, 9, 1), None);
}
