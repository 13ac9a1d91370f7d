use crate::*;
use pretty_assertions::assert_eq;

fn only_statement(program: &Program) -> &StatementKind {
    assert_eq!(program.statements.len(), 1);
    &program.statements[0].kind
}

#[test]
fn test_generic_function_with_curried_return_type() {
    let input = r#"
function print4<T, A, C>(t1: Type1, t2: number): (t: T, a: A) => (c: A) => (d: T) => (e: C) => string {
    return null;
}
"#;
    let program = parse_program(input).unwrap();

    match only_statement(&program) {
        StatementKind::Function(function) => {
            assert_eq!(function.name.name, "print4");
            assert_eq!(
                function.type_parameters.as_ref().unwrap().names(),
                vec!["T", "A", "C"]
            );
            assert_eq!(function.parameters.text, "(t1: Type1, t2: number)");
            assert_eq!(function.parameters.parameters.len(), 2);

            let return_type = function.return_type.as_ref().unwrap();
            assert_eq!(
                return_type.text,
                "(t: T, a: A) => (c: A) => (d: T) => (e: C) => string"
            );
            assert!(return_type.as_function().is_some());
            assert!(function.body.is_some());
        }
        other => panic!("Expected function declaration, got {:?}", other),
    }
}

#[test]
fn test_declared_function_without_body() {
    let input = "declare function make(a: string): (b: number) => boolean;";
    let program = parse_program(input).unwrap();

    match only_statement(&program) {
        StatementKind::Function(function) => {
            assert!(function.declared);
            assert!(function.body.is_none());
            assert_eq!(
                function.return_type.as_ref().unwrap().text,
                "(b: number) => boolean"
            );
        }
        other => panic!("Expected function declaration, got {:?}", other),
    }
}

#[test]
fn test_variable_statement_with_multiple_declarators() {
    let input = r#"let a = 1, b: string = "x";"#;
    let program = parse_program(input).unwrap();

    match only_statement(&program) {
        StatementKind::Variable(statement) => {
            assert_eq!(statement.kind, DeclarationKind::Let);
            assert_eq!(statement.declarators.len(), 2);

            let first = &statement.declarators[0];
            assert_eq!(first.name.as_identifier().unwrap().name, "a");
            assert!(first.type_annotation.is_none());
            assert!(matches!(
                first.initializer.as_ref().unwrap().kind,
                ExpressionKind::Number(_)
            ));

            let second = &statement.declarators[1];
            assert_eq!(second.type_annotation.as_ref().unwrap().text, "string");
        }
        other => panic!("Expected variable statement, got {:?}", other),
    }
}

#[test]
fn test_destructuring_declarator_keeps_pattern_text() {
    let input = "const { a, b } = pair;";
    let program = parse_program(input).unwrap();

    match only_statement(&program) {
        StatementKind::Variable(statement) => match &statement.declarators[0].name {
            BindingName::Pattern { text, .. } => assert_eq!(text, "{ a, b }"),
            other => panic!("Expected pattern, got {:?}", other),
        },
        other => panic!("Expected variable statement, got {:?}", other),
    }
}

#[test]
fn test_interface_members() {
    let input = r#"
interface Person extends Named {
    readonly age: number;
    greet(other: Person): string
    nickname?: string,
    [key: string]: unknown;
}
"#;
    let program = parse_program(input).unwrap();

    match only_statement(&program) {
        StatementKind::Interface(interface) => {
            assert_eq!(interface.name.name, "Person");
            assert_eq!(interface.extends.len(), 1);
            assert_eq!(interface.extends[0].text, "Named");
            assert_eq!(interface.body.members.len(), 4);

            match interface.body.member("age") {
                Some(TypeMember::Property(property)) => {
                    assert!(property.readonly);
                    assert_eq!(property.type_annotation.as_ref().unwrap().text, "number");
                }
                other => panic!("Expected age property, got {:?}", other),
            }

            match interface.body.member("greet") {
                Some(TypeMember::Method(method)) => {
                    assert_eq!(method.parameters.text, "(other: Person)");
                    assert_eq!(method.return_type.as_ref().unwrap().text, "string");
                }
                other => panic!("Expected greet method, got {:?}", other),
            }

            match interface.body.member("nickname") {
                Some(TypeMember::Property(property)) => assert!(property.optional),
                other => panic!("Expected nickname property, got {:?}", other),
            }

            assert!(matches!(interface.body.members[3], TypeMember::Index(_)));
        }
        other => panic!("Expected interface, got {:?}", other),
    }
}

#[test]
fn test_type_alias_of_curried_function() {
    let input = "type Curried = (a: number) => (b: number) => number;";
    let program = parse_program(input).unwrap();

    match only_statement(&program) {
        StatementKind::TypeAlias(alias) => {
            assert_eq!(alias.name.name, "Curried");
            let function = alias.type_annotation.as_function().unwrap();
            assert_eq!(function.parameters.text, "(a: number)");
            assert_eq!(function.return_type.text, "(b: number) => number");
        }
        other => panic!("Expected type alias, got {:?}", other),
    }
}

#[test]
fn test_import_and_export_forms() {
    let input = r#"
import { x } from "./x";
export const f = (a: number) => a;
export { f as g };
"#;
    let program = parse_program(input).unwrap();
    assert_eq!(program.statements.len(), 3);

    match &program.statements[0].kind {
        StatementKind::Import(import) => assert_eq!(import.specifier, "./x"),
        other => panic!("Expected import, got {:?}", other),
    }

    match &program.statements[1].kind {
        StatementKind::Variable(statement) => assert!(statement.exported),
        other => panic!("Expected exported variable, got {:?}", other),
    }

    assert!(matches!(
        program.statements[2].kind,
        StatementKind::Export(ExportStatement::Clause { .. })
    ));
}

#[test]
fn test_control_flow_statements() {
    let input = r#"
if (ready) {
    run();
} else run2();
for (let i = 0; i < 3; i++) { tick(i); }
while (busy) wait();
"#;
    let program = parse_program(input).unwrap();
    assert_eq!(program.statements.len(), 3);

    match &program.statements[0].kind {
        StatementKind::If(statement) => {
            assert!(matches!(statement.then_branch.kind, StatementKind::Block(_)));
            assert!(matches!(
                statement.else_branch.as_ref().unwrap().kind,
                StatementKind::Expression(_)
            ));
        }
        other => panic!("Expected if statement, got {:?}", other),
    }

    match &program.statements[1].kind {
        StatementKind::For(statement) => assert_eq!(statement.header, "(let i = 0; i < 3; i++)"),
        other => panic!("Expected for statement, got {:?}", other),
    }

    assert!(matches!(program.statements[2].kind, StatementKind::While(_)));
}

#[test]
fn test_comments_are_skipped() {
    let input = r#"
// leading comment
const a = 1; /* trailing
   block */
const b = 2;
"#;
    let program = parse_program(input).unwrap();
    assert_eq!(program.statements.len(), 2);
}

#[test]
fn test_spans_track_lines() {
    let input = "const a = 1;\nconst b = 2;";
    let program = parse_program(input).unwrap();

    let second = &program.statements[1];
    assert_eq!(second.span.start, 13);
    assert_eq!(second.span.start_line_col, Some((2, 1)));
}

#[test]
fn test_invalid_declaration_reports_error() {
    let result = parse_program("const = 5;");
    match result {
        Err(ParseError::PestError { .. }) => {}
        other => panic!("Expected pest error, got {:?}", other),
    }
}

#[test]
fn test_annotation_text_stops_before_trailing_whitespace() {
    let input = "interface Person { name: string ; age: number\n}";
    let program = parse_program(input).unwrap();

    match only_statement(&program) {
        StatementKind::Interface(interface) => {
            for (name, expected) in [("name", "string"), ("age", "number")] {
                match interface.body.member(name) {
                    Some(TypeMember::Property(property)) => {
                        let annotation = property.type_annotation.as_ref().unwrap();
                        assert_eq!(annotation.text, expected);
                        assert_eq!(&input[annotation.span.start..annotation.span.end], expected);
                    }
                    other => panic!("Expected {} property, got {:?}", name, other),
                }
            }
            let age = match interface.body.member("age") {
                Some(TypeMember::Property(property)) => property.type_annotation.as_ref().unwrap(),
                other => panic!("Expected age property, got {:?}", other),
            };
            assert_eq!(age.span.end_line_col, Some((1, 46)));
        }
        other => panic!("Expected interface, got {:?}", other),
    }
}
