use crate::*;
use pretty_assertions::assert_eq;

#[test]
fn test_function_type() {
    let annotation = parse_type("<T>(value: T, count?: number) => T[]").unwrap();

    let function = annotation.as_function().unwrap();
    assert_eq!(function.type_parameters.as_ref().unwrap().names(), vec!["T"]);
    assert_eq!(function.parameters.text, "(value: T, count?: number)");
    assert!(function.parameters.parameters[1].optional);
    assert_eq!(function.return_type.text, "T[]");
    assert!(matches!(function.return_type.kind, TypeKind::Array(_)));
}

#[test]
fn test_curried_function_type_nests_to_the_right() {
    let annotation = parse_type("(a: number) => (b: string) => boolean").unwrap();

    let outer = annotation.as_function().unwrap();
    let inner = outer.return_type.as_function().unwrap();
    assert_eq!(inner.parameters.text, "(b: string)");
    assert_eq!(inner.return_type.text, "boolean");
}

#[test]
fn test_union_with_array_member() {
    let annotation = parse_type("string | number[]").unwrap();

    match &annotation.kind {
        TypeKind::Union(members) => {
            assert_eq!(members.len(), 2);
            assert_eq!(members[0].text, "string");
            assert_eq!(members[1].text, "number[]");
            assert!(matches!(members[1].kind, TypeKind::Array(_)));
        }
        other => panic!("Expected union, got {:?}", other),
    }
}

#[test]
fn test_parenthesized_function_in_union() {
    let annotation = parse_type("((a: string) => void) | null").unwrap();

    assert!(annotation.as_function().is_none());
    match &annotation.kind {
        TypeKind::Union(members) => {
            let function = members[0].as_function().unwrap();
            assert_eq!(function.return_type.text, "void");
            assert_eq!(members[1].text, "null");
        }
        other => panic!("Expected union, got {:?}", other),
    }
}

#[test]
fn test_parenthesized_function_type_unwraps() {
    let annotation = parse_type("((x: number) => string)").unwrap();

    assert!(matches!(annotation.kind, TypeKind::Parenthesized(_)));
    assert_eq!(annotation.unparenthesized().text, "(x: number) => string");
    assert!(annotation.as_function().is_some());
}

#[test]
fn test_object_type_members() {
    let annotation = parse_type("{ name: string; run(x: number): void }").unwrap();

    match &annotation.kind {
        TypeKind::Object(object) => {
            assert_eq!(object.members.len(), 2);
            assert!(matches!(object.member("name"), Some(TypeMember::Property(_))));
            assert!(matches!(object.member("run"), Some(TypeMember::Method(_))));
            assert!(object.member("missing").is_none());
        }
        other => panic!("Expected object type, got {:?}", other),
    }
}

#[test]
fn test_nested_generic_reference() {
    let annotation = parse_type("Map<string, Array<number>>").unwrap();

    assert_eq!(annotation.text, "Map<string, Array<number>>");
    match &annotation.kind {
        TypeKind::Reference { name, arguments } => {
            assert_eq!(name, "Map");
            assert_eq!(
                arguments.as_ref().unwrap().texts(),
                vec!["string", "Array<number>"]
            );
        }
        other => panic!("Expected type reference, got {:?}", other),
    }
}

#[test]
fn test_tuple_with_labelled_element() {
    let annotation = parse_type("[string, count: number]").unwrap();

    match &annotation.kind {
        TypeKind::Tuple(elements) => {
            assert_eq!(elements.len(), 2);
            assert_eq!(elements[1].text, "number");
        }
        other => panic!("Expected tuple, got {:?}", other),
    }
}

#[test]
fn test_keyof_operator() {
    let annotation = parse_type("keyof Person").unwrap();

    match &annotation.kind {
        TypeKind::Operator { operator, operand } => {
            assert_eq!(*operator, TypeOperator::Keyof);
            assert_eq!(operand.text, "Person");
        }
        other => panic!("Expected type operator, got {:?}", other),
    }
}

#[test]
fn test_literal_union() {
    let annotation = parse_type(r#""on" | "off""#).unwrap();

    match &annotation.kind {
        TypeKind::Union(members) => {
            assert!(members
                .iter()
                .all(|member| matches!(member.kind, TypeKind::Literal(_))));
        }
        other => panic!("Expected union, got {:?}", other),
    }
}

#[test]
fn test_qualified_name_and_typeof() {
    let qualified = parse_type("ns.Inner").unwrap();
    assert!(matches!(
        qualified.kind,
        TypeKind::Reference { ref name, .. } if name == "ns.Inner"
    ));

    let query = parse_type("typeof handler").unwrap();
    assert_eq!(query.kind, TypeKind::Query("handler".to_string()));
}
