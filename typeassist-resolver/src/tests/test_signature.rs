use crate::signature::{all_return_types, arrow_chain_signature, split_top_level_arrows};
use crate::*;
use pretty_assertions::assert_eq;

#[test]
fn test_all_return_types_lists_every_suffix() {
    assert_eq!(
        all_return_types("(t: T, a: A) => (c: A) => (d: T) => string"),
        vec![
            "(t: T, a: A) => (c: A) => (d: T) => string",
            "(c: A) => (d: T) => string",
            "(d: T) => string",
            "string",
        ]
    );
}

#[test]
fn test_all_return_types_of_plain_type() {
    assert_eq!(all_return_types("string"), vec!["string"]);
    assert!(all_return_types("   ").is_empty());
}

#[test]
fn test_arrows_inside_parameters_are_not_layers() {
    assert_eq!(
        all_return_types("(cb: (x: number) => void) => Promise<() => void>"),
        vec![
            "(cb: (x: number) => void) => Promise<() => void>",
            "Promise<() => void>",
        ]
    );
}

#[test]
fn test_split_ignores_arrows_in_string_literals() {
    let segments = split_top_level_arrows("(s: \"=>\") => number");
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].trim(), "(s: \"=>\")");
    assert_eq!(segments[1].trim(), "number");
}

#[test]
fn test_standard_function_signature() {
    let value = FunctionValue::standard("(a: number)", "(b: number) => number", vec![]).unwrap();

    assert!(value.is_function());
    assert_eq!(value.signature(), "(a: number) => (b: number) => number");
    assert_eq!(value.to_string(), value.signature());
    assert_eq!(value.all_return_types().len(), 3);
}

#[test]
fn test_blank_parts_build_no_value() {
    assert!(FunctionValue::standard("", "string", vec![]).is_none());
    assert!(FunctionValue::standard("(a)", " ", vec![]).is_none());
    assert!(FunctionValue::function_expression("", vec![]).is_none());
    assert!(FunctionValue::non_function("").is_none());
}

#[test]
fn test_non_function_return_type_is_terminal() {
    let value = FunctionValue::non_function("Promise<User>").unwrap();

    assert!(!value.is_function());
    assert!(value.declared_generic_names().is_empty());
    assert_eq!(value.all_return_types(), vec!["Promise<User>"]);
}

#[test]
fn test_arrow_chain_without_annotations_ends_in_any() {
    assert_eq!(
        arrow_chain_signature("(x: number) => (y: number) => x * y"),
        "(x: number) => (y: number) => any"
    );
}

#[test]
fn test_arrow_chain_stops_at_return_annotation() {
    assert_eq!(
        arrow_chain_signature("(x: number) => (y: number): number => x * y"),
        "(x: number) => (y: number) => number"
    );
}

#[test]
fn test_arrow_chain_with_block_body() {
    assert_eq!(
        arrow_chain_signature("async (url: string) => { return fetch(url); }"),
        "(url: string) => any"
    );
}

#[test]
fn test_function_expression_signature() {
    let value = FunctionValue::function_expression(
        "function (a: string): boolean { return true; }",
        vec![],
    )
    .unwrap();

    assert_eq!(value.signature(), "(a: string) => boolean");
}
