use crate::evaluators::return_type_index;
use crate::*;
use pretty_assertions::assert_eq;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn scenario_value() -> ResolvedFunctionValue {
    ResolvedFunctionValue::new(
        FunctionValue::standard("(t: T, a: A)", "(c: A) => (d: T) => string", strings(&["T", "A"]))
            .unwrap(),
    )
}

fn chain_of(calls: usize, generic_arguments: Vec<String>) -> OriginalCallChain {
    let sites = (0..calls)
        .map(|index| CallSite::new(format!("({index})"), vec![]))
        .collect();
    OriginalCallChain::new(sites, generic_arguments).unwrap()
}

#[test]
fn test_one_call_binds_generics_in_remaining_type() {
    let resolved = scenario_value();
    let chain = chain_of(1, strings(&["string", "number"]));

    let evaluator = Evaluator::select(Some(&chain), Some(&resolved)).unwrap();

    assert_eq!(evaluator.kind(), EvaluatorKind::FunctionType);
    assert_eq!(
        evaluator.evaluate(),
        Some("(c: number) => (d: string) => string".to_string())
    );
}

#[test]
fn test_uncalled_value_yields_full_signature() {
    let resolved = scenario_value();

    let evaluator = Evaluator::select(None, Some(&resolved)).unwrap();

    assert_eq!(evaluator.kind(), EvaluatorKind::FullTypeFunction);
    assert_eq!(
        evaluator.evaluate(),
        Some("(t: T, a: A) => (c: A) => (d: T) => string".to_string())
    );
}

#[test]
fn test_extra_calls_clamp_to_terminal_type() {
    let resolved = ResolvedFunctionValue::new(
        FunctionValue::standard("(a)", "(b) => (c) => (d) => (e) => string", vec![]).unwrap(),
    );

    let exact = chain_of(5, vec![]);
    let superfluous = chain_of(6, vec![]);

    assert_eq!(
        Evaluator::select(Some(&exact), Some(&resolved)).unwrap().evaluate(),
        Some("string".to_string())
    );
    assert_eq!(
        Evaluator::select(Some(&superfluous), Some(&resolved)).unwrap().evaluate(),
        Some("string".to_string())
    );
}

#[test]
fn test_called_non_function_value_is_its_type() {
    let resolved = ResolvedFunctionValue::with_generic_names(
        strings(&["T"]),
        FunctionValue::non_function("Promise<T>").unwrap(),
    );
    let chain = chain_of(1, strings(&["User"]));

    assert_eq!(
        Evaluator::select(Some(&chain), Some(&resolved)).unwrap().evaluate(),
        Some("Promise<User>".to_string())
    );
}

#[test]
fn test_no_resolved_value_selects_nothing() {
    let chain = chain_of(1, vec![]);

    assert!(Evaluator::select(Some(&chain), None).is_none());
    assert!(Evaluator::select(None, None).is_none());
}

#[test]
fn test_return_type_index() {
    assert_eq!(return_type_index(0, 3), Some(0));
    assert_eq!(return_type_index(2, 3), Some(2));
    assert_eq!(return_type_index(7, 3), Some(2));
    assert_eq!(return_type_index(1, 0), None);
}
