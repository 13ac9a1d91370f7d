//! Evaluators turn a call chain and a resolved function value into a type string

use crate::generics::GenericBinding;
use crate::results::{OriginalCallChain, ResolvedFunctionValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatorKind {
    FunctionType,
    FullTypeFunction,
}

impl std::fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluatorKind::FunctionType => write!(f, "function-type"),
            EvaluatorKind::FullTypeFunction => write!(f, "full-type-function"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Evaluator<'a> {
    /// The value was called: count applications, then bind generics
    FunctionType {
        chain: &'a OriginalCallChain,
        resolved: &'a ResolvedFunctionValue,
    },
    /// Referenced but never called: the whole signature
    FullTypeFunction { resolved: &'a ResolvedFunctionValue },
}

impl<'a> Evaluator<'a> {
    /// Pick an evaluator, or `None` when there is no function value to evaluate
    pub fn select(
        chain: Option<&'a OriginalCallChain>,
        resolved: Option<&'a ResolvedFunctionValue>,
    ) -> Option<Self> {
        let resolved = resolved?;
        let evaluator = match chain {
            Some(chain) => Evaluator::FunctionType { chain, resolved },
            None => Evaluator::FullTypeFunction { resolved },
        };
        tracing::debug!(evaluator = %evaluator.kind(), "selected evaluator");
        Some(evaluator)
    }

    pub fn kind(&self) -> EvaluatorKind {
        match self {
            Evaluator::FunctionType { .. } => EvaluatorKind::FunctionType,
            Evaluator::FullTypeFunction { .. } => EvaluatorKind::FullTypeFunction,
        }
    }

    pub fn evaluate(&self) -> Option<String> {
        match self {
            Evaluator::FunctionType { chain, resolved } => {
                let return_types = resolved.all_return_types();
                let index = return_type_index(chain.len(), return_types.len())?;
                let binding = GenericBinding::new(
                    &resolved.declared_generic_names,
                    chain.actual_generic_arguments(),
                );
                Some(binding.substitute(&return_types[index]))
            }
            Evaluator::FullTypeFunction { resolved } => {
                resolved.all_return_types().into_iter().next()
            }
        }
    }
}

/// Index into the return-type list after `calls` applications.
///
/// Calls beyond the declared layers clamp to the terminal type.
pub fn return_type_index(calls: usize, return_types: usize) -> Option<usize> {
    let last = return_types.checked_sub(1)?;
    Some(calls.min(last))
}
