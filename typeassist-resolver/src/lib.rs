//! TypeAssist Resolver
//!
//! Infers the type of an expression that references a curried, generic,
//! possibly partially applied function, so an explicit annotation can be
//! written at the point of use.
//!
//! ## Architecture
//!
//! - **Signature Model** (`signature`): function values and their curried return types
//! - **Call-Site Model** (`call_site`): argument lists and explicit type arguments on a callee spine
//! - **Source Index** (`index`): lexical scopes and the `ReferenceResolver` seam
//! - **Alias Walker** (`walker`): follows variable aliases back to a function value
//! - **Evaluators** (`evaluators`): pick the remaining type after N applications
//! - **Leaf Resolver** (`leaf`): declared types of plain values
//! - **Assignment Composition** (`assignment`): the declaration text that replaces a statement

pub mod assignment;
pub mod call_site;
pub mod config;
pub mod error;
pub mod evaluators;
pub mod generics;
pub mod index;
pub mod leaf;
pub mod locate;
pub mod resolver;
pub mod results;
pub mod signature;
pub mod walker;

// Re-export public API
pub use assignment::{assignment_edit, check_declared_return, compose, suggested_name, AssignmentEdit};
pub use call_site::{extract_actual_generic_arguments, from_usage_expression, CallSite};
pub use config::{AssistConfig, DeclarationKeyword, FormatConfig, GenericArgumentPolicy, ResolverConfig};
pub use error::{AssignmentError, AssistError, ConfigError, ResolveError};
pub use evaluators::{Evaluator, EvaluatorKind};
pub use generics::{substitute_generics, GenericBinding};
pub use index::{Declaration, ReferenceResolver, SourceIndex};
pub use locate::{expression_statement_at, offset_at};
pub use resolver::{ChainResolution, Resolution, TypeResolver, TypeSource};
pub use results::{OriginalCallChain, ResolvedFunctionValue};
pub use signature::FunctionValue;
pub use walker::AliasWalker;

use typeassist_parser::{Expression, Program, Statement};

/// What the resolver found for one expression, for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReport {
    pub expression: String,
    pub resolution: Resolution,
    pub alias_path: Vec<String>,
    pub call_sites: Vec<String>,
    pub generic_arguments: Vec<String>,
    pub declared_generic_names: Vec<String>,
    pub all_return_types: Vec<String>,
    pub evaluator: Option<EvaluatorKind>,
}

/// Replace the expression statement at `offset` with a typed declaration
pub fn suggest_assignment(
    source: &str,
    offset: usize,
    config: &AssistConfig,
) -> Result<AssignmentEdit, AssistError> {
    let program = typeassist_parser::parse_program(source)?;
    let statement = statement_at(&program, offset)?;
    let expression = statement_expression(statement, offset)?;

    let index = SourceIndex::new(&program);
    let type_resolver = TypeResolver::new(&index, &config.resolver);
    let declaration = type_resolver.reference_declaration(expression)?;
    check_declared_return(&declaration, expression)?;
    let resolution = type_resolver.resolve(expression)?;

    Ok(assignment_edit(source, statement, &resolution, &config.format)?)
}

/// Resolve the expression statement at `offset` and describe how
pub fn resolve_type_at(
    source: &str,
    offset: usize,
    config: &AssistConfig,
) -> Result<TypeReport, AssistError> {
    let program = typeassist_parser::parse_program(source)?;
    let statement = statement_at(&program, offset)?;
    let expression = statement_expression(statement, offset)?;

    let index = SourceIndex::new(&program);
    let text = &source[expression.span.start..expression.span.end];
    Ok(report(&index, expression, text, config)?)
}

/// Resolve a standalone expression against the top-level declarations of `program`
pub fn resolve_expression_in(
    program: &Program,
    expression_source: &str,
    config: &AssistConfig,
) -> Result<TypeReport, AssistError> {
    let expression = typeassist_parser::parse_expression(expression_source)?;
    let index = SourceIndex::new(program);
    Ok(report(
        &index.at_top_level(),
        &expression,
        expression_source.trim(),
        config,
    )?)
}

fn report<'a, R>(
    resolver: &R,
    expression: &Expression,
    text: &str,
    config: &AssistConfig,
) -> Result<TypeReport, ResolveError>
where
    R: ReferenceResolver<'a>,
{
    let type_resolver = TypeResolver::new(resolver, &config.resolver);
    let resolution = type_resolver.resolve(expression)?;

    let mut report = TypeReport {
        expression: text.to_string(),
        resolution,
        alias_path: Vec::new(),
        call_sites: from_usage_expression(expression)
            .iter()
            .map(CallSite::to_string)
            .collect(),
        generic_arguments: Vec::new(),
        declared_generic_names: Vec::new(),
        all_return_types: Vec::new(),
        evaluator: None,
    };

    let source = report.resolution.source();
    report.evaluator = source.and_then(TypeSource::evaluator_kind);

    // Leaves and declared-type fallbacks have no chain to describe
    let walked = matches!(
        source,
        Some(TypeSource::FunctionType | TypeSource::FullTypeFunction | TypeSource::UncalledFunction)
    );
    if !walked {
        return Ok(report);
    }

    if let Ok(chain) = type_resolver.resolve_chain(expression) {
        report.alias_path = chain
            .walk
            .path
            .iter()
            .map(|declaration| declaration.name().to_string())
            .collect();
        if let Some(call_chain) = &chain.chain {
            report.call_sites = call_chain.call_sites().iter().map(CallSite::to_string).collect();
            report.generic_arguments = call_chain.actual_generic_arguments().to_vec();
        }
        report.declared_generic_names = chain.walk.resolved.declared_generic_names.clone();
        report.all_return_types = chain.walk.resolved.all_return_types();
    }

    Ok(report)
}

fn statement_at(program: &Program, offset: usize) -> Result<&Statement, AssignmentError> {
    expression_statement_at(program, offset)
        .ok_or(AssignmentError::NoExpressionAtCursor { offset })
}

fn statement_expression(statement: &Statement, offset: usize) -> Result<&Expression, AssignmentError> {
    match &statement.kind {
        typeassist_parser::StatementKind::Expression(expression) => Ok(expression),
        _ => Err(AssignmentError::NoExpressionAtCursor { offset }),
    }
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests;
