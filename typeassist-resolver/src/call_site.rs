//! Call-site model
//!
//! One [`CallSite`] per syntactic application on an expression's callee
//! spine. `f<T>(1)(2)` has two sites; calls nested inside arguments belong to
//! other expressions and are never collected.

use typeassist_parser::{CallExpression, Expression, ExpressionKind, Span};

use crate::config::GenericArgumentPolicy;
use crate::error::{to_source_span, ResolveError, ResolveResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Verbatim argument list including the parentheses, `()` when empty
    pub argument_text: String,
    pub actual_generic_arguments: Vec<String>,
    pub span: Span,
}

impl CallSite {
    pub fn new(argument_text: impl Into<String>, actual_generic_arguments: Vec<String>) -> Self {
        Self {
            argument_text: argument_text.into(),
            actual_generic_arguments,
            span: Span::default(),
        }
    }

    pub fn from_call(call: &CallExpression) -> Self {
        Self {
            argument_text: call.arguments.text.clone(),
            actual_generic_arguments: call
                .type_arguments
                .as_ref()
                .map(|arguments| arguments.texts())
                .unwrap_or_default(),
            span: call.span,
        }
    }

    pub fn has_generic_arguments(&self) -> bool {
        !self.actual_generic_arguments.is_empty()
    }
}

impl std::fmt::Display for CallSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_generic_arguments() {
            write!(f, "<{}>", self.actual_generic_arguments.join(", "))?;
        }
        f.write_str(&self.argument_text)
    }
}

/// Collect the call sites on `expression`'s callee spine, first application first
pub fn from_usage_expression(expression: &Expression) -> Vec<CallSite> {
    let mut sites = Vec::new();
    let mut current = expression;

    // The spine is walked from the outermost call inwards
    loop {
        match &current.kind {
            ExpressionKind::Call(call) => {
                sites.push(CallSite::from_call(call));
                current = &call.callee;
            }
            ExpressionKind::Parenthesized(inner) | ExpressionKind::NonNull(inner) => {
                current = inner;
            }
            _ => break,
        }
    }

    sites.reverse();
    tracing::trace!(count = sites.len(), "collected call sites");
    sites
}

/// The expression at the bottom of the callee spine
pub fn reference_root(expression: &Expression) -> &Expression {
    let mut current = expression;
    loop {
        match &current.kind {
            ExpressionKind::Call(call) => current = &call.callee,
            ExpressionKind::Parenthesized(inner) | ExpressionKind::NonNull(inner) => {
                current = inner
            }
            _ => return current,
        }
    }
}

/// An identifier, or a member path `a.b.c` containing no calls
pub fn is_reference(expression: &Expression) -> bool {
    match &expression.kind {
        ExpressionKind::Identifier(_) => true,
        ExpressionKind::Member(member) => is_reference(&member.object),
        ExpressionKind::Parenthesized(inner) | ExpressionKind::NonNull(inner) => {
            is_reference(inner)
        }
        _ => false,
    }
}

/// Dotted name of a reference, `None` for anything else
pub fn reference_name(expression: &Expression) -> Option<String> {
    match &expression.kind {
        ExpressionKind::Identifier(identifier) => Some(identifier.name.clone()),
        ExpressionKind::Member(member) => {
            let object = reference_name(&member.object)?;
            Some(format!("{}.{}", object, member.property.name))
        }
        ExpressionKind::Parenthesized(inner) | ExpressionKind::NonNull(inner) => {
            reference_name(inner)
        }
        _ => None,
    }
}

/// Generic arguments of the first call site that declares any
pub fn extract_actual_generic_arguments(sites: &[CallSite]) -> Vec<String> {
    sites
        .iter()
        .find(|site| site.has_generic_arguments())
        .map(|site| site.actual_generic_arguments.clone())
        .unwrap_or_default()
}

/// Like [`extract_actual_generic_arguments`], but honours the configured policy
pub fn checked_generic_arguments(
    sites: &[CallSite],
    policy: GenericArgumentPolicy,
) -> ResolveResult<Vec<String>> {
    let first = extract_actual_generic_arguments(sites);

    if policy == GenericArgumentPolicy::RejectConflicts {
        if let Some(conflict) = sites.iter().find(|site| {
            site.has_generic_arguments() && site.actual_generic_arguments != first
        }) {
            return Err(ResolveError::ConflictingGenericArguments {
                first: format!("<{}>", first.join(", ")),
                second: format!("<{}>", conflict.actual_generic_arguments.join(", ")),
                span: to_source_span(conflict.span),
            });
        }
    }

    Ok(first)
}
