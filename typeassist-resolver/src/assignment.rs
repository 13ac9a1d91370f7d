//! Assignment composition
//!
//! Turn a resolved type into the declaration that replaces an expression
//! statement: `foo(1)(2);` becomes `const val: string = foo(1)(2);`.

use lazy_static::lazy_static;
use std::collections::HashSet;
use typeassist_parser::{Expression, ExpressionKind, Statement, StatementKind};

use crate::config::FormatConfig;
use crate::error::{to_source_span, AssignmentError};
use crate::index::Declaration;
use crate::resolver::Resolution;

lazy_static! {
    /// Types that describe the absence of a value
    static ref UNASSIGNABLE_TYPES: HashSet<&'static str> =
        ["void", "undefined", "null", "never"].into_iter().collect();

    /// Written return types that make a function's calls not worth annotating
    static ref UNASSIGNABLE_RETURN_TYPES: HashSet<&'static str> =
        ["any", "void", "undefined", "null", "never"].into_iter().collect();
}

pub fn is_assignable(type_text: &str) -> bool {
    !UNASSIGNABLE_TYPES.contains(type_text.trim())
}

/// Refuse usages of a function or method whose written return type is `any`
/// or describes no value, however many times it is called.
///
/// A resolved `any` coming from an unannotated arrow or parameter stays assignable.
pub fn check_declared_return(
    declaration: &Declaration,
    usage: &Expression,
) -> Result<(), AssignmentError> {
    let return_type = match declaration {
        Declaration::Function(function) => function.return_type.as_ref(),
        Declaration::Method(method) => method.return_type.as_ref(),
        Declaration::ObjectMethod(method) => method.return_type.as_ref(),
        _ => None,
    };

    match return_type {
        Some(return_type) if UNASSIGNABLE_RETURN_TYPES.contains(return_type.text.trim()) => {
            tracing::debug!(
                function = declaration.name(),
                return_type = %return_type.text,
                "declared return type cannot be assigned"
            );
            Err(AssignmentError::UnassignableType {
                type_text: return_type.text.clone(),
                span: to_source_span(usage.span),
            })
        }
        _ => Ok(()),
    }
}

/// A single text replacement for the host to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
    /// Offset of the variable name once the edit is applied
    pub cursor: usize,
}

impl AssignmentEdit {
    pub fn apply(&self, source: &str) -> String {
        let mut output = String::with_capacity(source.len() + self.replacement.len());
        output.push_str(&source[..self.start]);
        output.push_str(&self.replacement);
        output.push_str(&source[self.end..]);
        output
    }
}

/// Name for the new variable: the property for `obj.prop`, else the placeholder
pub fn suggested_name(usage: &Expression, placeholder: &str) -> String {
    match &usage.unparenthesized().kind {
        ExpressionKind::Member(member) => member.property.name.clone(),
        _ => placeholder.to_string(),
    }
}

/// `<keyword> <name>[: <type>] = <expression>` with the configured terminator
pub fn compose(
    expression_text: &str,
    resolution: &Resolution,
    name: &str,
    format: &FormatConfig,
) -> Result<String, AssignmentError> {
    let expression_text = expression_text.trim().trim_end_matches(';').trim_end();

    let declaration = match resolution {
        Resolution::Typed { type_text, .. } => {
            if !is_assignable(type_text) {
                return Err(AssignmentError::UnassignableType {
                    type_text: type_text.clone(),
                    span: None,
                });
            }
            format!(
                "{} {}: {} = {}",
                format.declaration, name, type_text, expression_text
            )
        }
        Resolution::Untyped => format!("{} {} = {}", format.declaration, name, expression_text),
    };

    Ok(terminate(declaration, format.end_with_semicolon))
}

fn terminate(mut declaration: String, end_with_semicolon: bool) -> String {
    if end_with_semicolon {
        if !declaration.ends_with(';') {
            declaration.push(';');
        }
    } else {
        while declaration.ends_with(';') {
            declaration.pop();
        }
    }
    declaration
}

/// Build the edit replacing an expression statement with a declaration
pub fn assignment_edit(
    source: &str,
    statement: &Statement,
    resolution: &Resolution,
    format: &FormatConfig,
) -> Result<AssignmentEdit, AssignmentError> {
    let StatementKind::Expression(expression) = &statement.kind else {
        return Err(AssignmentError::NoExpressionAtCursor {
            offset: statement.span.start,
        });
    };

    let expression_text = &source[expression.span.start..expression.span.end];
    let name = suggested_name(expression, &format.placeholder_name);
    let replacement = compose(expression_text, resolution, &name, format).map_err(|error| {
        match error {
            AssignmentError::UnassignableType { type_text, .. } => {
                AssignmentError::UnassignableType {
                    type_text,
                    span: to_source_span(expression.span),
                }
            }
            other => other,
        }
    })?;

    let edit = AssignmentEdit {
        start: statement.span.start,
        end: statement.span.end,
        cursor: statement.span.start + format.declaration.as_str().len() + 1,
        replacement,
    };
    tracing::debug!(start = edit.start, end = edit.end, replacement = %edit.replacement, "assignment edit");
    Ok(edit)
}
