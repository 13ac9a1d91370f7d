//! Leaf resolver: references to plain values report their declared type

use typeassist_parser::ExpressionKind;

use crate::index::Declaration;

/// A value whose type is simply whatever was written on it.
///
/// Parameters, properties and variables count when they carry no function
/// type and no inline function initializer. Unannotated variables are not
/// leaves: their initializer may lead somewhere.
pub fn is_leaf(declaration: &Declaration<'_>) -> bool {
    let annotated_non_function = |declaration: &Declaration<'_>| {
        declaration
            .declared_type()
            .map(|annotation| annotation.as_function().is_none())
    };

    match declaration {
        Declaration::Parameter(_) | Declaration::Property(_) => {
            annotated_non_function(declaration).unwrap_or(true)
        }
        Declaration::Variable { declarator, .. } => {
            let inline_function = declarator.initializer.as_ref().is_some_and(|initializer| {
                matches!(
                    initializer.unparenthesized().kind,
                    ExpressionKind::Arrow(_) | ExpressionKind::Function(_)
                )
            });
            !inline_function && annotated_non_function(declaration).unwrap_or(false)
        }
        _ => false,
    }
}

/// Declared type text, or the placeholder when nothing was written
pub fn resolve_leaf(declaration: &Declaration<'_>, placeholder_type: &str) -> String {
    declaration
        .declared_type()
        .map(|annotation| annotation.text.clone())
        .unwrap_or_else(|| placeholder_type.to_string())
}
