//! Error types for the typeassist resolver
//!
//! Following the parser's miette patterns so every failure renders with a code and a label.

use miette::{Diagnostic, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;
use typeassist_parser::{ParseError, Span};

/// Reasons a usage expression could not be turned into a type
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Expression does not start with a reference")]
    #[diagnostic(
        code(typeassist::resolve::not_a_reference),
        help("Only identifiers and member paths such as `a.b.c` can be followed to a declaration")
    )]
    NotAReference {
        #[label("not an identifier or member path")]
        span: Option<SourceSpan>,
    },

    #[error("Cannot resolve `{name}`")]
    #[diagnostic(
        code(typeassist::resolve::unresolved_reference),
        help("Declare `{name}` in this file before asking for its type")
    )]
    UnresolvedReference {
        name: String,
        #[label("no declaration found")]
        span: Option<SourceSpan>,
    },

    #[error("`{name}` names a type, not a value")]
    #[diagnostic(
        code(typeassist::resolve::not_a_value),
        help("Interfaces and type aliases cannot be called or assigned")
    )]
    NotAValue {
        name: String,
        #[label("type-only declaration")]
        span: Option<SourceSpan>,
    },

    #[error("`{name}` has no function value to follow")]
    #[diagnostic(
        code(typeassist::resolve::no_function_value),
        help("Add a type annotation to `{name}` or initialise it from a function")
    )]
    NoFunctionValue {
        name: String,
        #[label("alias chain stops here")]
        span: Option<SourceSpan>,
    },

    #[error("Alias cycle: {path}")]
    #[diagnostic(
        code(typeassist::resolve::alias_cycle),
        help("These declarations refer to each other, so no function value can be reached")
    )]
    AliasCycle {
        path: String,
        #[label("declaration revisited here")]
        span: Option<SourceSpan>,
    },

    #[error("Alias chain is deeper than {limit} declarations")]
    #[diagnostic(
        code(typeassist::resolve::alias_depth_exceeded),
        help("Raise `resolver.max_alias_depth` in typeassist.toml")
    )]
    AliasDepthExceeded {
        limit: usize,
        #[label("walk stopped here")]
        span: Option<SourceSpan>,
    },

    #[error("Conflicting generic arguments: {first} and {second}")]
    #[diagnostic(
        code(typeassist::resolve::conflicting_generic_arguments),
        help("Set `resolver.generic_arguments = \"first-wins\"` to keep the first list")
    )]
    ConflictingGenericArguments {
        first: String,
        second: String,
        #[label("second type argument list")]
        span: Option<SourceSpan>,
    },
}

/// Failures while turning a resolved type into a declaration
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum AssignmentError {
    #[error("No expression statement at offset {offset}")]
    #[diagnostic(
        code(typeassist::assign::no_expression),
        help("Place the cursor inside a standalone expression statement")
    )]
    NoExpressionAtCursor { offset: usize },

    #[error("Position {line}:{column} is outside the source")]
    #[diagnostic(code(typeassist::assign::position_out_of_range))]
    PositionOutOfRange { line: usize, column: usize },

    #[error("A value of type `{type_text}` cannot be assigned")]
    #[diagnostic(
        code(typeassist::assign::unassignable_type),
        help("The expression produces no usable value")
    )]
    UnassignableType {
        type_text: String,
        #[label("evaluates to {type_text}")]
        span: Option<SourceSpan>,
    },
}

/// Configuration loading errors
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration file {}", path.display())]
    #[diagnostic(code(typeassist::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration")]
    #[diagnostic(
        code(typeassist::config::invalid),
        help("See the [format] and [resolver] tables in typeassist.toml")
    )]
    Invalid(#[from] toml::de::Error),
}

/// Everything a single assist request can fail with
#[derive(Error, Diagnostic, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum AssistError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Assignment(#[from] AssignmentError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Helper for creating source spans from AST spans
pub fn to_source_span(span: Span) -> Option<SourceSpan> {
    Some(span.into())
}
