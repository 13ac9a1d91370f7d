// TypeAssist Parser Error Handling
// Error reporting with miette integration

use crate::parser::Rule;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("Parse error")]
    #[diagnostic(
        code(typeassist::parse::pest_error),
        help("Check the syntax near the highlighted location")
    )]
    PestError {
        #[source_code]
        src: String,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("Unexpected grammar rule")]
    #[diagnostic(
        code(typeassist::parse::unexpected_rule),
        help("Expected rule: {expected}")
    )]
    UnexpectedRule {
        expected: String,
        found: Rule,
        span: crate::ast::Span,
    },

    #[error("Missing syntax node")]
    #[diagnostic(
        code(typeassist::parse::missing_node),
        help("The grammar produced an incomplete {expected}")
    )]
    MissingNode {
        expected: String,
        span: crate::ast::Span,
    },
}

impl ParseError {
    /// Create a parse error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, src: String) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 1),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };

        let message = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
                let mut expected: Vec<String> = positives
                    .iter()
                    .map(rule_to_user_friendly_description)
                    .collect();
                expected.dedup();

                if expected.len() == 1 {
                    format!("expected {}", expected[0])
                } else {
                    format!("expected one of: {}", expected.join(", "))
                }
            }
            pest::error::ErrorVariant::ParsingError { .. } => "unexpected input".to_string(),
            pest::error::ErrorVariant::CustomError { message } => message.clone(),
        };

        ParseError::PestError { src, span, message }
    }

    pub fn unexpected_rule(expected: impl Into<String>, found: Rule, span: crate::ast::Span) -> Self {
        ParseError::UnexpectedRule {
            expected: expected.into(),
            found,
            span,
        }
    }

    pub fn missing_node(expected: impl Into<String>, span: crate::ast::Span) -> Self {
        ParseError::MissingNode {
            expected: expected.into(),
            span,
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Convert a parser rule to a user-friendly description
fn rule_to_user_friendly_description(rule: &Rule) -> String {
    match rule {
        Rule::identifier | Rule::identifier_name => "an identifier".to_string(),
        Rule::entity_name => "a type name (like Promise or NS.Type)".to_string(),
        Rule::number_literal => "a number (like 42 or 0xFF)".to_string(),
        Rule::string_literal => "a string (like \"hello\")".to_string(),
        Rule::template_literal => "a template string".to_string(),

        Rule::statement => "a statement".to_string(),
        Rule::expression | Rule::expression_statement => "an expression".to_string(),
        Rule::conditional_expression | Rule::binary_expression | Rule::unary_expression => {
            "an expression".to_string()
        }
        Rule::postfix_expression => "a call, member access or value".to_string(),
        Rule::argument_list => "an argument list (like (a, b))".to_string(),
        Rule::call_suffix => "a call (like f(x))".to_string(),
        Rule::member_suffix => "a member access (like obj.prop)".to_string(),
        Rule::arrow_function => "an arrow function (like (x) => x)".to_string(),

        Rule::type_expr | Rule::union_type | Rule::intersection_type | Rule::postfix_type => {
            "a type".to_string()
        }
        Rule::type_annotation | Rule::return_type => "a type annotation (like : string)".to_string(),
        Rule::function_type => "a function type (like (a: T) => U)".to_string(),
        Rule::type_arguments => "type arguments (like <string>)".to_string(),
        Rule::type_parameters => "type parameters (like <T>)".to_string(),
        Rule::parameter_list => "a parameter list (like (a: number))".to_string(),
        Rule::parameter => "a parameter".to_string(),
        Rule::object_type => "an object type (like { a: number })".to_string(),
        Rule::property_signature | Rule::method_signature | Rule::index_signature => {
            "a member signature".to_string()
        }

        Rule::variable_declarator => "a variable declarator (like x = 1)".to_string(),
        Rule::initializer => "an initializer (like = value)".to_string(),
        Rule::block => "a block ({ ... })".to_string(),
        Rule::EOI => "end of input".to_string(),

        Rule::assignment_operator => "an assignment operator".to_string(),
        Rule::op_strict_equal
        | Rule::op_strict_not_equal
        | Rule::op_equal
        | Rule::op_not_equal
        | Rule::op_nullish
        | Rule::op_logical_and
        | Rule::op_logical_or
        | Rule::op_exponent
        | Rule::op_multiply
        | Rule::op_divide
        | Rule::op_modulo
        | Rule::op_add
        | Rule::op_subtract
        | Rule::op_unsigned_shift_right
        | Rule::op_shift_left
        | Rule::op_shift_right
        | Rule::op_less_equal
        | Rule::op_greater_equal
        | Rule::op_less
        | Rule::op_greater
        | Rule::op_bitwise_and
        | Rule::op_bitwise_or
        | Rule::op_bitwise_xor
        | Rule::op_instanceof
        | Rule::op_in => "an operator".to_string(),

        _ => format!("{:?}", rule).replace('_', " "),
    }
}
