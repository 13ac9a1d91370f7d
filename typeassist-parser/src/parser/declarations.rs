// Declaration parsing module
// Handles functions, variables, interfaces, type aliases and parameter lists

use pest::iterators::Pair;

use crate::ast::*;
use crate::error::*;
use crate::parser::{Rule, TypeAssistParser};

impl TypeAssistParser {
    /// Parse a function declaration (with or without a body)
    pub(crate) fn parse_function_declaration(pair: Pair<Rule>) -> ParseResult<FunctionDeclaration> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut type_parameters = None;
        let mut parameters = None;
        let mut return_type = None;
        let mut body = None;
        let mut is_async = false;
        let mut exported = false;
        let mut declared = false;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::export_modifier => exported = true,
                Rule::kw_declare => declared = true,
                Rule::kw_async => is_async = true,
                Rule::identifier => name = Some(Self::parse_identifier(inner)?),
                Rule::type_parameters => type_parameters = Some(Self::parse_type_parameters(inner)?),
                Rule::parameter_list => parameters = Some(Self::parse_parameter_list(inner)?),
                Rule::return_type => return_type = Some(Self::parse_return_type(inner)?),
                Rule::block => body = Some(Self::parse_block(inner)?),
                _ => {}
            }
        }

        Ok(FunctionDeclaration {
            name: name.ok_or_else(|| ParseError::missing_node("function name", span))?,
            type_parameters,
            parameters: parameters
                .ok_or_else(|| ParseError::missing_node("function parameters", span))?,
            return_type,
            body,
            is_async,
            exported,
            declared,
            span,
        })
    }

    /// Parse `const`/`let`/`var` with one or more declarators
    pub(crate) fn parse_variable_statement(pair: Pair<Rule>) -> ParseResult<VariableStatement> {
        let span = Self::span_from_pair(&pair);
        let mut kind = None;
        let mut declarators = Vec::new();
        let mut exported = false;
        let mut declared = false;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::export_modifier => exported = true,
                Rule::kw_declare => declared = true,
                Rule::declaration_kind => kind = Some(Self::parse_declaration_kind(inner)?),
                Rule::variable_declarator => declarators.push(Self::parse_variable_declarator(inner)?),
                _ => {}
            }
        }

        Ok(VariableStatement {
            kind: kind.ok_or_else(|| ParseError::missing_node("declaration keyword", span))?,
            declarators,
            exported,
            declared,
            span,
        })
    }

    fn parse_declaration_kind(pair: Pair<Rule>) -> ParseResult<DeclarationKind> {
        let span = Self::span_from_pair(&pair);
        let keyword = Self::first_inner(pair, "declaration keyword")?;
        match keyword.as_rule() {
            Rule::kw_const => Ok(DeclarationKind::Const),
            Rule::kw_let => Ok(DeclarationKind::Let),
            Rule::kw_var => Ok(DeclarationKind::Var),
            other => Err(ParseError::unexpected_rule("const, let or var", other, span)),
        }
    }

    fn parse_variable_declarator(pair: Pair<Rule>) -> ParseResult<VariableDeclarator> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut type_annotation = None;
        let mut initializer = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::binding_name => name = Some(Self::parse_binding_name(inner)?),
                Rule::type_annotation => type_annotation = Some(Self::parse_type_annotation(inner)?),
                Rule::initializer => initializer = Some(Self::parse_initializer(inner)?),
                _ => {}
            }
        }

        Ok(VariableDeclarator {
            name: name.ok_or_else(|| ParseError::missing_node("variable name", span))?,
            type_annotation,
            initializer,
            span,
        })
    }

    fn parse_binding_name(pair: Pair<Rule>) -> ParseResult<BindingName> {
        let inner = Self::first_inner(pair, "binding name")?;
        match inner.as_rule() {
            Rule::identifier | Rule::kw_this => Ok(BindingName::Identifier(Self::parse_identifier(inner)?)),
            Rule::binding_pattern => Ok(BindingName::Pattern {
                text: Self::pair_text(&inner).to_string(),
                span: Self::span_from_pair(&inner),
            }),
            other => Err(ParseError::unexpected_rule(
                "identifier or destructuring pattern",
                other,
                Self::span_from_pair(&inner),
            )),
        }
    }

    fn parse_initializer(pair: Pair<Rule>) -> ParseResult<Expression> {
        let expression = Self::first_inner(pair, "initializer expression")?;
        Self::parse_expression_from_pair(expression)
    }

    /// Parse `( ... )`, keeping the verbatim text
    pub(crate) fn parse_parameter_list(pair: Pair<Rule>) -> ParseResult<ParameterList> {
        let span = Self::span_from_pair(&pair);
        let text = Self::pair_text(&pair).to_string();
        let parameters = pair
            .into_inner()
            .filter(|inner| inner.as_rule() == Rule::parameter)
            .map(Self::parse_parameter)
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(ParameterList {
            parameters,
            text,
            span,
        })
    }

    /// A bare `x` arrow parameter becomes a one-element list written as `(x)`
    pub(crate) fn parameter_list_from_identifier(pair: Pair<Rule>) -> ParseResult<ParameterList> {
        let identifier = Self::parse_identifier(pair)?;
        let span = identifier.span;
        let text = format!("({})", identifier.name);

        Ok(ParameterList {
            parameters: vec![Parameter {
                name: BindingName::Identifier(identifier),
                optional: false,
                rest: false,
                type_annotation: None,
                default: None,
                span,
            }],
            text,
            span,
        })
    }

    fn parse_parameter(pair: Pair<Rule>) -> ParseResult<Parameter> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut optional = false;
        let mut rest = false;
        let mut type_annotation = None;
        let mut default = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::rest_marker => rest = true,
                Rule::parameter_name => name = Some(Self::parse_binding_name(inner)?),
                Rule::optional_marker => optional = true,
                Rule::type_annotation => type_annotation = Some(Self::parse_type_annotation(inner)?),
                Rule::initializer => default = Some(Self::parse_initializer(inner)?),
                _ => {}
            }
        }

        Ok(Parameter {
            name: name.ok_or_else(|| ParseError::missing_node("parameter name", span))?,
            optional,
            rest,
            type_annotation,
            default,
            span,
        })
    }

    pub(crate) fn parse_interface_declaration(pair: Pair<Rule>) -> ParseResult<InterfaceDeclaration> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut type_parameters = None;
        let mut extends = Vec::new();
        let mut body = None;
        let mut exported = false;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::export_modifier => exported = true,
                Rule::identifier => name = Some(Self::parse_identifier(inner)?),
                Rule::type_parameters => type_parameters = Some(Self::parse_type_parameters(inner)?),
                Rule::heritage_clause => {
                    for reference in inner.into_inner() {
                        if reference.as_rule() == Rule::type_reference {
                            extends.push(Self::parse_type_node(reference)?);
                        }
                    }
                }
                Rule::object_type => body = Some(Self::parse_object_type(inner)?),
                _ => {}
            }
        }

        Ok(InterfaceDeclaration {
            name: name.ok_or_else(|| ParseError::missing_node("interface name", span))?,
            type_parameters,
            extends,
            body: body.ok_or_else(|| ParseError::missing_node("interface body", span))?,
            exported,
            span,
        })
    }

    pub(crate) fn parse_type_alias_declaration(pair: Pair<Rule>) -> ParseResult<TypeAliasDeclaration> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut type_parameters = None;
        let mut type_annotation = None;
        let mut exported = false;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::export_modifier => exported = true,
                Rule::identifier => name = Some(Self::parse_identifier(inner)?),
                Rule::type_parameters => type_parameters = Some(Self::parse_type_parameters(inner)?),
                Rule::type_expr => type_annotation = Some(Self::parse_type_expr(inner)?),
                _ => {}
            }
        }

        Ok(TypeAliasDeclaration {
            name: name.ok_or_else(|| ParseError::missing_node("type alias name", span))?,
            type_parameters,
            type_annotation: type_annotation
                .ok_or_else(|| ParseError::missing_node("aliased type", span))?,
            exported,
            span,
        })
    }
}
