// Type parsing module
// Handles type annotations, function types, object types and generic parameter/argument lists

use pest::iterators::Pair;

use crate::ast::*;
use crate::error::*;
use crate::parser::{Rule, TypeAssistParser};

impl TypeAssistParser {
    /// Parse `: Type` from a variable, parameter or property
    pub(crate) fn parse_type_annotation(pair: Pair<Rule>) -> ParseResult<TypeAnnotation> {
        let type_pair = Self::first_inner(pair, "type")?;
        Self::parse_type_expr(type_pair)
    }

    /// Parse `: Type` after a parameter list
    pub(crate) fn parse_return_type(pair: Pair<Rule>) -> ParseResult<TypeAnnotation> {
        let type_pair = Self::first_inner(pair, "return type")?;
        Self::parse_type_expr(type_pair)
    }

    pub(crate) fn parse_type_expr(pair: Pair<Rule>) -> ParseResult<TypeAnnotation> {
        match pair.as_rule() {
            Rule::type_expr => {
                let union = Self::first_inner(pair, "type")?;
                Self::parse_type_node(union)
            }
            _ => Self::parse_type_node(pair),
        }
    }

    /// Parse any type-level rule into a type annotation
    pub(crate) fn parse_type_node(pair: Pair<Rule>) -> ParseResult<TypeAnnotation> {
        let span = Self::span_from_pair(&pair);
        let text = Self::pair_text(&pair).to_string();

        let kind = match pair.as_rule() {
            Rule::type_expr => return Self::parse_type_expr(pair),
            Rule::union_type | Rule::intersection_type => {
                let is_union = pair.as_rule() == Rule::union_type;
                let mut members = pair
                    .into_inner()
                    .map(Self::parse_type_node)
                    .collect::<ParseResult<Vec<_>>>()?;

                if members.len() == 1 {
                    return members
                        .pop()
                        .ok_or_else(|| ParseError::missing_node("type", span));
                }

                if is_union {
                    TypeKind::Union(members)
                } else {
                    TypeKind::Intersection(members)
                }
            }
            Rule::postfix_type => return Self::parse_postfix_type(pair),
            Rule::function_type => TypeKind::Function(Self::parse_function_type(pair)?),
            Rule::constructor_type => TypeKind::Constructor(Self::parse_function_type(pair)?),
            Rule::parenthesized_type => {
                let inner = Self::first_inner(pair, "parenthesized type")?;
                TypeKind::Parenthesized(Box::new(Self::parse_type_expr(inner)?))
            }
            Rule::object_type => TypeKind::Object(Self::parse_object_type(pair)?),
            Rule::tuple_type => {
                let mut elements = Vec::new();
                for element in pair.into_inner() {
                    if let Some(element_type) = element
                        .into_inner()
                        .find(|inner| inner.as_rule() == Rule::type_expr)
                    {
                        elements.push(Self::parse_type_expr(element_type)?);
                    }
                }
                TypeKind::Tuple(elements)
            }
            Rule::literal_type => TypeKind::Literal(text.clone()),
            Rule::type_query => {
                let name = pair
                    .into_inner()
                    .find(|inner| inner.as_rule() == Rule::entity_name)
                    .map(|inner| inner.as_str().to_string())
                    .ok_or_else(|| ParseError::missing_node("queried name", span))?;
                TypeKind::Query(name)
            }
            Rule::type_operator => {
                let mut inner_pairs = pair.into_inner();
                let keyword = Self::next_pair(&mut inner_pairs, "type operator", span)?;
                let operator = match keyword.as_rule() {
                    Rule::kw_keyof => TypeOperator::Keyof,
                    Rule::kw_unique => TypeOperator::Unique,
                    Rule::kw_readonly => TypeOperator::Readonly,
                    other => {
                        return Err(ParseError::unexpected_rule(
                            "keyof, unique or readonly",
                            other,
                            span,
                        ))
                    }
                };
                let operand = Self::next_pair(&mut inner_pairs, "type operand", span)?;
                TypeKind::Operator {
                    operator,
                    operand: Box::new(Self::parse_type_node(operand)?),
                }
            }
            Rule::type_reference => {
                let mut name = None;
                let mut arguments = None;
                for inner in pair.into_inner() {
                    match inner.as_rule() {
                        Rule::entity_name => name = Some(inner.as_str().to_string()),
                        Rule::type_arguments => arguments = Some(Self::parse_type_arguments(inner)?),
                        _ => {}
                    }
                }
                TypeKind::Reference {
                    name: name.ok_or_else(|| ParseError::missing_node("type name", span))?,
                    arguments,
                }
            }
            other => return Err(ParseError::unexpected_rule("type", other, span)),
        };

        Ok(TypeAnnotation { kind, text, span })
    }

    /// `T[]` and `T["key"]` wrap the primary type from left to right
    fn parse_postfix_type(pair: Pair<Rule>) -> ParseResult<TypeAnnotation> {
        let span = Self::span_from_pair(&pair);
        let source = Self::pair_text(&pair);
        let mut inner_pairs = pair.into_inner();
        let primary = Self::next_pair(&mut inner_pairs, "type", span)?;
        let mut current = Self::parse_type_node(primary)?;

        for suffix in inner_pairs {
            let suffix_span = Self::span_from_pair(&suffix);
            let combined = Self::span_between(&span, &suffix_span);
            let text = source[..suffix_span.end - span.start].to_string();

            let kind = match suffix.as_rule() {
                Rule::array_suffix => TypeKind::Array(Box::new(current)),
                Rule::indexed_access_suffix => {
                    let index = Self::first_inner(suffix, "index type")?;
                    TypeKind::IndexedAccess {
                        object: Box::new(current),
                        index: Box::new(Self::parse_type_expr(index)?),
                    }
                }
                other => return Err(ParseError::unexpected_rule("type suffix", other, suffix_span)),
            };

            current = TypeAnnotation {
                kind,
                text,
                span: combined,
            };
        }

        Ok(current)
    }

    fn parse_function_type(pair: Pair<Rule>) -> ParseResult<FunctionType> {
        let span = Self::span_from_pair(&pair);
        let mut type_parameters = None;
        let mut parameters = None;
        let mut return_type = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::type_parameters => type_parameters = Some(Self::parse_type_parameters(inner)?),
                Rule::parameter_list => parameters = Some(Self::parse_parameter_list(inner)?),
                Rule::type_expr => return_type = Some(Self::parse_type_expr(inner)?),
                _ => {}
            }
        }

        Ok(FunctionType {
            type_parameters,
            parameters: parameters
                .ok_or_else(|| ParseError::missing_node("function type parameters", span))?,
            return_type: Box::new(
                return_type.ok_or_else(|| ParseError::missing_node("function type result", span))?,
            ),
        })
    }

    pub(crate) fn parse_object_type(pair: Pair<Rule>) -> ParseResult<ObjectType> {
        let span = Self::span_from_pair(&pair);
        let mut members = Vec::new();

        for inner in pair.into_inner() {
            let member = match inner.as_rule() {
                Rule::property_signature => TypeMember::Property(Self::parse_property_signature(inner)?),
                Rule::method_signature => TypeMember::Method(Self::parse_method_signature(inner)?),
                Rule::index_signature => TypeMember::Index(Self::parse_index_signature(inner)?),
                _ => continue,
            };
            members.push(member);
        }

        Ok(ObjectType { members, span })
    }

    fn parse_property_signature(pair: Pair<Rule>) -> ParseResult<PropertySignature> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut optional = false;
        let mut readonly = false;
        let mut type_annotation = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::readonly_modifier => readonly = true,
                Rule::property_name => name = Some(Self::parse_property_name(inner)?),
                Rule::optional_marker => optional = true,
                Rule::type_annotation => type_annotation = Some(Self::parse_type_annotation(inner)?),
                _ => {}
            }
        }

        Ok(PropertySignature {
            name: name.ok_or_else(|| ParseError::missing_node("property name", span))?,
            optional,
            readonly,
            type_annotation,
            span,
        })
    }

    fn parse_method_signature(pair: Pair<Rule>) -> ParseResult<MethodSignature> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut optional = false;
        let mut type_parameters = None;
        let mut parameters = None;
        let mut return_type = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::property_name => name = Some(Self::parse_property_name(inner)?),
                Rule::optional_marker => optional = true,
                Rule::type_parameters => type_parameters = Some(Self::parse_type_parameters(inner)?),
                Rule::parameter_list => parameters = Some(Self::parse_parameter_list(inner)?),
                Rule::return_type => return_type = Some(Self::parse_return_type(inner)?),
                _ => {}
            }
        }

        Ok(MethodSignature {
            name: name.ok_or_else(|| ParseError::missing_node("method name", span))?,
            optional,
            type_parameters,
            parameters: parameters
                .ok_or_else(|| ParseError::missing_node("method parameters", span))?,
            return_type,
            span,
        })
    }

    fn parse_index_signature(pair: Pair<Rule>) -> ParseResult<IndexSignature> {
        let span = Self::span_from_pair(&pair);
        let mut key = None;
        let mut key_type = None;
        let mut value_type = None;
        let mut readonly = false;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::readonly_modifier => readonly = true,
                Rule::identifier => key = Some(Self::parse_identifier(inner)?),
                Rule::type_expr => key_type = Some(Self::parse_type_expr(inner)?),
                Rule::type_annotation => value_type = Some(Self::parse_type_annotation(inner)?),
                _ => {}
            }
        }

        Ok(IndexSignature {
            key: key.ok_or_else(|| ParseError::missing_node("index key", span))?,
            key_type: key_type.ok_or_else(|| ParseError::missing_node("index key type", span))?,
            value_type: value_type
                .ok_or_else(|| ParseError::missing_node("index value type", span))?,
            readonly,
            span,
        })
    }

    pub(crate) fn parse_property_name(pair: Pair<Rule>) -> ParseResult<PropertyName> {
        let span = Self::span_from_pair(&pair);
        let inner = Self::first_inner(pair, "property name")?;
        let name = match inner.as_rule() {
            Rule::string_literal => Self::unquote(inner.as_str()),
            _ => inner.as_str().to_string(),
        };
        Ok(PropertyName { name, span })
    }

    pub(crate) fn parse_type_parameters(pair: Pair<Rule>) -> ParseResult<TypeParameters> {
        let span = Self::span_from_pair(&pair);
        let mut parameters = Vec::new();

        for inner in pair.into_inner() {
            if inner.as_rule() != Rule::type_parameter {
                continue;
            }

            let parameter_span = Self::span_from_pair(&inner);
            let mut name = None;
            let mut constraint = None;
            let mut default = None;
            let mut after_extends = false;

            for part in inner.into_inner() {
                match part.as_rule() {
                    Rule::identifier => name = Some(Self::parse_identifier(part)?),
                    Rule::kw_extends => after_extends = true,
                    Rule::type_expr if after_extends && constraint.is_none() => {
                        constraint = Some(Self::parse_type_expr(part)?)
                    }
                    Rule::type_expr => default = Some(Self::parse_type_expr(part)?),
                    _ => {}
                }
            }

            parameters.push(TypeParameter {
                name: name.ok_or_else(|| ParseError::missing_node("type parameter name", parameter_span))?,
                constraint,
                default,
                span: parameter_span,
            });
        }

        Ok(TypeParameters { parameters, span })
    }

    pub(crate) fn parse_type_arguments(pair: Pair<Rule>) -> ParseResult<TypeArguments> {
        let span = Self::span_from_pair(&pair);
        let text = Self::pair_text(&pair).to_string();
        let arguments = pair
            .into_inner()
            .filter(|inner| inner.as_rule() == Rule::type_expr)
            .map(Self::parse_type_expr)
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(TypeArguments {
            arguments,
            text,
            span,
        })
    }
}
