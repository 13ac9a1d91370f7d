// Expression parsing module
// Handles operator precedence, call chains, member access and function literals

use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};

use crate::ast::*;
use crate::error::*;
use crate::parser::{Rule, TypeAssistParser};

impl TypeAssistParser {
    /// Binary operator precedence parser, lowest precedence first
    pub(crate) fn pratt_parser() -> PrattParser<Rule> {
        PrattParser::new()
            .op(Op::infix(Rule::op_nullish, Assoc::Left))
            .op(Op::infix(Rule::op_logical_or, Assoc::Left))
            .op(Op::infix(Rule::op_logical_and, Assoc::Left))
            .op(Op::infix(Rule::op_bitwise_or, Assoc::Left))
            .op(Op::infix(Rule::op_bitwise_xor, Assoc::Left))
            .op(Op::infix(Rule::op_bitwise_and, Assoc::Left))
            .op(Op::infix(Rule::op_equal, Assoc::Left)
                | Op::infix(Rule::op_not_equal, Assoc::Left)
                | Op::infix(Rule::op_strict_equal, Assoc::Left)
                | Op::infix(Rule::op_strict_not_equal, Assoc::Left))
            .op(Op::infix(Rule::op_less, Assoc::Left)
                | Op::infix(Rule::op_less_equal, Assoc::Left)
                | Op::infix(Rule::op_greater, Assoc::Left)
                | Op::infix(Rule::op_greater_equal, Assoc::Left)
                | Op::infix(Rule::op_instanceof, Assoc::Left)
                | Op::infix(Rule::op_in, Assoc::Left))
            .op(Op::infix(Rule::op_shift_left, Assoc::Left)
                | Op::infix(Rule::op_shift_right, Assoc::Left)
                | Op::infix(Rule::op_unsigned_shift_right, Assoc::Left))
            .op(Op::infix(Rule::op_add, Assoc::Left) | Op::infix(Rule::op_subtract, Assoc::Left))
            .op(Op::infix(Rule::op_multiply, Assoc::Left)
                | Op::infix(Rule::op_divide, Assoc::Left)
                | Op::infix(Rule::op_modulo, Assoc::Left))
            .op(Op::infix(Rule::op_exponent, Assoc::Right))
    }

    /// Parse an `expression` pair
    pub(crate) fn parse_expression_from_pair(pair: Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);

        if pair.as_rule() != Rule::expression {
            return Self::parse_expression_part(pair);
        }

        let mut inner_pairs = pair.into_inner();
        let first = Self::next_pair(&mut inner_pairs, "expression", span)?;
        let target = Self::parse_expression_part(first)?;

        match inner_pairs.next() {
            Some(operator) if operator.as_rule() == Rule::assignment_operator => {
                let value_pair = Self::next_pair(&mut inner_pairs, "assigned value", span)?;
                let value = Self::parse_expression_from_pair(value_pair)?;
                Ok(Expression {
                    kind: ExpressionKind::Assignment(AssignmentExpression {
                        target: Box::new(target),
                        operator: operator.as_str().to_string(),
                        value: Box::new(value),
                        span,
                    }),
                    span,
                })
            }
            Some(other) => Err(ParseError::unexpected_rule(
                "assignment operator",
                other.as_rule(),
                span,
            )),
            None => Ok(target),
        }
    }

    fn parse_expression_part(pair: Pair<Rule>) -> ParseResult<Expression> {
        match pair.as_rule() {
            Rule::expression => Self::parse_expression_from_pair(pair),
            Rule::arrow_function => Self::parse_arrow_function(pair),
            Rule::function_expression => Self::parse_function_expression(pair),
            Rule::conditional_expression => Self::parse_conditional(pair),
            Rule::binary_expression => Self::parse_binary(pair),
            Rule::unary_expression => Self::parse_unary(pair),
            Rule::postfix_expression => Self::parse_postfix(pair),
            Rule::spread_element => {
                let span = Self::span_from_pair(&pair);
                let inner = Self::first_inner(pair, "spread expression")?;
                Ok(Expression {
                    kind: ExpressionKind::Spread(Box::new(Self::parse_expression_from_pair(inner)?)),
                    span,
                })
            }
            _ => Self::parse_primary(pair),
        }
    }

    fn parse_conditional(pair: Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);
        let mut inner_pairs = pair.into_inner();
        let test = Self::parse_binary(Self::next_pair(&mut inner_pairs, "condition", span)?)?;

        let Some(consequent) = inner_pairs.next() else {
            return Ok(test);
        };
        let alternate = Self::next_pair(&mut inner_pairs, "conditional alternative", span)?;

        Ok(Expression {
            kind: ExpressionKind::Conditional(ConditionalExpression {
                condition: Box::new(test),
                consequent: Box::new(Self::parse_expression_from_pair(consequent)?),
                alternate: Box::new(Self::parse_expression_from_pair(alternate)?),
                span,
            }),
            span,
        })
    }

    fn parse_binary(pair: Pair<Rule>) -> ParseResult<Expression> {
        Self::parse_expression_with_precedence(pair.into_inner())
    }

    /// Parse operands and operators using precedence climbing
    fn parse_expression_with_precedence(pairs: Pairs<Rule>) -> ParseResult<Expression> {
        let parser = Self::pratt_parser();

        parser
            .map_primary(Self::parse_unary)
            .map_infix(
                |left: ParseResult<Expression>, op: Pair<Rule>, right: ParseResult<Expression>| {
                    let left = left?;
                    let right = right?;

                    let operator = match op.as_rule() {
                        Rule::op_strict_equal => BinaryOperator::StrictEqual,
                        Rule::op_strict_not_equal => BinaryOperator::StrictNotEqual,
                        Rule::op_equal => BinaryOperator::Equal,
                        Rule::op_not_equal => BinaryOperator::NotEqual,
                        Rule::op_nullish => BinaryOperator::Nullish,
                        Rule::op_logical_and => BinaryOperator::LogicalAnd,
                        Rule::op_logical_or => BinaryOperator::LogicalOr,
                        Rule::op_exponent => BinaryOperator::Exponent,
                        Rule::op_multiply => BinaryOperator::Multiply,
                        Rule::op_divide => BinaryOperator::Divide,
                        Rule::op_modulo => BinaryOperator::Modulo,
                        Rule::op_add => BinaryOperator::Add,
                        Rule::op_subtract => BinaryOperator::Subtract,
                        Rule::op_unsigned_shift_right => BinaryOperator::UnsignedShiftRight,
                        Rule::op_shift_left => BinaryOperator::ShiftLeft,
                        Rule::op_shift_right => BinaryOperator::ShiftRight,
                        Rule::op_less_equal => BinaryOperator::LessEqual,
                        Rule::op_greater_equal => BinaryOperator::GreaterEqual,
                        Rule::op_less => BinaryOperator::Less,
                        Rule::op_greater => BinaryOperator::Greater,
                        Rule::op_bitwise_and => BinaryOperator::BitwiseAnd,
                        Rule::op_bitwise_or => BinaryOperator::BitwiseOr,
                        Rule::op_bitwise_xor => BinaryOperator::BitwiseXor,
                        Rule::op_instanceof => BinaryOperator::Instanceof,
                        Rule::op_in => BinaryOperator::In,
                        other => {
                            return Err(ParseError::unexpected_rule(
                                "binary operator",
                                other,
                                Self::span_from_pair(&op),
                            ))
                        }
                    };

                    let span = Self::span_between(&left.span, &right.span);
                    Ok(Expression {
                        kind: ExpressionKind::Binary(BinaryOperation {
                            left: Box::new(left),
                            operator,
                            right: Box::new(right),
                            span,
                        }),
                        span,
                    })
                },
            )
            .parse(pairs)
    }

    /// Prefix operators apply before any `as`/`satisfies` assertion
    fn parse_unary(pair: Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);
        let mut operators = Vec::new();
        let mut operand = None;
        let mut assertions = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::prefix_operator => operators.push(inner),
                Rule::postfix_expression => operand = Some(Self::parse_postfix(inner)?),
                Rule::type_assertion => assertions.push(inner),
                other => return Err(ParseError::unexpected_rule("unary expression", other, span)),
            }
        }

        let mut expression = operand.ok_or_else(|| ParseError::missing_node("operand", span))?;

        for operator_pair in operators.into_iter().rev() {
            let operator_span = Self::span_from_pair(&operator_pair);
            let operator = match operator_pair.as_str().trim() {
                "++" => UnaryOperator::Increment,
                "--" => UnaryOperator::Decrement,
                "!" => UnaryOperator::LogicalNot,
                "~" => UnaryOperator::BitwiseNot,
                "+" => UnaryOperator::Plus,
                "-" => UnaryOperator::Minus,
                "typeof" => UnaryOperator::Typeof,
                "void" => UnaryOperator::Void,
                "delete" => UnaryOperator::Delete,
                "await" => UnaryOperator::Await,
                "new" => UnaryOperator::New,
                _ => {
                    return Err(ParseError::unexpected_rule(
                        "prefix operator",
                        Rule::prefix_operator,
                        operator_span,
                    ))
                }
            };
            let combined = Self::span_between(&operator_span, &expression.span);
            expression = Expression {
                kind: ExpressionKind::Unary(UnaryOperation {
                    operator,
                    operand: Box::new(expression),
                    span: combined,
                }),
                span: combined,
            };
        }

        for assertion in assertions {
            let assertion_span = Self::span_from_pair(&assertion);
            let mut parts = assertion.into_inner();
            let keyword = Self::next_pair(&mut parts, "as or satisfies", assertion_span)?;
            let kind = match keyword.as_rule() {
                Rule::kw_satisfies => AssertionKind::Satisfies,
                _ => AssertionKind::As,
            };
            let type_pair = Self::next_pair(&mut parts, "asserted type", assertion_span)?;
            let type_annotation = Self::parse_type_expr(type_pair)?;
            let combined = Self::span_between(&expression.span, &assertion_span);
            expression = Expression {
                kind: ExpressionKind::TypeAssertion(TypeAssertion {
                    expression: Box::new(expression),
                    kind,
                    type_annotation,
                    span: combined,
                }),
                span: combined,
            };
        }

        Ok(expression)
    }

    /// Parse a primary expression followed by calls, member and index accesses
    fn parse_postfix(pair: Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);
        let mut inner_pairs = pair.into_inner();
        let primary = Self::next_pair(&mut inner_pairs, "primary expression", span)?;
        let mut expression = Self::parse_primary(primary)?;

        for suffix in inner_pairs {
            let suffix_span = Self::span_from_pair(&suffix);
            let combined = Self::span_between(&expression.span, &suffix_span);

            let kind = match suffix.as_rule() {
                Rule::call_suffix => {
                    let mut optional = false;
                    let mut type_arguments = None;
                    let mut arguments = None;
                    for part in suffix.into_inner() {
                        match part.as_rule() {
                            Rule::optional_chain => optional = true,
                            Rule::type_arguments => type_arguments = Some(Self::parse_type_arguments(part)?),
                            Rule::argument_list => arguments = Some(Self::parse_argument_list(part)?),
                            _ => {}
                        }
                    }
                    ExpressionKind::Call(CallExpression {
                        callee: Box::new(expression),
                        type_arguments,
                        arguments: arguments
                            .ok_or_else(|| ParseError::missing_node("argument list", suffix_span))?,
                        optional,
                        span: combined,
                    })
                }
                Rule::member_suffix => {
                    let mut optional = false;
                    let mut property = None;
                    for part in suffix.into_inner() {
                        match part.as_rule() {
                            Rule::optional_chain => optional = true,
                            Rule::identifier_name => property = Some(Self::parse_identifier(part)?),
                            _ => {}
                        }
                    }
                    ExpressionKind::Member(MemberExpression {
                        object: Box::new(expression),
                        property: property
                            .ok_or_else(|| ParseError::missing_node("member name", suffix_span))?,
                        optional,
                        span: combined,
                    })
                }
                Rule::index_suffix => {
                    let mut optional = false;
                    let mut index = None;
                    for part in suffix.into_inner() {
                        match part.as_rule() {
                            Rule::optional_chain => optional = true,
                            Rule::expression => index = Some(Self::parse_expression_from_pair(part)?),
                            _ => {}
                        }
                    }
                    ExpressionKind::Index(IndexExpression {
                        object: Box::new(expression),
                        index: Box::new(
                            index.ok_or_else(|| ParseError::missing_node("index", suffix_span))?,
                        ),
                        optional,
                        span: combined,
                    })
                }
                Rule::non_null_suffix => ExpressionKind::NonNull(Box::new(expression)),
                other => return Err(ParseError::unexpected_rule("postfix operator", other, suffix_span)),
            };

            expression = Expression {
                kind,
                span: combined,
            };
        }

        Ok(expression)
    }

    fn parse_argument_list(pair: Pair<Rule>) -> ParseResult<ArgumentList> {
        let span = Self::span_from_pair(&pair);
        let text = Self::pair_text(&pair).to_string();
        let arguments = pair
            .into_inner()
            .map(Self::parse_expression_part)
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(ArgumentList {
            arguments,
            text,
            span,
        })
    }

    fn parse_primary(pair: Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);

        let kind = match pair.as_rule() {
            Rule::identifier => ExpressionKind::Identifier(Self::parse_identifier(pair)?),
            Rule::this_expression => ExpressionKind::This,
            Rule::null_literal => ExpressionKind::Null,
            Rule::boolean_literal => {
                let keyword = Self::first_inner(pair, "boolean")?;
                ExpressionKind::Boolean(keyword.as_rule() == Rule::kw_true)
            }
            Rule::number_literal => ExpressionKind::Number(pair.as_str().to_string()),
            Rule::string_literal => ExpressionKind::String(StringLiteral {
                value: Self::unquote(pair.as_str()),
                raw: pair.as_str().to_string(),
            }),
            Rule::template_literal => ExpressionKind::Template(pair.as_str().to_string()),
            Rule::array_literal => {
                let elements = pair
                    .into_inner()
                    .map(Self::parse_expression_part)
                    .collect::<ParseResult<Vec<_>>>()?;
                ExpressionKind::Array(elements)
            }
            Rule::object_literal => ExpressionKind::Object(Self::parse_object_literal(pair)?),
            Rule::parenthesized_expression => {
                let inner = Self::first_inner(pair, "parenthesized expression")?;
                ExpressionKind::Parenthesized(Box::new(Self::parse_expression_from_pair(inner)?))
            }
            Rule::spread_element | Rule::expression | Rule::arrow_function | Rule::function_expression => {
                return Self::parse_expression_part(pair)
            }
            other => return Err(ParseError::unexpected_rule("expression", other, span)),
        };

        Ok(Expression { kind, span })
    }

    fn parse_object_literal(pair: Pair<Rule>) -> ParseResult<ObjectLiteral> {
        let span = Self::span_from_pair(&pair);
        let mut members = Vec::new();

        for inner in pair.into_inner() {
            let member_span = Self::span_from_pair(&inner);
            let member = match inner.as_rule() {
                Rule::spread_element => {
                    let value = Self::first_inner(inner, "spread expression")?;
                    ObjectMember::Spread(Self::parse_expression_from_pair(value)?)
                }
                Rule::shorthand_property => {
                    let name = Self::first_inner(inner, "property name")?;
                    ObjectMember::Shorthand(Self::parse_identifier(name)?)
                }
                Rule::property_assignment => {
                    let mut parts = inner.into_inner();
                    let key_pair = Self::next_pair(&mut parts, "property key", member_span)?;
                    let key = match key_pair.as_rule() {
                        Rule::computed_key => {
                            let key_expression = Self::first_inner(key_pair, "computed key")?;
                            PropertyKey::Computed(Self::parse_expression_from_pair(key_expression)?)
                        }
                        _ => PropertyKey::Named(Self::parse_property_name(key_pair)?),
                    };
                    let value = Self::next_pair(&mut parts, "property value", member_span)?;
                    ObjectMember::Property {
                        key,
                        value: Self::parse_expression_from_pair(value)?,
                        span: member_span,
                    }
                }
                Rule::object_method => ObjectMember::Method(Self::parse_object_method(inner)?),
                other => return Err(ParseError::unexpected_rule("object member", other, member_span)),
            };
            members.push(member);
        }

        Ok(ObjectLiteral { members, span })
    }

    fn parse_object_method(pair: Pair<Rule>) -> ParseResult<ObjectMethod> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut type_parameters = None;
        let mut parameters = None;
        let mut return_type = None;
        let mut body = None;
        let mut is_async = false;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::kw_async => is_async = true,
                Rule::property_name => name = Some(Self::parse_property_name(inner)?),
                Rule::type_parameters => type_parameters = Some(Self::parse_type_parameters(inner)?),
                Rule::parameter_list => parameters = Some(Self::parse_parameter_list(inner)?),
                Rule::return_type => return_type = Some(Self::parse_return_type(inner)?),
                Rule::block => body = Some(Self::parse_block(inner)?),
                _ => {}
            }
        }

        Ok(ObjectMethod {
            name: name.ok_or_else(|| ParseError::missing_node("method name", span))?,
            type_parameters,
            parameters: parameters.ok_or_else(|| ParseError::missing_node("method parameters", span))?,
            return_type,
            body: body.ok_or_else(|| ParseError::missing_node("method body", span))?,
            is_async,
            span,
        })
    }

    fn parse_arrow_function(pair: Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);
        let text = Self::pair_text(&pair).to_string();
        let mut type_parameters = None;
        let mut parameters = None;
        let mut return_type = None;
        let mut body = None;
        let mut is_async = false;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::kw_async => is_async = true,
                Rule::type_parameters => type_parameters = Some(Self::parse_type_parameters(inner)?),
                Rule::parameter_list => parameters = Some(Self::parse_parameter_list(inner)?),
                Rule::identifier => parameters = Some(Self::parameter_list_from_identifier(inner)?),
                Rule::return_type => return_type = Some(Self::parse_return_type(inner)?),
                Rule::block => body = Some(ArrowBody::Block(Self::parse_block(inner)?)),
                Rule::expression => {
                    body = Some(ArrowBody::Expression(Box::new(Self::parse_expression_from_pair(inner)?)))
                }
                _ => {}
            }
        }

        Ok(Expression {
            kind: ExpressionKind::Arrow(ArrowFunction {
                type_parameters,
                parameters: parameters
                    .ok_or_else(|| ParseError::missing_node("arrow parameters", span))?,
                return_type,
                body: body.ok_or_else(|| ParseError::missing_node("arrow body", span))?,
                is_async,
                text,
                span,
            }),
            span,
        })
    }

    fn parse_function_expression(pair: Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);
        let text = Self::pair_text(&pair).to_string();
        let mut name = None;
        let mut type_parameters = None;
        let mut parameters = None;
        let mut return_type = None;
        let mut body = None;
        let mut is_async = false;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::kw_async => is_async = true,
                Rule::identifier => name = Some(Self::parse_identifier(inner)?),
                Rule::type_parameters => type_parameters = Some(Self::parse_type_parameters(inner)?),
                Rule::parameter_list => parameters = Some(Self::parse_parameter_list(inner)?),
                Rule::return_type => return_type = Some(Self::parse_return_type(inner)?),
                Rule::block => body = Some(Self::parse_block(inner)?),
                _ => {}
            }
        }

        Ok(Expression {
            kind: ExpressionKind::Function(FunctionExpression {
                name,
                type_parameters,
                parameters: parameters
                    .ok_or_else(|| ParseError::missing_node("function parameters", span))?,
                return_type,
                body: body.ok_or_else(|| ParseError::missing_node("function body", span))?,
                is_async,
                text,
                span,
            }),
            span,
        })
    }
}
