// TypeAssist Parser
// Pest parser entry points and statement-level parsing

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use crate::ast::*;
use crate::error::*;

mod declarations;
mod expressions;
mod types;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct TypeAssistParser;

impl TypeAssistParser {
    /// Parse a complete source file
    pub fn parse_program(input: &str) -> ParseResult<Program> {
        Self::parse_program_with_source(input, None)
    }

    /// Parse a complete source file, remembering where it came from
    pub fn parse_program_with_source(
        input: &str,
        source_file: Option<String>,
    ) -> ParseResult<Program> {
        let program_pair = Self::parse_entry(Rule::program, input)?;
        let span = Self::span_from_pair(&program_pair);

        let mut statements = Vec::new();
        for pair in program_pair.into_inner() {
            match pair.as_rule() {
                Rule::statement => statements.push(Self::parse_statement(pair)?),
                Rule::EOI => {}
                other => return Err(ParseError::unexpected_rule("statement", other, span)),
            }
        }

        Ok(Program {
            statements,
            debug_info: DebugInfo::with_source_file(source_file),
            span,
        })
    }

    /// Parse a standalone expression (an optional trailing `;` is allowed)
    pub fn parse_expression(input: &str) -> ParseResult<Expression> {
        let entry = Self::parse_entry(Rule::expression_input, input)?;
        let span = Self::span_from_pair(&entry);
        let expression_pair = entry
            .into_inner()
            .find(|pair| pair.as_rule() == Rule::expression)
            .ok_or_else(|| ParseError::missing_node("expression", span))?;
        Self::parse_expression_from_pair(expression_pair)
    }

    /// Parse a standalone type
    pub fn parse_type(input: &str) -> ParseResult<TypeAnnotation> {
        let entry = Self::parse_entry(Rule::type_input, input)?;
        let span = Self::span_from_pair(&entry);
        let type_pair = entry
            .into_inner()
            .find(|pair| pair.as_rule() == Rule::type_expr)
            .ok_or_else(|| ParseError::missing_node("type", span))?;
        Self::parse_type_expr(type_pair)
    }

    fn parse_entry(rule: Rule, input: &str) -> ParseResult<Pair<'_, Rule>> {
        let mut pairs = <Self as Parser<Rule>>::parse(rule, input)
            .map_err(|error| ParseError::from_pest_error(error, input.to_string()))?;
        pairs
            .next()
            .ok_or_else(|| ParseError::missing_node(format!("{:?}", rule), Span::new(0, input.len())))
    }

    /// Parse one statement wrapper
    pub(crate) fn parse_statement(pair: Pair<Rule>) -> ParseResult<Statement> {
        let span = Self::span_from_pair(&pair);
        let inner = Self::first_inner(pair, "statement body")?;

        let kind = match inner.as_rule() {
            Rule::empty_statement => StatementKind::Empty,
            Rule::import_declaration => StatementKind::Import(Self::parse_import(inner)?),
            Rule::export_statement => StatementKind::Export(Self::parse_export(inner)?),
            Rule::function_declaration => {
                StatementKind::Function(Self::parse_function_declaration(inner)?)
            }
            Rule::interface_declaration => {
                StatementKind::Interface(Self::parse_interface_declaration(inner)?)
            }
            Rule::type_alias_declaration => {
                StatementKind::TypeAlias(Self::parse_type_alias_declaration(inner)?)
            }
            Rule::variable_statement => {
                StatementKind::Variable(Self::parse_variable_statement(inner)?)
            }
            Rule::return_statement => {
                let value = inner
                    .into_inner()
                    .find(|pair| pair.as_rule() == Rule::expression)
                    .map(Self::parse_expression_from_pair)
                    .transpose()?;
                StatementKind::Return(value)
            }
            Rule::if_statement => StatementKind::If(Self::parse_if_statement(inner)?),
            Rule::while_statement => StatementKind::While(Self::parse_while_statement(inner)?),
            Rule::for_statement => StatementKind::For(Self::parse_for_statement(inner)?),
            Rule::throw_statement => {
                let inner_span = Self::span_from_pair(&inner);
                let value = inner
                    .into_inner()
                    .find(|pair| pair.as_rule() == Rule::expression)
                    .ok_or_else(|| ParseError::missing_node("thrown expression", inner_span))?;
                StatementKind::Throw(Self::parse_expression_from_pair(value)?)
            }
            Rule::block => StatementKind::Block(Self::parse_block(inner)?),
            Rule::expression_statement => {
                let expression = Self::first_inner(inner, "expression")?;
                StatementKind::Expression(Self::parse_expression_from_pair(expression)?)
            }
            other => return Err(ParseError::unexpected_rule("statement", other, span)),
        };

        Ok(Statement { kind, span })
    }

    pub(crate) fn parse_block(pair: Pair<Rule>) -> ParseResult<Block> {
        let span = Self::span_from_pair(&pair);
        let statements = pair
            .into_inner()
            .filter(|inner| inner.as_rule() == Rule::statement)
            .map(Self::parse_statement)
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Block { statements, span })
    }

    fn parse_import(pair: Pair<Rule>) -> ParseResult<ImportDeclaration> {
        let span = Self::span_from_pair(&pair);
        let specifier = pair
            .into_inner()
            .find(|inner| inner.as_rule() == Rule::string_literal)
            .map(|inner| Self::unquote(inner.as_str()))
            .ok_or_else(|| ParseError::missing_node("module specifier", span))?;
        Ok(ImportDeclaration { specifier, span })
    }

    fn parse_export(pair: Pair<Rule>) -> ParseResult<ExportStatement> {
        let span = Self::span_from_pair(&pair);
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::export_clause => {
                    return Ok(ExportStatement::Clause {
                        text: Self::pair_text(&inner).to_string(),
                        span,
                    })
                }
                Rule::expression => {
                    return Ok(ExportStatement::Default {
                        expression: Self::parse_expression_from_pair(inner)?,
                        span,
                    })
                }
                _ => {}
            }
        }
        Err(ParseError::missing_node("export body", span))
    }

    fn parse_if_statement(pair: Pair<Rule>) -> ParseResult<IfStatement> {
        let span = Self::span_from_pair(&pair);
        let mut condition = None;
        let mut branches = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::expression => condition = Some(Self::parse_expression_from_pair(inner)?),
                Rule::statement => branches.push(Box::new(Self::parse_statement(inner)?)),
                _ => {}
            }
        }

        let condition = condition.ok_or_else(|| ParseError::missing_node("if condition", span))?;
        let mut branches = branches.into_iter();
        let then_branch = branches
            .next()
            .ok_or_else(|| ParseError::missing_node("if branch", span))?;

        Ok(IfStatement {
            condition,
            then_branch,
            else_branch: branches.next(),
            span,
        })
    }

    fn parse_while_statement(pair: Pair<Rule>) -> ParseResult<WhileStatement> {
        let span = Self::span_from_pair(&pair);
        let mut condition = None;
        let mut body = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::expression => condition = Some(Self::parse_expression_from_pair(inner)?),
                Rule::statement => body = Some(Box::new(Self::parse_statement(inner)?)),
                _ => {}
            }
        }

        Ok(WhileStatement {
            condition: condition.ok_or_else(|| ParseError::missing_node("while condition", span))?,
            body: body.ok_or_else(|| ParseError::missing_node("while body", span))?,
            span,
        })
    }

    fn parse_for_statement(pair: Pair<Rule>) -> ParseResult<ForStatement> {
        let span = Self::span_from_pair(&pair);
        let mut header = None;
        let mut body = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::for_header => header = Some(inner.as_str().to_string()),
                Rule::statement => body = Some(Box::new(Self::parse_statement(inner)?)),
                _ => {}
            }
        }

        Ok(ForStatement {
            header: header.ok_or_else(|| ParseError::missing_node("for header", span))?,
            body: body.ok_or_else(|| ParseError::missing_node("for body", span))?,
            span,
        })
    }

    pub(crate) fn parse_identifier(pair: Pair<Rule>) -> ParseResult<Identifier> {
        Ok(Identifier {
            name: pair.as_str().to_string(),
            span: Self::span_from_pair(&pair),
        })
    }

    /// Extract span information from a Pest pair
    ///
    /// Rules ending in a repetition swallow the whitespace skipped before the
    /// failed attempt, so the span stops at the last non-blank character.
    pub(crate) fn span_from_pair(pair: &Pair<Rule>) -> Span {
        let pest_span = pair.as_span();
        let end = pest_span.start() + Self::pair_text(pair).len();
        let end_pos = pest::Position::new(pest_span.get_input(), end).unwrap_or(pest_span.end_pos());
        Span::with_line_col(
            pest_span.start(),
            end,
            pest_span.start_pos().line_col(),
            end_pos.line_col(),
        )
    }

    /// Verbatim source of a pair, matching `span_from_pair`
    pub(crate) fn pair_text<'i>(pair: &Pair<'i, Rule>) -> &'i str {
        pair.as_str().trim_end()
    }

    /// Span covering two existing spans
    pub(crate) fn span_between(start: &Span, end: &Span) -> Span {
        Span {
            start: start.start,
            end: end.end,
            start_line_col: start.start_line_col,
            end_line_col: end.end_line_col,
        }
    }

    pub(crate) fn first_inner<'i>(pair: Pair<'i, Rule>, expected: &str) -> ParseResult<Pair<'i, Rule>> {
        let span = Self::span_from_pair(&pair);
        pair.into_inner()
            .next()
            .ok_or_else(|| ParseError::missing_node(expected, span))
    }

    pub(crate) fn next_pair<'i>(
        pairs: &mut Pairs<'i, Rule>,
        expected: &str,
        span: Span,
    ) -> ParseResult<Pair<'i, Rule>> {
        pairs
            .next()
            .ok_or_else(|| ParseError::missing_node(expected, span))
    }

    /// Drop the surrounding quotes of a string literal and resolve simple escapes
    pub(crate) fn unquote(raw: &str) -> String {
        let inner = if raw.len() >= 2 {
            &raw[1..raw.len() - 1]
        } else {
            raw
        };

        let mut value = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                value.push(ch);
                continue;
            }
            match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('r') => value.push('\r'),
                Some('0') => value.push('\0'),
                Some(other) => value.push(other),
                None => value.push('\\'),
            }
        }
        value
    }
}
