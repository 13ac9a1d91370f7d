//! Cursor queries over a parsed program

use typeassist_parser::{
    ArrowBody, Block, Expression, ExpressionKind, ObjectMember, Program, Statement, StatementKind,
};

/// Innermost expression statement whose span covers `offset`
pub fn expression_statement_at(program: &Program, offset: usize) -> Option<&Statement> {
    find_in_statements(&program.statements, offset)
}

fn find_in_statements(statements: &[Statement], offset: usize) -> Option<&Statement> {
    statements
        .iter()
        .filter(|statement| statement.span.contains(offset))
        .find_map(|statement| find_in_statement(statement, offset))
}

fn find_in_statement(statement: &Statement, offset: usize) -> Option<&Statement> {
    let nested = match &statement.kind {
        StatementKind::Block(block) => find_in_block(block, offset),
        StatementKind::Function(function) => function
            .body
            .as_ref()
            .and_then(|body| find_in_block(body, offset)),
        StatementKind::If(branch) => find_in_statement(&branch.then_branch, offset)
            .or_else(|| {
                branch
                    .else_branch
                    .as_ref()
                    .and_then(|else_branch| find_in_statement(else_branch, offset))
            })
            .or_else(|| find_in_expression(&branch.condition, offset)),
        StatementKind::While(statement) => find_in_statement(&statement.body, offset)
            .or_else(|| find_in_expression(&statement.condition, offset)),
        StatementKind::For(statement) => find_in_statement(&statement.body, offset),
        StatementKind::Variable(variable) => variable
            .declarators
            .iter()
            .filter_map(|declarator| declarator.initializer.as_ref())
            .find_map(|initializer| find_in_expression(initializer, offset)),
        StatementKind::Return(Some(expression))
        | StatementKind::Throw(expression)
        | StatementKind::Expression(expression) => find_in_expression(expression, offset),
        _ => None,
    };

    nested.or(match statement.kind {
        StatementKind::Expression(_) if statement.span.contains(offset) => Some(statement),
        _ => None,
    })
}

fn find_in_block(block: &Block, offset: usize) -> Option<&Statement> {
    if !block.span.contains(offset) {
        return None;
    }
    find_in_statements(&block.statements, offset)
}

/// Statements nested in function bodies inside an expression
fn find_in_expression(expression: &Expression, offset: usize) -> Option<&Statement> {
    if !expression.span.contains(offset) {
        return None;
    }

    match &expression.kind {
        ExpressionKind::Arrow(arrow) => match &arrow.body {
            ArrowBody::Block(block) => find_in_block(block, offset),
            ArrowBody::Expression(body) => find_in_expression(body, offset),
        },
        ExpressionKind::Function(function) => find_in_block(&function.body, offset),
        ExpressionKind::Object(object) => object.members.iter().find_map(|member| match member {
            ObjectMember::Property { value, .. } | ObjectMember::Spread(value) => {
                find_in_expression(value, offset)
            }
            ObjectMember::Method(method) => find_in_block(&method.body, offset),
            ObjectMember::Shorthand(_) => None,
        }),
        ExpressionKind::Call(call) => find_in_expression(&call.callee, offset).or_else(|| {
            call.arguments
                .arguments
                .iter()
                .find_map(|argument| find_in_expression(argument, offset))
        }),
        ExpressionKind::Array(elements) => elements
            .iter()
            .find_map(|element| find_in_expression(element, offset)),
        ExpressionKind::Member(member) => find_in_expression(&member.object, offset),
        ExpressionKind::Binary(binary) => find_in_expression(&binary.left, offset)
            .or_else(|| find_in_expression(&binary.right, offset)),
        ExpressionKind::Conditional(conditional) => [
            &conditional.condition,
            &conditional.consequent,
            &conditional.alternate,
        ]
        .into_iter()
        .find_map(|part| find_in_expression(part, offset)),
        ExpressionKind::Assignment(assignment) => find_in_expression(&assignment.value, offset),
        ExpressionKind::Unary(unary) => find_in_expression(&unary.operand, offset),
        ExpressionKind::TypeAssertion(assertion) => {
            find_in_expression(&assertion.expression, offset)
        }
        ExpressionKind::Spread(inner)
        | ExpressionKind::NonNull(inner)
        | ExpressionKind::Parenthesized(inner) => find_in_expression(inner, offset),
        _ => None,
    }
}

/// Byte offset of a 1-based line and column; the column counts characters
pub fn offset_at(source: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 || column == 0 {
        return None;
    }

    let mut line_start = 0;
    for (index, text) in source.split('\n').enumerate() {
        if index + 1 == line {
            let column_offset = text
                .char_indices()
                .map(|(offset, _)| offset)
                .chain(std::iter::once(text.len()))
                .nth(column - 1)?;
            return Some(line_start + column_offset);
        }
        line_start += text.len() + 1;
    }

    None
}
