// S-expression formatter for the TypeScript AST
// Prints declarations and expressions as a Lisp-like outline; types stay as source text

use typeassist_parser::*;

pub fn format_program_as_sexpr(program: &Program) -> String {
    format_program_with_indent(program, 0)
}

fn format_program_with_indent(program: &Program, indent: usize) -> String {
    let statements: Vec<String> = program
        .statements
        .iter()
        .filter(|statement| !matches!(statement.kind, StatementKind::Empty))
        .map(|statement| format_statement_with_indent(statement, indent + 2))
        .collect();

    wrap("program", &statements, indent)
}

/// `(head a b)` on one line when short, otherwise one child per line
fn wrap(head: &str, children: &[String], indent: usize) -> String {
    if children.is_empty() {
        return format!("({head})");
    }

    let inline = children.iter().all(|child| !child.contains('\n'))
        && children.iter().map(String::len).sum::<usize>() + head.len() < 80;
    if inline {
        format!("({} {})", head, children.join(" "))
    } else {
        format!(
            "({}\n{}{})",
            head,
            " ".repeat(indent + 2),
            children.join(&format!("\n{}", " ".repeat(indent + 2)))
        )
    }
}

fn format_statement_with_indent(statement: &Statement, indent: usize) -> String {
    match &statement.kind {
        StatementKind::Variable(variable) => {
            let declarators: Vec<String> = variable
                .declarators
                .iter()
                .map(|declarator| format_declarator_with_indent(declarator, indent + 2))
                .collect();
            wrap(variable.kind.as_str(), &declarators, indent)
        }
        StatementKind::Function(function) => format_function_with_indent(function, indent),
        StatementKind::Interface(interface) => {
            let mut children = vec![interface.name.name.clone()];
            children.extend(type_parameter_names(&interface.type_parameters));
            children.extend(
                interface
                    .extends
                    .iter()
                    .map(|base| format!("(extends {})", base.text)),
            );
            children.extend(interface.body.members.iter().map(format_type_member));
            wrap("interface", &children, indent)
        }
        StatementKind::TypeAlias(alias) => {
            let mut children = vec![alias.name.name.clone()];
            children.extend(type_parameter_names(&alias.type_parameters));
            children.push(format_type(&alias.type_annotation));
            wrap("type", &children, indent)
        }
        StatementKind::Import(import) => format!("(import {:?})", import.specifier),
        StatementKind::Export(ExportStatement::Clause { text, .. }) => format!("(export {text})"),
        StatementKind::Export(ExportStatement::Default { expression, .. }) => wrap(
            "export-default",
            &[format_expression_with_indent(expression, indent + 2)],
            indent,
        ),
        StatementKind::Return(Some(expression)) => wrap(
            "return",
            &[format_expression_with_indent(expression, indent + 2)],
            indent,
        ),
        StatementKind::Return(None) => "(return)".to_string(),
        StatementKind::If(branch) => {
            let mut children = vec![
                format_expression_with_indent(&branch.condition, indent + 2),
                format_statement_with_indent(&branch.then_branch, indent + 2),
            ];
            if let Some(else_branch) = &branch.else_branch {
                children.push(format_statement_with_indent(else_branch, indent + 2));
            }
            wrap("if", &children, indent)
        }
        StatementKind::While(statement) => wrap(
            "while",
            &[
                format_expression_with_indent(&statement.condition, indent + 2),
                format_statement_with_indent(&statement.body, indent + 2),
            ],
            indent,
        ),
        StatementKind::For(statement) => wrap(
            "for",
            &[
                statement.header.clone(),
                format_statement_with_indent(&statement.body, indent + 2),
            ],
            indent,
        ),
        StatementKind::Throw(expression) => wrap(
            "throw",
            &[format_expression_with_indent(expression, indent + 2)],
            indent,
        ),
        StatementKind::Block(block) => format_block_with_indent(block, indent),
        StatementKind::Expression(expression) => format_expression_with_indent(expression, indent),
        StatementKind::Empty => "(empty)".to_string(),
    }
}

fn format_block_with_indent(block: &Block, indent: usize) -> String {
    let statements: Vec<String> = block
        .statements
        .iter()
        .map(|statement| format_statement_with_indent(statement, indent + 2))
        .collect();
    wrap("block", &statements, indent)
}

fn format_declarator_with_indent(declarator: &VariableDeclarator, indent: usize) -> String {
    let mut children = vec![format_binding(&declarator.name)];
    if let Some(annotation) = &declarator.type_annotation {
        children.push(format_type(annotation));
    }
    if let Some(initializer) = &declarator.initializer {
        children.push(format_expression_with_indent(initializer, indent + 2));
    }
    wrap("bind", &children, indent)
}

fn format_function_with_indent(function: &FunctionDeclaration, indent: usize) -> String {
    let head = if function.declared {
        "declare-function"
    } else {
        "function"
    };
    let mut children = vec![function.name.name.clone()];
    children.extend(type_parameter_names(&function.type_parameters));
    children.push(format!("(params {})", function.parameters.text));
    if let Some(return_type) = &function.return_type {
        children.push(format!("(returns {})", format_type(return_type)));
    }
    if let Some(body) = &function.body {
        children.push(format_block_with_indent(body, indent + 2));
    }
    wrap(head, &children, indent)
}

fn type_parameter_names(parameters: &Option<TypeParameters>) -> Option<String> {
    parameters
        .as_ref()
        .map(|parameters| format!("(generics {})", parameters.names().join(" ")))
}

fn format_binding(name: &BindingName) -> String {
    match name {
        BindingName::Identifier(identifier) => identifier.name.clone(),
        BindingName::Pattern { text, .. } => format!("(pattern {text})"),
    }
}

fn format_type(annotation: &TypeAnnotation) -> String {
    match &annotation.kind {
        TypeKind::Function(_) => format!("(fn-type \"{}\")", annotation.text),
        _ => format!("\"{}\"", annotation.text),
    }
}

fn format_type_member(member: &TypeMember) -> String {
    match member {
        TypeMember::Property(property) => {
            let optional = if property.optional { "?" } else { "" };
            match &property.type_annotation {
                Some(annotation) => format!(
                    "(property {}{} {})",
                    property.name.name,
                    optional,
                    format_type(annotation)
                ),
                None => format!("(property {}{})", property.name.name, optional),
            }
        }
        TypeMember::Method(method) => {
            let return_type = method
                .return_type
                .as_ref()
                .map(|annotation| format!(" {}", format_type(annotation)))
                .unwrap_or_default();
            format!(
                "(method {} {}{})",
                method.name.name, method.parameters.text, return_type
            )
        }
        TypeMember::Index(index) => format!(
            "(index {} {})",
            format_type(&index.key_type),
            format_type(&index.value_type)
        ),
    }
}

fn format_expression_with_indent(expr: &Expression, indent: usize) -> String {
    match &expr.kind {
        ExpressionKind::Identifier(identifier) => identifier.name.clone(),
        ExpressionKind::This => "this".to_string(),
        ExpressionKind::Null => "null".to_string(),
        ExpressionKind::Boolean(value) => format!("(boolean {value})"),
        ExpressionKind::Number(value) => format!("(number {value})"),
        ExpressionKind::String(literal) => format!("\"{}\"", literal.value.replace('"', "\\\"")),
        ExpressionKind::Template(raw) => format!("(template {raw})"),
        ExpressionKind::Array(elements) => {
            let elements: Vec<String> = elements
                .iter()
                .map(|element| format_expression_with_indent(element, indent + 2))
                .collect();
            wrap("array", &elements, indent)
        }
        ExpressionKind::Object(object) => {
            let members: Vec<String> = object
                .members
                .iter()
                .map(|member| format_object_member(member, indent + 2))
                .collect();
            wrap("object", &members, indent)
        }
        ExpressionKind::Spread(inner) => wrap(
            "spread",
            &[format_expression_with_indent(inner, indent + 2)],
            indent,
        ),
        ExpressionKind::Call(call) => format_call_with_indent(call, indent),
        ExpressionKind::Member(member) => format!(
            "({} {} {})",
            if member.optional { "?." } else { "." },
            format_expression_with_indent(&member.object, indent + 2),
            member.property.name
        ),
        ExpressionKind::Index(index) => wrap(
            "index",
            &[
                format_expression_with_indent(&index.object, indent + 2),
                format_expression_with_indent(&index.index, indent + 2),
            ],
            indent,
        ),
        ExpressionKind::NonNull(inner) => wrap(
            "non-null",
            &[format_expression_with_indent(inner, indent + 2)],
            indent,
        ),
        ExpressionKind::Arrow(arrow) => {
            let mut children = vec![format!("(params {})", arrow.parameters.text)];
            if let Some(return_type) = &arrow.return_type {
                children.push(format!("(returns {})", format_type(return_type)));
            }
            children.push(match &arrow.body {
                ArrowBody::Block(block) => format_block_with_indent(block, indent + 2),
                ArrowBody::Expression(body) => format_expression_with_indent(body, indent + 2),
            });
            wrap(if arrow.is_async { "async-arrow" } else { "arrow" }, &children, indent)
        }
        ExpressionKind::Function(function) => {
            let mut children = vec![format!("(params {})", function.parameters.text)];
            if let Some(return_type) = &function.return_type {
                children.push(format!("(returns {})", format_type(return_type)));
            }
            children.push(format_block_with_indent(&function.body, indent + 2));
            wrap("function-expr", &children, indent)
        }
        ExpressionKind::Unary(unary) => wrap(
            &format!("{:?}", unary.operator).to_lowercase(),
            &[format_expression_with_indent(&unary.operand, indent + 2)],
            indent,
        ),
        ExpressionKind::Binary(binary) => wrap(
            binary.operator.symbol(),
            &[
                format_expression_with_indent(&binary.left, indent + 2),
                format_expression_with_indent(&binary.right, indent + 2),
            ],
            indent,
        ),
        ExpressionKind::Conditional(conditional) => wrap(
            "if-expr",
            &[
                format_expression_with_indent(&conditional.condition, indent + 2),
                format_expression_with_indent(&conditional.consequent, indent + 2),
                format_expression_with_indent(&conditional.alternate, indent + 2),
            ],
            indent,
        ),
        ExpressionKind::Assignment(assignment) => wrap(
            &assignment.operator,
            &[
                format_expression_with_indent(&assignment.target, indent + 2),
                format_expression_with_indent(&assignment.value, indent + 2),
            ],
            indent,
        ),
        ExpressionKind::TypeAssertion(assertion) => wrap(
            match assertion.kind {
                AssertionKind::As => "as",
                AssertionKind::Satisfies => "satisfies",
            },
            &[
                format_expression_with_indent(&assertion.expression, indent + 2),
                format_type(&assertion.type_annotation),
            ],
            indent,
        ),
        ExpressionKind::Parenthesized(inner) => format_expression_with_indent(inner, indent),
    }
}

fn format_call_with_indent(call: &CallExpression, indent: usize) -> String {
    let mut children = vec![format_expression_with_indent(&call.callee, indent + 2)];
    if let Some(type_arguments) = &call.type_arguments {
        children.push(format!("(type-args {})", type_arguments.text));
    }
    children.extend(
        call.arguments
            .arguments
            .iter()
            .map(|argument| format_expression_with_indent(argument, indent + 2)),
    );
    wrap("call", &children, indent)
}

fn format_object_member(member: &ObjectMember, indent: usize) -> String {
    match member {
        ObjectMember::Property { key, value, .. } => {
            let key = match key {
                PropertyKey::Named(name) => name.name.clone(),
                PropertyKey::Computed(expression) => {
                    format!("[{}]", format_expression_with_indent(expression, indent + 2))
                }
            };
            wrap(
                "property",
                &[key, format_expression_with_indent(value, indent + 2)],
                indent,
            )
        }
        ObjectMember::Shorthand(identifier) => format!("(shorthand {})", identifier.name),
        ObjectMember::Method(method) => wrap(
            "method",
            &[
                method.name.name.clone(),
                format!("(params {})", method.parameters.text),
                format_block_with_indent(&method.body, indent + 2),
            ],
            indent,
        ),
        ObjectMember::Spread(value) => wrap(
            "spread",
            &[format_expression_with_indent(value, indent + 2)],
            indent,
        ),
    }
}
