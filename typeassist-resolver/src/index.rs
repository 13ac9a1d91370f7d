//! Source index
//!
//! Lexical scopes over a parsed program, and the [`ReferenceResolver`] seam
//! the alias walker uses to ask what a reference denotes.

use indexmap::IndexMap;
use typeassist_parser::{
    ArrowBody, BindingName, Block, DeclarationKind, Expression, ExpressionKind, ExportStatement,
    FunctionDeclaration, InterfaceDeclaration, MethodSignature, ObjectMember, ObjectMethod,
    Parameter, ParameterList, Program, PropertyKey, PropertyName, PropertySignature, Span,
    Statement, StatementKind, TypeAliasDeclaration, TypeAnnotation, TypeKind, TypeMember,
    VariableDeclarator,
};

const MAX_TYPE_DEPTH: usize = 16;

/// Something a reference can denote
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Declaration<'a> {
    Variable {
        kind: DeclarationKind,
        declarator: &'a VariableDeclarator,
    },
    Function(&'a FunctionDeclaration),
    Parameter(&'a Parameter),
    Property(&'a PropertySignature),
    Method(&'a MethodSignature),
    ObjectProperty {
        name: &'a PropertyName,
        value: &'a Expression,
    },
    ObjectMethod(&'a ObjectMethod),
    Interface(&'a InterfaceDeclaration),
    TypeAlias(&'a TypeAliasDeclaration),
}

impl<'a> Declaration<'a> {
    /// Identity of the declaration within one program
    pub fn key(&self) -> (usize, usize) {
        let span = self.span();
        (span.start, span.end)
    }

    pub fn span(&self) -> Span {
        match self {
            Declaration::Variable { declarator, .. } => declarator.span,
            Declaration::Function(function) => function.span,
            Declaration::Parameter(parameter) => parameter.span,
            Declaration::Property(property) => property.span,
            Declaration::Method(method) => method.span,
            Declaration::ObjectProperty { name, value } => Span {
                start: name.span.start,
                end: value.span.end,
                start_line_col: name.span.start_line_col,
                end_line_col: value.span.end_line_col,
            },
            Declaration::ObjectMethod(method) => method.span,
            Declaration::Interface(interface) => interface.span,
            Declaration::TypeAlias(alias) => alias.span,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Declaration::Variable { declarator, .. } => binding_text(&declarator.name),
            Declaration::Function(function) => &function.name.name,
            Declaration::Parameter(parameter) => binding_text(&parameter.name),
            Declaration::Property(property) => &property.name.name,
            Declaration::Method(method) => &method.name.name,
            Declaration::ObjectProperty { name, .. } => &name.name,
            Declaration::ObjectMethod(method) => &method.name.name,
            Declaration::Interface(interface) => &interface.name.name,
            Declaration::TypeAlias(alias) => &alias.name.name,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Declaration::Variable { .. } => "variable",
            Declaration::Function(_) => "function",
            Declaration::Parameter(_) => "parameter",
            Declaration::Property(_) => "property",
            Declaration::Method(_) => "method",
            Declaration::ObjectProperty { .. } => "object property",
            Declaration::ObjectMethod(_) => "object method",
            Declaration::Interface(_) => "interface",
            Declaration::TypeAlias(_) => "type alias",
        }
    }

    /// The written type of a value declaration
    pub fn declared_type(&self) -> Option<&'a TypeAnnotation> {
        match self {
            Declaration::Variable { declarator, .. } => declarator.type_annotation.as_ref(),
            Declaration::Parameter(parameter) => parameter.type_annotation.as_ref(),
            Declaration::Property(property) => property.type_annotation.as_ref(),
            _ => None,
        }
    }

    /// Parameter list and return type of anything declared with a signature
    pub fn signature_parts(&self) -> Option<(&'a ParameterList, Option<&'a TypeAnnotation>)> {
        match self {
            Declaration::Function(function) => {
                Some((&function.parameters, function.return_type.as_ref()))
            }
            Declaration::Method(method) => Some((&method.parameters, method.return_type.as_ref())),
            Declaration::ObjectMethod(method) => {
                Some((&method.parameters, method.return_type.as_ref()))
            }
            _ => None,
        }
    }

    pub fn type_parameter_names(&self) -> Vec<String> {
        let parameters = match self {
            Declaration::Function(function) => function.type_parameters.as_ref(),
            Declaration::Method(method) => method.type_parameters.as_ref(),
            Declaration::ObjectMethod(method) => method.type_parameters.as_ref(),
            Declaration::Interface(interface) => interface.type_parameters.as_ref(),
            Declaration::TypeAlias(alias) => alias.type_parameters.as_ref(),
            _ => None,
        };
        parameters.map(|parameters| parameters.names()).unwrap_or_default()
    }

    pub fn is_type_only(&self) -> bool {
        matches!(self, Declaration::Interface(_) | Declaration::TypeAlias(_))
    }
}

fn binding_text(name: &BindingName) -> &str {
    match name {
        BindingName::Identifier(identifier) => &identifier.name,
        BindingName::Pattern { text, .. } => text,
    }
}

/// Asks what a reference expression (identifier or member path) denotes
pub trait ReferenceResolver<'a> {
    fn resolve(&self, reference: &Expression) -> Option<Declaration<'a>>;

    /// Type-namespace lookup used to expand `type F = (a) => b` annotations
    fn type_alias(&self, _name: &str, _offset: usize) -> Option<Declaration<'a>> {
        None
    }
}

#[derive(Debug)]
struct Scope<'a> {
    span: Span,
    parent: Option<usize>,
    values: IndexMap<&'a str, Declaration<'a>>,
    types: IndexMap<&'a str, Declaration<'a>>,
}

impl<'a> Scope<'a> {
    fn new(span: Span, parent: Option<usize>) -> Self {
        Self {
            span,
            parent,
            values: IndexMap::new(),
            types: IndexMap::new(),
        }
    }
}

#[derive(Debug)]
pub struct SourceIndex<'a> {
    program: &'a Program,
    scopes: Vec<Scope<'a>>,
}

const ROOT_SCOPE: usize = 0;

impl<'a> SourceIndex<'a> {
    pub fn new(program: &'a Program) -> Self {
        let mut index = Self {
            program,
            scopes: vec![Scope::new(program.span, None)],
        };
        for statement in &program.statements {
            index.visit_statement(statement, ROOT_SCOPE);
        }
        tracing::debug!(scopes = index.scopes.len(), "built source index");
        index
    }

    pub fn program(&self) -> &'a Program {
        self.program
    }

    /// Value declarations visible at the top level, in source order
    pub fn top_level_values(&self) -> impl Iterator<Item = Declaration<'a>> + '_ {
        self.scopes[ROOT_SCOPE].values.values().copied()
    }

    /// Resolve every lookup in the program scope regardless of offsets
    pub fn at_top_level(&self) -> TopLevel<'_, 'a> {
        TopLevel { index: self }
    }

    /// The innermost scope whose span contains `offset`
    ///
    /// Scopes are pushed parent first, so equal spans resolve to the later one.
    pub fn scope_at(&self, offset: usize) -> usize {
        self.scopes
            .iter()
            .enumerate()
            .filter(|(_, scope)| scope.span.contains(offset))
            .min_by_key(|(id, scope)| (scope.span.len(), std::cmp::Reverse(*id)))
            .map(|(id, _)| id)
            .unwrap_or(ROOT_SCOPE)
    }

    pub fn lookup_value(&self, name: &str, offset: usize) -> Option<Declaration<'a>> {
        self.lookup_from(self.scope_at(offset), name, |scope| &scope.values)
    }

    pub fn lookup_type(&self, name: &str, offset: usize) -> Option<Declaration<'a>> {
        self.lookup_from(self.scope_at(offset), name, |scope| &scope.types)
    }

    fn lookup_from(
        &self,
        scope: usize,
        name: &str,
        table: impl for<'s> Fn(&'s Scope<'a>) -> &'s IndexMap<&'a str, Declaration<'a>>,
    ) -> Option<Declaration<'a>> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id];
            if let Some(declaration) = table(scope).get(name) {
                return Some(*declaration);
            }
            current = scope.parent;
        }
        None
    }

    fn resolve_in(&self, reference: &Expression, scope: Option<usize>) -> Option<Declaration<'a>> {
        let scope_for = |offset: usize| scope.unwrap_or_else(|| self.scope_at(offset));

        match &reference.kind {
            ExpressionKind::Identifier(identifier) => {
                let scope = scope_for(identifier.span.start);
                self.lookup_from(scope, &identifier.name, |scope| &scope.values)
                    .or_else(|| self.lookup_from(scope, &identifier.name, |scope| &scope.types))
            }
            ExpressionKind::Member(member) => {
                let object = self.resolve_in(&member.object, scope)?;
                self.member_of(object, &member.property.name, scope_for(member.span.start))
            }
            ExpressionKind::Parenthesized(inner) | ExpressionKind::NonNull(inner) => {
                self.resolve_in(inner, scope)
            }
            _ => None,
        }
    }

    /// Find `name` on the value denoted by `object`
    fn member_of(&self, object: Declaration<'a>, name: &str, scope: usize) -> Option<Declaration<'a>> {
        if let Some(annotation) = object.declared_type() {
            return self.member_in_type(annotation, name, scope, 0);
        }

        if let Declaration::Variable { declarator, .. } = object {
            if let Some(ExpressionKind::Object(literal)) = declarator
                .initializer
                .as_ref()
                .map(|initializer| &initializer.unparenthesized().kind)
            {
                return literal.members.iter().find_map(|member| match member {
                    ObjectMember::Property {
                        key: PropertyKey::Named(key),
                        value,
                        ..
                    } if key.name == name => Some(Declaration::ObjectProperty { name: key, value }),
                    ObjectMember::Method(method) if method.name.name == name => {
                        Some(Declaration::ObjectMethod(method))
                    }
                    _ => None,
                });
            }
        }

        None
    }

    fn member_in_type(
        &self,
        annotation: &'a TypeAnnotation,
        name: &str,
        scope: usize,
        depth: usize,
    ) -> Option<Declaration<'a>> {
        if depth > MAX_TYPE_DEPTH {
            tracing::debug!(member = name, "type nesting too deep for member lookup");
            return None;
        }

        match &annotation.unparenthesized().kind {
            TypeKind::Object(object) => member_declaration(object.member(name)?),
            TypeKind::Intersection(parts) => parts
                .iter()
                .find_map(|part| self.member_in_type(part, name, scope, depth + 1)),
            TypeKind::Reference {
                name: type_name, ..
            } => match self.lookup_from(scope, type_name, |scope| &scope.types)? {
                Declaration::Interface(interface) => interface
                    .body
                    .member(name)
                    .and_then(member_declaration)
                    .or_else(|| {
                        interface
                            .extends
                            .iter()
                            .find_map(|base| self.member_in_type(base, name, scope, depth + 1))
                    }),
                Declaration::TypeAlias(alias) => {
                    self.member_in_type(&alias.type_annotation, name, scope, depth + 1)
                }
                _ => None,
            },
            _ => None,
        }
    }

    // Index construction

    fn push_scope(&mut self, span: Span, parent: usize) -> usize {
        self.scopes.push(Scope::new(span, Some(parent)));
        self.scopes.len() - 1
    }

    fn declare_value(&mut self, scope: usize, name: &'a str, declaration: Declaration<'a>) {
        self.scopes[scope].values.entry(name).or_insert(declaration);
    }

    fn declare_type(&mut self, scope: usize, name: &'a str, declaration: Declaration<'a>) {
        self.scopes[scope].types.entry(name).or_insert(declaration);
    }

    fn declare_parameters(&mut self, scope: usize, parameters: &'a ParameterList) {
        for parameter in &parameters.parameters {
            if let BindingName::Identifier(identifier) = &parameter.name {
                self.declare_value(scope, &identifier.name, Declaration::Parameter(parameter));
            }
            if let Some(default) = &parameter.default {
                self.visit_expression(default, scope);
            }
        }
    }

    fn visit_block(&mut self, block: &'a Block, scope: usize) {
        for statement in &block.statements {
            self.visit_statement(statement, scope);
        }
    }

    fn visit_statement(&mut self, statement: &'a Statement, scope: usize) {
        match &statement.kind {
            StatementKind::Variable(variable) => {
                for declarator in &variable.declarators {
                    if let BindingName::Identifier(identifier) = &declarator.name {
                        self.declare_value(
                            scope,
                            &identifier.name,
                            Declaration::Variable {
                                kind: variable.kind,
                                declarator,
                            },
                        );
                    }
                    if let Some(initializer) = &declarator.initializer {
                        self.visit_expression(initializer, scope);
                    }
                }
            }
            StatementKind::Function(function) => {
                self.declare_value(scope, &function.name.name, Declaration::Function(function));
                let inner = self.push_scope(function.span, scope);
                self.declare_parameters(inner, &function.parameters);
                if let Some(body) = &function.body {
                    self.visit_block(body, inner);
                }
            }
            StatementKind::Interface(interface) => {
                self.declare_type(scope, &interface.name.name, Declaration::Interface(interface));
            }
            StatementKind::TypeAlias(alias) => {
                self.declare_type(scope, &alias.name.name, Declaration::TypeAlias(alias));
            }
            StatementKind::Export(ExportStatement::Default { expression, .. }) => {
                self.visit_expression(expression, scope);
            }
            StatementKind::Return(Some(expression))
            | StatementKind::Throw(expression)
            | StatementKind::Expression(expression) => self.visit_expression(expression, scope),
            StatementKind::If(statement) => {
                self.visit_expression(&statement.condition, scope);
                self.visit_statement(&statement.then_branch, scope);
                if let Some(else_branch) = &statement.else_branch {
                    self.visit_statement(else_branch, scope);
                }
            }
            StatementKind::While(statement) => {
                self.visit_expression(&statement.condition, scope);
                self.visit_statement(&statement.body, scope);
            }
            StatementKind::For(statement) => self.visit_statement(&statement.body, scope),
            StatementKind::Block(block) => {
                let inner = self.push_scope(block.span, scope);
                self.visit_block(block, inner);
            }
            StatementKind::Return(None)
            | StatementKind::Import(_)
            | StatementKind::Export(ExportStatement::Clause { .. })
            | StatementKind::Empty => {}
        }
    }

    fn visit_expression(&mut self, expression: &'a Expression, scope: usize) {
        match &expression.kind {
            ExpressionKind::Arrow(arrow) => {
                let inner = self.push_scope(arrow.span, scope);
                self.declare_parameters(inner, &arrow.parameters);
                match &arrow.body {
                    ArrowBody::Block(block) => self.visit_block(block, inner),
                    ArrowBody::Expression(body) => self.visit_expression(body, inner),
                }
            }
            ExpressionKind::Function(function) => {
                let inner = self.push_scope(function.span, scope);
                self.declare_parameters(inner, &function.parameters);
                self.visit_block(&function.body, inner);
            }
            ExpressionKind::Object(object) => {
                for member in &object.members {
                    match member {
                        ObjectMember::Property { key, value, .. } => {
                            if let PropertyKey::Computed(computed) = key {
                                self.visit_expression(computed, scope);
                            }
                            self.visit_expression(value, scope);
                        }
                        ObjectMember::Method(method) => {
                            let inner = self.push_scope(method.span, scope);
                            self.declare_parameters(inner, &method.parameters);
                            self.visit_block(&method.body, inner);
                        }
                        ObjectMember::Spread(value) => self.visit_expression(value, scope),
                        ObjectMember::Shorthand(_) => {}
                    }
                }
            }
            ExpressionKind::Array(elements) => {
                for element in elements {
                    self.visit_expression(element, scope);
                }
            }
            ExpressionKind::Call(call) => {
                self.visit_expression(&call.callee, scope);
                for argument in &call.arguments.arguments {
                    self.visit_expression(argument, scope);
                }
            }
            ExpressionKind::Member(member) => self.visit_expression(&member.object, scope),
            ExpressionKind::Index(index) => {
                self.visit_expression(&index.object, scope);
                self.visit_expression(&index.index, scope);
            }
            ExpressionKind::Unary(unary) => self.visit_expression(&unary.operand, scope),
            ExpressionKind::Binary(binary) => {
                self.visit_expression(&binary.left, scope);
                self.visit_expression(&binary.right, scope);
            }
            ExpressionKind::Conditional(conditional) => {
                self.visit_expression(&conditional.condition, scope);
                self.visit_expression(&conditional.consequent, scope);
                self.visit_expression(&conditional.alternate, scope);
            }
            ExpressionKind::Assignment(assignment) => {
                self.visit_expression(&assignment.target, scope);
                self.visit_expression(&assignment.value, scope);
            }
            ExpressionKind::TypeAssertion(assertion) => {
                self.visit_expression(&assertion.expression, scope)
            }
            ExpressionKind::Spread(inner)
            | ExpressionKind::NonNull(inner)
            | ExpressionKind::Parenthesized(inner) => self.visit_expression(inner, scope),
            ExpressionKind::Identifier(_)
            | ExpressionKind::This
            | ExpressionKind::Null
            | ExpressionKind::Boolean(_)
            | ExpressionKind::Number(_)
            | ExpressionKind::String(_)
            | ExpressionKind::Template(_) => {}
        }
    }
}

fn member_declaration(member: &TypeMember) -> Option<Declaration<'_>> {
    match member {
        TypeMember::Property(property) => Some(Declaration::Property(property)),
        TypeMember::Method(method) => Some(Declaration::Method(method)),
        TypeMember::Index(_) => None,
    }
}

impl<'a> ReferenceResolver<'a> for SourceIndex<'a> {
    fn resolve(&self, reference: &Expression) -> Option<Declaration<'a>> {
        self.resolve_in(reference, None)
    }

    fn type_alias(&self, name: &str, offset: usize) -> Option<Declaration<'a>> {
        self.lookup_type(name, offset)
    }
}

/// Resolver view that ignores offsets and looks everything up in the program scope.
///
/// Used for expressions that do not come from the indexed source, such as REPL input.
#[derive(Debug, Clone, Copy)]
pub struct TopLevel<'i, 'a> {
    index: &'i SourceIndex<'a>,
}

impl<'a> ReferenceResolver<'a> for TopLevel<'_, 'a> {
    fn resolve(&self, reference: &Expression) -> Option<Declaration<'a>> {
        self.index.resolve_in(reference, Some(ROOT_SCOPE))
    }

    fn type_alias(&self, name: &str, _offset: usize) -> Option<Declaration<'a>> {
        self.index
            .lookup_from(ROOT_SCOPE, name, |scope| &scope.types)
    }
}
