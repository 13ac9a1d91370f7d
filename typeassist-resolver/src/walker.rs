//! Alias walker
//!
//! Starting from the declaration a usage refers to, follow unannotated
//! variables back through their initializers until a declaration with a
//! function value is found. Call sites met on the way are collected so the
//! chain reads as if every call had been written inline:
//!
//! ```text
//! function add(a: number): (b: number) => (c: number) => number
//! const a = add(1)
//! const b = a(2)
//! b(3)              // same as add(1)(2)(3)
//! ```

use indexmap::IndexSet;
use typeassist_parser::{AssertionKind, Expression, ExpressionKind, TypeAnnotation, TypeKind};

use crate::call_site::{from_usage_expression, is_reference, reference_name, reference_root, CallSite};
use crate::error::{to_source_span, ResolveError, ResolveResult};
use crate::generics::GenericBinding;
use crate::index::{Declaration, ReferenceResolver};
use crate::results::ResolvedFunctionValue;
use crate::signature::FunctionValue;

const MAX_TYPE_ALIAS_DEPTH: usize = 16;

/// Where a walk ended and what it collected on the way
#[derive(Debug, Clone)]
pub struct WalkOutcome<'a> {
    /// Call sites found in initializers, outermost alias first
    pub call_sites: Vec<CallSite>,
    pub resolved: ResolvedFunctionValue,
    /// Declaration holding the function value
    pub terminal: Declaration<'a>,
    /// Every declaration visited, starting with the one the walk began at
    pub path: Vec<Declaration<'a>>,
}

enum Step<'a> {
    Terminal(ResolvedFunctionValue),
    Alias {
        call_sites: Vec<CallSite>,
        next: Declaration<'a>,
    },
}

pub struct AliasWalker<'r, R: ?Sized> {
    resolver: &'r R,
    max_alias_depth: usize,
    placeholder_type: String,
}

impl<'r, R: ?Sized> AliasWalker<'r, R> {
    pub fn new(resolver: &'r R, max_alias_depth: usize, placeholder_type: impl Into<String>) -> Self {
        Self {
            resolver,
            max_alias_depth,
            placeholder_type: placeholder_type.into(),
        }
    }

    pub fn walk<'a>(&self, start: Declaration<'a>) -> ResolveResult<WalkOutcome<'a>>
    where
        R: ReferenceResolver<'a>,
    {
        let mut visited: IndexSet<(usize, usize)> = IndexSet::new();
        let mut path: Vec<Declaration<'a>> = Vec::new();
        let mut groups: Vec<Vec<CallSite>> = Vec::new();
        let mut current = start;

        loop {
            if !visited.insert(current.key()) {
                let names: Vec<&str> = path
                    .iter()
                    .map(|declaration| declaration.name())
                    .chain(std::iter::once(current.name()))
                    .collect();
                tracing::debug!(path = %names.join(" -> "), "alias cycle");
                return Err(ResolveError::AliasCycle {
                    path: names.join(" -> "),
                    span: to_source_span(current.span()),
                });
            }
            if visited.len() > self.max_alias_depth {
                return Err(ResolveError::AliasDepthExceeded {
                    limit: self.max_alias_depth,
                    span: to_source_span(current.span()),
                });
            }
            path.push(current);

            match self.step(current)? {
                Step::Terminal(resolved) => {
                    tracing::debug!(
                        terminal = current.name(),
                        kind = current.kind_name(),
                        signature = %resolved.value,
                        "alias walk finished"
                    );
                    // Groups were found leaf first; the root's calls were applied first
                    let call_sites = groups.into_iter().rev().flatten().collect();
                    return Ok(WalkOutcome {
                        call_sites,
                        resolved,
                        terminal: current,
                        path,
                    });
                }
                Step::Alias { call_sites, next } => {
                    tracing::debug!(
                        from = current.name(),
                        to = next.name(),
                        calls = call_sites.len(),
                        "following alias"
                    );
                    groups.push(call_sites);
                    current = next;
                }
            }
        }
    }

    fn step<'a>(&self, declaration: Declaration<'a>) -> ResolveResult<Step<'a>>
    where
        R: ReferenceResolver<'a>,
    {
        match declaration {
            Declaration::Interface(_) | Declaration::TypeAlias(_) => Err(ResolveError::NotAValue {
                name: declaration.name().to_string(),
                span: to_source_span(declaration.span()),
            }),
            Declaration::Function(_) | Declaration::Method(_) | Declaration::ObjectMethod(_) => {
                Ok(Step::Terminal(self.signature_value(declaration)?))
            }
            Declaration::Variable { declarator, .. } => {
                if let Some(value) = declarator.initializer.as_ref().and_then(inline_function) {
                    return Ok(Step::Terminal(value));
                }
                if let Some(annotation) = &declarator.type_annotation {
                    return self.annotated_value(declaration, annotation);
                }
                match &declarator.initializer {
                    Some(initializer) => self.initializer_step(declaration, initializer),
                    None => Err(no_function_value(declaration)),
                }
            }
            Declaration::ObjectProperty { value, .. } => match inline_function(value) {
                Some(resolved) => Ok(Step::Terminal(resolved)),
                None => self.initializer_step(declaration, value),
            },
            Declaration::Parameter(_) | Declaration::Property(_) => match declaration.declared_type() {
                Some(annotation) => self.annotated_value(declaration, annotation),
                None => Err(no_function_value(declaration)),
            },
        }
    }

    /// Functions and methods always end the walk
    fn signature_value(&self, declaration: Declaration<'_>) -> ResolveResult<ResolvedFunctionValue> {
        let (parameters, return_type) = declaration
            .signature_parts()
            .ok_or_else(|| no_function_value(declaration))?;
        let generic_names = declaration.type_parameter_names();

        let value = match return_type {
            Some(return_type) if return_type.as_function().is_some() => FunctionValue::standard(
                parameters.text.clone(),
                return_type.unparenthesized().text.clone(),
                generic_names.clone(),
            ),
            Some(return_type) => FunctionValue::non_function(return_type.text.clone()),
            None => FunctionValue::non_function(self.placeholder_type.clone()),
        }
        .ok_or_else(|| no_function_value(declaration))?;

        Ok(ResolvedFunctionValue::with_generic_names(generic_names, value))
    }

    fn annotated_value<'a>(
        &self,
        declaration: Declaration<'a>,
        annotation: &TypeAnnotation,
    ) -> ResolveResult<Step<'a>>
    where
        R: ReferenceResolver<'a>,
    {
        let value = self
            .function_type_value(annotation, declaration, 0)
            .or_else(|| FunctionValue::non_function(annotation.text.clone()))
            .ok_or_else(|| no_function_value(declaration))?;
        Ok(Step::Terminal(ResolvedFunctionValue::new(value)))
    }

    /// `StandardFunction` for a function type, following type aliases
    fn function_type_value<'a>(
        &self,
        annotation: &TypeAnnotation,
        at: Declaration<'a>,
        depth: usize,
    ) -> Option<FunctionValue>
    where
        R: ReferenceResolver<'a>,
    {
        if depth > MAX_TYPE_ALIAS_DEPTH {
            return None;
        }

        if let Some(function) = annotation.as_function() {
            let generic_names = function
                .type_parameters
                .as_ref()
                .map(|parameters| parameters.names())
                .unwrap_or_default();
            return FunctionValue::standard(
                function.parameters.text.clone(),
                function.return_type.unparenthesized().text.clone(),
                generic_names,
            );
        }

        let TypeKind::Reference { name, arguments } = &annotation.unparenthesized().kind else {
            return None;
        };
        let Some(Declaration::TypeAlias(alias)) = self.resolver.type_alias(name, at.span().start)
        else {
            return None;
        };

        let aliased = self.function_type_value(&alias.type_annotation, at, depth + 1)?;
        let binding = GenericBinding::new(
            &alias
                .type_parameters
                .as_ref()
                .map(|parameters| parameters.names())
                .unwrap_or_default(),
            &arguments
                .as_ref()
                .map(|arguments| arguments.texts())
                .unwrap_or_default(),
        );

        match aliased {
            FunctionValue::StandardFunction {
                parameter_text,
                curried_return_text,
                declared_generic_names,
            } => FunctionValue::standard(
                binding.substitute(&parameter_text),
                binding.substitute(&curried_return_text),
                declared_generic_names,
            ),
            other => Some(other),
        }
    }

    fn initializer_step<'a>(
        &self,
        declaration: Declaration<'a>,
        initializer: &Expression,
    ) -> ResolveResult<Step<'a>>
    where
        R: ReferenceResolver<'a>,
    {
        let initializer = initializer.unparenthesized();

        if let ExpressionKind::TypeAssertion(assertion) = &initializer.kind {
            if assertion.kind == AssertionKind::As {
                return self.annotated_value(declaration, &assertion.type_annotation);
            }
        }

        let root = reference_root(initializer);
        if !is_reference(root) {
            return Err(no_function_value(declaration));
        }

        let next = self.resolver.resolve(root).ok_or_else(|| ResolveError::UnresolvedReference {
            name: reference_name(root).unwrap_or_default(),
            span: to_source_span(root.span),
        })?;

        Ok(Step::Alias {
            call_sites: from_usage_expression(initializer),
            next,
        })
    }
}

/// An arrow function or `function` expression written directly as the value
fn inline_function(value: &Expression) -> Option<ResolvedFunctionValue> {
    let (text, type_parameters) = match &value.unparenthesized().kind {
        ExpressionKind::Arrow(arrow) => (&arrow.text, &arrow.type_parameters),
        ExpressionKind::Function(function) => (&function.text, &function.type_parameters),
        _ => return None,
    };
    let generic_names = type_parameters
        .as_ref()
        .map(|parameters| parameters.names())
        .unwrap_or_default();
    FunctionValue::function_expression(text.clone(), generic_names).map(ResolvedFunctionValue::new)
}

fn no_function_value(declaration: Declaration<'_>) -> ResolveError {
    ResolveError::NoFunctionValue {
        name: declaration.name().to_string(),
        span: to_source_span(declaration.span()),
    }
}
