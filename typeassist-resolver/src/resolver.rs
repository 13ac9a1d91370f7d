//! Resolution orchestration
//!
//! Resolve the usage's root reference, decide between the leaf resolver and
//! an alias walk, then hand the collected chain to an evaluator.

use typeassist_parser::Expression;

use crate::call_site::{
    checked_generic_arguments, from_usage_expression, is_reference, reference_name,
    reference_root, CallSite,
};
use crate::config::ResolverConfig;
use crate::error::{to_source_span, ResolveError, ResolveResult};
use crate::evaluators::{Evaluator, EvaluatorKind};
use crate::index::{Declaration, ReferenceResolver};
use crate::leaf::{is_leaf, resolve_leaf};
use crate::results::OriginalCallChain;
use crate::signature::ARROW;
use crate::walker::{AliasWalker, WalkOutcome};

/// Which rule produced a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSource {
    FunctionType,
    FullTypeFunction,
    /// A bare reference to a function whose return type is not a function
    UncalledFunction,
    Leaf,
    /// Fallback to the annotation when no function value could be reached
    DeclaredType,
}

impl From<EvaluatorKind> for TypeSource {
    fn from(kind: EvaluatorKind) -> Self {
        match kind {
            EvaluatorKind::FunctionType => TypeSource::FunctionType,
            EvaluatorKind::FullTypeFunction => TypeSource::FullTypeFunction,
        }
    }
}

impl TypeSource {
    pub fn evaluator_kind(self) -> Option<EvaluatorKind> {
        match self {
            TypeSource::FunctionType => Some(EvaluatorKind::FunctionType),
            TypeSource::FullTypeFunction => Some(EvaluatorKind::FullTypeFunction),
            _ => None,
        }
    }
}

impl std::fmt::Display for TypeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeSource::FunctionType => "function-type evaluator",
            TypeSource::FullTypeFunction => "full-type-function evaluator",
            TypeSource::UncalledFunction => "uncalled function",
            TypeSource::Leaf => "leaf",
            TypeSource::DeclaredType => "declared type",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Typed { type_text: String, source: TypeSource },
    Untyped,
}

impl Resolution {
    pub fn type_text(&self) -> Option<&str> {
        match self {
            Resolution::Typed { type_text, .. } => Some(type_text),
            Resolution::Untyped => None,
        }
    }

    pub fn source(&self) -> Option<TypeSource> {
        match self {
            Resolution::Typed { source, .. } => Some(*source),
            Resolution::Untyped => None,
        }
    }
}

/// Everything the walk found for one usage
#[derive(Debug, Clone)]
pub struct ChainResolution<'a> {
    /// Declaration the usage's root reference denotes
    pub reference: Declaration<'a>,
    pub usage_call_sites: Vec<CallSite>,
    pub chain: Option<OriginalCallChain>,
    pub walk: WalkOutcome<'a>,
}

impl<'a> ChainResolution<'a> {
    pub fn evaluator(&self) -> Option<Evaluator<'_>> {
        Evaluator::select(self.chain.as_ref(), Some(&self.walk.resolved))
    }
}

pub struct TypeResolver<'r, R: ?Sized> {
    resolver: &'r R,
    config: &'r ResolverConfig,
}

impl<'r, R: ?Sized> TypeResolver<'r, R> {
    pub fn new(resolver: &'r R, config: &'r ResolverConfig) -> Self {
        Self { resolver, config }
    }

    /// The declaration at the bottom of the usage's callee spine
    pub fn reference_declaration<'a>(&self, usage: &Expression) -> ResolveResult<Declaration<'a>>
    where
        R: ReferenceResolver<'a>,
    {
        let root = reference_root(usage);
        if !is_reference(root) {
            return Err(ResolveError::NotAReference {
                span: to_source_span(root.span),
            });
        }

        let declaration =
            self.resolver
                .resolve(root)
                .ok_or_else(|| ResolveError::UnresolvedReference {
                    name: reference_name(root).unwrap_or_default(),
                    span: to_source_span(root.span),
                })?;

        tracing::debug!(
            reference = declaration.name(),
            kind = declaration.kind_name(),
            "resolved usage root"
        );
        Ok(declaration)
    }

    /// Walk from the usage to its function value and build the full call chain
    pub fn resolve_chain<'a>(&self, usage: &Expression) -> ResolveResult<ChainResolution<'a>>
    where
        R: ReferenceResolver<'a>,
    {
        let reference = self.reference_declaration(usage)?;
        self.chain_from(reference, usage)
    }

    fn chain_from<'a>(
        &self,
        reference: Declaration<'a>,
        usage: &Expression,
    ) -> ResolveResult<ChainResolution<'a>>
    where
        R: ReferenceResolver<'a>,
    {
        let walker = AliasWalker::new(
            self.resolver,
            self.config.max_alias_depth,
            self.config.placeholder_type.clone(),
        );
        let walk = walker.walk(reference)?;

        let usage_call_sites = from_usage_expression(usage);
        let call_sites: Vec<CallSite> = walk
            .call_sites
            .iter()
            .chain(&usage_call_sites)
            .cloned()
            .collect();
        let generic_arguments =
            checked_generic_arguments(&call_sites, self.config.generic_arguments)?;
        let chain = OriginalCallChain::new(call_sites, generic_arguments);

        tracing::debug!(
            calls = chain.as_ref().map_or(0, OriginalCallChain::len),
            generics = ?chain.as_ref().map(OriginalCallChain::actual_generic_arguments),
            "built call chain"
        );

        Ok(ChainResolution {
            reference,
            usage_call_sites,
            chain,
            walk,
        })
    }

    /// Compute the type of `usage`
    pub fn resolve<'a>(&self, usage: &Expression) -> ResolveResult<Resolution>
    where
        R: ReferenceResolver<'a>,
    {
        let reference = self.reference_declaration(usage)?;

        if reference.is_type_only() {
            return Err(ResolveError::NotAValue {
                name: reference.name().to_string(),
                span: to_source_span(reference.span()),
            });
        }

        let called = !from_usage_expression(usage).is_empty();
        if !called && is_leaf(&reference) {
            let type_text = resolve_leaf(&reference, &self.config.placeholder_type);
            tracing::debug!(%type_text, "leaf reference");
            return Ok(Resolution::Typed {
                type_text,
                source: TypeSource::Leaf,
            });
        }

        let resolution = match self.chain_from(reference, usage) {
            Ok(resolution) => resolution,
            Err(ResolveError::NoFunctionValue { name, .. }) => {
                tracing::debug!(%name, "no function value, falling back to declared type");
                return Ok(match reference.declared_type() {
                    Some(annotation) => Resolution::Typed {
                        type_text: annotation.text.clone(),
                        source: TypeSource::DeclaredType,
                    },
                    None => Resolution::Untyped,
                });
            }
            Err(error) => return Err(error),
        };

        if let Some(type_text) = self.uncalled_function_type(&resolution) {
            return Ok(Resolution::Typed {
                type_text,
                source: TypeSource::UncalledFunction,
            });
        }

        let Some(evaluator) = resolution.evaluator() else {
            return Ok(Resolution::Untyped);
        };
        Ok(match evaluator.evaluate() {
            Some(type_text) => Resolution::Typed {
                type_text,
                source: evaluator.kind().into(),
            },
            None => Resolution::Untyped,
        })
    }

    /// `(params) => return` for a bare reference to a plain function
    fn uncalled_function_type(&self, resolution: &ChainResolution<'_>) -> Option<String> {
        if resolution.chain.is_some() || resolution.walk.resolved.value.is_function() {
            return None;
        }
        let (parameters, return_type) = resolution.walk.terminal.signature_parts()?;
        let return_text = return_type
            .map(|annotation| annotation.text.as_str())
            .unwrap_or(&self.config.placeholder_type);
        Some(format!("{} {} {}", parameters.text, ARROW, return_text))
    }
}
