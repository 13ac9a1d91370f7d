//! Resolution results handed to the evaluators

use crate::call_site::{extract_actual_generic_arguments, CallSite};
use crate::signature::FunctionValue;

/// Call sites from the outermost alias down to the usage, in application order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalCallChain {
    call_sites: Vec<CallSite>,
    actual_generic_arguments: Vec<String>,
}

impl OriginalCallChain {
    /// `None` when nothing was ever called
    pub fn new(call_sites: Vec<CallSite>, actual_generic_arguments: Vec<String>) -> Option<Self> {
        if call_sites.is_empty() {
            return None;
        }
        Some(Self {
            call_sites,
            actual_generic_arguments,
        })
    }

    /// Build a chain taking the first explicit generic argument list
    pub fn from_call_sites(call_sites: Vec<CallSite>) -> Option<Self> {
        let actual_generic_arguments = extract_actual_generic_arguments(&call_sites);
        Self::new(call_sites, actual_generic_arguments)
    }

    pub fn call_sites(&self) -> &[CallSite] {
        &self.call_sites
    }

    pub fn actual_generic_arguments(&self) -> &[String] {
        &self.actual_generic_arguments
    }

    pub fn len(&self) -> usize {
        self.call_sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.call_sites.is_empty()
    }

    pub fn argument_texts(&self) -> Vec<&str> {
        self.call_sites
            .iter()
            .map(|site| site.argument_text.as_str())
            .collect()
    }
}

/// The terminal function value together with the generics its declaration introduced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFunctionValue {
    pub declared_generic_names: Vec<String>,
    pub value: FunctionValue,
}

impl ResolvedFunctionValue {
    pub fn new(value: FunctionValue) -> Self {
        Self {
            declared_generic_names: value.declared_generic_names().to_vec(),
            value,
        }
    }

    /// A non-function value still carries the generics of the function that returned it
    pub fn with_generic_names(declared_generic_names: Vec<String>, value: FunctionValue) -> Self {
        Self {
            declared_generic_names,
            value,
        }
    }

    pub fn all_return_types(&self) -> Vec<String> {
        self.value.all_return_types()
    }
}
