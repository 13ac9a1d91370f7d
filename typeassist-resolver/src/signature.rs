//! Signature model
//!
//! A [`FunctionValue`] is the terminal of an alias walk: something whose
//! curried layers can be listed. Each variant renders a signature of the form
//! `(a) => (b) => T`, and [`FunctionValue::all_return_types`] lists what is
//! left of that signature after zero, one, two... applications.

use typeassist_parser::{ArrowBody, Expression, ExpressionKind};

pub const ARROW: &str = "=>";

/// Return type used for an expression-bodied arrow whose innermost layer has no annotation
pub const IMPLICIT_RETURN_TYPE: &str = "any";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionValue {
    /// Declared parameter list plus a (possibly curried) return type
    StandardFunction {
        parameter_text: String,
        curried_return_text: String,
        declared_generic_names: Vec<String>,
    },
    /// An arrow chain or `function` expression written inline
    FunctionExpression {
        raw_arrow_chain_text: String,
        declared_generic_names: Vec<String>,
    },
    /// Plain type text with no further layers
    NonFunctionReturnType { type_text: String },
}

impl FunctionValue {
    pub fn standard(
        parameter_text: impl Into<String>,
        curried_return_text: impl Into<String>,
        declared_generic_names: Vec<String>,
    ) -> Option<Self> {
        let parameter_text = parameter_text.into();
        let curried_return_text = curried_return_text.into();
        if parameter_text.trim().is_empty() || curried_return_text.trim().is_empty() {
            return None;
        }
        Some(FunctionValue::StandardFunction {
            parameter_text,
            curried_return_text,
            declared_generic_names,
        })
    }

    pub fn function_expression(
        raw_arrow_chain_text: impl Into<String>,
        declared_generic_names: Vec<String>,
    ) -> Option<Self> {
        let raw_arrow_chain_text = raw_arrow_chain_text.into();
        if raw_arrow_chain_text.trim().is_empty() {
            return None;
        }
        Some(FunctionValue::FunctionExpression {
            raw_arrow_chain_text,
            declared_generic_names,
        })
    }

    pub fn non_function(type_text: impl Into<String>) -> Option<Self> {
        let type_text = type_text.into();
        if type_text.trim().is_empty() {
            return None;
        }
        Some(FunctionValue::NonFunctionReturnType { type_text })
    }

    pub fn declared_generic_names(&self) -> &[String] {
        match self {
            FunctionValue::StandardFunction {
                declared_generic_names,
                ..
            }
            | FunctionValue::FunctionExpression {
                declared_generic_names,
                ..
            } => declared_generic_names,
            FunctionValue::NonFunctionReturnType { .. } => &[],
        }
    }

    pub fn is_function(&self) -> bool {
        !matches!(self, FunctionValue::NonFunctionReturnType { .. })
    }

    /// Full signature text, layers joined with ` => `
    pub fn signature(&self) -> String {
        match self {
            FunctionValue::StandardFunction {
                parameter_text,
                curried_return_text,
                ..
            } => format!("{} {} {}", parameter_text.trim(), ARROW, curried_return_text.trim()),
            FunctionValue::FunctionExpression {
                raw_arrow_chain_text,
                ..
            } => arrow_chain_signature(raw_arrow_chain_text),
            FunctionValue::NonFunctionReturnType { type_text } => type_text.trim().to_string(),
        }
    }

    /// Every suffix of the signature, longest first.
    ///
    /// For `(t: T) => (c: A) => string` this is
    /// `["(t: T) => (c: A) => string", "(c: A) => string", "string"]`.
    pub fn all_return_types(&self) -> Vec<String> {
        all_return_types(&self.signature())
    }
}

impl std::fmt::Display for FunctionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.signature())
    }
}

pub fn all_return_types(signature: &str) -> Vec<String> {
    if signature.trim().is_empty() {
        return Vec::new();
    }

    let segments: Vec<&str> = split_top_level_arrows(signature)
        .into_iter()
        .map(str::trim)
        .collect();

    (0..segments.len())
        .map(|index| segments[index..].join(&format!(" {ARROW} ")))
        .collect()
}

/// Split on `=>` tokens that are not nested inside brackets or string literals
pub fn split_top_level_arrows(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut depth: usize = 0;
    let mut quote: Option<u8> = None;
    let mut segment_start = 0;
    let mut index = 0;

    while index < bytes.len() {
        let byte = bytes[index];

        if let Some(open) = quote {
            if byte == b'\\' {
                index += 2;
                continue;
            }
            if byte == open {
                quote = None;
            }
            index += 1;
            continue;
        }

        match byte {
            b'"' | b'\'' | b'`' => quote = Some(byte),
            b'=' if bytes.get(index + 1) == Some(&b'>') => {
                if depth == 0 {
                    segments.push(&text[segment_start..index]);
                    segment_start = index + 2;
                }
                index += 2;
                continue;
            }
            b'(' | b'[' | b'{' | b'<' => depth += 1,
            b')' | b']' | b'}' | b'>' => depth = depth.saturating_sub(1),
            _ => {}
        }
        index += 1;
    }

    segments.push(&text[segment_start..]);
    segments
}

/// Render an inline arrow chain as `(a) => (b) => T`.
///
/// Each arrow contributes its parameter list. The chain ends at the first
/// layer with a return annotation, at a block body, or at a body that is not
/// itself a function.
pub fn arrow_chain_signature(raw: &str) -> String {
    match typeassist_parser::parse_expression(raw) {
        Ok(expression) => {
            layered_signature(&expression).unwrap_or_else(|| raw.trim().to_string())
        }
        Err(error) => {
            tracing::debug!(%error, "arrow chain did not parse, using raw text");
            raw.trim().to_string()
        }
    }
}

fn layered_signature(expression: &Expression) -> Option<String> {
    let mut layers: Vec<String> = Vec::new();
    let mut current = expression.unparenthesized();

    let terminal = loop {
        match &current.kind {
            ExpressionKind::Arrow(arrow) => {
                layers.push(arrow.parameters.text.clone());
                if let Some(return_type) = &arrow.return_type {
                    break return_type.unparenthesized().text.clone();
                }
                match &arrow.body {
                    ArrowBody::Expression(body) => current = body.unparenthesized(),
                    ArrowBody::Block(_) => break IMPLICIT_RETURN_TYPE.to_string(),
                }
            }
            ExpressionKind::Function(function) => {
                layers.push(function.parameters.text.clone());
                break function
                    .return_type
                    .as_ref()
                    .map(|annotation| annotation.text.clone())
                    .unwrap_or_else(|| IMPLICIT_RETURN_TYPE.to_string());
            }
            _ if layers.is_empty() => return None,
            _ => break IMPLICIT_RETURN_TYPE.to_string(),
        }
    };

    layers.push(terminal);
    Some(layers.join(&format!(" {ARROW} ")))
}
