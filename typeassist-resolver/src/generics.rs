//! Positional generic binding and textual substitution

use indexmap::IndexMap;

/// Declared type-parameter names zipped with the actual type arguments of a call.
///
/// The shorter list wins; a name declared twice keeps its first argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericBinding {
    bindings: IndexMap<String, String>,
}

impl GenericBinding {
    pub fn new(declared_generic_names: &[String], actual_generic_arguments: &[String]) -> Self {
        let mut bindings = IndexMap::new();
        for (name, argument) in declared_generic_names.iter().zip(actual_generic_arguments) {
            bindings
                .entry(name.clone())
                .or_insert_with(|| argument.trim().to_string());
        }
        Self { bindings }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .map(|(name, argument)| (name.as_str(), argument.as_str()))
    }

    /// Replace bound type names in `text`.
    ///
    /// Substitution is simultaneous and only touches whole identifier tokens
    /// in type position: string literals, names after a `.`, and parameter,
    /// property or method names (`t` in `(t: T)`) are left alone.
    pub fn substitute(&self, text: &str) -> String {
        if self.bindings.is_empty() {
            return text.to_string();
        }

        let chars: Vec<char> = text.chars().collect();
        let mut output = String::with_capacity(text.len());
        let mut index = 0;

        while index < chars.len() {
            let ch = chars[index];

            if matches!(ch, '"' | '\'' | '`') {
                let end = skip_string(&chars, index);
                output.extend(&chars[index..end]);
                index = end;
                continue;
            }

            if is_ident_start(ch) {
                let start = index;
                while index < chars.len() && is_ident_char(chars[index]) {
                    index += 1;
                }
                let token: String = chars[start..index].iter().collect();

                match self.bindings.get(&token) {
                    Some(argument) if is_type_position(&chars, start, index) => {
                        tracing::trace!(name = %token, %argument, "substituting generic");
                        output.push_str(argument);
                    }
                    _ => output.push_str(&token),
                }
                continue;
            }

            if ch.is_ascii_digit() {
                // Digits glued to letters (`1e5`, `0xT`) must not start a token
                while index < chars.len() && is_ident_char(chars[index]) {
                    output.push(chars[index]);
                    index += 1;
                }
                continue;
            }

            output.push(ch);
            index += 1;
        }

        output
    }
}

/// Bind and substitute in one step
pub fn substitute_generics(
    text: &str,
    declared_generic_names: &[String],
    actual_generic_arguments: &[String],
) -> String {
    GenericBinding::new(declared_generic_names, actual_generic_arguments).substitute(text)
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

fn skip_string(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut index = start + 1;
    while index < chars.len() {
        match chars[index] {
            '\\' => index += 2,
            ch if ch == quote => return index + 1,
            _ => index += 1,
        }
    }
    chars.len()
}

fn previous_significant(chars: &[char], before: usize) -> Option<char> {
    chars[..before].iter().rev().copied().find(|ch| !ch.is_whitespace())
}

fn next_significant(chars: &[char], from: usize) -> Option<(usize, char)> {
    chars
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(index, ch)| (index, *ch))
}

fn is_type_position(chars: &[char], start: usize, end: usize) -> bool {
    let previous = previous_significant(chars, start);
    if previous == Some('.') {
        return false;
    }

    // `name:`, `name?:` or `name(` directly after `(`, `,`, `{` or `;` declares a member
    let declares_member = matches!(previous, None | Some('(' | ',' | '{' | ';'));
    if declares_member {
        let after_name = match next_significant(chars, end) {
            Some((question, '?')) => next_significant(chars, question + 1),
            other => other,
        };
        match after_name {
            Some((_, ':' | '(')) => return false,
            // a type never opens an object type member, so `{ T<U>(): void }` is a method
            Some((_, '<')) if matches!(previous, Some('{' | ';')) => return false,
            _ => {}
        }
    }

    true
}
