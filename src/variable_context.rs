//! Lexically scoped variables and `{name}` interpolation
//!
//! A context is a chain of frames borrowed from the tag tree. Entering a tag
//! builds a child frame on the stack that points at its parent, so a
//! subtree's variables vanish when its resolution returns and siblings never
//! observe each other's definitions.

use crate::ast::AttrValue;
use crate::error::{CollagenError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_\-]*)\}").expect("placeholder pattern is valid")
    })
}

#[derive(Debug, Clone, Copy)]
pub struct VariableContext<'a> {
    frame: &'a [(String, AttrValue)],
    parent: Option<&'a VariableContext<'a>>,
}

impl<'a> VariableContext<'a> {
    /// An empty context with no variables.
    pub fn new() -> Self {
        Self {
            frame: &[],
            parent: None,
        }
    }

    /// A root context holding `vars`.
    pub fn with_vars(vars: &'a [(String, AttrValue)]) -> Self {
        Self {
            frame: vars,
            parent: None,
        }
    }

    /// Child context: this context plus `vars`, which shadow outer names.
    pub fn push<'b>(&'b self, vars: &'b [(String, AttrValue)]) -> VariableContext<'b> {
        VariableContext {
            frame: vars,
            parent: Some(self),
        }
    }

    /// Look a name up from the innermost frame outwards. Within one frame the
    /// last definition wins.
    pub fn resolve(&self, name: &str) -> Option<&'a AttrValue> {
        let mut context = Some(self);
        while let Some(current) = context {
            if let Some((_, value)) = current.frame.iter().rev().find(|(key, _)| key == name) {
                return Some(value);
            }
            context = current.parent;
        }
        None
    }

    /// Number of frames, including this one.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut context = Some(self);
        while let Some(current) = context {
            depth += 1;
            context = current.parent;
        }
        depth
    }

    /// Replace every `{name}` in `input` with the variable's value.
    ///
    /// Only identifier-shaped placeholders are recognised, so braces in CSS
    /// or other text pass through untouched. `tag` names the element for
    /// the error raised when a name is not defined.
    pub fn interpolate(&self, input: &str, tag: &str) -> Result<String> {
        Ok(self.interpolate_counted(input, tag)?.0)
    }

    /// [`interpolate`](Self::interpolate), also returning how many
    /// placeholders were substituted.
    pub fn interpolate_counted(&self, input: &str, tag: &str) -> Result<(String, usize)> {
        if !input.contains('{') {
            return Ok((input.to_string(), 0));
        }

        let mut result = String::with_capacity(input.len());
        let mut last_end = 0;
        let mut count = 0;

        for captures in placeholder_regex().captures_iter(input) {
            let (whole, name) = match (captures.get(0), captures.get(1)) {
                (Some(whole), Some(name)) => (whole, name.as_str()),
                _ => continue,
            };

            let value = self
                .resolve(name)
                .ok_or_else(|| CollagenError::unresolved_variable(name, tag))?;

            result.push_str(&input[last_end..whole.start()]);
            result.push_str(&value.to_string());
            last_end = whole.end();
            count += 1;
        }

        result.push_str(&input[last_end..]);
        Ok((result, count))
    }
}

impl Default for VariableContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}
