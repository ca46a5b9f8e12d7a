use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// A prompt with `{{var}}` placeholders, validated against the variables
/// its schema supplies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>, allowed: &[&str]) -> Result<Self> {
        let text = text.into();
        validate_template(&text, allowed)?;
        Ok(Self { text })
    }

    /// Built-in templates are checked by their schema's tests.
    pub(crate) fn builtin(text: &'static str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    /// Load a template override from disk.
    pub fn from_file(path: &Path, allowed: &[&str]) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt template: {}", path.display()))?;
        Self::new(text, allowed)
            .with_context(|| format!("Invalid prompt template: {}", path.display()))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn render(&self, vars: &HashMap<&str, String>) -> String {
        render(&self.text, vars)
    }
}

/// Replace `{{var}}` placeholders. Unknown names are left in place so a bad
/// prompt is visible in logs; an unclosed placeholder is emitted verbatim.
pub fn render(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_name = String::new();
            loop {
                match chars.next() {
                    Some('}') if chars.peek() == Some(&'}') => {
                        chars.next();
                        break;
                    }
                    Some(ch) => var_name.push(ch),
                    None => {
                        result.push_str("{{");
                        result.push_str(&var_name);
                        return result;
                    }
                }
            }

            let var_name = var_name.trim();
            match vars.get(var_name) {
                Some(value) => result.push_str(value),
                None => {
                    result.push_str("{{");
                    result.push_str(var_name);
                    result.push_str("}}");
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Every `{{...}}` must name an allowed variable.
pub fn validate_template(template: &str, allowed: &[&str]) -> Result<()> {
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_name = String::new();
            loop {
                match chars.next() {
                    Some('}') if chars.peek() == Some(&'}') => {
                        chars.next();
                        break;
                    }
                    Some(ch) => var_name.push(ch),
                    None => bail!("Unclosed template variable: {{{{{}", var_name),
                }
            }

            let var_name = var_name.trim();
            if !allowed.contains(&var_name) {
                bail!(
                    "Unknown template variable: {{{{{}}}}}. Allowed vars: {:?}",
                    var_name,
                    allowed
                );
            }
        }
    }

    Ok(())
}
