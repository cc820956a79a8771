//! `${VAR}` templates used for RPC URLs and secret references.

use std::fmt;

use thiserror::Error;

use crate::secrets::SecretProvider;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unterminated placeholder starting at byte {0}")]
    Unterminated(usize),

    #[error("empty placeholder at byte {0}")]
    EmptyName(usize),

    #[error("invalid variable name {0:?}")]
    InvalidName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var(String),
}

/// A parsed template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
}

/// Result of rendering a template against a secret provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Complete(String),
    /// At least one variable had no value. Names are in template order, deduplicated.
    Incomplete { missing: Vec<String> },
}

impl Template {
    /// Parse a template. A `$` that does not open `${` is kept literally.
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = raw;
        let mut offset = 0;

        while let Some(start) = rest.find("${") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after
                .find('}')
                .ok_or(TemplateError::Unterminated(offset + start))?;
            let name = &after[..end];
            if name.is_empty() {
                return Err(TemplateError::EmptyName(offset + start));
            }
            if !is_valid_name(name) {
                return Err(TemplateError::InvalidName(name.to_string()));
            }
            segments.push(Segment::Var(name.to_string()));

            let consumed = start + 2 + end + 1;
            rest = &rest[consumed..];
            offset += consumed;
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Template {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Variable names referenced by the template, in order of appearance.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Var(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// The variable name when the template is exactly one `${VAR}` and nothing else.
    pub fn single_variable(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [Segment::Var(name)] => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn render<P: SecretProvider + ?Sized>(&self, secrets: &P) -> Rendered {
        let mut out = String::with_capacity(self.raw.len());
        let mut missing: Vec<String> = Vec::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Var(name) => match secrets.get(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        if !missing.iter().any(|m| m == name) {
                            missing.push(name.clone());
                        }
                    }
                },
            }
        }

        if missing.is_empty() {
            Rendered::Complete(out)
        } else {
            Rendered::Incomplete { missing }
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Format a variable name as a reference.
pub fn reference(name: &str) -> String {
    format!("${{{name}}}")
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
