//! Secret sourcing
//!
//! The descriptor never holds secret values. It names environment variables
//! through `${VAR}` references, and the loader resolves them through a
//! [`SecretProvider`] handed to it by the caller:
//!
//! 1. [`EnvSecrets`] reads the process environment
//! 2. [`MapSecrets`] holds values in memory, e.g. read from an untracked `.env`
//! 3. [`Layered`] consults a primary provider and falls back to a second one
//!
//! Empty values count as unset, so `PRIVATE_KEY=` in a `.env` file behaves like
//! a missing key instead of producing an empty credential.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

use crate::error::ConfigError;
use crate::template::{self, Template};

/// Source of named secret values.
pub trait SecretProvider {
    fn get(&self, name: &str) -> Option<String>;
}

impl<T: SecretProvider + ?Sized> SecretProvider for &T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretProvider for EnvSecrets {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

/// In-memory secrets.
#[derive(Debug, Clone, Default)]
pub struct MapSecrets {
    values: HashMap<String, String>,
}

impl MapSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read a dotenv-style secrets file without touching the process environment.
    ///
    /// A missing file yields an empty set; the file is optional.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        let mut secrets = Self::new();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no secrets file");
            return Ok(secrets);
        }

        for item in dotenvy::from_path_iter(path)? {
            let (name, value) = item?;
            secrets.insert(name, value);
        }
        tracing::debug!(path = %path.display(), count = secrets.len(), "loaded secrets file");
        Ok(secrets)
    }
}

impl SecretProvider for MapSecrets {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

/// Consults `primary` first and `fallback` second.
///
/// `Layered::new(EnvSecrets, file)` gives dotenv semantics: variables already
/// set in the process win over the file.
#[derive(Debug, Clone, Default)]
pub struct Layered<A, B> {
    primary: A,
    fallback: B,
}

impl<A, B> Layered<A, B> {
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A: SecretProvider, B: SecretProvider> SecretProvider for Layered<A, B> {
    fn get(&self, name: &str) -> Option<String> {
        self.primary.get(name).or_else(|| self.fallback.get(name))
    }
}

/// Process environment layered over an optional secrets file.
pub fn environment_with_file(path: &Path) -> Result<Layered<EnvSecrets, MapSecrets>, ConfigError> {
    Ok(Layered::new(EnvSecrets, MapSecrets::from_env_file(path)?))
}

/// A secret value. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// A `${VAR}` reference together with whatever value it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    variable: String,
    value: Option<Secret>,
}

impl SecretRef {
    /// Parse a descriptor value that must be exactly one `${VAR}` reference.
    ///
    /// `field` names the descriptor location for error messages.
    pub fn parse(raw: &str, field: &str) -> Result<String, ConfigError> {
        let template = Template::parse(raw).map_err(|source| ConfigError::InvalidTemplate {
            field: field.to_string(),
            source,
        })?;
        template
            .single_variable()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::SecretLiteral {
                field: field.to_string(),
            })
    }

    pub fn resolve<P: SecretProvider + ?Sized>(variable: String, secrets: &P) -> Self {
        let value = secrets.get(&variable).map(Secret);
        Self { variable, value }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn value(&self) -> Option<&Secret> {
        self.value.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    /// The `${VAR}` form written back to descriptors.
    pub fn reference(&self) -> String {
        template::reference(&self.variable)
    }
}

impl Serialize for SecretRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.reference())
    }
}
