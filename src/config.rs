// Copyright 2025 Cowboy AI, LLC.

//! Registry configuration

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::DenotatorResult;

/// Behaviour switches of a [`NameRegistry`](crate::NameRegistry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RegistryConfig {
    /// Let a name be registered again, replacing the earlier entry
    pub allow_redefinition: bool,
    /// Refuse denotators that are not well formed
    pub validate_on_register: bool,
    /// Turn a resolution pass with errors into an error
    pub fail_on_unresolved: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { allow_redefinition: false, validate_on_register: true, fail_on_unresolved: false }
    }
}

impl RegistryConfig {
    /// Parse a configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> DenotatorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Strict variant: resolution errors fail the pass
    pub fn strict() -> Self {
        Self { fail_on_unresolved: true, ..Self::default() }
    }
}
