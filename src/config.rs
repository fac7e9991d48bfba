use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{HospitalSchemaError, Result};

/// What to do with input keys the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Drop them from the output silently.
    #[default]
    Strip,
    /// Report each one as a violation.
    Reject,
}

/// Validation engine options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorConfig {
    pub unknown_fields: UnknownFieldPolicy,
    /// Maximum object/array nesting below the root record.
    pub max_depth: usize,
    /// Accept date strings and epoch-millisecond numbers for date fields.
    /// When disabled only native dates are accepted.
    pub coerce_dates: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Strip,
            max_depth: 16,
            coerce_dates: true,
        }
    }
}

impl ValidatorConfig {
    /// Default options, but unknown keys are violations.
    pub fn strict() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Reject,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading validator config");
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(HospitalSchemaError::config("maxDepth must be at least 1"));
        }
        Ok(())
    }
}
