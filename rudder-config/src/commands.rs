//! The user-facing command surface
//!
//! Thin wrappers over the registry, transaction and rewrite layers,
//! with serializable reply types for transport or JSON output.

use std::path::Path;

use serde::{Deserialize, Serialize};

use rudder_utils::Result;

use crate::registry::ConfigRegistry;
use crate::rewrite;
use crate::txn;

/// One name/value pair in a get reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    pub name: String,
    pub value: String,
}

/// Reply to a config command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigReply {
    Values { values: Vec<ConfigValue> },
    Ok,
    Error { message: String },
}

/// Enumerate parameters matching any of `patterns`. A name matched by
/// several patterns is reported once.
pub fn config_get(registry: &ConfigRegistry, patterns: &[String]) -> Vec<ConfigValue> {
    let mut values: Vec<ConfigValue> = Vec::new();
    for pattern in patterns {
        for (name, value) in registry.get_matching(pattern) {
            if values.iter().any(|v| v.name == name) {
                continue;
            }
            values.push(ConfigValue { name, value });
        }
    }
    values
}

/// Apply a batch of name/value pairs atomically. The report carries
/// the indices of sensitive arguments so callers can redact them from
/// any log of the request, whether or not the batch succeeded.
pub fn config_set(registry: &mut ConfigRegistry, pairs: &[(String, String)]) -> txn::SetReport {
    txn::set_params_report(registry, pairs)
}

/// Rewrite the configuration file from current values.
pub fn config_rewrite(registry: &ConfigRegistry, path: &Path) -> Result<()> {
    rewrite::rewrite_config(registry, path)
}
