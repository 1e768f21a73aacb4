//! Atomic batch parameter updates
//!
//! A batch either fully applies or leaves every parameter at its prior
//! value. Names are validated up front, values are stored one by one
//! with rollback on failure, and deferred apply callbacks run once per
//! distinct callback after all values are in place.

use std::sync::Arc;

use tracing::{info, warn};

use rudder_utils::{Result, RudderError};

use crate::registry::ConfigRegistry;
use crate::types::{ApplyFn, SetOutcome};

/// Outcome of a batch set, bundled with the audit bookkeeping an
/// external logging layer needs even when the batch fails.
pub struct SetReport {
    /// Indices into the request's pairs whose parameter is Sensitive.
    /// Populated for every resolvable name, success or failure, so the
    /// caller can redact those raw values from any record of the
    /// request.
    pub redacted: Vec<usize>,
    pub outcome: Result<()>,
}

/// Set a single parameter. Equivalent to a one-entry batch.
pub fn set_param(registry: &mut ConfigRegistry, name: &str, value: &str) -> Result<()> {
    set_params(registry, &[(name.to_string(), value.to_string())])
}

/// Set a batch of parameters atomically, dropping the audit report.
pub fn set_params(registry: &mut ConfigRegistry, pairs: &[(String, String)]) -> Result<()> {
    set_params_report(registry, pairs).outcome
}

/// Set a batch of parameters atomically.
pub fn set_params_report(registry: &mut ConfigRegistry, pairs: &[(String, String)]) -> SetReport {
    // Redaction bookkeeping covers every Sensitive-matched argument
    // before any validation can abort the batch.
    let redacted: Vec<usize> = pairs
        .iter()
        .enumerate()
        .filter(|(_, (name, _))| {
            registry
                .lookup(name)
                .is_some_and(|desc| desc.is_sensitive())
        })
        .map(|(i, _)| i)
        .collect();
    SetReport {
        redacted,
        outcome: run_batch(registry, pairs),
    }
}

fn run_batch(registry: &mut ConfigRegistry, pairs: &[(String, String)]) -> Result<()> {
    // Structural pass: every name must be known, mutable, and unique
    // within the batch. Nothing is modified before this pass ends.
    let mut canonical: Vec<String> = Vec::with_capacity(pairs.len());
    for (name, _) in pairs {
        let desc = registry
            .lookup(name)
            .ok_or_else(|| RudderError::UnknownParameter(name.clone()))?;
        if desc.is_immutable() {
            return Err(RudderError::Immutable(name.clone()));
        }
        if canonical.iter().any(|c| c == desc.name()) {
            return Err(RudderError::Duplicate(name.clone()));
        }
        canonical.push(desc.name().to_string());
    }

    // Snapshot prior values in serialized form for rollback.
    let snapshots: Vec<String> = canonical
        .iter()
        .map(|name| registry.get_value(name).unwrap_or_default())
        .collect();

    // Phase one: store each value in order.
    let mut outcomes: Vec<SetOutcome> = Vec::with_capacity(pairs.len());
    for (i, (_, value)) in pairs.iter().enumerate() {
        match store(registry, &canonical[i], value) {
            Ok(outcome) => outcomes.push(outcome),
            Err(reason) => {
                rollback(registry, &canonical[..=i], &snapshots[..=i]);
                return Err(RudderError::Set {
                    name: pairs[i].0.clone(),
                    reason,
                });
            }
        }
    }

    // Phase two: run each distinct apply callback once, in first
    // occurrence order of the parameters that changed.
    let mut applies: Vec<(usize, ApplyFn)> = Vec::new();
    for (i, name) in canonical.iter().enumerate() {
        if outcomes[i] != SetOutcome::Changed {
            continue;
        }
        let desc = registry.lookup(name).expect("validated above");
        if let Some(apply) = desc.type_iface().apply() {
            if !applies.iter().any(|(_, seen)| Arc::ptr_eq(seen, &apply)) {
                applies.push((i, apply));
            }
        }
    }
    for (i, apply) in &applies {
        if let Err(reason) = apply.as_ref()(registry) {
            rollback(registry, &canonical, &snapshots);
            // The rolled-back values may need their side effects
            // re-established.
            for (_, redo) in &applies {
                if let Err(e) = redo.as_ref()(registry) {
                    warn!(error = %e, "apply callback failed during rollback");
                }
            }
            return Err(RudderError::Apply {
                name: pairs[*i].0.clone(),
                reason,
            });
        }
    }

    for (i, (name, value)) in pairs.iter().enumerate() {
        if outcomes[i] == SetOutcome::Changed {
            let desc = registry.lookup(name).expect("validated above");
            if desc.is_sensitive() {
                info!(parameter = %canonical[i], "parameter updated (value redacted)");
            } else {
                info!(parameter = %canonical[i], value = %value, "parameter updated");
            }
        }
    }
    Ok(())
}

/// Tokenize `value` the way the parameter expects and store it.
fn store(
    registry: &mut ConfigRegistry,
    canonical: &str,
    value: &str,
) -> std::result::Result<SetOutcome, String> {
    let desc = registry.lookup_mut(canonical).expect("validated above");
    if desc.is_multi_arg() {
        let tokens: Vec<&str> = value.split(' ').collect();
        desc.type_iface_mut().set(&tokens)
    } else {
        desc.type_iface_mut().set(&[value])
    }
}

fn rollback(registry: &mut ConfigRegistry, names: &[String], snapshots: &[String]) {
    for (name, snapshot) in names.iter().zip(snapshots) {
        if let Err(reason) = store(registry, name, snapshot) {
            warn!(parameter = %name, reason = %reason, "rollback of parameter failed");
        }
    }
}
