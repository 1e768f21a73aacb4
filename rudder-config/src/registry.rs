//! The parameter registry
//!
//! Owns every [`ParamDescriptor`] and answers case-insensitive lookups
//! by name or alias, plus glob-style enumeration for the get command.

use std::collections::HashMap;

use glob::{MatchOptions, Pattern};
use rudder_utils::{Result, RudderError};

use crate::descriptor::ParamDescriptor;

pub struct ConfigRegistry {
    params: Vec<ParamDescriptor>,
    // Lowercased name and alias both point at the descriptor's slot.
    index: HashMap<String, usize>,
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a descriptor. Names and aliases share one namespace; a
    /// collision is a programming error surfaced as [`RudderError::Internal`].
    pub fn register(&mut self, desc: ParamDescriptor) -> Result<()> {
        let slot = self.params.len();
        let mut keys = vec![desc.name().to_ascii_lowercase()];
        if let Some(alias) = desc.alias() {
            keys.push(alias.to_ascii_lowercase());
        }
        for key in &keys {
            if self.index.contains_key(key) {
                return Err(RudderError::internal(format!(
                    "parameter '{}' registered twice",
                    key
                )));
            }
        }
        for key in keys {
            self.index.insert(key, slot);
        }
        self.params.push(desc);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&ParamDescriptor> {
        let slot = *self.index.get(&name.to_ascii_lowercase())?;
        Some(&self.params[slot])
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut ParamDescriptor> {
        let slot = *self.index.get(&name.to_ascii_lowercase())?;
        Some(&mut self.params[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamDescriptor> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Serialized value of a parameter, if registered.
    pub fn get_value(&self, name: &str) -> Option<String> {
        self.lookup(name).map(|d| d.type_iface().get())
    }

    /// Enumerate parameters whose name or alias matches `pattern`.
    ///
    /// The name and alias are matched independently, so a pattern
    /// covering both yields two entries for the same value. Hidden
    /// parameters never match a glob; they are returned only for an
    /// exact (case-insensitive) pattern.
    pub fn get_matching(&self, pattern: &str) -> Vec<(String, String)> {
        let compiled = Pattern::new(pattern).ok();
        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        let matches = |candidate: &str, desc: &ParamDescriptor| -> bool {
            if desc.is_hidden() {
                return candidate.eq_ignore_ascii_case(pattern);
            }
            compiled
                .as_ref()
                .map(|p| p.matches_with(candidate, options))
                .unwrap_or(false)
        };

        let mut out = Vec::new();
        for desc in &self.params {
            if matches(desc.name(), desc) {
                out.push((desc.name().to_string(), desc.type_iface().get()));
            }
            if let Some(alias) = desc.alias() {
                if matches(alias, desc) {
                    out.push((alias.to_string(), desc.type_iface().get()));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ParamFlags;
    use crate::types::{BoolParam, StringParam};

    fn registry() -> ConfigRegistry {
        let mut reg = ConfigRegistry::new();
        reg.register(ParamDescriptor::new(
            "appendonly",
            Box::new(BoolParam::new(false)),
        ))
        .unwrap();
        reg.register(
            ParamDescriptor::new("replica-read-only", Box::new(BoolParam::new(true)))
                .with_alias("slave-read-only"),
        )
        .unwrap();
        reg.register(
            ParamDescriptor::new("internal-secret", Box::new(StringParam::new(None)))
                .with_flags(ParamFlags::HIDDEN),
        )
        .unwrap();
        reg
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let reg = registry();
        assert!(reg.lookup("AppendOnly").is_some());
        assert!(reg.lookup("slave-read-only").is_some());
        assert!(reg.lookup("nonesuch").is_none());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut reg = registry();
        let err = reg
            .register(ParamDescriptor::new(
                "appendonly",
                Box::new(BoolParam::new(true)),
            ))
            .unwrap_err();
        assert!(err.to_string().contains("registered twice"));
    }

    #[test]
    fn test_glob_matches_name_and_alias_independently() {
        let reg = registry();
        let hits = reg.get_matching("*read-only*");
        let names: Vec<&str> = hits.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["replica-read-only", "slave-read-only"]);
    }

    #[test]
    fn test_hidden_requires_exact_match() {
        let reg = registry();
        assert!(reg.get_matching("*").iter().all(|(n, _)| n != "internal-secret"));
        let hits = reg.get_matching("INTERNAL-SECRET");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "internal-secret");
    }
}
