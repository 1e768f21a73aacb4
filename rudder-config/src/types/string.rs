//! Free-form string parameters

use crate::rewrite::RewriteState;
use crate::tokenize::quote;

use super::{ApplyFn, SetOutcome, TypeInterface};

/// An optional string value. With `empty_to_none` an empty token
/// stores `None`, matching parameters where "" means unset.
pub struct StringParam {
    value: Option<String>,
    default: Option<String>,
    empty_to_none: bool,
    apply: Option<ApplyFn>,
    validator: Option<Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>>,
}

impl StringParam {
    pub fn new(default: Option<&str>) -> Self {
        Self {
            value: default.map(str::to_string),
            default: default.map(str::to_string),
            empty_to_none: false,
            apply: None,
            validator: None,
        }
    }

    /// Treat an empty token as "no value".
    pub fn empty_is_none(mut self) -> Self {
        self.empty_to_none = true;
        self
    }

    pub fn with_apply(mut self, apply: ApplyFn) -> Self {
        self.apply = Some(apply);
        self
    }

    pub fn with_validator(
        mut self,
        validator: impl Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl TypeInterface for StringParam {
    fn set(&mut self, args: &[&str]) -> Result<SetOutcome, String> {
        let token = args[0];
        if let Some(validator) = &self.validator {
            validator(token)?;
        }
        let new = if self.empty_to_none && token.is_empty() {
            None
        } else {
            Some(token.to_string())
        };
        if new == self.value {
            return Ok(SetOutcome::Unchanged);
        }
        self.value = new;
        Ok(SetOutcome::Changed)
    }

    fn get(&self) -> String {
        self.value.clone().unwrap_or_default()
    }

    fn rewrite(&self, name: &str, state: &mut RewriteState) {
        // An unset value has no directive; any old line is dropped by
        // the orphan pass.
        if let Some(value) = &self.value {
            let line = format!("{} {}", name, quote(value));
            state.rewrite_line(name, line, !self.is_default());
        } else {
            state.mark_processed(name);
        }
    }

    fn apply(&self) -> Option<ApplyFn> {
        self.apply.clone()
    }

    fn is_default(&self) -> bool {
        self.value == self.default
    }
}
