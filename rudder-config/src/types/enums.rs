//! Enumerated parameters

use crate::rewrite::RewriteState;

use super::{ApplyFn, SetOutcome, TypeInterface};

/// An ordered name-to-value mapping. Several names may share a value;
/// the first name wins when serializing, so canonical spellings go
/// first and legacy aliases after.
pub struct ConfigEnum {
    entries: Vec<(String, i32)>,
}

impl ConfigEnum {
    pub fn new(entries: &[(&str, i32)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }

    /// Case-insensitive lookup of a name.
    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }

    /// First name registered for `value`.
    pub fn name_of(&self, value: i32) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| n.as_str())
    }

    pub fn name_or_unknown(&self, value: i32) -> &str {
        self.name_of(value).unwrap_or("unknown")
    }

    /// The rejection message listing every accepted name.
    fn expected(&self) -> String {
        let names: Vec<&str> = self.entries.iter().map(|(n, _)| n.as_str()).collect();
        format!(
            "argument must be one of the following: {}",
            names.join(", ")
        )
    }
}

pub struct EnumParam {
    table: ConfigEnum,
    value: i32,
    default: i32,
    apply: Option<ApplyFn>,
}

impl EnumParam {
    pub fn new(table: ConfigEnum, default: i32) -> Self {
        Self {
            table,
            value: default,
            default,
            apply: None,
        }
    }

    pub fn with_apply(mut self, apply: ApplyFn) -> Self {
        self.apply = Some(apply);
        self
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl TypeInterface for EnumParam {
    fn set(&mut self, args: &[&str]) -> Result<SetOutcome, String> {
        let new = self
            .table
            .value_of(args[0])
            .ok_or_else(|| self.table.expected())?;
        if new == self.value {
            return Ok(SetOutcome::Unchanged);
        }
        self.value = new;
        Ok(SetOutcome::Changed)
    }

    fn get(&self) -> String {
        self.table.name_or_unknown(self.value).to_string()
    }

    fn rewrite(&self, name: &str, state: &mut RewriteState) {
        let line = format!("{} {}", name, self.get());
        state.rewrite_line(name, line, !self.is_default());
    }

    fn apply(&self) -> Option<ApplyFn> {
        self.apply.clone()
    }

    fn is_default(&self) -> bool {
        self.value == self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loglevel() -> ConfigEnum {
        ConfigEnum::new(&[("debug", 0), ("verbose", 1), ("notice", 2), ("warning", 3)])
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut p = EnumParam::new(loglevel(), 2);
        assert_eq!(p.get(), "notice");
        assert_eq!(p.set(&["WARNING"]).unwrap(), SetOutcome::Changed);
        assert_eq!(p.get(), "warning");
    }

    #[test]
    fn test_rejection_lists_names() {
        let mut p = EnumParam::new(loglevel(), 2);
        let err = p.set(&["chatty"]).unwrap_err();
        assert_eq!(
            err,
            "argument must be one of the following: debug, verbose, notice, warning"
        );
    }

    #[test]
    fn test_first_name_wins() {
        let table = ConfigEnum::new(&[("replica", 1), ("slave", 1)]);
        assert_eq!(table.name_of(1), Some("replica"));
        assert_eq!(table.value_of("slave"), Some(1));
    }
}
