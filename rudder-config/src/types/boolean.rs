//! Yes/no parameters

use crate::codec::parse_yes_no;
use crate::rewrite::RewriteState;

use super::{ApplyFn, SetOutcome, TypeInterface};

pub struct BoolParam {
    value: bool,
    default: bool,
    apply: Option<ApplyFn>,
}

impl BoolParam {
    pub fn new(default: bool) -> Self {
        Self {
            value: default,
            default,
            apply: None,
        }
    }

    pub fn with_apply(mut self, apply: ApplyFn) -> Self {
        self.apply = Some(apply);
        self
    }

    pub fn value(&self) -> bool {
        self.value
    }
}

impl TypeInterface for BoolParam {
    fn set(&mut self, args: &[&str]) -> Result<SetOutcome, String> {
        let new = parse_yes_no(args[0]).map_err(|e| e.reason())?;
        if new == self.value {
            return Ok(SetOutcome::Unchanged);
        }
        self.value = new;
        Ok(SetOutcome::Changed)
    }

    fn get(&self) -> String {
        if self.value { "yes" } else { "no" }.to_string()
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

    #[test]
    fn test_set_and_get() {
        let mut p = BoolParam::new(false);
        assert_eq!(p.get(), "no");
        assert_eq!(p.set(&["yes"]).unwrap(), SetOutcome::Changed);
        assert_eq!(p.get(), "yes");
        assert_eq!(p.set(&["yes"]).unwrap(), SetOutcome::Unchanged);
        assert!(!p.is_default());
    }

    #[test]
    fn test_rejects_other_tokens() {
        let mut p = BoolParam::new(false);
        let err = p.set(&["true"]).unwrap_err();
        assert!(err.contains("argument must be 'yes' or 'no'"));
    }
}
