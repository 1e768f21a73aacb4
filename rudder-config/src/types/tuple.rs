//! Multi-argument tuple-list parameters
//!
//! A tuple parameter holds zero or more rows of fixed arity, e.g.
//! snapshot schedules of `<seconds> <changes>` pairs. Setting replaces
//! the whole list; a single empty token clears it.

use crate::rewrite::RewriteState;

use super::{ApplyFn, SetOutcome, TypeInterface};

pub struct TupleParam {
    rows: Vec<Vec<String>>,
    arity: usize,
    validator: Option<Box<dyn Fn(&[String]) -> Result<(), String> + Send + Sync>>,
    apply: Option<ApplyFn>,
}

impl TupleParam {
    pub fn new(arity: usize, default_rows: &[&[&str]]) -> Self {
        assert!(arity > 0);
        Self {
            rows: default_rows
                .iter()
                .map(|row| row.iter().map(|t| t.to_string()).collect())
                .collect(),
            arity,
            validator: None,
            apply: None,
        }
    }

    pub fn with_validator(
        mut self,
        validator: impl Fn(&[String]) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn with_apply(mut self, apply: ApplyFn) -> Self {
        self.apply = Some(apply);
        self
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

impl TypeInterface for TupleParam {
    fn set(&mut self, args: &[&str]) -> Result<SetOutcome, String> {
        // `name ""` (and an empty token list) clears every row.
        let new: Vec<Vec<String>> = if args.is_empty() || (args.len() == 1 && args[0].is_empty()) {
            Vec::new()
        } else {
            if args.len() % self.arity != 0 {
                return Err(format!(
                    "wrong number of arguments, must be a multiple of {}",
                    self.arity
                ));
            }
            let rows: Vec<Vec<String>> = args
                .chunks(self.arity)
                .map(|row| row.iter().map(|t| t.to_string()).collect())
                .collect();
            if let Some(validator) = &self.validator {
                for row in &rows {
                    validator(row)?;
                }
            }
            rows
        };
        if new == self.rows {
            return Ok(SetOutcome::Unchanged);
        }
        self.rows = new;
        Ok(SetOutcome::Changed)
    }

    fn get(&self) -> String {
        self.rows
            .iter()
            .flat_map(|row| row.iter().map(String::as_str))
            .collect::<Vec<&str>>()
            .join(" ")
    }

    fn rewrite(&self, name: &str, state: &mut RewriteState) {
        if self.rows.is_empty() {
            state.rewrite_line(name, format!("{} \"\"", name), true);
            return;
        }
        for row in &self.rows {
            let line = format!("{} {}", name, row.join(" "));
            state.rewrite_line(name, line, true);
        }
    }

    fn apply(&self) -> Option<ApplyFn> {
        self.apply.clone()
    }

    fn is_default(&self) -> bool {
        // Tuple lists always rewrite, so defaultness is not tracked.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_points() -> TupleParam {
        TupleParam::new(2, &[&["3600", "1"], &["300", "100"]]).with_validator(|row| {
            for token in row {
                token
                    .parse::<u64>()
                    .map_err(|_| "argument couldn't be parsed into an integer".to_string())?;
            }
            Ok(())
        })
    }

    #[test]
    fn test_get_flattens_rows() {
        let p = save_points();
        assert_eq!(p.get(), "3600 1 300 100");
    }

    #[test]
    fn test_set_replaces_all_rows() {
        let mut p = save_points();
        assert_eq!(p.set(&["60", "10"]).unwrap(), SetOutcome::Changed);
        assert_eq!(p.rows(), &[vec!["60".to_string(), "10".to_string()]]);
    }

    #[test]
    fn test_empty_token_clears() {
        let mut p = save_points();
        p.set(&[""]).unwrap();
        assert!(p.rows().is_empty());
        assert_eq!(p.get(), "");
    }

    #[test]
    fn test_arity_mismatch() {
        let mut p = save_points();
        let err = p.set(&["60", "10", "5"]).unwrap_err();
        assert!(err.contains("multiple of 2"));
    }

    #[test]
    fn test_row_validator() {
        let mut p = save_points();
        assert!(p.set(&["60", "ten"]).is_err());
        assert_eq!(p.get(), "3600 1 300 100");
    }
}
