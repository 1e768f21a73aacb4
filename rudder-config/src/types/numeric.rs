//! Integer parameters
//!
//! All integer kinds share one signed 64-bit slot; [`IntKind`] records
//! the native width a consumer reads the value back as, and drives the
//! signed/unsigned flavor of the bounds check.

use crate::codec::{
    format_numeric, format_numeric_unsigned, parse_numeric, parse_numeric_unsigned,
    NumericEncoding,
};
use crate::rewrite::RewriteState;

use super::{ApplyFn, SetOutcome, TypeInterface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntKind {
    I32,
    U32,
    I64,
    U64,
    Usize,
}

impl IntKind {
    fn is_unsigned(self) -> bool {
        matches!(self, IntKind::U32 | IntKind::U64 | IntKind::Usize)
    }
}

pub struct NumericParam {
    value: i64,
    default: i64,
    kind: IntKind,
    encoding: NumericEncoding,
    lower: i64,
    upper: i64,
    validator: Option<Box<dyn Fn(i64) -> Result<(), String> + Send + Sync>>,
    apply: Option<ApplyFn>,
}

impl NumericParam {
    pub fn new(kind: IntKind, default: i64, lower: i64, upper: i64) -> Self {
        Self {
            value: default,
            default,
            kind,
            encoding: NumericEncoding::PLAIN,
            lower,
            upper,
            validator: None,
            apply: None,
        }
    }

    pub fn with_encoding(mut self, encoding: NumericEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_validator(
        mut self,
        validator: impl Fn(i64) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn with_apply(mut self, apply: ApplyFn) -> Self {
        self.apply = Some(apply);
        self
    }

    /// The raw stored value. Percent-encoded parameters hold the
    /// negated percentage here when a percentage was configured.
    pub fn value(&self) -> i64 {
        self.value
    }

    fn check_bounds(&self, value: i64) -> Result<(), String> {
        if self.kind.is_unsigned() {
            // Unsigned kinds compare bit patterns as u64 so the full
            // native range is addressable.
            let (v, lo, hi) = (value as u64, self.lower as u64, self.upper as u64);
            if v < lo || v > hi {
                if self.encoding.octal {
                    return Err(format!(
                        "argument must be between {:o} and {:o} inclusive",
                        lo, hi
                    ));
                }
                return Err(format!("argument must be between {} and {} inclusive", lo, hi));
            }
        } else if self.encoding.percent && value < 0 {
            // Percentages live below zero; only the lower bound caps
            // how large the percentage may be.
            if value < self.lower {
                return Err(format!(
                    "percentage argument must be less or equal to {}",
                    -self.lower
                ));
            }
        } else if value < self.lower || value > self.upper {
            return Err(format!(
                "argument must be between {} and {} inclusive",
                self.lower, self.upper
            ));
        }
        Ok(())
    }
}

impl TypeInterface for NumericParam {
    fn set(&mut self, args: &[&str]) -> Result<SetOutcome, String> {
        // Unsigned slots parse through u64 and keep the bit pattern,
        // so values above i64::MAX stay representable.
        let new = if self.kind.is_unsigned() {
            parse_numeric_unsigned(args[0], self.encoding).map_err(|e| e.reason())? as i64
        } else {
            parse_numeric(args[0], self.encoding).map_err(|e| e.reason())?
        };
        self.check_bounds(new)?;
        if let Some(validator) = &self.validator {
            validator(new)?;
        }
        if new == self.value {
            return Ok(SetOutcome::Unchanged);
        }
        self.value = new;
        Ok(SetOutcome::Changed)
    }

    fn get(&self) -> String {
        if self.kind.is_unsigned() {
            format_numeric_unsigned(self.value as u64, self.encoding)
        } else {
            format_numeric(self.value, self.encoding)
        }
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
