//! Per-type behavior for configuration parameters
//!
//! Each parameter kind (boolean, string, enum, numeric, tuple list)
//! implements [`TypeInterface`]: parse-and-store, serialize, emit a
//! rewrite directive, and optionally run an apply callback after a
//! batch commit.

mod boolean;
mod enums;
mod numeric;
mod string;
mod tuple;

pub use boolean::BoolParam;
pub use enums::{ConfigEnum, EnumParam};
pub use numeric::{IntKind, NumericParam};
pub use string::StringParam;
pub use tuple::TupleParam;

use std::sync::Arc;

use crate::registry::ConfigRegistry;
use crate::rewrite::RewriteState;

/// Whether a set call changed the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Changed,
    Unchanged,
}

/// Deferred side effect run after every parameter in a batch has been
/// stored. Receives the registry read-only; returns a human-readable
/// reason on failure.
pub type ApplyFn = Arc<dyn Fn(&ConfigRegistry) -> std::result::Result<(), String> + Send + Sync>;

/// The polymorphic seam between the registry and each value kind.
pub trait TypeInterface: Send + Sync {
    /// Parse `args` and store the value. `args` holds exactly one
    /// token for scalar parameters; multi-arg parameters receive the
    /// whole token list.
    fn set(&mut self, args: &[&str]) -> std::result::Result<SetOutcome, String>;

    /// Serialize the current value to its canonical textual form.
    fn get(&self) -> String;

    /// Emit the directive line(s) for this parameter into `state`.
    fn rewrite(&self, name: &str, state: &mut RewriteState);

    /// The deferred side-effect hook, if one was registered.
    fn apply(&self) -> Option<ApplyFn> {
        None
    }

    /// True when the current value equals the configured default, in
    /// which case the rewrite engine omits the directive.
    fn is_default(&self) -> bool;
}
