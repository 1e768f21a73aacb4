//! rudder-config: Runtime configuration engine
//!
//! A registry of named, typed parameters that can be loaded from a
//! configuration file at startup, queried and updated at runtime, and
//! written back with the file's structure preserved. Updates are
//! batched and atomic: a batch either fully applies or the registry is
//! left exactly as it was.

pub mod codec;
pub mod commands;
pub mod descriptor;
pub mod loader;
pub mod registry;
pub mod rewrite;
pub mod service;
pub mod tokenize;
pub mod txn;
pub mod types;

// Re-export main types at crate root
pub use codec::NumericEncoding;
pub use commands::{config_get, config_rewrite, config_set, ConfigReply, ConfigValue};
pub use descriptor::{ParamDescriptor, ParamFlags};
pub use loader::{load_config, load_config_string};
pub use registry::ConfigRegistry;
pub use rewrite::{debug_dump, rewrite_config, rewrite_config_force, REWRITE_SIGNATURE};
pub use service::ConfigService;
pub use txn::{set_param, set_params, set_params_report, SetReport};
pub use types::{
    ApplyFn, BoolParam, ConfigEnum, EnumParam, IntKind, NumericParam, SetOutcome, StringParam,
    TupleParam, TypeInterface,
};
