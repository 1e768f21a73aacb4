//! Parameter descriptors
//!
//! A descriptor binds a parameter name (plus optional legacy alias and
//! behavior flags) to its boxed [`TypeInterface`].

use std::ops::BitOr;

use crate::types::TypeInterface;

/// Behavior flags for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParamFlags(u8);

impl ParamFlags {
    pub const NONE: Self = Self(0);
    /// Settable only from a configuration file at startup.
    pub const IMMUTABLE: Self = Self(1 << 0);
    /// Value is redacted from logs and error reports.
    pub const SENSITIVE: Self = Self(1 << 1);
    /// Included in debug dumps; not meant for production tuning.
    pub const DEBUG: Self = Self(1 << 2);
    /// Takes the remainder of the directive line as its arguments.
    pub const MULTI_ARG: Self = Self(1 << 3);
    /// Excluded from glob enumeration; exact-name lookup only.
    pub const HIDDEN: Self = Self(1 << 4);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ParamFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

pub struct ParamDescriptor {
    name: String,
    alias: Option<String>,
    flags: ParamFlags,
    type_iface: Box<dyn TypeInterface>,
}

impl ParamDescriptor {
    pub fn new(name: &str, type_iface: Box<dyn TypeInterface>) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
            flags: ParamFlags::NONE,
            type_iface,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn flags(&self) -> ParamFlags {
        self.flags
    }

    pub fn is_immutable(&self) -> bool {
        self.flags.contains(ParamFlags::IMMUTABLE)
    }

    pub fn is_sensitive(&self) -> bool {
        self.flags.contains(ParamFlags::SENSITIVE)
    }

    pub fn is_debug(&self) -> bool {
        self.flags.contains(ParamFlags::DEBUG)
    }

    pub fn is_multi_arg(&self) -> bool {
        self.flags.contains(ParamFlags::MULTI_ARG)
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.contains(ParamFlags::HIDDEN)
    }

    pub fn type_iface(&self) -> &dyn TypeInterface {
        self.type_iface.as_ref()
    }

    pub fn type_iface_mut(&mut self) -> &mut dyn TypeInterface {
        self.type_iface.as_mut()
    }
}
