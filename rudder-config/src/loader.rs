//! Startup configuration loading
//!
//! Applies a configuration file (plus optional extra directives, e.g.
//! from the command line) to a registry. Loading is the only path that
//! may set immutable parameters. Any error aborts with the file name,
//! line number and offending text.

use std::path::Path;

use glob::glob;
use tracing::{debug, info};

use rudder_utils::{Result, RudderError};

use crate::registry::ConfigRegistry;
use crate::tokenize::split_args;

/// Load a configuration file into the registry. `path` may be `None`
/// when only `extra` directives are given.
pub fn load_config(
    registry: &mut ConfigRegistry,
    path: Option<&Path>,
    extra: &str,
) -> Result<()> {
    if let Some(path) = path {
        let content = std::fs::read_to_string(path).map_err(|e| RudderError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        load_config_string(registry, &content, &path.display().to_string())?;
        info!(path = %path.display(), "configuration file loaded");
    }
    if !extra.is_empty() {
        load_config_string(registry, extra, "(command line)")?;
    }
    Ok(())
}

/// Apply configuration directives from a string, one per line.
pub fn load_config_string(registry: &mut ConfigRegistry, content: &str, source: &str) -> Result<()> {
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim_matches([' ', '\t', '\r', '\n']);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fail = |reason: String| RudderError::Load {
            file: source.to_string(),
            line: idx + 1,
            text: line.to_string(),
            reason,
        };

        let Some(args) = split_args(line).filter(|a| !a.is_empty()) else {
            return Err(fail("Unbalanced quotes in configuration line".into()));
        };
        let keyword = args[0].to_ascii_lowercase();
        let argv: Vec<&str> = args[1..].iter().map(String::as_str).collect();

        if keyword == "include" {
            if argv.len() != 1 {
                return Err(fail("wrong number of arguments".into()));
            }
            include_file(registry, argv[0]).map_err(|e| fail(e.to_string()))?;
            continue;
        }

        let Some(desc) = registry.lookup_mut(&keyword) else {
            return Err(fail("Bad directive or wrong number of arguments".into()));
        };

        if !desc.is_multi_arg() && argv.len() != 1 {
            return Err(fail("wrong number of arguments".into()));
        }

        debug!(parameter = %desc.name(), "applying directive");
        desc.type_iface_mut()
            .set(&argv)
            .map_err(|reason| fail(reason))?;
    }
    Ok(())
}

/// Process an `include` directive. A pattern containing glob
/// metacharacters expands to every match, in sorted order, and zero
/// matches is not an error. A plain path must exist.
fn include_file(registry: &mut ConfigRegistry, pattern: &str) -> Result<()> {
    let has_meta = pattern.contains(['*', '?', '[']);
    if !has_meta {
        return load_config(registry, Some(Path::new(pattern)), "");
    }
    let paths = glob(pattern)
        .map_err(|e| RudderError::parse(format!("invalid include pattern: {}", e)))?;
    for entry in paths {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            RudderError::FileRead {
                path,
                source: e.into(),
            }
        })?;
        load_config(registry, Some(&path), "")?;
    }
    Ok(())
}
