//! Structure-preserving configuration rewrite
//!
//! Rewriting reads the existing file into a line arena, replaces the
//! lines of parameters it knows about in place, appends new directives
//! under a generated-content marker, blanks leftover lines, and then
//! replaces the file atomically via a temp file and rename. Comments,
//! blank lines and unknown directives survive untouched.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use rudder_utils::{Result, RudderError};

use crate::registry::ConfigRegistry;
use crate::tokenize::split_args;

/// Marker comment inserted before directives appended at the tail.
pub const REWRITE_SIGNATURE: &str = "# Generated by CONFIG REWRITE";

/// Working state of one rewrite pass over a configuration file.
pub struct RewriteState {
    lines: Vec<String>,
    // Canonical option name to the line numbers still reusable for it,
    // oldest first.
    option_to_line: HashMap<String, VecDeque<usize>>,
    processed: HashSet<String>,
    needs_signature: bool,
    force_write: bool,
}

impl RewriteState {
    fn empty() -> Self {
        Self {
            lines: Vec::new(),
            option_to_line: HashMap::new(),
            processed: HashSet::new(),
            needs_signature: true,
            force_write: false,
        }
    }

    /// Read the old file, recording which line belongs to which known
    /// parameter. A missing file yields an empty state.
    pub fn from_file(path: &Path, registry: &ConfigRegistry) -> Result<Self> {
        let mut state = Self::empty();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(state),
            Err(e) => {
                return Err(RudderError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        for raw in content.lines() {
            let line = raw.trim_matches([' ', '\t', '\r', '\n']);

            if line.is_empty() || line.starts_with('#') {
                if state.needs_signature && line == REWRITE_SIGNATURE {
                    state.needs_signature = false;
                }
                state.lines.push(line.to_string());
                continue;
            }

            let Some(args) = split_args(line).filter(|a| !a.is_empty()) else {
                // Unparsable directive lines are kept, disarmed.
                state.lines.push(format!("# ??? {}", line));
                continue;
            };

            let keyword = args[0].to_ascii_lowercase();
            let linenum = state.lines.len();
            state.lines.push(line.to_string());

            // Index under the canonical name so legacy alias spellings
            // fold onto the same slot.
            if let Some(desc) = registry.lookup(&keyword) {
                state
                    .option_to_line
                    .entry(desc.name().to_string())
                    .or_default()
                    .push_back(linenum);
            }
        }
        Ok(state)
    }

    /// Place one directive: reuse the oldest leftover line for this
    /// option, or append. Without `force` and without an old line the
    /// directive is omitted (the value is at its default).
    pub fn rewrite_line(&mut self, option: &str, line: String, force: bool) {
        self.mark_processed(option);

        let has_old = self
            .option_to_line
            .get(option)
            .is_some_and(|q| !q.is_empty());
        if !has_old && !force && !self.force_write {
            return;
        }

        if has_old {
            let queue = self.option_to_line.get_mut(option).unwrap();
            let linenum = queue.pop_front().unwrap();
            if queue.is_empty() {
                self.option_to_line.remove(option);
            }
            self.lines[linenum] = line;
        } else {
            if self.needs_signature {
                self.lines.push(REWRITE_SIGNATURE.to_string());
                self.needs_signature = false;
            }
            self.lines.push(line);
        }
    }

    /// Record that `option` was handled even though no line was
    /// emitted, so its leftover lines get blanked.
    pub fn mark_processed(&mut self, option: &str) {
        self.processed.insert(option.to_string());
    }

    /// Blank leftover lines of processed options. Lines of options
    /// that were never rewritten stay untouched.
    fn remove_orphaned(&mut self) {
        let orphaned: Vec<String> = self
            .option_to_line
            .keys()
            .filter(|option| self.processed.contains(*option))
            .cloned()
            .collect();
        for option in orphaned {
            if let Some(queue) = self.option_to_line.remove(&option) {
                debug!(option = %option, leftover = queue.len(), "blanking orphaned lines");
                for linenum in queue {
                    self.lines[linenum].clear();
                }
            }
        }
    }

    /// Render the final file content. Runs of blank lines collapse to
    /// a single blank line.
    fn into_content(self) -> String {
        let mut content = String::new();
        let mut was_empty = false;
        for line in &self.lines {
            if line.is_empty() {
                if was_empty {
                    continue;
                }
                was_empty = true;
            } else {
                was_empty = false;
            }
            content.push_str(line);
            content.push('\n');
        }
        content
    }
}

/// Rewrite the configuration file at `path` from the registry's
/// current values, preserving file structure.
pub fn rewrite_config(registry: &ConfigRegistry, path: &Path) -> Result<()> {
    rewrite_config_force(registry, path, false)
}

/// Like [`rewrite_config`], but with `force_write` every parameter is
/// written out even when its value equals the default. Diagnostic and
/// testing mode.
pub fn rewrite_config_force(
    registry: &ConfigRegistry,
    path: &Path,
    force_write: bool,
) -> Result<()> {
    let mut state = RewriteState::from_file(path, registry)?;
    state.force_write = force_write;
    for desc in registry.iter() {
        desc.type_iface().rewrite(desc.name(), &mut state);
    }
    state.remove_orphaned();
    let content = state.into_content();
    overwrite_file(path, &content)
}

/// Render the Debug-flagged parameters, defaults included, without
/// touching any file. Used for diagnostics.
pub fn debug_dump(registry: &ConfigRegistry) -> String {
    let mut state = RewriteState::empty();
    state.force_write = true;
    state.needs_signature = false;
    for desc in registry.iter() {
        if !desc.is_debug() {
            continue;
        }
        desc.type_iface().rewrite(desc.name(), &mut state);
    }
    state.into_content()
}

/// Replace `path` with `content` through a same-directory temp file
/// and an atomic rename.
fn overwrite_file(path: &Path, content: &str) -> Result<()> {
    let write_err = |source: std::io::Error| RudderError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let (tmp_path, mut file) = create_temp(path).map_err(write_err)?;

    let result = (|| -> std::io::Result<()> {
        file.write_all(content.as_bytes())?;
        if let Err(e) = file.sync_all() {
            warn!(path = %tmp_path.display(), error = %e, "fsync of rewritten config failed");
        }
        Ok(())
    })();
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }
    drop(file);

    // World-readable minus the process umask, like a freshly created
    // config file would be.
    let mask = unsafe {
        let mask = libc::umask(0);
        libc::umask(mask);
        mask
    };
    let mode = 0o644 & !(mask as u32);
    if let Err(e) = fs::set_permissions(&tmp_path, fs::Permissions::from_mode(mode)) {
        warn!(path = %tmp_path.display(), error = %e, "chmod of rewritten config failed");
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }
    debug!(path = %path.display(), bytes = content.len(), "config file rewritten");
    Ok(())
}

fn create_temp(path: &Path) -> std::io::Result<(PathBuf, fs::File)> {
    for _ in 0..16 {
        let candidate = path.with_extension(format!("tmp-{:016x}", fastrand::u64(..)));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        "could not create temp file for config rewrite",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ParamDescriptor;
    use crate::types::BoolParam;

    fn one_bool_registry(name: &str, value: bool) -> ConfigRegistry {
        let mut reg = ConfigRegistry::new();
        let mut param = BoolParam::new(false);
        if value {
            use crate::types::TypeInterface;
            param.set(&["yes"]).unwrap();
        }
        reg.register(ParamDescriptor::new(name, Box::new(param)))
            .unwrap();
        reg
    }

    #[test]
    fn test_missing_file_yields_empty_state() {
        let reg = ConfigRegistry::new();
        let state = RewriteState::from_file(Path::new("/nonexistent/rudder.conf"), &reg).unwrap();
        assert!(state.lines.is_empty());
        assert!(state.needs_signature);
    }

    #[test]
    fn test_append_adds_signature_once() {
        let mut state = RewriteState::empty();
        state.rewrite_line("appendonly", "appendonly yes".into(), true);
        state.rewrite_line("maxmemory", "maxmemory 100mb".into(), true);
        let content = state.into_content();
        assert_eq!(content.matches(REWRITE_SIGNATURE).count(), 1);
        assert!(content.ends_with("appendonly yes\nmaxmemory 100mb\n"));
    }

    #[test]
    fn test_default_without_old_line_is_omitted() {
        let mut state = RewriteState::empty();
        state.rewrite_line("appendonly", "appendonly no".into(), false);
        assert!(state.into_content().is_empty());
    }

    #[test]
    fn test_in_place_replacement_preserves_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rudder.conf");
        fs::write(&path, "# header\nappendonly no\n# footer\n").unwrap();

        let reg = one_bool_registry("appendonly", true);
        rewrite_config(&reg, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# header\nappendonly yes\n# footer\n");
    }

    #[test]
    fn test_unknown_directive_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rudder.conf");
        fs::write(&path, "some-future-option 42\nappendonly no\n").unwrap();

        let reg = one_bool_registry("appendonly", true);
        rewrite_config(&reg, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("some-future-option 42"));
        assert!(content.contains("appendonly yes"));
    }

    #[test]
    fn test_malformed_line_disarmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rudder.conf");
        fs::write(&path, "logfile \"unbalanced\n").unwrap();

        let reg = ConfigRegistry::new();
        rewrite_config(&reg, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# ??? logfile \"unbalanced"));
    }

    #[test]
    fn test_leftover_lines_blanked_and_collapsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rudder.conf");
        fs::write(
            &path,
            "appendonly no\nappendonly no\nappendonly no\n# end\n",
        )
        .unwrap();

        let reg = one_bool_registry("appendonly", true);
        rewrite_config(&reg, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "appendonly yes\n\n# end\n");
    }

    #[test]
    fn test_tuple_reuses_old_lines_in_order() {
        use crate::descriptor::ParamFlags;
        use crate::types::{TupleParam, TypeInterface};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rudder.conf");
        fs::write(
            &path,
            "save 900 1\nappendonly no\nsave 300 10\nsave 60 10000\n",
        )
        .unwrap();

        let mut reg = ConfigRegistry::new();
        let mut save = TupleParam::new(2, &[]);
        save.set(&["3600", "1", "300", "100"]).unwrap();
        reg.register(
            ParamDescriptor::new("save", Box::new(save)).with_flags(ParamFlags::MULTI_ARG),
        )
        .unwrap();
        reg.register(ParamDescriptor::new(
            "appendonly",
            Box::new(BoolParam::new(false)),
        ))
        .unwrap();

        rewrite_config(&reg, &path).unwrap();

        // Two new rows overwrite the first two old lines in file
        // order; the third old line is blanked.
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "save 3600 1\nappendonly no\nsave 300 100\n\n");
    }

    #[test]
    fn test_rewrite_absent_file_then_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rudder.conf");

        let reg = one_bool_registry("appendonly", true);
        rewrite_config(&reg, &path).unwrap();

        let mut reloaded = one_bool_registry("appendonly", false);
        crate::loader::load_config(&mut reloaded, Some(&path), "").unwrap();
        assert_eq!(reloaded.get_value("appendonly").unwrap(), "yes");
    }

    #[test]
    fn test_debug_dump_covers_debug_params_only() {
        use crate::descriptor::ParamFlags;

        let mut reg = one_bool_registry("appendonly", false);
        reg.register(
            ParamDescriptor::new("latency-tracking", Box::new(BoolParam::new(false)))
                .with_flags(ParamFlags::DEBUG),
        )
        .unwrap();

        // Defaults are forced out, but only for Debug parameters, and
        // without the generated-content marker.
        let dump = debug_dump(&reg);
        assert_eq!(dump, "latency-tracking no\n");
        assert!(!dump.contains(REWRITE_SIGNATURE));
    }

    #[test]
    fn test_debug_param_persisted_by_rewrite() {
        use crate::descriptor::ParamFlags;
        use crate::types::TypeInterface;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rudder.conf");
        fs::write(&path, "latency-tracking no\n").unwrap();

        let mut reg = ConfigRegistry::new();
        let mut param = BoolParam::new(false);
        param.set(&["yes"]).unwrap();
        reg.register(
            ParamDescriptor::new("latency-tracking", Box::new(param))
                .with_flags(ParamFlags::DEBUG),
        )
        .unwrap();

        rewrite_config(&reg, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "latency-tracking yes\n");
    }

    #[test]
    fn test_force_write_includes_default_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rudder.conf");

        let reg = one_bool_registry("appendonly", false);

        rewrite_config(&reg, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        rewrite_config_force(&reg, &path, true).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("appendonly no"));
    }
}
