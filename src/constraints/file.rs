use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::constraints::discovery::RuntimeVersion;
use crate::constraints::entry::ConstraintEntry;
use crate::error::{ConstraintError, Result};

/// A parsed constraint file: the full set of lower-bound pins for one
/// target runtime version.
///
/// Entries keep file order. The file never changes at runtime; it is edited
/// by hand whenever a declared lower bound moves, and this type exists so
/// that edit can be checked mechanically.
#[derive(Debug, Clone)]
pub struct ConstraintFile {
    target: RuntimeVersion,
    entries: Vec<ConstraintEntry>,
}

impl ConstraintFile {
    /// Parse constraint-file text for the given target runtime.
    ///
    /// Comment lines start with `#` (leading whitespace allowed) and blank
    /// lines are skipped. A trailing `# ...` on a data line is ignored.
    /// Each package may be pinned at most once; a second pin is an error
    /// naming both lines.
    pub fn parse(target: RuntimeVersion, text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = match raw_line.split_once('#') {
                Some((before, _)) => before.trim(),
                None => raw_line.trim(),
            };
            if line.is_empty() {
                continue;
            }

            let entry = ConstraintEntry::parse(line).map_err(|e| {
                ConstraintError::invalid_entry(line_number, raw_line.trim(), e.to_string())
            })?;

            if let Some(&first_line) = seen.get(entry.name.normalized()) {
                return Err(ConstraintError::duplicate_entry(
                    entry.name.as_str(),
                    first_line,
                    line_number,
                ));
            }
            seen.insert(entry.name.normalized().to_string(), line_number);
            entries.push(entry);
        }

        debug!(
            target_runtime = %target,
            entries = entries.len(),
            "Parsed constraint file"
        );

        Ok(ConstraintFile { target, entries })
    }

    /// Load a constraint file from disk, reading the target runtime from
    /// the `constraints-<major>.<minor>.txt` filename convention.
    pub fn load(path: &Path) -> Result<Self> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let target = RuntimeVersion::from_filename(&filename)
            .ok_or_else(|| ConstraintError::invalid_filename(&filename))?;

        let text = fs::read_to_string(path).map_err(|e| {
            ConstraintError::io_error(
                "read constraint file",
                Some(path.display().to_string()),
                e,
            )
        })?;

        Self::parse(target, &text)
    }

    pub fn target(&self) -> RuntimeVersion {
        self.target
    }

    pub fn entries(&self) -> &[ConstraintEntry] {
        &self.entries
    }

    /// Look up a pin by package name, matching on the normalized form.
    pub fn get(&self, name: &str) -> Option<&ConstraintEntry> {
        use crate::constraints::entry::PackageName;

        let wanted = PackageName::parse(name).ok()?;
        self.entries.iter().find(|e| e.name == wanted)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstraintEntry> {
        self.entries.iter()
    }
}

impl fmt::Display for ConstraintFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
