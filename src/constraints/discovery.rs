use anyhow::{anyhow, Result as AnyResult};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::constraints::file::ConstraintFile;
use crate::error::{ConstraintError, Result};

/// The interpreter version a constraint file targets, as encoded in the
/// `constraints-<major>.<minor>.txt` filename convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuntimeVersion {
    major: u32,
    minor: u32,
}

const FILENAME_PREFIX: &str = "constraints-";
const FILENAME_SUFFIX: &str = ".txt";

impl RuntimeVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        RuntimeVersion { major, minor }
    }

    /// Parse a `major.minor` string like `3.7`.
    pub fn parse(input: &str) -> AnyResult<Self> {
        let (major_str, minor_str) = input
            .trim()
            .split_once('.')
            .ok_or_else(|| anyhow!("runtime version '{input}' must be 'major.minor'"))?;
        let major = major_str
            .parse()
            .map_err(|_| anyhow!("runtime version '{input}' has non-numeric major part"))?;
        let minor = minor_str
            .parse()
            .map_err(|_| anyhow!("runtime version '{input}' has non-numeric minor part"))?;
        Ok(RuntimeVersion { major, minor })
    }

    /// Read the target runtime out of a constraint filename. Returns `None`
    /// for any filename outside the convention.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let stem = filename
            .strip_prefix(FILENAME_PREFIX)?
            .strip_suffix(FILENAME_SUFFIX)?;
        RuntimeVersion::parse(stem).ok()
    }

    /// The conventional filename for this target runtime.
    pub fn filename(&self) -> String {
        format!("{FILENAME_PREFIX}{self}{FILENAME_SUFFIX}")
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Scan a directory for constraint files by filename convention and load
/// each one, the way the external CI harness picks them up.
///
/// Files that do not match the convention are skipped; `.txt` files that
/// look close but fail it are logged so a typo in a filename does not
/// silently drop a runtime from coverage. Results are ordered by target
/// runtime.
pub fn discover_constraint_files(dir: &Path) -> Result<Vec<ConstraintFile>> {
    let read_dir = fs::read_dir(dir).map_err(|e| {
        ConstraintError::io_error(
            "scan constraints directory",
            Some(dir.display().to_string()),
            e,
        )
    })?;

    let mut files = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = dir_entry.map_err(|e| {
            ConstraintError::io_error(
                "scan constraints directory",
                Some(dir.display().to_string()),
                e,
            )
        })?;
        let filename = dir_entry.file_name().to_string_lossy().into_owned();

        if RuntimeVersion::from_filename(&filename).is_none() {
            if filename.starts_with(FILENAME_PREFIX) && filename.ends_with(FILENAME_SUFFIX) {
                warn!(filename = %filename, "Skipping file with malformed runtime version");
            }
            continue;
        }

        files.push(ConstraintFile::load(&dir_entry.path())?);
    }

    files.sort_by_key(|f| f.target());
    debug!(
        directory = %dir.display(),
        found = files.len(),
        "Constraint file discovery completed"
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runtime_version() {
        let rt = RuntimeVersion::parse("3.7").unwrap();
        assert_eq!(rt, RuntimeVersion::new(3, 7));
        assert_eq!(rt.to_string(), "3.7");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(RuntimeVersion::parse("3").is_err());
        assert!(RuntimeVersion::parse("3.x").is_err());
        assert!(RuntimeVersion::parse("three.seven").is_err());
        assert!(RuntimeVersion::parse("").is_err());
    }

    #[test]
    fn test_from_filename() {
        assert_eq!(
            RuntimeVersion::from_filename("constraints-3.6.txt"),
            Some(RuntimeVersion::new(3, 6))
        );
        assert_eq!(RuntimeVersion::from_filename("constraints-3.txt"), None);
        assert_eq!(RuntimeVersion::from_filename("requirements.txt"), None);
        assert_eq!(RuntimeVersion::from_filename("constraints-3.6"), None);
    }

    #[test]
    fn test_filename_round_trip() {
        let rt = RuntimeVersion::new(3, 10);
        assert_eq!(rt.filename(), "constraints-3.10.txt");
        assert_eq!(RuntimeVersion::from_filename(&rt.filename()), Some(rt));
    }

    #[test]
    fn test_ordering() {
        assert!(RuntimeVersion::new(3, 6) < RuntimeVersion::new(3, 7));
        assert!(RuntimeVersion::new(3, 9) < RuntimeVersion::new(3, 10));
    }
}
