use anyhow::{anyhow, bail, Result};
use std::fmt;

use crate::version::Version;

/// A package name as written in a constraint file or packaging metadata.
///
/// Names compare by their normalized form: packaging tools treat names
/// case-insensitively and consider runs of `-`, `_`, and `.` equivalent, so
/// `Google.Cloud_BigQuery` and `google-cloud-bigquery` pin the same package.
/// Display preserves the spelling as written.
#[derive(Debug, Clone)]
pub struct PackageName {
    raw: String,
    normalized: String,
}

impl PackageName {
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            bail!("package name is empty");
        }
        let valid_chars = raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid_chars {
            bail!("package name '{raw}' contains invalid characters");
        }
        let alnum = |c: char| c.is_ascii_alphanumeric();
        if !raw.starts_with(alnum) || !raw.ends_with(alnum) {
            bail!("package name '{raw}' must start and end with a letter or digit");
        }

        Ok(PackageName {
            raw: raw.to_string(),
            normalized: normalize(raw),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            pending_separator = true;
        } else {
            if pending_separator {
                out.push('-');
                pending_separator = false;
            }
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

impl PartialEq for PackageName {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for PackageName {}

impl std::hash::Hash for PackageName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// One data line of a constraint file: a package pinned to the exact lower
/// bound declared in packaging metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintEntry {
    pub name: PackageName,
    pub version: Version,
}

impl ConstraintEntry {
    pub fn new(name: PackageName, version: Version) -> Self {
        ConstraintEntry { name, version }
    }

    /// Parse a data line of the form `<name>==<version>`, tolerating
    /// whitespace around the operator. Only `==` is legal here; a constraint
    /// file that carries ranges is not pinning lower bounds.
    pub fn parse(line: &str) -> Result<Self> {
        let trimmed = line.trim();

        let (name_str, version_str) = trimmed
            .split_once("==")
            .ok_or_else(|| match offending_operator(trimmed) {
                Some(op) => anyhow!("operator '{op}' is not allowed, entries must pin with '=='"),
                None => anyhow!("expected '<name>==<version>'"),
            })?;

        if version_str.contains('=') || version_str.contains('<') || version_str.contains('>') {
            bail!("expected a single '==' operator");
        }

        let name = PackageName::parse(name_str)?;
        let version = Version::parse(version_str)?;
        Ok(ConstraintEntry { name, version })
    }
}

fn offending_operator(line: &str) -> Option<&'static str> {
    for op in ["~=", ">=", "<=", "!=", ">", "<"] {
        if line.contains(op) {
            return Some(op);
        }
    }
    None
}

impl fmt::Display for ConstraintEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.name, self.version)
    }
}
