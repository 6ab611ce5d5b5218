//! Synchronization between packaging metadata and constraint files.
//!
//! The lower bounds declared in packaging metadata and the pins in the
//! constraint files describe the same thing twice, and nothing in the
//! packaging toolchain keeps them aligned. `check_lower_bounds` makes that
//! human responsibility mechanical: a declaration of `sqlalchemy >= 1.4.16`
//! requires a `sqlalchemy==1.4.16` pin in every applicable file, no more and
//! no less.

use anyhow::{anyhow, Result as AnyResult};
use colored::Colorize;
use std::fmt;
use tracing::debug;

use crate::constraints::{ConstraintFile, PackageName, RuntimeVersion};
use crate::version::Specifier;

/// A dependency as declared in the project's packaging metadata, e.g.
/// `sqlalchemy >= 1.4.16, < 2.0.0dev`.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: PackageName,
    pub specifier: Specifier,
    /// Backport-style environment gate: the declaration only applies to
    /// runtimes strictly below this version.
    pub only_below: Option<RuntimeVersion>,
}

impl Declaration {
    pub fn new(name: PackageName, specifier: Specifier) -> Self {
        Declaration {
            name,
            specifier,
            only_below: None,
        }
    }

    /// Parse a declaration like `sqlalchemy >= 1.4.16, < 2.0.0dev`. The
    /// name ends at the first operator character.
    pub fn parse(input: &str) -> AnyResult<Self> {
        let trimmed = input.trim();
        let split_at = trimmed
            .find(|c: char| matches!(c, '=' | '>' | '<' | '~' | '!'))
            .ok_or_else(|| anyhow!("declaration '{input}' has no version specifier"))?;
        let (name_str, spec_str) = trimmed.split_at(split_at);
        let name = PackageName::parse(name_str)?;
        let specifier = Specifier::parse(spec_str)?;
        Ok(Declaration::new(name, specifier))
    }

    /// Restrict this declaration to runtimes below the given version.
    pub fn only_below(mut self, runtime: RuntimeVersion) -> Self {
        self.only_below = Some(runtime);
        self
    }

    fn applies_to(&self, target: RuntimeVersion) -> bool {
        match self.only_below {
            Some(ceiling) => target < ceiling,
            None => true,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.specifier)
    }
}

/// One way a constraint file can disagree with the declared lower bounds.
#[derive(Debug, Clone)]
pub enum SyncError {
    /// A declared dependency has no pin in the file.
    MissingPin { package: String, expected: String },
    /// The pin exists but does not equal the declared lower bound.
    VersionDrift {
        package: String,
        pinned: String,
        declared: String,
    },
    /// The file pins a package no applicable declaration mentions.
    UnknownPin { package: String, pinned: String },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPin { package, expected } => {
                write!(
                    f,
                    "{} missing pin: {} (expected {}=={})",
                    "✗".red().bold(),
                    package.yellow(),
                    package,
                    expected.green()
                )
            }
            Self::VersionDrift {
                package,
                pinned,
                declared,
            } => {
                write!(
                    f,
                    "{} {} pinned at {} but the declared lower bound is {}",
                    "✗".red().bold(),
                    package.yellow(),
                    pinned.red(),
                    declared.green()
                )
            }
            Self::UnknownPin { package, pinned } => {
                write!(
                    f,
                    "{} {} pinned at {} but no declaration mentions it",
                    "✗".red().bold(),
                    package.yellow(),
                    pinned
                )
            }
        }
    }
}

/// Check one constraint file against the declared dependencies.
///
/// Every declaration applicable to the file's target runtime must be pinned
/// at exactly its lower bound, and every pin must trace back to a
/// declaration. Returns all disagreements at once rather than stopping at
/// the first.
pub fn check_lower_bounds(
    declarations: &[Declaration],
    file: &ConstraintFile,
) -> Result<(), Vec<SyncError>> {
    let mut errors = Vec::new();
    let target = file.target();

    for declaration in declarations {
        if !declaration.applies_to(target) {
            continue;
        }
        let expected = declaration.specifier.lower_bound();
        match file.get(declaration.name.as_str()) {
            None => errors.push(SyncError::MissingPin {
                package: declaration.name.to_string(),
                expected: expected.to_string(),
            }),
            Some(entry) => {
                if entry.version != *expected {
                    errors.push(SyncError::VersionDrift {
                        package: declaration.name.to_string(),
                        pinned: entry.version.to_string(),
                        declared: expected.to_string(),
                    });
                }
            }
        }
    }

    for entry in file.iter() {
        let declared = declarations
            .iter()
            .any(|d| d.applies_to(target) && d.name == entry.name);
        if !declared {
            errors.push(SyncError::UnknownPin {
                package: entry.name.to_string(),
                pinned: entry.version.to_string(),
            });
        }
    }

    debug!(
        target_runtime = %target,
        declarations = declarations.len(),
        pins = file.len(),
        errors = errors.len(),
        "Lower-bound synchronization check completed"
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintFile;

    fn decl(s: &str) -> Declaration {
        Declaration::parse(s).unwrap()
    }

    fn file(target: RuntimeVersion, text: &str) -> ConstraintFile {
        ConstraintFile::parse(target, text).unwrap()
    }

    #[test]
    fn test_parse_declaration() {
        let d = decl("sqlalchemy >= 1.4.16, < 2.0.0dev");
        assert_eq!(d.name.as_str(), "sqlalchemy");
        assert_eq!(d.specifier.lower_bound().to_string(), "1.4.16");
    }

    #[test]
    fn test_parse_declaration_without_spaces() {
        let d = decl("grpcio>=1.47.0");
        assert_eq!(d.name.as_str(), "grpcio");
        assert_eq!(d.specifier.to_string(), ">=1.47.0");
    }

    #[test]
    fn test_parse_rejects_bare_name() {
        assert!(Declaration::parse("sqlalchemy").is_err());
    }

    #[test]
    fn test_in_sync() {
        let declarations = vec![decl("sqlalchemy >= 1.4.16, < 2.0.0dev")];
        let f = file(RuntimeVersion::new(3, 7), "sqlalchemy==1.4.16\n");
        assert!(check_lower_bounds(&declarations, &f).is_ok());
    }

    #[test]
    fn test_missing_pin() {
        let declarations = vec![decl("sqlalchemy >= 1.4.16"), decl("grpcio >= 1.47.0")];
        let f = file(RuntimeVersion::new(3, 7), "sqlalchemy==1.4.16\n");
        let errors = check_lower_bounds(&declarations, &f).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], SyncError::MissingPin { package, .. } if package == "grpcio"));
    }

    #[test]
    fn test_version_drift() {
        let declarations = vec![decl("sqlalchemy >= 1.4.16")];
        let f = file(RuntimeVersion::new(3, 7), "sqlalchemy==1.4.20\n");
        let errors = check_lower_bounds(&declarations, &f).unwrap_err();
        match &errors[0] {
            SyncError::VersionDrift {
                pinned, declared, ..
            } => {
                assert_eq!(pinned, "1.4.20");
                assert_eq!(declared, "1.4.16");
            }
            other => panic!("expected VersionDrift, got: {other}"),
        }
    }

    #[test]
    fn test_unknown_pin() {
        let declarations = vec![decl("sqlalchemy >= 1.4.16")];
        let f = file(
            RuntimeVersion::new(3, 7),
            "sqlalchemy==1.4.16\nleft-over==9.9.9\n",
        );
        let errors = check_lower_bounds(&declarations, &f).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(
            matches!(&errors[0], SyncError::UnknownPin { package, .. } if package == "left-over")
        );
    }

    #[test]
    fn test_backport_gate() {
        let declarations = vec![
            decl("sqlalchemy >= 1.4.16"),
            decl("dataclasses >= 0.6").only_below(RuntimeVersion::new(3, 7)),
        ];

        // On 3.6 the backport must be pinned.
        let old = file(RuntimeVersion::new(3, 6), "sqlalchemy==1.4.16\n");
        let errors = check_lower_bounds(&declarations, &old).unwrap_err();
        assert!(
            matches!(&errors[0], SyncError::MissingPin { package, .. } if package == "dataclasses")
        );

        // On 3.7 pinning it is the error.
        let new = file(
            RuntimeVersion::new(3, 7),
            "sqlalchemy==1.4.16\ndataclasses==0.6\n",
        );
        let errors = check_lower_bounds(&declarations, &new).unwrap_err();
        assert!(
            matches!(&errors[0], SyncError::UnknownPin { package, .. } if package == "dataclasses")
        );
    }

    #[test]
    fn test_all_errors_reported_together() {
        let declarations = vec![decl("aaa >= 1.0.0"), decl("bbb >= 2.0.0")];
        let f = file(RuntimeVersion::new(3, 7), "bbb==2.1.0\nccc==3.0.0\n");
        let errors = check_lower_bounds(&declarations, &f).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_drift_ignores_trailing_zero_spelling() {
        // 1.4 and 1.4.0 name the same release; spelling is not drift.
        let declarations = vec![decl("legacy >= 1.4")];
        let f = file(RuntimeVersion::new(3, 7), "legacy==1.4.0\n");
        assert!(check_lower_bounds(&declarations, &f).is_ok());
    }
}
