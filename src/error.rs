use colored::Colorize;
use std::fmt;

#[derive(Debug)]
pub enum ConstraintError {
    InvalidEntry {
        line: usize,
        content: String,
        message: String,
    },
    DuplicateEntry {
        package: String,
        first_line: usize,
        duplicate_line: usize,
    },
    InvalidFilename {
        filename: String,
    },
    IoError {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
    },
    Other(anyhow::Error),
}

impl ConstraintError {
    pub fn invalid_entry(line: usize, content: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            line,
            content: content.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_entry(package: impl Into<String>, first_line: usize, duplicate_line: usize) -> Self {
        Self::DuplicateEntry {
            package: package.into(),
            first_line,
            duplicate_line,
        }
    }

    pub fn invalid_filename(filename: impl Into<String>) -> Self {
        Self::InvalidFilename {
            filename: filename.into(),
        }
    }

    pub fn io_error(operation: impl Into<String>, path: Option<String>, source: std::io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            path,
            source,
        }
    }
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEntry {
                line,
                content,
                message,
            } => {
                writeln!(f, "{} Invalid constraint on line {}", "✗".red().bold(), line)?;
                writeln!(f, "  {} {}", "→".blue(), content.yellow())?;
                writeln!(f, "  {} {}", "→".blue(), message)?;
                Ok(())
            }
            Self::DuplicateEntry {
                package,
                first_line,
                duplicate_line,
            } => {
                writeln!(
                    f,
                    "{} Duplicate constraint for: {}",
                    "✗".red().bold(),
                    package.yellow()
                )?;
                writeln!(f, "  {} First pinned on line {}", "→".blue(), first_line)?;
                writeln!(f, "  {} Pinned again on line {}", "→".blue(), duplicate_line)?;
                Ok(())
            }
            Self::InvalidFilename { filename } => {
                writeln!(
                    f,
                    "{} Not a constraint file: {}",
                    "✗".red().bold(),
                    filename.yellow()
                )?;
                writeln!(
                    f,
                    "  {} Expected the form {}",
                    "→".blue(),
                    "constraints-<major>.<minor>.txt".green()
                )?;
                Ok(())
            }
            Self::IoError {
                operation,
                path,
                source,
            } => {
                writeln!(
                    f,
                    "{} I/O error during: {}",
                    "✗".red().bold(),
                    operation.yellow()
                )?;
                if let Some(path) = path {
                    writeln!(f, "  {} Path: {}", "→".blue(), path)?;
                }
                writeln!(f, "  {} Error: {}", "→".blue(), source)?;
                Ok(())
            }
            Self::Other(err) => write!(f, "{} {}", "✗".red().bold(), err),
        }
    }
}

impl std::error::Error for ConstraintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            Self::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConstraintError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            operation: "unknown".to_string(),
            path: None,
            source: err,
        }
    }
}

impl From<anyhow::Error> for ConstraintError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}

pub type Result<T> = std::result::Result<T, ConstraintError>;
