//! Lower-bound dependency constraint files.
//!
//! A project that declares `sqlalchemy >= 1.4.16` in its packaging metadata
//! is promising that the 1.4.16 floor actually works. The constraint files
//! under `testing/` pin every dependency to exactly that floor so a CI
//! harness can install them together and run the test suite against them.
//!
//! This crate models the constraint-file format those harnesses consume:
//! parsing, filename-convention discovery, and the synchronization check
//! between a file's pins and the lower bounds declared in packaging
//! metadata. It deliberately stops there. Nothing here resolves dependency
//! graphs, talks to a package index, or installs anything.

pub mod constraints;
pub mod error;
pub mod logging;
pub mod sync;
pub mod version;

pub use constraints::{
    discover_constraint_files, ConstraintEntry, ConstraintFile, PackageName, RuntimeVersion,
};
pub use error::{ConstraintError, Result};
pub use sync::{check_lower_bounds, Declaration, SyncError};
pub use version::{Specifier, Version};
