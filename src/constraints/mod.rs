pub mod discovery;
pub mod entry;
pub mod file;

pub use discovery::{discover_constraint_files, RuntimeVersion};
pub use entry::{ConstraintEntry, PackageName};
pub use file::ConstraintFile;
