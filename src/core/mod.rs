// Public modules
pub mod error;
pub mod mapping;
pub mod replace;
pub mod substitute;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use mapping::{Mapping, MappingPair};
pub use replace::{run, FileEdit, PathRename, ReplaceOptions, RunReport};
pub use substitute::Strategy;
