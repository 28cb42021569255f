// Public modules
pub mod descriptor;
pub mod error;
pub mod local_files;
pub mod rules;
pub mod scaffold;
pub mod templates;

// Public modules for CLI access
pub mod defaults;
pub mod paths;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
