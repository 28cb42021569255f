//! Input validation primitives.

use std::path::{Component, Path};

use crate::error::{Error, Result};

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None, None))
    } else {
        Ok(trimmed)
    }
}

/// Require a non-empty value that names exactly one directory entry.
///
/// Separators, `.`, `..` and absolute or prefixed paths are rejected, so the
/// value can be joined onto a base path without leaving it.
pub fn require_dir_name<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let name = require_non_empty(value, field, "Cannot be empty")?;

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(name),
        _ => Err(Error::validation_invalid_argument(
            field,
            "Must be a single directory name",
            Some(name.to_string()),
            None,
        )),
    }
}
