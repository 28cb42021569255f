//! Generic utility primitives with zero domain knowledge.
//!
//! - `template` - `[[Token]]` rendering
//! - `validation` - Input validation helpers

pub mod template;
pub mod validation;
