pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `packsmith::scaffold` instead of `packsmith::core::scaffold`
pub use self::core::*;
pub use self::utils::*;
