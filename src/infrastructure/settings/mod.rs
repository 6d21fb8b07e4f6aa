//! Settings stores backing the feature configuration.
//!
//! - [`EnvSettings`] - Environment variables with in-process overrides
//! - [`MemorySettings`] - Plain in-memory map for tests and embedding

mod env_settings;
mod memory_settings;

pub use env_settings::{EnvSettings, env_var_name};
pub use memory_settings::MemorySettings;
