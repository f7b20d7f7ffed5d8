//! Schema module - Configuration and seeding types for automaton runs.

mod config;
mod seed;

pub use config::*;
pub use seed::*;
