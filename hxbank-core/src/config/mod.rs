//! Configuration types
//!
//! Board-agnostic bank configuration, optionally loaded from TOML.

pub mod bank;
pub mod gain;

pub use bank::*;
pub use gain::*;
