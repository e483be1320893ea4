pub mod artifact;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod compare;
pub mod config;
pub mod dataset;
pub mod error;
pub mod harness;
pub mod output;
pub mod recorder;
pub mod source;
pub mod store;
pub mod tracker;
pub mod transport;

pub use error::{Result, SnapcheckError};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_CHECK_FAILED: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
