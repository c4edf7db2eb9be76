//! Core library components.
//!
//! The secret pipeline: resolve a secret, map its keys onto target names,
//! and materialize the result into template files or cluster objects.

pub mod cluster;
pub mod config;
pub mod constants;
pub mod driver;
pub mod mapper;
pub mod report;
pub mod secrets;
pub mod store;
pub mod template;
pub mod types;
pub mod value;
