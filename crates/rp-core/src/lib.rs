//! # rp-core
//!
//! Shared foundation for the reelpress workspace: the unified [`Error`]
//! type every crate funnels its failures into, and the environment-sourced
//! configuration structs that are rebuilt at the start of each job.

pub mod config;
mod error;

pub use error::{Error, Result};
