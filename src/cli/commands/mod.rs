//! CLI command implementations

pub mod check;
pub mod completions;
pub mod config;
pub mod lookup;
pub mod questions;
pub mod register;
