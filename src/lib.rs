//! hackreg: conditional registration wizard
//!
//! A step-by-step registration flow for hackathon participants and
//! sponsors. Questions may be shown conditionally on earlier answers,
//! every step is validated before moving on, and the collected answers are
//! mapped into the registration API's request schema.

pub mod cli;
pub mod core;
pub mod schema;
pub mod service;
pub mod wizard;
