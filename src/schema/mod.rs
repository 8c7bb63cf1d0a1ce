//! Schema system - payload contract checks and confirmation templates

pub mod preflight;
pub mod registry;
pub mod template;

pub use preflight::{Preflight, PreflightError};
pub use registry::SchemaRegistry;
pub use template::{ConfirmationContext, ConfirmationRenderer, TemplateError};
