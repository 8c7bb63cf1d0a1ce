//! Contract checks for registration payloads
//!
//! The registration API validates every request against its own rules
//! before storing anything. The embedded schemas mirror those rules so a
//! payload can be checked locally, and violations are reported in the same
//! `field -> [messages]` shape the API uses.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::Diagnostic;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use thiserror::Error;

use crate::core::question::FormKind;
use crate::schema::registry::SchemaRegistry;
use crate::service::FieldErrors;
use crate::wizard::mapper::RegistrationPayload;

/// A payload the registration API would refuse
#[derive(Debug, Error, Diagnostic)]
#[error("Datos de entrada inválidos ({kind}): {summary}")]
#[diagnostic(code(hackreg::schema::preflight))]
pub struct PreflightError {
    pub kind: FormKind,
    summary: String,
    pub field_errors: FieldErrors,
    #[help]
    help: Option<String>,
}

impl PreflightError {
    fn new(kind: FormKind, field_errors: FieldErrors) -> Self {
        let fields: Vec<&str> = field_errors.keys().map(String::as_str).collect();
        let summary = match fields.len() {
            1 => "1 campo con errores".to_string(),
            n => format!("{} campos con errores", n),
        };
        let help = Some(format!("Revisa: {}", fields.join(", ")));
        Self {
            kind,
            summary,
            field_errors,
            help,
        }
    }
}

/// Compiled payload schemas
pub struct Preflight {
    compiled: HashMap<FormKind, JsonValidator>,
}

impl Preflight {
    pub fn new(registry: &SchemaRegistry) -> Self {
        let mut compiled = HashMap::new();

        for kind in [FormKind::Hacker, FormKind::Sponsor] {
            let Some(text) = registry.get(kind) else {
                continue;
            };
            match serde_json::from_str::<JsonValue>(text).map(|json| validator_for(&json)) {
                Ok(Ok(validator)) => {
                    compiled.insert(kind, validator);
                }
                Ok(Err(e)) => tracing::warn!("Schema for {} does not compile: {}", kind, e),
                Err(e) => tracing::warn!("Schema for {} is not valid JSON: {}", kind, e),
            }
        }

        Self { compiled }
    }

    /// Check a payload against its form's schema
    pub fn check(&self, payload: &RegistrationPayload) -> Result<(), PreflightError> {
        let kind = payload.kind();
        let value = match serde_json::to_value(payload) {
            Ok(v) => v,
            Err(e) => {
                let mut errors = FieldErrors::new();
                errors.insert("payload".to_string(), vec![e.to_string()]);
                return Err(PreflightError::new(kind, errors));
            }
        };

        let errors = self.field_errors(kind, &value);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PreflightError::new(kind, errors))
        }
    }

    /// Every violation, grouped by field
    pub fn field_errors(&self, kind: FormKind, value: &JsonValue) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let Some(schema) = self.compiled.get(&kind) else {
            // no schema means nothing to enforce
            return errors;
        };

        for error in schema.iter_errors(value) {
            errors
                .entry(field_name(&error))
                .or_default()
                .push(format_violation(&error));
        }
        errors
    }
}

impl Default for Preflight {
    fn default() -> Self {
        Self::new(&SchemaRegistry::default())
    }
}

/// Top-level field a violation belongs to
fn field_name(error: &JsonSchemaError) -> String {
    let path = error.instance_path.as_str().trim_start_matches('/');
    if path.is_empty() {
        if let ValidationErrorKind::Required { property } = &error.kind {
            return property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
        }
        return "payload".to_string();
    }
    path.split('/').next().unwrap_or(path).to_string()
}

fn format_violation(error: &JsonSchemaError) -> String {
    match &error.kind {
        ValidationErrorKind::Required { .. } => "Campo requerido".to_string(),
        ValidationErrorKind::MinLength { limit } => {
            format!("Debe tener al menos {} caracteres", limit)
        }
        ValidationErrorKind::MaxLength { limit } => {
            format!("No puede exceder {} caracteres", limit)
        }
        ValidationErrorKind::Pattern { .. } => "Formato inválido".to_string(),
        ValidationErrorKind::Enum { options } => {
            format!("Valor inválido; opciones: {}", format_enum_options(options))
        }
        ValidationErrorKind::Type { kind } => format!("Tipo inválido: se esperaba {:?}", kind),
        _ => error.to_string(),
    }
}

fn format_enum_options(options: &JsonValue) -> String {
    match options.as_array() {
        Some(arr) => arr
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        None => options.to_string(),
    }
}
