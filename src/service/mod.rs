//! External collaborators - registration API and entity lookups
//!
//! The wizard only sees the two traits below; the HTTP client and the
//! in-memory backend are interchangeable implementations injected by the
//! caller.

pub mod http;
pub mod simulated;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;

use crate::core::entity::{EntityKind, SelectedEntity};
use crate::wizard::mapper::{MapError, RegistrationPayload};

pub use http::HttpClient;
pub use simulated::SimulatedBackend;

/// Field name -> error messages, as returned by the registration API
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Message shown when the service cannot be reached
pub const CONNECTION_ERROR: &str = "Error de conexión con el servidor";

/// Confirmation returned by a successful registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationReceipt {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
}

/// A failed registration attempt; always retryable from the wizard
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct SubmissionFailure {
    pub message: String,
    /// HTTP status, when the service answered
    pub status: Option<u16>,
    pub field_errors: FieldErrors,
}

impl SubmissionFailure {
    pub fn new(message: impl Into<String>, status: Option<u16>, field_errors: FieldErrors) -> Self {
        Self {
            message: message.into(),
            status,
            field_errors,
        }
    }

    /// The service could not be reached
    pub fn connection() -> Self {
        let mut field_errors = FieldErrors::new();
        field_errors.insert(
            "network".to_string(),
            vec!["No se pudo conectar con el servidor".to_string()],
        );
        Self::new(CONNECTION_ERROR, None, field_errors)
    }

    /// Errors reported for one field
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.field_errors
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl From<MapError> for SubmissionFailure {
    fn from(err: MapError) -> Self {
        let mut field_errors = FieldErrors::new();
        field_errors.insert(err.field().to_string(), vec![err.to_string()]);
        Self::new(err.to_string(), None, field_errors)
    }
}

/// Persists registrations
pub trait RegistrationService {
    fn submit(&self, payload: &RegistrationPayload) -> Result<RegistrationReceipt, SubmissionFailure>;
}

/// Searches and creates entities for searchable-select questions
///
/// Lookups never fail hard: implementations log the problem and return an
/// empty list or `None`.
pub trait EntityDirectory {
    fn search(&self, kind: EntityKind, query: &str) -> Vec<SelectedEntity>;

    fn create(&self, kind: EntityKind, name: &str, initial: Option<&str>) -> Option<SelectedEntity>;
}

impl<T: RegistrationService + ?Sized> RegistrationService for Rc<T> {
    fn submit(&self, payload: &RegistrationPayload) -> Result<RegistrationReceipt, SubmissionFailure> {
        (**self).submit(payload)
    }
}

impl<T: EntityDirectory + ?Sized> EntityDirectory for Rc<T> {
    fn search(&self, kind: EntityKind, query: &str) -> Vec<SelectedEntity> {
        (**self).search(kind, query)
    }

    fn create(&self, kind: EntityKind, name: &str, initial: Option<&str>) -> Option<SelectedEntity> {
        (**self).create(kind, name, initial)
    }
}

/// Envelope shared by every API response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<FieldErrors>,
}
