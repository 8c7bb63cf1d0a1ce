//! HTTP client for the registration API

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::core::config::Config;
use crate::core::entity::{EntityKind, SelectedEntity};
use crate::service::{
    ApiEnvelope, EntityDirectory, RegistrationReceipt, RegistrationService, SubmissionFailure,
};
use crate::wizard::mapper::RegistrationPayload;

/// Blocking client for `POST /hacker`, `POST /sponsor` and the lookup endpoints
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct CreateEducationRequest<'a> {
    name: &'a str,
    initial: &'a str,
}

impl HttpClient {
    /// Build a client for the given base URL (e.g. `https://host/api`)
    pub fn new(base_url: impl Into<String>, timeout: Option<std::time::Duration>) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        Self::new(config.api_url(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Decode a lookup response, treating any problem as "no data"
    fn lookup_data<T: DeserializeOwned>(response: reqwest::Result<Response>, what: &str) -> Option<T> {
        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!("{} request failed: {}", what, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("{} request returned HTTP {}", what, status);
            return None;
        }

        match response.json::<ApiEnvelope<T>>() {
            Ok(envelope) if envelope.success => envelope.data,
            Ok(envelope) => {
                warn!("{} request unsuccessful: {}", what, envelope.message);
                None
            }
            Err(e) => {
                warn!("{} response could not be parsed: {}", what, e);
                None
            }
        }
    }

    fn list_teams(&self) -> Vec<SelectedEntity> {
        let response = self.client.get(self.url("team/")).send();
        Self::lookup_data(response, "team").unwrap_or_default()
    }
}

impl RegistrationService for HttpClient {
    #[instrument(skip_all, fields(kind = %payload.kind()))]
    fn submit(&self, payload: &RegistrationPayload) -> Result<RegistrationReceipt, SubmissionFailure> {
        let url = self.url(payload.kind().as_str());
        debug!("POST {}", url);

        let response = self.client.post(&url).json(payload).send().map_err(|e| {
            warn!("registration request failed: {}", e);
            SubmissionFailure::connection()
        })?;

        let status = response.status();
        let envelope = response.json::<ApiEnvelope<RegistrationReceipt>>().ok();

        match (status, envelope) {
            (status, Some(env)) if status.is_success() && env.success => {
                env.data.ok_or_else(|| {
                    SubmissionFailure::new("Respuesta sin datos de registro", Some(status.as_u16()), Default::default())
                })
            }
            (status, Some(env)) => Err(SubmissionFailure::new(
                non_empty_or(env.message, status),
                Some(status.as_u16()),
                env.errors.unwrap_or_default(),
            )),
            (status, None) => Err(SubmissionFailure::new(
                non_empty_or(String::new(), status),
                Some(status.as_u16()),
                Default::default(),
            )),
        }
    }
}

impl EntityDirectory for HttpClient {
    #[instrument(skip(self))]
    fn search(&self, kind: EntityKind, query: &str) -> Vec<SelectedEntity> {
        match kind {
            // the team endpoint has no search parameter
            EntityKind::Team => {
                let needle = query.trim().to_lowercase();
                self.list_teams()
                    .into_iter()
                    .filter(|t| needle.is_empty() || t.display_name.to_lowercase().contains(&needle))
                    .collect()
            }
            _ => {
                let response = self
                    .client
                    .get(self.url(&format!("{}/", kind.endpoint())))
                    .query(&[("search", query)])
                    .send();
                Self::lookup_data(response, kind.endpoint()).unwrap_or_default()
            }
        }
    }

    #[instrument(skip(self))]
    fn create(&self, kind: EntityKind, name: &str, initial: Option<&str>) -> Option<SelectedEntity> {
        if !kind.is_creatable() {
            warn!("{} entries cannot be created", kind);
            return None;
        }

        let response = self
            .client
            .post(self.url(&format!("{}/", kind.endpoint())))
            .json(&CreateEducationRequest {
                name,
                initial: initial.unwrap_or(""),
            })
            .send();
        Self::lookup_data(response, kind.endpoint())
    }
}

fn non_empty_or(message: String, status: StatusCode) -> String {
    if message.trim().is_empty() {
        format!("El servidor respondió con HTTP {}", status.as_u16())
    } else {
        message
    }
}
