//! In-memory registration backend
//!
//! Behaves like the registration API for offline use and tests: payloads
//! are checked against the embedded schemas, the team rules and the
//! duplicate-email rule are enforced, and lookups are served from a small
//! seeded catalogue. Clones share the same state.

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info};
use ulid::Ulid;

use crate::core::entity::{EntityKind, SelectedEntity};
use crate::schema::Preflight;
use crate::service::{
    EntityDirectory, FieldErrors, RegistrationReceipt, RegistrationService, SubmissionFailure,
};
use crate::wizard::mapper::{RegistrationPayload, TeamAssignment};

/// Emails the service treats as already registered
pub const RESERVED_EMAILS: &[&str] = &["test@example.com", "admin@hackcis.com"];

const EDUCATION: &[(&str, &str, &str)] = &[
    ("3f0c2a9e-6b1d-4c8e-9a27-5d4e1f6b8c01", "Universidad Nacional de Ingeniería", "UNI"),
    ("7a41d3c2-0e5f-4b6a-8d19-2c3b4a5e6f02", "Universidad Nacional Mayor de San Marcos", "UNMSM"),
    ("c95e7b14-2d3a-4f60-b8e1-9a0c1d2e3f03", "Pontificia Universidad Católica del Perú", "PUCP"),
    ("1d8b6f20-4a3c-4e5d-9f71-0b2c3d4e5f04", "Universidad de Ingeniería y Tecnología", "UTEC"),
    ("e2c4a6b8-1f3d-4a5e-8c7b-6d5e4f3a2b05", "Universidad Peruana de Ciencias Aplicadas", "UPC"),
    ("5b7d9f1a-3c5e-4b7d-a9f1-3c5e7a9b1d06", "Tecsup", "TECSUP"),
];

const EXPERTISE: &[(&str, &str)] = &[
    ("a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c01", "Machine Learning"),
    ("b2c3d4e5-f6a7-4b8c-9d0e-1f2a3b4c5d02", "Data Science"),
    ("c3d4e5f6-a7b8-4c9d-8e1f-2a3b4c5d6e03", "Backend"),
    ("d4e5f6a7-b8c9-4d0e-9f2a-3b4c5d6e7f04", "Frontend"),
    ("e5f6a7b8-c9d0-4e1f-8a3b-4c5d6e7f8a05", "Diseño UX/UI"),
    ("f6a7b8c9-d0e1-4f2a-9b4c-5d6e7f8a9b06", "DevOps"),
    ("0a7b8c9d-e1f2-4a3b-8c5d-6e7f8a9b0c07", "Gestión de Producto"),
];

const TEAMS: &[(&str, &str)] = &[
    ("9c8b7a6f-5e4d-4c3b-a291-8f7e6d5c4b01", "Byte Me"),
    ("8b7a6f5e-4d3c-4b2a-9180-7e6d5c4b3a02", "Null Pointers"),
    ("7a6f5e4d-3c2b-4a19-8f70-6d5c4b3a2903", "Los Transformers"),
];

#[derive(Debug, Clone)]
struct CatalogueEntry {
    id: String,
    name: String,
    initial: Option<String>,
}

impl CatalogueEntry {
    fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self
                .initial
                .as_deref()
                .is_some_and(|i| i.to_lowercase().contains(needle))
    }

    fn to_entity(&self) -> SelectedEntity {
        SelectedEntity::new(&self.id, &self.name)
    }
}

/// A stored registration
#[derive(Debug, Clone)]
pub struct StoredRegistration {
    pub id: String,
    pub payload: RegistrationPayload,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    education: Vec<CatalogueEntry>,
    expertise: Vec<CatalogueEntry>,
    teams: Vec<CatalogueEntry>,
    registrations: Vec<StoredRegistration>,
}

impl State {
    fn seeded() -> Self {
        Self {
            education: EDUCATION
                .iter()
                .map(|(id, name, initial)| CatalogueEntry {
                    id: id.to_string(),
                    name: name.to_string(),
                    initial: Some(initial.to_string()),
                })
                .collect(),
            expertise: catalogue(EXPERTISE),
            teams: catalogue(TEAMS),
            registrations: Vec::new(),
        }
    }

    fn entries(&self, kind: EntityKind) -> &[CatalogueEntry] {
        match kind {
            EntityKind::Education => &self.education,
            EntityKind::Expertise => &self.expertise,
            EntityKind::Team => &self.teams,
        }
    }

    fn email_taken(&self, payload: &RegistrationPayload) -> bool {
        let email = payload.email().trim().to_lowercase();
        RESERVED_EMAILS.contains(&email.as_str())
            || self.registrations.iter().any(|r| {
                r.payload.kind() == payload.kind() && r.payload.email().to_lowercase() == email
            })
    }
}

fn catalogue(entries: &[(&str, &str)]) -> Vec<CatalogueEntry> {
    entries
        .iter()
        .map(|(id, name)| CatalogueEntry {
            id: id.to_string(),
            name: name.to_string(),
            initial: None,
        })
        .collect()
}

/// Format a fresh ULID in the 8-4-4-4-12 layout the API uses for entity ids
fn new_entity_id() -> String {
    let hex = format!("{:032x}", Ulid::new().0);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

fn single_error(field: &str, message: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message.to_string()]);
    errors
}

/// Offline stand-in for the registration API and lookup service
#[derive(Clone)]
pub struct SimulatedBackend {
    state: Rc<RefCell<State>>,
    preflight: Rc<Preflight>,
}

impl SimulatedBackend {
    /// Backend with the seeded catalogue and no registrations
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State::seeded())),
            preflight: Rc::new(Preflight::default()),
        }
    }

    /// Registrations accepted so far, oldest first
    pub fn registrations(&self) -> Vec<StoredRegistration> {
        self.state.borrow().registrations.clone()
    }

    fn check_team_rules(&self, payload: &RegistrationPayload) -> Result<(), SubmissionFailure> {
        let RegistrationPayload::Hacker(hacker) = payload else {
            return Ok(());
        };

        match &hacker.team {
            TeamAssignment::Create {
                team_name,
                project_description,
            } => {
                if team_name.trim().is_empty() {
                    return Err(SubmissionFailure::new(
                        "El nombre del equipo es requerido cuando se crea un nuevo equipo",
                        Some(400),
                        single_error("team_name", "El nombre del equipo es requerido"),
                    ));
                }
                if project_description.trim().is_empty() {
                    return Err(SubmissionFailure::new(
                        "La descripción del proyecto es requerida cuando se crea un nuevo equipo",
                        Some(400),
                        single_error("project_description", "La descripción del proyecto es requerida"),
                    ));
                }
                let state = self.state.borrow();
                let wanted = team_name.trim().to_lowercase();
                if state.teams.iter().any(|t| t.name.to_lowercase() == wanted) {
                    return Err(SubmissionFailure::new(
                        "Ya existe un equipo con ese nombre",
                        Some(409),
                        single_error("team_name", "Ya existe un equipo con ese nombre"),
                    ));
                }
            }
            TeamAssignment::Join { team_id } => {
                if !self.state.borrow().teams.iter().any(|t| &t.id == team_id) {
                    return Err(SubmissionFailure::new(
                        "El equipo seleccionado no existe",
                        Some(400),
                        single_error("team_id", "El equipo seleccionado no existe"),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationService for SimulatedBackend {
    fn submit(&self, payload: &RegistrationPayload) -> Result<RegistrationReceipt, SubmissionFailure> {
        debug!(kind = %payload.kind(), "simulated submission");

        self.preflight
            .check(payload)
            .map_err(|e| SubmissionFailure::new("Datos de entrada inválidos", Some(400), e.field_errors))?;

        self.check_team_rules(payload)?;

        if self.state.borrow().email_taken(payload) {
            return Err(SubmissionFailure::new(
                "Este email ya está registrado",
                Some(409),
                single_error("email", "Este email ya está registrado"),
            ));
        }

        let stored = StoredRegistration {
            id: Ulid::new().to_string(),
            payload: payload.clone(),
            created_at: Utc::now(),
        };

        let mut state = self.state.borrow_mut();
        if let Some(team_name) = payload.team_name() {
            state.teams.push(CatalogueEntry {
                id: new_entity_id(),
                name: team_name.to_string(),
                initial: None,
            });
        }

        let receipt = RegistrationReceipt {
            id: stored.id.clone(),
            name: match payload {
                RegistrationPayload::Hacker(h) => h.name.clone(),
                RegistrationPayload::Sponsor(s) => s.name.clone(),
            },
            email: payload.email().to_string(),
            team_name: payload.team_name().map(str::to_string),
        };
        info!(id = %stored.id, created_at = %stored.created_at.to_rfc3339(), "simulated registration stored");
        state.registrations.push(stored);

        Ok(receipt)
    }
}

impl EntityDirectory for SimulatedBackend {
    fn search(&self, kind: EntityKind, query: &str) -> Vec<SelectedEntity> {
        let needle = query.trim().to_lowercase();
        self.state
            .borrow()
            .entries(kind)
            .iter()
            .filter(|e| e.matches(&needle))
            .map(CatalogueEntry::to_entity)
            .collect()
    }

    fn create(&self, kind: EntityKind, name: &str, initial: Option<&str>) -> Option<SelectedEntity> {
        let name = name.trim();
        if !kind.is_creatable() || name.is_empty() {
            return None;
        }

        let mut state = self.state.borrow_mut();
        if let Some(existing) = state
            .education
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
        {
            return Some(existing.to_entity());
        }

        let entry = CatalogueEntry {
            id: new_entity_id(),
            name: name.to_string(),
            initial: initial.map(str::to_string).filter(|i| !i.trim().is_empty()),
        };
        let entity = entry.to_entity();
        state.education.push(entry);
        Some(entity)
    }
}
