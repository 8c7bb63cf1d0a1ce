//! Registration wizard engine
//!
//! - [`validator`] checks one answer against its question
//! - [`visibility`] decides which questions are shown
//! - [`controller`] drives navigation and submission
//! - [`mapper`] turns answers into the API payload

pub mod controller;
pub mod mapper;
pub mod validator;
pub mod visibility;

pub use controller::{
    Phase, SearchTicket, StepError, StepOutcome, SubmissionStart, SubmissionTicket,
    WizardController, WizardError, WizardState,
};
pub use mapper::{map_to_payload, MapError, RegistrationPayload, TeamAssignment};
pub use validator::{validate, FieldError};
