//! Core module - form model, answers and configuration

pub mod answers;
pub mod choices;
pub mod config;
pub mod entity;
pub mod forms;
pub mod question;

pub use answers::{AnswerMap, AnswerValue};
pub use choices::{ExperienceLevel, Labelled, SponsorPlan, TeamMode};
pub use config::Config;
pub use entity::{EntityKind, SelectedEntity};
pub use question::{Condition, FormDefinition, FormError, FormKind, Question, QuestionKind};
