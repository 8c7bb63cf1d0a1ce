//! Submission mapping - answers to the registration API's request schema
//!
//! The mapper never emits a half-built payload: every field required by the
//! chosen shape is checked here, and the team-creation and team-joining
//! shapes are separate variants of [`TeamAssignment`], so their exclusive
//! fields cannot appear together.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::core::answers::AnswerMap;
use crate::core::choices::{ExperienceLevel, Labelled, SponsorPlan, TeamMode};
use crate::core::forms::ids;
use crate::core::question::FormKind;

/// Why answers could not be turned into a payload
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("Missing value for '{field}'")]
    MissingField { field: &'static str },

    #[error("Missing selection for '{field}'")]
    MissingSelection { field: &'static str },

    #[error("'{value}' is not a valid choice for '{field}'")]
    UnknownChoice { field: &'static str, value: String },
}

impl MapError {
    /// API field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            MapError::MissingField { field }
            | MapError::MissingSelection { field }
            | MapError::UnknownChoice { field, .. } => field,
        }
    }
}

/// Team part of a participant registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamAssignment {
    /// Register a new team; serialized with `team_create: true`
    Create {
        team_name: String,
        project_description: String,
    },
    /// Join an existing team; serialized with `team_create: false`
    Join { team_id: String },
}

impl TeamAssignment {
    pub fn mode(&self) -> TeamMode {
        match self {
            TeamAssignment::Create { .. } => TeamMode::Create,
            TeamAssignment::Join { .. } => TeamMode::Join,
        }
    }
}

impl Serialize for TeamAssignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TeamAssignment::Create {
                team_name,
                project_description,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("team_create", &true)?;
                map.serialize_entry("team_name", team_name)?;
                map.serialize_entry("project_description", project_description)?;
                map.end()
            }
            TeamAssignment::Join { team_id } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("team_create", &false)?;
                map.serialize_entry("team_id", team_id)?;
                map.end()
            }
        }
    }
}

/// Participant registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HackerPayload {
    pub name: String,
    pub lastname: String,
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    pub level: ExperienceLevel,
    pub education_id: String,
    pub expertise_id: String,
    #[serde(flatten)]
    pub team: TeamAssignment,
}

/// Sponsor registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SponsorPayload {
    pub name: String,
    pub email: String,
    pub contact_name: String,
    pub contact_lastname: String,
    pub contact_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    pub plan: SponsorPlan,
}

/// A complete registration request for either flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RegistrationPayload {
    Hacker(HackerPayload),
    Sponsor(SponsorPayload),
}

impl RegistrationPayload {
    pub fn kind(&self) -> FormKind {
        match self {
            RegistrationPayload::Hacker(_) => FormKind::Hacker,
            RegistrationPayload::Sponsor(_) => FormKind::Sponsor,
        }
    }

    /// Name shown in the confirmation view
    pub fn display_name(&self) -> String {
        match self {
            RegistrationPayload::Hacker(h) => format!("{} {}", h.name, h.lastname),
            RegistrationPayload::Sponsor(s) => s.name.clone(),
        }
    }

    pub fn email(&self) -> &str {
        match self {
            RegistrationPayload::Hacker(h) => &h.email,
            RegistrationPayload::Sponsor(s) => &s.email,
        }
    }

    /// Team name, when this registration creates one
    pub fn team_name(&self) -> Option<&str> {
        match self {
            RegistrationPayload::Hacker(HackerPayload {
                team: TeamAssignment::Create { team_name, .. },
                ..
            }) => Some(team_name),
            _ => None,
        }
    }
}

/// Map the answers of the given form into its request payload
pub fn map_to_payload(kind: FormKind, answers: &AnswerMap) -> Result<RegistrationPayload, MapError> {
    match kind {
        FormKind::Hacker => map_hacker(answers).map(RegistrationPayload::Hacker),
        FormKind::Sponsor => map_sponsor(answers).map(RegistrationPayload::Sponsor),
    }
}

/// Decide the team mode once from the team-choice answer
pub fn team_mode(answers: &AnswerMap) -> Result<TeamMode, MapError> {
    let label = answers
        .non_blank(ids::TEAM_CHOICE)
        .ok_or(MapError::MissingField { field: "team_create" })?;
    TeamMode::from_label(label).ok_or_else(|| MapError::UnknownChoice {
        field: "team_create",
        value: label.to_string(),
    })
}

fn map_hacker(answers: &AnswerMap) -> Result<HackerPayload, MapError> {
    let team = match team_mode(answers)? {
        TeamMode::Create => TeamAssignment::Create {
            team_name: text(answers, ids::TEAM_NAME, "team_name")?,
            project_description: text(answers, ids::TEAM_DESCRIPTION, "project_description")?,
        },
        TeamMode::Join => TeamAssignment::Join {
            team_id: entity_id(answers, ids::EXISTING_TEAM, "team_id")?,
        },
    };

    Ok(HackerPayload {
        name: text(answers, ids::NAME, "name")?,
        lastname: text(answers, ids::LASTNAME, "lastname")?,
        phone: text(answers, ids::PHONE, "phone")?,
        email: text(answers, ids::EMAIL, "email")?,
        linkedin: text(answers, ids::LINKEDIN, "linkedin")?,
        github: optional_text(answers, ids::GITHUB),
        level: choice(answers, ids::EXPERIENCE, "level")?,
        education_id: entity_id(answers, ids::UNIVERSITY, "education_id")?,
        expertise_id: entity_id(answers, ids::EXPERTISE, "expertise_id")?,
        team,
    })
}

fn map_sponsor(answers: &AnswerMap) -> Result<SponsorPayload, MapError> {
    Ok(SponsorPayload {
        name: text(answers, ids::NAME, "name")?,
        email: text(answers, ids::EMAIL, "email")?,
        contact_name: text(answers, ids::CONTACT_NAME, "contact_name")?,
        contact_lastname: text(answers, ids::CONTACT_LASTNAME, "contact_lastname")?,
        contact_phone: text(answers, ids::CONTACT_PHONE, "contact_phone")?,
        linkedin: optional_text(answers, ids::LINKEDIN),
        instagram: optional_text(answers, ids::INSTAGRAM),
        facebook: optional_text(answers, ids::FACEBOOK),
        plan: choice(answers, ids::PLAN, "plan")?,
    })
}

fn text(answers: &AnswerMap, id: &str, field: &'static str) -> Result<String, MapError> {
    answers
        .non_blank(id)
        .map(str::to_string)
        .ok_or(MapError::MissingField { field })
}

fn optional_text(answers: &AnswerMap, id: &str) -> Option<String> {
    answers.non_blank(id).map(str::to_string)
}

fn entity_id(answers: &AnswerMap, id: &str, field: &'static str) -> Result<String, MapError> {
    answers
        .entity(id)
        .map(|e| e.id.clone())
        .ok_or(MapError::MissingSelection { field })
}

fn choice<C: Labelled>(answers: &AnswerMap, id: &str, field: &'static str) -> Result<C, MapError> {
    let label = answers
        .non_blank(id)
        .ok_or(MapError::MissingField { field })?;
    C::from_label(label).ok_or_else(|| MapError::UnknownChoice {
        field,
        value: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::SelectedEntity;
    use serde_json::Value;

    fn base_answers() -> AnswerMap {
        let mut answers = AnswerMap::new();
        answers.set(ids::NAME, "Ada");
        answers.set(ids::LASTNAME, "Lovelace");
        answers.set(ids::EMAIL, "ada@example.com");
        answers.set(ids::PHONE, "+51999999999");
        answers.set(ids::UNIVERSITY, SelectedEntity::new("edu-1", "UNI"));
        answers.set(ids::LINKEDIN, "https://linkedin.com/in/ada");
        answers.set(ids::EXPERIENCE, "Avanzado");
        answers.set(ids::EXPERTISE, SelectedEntity::new("exp-1", "Machine Learning"));
        answers
    }

    fn create_answers() -> AnswerMap {
        let mut answers = base_answers();
        answers.set(ids::TEAM_CHOICE, TeamMode::Create.label());
        answers.set(ids::TEAM_NAME, "Rustaceans");
        answers.set(ids::TEAM_DESCRIPTION, "Un copiloto para voluntarios");
        answers
    }

    fn join_answers() -> AnswerMap {
        let mut answers = base_answers();
        answers.set(ids::TEAM_CHOICE, TeamMode::Join.label());
        answers.set(ids::EXISTING_TEAM, SelectedEntity::new("team-9", "Byte Me"));
        answers
    }

    #[test]
    fn test_create_shape() {
        let payload = map_to_payload(FormKind::Hacker, &create_answers()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["team_create"], Value::Bool(true));
        assert_eq!(json["team_name"], "Rustaceans");
        assert_eq!(json["project_description"], "Un copiloto para voluntarios");
        assert!(json.get("team_id").is_none());
        assert_eq!(json["education_id"], "edu-1");
        assert_eq!(json["expertise_id"], "exp-1");
        assert_eq!(json["level"], "Avanzado");
        assert_eq!(payload.team_name(), Some("Rustaceans"));
    }

    #[test]
    fn test_join_shape_has_no_team_name() {
        let payload = map_to_payload(FormKind::Hacker, &join_answers()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["team_create"], Value::Bool(false));
        assert_eq!(json["team_id"], "team-9");
        assert!(json.get("team_name").is_none());
        assert!(json.get("project_description").is_none());
        assert_eq!(payload.team_name(), None);
    }

    #[test]
    fn test_hidden_create_answers_ignored_when_joining() {
        let mut answers = join_answers();
        answers.set(ids::TEAM_NAME, "Stale name from an earlier visit");
        let json = serde_json::to_value(map_to_payload(FormKind::Hacker, &answers).unwrap()).unwrap();
        assert!(json.get("team_name").is_none());
    }

    #[test]
    fn test_create_without_team_name_is_refused() {
        let mut answers = create_answers();
        answers.remove(ids::TEAM_NAME);
        let err = map_to_payload(FormKind::Hacker, &answers).unwrap_err();
        assert_eq!(err, MapError::MissingField { field: "team_name" });
        assert_eq!(err.field(), "team_name");
    }

    #[test]
    fn test_join_without_team_selection_is_refused() {
        let mut answers = join_answers();
        answers.remove(ids::EXISTING_TEAM);
        assert_eq!(
            map_to_payload(FormKind::Hacker, &answers).unwrap_err(),
            MapError::MissingSelection { field: "team_id" }
        );
    }

    #[test]
    fn test_unknown_team_choice() {
        let mut answers = base_answers();
        answers.set(ids::TEAM_CHOICE, "Solo");
        assert!(matches!(
            map_to_payload(FormKind::Hacker, &answers).unwrap_err(),
            MapError::UnknownChoice { field: "team_create", .. }
        ));
    }

    #[test]
    fn test_entity_display_text_is_not_used_as_id() {
        let mut answers = create_answers();
        answers.set(ids::UNIVERSITY, "UNI");
        assert_eq!(
            map_to_payload(FormKind::Hacker, &answers).unwrap_err(),
            MapError::MissingSelection { field: "education_id" }
        );
    }

    #[test]
    fn test_blank_optional_fields_are_omitted() {
        let mut answers = create_answers();
        answers.set(ids::GITHUB, "  ");
        let json = serde_json::to_value(map_to_payload(FormKind::Hacker, &answers).unwrap()).unwrap();
        assert!(json.get("github").is_none());

        answers.set(ids::GITHUB, "https://github.com/ada");
        let json = serde_json::to_value(map_to_payload(FormKind::Hacker, &answers).unwrap()).unwrap();
        assert_eq!(json["github"], "https://github.com/ada");
    }

    #[test]
    fn test_valid_answers_produce_no_nulls() {
        for answers in [create_answers(), join_answers()] {
            let json = serde_json::to_value(map_to_payload(FormKind::Hacker, &answers).unwrap()).unwrap();
            let obj = json.as_object().unwrap();
            assert!(obj.values().all(|v| !v.is_null()));
            for field in ["name", "lastname", "phone", "email", "linkedin", "level", "education_id", "expertise_id", "team_create"] {
                assert!(obj.contains_key(field), "missing {field}");
            }
        }
    }

    #[test]
    fn test_sponsor_payload() {
        let mut answers = AnswerMap::new();
        answers.set(ids::NAME, "Acme SAC");
        answers.set(ids::EMAIL, "contacto@acme.pe");
        answers.set(ids::CONTACT_NAME, "Rosa");
        answers.set(ids::CONTACT_LASTNAME, "Quispe");
        answers.set(ids::CONTACT_PHONE, "+51 988 777 666");
        answers.set(ids::INSTAGRAM, "https://instagram.com/acme");
        answers.set(ids::PLAN, SponsorPlan::Golden.label());

        let payload = map_to_payload(FormKind::Sponsor, &answers).unwrap();
        assert_eq!(payload.kind(), FormKind::Sponsor);
        assert_eq!(payload.display_name(), "Acme SAC");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["plan"], "golden");
        assert_eq!(json["instagram"], "https://instagram.com/acme");
        assert!(json.get("linkedin").is_none());
    }
}
