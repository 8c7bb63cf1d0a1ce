//! Looked-up entities - universities, expertise areas and teams

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Kind of entity a searchable question looks up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// University or institute
    Education,
    /// Area of expertise
    Expertise,
    /// Existing hackathon team
    Team,
}

impl EntityKind {
    /// Path segment of the lookup endpoint
    pub fn endpoint(&self) -> &'static str {
        match self {
            EntityKind::Education => "education",
            EntityKind::Expertise => "expertise",
            EntityKind::Team => "team",
        }
    }

    /// Whether users may create a new entity when the search finds nothing
    pub fn is_creatable(&self) -> bool {
        matches!(self, EntityKind::Education)
    }

    pub fn all() -> &'static [EntityKind] {
        &[EntityKind::Education, EntityKind::Expertise, EntityKind::Team]
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.endpoint())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "education" | "university" => Ok(EntityKind::Education),
            "expertise" => Ok(EntityKind::Expertise),
            "team" => Ok(EntityKind::Team),
            _ => Err(format!("Unknown entity kind: {}", s)),
        }
    }
}

/// An entity chosen (or created) through a searchable-select question
///
/// Serialized as `{id, name}`, the shape the lookup service returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedEntity {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

impl SelectedEntity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

impl std::fmt::Display for SelectedEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name)
    }
}
