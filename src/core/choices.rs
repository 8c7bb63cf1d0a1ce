//! Labelled choices for select questions
//!
//! Each enum owns the exact label shown to the user. Form definitions build
//! their select options and conditional rules from these labels, and the
//! payload mapper parses answers back with [`Labelled::from_label`], so the
//! label text lives in exactly one place.

use serde::{Deserialize, Serialize};

/// A closed set of choices presented through a select question
pub trait Labelled: Sized + Copy + 'static {
    /// Every variant, in the order options are shown
    fn all() -> &'static [Self];

    /// Label shown to the user and stored in the answer map
    fn label(&self) -> &'static str;

    /// Parse an answer back into a variant (exact match)
    fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.label() == label)
    }

    /// Option labels for a select question
    fn labels() -> Vec<String> {
        Self::all().iter().map(|c| c.label().to_string()).collect()
    }
}

/// Whether a participant creates a new team or joins an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamMode {
    Create,
    Join,
}

impl Labelled for TeamMode {
    fn all() -> &'static [Self] {
        &[TeamMode::Create, TeamMode::Join]
    }

    fn label(&self) -> &'static str {
        match self {
            TeamMode::Create => "Crear nuevo equipo",
            TeamMode::Join => "Unirme a equipo existente",
        }
    }
}

/// Self-reported AI experience level; serialized with the API's labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Principiante,
    Intermedio,
    Avanzado,
    Experto,
}

impl Labelled for ExperienceLevel {
    fn all() -> &'static [Self] {
        &[
            ExperienceLevel::Principiante,
            ExperienceLevel::Intermedio,
            ExperienceLevel::Avanzado,
            ExperienceLevel::Experto,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Principiante => "Principiante",
            ExperienceLevel::Intermedio => "Intermedio",
            ExperienceLevel::Avanzado => "Avanzado",
            ExperienceLevel::Experto => "Experto",
        }
    }
}

/// Sponsorship tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SponsorPlan {
    Silver,
    Golden,
    Diamond,
}

impl SponsorPlan {
    /// Price in soles
    pub fn price(&self) -> u32 {
        match self {
            SponsorPlan::Silver => 300,
            SponsorPlan::Golden => 450,
            SponsorPlan::Diamond => 600,
        }
    }
}

impl Labelled for SponsorPlan {
    fn all() -> &'static [Self] {
        &[SponsorPlan::Silver, SponsorPlan::Golden, SponsorPlan::Diamond]
    }

    fn label(&self) -> &'static str {
        match self {
            SponsorPlan::Silver => "Silver - Aliado Inicial (S/ 300)",
            SponsorPlan::Golden => "Golden - Aliado Formador (S/ 450)",
            SponsorPlan::Diamond => "Diamond - Hiring Ally (S/ 600)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_mode_labels() {
        assert_eq!(TeamMode::from_label("Crear nuevo equipo"), Some(TeamMode::Create));
        assert_eq!(
            TeamMode::from_label("Unirme a equipo existente"),
            Some(TeamMode::Join)
        );
        // exact match only
        assert_eq!(TeamMode::from_label("crear nuevo equipo"), None);
        assert_eq!(TeamMode::labels().len(), 2);
    }

    #[test]
    fn test_experience_level_serializes_as_label() {
        for level in ExperienceLevel::all() {
            let json = serde_json::to_value(level).unwrap();
            assert_eq!(json, level.label());
        }
    }

    #[test]
    fn test_sponsor_plan_price_in_label() {
        for plan in SponsorPlan::all() {
            assert!(plan.label().contains(&plan.price().to_string()));
        }
        assert_eq!(serde_json::to_value(SponsorPlan::Diamond).unwrap(), "diamond");
    }
}
