//! Built-in registration forms
//!
//! Question ids double as the keys the payload mapper reads, so they are
//! exported as constants from [`ids`].

use crate::core::choices::{ExperienceLevel, Labelled, SponsorPlan, TeamMode};
use crate::core::entity::EntityKind;
use crate::core::question::{FormDefinition, FormError, FormKind, Question, QuestionKind};

/// Question ids used by the built-in forms
pub mod ids {
    pub const NAME: &str = "name";
    pub const LASTNAME: &str = "lastname";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const UNIVERSITY: &str = "university";
    pub const LINKEDIN: &str = "linkedin";
    pub const GITHUB: &str = "github";
    pub const SOCIAL: &str = "social";
    pub const EXPERIENCE: &str = "experience";
    pub const EXPERTISE: &str = "expertise";
    pub const TEAM_CHOICE: &str = "teamChoice";
    pub const TEAM_NAME: &str = "teamName";
    pub const TEAM_DESCRIPTION: &str = "teamDescription";
    pub const EXISTING_TEAM: &str = "existingTeam";

    pub const CONTACT_NAME: &str = "contact_name";
    pub const CONTACT_LASTNAME: &str = "contact_lastname";
    pub const CONTACT_PHONE: &str = "contact_phone";
    pub const INSTAGRAM: &str = "instagram";
    pub const FACEBOOK: &str = "facebook";
    pub const PLAN: &str = "plan";
}

/// Form definition for the given flow
pub fn form(kind: FormKind) -> Result<FormDefinition, FormError> {
    match kind {
        FormKind::Hacker => hacker_form(),
        FormKind::Sponsor => sponsor_form(),
    }
}

/// Participant registration
pub fn hacker_form() -> Result<FormDefinition, FormError> {
    let create = TeamMode::Create.label();
    let join = TeamMode::Join.label();

    FormDefinition::new(
        FormKind::Hacker,
        vec![
            Question::new(ids::NAME, "Hola! ¿Cuál es tu nombre?", QuestionKind::ShortText)
                .placeholder("Tu nombre completo"),
            Question::new(ids::LASTNAME, "¿Cuál es tu apellido?", QuestionKind::ShortText)
                .placeholder("Tu apellido completo"),
            Question::new(
                ids::EMAIL,
                "Perfecto! Ahora necesitamos tu email para contactarte",
                QuestionKind::Email,
            )
            .placeholder("tu@email.com"),
            Question::new(ids::PHONE, "¿Cuál es tu número de celular?", QuestionKind::Phone)
                .placeholder("+51 999 999 999"),
            Question::new(
                ids::UNIVERSITY,
                "¿De qué universidad o instituto estudias?",
                QuestionKind::SearchableSelect {
                    source: EntityKind::Education,
                },
            )
            .placeholder("Busca tu universidad o instituto"),
            Question::new(ids::LINKEDIN, "Comparte tu perfil de LinkedIn", QuestionKind::Url)
                .placeholder("https://linkedin.com/in/tu-perfil"),
            Question::new(
                ids::GITHUB,
                "¿Tienes perfil de GitHub? (Opcional)",
                QuestionKind::Url,
            )
            .placeholder("https://github.com/tu-usuario")
            .optional(),
            Question::new(
                ids::SOCIAL,
                "¿Alguna otra red social que quieras compartir? (Opcional)",
                QuestionKind::ShortText,
            )
            .placeholder("Instagram, Twitter, etc.")
            .optional(),
            Question::new(
                ids::EXPERIENCE,
                "¿Cuál es tu nivel de experiencia en IA?",
                QuestionKind::Select {
                    options: ExperienceLevel::labels(),
                },
            )
            .placeholder("Selecciona tu nivel"),
            Question::new(
                ids::EXPERTISE,
                "¿Cuál es tu área de especialización?",
                QuestionKind::SearchableSelect {
                    source: EntityKind::Expertise,
                },
            )
            .placeholder("Busca tu especialización"),
            Question::new(
                ids::TEAM_CHOICE,
                "¿Quieres crear un nuevo equipo o unirte a uno existente?",
                QuestionKind::Select {
                    options: TeamMode::labels(),
                },
            )
            .placeholder("Selecciona una opción"),
            Question::new(
                ids::TEAM_NAME,
                "¿Cuál será el nombre de tu equipo?",
                QuestionKind::ShortText,
            )
            .placeholder("Nombre del equipo (mín. 2, máx. 4 integrantes)")
            .shown_when(ids::TEAM_CHOICE, create),
            Question::new(
                ids::TEAM_DESCRIPTION,
                "Describe qué planean construir o desarrollar",
                QuestionKind::TextArea,
            )
            .placeholder("Cuéntanos sobre su idea o proyecto...")
            .shown_when(ids::TEAM_CHOICE, create),
            Question::new(
                ids::EXISTING_TEAM,
                "¿A qué equipo te gustaría unirte?",
                QuestionKind::SearchableSelect {
                    source: EntityKind::Team,
                },
            )
            .placeholder("Busca y selecciona un equipo")
            .shown_when(ids::TEAM_CHOICE, join),
        ],
    )
}

/// Sponsor registration
pub fn sponsor_form() -> Result<FormDefinition, FormError> {
    FormDefinition::new(
        FormKind::Sponsor,
        vec![
            Question::new(
                ids::NAME,
                "¡Bienvenido! ¿Cuál es el nombre de tu empresa?",
                QuestionKind::ShortText,
            )
            .placeholder("Nombre de la empresa"),
            Question::new(
                ids::EMAIL,
                "¿Cuál es el email de contacto de la empresa?",
                QuestionKind::Email,
            )
            .placeholder("contacto@empresa.com"),
            Question::new(
                ids::CONTACT_NAME,
                "¿Cuál es el nombre del representante de la empresa?",
                QuestionKind::ShortText,
            )
            .placeholder("Nombre del contacto"),
            Question::new(
                ids::CONTACT_LASTNAME,
                "¿Cuál es el apellido del representante?",
                QuestionKind::ShortText,
            )
            .placeholder("Apellido del contacto"),
            Question::new(
                ids::CONTACT_PHONE,
                "¿Cuál es el número de teléfono del representante?",
                QuestionKind::Phone,
            )
            .placeholder("+51 999 999 999"),
            Question::new(
                ids::LINKEDIN,
                "Comparte el perfil de LinkedIn de la empresa",
                QuestionKind::Url,
            )
            .placeholder("https://linkedin.com/company/tu-empresa")
            .optional(),
            Question::new(
                ids::INSTAGRAM,
                "¿Tienen perfil de Instagram? (Opcional)",
                QuestionKind::Url,
            )
            .placeholder("https://instagram.com/tu-empresa")
            .optional(),
            Question::new(
                ids::FACEBOOK,
                "¿Tienen página de Facebook? (Opcional)",
                QuestionKind::Url,
            )
            .placeholder("https://facebook.com/tu-empresa")
            .optional(),
            Question::new(
                ids::PLAN,
                "¿Qué plan de patrocinio les interesa?",
                QuestionKind::Select {
                    options: SponsorPlan::labels(),
                },
            )
            .placeholder("Selecciona un plan"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_forms_are_valid() {
        let hacker = hacker_form().unwrap();
        assert_eq!(hacker.kind(), FormKind::Hacker);
        assert_eq!(hacker.questions().len(), 14);

        let sponsor = sponsor_form().unwrap();
        assert_eq!(sponsor.kind(), FormKind::Sponsor);
        assert_eq!(sponsor.questions().len(), 9);
    }

    #[test]
    fn test_team_questions_follow_team_mode_labels() {
        let hacker = hacker_form().unwrap();
        let team_name = hacker.get(ids::TEAM_NAME).unwrap();
        let cond = team_name.condition.as_ref().unwrap();
        assert_eq!(cond.depends_on, ids::TEAM_CHOICE);
        assert_eq!(TeamMode::from_label(&cond.equals), Some(TeamMode::Create));

        let existing = hacker.get(ids::EXISTING_TEAM).unwrap();
        let cond = existing.condition.as_ref().unwrap();
        assert_eq!(TeamMode::from_label(&cond.equals), Some(TeamMode::Join));
    }

    #[test]
    fn test_optional_questions() {
        let hacker = hacker_form().unwrap();
        let optional: Vec<&str> = hacker
            .questions()
            .iter()
            .filter(|q| !q.required)
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(optional, vec![ids::GITHUB, ids::SOCIAL]);

        let sponsor = sponsor_form().unwrap();
        assert!(!sponsor.get(ids::LINKEDIN).unwrap().required);
        assert!(sponsor.get(ids::PLAN).unwrap().required);
    }
}
