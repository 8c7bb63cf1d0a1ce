//! Confirmation messages rendered after a successful registration

use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::core::choices::Labelled;
use crate::core::question::FormKind;
use crate::service::RegistrationReceipt;
use crate::wizard::mapper::RegistrationPayload;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Values shown in a confirmation
#[derive(Debug, Clone)]
pub struct ConfirmationContext {
    pub kind: FormKind,
    pub id: String,
    pub name: String,
    pub event_name: String,
    pub community_url: Option<String>,
    pub team_name: Option<String>,
    pub contact_name: Option<String>,
    pub plan: Option<String>,
}

impl ConfirmationContext {
    /// Combine what was sent with what the service returned
    pub fn new(payload: &RegistrationPayload, receipt: &RegistrationReceipt, event_name: impl Into<String>) -> Self {
        let (contact_name, plan) = match payload {
            RegistrationPayload::Sponsor(s) => (Some(s.contact_name.clone()), Some(s.plan.label().to_string())),
            RegistrationPayload::Hacker(_) => (None, None),
        };

        Self {
            kind: payload.kind(),
            id: receipt.id.clone(),
            name: match payload {
                RegistrationPayload::Hacker(h) => h.name.clone(),
                RegistrationPayload::Sponsor(s) => s.name.clone(),
            },
            event_name: event_name.into(),
            community_url: None,
            team_name: receipt
                .team_name
                .clone()
                .or_else(|| payload.team_name().map(str::to_string)),
            contact_name,
            plan,
        }
    }

    pub fn with_community_url(mut self, url: Option<String>) -> Self {
        self.community_url = url;
        self
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// Renders the embedded confirmation templates
pub struct ConfirmationRenderer {
    tera: Tera,
}

impl ConfirmationRenderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    pub fn template_name(kind: FormKind) -> String {
        format!("{}-confirmation.txt.tera", kind.as_str())
    }

    pub fn render(&self, ctx: &ConfirmationContext) -> Result<String, TemplateError> {
        let name = Self::template_name(ctx.kind);
        if !self.tera.get_template_names().any(|n| n == name) {
            return Err(TemplateError::NotFound(name));
        }

        let mut context = tera::Context::new();
        context.insert("id", &ctx.id);
        context.insert("name", &ctx.name);
        context.insert("event_name", &ctx.event_name);
        context.insert("community_url", &ctx.community_url);
        context.insert("team_name", &ctx.team_name);
        context.insert("contact_name", &ctx.contact_name);
        context.insert("plan", &ctx.plan);

        self.tera
            .render(&name, &context)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::choices::SponsorPlan;
    use crate::wizard::mapper::SponsorPayload;

    fn receipt(team_name: Option<&str>) -> RegistrationReceipt {
        RegistrationReceipt {
            id: "01J9ZQ4R5T".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            team_name: team_name.map(str::to_string),
        }
    }

    fn hacker_ctx(team_name: Option<&str>) -> ConfirmationContext {
        ConfirmationContext {
            kind: FormKind::Hacker,
            id: "01J9ZQ4R5T".into(),
            name: "Ada".into(),
            event_name: "Hack[CIS] 2025".into(),
            community_url: None,
            team_name: team_name.map(str::to_string),
            contact_name: None,
            plan: None,
        }
    }

    #[test]
    fn test_render_hacker_confirmation() {
        let renderer = ConfirmationRenderer::new().unwrap();
        let text = renderer.render(&hacker_ctx(Some("Rustaceans"))).unwrap();
        assert!(text.contains("¡Felicitaciones, Ada!"));
        assert!(text.contains("Hack[CIS] 2025"));
        assert!(text.contains("Equipo creado: Rustaceans"));
        assert!(text.contains("01J9ZQ4R5T"));
        assert!(!text.contains("comunidad"));
    }

    #[test]
    fn test_community_link_shown_when_configured() {
        let renderer = ConfirmationRenderer::new().unwrap();
        let ctx = hacker_ctx(None).with_community_url(Some("https://chat.example.com/x".into()));
        let text = renderer.render(&ctx).unwrap();
        assert!(text.contains("https://chat.example.com/x"));
        assert!(!text.contains("Equipo creado"));
    }

    #[test]
    fn test_render_sponsor_confirmation() {
        let payload = RegistrationPayload::Sponsor(SponsorPayload {
            name: "Acme SAC".into(),
            email: "contacto@acme.pe".into(),
            contact_name: "Rosa".into(),
            contact_lastname: "Quispe".into(),
            contact_phone: "999999999".into(),
            linkedin: None,
            instagram: None,
            facebook: None,
            plan: SponsorPlan::Diamond,
        });
        let ctx = ConfirmationContext::new(&payload, &receipt(None), "Hack[CIS] 2025");
        let text = ConfirmationRenderer::new().unwrap().render(&ctx).unwrap();

        assert!(text.contains("Acme SAC"));
        assert!(text.contains("Gracias Rosa"));
        assert!(text.contains(SponsorPlan::Diamond.label()));
    }
}
