//! Drives a wizard session from a terminal or from an answers file

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{Diagnostic, IntoDiagnostic, Result};
use thiserror::Error;

use crate::cli::helpers::print_field_errors;
use crate::cli::script::{AnswerScript, ScriptValue};
use crate::core::answers::AnswerValue;
use crate::core::entity::SelectedEntity;
use crate::core::question::{Question, QuestionKind};
use crate::service::{RegistrationReceipt, SubmissionFailure};
use crate::wizard::{StepError, StepOutcome, WizardController, WizardError};

/// Typed at a text prompt to go back one step
pub const BACK_INPUT: &str = "<";

/// List item that goes back one step
pub const BACK_ITEM: &str = "« Volver";

const SEARCH_AGAIN_ITEM: &str = "« Buscar de nuevo";

#[derive(Debug, Error, Diagnostic)]
pub enum SessionError {
    #[error("Question '{id}': {message}")]
    #[diagnostic(code(hackreg::session::invalid_answer))]
    InvalidAnswer {
        id: String,
        message: String,
        #[help]
        prompt: Option<String>,
    },

    #[error("No match for '{query}' in question '{id}'")]
    #[diagnostic(
        code(hackreg::session::no_match),
        help("Try `hackreg lookup` to see the available entries")
    )]
    NoMatch { id: String, query: String },

    #[error("Registration failed: {message}")]
    #[diagnostic(code(hackreg::session::submission_failed))]
    Submission {
        message: String,
        #[help]
        details: Option<String>,
    },

    #[error(transparent)]
    #[diagnostic(code(hackreg::session::wizard))]
    Wizard(#[from] WizardError),
}

impl From<SubmissionFailure> for SessionError {
    fn from(failure: SubmissionFailure) -> Self {
        let details: Vec<String> = failure
            .field_errors
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join("; ")))
            .collect();
        SessionError::Submission {
            message: failure.message,
            details: (!details.is_empty()).then(|| details.join("\n")),
        }
    }
}

/// Answer every visible question from the script, then submit
pub fn run_scripted(
    wizard: &mut WizardController,
    script: &AnswerScript,
) -> Result<RegistrationReceipt, SessionError> {
    loop {
        let Some(question) = wizard.current_question().cloned() else {
            return Err(WizardError::Finished.into());
        };

        if !scripted_answer(wizard, &question, script)? {
            let blank = if question.kind.is_searchable() {
                AnswerValue::Entity(None)
            } else {
                AnswerValue::text("")
            };
            wizard.record_answer(&question.id, blank)?;
        }

        match wizard.advance()? {
            StepOutcome::Moved(step) => tracing::debug!(step, "scripted answer accepted"),
            StepOutcome::Blocked(e) => {
                return Err(SessionError::InvalidAnswer {
                    id: question.id.clone(),
                    message: e.to_string(),
                    prompt: Some(question.prompt.clone()),
                })
            }
            StepOutcome::SubmissionFailed(failure) => return Err(failure.into()),
            StepOutcome::Completed(receipt) => return Ok(receipt),
        }
    }
}

/// Record the scripted answer for `question`; false when the script has none
fn scripted_answer(
    wizard: &mut WizardController,
    question: &Question,
    script: &AnswerScript,
) -> Result<bool, SessionError> {
    let Some(value) = script.get(&question.id) else {
        return Ok(false);
    };

    match (&question.kind, value) {
        (QuestionKind::SearchableSelect { .. }, ScriptValue::Entity(entity)) => {
            wizard.record_answer(&question.id, entity.clone())?;
        }
        (QuestionKind::SearchableSelect { source }, ScriptValue::Text(name)) => {
            let results = wizard.search(name)?;
            match best_match(&results, name) {
                Some(entity) => wizard.record_answer(&question.id, entity)?,
                None if source.is_creatable() => {
                    if wizard.create_entity(name, None)?.is_none() {
                        return Err(SessionError::NoMatch {
                            id: question.id.clone(),
                            query: name.clone(),
                        });
                    }
                }
                None => {
                    return Err(SessionError::NoMatch {
                        id: question.id.clone(),
                        query: name.clone(),
                    })
                }
            }
        }
        (_, ScriptValue::Text(text)) => wizard.record_answer(&question.id, text.as_str())?,
        (_, ScriptValue::Entity(entity)) => {
            wizard.record_answer(&question.id, entity.display_name.as_str())?
        }
    }
    Ok(true)
}

/// Exact (case-insensitive) name match, else the first result
pub(crate) fn best_match(results: &[SelectedEntity], name: &str) -> Option<SelectedEntity> {
    results
        .iter()
        .find(|e| e.display_name.eq_ignore_ascii_case(name.trim()))
        .or_else(|| results.first())
        .cloned()
}

/// What the user did at a prompt
enum Reply {
    Back,
    Answer(AnswerValue),
    /// The answer was already recorded (e.g. a newly created entity)
    Recorded,
}

/// Ask each visible question in turn until the registration completes
pub fn run_interactive(wizard: &mut WizardController) -> Result<RegistrationReceipt> {
    let theme = ColorfulTheme::default();

    loop {
        let (Some(step), Some(question)) = (wizard.current_step(), wizard.current_question().cloned())
        else {
            return Err(WizardError::Finished).into_diagnostic();
        };

        println!();
        println!(
            "{} {}",
            style(format!("Paso {} de {}", step + 1, wizard.step_count())).dim(),
            style("─".repeat(30)).dim()
        );
        if let Some(error) = wizard.field_error() {
            eprintln!("{} {}", style("✗").red(), style(error).red());
            if let StepError::Submission(failure) = error {
                print_field_errors(&failure.field_errors);
            }
        }

        match prompt(wizard, &question, step, &theme)? {
            Reply::Back => {
                wizard.retreat().into_diagnostic()?;
                continue;
            }
            Reply::Answer(value) => wizard.record_answer(&question.id, value).into_diagnostic()?,
            Reply::Recorded => {}
        }

        match wizard.advance().into_diagnostic()? {
            StepOutcome::Completed(receipt) => return Ok(receipt),
            StepOutcome::Moved(_) | StepOutcome::Blocked(_) | StepOutcome::SubmissionFailed(_) => {}
        }
    }
}

fn prompt(
    wizard: &mut WizardController,
    question: &Question,
    step: usize,
    theme: &ColorfulTheme,
) -> Result<Reply> {
    let can_go_back = step > 0;
    let label = if question.required {
        question.prompt.clone()
    } else {
        format!("{} {}", question.prompt, style("(Enter para omitir)").dim())
    };

    match &question.kind {
        QuestionKind::Select { options } => {
            let mut items = options.clone();
            if can_go_back {
                items.push(BACK_ITEM.to_string());
            }
            let previous = wizard.answers().text(&question.id);
            let default = previous
                .and_then(|p| options.iter().position(|o| o == p))
                .unwrap_or(0);

            let idx = Select::with_theme(theme)
                .with_prompt(&label)
                .items(&items)
                .default(default)
                .interact()
                .into_diagnostic()?;

            if idx >= options.len() {
                Ok(Reply::Back)
            } else {
                Ok(Reply::Answer(AnswerValue::text(options[idx].clone())))
            }
        }
        QuestionKind::SearchableSelect { source } => loop {
            let query = text_input(theme, &label, "", can_go_back, &question.placeholder)?;
            let Some(query) = query else {
                return Ok(Reply::Back);
            };

            let results = wizard.search(&query).into_diagnostic()?;
            let mut items: Vec<String> = results.iter().map(|e| e.display_name.clone()).collect();
            let create_idx = (source.is_creatable() && !query.trim().is_empty()).then(|| {
                items.push(format!("+ Agregar \"{}\"", query.trim()));
                items.len() - 1
            });
            items.push(SEARCH_AGAIN_ITEM.to_string());

            if results.is_empty() {
                println!("  {}", style("No se encontraron resultados").yellow());
            }

            let idx = Select::with_theme(theme)
                .with_prompt("Selecciona una opción")
                .items(&items)
                .default(0)
                .interact()
                .into_diagnostic()?;

            if idx < results.len() {
                return Ok(Reply::Answer(AnswerValue::entity(results[idx].clone())));
            }
            if Some(idx) == create_idx {
                let initial: String = Input::with_theme(theme)
                    .with_prompt("Siglas (opcional)")
                    .allow_empty(true)
                    .interact_text()
                    .into_diagnostic()?;
                let initial = Some(initial.trim()).filter(|i| !i.is_empty());
                match wizard.create_entity(query.trim(), initial).into_diagnostic()? {
                    Some(created) => {
                        println!("  {} {}", style("✓").green(), created.display_name);
                        return Ok(Reply::Recorded);
                    }
                    None => eprintln!("  {}", style("No se pudo crear el registro").red()),
                }
            }
        },
        QuestionKind::ShortText
        | QuestionKind::Email
        | QuestionKind::Phone
        | QuestionKind::Url
        | QuestionKind::TextArea => {
            let previous = wizard.answers().text(&question.id).unwrap_or("").to_string();
            match text_input(theme, &label, &previous, can_go_back, &question.placeholder)? {
                Some(value) => Ok(Reply::Answer(AnswerValue::text(value))),
                None => Ok(Reply::Back),
            }
        }
    }
}

/// Text prompt; `None` when the user asked to go back
fn text_input(
    theme: &ColorfulTheme,
    label: &str,
    initial: &str,
    can_go_back: bool,
    placeholder: &str,
) -> Result<Option<String>> {
    if !placeholder.is_empty() && initial.is_empty() {
        println!("  {}", style(placeholder).dim());
    }

    let value: String = Input::with_theme(theme)
        .with_prompt(label)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    if can_go_back && value.trim() == BACK_INPUT {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forms;
    use crate::core::question::FormKind;
    use crate::core::EntityKind;
    use crate::service::{EntityDirectory, SimulatedBackend};
    use std::rc::Rc;

    fn wizard(kind: FormKind) -> (WizardController, Rc<SimulatedBackend>) {
        let backend = Rc::new(SimulatedBackend::new());
        let form = forms::form(kind).unwrap();
        let wizard = WizardController::new(form, Box::new(backend.clone()), Box::new(backend.clone()));
        (wizard, backend)
    }

    const CREATE_TEAM: &str = r#"
name: Ada
lastname: Lovelace
email: ada@example.com
phone: "+51999999999"
university: UNI
linkedin: https://linkedin.com/in/ada
experience: Avanzado
expertise: Backend
teamChoice: Crear nuevo equipo
teamName: Rustaceans
teamDescription: Un copiloto para voluntarios
"#;

    #[test]
    fn test_scripted_create_team() {
        let (mut wizard, backend) = wizard(FormKind::Hacker);
        let script = AnswerScript::from_yaml(CREATE_TEAM).unwrap();
        let receipt = run_scripted(&mut wizard, &script).unwrap();

        assert_eq!(receipt.team_name.as_deref(), Some("Rustaceans"));
        assert_eq!(backend.registrations().len(), 1);
    }

    #[test]
    fn test_scripted_missing_required_answer() {
        let (mut wizard, _) = wizard(FormKind::Hacker);
        let script = AnswerScript::from_yaml("lastname: Lovelace\n").unwrap();
        let err = run_scripted(&mut wizard, &script).unwrap_err();
        match err {
            SessionError::InvalidAnswer { id, message, .. } => {
                assert_eq!(id, "name");
                assert_eq!(message, "field required");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_scripted_unknown_team() {
        let (mut wizard, _) = wizard(FormKind::Hacker);
        let yaml = CREATE_TEAM.replace(
            "teamChoice: Crear nuevo equipo",
            "teamChoice: Unirme a equipo existente\nexistingTeam: Nadie",
        );
        let script = AnswerScript::from_yaml(&yaml).unwrap();
        assert!(matches!(
            run_scripted(&mut wizard, &script).unwrap_err(),
            SessionError::NoMatch { .. }
        ));
    }

    #[test]
    fn test_scripted_new_university_is_created() {
        let (mut wizard, backend) = wizard(FormKind::Hacker);
        let yaml = CREATE_TEAM.replace("university: UNI", "university: Instituto Nuevo del Sur");
        let script = AnswerScript::from_yaml(&yaml).unwrap();
        run_scripted(&mut wizard, &script).unwrap();
        assert_eq!(
            backend.search(EntityKind::Education, "Instituto Nuevo del Sur").len(),
            1
        );
    }

    #[test]
    fn test_scripted_reserved_email_reports_field() {
        let (mut wizard, _) = wizard(FormKind::Hacker);
        let yaml = CREATE_TEAM.replace("ada@example.com", "test@example.com");
        let script = AnswerScript::from_yaml(&yaml).unwrap();
        match run_scripted(&mut wizard, &script).unwrap_err() {
            SessionError::Submission { details, .. } => {
                assert!(details.unwrap().starts_with("email:"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_best_match_prefers_exact_name() {
        let results = vec![
            SelectedEntity::new("1", "Universidad Nacional de Ingeniería"),
            SelectedEntity::new("2", "UNI"),
        ];
        assert_eq!(best_match(&results, "uni").unwrap().id, "2");
        assert_eq!(best_match(&results, "Universidad").unwrap().id, "1");
        assert!(best_match(&[], "UNI").is_none());
    }
}
