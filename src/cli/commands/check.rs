//! `hackreg check` - validate an answers file without submitting it
//!
//! Runs the same per-question checks the wizard applies on each step, then
//! maps the answers and checks the payload against the embedded schema.

use console::style;
use miette::{bail, IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{load_config, print_field_errors, Backends};
use crate::cli::script::{AnswerScript, ScriptValue};
use crate::cli::session::best_match;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::answers::{AnswerMap, AnswerValue};
use crate::core::forms;
use crate::core::question::{FormDefinition, FormKind, QuestionKind};
use crate::schema::Preflight;
use crate::service::{EntityDirectory, FieldErrors};
use crate::wizard::{map_to_payload, validate, visibility};

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Answers file to check
    #[arg(value_name = "FILE")]
    pub answers: PathBuf,

    /// Registration flow the answers belong to
    #[arg(long, short = 'k', value_enum, default_value = "hacker")]
    pub kind: FormKind,
}

#[derive(Debug, Serialize)]
struct QuestionReport {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    kind: FormKind,
    valid: bool,
    questions: Vec<QuestionReport>,
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    payload_errors: FieldErrors,
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let backends = Backends::from_config(&config)?;
    let form = forms::form(args.kind)?;
    let script = AnswerScript::load(&args.answers)?;

    let answers = resolve_answers(&form, &script, backends.directory.as_ref());
    let report = check_answers(&form, &answers);

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }
        OutputFormat::Table => print_report(&report, global.quiet),
    }

    if !report.valid {
        bail!("{} has problems", args.answers.display());
    }
    Ok(())
}

/// Answer map as the wizard would record it, with names looked up
fn resolve_answers(form: &FormDefinition, script: &AnswerScript, directory: &dyn EntityDirectory) -> AnswerMap {
    let mut answers = AnswerMap::new();

    for question in form.questions() {
        let Some(value) = script.get(&question.id) else {
            continue;
        };
        let answer = match (&question.kind, value) {
            (QuestionKind::SearchableSelect { source }, ScriptValue::Text(name)) => {
                AnswerValue::Entity(best_match(&directory.search(*source, name), name))
            }
            (QuestionKind::SearchableSelect { .. }, ScriptValue::Entity(e)) => AnswerValue::entity(e.clone()),
            (_, ScriptValue::Text(text)) => AnswerValue::text(text.clone()),
            (_, ScriptValue::Entity(e)) => AnswerValue::text(e.display_name.clone()),
        };
        answers.set(question.id.clone(), answer);
    }
    answers
}

fn check_answers(form: &FormDefinition, answers: &AnswerMap) -> CheckReport {
    let questions: Vec<QuestionReport> = visibility::resolve(form.questions(), answers)
        .into_iter()
        .map(|q| {
            let raw = answers.text(&q.id).unwrap_or("");
            let error = validate(q, raw, answers.entity(&q.id)).err().map(|e| e.to_string());
            QuestionReport {
                id: q.id.clone(),
                error,
            }
        })
        .collect();

    let questions_ok = questions.iter().all(|q| q.error.is_none());
    let payload_errors = if questions_ok {
        match map_to_payload(form.kind(), answers) {
            Ok(payload) => match Preflight::default().check(&payload) {
                Ok(()) => FieldErrors::new(),
                Err(e) => e.field_errors,
            },
            Err(e) => {
                let mut errors = FieldErrors::new();
                errors.insert(e.field().to_string(), vec![e.to_string()]);
                errors
            }
        }
    } else {
        FieldErrors::new()
    };

    CheckReport {
        kind: form.kind(),
        valid: questions_ok && payload_errors.is_empty(),
        questions,
        payload_errors,
    }
}

fn print_report(report: &CheckReport, quiet: bool) {
    if !quiet {
        let mut builder = Builder::default();
        builder.push_record(["Question", "Result"]);
        for q in &report.questions {
            builder.push_record([
                q.id.clone(),
                q.error.clone().unwrap_or_else(|| "ok".to_string()),
            ]);
        }
        println!("{}", builder.build().with(Style::markdown()));
        println!();
    }

    if !report.payload_errors.is_empty() {
        eprintln!("{}", style("The registration API would refuse this payload:").red());
        print_field_errors(&report.payload_errors);
    }

    if report.valid {
        println!("{} Answers are valid for the {} form", style("✓").green(), report.kind);
    }
}
