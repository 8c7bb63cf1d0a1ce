//! `hackreg questions` - list the questions a set of answers would be asked

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::script::AnswerScript;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::answers::AnswerMap;
use crate::core::forms;
use crate::core::question::{FormKind, Question};
use crate::wizard::visibility;

#[derive(clap::Args, Debug)]
pub struct QuestionsArgs {
    /// Registration flow
    #[arg(value_enum, default_value = "hacker")]
    pub kind: FormKind,

    /// Answers that decide which conditional questions are shown
    #[arg(long, short = 'a', value_name = "FILE")]
    pub answers: Option<PathBuf>,

    /// List every question, including hidden conditional ones
    #[arg(long)]
    pub all: bool,
}

pub fn run(args: QuestionsArgs, global: &GlobalOpts) -> Result<()> {
    let form = forms::form(args.kind)?;
    let answers = match &args.answers {
        Some(path) => AnswerScript::load(path)?.to_answer_map(),
        None => AnswerMap::new(),
    };

    let shown: Vec<&Question> = if args.all {
        form.questions().iter().collect()
    } else {
        visibility::resolve(form.questions(), &answers)
    };

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&shown).into_diagnostic()?);
        }
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["#", "ID", "Kind", "Required", "Shown when", "Prompt"]);
            for (idx, q) in shown.iter().enumerate() {
                let condition = q
                    .condition
                    .as_ref()
                    .map(|c| format!("{} = {}", c.depends_on, c.equals))
                    .unwrap_or_default();
                builder.push_record([
                    (idx + 1).to_string(),
                    q.id.clone(),
                    q.kind.name().to_string(),
                    if q.required { "yes" } else { "no" }.to_string(),
                    condition,
                    truncate_str(&q.prompt, 50),
                ]);
            }
            println!("{}", builder.build().with(Style::markdown()));

            if !global.quiet {
                println!();
                println!(
                    "{} of {} question(s) shown",
                    style(shown.len()).cyan(),
                    form.questions().len()
                );
            }
        }
    }

    Ok(())
}
