//! `hackreg register` / `hackreg sponsor` - run the registration wizard

use console::style;
use miette::{bail, IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{load_config, Backends};
use crate::cli::script::AnswerScript;
use crate::cli::session;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::forms;
use crate::core::question::FormKind;
use crate::schema::{ConfirmationContext, ConfirmationRenderer};
use crate::wizard::{map_to_payload, WizardController};

#[derive(clap::Args, Debug)]
pub struct RegisterArgs {
    /// Answer the questions from a YAML file instead of prompting
    #[arg(long, short = 'a', value_name = "FILE")]
    pub answers: Option<PathBuf>,
}

pub fn run(kind: FormKind, args: RegisterArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let backends = Backends::from_config(&config)?;
    let form = forms::form(kind)?;
    let mut wizard = WizardController::new(form, backends.service, backends.directory);

    let receipt = match &args.answers {
        Some(path) => {
            let script = AnswerScript::load(path)?;
            session::run_scripted(&mut wizard, &script)?
        }
        None => {
            if !console::user_attended() {
                bail!("No terminal attached; pass --answers <FILE> to register non-interactively");
            }
            if !global.quiet {
                println!(
                    "{} {}",
                    style(config.event_name()).bold(),
                    style(format!("· registro de {}", kind)).dim()
                );
            }
            session::run_interactive(&mut wizard)?
        }
    };

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&receipt).into_diagnostic()?);
        }
        OutputFormat::Table if global.quiet => println!("{}", receipt.id),
        OutputFormat::Table => {
            let payload = map_to_payload(kind, wizard.answers()).into_diagnostic()?;
            let ctx = ConfirmationContext::new(&payload, &receipt, config.event_name())
                .with_community_url(config.community_url());
            let message = ConfirmationRenderer::new()
                .and_then(|renderer| renderer.render(&ctx))
                .into_diagnostic()?;

            println!();
            println!("{} {}", style("✓").green(), message.trim_end());
        }
    }

    Ok(())
}
