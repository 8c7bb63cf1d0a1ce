//! `hackreg lookup` - search (or add) universities, expertise areas and teams

use console::style;
use miette::{bail, IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{load_config, Backends};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::{EntityKind, SelectedEntity};

#[derive(clap::Args, Debug)]
pub struct LookupArgs {
    /// What to search
    #[arg(value_enum)]
    pub kind: EntityKind,

    /// Text to search for (empty lists everything)
    #[arg(default_value = "")]
    pub query: String,

    /// Add QUERY as a new entry instead of searching (universities only)
    #[arg(long)]
    pub create: bool,

    /// Initials for a new university (e.g. UNI)
    #[arg(long, requires = "create")]
    pub initial: Option<String>,
}

pub fn run(args: LookupArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let backends = Backends::from_config(&config)?;

    let results = if args.create {
        if !args.kind.is_creatable() {
            bail!("New {} entries cannot be created", args.kind);
        }
        match backends
            .directory
            .create(args.kind, &args.query, args.initial.as_deref())
        {
            Some(created) => vec![created],
            None => bail!("Could not create {} '{}'", args.kind, args.query),
        }
    } else {
        backends.directory.search(args.kind, &args.query)
    };

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results).into_diagnostic()?);
        }
        OutputFormat::Table => print_results(&results, global.quiet),
    }
    Ok(())
}

fn print_results(results: &[SelectedEntity], quiet: bool) {
    if results.is_empty() {
        if !quiet {
            println!("{}", style("No matches").yellow());
        }
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Name"]);
    for entity in results {
        builder.push_record([entity.id.as_str(), entity.display_name.as_str()]);
    }
    println!("{}", builder.build().with(Style::markdown()));

    if !quiet {
        println!();
        println!("{} result(s)", style(results.len()).cyan());
    }
}
