//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    check::CheckArgs, completions::CompletionsArgs, config::ConfigCommands, lookup::LookupArgs,
    questions::QuestionsArgs, register::RegisterArgs,
};

#[derive(Parser)]
#[command(name = "hackreg")]
#[command(author, version, about = "Hackathon registration wizard")]
#[command(long_about = "Step-by-step registration for hackathon participants and sponsors, with conditional questions, per-step validation and submission to the registration API.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file (default: ./hackreg.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use the built-in offline backend instead of the registration API
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register as a participant (hacker)
    Register(RegisterArgs),

    /// Register a sponsoring company
    Sponsor(RegisterArgs),

    /// Show the questions a set of answers would be asked
    Questions(QuestionsArgs),

    /// Validate an answers file without submitting it
    Check(CheckArgs),

    /// Search universities, expertise areas or teams
    Lookup(LookupArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Table,
    /// JSON format (for programming)
    Json,
}
