use clap::Parser;
use hackreg::cli::commands::{check, completions, config, lookup, questions, register};
use hackreg::cli::helpers::init_logging;
use hackreg::cli::{Cli, Commands};
use hackreg::core::FormKind;
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(&global);

    match cli.command {
        Commands::Register(args) => register::run(FormKind::Hacker, args, &global),
        Commands::Sponsor(args) => register::run(FormKind::Sponsor, args, &global),
        Commands::Questions(args) => questions::run(args, &global),
        Commands::Check(args) => check::run(args, &global),
        Commands::Lookup(args) => lookup::run(args, &global),
        Commands::Config(cmd) => config::run(cmd, &global),
        Commands::Completions(args) => completions::run(args),
    }
}
