use anyhow::Result;
use clap::Parser;

use devenv_cli::cli::{Cli, Command, OutputFormat};
use devenv_cli::commands;
use devenv_cli::config::Settings;
use devenv_cli::logging::{self, ConsoleTarget, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    match &args.command {
        Command::Version => {
            commands::version::run();
            return Ok(());
        }
        Command::Completions { shell } => {
            commands::completions::run(*shell);
            return Ok(());
        }
        _ => {}
    }

    let format = match &args.command {
        Command::Link(opts) => opts.format,
        Command::Setup(opts) => opts.link.format,
        _ => OutputFormat::Text,
    };
    let console = match format {
        OutputFormat::Text => ConsoleTarget::Split,
        OutputFormat::Json => ConsoleTarget::Stderr,
    };
    let name = args.command.name();
    logging::init_subscriber(args.verbose, name, console);
    let log = Logger::new(name);

    let report = match &args.command {
        Command::Link(_) => commands::link::run(&Settings::resolve(&args.global)?, &log)?,
        Command::LinkBin => commands::link_bin::run(&Settings::resolve(&args.global)?, &log)?,
        Command::EnsurePath(opts) => {
            let settings = Settings::resolve_outside_repo(&args.global)?;
            let shell = commands::ensure_path::resolve_shell(opts);
            commands::ensure_path::run(&settings, shell.as_deref(), &log)?
        }
        Command::Setup(opts) => {
            let settings = Settings::resolve(&args.global)?;
            let shell = commands::ensure_path::resolve_shell(&opts.path);
            commands::setup::run(&settings, shell.as_deref(), &log)?
        }
        Command::Version | Command::Completions { .. } => return Ok(()),
    };
    commands::finish(&report, format, &log)
}
