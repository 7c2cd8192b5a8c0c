use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::platform::Platform;

/// Top-level CLI entry point for the dev-environment config linker.
#[derive(Parser, Debug)]
#[command(
    name = "devenv",
    about = "Link dev-environment configuration into place",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override repository root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Override home directory that `~` expands to
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Override detected platform (darwin, linux)
    #[arg(long, global = true)]
    pub platform: Option<Platform>,

    /// Override backup directory for displaced files
    #[arg(long, global = true)]
    pub backup_dir: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Link every mapping in conf/links.toml
    Link(LinkOpts),
    /// Link bin/ executables into ~/.local/bin
    LinkBin,
    /// Put ~/.local/bin on PATH in the shell profile
    EnsurePath(EnsurePathOpts),
    /// Run ensure-path, then link
    Setup(SetupOpts),
    /// Print a shell completion script
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the persistent log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Link(_) => "link",
            Self::LinkBin => "link-bin",
            Self::EnsurePath(_) => "ensure-path",
            Self::Setup(_) => "setup",
            Self::Completions { .. } => "completions",
            Self::Version => "version",
        }
    }
}

/// Report format for `link`.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per entry through the logger
    #[default]
    Text,
    /// JSON document on stdout
    Json,
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct LinkOpts {
    /// Report format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Options for the `ensure-path` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct EnsurePathOpts {
    /// Shell whose profile to update (defaults to $SHELL)
    #[arg(long)]
    pub shell: Option<String>,
}

/// Options for the `setup` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct SetupOpts {
    /// Options for the link stage.
    #[command(flatten)]
    pub link: LinkOpts,
    /// Options for the ensure-path stage.
    #[command(flatten)]
    pub path: EnsurePathOpts,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_link_defaults_to_text() {
        let cli = Cli::parse_from(["devenv", "link"]);
        assert!(matches!(
            cli.command,
            Command::Link(LinkOpts {
                format: OutputFormat::Text
            })
        ));
        assert!(!cli.global.dry_run);
        assert!(cli.global.platform.is_none());
    }

    #[test]
    fn parse_link_json() {
        let cli = Cli::parse_from(["devenv", "link", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Command::Link(LinkOpts {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn parse_dry_run_short() {
        let cli = Cli::parse_from(["devenv", "-d", "link"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "devenv",
            "link-bin",
            "--root",
            "/repo",
            "--home",
            "/home/u",
            "--backup-dir",
            "/tmp/bak",
            "--verbose",
        ]);
        assert!(matches!(cli.command, Command::LinkBin));
        assert_eq!(cli.global.root, Some(PathBuf::from("/repo")));
        assert_eq!(cli.global.home, Some(PathBuf::from("/home/u")));
        assert_eq!(cli.global.backup_dir, Some(PathBuf::from("/tmp/bak")));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_platform_alias() {
        let cli = Cli::parse_from(["devenv", "--platform", "macos", "link"]);
        assert_eq!(cli.global.platform, Some(Platform::Darwin));
    }

    #[test]
    fn unknown_platform_is_rejected() {
        assert!(Cli::try_parse_from(["devenv", "--platform", "windows", "link"]).is_err());
    }

    #[test]
    fn parse_ensure_path_shell() {
        let cli = Cli::parse_from(["devenv", "ensure-path", "--shell", "/bin/zsh"]);
        assert!(
            matches!(&cli.command, Command::EnsurePath(_)),
            "Expected EnsurePath command"
        );
        if let Command::EnsurePath(opts) = cli.command {
            assert_eq!(opts.shell.as_deref(), Some("/bin/zsh"));
        }
    }

    #[test]
    fn parse_setup_takes_both_stage_options() {
        let cli = Cli::parse_from(["devenv", "setup", "--shell", "/bin/zsh", "--format", "json"]);
        assert!(
            matches!(&cli.command, Command::Setup(_)),
            "Expected Setup command"
        );
        if let Command::Setup(opts) = cli.command {
            assert_eq!(opts.path.shell.as_deref(), Some("/bin/zsh"));
            assert_eq!(opts.link.format, OutputFormat::Json);
        }
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["devenv", "completions", "zsh"]);
        assert!(matches!(
            cli.command,
            Command::Completions {
                shell: clap_complete::Shell::Zsh
            }
        ));
    }

    #[test]
    fn command_names_match_subcommands() {
        let cli = Cli::parse_from(["devenv", "ensure-path"]);
        assert_eq!(cli.command.name(), "ensure-path");
        assert_eq!(Cli::parse_from(["devenv", "version"]).command.name(), "version");
    }
}
