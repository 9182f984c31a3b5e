//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::{Prefill, SettingsFile};

/// titan-init - Generate a project from a registry boilerplate package.
#[derive(Debug, Parser)]
#[command(name = "titan-init")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a settings file (layered over ~/.titan-init/config.yml and .titan-init.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory to create the project in (overrides current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project (default if no command specified)
    New(NewArgs),

    /// Show the latest published metadata of a package
    Info(InfoArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Settings that can be overridden per invocation.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SourceArgs {
    /// Registry alias (npm, npmmirror, aliyun, 17zuoye) or URL
    #[arg(long, env = "TITAN_INIT_REGISTRY")]
    pub registry: Option<String>,

    /// Sub-directory of the package to copy (empty copies the whole package)
    #[arg(long, env = "TITAN_INIT_TEMPLATE_DIR")]
    pub template_dir: Option<String>,
}

/// Arguments for the `new` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct NewArgs {
    /// Project name (skips the prompt)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Project description (skips the prompt)
    #[arg(short, long)]
    pub description: Option<String>,

    /// Project author (skips the prompt)
    #[arg(short, long)]
    pub author: Option<String>,

    /// Boilerplate package to generate from
    #[arg(short, long, env = "TITAN_INIT_PACKAGE")]
    pub package: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Use defaults and TITAN_INIT_PROMPT_* variables, no prompts
    #[arg(long)]
    pub non_interactive: bool,
}

impl NewArgs {
    /// Answers given on the command line.
    pub fn prefill(&self) -> Prefill {
        Prefill {
            name: self.name.clone(),
            description: self.description.clone(),
            author: self.author.clone(),
        }
    }

    /// Settings layer built from the flags.
    pub fn settings_overrides(&self) -> SettingsFile {
        SettingsFile {
            package: self.package.clone(),
            ..self.source.settings_overrides()
        }
    }
}

impl SourceArgs {
    /// Settings layer built from the flags.
    pub fn settings_overrides(&self) -> SettingsFile {
        SettingsFile {
            registry: self.registry.clone(),
            template_dir: self.template_dir.clone(),
            ..SettingsFile::default()
        }
    }
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InfoArgs {
    /// Package to look up (defaults to the configured boilerplate)
    pub package: Option<String>,

    /// Registry alias (npm, npmmirror, aliyun, 17zuoye) or URL
    #[arg(long, env = "TITAN_INIT_REGISTRY")]
    pub registry: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl InfoArgs {
    /// Settings layer built from the flags.
    pub fn settings_overrides(&self) -> SettingsFile {
        SettingsFile {
            registry: self.registry.clone(),
            package: self.package.clone(),
            ..SettingsFile::default()
        }
    }
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["titan-init"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn new_flags_parse() {
        let cli = Cli::try_parse_from([
            "titan-init",
            "new",
            "--name",
            "myapp",
            "--author",
            "titan",
            "--package",
            "egg-boilerplate-ts",
            "--registry",
            "npm",
            "--non-interactive",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::New(args)) => {
                assert_eq!(args.name.as_deref(), Some("myapp"));
                assert_eq!(args.author.as_deref(), Some("titan"));
                assert!(args.non_interactive);

                let overrides = args.settings_overrides();
                assert_eq!(overrides.package.as_deref(), Some("egg-boilerplate-ts"));
                assert_eq!(overrides.registry.as_deref(), Some("npm"));
                assert!(overrides.template_dir.is_none());

                let prefill = args.prefill();
                assert_eq!(prefill.name.as_deref(), Some("myapp"));
                assert!(prefill.description.is_none());
            }
            other => panic!("expected new command, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["titan-init", "info", "-C", "/tmp", "--debug"]).unwrap();
        assert_eq!(cli.directory, Some(PathBuf::from("/tmp")));
        assert!(cli.debug);
    }

    #[test]
    fn info_takes_package_and_json() {
        let cli = Cli::try_parse_from(["titan-init", "info", "@scope/pkg", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Info(args)) => {
                assert_eq!(args.package.as_deref(), Some("@scope/pkg"));
                assert!(args.json);
            }
            other => panic!("expected info command, got {:?}", other),
        }
    }

    #[test]
    fn completions_requires_shell() {
        assert!(Cli::try_parse_from(["titan-init", "completions"]).is_err());
        assert!(Cli::try_parse_from(["titan-init", "completions", "zsh"]).is_ok());
    }
}
