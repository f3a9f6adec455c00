use crate::resolver::Scope;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modreloc")]
#[command(
    about = "Relocate Python modules and their dependencies into a new package",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy entry modules and their dependencies into a new flat package
    Relocate {
        #[command(flatten)]
        resolve: ResolveArgs,

        /// Directory the new package is created in
        #[arg(long = "dest", value_name = "DIR")]
        destination_dir: PathBuf,

        /// Name of the new top-level package
        #[arg(long, value_name = "NAME")]
        root_package: String,

        /// Subpackage for the entry modules (defaults to the root package)
        #[arg(long, value_name = "NAME")]
        code_subpackage: Option<String>,

        /// Subpackage for dependency modules [default: helpers]
        #[arg(long, value_name = "NAME", conflicts_with = "flat_helpers")]
        helper_subpackage: Option<String>,

        /// Put dependency modules directly in the root package
        #[arg(long)]
        flat_helpers: bool,

        /// Delete an existing package at the destination first
        #[arg(long = "clear")]
        clear_existing: bool,

        /// Plan the relocation and check for collisions without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// List the modules an entry point depends on
    Deps {
        #[command(flatten)]
        resolve: ResolveArgs,
    },

    /// Initialize a .modreloc.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Options shared by every command that resolves imports.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Dotted module names or paths to .py files
    #[arg(value_name = "ENTRY", required = true)]
    pub entries: Vec<String>,

    /// Which dependencies to keep [default: project]
    #[arg(long, value_enum)]
    pub scope: Option<Scope>,

    /// Case-insensitive regex matched against module paths (project scope)
    #[arg(long, value_name = "REGEX")]
    pub project_root_pattern: Option<String>,

    /// Skip package __init__.py files
    #[arg(long)]
    pub drop_package_init_files: bool,

    /// Extra directory to search for modules (repeatable)
    #[arg(short = 'I', long = "search-path", value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,

    /// Configuration file (defaults to the nearest .modreloc.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

impl Commands {
    /// `-v` count of the command, 0 for commands without one
    pub fn verbosity(&self) -> u8 {
        match self {
            Commands::Relocate { resolve, .. } | Commands::Deps { resolve } => resolve.verbosity,
            Commands::Init { .. } => 0,
        }
    }
}
