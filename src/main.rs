use anyhow::Result;
use clap::Parser;
use modreloc::cli::{Cli, Commands};
use modreloc::commands::{self, DepsConfig, RelocateConfig};
use modreloc::observability::{init_tracing, install_panic_hook};

fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();
    init_tracing(cli.command.verbosity());

    match cli.command {
        Commands::Relocate {
            resolve,
            destination_dir,
            root_package,
            code_subpackage,
            helper_subpackage,
            flat_helpers,
            clear_existing,
            dry_run,
        } => commands::run_relocate(RelocateConfig {
            resolve,
            destination_dir,
            root_package,
            code_subpackage,
            helper_subpackage,
            flat_helpers,
            clear_existing,
            dry_run,
        }),
        Commands::Deps { resolve } => commands::list_dependencies(DepsConfig { resolve }),
        Commands::Init { force } => commands::init_config(force),
    }
}
