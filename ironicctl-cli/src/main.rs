//! ironicctl - manage an OpenStack Ironic deployment from the outside
//!
//! This is the main entry point for the ironicctl command-line tool, which provides:
//! - Authenticated access to the `ironic` CLI (`list`, `show`, `exec`)
//! - Desired-state catalogs of packages, services and ironic.conf options (`catalog`)
//! - Applying catalog options to ironic.conf (`apply`)
//! - Tool configuration (`config`)

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use ironicctl_core::IronicctlConfig;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "ironicctl",
    author,
    version,
    about = "Authenticated ironic CLI wrapper and ironic.conf catalog",
    long_about = "Run the ironic CLI with credentials taken from ironic.conf, retrying \
                  transient API failures, and compute or apply the desired ironic.conf \
                  for a set of deployment parameters."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// ironicctl config file (default: ~/.ironicctl/config.toml)
    #[arg(long, global = true, env = "IRONICCTL_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List resource ids (node, port, chassis, driver...)
    List(commands::resources::ListArgs),
    /// Show the attributes of one resource
    Show(commands::resources::ShowArgs),
    /// Run the ironic CLI with credentials and print its output
    Exec(commands::resources::ExecArgs),
    /// Print the desired packages, services and ironic.conf options
    Catalog(commands::catalog::CatalogArgs),
    /// Apply catalog options to ironic.conf
    Apply(commands::catalog::ApplyArgs),
    /// Inspect ironicctl configuration (path, show, init)
    Config(commands::config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    let config = IronicctlConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::List(args) => commands::resources::run_list(args, &config).await,
        Commands::Show(args) => commands::resources::run_show(args, &config).await,
        Commands::Exec(args) => commands::resources::run_exec(args, &config).await,
        Commands::Catalog(args) => commands::catalog::run_catalog(args, &config),
        Commands::Apply(args) => commands::catalog::run_apply(args, &config),
        Commands::Config(args) => commands::config::run_config(args, &config, cli.config),
        Commands::Completions(args) => {
            generate_completions(args.shell);
            Ok(())
        }
    }
}

fn generate_completions(shell: Shell) {
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
