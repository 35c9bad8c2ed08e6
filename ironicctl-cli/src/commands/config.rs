use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ironicctl_core::IronicctlConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Show effective configuration (TOML)
    Show,
    /// Write the effective configuration to the config file
    Init {
        /// Force overwrite existing config
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run_config(
    args: ConfigArgs,
    config: &IronicctlConfig,
    explicit_path: Option<PathBuf>,
) -> Result<()> {
    let path = explicit_path.unwrap_or_else(IronicctlConfig::config_path);

    match args.command {
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            print!("{}", toml::to_string_pretty(config)?);
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at {:?}\n\nUse --force to overwrite",
                    path
                );
            }
            config.save(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
