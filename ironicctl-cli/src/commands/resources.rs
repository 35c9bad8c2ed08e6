//! Resource commands - authenticated calls to the ironic CLI
//!
//! Credentials come from `[keystone_authtoken]` in ironic.conf and are passed
//! to the ironic process as OS_* environment variables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ironicctl_core::{FileSource, IronicProvider, IronicctlConfig, RealInvoker};

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Resource type (node, port, chassis, driver...)
    pub kind: String,

    /// ironic.conf to read credentials from (overrides config)
    #[arg(long, value_name = "PATH")]
    pub conf: Option<PathBuf>,

    /// Output as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Resource type (node, port, chassis, driver...)
    pub kind: String,

    /// Resource id or name
    pub id: String,

    /// ironic.conf to read credentials from (overrides config)
    #[arg(long, value_name = "PATH")]
    pub conf: Option<PathBuf>,

    /// Output as a JSON object
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ExecArgs {
    /// ironic.conf to read credentials from (overrides config)
    #[arg(long, value_name = "PATH")]
    pub conf: Option<PathBuf>,

    /// Arguments passed to the ironic CLI (after `--`)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub args: Vec<String>,
}

fn provider(
    config: &IronicctlConfig,
    conf: Option<PathBuf>,
) -> IronicProvider<FileSource, RealInvoker> {
    let path = conf.unwrap_or_else(|| config.ironic_conf.clone());
    tracing::debug!(conf = %path.display(), program = %config.program, "building provider");

    IronicProvider::new(FileSource::new(path), RealInvoker::new(&config.program))
        .with_policy(config.retry)
        .with_timeout(config.timeout())
}

pub async fn run_list(args: ListArgs, config: &IronicctlConfig) -> Result<()> {
    let mut provider = provider(config, args.conf);
    let ids = provider
        .list_resources(&args.kind)
        .await
        .with_context(|| format!("Failed to list {} resources", args.kind))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ids)?);
    } else {
        for id in ids {
            println!("{}", id);
        }
    }
    Ok(())
}

pub async fn run_show(args: ShowArgs, config: &IronicctlConfig) -> Result<()> {
    let mut provider = provider(config, args.conf);
    let attrs = provider
        .show_resource(&args.kind, &args.id)
        .await
        .with_context(|| format!("Failed to show {} {}", args.kind, args.id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&attrs)?);
    } else {
        for (key, value) in attrs {
            println!("{}={}", key, value);
        }
    }
    Ok(())
}

pub async fn run_exec(args: ExecArgs, config: &IronicctlConfig) -> Result<()> {
    let mut provider = provider(config, args.conf);
    let output = provider
        .auth_ironic(&args.args)
        .await
        .context("ironic CLI failed")?;

    print!("{}", output);
    Ok(())
}
