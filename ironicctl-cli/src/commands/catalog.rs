//! Catalog commands - desired state and ironic.conf application

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tempfile::NamedTempFile;
use ironicctl_core::catalog::ServiceEnsure;
use ironicctl_core::{apply, Catalog, CatalogParams, IniDocument, IronicctlConfig, OsFamily};

#[derive(Parser, Debug)]
pub struct CatalogArgs {
    /// Catalog parameters (TOML); defaults when omitted
    #[arg(long, value_name = "PATH")]
    pub params: Option<PathBuf>,

    /// Target distribution family (debian, redhat)
    #[arg(long, value_name = "FAMILY")]
    pub os_family: Option<OsFamily>,

    /// Output as JSON (secrets redacted)
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Catalog parameters (TOML); defaults when omitted
    #[arg(long, value_name = "PATH")]
    pub params: Option<PathBuf>,

    /// ironic.conf to update (overrides config)
    #[arg(long, value_name = "PATH")]
    pub conf: Option<PathBuf>,

    /// Target distribution family (debian, redhat)
    #[arg(long, value_name = "FAMILY")]
    pub os_family: Option<OsFamily>,

    /// Show changes without writing ironic.conf
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Output changes as JSON
    #[arg(long)]
    pub json: bool,
}

fn build_catalog(
    params: Option<PathBuf>,
    os_family: Option<OsFamily>,
    config: &IronicctlConfig,
) -> Result<Catalog> {
    let params = match params.or_else(|| config.params.clone()) {
        Some(path) => CatalogParams::load(&path)
            .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
        None => CatalogParams::default(),
    };
    let family = os_family.unwrap_or(config.os_family);

    Catalog::build(&params, family).context("Invalid catalog parameters")
}

pub fn run_catalog(args: CatalogArgs, config: &IronicctlConfig) -> Result<()> {
    let catalog = build_catalog(args.params, args.os_family, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("Packages:");
    for pkg in &catalog.packages {
        println!("  {} ({}) ensure={}", pkg.title, pkg.name, pkg.ensure);
    }

    println!("Services:");
    for svc in &catalog.services {
        let state = match svc.ensure {
            ServiceEnsure::Running => "running",
            ServiceEnsure::Stopped => "stopped",
        };
        let enable = if svc.enable { "enabled" } else { "disabled" };
        println!("  {} ({}) {}, {}", svc.title, svc.name, state, enable);
    }

    println!("Config{}:", if catalog.purge_config { " (purge)" } else { "" });
    for entry in &catalog.config {
        println!("  {}", entry);
    }
    Ok(())
}

fn load_conf(path: &Path) -> Result<IniDocument> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "ironic.conf does not exist yet");
        return Ok(IniDocument::default());
    }
    IniDocument::load(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Replace `path` in one rename. Existing permissions are kept; a new file
/// is created 0640 since it holds credentials.
fn write_conf(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let perms = match fs::metadata(path) {
            Ok(meta) => meta.permissions(),
            Err(_) => fs::Permissions::from_mode(0o640),
        };
        tmp.as_file().set_permissions(perms)?;
    }

    tmp.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn run_apply(args: ApplyArgs, config: &IronicctlConfig) -> Result<()> {
    let catalog = build_catalog(args.params, args.os_family, config)?;
    let path = args.conf.unwrap_or_else(|| config.ironic_conf.clone());

    let mut doc = load_conf(&path)?;
    let changes = apply(&mut doc, &catalog);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
    } else if changes.is_empty() {
        println!("{} is up to date", path.display());
    } else {
        for change in &changes {
            println!("{}", change);
        }
    }

    if args.dry_run || changes.is_empty() {
        return Ok(());
    }

    write_conf(&path, &doc.render())?;

    if !args.json {
        println!("Wrote {} change(s) to {}", changes.len(), path.display());
    }
    Ok(())
}
