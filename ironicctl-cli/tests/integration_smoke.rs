//! Smoke tests for the ironicctl binary

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const IRONIC_CONF: &str = "\
[DEFAULT]
auth_strategy = keystone

[keystone_authtoken]
project_name = admin_tenant
username = admin
password = password
auth_url = https://192.168.56.210:5000/
project_domain_name = admin_tenant_domain
user_domain_name = admin_domain
";

fn ironicctl(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ironicctl").unwrap();
    cmd.env("IRONICCTL_CONFIG", home.join("config.toml"));
    cmd.env_remove("RUST_LOG");
    cmd
}

// === Help ===

#[test]
fn test_list_help() {
    let dir = TempDir::new().unwrap();
    ironicctl(dir.path())
        .args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resource type"));
}

#[test]
fn test_apply_help() {
    let dir = TempDir::new().unwrap();
    ironicctl(dir.path())
        .args(["apply", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("without writing ironic.conf"));
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    ironicctl(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ironicctl"));
}

// === Credentials ===

#[test]
fn test_list_without_credentials_fails() {
    let dir = TempDir::new().unwrap();
    let conf = dir.path().join("ironic.conf");
    fs::write(&conf, "[DEFAULT]\nauth_strategy = keystone\n").unwrap();

    ironicctl(dir.path())
        .args(["list", "node", "--conf"])
        .arg(&conf)
        .assert()
        .failure()
        .stderr(predicate::str::contains("will not work"));
}

// === Fake ironic CLI ===

#[cfg(unix)]
fn fake_ironic(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("ironic");
    fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let conf = dir.join("ironic.conf");
    fs::write(&conf, IRONIC_CONF).unwrap();

    fs::write(
        dir.join("config.toml"),
        format!(
            "ironic_conf = {:?}\nprogram = {:?}\n\n[retry]\ndelay_secs = 0\nmax_retries = 3\n",
            conf.display().to_string(),
            script.display().to_string()
        ),
    )
    .unwrap();
    script
}

#[cfg(unix)]
#[test]
fn test_list_through_fake_cli() {
    let dir = TempDir::new().unwrap();
    fake_ironic(
        dir.path(),
        r#"[ "$OS_USERNAME" = admin ] || { echo "(HTTP 401)" >&2; exit 1; }
[ "$1" = node-list ] || exit 3
printf '        id\n        node-1\n        node-2\n'"#,
    );

    ironicctl(dir.path())
        .args(["list", "node"])
        .assert()
        .success()
        .stdout("node-1\nnode-2\n");
}

#[cfg(unix)]
#[test]
fn test_transient_failure_is_retried() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("attempted");
    fake_ironic(
        dir.path(),
        &format!(
            r#"if [ ! -e {m} ]; then touch {m}; echo "[Errno 111] Connection refused" >&2; exit 1; fi
printf 'id\nport-1\n'"#,
            m = marker.display()
        ),
    );

    ironicctl(dir.path())
        .args(["list", "port"])
        .assert()
        .success()
        .stdout("port-1\n");
    assert!(marker.exists());
}

#[cfg(unix)]
#[test]
fn test_other_failures_surface() {
    let dir = TempDir::new().unwrap();
    fake_ironic(
        dir.path(),
        r#"echo "Node nope could not be found. (HTTP 404)" >&2; exit 1"#,
    );

    ironicctl(dir.path())
        .args(["show", "node", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("(HTTP 404)"));
}

#[cfg(unix)]
#[test]
fn test_exec_passes_arguments() {
    let dir = TempDir::new().unwrap();
    fake_ironic(dir.path(), r#"echo "$@""#);

    ironicctl(dir.path())
        .args(["exec", "--", "node-list", "--detail"])
        .assert()
        .success()
        .stdout("node-list --detail\n");
}

// === Catalog ===

#[test]
fn test_catalog_text_redacts_secrets() {
    let dir = TempDir::new().unwrap();
    let params = dir.path().join("params.toml");
    fs::write(
        &params,
        "[ironic]\ndatabase_connection = \"mysql+pymysql://ironic:hunter2@db/ironic\"\n\n[conductor]\n",
    )
    .unwrap();

    ironicctl(dir.path())
        .args(["catalog", "--os-family", "redhat", "--params"])
        .arg(&params)
        .assert()
        .success()
        .stdout(predicate::str::contains("ironic-common (openstack-ironic-common)"))
        .stdout(predicate::str::contains("DEFAULT/auth_strategy = keystone"))
        .stdout(predicate::str::contains("database/connection = [redacted]"))
        .stdout(predicate::str::contains("DEFAULT/enabled_drivers = pxe_ipmitool"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_catalog_rejects_unknown_parameters() {
    let dir = TempDir::new().unwrap();
    let params = dir.path().join("params.toml");
    fs::write(&params, "[ironic]\nno_such_option = 1\n").unwrap();

    ironicctl(dir.path())
        .args(["catalog", "--params"])
        .arg(&params)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_such_option"));
}

#[test]
fn test_apply_dry_run_then_write() {
    let dir = TempDir::new().unwrap();
    let conf = dir.path().join("ironic.conf");
    fs::write(&conf, "[DEFAULT]\nauth_strategy = noauth\nmy_ip = 10.0.0.5\n").unwrap();
    let params = dir.path().join("params.toml");
    fs::write(&params, "[drivers.ipmi]\ndebug = true\n").unwrap();

    ironicctl(dir.path())
        .args(["apply", "--dry-run", "--params"])
        .arg(&params)
        .arg("--conf")
        .arg(&conf)
        .assert()
        .success()
        .stdout(predicate::str::contains("~ DEFAULT/auth_strategy: noauth -> keystone"))
        .stdout(predicate::str::contains("- DEFAULT/my_ip (was 10.0.0.5)"))
        .stdout(predicate::str::contains("+ ipmi/debug = true"));
    assert!(fs::read_to_string(&conf).unwrap().contains("noauth"));

    ironicctl(dir.path())
        .args(["apply", "--params"])
        .arg(&params)
        .arg("--conf")
        .arg(&conf)
        .assert()
        .success();
    let written = fs::read_to_string(&conf).unwrap();
    assert!(written.contains("auth_strategy = keystone"));
    assert!(!written.contains("my_ip"));
    assert!(written.contains("[ipmi]\ndebug = true"));

    ironicctl(dir.path())
        .args(["apply", "--params"])
        .arg(&params)
        .arg("--conf")
        .arg(&conf)
        .assert()
        .success()
        .stdout(predicate::str::contains("is up to date"));
}

#[cfg(unix)]
#[test]
fn test_apply_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let conf = dir.path().join("etc/ironic/ironic.conf");

    ironicctl(dir.path())
        .arg("apply")
        .arg("--conf")
        .arg(&conf)
        .assert()
        .success();
    let mode = fs::metadata(&conf).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o640);
    assert!(fs::read_to_string(&conf)
        .unwrap()
        .contains("auth_strategy = keystone"));

    fs::write(&conf, "[DEFAULT]\nauth_strategy = noauth\n").unwrap();
    fs::set_permissions(&conf, fs::Permissions::from_mode(0o600)).unwrap();
    ironicctl(dir.path())
        .arg("apply")
        .arg("--conf")
        .arg(&conf)
        .assert()
        .success();
    let mode = fs::metadata(&conf).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);

    // only ironic.conf is left behind
    let entries: Vec<_> = fs::read_dir(conf.parent().unwrap()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_apply_rejects_multiline_values() {
    let dir = TempDir::new().unwrap();
    let conf = dir.path().join("ironic.conf");
    fs::write(&conf, "[DEFAULT]\nauth_strategy = keystone\n").unwrap();
    let params = dir.path().join("params.toml");
    fs::write(&params, "[drivers.ipmi]\ndebug = \"a\\nb\"\n").unwrap();

    ironicctl(dir.path())
        .args(["apply", "--params"])
        .arg(&params)
        .arg("--conf")
        .arg(&conf)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ipmi/debug"));
    assert_eq!(
        fs::read_to_string(&conf).unwrap(),
        "[DEFAULT]\nauth_strategy = keystone\n"
    );
}

// === Config ===

#[test]
fn test_config_path_honours_env() {
    let dir = TempDir::new().unwrap();
    ironicctl(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
