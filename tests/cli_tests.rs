//! Tests for the atlaskv-stats binary

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{put, setup_data_dir, write_values, write_wal};

fn stats_cmd() -> Command {
    let mut cmd = Command::cargo_bin("atlaskv-stats").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_prints_report() {
    let (_temp, data_dir) = setup_data_dir();
    write_values(
        &data_dir,
        1,
        &[("s/k:bank/addr1", "0123456789"), ("other-key", "abcde")],
    );
    write_wal(&data_dir, vec![put("s/k:governance/p1", "x")]);

    stats_cmd()
        .arg(&data_dir)
        .arg("--ascii")
        .assert()
        .success()
        .stdout(predicate::str::contains("AtlasKV store:"))
        .stdout(predicate::str::contains("bank"))
        .stdout(predicate::str::contains("governance"))
        .stdout(predicate::str::contains("misc"))
        .stdout(predicate::str::contains("Total"));
}

#[test]
fn test_cli_skip_wal() {
    let (_temp, data_dir) = setup_data_dir();
    write_wal(&data_dir, vec![put("s/k:governance/p1", "x")]);

    stats_cmd()
        .arg(&data_dir)
        .arg("--skip-wal")
        .assert()
        .success()
        .stdout(predicate::str::contains("governance").not());
}

#[test]
fn test_cli_missing_store_fails() {
    let (_temp, data_dir) = setup_data_dir();

    stats_cmd()
        .arg(data_dir.join("absent"))
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to open store"));
}
