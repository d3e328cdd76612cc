// Regression tests: Ensure CLI errors are rendered with miette diagnostics
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

#[test]
fn cli_reports_miette_diagnostics_on_error() {
    // Unterminated string literal
    let bad_file = "tests/bad_literal.quill";
    fs::write(bad_file, "msg(\"hello").unwrap();

    let mut cmd = Command::cargo_bin("quill").unwrap();
    cmd.arg("check").arg(bad_file);
    cmd.assert()
        .failure()
        .stderr(contains("quill::parse").or(contains("missing closing quote")));

    let _ = fs::remove_file(bad_file);
}

#[test]
fn cli_parse_prints_command_nodes_as_json() {
    let good_file = "tests/good_script.quill";
    fs::write(good_file, "msg(\"hello\")\nif (score>10) { msg(\"win\") }").unwrap();

    let mut cmd = Command::cargo_bin("quill").unwrap();
    cmd.arg("parse").arg(good_file);
    cmd.assert()
        .success()
        .stdout(contains("\"keyword\"").and(contains("score>10")));

    let _ = fs::remove_file(good_file);
}

#[test]
fn cli_check_warns_about_unknown_commands_but_succeeds() {
    let odd_file = "tests/odd_script.quill";
    fs::write(odd_file, "msg(\"a\")\nteleport(player)\nmsg(\"b\")").unwrap();

    let mut cmd = Command::cargo_bin("quill").unwrap();
    cmd.arg("check").arg(odd_file);
    cmd.assert()
        .success()
        .stdout(contains("ok: 2 command(s)"))
        .stderr(contains("teleport"));

    let _ = fs::remove_file(odd_file);
}
