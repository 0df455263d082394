//! End-to-end CLI tests driving the compiled `csvfix` binary through
//! `assert_cmd`, following `markschl-seqtool/src/test/mod.rs`'s `Tester`
//! harness shape (one module per command group, a shared helper here).

use assert_cmd::Command;

/// Runs `csvfix` with `args`, feeding `input` on stdin, and asserts the
/// exit succeeds with stdout exactly `expected`.
fn cmp(args: &[&str], input: &str, expected: &str) {
    Command::cargo_bin("csvfix")
        .unwrap()
        .args(args)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(expected.to_string());
}

/// Like `cmp`, but only checks the command fails and stderr contains `msg`.
fn fails(args: &[&str], input: &str, msg: &str) {
    Command::cargo_bin("csvfix")
        .unwrap()
        .args(args)
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicates::str::contains(msg));
}

mod eval;
mod find;
mod flatten;
mod fmerge;
mod sort;
mod sql;
