//! End-to-end CLI tests covering the scenarios in §8.

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

fn flagbroker() -> Command {
    Command::cargo_bin("flagbroker").unwrap()
}

fn write_pc(dir: &std::path::Path, name: &str, body: &str) {
    std::fs::write(dir.join(format!("{}.pc", name)), body).unwrap();
}

#[test]
fn simple_cflags() {
    let tmp = TempDir::new().unwrap();
    write_pc(
        tmp.path(),
        "foo",
        "includedir=/u/inc\nName: foo\nDescription: d\nVersion: 1.0\nCflags: -I${includedir} -DFOO\n",
    );

    flagbroker()
        .env("FLAGBROKER_PATH", tmp.path())
        .args(["--cflags", "foo"])
        .assert()
        .success()
        .stdout("-I/u/inc -DFOO\n");
}

#[test]
fn cflags_only_i_filters_other_fragments() {
    let tmp = TempDir::new().unwrap();
    write_pc(
        tmp.path(),
        "foo",
        "includedir=/u/inc\nName: foo\nDescription: d\nVersion: 1.0\nCflags: -I${includedir} -DFOO\n",
    );

    flagbroker()
        .env("FLAGBROKER_PATH", tmp.path())
        .args(["--cflags-only-I", "foo"])
        .assert()
        .success()
        .stdout("-I/u/inc\n");
}

#[test]
fn transitive_diamond_dependency() {
    let tmp = TempDir::new().unwrap();
    write_pc(tmp.path(), "a", "Name: a\nDescription: d\nVersion: 1.0\nRequires: b c\nLibs: -la\n");
    write_pc(tmp.path(), "b", "Name: b\nDescription: d\nVersion: 1.0\nRequires: d\nLibs: -lb\n");
    write_pc(tmp.path(), "c", "Name: c\nDescription: d\nVersion: 1.0\nRequires: d\nLibs: -lc\n");
    write_pc(tmp.path(), "d", "Name: d\nDescription: d\nVersion: 1.0\nLibs: -L/usr/lib -ld\n");

    flagbroker()
        .env("FLAGBROKER_PATH", tmp.path())
        .args(["--libs", "a"])
        .assert()
        .success()
        .stdout("-la -lb -L/usr/lib -ld -lc\n");
}

#[test]
fn version_constraint_satisfied() {
    let tmp = TempDir::new().unwrap();
    write_pc(tmp.path(), "foo", "Name: foo\nDescription: d\nVersion: 1.2.3\n");

    flagbroker()
        .env("FLAGBROKER_PATH", tmp.path())
        .args(["--atleast-version=1.2", "foo"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn version_constraint_unsatisfied_reports_exact_wording() {
    let tmp = TempDir::new().unwrap();
    write_pc(tmp.path(), "foo", "Name: foo\nDescription: d\nVersion: 1.2.3\n");

    flagbroker()
        .env("FLAGBROKER_PATH", tmp.path())
        .args(["--print-errors", "--cflags", "foo = 1.2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Requested 'foo = 1.2' but version of foo is 1.2.3",
        ));
}

#[test]
fn unknown_module_is_silent_by_default_for_predicate() {
    let tmp = TempDir::new().unwrap();

    flagbroker()
        .env("FLAGBROKER_PATH", tmp.path())
        .args(["--exists", "nosuch"])
        .assert()
        .failure()
        .stderr(predicate::str::is_empty());
}

#[test]
fn unknown_module_with_print_errors_reports_message() {
    let tmp = TempDir::new().unwrap();

    flagbroker()
        .env("FLAGBROKER_PATH", tmp.path())
        .args(["--print-errors", "--exists", "nosuch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No package 'nosuch' found"));
}

#[test]
fn define_variable_overrides_file_value() {
    let tmp = TempDir::new().unwrap();
    write_pc(
        tmp.path(),
        "foo",
        "prefix=/usr\nName: foo\nDescription: d\nVersion: 1.0\nCflags: -I${prefix}/include\n",
    );

    flagbroker()
        .env("FLAGBROKER_PATH", tmp.path())
        .args(["--define-variable=prefix=/opt", "--cflags", "foo"])
        .assert()
        .success()
        .stdout("-I/opt/include\n");
}

#[test]
fn list_all_enumerates_every_module() {
    let tmp = TempDir::new().unwrap();
    write_pc(tmp.path(), "foo", "Name: foo\nDescription: Foo library\nVersion: 1.0\n");
    write_pc(tmp.path(), "bar", "Name: bar\nDescription: Bar library\nVersion: 1.0\n");

    flagbroker()
        .env("FLAGBROKER_PATH", tmp.path())
        .arg("--list-all")
        .assert()
        .success()
        .stdout(predicate::str::contains("foo").and(predicate::str::contains("bar")));
}

#[test]
fn static_flag_pulls_in_requires_private() {
    let tmp = TempDir::new().unwrap();
    write_pc(
        tmp.path(),
        "foo",
        "Name: foo\nDescription: d\nVersion: 1.0\nRequires.private: bar\nLibs: -lfoo\nLibs.private: -lbarstatic\n",
    );
    write_pc(tmp.path(), "bar", "Name: bar\nDescription: d\nVersion: 1.0\nLibs: -lbar\n");

    flagbroker()
        .env("FLAGBROKER_PATH", tmp.path())
        .args(["--libs", "foo"])
        .assert()
        .success()
        .stdout("-lfoo\n");

    flagbroker()
        .env("FLAGBROKER_PATH", tmp.path())
        .args(["--static", "--libs", "foo"])
        .assert()
        .success()
        .stdout("-lfoo -lbarstatic -lbar\n");
}

#[test]
fn modversion_prints_one_line_per_requested_module() {
    let tmp = TempDir::new().unwrap();
    write_pc(tmp.path(), "foo", "Name: foo\nDescription: d\nVersion: 1.0\n");
    write_pc(tmp.path(), "bar", "Name: bar\nDescription: d\nVersion: 2.0\n");

    flagbroker()
        .env("FLAGBROKER_PATH", tmp.path())
        .args(["--modversion", "foo", "bar"])
        .assert()
        .success()
        .stdout("1.0\n2.0\n");
}
