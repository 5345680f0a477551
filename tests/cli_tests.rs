//! End-to-end tests for the `typestore` subcommands.
//!
//! Each test writes a manifest into a temporary directory and runs the
//! parsed command line through `commands::run` with color disabled.

use clap::Parser;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use typestore::cli::args::CliArgs;
use typestore::cli::commands;

const PEOPLE: &str = include_str!("fixtures/people.json");

fn write_manifest(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write manifest");
    path
}

fn run(args: &[&str]) -> anyhow::Result<String> {
    let mut argv = vec!["typestore", "--no-color"];
    argv.extend_from_slice(args);
    let args = CliArgs::try_parse_from(argv).expect("valid command line");
    commands::run(&args)
}

fn people() -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_manifest(dir.path(), "people.json", PEOPLE);
    (dir, path.to_string_lossy().into_owned())
}

#[test]
fn types_lists_every_type() {
    let (_dir, manifest) = people();
    let output = run(&["types", &manifest]).unwrap();

    assert!(output.contains("type#1  Demo.Person  [reference]  1 fields, 5 properties, 2 methods"));
    assert!(output.contains("System.Nullable`1[System.Int32]  [value generic nullable]"));
    assert!(output.ends_with("4 types\n"));
}

#[test]
fn show_renders_members_with_resolved_types() {
    let (_dir, manifest) = people();
    let output = run(&["show", &manifest, "Person"]).unwrap();

    assert!(output.starts_with("Demo.Person (type#1)\n"));
    assert!(output.contains("  qualified: Demo.Person, Demo\n"));
    assert!(output.contains("  _id: System.Int32 [read-only]\n"));
    assert!(output.contains("  Name: System.String { get; set }\n"));
    assert!(output.contains("  Alias: System.String { get }\n"));
    assert!(output.contains("  Score: System.Nullable`1[System.Int32] { get; set }\n"));
    assert!(output.contains("  Alive: 'Boolean' { get; set }\n"));
    assert!(output.contains("  Greet(Demo.Person) -> 'Void'\n"));
    assert!(output.contains("  static Parse('String') -> Demo.Person\n"));
}

#[test]
fn show_nullable_type() {
    let (_dir, manifest) = people();
    let output = run(&["show", &manifest, "System.Nullable`1[System.Int32]"]).unwrap();
    assert!(output.contains("  underlying: System.Int32\n"));
    assert!(output.contains("  type arguments: System.Int32\n"));
    assert!(output.contains("fields:\n  (none)\n"));
}

#[test]
fn lookup_reports_dispatch_tier() {
    let (_dir, manifest) = people();

    let age = run(&["lookup", &manifest, "Demo.Person", "Age"]).unwrap();
    assert_eq!(
        age,
        "property Age -> property#11: System.Int32 (length tier, 1 comparison)\n"
    );

    let score = run(&["lookup", &manifest, "Demo.Person", "Score"]).unwrap();
    assert!(score.contains("(first-char tier, 1 comparison)"));

    let alive = run(&["lookup", &manifest, "Demo.Person", "Alive"]).unwrap();
    assert!(alive.starts_with("property Alive -> property#14: 'Boolean' (hash-confirmed tier"));
}

#[test]
fn lookup_restricted_to_one_kind() {
    let (_dir, manifest) = people();
    let err = run(&["lookup", &manifest, "Person", "Age", "--kind", "field"]).unwrap_err();
    assert_eq!(err.to_string(), "Demo.Person has no member named 'Age'");

    let parse = run(&["lookup", &manifest, "Person", "Parse", "--kind", "method"]).unwrap();
    assert!(parse.starts_with("method Parse -> method#21: Demo.Person"));
}

#[test]
fn lookup_missing_member_fails() {
    let (_dir, manifest) = people();
    let err = run(&["lookup", &manifest, "Person", "Missing"]).unwrap_err();
    assert!(err.to_string().contains("no member named 'Missing'"));
}

#[test]
fn dispatch_prints_plan_per_kind() {
    let (_dir, manifest) = people();
    let output = run(&["dispatch", &manifest, "Person", "--kind", "property"]).unwrap();

    assert!(output.starts_with("properties of Demo.Person:\n"));
    assert!(output.contains("5 names, 3 length buckets, 4 char groups, 2 hashed\n"));
    assert!(output.contains("len 5 (3 names)\n  first 'A'\n    hash "));
    assert!(output.contains("  first 'S'\n    == \"Score\" -> property#13\n"));
    assert!(!output.contains("fields of"));
}

#[test]
fn unknown_type_fails() {
    let (_dir, manifest) = people();
    let err = run(&["show", &manifest, "Nope"]).unwrap_err();
    assert_eq!(err.to_string(), "no type named 'Nope'");
}

#[test]
fn missing_manifest_fails_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let err = run(&["types", &missing.to_string_lossy()]).unwrap_err();
    assert!(err.to_string().starts_with("failed to open manifest"));
}

#[test]
fn strict_mode_rejects_dangling_references() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_manifest(
        dir.path(),
        "dangling.json",
        r#"{
          "types": [ { "id": 1, "name": "Node", "is_reference_type": true } ],
          "fields": [ { "id": 1, "owner": 1, "name": "next", "type": 99 } ]
        }"#,
    );
    let manifest = manifest.to_string_lossy().into_owned();

    let lenient = run(&["show", &manifest, "Node"]).unwrap();
    assert!(lenient.contains("  next: type#99 (unregistered)\n"));

    let err = run(&["--strict", "show", &manifest, "Node"]).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("inconsistent manifest"));
    assert!(chain.contains("field#1 references unregistered type#99"));
}
