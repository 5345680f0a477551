use super::args::{CliArgs, Command, MemberKind};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn parses_types_subcommand() {
    let args = CliArgs::try_parse_from(["typestore", "types", "people.json"]).unwrap();
    assert!(!args.strict);
    assert!(!args.no_color);
    assert_eq!(
        args.command,
        Command::Types {
            manifest: PathBuf::from("people.json")
        }
    );
}

#[test]
fn parses_lookup_with_kind_and_global_flags() {
    let args = CliArgs::try_parse_from([
        "typestore",
        "lookup",
        "people.json",
        "Demo.Person",
        "Age",
        "--kind",
        "property",
        "--strict",
        "--no-color",
    ])
    .unwrap();
    assert!(args.strict);
    assert!(args.no_color);
    assert_eq!(
        args.command,
        Command::Lookup {
            manifest: PathBuf::from("people.json"),
            type_name: "Demo.Person".to_string(),
            member: "Age".to_string(),
            kind: Some(MemberKind::Property),
        }
    );
    assert_eq!(args.command.manifest(), &PathBuf::from("people.json"));
}

#[test]
fn rejects_missing_type_argument() {
    assert!(CliArgs::try_parse_from(["typestore", "show", "people.json"]).is_err());
    assert!(CliArgs::try_parse_from(["typestore", "dispatch"]).is_err());
}

#[test]
fn member_kind_selection() {
    assert_eq!(MemberKind::selection(None).len(), 3);
    assert_eq!(
        MemberKind::selection(Some(MemberKind::Method)),
        &[MemberKind::Method]
    );
}

#[test]
fn command_definition_is_consistent() {
    use clap::CommandFactory;
    CliArgs::command().debug_assert();
}
