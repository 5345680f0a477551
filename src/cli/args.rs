use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the typestore binary.
#[derive(Parser, Debug)]
#[command(
    name = "typestore",
    version,
    about = "Inspect type metadata manifests and their member dispatch tables"
)]
pub struct CliArgs {
    /// Reject dangling type references and members of unregistered types.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Disable colored output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every type in a manifest.
    Types {
        /// Path to the JSON manifest.
        manifest: PathBuf,
    },

    /// Show one type with its members.
    Show {
        manifest: PathBuf,
        /// Full or simple type name.
        #[arg(value_name = "TYPE")]
        type_name: String,
    },

    /// Resolve a member name through the type's dispatch table.
    Lookup {
        manifest: PathBuf,
        #[arg(value_name = "TYPE")]
        type_name: String,
        member: String,
        /// Only search one member kind.
        #[arg(long, value_enum)]
        kind: Option<MemberKind>,
    },

    /// Print the dispatch plan of a type.
    Dispatch {
        manifest: PathBuf,
        #[arg(value_name = "TYPE")]
        type_name: String,
        #[arg(long, value_enum)]
        kind: Option<MemberKind>,
    },
}

impl Command {
    pub fn manifest(&self) -> &PathBuf {
        match self {
            Command::Types { manifest }
            | Command::Show { manifest, .. }
            | Command::Lookup { manifest, .. }
            | Command::Dispatch { manifest, .. } => manifest,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Property,
    Method,
}

impl MemberKind {
    pub const ALL: [MemberKind; 3] = [MemberKind::Field, MemberKind::Property, MemberKind::Method];

    /// The requested kind, or every kind.
    pub fn selection(kind: Option<MemberKind>) -> &'static [MemberKind] {
        match kind {
            Some(MemberKind::Field) => &[MemberKind::Field],
            Some(MemberKind::Property) => &[MemberKind::Property],
            Some(MemberKind::Method) => &[MemberKind::Method],
            None => &Self::ALL,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            MemberKind::Field => "field",
            MemberKind::Property => "property",
            MemberKind::Method => "method",
        }
    }

    pub const fn plural(self) -> &'static str {
        match self {
            MemberKind::Field => "fields",
            MemberKind::Property => "properties",
            MemberKind::Method => "methods",
        }
    }
}
