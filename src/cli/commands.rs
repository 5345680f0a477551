//! Subcommand implementations.
//!
//! Every command renders into a `String`; the binary prints it. Color is
//! applied only when enabled so tests can compare plain text.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::fmt::{Display, Write as _};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;
use typestore_core::{
    BuildOptions, DispatchHit, DispatchStats, DispatchTable, Manifest, MemberDispatch,
    MetadataStore, StoreBuilder, TypeDescriptor, TypeHandle, TypeLink,
};

use super::args::{CliArgs, Command, MemberKind};

/// Output styling.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    color: bool,
}

impl Style {
    pub fn new(color: bool) -> Self {
        Style { color }
    }

    fn heading(self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn key(self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn note(self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Run a parsed command line and return its output.
pub fn run(args: &CliArgs) -> Result<String> {
    let options = if args.strict {
        BuildOptions::strict()
    } else {
        BuildOptions::default()
    };
    let store = load_store(args.command.manifest(), options)?;
    let style = Style::new(!args.no_color);

    match &args.command {
        Command::Types { .. } => Ok(render_types(&store, style)),
        Command::Show { type_name, .. } => {
            let ty = find_type(&store, type_name)?;
            Ok(render_type(&store, &ty, style))
        }
        Command::Lookup {
            type_name,
            member,
            kind,
            ..
        } => {
            let ty = find_type(&store, type_name)?;
            lookup(&store, &ty, member, *kind, style)
        }
        Command::Dispatch {
            type_name, kind, ..
        } => {
            let ty = find_type(&store, type_name)?;
            Ok(render_dispatch(&store, &ty, *kind, style))
        }
    }
}

/// Read a manifest file and build a store from it.
pub fn load_store(path: &Path, options: BuildOptions) -> Result<MetadataStore> {
    let file = File::open(path)
        .with_context(|| format!("failed to open manifest {}", path.display()))?;
    let manifest = Manifest::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to read manifest {}", path.display()))?;

    let mut builder = StoreBuilder::with_options(options);
    builder
        .load_manifest(&manifest)
        .with_context(|| format!("failed to populate store from {}", path.display()))?;
    let store = builder
        .build()
        .with_context(|| format!("inconsistent manifest {}", path.display()))?;
    debug!(path = %path.display(), types = store.len(), "manifest loaded");
    Ok(store)
}

fn find_type<'s>(store: &'s MetadataStore, name: &str) -> Result<TypeHandle<'s>> {
    store
        .type_by_name(name)
        .with_context(|| format!("no type named '{name}'"))
}

// =============================================================================
// Rendering
// =============================================================================

fn kind_label(ty: &TypeDescriptor) -> String {
    let mut parts = Vec::new();
    if ty.is_value_type() {
        parts.push("value");
    }
    if ty.is_reference_type() {
        parts.push("reference");
    }
    if ty.is_generic_type() {
        parts.push("generic");
    }
    if ty.is_nullable() {
        parts.push("nullable");
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" ")
    }
}

/// How a type reference reads in listings.
fn link_label(store: &MetadataStore, link: &TypeLink) -> String {
    let target = store.resolve_link(link);
    if target.is_fallback() {
        format!("'{}'", target.name)
    } else if target.is_valid() {
        target.full_name.to_string()
    } else {
        format!("{} (unregistered)", link)
    }
}

fn render_types(store: &MetadataStore, style: Style) -> String {
    let mut out = String::new();
    for ty in store.all_types() {
        let key = format!("{:>10}", ty.key.to_string());
        let _ = writeln!(
            out,
            "{}  {}  [{}]  {}",
            style.key(&key),
            ty.full_name,
            kind_label(&ty),
            style.note(&format!(
                "{} fields, {} properties, {} methods",
                ty.field_keys.len(),
                ty.property_keys.len(),
                ty.method_keys.len()
            )),
        );
    }
    let _ = writeln!(out, "{} types", store.len());
    out
}

fn render_type(store: &MetadataStore, ty: &TypeHandle<'_>, style: Style) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({})",
        style.heading(&ty.full_name),
        style.key(&ty.key.to_string())
    );
    let _ = writeln!(out, "  name: {}", ty.name);
    let _ = writeln!(out, "  qualified: {}", ty.assembly_qualified_name);
    let _ = writeln!(out, "  kind: {}", kind_label(ty));
    if let Some(underlying) = &ty.underlying_type {
        let _ = writeln!(out, "  underlying: {}", link_label(store, underlying));
    }
    if let Some(arguments) = &ty.generic_type_arguments {
        let labels: Vec<String> = arguments.iter().map(|a| link_label(store, a)).collect();
        let _ = writeln!(out, "  type arguments: {}", labels.join(", "));
    }

    let _ = writeln!(out, "{}", style.heading("fields:"));
    let fields = ty.fields();
    if fields.is_empty() {
        let _ = writeln!(out, "  {}", style.note("(none)"));
    }
    for field in &fields {
        let read_only = if field.is_read_only { " [read-only]" } else { "" };
        let _ = writeln!(
            out,
            "  {}: {}{}",
            field.name,
            link_label(store, &field.field_type),
            read_only
        );
    }

    let _ = writeln!(out, "{}", style.heading("properties:"));
    let properties = ty.properties();
    if properties.is_empty() {
        let _ = writeln!(out, "  {}", style.note("(none)"));
    }
    for property in &properties {
        let access = match (property.can_read(), property.can_write()) {
            (true, true) => "get; set",
            (true, false) => "get",
            (false, true) => "set",
            (false, false) => "-",
        };
        let _ = writeln!(
            out,
            "  {}: {} {{ {} }}",
            property.name,
            link_label(store, &property.property_type),
            access
        );
    }

    let _ = writeln!(out, "{}", style.heading("methods:"));
    let methods = ty.methods();
    if methods.is_empty() {
        let _ = writeln!(out, "  {}", style.note("(none)"));
    }
    for method in &methods {
        let parameters: Vec<String> = method
            .parameter_types
            .iter()
            .map(|p| link_label(store, p))
            .collect();
        let _ = writeln!(
            out,
            "  {}{}({}) -> {}",
            if method.is_static { "static " } else { "" },
            method.name,
            parameters.join(", "),
            link_label(store, &method.return_type)
        );
    }
    out
}

fn hit_line<K: Display>(kind: MemberKind, name: &str, hit: &DispatchHit<K>, type_label: &str) -> String {
    let plural = if hit.comparisons == 1 { "" } else { "s" };
    format!(
        "{} {} -> {}: {} ({} tier, {} comparison{})",
        kind.as_str(),
        name,
        hit.key,
        type_label,
        hit.tier,
        hit.comparisons,
        plural
    )
}

fn lookup(
    store: &MetadataStore,
    ty: &TypeHandle<'_>,
    member: &str,
    kind: Option<MemberKind>,
    style: Style,
) -> Result<String> {
    let empty = MemberDispatch::default();
    let dispatch = store.dispatch(ty.key).unwrap_or(&empty);

    let mut out = String::new();
    for kind in MemberKind::selection(kind) {
        let line = match kind {
            MemberKind::Field => dispatch.fields.probe(member).map(|hit| {
                let field = store.get_field(hit.key);
                hit_line(*kind, member, &hit, &link_label(store, &field.field_type))
            }),
            MemberKind::Property => dispatch.properties.probe(member).map(|hit| {
                let property = store.get_property(hit.key);
                hit_line(*kind, member, &hit, &link_label(store, &property.property_type))
            }),
            MemberKind::Method => dispatch.methods.probe(member).map(|hit| {
                let method = store.get_method(hit.key);
                hit_line(*kind, member, &hit, &link_label(store, &method.return_type))
            }),
        };
        if let Some(line) = line {
            let _ = writeln!(out, "{}", style.key(&line));
        }
    }

    if out.is_empty() {
        bail!("{} has no member named '{}'", ty.full_name, member);
    }
    Ok(out)
}

fn stats_line(stats: DispatchStats) -> String {
    format!(
        "{} names, {} length buckets, {} char groups, {} hashed",
        stats.names, stats.length_buckets, stats.char_groups, stats.hashed_names
    )
}

fn plan_section<K: Copy + Display>(
    out: &mut String,
    title: &str,
    table: &DispatchTable<K>,
    style: Style,
) {
    let _ = writeln!(out, "{}", style.heading(title));
    let _ = writeln!(out, "{}", style.note(&stats_line(table.stats())));
    out.push_str(&table.plan());
}

fn render_dispatch(
    store: &MetadataStore,
    ty: &TypeHandle<'_>,
    kind: Option<MemberKind>,
    style: Style,
) -> String {
    let empty = MemberDispatch::default();
    let dispatch = store.dispatch(ty.key).unwrap_or(&empty);

    let mut out = String::new();
    for kind in MemberKind::selection(kind) {
        let title = format!("{} of {}:", kind.plural(), ty.full_name);
        match kind {
            MemberKind::Field => plan_section(&mut out, &title, &dispatch.fields, style),
            MemberKind::Property => plan_section(&mut out, &title, &dispatch.properties, style),
            MemberKind::Method => plan_section(&mut out, &title, &dispatch.methods, style),
        }
    }
    out
}
