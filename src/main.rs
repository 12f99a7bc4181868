use clap::{Parser, ValueEnum};
use std::path::PathBuf;

mod filter;
mod render;
mod report;
mod snapshot;

use report::ReportPass;

pub type Result<T> = anyhow::Result<T>;

/// Traits diffed when no `--trait` is given: one per analysis in the
/// catalog-producing suite.
const DEFAULT_TRAITS: [&str; 16] = [
    "CMakeParser",
    "Import",
    "PublicInheritance",
    "Typedef",
    "Equatable",
    "Comparable",
    "Hashable",
    "CustomStringConvertible",
    "FindSendableDependencies",
    "Sendable",
    "FindEnums",
    "FindStaticTokens",
    "FindTfNoticeSubclasses",
    "FindSchemas",
    "SdfValueTypeNamesMembers",
    "APINotes",
];

const FILTER_LONG_HELP: &str = "\
Only report types the filter matches (the kind diff pass is unaffected).
Grammar:

  expr              := term (('&' | '|') term)*
  term              := atomic | '(' expr ')'
  atomic            := '!'? element '.' predicate
  element           := 'type' | 'kind.old' | 'kind.new'
  logical predicate := is_added | is_removed | is_pxr | is_stl | changed_kind
  string predicate  := (is | starts_with | ends_with | contains) ':' argument

'&' binds tighter than '|'; at most one parenthesized group per nesting
level. '\\' escapes the next character, so spaces and operator characters
can appear inside arguments. Logical predicates apply to 'type' only.
The argument runs to the end of the atom and may be empty. An empty
filter matches every type.";

#[derive(Parser)]
#[command(name = "catalog-diff")]
#[command(about = "Reports classification changes between catalog snapshots", long_about = None)]
struct Cli {
    /// Root directory of the new snapshot.
    new_path: PathBuf,

    /// Root directory of the old snapshot.
    old_path: PathBuf,

    /// Trait whose catalog file to diff under each root. Repeatable.
    #[arg(long = "trait", value_name = "NAME", default_values_t = DEFAULT_TRAITS.map(String::from))]
    traits: Vec<String>,

    /// Reporting pass to run. Repeatable, runs in the given order.
    #[arg(long = "pass", value_name = "PASS", value_enum, default_values_t = ReportPass::ALL)]
    passes: Vec<ReportPass>,

    /// Filter expression selecting which types to report.
    #[arg(long, default_value = "", long_help = FILTER_LONG_HELP)]
    filter: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Pass blocks on stdout.
    Text,
    /// One JSON array of per-trait reports.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Compile the filter once; a bad filter fails before any file I/O.
    let filter = filter::compile(&cli.filter)?;

    let mut trait_reports = Vec::new();
    for trait_name in &cli.traits {
        // 2) Locate + load the trait's catalog under both roots.
        let new_file = snapshot::find_trait_file(&cli.new_path, trait_name)?;
        let old_file = snapshot::find_trait_file(&cli.old_path, trait_name)?;

        for path in [&new_file, &old_file] {
            match cli.format {
                OutputFormat::Text => println!("Loading {}...", path.display()),
                OutputFormat::Json => eprintln!("Loading {}...", path.display()),
            }
        }
        let new = snapshot::load_snapshot(&new_file)?;
        let old = snapshot::load_snapshot(&old_file)?;

        // 3) Run the requested passes.
        let engine = report::DiffEngine::new(&old, &new, &filter);
        let passes: Vec<report::PassReport> =
            cli.passes.iter().map(|&pass| engine.run(pass)).collect();

        // 4) Render.
        match cli.format {
            OutputFormat::Text => {
                println!();
                print!("{}", render::render_text(&passes));
            }
            OutputFormat::Json => trait_reports.push(render::TraitReport {
                trait_name: trait_name.clone(),
                passes,
            }),
        }
    }

    if cli.format == OutputFormat::Json {
        println!("{}", render::render_json(&trait_reports)?);
    }

    Ok(())
}
