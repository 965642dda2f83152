//! yangkit-load - Resolves YANG modules and prints their diagnostics
//!
//! Each named module is looked up on the search path and loaded together
//! with everything it imports and includes. Diagnostics for the whole
//! dependency traversal are printed per module, either as annotated source
//! snippets or as JSON. The process exits nonzero when any requested
//! module finishes in error.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yangkit::{
    DiagnosticFormatter, LoadOptions, LoadResult, LoadStatus, Loader, SearchPaths, SourceMap,
    YangError,
};

#[derive(Parser, Debug)]
#[command(name = "yangkit-load")]
#[command(about = "Load YANG modules and print their diagnostics")]
struct Cli {
    /// Module names, or paths to .yang files
    #[arg(required = true)]
    modules: Vec<String>,

    /// Revision date to request, applied to every module listed
    #[arg(long, value_name = "YYYY-MM-DD")]
    revision: Option<String>,

    /// Extra directory searched before the standard locations (repeatable)
    #[arg(long = "path", value_name = "DIR")]
    paths: Vec<PathBuf>,

    /// Stop after the header and revision statements of each module
    #[arg(long)]
    search_only: bool,

    /// Keep modules that finished with errors available to later loads
    #[arg(long)]
    keep_partial: bool,

    /// Do not descend into subdirectories of the search locations
    #[arg(long)]
    no_subdirs: bool,

    /// Emit one JSON report per module instead of text diagnostics
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yangkit_load=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut paths = SearchPaths::from_env();
    for dir in cli.paths.iter().rev() {
        paths.modpath.insert(0, dir.clone());
    }

    let options = LoadOptions {
        search_only: cli.search_only,
        keep_partial: cli.keep_partial,
        search_subdirs: !cli.no_subdirs,
        ..LoadOptions::default()
    };

    let mut loader = Loader::new(paths);
    let mut reports = Vec::new();
    let mut failures = 0u32;

    for name in &cli.modules {
        info!("Loading module: {}", name);
        let result = loader.load(name, cli.revision.as_deref(), &options);
        if result.status == LoadStatus::Error {
            failures += 1;
        }

        if cli.json {
            reports.push(module_report(name, &result, loader.sources()));
            continue;
        }

        let formatter = DiagnosticFormatter::new(loader.sources());
        let rendered = formatter.format_all(result.diagnostics.as_slice());
        if !rendered.is_empty() {
            print!("{}", rendered);
        }
        match &result.module {
            Some(module) => println!(
                "{}: {} ({} errors, {} warnings)",
                module.name, result.status, module.errors, module.warnings
            ),
            None => println!("{}: not loaded", name),
        }
    }

    if cli.json {
        println!("{:#}", serde_json::Value::Array(reports));
    }

    if failures > 0 {
        error!("{} of {} modules finished with errors", failures, cli.modules.len());
        std::process::exit(1);
    }
}

/// Builds the JSON report for one load: requested name, outcome, the
/// header of the loaded module, and every diagnostic with its location.
fn module_report(requested: &str, result: &LoadResult, sources: &SourceMap) -> serde_json::Value {
    let module = result.module.as_ref().map(|module| {
        serde_json::json!({
            "name": module.name,
            "kind": module.kind.to_string(),
            "revision": module.version,
            "namespace": module.namespace,
            "prefix": module.prefix,
            "yang-version": module.yang_version,
            "errors": module.errors,
            "warnings": module.warnings,
        })
    });
    serde_json::json!({
        "requested": requested,
        "status": result.status.to_string(),
        "module": module,
        "diagnostics": result
            .diagnostics
            .as_slice()
            .iter()
            .map(|diagnostic| diagnostic_json(diagnostic, sources))
            .collect::<Vec<_>>(),
    })
}

fn diagnostic_json(diagnostic: &YangError, sources: &SourceMap) -> serde_json::Value {
    let mut entry = serde_json::json!({
        "severity": diagnostic.severity.to_string(),
        "kind": diagnostic.kind.name(),
        "message": diagnostic.message,
    });
    // Diagnostics raised before any file was opened have no location.
    if (diagnostic.span.file_id as usize) < sources.file_count() {
        let (line, column) = sources.line_col(&diagnostic.span);
        entry["file"] =
            serde_json::json!(sources.file_path(&diagnostic.span).display().to_string());
        entry["line"] = serde_json::json!(line);
        entry["column"] = serde_json::json!(column);
    }
    if !diagnostic.notes.is_empty() {
        entry["notes"] = serde_json::json!(diagnostic.notes);
    }
    entry
}
