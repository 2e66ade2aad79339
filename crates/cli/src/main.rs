use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geogen::Generator;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod provenance;
mod results;

use input::Problem;
use provenance::Payload;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Generate geometric configurations up to relabeling")]
struct Cmd {
    /// Optional run tag; propagated to the provenance sidecar and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Run a generation problem and write the results table (.csv or .parquet)
    Run {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Overrides `iterations` from the problem file
        #[arg(long)]
        iterations: Option<usize>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run {
            input,
            out,
            iterations,
        } => run(&input, &out, iterations, cmd.tag).map(|_| ()),
        Action::Report => report(cmd.tag),
    }
}

/// Returns the number of generated configurations.
fn run(input: &Path, out: &Path, iterations: Option<usize>, tag: Option<String>) -> Result<usize> {
    tracing::info!(input = %input.display(), out = %out.display(), tag = ?tag, "run");
    let problem = Problem::load(input)?;
    let prepared = problem.prepare(iterations)?;
    let catalog = prepared.catalog.clone();
    let settings = prepared.settings.clone();
    let generator = Generator::new(
        prepared.catalog,
        prepared.registry,
        prepared.initial,
        prepared.settings,
    )
    .context("setting up generation")?;
    let (configs, registry, stats) = generator.run_to_end().context("generation aborted")?;

    let mut df = results::build_table(&configs, &registry, &catalog)?;
    results::write_table(&mut df, out)?;

    let mut payload = Payload::new(serde_json::json!({
        "input": input.to_string_lossy(),
        "iterations": settings.iterations,
        "limits": problem.limits,
        "loose": problem.loose.len(),
        "constructions": problem.constructions.len(),
        "preconstructed": problem.constructed.len(),
    }));
    payload.summary = serde_json::json!({
        "yielded": stats.yielded(),
        "yielded_per_depth": stats.yielded_per_depth,
        "isomorphic": stats.isomorphic,
        "rejected_by_predicate": stats.rejected_by_predicate,
        "verbatim_duplicates": stats.verbatim_duplicates,
        "capped": stats.capped,
        "expanded": stats.expanded,
        "objects": registry.len(),
    });
    payload.tag = tag;
    provenance::write_sidecar(out, payload)?;
    Ok(configs.len())
}

fn report(tag: Option<String>) -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "engine_version": geogen::VERSION,
        "tag": tag,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PROBLEM: &str = r#"{
        "loose": [
            {"label": "A", "type": "point"},
            {"label": "B", "type": "point"},
            {"label": "C", "type": "point"}
        ],
        "constructions": [
            {"name": "Midpoint", "params": [{"set": {"of": {"object": "point"}, "count": 2}}],
             "outputs": ["point"]}
        ],
        "iterations": 3,
        "limits": {"point": 1}
    }"#;

    #[test]
    fn run_writes_table_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("triangle.json");
        std::fs::write(&input, PROBLEM).unwrap();
        let out = dir.path().join("runs/triangle.csv");
        let n = run(&input, &out, None, Some("t".into())).unwrap();
        assert_eq!(n, 1);
        assert!(out.exists());
        let sidecar = dir.path().join("runs/triangle.provenance.json");
        let doc: serde_json::Value =
            serde_json::from_slice(&std::fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(doc["summary"]["yielded"], 1);
        assert_eq!(doc["params"]["limits"]["point"], 1);
    }

    #[test]
    fn zero_iterations_fail_with_context() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("triangle.json");
        std::fs::write(&input, PROBLEM).unwrap();
        let err = run(&input, &dir.path().join("out.csv"), Some(0), None)
            .err()
            .unwrap();
        assert!(format!("{err:#}").contains("iterations"));
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempdir().unwrap();
        let err = run(&dir.path().join("nope.json"), &dir.path().join("o.csv"), None, None)
            .err()
            .unwrap();
        assert!(format!("{err:#}").contains("reading"));
    }
}
