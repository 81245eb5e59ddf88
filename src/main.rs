mod descriptor;
mod engine;
mod injector;
mod ir;
mod names;
mod pointcut;
mod scanner;
mod weaver;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use crate::engine::ScanPhase;
use crate::ir::Class;

/// CLI arguments for jweave execution.
#[derive(Parser, Debug)]
#[command(
    name = "jweave",
    about = "Compile-time aspect weaver for JVM class-file IR bundles.",
    version
)]
struct Cli {
    /// JSON bundle of class IR produced by the class-file frontend.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// Where to write the woven bundle ("-" for stdout).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    #[arg(long)]
    quiet: bool,
    #[arg(long)]
    timing: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    if !cli.input.exists() {
        anyhow::bail!("input not found: {}", cli.input.display());
    }

    let started_at = Instant::now();
    let data = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let mut classes: Vec<Class> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse class bundle {}", cli.input.display()))?;

    let summary = weave_bundle(&mut classes)?;

    let mut writer = output_writer(cli.output.as_deref())?;
    serde_json::to_writer_pretty(&mut writer, &classes)
        .context("failed to serialize woven bundle")?;
    writer
        .write_all(b"\n")
        .context("failed to write woven bundle")?;

    if cli.timing && !cli.quiet {
        eprintln!(
            "timing: total_ms={} classes={} woven_methods={} insertions={} singletons={}",
            started_at.elapsed().as_millis(),
            classes.len(),
            summary.woven_methods,
            summary.insertions,
            summary.singletons
        );
    }

    Ok(())
}

/// Totals across one bundle, for the timing line.
#[derive(Debug, Default)]
struct BundleSummary {
    woven_methods: usize,
    insertions: usize,
    singletons: usize,
}

/// The two-phase protocol: scan every class, seal, then modify every class.
/// The index and class table are complete before any mutation begins, so
/// hierarchy-based pointcuts resolve regardless of enumeration order.
fn weave_bundle(classes: &mut [Class]) -> Result<BundleSummary> {
    let mut scan = ScanPhase::new();
    for class in classes.iter() {
        scan.scan(class)?;
    }
    let engine = scan.seal();

    let mut summary = BundleSummary::default();
    for class in classes.iter_mut() {
        let class_summary = engine.modify(class)?;
        summary.woven_methods += class_summary.woven_methods;
        summary.insertions += class_summary.insertions;
        if class_summary.singleton_injected {
            summary.singletons += 1;
        }
    }
    Ok(summary)
}

fn output_writer(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) if path == Path::new("-") => Ok(Box::new(io::stdout())),
        Some(path) => Ok(Box::new(
            File::create(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Ok(Box::new(io::stdout())),
    }
}
