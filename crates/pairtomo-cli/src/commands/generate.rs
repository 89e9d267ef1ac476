//! Generate command implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use pairtomo_ir::Circuit;
use pairtomo_tomography::{
    PairwiseTomography, QubitSelector, SettingOrigin, TomographyVariant, compact_label,
    verify_pairwise_coverage,
};
use serde::Serialize;

use super::common::{Preparation, build_preparation, ensure_dir, load_circuit, render};
use crate::config::{Config, OutputFormat};

/// Arguments of the generate command.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Preparation circuit as JSON
    #[arg(short, long, required_unless_present = "prep", conflicts_with = "prep")]
    pub input: Option<PathBuf>,

    /// Built-in preparation circuit
    #[arg(long, value_enum)]
    pub prep: Option<Preparation>,

    /// Number of qubits for the built-in preparation
    #[arg(short = 'n', long, default_value = "2")]
    pub qubits: u32,

    /// Qubits to measure: `all`, register names, or qubit indices (comma-separated)
    #[arg(short, long, default_value = "all")]
    pub measure: String,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Directory to write one file per variant into (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name of the classical register holding the outcomes (overrides config)
    #[arg(long)]
    pub creg: Option<String>,

    /// Check that the generated circuits cover every qubit pair
    #[arg(long)]
    pub verify: bool,
}

/// One written variant, as recorded in `manifest.json`.
#[derive(Debug, Serialize)]
struct ManifestEntry {
    index: usize,
    label: String,
    file: String,
    origin: SettingOrigin,
    num_ops: usize,
    depth: usize,
    gate_counts: BTreeMap<&'static str, usize>,
}

/// Index of all files written by one run.
#[derive(Debug, Serialize)]
struct Manifest {
    circuit: String,
    measured_qubits: Vec<u32>,
    register: String,
    format: OutputFormat,
    generated_at: DateTime<Utc>,
    variants: Vec<ManifestEntry>,
}

/// Execute the generate command.
pub fn execute(args: &GenerateArgs, config: &Config) -> Result<()> {
    let base = match (&args.input, args.prep) {
        (Some(path), _) => load_circuit(path)?,
        (None, Some(prep)) => build_preparation(prep, args.qubits)?,
        (None, None) => anyhow::bail!("Either --input or --prep is required"),
    };

    let selector: QubitSelector = args
        .measure
        .parse()
        .with_context(|| format!("Invalid --measure value: '{}'", args.measure))?;
    let register = args.creg.clone().unwrap_or_else(|| config.creg.clone());
    let format = args.format.unwrap_or(config.format);
    let output = args.output.clone().or_else(|| config.output_dir.clone());

    println!(
        "{} Generating pairwise tomography circuits for {} ({} qubits, measuring {})",
        style("→").cyan().bold(),
        style(base.name()).green(),
        base.num_qubits(),
        style(&selector).yellow()
    );

    let variants = PairwiseTomography::new()
        .with_register_name(register.as_str())
        .generate(&base, &selector)
        .context("Failed to generate tomography circuits")?;

    let measured: Vec<u32> = variants
        .first()
        .map(|v| v.measured_qubits().iter().map(|q| q.0).collect())
        .unwrap_or_default();
    println!(
        "  {} variants over {} measured qubits",
        variants.len(),
        measured.len()
    );

    if args.verify {
        verify(&variants)?;
    }

    match output {
        Some(dir) => {
            let manifest = Manifest {
                circuit: base.name().to_string(),
                measured_qubits: measured,
                register,
                format,
                generated_at: Utc::now(),
                variants: write_variants(&variants, &dir, format)?,
            };
            let path = dir.join("manifest.json");
            let json = serde_json::to_string_pretty(&manifest)?;
            fs::write(&path, json)
                .with_context(|| format!("Failed to write manifest: {}", path.display()))?;

            println!(
                "{} Wrote {} circuits to {}",
                style("✓").green().bold(),
                manifest.variants.len(),
                style(dir.display()).green()
            );
        }
        None => print_summary(&base, &variants),
    }

    Ok(())
}

fn verify(variants: &[TomographyVariant]) -> Result<()> {
    let report = verify_pairwise_coverage(variants).context("Coverage verification failed")?;
    if !report.is_complete() {
        let missing = report.missing();
        let first = missing
            .first()
            .map(ToString::to_string)
            .unwrap_or_default();
        anyhow::bail!(
            "Coverage incomplete: {} (pair, basis) combinations missing, e.g. {first}",
            missing.len()
        );
    }

    match report.min_multiplicity() {
        Some(min) => println!(
            "{} Coverage complete: all {} pairs in all 9 basis combinations (min multiplicity {min})",
            style("✓").green().bold(),
            report.positions() * report.positions().saturating_sub(1) / 2,
        ),
        None => println!(
            "{} Coverage trivially complete: fewer than two measured qubits",
            style("✓").green().bold()
        ),
    }
    Ok(())
}

fn write_variants(
    variants: &[TomographyVariant],
    dir: &Path,
    format: OutputFormat,
) -> Result<Vec<ManifestEntry>> {
    ensure_dir(dir)?;

    let progress = ProgressBar::new(variants.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:30.cyan} {pos}/{len} {msg}")?,
    );

    let mut entries = Vec::with_capacity(variants.len());
    for (index, variant) in variants.iter().enumerate() {
        let file = format!(
            "{index:02}_{}.{}",
            compact_label(variant.bases()),
            format.extension()
        );
        progress.set_message(file.clone());

        let circuit = variant.circuit();
        let path = dir.join(&file);
        fs::write(&path, render(circuit, format)?)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        tracing::debug!(label = variant.label(), file = %path.display(), "wrote variant");

        entries.push(ManifestEntry {
            index,
            label: variant.label().to_string(),
            file,
            origin: variant.origin(),
            num_ops: circuit.num_ops(),
            depth: circuit.depth(),
            gate_counts: circuit.count_ops(),
        });
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(entries)
}

fn print_summary(base: &Circuit, variants: &[TomographyVariant]) {
    println!();
    println!(
        "  {:>3}  {:<14}  {:>5}  {:>5}  {}",
        style("#").bold(),
        style("origin").bold(),
        style("ops").bold(),
        style("depth").bold(),
        style("label").bold()
    );
    for (index, variant) in variants.iter().enumerate() {
        let circuit = variant.circuit();
        println!(
            "  {index:>3}  {:<14}  {:>5}  {:>5}  {}",
            describe_origin(variant.origin()),
            circuit.num_ops() - base.num_ops(),
            circuit.depth(),
            variant.label()
        );
    }
    println!();
    println!(
        "  Ops column counts instructions added to {}; pass {} to write files.",
        style(base.name()).green(),
        style("--output <dir>").yellow()
    );
}

/// Short description of a setting's origin, e.g. `uniform Z` or `layer 1 XZY`.
pub fn describe_origin(origin: SettingOrigin) -> String {
    match origin {
        SettingOrigin::Uniform { basis } => format!("uniform {basis}"),
        SettingOrigin::Coloring { layer, sequence } => format!("layer {layer} {sequence}"),
    }
}
