//! Superconductor Void/Channel Comparison
//!
//! Loads one XYZ structure per material, computes its persistent-homology
//! fingerprint, joins the electronic descriptors (λ, ℤ₂) from a CSV file and
//! writes the comparison table.
//!
//! ```text
//! compare_superconductors LK99.xyz YBCO.xyz MgB2.xyz \
//!     --descriptors electronic.csv --config analysis.yaml \
//!     --output superconductor_comparison.csv
//! ```

use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use tda_sc_voids::{
    analyze_batch, AnalysisConfig, DescriptorTable, MaterialInput, StructureLoader, XyzLoader,
};

#[derive(Debug, Parser)]
#[command(
    name = "compare_superconductors",
    about = "Topological void/channel comparison of crystal structures"
)]
struct Args {
    /// XYZ structure files, one per material
    #[arg(required = true)]
    structures: Vec<PathBuf>,

    /// CSV with material_id,lambda,Z2 columns
    #[arg(long)]
    descriptors: Option<PathBuf>,

    /// YAML or JSON analysis configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output CSV
    #[arg(long, default_value = "superconductor_comparison.csv")]
    output: PathBuf,

    /// Directory to write `<material>_point_cloud.txt` coordinate exports
    #[arg(long)]
    export_points: Option<PathBuf>,

    /// Override the maximum filtration scale (Å)
    #[arg(long)]
    r_max: Option<f64>,

    /// Override the highest homology dimension
    #[arg(long)]
    max_dim: Option<usize>,

    /// Override the coincident-point tolerance (Å)
    #[arg(long)]
    epsilon: Option<f64>,

    /// Analyse materials one at a time
    #[arg(long)]
    sequential: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_path(path)?,
        None => AnalysisConfig::default(),
    };
    if args.r_max.is_some() {
        config.r_max = args.r_max;
    }
    if let Some(max_dim) = args.max_dim {
        config.max_dim = max_dim;
    }
    if let Some(epsilon) = args.epsilon {
        config.epsilon = epsilon;
    }
    config.parallel = !args.sequential;
    config.validate()?;

    let descriptors = match &args.descriptors {
        Some(path) => DescriptorTable::from_path(path)?,
        None => DescriptorTable::new(),
    };

    println!("═══════════════════════════════════════════════════════════════");
    println!("  Superconductor Void/Channel Comparison (Persistent Homology)");
    println!("═══════════════════════════════════════════════════════════════\n");
    println!("Configuration:");
    match config.r_max {
        Some(r) => println!("  r_max     = {r:.3} Å"),
        None => println!("  r_max     = bounding diagonal"),
    }
    println!("  max_dim   = {}", config.max_dim);
    println!("  epsilon   = {:e} Å", config.epsilon);
    println!("  scales    = {:?} Å", config.reference_thresholds);
    println!("  materials = {}", args.structures.len());
    println!("  λ/ℤ₂ data = {} material(s)", descriptors.len());
    println!();

    let loader = XyzLoader;
    let inputs: Vec<MaterialInput> = args
        .structures
        .iter()
        .map(|path| MaterialInput::load(&loader, path))
        .collect();

    if let Some(dir) = &args.export_points {
        fs::create_dir_all(dir)?;
        for input in &inputs {
            if let Ok(cloud) = &input.cloud {
                let path = dir.join(format!("{}_point_cloud.txt", input.material_id));
                cloud.write_coordinates(BufWriter::new(File::create(&path)?))?;
                info!("wrote {}", path.display());
            }
        }
    }

    for path in &args.structures {
        println!("  {:<16} {}", loader.material_id(path), path.display());
    }
    println!();

    let table = analyze_batch(inputs, &config, &descriptors)?;

    println!("Material          β₀@r₀  max H₁ life  max H₂ life   λ            ℤ₂");
    println!("─────────────────────────────────────────────────────────────────────────");
    let first_scale = config.reference_thresholds.first().copied();
    for record in table.records() {
        let beta0 = first_scale
            .and_then(|r| record.summary.get(&tda_sc_voids::summary::betti_metric_name(0, r)))
            .map_or_else(|| "-".to_string(), |b| format!("{b}"));
        let life = |d: usize| {
            record
                .summary
                .get(&format!("max_lifetime_dim{d}"))
                .map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
        };
        println!(
            "{:<16}  {:>5}  {:>11}  {:>11}   {:<12} {}",
            record.material_id,
            beta0,
            life(1),
            life(2),
            record.electronic.lambda.to_string(),
            record.electronic.z2
        );
        for warning in &record.warnings {
            println!("    ! {warning}");
        }
    }

    if !table.failures().is_empty() {
        println!("\nFailed materials:");
        for failure in table.failures() {
            println!("  ✗ {}: {}", failure.material_id, failure.error);
        }
    }

    table.write_csv_path(&args.output)?;
    println!("\nWrote {} row(s) to {}", table.records().len(), args.output.display());

    Ok(())
}
