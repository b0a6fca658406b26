//! Droughtrisk CLI - drought-risk assessment from Venµs satellite imagery

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use droughtrisk_colormap::ColorScheme;
use droughtrisk_core::io::read_scene;
use droughtrisk_core::Scene;
use droughtrisk_model::{load_model, Classifier};
use droughtrisk_pipeline::{
    predict_scene_with_progress, probability_map, rgb_composite, risk_overlay, summarize,
    write_prediction_geotiff, write_probability_csv_file, PredictParams,
};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "droughtrisk")]
#[command(author, version, about = "Drought-risk assessment from Venµs satellite imagery", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a multi-band scene
    Info {
        /// Input GeoTIFF file (>= 11 bands)
        input: PathBuf,
    },
    /// Run the drought-risk prediction pipeline on a scene
    Predict {
        /// Input GeoTIFF file (>= 11 bands, Venµs band order)
        input: PathBuf,
        /// Pre-trained classifier artifact (JSON)
        #[arg(short, long)]
        model: PathBuf,
        /// Spatial chunk size in pixels
        #[arg(long, default_value = "256")]
        chunk_size: usize,
        /// Write raw probabilities as CSV (row, col, probability)
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the probability raster as a georeferenced GeoTIFF
        #[arg(long)]
        geotiff: Option<PathBuf>,
        /// Write the RGB composite (bands 7-4-3) as PNG
        #[arg(long)]
        rgb: Option<PathBuf>,
        /// Write the color-mapped probability map as PNG
        #[arg(long)]
        map: Option<PathBuf>,
        /// Write the high-risk overlay on the RGB composite as PNG
        #[arg(long)]
        overlay: Option<PathBuf>,
        /// Colormap for the probability map: drought, grayscale, bluewhitered
        #[arg(long, default_value = "drought")]
        colormap: String,
        /// Risk threshold for statistics and the overlay
        #[arg(short, long, default_value = "0.5")]
        threshold: f32,
        /// Overlay blend strength in [0, 1]
        #[arg(long, default_value = "0.5")]
        alpha: f32,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_input(path: &PathBuf) -> Result<Scene<f32>> {
    let pb = spinner("Reading scene...");
    let scene: Scene<f32> = read_scene(path).context("Failed to read input scene")?;
    pb.finish_and_clear();
    info!(
        "Input: {} x {}, {} bands",
        scene.cols(),
        scene.rows(),
        scene.band_count()
    );
    Ok(scene)
}

fn parse_colormap(name: &str) -> Result<ColorScheme> {
    ColorScheme::from_name(name).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown colormap: {}. Use drought, grayscale, or bluewhitered.",
            name
        )
    })
}

fn print_summary(summary: &droughtrisk_pipeline::PredictionSummary) {
    println!("\nPrediction summary:");
    println!("  Pixels analyzed: {}", summary.valid_count);
    if summary.masked_count > 0 {
        println!("  Masked pixels: {}", summary.masked_count);
    }
    if let (Some(min), Some(max)) = (summary.min, summary.max) {
        println!("  Probability range: {:.4} - {:.4}", min, max);
    }
    if let Some(mean) = summary.mean {
        println!("  Mean probability: {:.4}", mean);
    }
    println!(
        "  High risk (p >= {:.2}): {:.2}%",
        summary.threshold,
        summary.high_risk_fraction() * 100.0
    );
    println!(
        "  Low risk (p < {:.2}): {:.2}%",
        summary.threshold,
        (1.0 - summary.high_risk_fraction()) * 100.0
    );
}

fn done(name: &str, path: &PathBuf) {
    println!("{} saved to: {}", name, path.display());
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => {
            let scene = read_input(&input)?;
            let (rows, cols) = scene.shape();
            let bounds = scene.bounds();

            println!("File: {}", input.display());
            println!(
                "Dimensions: {} x {} ({} pixels), {} bands",
                cols,
                rows,
                scene.pixel_count(),
                scene.band_count()
            );
            println!("Cell size: {}", scene.transform().cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(crs) = scene.crs() {
                println!("CRS: {}", crs);
            }
            if let Some(nodata) = scene.nodata() {
                println!("NoData: {}", nodata);
            }
        }

        Commands::Predict {
            input,
            model,
            chunk_size,
            csv,
            geotiff,
            rgb,
            map,
            overlay,
            colormap,
            threshold,
            alpha,
        } => {
            let scheme = parse_colormap(&colormap)?;

            // Model load failures are fatal before any raster work starts
            let pb = spinner("Loading classifier...");
            let classifier = load_model(&model).context("Failed to load classifier artifact")?;
            pb.finish_and_clear();
            info!("Classifier: {} features", classifier.feature_len());

            let scene = read_input(&input)?;

            let start = Instant::now();
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:40.green} {pos}/{len} chunks")
                    .unwrap(),
            );
            let prediction = predict_scene_with_progress(
                &scene,
                &classifier,
                &PredictParams { chunk_size },
                |done, total| {
                    bar.set_length(total as u64);
                    bar.set_position(done as u64);
                },
            )
            .context("Prediction failed")?;
            bar.finish_and_clear();
            info!("Prediction took {:.2?}", start.elapsed());

            print_summary(&summarize(&prediction, threshold));

            if let Some(path) = csv {
                let rows = write_probability_csv_file(&prediction, &path)
                    .context("Failed to write CSV")?;
                info!("CSV rows written: {}", rows);
                done("Predictions (CSV)", &path);
            }

            if let Some(path) = geotiff {
                write_prediction_geotiff(&prediction, &path)
                    .context("Failed to write GeoTIFF")?;
                done("Predictions (GeoTIFF)", &path);
            }

            if let Some(path) = rgb {
                let image = rgb_composite(&scene).context("Failed to render RGB composite")?;
                image
                    .save(&path)
                    .with_context(|| format!("Failed to save {}", path.display()))?;
                done("RGB composite", &path);
            }

            if let Some(path) = map {
                let image = probability_map(&prediction, scheme);
                image
                    .save(&path)
                    .with_context(|| format!("Failed to save {}", path.display()))?;
                done("Probability map", &path);
            }

            if let Some(path) = overlay {
                let image = risk_overlay(&scene, &prediction, threshold, alpha)
                    .context("Failed to render overlay")?;
                image
                    .save(&path)
                    .with_context(|| format!("Failed to save {}", path.display()))?;
                done("Risk overlay", &path);
            }
        }
    }

    Ok(())
}
