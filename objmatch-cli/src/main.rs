use clap::{Parser, ValueEnum};
use objmatch::image::io::{load_intensity_image, IntensityMode};
use objmatch::search::effective_min_dist;
use objmatch::{kernel, select_outside, Hit, ObjMatchError, ScoreGrid};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Finds occurrences of an object image inside a field image. \
             Outputs a list of hits (x, y, score) below or above the given thresholds."
)]
struct Cli {
    /// Field (scene) image.
    field: PathBuf,
    /// Object to find.
    object: PathBuf,
    /// Output hits with normalized score below this threshold.
    #[arg(long, default_value_t = 0.0)]
    low: f64,
    /// Output hits with normalized score above this threshold.
    #[arg(long, default_value_t = 1.0)]
    high: f64,
    /// Minimum pixel distance between hits. Negative uses the object image size.
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    dist: i32,
    /// How color pixels are reduced to intensities.
    #[arg(long, value_enum, default_value_t = IntensityArg::Luma)]
    intensity: IntensityArg,
    /// Write the normalized score surface to out.png.
    #[arg(long)]
    png: bool,
    /// Do not write hits to out.csv.
    #[arg(long)]
    no_csv: bool,
    /// Report top-left placement origins instead of object centers.
    #[arg(long)]
    no_center: bool,
    /// Verbose progress output on stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IntensityArg {
    /// Standard luma conversion.
    Luma,
    /// Plain average of the color channels.
    Average,
}

impl From<IntensityArg> for IntensityMode {
    fn from(value: IntensityArg) -> Self {
        match value {
            IntensityArg::Luma => IntensityMode::Luma,
            IntensityArg::Average => IntensityMode::ChannelAverage,
        }
    }
}

const EXIT_NO_HITS: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("objmatch=info".parse()?))
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    if cli.low == 0.0 && cli.high >= 1.0 && !cli.png {
        eprintln!("Warning: --low=0 and --high=1 select no hits, and PNG output is disabled.");
        eprintln!("Set --low and/or --high, or enable PNG output with --png.");
        return Ok(ExitCode::FAILURE);
    }

    let mode = IntensityMode::from(cli.intensity);
    let load_start = Instant::now();
    let field = load_intensity_image(&cli.field, mode)?;
    let object = load_intensity_image(&cli.object, mode)?;
    tracing::info!(elapsed = ?load_start.elapsed(), "images loaded");

    let min_dist = effective_min_dist(Some(cli.dist), object.view());
    tracing::info!(min_dist, "minimum hit distance");

    let rect = kernel::full_search_rect(field.view(), object.view())?;
    let scan_start = Instant::now();
    let raw = if cli.verbose {
        kernel::rayon::scan_full_par_with_progress(field.view(), object.view(), rect, |f| {
            eprint!("\r{:.2}% complete", f * 100.0);
        })?
    } else {
        kernel::rayon::scan_full_par(field.view(), object.view(), rect)?
    };
    if cli.verbose {
        eprintln!();
    }
    tracing::info!(elapsed = ?scan_start.elapsed(), origins = rect.len(), "scan complete");

    let normalized = match raw.normalize() {
        Ok((normalized, min, max)) => {
            tracing::info!(min, max, "score range");
            normalized
        }
        Err(ObjMatchError::DegenerateScoreRange { min, max }) => {
            eprintln!("Warning: degenerate score range (min {min}, max {max}), skipping hit search");
            if cli.png {
                write_flat_png(&raw)?;
            }
            eprintln!("Warning: no hits found");
            return Ok(ExitCode::from(EXIT_NO_HITS));
        }
        Err(err) => return Err(err.into()),
    };

    let mut hits = select_outside(&normalized, cli.low, cli.high, min_dist);
    if !cli.no_center {
        let dx = (object.width() / 2) as i32;
        let dy = (object.height() / 2) as i32;
        for hit in hits.iter_mut() {
            *hit = hit.translate(dx, dy);
        }
    }

    if cli.png {
        write_score_png(&normalized)?;
    }

    if hits.is_empty() {
        eprintln!("Warning: no hits found");
        return Ok(ExitCode::from(EXIT_NO_HITS));
    }

    let mut csv = if cli.no_csv {
        None
    } else {
        Some(BufWriter::new(File::create("out.csv")?))
    };
    for hit in &hits {
        let line = format_hit(hit);
        if let Some(csv) = csv.as_mut() {
            writeln!(csv, "{line}")?;
        }
        println!("hit: {line}");
    }
    if let Some(mut csv) = csv {
        csv.flush()?;
    }

    Ok(ExitCode::SUCCESS)
}

fn format_hit(hit: &Hit) -> String {
    format!("{},{},{:.6}", hit.x, hit.y, hit.score)
}

/// Renders the normalized score surface as an 8-bit grayscale PNG.
fn write_score_png(grid: &ScoreGrid) -> Result<(), Box<dyn std::error::Error>> {
    let rect = grid.rect();
    let pixels: Vec<u8> = grid
        .values()
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8)
        .collect();
    save_png(pixels, rect.width() as u32, rect.height() as u32)
}

/// Degenerate score surface: every cell identical, rendered as black.
fn write_flat_png(grid: &ScoreGrid) -> Result<(), Box<dyn std::error::Error>> {
    let rect = grid.rect();
    save_png(
        vec![0u8; rect.len()],
        rect.width() as u32,
        rect.height() as u32,
    )
}

fn save_png(pixels: Vec<u8>, width: u32, height: u32) -> Result<(), Box<dyn std::error::Error>> {
    let img: image::GrayImage = image::ImageBuffer::from_vec(width, height, pixels)
        .ok_or("score surface buffer size mismatch")?;
    img.save("out.png")?;
    Ok(())
}
