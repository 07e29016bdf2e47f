use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::{info, warn};
use ringscore::detect;
use ringscore::{record_candidates, DetectReport, PipelineError, ScoringConfig};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "ringscore", version, about = "Ring-target scoring station")]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "off, error, warn, info, debug or trace (RUST_LOG wins under the tracing feature)"
    )]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect and score impacts on one image and write a JSON report.
    Detect {
        #[arg(long)]
        config: PathBuf,
        #[arg(long, help = "Overrides image_path from the config")]
        image: Option<PathBuf>,
        #[arg(long, help = "Overrides output_path from the config")]
        output: Option<PathBuf>,
    },
    /// Score every candidate of each image as one shot of a session.
    Score {
        #[arg(long)]
        config: PathBuf,
        #[arg(long, help = "Where to write the session record")]
        session: Option<PathBuf>,
        #[arg(long)]
        shooter: Option<String>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long, help = "Session date, YYYY-MM-DD (defaults to today)")]
        date: Option<NaiveDate>,
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
}

#[derive(thiserror::Error, Debug)]
#[error("no image supplied: pass --image or set image_path in the config")]
struct NoImageError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Detect {
            config,
            image,
            output,
        } => run_detect(&config, image, output),
        Commands::Score {
            config,
            session,
            shooter,
            group,
            date,
            images,
        } => run_score(&config, session, shooter, group, date, &images),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: &str) {
    let _ = ringscore::core::init_with_level(ringscore::core::parse_level(level));
}

#[cfg(feature = "tracing")]
fn init_logging(level: &str) {
    ringscore::core::init_tracing(ringscore::core::parse_level(level), false);
}

fn run_detect(
    config_path: &Path,
    image: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let cfg = ScoringConfig::load_json(config_path).map_err(PipelineError::from)?;
    let image_path = image
        .or_else(|| cfg.image_path.as_ref().map(PathBuf::from))
        .ok_or(NoImageError)?;
    let output_path = output.unwrap_or_else(|| cfg.output_path());
    let pipeline = cfg.build_pipeline().map_err(PipelineError::from)?;

    let mut report = DetectReport::new(&image_path, config_path);
    match detect::run_on_file(&pipeline, &image_path) {
        Ok((gray, candidates)) => {
            println!("candidates: {}", candidates.len());
            for (i, c) in candidates.iter().enumerate() {
                println!(
                    "  #{i}: x={} y={} w={} h={} distance={:.1} score={}",
                    c.region.x, c.region.y, c.region.width, c.region.height, c.distance, c.score
                );
            }
            report.set_candidates([gray.width, gray.height], &candidates);
        }
        Err(err) => {
            warn!("detection failed: {err}");
            report.set_error(&err);
            if let Err(write_err) = report.write_json(&output_path) {
                warn!(
                    "could not write report to {}: {write_err}",
                    output_path.display()
                );
            }
            return Err(err.into());
        }
    }

    report.write_json(&output_path)?;
    info!("report written to {}", output_path.display());
    Ok(())
}

fn run_score(
    config_path: &Path,
    session_path: Option<PathBuf>,
    shooter: Option<String>,
    group: Option<String>,
    date: Option<NaiveDate>,
    images: &[PathBuf],
) -> Result<(), Box<dyn Error>> {
    let cfg = ScoringConfig::load_json(config_path).map_err(PipelineError::from)?;
    let pipeline = cfg.build_pipeline().map_err(PipelineError::from)?;

    let mut session = cfg.new_session(Local::now().date_naive());
    if let Some(name) = shooter {
        session.set_shooter(name);
    }
    if let Some(group) = group {
        session.set_group(group);
    }
    if let Some(date) = date {
        session.set_date(date);
    }

    for path in images {
        let (_, candidates) = detect::run_on_file(&pipeline, path)?;
        info!("{}: {} candidates", path.display(), candidates.len());
        record_candidates(&mut session, &candidates);
    }

    let record = session.snapshot(&cfg.classification_table);
    println!("shots: {:?}", record.shots);
    println!("total: {}", record.total);
    println!("classification: {}", record.classification);

    if let Some(path) = session_path {
        record.write_json(&path)?;
        info!("session written to {}", path.display());
    }
    Ok(())
}
