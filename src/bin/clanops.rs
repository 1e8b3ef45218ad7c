use anyhow::{Context, Result, anyhow};
use clanops::{
    AppConfig, ClanopsError, MissionPipeline, REJECTION_TEXT,
    engine::AssignmentError,
    logging::init_logging,
    protocol::{Selection, ValueTable},
};
use clap::Parser;
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use tracing::{info, warn};

/// Best operator placement for the selected clan missions.
#[derive(Debug, Parser)]
#[command(name = "clanops", version, about)]
struct Cli {
    /// Value table JSON (mission -> operator -> score)
    #[arg(long)]
    values: Option<PathBuf>,

    /// Settings JSON (assets, layout, theme)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the PNG report
    #[arg(long, default_value = "clan-missions.png")]
    out: PathBuf,

    /// Also write the intermediate SVG document
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Print the reply without rendering an image
    #[arg(long)]
    text_only: bool,

    #[arg(short, long)]
    verbose: bool,

    /// Up to eight slots: a mission name or `Skip`
    #[arg(value_name = "MISSION", num_args = 0..=8)]
    slots: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::default(),
    };
    let values_path = cli
        .values
        .clone()
        .or_else(|| config.values.clone())
        .ok_or_else(|| anyhow!("no value table given, pass --values or set `values` in the config"))?;
    let values = ValueTable::load_from_path(&values_path)?;
    info!(
        path = %values_path.display(),
        missions = values.mission_count(),
        "loaded value table"
    );

    let selection = Selection::parse_slots(cli.slots.as_slice())?;
    let pipeline = MissionPipeline::new(Arc::new(values), &config)?;

    if cli.text_only {
        return match pipeline.run_text(&selection) {
            Ok((_, reply)) => {
                print!("{reply}");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => rejected(e),
        };
    }

    let output = match pipeline.run(&selection) {
        Ok(output) => output,
        Err(e) => return rejected(e),
    };
    print!("{}", output.reply);

    if let Some(path) = &cli.svg {
        std::fs::write(path, &output.svg)
            .with_context(|| format!("Could not write SVG file '{}'", path.display()))?;
    }

    match (output.image, output.image_error) {
        (Some(image), _) => {
            std::fs::write(&cli.out, &image.png)
                .with_context(|| format!("Could not write PNG file '{}'", cli.out.display()))?;
            info!(
                path = %cli.out.display(),
                width = image.width,
                height = image.height,
                embedded = image.portraits.embedded,
                missing = image.portraits.missing,
                unreadable = image.portraits.unreadable,
                "wrote report image"
            );
        }
        (None, error) => {
            let reason = error.map(|e| e.to_string()).unwrap_or_default();
            warn!(reason = %reason, "no image produced, text reply only");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn rejected(e: ClanopsError) -> Result<ExitCode> {
    match e {
        ClanopsError::Assignment(AssignmentError::NoMissionSelected) => {
            eprintln!("{REJECTION_TEXT}");
            Ok(ExitCode::from(2))
        }
        other => Err(other.into()),
    }
}
