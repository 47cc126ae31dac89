use anyhow::{Context, Result};
use runmany_core::SettingsSource;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use tracing::{debug, info};

use crate::cli::Cli;

pub fn run_command(args: &Cli) -> Result<()> {
    debug!("Running document: {}", args.input_file.display());
    let document = fs::read_to_string(&args.input_file)
        .with_context(|| format!("Failed to read input file {}", args.input_file.display()))?;

    let settings = match &args.settings {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file {}", path.display()))?;
            Some(SettingsSource::Json(text))
        }
        None => None,
    };

    let stats = match &args.outfile {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut out = BufWriter::new(file);
            let stats = runmany_core::run_many(&document, settings, &mut out)
                .with_context(|| format!("Failed to run {}", args.input_file.display()))?;
            out.flush()
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
            stats
        }
        None => {
            let stdout = io::stdout();
            runmany_core::run_many(&document, settings, stdout.lock())
                .with_context(|| format!("Failed to run {}", args.input_file.display()))?
        }
    };

    info!(
        "{}/{} runs succeeded",
        stats.successful_runs, stats.total_runs
    );
    Ok(())
}
