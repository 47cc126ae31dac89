use clap::Parser;
use std::path::PathBuf;

/// Runs a .many file
#[derive(Parser, Debug)]
#[command(name = "runmany")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    /// The path to the .many file to run
    #[arg(value_name = "input-file")]
    pub input_file: PathBuf,

    /// The path to the .json settings file to use, which overrides any embedded settings
    #[arg(short, long, value_name = "settings-file")]
    pub settings: Option<PathBuf>,

    /// The path to the file output is redirected to
    #[arg(short, long, value_name = "output-file")]
    pub outfile: Option<PathBuf>,
}
