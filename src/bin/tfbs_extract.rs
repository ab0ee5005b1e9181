use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use tfbs_extract::app::App;
use tfbs_extract::config::{ConfigLoader, ConfigOverrides};
use tfbs_extract::error::ExtractError;
use tfbs_extract::output::{JsonOutput, LogProgress, OutputMode, TextOutput};

#[derive(Parser)]
#[command(name = "tfbs-extract")]
#[command(about = "Extract transcription factor binding-site sequences from ChIP-Seq peaks")]
#[command(version, author)]
struct Cli {
    /// Tab-separated peak table (TF_name, Peak_start, Peak_end, Dataset_Ids, Peak_number)
    #[arg(short = 'p', long)]
    peaks: Option<PathBuf>,

    /// Reference genome FASTA (single record, optionally .gz)
    #[arg(short = 'g', long)]
    genome: Option<PathBuf>,

    /// Directory receiving one FASTA file per transcription factor
    #[arg(short = 'o', long)]
    outdir: Option<PathBuf>,

    /// Extension of the per-TF files [default: fa]
    #[arg(long)]
    extension: Option<String>,

    /// JSON config file (defaults to ./tfbs-extract.json when present)
    #[arg(long)]
    config: Option<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<ExtractError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &ExtractError) -> u8 {
    match error {
        ExtractError::MissingColumns { .. }
        | ExtractError::NoValidPeaks
        | ExtractError::PeakFileNotFound(_)
        | ExtractError::MissingSetting(_)
        | ExtractError::InvalidExtension(_)
        | ExtractError::ConfigRead(_)
        | ExtractError::ConfigParse(_) => 2,
        ExtractError::GenomeNotFound(_)
        | ExtractError::GenomeEmpty(_)
        | ExtractError::GenomeParse { .. }
        | ExtractError::GenomeRead { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    let overrides = ConfigOverrides {
        peaks: cli.peaks,
        genome: cli.genome,
        outdir: cli.outdir,
        extension: cli.extension,
    };
    let config = ConfigLoader::resolve(cli.config.as_deref(), overrides)?;
    let app = App::new(config);

    match output_mode {
        OutputMode::Text => {
            let summary = app.run(&LogProgress)?;
            TextOutput::print_summary(&summary).into_diagnostic()?;
        }
        OutputMode::Json => {
            let summary = app.run(&JsonOutput)?;
            JsonOutput::print_summary(&summary).into_diagnostic()?;
        }
    }
    Ok(())
}
