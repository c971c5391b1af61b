use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use derive_more::{Display, Error};
use error_stack::{Report, ResultExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bollinger_overlay::config::{self, AppConfig, GeneralConfig};
use bollinger_overlay::indicator::bollinger::{BollingerBands, BollingerParams};
use bollinger_overlay::loader::{self, InputFormat};
use bollinger_overlay::report::{Overlay, OutputFormat, write_overlay};

#[derive(Debug, Display, Error)]
pub enum AppError {
    #[display("configuration error")]
    Config,
    #[display("failed to load price series")]
    Load,
    #[display("indicator error")]
    Indicator,
    #[display("failed to write report")]
    Report,
}

#[derive(Parser)]
#[command(
    name = "bollinger-overlay",
    about = "Compute a Bollinger Bands overlay for a price series"
)]
struct Cli {
    /// Price series file (JSON array or CSV with a header row)
    #[arg(short, long)]
    input: PathBuf,

    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input format; inferred from the file extension when omitted
    #[arg(long, value_enum)]
    input_format: Option<InputFormat>,

    /// SMA window length, overrides [bollinger].length
    #[arg(long)]
    length: Option<usize>,

    /// Standard deviation multiplier, overrides [bollinger].std_multiplier
    #[arg(long)]
    std_multiplier: Option<f64>,

    /// Bar offset, overrides [bollinger].offset
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<i64>,

    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write the overlay here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn params(&self, base: BollingerParams) -> BollingerParams {
        BollingerParams {
            length: self.length.unwrap_or(base.length),
            std_multiplier: self.std_multiplier.unwrap_or(base.std_multiplier),
            offset: self.offset.unwrap_or(base.offset),
        }
    }
}

fn main() {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Report<AppError>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config::load(path).change_context(AppError::Config)?,
        None => AppConfig::default(),
    };

    init_tracing(&config.general);

    let params = cli.params(config.bollinger);
    let bands = BollingerBands::new(params).change_context(AppError::Indicator)?;

    let candles = loader::load(&cli.input, cli.input_format).change_context(AppError::Load)?;
    let series = bands
        .compute(&candles)
        .change_context(AppError::Indicator)
        .attach_with(|| format!("input: {}", cli.input.display()))?;

    info!(
        length = params.length,
        std_multiplier = params.std_multiplier,
        offset = params.offset,
        candles = candles.len(),
        "overlay computed"
    );

    let overlay = Overlay::new(params, config.style.resolve(), &candles, &series);

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .change_context(AppError::Report)
                .attach_with(|| format!("output: {}", path.display()))?;
            write_overlay(BufWriter::new(file), &overlay, cli.format)
                .change_context(AppError::Report)?;
            info!(output = %path.display(), "overlay written");
        }
        None => {
            write_overlay(io::stdout().lock(), &overlay, cli.format)
                .change_context(AppError::Report)?;
        }
    }

    Ok(())
}

fn init_tracing(general: &GeneralConfig) {
    let filter = EnvFilter::new(&general.log_level);
    match general.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
}
