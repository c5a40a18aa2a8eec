//! # gcode_filter
//!
//! Streams a G-code program through the backlash compensation stage and
//! writes the rewritten program to stdout. Logs go to stderr.
//!
//! ```text
//! gcode_filter --config config/filter.toml part.nc > part.compensated.nc
//! ```

use clap::Parser;
use gcode_common::config::{ConfigError, ConfigLoader};
use gcode_common::consts::DEFAULT_CONFIG_PATH;
use gcode_common::modal::ModalState;
use gcode_processor::backlash::BacklashCompensationProcessor;
use gcode_processor::config::FilterConfig;
use gcode_processor::parser::{GcodeLineParser, LineParser};
use gcode_processor::processor::CommandProcessor;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// Backlash compensation filter for G-code programs
#[derive(Parser, Debug)]
#[command(name = "gcode_filter")]
#[command(version)]
#[command(about = "Rewrite a G-code program with backlash compensation moves")]
struct Args {
    /// Path to the filter configuration TOML.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// G-code program to process (stdin if omitted).
    input: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let config = load_config(&args);

    let level = match &config {
        _ if args.verbose => Level::DEBUG,
        Ok(config) => config.machine.log_level.into(),
        Err(_) => Level::INFO,
    };
    setup_tracing(&args, level);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("FATAL: {} ({e})", args.config.display());
            process::exit(1);
        }
    };

    if let Err(e) = run(&args, config) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<FilterConfig, ConfigError> {
    let config = FilterConfig::load(&args.config)?;
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: FilterConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut stage = BacklashCompensationProcessor::new(config.backlash)?;
    let parser = GcodeLineParser;
    stage.reset();
    info!(
        machine = %config.machine.name,
        stage = stage.describe(),
        axes = ?stage.supported_axes(),
        "Processing started"
    );

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let mut out = BufWriter::new(io::stdout().lock());

    let mut state = ModalState::default();
    let mut lines_in = 0usize;
    let mut lines_out = 0usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let emitted = stage.process(&line, &state).inspect_err(|e| {
            error!(line_number = index + 1, "{e}");
        })?;
        for text in &emitted {
            writeln!(out, "{text}")?;
        }
        // The program's own coordinates advance from the original line.
        state = parser.parse_line(&line, &state)?.state;
        lines_in += 1;
        lines_out += emitted.len();
    }
    out.flush()?;

    info!(lines_in, lines_out, "Processing complete");
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args, level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}
