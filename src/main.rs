// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use vcd2pwl::{parse_vcd_with, PwlConfig, TimeUnit, TrackMode};

/// Every run also logs here, in the working directory.
const LOG_FILE_NAME: &str = "vcd2pwl.log";

/// Converts a VCD trace into SPICE piece-wise linear voltage sources.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Log every value change
    #[arg(long)]
    debug: bool,

    /// The VCD trace to read
    #[arg(short, long)]
    input_file: PathBuf,

    /// Where to write the PWL text [default: <input stem>.pwl in the working directory]
    #[arg(short, long)]
    output_file: Option<PathBuf>,

    /// Rise/fall time of ordinary signals, in --unit
    #[arg(long, default_value_t = 0.0, value_parser = rise_fall_time)]
    trf: f64,

    /// Rise/fall time of the CLK signal, in --unit
    #[arg(long, default_value_t = 0.0, value_parser = rise_fall_time)]
    tcrf: f64,

    /// Time unit of the emitted PWL points (s, ms, us, ns, ps, fs)
    #[arg(long, default_value_t = TimeUnit::Ns)]
    unit: TimeUnit,

    /// Resolve identifiers in every scope and fail on unknown ones
    #[arg(long)]
    full: bool,

    /// Print the parsed scopes and their signals
    #[arg(long)]
    print_scopes: bool,
}

fn rise_fall_time(text: &str) -> Result<f64, String> {
    let value = text
        .parse::<f64>()
        .map_err(|e| format!("`{text}` is not a number: {e}"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("`{text}` must be a finite, non-negative time"))
    }
}

/// `<input stem>.pwl`, relative to the working directory.
fn default_output(input: &Path) -> Option<PathBuf> {
    let mut name = input.file_stem()?.to_os_string();
    name.push(".pwl");
    Some(PathBuf::from(name))
}

type FileLayer<S> = fmt::Layer<S, fmt::format::DefaultFields, fmt::format::Format, Mutex<File>>;

/// Plain text log layer writing to `path`, truncated first.
fn log_file_layer<S>(path: &Path) -> io::Result<FileLayer<S>> {
    let file = File::create(path)?;
    Ok(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, file_error) = match log_file_layer(Path::new(LOG_FILE_NAME)) {
        Ok(layer) => (Some(layer), None),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        warn!("Could not create {LOG_FILE_NAME}, logging to the terminal only: {e}");
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> Result<(), vcd2pwl::Error> {
    let input = &args.input_file;
    if input.extension().and_then(|ext| ext.to_str()) != Some("vcd") {
        error!("{} does not have a .vcd extension, converting anyway", input.display());
    }
    let output = match &args.output_file {
        Some(output) => output.clone(),
        None => default_output(input).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot derive an output name from {}", input.display()),
            )
        })?,
    };

    let mode = if args.full {
        TrackMode::Everything
    } else {
        TrackMode::TopOnly
    };

    info!("Parsing {}", input.display());
    let file = File::open(input)?;
    let vcd = parse_vcd_with(file, mode)?;

    if args.print_scopes {
        vcd.print_scopes();
    }

    let config = PwlConfig::new(args.trf, args.tcrf).with_unit(args.unit);
    vcd.export_pwl(&output, &config)?;
    info!("Wrote {}", output.display());

    Ok(())
}
