//! `gcodeprops` command line front end
//!
//! Replays a recorded canon trace for a program and prints its properties.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use gcodeprops::{
    init_logging, loader_settings, Config, MeasurementSystem, ProgramLoader, PropertyName,
    TraceInterpreter,
};
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "gcodeprops", version)]
#[command(about = "Report path lengths, run time and extents of a G-code program", long_about = None)]
struct Cli {
    /// Recorded canon calls for the program (JSON lines)
    #[arg(short, long)]
    trace: PathBuf,

    /// Configuration file (.toml or .json); the platform default is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Display units (metric or imperial), overriding the configuration
    #[arg(short, long)]
    units: Option<MeasurementSystem>,

    /// Print a single property (file_name, file_size, file_lines, tool_calls,
    /// rapids, feed, path_distance, run_time, extents)
    #[arg(short, long)]
    property: Option<PropertyName>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Program file
    program: PathBuf,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }
    match Config::default_path() {
        Ok(path) => Ok(Config::load_or_default(&path)?),
        Err(e) => {
            debug!("Using default config: {}", e);
            Ok(Config::default())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { Level::DEBUG } else { Level::WARN })?;

    let config = load_config(cli.config.as_deref())?;
    let mut settings = loader_settings(&config);
    if let Some(units) = cli.units {
        settings.display_units = units;
    }

    let mut loader = ProgramLoader::new(TraceInterpreter::from_file(&cli.trace), settings);
    let loaded = loader
        .load(&cli.program)
        .with_context(|| format!("Failed to load {}", cli.program.display()))?;

    for note in loaded.program.notifications() {
        eprintln!("note: {}", note);
    }

    let props = &loaded.properties;
    match (cli.property, cli.json) {
        (Some(name), true) => println!("{}", serde_json::to_string_pretty(&props.value(name))?),
        (Some(name), false) => println!("{}", props.to_display_string(name)),
        (None, true) => println!("{}", serde_json::to_string_pretty(props)?),
        (None, false) => print!("{}", props),
    }

    Ok(())
}
