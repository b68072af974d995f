//! # gcodeprops
//!
//! G-code program properties computed from the canon callbacks of an
//! external interpreter:
//! - Ordered motion list (traverses, linear feeds, arc feeds, dwells)
//! - Rapid, feed and total path length in metric or imperial units
//! - Run time estimate, bounding box, line and tool-call counts
//!
//! ## Architecture
//!
//! gcodeprops is organized as a workspace with multiple crates:
//!
//! 1. **gcodeprops-core** - Positions, extents, unit conversion, errors
//! 2. **gcodeprops-canon** - Canon trait, accumulator, arc tessellation,
//!    property aggregation, program loader, trace replay
//! 3. **gcodeprops-settings** - Configuration files
//! 4. **gcodeprops** - Logging setup and the `gcodeprops` binary

pub use gcodeprops_canon as canon;
pub use gcodeprops_core::{data, units};

pub use gcodeprops_canon::{
    ArcSpec, Canon, CancelToken, CanonCall, FileInfo, Interpreter, InterpreterState, LoadedProgram,
    LoaderSettings, MotionEvent, ProgramAccumulator, ProgramLoader, ProgramProperties,
    PropertyAggregator, PropertyName, RecordedProgram, TraceInterpreter,
};
pub use gcodeprops_core::{Axis, Error, MeasurementSystem, Position, Result};
pub use gcodeprops_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Loader settings described by a configuration
pub fn loader_settings(config: &Config) -> LoaderSettings {
    LoaderSettings {
        parameter_file: config.interpreter.parameter_file.clone(),
        startup_code: config.interpreter.startup_code.clone(),
        machine_units: config.interpreter.machine_units,
        display_units: config.display.measurement_system,
        arc_division: config.estimation.arc_division,
        max_rapid_rate: config.estimation.max_rapid_rate,
    }
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr so reports on stdout stay machine readable
/// - RUST_LOG environment variable support
/// - `level` as the default threshold
pub fn init_logging(level: tracing::Level) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_settings_follow_config() {
        let mut config = Config::new();
        config.display.measurement_system = MeasurementSystem::Imperial;
        config.interpreter.startup_code = "G17".to_string();
        config.estimation.arc_division = 16;

        let settings = loader_settings(&config);
        assert_eq!(settings.display_units, MeasurementSystem::Imperial);
        assert_eq!(settings.machine_units, MeasurementSystem::Metric);
        assert_eq!(settings.startup_code, "G17");
        assert_eq!(settings.arc_division, 16);
        assert_eq!(settings.max_rapid_rate, 100.0);
    }

    #[test]
    fn test_build_metadata() {
        assert!(!VERSION.is_empty());
        assert!(!BUILD_DATE.is_empty());
    }
}
