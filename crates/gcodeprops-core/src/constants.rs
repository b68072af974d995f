//! Shared numeric and textual constants.

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Placeholder rapid rate used by run-time estimation.
///
/// The value 100 is the nominal "units per minute" rapid constant, but it is
/// applied here in the same per-second units as recorded feed rates (which
/// are stored as `rate / 60`), so traverses are timed at 100 units/s.
pub const DEFAULT_MAX_RAPID_RATE: f64 = 100.0;

/// Default angular resolution handed to the arc tessellator: segments per
/// half turn.
pub const DEFAULT_ARC_DIVISION: u32 = 64;

/// Minimum number of segments produced for any arc.
pub const MIN_ARC_SEGMENTS: usize = 3;

/// Upper bound on segments for a single arc; larger requests are rejected.
pub const MAX_ARC_SEGMENTS: usize = 1_000_000;

/// Angular tolerance used when winding arc end angles.
pub const CIRCLE_FUZZ: f64 = 1e-9;

/// Dwells shorter than this are logged in milliseconds.
pub const SHORT_DWELL_SECONDS: f64 = 0.1;

/// Pocket index meaning "no tool change".
pub const NO_POCKET: i32 = -1;

/// File name reported when no program is loaded.
pub const NO_FILE_LOADED: &str = "No file loaded";
