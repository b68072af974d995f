//! Program properties
//!
//! Derives the summary figures shown for a loaded program (path lengths, run
//! time estimate, bounding box, counters) from a frozen [`RecordedProgram`].
//! Aggregation is a pure function: it never touches its input and running it
//! twice yields identical results.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use gcodeprops_core::constants::{DEFAULT_MAX_RAPID_RATE, NO_FILE_LOADED};
use gcodeprops_core::{format_duration, Axis, Extents, MeasurementSystem};
use serde::{Deserialize, Serialize};

use crate::events::MotionEvent;
use crate::program::RecordedProgram;

/// Name and size of the program file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub size_bytes: u64,
}

impl FileInfo {
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            size_bytes: metadata.len(),
        })
    }

    /// Placeholder used while nothing is loaded
    pub fn no_file() -> Self {
        Self {
            name: NO_FILE_LOADED.to_string(),
            size_bytes: 0,
        }
    }
}

/// Range covered along one axis, in display units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisExtent {
    pub axis: Axis,
    pub min: f64,
    pub max: f64,
}

impl AxisExtent {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Summary of one loaded program; every length is in `units`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramProperties {
    pub file_name: String,
    pub file_size_bytes: u64,
    pub line_count: u64,
    pub tool_call_count: u64,
    pub rapid_distance: f64,
    pub feed_distance: f64,
    pub total_distance: f64,
    pub estimated_run_time_seconds: f64,
    /// X, Y and Z ranges; axes the program never moves along are omitted
    pub bounding_box: Vec<AxisExtent>,
    pub units: MeasurementSystem,
}

impl ProgramProperties {
    /// Defaults reported while no program is loaded
    pub fn no_file(units: MeasurementSystem) -> Self {
        let file = FileInfo::no_file();
        Self {
            file_name: file.name,
            file_size_bytes: file.size_bytes,
            line_count: 0,
            tool_call_count: 0,
            rapid_distance: 0.0,
            feed_distance: 0.0,
            total_distance: 0.0,
            estimated_run_time_seconds: 0.0,
            bounding_box: Vec::new(),
            units,
        }
    }

    pub fn is_file_loaded(&self) -> bool {
        self.file_name != NO_FILE_LOADED
    }

    fn length_string(&self, value: f64) -> String {
        format!("{} {}", self.units.format_value(value), self.units.label())
    }

    pub fn rapid_distance_string(&self) -> String {
        self.length_string(self.rapid_distance)
    }

    pub fn feed_distance_string(&self) -> String {
        self.length_string(self.feed_distance)
    }

    pub fn total_distance_string(&self) -> String {
        self.length_string(self.total_distance)
    }

    /// Run time estimate as `HH:MM:SS`
    pub fn run_time_string(&self) -> String {
        format_duration(self.estimated_run_time_seconds)
    }

    /// One `"<min> to <max> = <span> <units>"` string per reported axis
    pub fn bounding_box_strings(&self) -> Vec<(Axis, String)> {
        self.bounding_box
            .iter()
            .map(|extent| {
                let text = format!(
                    "{} to {} = {}",
                    self.units.format_value(extent.min),
                    self.units.format_value(extent.max),
                    self.length_string(extent.span())
                );
                (extent.axis, text)
            })
            .collect()
    }

    pub fn value(&self, name: PropertyName) -> PropertyValue {
        match name {
            PropertyName::FileName => PropertyValue::Text(self.file_name.clone()),
            PropertyName::FileSize => PropertyValue::Count(self.file_size_bytes),
            PropertyName::FileLines => PropertyValue::Count(self.line_count),
            PropertyName::ToolCalls => PropertyValue::Count(self.tool_call_count),
            PropertyName::Rapids => PropertyValue::Length(self.rapid_distance),
            PropertyName::Feed => PropertyValue::Length(self.feed_distance),
            PropertyName::PathDistance => PropertyValue::Length(self.total_distance),
            PropertyName::RunTime => PropertyValue::Seconds(self.estimated_run_time_seconds),
            PropertyName::Extents => PropertyValue::Extents(self.bounding_box.clone()),
        }
    }

    pub fn to_display_string(&self, name: PropertyName) -> String {
        match self.value(name) {
            PropertyValue::Text(text) => text,
            PropertyValue::Count(n) => n.to_string(),
            PropertyValue::Length(v) => self.length_string(v),
            PropertyValue::Seconds(s) => format_duration(s),
            PropertyValue::Extents(_) => self
                .bounding_box_strings()
                .into_iter()
                .map(|(axis, text)| format!("{}: {}", axis, text))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl fmt::Display for ProgramProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in PropertyName::ALL {
            if name == PropertyName::Extents {
                for (axis, text) in self.bounding_box_strings() {
                    writeln!(f, "{:<14} {}", format!("{} extents", axis), text)?;
                }
            } else {
                writeln!(f, "{:<14} {}", name.label(), self.to_display_string(name))?;
            }
        }
        Ok(())
    }
}

/// Individually queryable property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyName {
    FileName,
    FileSize,
    FileLines,
    ToolCalls,
    Rapids,
    Feed,
    PathDistance,
    RunTime,
    Extents,
}

impl PropertyName {
    pub const ALL: [PropertyName; 9] = [
        PropertyName::FileName,
        PropertyName::FileSize,
        PropertyName::FileLines,
        PropertyName::ToolCalls,
        PropertyName::Rapids,
        PropertyName::Feed,
        PropertyName::PathDistance,
        PropertyName::RunTime,
        PropertyName::Extents,
    ];

    /// Stable key, e.g. for command-line selection
    pub fn key(self) -> &'static str {
        match self {
            Self::FileName => "file_name",
            Self::FileSize => "file_size",
            Self::FileLines => "file_lines",
            Self::ToolCalls => "tool_calls",
            Self::Rapids => "rapids",
            Self::Feed => "feed",
            Self::PathDistance => "path_distance",
            Self::RunTime => "run_time",
            Self::Extents => "extents",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FileName => "File",
            Self::FileSize => "Size (bytes)",
            Self::FileLines => "Lines",
            Self::ToolCalls => "Tool calls",
            Self::Rapids => "Rapids",
            Self::Feed => "Feed",
            Self::PathDistance => "Path distance",
            Self::RunTime => "Run time",
            Self::Extents => "Extents",
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PropertyName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|name| name.key() == wanted)
            .ok_or_else(|| format!("Unknown property: {}", s))
    }
}

/// Typed value of a single property
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Count(u64),
    /// Length in display units
    Length(f64),
    Seconds(f64),
    Extents(Vec<AxisExtent>),
}

/// Computes [`ProgramProperties`] from a recorded program
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyAggregator {
    units: MeasurementSystem,
    max_rapid_rate: f64,
}

impl Default for PropertyAggregator {
    fn default() -> Self {
        Self::new(MeasurementSystem::default())
    }
}

impl PropertyAggregator {
    pub fn new(units: MeasurementSystem) -> Self {
        Self {
            units,
            max_rapid_rate: DEFAULT_MAX_RAPID_RATE,
        }
    }

    /// Rate (units per second) used for traverses and as the feed ceiling
    pub fn with_max_rapid_rate(mut self, max_rapid_rate: f64) -> Self {
        self.max_rapid_rate = max_rapid_rate;
        self
    }

    pub fn units(&self) -> MeasurementSystem {
        self.units
    }

    pub fn max_rapid_rate(&self) -> f64 {
        self.max_rapid_rate
    }

    pub fn compute(&self, program: &RecordedProgram, file: &FileInfo) -> ProgramProperties {
        let mut rapid = 0.0;
        let mut feed = 0.0;
        let mut run_time = program.dwell_time();
        let mut box_mm = Extents::new();

        for event in program.events() {
            let length = event.length();
            match event {
                MotionEvent::Traverse(_) => {
                    rapid += length;
                    run_time += length / self.max_rapid_rate;
                }
                MotionEvent::LinearFeed(f) | MotionEvent::ArcFeed(f) => {
                    feed += length;
                    run_time += length / self.feed_ceiling(f.feed_rate);
                }
                MotionEvent::Dwell(_) => {}
            }
            if let (Some(start), Some(end)) = (event.start(), event.end()) {
                box_mm.include(start);
                box_mm.include(end);
            }
        }

        let units = self.units;
        let bounding_box = if box_mm.is_empty() {
            Vec::new()
        } else {
            Axis::LINEAR
                .into_iter()
                .map(|axis| AxisExtent {
                    axis,
                    min: units.to_display(box_mm.min()[axis]),
                    max: units.to_display(box_mm.max()[axis]),
                })
                .filter(|extent| extent.min != extent.max)
                .collect()
        };

        ProgramProperties {
            file_name: file.name.clone(),
            file_size_bytes: file.size_bytes,
            line_count: program.num_lines(),
            tool_call_count: program.tool_calls(),
            rapid_distance: units.to_display(rapid),
            feed_distance: units.to_display(feed),
            total_distance: units.to_display(rapid + feed),
            estimated_run_time_seconds: run_time,
            bounding_box,
            units,
        }
    }

    /// Effective rate for a feed move; unusable rates fall back to the rapid rate
    fn feed_ceiling(&self, feed_rate: f64) -> f64 {
        if feed_rate > 0.0 {
            self.max_rapid_rate.min(feed_rate)
        } else {
            self.max_rapid_rate
        }
    }
}
