//! # gcodeprops canon
//!
//! Records the canon callbacks of an external G-code interpreter into an
//! ordered motion list and derives program properties from it: path lengths,
//! run time estimate, bounding box, line and tool-call counts.
//!
//! The usual flow is [`ProgramLoader::load`], which drives an [`Interpreter`]
//! against a fresh [`ProgramAccumulator`], freezes it into a
//! [`RecordedProgram`] and hands that to the [`PropertyAggregator`].

pub mod accumulator;
pub mod arc;
pub mod cancel;
pub mod canon;
pub mod events;
pub mod loader;
pub mod program;
pub mod properties;
pub mod trace;
pub mod transform;

pub use accumulator::ProgramAccumulator;
pub use arc::{ArcRequest, ArcTessellator, CircularSegments, SegmentGenerator};
pub use cancel::CancelToken;
pub use canon::{ArcSpec, Canon, InterpreterState};
pub use events::{Dwell, Feed, MotionClass, MotionEvent, Traverse};
pub use loader::{
    InterpretRequest, InterpretSummary, Interpreter, InterpreterError, LoadedProgram,
    LoaderSettings, ProgramLoader,
};
pub use program::RecordedProgram;
pub use properties::{
    AxisExtent, FileInfo, ProgramProperties, PropertyAggregator, PropertyName, PropertyValue,
};
pub use trace::{CanonCall, TraceInterpreter};
pub use transform::CoordinateContext;
