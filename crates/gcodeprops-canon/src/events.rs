//! Motion events recorded from canon callbacks.

use gcodeprops_core::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Motion class of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionClass {
    Traverse,
    LinearFeed,
    ArcFeed,
    Dwell,
}

impl fmt::Display for MotionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Traverse => write!(f, "traverse"),
            Self::LinearFeed => write!(f, "feed"),
            Self::ArcFeed => write!(f, "arcfeed"),
            Self::Dwell => write!(f, "dwell"),
        }
    }
}

/// Rapid, non-cutting move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traverse {
    pub line_number: i64,
    pub start: Position,
    pub end: Position,
    /// Tool-length offset active when the move was recorded
    pub tool_offset: Position,
}

/// Cutting move at a controlled rate (linear or one arc segment)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub line_number: i64,
    pub start: Position,
    pub end: Position,
    /// Feed rate in units per second
    pub feed_rate: f64,
    /// Tool-length offset active when the move was recorded
    pub tool_offset: Position,
}

/// Pause at the current position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dwell {
    pub line_number: i64,
    pub position: Position,
    pub duration_seconds: f64,
}

/// One recorded motion primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionEvent {
    Traverse(Traverse),
    LinearFeed(Feed),
    ArcFeed(Feed),
    Dwell(Dwell),
}

impl MotionEvent {
    pub fn class(&self) -> MotionClass {
        match self {
            Self::Traverse(_) => MotionClass::Traverse,
            Self::LinearFeed(_) => MotionClass::LinearFeed,
            Self::ArcFeed(_) => MotionClass::ArcFeed,
            Self::Dwell(_) => MotionClass::Dwell,
        }
    }

    pub fn line_number(&self) -> i64 {
        match self {
            Self::Traverse(t) => t.line_number,
            Self::LinearFeed(f) | Self::ArcFeed(f) => f.line_number,
            Self::Dwell(d) => d.line_number,
        }
    }

    /// Start point; `None` for dwells
    pub fn start(&self) -> Option<&Position> {
        match self {
            Self::Traverse(t) => Some(&t.start),
            Self::LinearFeed(f) | Self::ArcFeed(f) => Some(&f.start),
            Self::Dwell(_) => None,
        }
    }

    /// End point; `None` for dwells
    pub fn end(&self) -> Option<&Position> {
        match self {
            Self::Traverse(t) => Some(&t.end),
            Self::LinearFeed(f) | Self::ArcFeed(f) => Some(&f.end),
            Self::Dwell(_) => None,
        }
    }

    /// Feed rate for feed and arc moves
    pub fn feed_rate(&self) -> Option<f64> {
        match self {
            Self::LinearFeed(f) | Self::ArcFeed(f) => Some(f.feed_rate),
            _ => None,
        }
    }

    /// Euclidean length over X/Y/Z; zero for dwells
    pub fn length(&self) -> f64 {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => start.distance_xyz(end),
            _ => 0.0,
        }
    }

    pub fn is_motion(&self) -> bool {
        !matches!(self, Self::Dwell(_))
    }
}

/// Traverse events in call order
pub fn traverses(events: &[MotionEvent]) -> impl Iterator<Item = &Traverse> {
    events.iter().filter_map(|e| match e {
        MotionEvent::Traverse(t) => Some(t),
        _ => None,
    })
}

/// Linear feed events in call order
pub fn linear_feeds(events: &[MotionEvent]) -> impl Iterator<Item = &Feed> {
    events.iter().filter_map(|e| match e {
        MotionEvent::LinearFeed(f) => Some(f),
        _ => None,
    })
}

/// Arc feed segments in call order
pub fn arc_feeds(events: &[MotionEvent]) -> impl Iterator<Item = &Feed> {
    events.iter().filter_map(|e| match e {
        MotionEvent::ArcFeed(f) => Some(f),
        _ => None,
    })
}

/// Dwell events in call order
pub fn dwells(events: &[MotionEvent]) -> impl Iterator<Item = &Dwell> {
    events.iter().filter_map(|e| match e {
        MotionEvent::Dwell(d) => Some(d),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(start: Position, end: Position) -> Feed {
        Feed {
            line_number: 7,
            start,
            end,
            feed_rate: 10.0,
            tool_offset: Position::ORIGIN,
        }
    }

    #[test]
    fn test_event_accessors() {
        let event = MotionEvent::ArcFeed(feed(Position::ORIGIN, Position::xyz(0.0, 3.0, 4.0)));
        assert_eq!(event.class(), MotionClass::ArcFeed);
        assert_eq!(event.line_number(), 7);
        assert_eq!(event.length(), 5.0);
        assert_eq!(event.feed_rate(), Some(10.0));
        assert!(event.is_motion());
    }

    #[test]
    fn test_dwell_has_no_geometry() {
        let event = MotionEvent::Dwell(Dwell {
            line_number: 2,
            position: Position::xyz(1.0, 1.0, 1.0),
            duration_seconds: 0.5,
        });
        assert!(event.start().is_none());
        assert!(event.end().is_none());
        assert_eq!(event.length(), 0.0);
        assert_eq!(event.feed_rate(), None);
        assert!(!event.is_motion());
    }

    #[test]
    fn test_per_class_iteration_keeps_order() {
        let events = vec![
            MotionEvent::LinearFeed(feed(Position::ORIGIN, Position::xyz(1.0, 0.0, 0.0))),
            MotionEvent::Traverse(Traverse {
                line_number: 1,
                start: Position::xyz(1.0, 0.0, 0.0),
                end: Position::xyz(2.0, 0.0, 0.0),
                tool_offset: Position::ORIGIN,
            }),
            MotionEvent::LinearFeed(feed(Position::xyz(2.0, 0.0, 0.0), Position::xyz(3.0, 0.0, 0.0))),
        ];
        let ends: Vec<f64> = linear_feeds(&events).map(|f| f.end.x()).collect();
        assert_eq!(ends, vec![1.0, 3.0]);
        assert_eq!(traverses(&events).count(), 1);
        assert_eq!(arc_feeds(&events).count(), 0);
        assert_eq!(dwells(&events).count(), 0);
    }

    #[test]
    fn test_serde_tagging() {
        let event = MotionEvent::LinearFeed(feed(Position::ORIGIN, Position::xyz(1.0, 0.0, 0.0)));
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["kind"], "linear_feed");
        let back: MotionEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
