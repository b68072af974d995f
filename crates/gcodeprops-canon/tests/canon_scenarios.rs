//! End-to-end scenarios: canon callbacks in, program properties out

use gcodeprops_canon::{
    ArcSpec, Canon, FileInfo, InterpreterState, MotionClass, ProgramAccumulator,
    PropertyAggregator, PropertyName,
};
use gcodeprops_core::{Axis, MeasurementSystem, Plane, Position};

fn file() -> FileInfo {
    FileInfo {
        name: "scenario.ngc".to_string(),
        size_bytes: 64,
    }
}

fn arc(end: (f64, f64), center: (f64, f64), rotation: i32, axial: f64) -> ArcSpec {
    ArcSpec {
        end_first: end.0,
        end_second: end.1,
        center_first: center.0,
        center_second: center.1,
        rotation,
        end_axial: axial,
        a: 0.0,
        b: 0.0,
        c: 0.0,
        u: 0.0,
        v: 0.0,
        w: 0.0,
    }
}

#[test]
fn test_three_traverses_give_twenty_mm_of_rapids() {
    let mut acc = ProgramAccumulator::new();
    acc.straight_traverse(Position::xyz(0.0, 0.0, 0.0));
    acc.straight_traverse(Position::xyz(10.0, 0.0, 0.0));
    acc.straight_traverse(Position::xyz(10.0, 10.0, 0.0));

    let props = PropertyAggregator::default().compute(&acc.into_program(), &file());
    assert_eq!(props.rapid_distance, 20.0);
    assert_eq!(props.feed_distance, 0.0);
    assert_eq!(props.to_display_string(PropertyName::Rapids), "20.000 mm");
    // 20 mm at the rapid rate of 100 per second
    assert!((props.estimated_run_time_seconds - 0.2).abs() < 1e-12);
}

#[test]
fn test_only_next_line_is_zero_motion() {
    let mut acc = ProgramAccumulator::new();
    for line in 1..=5 {
        acc.next_line(&InterpreterState::at_line(line));
    }
    let props = PropertyAggregator::default().compute(&acc.into_program(), &file());
    assert_eq!(props.line_count, 5);
    assert_eq!(props.rapid_distance, 0.0);
    assert_eq!(props.feed_distance, 0.0);
    assert_eq!(props.estimated_run_time_seconds, 0.0);
    assert!(props.bounding_box.is_empty());
}

#[test]
fn test_circle_length_close_to_circumference() {
    let mut acc = ProgramAccumulator::new();
    acc.straight_traverse(Position::xyz(10.0, 0.0, 0.0));
    acc.set_feed_rate(600.0);
    acc.arc_feed(&arc((10.0, 0.0), (0.0, 0.0), 1, 0.0));
    let program = acc.into_program();

    assert!(program.events().iter().all(|e| e.class() == MotionClass::ArcFeed));
    let props = PropertyAggregator::default().compute(&program, &file());
    let circumference = 2.0 * std::f64::consts::PI * 10.0;
    assert!(props.feed_distance < circumference);
    assert!(circumference - props.feed_distance < 0.01);

    let x = props.bounding_box.iter().find(|e| e.axis == Axis::X).copied();
    assert!(x.is_some_and(|e| (e.min + 10.0).abs() < 1e-9 && (e.max - 10.0).abs() < 1e-9));
}

#[test]
fn test_helix_in_yz_plane() {
    let mut acc = ProgramAccumulator::new().with_arc_division(32);
    acc.set_plane(Plane::YZ);
    acc.straight_feed(Position::xyz(0.0, 5.0, 0.0));
    // YZ: first = Y, second = Z, axial = X
    acc.arc_feed(&arc((-5.0, 0.0), (0.0, 0.0), 1, 8.0));

    let arcs: Vec<_> = acc.arc_feeds().collect();
    let last = arcs.last().map(|f| f.end.linear());
    assert_eq!(last, Some([8.0, -5.0, 0.0]));
    assert!(arcs.iter().all(|f| f.start.x() <= f.end.x()));
    assert!(arcs.iter().any(|f| f.end.z() > 4.9));
}

#[test]
fn test_rotated_coordinate_system() {
    let mut acc = ProgramAccumulator::new();
    acc.set_xy_rotation(90.0);
    acc.straight_feed(Position::xyz(10.0, 0.0, 0.0));
    let end = acc.last_position();
    assert!(end.x().abs() < 1e-9);
    assert!((end.y() - 10.0).abs() < 1e-9);
}

#[test]
fn test_hidden_toolpath_does_not_count() {
    let mut acc = ProgramAccumulator::new();
    acc.straight_feed(Position::xyz(10.0, 0.0, 0.0));
    acc.comment("AXIS,hide");
    acc.straight_feed(Position::xyz(10.0, 500.0, 0.0));
    acc.comment("AXIS,show");
    acc.straight_feed(Position::xyz(20.0, 0.0, 0.0));

    let props = PropertyAggregator::default().compute(&acc.into_program(), &file());
    assert_eq!(props.feed_distance, 20.0);
    assert!(props.bounding_box.iter().all(|e| e.axis != Axis::Y));
}

#[test]
fn test_imperial_report() {
    let mut acc = ProgramAccumulator::new();
    acc.straight_traverse(Position::xyz(0.0, 0.0, 0.0));
    acc.straight_traverse(Position::xyz(25.4, 0.0, 0.0));
    acc.change_tool(1);
    acc.change_tool(-1);

    let props = PropertyAggregator::new(MeasurementSystem::Imperial)
        .compute(&acc.into_program(), &file());
    assert_eq!(props.to_display_string(PropertyName::Rapids), "1.0000 in");
    assert_eq!(props.to_display_string(PropertyName::ToolCalls), "1");
    assert_eq!(
        props.to_display_string(PropertyName::Extents),
        "X: 0.0000 to 1.0000 = 1.0000 in"
    );
}
