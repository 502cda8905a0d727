//! Orthogonal wire routing.
//!
//! Everything here is pure: functions read the diagram and hand back new
//! geometry, and callers decide whether to commit it. Dangling references and
//! unroutable wires come back as `None`, never as errors.

pub mod collision;
pub mod detour;
pub mod geometry;
pub mod label_placement;
pub mod wire_path;

use serde::Serialize;

use crate::config::Config;
use crate::ir::{Diagram, Point, RouteMode, Shape, Wire};
use crate::ports::resolve_port;

pub use collision::has_collision;
pub use detour::compute_detour;
pub use geometry::Rect;
pub use label_placement::{Baseline, LabelPlacement, TextAnchor, place_label};
pub use wire_path::{
    Handle, WireGeometry, derive_handles, drag_geometry, midpoint_bend, resolve_polyline, simple_path,
};

/// Everything a renderer or input layer needs to know about one wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRoute {
    pub wire_id: String,
    pub mode: RouteMode,
    pub start: Point,
    pub end: Point,
    pub points: Vec<Point>,
    pub handles: Vec<Handle>,
    pub label: Option<LabelPlacement>,
    /// Whether the wire's simple route crosses an obstacle. Detoured wires
    /// report the state of the route they replaced.
    pub collides: bool,
}

/// Canvas positions of both ends, or `None` if either port is gone.
pub fn endpoints(diagram: &Diagram, wire: &Wire) -> Option<(Point, Point)> {
    let start = resolve_port(diagram, &wire.from);
    let end = resolve_port(diagram, &wire.to);
    match (start, end) {
        (Some(start), Some(end)) => Some((start, end)),
        _ => {
            crate::log::warn!(wire = %wire.id, "skipping wire with a dangling port reference");
            None
        }
    }
}

/// The drawn polyline of `wire`.
pub fn compute_route(diagram: &Diagram, wire: &Wire) -> Option<Vec<Point>> {
    let (start, end) = endpoints(diagram, wire)?;
    Some(resolve_polyline(wire, start, end))
}

pub fn compute_label_placement(wire: &Wire, polyline: &[Point], config: &Config) -> Option<LabelPlacement> {
    if wire.label.trim().is_empty() {
        return None;
    }
    Some(place_label(polyline, wire.label_at, wire.width, &config.labels))
}

pub fn route_wire(diagram: &Diagram, wire: &Wire, config: &Config) -> Option<WireRoute> {
    let (start, end) = endpoints(diagram, wire)?;
    let points = resolve_polyline(wire, start, end);
    let handles = derive_handles(wire, &points);
    let label = compute_label_placement(wire, &points, config);
    let collides = has_collision(wire, start, end, &diagram.shapes, config.routing.margin);
    Some(WireRoute {
        wire_id: wire.id.clone(),
        mode: wire.mode(),
        start,
        end,
        points,
        handles,
        label,
        collides,
    })
}

/// Routes for every wire whose endpoints resolve, in wire order.
pub fn route_all(diagram: &Diagram, config: &Config) -> Vec<WireRoute> {
    diagram
        .wires
        .iter()
        .filter_map(|wire| route_wire(diagram, wire, config))
        .collect()
}

/// Detour bends for a wire whose simple route collides, rounded to whole
/// canvas units. `None` leaves the wire on its simple route.
pub fn smart_bends(wire: &Wire, start: Point, end: Point, shapes: &[Shape], margin: f32) -> Option<Vec<Point>> {
    if !has_collision(wire, start, end, shapes, margin) {
        crate::log::debug!(wire = %wire.id, "no collision, keeping simple route");
        return None;
    }
    let bends = compute_detour(wire, start, end, shapes, margin)?;
    Some(bends.into_iter().map(|p| snap_bend(p, start, end)).collect())
}

/// Rounds a detour point, except for coordinates it shares with an endpoint:
/// rounding those would tilt the first or last segment off its axis.
fn snap_bend(p: Point, start: Point, end: Point) -> Point {
    let snap = |v: f32, a: f32, b: f32| if v == a || v == b { v } else { geometry::round_unit(v) };
    Point::new(snap(p.x, start.x, end.x), snap(p.y, start.y, end.y))
}

/// Applies a handle drag to `wire` in place. Returns `false`, leaving the wire
/// untouched, when the handle is not one of the wire's or the move would
/// break orthogonality.
pub fn apply_handle_drag(wire: &mut Wire, handle: &Handle, dx: f32, dy: f32, start: Point, end: Point) -> bool {
    let origin = WireGeometry::of(wire);
    match drag_geometry(&origin, wire.route, handle, dx, dy, start, end) {
        Some(moved) => {
            moved.commit(wire);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Port, PortRef, PortSide, RouteAxis, ShapeType};

    fn shape(id: &str, x: f32, y: f32, width: f32, height: f32, ports: Vec<Port>) -> Shape {
        Shape {
            id: id.to_string(),
            kind: ShapeType::Combo,
            name: id.to_string(),
            x,
            y,
            width,
            height,
            ports,
            stroke_width: Some(0.0),
            stroke_color: None,
            fill: None,
        }
    }

    fn port(id: &str, side: PortSide) -> Port {
        Port {
            id: id.to_string(),
            name: id.to_string(),
            side,
            offset: 0.5,
            clock: false,
        }
    }

    fn scenario() -> Diagram {
        let mut wire = Wire::new("wire-1", PortRef::new("source", "out"), PortRef::new("target", "in"));
        wire.bend = 250.0;
        wire.label = "data".to_string();
        Diagram {
            canvas_background: String::new(),
            shapes: vec![
                shape("source", 0.0, 0.0, 100.0, 60.0, vec![port("out", PortSide::Right)]),
                shape("target", 400.0, 0.0, 100.0, 60.0, vec![port("in", PortSide::Left)]),
                shape("blocker", 200.0, -10.0, 60.0, 80.0, Vec::new()),
            ],
            wires: vec![wire],
        }
    }

    #[test]
    fn route_reports_collision_and_handles() {
        let diagram = scenario();
        let route = route_wire(&diagram, &diagram.wires[0], &Config::default()).unwrap();
        assert_eq!(route.start, Point::new(100.0, 30.0));
        assert_eq!(route.end, Point::new(400.0, 30.0));
        assert_eq!(route.mode, RouteMode::Simple);
        assert!(route.collides);
        assert_eq!(route.points.len(), 4);
        assert_eq!(route.handles.len(), 1);
        let label = route.label.unwrap();
        assert_eq!(label.anchor, TextAnchor::End);
    }

    #[test]
    fn smart_bends_are_rounded_and_orthogonal() {
        let diagram = scenario();
        let wire = &diagram.wires[0];
        let bends = smart_bends(
            wire,
            Point::new(100.0, 30.0),
            Point::new(400.0, 30.0),
            &diagram.shapes,
            20.0,
        )
        .unwrap();
        assert_eq!(bends.len(), 4);
        assert_eq!(bends[1].y, -50.0);
        assert!(bends.iter().all(|p| p.x.fract() == 0.0 && p.y.fract() == 0.0));
    }

    #[test]
    fn smart_bends_keep_fractional_port_coordinates() {
        let blocker = shape("blocker", 200.0, -10.0, 60.0, 80.0, Vec::new());
        let wire = Wire::new("w", PortRef::new("a", "p"), PortRef::new("b", "q"));
        let start = Point::new(99.5, 30.5);
        let end = Point::new(400.5, 30.5);
        let bends = smart_bends(&wire, start, end, std::slice::from_ref(&blocker), 20.0).unwrap();
        assert_eq!(bends[0].y, 30.5);
        assert_eq!(bends[3].y, 30.5);
        let mut points = vec![start];
        points.extend(bends);
        points.push(end);
        assert!(points.windows(2).all(|s| geometry::is_orthogonal(s[0], s[1])));
    }

    #[test]
    fn clear_wire_gets_no_smart_bends() {
        let wire = Wire::new("w", PortRef::new("a", "p"), PortRef::new("b", "q"));
        assert!(smart_bends(&wire, Point::new(0.0, 0.0), Point::new(100.0, 0.0), &[], 20.0).is_none());
    }

    #[test]
    fn dangling_wire_is_not_routed() {
        let mut diagram = scenario();
        diagram.wires[0].to = PortRef::new("target", "missing");
        assert!(route_wire(&diagram, &diagram.wires[0], &Config::default()).is_none());
        assert!(route_all(&diagram, &Config::default()).is_empty());
        assert!(compute_route(&diagram, &diagram.wires[0]).is_none());
    }

    #[test]
    fn unlabelled_wire_has_no_label_placement() {
        let mut diagram = scenario();
        diagram.wires[0].label = "  ".to_string();
        let route = route_wire(&diagram, &diagram.wires[0], &Config::default()).unwrap();
        assert!(route.label.is_none());
    }

    #[test]
    fn handle_drag_keeps_endpoints() {
        let diagram = scenario();
        let mut wire = diagram.wires[0].clone();
        wire.route = RouteAxis::Horizontal;
        let start = Point::new(100.0, 30.0);
        let end = Point::new(400.0, 30.0);
        wire.bends = smart_bends(&wire, start, end, &diagram.shapes, 20.0);
        let points = resolve_polyline(&wire, start, end);
        let handles = derive_handles(&wire, &points);
        assert!(apply_handle_drag(&mut wire, &handles[1], 0.0, -15.0, start, end));
        let after = resolve_polyline(&wire, start, end);
        assert_eq!(after.first(), Some(&start));
        assert_eq!(after.last(), Some(&end));
        assert!(after.windows(2).all(|s| geometry::is_orthogonal(s[0], s[1])));
        assert_eq!(after[2].y, -65.0);

        let bogus = Handle { segment_index: 0, ..handles[0] };
        let before = wire.clone();
        assert!(!apply_handle_drag(&mut wire, &bogus, 5.0, 5.0, start, end));
        assert_eq!(wire, before);
    }
}
