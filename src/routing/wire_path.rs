use serde::Serialize;

use crate::ir::{Point, RouteAxis, Wire};

use super::geometry::{is_orthogonal, round_unit};

/// Draggable affordance bound to one segment of a wire's polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Handle {
    pub position: Point,
    pub segment_index: usize,
    pub is_horizontal: bool,
}

/// The mutable part of a wire's route, detached from the wire.
///
/// Drags and route edits produce a new value; the caller commits it.
#[derive(Debug, Clone, PartialEq)]
pub struct WireGeometry {
    pub bend: f32,
    pub bends: Option<Vec<Point>>,
}

impl WireGeometry {
    pub fn of(wire: &Wire) -> Self {
        Self {
            bend: wire.bend,
            bends: wire.bends.clone(),
        }
    }

    pub fn commit(self, wire: &mut Wire) {
        wire.bend = self.bend;
        wire.bends = self.bends;
    }

    fn detour(&self) -> Option<&[Point]> {
        self.bends.as_deref().filter(|bends| !bends.is_empty())
    }
}

/// The three-segment path with a single free offset.
pub fn simple_path(axis: RouteAxis, bend: f32, start: Point, end: Point) -> [Point; 4] {
    match axis {
        RouteAxis::Horizontal => [
            start,
            Point::new(bend, start.y),
            Point::new(bend, end.y),
            end,
        ],
        RouteAxis::Vertical => [
            start,
            Point::new(start.x, bend),
            Point::new(end.x, bend),
            end,
        ],
    }
}

/// Midpoint offset for a fresh simple route.
pub fn midpoint_bend(axis: RouteAxis, start: Point, end: Point) -> f32 {
    match axis {
        RouteAxis::Horizontal => round_unit((start.x + end.x) / 2.0),
        RouteAxis::Vertical => round_unit((start.y + end.y) / 2.0),
    }
}

pub fn resolve_polyline(wire: &Wire, start: Point, end: Point) -> Vec<Point> {
    match wire.detour() {
        Some(bends) => {
            let mut points = Vec::with_capacity(bends.len() + 2);
            points.push(start);
            points.extend_from_slice(bends);
            points.push(end);
            points
        }
        None => simple_path(wire.route, wire.bend, start, end).to_vec(),
    }
}

fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Orientation of segment `idx`; a zero-length segment takes the turn
/// implied by its neighbours.
fn segment_is_horizontal(points: &[Point], idx: usize) -> bool {
    let (a, b) = (points[idx], points[idx + 1]);
    if a.y == b.y && a.x != b.x {
        return true;
    }
    if a.x == b.x && a.y != b.y {
        return false;
    }
    let neighbour = |j: usize| {
        let (p, q) = (points[j], points[j + 1]);
        if p == q { None } else { Some(p.y == q.y) }
    };
    let prev = (idx > 0).then(|| neighbour(idx - 1)).flatten();
    let next = (idx + 2 < points.len()).then(|| neighbour(idx + 1)).flatten();
    match prev.or(next) {
        Some(horizontal) => !horizontal,
        None => false,
    }
}

/// Handles for a resolved polyline.
///
/// A simple route has one handle on its middle segment. A detour has one per
/// segment between two stored bend points; the first and last segments end on
/// a port and cannot move.
pub fn derive_handles(wire: &Wire, polyline: &[Point]) -> Vec<Handle> {
    if polyline.len() < 2 {
        return Vec::new();
    }
    if wire.detour().is_none() {
        if polyline.len() != 4 {
            return Vec::new();
        }
        return vec![Handle {
            position: midpoint(polyline[1], polyline[2]),
            segment_index: 1,
            is_horizontal: wire.route == RouteAxis::Vertical,
        }];
    }
    let last = polyline.len() - 2;
    (1..last)
        .map(|idx| Handle {
            position: midpoint(polyline[idx], polyline[idx + 1]),
            segment_index: idx,
            is_horizontal: segment_is_horizontal(polyline, idx),
        })
        .collect()
}

/// Moves the segment under `handle` by `(dx, dy)` from `origin`, keeping it on
/// its axis. Returns `None` if the handle doesn't belong to this route or the
/// move would leave a diagonal segment.
pub fn drag_geometry(
    origin: &WireGeometry,
    axis: RouteAxis,
    handle: &Handle,
    dx: f32,
    dy: f32,
    start: Point,
    end: Point,
) -> Option<WireGeometry> {
    let Some(bends) = origin.detour() else {
        if handle.segment_index != 1 {
            return None;
        }
        let delta = match axis {
            RouteAxis::Horizontal => dx,
            RouteAxis::Vertical => dy,
        };
        return Some(WireGeometry {
            bend: round_unit(origin.bend + delta),
            bends: None,
        });
    };

    // Segment i of [start, b0, .., bn-1, end] joins bends i-1 and i.
    let idx = handle.segment_index;
    if idx == 0 || idx >= bends.len() {
        return None;
    }
    let mut moved = bends.to_vec();
    for bend in &mut moved[idx - 1..=idx] {
        if handle.is_horizontal {
            bend.y = round_unit(bend.y + dy);
        } else {
            bend.x = round_unit(bend.x + dx);
        }
    }

    let connected = std::iter::once(start)
        .chain(moved.iter().copied())
        .chain(std::iter::once(end))
        .collect::<Vec<_>>();
    if !connected.windows(2).all(|s| is_orthogonal(s[0], s[1])) {
        return None;
    }
    Some(WireGeometry {
        bend: origin.bend,
        bends: Some(moved),
    })
}
