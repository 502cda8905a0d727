// Smart router: a single-pass detour around the hull of every obstacle that
// touches the wire's span. The detour itself is not re-checked against shapes
// outside that hull, and only two candidates are compared.

use crate::ir::{Point, RouteAxis, Shape, Wire};

use super::geometry::{Rect, rect_from_shape, span};

/// Four intermediate points that take the wire around the obstacles, or `None`
/// when no shape lies within a margin of the wire's span.
pub fn compute_detour(
    wire: &Wire,
    start: Point,
    end: Point,
    shapes: &[Shape],
    margin: f32,
) -> Option<Vec<Point>> {
    let hull = obstacle_hull(start, end, shapes, margin)?;
    let route = match wire.route {
        RouteAxis::Horizontal => detour_horizontal(start, end, &hull, margin),
        RouteAxis::Vertical => detour_vertical(start, end, &hull, margin),
    };
    Some(route)
}

/// Union of the grown rectangles of every shape near the wire's span.
pub fn obstacle_hull(start: Point, end: Point, shapes: &[Shape], margin: f32) -> Option<Rect> {
    let window = span(start, end).expand(margin);
    shapes
        .iter()
        .map(|shape| rect_from_shape(shape, margin))
        .filter(|rect| rect.overlaps(&window))
        .reduce(Rect::union)
}

/// Offset of the vertical (or horizontal) leg that leaves an endpoint.
///
/// An endpoint already past one side of the hull exits on that side; one
/// inside the hull's span exits toward the nearer side, low side on ties.
fn exit_offset(coord: f32, low: f32, high: f32, margin: f32) -> f32 {
    if coord >= high - margin {
        high + margin
    } else if coord <= low + margin {
        low - margin
    } else if high - coord < coord - low {
        high + margin
    } else {
        low - margin
    }
}

/// Picks the cheaper candidate; on equal cost the first one wins.
fn cheapest(candidates: [(f32, Vec<Point>); 2]) -> Vec<Point> {
    let [first, second] = candidates;
    if second.0 < first.0 {
        crate::log::debug!(cost = second.0, "detour: second candidate");
        second.1
    } else {
        crate::log::debug!(cost = first.0, "detour: first candidate");
        first.1
    }
}

fn detour_horizontal(start: Point, end: Point, hull: &Rect, margin: f32) -> Vec<Point> {
    let mid_x1 = exit_offset(start.x, hull.left, hull.right, margin);
    let mid_x2 = exit_offset(end.x, hull.left, hull.right, margin);
    let candidate = |clear_y: f32| {
        let cost = (clear_y - start.y).abs() + (clear_y - end.y).abs();
        let points = vec![
            Point::new(mid_x1, start.y),
            Point::new(mid_x1, clear_y),
            Point::new(mid_x2, clear_y),
            Point::new(mid_x2, end.y),
        ];
        (cost, points)
    };
    cheapest([candidate(hull.top - margin), candidate(hull.bottom + margin)])
}

fn detour_vertical(start: Point, end: Point, hull: &Rect, margin: f32) -> Vec<Point> {
    let mid_y1 = exit_offset(start.y, hull.top, hull.bottom, margin);
    let mid_y2 = exit_offset(end.y, hull.top, hull.bottom, margin);
    let candidate = |clear_x: f32| {
        let cost = (clear_x - start.x).abs() + (clear_x - end.x).abs();
        let points = vec![
            Point::new(start.x, mid_y1),
            Point::new(clear_x, mid_y1),
            Point::new(clear_x, mid_y2),
            Point::new(end.x, mid_y2),
        ];
        (cost, points)
    };
    cheapest([candidate(hull.left - margin), candidate(hull.right + margin)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{PortRef, ShapeType};
    use crate::routing::collision::{has_collision, path_collides};
    use crate::routing::geometry::is_orthogonal;

    const MARGIN: f32 = 20.0;

    fn shape(id: &str, x: f32, y: f32, width: f32, height: f32) -> Shape {
        Shape {
            id: id.to_string(),
            kind: ShapeType::Combo,
            name: id.to_string(),
            x,
            y,
            width,
            height,
            ports: Vec::new(),
            stroke_width: None,
            stroke_color: None,
            fill: None,
        }
    }

    fn wire(route: RouteAxis, bend: f32) -> Wire {
        let mut wire = Wire::new("w", PortRef::new("source", "out"), PortRef::new("target", "in"));
        wire.route = route;
        wire.bend = bend;
        wire
    }

    fn full_path(start: Point, bends: &[Point], end: Point) -> Vec<Point> {
        let mut points = vec![start];
        points.extend_from_slice(bends);
        points.push(end);
        points
    }

    #[test]
    fn equal_cost_goes_above() {
        let shapes = vec![
            shape("source", 0.0, 0.0, 100.0, 60.0),
            shape("target", 400.0, 0.0, 100.0, 60.0),
            shape("blocker", 200.0, -10.0, 60.0, 80.0),
        ];
        let start = Point::new(100.0, 30.0);
        let end = Point::new(400.0, 30.0);
        let wire = wire(RouteAxis::Horizontal, 250.0);
        assert!(has_collision(&wire, start, end, &shapes, MARGIN));

        let hull = obstacle_hull(start, end, &shapes, MARGIN).unwrap();
        assert_eq!(hull.top, -30.0);
        assert_eq!(hull.bottom, 90.0);

        let detour = compute_detour(&wire, start, end, &shapes, MARGIN).unwrap();
        assert_eq!(detour.len(), 4);
        // 80 + 80 above versus 80 + 80 below: the tie keeps the upper route.
        assert_eq!(detour[1].y, -50.0);
        assert_eq!(detour[2].y, -50.0);
        assert!(detour[1].y < hull.top);
        assert_eq!(detour[0], Point::new(-40.0, 30.0));
        assert_eq!(detour[3], Point::new(540.0, 30.0));
    }

    #[test]
    fn detour_clears_a_free_standing_blocker() {
        let shapes = vec![shape("blocker", 200.0, -10.0, 60.0, 80.0)];
        let start = Point::new(100.0, 30.0);
        let end = Point::new(400.0, 30.0);
        let wire = wire(RouteAxis::Horizontal, 250.0);
        assert!(has_collision(&wire, start, end, &shapes, MARGIN));

        let detour = compute_detour(&wire, start, end, &shapes, MARGIN).unwrap();
        assert_eq!(
            detour,
            vec![
                Point::new(160.0, 30.0),
                Point::new(160.0, -50.0),
                Point::new(300.0, -50.0),
                Point::new(300.0, 30.0),
            ]
        );
        let path = full_path(start, &detour, end);
        assert!(path.windows(2).all(|s| is_orthogonal(s[0], s[1])));
        let hull = obstacle_hull(start, end, &shapes, MARGIN).unwrap();
        assert!(!path_collides(&path, &[hull]));
    }

    #[test]
    fn cheaper_side_wins() {
        // Endpoints sit low, so running below is shorter.
        let shapes = vec![shape("blocker", 200.0, 0.0, 60.0, 100.0)];
        let start = Point::new(100.0, 90.0);
        let end = Point::new(400.0, 90.0);
        let wire = wire(RouteAxis::Horizontal, 250.0);
        let detour = compute_detour(&wire, start, end, &shapes, MARGIN).unwrap();
        assert_eq!(detour[1].y, 140.0);
    }

    #[test]
    fn vertical_first_routes_left_or_right() {
        let shapes = vec![shape("blocker", -30.0, 200.0, 80.0, 60.0)];
        let start = Point::new(30.0, 100.0);
        let end = Point::new(30.0, 400.0);
        let wire = wire(RouteAxis::Vertical, 250.0);
        assert!(has_collision(&wire, start, end, &shapes, MARGIN));

        let detour = compute_detour(&wire, start, end, &shapes, MARGIN).unwrap();
        // Hull x: -50..70. Left costs 100 + 100, right 60 + 60.
        assert_eq!(
            detour,
            vec![
                Point::new(30.0, 160.0),
                Point::new(90.0, 160.0),
                Point::new(90.0, 300.0),
                Point::new(30.0, 300.0),
            ]
        );
        let path = full_path(start, &detour, end);
        assert!(path.windows(2).all(|s| is_orthogonal(s[0], s[1])));
        assert!(!path_collides(&path, &[obstacle_hull(start, end, &shapes, MARGIN).unwrap()]));
    }

    #[test]
    fn far_away_shapes_are_ignored() {
        let shapes = vec![shape("far", 1000.0, 1000.0, 50.0, 50.0)];
        let wire = wire(RouteAxis::Horizontal, 50.0);
        assert!(compute_detour(&wire, Point::new(0.0, 0.0), Point::new(100.0, 0.0), &shapes, MARGIN).is_none());
        assert!(compute_detour(&wire, Point::new(0.0, 0.0), Point::new(100.0, 0.0), &[], MARGIN).is_none());
    }

    #[test]
    fn endpoint_inside_hull_exits_toward_nearer_side() {
        assert_eq!(exit_offset(90.0, 0.0, 100.0, MARGIN), 120.0);
        assert_eq!(exit_offset(30.0, 0.0, 100.0, MARGIN), -20.0);
        // Halfway: low side.
        assert_eq!(exit_offset(50.0, 0.0, 100.0, MARGIN), -20.0);
        assert_eq!(exit_offset(60.0, 0.0, 100.0, MARGIN), 120.0);
    }
}
