use crate::ir::{Point, Shape, Wire};

use super::geometry::{Rect, rect_from_shape, segment_intersects_rect};
use super::wire_path::simple_path;

/// True when any segment of the wire's simple route crosses the interior of a
/// margin-grown shape.
///
/// Every shape is tested, the wire's own endpoint shapes included: a wide
/// source block can sit between its port and the bend line.
pub fn has_collision(wire: &Wire, start: Point, end: Point, shapes: &[Shape], margin: f32) -> bool {
    let path = simple_path(wire.route, wire.bend, start, end);
    match colliding_shape(&path, shapes, margin) {
        Some(shape) => {
            crate::log::debug!(wire = %wire.id, shape = %shape.id, "simple route collides");
            true
        }
        None => false,
    }
}

/// First shape (in canvas order) whose grown rectangle a segment of `points`
/// crosses.
pub fn colliding_shape<'a>(points: &[Point], shapes: &'a [Shape], margin: f32) -> Option<&'a Shape> {
    shapes.iter().find(|shape| {
        let rect = rect_from_shape(shape, margin);
        path_hits_rect(points, &rect)
    })
}

pub fn path_collides(points: &[Point], rects: &[Rect]) -> bool {
    rects.iter().any(|rect| path_hits_rect(points, rect))
}

fn path_hits_rect(points: &[Point], rect: &Rect) -> bool {
    points
        .windows(2)
        .any(|segment| segment_intersects_rect(segment[0], segment[1], rect))
}
