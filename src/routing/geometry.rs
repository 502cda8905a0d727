use crate::ir::{Point, Shape};

/// Axis-aligned obstacle rectangle, already grown by the clearance margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn union(self, other: Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Closed-interval overlap; touching edges count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }

    pub fn expand(self, pad: f32) -> Rect {
        Rect {
            left: self.left - pad,
            top: self.top - pad,
            right: self.right + pad,
            bottom: self.bottom + pad,
        }
    }
}

pub fn rect_from_shape(shape: &Shape, margin: f32) -> Rect {
    Rect {
        left: shape.x - margin,
        top: shape.y - margin,
        right: shape.x + shape.width + margin,
        bottom: shape.y + shape.height + margin,
    }
}

/// Bounding box of two points.
pub fn span(a: Point, b: Point) -> Rect {
    Rect {
        left: a.x.min(b.x),
        top: a.y.min(b.y),
        right: a.x.max(b.x),
        bottom: a.y.max(b.y),
    }
}

/// Strict interior test; points on the boundary are outside.
pub fn point_in_rect(p: Point, rect: &Rect) -> bool {
    p.x > rect.left && p.x < rect.right && p.y > rect.top && p.y < rect.bottom
}

/// Horizontal segment at `y` between `x1` and `x2`, boundary-exclusive.
pub fn h_segment_intersects_rect(y: f32, x1: f32, x2: f32, rect: &Rect) -> bool {
    if y <= rect.top || y >= rect.bottom {
        return false;
    }
    let min_x = x1.min(x2);
    let max_x = x1.max(x2);
    max_x > rect.left && min_x < rect.right
}

/// Vertical segment at `x` between `y1` and `y2`, boundary-exclusive.
pub fn v_segment_intersects_rect(x: f32, y1: f32, y2: f32, rect: &Rect) -> bool {
    if x <= rect.left || x >= rect.right {
        return false;
    }
    let min_y = y1.min(y2);
    let max_y = y1.max(y2);
    max_y > rect.top && min_y < rect.bottom
}

/// Dispatches to the horizontal/vertical test. A diagonal segment never comes
/// out of the router; if one is handed in, its bounding box is tested.
pub fn segment_intersects_rect(a: Point, b: Point, rect: &Rect) -> bool {
    if a.y == b.y {
        h_segment_intersects_rect(a.y, a.x, b.x, rect)
    } else if a.x == b.x {
        v_segment_intersects_rect(a.x, a.y, b.y, rect)
    } else {
        let bbox = span(a, b);
        bbox.right > rect.left
            && bbox.left < rect.right
            && bbox.bottom > rect.top
            && bbox.top < rect.bottom
    }
}

pub fn is_orthogonal(a: Point, b: Point) -> bool {
    a.x == b.x || a.y == b.y
}

/// Rounds half-up to a whole canvas unit (so -2.5 becomes -2).
pub fn round_unit(value: f32) -> f32 {
    (value + 0.5).floor()
}

pub fn round_point(p: Point) -> Point {
    Point::new(round_unit(p.x), round_unit(p.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ShapeType;

    fn shape(x: f32, y: f32, width: f32, height: f32) -> Shape {
        Shape {
            id: "s".to_string(),
            kind: ShapeType::Logic,
            name: String::new(),
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

    #[test]
    fn margin_expands_all_sides() {
        let rect = rect_from_shape(&shape(100.0, 100.0, 100.0, 50.0), 20.0);
        assert_eq!(
            rect,
            Rect {
                left: 80.0,
                top: 80.0,
                right: 220.0,
                bottom: 170.0
            }
        );
    }

    #[test]
    fn horizontal_segment_on_edge_does_not_collide() {
        let rect = rect_from_shape(&shape(100.0, 100.0, 100.0, 50.0), 20.0);
        assert!(h_segment_intersects_rect(100.0, 0.0, 300.0, &rect));
        assert!(!h_segment_intersects_rect(80.0, 0.0, 300.0, &rect));
        assert!(!h_segment_intersects_rect(170.0, 0.0, 300.0, &rect));
        // Ends exactly at the left edge.
        assert!(!h_segment_intersects_rect(100.0, 0.0, 80.0, &rect));
    }

    #[test]
    fn vertical_segment_on_edge_does_not_collide() {
        let rect = rect_from_shape(&shape(100.0, 100.0, 100.0, 50.0), 20.0);
        assert!(v_segment_intersects_rect(150.0, 0.0, 300.0, &rect));
        assert!(!v_segment_intersects_rect(80.0, 0.0, 300.0, &rect));
        assert!(!v_segment_intersects_rect(220.0, 0.0, 300.0, &rect));
        assert!(!v_segment_intersects_rect(150.0, 170.0, 400.0, &rect));
    }

    #[test]
    fn degenerate_rect_intersects_nothing() {
        let dot = Rect {
            left: 10.0,
            top: 10.0,
            right: 10.0,
            bottom: 10.0,
        };
        assert!(!h_segment_intersects_rect(10.0, -50.0, 50.0, &dot));
        assert!(!v_segment_intersects_rect(10.0, -50.0, 50.0, &dot));
        assert!(!point_in_rect(Point::new(10.0, 10.0), &dot));
    }

    #[test]
    fn point_on_boundary_is_outside() {
        let rect = rect_from_shape(&shape(0.0, 0.0, 10.0, 10.0), 0.0);
        assert!(point_in_rect(Point::new(5.0, 5.0), &rect));
        assert!(!point_in_rect(Point::new(0.0, 5.0), &rect));
        assert!(!point_in_rect(Point::new(5.0, 10.0), &rect));
    }

    #[test]
    fn round_unit_rounds_half_up() {
        assert_eq!(round_unit(2.5), 3.0);
        assert_eq!(round_unit(-2.5), -2.0);
        assert_eq!(round_unit(-2.6), -3.0);
    }
}
