//! Port position resolution.
//!
//! Maps a `PortRef` to canvas coordinates. The outline variant only matters
//! here; everything downstream sees shapes as bounding boxes.

use crate::ir::{Diagram, Point, Port, PortRef, PortSide, Shape, ShapeType};

/// Angle of the mux slanted edges, measured from the vertical.
const MUX_SLOPE_ANGLE_DEG: f32 = 60.0;
const MUX_MIN_CUT: f32 = 8.0;
const MUX_MIN_RIGHT: f32 = 12.0;

const EXTENDER_SLOPE_RATIO: f32 = 0.25;
const EXTENDER_MIN_OFFSET: f32 = 10.0;
const EXTENDER_EDGE_PADDING: f32 = 18.0;

/// Stroke width assumed for shapes that don't set one.
const DEFAULT_PORT_STROKE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeGeometry {
    Rectangular,
    /// Mux outline: right edge shortened by `cut` at both ends.
    Trapezoidal { cut: f32 },
    /// Extender outline: top-left corner lowered by `offset`.
    Skewed { offset: f32 },
}

impl ShapeGeometry {
    pub fn of(shape: &Shape) -> Self {
        match shape.kind {
            ShapeType::Mux => Self::Trapezoidal {
                cut: mux_cut(shape.width),
            },
            ShapeType::Extender => Self::Skewed {
                offset: extender_offset(shape.height),
            },
            _ => Self::Rectangular,
        }
    }

    /// Outline vertices in shape-local coordinates, clockwise from top-left.
    pub fn outline(self, width: f32, height: f32) -> Vec<Point> {
        match self {
            Self::Rectangular => vec![
                Point::new(0.0, 0.0),
                Point::new(width, 0.0),
                Point::new(width, height),
                Point::new(0.0, height),
            ],
            Self::Trapezoidal { cut } => vec![
                Point::new(0.0, 0.0),
                Point::new(width, cut),
                Point::new(width, height - cut),
                Point::new(0.0, height),
            ],
            Self::Skewed { offset } => vec![
                Point::new(0.0, offset),
                Point::new(width, 0.0),
                Point::new(width, height),
                Point::new(0.0, height),
            ],
        }
    }
}

fn clamp(value: f32, min: f32, max: f32) -> f32 {
    // Not f32::clamp: that panics when a tiny shape makes min > max.
    value.max(min).min(max)
}

pub fn mux_cut(width: f32) -> f32 {
    let angle = (90.0 - MUX_SLOPE_ANGLE_DEG).to_radians();
    clamp(width * angle.tan(), MUX_MIN_CUT, width - MUX_MIN_RIGHT)
}

pub fn extender_offset(height: f32) -> f32 {
    clamp(
        height * EXTENDER_SLOPE_RATIO,
        EXTENDER_MIN_OFFSET,
        height - EXTENDER_EDGE_PADDING,
    )
}

/// Port position relative to the shape's top-left corner.
pub fn local_port_position(shape: &Shape, port: &Port) -> Point {
    let geometry = ShapeGeometry::of(shape);
    let inset = shape.stroke_width.unwrap_or(DEFAULT_PORT_STROKE) / 2.0;
    let (w, h) = (shape.width, shape.height);
    match port.side {
        PortSide::SlopeTop | PortSide::SlopeBottom => {
            let cut = match geometry {
                ShapeGeometry::Trapezoidal { cut } => cut,
                _ => 0.0,
            };
            let t = clamp(port.offset, 0.0, 1.0);
            let y = if port.side == PortSide::SlopeTop {
                cut * t
            } else {
                h - cut * t
            };
            Point::new(w * t, y)
        }
        PortSide::Left => Point::new(inset, h * port.offset),
        PortSide::Right => Point::new(w - inset, h * port.offset),
        PortSide::Top => match geometry {
            ShapeGeometry::Skewed { offset } => {
                let t = clamp(port.offset, 0.0, 1.0);
                Point::new(w * t, offset * (1.0 - t) + inset)
            }
            _ => Point::new(w * port.offset, inset),
        },
        PortSide::Bottom => Point::new(w * port.offset, h - inset),
    }
}

pub fn port_position(shape: &Shape, port: &Port) -> Point {
    let local = local_port_position(shape, port);
    Point::new(shape.x + local.x, shape.y + local.y)
}

/// Resolve a port reference; `None` for a dangling shape or port id.
pub fn resolve_port(diagram: &Diagram, port_ref: &PortRef) -> Option<Point> {
    let shape = diagram.shape(&port_ref.shape_id)?;
    let port = shape.port(&port_ref.port_id)?;
    Some(port_position(shape, port))
}
