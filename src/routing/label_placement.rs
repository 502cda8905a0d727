use serde::Serialize;

use crate::config::LabelConfig;
use crate::ir::{LabelAt, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    Auto,
    Central,
}

impl Baseline {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Central => "central",
        }
    }
}

/// Where a wire's text sits: just beside the terminal segment at the chosen
/// end, reading away from the port.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPlacement {
    pub x: f32,
    pub y: f32,
    pub anchor: TextAnchor,
    pub baseline: Baseline,
    /// Degrees; 90 for labels along a vertical terminal segment.
    pub rotation: f32,
}

impl Default for LabelPlacement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            anchor: TextAnchor::Middle,
            baseline: Baseline::Central,
            rotation: 0.0,
        }
    }
}

impl LabelPlacement {
    /// SVG `transform` value for rotated labels.
    pub fn transform(&self) -> Option<String> {
        (self.rotation != 0.0).then(|| format!("rotate({} {} {})", self.rotation, self.x, self.y))
    }
}

/// The terminal point and the first distinct point walking inward from it.
fn terminal_segment(points: &[Point], at: LabelAt) -> Option<(Point, Point)> {
    match at {
        LabelAt::Start => {
            let terminal = *points.first()?;
            let other = points[1..].iter().find(|p| **p != terminal)?;
            Some((terminal, *other))
        }
        LabelAt::End => {
            let terminal = *points.last()?;
            let other = points[..points.len() - 1].iter().rev().find(|p| **p != terminal)?;
            Some((terminal, *other))
        }
    }
}

pub fn place_label(points: &[Point], at: LabelAt, stroke_width: f32, config: &LabelConfig) -> LabelPlacement {
    let Some((terminal, other)) = terminal_segment(points, at) else {
        return LabelPlacement::default();
    };
    let perpendicular =
        config.perpendicular_offset + (stroke_width - config.default_stroke_width).max(0.0) / 2.0;
    let along = config.along_offset;
    let dx = other.x - terminal.x;
    let dy = other.y - terminal.y;

    if dx.abs() >= dy.abs() {
        // `other` differs from `terminal`, so `dx` is non-zero here.
        let (x, anchor) = if dx > 0.0 {
            (terminal.x + along, TextAnchor::Start)
        } else {
            (terminal.x - along, TextAnchor::End)
        };
        LabelPlacement {
            x,
            y: terminal.y - perpendicular,
            anchor,
            baseline: Baseline::Auto,
            rotation: 0.0,
        }
    } else {
        // Rotated 90 degrees: text runs downward, so "start" reads toward +y.
        let (y, anchor) = if dy > 0.0 {
            (terminal.y + along, TextAnchor::Start)
        } else {
            (terminal.y - along, TextAnchor::End)
        };
        LabelPlacement {
            x: terminal.x + perpendicular,
            y,
            anchor,
            baseline: Baseline::Auto,
            rotation: 90.0,
        }
    }
}
