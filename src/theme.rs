use serde::{Deserialize, Serialize};

use crate::ir::ShapeType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub shape_fill: String,
    pub shape_stroke: String,
    pub port_fill: String,
    pub port_stroke: String,
    pub canvas_background: String,
    /// Per-type stroke colours; `None` falls back to `shape_stroke`.
    pub typed_strokes: bool,
}

impl Theme {
    pub fn editor_default() -> Self {
        Self {
            font_family: "Maple Mono NF CN, Consolas, Courier New, monospace".to_string(),
            font_size: 14.0,
            text_color: "#1d262b".to_string(),
            shape_fill: "rgba(255, 253, 249, 0.95)".to_string(),
            shape_stroke: "rgba(31, 38, 43, 0.18)".to_string(),
            port_fill: "#1d262b".to_string(),
            port_stroke: "#f2c14e".to_string(),
            canvas_background: "#f6f1e8".to_string(),
            typed_strokes: true,
        }
    }

    pub fn monochrome() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, sans-serif".to_string(),
            font_size: 13.0,
            text_color: "#000000".to_string(),
            shape_fill: "#FFFFFF".to_string(),
            shape_stroke: "#000000".to_string(),
            port_fill: "#000000".to_string(),
            port_stroke: "#FFFFFF".to_string(),
            canvas_background: "#FFFFFF".to_string(),
            typed_strokes: false,
        }
    }

    pub fn stroke_for(&self, kind: ShapeType) -> &str {
        if !self.typed_strokes {
            return &self.shape_stroke;
        }
        match kind {
            ShapeType::Alu => "rgba(242, 193, 78, 0.8)",
            ShapeType::Reg => "rgba(59, 125, 115, 0.8)",
            ShapeType::Seq => "rgba(224, 122, 95, 0.8)",
            ShapeType::Combo => "rgba(58, 114, 176, 0.8)",
            ShapeType::Extender => "rgba(200, 110, 140, 0.8)",
            ShapeType::Mux => "rgba(150, 108, 203, 0.6)",
            ShapeType::Logic => &self.shape_stroke,
        }
    }
}
