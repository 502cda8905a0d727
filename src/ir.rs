use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{DiagramError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Weak reference to a port: the wire holds ids, never the shape itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRef {
    #[serde(alias = "moduleId")]
    pub shape_id: String,
    pub port_id: String,
}

impl PortRef {
    pub fn new(shape_id: impl Into<String>, port_id: impl Into<String>) -> Self {
        Self {
            shape_id: shape_id.into(),
            port_id: port_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortSide {
    Left,
    Right,
    Top,
    Bottom,
    SlopeTop,
    SlopeBottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub side: PortSide,
    pub offset: f32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub clock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum ShapeType {
    Alu,
    Reg,
    Logic,
    Combo,
    Seq,
    Extender,
    Mux,
}

impl From<String> for ShapeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "alu" => Self::Alu,
            "reg" => Self::Reg,
            "combo" => Self::Combo,
            "seq" => Self::Seq,
            "extender" => Self::Extender,
            "mux" => Self::Mux,
            _ => Self::Logic,
        }
    }
}

impl ShapeType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Alu => "ALU",
            Self::Reg => "Clocked Reg",
            Self::Logic => "Logic",
            Self::Combo => "Combinational",
            Self::Seq => "Sequential",
            Self::Extender => "Extender",
            Self::Mux => "MUX",
        }
    }
}

/// A block on the canvas. Routing only ever looks at its bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ShapeType,
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

impl Shape {
    pub fn port(&self, port_id: &str) -> Option<&Port> {
        self.ports.iter().find(|port| port.id == port_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum RouteAxis {
    #[default]
    #[serde(rename = "H")]
    Horizontal,
    #[serde(rename = "V")]
    Vertical,
}

impl From<String> for RouteAxis {
    fn from(value: String) -> Self {
        if value == "V" {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum LabelAt {
    Start,
    #[default]
    End,
}

impl From<String> for LabelAt {
    fn from(value: String) -> Self {
        if value == "start" { Self::Start } else { Self::End }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum WireStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl From<String> for WireStyle {
    fn from(value: String) -> Self {
        match value.as_str() {
            "dashed" => Self::Dashed,
            "dotted" => Self::Dotted,
            _ => Self::Solid,
        }
    }
}

impl WireStyle {
    /// SVG `stroke-dasharray`, if any.
    pub fn dash_array(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("8 6"),
            Self::Dotted => Some("2 6"),
        }
    }
}

pub const DEFAULT_WIRE_COLOR: &str = "#263238";
pub const DEFAULT_WIRE_WIDTH: f32 = 2.5;

fn default_wire_color() -> String {
    DEFAULT_WIRE_COLOR.to_string()
}

fn default_wire_width() -> f32 {
    DEFAULT_WIRE_WIDTH
}

/// Which geometry currently defines a wire's drawn path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    Simple,
    Detour,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub id: String,
    pub from: PortRef,
    pub to: PortRef,
    #[serde(default)]
    pub route: RouteAxis,
    #[serde(default)]
    pub bend: f32,
    #[serde(default)]
    pub bends: Option<Vec<Point>>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub label_at: LabelAt,
    #[serde(default = "default_wire_color")]
    pub color: String,
    #[serde(default = "default_wire_width")]
    pub width: f32,
    #[serde(default)]
    pub style: WireStyle,
}

impl Wire {
    pub fn new(id: impl Into<String>, from: PortRef, to: PortRef) -> Self {
        Self {
            id: id.into(),
            from,
            to,
            route: RouteAxis::Horizontal,
            bend: 0.0,
            bends: None,
            label: String::new(),
            label_at: LabelAt::End,
            color: default_wire_color(),
            width: DEFAULT_WIRE_WIDTH,
            style: WireStyle::Solid,
        }
    }

    /// Stored detour points, if the wire is in detour mode.
    pub fn detour(&self) -> Option<&[Point]> {
        self.bends.as_deref().filter(|bends| !bends.is_empty())
    }

    pub fn mode(&self) -> RouteMode {
        if self.detour().is_some() {
            RouteMode::Detour
        } else {
            RouteMode::Simple
        }
    }

    pub fn touches_shape(&self, shape_id: &str) -> bool {
        self.from.shape_id == shape_id || self.to.shape_id == shape_id
    }

    pub fn touches_port(&self, shape_id: &str, port_id: &str) -> bool {
        let hits = |r: &PortRef| r.shape_id == shape_id && r.port_id == port_id;
        hits(&self.from) || hits(&self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    #[serde(default)]
    pub canvas_background: String,
    #[serde(default, alias = "modules")]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    pub fn shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|shape| shape.id == id)
    }

    pub fn wire(&self, id: &str) -> Option<&Wire> {
        self.wires.iter().find(|wire| wire.id == id)
    }

    pub fn wire_mut(&mut self, id: &str) -> Option<&mut Wire> {
        self.wires.iter_mut().find(|wire| wire.id == id)
    }

    /// Parses a saved diagram and rejects repeated shape or wire ids.
    ///
    /// Wires may still reference shapes or ports that don't exist; those are
    /// reported when the wire is routed.
    pub fn from_json(input: &str) -> Result<Self> {
        let diagram: Diagram = serde_json::from_str(input)?;
        diagram.check_unique_ids()?;
        Ok(diagram)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_unique_ids(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let ids = self
            .shapes
            .iter()
            .map(|shape| shape.id.as_str())
            .chain(self.wires.iter().map(|wire| wire.id.as_str()));
        for id in ids {
            if !seen.insert(id) {
                return Err(DiagramError::DuplicateId(id.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_json_round_trips_detour() {
        let mut wire = Wire::new(
            "wire-3",
            PortRef::new("mod-1", "port-2"),
            PortRef::new("mod-4", "port-5"),
        );
        wire.route = RouteAxis::Vertical;
        wire.bend = 140.0;
        wire.bends = Some(vec![Point::new(10.0, 20.0), Point::new(10.0, -40.0)]);
        wire.label = "data".to_string();
        wire.label_at = LabelAt::Start;
        wire.style = WireStyle::Dashed;

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["route"], "V");
        assert_eq!(json["labelAt"], "start");
        assert_eq!(json["from"]["shapeId"], "mod-1");
        assert_eq!(json["style"], "dashed");

        let back: Wire = serde_json::from_value(json).unwrap();
        assert_eq!(back, wire);
    }

    #[test]
    fn simple_wire_serializes_null_bends() {
        let wire = Wire::new("wire-1", PortRef::new("a", "p"), PortRef::new("b", "q"));
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json["bends"].is_null());
        assert_eq!(json["route"], "H");
    }

    #[test]
    fn legacy_wire_fields_fall_back_to_defaults() {
        let raw = r#"{
            "id": "wire-9",
            "from": {"moduleId": "mod-1", "portId": "port-1"},
            "to": {"moduleId": "mod-2", "portId": "port-7"},
            "route": "H",
            "bend": 250,
            "style": "wavy"
        }"#;
        let wire: Wire = serde_json::from_str(raw).unwrap();
        assert_eq!(wire.from.shape_id, "mod-1");
        assert_eq!(wire.style, WireStyle::Solid);
        assert_eq!(wire.color, DEFAULT_WIRE_COLOR);
        assert_eq!(wire.width, DEFAULT_WIRE_WIDTH);
        assert_eq!(wire.label_at, LabelAt::End);
        assert_eq!(wire.mode(), RouteMode::Simple);
    }

    #[test]
    fn empty_bends_count_as_simple() {
        let mut wire = Wire::new("w", PortRef::new("a", "p"), PortRef::new("b", "q"));
        wire.bends = Some(Vec::new());
        assert_eq!(wire.mode(), RouteMode::Simple);
        assert!(wire.detour().is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let raw = r#"{
            "modules": [
                {"id":"mod-1","type":"alu","x":0,"y":0,"width":10,"height":10},
                {"id":"mod-1","type":"reg","x":50,"y":0,"width":10,"height":10}
            ],
            "wires": []
        }"#;
        match Diagram::from_json(raw) {
            Err(DiagramError::DuplicateId(id)) => assert_eq!(id, "mod-1"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
        assert!(matches!(Diagram::from_json("{"), Err(DiagramError::Json(_))));
    }

    #[test]
    fn unknown_shape_type_is_logic() {
        let raw = r#"{"id":"mod-1","type":"widget","x":0,"y":0,"width":10,"height":10}"#;
        let shape: Shape = serde_json::from_str(raw).unwrap();
        assert_eq!(shape.kind, ShapeType::Logic);
        assert!(shape.ports.is_empty());
    }
}
