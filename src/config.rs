use crate::ir::{DEFAULT_WIRE_COLOR, DEFAULT_WIRE_WIDTH, LabelAt, WireStyle};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const WIRE_MIN_WIDTH: f32 = 1.0;
pub const WIRE_MAX_WIDTH: f32 = 12.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Clearance added around every shape when it acts as an obstacle.
    pub margin: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self { margin: 20.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    pub perpendicular_offset: f32,
    pub along_offset: f32,
    /// Stroke width the perpendicular offset is tuned for; thicker wires push
    /// the label out by half the excess.
    pub default_stroke_width: f32,
    pub font_size: f32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            perpendicular_offset: 10.0,
            along_offset: 8.0,
            default_stroke_width: DEFAULT_WIRE_WIDTH,
            font_size: 12.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDefaults {
    pub color: String,
    pub width: f32,
    pub style: WireStyle,
    pub label_at: LabelAt,
}

impl Default for WireDefaults {
    fn default() -> Self {
        Self {
            color: DEFAULT_WIRE_COLOR.to_string(),
            width: DEFAULT_WIRE_WIDTH,
            style: WireStyle::Solid,
            label_at: LabelAt::End,
        }
    }
}

pub fn clamp_wire_width(width: f32) -> f32 {
    if width.is_finite() {
        width.clamp(WIRE_MIN_WIDTH, WIRE_MAX_WIDTH)
    } else {
        DEFAULT_WIRE_WIDTH
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub background: String,
    /// Leave the canvas background out of exports.
    pub transparent: bool,
    /// Size the view box to the drawing instead of `width` x `height`.
    pub fit_to_bounds: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 24.0,
            background: "#f6f1e8".to_string(),
            transparent: true,
            fit_to_bounds: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub routing: RoutingConfig,
    pub labels: LabelConfig,
    pub wire: WireDefaults,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::editor_default();
        let render = RenderConfig {
            background: theme.canvas_background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            routing: RoutingConfig::default(),
            labels: LabelConfig::default(),
            wire: WireDefaults::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
    shape_fill: Option<String>,
    shape_stroke: Option<String>,
    port_fill: Option<String>,
    port_stroke: Option<String>,
    canvas_background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoutingConfigFile {
    margin: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelConfigFile {
    perpendicular_offset: Option<f32>,
    along_offset: Option<f32>,
    default_stroke_width: Option<f32>,
    font_size: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireConfigFile {
    color: Option<String>,
    width: Option<f32>,
    style: Option<WireStyle>,
    label_at: Option<LabelAt>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
    transparent: Option<bool>,
    fit_to_bounds: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    routing: Option<RoutingConfigFile>,
    labels: Option<LabelConfigFile>,
    wire: Option<WireConfigFile>,
    render: Option<RenderConfigFile>,
}

/// Defaults, overlaid with an optional JSON/JSON5 config file.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "mono" || theme_name == "print" {
            config.theme = Theme::monochrome();
        } else if theme_name == "default" || theme_name == "editor" {
            config.theme = Theme::editor_default();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.shape_fill {
            config.theme.shape_fill = v;
        }
        if let Some(v) = vars.shape_stroke {
            config.theme.shape_stroke = v;
        }
        if let Some(v) = vars.port_fill {
            config.theme.port_fill = v;
        }
        if let Some(v) = vars.port_stroke {
            config.theme.port_stroke = v;
        }
        if let Some(v) = vars.canvas_background {
            config.theme.canvas_background = v;
        }
    }

    if let Some(routing) = parsed.routing
        && let Some(v) = routing.margin
    {
        config.routing.margin = v.max(0.0);
    }

    if let Some(labels) = parsed.labels {
        if let Some(v) = labels.perpendicular_offset {
            config.labels.perpendicular_offset = v;
        }
        if let Some(v) = labels.along_offset {
            config.labels.along_offset = v;
        }
        if let Some(v) = labels.default_stroke_width {
            config.labels.default_stroke_width = v;
        }
        if let Some(v) = labels.font_size {
            config.labels.font_size = v;
        }
    }

    if let Some(wire) = parsed.wire {
        if let Some(v) = wire.color {
            config.wire.color = v;
        }
        if let Some(v) = wire.width {
            config.wire.width = clamp_wire_width(v);
        }
        if let Some(v) = wire.style {
            config.wire.style = v;
        }
        if let Some(v) = wire.label_at {
            config.wire.label_at = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.padding {
            config.render.padding = v;
        }
        if let Some(v) = render.transparent {
            config.render.transparent = v;
        }
        if let Some(v) = render.fit_to_bounds {
            config.render.fit_to_bounds = v;
        }
    }

    config.render.background = config.theme.canvas_background.clone();

    Ok(config)
}
