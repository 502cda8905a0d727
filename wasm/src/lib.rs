use blockwire::config::{Config, parse_config};
use blockwire::route_dump::RouteDump;
use blockwire::{Editor, render_svg};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportOptions {
    /// JSON5 config text, same format as the CLI's `--configFile`.
    config: Option<String>,
    transparent: Option<bool>,
    fit_to_bounds: Option<bool>,
    smart: Option<bool>,
}

fn js_error(error: impl ToString) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn build_config(options: &ExportOptions) -> Result<Config, String> {
    let mut config = match options.config.as_deref() {
        Some(raw) => parse_config(raw).map_err(|error| error.to_string())?,
        None => Config::default(),
    };
    if let Some(transparent) = options.transparent {
        config.render.transparent = transparent;
    }
    if let Some(fit) = options.fit_to_bounds {
        config.render.fit_to_bounds = fit;
    }
    Ok(config)
}

fn load(diagram_json: &str, options_json: Option<String>) -> Result<Editor, String> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<ExportOptions>(&raw).map_err(|error| error.to_string())?,
        None => ExportOptions::default(),
    };
    let config = build_config(&options)?;
    let mut editor = Editor::from_json(diagram_json, config).map_err(|error| error.to_string())?;
    if options.smart.unwrap_or(false) {
        editor.recompute_all_smart_routes();
    }
    Ok(editor)
}

fn diagram_svg(diagram_json: &str, options_json: Option<String>) -> Result<String, String> {
    let editor = load(diagram_json, options_json)?;
    Ok(render_svg(editor.diagram(), editor.config()))
}

fn diagram_routes(diagram_json: &str, options_json: Option<String>) -> Result<String, String> {
    let editor = load(diagram_json, options_json)?;
    RouteDump::from_diagram(editor.diagram(), editor.config())
        .to_json()
        .map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn render_diagram_svg(diagram_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    diagram_svg(diagram_json, options_json).map_err(js_error)
}

#[wasm_bindgen]
pub fn route_wires_json(diagram_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    diagram_routes(diagram_json, options_json).map_err(js_error)
}

/// Re-runs smart routing on every wire and returns the updated diagram JSON.
#[wasm_bindgen]
pub fn smart_route_diagram(diagram_json: &str) -> Result<String, JsValue> {
    let mut editor = Editor::from_json(diagram_json, Config::default()).map_err(js_error)?;
    editor.recompute_all_smart_routes();
    editor.to_json().map_err(js_error)
}
