use crate::config::{Config, RenderConfig};
use crate::ir::{Diagram, Point, Port, PortSide, Shape, ShapeType};
use crate::ports::{ShapeGeometry, local_port_position};
use crate::routing::{Rect, WireRoute, route_all};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const PORT_RADIUS: f32 = 5.0;
const PORT_LABEL_OFFSET: f32 = 8.0;
const CLOCK_MARK_SIZE: f32 = 12.0;
const DEFAULT_SHAPE_STROKE: f32 = 2.0;
/// Room kept around a wire label when fitting the view box.
const LABEL_BOUNDS_PAD: f32 = 24.0;

pub fn render_svg(diagram: &Diagram, config: &Config) -> String {
    let theme = &config.theme;
    let render = &config.render;
    let routes = route_all(diagram, config);

    let (width, height, offset) = match diagram_bounds(diagram, &routes).filter(|_| render.fit_to_bounds) {
        Some(bounds) => (
            (bounds.right - bounds.left + render.padding * 2.0).ceil(),
            (bounds.bottom - bounds.top + render.padding * 2.0).ceil(),
            Point::new(render.padding - bounds.left, render.padding - bounds.top),
        ),
        None => (render.width, render.height, Point::default()),
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&style_block(theme, config));

    if !render.transparent {
        let background = if diagram.canvas_background.is_empty() {
            render.background.as_str()
        } else {
            diagram.canvas_background.as_str()
        };
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(background)
        ));
    }

    svg.push_str(&format!("<g transform=\"translate({} {})\">", offset.x, offset.y));

    for route in &routes {
        let Some(wire) = diagram.wire(&route.wire_id) else {
            continue;
        };
        let dash = wire
            .style
            .dash_array()
            .map(|dash| format!(" stroke-dasharray=\"{dash}\""))
            .unwrap_or_default();
        svg.push_str(&format!(
            "<path class=\"wire\" d=\"{}\" stroke=\"{}\" stroke-width=\"{}\"{dash}/>",
            points_to_path(&route.points),
            escape_xml(&wire.color),
            wire.width
        ));
        if let Some(label) = &route.label {
            let transform = label
                .transform()
                .map(|t| format!(" transform=\"{t}\""))
                .unwrap_or_default();
            svg.push_str(&format!(
                "<text class=\"wire-label\" x=\"{}\" y=\"{}\" text-anchor=\"{}\" dominant-baseline=\"{}\"{transform}>{}</text>",
                label.x,
                label.y,
                label.anchor.as_str(),
                label.baseline.as_str(),
                escape_xml(&wire.label)
            ));
        }
    }

    for shape in &diagram.shapes {
        svg.push_str(&shape_svg(shape, theme));
    }

    svg.push_str("</g></svg>");
    svg
}

fn style_block(theme: &Theme, config: &Config) -> String {
    format!(
        "<style>.wire{{fill:none;stroke-linecap:round;stroke-linejoin:round;}}\
         .shape-name{{font-family:{font};font-size:{size}px;font-weight:700;fill:{text};}}\
         .port-label{{font-family:{font};font-size:{port_size}px;fill:{text};}}\
         .wire-label{{font-family:{font};font-size:{label_size}px;fill:{text};}}</style>",
        font = escape_xml(&theme.font_family),
        size = theme.font_size + 2.0,
        port_size = theme.font_size,
        label_size = config.labels.font_size,
        text = escape_xml(&theme.text_color),
    )
}

fn shape_svg(shape: &Shape, theme: &Theme) -> String {
    let stroke = shape
        .stroke_color
        .as_deref()
        .unwrap_or_else(|| theme.stroke_for(shape.kind));
    let fill = shape.fill.as_deref().unwrap_or(&theme.shape_fill);
    let stroke_width = shape.stroke_width.unwrap_or(DEFAULT_SHAPE_STROKE);

    let mut out = format!("<g transform=\"translate({} {})\">", shape.x, shape.y);
    match ShapeGeometry::of(shape) {
        ShapeGeometry::Rectangular => out.push_str(&format!(
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" rx=\"12\" ry=\"12\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{stroke_width}\"/>",
            shape.width,
            shape.height,
            escape_xml(fill),
            escape_xml(stroke)
        )),
        geometry => out.push_str(&format!(
            "<polygon points=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{stroke_width}\" stroke-linejoin=\"round\"/>",
            points_attr(&geometry.outline(shape.width, shape.height)),
            escape_xml(fill),
            escape_xml(stroke)
        )),
    }

    let name = if shape.name.is_empty() { shape.kind.label() } else { shape.name.as_str() };
    out.push_str(&format!(
        "<text class=\"shape-name\" x=\"{}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>",
        shape.width / 2.0,
        shape.height / 2.0,
        escape_xml(name)
    ));

    for port in &shape.ports {
        out.push_str(&port_svg(shape, port, stroke, stroke_width, theme));
    }
    out.push_str("</g>");
    out
}

fn is_clock_port(shape: &Shape, port: &Port) -> bool {
    matches!(shape.kind, ShapeType::Reg | ShapeType::Seq) && (port.clock || port.name.eq_ignore_ascii_case("clk"))
}

fn port_svg(shape: &Shape, port: &Port, stroke: &str, stroke_width: f32, theme: &Theme) -> String {
    let local = local_port_position(shape, port);

    if is_clock_port(shape, port) {
        // Clock inputs get the usual triangle, pointing into the block.
        let half = CLOCK_MARK_SIZE / 2.0;
        let tip = if port.side == PortSide::Bottom {
            local.y - CLOCK_MARK_SIZE
        } else {
            local.y + CLOCK_MARK_SIZE
        };
        let triangle = [
            Point::new(local.x - half, local.y),
            Point::new(local.x + half, local.y),
            Point::new(local.x, tip),
        ];
        return format!(
            "<polygon points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            points_attr(&triangle),
            escape_xml(stroke),
            stroke_width.max(1.0)
        );
    }

    let mut out = format!(
        "<circle cx=\"{}\" cy=\"{}\" r=\"{PORT_RADIUS}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"3\"/>",
        local.x,
        local.y,
        escape_xml(&theme.port_fill),
        escape_xml(&theme.port_stroke)
    );
    if port.name.is_empty() {
        return out;
    }
    let (x, y, anchor) = match port.side {
        PortSide::Left => (local.x + PORT_LABEL_OFFSET, local.y, "start"),
        PortSide::Right => (local.x - PORT_LABEL_OFFSET, local.y, "end"),
        PortSide::Top | PortSide::SlopeTop => (local.x, local.y + PORT_LABEL_OFFSET, "middle"),
        PortSide::Bottom | PortSide::SlopeBottom => (local.x, local.y - PORT_LABEL_OFFSET, "middle"),
    };
    out.push_str(&format!(
        "<text class=\"port-label\" x=\"{x}\" y=\"{y}\" text-anchor=\"{anchor}\" dominant-baseline=\"middle\">{}</text>",
        escape_xml(&port.name)
    ));
    out
}

/// Extent of every shape, routed wire and wire label.
fn diagram_bounds(diagram: &Diagram, routes: &[WireRoute]) -> Option<Rect> {
    let shapes = diagram.shapes.iter().map(|shape| Rect {
        left: shape.x,
        top: shape.y,
        right: shape.x + shape.width,
        bottom: shape.y + shape.height,
    });
    let wires = routes.iter().flat_map(|route| {
        let points = route.points.iter().map(|p| Rect {
            left: p.x,
            top: p.y,
            right: p.x,
            bottom: p.y,
        });
        let label = route.label.map(|label| Rect {
            left: label.x - LABEL_BOUNDS_PAD,
            top: label.y - LABEL_BOUNDS_PAD,
            right: label.x + LABEL_BOUNDS_PAD,
            bottom: label.y + LABEL_BOUNDS_PAD,
        });
        points.chain(label)
    });
    shapes.chain(wires).reduce(Rect::union)
}

fn points_to_path(points: &[Point]) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    let mut d = format!("M {} {}", first.x, first.y);
    for point in rest {
        d.push_str(&format!(" L {} {}", point.x, point.y));
    }
    d
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{} {}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(str::trim)
        .unwrap_or("monospace")
        .to_string();
    opt.fontdb_mut().load_system_fonts();
    let fallback = usvg::Size::from_wh(800.0, 600.0).ok_or_else(|| anyhow::anyhow!("invalid fallback size"))?;
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height).unwrap_or(fallback);

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
