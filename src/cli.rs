use crate::config::load_config;
use crate::editor::Editor;
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::route_dump::{RouteDump, write_route_dump};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "blockwire", version, about = "Route and export block-diagram wires")]
pub struct Args {
    /// Diagram JSON file, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. SVG and JSON go to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Put every wire back on its simple midpoint route
    #[arg(long = "reset")]
    pub reset: bool,

    /// Recompute smart routes for every wire
    #[arg(long = "smart")]
    pub smart: bool,

    /// Write the (possibly re-routed) diagram JSON here
    #[arg(long = "save")]
    pub save: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
fn init_tracing() {}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
        config.render.fit_to_bounds = false;
    }
    if let Some(height) = args.height {
        config.render.height = height;
        config.render.fit_to_bounds = false;
    }

    let input = read_input(args.input.as_deref())?;
    let mut editor = Editor::from_json(&input, config)?;

    if args.reset {
        let count = editor.reset_all_routes();
        crate::log::info!(count, "reset wires to simple routes");
    }
    if args.smart {
        let detoured = editor.recompute_all_smart_routes();
        crate::log::info!(detoured, "smart routing done");
    }
    if let Some(path) = &args.save {
        std::fs::write(path, editor.to_json()?)?;
    }

    let diagram = editor.diagram();
    let config = editor.config();
    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(diagram, config);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(diagram, config);
            write_output_png(&svg, &output, &config.render, &config.theme)?;
        }
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => write_route_dump(path, diagram, config)?,
            None => println!("{}", RouteDump::from_diagram(diagram, config).to_json()?),
        },
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
