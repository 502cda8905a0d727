#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod ir;
pub mod log;
pub mod ports;
pub mod render;
pub mod route_dump;
pub mod routing;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, load_config};
pub use editor::{DragSession, Editor};
pub use error::DiagramError;
pub use ir::{Diagram, Point, PortRef, RouteAxis, RouteMode, Shape, Wire};
pub use render::render_svg;
pub use routing::{Handle, LabelPlacement, WireRoute, compute_route, route_wire};
