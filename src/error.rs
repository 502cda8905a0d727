use thiserror::Error;

/// Errors raised by the diagram loader and the editor.
///
/// The routing core itself never fails; it reports unroutable wires as
/// `None` instead.
#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("invalid diagram JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("shape not found: {0}")]
    UnknownShape(String),

    #[error("wire not found: {0}")]
    UnknownWire(String),

    #[error("port {port} not found on shape {shape}")]
    UnknownPort { shape: String, port: String },

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("wire {wire} has no draggable handle at index {index}")]
    NoHandle { wire: String, index: usize },

    #[error("wire {wire} has no bend point at index {index}")]
    NoBendPoint { wire: String, index: usize },
}

pub type Result<T> = std::result::Result<T, DiagramError>;
