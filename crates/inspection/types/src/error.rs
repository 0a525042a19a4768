//! Error types for workflow inspection.
//!
//! Absent variables and uncorrelated incidents are not errors: they resolve
//! to neutral defaults at the lookup site.

use thiserror::Error;

/// Failures of the diagram rendering path.
///
/// None of these are fatal to the hosting view; the diagram region is left
/// empty and the rest of the inspection data is still shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No container to bind the diagram engine to.
    #[error("diagram container unavailable: {0}")]
    ContainerUnavailable(String),

    /// An operation needed an engine but `initialize` never succeeded.
    #[error("diagram renderer not initialized")]
    NotInitialized,

    /// `initialize` was called on a renderer that already owns an engine.
    #[error("diagram renderer already initialized")]
    AlreadyInitialized,

    /// The diagram markup could not be parsed.
    #[error("malformed diagram markup: {0}")]
    MalformedMarkup(String),

    /// The markup parsed but is not a diagram format the engine understands.
    #[error("unsupported diagram markup: {0}")]
    UnsupportedMarkup(String),

    /// An overlay targeted a node the imported diagram does not contain.
    #[error("unknown diagram element: {0}")]
    UnknownElement(String),

    /// A newer import started before this one settled.
    #[error("diagram import superseded by a newer import")]
    Superseded,

    /// The engine was used after `destroy`.
    #[error("diagram engine destroyed")]
    EngineDestroyed,

    /// Any other engine-specific failure.
    #[error("diagram engine error: {0}")]
    Engine(String),
}

/// Errors surfaced by the inspection engine.
#[derive(Debug, Error)]
pub enum InspectionError {
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Result type alias for inspection operations
pub type InspectionResult<T> = Result<T, InspectionError>;
