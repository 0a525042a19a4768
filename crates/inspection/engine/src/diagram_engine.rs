//! The capability surface of a diagram rendering engine.
//!
//! The renderer only ever talks to an engine through [`DiagramEngine`], so
//! the overlay logic can run against the [`HeadlessEngine`] or a test
//! double as easily as against a real on-screen engine.
//!
//! [`HeadlessEngine`]: crate::HeadlessEngine

use crate::config::OverlayOffset;
use async_trait::async_trait;
use inspection_types::RenderError;
use serde::{Deserialize, Serialize};

/// The UI region an engine draws into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramContainer {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

impl DiagramContainer {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

/// What an overlay marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayKind {
    /// Execution ordinal of an in-flight token
    Sequence(u32),
    /// The execution carries an unresolved incident
    Incident,
}

/// A marker anchored to a diagram node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    pub kind: OverlayKind,
    pub offset: OverlayOffset,
}

impl Overlay {
    pub fn sequence(sequence: u32, offset: OverlayOffset) -> Self {
        Self {
            kind: OverlayKind::Sequence(sequence),
            offset,
        }
    }

    pub fn incident(offset: OverlayOffset) -> Self {
        Self {
            kind: OverlayKind::Incident,
            offset,
        }
    }

    pub fn label(&self) -> String {
        match self.kind {
            OverlayKind::Sequence(n) => n.to_string(),
            OverlayKind::Incident => "!".to_string(),
        }
    }
}

/// Handle of a placed overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlayId(pub u64);

/// Result of a successful markup import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Number of diagram elements that can carry overlays
    pub element_count: usize,
    /// Non-fatal problems found while importing
    pub warnings: Vec<String>,
}

/// A diagram rendering engine bound to one container.
///
/// Engines are used through shared references; implementations keep their
/// own interior state.
#[async_trait]
pub trait DiagramEngine: Send + Sync + 'static {
    /// Import diagram markup, replacing any diagram shown before.
    async fn import_markup(&self, markup: &str) -> Result<ImportReport, RenderError>;

    /// Anchor an overlay to the element with the given id.
    fn add_overlay(&self, element_id: &str, overlay: &Overlay) -> Result<OverlayId, RenderError>;

    /// Remove every overlay.
    fn clear_overlays(&self);

    /// Fit the viewport to the whole diagram.
    fn zoom_to_fit(&self);

    /// Release the engine. Called exactly once.
    fn destroy(&self);
}

/// Creates engines bound to containers.
pub trait EngineFactory: Send + Sync {
    type Engine: DiagramEngine;

    fn attach(&self, container: &DiagramContainer) -> Result<Self::Engine, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_labels() {
        let offset = OverlayOffset::new(0, 0);
        assert_eq!(Overlay::sequence(3, offset).label(), "3");
        assert_eq!(Overlay::incident(offset).label(), "!");
    }
}
