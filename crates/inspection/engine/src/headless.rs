//! Headless BPMN engine.
//!
//! Parses BPMN 2.0 XML, indexes the flow elements of every process and the
//! bounds of their diagram shapes, and keeps overlays as absolute positions.
//! Used by the CLI and anywhere overlay placement must be computed without
//! a display.

use crate::diagram_engine::{
    DiagramContainer, DiagramEngine, EngineFactory, ImportReport, Overlay, OverlayId,
};
use async_trait::async_trait;
use inspection_types::RenderError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Shape bounds in diagram coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Visible region of the diagram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

/// An overlay with its resolved position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOverlay {
    pub id: OverlayId,
    pub element_id: String,
    pub overlay: Overlay,
    pub x: f64,
    pub y: f64,
}

// ── Parsing ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ParsedDiagram {
    /// Flow element ids in document order
    elements: Vec<String>,
    bounds: HashMap<String, Bounds>,
    warnings: Vec<String>,
}

impl ParsedDiagram {
    fn contains(&self, element_id: &str) -> bool {
        self.bounds.contains_key(element_id) || self.elements.iter().any(|e| e == element_id)
    }

    /// Smallest rectangle covering every shape
    fn extent(&self) -> Option<Bounds> {
        let mut shapes = self.bounds.values();
        let first = *shapes.next()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x + first.width, first.y + first.height);
        for b in shapes {
            min_x = min_x.min(b.x);
            min_y = min_y.min(b.y);
            max_x = max_x.max(b.x + b.width);
            max_y = max_y.max(b.y + b.height);
        }
        Some(Bounds {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }
}

fn parse_bpmn(markup: &str) -> Result<ParsedDiagram, RenderError> {
    let doc = roxmltree::Document::parse(markup)
        .map_err(|e| RenderError::MalformedMarkup(e.to_string()))?;

    let root = doc.root_element();
    if root.tag_name().name() != "definitions" {
        return Err(RenderError::UnsupportedMarkup(format!(
            "root element <{}> is not <definitions>",
            root.tag_name().name()
        )));
    }

    let processes: Vec<_> = root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "process")
        .collect();
    if processes.is_empty() {
        return Err(RenderError::UnsupportedMarkup(
            "no <process> element".to_string(),
        ));
    }

    let mut diagram = ParsedDiagram::default();
    let mut seen = HashSet::new();
    for process in processes {
        for node in process.descendants().skip(1).filter(|n| n.is_element()) {
            if let Some(id) = node.attribute("id") {
                if seen.insert(id.to_string()) {
                    diagram.elements.push(id.to_string());
                }
            }
        }
    }

    for shape in root
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "BPMNShape")
    {
        let Some(element_id) = shape.attribute("bpmnElement") else {
            continue;
        };
        let bounds = shape
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == "Bounds")
            .and_then(|b| {
                Some(Bounds {
                    x: b.attribute("x")?.parse().ok()?,
                    y: b.attribute("y")?.parse().ok()?,
                    width: b.attribute("width")?.parse().ok()?,
                    height: b.attribute("height")?.parse().ok()?,
                })
            });

        match bounds {
            Some(bounds) => {
                if !seen.contains(element_id) {
                    diagram
                        .warnings
                        .push(format!("shape for unknown element '{}'", element_id));
                }
                diagram.bounds.insert(element_id.to_string(), bounds);
            }
            None => diagram
                .warnings
                .push(format!("shape '{}' has no usable bounds", element_id)),
        }
    }

    Ok(diagram)
}

// ── Engine ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct HeadlessState {
    diagram: Option<ParsedDiagram>,
    overlays: Vec<PlacedOverlay>,
    viewport: Viewport,
    next_overlay: u64,
    destroyed: bool,
}

/// A display-less diagram engine
#[derive(Debug)]
pub struct HeadlessEngine {
    container: DiagramContainer,
    state: RwLock<HeadlessState>,
    mutations: AtomicU64,
    /// Token of the most recently started import
    imports: AtomicU64,
}

impl HeadlessEngine {
    pub fn new(container: DiagramContainer) -> Self {
        Self {
            container,
            state: RwLock::new(HeadlessState::default()),
            mutations: AtomicU64::new(0),
            imports: AtomicU64::new(0),
        }
    }

    pub fn container(&self) -> &DiagramContainer {
        &self.container
    }

    /// All overlays currently placed
    pub fn overlays(&self) -> Vec<PlacedOverlay> {
        self.state.read().overlays.clone()
    }

    pub fn overlay_count(&self) -> usize {
        self.state.read().overlays.len()
    }

    /// Number of add/clear calls received
    pub fn overlay_mutations(&self) -> u64 {
        self.mutations.load(Ordering::SeqCst)
    }

    pub fn viewport(&self) -> Viewport {
        self.state.read().viewport
    }

    /// Flow element ids of the imported diagram, in document order
    pub fn element_ids(&self) -> Vec<String> {
        self.state
            .read()
            .diagram
            .as_ref()
            .map(|d| d.elements.clone())
            .unwrap_or_default()
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.read().destroyed
    }
}

#[async_trait]
impl DiagramEngine for HeadlessEngine {
    async fn import_markup(&self, markup: &str) -> Result<ImportReport, RenderError> {
        if self.is_destroyed() {
            return Err(RenderError::EngineDestroyed);
        }

        let token = self.imports.fetch_add(1, Ordering::SeqCst) + 1;
        let owned = markup.to_owned();
        let parsed = tokio::task::spawn_blocking(move || parse_bpmn(&owned))
            .await
            .map_err(|e| RenderError::Engine(e.to_string()))
            .and_then(|result| result);

        let mut state = self.state.write();
        if state.destroyed {
            return Err(RenderError::EngineDestroyed);
        }
        if self.imports.load(Ordering::SeqCst) != token {
            tracing::debug!(container = %self.container.id, token, "Headless import superseded");
            return Err(RenderError::Superseded);
        }

        // Whatever was shown before is gone, even if this import failed
        state.overlays.clear();
        state.viewport = Viewport::default();
        let diagram = match parsed {
            Ok(diagram) => diagram,
            Err(err) => {
                state.diagram = None;
                return Err(err);
            }
        };

        let report = ImportReport {
            element_count: diagram.elements.len(),
            warnings: diagram.warnings.clone(),
        };
        state.diagram = Some(diagram);

        tracing::debug!(
            container = %self.container.id,
            elements = report.element_count,
            "Headless diagram imported"
        );
        Ok(report)
    }

    fn add_overlay(&self, element_id: &str, overlay: &Overlay) -> Result<OverlayId, RenderError> {
        let mut state = self.state.write();
        if state.destroyed {
            return Err(RenderError::EngineDestroyed);
        }
        let diagram = state.diagram.as_ref().ok_or(RenderError::NotInitialized)?;
        if !diagram.contains(element_id) {
            return Err(RenderError::UnknownElement(element_id.to_string()));
        }

        let anchor = diagram.bounds.get(element_id).copied();
        let (x, y) = anchor.map(|b| (b.x, b.y)).unwrap_or((0.0, 0.0));

        state.next_overlay += 1;
        let id = OverlayId(state.next_overlay);
        state.overlays.push(PlacedOverlay {
            id,
            element_id: element_id.to_string(),
            overlay: *overlay,
            x: x + f64::from(overlay.offset.left),
            y: y + f64::from(overlay.offset.top),
        });
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    fn clear_overlays(&self) {
        let mut state = self.state.write();
        if state.destroyed {
            return;
        }
        state.overlays.clear();
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }

    fn zoom_to_fit(&self) {
        let mut state = self.state.write();
        if state.destroyed {
            return;
        }
        let Some(extent) = state.diagram.as_ref().and_then(ParsedDiagram::extent) else {
            return;
        };
        if extent.width <= 0.0 || extent.height <= 0.0 {
            return;
        }

        let scale = (f64::from(self.container.width) / extent.width)
            .min(f64::from(self.container.height) / extent.height);
        state.viewport = Viewport {
            x: extent.x,
            y: extent.y,
            scale,
        };
    }

    fn destroy(&self) {
        let mut state = self.state.write();
        state.destroyed = true;
        state.diagram = None;
        state.overlays.clear();
        tracing::debug!(container = %self.container.id, "Headless engine destroyed");
    }
}

/// Attaches [`HeadlessEngine`]s to containers
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessFactory;

impl EngineFactory for HeadlessFactory {
    type Engine = HeadlessEngine;

    fn attach(&self, container: &DiagramContainer) -> Result<HeadlessEngine, RenderError> {
        if container.width == 0 || container.height == 0 {
            return Err(RenderError::ContainerUnavailable(format!(
                "container '{}' has no area",
                container.id
            )));
        }
        Ok(HeadlessEngine::new(container.clone()))
    }
}
