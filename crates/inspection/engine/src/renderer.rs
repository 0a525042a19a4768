//! Diagram renderer: one engine per inspection session, overlays in sync
//!
//! The renderer exclusively owns its [`DiagramEngine`]. Overlays are always
//! rebuilt from scratch (clear, then add) from the most recent annotation
//! set, so repeated applications never accumulate markers.
//!
//! # Teardown
//!
//! Importing markup is the only suspending operation. Every import takes a
//! generation number before it suspends; when it resumes, the result is
//! dropped if the renderer was disposed or a newer import started in the
//! meantime. After [`DiagramRenderer::dispose`] no overlay is added or
//! cleared again.

use crate::config::RendererConfig;
use crate::diagram_engine::{DiagramContainer, DiagramEngine, EngineFactory, Overlay};
use inspection_types::{DiagramAnnotation, InspectionResult, RenderError};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a diagram import settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The diagram is shown with this many overlays placed
    Rendered {
        overlays: usize,
        warnings: Vec<String>,
    },
    /// The import failed; the diagram region is left blank
    Failed(RenderError),
    /// The renderer was disposed or a newer import superseded this one
    Discarded,
}

impl ImportOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

/// Hosts a diagram engine and keeps its overlays in sync with annotations
pub struct DiagramRenderer<E: DiagramEngine> {
    config: RendererConfig,
    engine: RwLock<Option<Arc<E>>>,
    /// Most recently applied annotation set
    annotations: RwLock<Vec<DiagramAnnotation>>,
    fit_on_load: AtomicBool,
    diagram_loaded: AtomicBool,
    disposed: AtomicBool,
    generation: AtomicU64,
    overlay_mutations: AtomicU64,
}

impl<E: DiagramEngine> DiagramRenderer<E> {
    pub fn new(config: RendererConfig) -> Self {
        let fit_on_load = config.fit_on_load;
        Self {
            config,
            engine: RwLock::new(None),
            annotations: RwLock::new(Vec::new()),
            fit_on_load: AtomicBool::new(fit_on_load),
            diagram_loaded: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            overlay_mutations: AtomicU64::new(0),
        }
    }

    /// Bind a new engine to the container.
    pub fn initialize<F>(&self, factory: &F, container: Option<&DiagramContainer>) -> InspectionResult<()>
    where
        F: EngineFactory<Engine = E>,
    {
        if self.is_disposed() {
            return Err(RenderError::EngineDestroyed.into());
        }

        let container = container.ok_or_else(|| {
            warn!("Diagram container unavailable; diagram region stays empty");
            RenderError::ContainerUnavailable("no container supplied".to_string())
        })?;

        let mut slot = self.engine.write();
        if slot.is_some() {
            return Err(RenderError::AlreadyInitialized.into());
        }

        let engine = factory.attach(container).map_err(|err| {
            warn!(container = %container.id, error = %err, "Failed to attach diagram engine");
            err
        })?;
        *slot = Some(Arc::new(engine));

        info!(container = %container.id, "Diagram renderer initialized");
        Ok(())
    }

    /// Import diagram markup and apply the latest annotations to it.
    ///
    /// Failures are logged and reported in the outcome, never raised.
    pub async fn import_diagram(&self, markup: &str) -> ImportOutcome {
        if self.is_disposed() {
            debug!("Diagram import requested after dispose");
            return ImportOutcome::Discarded;
        }

        let engine = self.engine.read().clone();
        let Some(engine) = engine else {
            warn!("Diagram import requested before initialize");
            return ImportOutcome::Failed(RenderError::NotInitialized);
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.diagram_loaded.store(false, Ordering::SeqCst);

        let result = engine.import_markup(markup).await;

        // Holding the slot keeps dispose from destroying the engine mid-update
        let slot = self.engine.read();
        if self.is_stale(generation) {
            debug!(generation, "Discarding diagram import continuation");
            return ImportOutcome::Discarded;
        }
        let Some(engine) = slot.as_ref() else {
            return ImportOutcome::Discarded;
        };

        match result {
            Err(err) => {
                warn!(error = %err, "Diagram import failed");
                self.clear(engine);
                ImportOutcome::Failed(err)
            }
            Ok(report) => {
                for warning in &report.warnings {
                    debug!(%warning, "Diagram import warning");
                }
                self.diagram_loaded.store(true, Ordering::SeqCst);
                let overlays = self.render_overlays(engine);
                if self.fit_on_load.load(Ordering::SeqCst) {
                    engine.zoom_to_fit();
                }

                info!(
                    generation,
                    elements = report.element_count,
                    overlays,
                    "Diagram imported"
                );
                ImportOutcome::Rendered {
                    overlays,
                    warnings: report.warnings,
                }
            }
        }
    }

    /// Replace the visible overlays with the given annotations.
    ///
    /// The set is remembered and re-applied by the next successful import.
    /// Returns the number of overlays placed now.
    pub fn apply_annotations(&self, annotations: &[DiagramAnnotation]) -> usize {
        if self.is_disposed() {
            debug!("Annotations applied after dispose; ignoring");
            return 0;
        }

        *self.annotations.write() = annotations.to_vec();

        let slot = self.engine.read();
        if self.is_disposed() || !self.diagram_loaded.load(Ordering::SeqCst) {
            return 0;
        }
        match slot.as_ref() {
            Some(engine) => self.render_overlays(engine),
            None => 0,
        }
    }

    /// Remember annotations for the next import without touching the
    /// diagram currently shown.
    pub fn set_annotations(&self, annotations: &[DiagramAnnotation]) {
        if self.is_disposed() {
            return;
        }
        *self.annotations.write() = annotations.to_vec();
    }

    /// Fit the viewport to the whole diagram. Returns whether a fit happened.
    pub fn fit_viewport(&self) -> bool {
        let slot = self.engine.read();
        if self.is_disposed() || !self.has_diagram() {
            return false;
        }
        match slot.as_ref() {
            Some(engine) => {
                engine.zoom_to_fit();
                true
            }
            None => false,
        }
    }

    pub fn set_fit_on_load(&self, fit: bool) {
        self.fit_on_load.store(fit, Ordering::SeqCst);
    }

    /// Release the engine. Only the first call has any effect.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.generation.fetch_add(1, Ordering::SeqCst);

        let engine = self.engine.write().take();
        self.annotations.write().clear();
        self.diagram_loaded.store(false, Ordering::SeqCst);

        if let Some(engine) = engine {
            engine.destroy();
            info!("Diagram renderer disposed");
        }
    }

    // ── Query methods ────────────────────────────────────────────────

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.read().is_some()
    }

    /// Whether the last import succeeded and is still current
    pub fn has_diagram(&self) -> bool {
        self.diagram_loaded.load(Ordering::SeqCst)
    }

    /// Number of add/clear calls issued to the engine
    pub fn overlay_mutations(&self) -> u64 {
        self.overlay_mutations.load(Ordering::SeqCst)
    }

    pub fn annotations(&self) -> Vec<DiagramAnnotation> {
        self.annotations.read().clone()
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Read access to the engine while the renderer still owns it
    pub fn with_engine<R>(&self, f: impl FnOnce(&E) -> R) -> Option<R> {
        self.engine.read().as_deref().map(f)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn is_stale(&self, generation: u64) -> bool {
        self.is_disposed() || self.generation.load(Ordering::SeqCst) != generation
    }

    fn clear(&self, engine: &E) {
        engine.clear_overlays();
        self.overlay_mutations.fetch_add(1, Ordering::SeqCst);
    }

    fn place(&self, engine: &E, element_id: &str, overlay: Overlay) -> usize {
        self.overlay_mutations.fetch_add(1, Ordering::SeqCst);
        match engine.add_overlay(element_id, &overlay) {
            Ok(_) => 1,
            Err(err) => {
                warn!(element_id, error = %err, "Skipping overlay");
                0
            }
        }
    }

    fn render_overlays(&self, engine: &E) -> usize {
        let annotations = self.annotations.read();
        self.clear(engine);

        let mut placed = 0;
        for annotation in annotations.iter() {
            let element_id = annotation.activity_id.as_str();
            placed += self.place(
                engine,
                element_id,
                Overlay::sequence(annotation.execution_sequence, self.config.sequence_offset),
            );
            if annotation.has_incident {
                placed += self.place(
                    engine,
                    element_id,
                    Overlay::incident(self.config.incident_offset),
                );
            }
        }

        debug!(
            annotations = annotations.len(),
            overlays = placed,
            "Overlays applied"
        );
        placed
    }
}

impl<E: DiagramEngine> Drop for DiagramRenderer<E> {
    fn drop(&mut self) {
        self.dispose();
    }
}
