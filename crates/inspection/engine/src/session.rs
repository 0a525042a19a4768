//! Inspection sessions: one process-instance view from open to close
//!
//! A session owns a [`DiagramRenderer`] and the current snapshot. Each call
//! to [`InspectionSession::present`] replaces the snapshot wholesale and
//! re-derives annotations, variables and the headline from it.

use crate::catalog::{DisplayVariable, VariableCatalog};
use crate::clipboard::{copy_value, ClipboardSink};
use crate::config::InspectionConfig;
use crate::correlator::correlate;
use crate::diagram_engine::{DiagramContainer, EngineFactory};
use crate::renderer::{DiagramRenderer, ImportOutcome};
use crate::summarizer::Headline;
use inspection_types::{DiagramAnnotation, InspectionResult, ProcessInstanceDetails};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What presenting a snapshot produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentReport {
    pub annotations: Vec<DiagramAnnotation>,
    pub outcome: ImportOutcome,
}

/// The inspection view of one process instance
pub struct InspectionSession<F: EngineFactory> {
    renderer: DiagramRenderer<F::Engine>,
    catalog: VariableCatalog,
    snapshot: RwLock<Option<Arc<ProcessInstanceDetails>>>,
}

impl<F: EngineFactory> InspectionSession<F> {
    /// Open a session bound to a container.
    ///
    /// A renderer that cannot be initialized leaves the diagram region empty;
    /// the session stays usable for variables and headline.
    pub fn open(config: &InspectionConfig, factory: &F, container: Option<&DiagramContainer>) -> Self {
        let renderer = DiagramRenderer::new(config.renderer.clone());
        if let Err(err) = renderer.initialize(factory, container) {
            warn!(error = %err, "Inspection session opened without a diagram");
        }

        Self {
            renderer,
            catalog: VariableCatalog::from_config(&config.catalog),
            snapshot: RwLock::new(None),
        }
    }

    /// Show a new snapshot, replacing whatever was shown before.
    ///
    /// A closed session keeps nothing: the snapshot is dropped and the
    /// outcome is [`ImportOutcome::Discarded`].
    pub async fn present(&self, details: ProcessInstanceDetails, fit_on_load: bool) -> PresentReport {
        let annotations = correlate(&details.activities, &details.incidents);
        if self.renderer.is_disposed() {
            debug!(instance = %details.id, "Snapshot presented to a closed session");
            return PresentReport {
                annotations,
                outcome: ImportOutcome::Discarded,
            };
        }

        let details = Arc::new(details);
        *self.snapshot.write() = Some(Arc::clone(&details));

        info!(
            instance = %details.id,
            definition = %details.process_definition_key,
            activities = details.activities.len(),
            incidents = details.incident_count(),
            "Presenting process instance"
        );

        // The new set lands on the new diagram only
        self.renderer.set_fit_on_load(fit_on_load);
        self.renderer.set_annotations(&annotations);
        let outcome = self.renderer.import_diagram(&details.diagram_markup).await;
        if self.renderer.is_disposed() {
            self.snapshot.write().take();
        }

        PresentReport {
            annotations,
            outcome,
        }
    }

    /// The snapshot currently shown
    pub fn snapshot(&self) -> Option<Arc<ProcessInstanceDetails>> {
        self.snapshot.read().clone()
    }

    /// Display variables of the current snapshot
    pub fn variables(&self) -> Vec<DisplayVariable> {
        self.snapshot()
            .map(|s| self.catalog.catalog_bag(&s.variables))
            .unwrap_or_default()
    }

    /// Headline of the current snapshot
    pub fn headline(&self) -> Option<Headline> {
        self.snapshot().map(|s| Headline::from(s.as_ref()))
    }

    /// Copy the named variable's value. Returns whether anything was copied.
    pub fn copy_variable(&self, name: &str, sink: &impl ClipboardSink) -> InspectionResult<bool> {
        let Some(snapshot) = self.snapshot() else {
            return Ok(false);
        };
        if self.catalog.is_hidden(name) {
            return Ok(false);
        }
        match snapshot.variables.lookup(name) {
            Some(value) => copy_value(value, sink),
            None => Ok(false),
        }
    }

    /// Toolbar action: fit the diagram into view
    pub fn fit_viewport(&self) -> bool {
        self.renderer.fit_viewport()
    }

    pub fn renderer(&self) -> &DiagramRenderer<F::Engine> {
        &self.renderer
    }

    /// Tear the session down. The renderer is disposed even if an import is
    /// still in flight.
    pub fn close(&self) {
        self.renderer.dispose();
        self.snapshot.write().take();
    }
}

impl<F: EngineFactory> Drop for InspectionSession<F> {
    fn drop(&mut self) {
        self.close();
    }
}
