//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use inspection_engine::{
    DiagramContainer, DiagramEngine, EngineFactory, ImportReport, Overlay, OverlayId,
};
use inspection_types::{Activity, Incident, ProcessInstanceDetails, RenderError, VariableBag};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Everything a [`RecordingEngine`] was asked to do
#[derive(Default)]
pub struct EngineLog {
    pub mutations: AtomicU64,
    pub overlays: Mutex<Vec<(String, Overlay)>>,
    pub imports: AtomicU32,
    pub fits: AtomicU32,
    pub destroyed: AtomicU32,
    /// When set, imports wait for `release` before settling
    pub gated: AtomicBool,
    pub import_started: Notify,
    pub release: Notify,
}

impl EngineLog {
    pub fn gated() -> Arc<Self> {
        let log = Self::default();
        log.gated.store(true, Ordering::SeqCst);
        Arc::new(log)
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.lock().unwrap().len()
    }

    pub fn labels(&self) -> Vec<String> {
        self.overlays
            .lock()
            .unwrap()
            .iter()
            .map(|(element, overlay)| format!("{}:{}", element, overlay.label()))
            .collect()
    }

    pub fn mutations(&self) -> u64 {
        self.mutations.load(Ordering::SeqCst)
    }
}

/// A diagram engine that records calls instead of drawing
pub struct RecordingEngine {
    log: Arc<EngineLog>,
}

#[async_trait]
impl DiagramEngine for RecordingEngine {
    async fn import_markup(&self, markup: &str) -> Result<ImportReport, RenderError> {
        self.log.imports.fetch_add(1, Ordering::SeqCst);
        if self.log.gated.load(Ordering::SeqCst) {
            self.log.import_started.notify_one();
            self.log.release.notified().await;
        }

        if markup.trim().is_empty() {
            return Err(RenderError::MalformedMarkup("empty markup".into()));
        }
        Ok(ImportReport {
            element_count: 1,
            warnings: Vec::new(),
        })
    }

    fn add_overlay(&self, element_id: &str, overlay: &Overlay) -> Result<OverlayId, RenderError> {
        self.log.mutations.fetch_add(1, Ordering::SeqCst);
        let mut overlays = self.log.overlays.lock().unwrap();
        overlays.push((element_id.to_string(), *overlay));
        Ok(OverlayId(overlays.len() as u64))
    }

    fn clear_overlays(&self) {
        self.log.mutations.fetch_add(1, Ordering::SeqCst);
        self.log.overlays.lock().unwrap().clear();
    }

    fn zoom_to_fit(&self) {
        self.log.fits.fetch_add(1, Ordering::SeqCst);
    }

    fn destroy(&self) {
        self.log.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct RecordingFactory {
    pub log: Arc<EngineLog>,
}

impl RecordingFactory {
    pub fn new(log: Arc<EngineLog>) -> Self {
        Self { log }
    }
}

impl EngineFactory for RecordingFactory {
    type Engine = RecordingEngine;

    fn attach(&self, _container: &DiagramContainer) -> Result<RecordingEngine, RenderError> {
        Ok(RecordingEngine {
            log: Arc::clone(&self.log),
        })
    }
}

pub fn container() -> DiagramContainer {
    DiagramContainer::new("diagram", 1024, 768)
}

/// A snapshot with two parallel tokens, one of them failing
pub fn parallel_review() -> ProcessInstanceDetails {
    let now = Utc::now();
    ProcessInstanceDetails::new("inst-42", "CATALOGUE_HARVEST", "Harvest Catalogue")
        .with_business_key("harvest-2024-03")
        .with_markup("<definitions/>")
        .with_activity(Activity::new("Task_Fetch", "E7").started_at(now))
        .with_activity(Activity::new("Task_Index", "E3").started_at(now))
        .with_incident(Incident::new("E3").with_message("index unavailable"))
        .with_variables(VariableBag::new().with("catalogueUrl", "https://data.example/csw"))
}
