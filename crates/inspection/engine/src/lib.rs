//! Workflow-instance inspection engine
//!
//! Correlates the runtime trace of a process instance with its static
//! diagram and derives everything an instance view displays from a single
//! [`ProcessInstanceDetails`] snapshot.
//!
//! # Key Principle
//!
//! **The engine derives, it NEVER computes instance state.**
//!
//! Which nodes are active and which executions failed is decided by the
//! workflow service. The engine only correlates what the snapshot says and
//! keeps the diagram overlays in sync with it.
//!
//! # Architecture
//!
//! - [`correlate`] - Maps in-flight activities and incidents to [`DiagramAnnotation`]s
//! - [`DiagramRenderer`] - Owns a [`DiagramEngine`] and applies annotations as overlays
//! - [`VariableCatalog`] - Filters, deduplicates, sorts and classifies variables
//! - [`summarize`] - Builds a [`Headline`] from the workflow kind and variable bag
//! - [`InspectionSession`] - Wires the above together for one inspection view
//!
//! # Example
//!
//! ```rust
//! use inspection_engine::correlate;
//! use inspection_types::{Activity, Incident};
//! use chrono::Utc;
//!
//! let now = Utc::now();
//! let activities = vec![
//!     Activity::new("Task_Review", "E2").started_at(now),
//!     Activity::new("Task_Notify", "E1").started_at(now),
//! ];
//! let incidents = vec![Incident::new("E1")];
//!
//! let annotations = correlate(&activities, &incidents);
//! assert_eq!(annotations[0].execution_sequence, 1);
//! assert!(annotations[1].has_incident);
//! ```
//!
//! [`ProcessInstanceDetails`]: inspection_types::ProcessInstanceDetails
//! [`DiagramAnnotation`]: inspection_types::DiagramAnnotation

#![deny(unsafe_code)]

pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod correlator;
pub mod diagram_engine;
pub mod headless;
pub mod renderer;
pub mod session;
pub mod summarizer;

#[cfg(test)]
mod fixtures;

// Re-export main types
pub use catalog::{DisplayVariable, TypeCategory, VariableCatalog};
pub use clipboard::{copy_value, ClipboardSink};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use config::{CatalogConfig, InspectionConfig, OverlayOffset, RendererConfig};
pub use correlator::correlate;
pub use diagram_engine::{
    DiagramContainer, DiagramEngine, EngineFactory, ImportReport, Overlay, OverlayId, OverlayKind,
};
pub use headless::{HeadlessEngine, HeadlessFactory, PlacedOverlay, Viewport};
pub use renderer::{DiagramRenderer, ImportOutcome};
pub use session::{InspectionSession, PresentReport};
pub use summarizer::{summarize, DetailSpan, Headline, WorkflowKind};
