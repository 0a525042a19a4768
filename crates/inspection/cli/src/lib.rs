//! `wfinspect` - command-line inspection of process-instance snapshots
//!
//! Loads a snapshot as delivered by the workflow service, presents it in an
//! [`InspectionSession`] backed by the headless engine and turns the result
//! into an [`InspectionReport`].
//!
//! [`InspectionSession`]: inspection_engine::InspectionSession

#![deny(unsafe_code)]

pub mod report;

pub use report::{load_snapshot, DiagramStatus, InspectionReport};
