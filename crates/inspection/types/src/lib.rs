//! Snapshot types for workflow-instance inspection
//!
//! A [`ProcessInstanceDetails`] is one immutable fetch of a process instance
//! as delivered by the workflow query service: the diagram markup, the
//! activity trace, open incidents and the variable bag. Everything the
//! inspection engine derives (annotations, display variables, headlines)
//! is rebuilt from a snapshot and never patched in place.
//!
//! # Ingestion boundary
//!
//! The query service encodes variables as two parallel arrays
//! (`variableNames` / `variableValues`). That shape only exists in
//! [`ProcessInstanceRecord`]; deserializing a [`ProcessInstanceDetails`]
//! normalizes it into a [`VariableBag`] immediately.

#![deny(unsafe_code)]

pub mod annotation;
pub mod error;
pub mod snapshot;
pub mod variable;

pub use annotation::DiagramAnnotation;
pub use error::{InspectionError, InspectionResult, RenderError};
pub use snapshot::{
    Activity, ActivityId, ExecutionId, Incident, ProcessInstanceDetails, ProcessInstanceId,
    ProcessInstanceRecord,
};
pub use variable::{Variable, VariableBag, VariableValue};
