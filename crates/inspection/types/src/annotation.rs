//! Diagram annotations: what to overlay on one in-flight diagram node

use crate::ActivityId;
use serde::{Deserialize, Serialize};

/// A derived marker for one in-flight activity.
///
/// Annotations are ephemeral; they are recomputed from every snapshot and
/// never stored alongside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramAnnotation {
    /// Diagram node the marker is anchored to
    pub activity_id: ActivityId,
    /// 1-based ordinal of the execution visiting the node
    pub execution_sequence: u32,
    /// Whether that execution carries an unresolved incident
    pub has_incident: bool,
}

impl DiagramAnnotation {
    pub fn new(activity_id: ActivityId, execution_sequence: u32, has_incident: bool) -> Self {
        Self {
            activity_id,
            execution_sequence,
            has_incident,
        }
    }
}
