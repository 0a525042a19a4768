//! Execution correlator: activity trace + incidents → diagram annotations
//!
//! Only in-flight activities are annotated. Each execution gets a stable
//! ordinal in the order it is first seen among them, so concurrent tokens
//! on parallel branches can be told apart on the diagram. A node visited by
//! several executions gets one annotation per visit.
//!
//! Incidents whose execution has no in-flight activity are not surfaced.

use inspection_types::{Activity, DiagramAnnotation, ExecutionId, Incident};
use std::collections::{HashMap, HashSet};

/// Correlate the in-flight activities with incidents.
///
/// The output has one annotation per in-flight activity, in the order the
/// activities were delivered.
pub fn correlate(activities: &[Activity], incidents: &[Incident]) -> Vec<DiagramAnnotation> {
    let failing: HashSet<&ExecutionId> = incidents.iter().map(|i| &i.execution_id).collect();
    let mut sequences = SequenceRegistry::default();

    let annotations: Vec<DiagramAnnotation> = activities
        .iter()
        .filter(|a| a.is_in_flight())
        .map(|activity| {
            DiagramAnnotation::new(
                activity.activity_id.clone(),
                sequences.sequence_for(&activity.execution_id),
                failing.contains(&activity.execution_id),
            )
        })
        .collect();

    tracing::debug!(
        activities = activities.len(),
        annotations = annotations.len(),
        executions = sequences.len(),
        "Correlated activity trace"
    );

    annotations
}

/// Assigns 1-based ordinals to executions in first-seen order
#[derive(Debug, Default)]
struct SequenceRegistry<'a> {
    assigned: HashMap<&'a ExecutionId, u32>,
}

impl<'a> SequenceRegistry<'a> {
    fn sequence_for(&mut self, execution_id: &'a ExecutionId) -> u32 {
        let next = self.assigned.len() as u32 + 1;
        *self.assigned.entry(execution_id).or_insert(next)
    }

    fn len(&self) -> usize {
        self.assigned.len()
    }
}
