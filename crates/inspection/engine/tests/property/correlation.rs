//! Property tests: correlation output tracks the in-flight activity set.

use chrono::{Duration, TimeZone, Utc};
use inspection_engine::correlate;
use inspection_types::{Activity, Incident};
use proptest::prelude::*;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// Generate an activity that is pending, in flight or finished.
fn arb_activity() -> impl Strategy<Value = Activity> {
    ("Task_[A-F]", "E[0-5]", 0u8..3).prop_map(|(activity_id, execution_id, phase)| {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let activity = Activity::new(activity_id, execution_id);
        match phase {
            0 => activity,
            1 => activity.started_at(start),
            _ => activity
                .started_at(start)
                .ended_at(start + Duration::minutes(3)),
        }
    })
}

fn arb_incidents() -> impl Strategy<Value = Vec<Incident>> {
    prop::collection::vec("E[0-9]".prop_map(Incident::new), 0..4)
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// One annotation per in-flight activity, in delivery order.
    #[test]
    fn one_annotation_per_in_flight_activity(
        activities in prop::collection::vec(arb_activity(), 0..24),
        incidents in arb_incidents(),
    ) {
        let annotations = correlate(&activities, &incidents);
        let in_flight: Vec<&Activity> = activities.iter().filter(|a| a.is_in_flight()).collect();

        prop_assert_eq!(annotations.len(), in_flight.len());
        for (annotation, activity) in annotations.iter().zip(&in_flight) {
            prop_assert_eq!(&annotation.activity_id, &activity.activity_id);
        }
    }

    /// Sequences are 1-based, dense, and stable per execution.
    #[test]
    fn sequences_are_first_seen_ordinals(
        activities in prop::collection::vec(arb_activity(), 0..24),
    ) {
        let annotations = correlate(&activities, &[]);
        let in_flight: Vec<&Activity> = activities.iter().filter(|a| a.is_in_flight()).collect();

        let mut expected = HashMap::new();
        for (annotation, activity) in annotations.iter().zip(&in_flight) {
            let next = expected.len() as u32 + 1;
            let sequence = *expected.entry(activity.execution_id.clone()).or_insert(next);
            prop_assert_eq!(annotation.execution_sequence, sequence);
            prop_assert!(annotation.execution_sequence >= 1);
        }
    }

    /// An annotation is flagged iff an incident names its execution.
    #[test]
    fn incident_flag_matches_execution(
        activities in prop::collection::vec(arb_activity(), 0..24),
        incidents in arb_incidents(),
    ) {
        let annotations = correlate(&activities, &incidents);
        let in_flight: Vec<&Activity> = activities.iter().filter(|a| a.is_in_flight()).collect();

        for (annotation, activity) in annotations.iter().zip(&in_flight) {
            let failing = incidents.iter().any(|i| i.execution_id == activity.execution_id);
            prop_assert_eq!(annotation.has_incident, failing);
        }
    }
}

#[test]
fn interleaved_executions_get_first_seen_ordinals() {
    let start = Utc::now();
    let activities: Vec<Activity> = ["E2", "E1", "E2", "E3"]
        .iter()
        .enumerate()
        .map(|(i, e)| Activity::new(format!("Task_{}", i), *e).started_at(start))
        .collect();

    let sequences: Vec<u32> = correlate(&activities, &[])
        .iter()
        .map(|a| a.execution_sequence)
        .collect();
    assert_eq!(sequences, vec![1, 2, 1, 3]);
}
