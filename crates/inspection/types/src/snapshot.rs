//! Process-instance snapshots: one immutable fetch of an instance's state
//!
//! The snapshot carries the raw activity trace and incidents. Deciding
//! which activities are in flight, and which of them carry incidents, is
//! left to the correlator in the inspection engine.

use crate::{VariableBag, VariableValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Identifiers ──────────────────────────────────────────────────────

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First eight characters, for log lines
            pub fn short(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((end, _)) => &self.0[..end],
                    None => &self.0,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a process instance
    ProcessInstanceId
);
string_id!(
    /// Identifier of a diagram node (BPMN flow element id)
    ActivityId
);
string_id!(
    /// Identifier of an execution token
    ExecutionId
);

// ── Activity ─────────────────────────────────────────────────────────

/// One visit of one execution to one diagram node
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub activity_id: ActivityId,
    pub execution_id: ExecutionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl Activity {
    pub fn new(activity_id: impl Into<String>, execution_id: impl Into<String>) -> Self {
        Self {
            activity_id: ActivityId::new(activity_id),
            execution_id: ExecutionId::new(execution_id),
            activity_name: None,
            activity_type: None,
            start_time: None,
            end_time: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.activity_name = Some(name.into());
        self
    }

    pub fn with_type(mut self, activity_type: impl Into<String>) -> Self {
        self.activity_type = Some(activity_type.into());
        self
    }

    pub fn started_at(mut self, at: DateTime<Utc>) -> Self {
        self.start_time = Some(at);
        self
    }

    pub fn ended_at(mut self, at: DateTime<Utc>) -> Self {
        self.end_time = Some(at);
        self
    }

    /// Started and not yet ended
    pub fn is_in_flight(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_none()
    }
}

// ── Incident ─────────────────────────────────────────────────────────

/// An unresolved failure attached to an execution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    #[serde(default)]
    pub id: String,
    pub execution_id: ExecutionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<ActivityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_timestamp: Option<DateTime<Utc>>,
}

impl Incident {
    pub fn new(execution_id: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            execution_id: ExecutionId::new(execution_id),
            activity_id: None,
            incident_type: None,
            incident_message: None,
            incident_timestamp: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.incident_message = Some(message.into());
        self
    }
}

// ── Wire Record ──────────────────────────────────────────────────────

/// The process-instance record exactly as the query service sends it
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInstanceRecord {
    #[serde(default)]
    pub business_key: Option<String>,
    pub id: ProcessInstanceId,
    pub process_definition_key: String,
    #[serde(default)]
    pub process_definition_name: String,
    #[serde(default)]
    pub diagram_markup: String,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
    #[serde(default)]
    pub variable_names: Vec<String>,
    #[serde(default)]
    pub variable_values: Vec<VariableValue>,
}

// ── Snapshot ─────────────────────────────────────────────────────────

/// An immutable snapshot of one process instance
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "ProcessInstanceRecord", into = "ProcessInstanceRecord")]
pub struct ProcessInstanceDetails {
    pub business_key: Option<String>,
    pub id: ProcessInstanceId,
    /// Workflow type key
    pub process_definition_key: String,
    /// Display name of the process definition
    pub process_definition_name: String,
    /// BPMN 2.0 XML of the process definition
    pub diagram_markup: String,
    /// Activity trace, time-ascending as delivered
    pub activities: Vec<Activity>,
    pub incidents: Vec<Incident>,
    pub variables: VariableBag,
}

impl ProcessInstanceDetails {
    pub fn new(
        id: impl Into<String>,
        process_definition_key: impl Into<String>,
        process_definition_name: impl Into<String>,
    ) -> Self {
        Self {
            business_key: None,
            id: ProcessInstanceId::new(id),
            process_definition_key: process_definition_key.into(),
            process_definition_name: process_definition_name.into(),
            diagram_markup: String::new(),
            activities: Vec::new(),
            incidents: Vec::new(),
            variables: VariableBag::new(),
        }
    }

    pub fn with_business_key(mut self, key: impl Into<String>) -> Self {
        self.business_key = Some(key.into());
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.diagram_markup = markup.into();
        self
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    pub fn with_incident(mut self, incident: Incident) -> Self {
        self.incidents.push(incident);
        self
    }

    pub fn with_variables(mut self, variables: VariableBag) -> Self {
        self.variables = variables;
        self
    }

    // ── Query methods ────────────────────────────────────────────────

    /// Activities that have started and not yet ended, in delivery order
    pub fn in_flight_activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter().filter(|a| a.is_in_flight())
    }

    pub fn incident_count(&self) -> usize {
        self.incidents.len()
    }

    pub fn has_incidents(&self) -> bool {
        !self.incidents.is_empty()
    }

    /// Business key when present, otherwise the instance id
    pub fn display_key(&self) -> &str {
        self.business_key.as_deref().unwrap_or(self.id.as_str())
    }
}

impl From<ProcessInstanceRecord> for ProcessInstanceDetails {
    fn from(record: ProcessInstanceRecord) -> Self {
        Self {
            business_key: record.business_key,
            id: record.id,
            process_definition_key: record.process_definition_key,
            process_definition_name: record.process_definition_name,
            diagram_markup: record.diagram_markup,
            activities: record.activities,
            incidents: record.incidents,
            variables: VariableBag::from_parallel(record.variable_names, record.variable_values),
        }
    }
}

impl From<ProcessInstanceDetails> for ProcessInstanceRecord {
    fn from(details: ProcessInstanceDetails) -> Self {
        let (variable_names, variable_values) = details.variables.to_parallel();
        Self {
            business_key: details.business_key,
            id: details.id,
            process_definition_key: details.process_definition_key,
            process_definition_name: details.process_definition_name,
            diagram_markup: details.diagram_markup,
            activities: details.activities,
            incidents: details.incidents,
            variable_names,
            variable_values,
        }
    }
}
