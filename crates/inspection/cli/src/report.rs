//! Snapshot loading and report assembly.

use anyhow::{Context, Result};
use inspection_engine::{
    DisplayVariable, HeadlessEngine, HeadlessFactory, Headline, ImportOutcome,
    InspectionSession, PlacedOverlay, PresentReport, Viewport,
};
use inspection_types::{DiagramAnnotation, ProcessInstanceDetails};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Read a snapshot JSON file in the workflow service's wire shape.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<ProcessInstanceDetails> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

/// How the diagram region ended up
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiagramStatus {
    Rendered {
        overlays: usize,
        warnings: Vec<String>,
    },
    Failed {
        error: String,
    },
    Discarded,
}

impl From<ImportOutcome> for DiagramStatus {
    fn from(outcome: ImportOutcome) -> Self {
        match outcome {
            ImportOutcome::Rendered { overlays, warnings } => Self::Rendered { overlays, warnings },
            ImportOutcome::Failed(err) => Self::Failed {
                error: err.to_string(),
            },
            ImportOutcome::Discarded => Self::Discarded,
        }
    }
}

/// Everything the instance view shows for one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct InspectionReport {
    pub instance_id: String,
    pub display_key: String,
    pub definition_key: String,
    pub headline: Headline,
    pub annotations: Vec<DiagramAnnotation>,
    pub diagram: DiagramStatus,
    pub overlays: Vec<PlacedOverlay>,
    pub viewport: Option<Viewport>,
    pub variables: Vec<DisplayVariable>,
}

impl InspectionReport {
    /// Assemble a report from a session that has just presented a snapshot.
    pub fn collect(
        session: &InspectionSession<HeadlessFactory>,
        presented: PresentReport,
    ) -> Result<Self> {
        let snapshot = session
            .snapshot()
            .context("Session has no snapshot to report on")?;
        let headline = session
            .headline()
            .context("Session has no snapshot to summarize")?;
        let renderer = session.renderer();

        Ok(Self {
            instance_id: snapshot.id.to_string(),
            display_key: snapshot.display_key().to_string(),
            definition_key: snapshot.process_definition_key.clone(),
            headline,
            annotations: presented.annotations,
            diagram: presented.outcome.into(),
            overlays: renderer
                .with_engine(HeadlessEngine::overlays)
                .unwrap_or_default(),
            viewport: renderer.with_engine(HeadlessEngine::viewport),
            variables: session.variables(),
        })
    }
}

/// Human-readable rendering for terminals
impl fmt::Display for InspectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline)?;
        writeln!(
            f,
            "instance {} ({}) of {}",
            self.display_key, self.instance_id, self.definition_key
        )?;

        writeln!(f)?;
        match &self.diagram {
            DiagramStatus::Rendered { overlays, warnings } => {
                writeln!(f, "diagram: rendered, {} overlays", overlays)?;
                for warning in warnings {
                    writeln!(f, "  warning: {}", warning)?;
                }
            }
            DiagramStatus::Failed { error } => writeln!(f, "diagram: unavailable ({})", error)?,
            DiagramStatus::Discarded => writeln!(f, "diagram: discarded")?,
        }

        for annotation in &self.annotations {
            let marker = if annotation.has_incident { " !" } else { "" };
            writeln!(
                f,
                "  #{} {}{}",
                annotation.execution_sequence, annotation.activity_id, marker
            )?;
        }

        writeln!(f)?;
        if self.variables.is_empty() {
            return writeln!(f, "no variables");
        }
        let width = self.variables.iter().map(|v| v.name.len()).max().unwrap_or(0);
        for variable in &self.variables {
            writeln!(
                f,
                "{:<width$}  {:<7}  {}",
                variable.name,
                format!("{:?}", variable.type_category),
                variable.display_value(),
                width = width
            )?;
        }
        Ok(())
    }
}
