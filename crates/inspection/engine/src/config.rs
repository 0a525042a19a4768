//! Inspection configuration.
//!
//! Layered as defaults, then an optional file, then `WFINSPECT__SECTION__KEY`
//! environment variables.

use inspection_types::{InspectionError, InspectionResult};
use serde::{Deserialize, Serialize};

/// Variables hidden from the catalog unless configured otherwise.
pub const DEFAULT_HIDDEN_VARIABLES: &[&str] = &["startUserKey"];

/// Top-level inspection configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InspectionConfig {
    /// Diagram renderer configuration
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Variable catalog configuration
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl InspectionConfig {
    /// Load configuration from defaults, an optional file and the environment.
    pub fn load(path: Option<&str>) -> InspectionResult<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(
            config::Config::try_from(&InspectionConfig::default())
                .map_err(|e| InspectionError::Config(e.to_string()))?,
        );

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("WFINSPECT")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| InspectionError::Config(e.to_string()))
    }
}

/// Placement of an overlay relative to the top-left corner of its node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayOffset {
    pub top: i32,
    pub left: i32,
}

impl OverlayOffset {
    pub const fn new(top: i32, left: i32) -> Self {
        Self { top, left }
    }
}

/// Diagram renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Fit the viewport to the whole diagram after each successful import
    #[serde(default = "default_true")]
    pub fit_on_load: bool,

    /// Offset of the execution-sequence marker
    #[serde(default = "default_sequence_offset")]
    pub sequence_offset: OverlayOffset,

    /// Offset of the incident marker
    #[serde(default = "default_incident_offset")]
    pub incident_offset: OverlayOffset,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            fit_on_load: true,
            sequence_offset: default_sequence_offset(),
            incident_offset: default_incident_offset(),
        }
    }
}

/// Variable catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Internal variables never shown in the catalog
    #[serde(default = "default_hidden_variables")]
    pub hidden_variables: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            hidden_variables: default_hidden_variables(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sequence_offset() -> OverlayOffset {
    OverlayOffset::new(-10, -10)
}

fn default_incident_offset() -> OverlayOffset {
    OverlayOffset::new(-10, 20)
}

fn default_hidden_variables() -> Vec<String> {
    DEFAULT_HIDDEN_VARIABLES
        .iter()
        .map(|s| s.to_string())
        .collect()
}
