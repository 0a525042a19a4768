//! Instance headlines: what a process instance is about, at a glance
//!
//! Every workflow kind names the variables it reads and how they are laid
//! out after the definition name. Unknown kinds fall back to the definition
//! name alone.

use inspection_types::{ProcessInstanceDetails, VariableBag};
use serde::{Deserialize, Serialize};

// ── Workflow Kind ────────────────────────────────────────────────────

/// The workflow type of a process instance, keyed by definition key
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowKind {
    AccountRegistration,
    ConsumerRegistration,
    ProviderRegistration,
    CatalogueHarvest,
    PublishAsset,
    RemoveAsset,
    RemoveAllUserData,
    PublishUserService,
    RemoveUserService,
    /// Any key without a dedicated headline
    Other(String),
}

impl WorkflowKind {
    pub fn from_key(key: &str) -> Self {
        match key {
            "ACCOUNT_REGISTRATION" => Self::AccountRegistration,
            "CONSUMER_REGISTRATION" => Self::ConsumerRegistration,
            "PROVIDER_REGISTRATION" => Self::ProviderRegistration,
            "CATALOGUE_HARVEST" => Self::CatalogueHarvest,
            "PROVIDER_PUBLISH_ASSET" => Self::PublishAsset,
            "PROVIDER_REMOVE_ASSET" => Self::RemoveAsset,
            "USER_REMOVE_ALL_DATA" => Self::RemoveAllUserData,
            "PUBLISH_USER_SERVICE" => Self::PublishUserService,
            "REMOVE_USER_SERVICE" => Self::RemoveUserService,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::AccountRegistration => "ACCOUNT_REGISTRATION",
            Self::ConsumerRegistration => "CONSUMER_REGISTRATION",
            Self::ProviderRegistration => "PROVIDER_REGISTRATION",
            Self::CatalogueHarvest => "CATALOGUE_HARVEST",
            Self::PublishAsset => "PROVIDER_PUBLISH_ASSET",
            Self::RemoveAsset => "PROVIDER_REMOVE_ASSET",
            Self::RemoveAllUserData => "USER_REMOVE_ALL_DATA",
            Self::PublishUserService => "PUBLISH_USER_SERVICE",
            Self::RemoveUserService => "REMOVE_USER_SERVICE",
            Self::Other(key) => key,
        }
    }

    /// Variables the headline reads
    pub fn required_variables(&self) -> &'static [&'static str] {
        match self {
            Self::AccountRegistration | Self::ConsumerRegistration | Self::ProviderRegistration => {
                &["userName", "idpName"]
            }
            Self::CatalogueHarvest => &["catalogueUrl"],
            Self::PublishAsset => &["assetType", "assetTitle", "assetVersion"],
            Self::RemoveAsset => &["assetName", "assetVersion"],
            Self::RemoveAllUserData => &["userName"],
            Self::PublishUserService | Self::RemoveUserService => &["serviceTitle"],
            Self::Other(_) => &[],
        }
    }

    /// Lay out the detail line, or `None` for kinds without one
    fn detail(&self, bag: &VariableBag) -> Option<Vec<DetailSpan>> {
        let field = |name: &str| DetailSpan::Bold(bag.lookup_display(name));
        let plain = |text: &str| DetailSpan::Plain(text.to_string());

        let spans = match self {
            Self::AccountRegistration | Self::ConsumerRegistration | Self::ProviderRegistration => {
                let idp = bag.lookup_display("idpName");
                let mut spans = vec![field("userName")];
                if !idp.is_empty() {
                    spans.extend([plain(" ("), DetailSpan::Bold(idp), plain(")")]);
                }
                spans
            }
            Self::CatalogueHarvest => vec![field("catalogueUrl")],
            Self::PublishAsset => vec![
                field("assetType"),
                plain(": "),
                field("assetTitle"),
                plain(" "),
                field("assetVersion"),
            ],
            Self::RemoveAsset => vec![field("assetName"), plain(" "), field("assetVersion")],
            Self::RemoveAllUserData => vec![field("userName")],
            Self::PublishUserService | Self::RemoveUserService => vec![field("serviceTitle")],
            Self::Other(_) => return None,
        };
        Some(spans)
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ── Headline ─────────────────────────────────────────────────────────

/// A run of detail text
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", content = "text", rename_all = "lowercase")]
pub enum DetailSpan {
    Plain(String),
    /// A value pulled from the variable bag
    Bold(String),
}

impl DetailSpan {
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Bold(text) => text,
        }
    }
}

/// Structured headline for an instance header view
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    /// Process definition display name
    pub title: String,
    /// Detail line, absent for workflow kinds without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Vec<DetailSpan>>,
}

impl Headline {
    /// Detail line as plain text
    pub fn detail_text(&self) -> Option<String> {
        self.detail
            .as_ref()
            .map(|spans| spans.iter().map(DetailSpan::text).collect())
    }

    /// Markdown rendering with bold fields
    pub fn to_markdown(&self) -> String {
        let Some(spans) = &self.detail else {
            return self.title.clone();
        };

        let detail: String = spans
            .iter()
            .map(|span| match span {
                DetailSpan::Plain(text) => text.clone(),
                DetailSpan::Bold(text) if text.is_empty() => String::new(),
                DetailSpan::Bold(text) => format!("**{}**", text),
            })
            .collect();
        format!("{}\n{}", self.title, detail)
    }
}

impl std::fmt::Display for Headline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.detail_text() {
            Some(detail) => write!(f, "{} - {}", self.title, detail),
            None => f.write_str(&self.title),
        }
    }
}

/// Build the headline for a workflow key, definition name and variable bag
pub fn summarize(workflow_key: &str, definition_name: &str, variables: &VariableBag) -> Headline {
    let kind = WorkflowKind::from_key(workflow_key);
    if let WorkflowKind::Other(key) = &kind {
        tracing::debug!(workflow_key = %key, "No headline layout for workflow key");
    }

    Headline {
        title: definition_name.to_string(),
        detail: kind.detail(variables),
    }
}

impl From<&ProcessInstanceDetails> for Headline {
    fn from(details: &ProcessInstanceDetails) -> Self {
        summarize(
            &details.process_definition_key,
            &details.process_definition_name,
            &details.variables,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inspection_types::VariableValue;

    fn bag(pairs: &[(&str, &str)]) -> VariableBag {
        VariableBag::from_parallel(
            pairs.iter().map(|(n, _)| n.to_string()).collect(),
            pairs.iter().map(|(_, v)| VariableValue::from(*v)).collect(),
        )
    }

    #[test]
    fn test_publish_asset() {
        let vars = bag(&[
            ("assetType", "DATASET"),
            ("assetTitle", "Soil Map"),
            ("assetVersion", "v2"),
        ]);
        let headline = summarize("PROVIDER_PUBLISH_ASSET", "Publish Asset", &vars);

        assert_eq!(headline.title, "Publish Asset");
        assert_eq!(headline.detail_text().as_deref(), Some("DATASET: Soil Map v2"));
        assert_eq!(
            headline.to_markdown(),
            "Publish Asset\n**DATASET**: **Soil Map** **v2**"
        );
    }

    #[test]
    fn test_unknown_key_has_no_detail() {
        let vars = bag(&[("userName", "alice")]);
        let headline = summarize("UNKNOWN_KEY", "Some Process", &vars);

        assert_eq!(headline.title, "Some Process");
        assert!(headline.detail.is_none());
        assert_eq!(headline.to_string(), "Some Process");
    }

    #[test]
    fn test_registration_with_and_without_idp() {
        let with_idp = bag(&[("userName", "alice"), ("idpName", "Google")]);
        let without = bag(&[("userName", "bob")]);

        for key in ["ACCOUNT_REGISTRATION", "CONSUMER_REGISTRATION", "PROVIDER_REGISTRATION"] {
            assert_eq!(
                summarize(key, "Registration", &with_idp)
                    .detail_text()
                    .as_deref(),
                Some("alice (Google)")
            );
            assert_eq!(
                summarize(key, "Registration", &without).detail_text().as_deref(),
                Some("bob")
            );
        }
    }

    #[test]
    fn test_remaining_layouts() {
        let cases = [
            ("CATALOGUE_HARVEST", bag(&[("catalogueUrl", "https://cat.example")]), "https://cat.example"),
            ("PROVIDER_REMOVE_ASSET", bag(&[("assetName", "roads"), ("assetVersion", "3")]), "roads 3"),
            ("USER_REMOVE_ALL_DATA", bag(&[("userName", "carol")]), "carol"),
            ("PUBLISH_USER_SERVICE", bag(&[("serviceTitle", "WMS")]), "WMS"),
            ("REMOVE_USER_SERVICE", bag(&[("serviceTitle", "WFS")]), "WFS"),
        ];

        for (key, vars, expected) in cases {
            assert_eq!(
                summarize(key, "Def", &vars).detail_text().as_deref(),
                Some(expected),
                "{}",
                key
            );
        }
    }

    #[test]
    fn test_missing_variables_resolve_to_empty() {
        let headline = summarize("PROVIDER_REMOVE_ASSET", "Remove", &VariableBag::new());
        assert_eq!(headline.detail_text().as_deref(), Some(" "));
    }

    #[test]
    fn test_kind_key_round_trip() {
        for key in [
            "ACCOUNT_REGISTRATION",
            "CATALOGUE_HARVEST",
            "PROVIDER_PUBLISH_ASSET",
            "REMOVE_USER_SERVICE",
            "CUSTOM",
        ] {
            assert_eq!(WorkflowKind::from_key(key).key(), key);
        }
        assert_eq!(
            WorkflowKind::from_key("PROVIDER_PUBLISH_ASSET").required_variables(),
            &["assetType", "assetTitle", "assetVersion"]
        );
    }

    #[test]
    fn test_headline_from_details() {
        let details = ProcessInstanceDetails::new("i-1", "USER_REMOVE_ALL_DATA", "Remove User Data")
            .with_variables(VariableBag::new().with("userName", "dave"));
        let headline = Headline::from(&details);
        assert_eq!(headline.to_string(), "Remove User Data - dave");
    }
}
