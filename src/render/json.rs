use crate::report::PassReport;
use serde::Serialize;

/// Every requested pass for one trait, as emitted by the JSON format.
#[derive(Debug, Serialize)]
pub struct TraitReport {
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub passes: Vec<PassReport>,
}

/// Serialize all trait reports as one pretty-printed JSON array.
pub fn render_json(reports: &[TraitReport]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}
