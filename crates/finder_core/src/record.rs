use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::stage::StageReport;

/// Identity assigned to a part record by the backend.
pub type PartId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Matched,
    Mismatch,
    Pending,
}

impl MatchStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MatchStatus::Matched => "matched",
            MatchStatus::Mismatch => "mismatch",
            MatchStatus::Pending => "pending",
        }
    }
}

/// A row of the server-owned canonical collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    pub id: PartId,
    pub part_number: String,
    #[serde(default)]
    pub manufacturer_name: Option<String>,
    #[serde(default)]
    pub alias_used: Option<String>,
    #[serde(default)]
    pub submitted_manufacturer: Option<String>,
    #[serde(default)]
    pub match_status: Option<MatchStatus>,
    #[serde(default)]
    pub match_confidence: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub search_stage: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stage_history: Vec<StageReport>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub what_produces: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub manufacturer_aliases: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub debug_log: Option<String>,
}

/// One part to look up, with an optional manufacturer the operator expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    pub part_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_hint: Option<String>,
}

impl SearchItem {
    pub fn new(part_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            manufacturer_hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.manufacturer_hint = Some(hint.into());
        self
    }
}

/// Per-item result of a search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub part_number: String,
    #[serde(default)]
    pub manufacturer_name: Option<String>,
    #[serde(default)]
    pub alias_used: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub search_stage: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stage_history: Vec<StageReport>,
    #[serde(default)]
    pub submitted_manufacturer: Option<String>,
    #[serde(default)]
    pub match_status: Option<MatchStatus>,
    #[serde(default)]
    pub match_confidence: Option<f64>,
    #[serde(default)]
    pub what_produces: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub manufacturer_aliases: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl SearchResultItem {
    pub fn found_manufacturer(&self) -> bool {
        self.manufacturer_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }
}

/// Outcome of a bulk import, as reported by the upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Parses operator input: one `PART[;HINT]` per line, blanks ignored.
pub fn parse_search_items(raw: &str) -> Vec<SearchItem> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (part, hint) = match line.split_once(';') {
                Some((part, hint)) => (part.trim(), hint.trim()),
                None => (line, ""),
            };
            if part.is_empty() {
                return None;
            }
            let item = SearchItem::new(part);
            Some(if hint.is_empty() {
                item
            } else {
                item.with_hint(hint)
            })
        })
        .collect()
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<StageReport>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<StageReport>>::deserialize(deserializer)?.unwrap_or_default())
}
