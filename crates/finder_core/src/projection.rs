use crate::record::{MatchStatus, PartId, PartRecord};
use crate::stage::{StageName, PLACEHOLDER};

/// Presentation row derived from a [`PartRecord`]. Never edited in place.
///
/// Every optional field is rendered as text; absent values become
/// [`PLACEHOLDER`]. `match_status` keeps the raw value for filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: PartId,
    pub part_number: String,
    pub manufacturer: String,
    pub alias: String,
    pub submitted_manufacturer: String,
    pub match_status: Option<MatchStatus>,
    pub status: String,
    pub match_confidence: String,
    pub confidence: String,
    pub service: String,
    pub source: String,
    pub created: String,
    pub produces: String,
    pub website: String,
    pub aliases: String,
    pub country: String,
}

impl DisplayRow {
    pub fn has_manufacturer(&self) -> bool {
        self.manufacturer != PLACEHOLDER
    }
}

/// Projects the canonical collection into rows ordered by creation time.
/// Equal timestamps keep collection order.
pub fn project(records: &[PartRecord]) -> Vec<DisplayRow> {
    let mut ordered: Vec<&PartRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.created_at);
    ordered.into_iter().map(project_record).collect()
}

pub fn project_record(record: &PartRecord) -> DisplayRow {
    DisplayRow {
        id: record.id,
        part_number: text_or_placeholder(Some(&record.part_number)),
        manufacturer: text_or_placeholder(record.manufacturer_name.as_deref()),
        alias: text_or_placeholder(record.alias_used.as_deref()),
        submitted_manufacturer: text_or_placeholder(record.submitted_manufacturer.as_deref()),
        match_status: record.match_status,
        status: text_or_placeholder(record.match_status.map(MatchStatus::label)),
        match_confidence: percent_or_placeholder(record.match_confidence),
        confidence: percent_or_placeholder(record.confidence),
        service: service_label(record.search_stage.as_deref()),
        source: text_or_placeholder(record.source_url.as_deref()),
        created: record.created_at.format("%Y-%m-%d %H:%M").to_string(),
        produces: text_or_placeholder(record.what_produces.as_deref()),
        website: text_or_placeholder(record.website.as_deref()),
        aliases: text_or_placeholder(record.manufacturer_aliases.as_deref()),
        country: text_or_placeholder(record.country.as_deref()),
    }
}

fn text_or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn percent_or_placeholder(value: Option<f64>) -> String {
    match value {
        Some(ratio) if ratio.is_finite() => format!("{:.0}%", ratio.clamp(0.0, 1.0) * 100.0),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Known stages show their label; anything else the backend reports (e.g. `cache`) passes through.
fn service_label(search_stage: Option<&str>) -> String {
    match search_stage {
        Some(name) => match StageName::from_wire(name) {
            Some(stage) => stage.label().to_string(),
            None => text_or_placeholder(Some(name)),
        },
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bare_record(id: PartId, minute: u32) -> PartRecord {
        PartRecord {
            id,
            part_number: format!("P-{id}"),
            manufacturer_name: None,
            alias_used: None,
            submitted_manufacturer: None,
            match_status: None,
            match_confidence: None,
            confidence: None,
            source_url: None,
            search_stage: None,
            stage_history: Vec::new(),
            created_at: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(9, minute, 0)
                .unwrap(),
            what_produces: None,
            website: None,
            manufacturer_aliases: None,
            country: None,
            debug_log: None,
        }
    }

    #[test]
    fn absent_fields_render_as_placeholder() {
        let row = project_record(&bare_record(1, 0));
        for field in [
            &row.manufacturer,
            &row.alias,
            &row.submitted_manufacturer,
            &row.status,
            &row.match_confidence,
            &row.confidence,
            &row.service,
            &row.source,
            &row.produces,
            &row.website,
            &row.aliases,
            &row.country,
        ] {
            assert_eq!(field, PLACEHOLDER);
        }
        assert_eq!(row.created, "2024-05-01 09:00");
        assert!(!row.has_manufacturer());
    }

    #[test]
    fn ordering_is_by_creation_and_stable_on_ties() {
        let records = vec![bare_record(3, 5), bare_record(1, 5), bare_record(2, 1)];
        let ids: Vec<_> = project(&records).iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn values_are_formatted() {
        let mut record = bare_record(7, 0);
        record.manufacturer_name = Some("Bosch".into());
        record.confidence = Some(0.874);
        record.search_stage = Some("googlesearch".into());
        record.match_status = Some(MatchStatus::Matched);
        let row = project_record(&record);
        assert_eq!(row.manufacturer, "Bosch");
        assert_eq!(row.confidence, "87%");
        assert_eq!(row.service, "Google search");
        assert_eq!(row.status, "matched");

        record.search_stage = Some("cache".into());
        assert_eq!(project_record(&record).service, "cache");
    }
}
