use std::collections::BTreeMap;

use crate::projection::DisplayRow;
use crate::record::MatchStatus;

/// Columns that accept a free-text filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextColumn {
    Article,
    Manufacturer,
    Alias,
    SubmittedManufacturer,
    Service,
    Source,
}

impl TextColumn {
    pub const ALL: [TextColumn; 6] = [
        TextColumn::Article,
        TextColumn::Manufacturer,
        TextColumn::Alias,
        TextColumn::SubmittedManufacturer,
        TextColumn::Service,
        TextColumn::Source,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            TextColumn::Article => "article",
            TextColumn::Manufacturer => "manufacturer",
            TextColumn::Alias => "alias",
            TextColumn::SubmittedManufacturer => "submitted",
            TextColumn::Service => "service",
            TextColumn::Source => "source",
        }
    }

    pub fn from_key(key: &str) -> Option<TextColumn> {
        TextColumn::ALL
            .into_iter()
            .find(|column| column.key().eq_ignore_ascii_case(key.trim()))
    }

    fn cell(self, row: &DisplayRow) -> &str {
        match self {
            TextColumn::Article => &row.part_number,
            TextColumn::Manufacturer => &row.manufacturer,
            TextColumn::Alias => &row.alias,
            TextColumn::SubmittedManufacturer => &row.submitted_manufacturer,
            TextColumn::Service => &row.service,
            TextColumn::Source => &row.source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStatusFilter {
    #[default]
    All,
    Matched,
    Mismatch,
    Pending,
    /// Records with no stored status.
    None,
}

impl MatchStatusFilter {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "matched" => Some(Self::Matched),
            "mismatch" => Some(Self::Mismatch),
            "pending" => Some(Self::Pending),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    fn accepts(self, status: Option<MatchStatus>) -> bool {
        match self {
            MatchStatusFilter::All => true,
            MatchStatusFilter::Matched => status == Some(MatchStatus::Matched),
            MatchStatusFilter::Mismatch => status == Some(MatchStatus::Mismatch),
            MatchStatusFilter::Pending => status == Some(MatchStatus::Pending),
            MatchStatusFilter::None => status.is_none(),
        }
    }
}

/// Tri-state "was a manufacturer found" filter. `Missing` is the exact complement of `Found`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoundFilter {
    #[default]
    All,
    Found,
    Missing,
}

impl FoundFilter {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "found" => Some(Self::Found),
            "missing" => Some(Self::Missing),
            _ => None,
        }
    }

    fn accepts(self, row: &DisplayRow) -> bool {
        let found = row.has_manufacturer() && row.match_status != Some(MatchStatus::Mismatch);
        match self {
            FoundFilter::All => true,
            FoundFilter::Found => found,
            FoundFilter::Missing => !found,
        }
    }
}

/// Conjunction of every active filter. Empty text and `All` match everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSet {
    text: BTreeMap<TextColumn, String>,
    pub match_status: MatchStatusFilter,
    pub found: FoundFilter,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the needle lowercased; a blank needle clears the column.
    pub fn set_text(&mut self, column: TextColumn, needle: &str) {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            self.text.remove(&column);
        } else {
            self.text.insert(column, needle);
        }
    }

    pub fn text(&self, column: TextColumn) -> Option<&str> {
        self.text.get(&column).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.match_status == MatchStatusFilter::All
            && self.found == FoundFilter::All
    }

    pub fn matches(&self, row: &DisplayRow) -> bool {
        self.text
            .iter()
            .all(|(column, needle)| column.cell(row).to_lowercase().contains(needle.as_str()))
            && self.match_status.accepts(row.match_status)
            && self.found.accepts(row)
    }

    pub fn apply(&self, rows: &[DisplayRow]) -> Vec<DisplayRow> {
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }
}
