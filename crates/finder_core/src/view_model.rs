use crate::projection::DisplayRow;
use crate::settings::PresentationSettings;
use crate::stage::{DisplayState, StageName};
use crate::state::Notice;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub stages: Vec<StageRowView>,
    pub current_service: String,
    pub searching: bool,
    pub search_generation: u64,
    pub parts_input: String,
    pub rows: Vec<TableRowView>,
    pub total_records: usize,
    pub selected_count: usize,
    pub filters_active: bool,
    pub settings: PresentationSettings,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRowView {
    pub name: StageName,
    pub label: &'static str,
    pub state: DisplayState,
    pub message: Option<String>,
    /// Whether the stage is part of the requested subset.
    pub included: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRowView {
    pub row: DisplayRow,
    pub selected: bool,
}
