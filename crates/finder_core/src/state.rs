use std::collections::BTreeSet;

use finder_logging::finder_debug;

use crate::filter::FilterSet;
use crate::progress::ProgressBoard;
use crate::projection::{project, DisplayRow};
use crate::record::{PartRecord, SearchItem};
use crate::settings::{Column, PresentationSettings};
use crate::simulator::{ProgressSimulator, SearchGeneration, TickOutcome};
use crate::selection::Selection;
use crate::stage::StageName;
use crate::view_model::{AppViewModel, StageRowView, TableRowView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Warning,
    Error,
}

/// Transient message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnDrag {
    column: Column,
    origin_width: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    parts_input: String,
    stage_subset: BTreeSet<StageName>,
    generation: SearchGeneration,
    in_flight: Option<SearchGeneration>,
    simulator: ProgressSimulator,
    board: ProgressBoard,
    records: Vec<PartRecord>,
    rows: Vec<DisplayRow>,
    visible: Vec<DisplayRow>,
    filters: FilterSet,
    selection: Selection,
    settings: PresentationSettings,
    column_drag: Option<ColumnDrag>,
    notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: PresentationSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            stages: self
                .board
                .entries()
                .iter()
                .map(|entry| StageRowView {
                    name: entry.name,
                    label: entry.name.label(),
                    state: entry.state,
                    message: entry.message.clone(),
                    included: self.stage_included(entry.name),
                })
                .collect(),
            current_service: self.board.current_service_label().to_string(),
            searching: self.in_flight.is_some(),
            search_generation: self.generation,
            parts_input: self.parts_input.clone(),
            rows: self
                .visible
                .iter()
                .map(|row| TableRowView {
                    selected: self.selection.contains(row.id),
                    row: row.clone(),
                })
                .collect(),
            total_records: self.records.len(),
            selected_count: self.selection.len(),
            filters_active: !self.filters.is_empty(),
            settings: self.settings.clone(),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn search_generation(&self) -> SearchGeneration {
        self.generation
    }

    pub fn board(&self) -> &ProgressBoard {
        &self.board
    }

    pub fn simulator(&self) -> &ProgressSimulator {
        &self.simulator
    }

    pub fn records(&self) -> &[PartRecord] {
        &self.records
    }

    pub fn visible_rows(&self) -> &[DisplayRow] {
        &self.visible
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn settings(&self) -> &PresentationSettings {
        &self.settings
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn parts_input(&self) -> &str {
        &self.parts_input
    }

    pub(crate) fn set_parts_input(&mut self, raw: String) {
        if self.parts_input != raw {
            self.parts_input = raw;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            self.mark_dirty();
        }
    }

    fn stage_included(&self, stage: StageName) -> bool {
        self.stage_subset.is_empty() || self.stage_subset.contains(&stage)
    }

    pub(crate) fn toggle_stage(&mut self, stage: StageName) {
        if self.stage_subset.is_empty() {
            self.stage_subset = StageName::ALL.into_iter().filter(|s| *s != stage).collect();
        } else if !self.stage_subset.remove(&stage) {
            self.stage_subset.insert(stage);
        }
        if self.stage_subset.len() == StageName::ALL.len() {
            self.stage_subset.clear();
        }
        self.mark_dirty();
    }

    /// `None` when every stage runs. An operator who deselects everything also gets every stage.
    pub(crate) fn requested_stages(&self) -> Option<Vec<StageName>> {
        if self.stage_subset.is_empty() {
            None
        } else {
            Some(self.stage_subset.iter().copied().collect())
        }
    }

    /// Starts a new search generation and its simulated progress. Any older
    /// in-flight search is orphaned.
    pub(crate) fn begin_search(&mut self) -> SearchGeneration {
        self.generation += 1;
        if let Some(orphaned) = self.in_flight.replace(self.generation) {
            finder_debug!("Search #{} superseded by #{}", orphaned, self.generation);
        }
        let plan = self.requested_stages().unwrap_or_default();
        self.simulator
            .start(self.generation, &mut self.board, &plan);
        self.mark_dirty();
        self.generation
    }

    pub(crate) fn is_current_search(&self, generation: SearchGeneration) -> bool {
        self.in_flight == Some(generation)
    }

    pub fn has_search_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub(crate) fn apply_tick(&mut self, generation: SearchGeneration) -> TickOutcome {
        let outcome = self.simulator.tick(generation, &mut self.board);
        if outcome == TickOutcome::Ignored {
            finder_debug!("Dropping simulator tick for search #{}", generation);
        } else {
            self.mark_dirty();
        }
        outcome
    }

    /// Stops the simulator and forgets the in-flight search.
    pub(crate) fn end_search(&mut self) {
        self.simulator.stop();
        self.in_flight = None;
        self.mark_dirty();
    }

    pub(crate) fn board_mut(&mut self) -> &mut ProgressBoard {
        self.mark_dirty();
        &mut self.board
    }

    pub(crate) fn selected_search_items(&self) -> Vec<SearchItem> {
        let ids = self.selection.snapshot();
        self.records
            .iter()
            .filter(|record| ids.contains(&record.id))
            .map(|record| {
                let item = SearchItem::new(record.part_number.clone());
                match record.submitted_manufacturer.as_deref().map(str::trim) {
                    Some(hint) if !hint.is_empty() => item.with_hint(hint),
                    _ => item,
                }
            })
            .collect()
    }

    pub(crate) fn replace_records(&mut self, records: Vec<PartRecord>) {
        self.records = records;
        self.rows = project(&self.records);
        self.refilter();
    }

    pub(crate) fn filters_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }

    /// Recomputes the visible rows and drops selections that are no longer visible.
    pub(crate) fn refilter(&mut self) {
        self.visible = self.filters.apply(&self.rows);
        let dropped = self.selection.retain_visible(&self.visible);
        if dropped > 0 {
            finder_debug!("Dropped {} hidden row(s) from the selection", dropped);
        }
        self.mark_dirty();
    }

    pub(crate) fn selection_mut(&mut self) -> (&mut Selection, &[DisplayRow]) {
        self.dirty = true;
        (&mut self.selection, &self.visible)
    }

    pub(crate) fn settings_mut(&mut self) -> &mut PresentationSettings {
        self.mark_dirty();
        &mut self.settings
    }

    pub(crate) fn replace_settings(&mut self, settings: PresentationSettings) {
        self.settings = settings;
        self.mark_dirty();
    }

    pub(crate) fn start_column_drag(&mut self, column: Column) {
        self.column_drag = Some(ColumnDrag {
            column,
            origin_width: self.settings.column_width(column),
        });
    }

    /// Applies a drag offset; returns whether the stored width changed.
    pub(crate) fn move_column_drag(&mut self, offset: i64) -> bool {
        let Some(drag) = self.column_drag else {
            return false;
        };
        let before = self.settings.column_width(drag.column);
        let after = self
            .settings
            .set_column_width(drag.column, i64::from(drag.origin_width) + offset);
        if before != after {
            self.mark_dirty();
        }
        before != after
    }

    pub(crate) fn end_column_drag(&mut self) {
        self.column_drag = None;
    }

    /// Logout-equivalent reset. Presentation settings survive, and the
    /// generation counter keeps counting so late responses stay stale.
    pub(crate) fn reset_session(&mut self) {
        let settings = std::mem::take(&mut self.settings);
        let generation = self.generation;
        *self = Self::with_settings(settings);
        self.generation = generation;
        self.mark_dirty();
    }
}
