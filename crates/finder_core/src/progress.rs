use std::cmp::Ordering;

use crate::stage::{DisplayState, StageName, PLACEHOLDER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageProgressEntry {
    pub name: StageName,
    pub state: DisplayState,
    pub message: Option<String>,
}

impl StageProgressEntry {
    fn idle(name: StageName) -> Self {
        Self {
            name,
            state: DisplayState::Idle,
            message: None,
        }
    }
}

/// Per-stage display state plus the "current service" shown next to it.
///
/// Written by the simulator while a search is in flight and by the reconciler
/// once it settles. Both writers keep the ordering invariant checked by
/// [`ProgressBoard::invariant_holds`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressBoard {
    entries: Vec<StageProgressEntry>,
    current_service: Option<StageName>,
}

impl Default for ProgressBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBoard {
    pub fn new() -> Self {
        Self {
            entries: StageName::ALL.into_iter().map(StageProgressEntry::idle).collect(),
            current_service: None,
        }
    }

    pub fn entries(&self) -> &[StageProgressEntry] {
        &self.entries
    }

    pub fn entry(&self, stage: StageName) -> &StageProgressEntry {
        &self.entries[stage.index()]
    }

    pub fn current_service(&self) -> Option<StageName> {
        self.current_service
    }

    pub fn current_service_label(&self) -> &'static str {
        self.current_service.map_or(PLACEHOLDER, StageName::label)
    }

    pub fn is_idle(&self) -> bool {
        self.current_service.is_none()
            && self.entries.iter().all(|entry| entry.state == DisplayState::Idle)
    }

    /// Full reset: every stage idle, no current service.
    pub fn reset_idle(&mut self) {
        for entry in &mut self.entries {
            entry.state = DisplayState::Idle;
            entry.message = None;
        }
        self.current_service = None;
    }

    /// Simulated frame for `plan[cursor]`: earlier planned stages done, earlier
    /// unplanned stages skipped, the cursor stage active, the rest pending.
    pub(crate) fn show_cursor(&mut self, plan: &[StageName], cursor: usize) {
        let Some(&active) = plan.get(cursor.min(plan.len().saturating_sub(1))) else {
            return;
        };
        for entry in &mut self.entries {
            entry.message = None;
            entry.state = match entry.name.index().cmp(&active.index()) {
                Ordering::Less if plan.contains(&entry.name) => DisplayState::Done,
                Ordering::Less => DisplayState::Skipped,
                Ordering::Equal => DisplayState::Active,
                Ordering::Greater => DisplayState::Pending,
            };
        }
        self.current_service = Some(active);
    }

    pub(crate) fn set_stage(&mut self, stage: StageName, state: DisplayState, message: Option<String>) {
        let entry = &mut self.entries[stage.index()];
        entry.state = state;
        entry.message = message;
    }

    pub(crate) fn set_current_service(&mut self, stage: Option<StageName>) {
        self.current_service = stage;
    }

    /// At most one stage is active; everything before it has settled and
    /// everything after it is still pending.
    pub fn invariant_holds(&self) -> bool {
        let active: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.state == DisplayState::Active)
            .map(|(index, _)| index)
            .collect();
        match active.as_slice() {
            [] => true,
            [cursor] => {
                self.entries[..*cursor].iter().all(|entry| entry.state.is_settled())
                    && self.entries[cursor + 1..]
                        .iter()
                        .all(|entry| entry.state == DisplayState::Pending)
            }
            _ => false,
        }
    }
}
