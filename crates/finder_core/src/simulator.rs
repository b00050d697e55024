use std::time::Duration;

use crate::progress::ProgressBoard;
use crate::stage::StageName;

/// Time between simulated stage advances.
pub const SIMULATED_STAGE_PERIOD: Duration = Duration::from_millis(2200);

/// Monotonic tag attached to every search; ticks and responses from older searches are dropped.
pub type SearchGeneration = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick belonged to a stopped or superseded run.
    Ignored,
    Advanced { cursor: usize },
    /// Cursor is on the last stage; the run needs no further ticks.
    ReachedLast,
}

/// Optimistic cursor over the stages a search runs while it is in flight.
///
/// Holds no timer itself: the host owns the timer and feeds ticks back tagged
/// with the generation they were started for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSimulator {
    /// Stages walked by the cursor, in vocabulary order. Empty means all of them.
    plan: Vec<StageName>,
    cursor: usize,
    running: Option<SearchGeneration>,
}

impl ProgressSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self) -> &[StageName] {
        if self.plan.is_empty() {
            &StageName::ALL
        } else {
            &self.plan
        }
    }

    pub fn last_cursor(&self) -> usize {
        self.plan().len() - 1
    }

    /// Number of ticks needed to walk from the first to the last planned stage.
    pub fn max_ticks(&self) -> usize {
        self.last_cursor()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn running_generation(&self) -> Option<SearchGeneration> {
        self.running
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Starts walking `stages`; stages left out are shown as skipped once the
    /// cursor passes them. An empty slice walks every stage.
    pub fn start(
        &mut self,
        generation: SearchGeneration,
        board: &mut ProgressBoard,
        stages: &[StageName],
    ) {
        self.stop();
        self.plan = StageName::ALL
            .into_iter()
            .filter(|stage| stages.contains(stage))
            .collect();
        self.cursor = 0;
        self.running = Some(generation);
        board.show_cursor(self.plan(), self.cursor);
    }

    pub fn tick(&mut self, generation: SearchGeneration, board: &mut ProgressBoard) -> TickOutcome {
        if self.running != Some(generation) {
            return TickOutcome::Ignored;
        }
        self.cursor = (self.cursor + 1).min(self.last_cursor());
        board.show_cursor(self.plan(), self.cursor);
        if self.cursor == self.last_cursor() {
            self.running = None;
            TickOutcome::ReachedLast
        } else {
            TickOutcome::Advanced {
                cursor: self.cursor,
            }
        }
    }

    /// Returns whether a run was actually stopped. Safe to call repeatedly.
    pub fn stop(&mut self) -> bool {
        self.running.take().is_some()
    }
}
