use std::time::Duration;

use crate::record::{PartId, SearchItem};
use crate::settings::PresentationSettings;
use crate::simulator::SearchGeneration;
use crate::stage::StageName;

/// Work the host must perform, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace any running simulator timer with one for `generation`.
    StartTicker {
        generation: SearchGeneration,
        period: Duration,
        max_ticks: usize,
    },
    StopTicker,
    RunSearch {
        generation: SearchGeneration,
        items: Vec<SearchItem>,
        /// `None` runs every stage.
        stages: Option<Vec<StageName>>,
    },
    FetchRecords,
    CreateRecord(SearchItem),
    /// Ids are a snapshot taken when the batch was requested.
    DeleteRecords { ids: Vec<PartId> },
    /// Write the whole settings object now.
    PersistSettings(PresentationSettings),
    /// Drop the credential; the session is over.
    SessionReset,
}
