use crate::filter::{FoundFilter, MatchStatusFilter, TextColumn};
use crate::record::{ImportSummary, PartId, PartRecord, SearchItem, SearchResultItem};
use crate::settings::{Column, Density, FontSize, PresentationSettings};
use crate::simulator::SearchGeneration;
use crate::stage::StageName;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Operator edited the parts input (one `PART[;HINT]` per line).
    PartsInputChanged(String),
    /// Operator submitted the parts input for lookup.
    SearchSubmitted,
    /// Operator asked to re-run the lookup for the selected rows.
    SearchSelectedClicked,
    /// Include or exclude a stage from the next searches.
    StageToggled(StageName),
    /// Simulator timer fired for the given search.
    SimulatorTick { generation: SearchGeneration },
    /// The search request for `generation` finished.
    SearchSettled {
        generation: SearchGeneration,
        result: Result<Vec<SearchResultItem>, RemoteFailure>,
    },
    /// Operator asked to re-fetch the canonical collection.
    RefreshRequested,
    RecordsLoaded(Result<Vec<PartRecord>, RemoteFailure>),
    CreateSubmitted(SearchItem),
    RecordCreated(Result<PartRecord, RemoteFailure>),
    DeleteSelectedClicked,
    /// Aggregate outcome of a batch delete of `requested` records.
    RecordsDeleted {
        requested: usize,
        result: Result<(), RemoteFailure>,
    },
    /// Upload collaborator finished a bulk import.
    ImportCompleted(ImportSummary),
    TextFilterChanged { column: TextColumn, text: String },
    MatchStatusFilterChanged(MatchStatusFilter),
    FoundFilterChanged(FoundFilter),
    FiltersCleared,
    RowToggled(PartId),
    SelectAllVisible,
    SelectionCleared,
    /// Drag gesture on a column edge began.
    ColumnResizeStarted(Column),
    /// Drag moved `offset` pixels from where it started.
    ColumnResizeMoved { offset: i64 },
    ColumnResizeEnded,
    RowHeightChanged(u32),
    FontSizeChanged(FontSize),
    DensityChanged(Density),
    FullscreenToggled,
    FitToScreenToggled,
    /// Settings loaded from storage at startup.
    SettingsRestored(PresentationSettings),
    NoticeDismissed,
    /// Host view is going away; nothing may keep ticking.
    ViewClosed,
    /// Auth gate reported the credential as rejected.
    Unauthorized,
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailureKind {
    Unauthorized,
    Timeout,
    Network,
    Rejected(u16),
    Malformed,
}

/// A collaborator call that did not produce a usable answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub kind: RemoteFailureKind,
    pub message: String,
}

impl RemoteFailure {
    pub fn new(kind: RemoteFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == RemoteFailureKind::Unauthorized
    }
}
