//! Finder core: pure state machine, progress simulation and derived table view.
mod effect;
mod filter;
mod msg;
mod progress;
mod projection;
mod reconcile;
mod record;
mod selection;
mod settings;
mod simulator;
mod stage;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use filter::{FilterSet, FoundFilter, MatchStatusFilter, TextColumn};
pub use msg::{Msg, RemoteFailure, RemoteFailureKind};
pub use progress::{ProgressBoard, StageProgressEntry};
pub use projection::{project, project_record, DisplayRow};
pub use reconcile::{reconcile, resolve_current_service};
pub use record::{
    parse_search_items, ImportSummary, MatchStatus, PartId, PartRecord, SearchItem,
    SearchResultItem,
};
pub use selection::Selection;
pub use settings::{
    Column, Density, FontSize, PresentationSettings, DEFAULT_ROW_HEIGHT, MIN_COLUMN_WIDTH,
    MIN_ROW_HEIGHT, SETTINGS_KEY, SETTINGS_VERSION,
};
pub use simulator::{ProgressSimulator, SearchGeneration, TickOutcome, SIMULATED_STAGE_PERIOD};
pub use stage::{DisplayState, StageName, StageOutcome, StageReport, PLACEHOLDER};
pub use state::{AppState, Notice, NoticeSeverity};
pub use update::update;
pub use view_model::{AppViewModel, StageRowView, TableRowView};
