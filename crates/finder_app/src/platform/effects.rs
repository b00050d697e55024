use finder_core::{Effect, Msg, PresentationSettings, RemoteFailure, RemoteFailureKind};
use finder_engine::{ApiError, EngineEvent, EngineHandle, FailureKind};
use finder_logging::{finder_debug, finder_info, finder_warn};

use super::persistence::SettingsPersistence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunOutcome {
    Continue,
    /// The credential was rejected; the host must leave the session.
    SessionEnded,
}

/// Executes core effects in emission order against the engine and local storage.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
    persistence: SettingsPersistence,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, persistence: SettingsPersistence) -> Self {
        Self {
            engine,
            persistence,
        }
    }

    pub fn load_settings(&self) -> PresentationSettings {
        self.persistence.load()
    }

    pub fn run(&mut self, effects: Vec<Effect>) -> RunOutcome {
        let mut outcome = RunOutcome::Continue;
        for effect in effects {
            match effect {
                Effect::StartTicker {
                    generation,
                    period,
                    max_ticks,
                } => self.engine.start_ticker(generation, period, max_ticks),
                Effect::StopTicker => self.engine.stop_ticker(),
                Effect::RunSearch {
                    generation,
                    items,
                    stages,
                } => {
                    finder_info!(
                        "RunSearch generation={} items={} stages={:?}",
                        generation,
                        items.len(),
                        stages
                    );
                    self.engine.search(generation, items, stages);
                }
                Effect::FetchRecords => self.engine.fetch_records(),
                Effect::CreateRecord(item) => {
                    finder_debug!("CreateRecord part_number={}", item.part_number);
                    self.engine.create_record(item);
                }
                Effect::DeleteRecords { ids } => {
                    finder_info!("DeleteRecords count={}", ids.len());
                    self.engine.delete_records(ids);
                }
                Effect::PersistSettings(settings) => self.persistence.save(&settings),
                Effect::SessionReset => {
                    finder_warn!("Session reset requested; dropping credential");
                    outcome = RunOutcome::SessionEnded;
                }
            }
        }
        outcome
    }

    pub fn poll_event(&self) -> Option<Msg> {
        self.engine.try_recv().map(event_to_msg)
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Tick { generation } => Msg::SimulatorTick { generation },
        EngineEvent::SearchCompleted { generation, result } => Msg::SearchSettled {
            generation,
            result: result.map_err(remote_failure),
        },
        EngineEvent::RecordsFetched(result) => Msg::RecordsLoaded(result.map_err(remote_failure)),
        EngineEvent::RecordCreated(result) => Msg::RecordCreated(result.map_err(remote_failure)),
        EngineEvent::RecordsDeleted { requested, result } => Msg::RecordsDeleted {
            requested,
            result: result.map_err(remote_failure),
        },
    }
}

fn remote_failure(err: ApiError) -> RemoteFailure {
    let kind = match err.kind {
        FailureKind::Unauthorized => RemoteFailureKind::Unauthorized,
        FailureKind::Timeout => RemoteFailureKind::Timeout,
        FailureKind::HttpStatus(code) => RemoteFailureKind::Rejected(code),
        FailureKind::Decode => RemoteFailureKind::Malformed,
        FailureKind::InvalidUrl | FailureKind::Network => RemoteFailureKind::Network,
    };
    RemoteFailure::new(kind, err.to_string())
}
