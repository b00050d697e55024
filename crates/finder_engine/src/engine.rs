use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use finder_core::{PartId, SearchGeneration, SearchItem, StageName};
use finder_logging::{finder_debug, finder_info};

use crate::api::{ApiSettings, PartsApi, ReqwestPartsApi};
use crate::ticker::{ChannelEventSink, EventSink, Ticker};
use crate::{ApiError, EngineEvent};

enum EngineCommand {
    Search {
        generation: SearchGeneration,
        items: Vec<SearchItem>,
        stages: Option<Vec<StageName>>,
    },
    FetchRecords,
    Create(SearchItem),
    Delete(Vec<PartId>),
    StartTicker {
        generation: SearchGeneration,
        period: Duration,
        max_ticks: usize,
    },
    StopTicker,
}

/// Owns the background runtime. Commands go in, [`EngineEvent`]s come out.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let api = ReqwestPartsApi::new(settings)?;
        Ok(Self::with_api(Arc::new(api)))
    }

    pub fn with_api(api: Arc<dyn PartsApi>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx.clone()));
            let mut ticker = Ticker::new(runtime.handle().clone());
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartTicker {
                        generation,
                        period,
                        max_ticks,
                    } => ticker.start(generation, period, max_ticks, sink.clone()),
                    EngineCommand::StopTicker => {
                        ticker.stop();
                    }
                    other => {
                        let api = api.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            handle_command(api.as_ref(), other, sink.as_ref()).await;
                        });
                    }
                }
            }
            ticker.stop();
            finder_info!("Engine command channel closed; shutting down");
        });

        Self { cmd_tx, event_rx }
    }

    pub fn search(
        &self,
        generation: SearchGeneration,
        items: Vec<SearchItem>,
        stages: Option<Vec<StageName>>,
    ) {
        self.send(EngineCommand::Search {
            generation,
            items,
            stages,
        });
    }

    pub fn fetch_records(&self) {
        self.send(EngineCommand::FetchRecords);
    }

    pub fn create_record(&self, item: SearchItem) {
        self.send(EngineCommand::Create(item));
    }

    pub fn delete_records(&self, ids: Vec<PartId>) {
        self.send(EngineCommand::Delete(ids));
    }

    pub fn start_ticker(&self, generation: SearchGeneration, period: Duration, max_ticks: usize) {
        self.send(EngineCommand::StartTicker {
            generation,
            period,
            max_ticks,
        });
    }

    pub fn stop_ticker(&self) {
        self.send(EngineCommand::StopTicker);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_command(api: &dyn PartsApi, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::Search {
            generation,
            items,
            stages,
        } => {
            finder_debug!("Search #{} started with {} item(s)", generation, items.len());
            let result = api.search(&items, stages.as_deref()).await;
            sink.emit(EngineEvent::SearchCompleted { generation, result });
        }
        EngineCommand::FetchRecords => {
            let result = api.list_parts().await;
            sink.emit(EngineEvent::RecordsFetched(result));
        }
        EngineCommand::Create(item) => {
            let result = api.create_part(&item).await;
            sink.emit(EngineEvent::RecordCreated(result));
        }
        EngineCommand::Delete(ids) => {
            let result = api.delete_parts(&ids).await;
            sink.emit(EngineEvent::RecordsDeleted {
                requested: ids.len(),
                result,
            });
        }
        EngineCommand::StartTicker { .. } | EngineCommand::StopTicker => {}
    }
}
