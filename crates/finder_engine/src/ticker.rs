use std::sync::Arc;
use std::time::Duration;

use finder_core::SearchGeneration;
use finder_logging::finder_trace;
use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::EngineEvent;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The single simulator timer. Starting a new run always cancels the old one.
pub struct Ticker {
    runtime: Handle,
    current: Option<(SearchGeneration, CancellationToken)>,
}

impl Ticker {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            current: None,
        }
    }

    /// Emits `max_ticks` ticks for `generation`, one per `period`, then ends on its own.
    pub fn start(
        &mut self,
        generation: SearchGeneration,
        period: Duration,
        max_ticks: usize,
        sink: Arc<dyn EventSink>,
    ) {
        self.stop();
        let token = CancellationToken::new();
        let task_token = token.clone();
        self.runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            for _ in 0..max_ticks {
                tokio::select! {
                    _ = task_token.cancelled() => return,
                    _ = interval.tick() => {}
                }
                if task_token.is_cancelled() {
                    return;
                }
                sink.emit(EngineEvent::Tick { generation });
            }
            finder_trace!("Ticker for search #{} reached its last stage", generation);
            task_token.cancel();
        });
        self.current = Some((generation, token));
    }

    /// Cancels the running timer, if any. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.current.take() {
            Some((_, token)) => {
                let was_running = !token.is_cancelled();
                token.cancel();
                was_running
            }
            None => false,
        }
    }

    pub fn active_generation(&self) -> Option<SearchGeneration> {
        self.current
            .as_ref()
            .filter(|(_, token)| !token.is_cancelled())
            .map(|(generation, _)| *generation)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
