use std::sync::{Arc, Mutex};
use std::time::Duration;

use finder_engine::{EngineEvent, EventSink, Ticker};
use tokio::runtime::Handle;

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    fn generations(&self) -> Vec<u64> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Tick { generation } => Some(*generation),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

const PERIOD: Duration = Duration::from_millis(2200);

#[tokio::test(start_paused = true)]
async fn emits_max_ticks_then_stops_itself() {
    let sink = Arc::new(RecordingSink::default());
    let mut ticker = Ticker::new(Handle::current());
    ticker.start(1, PERIOD, 2, sink.clone());
    assert_eq!(ticker.active_generation(), Some(1));

    tokio::time::sleep(PERIOD * 5).await;

    assert_eq!(sink.generations(), vec![1, 1]);
    assert_eq!(ticker.active_generation(), None);
    assert!(!ticker.stop());
}

#[tokio::test(start_paused = true)]
async fn no_tick_before_first_period() {
    let sink = Arc::new(RecordingSink::default());
    let mut ticker = Ticker::new(Handle::current());
    ticker.start(1, PERIOD, 2, sink.clone());

    tokio::time::sleep(PERIOD - Duration::from_millis(100)).await;
    assert!(sink.generations().is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(sink.generations(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn restart_cancels_previous_timer() {
    let sink = Arc::new(RecordingSink::default());
    let mut ticker = Ticker::new(Handle::current());
    ticker.start(1, PERIOD, 2, sink.clone());
    tokio::time::sleep(PERIOD / 2).await;
    ticker.start(2, PERIOD, 2, sink.clone());

    tokio::time::sleep(PERIOD * 5).await;

    assert_eq!(sink.generations(), vec![2, 2]);
}

#[tokio::test(start_paused = true)]
async fn stop_silences_timer() {
    let sink = Arc::new(RecordingSink::default());
    let mut ticker = Ticker::new(Handle::current());
    ticker.start(4, PERIOD, 2, sink.clone());
    tokio::time::sleep(PERIOD + Duration::from_millis(10)).await;

    assert!(ticker.stop());
    assert!(!ticker.stop());
    tokio::time::sleep(PERIOD * 3).await;

    assert_eq!(sink.generations(), vec![4]);
}
