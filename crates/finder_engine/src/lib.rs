//! Finder engine: remote lookup calls, simulator timer and settings storage.
mod api;
mod engine;
mod persist;
mod store;
mod ticker;
mod types;

pub use api::{ApiSettings, PartsApi, ReqwestPartsApi};
pub use engine::EngineHandle;
pub use persist::{ensure_dir, write_atomically, PersistError};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, SettingsStore};
pub use ticker::{ChannelEventSink, EventSink, Ticker};
pub use types::{ApiError, EngineEvent, FailureKind};
