use std::fmt;

use finder_core::{PartRecord, SearchGeneration, SearchResultItem};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Simulator timer fired.
    Tick { generation: SearchGeneration },
    SearchCompleted {
        generation: SearchGeneration,
        result: Result<Vec<SearchResultItem>, ApiError>,
    },
    RecordsFetched(Result<Vec<PartRecord>, ApiError>),
    RecordCreated(Result<PartRecord, ApiError>),
    RecordsDeleted {
        requested: usize,
        result: Result<(), ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Unauthorized,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Unauthorized => write!(f, "unauthorized"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
        }
    }
}
