use serde::{Deserialize, Serialize};

/// Fixed display value for anything absent: an unresolved field, or no current service.
pub const PLACEHOLDER: &str = "—";

/// Remote lookup providers in the order the backend escalates through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageName {
    Internet,
    GoogleSearch,
    OpenAi,
}

impl StageName {
    pub const ALL: [StageName; 3] = [StageName::Internet, StageName::GoogleSearch, StageName::OpenAi];

    pub const fn index(self) -> usize {
        match self {
            StageName::Internet => 0,
            StageName::GoogleSearch => 1,
            StageName::OpenAi => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            StageName::Internet => "Internet search",
            StageName::GoogleSearch => "Google search",
            StageName::OpenAi => "OpenAI analysis",
        }
    }

    /// Name used by the backend in requests and stage histories.
    pub const fn wire_name(self) -> &'static str {
        match self {
            StageName::Internet => "Internet",
            StageName::GoogleSearch => "googlesearch",
            StageName::OpenAi => "openai",
        }
    }

    /// Display names some backend versions write into stage histories instead of the wire name.
    const fn history_aliases(self) -> &'static [&'static str] {
        match self {
            StageName::Internet => &[],
            StageName::GoogleSearch => &["Document Search"],
            StageName::OpenAi => &["AI Analysis"],
        }
    }

    /// Accepts the wire name or a history alias, ignoring case and surrounding whitespace.
    pub fn from_wire(name: &str) -> Option<StageName> {
        let name = name.trim();
        StageName::ALL.into_iter().find(|stage| {
            stage.wire_name().eq_ignore_ascii_case(name)
                || stage
                    .history_aliases()
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(name))
        })
    }
}

/// Authoritative per-stage result reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageOutcome {
    Success,
    LowConfidence,
    NoResults,
    Skipped,
}

impl StageOutcome {
    pub const fn display_state(self) -> DisplayState {
        match self {
            StageOutcome::Success => DisplayState::Done,
            StageOutcome::LowConfidence => DisplayState::Warning,
            StageOutcome::NoResults => DisplayState::Error,
            StageOutcome::Skipped => DisplayState::Skipped,
        }
    }
}

/// Client-side rendering state of a stage. `Active` and `Pending` never come from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    Idle,
    Pending,
    Active,
    Done,
    Warning,
    Error,
    Skipped,
}

impl DisplayState {
    pub const fn label(self) -> &'static str {
        match self {
            DisplayState::Idle => "idle",
            DisplayState::Pending => "pending",
            DisplayState::Active => "active",
            DisplayState::Done => "done",
            DisplayState::Warning => "warning",
            DisplayState::Error => "error",
            DisplayState::Skipped => "skipped",
        }
    }

    /// A stage in this state has finished running, one way or another.
    pub const fn is_settled(self) -> bool {
        matches!(
            self,
            DisplayState::Done | DisplayState::Warning | DisplayState::Error | DisplayState::Skipped
        )
    }
}

/// One entry of a stage history as sent by the backend.
///
/// `name` stays a string so that histories mentioning stages this client does
/// not know about still decode; such entries are ignored during reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    pub name: String,
    pub status: StageOutcome,
    #[serde(default)]
    pub message: Option<String>,
}

impl StageReport {
    pub fn new(stage: StageName, status: StageOutcome) -> Self {
        Self {
            name: stage.wire_name().to_string(),
            status,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn stage(&self) -> Option<StageName> {
        StageName::from_wire(&self.name)
    }
}
