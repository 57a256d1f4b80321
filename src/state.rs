//! Analysis lifecycle state machine.
//!
//! A pure reducer over a single state value: `idle -> analyzing ->
//! {success, error}` and back to `idle` on explicit reset. The state is
//! replaced wholesale on every transition; callers fold events and render
//! whatever the resulting value says. Nothing here touches the network or a
//! rendering layer.

use crate::models::LetterData;
use crate::types::AnalysisError;

const MSG_GENERIC: &str = "Terjadi kesalahan saat menganalisis surat. Silakan coba lagi.";
const MSG_AUTH: &str = "API Key tidak ditemukan atau tidak valid.";
const MSG_FORMAT: &str = "Format file tidak dapat diproses.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Idle,
    Analyzing,
    Success,
    Error,
}

/// The single controller-owned slot. Invariant: `data` is present iff status
/// is `Success`; `error` is present iff status is `Error`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisState {
    pub status: AnalysisStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<LetterData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisState {
    pub fn idle() -> Self {
        Self {
            status: AnalysisStatus::Idle,
            data: None,
            error: None,
        }
    }
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self::idle()
    }
}

#[derive(Debug)]
pub enum AnalysisEvent {
    /// A file passed validation and analysis has started.
    FileAccepted,
    /// The analyzer returned a structured extraction.
    Succeeded(LetterData),
    /// The analyzer failed; the error is classified structurally below.
    Failed(AnalysisError),
    /// Explicit user reset.
    Reset,
}

/// Map an adapter failure to one of the three user-facing messages.
///
/// Classification switches on the error kind, not on message text, so an
/// unrelated error whose text happens to mention a key never lands in the
/// credential bucket.
pub fn user_message(error: &AnalysisError) -> &'static str {
    match error {
        AnalysisError::Auth(_) => MSG_AUTH,
        AnalysisError::Encoding(_) => MSG_FORMAT,
        AnalysisError::Service(_) | AnalysisError::EmptyResponse | AnalysisError::Schema(_) => {
            MSG_GENERIC
        }
    }
}

/// Advance the state machine by one event, producing a fresh state.
///
/// Outcome events (`Succeeded`/`Failed`) are honored only while `Analyzing`;
/// a late outcome arriving after a reset is discarded rather than resurrected.
pub fn reduce(state: AnalysisState, event: AnalysisEvent) -> AnalysisState {
    match (state.status, event) {
        (AnalysisStatus::Idle, AnalysisEvent::FileAccepted) => AnalysisState {
            status: AnalysisStatus::Analyzing,
            data: None,
            error: None,
        },
        (AnalysisStatus::Analyzing, AnalysisEvent::Succeeded(data)) => AnalysisState {
            status: AnalysisStatus::Success,
            data: Some(data),
            error: None,
        },
        (AnalysisStatus::Analyzing, AnalysisEvent::Failed(error)) => AnalysisState {
            status: AnalysisStatus::Error,
            data: None,
            error: Some(user_message(&error).to_string()),
        },
        (_, AnalysisEvent::Reset) => AnalysisState::idle(),
        // Anything else (stale outcome, duplicate accept) leaves the state as is.
        (_, _) => state,
    }
}
