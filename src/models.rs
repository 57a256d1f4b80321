use std::sync::Arc;

use crate::config::Config;
use crate::llm::DocumentAnalyzer;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub analyzer: Arc<dyn DocumentAnalyzer>,
}

// Core models based on the extraction schema the analysis service is
// constrained to return. Field names are camelCase on the wire.

/// The structured extraction of one letter. All seven fields are required
/// strings; a field absent from the source document carries the sentinel "-",
/// never null.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LetterData {
    /// Identifying number of the letter ("Nomor Surat").
    pub nomor_surat: String,
    /// Subject line ("Hal / Perihal").
    pub hal: String,
    /// Sending organization or person ("Pengirim").
    pub pengirim: String,
    /// Date the letter was written, DD MMMM YYYY ("Tanggal Surat").
    pub tanggal: String,
    /// Addressee ("Kepada / Tujuan").
    pub kepada: String,
    /// One-to-two sentence summary of the letter's main purpose ("Inti Surat").
    pub inti_surat: String,
    /// Event time for invitations, deadline for task/data requests, else "-"
    /// ("Waktu Acara / Tenggat").
    pub waktu_acara: String,
}

// API wire types

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub model: String,
}

/// Body returned alongside non-2xx statuses from `/api/analyze`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable failure category, e.g. "unsupported_type" or "auth".
    pub kind: String,
    /// Localized message suitable for direct display.
    pub message: String,
}
