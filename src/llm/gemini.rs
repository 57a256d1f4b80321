// Gemini adapter implementation
// Calls the generateContent endpoint with an inline file payload and a
// response schema constraining the output to the seven letter fields.
// API Reference: https://ai.google.dev/api/generate-content

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::provider::DocumentAnalyzer;
use crate::models::LetterData;
use crate::types::{AnalysisError, AnalysisResult};
use crate::upload::ValidatedFile;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default model. Optimized for speed and extraction.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Fixed extraction instruction. Output language is fixed to Bahasa
/// Indonesia; the sentinel "-" marks fields absent from the document.
const EXTRACTION_PROMPT: &str = "\
Analisis dokumen surat yang dilampirkan ini.
Ekstrak informasi berikut secara akurat:
1. Nomor Surat (Jika tidak ada, tulis \"-\")
2. Hal / Perihal Surat (Judul perihal surat, jika tidak ada tulis \"-\")
3. Pengirim Surat (Instansi atau Nama Orang)
4. Tanggal Surat (Kapan surat ini ditulis. Format: DD MMMM YYYY)
5. Kepada/Tujuan Surat (Siapa penerimanya)
6. Inti dari surat tersebut (Ringkasan singkat 1-2 kalimat mengenai tujuan utama surat)
7. Waktu Pelaksanaan / Tenggat (PENTING: Jika surat berupa undangan rapat/acara, ambil Hari, Tanggal, dan Jam pelaksanaannya. Jika surat permintaan data/tugas, ambil batas waktu/deadline-nya. Jika tidak ada informasi waktu pelaksanaan/tenggat, tulis \"-\").

Pastikan output dalam format JSON yang valid sesuai skema. Gunakan Bahasa Indonesia.";

pub struct GeminiAdapter {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

// Request types for the generateContent API

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

// Externally tagged: {"inlineData": {..}} or {"text": ".."}
#[derive(Serialize)]
enum Part {
    #[serde(rename = "inlineData")]
    InlineData(InlineData),
    #[serde(rename = "text")]
    Text(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

// Response types

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

// Error envelope returned by the API on non-2xx statuses

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

impl GeminiAdapter {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_base_url(api_key, model, GEMINI_API_BASE)
    }

    /// Point the adapter at a different endpoint. Used by tests to target a
    /// local mock server.
    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The schema the service is constrained to return: an object with
    /// exactly the seven required string fields.
    fn response_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "nomorSurat": { "type": "STRING", "description": "Nomor identifikasi surat" },
                "hal":        { "type": "STRING", "description": "Perihal atau hal surat" },
                "pengirim":   { "type": "STRING", "description": "Nama pengirim atau instansi" },
                "tanggal":    { "type": "STRING", "description": "Tanggal pembuatan surat" },
                "kepada":     { "type": "STRING", "description": "Penerima surat" },
                "intiSurat":  { "type": "STRING", "description": "Ringkasan isi surat" },
                "waktuAcara": { "type": "STRING", "description": "Waktu pelaksanaan acara atau tenggat waktu/deadline jika ada" },
            },
            "required": ["nomorSurat", "hal", "pengirim", "tanggal", "kepada", "intiSurat", "waktuAcara"],
        })
    }

    fn build_request(file: &ValidatedFile) -> GenerateContentRequest {
        let data = base64::engine::general_purpose::STANDARD.encode(&file.bytes);

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData(InlineData {
                        mime_type: file.content_type.clone(),
                        data,
                    }),
                    Part::Text(EXTRACTION_PROMPT.to_string()),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Self::response_schema(),
            },
        }
    }

    /// Classify a non-2xx response using the API error envelope, never the
    /// free-text message.
    fn classify_api_error(status_code: u16, body: &str) -> AnalysisError {
        if status_code == 401 || status_code == 403 {
            return AnalysisError::Auth(format!("HTTP {status_code}"));
        }

        if let Ok(envelope) = serde_json::from_str::<ApiErrorResponse>(body) {
            match envelope.error.status.as_deref() {
                Some("UNAUTHENTICATED") | Some("PERMISSION_DENIED") => {
                    return AnalysisError::Auth(envelope.error.message);
                }
                Some("INVALID_ARGUMENT") => {
                    // An invalid key surfaces as INVALID_ARGUMENT with an
                    // API_KEY_INVALID reason in the details list.
                    let key_invalid = envelope.error.details.iter().any(|d| {
                        d.get("reason").and_then(|r| r.as_str()) == Some("API_KEY_INVALID")
                    });
                    if key_invalid {
                        return AnalysisError::Auth(envelope.error.message);
                    }
                    return AnalysisError::Encoding(envelope.error.message);
                }
                _ => return AnalysisError::Service(envelope.error.message),
            }
        }

        AnalysisError::Service(format!("HTTP {status_code}: {body}"))
    }

    fn extract_text(response: GenerateContentResponse) -> AnalysisResult<String> {
        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl DocumentAnalyzer for GeminiAdapter {
    async fn analyze(&self, file: &ValidatedFile) -> AnalysisResult<LetterData> {
        if self.api_key.is_empty() {
            return Err(AnalysisError::Auth("GOOGLE_API_KEY is not set".to_string()));
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let request = Self::build_request(file);

        debug!(model = %self.model, file = %file.name, size = file.size(), "Submitting letter for analysis");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Service(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_api_error(status.as_u16(), &body));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Service(format!("Failed to parse Gemini response: {e}")))?;

        let text = Self::extract_text(body)?;

        serde_json::from_str::<LetterData>(&text)
            .map_err(|e| AnalysisError::Schema(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn jpeg_file() -> ValidatedFile {
        ValidatedFile::select("surat.jpg", "image/jpeg", Bytes::from_static(b"\xff\xd8\xff"))
            .unwrap()
    }

    fn letter_json() -> &'static str {
        r#"{"nomorSurat":"421/123/2024","hal":"Undangan","pengirim":"Dinas","tanggal":"1 April 2024","kepada":"Kepala Sekolah","intiSurat":"Undangan rapat.","waktuAcara":"Senin, 8 April 2024, 10.00 WIB"}"#
    }

    fn success_body() -> String {
        serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": letter_json() }] },
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }

    #[test]
    fn request_carries_inline_data_then_prompt() {
        let request = GeminiAdapter::build_request(&jpeg_file());
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(
            parts[0]["inlineData"]["data"],
            base64::engine::general_purpose::STANDARD.encode(b"\xff\xd8\xff")
        );
        assert!(parts[1]["text"].as_str().unwrap().contains("Nomor Surat"));

        let config = &json["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["required"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn empty_key_fails_before_any_request() {
        let adapter = GeminiAdapter::with_base_url("", DEFAULT_MODEL, "http://127.0.0.1:1");
        let err = tokio_test::block_on(adapter.analyze(&jpeg_file())).unwrap_err();
        assert!(matches!(err, AnalysisError::Auth(_)));
    }

    #[tokio::test]
    async fn successful_analysis_parses_letter_data() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(mockito::Matcher::UrlEncoded("key".into(), "k".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(success_body())
            .create_async()
            .await;

        let adapter = GeminiAdapter::with_base_url("k", DEFAULT_MODEL, &server.url());
        let letter = adapter.analyze(&jpeg_file()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(letter.nomor_surat, "421/123/2024");
        assert_eq!(letter.waktu_acara, "Senin, 8 April 2024, 10.00 WIB");
    }

    #[tokio::test]
    async fn unauthenticated_status_maps_to_auth() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Regex(":generateContent".to_string()))
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error":{"code":401,"message":"denied","status":"UNAUTHENTICATED"}}"#)
            .create_async()
            .await;

        let adapter = GeminiAdapter::with_base_url("bad", DEFAULT_MODEL, &server.url());
        let err = adapter.analyze(&jpeg_file()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Auth(_)));
    }

    #[tokio::test]
    async fn empty_candidates_map_to_empty_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Regex(":generateContent".to_string()))
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let adapter = GeminiAdapter::with_base_url("k", DEFAULT_MODEL, &server.url());
        let err = adapter.analyze(&jpeg_file()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyResponse));
    }

    #[tokio::test]
    async fn text_missing_required_fields_maps_to_schema() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Regex(":generateContent".to_string()))
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": r#"{"nomorSurat":"-"}"# }] }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let adapter = GeminiAdapter::with_base_url("k", DEFAULT_MODEL, &server.url());
        let err = adapter.analyze(&jpeg_file()).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(_)));
    }

    #[test]
    fn invalid_key_reason_classifies_as_auth() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT","details":[{"@type":"type.googleapis.com/google.rpc.ErrorInfo","reason":"API_KEY_INVALID"}]}}"#;
        let err = GeminiAdapter::classify_api_error(400, body);
        assert!(matches!(err, AnalysisError::Auth(_)));
    }

    #[test]
    fn invalid_argument_without_key_reason_classifies_as_encoding() {
        let body = r#"{"error":{"code":400,"message":"Unsupported MIME type","status":"INVALID_ARGUMENT"}}"#;
        let err = GeminiAdapter::classify_api_error(400, body);
        assert!(matches!(err, AnalysisError::Encoding(_)));
    }

    #[test]
    fn opaque_failures_classify_as_service() {
        let err = GeminiAdapter::classify_api_error(503, "upstream unavailable");
        assert!(matches!(err, AnalysisError::Service(_)));

        let body = r#"{"error":{"code":429,"message":"quota exceeded for API Key","status":"RESOURCE_EXHAUSTED"}}"#;
        // Mentions "API Key" in free text but must stay a service error.
        let err = GeminiAdapter::classify_api_error(429, body);
        assert!(matches!(err, AnalysisError::Service(_)));
    }
}
