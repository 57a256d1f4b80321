use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm::DocumentAnalyzer;
use crate::models::{AppState, ErrorResponse};
use crate::state::{reduce, user_message, AnalysisEvent, AnalysisState, AnalysisStatus};
use crate::types::{AnalysisError, ValidationError};
use crate::upload::{ValidatedFile, MAX_UPLOAD_BYTES};

// Headroom above the validation ceiling so oversized uploads reach the
// validator and fail with the localized TooLarge message instead of a bare
// 413 from the body limit.
const BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 2 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze_letter))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}

/// Accept one uploaded file, validate it, and run a single analysis attempt.
///
/// The terminal `AnalysisState` is returned wholesale as the response body.
/// Validation rejections never enter the state machine; they come back as an
/// inline `ErrorResponse`.
async fn analyze_letter(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let analysis_id = Uuid::new_v4();

    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => break field,
            Ok(Some(_)) => continue,
            Ok(None) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "missing_file",
                    "Tidak ada file yang diunggah.",
                );
            }
            Err(e) => {
                warn!(analysis_id = %analysis_id, error = %e, "Multipart read failed");
                let err = AnalysisError::Encoding(e.to_string());
                return error_response(StatusCode::BAD_REQUEST, "encoding", user_message(&err));
            }
        }
    };

    let name = field.file_name().unwrap_or("upload").to_string();
    let declared_type = field.content_type().unwrap_or_default().to_string();
    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(analysis_id = %analysis_id, error = %e, "Upload body read failed");
            let err = AnalysisError::Encoding(e.to_string());
            return error_response(StatusCode::BAD_REQUEST, "encoding", user_message(&err));
        }
    };

    let file = match ValidatedFile::select(&name, &declared_type, bytes) {
        Ok(file) => file,
        Err(e) => {
            info!(analysis_id = %analysis_id, file = %name, error = ?e, "Upload rejected");
            let kind = match e {
                ValidationError::UnsupportedType => "unsupported_type",
                ValidationError::TooLarge => "too_large",
            };
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, kind, &e.to_string());
        }
    };

    info!(
        analysis_id = %analysis_id,
        file = %file.name,
        content_type = %file.content_type,
        size = file.size(),
        "Analysis started"
    );

    let session = reduce(AnalysisState::idle(), AnalysisEvent::FileAccepted);

    let outcome = match state.analyzer.analyze(&file).await {
        Ok(letter) => AnalysisEvent::Succeeded(letter),
        Err(e) => {
            warn!(analysis_id = %analysis_id, error = %e, "Analysis failed");
            AnalysisEvent::Failed(e)
        }
    };

    let terminal = reduce(session, outcome);
    let status = match terminal.status {
        AnalysisStatus::Success => {
            info!(analysis_id = %analysis_id, "Analysis succeeded");
            StatusCode::OK
        }
        _ => StatusCode::BAD_GATEWAY,
    };

    (status, Json(terminal)).into_response()
}

fn error_response(status: StatusCode, kind: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            kind: kind.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}
