// Type definitions and error taxonomy

/// Rejections raised while selecting a candidate file. Resolved inline at the
/// upload boundary; a rejected file never reaches the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Format file tidak didukung. Gunakan JPG, PNG, atau PDF.")]
    UnsupportedType,

    #[error("Ukuran file terlalu besar. Maksimal 5MB.")]
    TooLarge,
}

/// Failures of one analysis attempt, produced at the adapter boundary.
///
/// The controller classifies these structurally (by variant, never by message
/// text) into the three user-facing categories.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("failed to encode file payload: {0}")]
    Encoding(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("analysis service error: {0}")]
    Service(String),

    #[error("analysis service returned an empty response")]
    EmptyResponse,

    #[error("analysis response did not match the extraction schema: {0}")]
    Schema(String),
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
