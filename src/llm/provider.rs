use async_trait::async_trait;

use crate::models::LetterData;
use crate::types::AnalysisResult;
use crate::upload::ValidatedFile;

/// The document-understanding capability behind a narrow seam.
///
/// One call per analysis attempt; the adapter performs no retry and no
/// queuing, and the caller is responsible for not overlapping calls. Tests
/// substitute a stub so no route test touches the network.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze(&self, file: &ValidatedFile) -> AnalysisResult<LetterData>;
}
