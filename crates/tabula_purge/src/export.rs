//! Conversation IDs recorded in a personal data export.

use std::collections::BTreeMap;
use std::path::Path;
use tabula_error::{ExportError, ExportErrorKind, TabulaResult};
use tracing::{debug, instrument};

/// Location of the index inside an unpacked export.
const INDEX_PATH: &str = "messages/index.json";

/// Read the conversation IDs listed in an export's message index.
///
/// `path` is either the index file itself or the export root containing
/// `messages/index.json`. The index is a JSON object keyed by conversation ID.
/// IDs are returned sorted.
///
/// # Errors
///
/// Returns an error if the path is inaccessible, the index cannot be found or
/// read, or it is not a JSON object.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub async fn load_conversation_ids(path: impl AsRef<Path>) -> TabulaResult<Vec<String>> {
    let path = path.as_ref();
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        ExportError::new(ExportErrorKind::Inaccessible(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;

    let index_path = if metadata.is_dir() {
        let candidate = path.join(INDEX_PATH);
        if !tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return Err(
                ExportError::new(ExportErrorKind::IndexMissing(path.display().to_string())).into(),
            );
        }
        candidate
    } else {
        path.to_path_buf()
    };

    let raw = tokio::fs::read_to_string(&index_path)
        .await
        .map_err(|e| ExportError::new(ExportErrorKind::FileRead(e.to_string())))?;

    let index: BTreeMap<String, serde_json::Value> = serde_json::from_str(&raw)
        .map_err(|e| ExportError::new(ExportErrorKind::Parse(e.to_string())))?;

    debug!(conversations = index.len(), "Loaded export index");
    Ok(index.into_keys().collect())
}
