use std::io::ErrorKind;
use std::path::Path;

use super::RetrievalError;

/// Reads a UTF-8 text document. A missing file is [`RetrievalError::SourceNotFound`].
pub async fn load_document(path: impl AsRef<Path>) -> Result<String, RetrievalError> {
    let path = path.as_ref();
    match tokio::fs::read_to_string(path).await {
        Ok(text) => {
            tracing::debug!(path = %path.display(), chars = text.chars().count(), "document loaded");
            Ok(text)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(RetrievalError::SourceNotFound(path.display().to_string()))
        }
        Err(e) => Err(RetrievalError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_document_reads_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "こんにちは").unwrap();
        assert_eq!(load_document(&path).await.unwrap(), "こんにちは");
    }

    #[tokio::test]
    async fn load_document_missing_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(dir.path().join("missing.txt")).await.unwrap_err();
        assert!(matches!(err, RetrievalError::SourceNotFound(ref p) if p.ends_with("missing.txt")));
    }
}
