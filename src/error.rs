// 🚨 Error kinds
// One variant per way an extract or transform stage can fail

use std::path::PathBuf;

/// Every failure in the pipeline is fatal; this enum only names the kind.
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    /// Server answered with a non-success status after the retry budget ran out.
    #[error("request to {url} failed with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    /// Request never produced a response (timeout, refused connection, TLS...).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("response from {url} is not valid JSON: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reference URL whose last path segment is not a numeric id.
    #[error("reference URL has no numeric id segment: {url}")]
    MalformedReference { url: String },

    /// Transform stage ran before its extract stage wrote the raw file.
    #[error("raw file not found: {} (run the extract stage first)", path.display())]
    MissingRawFile { path: PathBuf },

    #[error("{entity} record is missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// Present value that cannot be read as the expected JSON type.
    #[error("field `{field}` has unusable value {value}")]
    InvalidField { field: String, value: String },

    /// A list page's `next` link points at a page already visited.
    #[error("pagination loop: {url} was already fetched")]
    PaginationLoop { url: String },

    #[error("line {line} of {} is not valid JSON: {source}", path.display())]
    MalformedRawLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EtlError {
    /// True for the failures that come from talking to the API.
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            EtlError::HttpStatus { .. } | EtlError::Transport { .. } | EtlError::InvalidJson { .. }
        )
    }
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display() {
        let err = EtlError::HttpStatus {
            url: "https://x/type".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "request to https://x/type failed with HTTP status 503"
        );
        assert!(err.is_network_failure());
    }

    #[test]
    fn test_missing_raw_file_display() {
        let err = EtlError::MissingRawFile {
            path: PathBuf::from("data/raw/types_raw.jsonl"),
        };
        assert!(err.to_string().contains("data/raw/types_raw.jsonl"));
        assert!(!err.is_network_failure());
    }

    #[test]
    fn test_io_error_wraps() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EtlError = inner.into();
        assert!(err.to_string().contains("i/o"));
    }
}
