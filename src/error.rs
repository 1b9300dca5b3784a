use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocuclipError {
    #[error("transcript contains no usable entries")]
    EmptyTranscript,

    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("project store error: {0}")]
    Store(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("store directory unavailable: {0}")]
    StoreDirUnavailable(PathBuf),

    #[error("enrichment error: {0}")]
    Enrichment(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DocuclipError>;
