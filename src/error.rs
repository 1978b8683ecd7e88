use crate::diary_entry::EntryId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("identity provider rejected the request: {0}")]
    Provider(String),

    #[error("network failure: {0}")]
    Network(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    #[error("share cancelled")]
    Cancelled,

    #[error("share failed: {0}")]
    Platform(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("analysis service failed: {0}")]
    Service(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("entry not found: {0}")]
pub struct EntryNotFound(pub EntryId);

/// Reasons an action is refused before anything is dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("another {0} is already in progress")]
    Busy(&'static str),

    #[error("not signed in")]
    NotAuthenticated,

    #[error("no entry is being composed")]
    NotComposing,

    #[error("entry is empty")]
    EmptyEntry,

    #[error(transparent)]
    NotFound(#[from] EntryNotFound),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
