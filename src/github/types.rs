use std::fmt;
use thiserror::Error;

/// Identifier of a release, as assigned by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseId(pub u64);

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A failed call to the repository API.
///
/// `status` is absent when the request never produced an API response
/// (transport or decoding failures).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    pub status: Option<u16>,
    pub message: String,
}

/// How a [`RemoteError`] relates to the target being absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    ReferenceMissing,
    Other,
}

impl RemoteError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        classify(self.status, &self.message)
    }
}

pub fn classify(status: Option<u16>, message: &str) -> FailureKind {
    match (status, message) {
        (Some(404), _) | (_, "Not Found") => FailureKind::NotFound,
        (Some(422), _) | (_, "Reference does not exist") => FailureKind::ReferenceMissing,
        _ => FailureKind::Other,
    }
}
