pub mod client;
pub mod types;

pub use client::{GitHubClient, RepositoryClient};
pub use types::{FailureKind, ReleaseId, RemoteError};
