//! Configuration errors raised before any remote call is made.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no `github-token` input nor GITHUB_TOKEN environment variable found, pass `GITHUB_TOKEN` as env")]
    MissingToken,

    #[error("missing tag input: no `tag` given")]
    MissingTag,

    /// The `owner/name` string did not split into two non-empty segments.
    #[error("invalid repo specification: `{0}`")]
    InvalidRepo(String),

    #[error("unable to determine target repository: pass `repo` or set GITHUB_REPOSITORY")]
    UnknownRepository,

    #[error("no action to execute: both `delete-tag` and `delete-release` are disabled")]
    NoAction,
}
