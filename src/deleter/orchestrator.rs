use std::fmt;
use tracing::{debug, info};

use crate::config::DeletionRequest;
use crate::github::{FailureKind, ReleaseId, RemoteError, RepositoryClient};

/// What happened to one deletion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Deleted,
    AlreadyAbsent,
    Skipped,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Deleted => write!(f, "deleted"),
            StepOutcome::AlreadyAbsent => write!(f, "already absent"),
            StepOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub release: StepOutcome,
    pub tag: StepOutcome,
}

pub struct TagDeleter<C> {
    client: C,
}

impl<C: RepositoryClient> TagDeleter<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Deletes the release first, then the tag, stopping at the first failure
    /// that does not mean the target is already gone.
    pub async fn run(&self, request: &DeletionRequest) -> Result<DeletionOutcome, RemoteError> {
        let release = if request.delete_release() {
            self.delete_release(request).await?
        } else {
            StepOutcome::Skipped
        };

        let tag = if request.delete_tag() {
            self.delete_tag(request).await?
        } else {
            StepOutcome::Skipped
        };

        Ok(DeletionOutcome { release, tag })
    }

    async fn delete_release(&self, request: &DeletionRequest) -> Result<StepOutcome, RemoteError> {
        let (owner, repo, tag) = (request.owner(), request.repo(), request.tag_name());
        info!("Deleting release with tag: {}", tag);

        let release_id = match self.client.get_release_by_tag(owner, repo, tag).await {
            Ok(id) => id,
            Err(err) if err.kind() == FailureKind::NotFound => {
                info!("No release found for tag {}", tag);
                return Ok(StepOutcome::AlreadyAbsent);
            }
            Err(err) => return Err(err),
        };

        self.delete_release_by_id(owner, repo, release_id).await
    }

    async fn delete_release_by_id(
        &self,
        owner: &str,
        repo: &str,
        release_id: ReleaseId,
    ) -> Result<StepOutcome, RemoteError> {
        debug!(%release_id, "deleting release");

        match self.client.delete_release(owner, repo, release_id).await {
            Ok(()) => Ok(StepOutcome::Deleted),
            // gone between lookup and delete
            Err(err) if err.kind() == FailureKind::NotFound => {
                info!("Release {} was already deleted", release_id);
                Ok(StepOutcome::AlreadyAbsent)
            }
            Err(err) => Err(err),
        }
    }

    async fn delete_tag(&self, request: &DeletionRequest) -> Result<StepOutcome, RemoteError> {
        info!("Deleting tag: {}", request.tag_name());

        let reference = request.tag_ref();
        match self
            .client
            .delete_tag_ref(request.owner(), request.repo(), &reference)
            .await
        {
            Ok(()) => Ok(StepOutcome::Deleted),
            Err(err) => match err.kind() {
                FailureKind::NotFound | FailureKind::ReferenceMissing => {
                    info!("Tag {} does not exist", request.tag_name());
                    Ok(StepOutcome::AlreadyAbsent)
                }
                FailureKind::Other => Err(err),
            },
        }
    }
}
