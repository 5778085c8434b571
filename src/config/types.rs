use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// An `owner/name` pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub owner: String,
    pub repo: String,
}

impl FromStr for RepoSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRepo(s.to_string());

        let mut parts = s.split('/');
        let (owner, repo) = match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) => (owner.trim(), repo.trim()),
            _ => return Err(invalid()),
        };

        if owner.is_empty() || repo.is_empty() {
            return Err(invalid());
        }

        Ok(RepoSpec {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl fmt::Display for RepoSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A validated request to delete one tag and/or its release.
///
/// Only built through [`DeletionRequest::new`], which rejects an empty tag and
/// a request with nothing to do, and forces `delete_release` whenever
/// `delete_tag` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionRequest {
    owner: String,
    repo: String,
    tag_name: String,
    delete_tag: bool,
    delete_release: bool,
}

impl DeletionRequest {
    pub fn new(
        target: RepoSpec,
        tag_name: impl Into<String>,
        delete_tag: bool,
        delete_release: bool,
    ) -> Result<Self, ConfigError> {
        let tag_name = tag_name.into();
        if tag_name.is_empty() {
            return Err(ConfigError::MissingTag);
        }

        // a release left behind without its tag points at nothing
        let delete_release = delete_release || delete_tag;
        if !delete_release {
            return Err(ConfigError::NoAction);
        }

        Ok(Self {
            owner: target.owner,
            repo: target.repo,
            tag_name,
            delete_tag,
            delete_release,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn delete_tag(&self) -> bool {
        self.delete_tag
    }

    pub fn delete_release(&self) -> bool {
        self.delete_release
    }

    /// The git reference of the tag, relative to `refs/`.
    pub fn tag_ref(&self) -> String {
        format!("tags/{}", self.tag_name)
    }
}
