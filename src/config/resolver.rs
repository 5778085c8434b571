use super::types::{DeletionRequest, RepoSpec};
use crate::error::ConfigError;

/// Values accepted as "yes" for a flag input, compared case-insensitively.
const AFFIRMATIVE: [&str; 4] = ["true", "yes", "y", "1"];

/// Raw, unvalidated inputs as handed over by the pipeline.
#[derive(Debug, Default, Clone)]
pub struct Inputs {
    pub tag: Option<String>,
    pub repo: Option<String>,
    pub delete_tag: Option<String>,
    pub delete_release: Option<String>,
    /// Repository the pipeline is running in, as `owner/name`.
    pub current_repo: Option<String>,
}

pub fn is_yes(input: &str) -> bool {
    AFFIRMATIVE.iter().any(|yes| input.eq_ignore_ascii_case(yes))
}

/// Unset or blank means `true`; anything outside the affirmative set is `false`.
pub fn resolve_flag(input: Option<&str>) -> bool {
    match input.map(str::trim) {
        None | Some("") => true,
        Some(value) => is_yes(value),
    }
}

/// Picks the explicit token input first, then the fallback environment value.
pub fn resolve_token(
    input: Option<String>,
    fallback: Option<String>,
) -> Result<String, ConfigError> {
    let trimmed = |token: String| {
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    };

    input
        .and_then(trimmed)
        .or_else(|| fallback.and_then(trimmed))
        .ok_or(ConfigError::MissingToken)
}

pub fn resolve(inputs: &Inputs) -> Result<DeletionRequest, ConfigError> {
    let tag = non_blank(&inputs.tag).ok_or(ConfigError::MissingTag)?;

    let delete_tag = resolve_flag(inputs.delete_tag.as_deref());
    let delete_release = resolve_flag(inputs.delete_release.as_deref());
    if !(delete_tag || delete_release) {
        return Err(ConfigError::NoAction);
    }

    let target = resolve_target(inputs)?;

    DeletionRequest::new(target, tag, delete_tag, delete_release)
}

fn non_blank(input: &Option<String>) -> Option<&str> {
    input.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn resolve_target(inputs: &Inputs) -> Result<RepoSpec, ConfigError> {
    match non_blank(&inputs.repo) {
        Some(repo) => repo.parse(),
        None => non_blank(&inputs.current_repo)
            .ok_or(ConfigError::UnknownRepository)?
            .parse(),
    }
}
