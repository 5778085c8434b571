use anyhow::Result;
use octocrab::models::repos::Release;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::debug;

use super::types::{ReleaseId, RemoteError};

/// Everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Like [`PATH_SEGMENT`], but `/` separates ref components.
const REF_PATH: &AsciiSet = &PATH_SEGMENT.remove(b'/');

/// The three repository operations a deletion needs.
pub trait RepositoryClient {
    async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<ReleaseId, RemoteError>;

    async fn delete_release(
        &self,
        owner: &str,
        repo: &str,
        release_id: ReleaseId,
    ) -> Result<(), RemoteError>;

    /// `reference` is relative to `refs/`, e.g. `tags/v1.0.0`.
    async fn delete_tag_ref(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<(), RemoteError>;
}

pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    pub async fn new(token: String, api_url: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder()
            .personal_token(token)
            .add_retry_config(RetryConfig::None);

        if let Some(api_url) = api_url.filter(|url| !url.is_empty()) {
            builder = builder.base_uri(api_url)?;
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl RepositoryClient for GitHubClient {
    async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<ReleaseId, RemoteError> {
        let route = format!(
            "{}/releases/tags/{}",
            repo_route(owner, repo),
            utf8_percent_encode(tag, PATH_SEGMENT)
        );
        let release: Release = self.client.get(route, None::<&()>).await?;

        debug!(release_id = release.id.0, tag, "found release");
        Ok(ReleaseId(release.id.0))
    }

    async fn delete_release(
        &self,
        owner: &str,
        repo: &str,
        release_id: ReleaseId,
    ) -> Result<(), RemoteError> {
        self.client
            .repos(owner, repo)
            .releases()
            .delete(release_id.0)
            .await?;
        Ok(())
    }

    async fn delete_tag_ref(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<(), RemoteError> {
        let route = format!(
            "{}/git/refs/{}",
            repo_route(owner, repo),
            utf8_percent_encode(reference, REF_PATH)
        );
        let response = self.client._delete(route, None::<&()>).await?;
        octocrab::map_github_error(response).await?;
        Ok(())
    }
}

fn repo_route(owner: &str, repo: &str) -> String {
    format!(
        "/repos/{}/{}",
        utf8_percent_encode(owner, PATH_SEGMENT),
        utf8_percent_encode(repo, PATH_SEGMENT)
    )
}

impl From<octocrab::Error> for RemoteError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                RemoteError::new(Some(source.status_code.as_u16()), source.message)
            }
            other => RemoteError::new(None, other.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::github::types::FailureKind;
    use mockito::{Server, ServerGuard};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    pub(crate) fn release_body(id: u64, tag: &str) -> String {
        let base = "https://api.github.com/repos/octo/hello";
        json!({
            "url": format!("{}/releases/{}", base, id),
            "html_url": format!("https://github.com/octo/hello/releases/tag/{}", tag),
            "assets_url": format!("{}/releases/{}/assets", base, id),
            "upload_url": format!("https://uploads.github.com/repos/octo/hello/releases/{}/assets{{?name,label}}", id),
            "tarball_url": format!("{}/tarball/{}", base, tag),
            "zipball_url": format!("{}/zipball/{}", base, tag),
            "id": id,
            "node_id": "MDc6UmVsZWFzZTE=",
            "tag_name": tag,
            "target_commitish": "main",
            "name": tag,
            "body": "Release notes",
            "draft": false,
            "prerelease": false,
            "created_at": "2024-01-01T00:00:00Z",
            "published_at": "2024-01-01T00:00:00Z",
            "author": null,
            "assets": []
        })
        .to_string()
    }

    pub(crate) fn error_body(message: &str) -> String {
        json!({
            "message": message,
            "documentation_url": "https://docs.github.com/rest"
        })
        .to_string()
    }

    async fn client_for(server: &ServerGuard) -> GitHubClient {
        GitHubClient::new("test-token".to_string(), Some(server.url()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn reads_release_id_by_tag() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/octo/hello/releases/tags/v1.0.0")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(release_body(42, "v1.0.0"))
            .create_async()
            .await;

        let client = client_for(&server).await;
        let id = client
            .get_release_by_tag("octo", "hello", "v1.0.0")
            .await
            .unwrap();

        assert_eq!(id, ReleaseId(42));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_release_maps_to_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/octo/hello/releases/tags/v1.0.0")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(error_body("Not Found"))
            .create_async()
            .await;

        let client = client_for(&server).await;
        let err = client
            .get_release_by_tag("octo", "hello", "v1.0.0")
            .await
            .unwrap_err();

        assert_eq!(err, RemoteError::new(Some(404), "Not Found"));
        assert_eq!(err.kind(), FailureKind::NotFound);
    }

    #[tokio::test]
    async fn deletes_release_by_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/repos/octo/hello/releases/42")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server).await;
        client
            .delete_release("octo", "hello", ReleaseId(42))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn deletes_tag_ref() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/repos/octo/hello/git/refs/tags/v1.0.0")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server).await;
        client
            .delete_tag_ref("octo", "hello", "tags/v1.0.0")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_ref_maps_to_reference_missing() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/repos/octo/hello/git/refs/tags/v1.0.0")
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(error_body("Reference does not exist"))
            .create_async()
            .await;

        let client = client_for(&server).await;
        let err = client
            .delete_tag_ref("octo", "hello", "tags/v1.0.0")
            .await
            .unwrap_err();

        assert_eq!(err.status, Some(422));
        assert_eq!(err.kind(), FailureKind::ReferenceMissing);
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/octo/hello/releases/tags/v1.0.0")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(error_body("Server Error"))
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let err = client
            .get_release_by_tag("octo", "hello", "v1.0.0")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Other);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn escapes_reserved_characters_in_tag() {
        let mut server = Server::new_async().await;
        let lookup = server
            .mock("GET", "/repos/octo/hello/releases/tags/v1%23beta%2Frc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(release_body(42, "v1#beta/rc"))
            .create_async()
            .await;
        let tag_ref = server
            .mock("DELETE", "/repos/octo/hello/git/refs/tags/release/v1%23beta")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let id = client
            .get_release_by_tag("octo", "hello", "v1#beta/rc")
            .await
            .unwrap();
        client
            .delete_tag_ref("octo", "hello", "tags/release/v1#beta")
            .await
            .unwrap();

        assert_eq!(id, ReleaseId(42));
        lookup.assert_async().await;
        tag_ref.assert_async().await;
    }
}
