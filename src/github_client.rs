use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};

/// The repository the site content lives in.
#[derive(Clone, Debug)]
pub struct GithubRepository {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

/// Creates or updates single files in the content repository through the
/// GitHub contents API.
#[derive(Clone, Debug)]
pub struct GithubClient {
    base_url: Url,
    http_client: Client,
    token: Secret<String>,
    repository: GithubRepository,
}

#[derive(Debug)]
pub struct CommitFile<'a> {
    pub path: &'a str,
    pub message: &'a str,
    pub content: &'a [u8],
}

#[derive(serde::Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
}

#[derive(thiserror::Error, Debug)]
pub enum CommitError {
    #[error("Failed to reach the content API")]
    Transport(#[from] reqwest::Error),
    #[error("GitHub commit failed: {body}")]
    Rejected { status: StatusCode, body: String },
}

impl GithubClient {
    /// `base_url` must be a hierarchical URL; `Settings::github` guarantees
    /// this for configuration-sourced values.
    pub fn new(
        base_url: Url,
        token: Secret<String>,
        repository: GithubRepository,
        timeout: std::time::Duration,
    ) -> Self {
        let http_client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .build()
            .unwrap();
        Self {
            base_url,
            http_client,
            token,
            repository,
        }
    }

    /// Commits one file to the configured branch.
    ///
    /// The API distinguishes create from update through its own revision
    /// tracking; from our side both are the same PUT. A non-success response
    /// is returned with the remote body attached so the caller can surface
    /// it, and the caller must not issue any follow-up commit after a
    /// failure.
    #[tracing::instrument(
        name = "Committing file to content repository",
        skip(self, file),
        fields(path = %file.path)
    )]
    pub async fn put_file(&self, file: CommitFile<'_>) -> Result<(), CommitError> {
        let url = self.contents_url(file.path);
        let request_body = PutContentsRequest {
            message: file.message,
            content: BASE64.encode(file.content),
            branch: &self.repository.branch,
        };
        let response = self
            .http_client
            .put(url)
            .bearer_auth(self.token.expose_secret())
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&request_body)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            tracing::error!("Content API rejected the commit: {} {}", status, body);
            return Err(CommitError::Rejected { status, body });
        }
        Ok(())
    }

    fn contents_url(&self, file_path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .expect("API base URL is hierarchical by construction")
            .pop_if_empty()
            .extend([
                "repos",
                self.repository.owner.as_str(),
                self.repository.name.as_str(),
                "contents",
            ])
            .extend(file_path.split('/'));
        url
    }
}
