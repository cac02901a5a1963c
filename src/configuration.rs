use crate::github_client::{GithubClient, GithubRepository};
use config::Config;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;

/// Runtime configuration, deserialized from the process environment.
///
/// The admin and GitHub values stay optional on purpose: their absence is a
/// per-request server error (HTTP 500), reported by the handler that needs
/// them, not a reason to refuse startup.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub admin_password: Option<Secret<String>>,
    pub admin_token: Option<Secret<String>>,
    pub github_token: Option<Secret<String>>,
    pub github_owner: Option<String>,
    pub github_repo: Option<String>,
    #[serde(default = "default_branch")]
    pub github_branch: String,
    #[serde(default = "default_api_base_url")]
    pub github_api_base_url: String,
    #[serde(
        default = "default_commit_timeout_milliseconds",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub github_timeout_milliseconds: u64,
    #[serde(default = "default_host")]
    pub app_host: String,
    #[serde(
        default = "default_port",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub app_port: u16,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_commit_timeout_milliseconds() -> u64 {
    10_000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

#[derive(thiserror::Error, Debug)]
pub enum GithubConfigError {
    #[error("Server env missing (GITHUB_TOKEN/GITHUB_OWNER/GITHUB_REPO)")]
    MissingVariables,
    #[error("GITHUB_API_BASE_URL is not a usable API base URL")]
    InvalidApiBaseUrl(#[source] url::ParseError),
}

impl Settings {
    pub fn admin_password(&self) -> Option<&Secret<String>> {
        non_empty(&self.admin_password)
    }

    pub fn admin_token(&self) -> Option<&Secret<String>> {
        non_empty(&self.admin_token)
    }

    /// Assembles the content-repository client, or reports which part of the
    /// GitHub configuration is absent.
    pub fn github(&self) -> Result<GithubClient, GithubConfigError> {
        let token = non_empty(&self.github_token)
            .cloned()
            .ok_or(GithubConfigError::MissingVariables)?;
        let owner = self
            .github_owner
            .clone()
            .filter(|owner| !owner.is_empty())
            .ok_or(GithubConfigError::MissingVariables)?;
        let name = self
            .github_repo
            .clone()
            .filter(|repo| !repo.is_empty())
            .ok_or(GithubConfigError::MissingVariables)?;
        let base_url = url::Url::parse(&self.github_api_base_url)
            .map_err(GithubConfigError::InvalidApiBaseUrl)?;
        if base_url.cannot_be_a_base() {
            return Err(GithubConfigError::InvalidApiBaseUrl(
                url::ParseError::RelativeUrlWithoutBase,
            ));
        }
        // An empty GITHUB_BRANCH gets the same treatment as an absent one.
        let branch = if self.github_branch.is_empty() {
            default_branch()
        } else {
            self.github_branch.clone()
        };
        Ok(GithubClient::new(
            base_url,
            token,
            GithubRepository {
                owner,
                name,
                branch,
            },
            self.commit_timeout(),
        ))
    }

    pub const fn commit_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.github_timeout_milliseconds)
    }
}

// The original deployment treated an empty environment variable the same as
// an absent one.
fn non_empty(secret: &Option<Secret<String>>) -> Option<&Secret<String>> {
    secret
        .as_ref()
        .filter(|secret| !secret.expose_secret().is_empty())
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = Config::builder()
        .add_source(config::Environment::default())
        .build()?;
    settings.try_deserialize()
}
