/// Hub Client: the only code that talks to the prompt hub.
///
/// Publishing goes through the [`Publisher`] trait so the network boundary can be
/// swapped for a fake. [`HubClient`] is the real implementation: one publish is a
/// short, strictly sequential exchange with the registry and is never retried.
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

pub mod manifest;

pub use manifest::HubObject;

pub const DEFAULT_API_URL: &str = "https://api.smith.langchain.com";
const API_KEY_HEADER: &str = "x-api-key";
/// Owner segment the hub accepts for "the caller's own tenant".
const DEFAULT_OWNER: &str = "-";
const SHORT_HASH_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication rejected (status {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Hub API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid hub entry name '{0}': use lowercase letters, digits, '-' or '_'")]
    InvalidName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubCredentials {
    pub api_key: String,
    pub api_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    pub description: String,
}

pub struct PublishRequest<'a> {
    pub name: &'a str,
    pub object: &'a HubObject,
    pub credentials: &'a HubCredentials,
    pub metadata: &'a EntryMetadata,
}

/// Creates or updates a named hub entry and returns its URL.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, request: PublishRequest<'_>) -> Result<String, PublishError>;
}

#[derive(Debug, Deserialize)]
struct SettingsResponse {
    tenant_handle: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateRepoRequest<'a> {
    repo_handle: &'a str,
    description: &'a str,
    readme: &'a str,
    is_public: bool,
    tags: Vec<String>,
}

#[derive(Debug, Serialize)]
struct UpdateRepoRequest<'a> {
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateCommitRequest<'a> {
    manifest: &'a Value,
    parent_commit: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CommitInfo {
    commit_hash: String,
}

#[derive(Debug, Deserialize)]
struct CreateCommitResponse {
    commit: CommitInfo,
}

#[derive(Debug, Deserialize)]
struct ListCommitsResponse {
    commits: Vec<CommitInfo>,
}

#[derive(Debug, Deserialize)]
struct HubErrorBody {
    detail: Value,
}

/// reqwest-backed [`Publisher`]. Holds no credentials; each request brings its own.
#[derive(Clone)]
pub struct HubClient {
    client: Client,
}

impl HubClient {
    pub fn new() -> Result<Self, PublishError> {
        Ok(Self {
            client: Client::builder().build()?,
        })
    }

    async fn owner(&self, creds: &HubCredentials) -> Result<String, PublishError> {
        let response = self
            .client
            .get(format!("{}/settings", creds.api_url))
            .header(API_KEY_HEADER, &creds.api_key)
            .send()
            .await?;
        let settings: SettingsResponse = check(response).await?.json().await?;

        Ok(settings
            .tenant_handle
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_OWNER.to_string()))
    }

    async fn repo_exists(
        &self,
        creds: &HubCredentials,
        owner: &str,
        name: &str,
    ) -> Result<bool, PublishError> {
        let response = self
            .client
            .get(format!("{}/repos/{owner}/{name}", creds.api_url))
            .header(API_KEY_HEADER, &creds.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check(response).await?;
        Ok(true)
    }

    async fn create_repo(
        &self,
        creds: &HubCredentials,
        name: &str,
        metadata: &EntryMetadata,
    ) -> Result<(), PublishError> {
        let body = CreateRepoRequest {
            repo_handle: name,
            description: &metadata.description,
            readme: "",
            is_public: false,
            tags: Vec::new(),
        };
        let response = self
            .client
            .post(format!("{}/repos/", creds.api_url))
            .header(API_KEY_HEADER, &creds.api_key)
            .json(&body)
            .send()
            .await?;
        check(response).await?;

        info!("Created hub repo {name}");
        Ok(())
    }

    async fn update_repo(
        &self,
        creds: &HubCredentials,
        owner: &str,
        name: &str,
        metadata: &EntryMetadata,
    ) -> Result<(), PublishError> {
        let response = self
            .client
            .patch(format!("{}/repos/{owner}/{name}", creds.api_url))
            .header(API_KEY_HEADER, &creds.api_key)
            .json(&UpdateRepoRequest {
                description: &metadata.description,
            })
            .send()
            .await?;
        check(response).await?;

        debug!("Updated description of {owner}/{name}");
        Ok(())
    }

    async fn latest_commit(
        &self,
        creds: &HubCredentials,
        owner: &str,
        name: &str,
    ) -> Result<Option<String>, PublishError> {
        let response = self
            .client
            .get(format!("{}/commits/{owner}/{name}/", creds.api_url))
            .query(&[("limit", "1"), ("offset", "0")])
            .header(API_KEY_HEADER, &creds.api_key)
            .send()
            .await?;
        let list: ListCommitsResponse = check(response).await?.json().await?;

        Ok(list.commits.into_iter().next().map(|c| c.commit_hash))
    }

    async fn create_commit(
        &self,
        creds: &HubCredentials,
        owner: &str,
        name: &str,
        manifest: &Value,
        parent: Option<&str>,
    ) -> Result<String, PublishError> {
        let response = self
            .client
            .post(format!("{}/commits/{owner}/{name}", creds.api_url))
            .header(API_KEY_HEADER, &creds.api_key)
            .json(&CreateCommitRequest {
                manifest,
                parent_commit: parent,
            })
            .send()
            .await?;

        // 409: manifest identical to the parent commit
        if response.status() == StatusCode::CONFLICT {
            if let Some(parent) = parent {
                info!("Nothing to commit for {owner}/{name}; keeping {parent}");
                return Ok(parent.to_string());
            }
        }

        let created: CreateCommitResponse = check(response).await?.json().await?;
        Ok(created.commit.commit_hash)
    }
}

#[async_trait]
impl Publisher for HubClient {
    async fn publish(&self, request: PublishRequest<'_>) -> Result<String, PublishError> {
        let PublishRequest {
            name,
            object,
            credentials,
            metadata,
        } = request;

        validate_name(name)?;
        let manifest = object.to_manifest();

        let owner = self.owner(credentials).await?;
        let parent = if self.repo_exists(credentials, &owner, name).await? {
            self.update_repo(credentials, &owner, name, metadata).await?;
            self.latest_commit(credentials, &owner, name).await?
        } else {
            self.create_repo(credentials, name, metadata).await?;
            None
        };

        let hash = self
            .create_commit(credentials, &owner, name, &manifest, parent.as_deref())
            .await?;
        debug!("Committed {} {owner}/{name} at {hash}", object.kind());

        Ok(entry_url(&credentials.api_url, &owner, name, &hash))
    }
}

/// Maps non-2xx responses to errors, preferring the hub's `detail` message.
async fn check(response: Response) -> Result<Response, PublishError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<HubErrorBody>(&body) {
        Ok(HubErrorBody {
            detail: Value::String(detail),
        }) => detail,
        Ok(HubErrorBody { detail }) => detail.to_string(),
        Err(_) => body,
    };

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Err(PublishError::Unauthorized {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(PublishError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn validate_name(name: &str) -> Result<(), PublishError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PublishError::InvalidName(name.to_string()))
    }
}

/// Browser URL for an API URL: drops a leading `api.` host label and a trailing
/// `/api` or `/api/v1` path.
pub fn web_url(api_url: &str) -> String {
    let Ok(mut url) = Url::parse(api_url) else {
        return api_url.trim_end_matches('/').to_string();
    };

    if let Some(host) = url
        .host_str()
        .and_then(|h| h.strip_prefix("api."))
        .map(str::to_string)
    {
        // Fails only for cannot-be-a-base URLs, which never carry a host.
        let _ = url.set_host(Some(&host));
    }

    let path = url.path().trim_end_matches('/');
    let path = path
        .strip_suffix("/api/v1")
        .or_else(|| path.strip_suffix("/api"))
        .unwrap_or(path)
        .to_string();
    url.set_path(&path);

    url.as_str().trim_end_matches('/').to_string()
}

pub fn entry_url(api_url: &str, owner: &str, name: &str, commit_hash: &str) -> String {
    let short: String = commit_hash.chars().take(SHORT_HASH_LEN).collect();
    format!("{}/hub/{owner}/{name}/{short}", web_url(api_url))
}
