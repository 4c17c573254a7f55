//! GitHub Contents API backend

use async_trait::async_trait;
use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{DocumentStore, StoredDocument};
use crate::config::GitHubConfig;
use crate::error::{BotError, Result};

const USER_AGENT: &str = concat!("whitelist-bot/", env!("CARGO_PKG_VERSION"));

/// File entry returned by `GET /repos/{owner}/{repo}/contents/{path}`
#[derive(Deserialize)]
struct ContentResponse {
    path: String,
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

/// Which call produced an unexpected status
#[derive(Debug, Clone, Copy)]
enum Operation {
    Fetch,
    Write,
}

pub struct GitHubStore {
    config: GitHubConfig,
    http_client: reqwest::Client,
}

impl GitHubStore {
    pub fn new(config: GitHubConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn contents_url(&self, path: &str) -> String {
        let encoded_path = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            encoded_path
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", USER_AGENT)
    }
}

#[async_trait]
impl DocumentStore for GitHubStore {
    async fn fetch(&self, path: &str) -> Result<StoredDocument> {
        let url = self.contents_url(path);
        debug!("Fetching {} from {}/{}", path, self.config.owner, self.config.repo);

        let mut request = self.request(reqwest::Method::GET, &url);
        if let Some(branch) = &self.config.branch {
            request = request.query(&[("ref", branch.as_str())]);
        }

        let response = request.send().await.map_err(|e| {
            error!("Failed to reach GitHub for '{}': {}", path, e);
            BotError::FetchFailed {
                path: path.to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Fetching '{}' failed with {}: {}", path, status, error_text);
            return Err(status_error(Operation::Fetch, status, path, &error_text));
        }

        let file: ContentResponse = response.json().await.map_err(|e| BotError::FetchFailed {
            path: path.to_string(),
            message: format!("unexpected response: {}", e),
        })?;

        if file.encoding != "base64" {
            // Files above 1 MB come back without inline content
            return Err(BotError::FetchFailed {
                path: path.to_string(),
                message: format!("unsupported content encoding '{}'", file.encoding),
            });
        }

        let content = decode_content(&file.content).map_err(|message| BotError::FetchFailed {
            path: path.to_string(),
            message,
        })?;

        Ok(StoredDocument {
            path: file.path,
            content,
            revision: file.sha,
        })
    }

    async fn write(&self, path: &str, content: &str, message: &str, revision: &str) -> Result<()> {
        let url = self.contents_url(path);
        let body = UpdateRequest {
            message,
            content: base64::engine::general_purpose::STANDARD.encode(content),
            sha: revision,
            branch: self.config.branch.as_deref(),
        };

        let response = self
            .request(reqwest::Method::PUT, &url)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Writing '{}' failed with {}: {}", path, status, error_text);
            return Err(status_error(Operation::Write, status, path, &error_text));
        }

        info!("Committed '{}' to {}/{}: {}", path, self.config.owner, self.config.repo, message);
        Ok(())
    }
}

/// Decode the base64 payload GitHub wraps at 60 columns
fn decode_content(encoded: &str) -> std::result::Result<String, String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| format!("invalid base64 content: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("content is not UTF-8: {}", e))
}

fn status_error(op: Operation, status: StatusCode, path: &str, body: &str) -> BotError {
    match (op, status) {
        (_, StatusCode::UNAUTHORIZED) | (_, StatusCode::FORBIDDEN) => BotError::AuthFailed {
            message: format!("GitHub answered {}", status),
        },
        (_, StatusCode::NOT_FOUND) => BotError::FetchFailed {
            path: path.to_string(),
            message: "not found".to_string(),
        },
        (Operation::Write, StatusCode::CONFLICT) => BotError::WriteConflict {
            path: path.to_string(),
        },
        _ => BotError::Unknown {
            message: format!("GitHub answered {}: {}", status, body),
        },
    }
}
