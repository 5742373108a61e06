//! GitHub adapter: raw file reads and single-commit multi-file writes.
//!
//! `commit_files` builds the commit through the git data API and only moves
//! the branch in the final (non-forced) ref update. Any earlier failure
//! leaves unreferenced blobs and trees behind and the branch untouched.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use solvesync_core::{CommitId, FileSet, GitHubConfig, StoreClient, StoreError};

use crate::wire::snippet;

const API_VERSION: &str = "2022-11-28";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const FILE_MODE: &str = "100644";

/// Blocking client scoped to one `owner/repo@branch`.
pub struct GitHubClient {
    agent: ureq::Agent,
    repo_url: String,
    branch: String,
    auth: String,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    object: ShaRef,
}

#[derive(Debug, Deserialize)]
struct ShaRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitObject {
    tree: ShaRef,
}

#[derive(Debug, Serialize)]
struct TreeEntry<'a> {
    path: &'a str,
    mode: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    sha: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(&crate::user_agent())
            .build();
        Self {
            agent,
            repo_url: format!("{}/repos/{}/{}", config.api_url, config.owner, config.repo),
            branch: config.branch.clone(),
            auth: format!("Bearer {}", config.token),
        }
    }

    fn request(&self, method: &str, url: &str, accept: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Authorization", &self.auth)
            .set("Accept", accept)
            .set("X-GitHub-Api-Version", API_VERSION)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let url = format!("{}{path}", self.repo_url);
        let response = self.request("GET", &url, JSON_MEDIA_TYPE).call();
        read_json(path, response)
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, StoreError> {
        let url = format!("{}{path}", self.repo_url);
        let response = self.request(method, &url, JSON_MEDIA_TYPE).send_json(body);
        read_json(path, response)
    }
}

impl StoreClient for GitHubClient {
    fn read_file(&self, path: &str) -> Result<String, StoreError> {
        let url = format!("{}/contents/{}", self.repo_url, encode_path(path));
        let result = self
            .request("GET", &url, RAW_MEDIA_TYPE)
            .query("ref", &self.branch)
            .call();
        match result {
            Ok(response) => response
                .into_string()
                .map_err(|e| StoreError::Transport(format!("reading {path}: {e}"))),
            Err(err) => Err(map_error(path, err)),
        }
    }

    fn commit_files(&self, files: &FileSet, message: &str) -> Result<CommitId, StoreError> {
        tracing::info!(files = files.len(), branch = %self.branch, "committing files");

        let head: RefObject = self.get_json(&format!("/git/ref/heads/{}", self.branch))?;
        let parent = head.object.sha;
        let parent_commit: CommitObject = self.get_json(&format!("/git/commits/{parent}"))?;

        let mut entries = Vec::with_capacity(files.len());
        for (path, content) in files {
            let blob: ShaRef = self.send_json(
                "POST",
                "/git/blobs",
                json!({ "content": content, "encoding": "utf-8" }),
            )?;
            tracing::debug!(path = %path, blob = %blob.sha, "created blob");
            entries.push(TreeEntry {
                path,
                mode: FILE_MODE,
                kind: "blob",
                sha: blob.sha,
            });
        }

        let tree: ShaRef = self.send_json(
            "POST",
            "/git/trees",
            json!({ "base_tree": parent_commit.tree.sha, "tree": entries }),
        )?;
        let commit: ShaRef = self.send_json(
            "POST",
            "/git/commits",
            json!({ "message": message, "tree": tree.sha, "parents": [parent] }),
        )?;
        let _: serde_json::Value = self.send_json(
            "PATCH",
            &format!("/git/refs/heads/{}", self.branch),
            json!({ "sha": commit.sha, "force": false }),
        )?;

        let id = CommitId(commit.sha);
        tracing::info!(commit = id.short(), "branch updated");
        Ok(id)
    }
}

fn read_json<T: DeserializeOwned>(
    what: &str,
    result: Result<ureq::Response, ureq::Error>,
) -> Result<T, StoreError> {
    let response = result.map_err(|err| map_error(what, err))?;
    response
        .into_json()
        .map_err(|e| StoreError::Decode(format!("{what}: {e}")))
}

fn map_error(what: &str, err: ureq::Error) -> StoreError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            status_error(what, code, &body)
        }
        ureq::Error::Transport(t) => StoreError::Transport(format!("{what}: {t}")),
    }
}

/// Map a non-success HTTP status from the repository host.
pub fn status_error(what: &str, code: u16, body: &str) -> StoreError {
    match code {
        404 => StoreError::NotFound(what.to_string()),
        401 | 403 => StoreError::Unauthorized(format!("{what}: HTTP {code}")),
        _ => StoreError::Transport(format!("{what}: HTTP {code}: {}", snippet(body))),
    }
}

/// Percent-encode each segment of a repository path, keeping `/` separators.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
