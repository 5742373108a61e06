//! LeetCode GraphQL adapter.

use std::time::Duration;

use serde_json::{json, Value};

use solvesync_core::{
    LeetCodeConfig, ProblemMetadata, SourceError, SourceReader, SubmissionDetail, SubmissionId,
    SubmissionSummary,
};

use crate::queries;
use crate::wire::{self, SubmissionListPayload, WireDetail, WireQuestion};

/// Blocking client for the judge's `/graphql/` endpoint.
pub struct LeetCodeClient {
    agent: ureq::Agent,
    endpoint: String,
    referer: String,
    cookie: String,
    csrf_token: String,
}

impl LeetCodeClient {
    pub fn new(config: &LeetCodeConfig, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(&crate::user_agent())
            .build();
        Self {
            agent,
            endpoint: format!("{}/graphql/", config.base_url),
            referer: format!("{}/", config.base_url),
            cookie: format!(
                "LEETCODE_SESSION={}; csrftoken={}",
                config.session, config.csrf_token
            ),
            csrf_token: config.csrf_token.clone(),
        }
    }

    fn query(&self, document: &str, variables: Value) -> Result<String, SourceError> {
        let result = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .set("Cookie", &self.cookie)
            .set("x-csrftoken", &self.csrf_token)
            .set("Referer", &self.referer)
            .send_json(json!({ "query": document, "variables": variables }));

        match result {
            Ok(response) => response
                .into_string()
                .map_err(|e| SourceError::Transport(format!("reading response: {e}"))),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                let err = wire::status_error(code, &body);
                if err == SourceError::AuthExpired {
                    tracing::error!(status = code, "judge rejected the session cookies");
                }
                Err(err)
            }
            Err(ureq::Error::Transport(t)) => Err(SourceError::Transport(t.to_string())),
        }
    }
}

impl SourceReader for LeetCodeClient {
    fn list_recent(&self, offset: u32, limit: u32) -> Result<Vec<SubmissionSummary>, SourceError> {
        tracing::info!(offset, limit, "fetching recent submissions");
        let body = self.query(
            queries::SUBMISSION_LIST,
            json!({ "offset": offset, "limit": limit, "slug": Value::Null }),
        )?;
        let payload: SubmissionListPayload =
            wire::decode_field(&body, "submissionList", "submission list")?;
        let summaries = payload.into_summaries()?;
        tracing::info!(count = summaries.len(), "fetched submissions");
        Ok(summaries)
    }

    fn submission_detail(&self, id: &SubmissionId) -> Result<SubmissionDetail, SourceError> {
        let numeric = wire::numeric_id(&id.0)?;
        tracing::debug!(submission_id = %id, "fetching submission detail");
        let body = self.query(queries::SUBMISSION_DETAILS, json!({ "id": numeric }))?;
        let detail: WireDetail =
            wire::decode_field(&body, "submissionDetails", &format!("submission {id}"))?;
        detail.into_detail()
    }

    fn problem(&self, title_slug: &str) -> Result<ProblemMetadata, SourceError> {
        tracing::debug!(slug = title_slug, "fetching problem");
        let body = self.query(queries::QUESTION, json!({ "titleSlug": title_slug }))?;
        let question: WireQuestion =
            wire::decode_field(&body, "question", &format!("problem {title_slug}"))?;
        Ok(question.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LeetCodeConfig {
        LeetCodeConfig {
            username: "alice".to_string(),
            session: "sess".to_string(),
            csrf_token: "csrf".to_string(),
            base_url: "https://leetcode.com".to_string(),
        }
    }

    #[test]
    fn request_headers_derive_from_config() {
        let client = LeetCodeClient::new(&config(), Duration::from_secs(5));
        assert_eq!(client.endpoint, "https://leetcode.com/graphql/");
        assert_eq!(client.referer, "https://leetcode.com/");
        assert_eq!(client.cookie, "LEETCODE_SESSION=sess; csrftoken=csrf");
        assert_eq!(client.csrf_token, "csrf");
    }

    #[test]
    fn non_numeric_id_is_rejected_before_any_request() {
        // Unroutable base URL: reaching the network would surface as Transport.
        let mut cfg = config();
        cfg.base_url = "http://127.0.0.1:9".to_string();
        let client = LeetCodeClient::new(&cfg, Duration::from_millis(50));
        let err = client
            .submission_detail(&SubmissionId::from("abc"))
            .unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)), "got {err:?}");
    }
}
