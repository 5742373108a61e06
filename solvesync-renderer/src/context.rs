//! Template context: serializable rendering payload for a solution README.

use serde::{Deserialize, Serialize};

use solvesync_core::{Identity, ProblemMetadata, SubmissionDetail};

use crate::error::RenderError;

/// Flat rendering payload. Numbers are pre-formatted so templates stay dumb.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadmeContext {
    pub problem: ProblemCtx,
    pub submission: SubmissionCtx,
    pub author: AuthorCtx,
    pub meta: MetaCtx,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemCtx {
    pub frontend_id: String,
    pub title: String,
    pub slug: String,
    pub difficulty: String,
    pub url: String,
    /// Topic names; empty when the problem carries none.
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionCtx {
    pub id: String,
    pub language: String,
    /// `"3 ms (beats 97.4%)"`, or just the display value when no percentile.
    pub runtime: Option<String>,
    pub memory: Option<String>,
    /// `"March 05, 2024"`; `None` if the timestamp is out of range.
    pub submitted_on: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorCtx {
    pub username: String,
    pub profile_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaCtx {
    pub synced_on: String,
    pub solvesync_version: String,
}

impl ReadmeContext {
    /// Build a [`ReadmeContext`] for one synced submission.
    pub fn new(
        base_url: &str,
        detail: &SubmissionDetail,
        problem: &ProblemMetadata,
        identity: &Identity,
    ) -> Self {
        let problem_url = format!("{base_url}/problems/{}/", problem.title_slug);
        ReadmeContext {
            problem: ProblemCtx {
                frontend_id: problem.frontend_id.clone(),
                title: problem.title.clone(),
                slug: problem.title_slug.clone(),
                difficulty: problem.difficulty.clone(),
                url: problem_url.clone(),
                topics: problem.topic_tags.iter().map(|t| t.name.clone()).collect(),
            },
            submission: SubmissionCtx {
                id: detail.id.0.clone(),
                language: detail.lang.verbose_name.clone(),
                runtime: with_percentile(detail.runtime_display.as_deref(), detail.runtime_percentile),
                memory: with_percentile(detail.memory_display.as_deref(), detail.memory_percentile),
                submitted_on: detail
                    .submitted_at()
                    .map(|at| at.format("%B %d, %Y").to_string()),
                url: format!("{problem_url}submissions/{}/", detail.id),
            },
            author: AuthorCtx {
                username: identity.username.clone(),
                profile_url: format!("{base_url}/u/{}/", identity.username),
            },
            meta: MetaCtx {
                synced_on: identity.synced_on.format("%Y-%m-%d").to_string(),
                solvesync_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

fn with_percentile(display: Option<&str>, percentile: Option<f64>) -> Option<String> {
    let display = display?;
    Some(match percentile {
        Some(pct) => format!("{display} (beats {pct:.1}%)"),
        None => display.to_string(),
    })
}
