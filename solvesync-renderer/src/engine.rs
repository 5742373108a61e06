//! Tera rendering engine and the [`SolutionRenderer`] transform.
//!
//! # Output per synced submission
//!
//! | File             | Content                                  |
//! |------------------|------------------------------------------|
//! | `solution<ext>`  | submitted code, LF line endings          |
//! | `README.md`      | `readme.md.tera` rendered from context   |

use std::path::{Path, PathBuf};

use tera::Tera;

use solvesync_core::{
    FileSet, Identity, ItemTransform, ProblemMetadata, SubmissionDetail, TransformError,
};

use crate::context::ReadmeContext;
use crate::error::RenderError;
use crate::layout;

pub const README_TEMPLATE: &str = "readme.md.tera";

// ---------------------------------------------------------------------------
// Embedded templates: baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[(README_TEMPLATE, include_str!("templates/readme.md.tera"))];

// ---------------------------------------------------------------------------
// Template loading
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

/// Body for the embedded template `name`, or the file of the same name in
/// `override_dir` when one exists there.
fn template_source(
    name: &str,
    embedded: &str,
    override_dir: Option<&Path>,
) -> Result<String, RenderError> {
    let Some(candidate) = override_dir.map(|dir| dir.join(name)) else {
        return Ok(embedded.to_string());
    };
    if !candidate.is_file() {
        return Ok(embedded.to_string());
    }
    std::fs::read_to_string(&candidate).map_err(|e| io_err(&candidate, e))
}

fn build_tera(override_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let sources = TPLS
        .iter()
        .map(|(name, embedded)| Ok((*name, template_source(name, embedded, override_dir)?)))
        .collect::<Result<Vec<(&str, String)>, RenderError>>()?;

    let mut tera = Tera::default();
    tera.add_raw_templates(sources)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine with optional user overrides.
///
/// `user_template_dir` may hold a file named like an embedded template
/// (e.g. `readme.md.tera`); it replaces the embedded body.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render the README for one submission. Output always uses LF endings.
    pub fn render_readme(&self, ctx: &ReadmeContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let content = self.tera.render(README_TEMPLATE, &tera_ctx)?;
        Ok(content.replace("\r\n", "\n"))
    }
}

// ---------------------------------------------------------------------------
// SolutionRenderer
// ---------------------------------------------------------------------------

/// The item-to-files transform used by the sync orchestrator.
///
/// Create once with [`SolutionRenderer::new`] and reuse across items.
pub struct SolutionRenderer {
    engine: TemplateEngine,
    base_url: String,
}

impl SolutionRenderer {
    /// `base_url` is the judge's public site, used for links in the README.
    pub fn new(base_url: &str, user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(SolutionRenderer {
            engine: TemplateEngine::new(user_template_dir)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Render both files for one submission.
    pub fn render(
        &self,
        detail: &SubmissionDetail,
        problem: &ProblemMetadata,
        identity: &Identity,
    ) -> Result<FileSet, RenderError> {
        let ctx = ReadmeContext::new(&self.base_url, detail, problem, identity);
        let readme = self.engine.render_readme(&ctx)?;

        let mut files = FileSet::new();
        files.insert(
            layout::solution_path(problem, &detail.lang.name),
            detail.code.replace("\r\n", "\n"),
        );
        files.insert(layout::readme_path(problem), readme);
        Ok(files)
    }
}

impl ItemTransform for SolutionRenderer {
    fn build_files(
        &self,
        detail: &SubmissionDetail,
        problem: &ProblemMetadata,
        identity: &Identity,
    ) -> Result<FileSet, TransformError> {
        self.render(detail, problem, identity)
            .map_err(|e| TransformError {
                submission: detail.id.0.clone(),
                reason: e.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use solvesync_core::{QuestionRef, SubmissionId, SubmissionLang, TopicTag};
    use tempfile::TempDir;

    fn detail(lang: &str) -> SubmissionDetail {
        SubmissionDetail {
            id: SubmissionId::from("1200"),
            code: "class Solution:\r\n    pass\r\n".to_string(),
            timestamp: 1_709_640_000,
            lang: SubmissionLang {
                name: lang.to_string(),
                verbose_name: "Python3".to_string(),
            },
            runtime_display: Some("40 ms".to_string()),
            runtime_percentile: Some(88.0),
            memory_display: None,
            memory_percentile: None,
            question: QuestionRef {
                question_id: "20".to_string(),
                title_slug: "valid-parentheses".to_string(),
            },
            topic_tags: None,
        }
    }

    fn problem(topics: &[&str]) -> ProblemMetadata {
        ProblemMetadata {
            question_id: "20".to_string(),
            frontend_id: "20".to_string(),
            title: "Valid Parentheses".to_string(),
            title_slug: "valid-parentheses".to_string(),
            content: Some("<p>Given a string...</p>".to_string()),
            difficulty: "Easy".to_string(),
            topic_tags: topics
                .iter()
                .map(|t| TopicTag {
                    name: t.to_string(),
                    slug: t.to_lowercase(),
                })
                .collect(),
        }
    }

    fn identity() -> Identity {
        Identity::new("alice", NaiveDate::from_ymd_opt(2024, 3, 6).unwrap())
    }

    #[test]
    fn renderer_new_succeeds() {
        SolutionRenderer::new("https://leetcode.com", None)
            .expect("SolutionRenderer::new should succeed with embedded templates");
    }

    #[test]
    fn produces_solution_and_readme() {
        let renderer = SolutionRenderer::new("https://leetcode.com", None).unwrap();
        let files = renderer
            .render(&detail("python3"), &problem(&["Stack"]), &identity())
            .unwrap();
        let keys: Vec<_> = files.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "Easy/20. Valid Parentheses/README.md".to_string(),
                "Easy/20. Valid Parentheses/solution.py".to_string(),
            ]
        );
    }

    #[test]
    fn solution_code_is_lf_normalised() {
        let renderer = SolutionRenderer::new("https://leetcode.com", None).unwrap();
        let files = renderer
            .render(&detail("python3"), &problem(&[]), &identity())
            .unwrap();
        let code = &files["Easy/20. Valid Parentheses/solution.py"];
        assert_eq!(code, "class Solution:\n    pass\n");
    }

    #[test]
    fn topics_line_omitted_when_empty() {
        let renderer = SolutionRenderer::new("https://leetcode.com", None).unwrap();
        let files = renderer
            .render(&detail("python3"), &problem(&[]), &identity())
            .unwrap();
        let readme = &files["Easy/20. Valid Parentheses/README.md"];
        assert!(!readme.contains("**Topics:**"));
        assert!(!readme.contains("**Memory:**"));
        assert!(readme.contains("**Runtime:** 40 ms (beats 88.0%)"));
    }

    #[test]
    fn user_template_overrides_embedded_readme() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("readme.md.tera"),
            "custom {{ problem.title }} by {{ author.username }}\n",
        )
        .unwrap();
        let renderer = SolutionRenderer::new("https://leetcode.com", Some(dir.path())).unwrap();
        let files = renderer
            .render(&detail("python3"), &problem(&[]), &identity())
            .unwrap();
        assert_eq!(
            files["Easy/20. Valid Parentheses/README.md"],
            "custom Valid Parentheses by alice\n"
        );
    }

    #[test]
    fn broken_user_template_is_a_render_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("readme.md.tera"), "{% if %}").unwrap();
        assert!(matches!(
            SolutionRenderer::new("https://leetcode.com", Some(dir.path())),
            Err(RenderError::Tera(_))
        ));
    }

    #[test]
    fn transform_error_names_the_submission() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("readme.md.tera"), "{{ no_such_field }}").unwrap();
        let renderer = SolutionRenderer::new("https://leetcode.com", Some(dir.path())).unwrap();
        let err = renderer
            .build_files(&detail("python3"), &problem(&[]), &identity())
            .unwrap_err();
        assert_eq!(err.submission, "1200");
    }
}
