//! # solvesync-renderer
//!
//! Turns one synced submission into the files committed for it: the source
//! file and a Tera-rendered README.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use solvesync_core::{Identity, ProblemMetadata, SubmissionDetail};
//! use solvesync_renderer::SolutionRenderer;
//!
//! fn files_for(detail: &SubmissionDetail, problem: &ProblemMetadata, who: &Identity) {
//!     if let Ok(renderer) = SolutionRenderer::new("https://leetcode.com", None) {
//!         if let Ok(files) = renderer.render(detail, problem, who) {
//!             for (path, content) in files {
//!                 println!("{path}: {} bytes", content.len());
//!             }
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod layout;

pub use context::ReadmeContext;
pub use engine::{SolutionRenderer, TemplateEngine};
pub use error::RenderError;
