//! Destination layout: where a solution lands inside the repository.
//!
//! ```text
//! <difficulty>/<frontend_id>. <title>/solution<ext>
//! <difficulty>/<frontend_id>. <title>/README.md
//! ```

use solvesync_core::ProblemMetadata;

pub const README_FILE: &str = "README.md";
pub const SOLUTION_STEM: &str = "solution";

/// Source-file extension for a judge language name (case-insensitive).
///
/// Unknown languages fall back to `.txt` so the code is still committed.
pub fn extension_for(lang_name: &str) -> &'static str {
    match lang_name.trim().to_ascii_lowercase().as_str() {
        "c#" | "csharp" => ".cs",
        "python" | "python3" => ".py",
        "java" => ".java",
        "javascript" => ".js",
        "typescript" => ".ts",
        "c++" | "cpp" => ".cpp",
        "c" => ".c",
        "go" | "golang" => ".go",
        "rust" => ".rs",
        "ruby" => ".rb",
        "swift" => ".swift",
        "kotlin" => ".kt",
        "scala" => ".scala",
        "php" => ".php",
        "dart" => ".dart",
        "elixir" => ".ex",
        "erlang" => ".erl",
        "racket" => ".rkt",
        "sql" | "mysql" | "mssql" | "oraclesql" | "postgresql" => ".sql",
        "bash" => ".sh",
        _ => ".txt",
    }
}

/// `<difficulty>/<frontend_id>. <title>` with path separators neutralised.
pub fn problem_dir(problem: &ProblemMetadata) -> String {
    format!(
        "{}/{}. {}",
        sanitize_segment(&problem.difficulty),
        sanitize_segment(&problem.frontend_id),
        sanitize_segment(&problem.title)
    )
}

pub fn solution_path(problem: &ProblemMetadata, lang_name: &str) -> String {
    format!(
        "{}/{}{}",
        problem_dir(problem),
        SOLUTION_STEM,
        extension_for(lang_name)
    )
}

pub fn readme_path(problem: &ProblemMetadata) -> String {
    format!("{}/{}", problem_dir(problem), README_FILE)
}

fn sanitize_segment(raw: &str) -> String {
    raw.trim().replace(['/', '\\'], "-")
}
