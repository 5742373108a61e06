//! HTTP adapters for the judge (LeetCode GraphQL) and the destination
//! repository (GitHub REST). Both are blocking `ureq` clients.

pub mod github;
pub mod leetcode;
pub mod queries;
pub mod wire;

pub use github::GitHubClient;
pub use leetcode::LeetCodeClient;

pub(crate) fn user_agent() -> String {
    format!("solvesync/{}", env!("CARGO_PKG_VERSION"))
}
