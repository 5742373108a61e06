//! Configuration: a YAML file merged with environment overrides.
//!
//! # Storage layout
//!
//! ```text
//! ~/.solvesync/
//!   config.yaml   (mode 0600, written by `solvesync init`)
//! ```
//!
//! # API pattern
//!
//! Functions that touch the home directory come in two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Precedence, lowest first: `config.yaml`, `./.env`, process environment.
//!
//! The result of loading is an immutable [`Config`]; nothing reads the
//! environment after startup.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};

pub const DEFAULT_LEETCODE_URL: &str = "https://leetcode.com";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_REPO: &str = "leetcode-solutions";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_FETCH_LIMIT: u32 = 20;
pub const DEFAULT_STATE_PATH: &str = ".solvesync/sync-state.json";
pub const DEFAULT_THROTTLE_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_COMMIT_PREFIX: &str = "solvesync";

/// Environment variable → config key. Applied after the file.
pub const ENV_PREFIX: &str = "SOLVESYNC_";
/// Env file read from the working directory, between the config file and
/// the process environment.
pub const DOTENV_FILE: &str = ".env";

const SKELETON: &str = "\
# solvesync configuration.
# Secrets are usually supplied through the environment or ./.env instead:
#   SOLVESYNC_LEETCODE_SESSION, SOLVESYNC_LEETCODE_CSRF_TOKEN, SOLVESYNC_GITHUB_TOKEN
leetcode:
  username: ''
  base_url: https://leetcode.com
github:
  owner: ''
  repo: leetcode-solutions
  branch: main
  api_url: https://api.github.com
sync:
  fetch_limit: 20
  state_path: .solvesync/sync-state.json
  throttle_ms: 1000
  timeout_secs: 30
  commit_prefix: solvesync
";

// ---------------------------------------------------------------------------
// 1. On-disk shape
// ---------------------------------------------------------------------------

/// Raw, partially-filled configuration as read from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub leetcode: LeetCodeSection,
    #[serde(default)]
    pub github: GitHubSection,
    #[serde(default)]
    pub sync: SyncSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LeetCodeSection {
    pub username: Option<String>,
    pub session: Option<String>,
    pub csrf_token: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GitHubSection {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SyncSection {
    pub fetch_limit: Option<u32>,
    pub state_path: Option<String>,
    pub throttle_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub commit_prefix: Option<String>,
    pub template_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// 2. Validated shape
// ---------------------------------------------------------------------------

/// Fully validated, read-only configuration for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub leetcode: LeetCodeConfig,
    pub github: GitHubConfig,
    pub sync: SyncSettings,
}

#[derive(Clone, PartialEq, Eq)]
pub struct LeetCodeConfig {
    pub username: String,
    pub session: String,
    pub csrf_token: String,
    pub base_url: String,
}

impl fmt::Debug for LeetCodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeetCodeConfig")
            .field("username", &self.username)
            .field("session", &"<redacted>")
            .field("csrf_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub api_url: String,
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Page size of the recent-submission window.
    pub fetch_limit: u32,
    /// Repository-relative path of the sync state file.
    pub state_path: String,
    /// Pause inserted before each per-item upstream call.
    pub throttle: Duration,
    /// Per-request timeout handed to the HTTP agents.
    pub timeout: Duration,
    pub commit_prefix: String,
    /// Optional directory of `.tera` overrides for generated documents.
    pub template_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// 3. Merge + validate
// ---------------------------------------------------------------------------

impl ConfigFile {
    /// Overlay `SOLVESYNC_*` values obtained through `lookup`.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(&format!("{ENV_PREFIX}{key}")).filter(|v| !v.trim().is_empty())
        };

        if let Some(v) = get("LEETCODE_USERNAME") {
            self.leetcode.username = Some(v);
        }
        if let Some(v) = get("LEETCODE_SESSION") {
            self.leetcode.session = Some(v);
        }
        if let Some(v) = get("LEETCODE_CSRF_TOKEN") {
            self.leetcode.csrf_token = Some(v);
        }
        if let Some(v) = get("GITHUB_TOKEN") {
            self.github.token = Some(v);
        }
        if let Some(v) = get("GITHUB_OWNER") {
            self.github.owner = Some(v);
        }
        if let Some(v) = get("GITHUB_REPO") {
            self.github.repo = Some(v);
        }
        if let Some(v) = get("GITHUB_BRANCH") {
            self.github.branch = Some(v);
        }
        if let Some(v) = get("STATE_PATH") {
            self.sync.state_path = Some(v);
        }
        if let Some(v) = get("FETCH_LIMIT") {
            let limit = v.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                key: "SOLVESYNC_FETCH_LIMIT",
                reason: e.to_string(),
            })?;
            self.sync.fetch_limit = Some(limit);
        }
        Ok(())
    }

    /// Check required values and fill defaults.
    ///
    /// All missing required values are reported together.
    pub fn validate(self) -> Result<Config, ConfigError> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, name: &'static str| -> String {
            match value.filter(|v| !v.trim().is_empty()) {
                Some(v) => v,
                None => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let username = require(self.leetcode.username, "SOLVESYNC_LEETCODE_USERNAME");
        let session = require(self.leetcode.session, "SOLVESYNC_LEETCODE_SESSION");
        let csrf_token = require(self.leetcode.csrf_token, "SOLVESYNC_LEETCODE_CSRF_TOKEN");
        let token = require(self.github.token, "SOLVESYNC_GITHUB_TOKEN");
        let owner = require(self.github.owner, "SOLVESYNC_GITHUB_OWNER");
        let repo = require(
            self.github.repo.or_else(|| Some(DEFAULT_REPO.to_string())),
            "SOLVESYNC_GITHUB_REPO",
        );

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let fetch_limit = self.sync.fetch_limit.unwrap_or(DEFAULT_FETCH_LIMIT);
        if fetch_limit == 0 {
            return Err(ConfigError::Invalid {
                key: "sync.fetch_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        let throttle_ms = self.sync.throttle_ms.unwrap_or(DEFAULT_THROTTLE_MS);
        if throttle_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "sync.throttle_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        let state_path = self
            .sync
            .state_path
            .unwrap_or_else(|| DEFAULT_STATE_PATH.to_string());
        if state_path.trim().is_empty() || state_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: "sync.state_path",
                reason: format!("'{state_path}' must be a non-empty repository-relative path"),
            });
        }

        Ok(Config {
            leetcode: LeetCodeConfig {
                username,
                session,
                csrf_token,
                base_url: trim_url(self.leetcode.base_url, DEFAULT_LEETCODE_URL),
            },
            github: GitHubConfig {
                token,
                owner,
                repo,
                branch: self
                    .github
                    .branch
                    .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
                api_url: trim_url(self.github.api_url, DEFAULT_GITHUB_API_URL),
            },
            sync: SyncSettings {
                fetch_limit,
                state_path,
                throttle: Duration::from_millis(throttle_ms),
                timeout: Duration::from_secs(self.sync.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
                commit_prefix: self
                    .sync
                    .commit_prefix
                    .unwrap_or_else(|| DEFAULT_COMMIT_PREFIX.to_string()),
                template_dir: self.sync.template_dir,
            },
        })
    }
}

fn trim_url(value: Option<String>, default: &str) -> String {
    value
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

// ---------------------------------------------------------------------------
// 4. Path helpers + load
// ---------------------------------------------------------------------------

/// `<home>/.solvesync/config.yaml`: pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".solvesync").join("config.yaml")
}

/// Read a config file. A missing file yields an empty [`ConfigFile`].
pub fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read `KEY=value` pairs from an env file. A missing file yields an empty map.
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let dotenv_err = |source| ConfigError::Dotenv {
        path: path.to_path_buf(),
        source,
    };
    dotenvy::from_path_iter(path)
        .map_err(dotenv_err)?
        .map(|item| item.map_err(dotenv_err))
        .collect()
}

/// Compose the env lookup: a non-blank `process` value wins, otherwise the
/// `.env` entry is used.
pub fn layered_lookup<'a, F>(
    dotenv: &'a HashMap<String, String>,
    process: F,
) -> impl Fn(&str) -> Option<String> + 'a
where
    F: Fn(&str) -> Option<String> + 'a,
{
    move |key: &str| {
        process(key)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| dotenv.get(key).cloned())
    }
}

/// Load `config_path`, overlay `dotenv_path`, then the process environment,
/// and validate.
pub fn load_from(config_path: &Path, dotenv_path: &Path) -> Result<Config, ConfigError> {
    let mut file = read_file(config_path)?;
    let dotenv = read_dotenv(dotenv_path)?;
    file.apply_env(layered_lookup(&dotenv, |key| std::env::var(key).ok()))?;
    file.validate()
}

/// Load `explicit` (or the default path under `home`) with `./.env` and the
/// process environment on top.
pub fn load_at(home: &Path, explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config_path_at(home));
    load_from(&path, Path::new(DOTENV_FILE))
}

/// `load_at` convenience wrapper.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    load_at(&home()?, explicit)
}

// ---------------------------------------------------------------------------
// 5. Init (atomic)
// ---------------------------------------------------------------------------

/// Write the skeleton config to `<home>/.solvesync/config.yaml`.
///
/// Write flow: `.yaml.tmp` sibling → `chmod 0600` → `rename`.
/// Returns [`ConfigError::AlreadyExists`] unless `force` is set.
pub fn init_at(home: &Path, force: bool) -> Result<PathBuf, ConfigError> {
    let path = config_path_at(home);
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists { path });
    }
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid config path")));
    };
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        set_dir_permissions(dir)?;
    }

    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, SKELETON).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(path)
}

/// `init_at` convenience wrapper.
pub fn init(force: bool) -> Result<PathBuf, ConfigError> {
    init_at(&home()?, force)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete_env() -> HashMap<String, String> {
        env(&[
            ("SOLVESYNC_LEETCODE_USERNAME", "alice"),
            ("SOLVESYNC_LEETCODE_SESSION", "sess"),
            ("SOLVESYNC_LEETCODE_CSRF_TOKEN", "csrf"),
            ("SOLVESYNC_GITHUB_TOKEN", "ghp_x"),
            ("SOLVESYNC_GITHUB_OWNER", "alice"),
        ])
    }

    #[test]
    fn config_path_is_correct() {
        let home = TempDir::new().unwrap();
        assert!(config_path_at(home.path()).ends_with(".solvesync/config.yaml"));
    }

    #[test]
    fn env_only_config_fills_defaults() {
        let vars = complete_env();
        let mut file = ConfigFile::default();
        file.apply_env(|k| vars.get(k).cloned()).unwrap();
        let cfg = file.validate().unwrap();
        assert_eq!(cfg.github.repo, DEFAULT_REPO);
        assert_eq!(cfg.github.branch, "main");
        assert_eq!(cfg.sync.fetch_limit, 20);
        assert_eq!(cfg.sync.state_path, DEFAULT_STATE_PATH);
        assert_eq!(cfg.sync.throttle, Duration::from_millis(1000));
        assert_eq!(cfg.leetcode.base_url, "https://leetcode.com");
    }

    #[test]
    fn missing_values_are_reported_together() {
        let names = match ConfigFile::default().validate().unwrap_err() {
            ConfigError::Missing(names) => names,
            other => panic!("expected Missing, got {other}"),
        };
        assert_eq!(
            names,
            vec![
                "SOLVESYNC_LEETCODE_USERNAME",
                "SOLVESYNC_LEETCODE_SESSION",
                "SOLVESYNC_LEETCODE_CSRF_TOKEN",
                "SOLVESYNC_GITHUB_TOKEN",
                "SOLVESYNC_GITHUB_OWNER",
            ]
        );
    }

    #[test]
    fn env_overrides_file_values() {
        let mut file: ConfigFile = serde_yaml::from_str(
            "github:\n  branch: develop\n  owner: bob\nsync:\n  fetch_limit: 5\n",
        )
        .unwrap();
        let mut vars = complete_env();
        vars.insert("SOLVESYNC_FETCH_LIMIT".into(), "50".into());
        file.apply_env(|k| vars.get(k).cloned()).unwrap();
        let cfg = file.validate().unwrap();
        assert_eq!(cfg.github.owner, "alice");
        assert_eq!(cfg.github.branch, "develop");
        assert_eq!(cfg.sync.fetch_limit, 50);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut file: ConfigFile =
            serde_yaml::from_str("github:\n  owner: bob\n").unwrap();
        let mut vars = complete_env();
        vars.insert("SOLVESYNC_GITHUB_OWNER".into(), "  ".into());
        file.apply_env(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(file.github.owner.as_deref(), Some("bob"));
    }

    #[test]
    fn non_numeric_fetch_limit_is_invalid() {
        let vars = env(&[("SOLVESYNC_FETCH_LIMIT", "lots")]);
        let err = ConfigFile::default()
            .apply_env(|k| vars.get(k).cloned())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn zero_throttle_is_rejected() {
        let vars = complete_env();
        let mut file: ConfigFile = serde_yaml::from_str("sync:\n  throttle_ms: 0\n").unwrap();
        file.apply_env(|k| vars.get(k).cloned()).unwrap();
        let err = file.validate().unwrap_err();
        assert!(err.to_string().contains("throttle_ms"), "got: {err}");
    }

    #[test]
    fn absolute_state_path_is_rejected() {
        let vars = complete_env();
        let mut file: ConfigFile =
            serde_yaml::from_str("sync:\n  state_path: /etc/state.json\n").unwrap();
        file.apply_env(|k| vars.get(k).cloned()).unwrap();
        assert!(matches!(
            file.validate().unwrap_err(),
            ConfigError::Invalid { key: "sync.state_path", .. }
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_urls() {
        let vars = complete_env();
        let mut file: ConfigFile =
            serde_yaml::from_str("github:\n  api_url: https://ghe.local/api/v3/\n").unwrap();
        file.apply_env(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(file.validate().unwrap().github.api_url, "https://ghe.local/api/v3");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let vars = complete_env();
        let mut file = ConfigFile::default();
        file.apply_env(|k| vars.get(k).cloned()).unwrap();
        let cfg = file.validate().unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("sess\""));
        assert!(!rendered.contains("ghp_x"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn read_missing_file_is_empty() {
        let home = TempDir::new().unwrap();
        let file = read_file(&config_path_at(home.path())).unwrap();
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn init_writes_parseable_skeleton_and_cleans_tmp() {
        let home = TempDir::new().unwrap();
        let path = init_at(home.path(), false).expect("init");
        let parsed = read_file(&path).expect("skeleton parses");
        assert_eq!(parsed.sync.fetch_limit, Some(DEFAULT_FETCH_LIMIT));
        assert!(!path.with_extension("yaml.tmp").exists());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o600);
        }
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let home = TempDir::new().unwrap();
        init_at(home.path(), false).unwrap();
        let err = init_at(home.path(), false).unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyExists { .. }));
        init_at(home.path(), true).expect("force overwrites");
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(ConfigError::HomeNotFound.to_string().contains("home directory"));
    }
}
