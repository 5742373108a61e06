//! Error types for solvesync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, validating, or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (write path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with file path and serde_yaml's line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A `.env` file exists but is not valid `KEY=value` syntax.
    #[error("failed to read env file {path}: {source}")]
    Dotenv {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// Required values absent from both the file and the environment.
    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    /// A value is present but unusable.
    #[error("invalid configuration value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    /// `init` refused to clobber an existing file.
    #[error("config already exists at {path}; pass --force to overwrite")]
    AlreadyExists { path: PathBuf },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Failures reported by a [`crate::remote::SourceReader`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The requested submission or problem does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Session credentials were rejected. No automatic recovery is possible.
    #[error("judge session expired or was rejected")]
    AuthExpired,

    /// Network failure or non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response arrived but could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The query endpoint answered with an application-level error.
    #[error("query error: {0}")]
    Graphql(String),
}

/// Failures reported by a [`crate::remote::StoreClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The requested path does not exist at the branch tip.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The API token was rejected.
    #[error("repository access denied: {0}")]
    Unauthorized(String),

    /// Network failure or non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response arrived but could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Failures raised by an [`crate::remote::ItemTransform`].
#[derive(Debug, Error)]
#[error("transform failed for submission {submission}: {reason}")]
pub struct TransformError {
    pub submission: String,
    pub reason: String,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
