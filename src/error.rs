// ─────────────────────────────────────────────────────────────────────────────
//  robobuild :: error
// ─────────────────────────────────────────────────────────────────────────────

use thiserror::Error;

use crate::platform::Platform;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown build target '{0}'\n  Hint: valid platforms are {valid}", valid = Platform::supported_names())]
    UnsupportedPlatform(String),

    #[error("unknown dependency '{0}'\n  Hint: run `robobuild deps` for the registered set")]
    UnknownDependency(String),

    #[error("dependency '{name}' does not support platform {platform}\n  Supported platforms: {list}", list = .supported.join(", "))]
    UnsupportedPlatformForDependency {
        name:      String,
        platform:  Platform,
        supported: Vec<String>,
    },

    #[error("invalid manifest {path}:\n  {detail}")]
    InvalidManifest { path: String, detail: String },

    #[error("failed to write build plan to {path}: {detail}")]
    PlanWrite { path: String, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
