mod accounts;
mod app_config;
mod config;
mod entities;

pub use accounts::{load_account_seeds, AccountSeed, AccountsFile};
pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use entities::{
    EducationItem, ExperienceItem, NormalizedEntity, Organization, Platform, Post, Profile,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read accounts file {path}: {source}")]
    AccountsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse accounts file: {0}")]
    AccountsFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
