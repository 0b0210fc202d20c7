use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::Platform;
use crate::ConfigError;

/// One scraper account as declared in the operator-edited seed file.
///
/// Credential material is either a password (with an optional recovery
/// email) or a pasted cookie string, never both. The account pool turns
/// this into its mutually-exclusive credentials enum at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSeed {
    pub identifier: String,
    pub platform: Platform,
    pub password: Option<String>,
    pub email: Option<String>,
    pub cookies: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccountsFile {
    pub accounts: Vec<AccountSeed>,
}

/// Load and validate the scraper account seed list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_account_seeds(path: &Path) -> Result<Vec<AccountSeed>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::AccountsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let accounts_file: AccountsFile = serde_yaml::from_str(&content)?;

    validate_seeds(&accounts_file.accounts)?;

    Ok(accounts_file.accounts)
}

fn validate_seeds(seeds: &[AccountSeed]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for seed in seeds {
        if seed.identifier.trim().is_empty() {
            return Err(ConfigError::Validation(
                "account identifier must be non-empty".to_string(),
            ));
        }

        if seed.platform == Platform::Linkedin {
            return Err(ConfigError::Validation(format!(
                "account '{}' declares platform 'linkedin'; linkedin uses the session cookie, not the account pool",
                seed.identifier
            )));
        }

        match (&seed.password, &seed.cookies) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Validation(format!(
                    "account '{}' declares both a password and cookies; pick one",
                    seed.identifier
                )));
            }
            (None, None) => {
                return Err(ConfigError::Validation(format!(
                    "account '{}' declares neither a password nor cookies",
                    seed.identifier
                )));
            }
            _ => {}
        }

        if seed.password.is_none() && seed.email.is_some() {
            return Err(ConfigError::Validation(format!(
                "account '{}' declares a recovery email without a password",
                seed.identifier
            )));
        }

        if !seen.insert((seed.platform, seed.identifier.to_lowercase())) {
            return Err(ConfigError::Validation(format!(
                "duplicate account identifier: '{}'",
                seed.identifier
            )));
        }
    }

    Ok(())
}
