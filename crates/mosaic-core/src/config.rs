use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // Operators paste the cookie straight out of browser devtools, which
    // sometimes includes the cookie name. Strip the "li_at=" prefix so both
    // forms work.
    let linkedin_cookie = lookup("MOSAIC_LINKEDIN_COOKIE")
        .ok()
        .map(|raw| {
            raw.strip_prefix("li_at=")
                .map_or_else(|| raw.clone(), str::to_owned)
        })
        .filter(|c| !c.is_empty());

    let accounts_path = PathBuf::from(or_default(
        "MOSAIC_ACCOUNTS_PATH",
        "./config/accounts.yaml",
    ));
    let store_path = PathBuf::from(or_default("MOSAIC_STORE_PATH", "./data/accounts.json"));
    let log_level = or_default("MOSAIC_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("MOSAIC_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("MOSAIC_USER_AGENT", "mosaic/0.1 (social-aggregation)");

    Ok(AppConfig {
        linkedin_cookie,
        accounts_path,
        store_path,
        log_level,
        request_timeout_secs,
        user_agent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(map: &'a HashMap<&str, &str>) -> impl Fn(&str) -> Result<String, std::env::VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(std::env::VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let map = HashMap::new();
        let config = build_app_config(lookup_from(&map)).unwrap();
        assert!(config.linkedin_cookie.is_none());
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.log_level, "info");
        assert_eq!(
            config.accounts_path.to_str().unwrap(),
            "./config/accounts.yaml"
        );
    }

    #[test]
    fn cookie_prefix_is_stripped() {
        let map = HashMap::from([("MOSAIC_LINKEDIN_COOKIE", "li_at=AQEDAxyz")]);
        let config = build_app_config(lookup_from(&map)).unwrap();
        assert_eq!(config.linkedin_cookie.as_deref(), Some("AQEDAxyz"));
    }

    #[test]
    fn bare_cookie_is_kept_as_is() {
        let map = HashMap::from([("MOSAIC_LINKEDIN_COOKIE", "AQEDAxyz")]);
        let config = build_app_config(lookup_from(&map)).unwrap();
        assert_eq!(config.linkedin_cookie.as_deref(), Some("AQEDAxyz"));
    }

    #[test]
    fn empty_cookie_becomes_none() {
        let map = HashMap::from([("MOSAIC_LINKEDIN_COOKIE", "")]);
        let config = build_app_config(lookup_from(&map)).unwrap();
        assert!(config.linkedin_cookie.is_none());
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let map = HashMap::from([("MOSAIC_REQUEST_TIMEOUT_SECS", "not-a-number")]);
        let err = build_app_config(lookup_from(&map)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar { var, .. } if var == "MOSAIC_REQUEST_TIMEOUT_SECS"
        ));
    }

    #[test]
    fn timeout_override_applies() {
        let map = HashMap::from([("MOSAIC_REQUEST_TIMEOUT_SECS", "10")]);
        let config = build_app_config(lookup_from(&map)).unwrap();
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn debug_redacts_cookie() {
        let map = HashMap::from([("MOSAIC_LINKEDIN_COOKIE", "li_at=secret")]);
        let config = build_app_config(lookup_from(&map)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("[redacted]"));
    }
}
