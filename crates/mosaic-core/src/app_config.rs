use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    /// LinkedIn `li_at` session cookie value. `None` when not configured;
    /// the LinkedIn client then fails with an auth error on first use.
    pub linkedin_cookie: Option<String>,
    /// YAML seed file listing the feed-platform scraper accounts.
    pub accounts_path: PathBuf,
    /// JSON file the account pool persists its runtime state to.
    pub store_path: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "linkedin_cookie",
                &self.linkedin_cookie.as_ref().map(|_| "[redacted]"),
            )
            .field("accounts_path", &self.accounts_path)
            .field("store_path", &self.store_path)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
