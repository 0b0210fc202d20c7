use thiserror::Error;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{entity} '{identifier}' not found")]
    NotFound {
        entity: &'static str,
        identifier: String,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("provider rejected the session of account '{identifier}'")]
    AuthExpired { identifier: String },

    #[error("account '{identifier}' rate limited (retry after {retry_after_secs}s)")]
    RateLimited {
        identifier: String,
        retry_after_secs: u64,
    },

    #[error("no_account_available: every pool account is failed, locked, or checked out")]
    PoolExhausted,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("credential store I/O error at {path}: {source}")]
    StoreIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("credential store parse error: {0}")]
    StoreParse(#[from] serde_json::Error),
}
