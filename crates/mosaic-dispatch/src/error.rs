//! The single error shape the embedding layer sees.
//!
//! Every client-specific error kind maps onto one
//! `DispatchError { kind, message }`: a machine-readable kind plus a
//! human-readable message, regardless of source platform. No raw
//! transport or library error crosses this boundary.

use serde::Serialize;
use thiserror::Error;

use mosaic_linkedin::LinkedinError;
use mosaic_social::SocialError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Entity absent upstream; user-correctable, not retried.
    NotFound,
    /// Credential invalid or expired after the bounded internal retry.
    Auth,
    /// Network failure or unexpected upstream status; caller may retry later.
    Transport,
    /// Response shape did not contain what it should have.
    Parse,
    /// No usable pool account; surfaced immediately, no blocking wait.
    PoolExhausted,
    /// Invalid platform/operation pair; rejected before any I/O.
    UnsupportedOperation,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::Auth => write!(f, "auth"),
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::Parse => write!(f, "parse"),
            ErrorKind::PoolExhausted => write!(f, "pool_exhausted"),
            ErrorKind::UnsupportedOperation => write!(f, "unsupported_operation"),
        }
    }
}

#[derive(Debug, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct DispatchError {
    pub kind: ErrorKind,
    pub message: String,
}

impl DispatchError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<LinkedinError> for DispatchError {
    fn from(err: LinkedinError) -> Self {
        let kind = match &err {
            LinkedinError::NotFound { .. } => ErrorKind::NotFound,
            LinkedinError::Auth { .. } => ErrorKind::Auth,
            LinkedinError::Deserialize { .. } => ErrorKind::Parse,
            LinkedinError::Http(_) | LinkedinError::UnexpectedStatus { .. } => {
                ErrorKind::Transport
            }
        };
        Self::new(kind, err.to_string())
    }
}

impl From<SocialError> for DispatchError {
    fn from(err: SocialError) -> Self {
        let kind = match &err {
            SocialError::NotFound { .. } => ErrorKind::NotFound,
            SocialError::AuthExpired { .. } => ErrorKind::Auth,
            SocialError::PoolExhausted => ErrorKind::PoolExhausted,
            SocialError::Deserialize { .. } | SocialError::StoreParse(_) => ErrorKind::Parse,
            SocialError::Http(_)
            | SocialError::UnexpectedStatus { .. }
            | SocialError::RateLimited { .. }
            | SocialError::InvalidBaseUrl { .. }
            | SocialError::StoreIo { .. } => ErrorKind::Transport,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<mosaic_core::ConfigError> for DispatchError {
    fn from(err: mosaic_core::ConfigError) -> Self {
        Self::new(ErrorKind::Parse, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linkedin_not_found_maps_to_not_found() {
        let err = DispatchError::from(LinkedinError::NotFound {
            entity: "profile",
            identifier: "ghost".to_string(),
        });
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("ghost"));
    }

    #[test]
    fn social_pool_exhausted_maps_to_pool_exhausted() {
        let err = DispatchError::from(SocialError::PoolExhausted);
        assert_eq!(err.kind, ErrorKind::PoolExhausted);
        assert!(err.message.contains("no_account_available"));
    }

    #[test]
    fn social_rate_limited_maps_to_transport_with_detail() {
        let err = DispatchError::from(SocialError::RateLimited {
            identifier: "scout1".to_string(),
            retry_after_secs: 120,
        });
        assert_eq!(err.kind, ErrorKind::Transport);
        assert!(err.message.contains("120"));
    }

    #[test]
    fn display_joins_kind_and_message() {
        let err = DispatchError::new(ErrorKind::UnsupportedOperation, "nope");
        assert_eq!(err.to_string(), "unsupported_operation: nope");
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::PoolExhausted).unwrap(),
            "\"pool_exhausted\""
        );
    }
}
