//! Transport and envelope failures of the admin REST surface

use std::time::Duration;

/// Why a call to the admin backend did not produce a payload.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx answer. `body` is kept verbatim for the log.
    #[error("backend answered HTTP {status}")]
    Status { status: u16, body: String },

    /// 2xx answer whose envelope has `success: false`.
    #[error("backend rejected request: {message}")]
    Rejected { message: String },

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no answer within {0:?}")]
    TimedOut(Duration),

    #[error("bad backend url '{url}': {reason}")]
    BadUrl { url: String, reason: String },

    /// The body was not the JSON shape the endpoint promises.
    #[error("undecodable response: {reason}")]
    Decode { reason: String, body: Option<String> },
}

impl ApiError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn bad_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::BadUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
            body: None,
        }
    }

    /// Decode failure that keeps the offending body around.
    pub fn decode_body(reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
            body: Some(body.into()),
        }
    }

    /// HTTP status of a [`ApiError::Status`] failure.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body, when one was read.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            Self::Decode { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Whether the same request may succeed if issued again.
    ///
    /// A rejected envelope is a business answer and never transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Transport(_) | Self::TimedOut(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        assert!(ApiError::status(503, "").is_transient());
        assert!(ApiError::status(429, "").is_transient());
        assert!(!ApiError::status(404, "").is_transient());
        assert!(!ApiError::rejected("name required").is_transient());
    }

    #[test]
    fn test_body_is_kept() {
        let err = ApiError::decode_body("expected value", "<html>");
        assert_eq!(err.body(), Some("<html>"));
        assert_eq!(err.http_status(), None);
        assert_eq!(ApiError::status(500, "boom").http_status(), Some(500));
    }
}
