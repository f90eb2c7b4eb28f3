use thiserror::Error;

/// Failures talking to the hosted auth and data service.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("invalid service URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BackendError {
    /// True when the service answered and rejected the request, as opposed to
    /// the request never completing.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (400..500).contains(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_rejections() {
        let err = BackendError::Api {
            status: 400,
            message: "Invalid login credentials".to_string(),
        };
        assert!(err.is_rejection());
        assert_eq!(
            err.to_string(),
            "service returned 400: Invalid login credentials"
        );
    }

    #[test]
    fn server_errors_are_not_rejections() {
        let err = BackendError::Api {
            status: 503,
            message: String::new(),
        };
        assert!(!err.is_rejection());
        assert!(!BackendError::Decode("missing user".to_string()).is_rejection());
    }
}
