use thiserror::Error;

/// Failure talking to the REST API.
///
/// Every non-2xx response is the same `Http` error; the client does not
/// distinguish validation, authorization, or server failures.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{method} {path} failed with status {status}")]
    Http {
        method: &'static str,
        path: String,
        status: u16,
    },
    #[error("request to {path} could not be sent: {message}")]
    Transport { path: String, message: String },
    #[error("response from {path} is not valid JSON: {message}")]
    Decode { path: String, message: String },
    #[error("Not logged in. Run 'changedesk login <username>' first.")]
    NotAuthenticated,
}

impl ApiError {
    /// HTTP status of the failed response, if one arrived
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message() {
        let err = ApiError::Http { method: "GET", path: "/emergency".to_string(), status: 503 };
        assert_eq!(err.to_string(), "GET /emergency failed with status 503");
        assert_eq!(err.status(), Some(503));
        assert_eq!(ApiError::NotAuthenticated.status(), None);
    }
}
