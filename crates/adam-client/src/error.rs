use thiserror::Error;

/// Why a request to the scoring service did not produce a result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Connection refused, DNS failure, timeout, broken body stream.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("service returned {status}{}: {message}", code_suffix(.code))]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// A 2xx answer that could not be used: bad JSON, missing or false
    /// `success` flag, missing fields.
    #[error("unusable response: {0}")]
    Payload(String),
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default()
}

impl ClientError {
    /// Service error code (e.g. `FACE_NOT_DETECTED`), when one was sent.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            "timed out"
        } else if e.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        ClientError::Transport(format!("{kind}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_includes_code() {
        let err = ClientError::Status {
            status: 400,
            code: Some("FACE_NOT_DETECTED".into()),
            message: "no face".into(),
        };
        assert_eq!(err.to_string(), "service returned 400 (FACE_NOT_DETECTED): no face");
        assert_eq!(err.code(), Some("FACE_NOT_DETECTED"));
    }

    #[test]
    fn test_status_display_without_code() {
        let err = ClientError::Status {
            status: 502,
            code: None,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "service returned 502: Bad Gateway");
        assert_eq!(err.code(), None);
    }
}
