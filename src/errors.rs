use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential was available and a refresh did not produce one.
    /// The underlying request was never sent.
    #[error("authentication required")]
    AuthRequired,

    /// The server rejected the credential and the follow-up refresh failed.
    #[error("session expired, please log in again")]
    AuthExpired,

    #[error("{detail}")]
    RequestFailed { status: StatusCode, detail: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP-equivalent status for this error, when there is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::AuthRequired | ApiError::AuthExpired => Some(StatusCode::UNAUTHORIZED),
            ApiError::RequestFailed { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Json(_) | ApiError::InvalidRequest(_) => None,
        }
    }

    /// True when the caller should send the user back to the login screen.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::AuthRequired | ApiError::AuthExpired)
            || self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Build a `RequestFailed` from a non-2xx status and its raw body.
    pub fn from_response_body(status: StatusCode, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|v| extract_detail(&v))
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

        ApiError::RequestFailed { status, detail }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"detail": "..."}` and the validation shape
/// `{"detail": [{"msg": "..."}, ...]}`, joining the messages with `; `.
fn extract_detail(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string_is_passed_through() {
        let err = ApiError::from_response_body(StatusCode::NOT_FOUND, br#"{"detail":"Task not found"}"#);
        assert_eq!(err.to_string(), "Task not found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_non_json_body_falls_back_to_generic_message() {
        let err = ApiError::from_response_body(StatusCode::BAD_GATEWAY, b"<html>502</html>");
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[test]
    fn test_json_without_detail_falls_back() {
        let err = ApiError::from_response_body(StatusCode::BAD_REQUEST, br#"{"error":"nope"}"#);
        assert_eq!(err.to_string(), "Request failed with status 400");
    }

    #[test]
    fn test_validation_messages_are_joined() {
        let body = br#"{"detail":[{"loc":["body","title"],"msg":"field required"},{"msg":"too long"}]}"#;
        let err = ApiError::from_response_body(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(err.to_string(), "field required; too long");
    }

    #[test]
    fn test_auth_errors_map_to_401() {
        assert_eq!(ApiError::AuthRequired.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(ApiError::AuthExpired.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(ApiError::AuthExpired.is_auth_error());
        assert!(!ApiError::InvalidRequest("x".into()).is_auth_error());
    }
}
