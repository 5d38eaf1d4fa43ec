//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API error type
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.into(),
        }
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.into(),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.into(),
        }
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::GATEWAY_TIMEOUT,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "code": self.status.as_u16()
            }
        }));
        (self.status, body).into_response()
    }
}

impl From<manzai_core::Error> for ApiError {
    fn from(err: manzai_core::Error) -> Self {
        use manzai_core::Error;

        let message = err.to_string();
        match err.root() {
            Error::EmptyInput | Error::InvalidClip { .. } => ApiError::unprocessable(message),
            Error::HttpError(e) if e.is_timeout() => ApiError::timeout(message),
            Error::HttpError(e) if e.is_connect() => ApiError::unavailable(message),
            Error::EngineStatus { .. } | Error::ClipDecode { .. } | Error::HttpError(_) => {
                ApiError::bad_gateway(message)
            }
            _ => ApiError::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manzai_core::Error;

    #[test]
    fn test_core_errors_map_to_statuses() {
        let status = |err: Error| ApiError::from(err).status;

        assert_eq!(status(Error::EmptyInput), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status(Error::InvalidClip {
                index: 0,
                reason: "blank".to_string()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(
                Error::EngineStatus {
                    endpoint: "synthesis",
                    status: 500
                }
                .for_clip(2)
            ),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(Error::ClipDecode {
                index: 1,
                reason: "not a wav".to_string()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(Error::AudioError("oops".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_clip_index_survives_in_message() {
        let err = ApiError::from(
            Error::EngineStatus {
                endpoint: "audio_query",
                status: 503,
            }
            .for_clip(3),
        );
        assert!(err.message.contains("Clip 3"));
        assert!(err.message.contains("audio_query"));
    }
}
