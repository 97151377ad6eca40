use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Storage failure surfaced to the client: 500 with the raw message as a
/// plain-text body. No error taxonomy, no sanitization.
#[derive(Debug)]
pub struct ApiError(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.0).into_response()
    }
}
