use axum::{
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Upper bound on request bodies accepted by [`Json`].
const MAX_BODY_BYTES: usize = 64 * 1024;

/// JSON extractor whose rejections use the crate's error body.
///
/// Malformed JSON and missing required fields are a 400.
///
/// ```rust,ignore
/// async fn create_link(Json(payload): Json<NewLink>) -> impl IntoResponse {
///     // payload is deserialized from request body
/// }
/// ```
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read body: {}", e)))?;

        let value: T = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::Validation(format!("Invalid JSON: {}", e)))?;

        Ok(Json(value))
    }
}

impl<T: serde::Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
