use axum::response::{IntoResponse, Response};

use crate::Error;

/// The fallback handler for requests that do not match any route.
pub async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
