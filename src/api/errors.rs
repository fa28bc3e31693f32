use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::errors::VantageError;

impl IntoResponse for VantageError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            VantageError::Config(_) | VantageError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            VantageError::NodeNotFound(_) | VantageError::TopologyNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            // The aggregated problem list stays machine-readable so a
            // client can surface every fix at once.
            VantageError::Config(problems) => json!({
                "error": self.to_string(),
                "problems": problems,
            }),
            _ => json!({"error": self.to_string()}),
        };

        (status, Json(body)).into_response()
    }
}
