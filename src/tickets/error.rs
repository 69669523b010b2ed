use axum::{response::IntoResponse, Json};

#[derive(Debug, thiserror::Error)]
pub enum TicketsError {
    #[error("Ticket not found: {0}")]
    NotFound(String),
    #[error("No evidence file attached to the report")]
    MissingUpload,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Access gate is locked: {0}")]
    Locked(&'static str),
    #[error("Upload error: {0}")]
    Upload(String),
    #[error("Report rendering failed: {0}")]
    Report(String),
}

impl IntoResponse for TicketsError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MissingUpload | Self::Upload(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Locked(_) => StatusCode::UNAUTHORIZED,
            Self::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.to_string();
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
