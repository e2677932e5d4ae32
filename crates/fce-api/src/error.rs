use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Persistence error: {0:#}")]
    Persistence(#[from] anyhow::Error),
}

impl ApiError {
    pub fn deck_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Deck '{id}'"))
    }

    pub fn card_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Card '{id}'"))
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Persistence(e) => {
                tracing::error!("Failed to persist application state: {e:#}");
                "Failed to save changes".to_string()
            }
            other => other.to_string(),
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::card_not_found("c1").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::deck_not_found("d9").to_string(), "Deck 'd9' not found");
        assert_eq!(
            ApiError::Validation("Deck name cannot be empty".into()).to_string(),
            "Validation error: Deck name cannot be empty"
        );
    }
}
