use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item not found: {0}")]
    NotFound(Uuid),

    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("{field}: {message}")]
    Rule { field: &'static str, message: String },

    #[error("Invalid or unrecognized postcode: {0}")]
    UnknownPostcode(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl ItemError {
    /// Shorthand for a business-rule violation on a named field.
    pub fn rule(field: &'static str, message: impl Into<String>) -> Self {
        Self::Rule {
            field,
            message: message.into(),
        }
    }
}

pub type ItemResult<T> = Result<T, ItemError>;

/// Convert ItemError to AppError for standardized error responses
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(id) => AppError::NotFound(format!("Item not found with ID: {}", id)),
            ItemError::Validation(e) => AppError::ValidationError(e),
            ItemError::Rule { field, message } => {
                AppError::UnprocessableEntity(format!("{}: {}", field, message))
            }
            ItemError::UnknownPostcode(postcode) => AppError::UnprocessableEntity(format!(
                "postcode: Invalid or unrecognized postcode '{}'",
                postcode
            )),
            ItemError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        // Convert to AppError for the standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ItemError {
    fn from(err: mongodb::error::Error) -> Self {
        ItemError::Database(err.to_string())
    }
}
