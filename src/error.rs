use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{message}")]
    ValidationError {
        message: String,
        invalid_ids: Option<Vec<String>>,
        non_existing_ids: Option<Vec<String>>,
    },

    #[error("{0}")]
    NotFoundError(String),

    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("invalid configuration: {0}")]
    ConfigError(String),

    #[error("server error: {0}")]
    ServerError(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            invalid_ids: None,
            non_existing_ids: None,
        }
    }

    pub fn invalid_ids(message: impl Into<String>, ids: Vec<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            invalid_ids: Some(ids),
            non_existing_ids: None,
        }
    }

    pub fn non_existing_ids(message: impl Into<String>, ids: Vec<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            invalid_ids: None,
            non_existing_ids: Some(ids),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFoundError(message.into())
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_existing_ids: Option<Vec<String>>,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError { .. } => StatusCode::BAD_REQUEST,
            Self::NotFoundError(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::ValidationError {
                message,
                invalid_ids,
                non_existing_ids,
            } => ErrorBody {
                message: message.clone(),
                invalid_ids: invalid_ids.clone(),
                non_existing_ids: non_existing_ids.clone(),
            },
            Self::NotFoundError(message) => ErrorBody {
                message: message.clone(),
                invalid_ids: None,
                non_existing_ids: None,
            },
            other => {
                log::error!("request failed: {}", other);
                ErrorBody {
                    message: "Internal server error".into(),
                    invalid_ids: None,
                    non_existing_ids: None,
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
