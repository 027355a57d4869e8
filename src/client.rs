//! Typed client for the `/api` endpoints with a tag-invalidated query cache.

pub mod api;
pub mod cache;

use thiserror::Error as ThisError;

use crate::error::ErrorBody;

#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("server answered {status}: {message}")]
    ApiError { status: u16, message: String, body: Option<ErrorBody> },

    #[error("quiz is incomplete: {answered} of {total} questions answered")]
    IncompleteError { answered: usize, total: usize },

    #[error("query cache lock poisoned")]
    CacheError,
}
