//! Mapping of application errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{debug, error};

use super::responses::ErrorResponse;
use crate::error::{AppError, ClockError};

fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::Clock(ClockError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
        AppError::Poisoned(_) | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            error!("{}", self);
        } else {
            debug!("rejected request: {}", self);
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
