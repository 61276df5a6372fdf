use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use stockscope_core::{CoreError, ProviderError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Core(err) = &self;
        let status = match err {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            // The provider reported the lookup failure itself (unknown or
            // delisted ticker); everything else is an upstream fault.
            CoreError::Provider(ProviderError::Upstream { .. }) => StatusCode::NOT_FOUND,
            CoreError::Provider(_) => StatusCode::BAD_GATEWAY,
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
