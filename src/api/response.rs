//! JSON responses
//!
//! Payloads are encoded up front so an encoding failure becomes a plain
//! 500 instead of a half-written body.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::api::error::ApiResult;

/// Encode `payload` as a 200 `application/json` response
pub fn json_response<T: Serialize + ?Sized>(payload: &T) -> ApiResult<Response> {
    let body = serde_json::to_vec(payload)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}
