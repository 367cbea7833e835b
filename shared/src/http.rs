//! HTTP helpers for Lambda functions.

use lambda_http::{Body, Response};
use serde::Serialize;

use crate::Error;

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Body>, lambda_http::Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(data).map_err(Error::Serialization)?))
        .map_err(Box::new)?)
}

/// Create a plain-text response with the given status code and message.
pub fn text_response(status: u16, message: impl Into<String>) -> Result<Response<Body>, lambda_http::Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "text/plain; charset=utf-8")
        .body(Body::from(message.into()))
        .map_err(Box::new)?)
}

/// Render a terminal pipeline error as a plain-text response.
pub fn error_response(error: &Error) -> Result<Response<Body>, lambda_http::Error> {
    text_response(error.status_code(), error.to_string())
}
