//! Validation of the inbound report request body.

use lambda_http::Body;
use serde_json::Value;
use shared::{Error, Result};
use tracing::error;

/// A validated report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    /// Institution zone code
    pub iz: String,
    /// Analysis name
    pub analysis: String,
    /// Continuation token from a previous page, passed through untouched
    pub resume: Option<String>,
}

/// Parse and validate the request body.
///
/// `iz` and `analysis` must be present and truthy; their contents are not
/// otherwise checked. A falsy `resume` is treated as absent.
pub fn parse_request(body: &Body) -> Result<ReportRequest> {
    let value: Value = serde_json::from_slice(body.as_ref()).map_err(|e| {
        error!("Invalid JSON in request body: {}", e);
        Error::Validation("Invalid JSON in request body".to_string())
    })?;

    let iz = required_field(&value, "iz");
    let analysis = required_field(&value, "analysis");

    let (Some(iz), Some(analysis)) = (iz, analysis) else {
        return Err(Error::Validation(
            "Pass iz, and analysis in the request body".to_string(),
        ));
    };

    let resume = value.get("resume").filter(|v| is_truthy(v)).map(as_text);

    Ok(ReportRequest {
        iz,
        analysis,
        resume,
    })
}

fn required_field(body: &Value, field: &str) -> Option<String> {
    match body.get(field) {
        Some(value) if is_truthy(value) => Some(as_text(value)),
        _ => {
            error!("Missing required parameter {:?} in POST request body", field);
            None
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
