//! Query string for the analytics reports API.

use crate::resolver::ResolvedReport;

/// Largest page the reports API will return.
pub const ROW_LIMIT: u32 = 1000;

/// Build the URL-encoded query for one report page.
///
/// `:` and `%` inside values are kept literal because the reports API expects
/// them unescaped in the report path.
pub fn build_query(report: &ResolvedReport, resume: Option<&str>) -> String {
    let limit = ROW_LIMIT.to_string();
    let mut query = [
        ("path", report.path.as_str()),
        ("apikey", report.apikey.as_str()),
        ("limit", limit.as_str()),
        ("col_names", "true"),
    ]
    .iter()
    .map(|(key, value)| format!("{}={}", key, encode_value(value)))
    .collect::<Vec<_>>()
    .join("&");

    if let Some(token) = resume {
        query.push_str("&token=");
        query.push_str(&encode_value(token));
    }

    query
}

/// Form-encode a value, leaving `:` and `%` untouched.
fn encode_value(value: &str) -> String {
    // The encoded string is a run of literal characters and aligned %XX
    // triples, so these replacements never overlap.
    urlencoding::encode(value)
        .replace("%20", "+")
        .replace("%3A", ":")
        .replace("%25", "%")
}
