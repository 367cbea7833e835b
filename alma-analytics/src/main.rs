//! Alma Analytics Lambda - Handles the report proxy endpoint.
//!
//! Accepts `{"iz", "analysis", "resume"?}`, looks up the report path and a read-only
//! API key for the institution zone, fetches one page of the report from the Ex Libris
//! analytics API and returns its rows as JSON.

use lambda_http::{run, service_fn, Error};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod client;
mod handler;
mod payload;
mod report;
mod request;
mod resolver;

use handler::{handler, AppState};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::from_env().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
