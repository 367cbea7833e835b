//! Report request pipeline: validate, resolve, call, transform.

use lambda_http::http::Method;
use lambda_http::{Body, Error, Request, Response};
use serde::Serialize;
use shared::http::{error_response, json_response};
use shared::{Config, ConfigStore, PgConfigStore};
use std::sync::Arc;
use tracing::{info, warn};

use crate::client::{AnalyticsClient, ReportSource};
use crate::payload::build_query;
use crate::report::{transform, ReportPage};
use crate::request::parse_request;
use crate::resolver::resolve;

/// Application state shared across requests.
pub struct AppState {
    pub store: Box<dyn ConfigStore>,
    pub source: Box<dyn ReportSource>,
    /// Area whose API keys are used for report calls
    pub area: String,
}

impl AppState {
    /// Build state from the environment: database pool and analytics client.
    pub async fn from_env() -> Result<Self, Error> {
        let config = Config::from_env()?;

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.aws_region.clone()))
            .load()
            .await;
        let secrets_client = aws_sdk_secretsmanager::Client::new(&sdk_config);

        let credentials =
            shared::get_database_credentials(&secrets_client, &config.db_secret_arn).await?;
        let pool = shared::db::create_pool(&config, &credentials).await?;
        let source = AnalyticsClient::new(&config.analytics_api_url, config.analytics_timeout)?;

        info!(
            "Initialized with database {} and analytics endpoint {}",
            config.db_name, config.analytics_api_url
        );

        Ok(Self {
            store: Box::new(PgConfigStore::new(pool)),
            source: Box::new(source),
            area: config.analytics_area,
        })
    }
}

/// Success envelope returned to the caller.
#[derive(Debug, Serialize)]
struct SuccessResponse {
    status: &'static str,
    data: ReportPage,
}

pub async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    match run_report(&state, &event).await {
        Ok(page) => {
            info!("Returning {} rows", page.rows.len());
            json_response(
                200,
                &SuccessResponse {
                    status: "success",
                    data: page,
                },
            )
        }
        Err(e) => {
            warn!("Request failed with {}: {}", e.status_code(), e);
            error_response(&e)
        }
    }
}

async fn run_report(state: &AppState, event: &Request) -> shared::Result<ReportPage> {
    if event.method() != Method::POST {
        return Err(shared::Error::MethodNotAllowed);
    }

    let request = parse_request(event.body())?;
    info!(
        "Report requested: iz={}, analysis={}, resume={}",
        request.iz,
        request.analysis,
        request.resume.is_some()
    );

    let report = resolve(state.store.as_ref(), &state.area, &request).await?;
    let query = build_query(&report, request.resume.as_deref());
    let document = state.source.fetch(&query).await?;

    transform(&document)
}
