//! Lookups against the configuration store.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{Analysis, ApiKey, Area, Iz, IzAnalysis};
use crate::Result;

/// Read-only access to the configuration records a report request needs.
///
/// Every lookup returns `Ok(None)` when the record is absent; `Err` is reserved
/// for failures of the store itself.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn area_by_name(&self, name: &str) -> Result<Option<Area>>;

    async fn iz_by_code(&self, code: &str) -> Result<Option<Iz>>;

    async fn analysis_by_name(&self, name: &str) -> Result<Option<Analysis>>;

    /// Path of `analysis` within `iz`.
    async fn iz_analysis(&self, iz: &Iz, analysis: &Analysis) -> Result<Option<IzAnalysis>>;

    /// Read-only key for `area` in `iz`.
    async fn read_only_api_key(&self, area: &Area, iz: &Iz) -> Result<Option<ApiKey>>;
}

/// [`ConfigStore`] backed by the Barcode Check Postgres database.
#[derive(Clone)]
pub struct PgConfigStore {
    pool: PgPool,
}

impl PgConfigStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigStore for PgConfigStore {
    async fn area_by_name(&self, name: &str) -> Result<Option<Area>> {
        let area = sqlx::query_as::<_, Area>("SELECT id, name FROM area WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(area)
    }

    async fn iz_by_code(&self, code: &str) -> Result<Option<Iz>> {
        let iz = sqlx::query_as::<_, Iz>("SELECT id, code FROM iz WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(iz)
    }

    async fn analysis_by_name(&self, name: &str) -> Result<Option<Analysis>> {
        let analysis =
            sqlx::query_as::<_, Analysis>("SELECT id, name FROM analysis WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(analysis)
    }

    async fn iz_analysis(&self, iz: &Iz, analysis: &Analysis) -> Result<Option<IzAnalysis>> {
        let iz_analysis = sqlx::query_as::<_, IzAnalysis>(
            r#"
            SELECT iz_id, analysis_id, path
            FROM izanalysis
            WHERE iz_id = $1 AND analysis_id = $2
            "#,
        )
        .bind(iz.id)
        .bind(analysis.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(iz_analysis)
    }

    async fn read_only_api_key(&self, area: &Area, iz: &Iz) -> Result<Option<ApiKey>> {
        let apikey = sqlx::query_as::<_, ApiKey>(
            r#"
            SELECT area_id, iz_id, apikey, rw
            FROM apikey
            WHERE area_id = $1 AND iz_id = $2 AND rw = FALSE
            LIMIT 1
            "#,
        )
        .bind(area.id)
        .bind(iz.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(apikey)
    }
}
