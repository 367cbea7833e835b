//! Resolution of an IZ/analysis pair into a report path and API key.

use shared::{ConfigStore, Error, Result};
use tracing::{error, info};

use crate::request::ReportRequest;

/// Report path and credential for one remote call.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedReport {
    pub path: String,
    pub apikey: String,
}

impl std::fmt::Debug for ResolvedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedReport")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Look up everything needed to call the analytics API for `request`.
///
/// Lookups run in order and stop at the first missing record.
pub async fn resolve<S>(store: &S, area_name: &str, request: &ReportRequest) -> Result<ResolvedReport>
where
    S: ConfigStore + ?Sized,
{
    let Some(area) = store.area_by_name(area_name).await? else {
        error!("Area {} not found", area_name);
        return Err(Error::NotFound("Area not found".to_string()));
    };

    let Some(iz) = store.iz_by_code(&request.iz).await? else {
        error!("IZ {} not found", request.iz);
        return Err(Error::NotFound("IZ not found".to_string()));
    };

    let Some(analysis) = store.analysis_by_name(&request.analysis).await? else {
        error!("Analytics Analysis {} not found", request.analysis);
        return Err(Error::NotFound("Analysis not found".to_string()));
    };

    let Some(iz_analysis) = store.iz_analysis(&iz, &analysis).await? else {
        error!("Analytics Analysis {} for IZ {} not found", analysis.name, iz.code);
        return Err(Error::NotFound("Report path not found".to_string()));
    };

    let Some(apikey) = store.read_only_api_key(&area, &iz).await? else {
        error!("Read-only Analytics API Key not found for {}", iz.code);
        return Err(Error::NotFound("API key not found".to_string()));
    };

    info!("Resolved analysis {} for IZ {} to {}", analysis.name, iz.code, iz_analysis.path);

    Ok(ResolvedReport {
        path: iz_analysis.path,
        apikey: apikey.apikey,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::{Analysis, ApiKey, Area, Iz, IzAnalysis};
    use std::sync::Mutex;

    /// In-memory store holding a single IZ/analysis configuration.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub area: Option<Area>,
        pub iz: Option<Iz>,
        pub analysis: Option<Analysis>,
        pub iz_analysis: Option<IzAnalysis>,
        pub apikey: Option<ApiKey>,
        pub lookups: Mutex<Vec<&'static str>>,
    }

    impl MemoryStore {
        pub(crate) fn complete() -> Self {
            Self {
                area: Some(Area { id: 1, name: "analytics".to_string() }),
                iz: Some(Iz { id: 7, code: "01ABC_INST".to_string() }),
                analysis: Some(Analysis { id: 3, name: "Items".to_string() }),
                iz_analysis: Some(IzAnalysis {
                    iz_id: 7,
                    analysis_id: 3,
                    path: "/shared/ABC University/Reports/Items".to_string(),
                }),
                apikey: Some(ApiKey {
                    area_id: 1,
                    iz_id: 7,
                    apikey: "l8xxread".to_string(),
                    rw: false,
                }),
                lookups: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, lookup: &'static str) {
            self.lookups.lock().unwrap().push(lookup);
        }
    }

    #[async_trait]
    impl ConfigStore for MemoryStore {
        async fn area_by_name(&self, name: &str) -> Result<Option<Area>> {
            self.record("area");
            Ok(self.area.clone().filter(|a| a.name == name))
        }

        async fn iz_by_code(&self, code: &str) -> Result<Option<Iz>> {
            self.record("iz");
            Ok(self.iz.clone().filter(|iz| iz.code == code))
        }

        async fn analysis_by_name(&self, name: &str) -> Result<Option<Analysis>> {
            self.record("analysis");
            Ok(self.analysis.clone().filter(|a| a.name == name))
        }

        async fn iz_analysis(&self, iz: &Iz, analysis: &Analysis) -> Result<Option<IzAnalysis>> {
            self.record("iz_analysis");
            Ok(self
                .iz_analysis
                .clone()
                .filter(|p| p.iz_id == iz.id && p.analysis_id == analysis.id))
        }

        async fn read_only_api_key(&self, area: &Area, iz: &Iz) -> Result<Option<ApiKey>> {
            self.record("apikey");
            Ok(self
                .apikey
                .clone()
                .filter(|k| k.area_id == area.id && k.iz_id == iz.id && !k.rw))
        }
    }

    fn request(iz: &str, analysis: &str) -> ReportRequest {
        ReportRequest {
            iz: iz.to_string(),
            analysis: analysis.to_string(),
            resume: None,
        }
    }

    #[tokio::test]
    async fn test_resolves_path_and_key() {
        let store = MemoryStore::complete();
        let resolved = resolve(&store, "analytics", &request("01ABC_INST", "Items"))
            .await
            .unwrap();

        assert_eq!(resolved.path, "/shared/ABC University/Reports/Items");
        assert_eq!(resolved.apikey, "l8xxread");
        assert_eq!(
            *store.lookups.lock().unwrap(),
            vec!["area", "iz", "analysis", "iz_analysis", "apikey"]
        );
    }

    #[tokio::test]
    async fn test_missing_area() {
        let store = MemoryStore::complete();
        let err = resolve(&store, "bibs", &request("01ABC_INST", "Items"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Area not found");
        assert_eq!(*store.lookups.lock().unwrap(), vec!["area"]);
    }

    #[tokio::test]
    async fn test_unknown_iz_stops_lookups() {
        let store = MemoryStore::complete();
        let err = resolve(&store, "analytics", &request("01XYZ_INST", "Items"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "IZ not found");
        assert_eq!(*store.lookups.lock().unwrap(), vec!["area", "iz"]);
    }

    #[tokio::test]
    async fn test_unknown_analysis() {
        let store = MemoryStore::complete();
        let err = resolve(&store, "analytics", &request("01ABC_INST", "Loans"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Analysis not found");
    }

    #[tokio::test]
    async fn test_missing_path() {
        let store = MemoryStore {
            iz_analysis: None,
            ..MemoryStore::complete()
        };
        let err = resolve(&store, "analytics", &request("01ABC_INST", "Items"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Report path not found");
    }

    #[tokio::test]
    async fn test_write_key_is_not_used() {
        let mut store = MemoryStore::complete();
        if let Some(key) = store.apikey.as_mut() {
            key.rw = true;
        }
        let err = resolve(&store, "analytics", &request("01ABC_INST", "Items"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "API key not found");
    }
}
