//! Configuration records read from the Barcode Check database.

/// API area (e.g. `analytics`, `bibs`) that API keys are scoped to.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Area {
    pub id: i32,
    pub name: String,
}

/// Institution zone: an Alma tenant identified by its code.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Iz {
    pub id: i32,
    pub code: String,
}

/// Named analytics report definition.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Analysis {
    pub id: i32,
    pub name: String,
}

/// Report path of an analysis inside a particular IZ.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct IzAnalysis {
    pub iz_id: i32,
    pub analysis_id: i32,
    pub path: String,
}

/// API key for one area of one IZ.
#[derive(Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ApiKey {
    pub area_id: i32,
    pub iz_id: i32,
    pub apikey: String,
    /// Whether the key has write access
    pub rw: bool,
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("area_id", &self.area_id)
            .field("iz_id", &self.iz_id)
            .field("apikey", &"<redacted>")
            .field("rw", &self.rw)
            .finish()
    }
}
