//! The main entry point: a client that owns the HTTP connection pool, the cached
//! municipality registry and the configuration shared by every harvester.

use crate::config::HarvestConfig;
use crate::error::AgroclimaError;
use crate::harvest::enso::harvest_enso;
use crate::harvest::frost::{default_frost_start, harvest_frost, FrostRow};
use crate::harvest::historical::harvest_historical;
use crate::harvest::soil_days::{default_planting_date, harvest_soil_days, SoilWorkabilityRow};
use crate::registry::registry_loader::load_registry;
use crate::resolve::resolver::EntityResolver;
use crate::resolve::tables::ResolverTables;
use crate::types::enso::ClassificationResult;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::OnceCell;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Harvests ENSO phases, soil workability, frost occurrences and historical archives,
/// tagging records with IBGE municipality codes.
///
/// The municipality registry is loaded lazily on the first harvest that needs it and
/// shared by all later ones.
///
/// # Examples
///
/// ```no_run
/// # use agroclima::{Agroclima, AgroclimaError};
/// # async fn run() -> Result<(), AgroclimaError> {
/// let client = Agroclima::new().await?;
/// let phases = client.enso_phases().await?;
/// println!("{} classified months", phases.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Agroclima {
    config: HarvestConfig,
    cache_dir: PathBuf,
    http: Client,
    tables: ResolverTables,
    resolver: OnceCell<EntityResolver>,
}

#[bon]
impl Agroclima {
    /// Creates a client with the default configuration and cache directory.
    pub async fn new() -> Result<Self, AgroclimaError> {
        Self::with_config(HarvestConfig::default()).await
    }

    /// Creates a client from `config`, creating its cache directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AgroclimaError::CacheDirResolution`] when no cache directory is
    /// configured and the system one cannot be determined, and
    /// [`AgroclimaError::CacheDirCreation`] when it cannot be created.
    pub async fn with_config(config: HarvestConfig) -> Result<Self, AgroclimaError> {
        let cache_dir = match &config.cache_dir {
            Some(dir) => dir.clone(),
            None => get_cache_dir().map_err(AgroclimaError::CacheDirResolution)?,
        };
        ensure_cache_dir_exists(&cache_dir)
            .await
            .map_err(|e| AgroclimaError::CacheDirCreation(cache_dir.clone(), e))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(AgroclimaError::HttpClient)?;

        Ok(Self {
            config,
            cache_dir,
            http,
            tables: ResolverTables::inmet(),
            resolver: OnceCell::new(),
        })
    }

    /// Replaces the alias and override tables used for name resolution.
    pub fn with_tables(mut self, tables: ResolverTables) -> Self {
        self.tables = tables;
        self.resolver = OnceCell::new();
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// The resolver built from the municipality registry, loading the registry on
    /// first use.
    ///
    /// # Errors
    ///
    /// Fails when the registry cannot be loaded or is empty, unless
    /// [`HarvestConfig::allow_empty_registry`] is set, in which case every name goes
    /// through the override table only.
    pub async fn resolver(&self) -> Result<&EntityResolver, AgroclimaError> {
        self.resolver
            .get_or_try_init(|| async {
                let registry = match load_registry(
                    &self.http,
                    &self.config.endpoints.municipalities,
                    &self.cache_dir,
                    self.config.refresh_registry,
                )
                .await
                {
                    Ok(registry) => registry,
                    Err(e) if self.config.allow_empty_registry => {
                        warn!("Continuing with an empty municipality registry: {}", e);
                        Vec::new()
                    }
                    Err(e) => return Err(AgroclimaError::from(e)),
                };

                let resolver = EntityResolver::new(&registry, self.tables.clone());
                for (raw, canonical) in resolver.unreachable_aliases() {
                    warn!("Alias '{}' -> '{}' matches no municipality", raw, canonical);
                }
                info!("Resolver ready with {} municipalities", resolver.len());
                Ok(resolver)
            })
            .await
    }

    /// Monthly ENSO phase and intensity for every year of the ONI table.
    pub async fn enso_phases(&self) -> Result<Vec<ClassificationResult>, AgroclimaError> {
        Ok(harvest_enso(&self.http, &self.config.endpoints.oni_table).await?)
    }

    /// Suitable soil-management days for every SISDAGRO station and practice.
    ///
    /// * `.planting_date(NaiveDate)`: optional, defaults to thirty days ago.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use agroclima::{Agroclima, AgroclimaError};
    /// # use chrono::NaiveDate;
    /// # async fn run() -> Result<(), AgroclimaError> {
    /// let client = Agroclima::new().await?;
    /// let rows = client
    ///     .soil_workability()
    ///     .planting_date(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap())
    ///     .call()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn soil_workability(
        &self,
        planting_date: Option<NaiveDate>,
    ) -> Result<Vec<SoilWorkabilityRow>, AgroclimaError> {
        let planting_date =
            planting_date.unwrap_or_else(|| default_planting_date(Local::now().date_naive()));
        let resolver = self.resolver().await?;
        Ok(harvest_soil_days(
            &self.http,
            &self.config.endpoints.stations,
            &self.config.endpoints.workability,
            resolver,
            planting_date,
            self.config.max_concurrent_requests,
        )
        .await?)
    }

    /// Frost occurrences reported by conventional stations, one request per month.
    ///
    /// * `.start(NaiveDate)`: optional, defaults to 2017-01-01.
    /// * `.end(NaiveDate)`: optional, defaults to today.
    #[builder]
    pub async fn frost_events(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<FrostRow>, AgroclimaError> {
        let start = start.unwrap_or_else(default_frost_start);
        let end = end.unwrap_or_else(|| Local::now().date_naive());
        let resolver = self.resolver().await?;
        Ok(harvest_frost(
            &self.http,
            &self.config.endpoints.frost_api,
            resolver,
            start,
            end,
            self.config.max_concurrent_requests,
        )
        .await?)
    }

    /// Downloads and extracts every yearly station archive into `destination`.
    ///
    /// Returns the directories the archives were extracted into.
    #[builder]
    pub async fn historical_archives(
        &self,
        #[builder(into)] destination: PathBuf,
    ) -> Result<Vec<PathBuf>, AgroclimaError> {
        Ok(harvest_historical(
            &self.http,
            &self.config.endpoints.historical_data,
            &destination,
        )
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on the discard port, so any fetch fails fast.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn offline_config(cache_dir: &Path, allow_empty_registry: bool) -> HarvestConfig {
        let mut config = HarvestConfig::builder()
            .cache_dir(cache_dir)
            .allow_empty_registry(allow_empty_registry)
            .request_timeout_secs(5)
            .build();
        config.endpoints.municipalities = format!("{}/municipios", UNREACHABLE);
        config.endpoints.frost_api = format!("{}/geada", UNREACHABLE);
        config
    }

    #[tokio::test]
    async fn test_creates_configured_cache_dir() -> Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        let cache_dir = root.path().join("cache");
        let client = Agroclima::with_config(offline_config(&cache_dir, false)).await?;
        assert!(cache_dir.is_dir());
        assert_eq!(client.cache_dir(), cache_dir.as_path());
        Ok(())
    }

    #[tokio::test]
    async fn test_registry_failure_is_fatal_by_default() -> Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        let client = Agroclima::with_config(offline_config(root.path(), false)).await?;
        assert!(matches!(
            client.resolver().await,
            Err(AgroclimaError::Registry(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_registry_falls_back_to_overrides() -> Result<(), Box<dyn std::error::Error>>
    {
        let root = tempfile::tempdir()?;
        let client = Agroclima::with_config(offline_config(root.path(), true)).await?;
        let resolver = client.resolver().await?;
        assert!(resolver.is_empty());
        assert_eq!(
            resolver.resolve_station("SANTANA DO LIVRAMENTO (A) - RS").id(),
            Some(430016)
        );
        assert_eq!(resolver.resolve("Curitiba").id(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_custom_tables() -> Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        let client = Agroclima::with_config(offline_config(root.path(), true))
            .await?
            .with_tables(ResolverTables::empty().with_override("Atlantis", 42));
        let resolver = client.resolver().await?;
        assert_eq!(resolver.resolve("Atlantis").id(), Some(42));
        assert_eq!(resolver.resolve("Santana do Livramento").id(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_months_yield_no_rows() -> Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        let client = Agroclima::with_config(offline_config(root.path(), true)).await?;
        let rows = client
            .frost_events()
            .start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .end(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
            .call()
            .await?;
        assert!(rows.is_empty());
        Ok(())
    }
}
