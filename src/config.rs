//! Run configuration: remote endpoints, cache location and request limits.

use bon::Builder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const IBGE_MUNICIPALITIES_URL: &str =
    "https://servicodados.ibge.gov.br/api/v1/localidades/municipios";
pub const ONI_TABLE_URL: &str =
    "https://origin.cpc.ncep.noaa.gov/products/analysis_monitoring/ensostuff/ONI_v5.php";
pub const SISDAGRO_STATIONS_URL: &str =
    "https://sisdagro.inmet.gov.br/sisdagro/app/estacoes/list.json";
pub const SISDAGRO_WORKABILITY_URL: &str =
    "https://sisdagro.inmet.gov.br/sisdagro/app/climatologia/diasaptosmanejosolo/dams.json";
pub const INMET_FROST_API_URL: &str = "https://apitempo.inmet.gov.br/geada";
pub const INMET_HISTORICAL_DATA_URL: &str = "https://portal.inmet.gov.br/dadoshistoricos";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),
}

/// Remote services queried by the harvesters. Override them to point at mirrors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub municipalities: String,
    pub oni_table: String,
    pub stations: String,
    pub workability: String,
    pub frost_api: String,
    pub historical_data: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            municipalities: IBGE_MUNICIPALITIES_URL.to_string(),
            oni_table: ONI_TABLE_URL.to_string(),
            stations: SISDAGRO_STATIONS_URL.to_string(),
            workability: SISDAGRO_WORKABILITY_URL.to_string(),
            frost_api: INMET_FROST_API_URL.to_string(),
            historical_data: INMET_HISTORICAL_DATA_URL.to_string(),
        }
    }
}

/// Settings shared by every harvester.
///
/// # Examples
///
/// ```
/// use agroclima::HarvestConfig;
///
/// let config = HarvestConfig::builder()
///     .cache_dir("/tmp/agroclima")
///     .max_concurrent_requests(4)
///     .build();
/// assert_eq!(config.max_concurrent_requests, 4);
/// assert_eq!(config.request_timeout_secs, 60);
/// assert!(!config.allow_empty_registry);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct HarvestConfig {
    #[builder(default)]
    pub endpoints: Endpoints,
    /// Where the municipality registry is cached. Defaults to the system cache dir.
    #[builder(into)]
    pub cache_dir: Option<PathBuf>,
    /// Upper bound on requests in flight during fan-out harvests.
    #[builder(default = 8)]
    pub max_concurrent_requests: usize,
    #[builder(default = 60)]
    pub request_timeout_secs: u64,
    /// Continue with an empty registry when the IBGE service is unavailable.
    /// Every record then resolves through the override table or stays unresolved.
    #[builder(default)]
    pub allow_empty_registry: bool,
    /// Ignore the on-disk registry cache and fetch it again.
    #[builder(default)]
    pub refresh_registry: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl HarvestConfig {
    /// Loads a JSON config file. Missing fields take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw =
            std::fs::read(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        serde_json::from_slice(&raw).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }
}
