mod agroclima;
mod classify;
mod config;
mod error;
mod harvest;
mod registry;
mod resolve;
mod sink;
mod types;
mod utils;

pub use agroclima::Agroclima;
pub use config::{ConfigError, Endpoints, HarvestConfig};
pub use error::AgroclimaError;

pub use classify::classifier::{classify, classify_anomaly, classify_month, month_mean, Classifications};
pub use classify::error::{ClassificationError, IncompleteCause};
pub use classify::month_windows::month_windows;

pub use resolve::normalize::{normalize_name, title_case};
pub use resolve::resolver::{resolve, strip_station_suffix, EntityResolver};
pub use resolve::tables::ResolverTables;

pub use types::entity::{CanonicalEntity, Resolution, ResolutionTier};
pub use types::enso::{
    CalendarMonth, ClassificationResult, Intensity, Phenomenon, SeasonalRow, WindowCode,
};
pub use types::frost::FrostIntensity;
pub use types::practice::AgriculturalPractice;

pub use harvest::enso::{harvest_enso, parse_oni_table};
pub use harvest::error::HarvestError;
pub use harvest::frost::{FrostRecord, FrostRow};
pub use harvest::historical::{extract_archive, find_archive_links, ArchiveLink};
pub use harvest::soil_days::{InmetStation, SoilWorkabilityRow, WorkabilityEntry};
pub use registry::error::RegistryError;
pub use registry::registry_loader::{load_registry, parse_registry};
pub use sink::{export, TabularRows};
