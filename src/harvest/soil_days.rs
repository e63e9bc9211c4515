//! SISDAGRO "dias aptos para manejo do solo": per station and practice, the share of
//! days in each decêndio on which the soil can be worked.

use crate::harvest::error::HarvestError;
use crate::harvest::http::{get_json, post_form_json};
use crate::resolve::resolver::EntityResolver;
use crate::types::entity::Resolution;
use crate::types::practice::AgriculturalPractice;
use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PLANTING_DATE_FORMAT: &str = "%d/%m/%Y";

/// A station as listed by SISDAGRO.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InmetStation {
    #[serde(rename = "codigoStr")]
    pub code: String,
    #[serde(rename = "nome")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct StationList {
    estacoes: Vec<InmetStation>,
}

/// A value the service sends either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Number(n) => write!(f, "{}", n),
            Label::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One `bhc` entry of a workability response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorkabilityEntry {
    #[serde(rename = "decendio")]
    pub ten_day_period: Label,
    #[serde(rename = "mes")]
    pub month: Label,
    #[serde(rename = "posicaoDia")]
    pub suitable_days: Label,
    #[serde(rename = "valorDia")]
    pub suitable_share: f64,
}

#[derive(Debug, Deserialize)]
struct WorkabilityResponse {
    #[serde(default)]
    bhc: Vec<WorkabilityEntry>,
}

// Crop, soil and water capacity are left blank to get the station's annual series.
#[derive(Debug, Serialize)]
struct WorkabilityForm<'a> {
    #[serde(rename = "dataPlantio")]
    planting_date: &'a str,
    #[serde(rename = "probabilidade")]
    probability: &'static str,
    #[serde(rename = "praticaAgricola")]
    practice: &'static str,
    #[serde(rename = "dataInicial")]
    start_date: &'static str,
    #[serde(rename = "culturaId")]
    crop_id: &'static str,
    #[serde(rename = "estacaoId")]
    station_id: &'a str,
    #[serde(rename = "soloId")]
    soil_id: &'static str,
    cad: &'static str,
}

impl<'a> WorkabilityForm<'a> {
    fn new(planting_date: &'a str, practice: AgriculturalPractice, station_id: &'a str) -> Self {
        Self {
            planting_date,
            probability: "1",
            practice: practice.form_code(),
            start_date: "Selecione",
            crop_id: "",
            station_id,
            soil_id: "",
            cad: "",
        }
    }
}

/// One output row of the soil-workability harvest.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilWorkabilityRow {
    pub municipality_id: Option<u32>,
    pub practice: AgriculturalPractice,
    pub station: String,
    pub ten_day_period: String,
    pub month: String,
    pub suitable_days: String,
    /// Percentage of suitable days, 0 to 100.
    pub suitable_share: f64,
}

impl SoilWorkabilityRow {
    /// The only probability level requested from the service.
    pub const PROBABILITY: &'static str = "Anual";

    pub fn formatted_share(&self) -> String {
        format!("{:.2}%", self.suitable_share)
    }
}

/// Default planting date: thirty days before `today`.
pub fn default_planting_date(today: NaiveDate) -> NaiveDate {
    today - chrono::Duration::days(30)
}

/// Harvests every station × practice combination.
///
/// A failure to list the stations is fatal. A failed station/practice request is
/// logged and contributes no rows. At most `max_concurrent` requests are in flight,
/// and rows come back in station order, then practice order.
pub async fn harvest_soil_days(
    client: &Client,
    stations_url: &str,
    workability_url: &str,
    resolver: &EntityResolver,
    planting_date: NaiveDate,
    max_concurrent: usize,
) -> Result<Vec<SoilWorkabilityRow>, HarvestError> {
    let planting_date = planting_date.format(PLANTING_DATE_FORMAT).to_string();
    info!("Harvesting soil workability with planting date {}", planting_date);

    let stations = fetch_stations(client, stations_url).await?;
    info!("{} stations listed", stations.len());

    let jobs = plan_jobs(&stations, resolver);

    let planting_date = planting_date.as_str();
    let outcomes: Vec<_> = stream::iter(jobs)
        .map(|(station, resolution, practice)| async move {
            let form = WorkabilityForm::new(planting_date, practice, &station.code);
            let outcome = post_form_json::<_, WorkabilityResponse>(client, workability_url, &form)
                .await
                .map(|response| response.bhc);
            (station, resolution, practice, outcome)
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    let mut rows = Vec::new();
    for (station, resolution, practice, outcome) in outcomes {
        match outcome {
            Ok(entries) => {
                rows.extend(build_rows(station, resolution, practice, &entries));
            }
            Err(e) => warn!(
                "Skipping station '{}' ({}), practice '{}': {}",
                station.name, station.code, practice, e
            ),
        }
    }
    info!("Collected {} soil workability rows", rows.len());
    Ok(rows)
}

/// One job per station and practice, in station order. Each station is resolved once
/// and its resolution shared by its practices.
fn plan_jobs<'a>(
    stations: &'a [InmetStation],
    resolver: &EntityResolver,
) -> Vec<(&'a InmetStation, Resolution, AgriculturalPractice)> {
    stations
        .iter()
        .flat_map(|station| {
            let resolution = resolver.resolve_station(&station.name);
            if !resolution.is_resolved() {
                debug!("Station '{}' has no municipality code", station.name);
            }
            AgriculturalPractice::ALL.map(|practice| (station, resolution, practice))
        })
        .collect()
}

async fn fetch_stations(client: &Client, url: &str) -> Result<Vec<InmetStation>, HarvestError> {
    let list: StationList = get_json(client, url).await?;
    Ok(list.estacoes)
}

fn build_rows(
    station: &InmetStation,
    resolution: Resolution,
    practice: AgriculturalPractice,
    entries: &[WorkabilityEntry],
) -> Vec<SoilWorkabilityRow> {
    entries
        .iter()
        .map(|entry| SoilWorkabilityRow {
            municipality_id: resolution.id(),
            practice,
            station: station.name.clone(),
            ten_day_period: entry.ten_day_period.to_string(),
            month: entry.month.to_string(),
            suitable_days: entry.suitable_days.to_string(),
            suitable_share: entry.suitable_share,
        })
        .collect()
}
