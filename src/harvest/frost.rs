//! Frost occurrences from the INMET GEADA API, queried one calendar month at a time.

use crate::harvest::error::HarvestError;
use crate::harvest::http::get_json;
use crate::resolve::normalize::title_case;
use crate::resolve::resolver::EntityResolver;
use crate::types::frost::FrostIntensity;
use chrono::{Datelike, Months, NaiveDate};
use futures_util::stream::{self, StreamExt};
use log::{info, warn};
use reqwest::Client;
use serde::{Deserialize, Deserializer};

const OCCURRENCE_DATE_FORMAT: &str = "%d/%m/%Y";

/// First month of the GEADA series: January 2017.
pub fn default_frost_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// One item of a GEADA response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FrostRecord {
    #[serde(rename = "UF", default)]
    pub state: Option<String>,
    #[serde(rename = "NOME", default)]
    pub name: Option<String>,
    #[serde(rename = "DT_MEDICAO")]
    pub measured_on: String,
    /// The minimum temperature as published, number or text.
    #[serde(rename = "TEMP_MIN", default, deserialize_with = "raw_temperature")]
    pub min_temperature: Option<String>,
}

fn raw_temperature<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

/// One output row of the frost harvest.
#[derive(Debug, Clone, PartialEq)]
pub struct FrostRow {
    pub municipality_id: Option<u32>,
    pub state: String,
    pub municipality: String,
    /// `dd/mm/YYYY`
    pub occurrence_date: String,
    pub min_temperature: Option<String>,
    pub intensity: FrostIntensity,
}

impl FrostRow {
    /// Brazilian notation with a decimal comma, `"2,4°C"`, or `"N/A"`.
    pub fn formatted_temperature(&self) -> String {
        match &self.min_temperature {
            Some(raw) => format!("{}°C", raw.replace('.', ",")),
            None => "N/A".to_string(),
        }
    }
}

/// Parses a published temperature, accepting a decimal comma.
pub fn parse_temperature(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
}

/// First and last day of every month from the month of `start` through the month of `end`.
pub fn month_ranges(start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let mut ranges = Vec::new();
    let Some(mut first) = start.with_day(1) else {
        return ranges;
    };
    while first <= end {
        let Some(next) = first.checked_add_months(Months::new(1)) else {
            break;
        };
        let Some(last) = next.pred_opt() else {
            break;
        };
        ranges.push((first, last));
        first = next;
    }
    ranges
}

fn month_url(base: &str, first: NaiveDate, last: NaiveDate) -> String {
    format!(
        "{}/{}/{}/CONVENCIONAL",
        base.trim_end_matches('/'),
        first.format("%Y-%m-%d"),
        last.format("%Y-%m-%d")
    )
}

/// Queries every month from `start` to `end` and resolves each record's municipality.
///
/// A failed month is logged and yields no rows. Rows keep month order.
pub async fn harvest_frost(
    client: &Client,
    base_url: &str,
    resolver: &EntityResolver,
    start: NaiveDate,
    end: NaiveDate,
    max_concurrent: usize,
) -> Result<Vec<FrostRow>, HarvestError> {
    let ranges = month_ranges(start, end);
    info!(
        "Harvesting frost occurrences for {} months starting {}",
        ranges.len(),
        start
    );

    let outcomes: Vec<_> = stream::iter(ranges)
        .map(|(first, last)| async move {
            let url = month_url(base_url, first, last);
            let outcome = get_json::<Option<Vec<serde_json::Value>>>(client, &url).await;
            (first, outcome)
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    let mut rows = Vec::new();
    for (month, outcome) in outcomes {
        match outcome {
            Ok(items) => {
                let records = parse_records(items.unwrap_or_default());
                info!("{}: {} frost records", month.format("%m/%Y"), records.len());
                rows.extend(records.iter().map(|record| build_row(record, resolver)));
            }
            Err(e) => warn!("Skipping {}: {}", month.format("%m/%Y"), e),
        }
    }
    Ok(rows)
}

/// Decodes each item on its own; malformed items are logged and dropped.
fn parse_records(items: Vec<serde_json::Value>) -> Vec<FrostRecord> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<FrostRecord>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed frost record: {}", e);
                None
            }
        })
        .collect()
}

fn build_row(record: &FrostRecord, resolver: &EntityResolver) -> FrostRow {
    let municipality = title_case(record.name.as_deref().unwrap_or("N/A"));
    let occurrence_date = match NaiveDate::parse_from_str(&record.measured_on, "%Y-%m-%d") {
        Ok(date) => date.format(OCCURRENCE_DATE_FORMAT).to_string(),
        Err(_) => {
            warn!("Unexpected measurement date '{}'", record.measured_on);
            record.measured_on.clone()
        }
    };
    let intensity = FrostIntensity::from_min_temperature(
        record.min_temperature.as_deref().and_then(parse_temperature),
    );
    FrostRow {
        municipality_id: resolver.resolve(&municipality).id(),
        state: record.state.clone().unwrap_or_else(|| "N/A".to_string()),
        municipality,
        occurrence_date,
        min_temperature: record.min_temperature.clone(),
        intensity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::tables::ResolverTables;
    use crate::types::entity::CanonicalEntity;

    const GEADA_FIXTURE: &str = r#"[
        { "UF": "RS", "NOME": "SAO JOSE DOS AUSENTES", "DT_MEDICAO": "2021-07-29", "TEMP_MIN": 0.4 },
        { "UF": "PR", "NOME": "GENERAL CARNEIRO", "DT_MEDICAO": "2021-07-30", "TEMP_MIN": "2.4" },
        { "UF": "SC", "NOME": "URUPEMA", "DT_MEDICAO": "2021-07-30", "TEMP_MIN": null },
        { "UF": "SC", "NOME": "SAO JOAQUIM", "DT_MEDICAO": "2021-07-31", "TEMP_MIN": "3,1" }
    ]"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_ranges() {
        let ranges = month_ranges(date(2023, 12, 15), date(2024, 3, 2));
        assert_eq!(
            ranges,
            vec![
                (date(2023, 12, 1), date(2023, 12, 31)),
                (date(2024, 1, 1), date(2024, 1, 31)),
                (date(2024, 2, 1), date(2024, 2, 29)),
                (date(2024, 3, 1), date(2024, 3, 31)),
            ]
        );
        assert!(month_ranges(date(2024, 5, 1), date(2024, 4, 30)).is_empty());
    }

    #[test]
    fn test_month_url() {
        assert_eq!(
            month_url(
                "https://apitempo.inmet.gov.br/geada/",
                date(2017, 2, 1),
                date(2017, 2, 28)
            ),
            "https://apitempo.inmet.gov.br/geada/2017-02-01/2017-02-28/CONVENCIONAL"
        );
    }

    #[test]
    fn test_parse_records() {
        let records: Option<Vec<FrostRecord>> = serde_json::from_str(GEADA_FIXTURE).unwrap();
        let records = records.unwrap();
        assert_eq!(records[0].min_temperature.as_deref(), Some("0.4"));
        assert_eq!(records[1].min_temperature.as_deref(), Some("2.4"));
        assert_eq!(records[2].min_temperature, None);

        let empty: Option<Vec<FrostRecord>> = serde_json::from_str("null").unwrap();
        assert!(empty.is_none());
    }

    #[test]
    fn test_malformed_record_keeps_rest_of_month() {
        let body = r#"[
            { "UF": "RS", "NOME": "BOM JESUS", "DT_MEDICAO": "2022-06-14", "TEMP_MIN": -1.2 },
            { "UF": "RS", "NOME": "VACARIA", "DT_MEDICAO": null, "TEMP_MIN": 0.8 },
            { "UF": "SC", "NOME": "URUBICI", "TEMP_MIN": 1.1 },
            { "UF": "PR", "NOME": "PALMAS", "DT_MEDICAO": "2022-06-15", "TEMP_MIN": "2.9" }
        ]"#;
        let items: Option<Vec<serde_json::Value>> = serde_json::from_str(body).unwrap();
        let records = parse_records(items.unwrap());

        let names: Vec<_> = records.iter().map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec![Some("BOM JESUS"), Some("PALMAS")]);
        assert_eq!(records[0].min_temperature.as_deref(), Some("-1.2"));
        assert_eq!(records[1].measured_on, "2022-06-15");
    }

    #[test]
    fn test_build_rows() {
        let registry = vec![
            CanonicalEntity::new(4318465, "São José dos Ausentes"),
            CanonicalEntity::new(4216503, "São Joaquim"),
        ];
        let resolver = EntityResolver::new(&registry, ResolverTables::empty());
        let records: Vec<FrostRecord> = serde_json::from_str(GEADA_FIXTURE).unwrap();
        let rows: Vec<FrostRow> = records.iter().map(|r| build_row(r, &resolver)).collect();

        assert_eq!(rows[0].municipality, "Sao Jose Dos Ausentes");
        assert_eq!(rows[0].municipality_id, Some(4318465));
        assert_eq!(rows[0].occurrence_date, "29/07/2021");
        assert_eq!(rows[0].formatted_temperature(), "0,4°C");
        assert_eq!(rows[0].intensity, FrostIntensity::Strong);

        assert_eq!(rows[1].municipality_id, None);
        assert_eq!(rows[1].formatted_temperature(), "2,4°C");
        assert_eq!(rows[1].intensity, FrostIntensity::Moderate);

        assert_eq!(rows[2].formatted_temperature(), "N/A");
        assert_eq!(rows[2].intensity, FrostIntensity::Undefined);

        assert_eq!(rows[3].municipality_id, Some(4216503));
        assert_eq!(rows[3].formatted_temperature(), "3,1°C");
        assert_eq!(rows[3].intensity, FrostIntensity::Weak);
    }

    #[test]
    fn test_parse_temperature() {
        assert_eq!(parse_temperature("2,4"), Some(2.4));
        assert_eq!(parse_temperature(" -1.5 "), Some(-1.5));
        assert_eq!(parse_temperature("n/d"), None);
        assert_eq!(parse_temperature("NaN"), None);
    }
}
