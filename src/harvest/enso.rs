//! Scrapes the CPC Oceanic Niño Index table and classifies every month of it.

use crate::classify::classifier::classify;
use crate::harvest::error::HarvestError;
use crate::harvest::http::get_text;
use crate::types::enso::{ClassificationResult, SeasonalRow, WindowCode};
use log::{debug, info, warn};
use regex::Regex;
use reqwest::Client;

/// Fetches the ONI page at `url` and returns one result per classifiable month.
///
/// Months that cannot be classified (a missing window, typically the trailing months
/// of the current year) are logged and left out.
pub async fn harvest_enso(
    client: &Client,
    url: &str,
) -> Result<Vec<ClassificationResult>, HarvestError> {
    info!("Fetching ONI table from {}", url);
    let html = get_text(client, url).await?;
    let rows = parse_oni_table(&html, url)?;
    info!("Parsed {} ONI years", rows.len());

    let mut results = Vec::with_capacity(rows.len() * 12);
    for outcome in classify(&rows) {
        match outcome {
            Ok(result) => {
                debug!(
                    "{} {}: {} {}",
                    result.year, result.month, result.phenomenon, result.intensity
                );
                results.push(result);
            }
            Err(e) => warn!("Skipping month: {}", e),
        }
    }
    Ok(results)
}

/// Extracts one [`SeasonalRow`] per table row whose first cell is a four-digit year.
///
/// Cells after the year are read positionally, DJF through NDJ. Empty or non-numeric
/// cells leave the window absent. Repeated `Year` header rows are skipped.
pub fn parse_oni_table(html: &str, url: &str) -> Result<Vec<SeasonalRow>, HarvestError> {
    let row_start = Regex::new(r"(?i)<tr\b")?;
    let cell = Regex::new(r"(?is)<t[dh]\b[^>]*>(.*?)</t[dh]>")?;
    let tag = Regex::new(r"(?s)<[^>]*>")?;

    let mut rows = Vec::new();
    // The first segment precedes any <tr> and holds no row
    for segment in row_start.split(html).skip(1) {
        let cells: Vec<String> = cell
            .captures_iter(segment)
            .map(|c| {
                tag.replace_all(&c[1], "")
                    .replace("&nbsp;", " ")
                    .trim()
                    .to_string()
            })
            .collect();

        let Some(first) = cells.first() else {
            continue;
        };
        if first.eq_ignore_ascii_case("year") {
            continue;
        }
        let Some(year) = parse_year(first) else {
            continue;
        };

        let mut row = SeasonalRow::new(year);
        for (window, raw) in WindowCode::ALL.into_iter().zip(cells.iter().skip(1)) {
            match raw.parse::<f64>() {
                Ok(value) => row.insert(window, value),
                Err(_) if raw.is_empty() => {}
                Err(_) => debug!("{} {}: ignoring non-numeric cell '{}'", year, window, raw),
            }
        }
        if !row.is_complete() {
            debug!("{}: {} of 12 windows present", year, row.windows.len());
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(HarvestError::TableNotFound(url.to_string()));
    }
    Ok(rows)
}

fn parse_year(cell: &str) -> Option<i32> {
    if cell.len() == 4 && cell.bytes().all(|b| b.is_ascii_digit()) {
        cell.parse().ok()
    } else {
        None
    }
}
