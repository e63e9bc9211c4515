//! Writes harvested rows to CSV, or to Parquet when the target ends in `.parquet`.

use crate::harvest::error::HarvestError;
use crate::harvest::frost::FrostRow;
use crate::harvest::soil_days::SoilWorkabilityRow;
use crate::types::enso::ClassificationResult;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Rows that can be laid out as a table with fixed, Portuguese column names.
pub trait TabularRows: Sized {
    fn to_frame(rows: &[Self]) -> PolarsResult<DataFrame>;
}

fn municipality_codes<'a>(ids: impl Iterator<Item = &'a Option<u32>>) -> Vec<Option<i64>> {
    ids.map(|id| id.map(i64::from)).collect()
}

impl TabularRows for ClassificationResult {
    fn to_frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        df!(
            "Ano" => rows.iter().map(|r| r.year).collect::<Vec<i32>>(),
            "Mês" => rows.iter().map(|r| r.month.label()).collect::<Vec<&str>>(),
            "Fenômeno" => rows.iter().map(|r| r.phenomenon.label()).collect::<Vec<&str>>(),
            "Intensidade" => rows.iter().map(|r| r.intensity.label()).collect::<Vec<&str>>(),
        )
    }
}

impl TabularRows for SoilWorkabilityRow {
    fn to_frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        df!(
            "Cod. IBGE" => municipality_codes(rows.iter().map(|r| &r.municipality_id)),
            "Probabilidade" => vec![SoilWorkabilityRow::PROBABILITY; rows.len()],
            "Pratica Agricola" => rows.iter().map(|r| r.practice.label()).collect::<Vec<&str>>(),
            "Estação" => rows.iter().map(|r| r.station.as_str()).collect::<Vec<&str>>(),
            "Decêndio" => rows.iter().map(|r| r.ten_day_period.as_str()).collect::<Vec<&str>>(),
            "Mês" => rows.iter().map(|r| r.month.as_str()).collect::<Vec<&str>>(),
            "Dias Aptos" => rows.iter().map(|r| r.suitable_days.as_str()).collect::<Vec<&str>>(),
            "Porcentagem Dias Aptos" => rows.iter().map(|r| r.formatted_share()).collect::<Vec<String>>(),
        )
    }
}

impl TabularRows for FrostRow {
    fn to_frame(rows: &[Self]) -> PolarsResult<DataFrame> {
        df!(
            "Cod. IBGE" => municipality_codes(rows.iter().map(|r| &r.municipality_id)),
            "Uf" => rows.iter().map(|r| r.state.as_str()).collect::<Vec<&str>>(),
            "Município" => rows.iter().map(|r| r.municipality.as_str()).collect::<Vec<&str>>(),
            "Dia de ocorrência" => rows.iter().map(|r| r.occurrence_date.as_str()).collect::<Vec<&str>>(),
            "Temperatura Mínima" => rows.iter().map(|r| r.formatted_temperature()).collect::<Vec<String>>(),
            "Intensidade" => rows.iter().map(|r| r.intensity.label()).collect::<Vec<&str>>(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => OutputFormat::Parquet,
            _ => OutputFormat::Csv,
        }
    }
}

/// Builds the table for `rows` and writes it to `path`, creating parent directories.
pub async fn export<R: TabularRows>(rows: &[R], path: &Path) -> Result<(), HarvestError> {
    let frame = R::to_frame(rows).map_err(HarvestError::FrameBuild)?;
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_frame(frame, &path)).await?
}

fn write_frame(mut frame: DataFrame, path: &Path) -> Result<(), HarvestError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| HarvestError::DirCreation(parent.to_path_buf(), e))?;
    }
    let format = OutputFormat::for_path(path);
    let mut file = File::create(path).map_err(|e| HarvestError::ExportIo(path.to_path_buf(), e))?;
    match format {
        OutputFormat::Csv => CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)
            .map_err(|e| HarvestError::ExportPolars(path.to_path_buf(), e))?,
        OutputFormat::Parquet => {
            ParquetWriter::new(&mut file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut frame)
                .map_err(|e| HarvestError::ExportPolars(path.to_path_buf(), e))?;
        }
    }
    info!(
        "Wrote {} rows ({:?}) to {}",
        frame.height(),
        format,
        path.display()
    );
    Ok(())
}
