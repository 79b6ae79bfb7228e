use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{COUNTRY_COLUMN, HealthDataset, Indicator, Observation, YEAR_COLUMN};

// ---------------------------------------------------------------------------
// Schema errors
// ---------------------------------------------------------------------------

/// The input table is missing one of the required source columns.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a health indicator dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat columns, one row per country-year observation
/// * `.json`    – records orient: `[{ "País": "...", "Ano": 2000, ... }, ...]`
/// * `.csv`     – header row with the source column names
///
/// All formats share the source spreadsheet's column names (`País`, `Ano`,
/// `Expectativa_de_vida`, …). A missing column is fatal; an empty numeric
/// cell loads as NaN and is skipped by aggregations.
pub fn load_file(path: &Path) -> Result<HealthDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<HealthDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    load_csv_reader(file)
}

/// Parse CSV from any reader (file on the normal path, bytes in tests).
fn load_csv_reader<R: Read>(reader: R) -> Result<HealthDataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let country_idx = column_index(&headers, COUNTRY_COLUMN)?;
    let year_idx = column_index(&headers, YEAR_COLUMN)?;
    let mut indicator_idx = Vec::with_capacity(Indicator::ALL.len());
    for ind in Indicator::ALL {
        indicator_idx.push((ind, column_index(&headers, ind.source_column())?));
    }

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let country = record.get(country_idx).unwrap_or("").trim().to_string();
        let year = parse_year(record.get(year_idx).unwrap_or(""), row_no)?;

        let mut obs = blank_observation(country, year);
        for &(ind, col) in &indicator_idx {
            let cell = record.get(col).unwrap_or("");
            let value = parse_numeric_cell(cell, row_no, ind.source_column())?;
            set_indicator(&mut obs, ind, value);
        }
        rows.push(obs);
    }

    Ok(HealthDataset::from_rows(rows))
}

fn column_index(headers: &[String], name: &'static str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| SchemaError::MissingColumn(name).into())
}

fn parse_year(s: &str, row: usize) -> Result<i32> {
    s.trim()
        .parse::<i32>()
        .with_context(|| format!("Row {row}, {YEAR_COLUMN}: '{s}' is not a year"))
}

/// Empty cells are data gaps (NaN); anything else must parse as a float.
fn parse_numeric_cell(s: &str, row: usize, col: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "País": "Brasil",
///     "Ano": 2010,
///     "Expectativa_de_vida": 73.1,
///     "População": 195713635.0,
///     ...
///   },
///   ...
/// ]
/// ```
///
/// `null` indicator cells are data gaps and load as NaN.
fn load_json(path: &Path) -> Result<HealthDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    load_json_str(&text)
}

fn load_json_str(text: &str) -> Result<HealthDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let country = obj
            .get(COUNTRY_COLUMN)
            .ok_or(SchemaError::MissingColumn(COUNTRY_COLUMN))?
            .as_str()
            .with_context(|| format!("Row {i}, {COUNTRY_COLUMN}: not a string"))?
            .to_string();

        let year = obj
            .get(YEAR_COLUMN)
            .ok_or(SchemaError::MissingColumn(YEAR_COLUMN))?
            .as_i64()
            .with_context(|| format!("Row {i}, {YEAR_COLUMN}: not an integer"))?
            as i32;

        let mut obs = blank_observation(country, year);
        for ind in Indicator::ALL {
            let col = ind.source_column();
            let val = obj.get(col).ok_or(SchemaError::MissingColumn(col))?;
            let value = match val {
                JsonValue::Null => f64::NAN,
                JsonValue::Number(n) => n
                    .as_f64()
                    .with_context(|| format!("Row {i}, {col}: not a number"))?,
                other => bail!("Row {i}, {col}: '{other}' is not a number"),
            };
            set_indicator(&mut obs, ind, value);
        }
        rows.push(obs);
    }

    Ok(HealthDataset::from_rows(rows))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet export of the source spreadsheet.
///
/// Expected schema: `País` Utf8, `Ano` Int32/Int64, indicator columns
/// Float64/Float32 (Int widths are accepted and widened). Null cells load
/// as NaN. Works with files written by both **Pandas** (`df.to_parquet()`)
/// and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<HealthDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let n_rows = batch.num_rows();

        let country_col = batch.column(
            schema
                .index_of(COUNTRY_COLUMN)
                .map_err(|_| SchemaError::MissingColumn(COUNTRY_COLUMN))?,
        );
        let year_col = batch.column(
            schema
                .index_of(YEAR_COLUMN)
                .map_err(|_| SchemaError::MissingColumn(YEAR_COLUMN))?,
        );

        let mut indicator_cols = Vec::with_capacity(Indicator::ALL.len());
        for ind in Indicator::ALL {
            let idx = schema
                .index_of(ind.source_column())
                .map_err(|_| SchemaError::MissingColumn(ind.source_column()))?;
            indicator_cols.push((ind, batch.column(idx).clone()));
        }

        for row in 0..n_rows {
            let country = extract_string(country_col, row)
                .with_context(|| format!("Row {row}: failed to read '{COUNTRY_COLUMN}'"))?;
            let year = extract_year(year_col, row)
                .with_context(|| format!("Row {row}: failed to read '{YEAR_COLUMN}'"))?;

            let mut obs = blank_observation(country, year);
            for (ind, col) in &indicator_cols {
                let value = extract_f64(col, row)
                    .with_context(|| format!("Row {row}: failed to read '{}'", ind.source_column()))?;
                set_indicator(&mut obs, *ind, value);
            }
            rows.push(obs);
        }
    }

    Ok(HealthDataset::from_rows(rows))
}

// -- Parquet / Arrow helpers --

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null country name");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            Ok(arr.value(row).to_string())
        }
        other => bail!("Expected Utf8 column, got {other:?}"),
    }
}

fn extract_year(col: &Arc<dyn Array>, row: usize) -> Result<i32> {
    if col.is_null(row) {
        bail!("null year");
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row))
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row) as i32)
        }
        other => bail!("Expected Int32 or Int64 year column, got {other:?}"),
    }
}

/// Extract one numeric cell, widening integer columns and mapping nulls to NaN.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        return Ok(f64::NAN);
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Ok(arr.value(row) as f64)
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row) as f64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row) as f64)
        }
        other => bail!("Expected a numeric column, got {other:?}"),
    }
}

// -- Row construction helpers --

fn blank_observation(country: String, year: i32) -> Observation {
    Observation {
        country,
        year,
        life_expectancy: f64::NAN,
        population: f64::NAN,
        schooling: f64::NAN,
        gdp: f64::NAN,
        measles: f64::NAN,
        hepatitis_b: f64::NAN,
        polio: f64::NAN,
        hiv_aids: f64::NAN,
        income_composition: f64::NAN,
    }
}

fn set_indicator(obs: &mut Observation, ind: Indicator, value: f64) {
    match ind {
        Indicator::LifeExpectancy => obs.life_expectancy = value,
        Indicator::Population => obs.population = value,
        Indicator::Schooling => obs.schooling = value,
        Indicator::Gdp => obs.gdp = value,
        Indicator::Measles => obs.measles = value,
        Indicator::HepatitisB => obs.hepatitis_b = value,
        Indicator::Polio => obs.polio = value,
        Indicator::HivAids => obs.hiv_aids = value,
        Indicator::IncomeComposition => obs.income_composition = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_HEADER: &str = "País,Ano,Expectativa_de_vida,População,Escolaridade,PIB,Sarampo,Hepatite_B,Poliomielite,HIV/AIDS,Composição_de_renda";

    #[test]
    fn csv_happy_path() {
        let csv = format!(
            "{CSV_HEADER}\n\
             Brasil,2010,73.1,195713635,11.0,11286.24,688,96,98,0.1,0.726\n\
             Angola,2010,56.0,23356246,9.3,3529.10,1190,79,80,2.3,0.520\n"
        );
        let ds = load_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.countries, vec!["Angola", "Brasil"]);
        assert_eq!(ds.year_min, 2010);
        assert_eq!(ds.rows[0].country, "Brasil");
        assert_eq!(ds.rows[0].life_expectancy, 73.1);
        assert_eq!(ds.rows[1].measles, 1190.0);
    }

    #[test]
    fn csv_missing_column_is_fatal() {
        // Drop the GDP column entirely.
        let csv = "País,Ano,Expectativa_de_vida,População,Escolaridade,Sarampo,Hepatite_B,Poliomielite,HIV/AIDS,Composição_de_renda\n\
                   Brasil,2010,73.1,195713635,11.0,688,96,98,0.1,0.726\n";
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("PIB"), "unexpected error: {err:#}");
    }

    #[test]
    fn csv_non_numeric_cell_is_fatal() {
        let csv = format!(
            "{CSV_HEADER}\n\
             Brasil,2010,muitos anos,195713635,11.0,11286.24,688,96,98,0.1,0.726\n"
        );
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Expectativa_de_vida"), "unexpected error: {msg}");
    }

    #[test]
    fn csv_empty_cell_loads_as_nan() {
        let csv = format!(
            "{CSV_HEADER}\n\
             Brasil,2010,,195713635,11.0,11286.24,688,96,98,0.1,0.726\n"
        );
        let ds = load_csv_reader(csv.as_bytes()).unwrap();
        assert!(ds.rows[0].life_expectancy.is_nan());
        assert_eq!(ds.rows[0].population, 195713635.0);
    }

    #[test]
    fn csv_bad_year_is_fatal() {
        let csv = format!(
            "{CSV_HEADER}\n\
             Brasil,dois mil,73.1,195713635,11.0,11286.24,688,96,98,0.1,0.726\n"
        );
        assert!(load_csv_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn json_records_happy_path() {
        let json = r#"[
            {"País":"Chile","Ano":2015,"Expectativa_de_vida":79.1,"População":17870124.0,
             "Escolaridade":15.2,"PIB":13574.17,"Sarampo":9,"Hepatite_B":96,
             "Poliomielite":96,"HIV/AIDS":0.1,"Composição_de_renda":0.847}
        ]"#;
        let ds = load_json_str(json).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.rows[0].country, "Chile");
        assert_eq!(ds.rows[0].year, 2015);
        assert_eq!(ds.rows[0].schooling, 15.2);
    }

    #[test]
    fn json_null_cell_loads_as_nan() {
        let json = r#"[
            {"País":"Chile","Ano":2015,"Expectativa_de_vida":null,"População":17870124.0,
             "Escolaridade":15.2,"PIB":13574.17,"Sarampo":9,"Hepatite_B":96,
             "Poliomielite":96,"HIV/AIDS":0.1,"Composição_de_renda":0.847}
        ]"#;
        let ds = load_json_str(json).unwrap();
        assert!(ds.rows[0].life_expectancy.is_nan());
    }

    #[test]
    fn json_missing_column_is_fatal() {
        let json = r#"[{"País":"Chile","Ano":2015}]"#;
        let err = load_json_str(json).unwrap_err();
        assert!(err.to_string().contains("missing required column"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
