//! Loading case tables from CSV and Parquet files via polars

use polars::prelude::*;
use std::path::Path;

use crate::data::table::{CaseTable, Value};
use crate::error::{ChartError, Result};

/// Load a case table from a file (CSV or Parquet).
pub fn load_table(path: &Path) -> Result<CaseTable> {
    profiling::scope!("load_table");

    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ChartError::UnsupportedFormat {
            extension: "<none>".to_string(),
        })?;

    let df = match extension.to_lowercase().as_str() {
        "parquet" => LazyFrame::scan_parquet(path, Default::default())?,
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .with_try_parse_dates(true)
            .finish()?,
        ext => {
            return Err(ChartError::UnsupportedFormat {
                extension: ext.to_string(),
            });
        }
    }
    .collect()?;

    from_dataframe(&df)
}

/// Convert a materialized DataFrame into a case table.
pub fn from_dataframe(df: &DataFrame) -> Result<CaseTable> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut columns = Vec::with_capacity(names.len());
    for name in &names {
        let series = df
            .column(name)
            .map_err(|_| ChartError::ColumnNotFound {
                column: name.clone(),
            })?
            .as_materialized_series()
            .clone();
        columns.push(series_values(&series));
    }

    CaseTable::from_columns(names, columns)
}

/// Convert one series to value cells.
/// Numeric values stay numeric; datetime/date columns are converted to
/// Unix timestamps (seconds since epoch); nulls and empty strings become
/// missing values.
fn series_values(series: &Series) -> Vec<Value> {
    match series.dtype() {
        DataType::Datetime(_, _) => match series.datetime() {
            Ok(ca) => ca
                .into_iter()
                .map(|opt| {
                    opt.map(|ts| Value::Number(ts as f64 / 1_000_000.0))
                        .unwrap_or(Value::Empty)
                })
                .collect(),
            Err(_) => vec![Value::Empty; series.len()],
        },
        DataType::Date => match series.date() {
            Ok(ca) => ca
                .into_iter()
                .map(|opt| {
                    opt.map(|days| Value::Number(days as f64 * 86400.0))
                        .unwrap_or(Value::Empty)
                })
                .collect(),
            Err(_) => vec![Value::Empty; series.len()],
        },
        DataType::String => match series.str() {
            Ok(ca) => ca
                .into_iter()
                .map(|opt| match opt {
                    None | Some("") => Value::Empty,
                    Some(text) => Value::Text(text.to_string()),
                })
                .collect(),
            Err(_) => vec![Value::Empty; series.len()],
        },
        DataType::Boolean => match series.bool() {
            Ok(ca) => ca
                .into_iter()
                .map(|opt| {
                    opt.map(|b| Value::Text(b.to_string()))
                        .unwrap_or(Value::Empty)
                })
                .collect(),
            Err(_) => vec![Value::Empty; series.len()],
        },
        _ => {
            // Numeric dtypes, and anything else that casts cleanly
            match series.cast(&DataType::Float64) {
                Ok(s) => match s.f64() {
                    Ok(ca) => ca
                        .into_iter()
                        .map(|opt| opt.map(Value::Number).unwrap_or(Value::Empty))
                        .collect(),
                    Err(_) => vec![Value::Empty; series.len()],
                },
                Err(_) => {
                    // Last resort: render through strings
                    match series.cast(&DataType::String).and_then(|s| s.str().cloned()) {
                        Ok(ca) => ca
                            .into_iter()
                            .map(|opt| match opt {
                                None | Some("") => Value::Empty,
                                Some(text) => Value::Text(text.to_string()),
                            })
                            .collect(),
                        Err(_) => vec![Value::Empty; series.len()],
                    }
                }
            }
        }
    }
}
