use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{ExperimentRow, RowError};

/// Column order used for both reading and writing.
pub const COLUMNS: [&str; 5] = ["model", "dataset", "output_len", "mse", "mae"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load experiment rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `model,dataset,output_len,mse,mae` (any order)
/// * `.json`    – `[{ "model": "A", "dataset": "D", "output_len": 96, ... }, ...]`
/// * `.parquet` – one column per field, strings and numbers
///
/// Invalid rows are dropped, never reported as errors.
pub fn load_file(path: &Path) -> Result<Vec<ExperimentRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)?
        }
        "csv" => {
            let text = std::fs::read_to_string(path).context("reading CSV file")?;
            parse_csv(&text)
        }
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::info!("Loaded {} experiment rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Build a row from raw text fields, trimming and coercing numbers.
fn row_from_text(fields: [Option<&str>; 5]) -> Result<ExperimentRow, RowError> {
    let [model, dataset, output_len, mse, mae] = fields;
    ExperimentRow::new(
        model.unwrap_or(""),
        dataset.unwrap_or(""),
        parse_number("output_len", output_len)?,
        parse_number("mse", mse)?,
        parse_number("mae", mae)?,
    )
}

fn parse_number(field: &'static str, text: Option<&str>) -> Result<f64, RowError> {
    let text = text.map(str::trim).unwrap_or("");
    if text.is_empty() {
        return Err(RowError::EmptyField(field));
    }
    text.parse::<f64>().map_err(|_| RowError::NotANumber {
        field,
        text: text.to_string(),
    })
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parse delimited text with a header row into validated rows.
///
/// Columns are located by header name, so extra columns and any column order
/// are accepted.  A missing required column simply makes every row invalid.
pub fn parse_csv(text: &str) -> Vec<ExperimentRow> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(|h| h.trim().to_string()).collect(),
        Err(e) => {
            log::warn!("CSV header unreadable: {e}");
            return Vec::new();
        }
    };
    let index: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|col| headers.iter().position(|h| h == *col))
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping CSV record {row_no}: {e}");
                continue;
            }
        };
        let field = |k: usize| index[k].and_then(|idx| record.get(idx));
        match row_from_text([field(0), field(1), field(2), field(3), field(4)]) {
            Ok(row) => rows.push(row),
            Err(e) => log::debug!("Dropping CSV row {row_no}: {e}"),
        }
    }
    rows
}

/// Serialise rows back to CSV with the canonical five columns.
///
/// Every record, header included, is terminated by `\n`.  Numbers use the
/// shortest text that parses back to the same value.
pub fn to_csv(rows: &[ExperimentRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS).context("writing CSV header")?;
    for row in rows {
        writer
            .write_record([
                row.model.clone(),
                row.dataset.clone(),
                row.output_len.to_string(),
                row.mse.to_string(),
                row.mae.to_string(),
            ])
            .context("writing CSV record")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV buffer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "model": "Informer", "dataset": "ETTh1", "output_len": 96, "mse": 0.865, "mae": 0.713 },
///   ...
/// ]
/// ```
///
/// Numeric fields may also be given as numeric strings.
pub fn parse_json(text: &str) -> Result<Vec<ExperimentRow>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            log::warn!("Skipping JSON row {i}: not an object");
            continue;
        };
        match json_row(obj) {
            Ok(row) => rows.push(row),
            Err(e) => log::debug!("Dropping JSON row {i}: {e}"),
        }
    }
    Ok(rows)
}

fn json_row(obj: &serde_json::Map<String, JsonValue>) -> Result<ExperimentRow, RowError> {
    let texts: Vec<Option<String>> = COLUMNS
        .iter()
        .map(|col| obj.get(*col).and_then(json_to_text))
        .collect();
    let field = |k: usize| texts[k].as_deref();
    row_from_text([field(0), field(1), field(2), field(3), field(4)])
}

/// Text of a JSON cell; only `null` counts as missing.  Booleans, arrays and
/// objects keep their JSON text so a numeric field reports them as not a number.
fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing experiment results.
///
/// Expected schema:
/// - `model`, `dataset`: Utf8 or LargeUtf8
/// - `output_len`, `mse`, `mae`: Int32, Int64, Float32 or Float64
///
/// Other columns are ignored.  Null cells invalidate their row.
fn load_parquet(path: &Path) -> Result<Vec<ExperimentRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut cols = Vec::with_capacity(COLUMNS.len());
        for name in COLUMNS {
            let idx = schema
                .index_of(name)
                .map_err(|_| anyhow!("Parquet file missing '{name}' column"))?;
            cols.push(batch.column(idx));
        }

        for row in 0..batch.num_rows() {
            let candidate = match (extract_string(cols[0], row), extract_string(cols[1], row)) {
                (Some(model), Some(dataset)) => ExperimentRow::new(
                    &model,
                    &dataset,
                    extract_f64(cols[2], row).unwrap_or(f64::NAN),
                    extract_f64(cols[3], row).unwrap_or(f64::NAN),
                    extract_f64(cols[4], row).unwrap_or(f64::NAN),
                ),
                (None, _) => Err(RowError::EmptyField("model")),
                (_, None) => Err(RowError::EmptyField("dataset")),
            };
            match candidate {
                Ok(r) => rows.push(r),
                Err(e) => log::debug!("Dropping parquet row {row}: {e}"),
            }
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

/// Read a string cell; `None` for nulls and non-string columns.
fn extract_string(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_any().downcast_ref::<StringArray>()?;
            Some(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

/// Read a numeric cell as `f64`; `None` for nulls and non-numeric columns.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Int32 => Some(any.downcast_ref::<Int32Array>()?.value(row) as f64),
        DataType::Int64 => Some(any.downcast_ref::<Int64Array>()?.value(row) as f64),
        DataType::Float32 => Some(any.downcast_ref::<Float32Array>()?.value(row) as f64),
        DataType::Float64 => Some(any.downcast_ref::<Float64Array>()?.value(row)),
        _ => None,
    }
}
