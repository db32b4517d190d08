use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

struct Row {
    model: &'static str,
    dataset: &'static str,
    output_len: i64,
    mse: f64,
    mae: f64,
}

/// Round to 3 decimals, the precision result tables are usually quoted at.
fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    // (model, skill factor): lower factor → lower errors
    let models = [("DLinear", 1.05), ("Informer", 1.6), ("PatchTST", 0.95), ("TimesNet", 1.0)];
    // (dataset, base error)
    let datasets = [("ETTh1", 0.38), ("ETTm1", 0.30), ("Weather", 0.17)];
    let output_lens = [96, 192, 336, 720];

    let mut rows = Vec::new();
    for &(dataset, base) in &datasets {
        for &(model, skill) in &models {
            // Leave one combination out so the pivot shows empty cells.
            if model == "Informer" && dataset == "Weather" {
                continue;
            }
            for &ol in &output_lens {
                let horizon = 1.0 + (ol as f64 / 96.0).ln() * 0.12;
                let mse = base * skill * horizon * rng.uniform(0.97, 1.03);
                let mae = mse.sqrt() * 0.9 * rng.uniform(0.98, 1.02);
                rows.push(Row {
                    model,
                    dataset,
                    output_len: ol,
                    mse: round3(mse),
                    mae: round3(mae),
                });
            }
        }
    }
    rows
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("model", DataType::Utf8, false),
        Field::new("dataset", DataType::Utf8, false),
        Field::new("output_len", DataType::Int64, false),
        Field::new("mse", DataType::Float64, false),
        Field::new("mae", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(rows.iter().map(|r| r.model).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.dataset).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.output_len).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.mse).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.mae).collect::<Vec<_>>())),
        ],
    )
    .context("building RecordBatch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(["model", "dataset", "output_len", "mse", "mae"])?;
    for r in rows {
        writer.write_record([
            r.model.to_string(),
            r.dataset.to_string(),
            r.output_len.to_string(),
            r.mse.to_string(),
            r.mae.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_parquet(&rows, "sample_results.parquet")?;
    write_csv(&rows, "sample_results.csv")?;

    log::info!("Generated {} rows", rows.len());
    println!("Wrote {} result rows to sample_results.parquet and sample_results.csv", rows.len());
    Ok(())
}
