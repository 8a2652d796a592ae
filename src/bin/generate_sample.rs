use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
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
}

const COUNTRIES: [(&str, &str, f64); 8] = [
    ("Americas", "United States", 1.0),
    ("Americas", "Brazil", 0.6),
    ("Europe", "Russia", 0.9),
    ("Europe", "Norway", 0.1),
    ("Asia Pacific", "China", 1.2),
    ("Asia Pacific", "India", 0.8),
    ("Africa", "Nigeria", 0.4),
    ("Middle East", "Iran", 0.5),
];

/// (source, segment, reason, base kt)
const ACTIVITIES: [(&str, &str, &str, f64); 7] = [
    ("Energy", "Onshore oil", "Vented", 900.0),
    ("Energy", "Offshore gas", "Fugitive", 600.0),
    ("Energy", "Steam coal", "Fugitive", 750.0),
    ("Energy", "", "Flared", 120.0),
    ("Agriculture", "", "Enteric fermentation", 1100.0),
    ("Waste", "", "Landfill", 450.0),
    ("Other", "", "All", 80.0),
];

type Row = [String; 6];

fn build_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();

    for &(region, country, scale) in &COUNTRIES {
        for &(source, segment, reason, base) in &ACTIVITIES {
            let kt = base * scale * (0.5 + rng.next_f64());
            // A few malformed cells exercise the loader's coercion.
            let cell = match rng.next_u64() % 25 {
                0 => "N/A".to_string(),
                1 => String::new(),
                _ => format!("{kt:.2}"),
            };
            rows.push([
                region.to_string(),
                country.to_string(),
                source.to_string(),
                segment.to_string(),
                reason.to_string(),
                cell,
            ]);
        }
    }

    // Pre-aggregated global rows, as published alongside country rows.
    for &(source, segment, reason, base) in &ACTIVITIES {
        rows.push([
            "World".to_string(),
            "World".to_string(),
            source.to_string(),
            segment.to_string(),
            reason.to_string(),
            format!("{:.2}", base * 12.0),
        ]);
    }
    rows.push([
        "World".to_string(),
        "Total".to_string(),
        "Total".to_string(),
        String::new(),
        String::new(),
        "120000.00".to_string(),
    ]);

    rows
}

const HEADERS: [&str; 6] = ["REGION", "COUNTRY", "SOURCES", "SEGMENT", "REASON", "EMISSION (KT)"];

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        HEADERS
            .iter()
            .map(|h| Field::new(*h, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    // Empty cells become nulls.
    let columns: Vec<ArrayRef> = (0..HEADERS.len())
        .map(|col| {
            let values: StringArray = rows
                .iter()
                .map(|row| Some(row[col].as_str()).filter(|s| !s.is_empty()))
                .collect();
            Arc::new(values) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = build_rows(&mut rng);

    let csv_path = Path::new("METHANE TRACKER.csv");
    let parquet_path = Path::new("methane_tracker.parquet");
    write_csv(csv_path, &rows)?;
    write_parquet(parquet_path, &rows)?;

    println!(
        "Wrote {} rows to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
