use std::io::Read;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::LoadError;
use super::model::{Dataset, Dimension, Record, EMISSION_COLUMN};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the emission table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row + one record per line (recommended)
/// * `.json`    – `[{ "REGION": ..., "COUNTRY": ..., "EMISSION (KT)": ... }, ...]`
/// * `.parquet` – flat columns; any Arrow type is read through its text form
/// * `.xlsx`    – first worksheet, header in the first row (also `.xls`)
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => read_csv(std::fs::File::open(path)?)?,
        "json" => read_json(&std::fs::read_to_string(path)?)?,
        "parquet" | "pq" => load_parquet(path)?,
        "xlsx" | "xls" => load_workbook(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} records from {}",
        dataset.len(),
        path.display()
    );
    if dataset.coerced_cells() > 0 {
        log::warn!(
            "{} '{EMISSION_COLUMN}' cells were not numeric and are treated as missing",
            dataset.coerced_cells()
        );
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Read an emission cell. Anything that is not a plain finite number
/// (`"N/A"`, `"12,500"`, `"NaN"`, empty) becomes `None`.
pub fn coerce_emission(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn dimension_cell(cell: &str) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

/// Builds records from raw text cells and counts failed coercions.
#[derive(Default)]
struct RecordSink {
    records: Vec<Record>,
    coerced: usize,
}

impl RecordSink {
    /// `dims` follows [`Dimension::ALL`] order.
    fn push(&mut self, dims: [Option<String>; 5], emission: Option<&str>) {
        let emission_kt = emission.and_then(|cell| {
            let value = coerce_emission(cell);
            if value.is_none() && !cell.trim().is_empty() {
                log::debug!("Non-numeric emission cell {cell:?} treated as missing");
                self.coerced += 1;
            }
            value
        });
        let [region, country, source, segment, reason] = dims;
        self.records.push(Record {
            region,
            country,
            source,
            segment,
            reason,
            emission_kt,
        });
    }

    fn finish(self) -> Dataset {
        Dataset::new(self.records, self.coerced)
    }
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Positions of the six required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    dimensions: [usize; 5],
    emission: usize,
}

fn header_matches(header: &str, expected: &str) -> bool {
    header.trim().eq_ignore_ascii_case(expected)
}

impl ColumnMap {
    /// Match headers (whitespace-trimmed, ASCII case-insensitive) against
    /// the expected column names.
    pub fn resolve<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Self, LoadError> {
        let headers: Vec<&str> = headers.into_iter().collect();
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| header_matches(h, name))
                .ok_or(LoadError::MissingColumn(name))
        };

        let mut dimensions = [0usize; 5];
        for (slot, dim) in dimensions.iter_mut().zip(Dimension::ALL) {
            *slot = find(dim.column())?;
        }
        let emission = find(EMISSION_COLUMN)?;

        Ok(ColumnMap {
            dimensions,
            emission,
        })
    }

    pub fn dimension(&self, dim: Dimension) -> usize {
        self.dimensions[dim as usize]
    }

    pub fn emission(&self) -> usize {
        self.emission
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV text with a header row. Extra columns are ignored.
pub fn read_csv<R: Read>(input: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(input);
    let columns = ColumnMap::resolve(reader.headers()?.iter())?;
    log::debug!("CSV column map: {columns:?}");

    let mut sink = RecordSink::default();
    for result in reader.records() {
        let row = result?;
        let cell = |idx: usize| row.get(idx).unwrap_or("");
        let dims = Dimension::ALL.map(|d| dimension_cell(cell(columns.dimension(d))));
        sink.push(dims, Some(cell(columns.emission())));
    }

    Ok(sink.finish())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "REGION": "Europe", "COUNTRY": "France", "SOURCES": "Energy",
///     "SEGMENT": "Gas", "REASON": "Vented", "EMISSION (KT)": 12.5 },
///   ...
/// ]
/// ```
pub fn read_json(text: &str) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Layout("expected top-level JSON array".into()))?;

    let mut sink = RecordSink::default();
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| LoadError::Malformed {
            row: i,
            message: "not a JSON object".into(),
        })?;

        let mut dims: [Option<String>; 5] = Default::default();
        for (slot, dim) in dims.iter_mut().zip(Dimension::ALL) {
            *slot = json_field(obj, dim.column())?.and_then(json_to_text);
        }
        let emission = json_field(obj, EMISSION_COLUMN)?.and_then(json_to_text);
        sink.push(dims, Some(emission.as_deref().unwrap_or("")));
    }

    Ok(sink.finish())
}

fn json_field<'a>(
    obj: &'a Map<String, JsonValue>,
    name: &'static str,
) -> Result<Option<&'a JsonValue>, LoadError> {
    obj.iter()
        .find(|(key, _)| header_matches(key, name))
        .map(|(_, v)| Some(v))
        .ok_or(LoadError::MissingColumn(name))
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => dimension_cell(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let columns = ColumnMap::resolve(
        builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str()),
    )?;
    let reader = builder.build()?;

    let mut sink = RecordSink::default();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let text = |idx: usize| -> Result<Option<String>, LoadError> {
                let col = batch.column(idx);
                if col.is_null(row) {
                    return Ok(None);
                }
                Ok(Some(array_value_to_string(col.as_ref(), row)?))
            };

            let mut dims: [Option<String>; 5] = Default::default();
            for (slot, dim) in dims.iter_mut().zip(Dimension::ALL) {
                *slot = text(columns.dimension(dim))?.and_then(|s| dimension_cell(&s));
            }
            let emission = text(columns.emission())?;
            sink.push(dims, emission.as_deref());
        }
    }

    Ok(sink.finish())
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// Load the first worksheet of an Excel workbook. Its first row holds the
/// headers; blank rows below it are skipped.
fn load_workbook(path: &Path) -> Result<Dataset, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Layout("workbook has no worksheets".into()))??;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| LoadError::Layout("worksheet is empty".into()))?
        .iter()
        .map(|c| cell_text(c).unwrap_or_default())
        .collect();
    let columns = ColumnMap::resolve(header.iter().map(String::as_str))?;
    log::debug!("Worksheet column map: {columns:?}");

    let mut sink = RecordSink::default();
    for row in rows {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let text = |idx: usize| row.get(idx).and_then(cell_text);
        let dims =
            Dimension::ALL.map(|d| text(columns.dimension(d)).and_then(|s| dimension_cell(&s)));
        let emission = text(columns.emission());
        sink.push(dims, emission.as_deref());
    }

    Ok(sink.finish())
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = " REGION ,COUNTRY,SOURCES ,SEGMENT,REASON,  EMISSION (KT) \n";

    #[test]
    fn coercion_policy() {
        assert_eq!(coerce_emission("12.5"), Some(12.5));
        assert_eq!(coerce_emission(" 3 "), Some(3.0));
        assert_eq!(coerce_emission("N/A"), None);
        assert_eq!(coerce_emission("12,500"), None);
        assert_eq!(coerce_emission("NaN"), None);
        assert_eq!(coerce_emission("inf"), None);
        assert_eq!(coerce_emission(""), None);
    }

    #[test]
    fn csv_headers_are_trimmed_and_cells_coerced() {
        let text = format!(
            "{HEADER}Americas,USA,Energy,Oil,Vented,10\n\
             Europe,France,Agriculture,,Enteric,N/A\n\
             Global,World,Energy,Oil,,500\n"
        );
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.coerced_cells(), 1);

        let r = &ds.records()[1];
        assert_eq!(r.country.as_deref(), Some("France"));
        assert_eq!(r.segment, None);
        assert_eq!(r.emission_kt, None);
        assert_eq!(ds.records()[2].reason, None);
        assert_eq!(ds.records()[0].emission_kt, Some(10.0));
    }

    #[test]
    fn csv_empty_emission_is_missing_without_warning() {
        let text = format!("{HEADER}Americas,USA,Energy,Oil,Vented,\n");
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].emission_kt, None);
        assert_eq!(ds.coerced_cells(), 0);
    }

    #[test]
    fn csv_missing_column_is_fatal() {
        let text = "REGION,COUNTRY,SOURCES,SEGMENT,EMISSION (KT)\nA,B,C,D,1\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("REASON")));
    }

    #[test]
    fn csv_ragged_row_is_fatal() {
        let text = format!("{HEADER}Americas,USA\n");
        assert!(matches!(
            read_csv(text.as_bytes()),
            Err(LoadError::Csv(_))
        ));
    }

    #[test]
    fn column_map_allows_reordering_and_extras() {
        let map = ColumnMap::resolve([
            "notes",
            "emission (kt)",
            "reason",
            "segment",
            "sources",
            "country",
            "region",
        ])
        .unwrap();
        assert_eq!(map.emission(), 1);
        assert_eq!(map.dimension(Dimension::Region), 6);
        assert_eq!(map.dimension(Dimension::Source), 4);
    }

    #[test]
    fn json_records() {
        let text = r#"[
            {"REGION": "Asia", "COUNTRY": "India", "SOURCES": "Energy",
             "SEGMENT": "Coal", "REASON": null, "EMISSION (KT)": 42.0},
            {" REGION ": "Asia", "COUNTRY": "China", "SOURCES": "Waste",
             "SEGMENT": null, "REASON": "Landfill", "EMISSION (KT)": "N/A"}
        ]"#;
        let ds = read_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].emission_kt, Some(42.0));
        assert_eq!(ds.records()[0].reason, None);
        assert_eq!(ds.records()[1].region.as_deref(), Some("Asia"));
        assert_eq!(ds.records()[1].emission_kt, None);
        assert_eq!(ds.coerced_cells(), 1);
    }

    #[test]
    fn json_requires_array_of_objects() {
        assert!(matches!(read_json("{}"), Err(LoadError::Layout(_))));
        assert!(matches!(
            read_json("[1]"),
            Err(LoadError::Malformed { row: 0, .. })
        ));
        assert!(matches!(read_json("not json"), Err(LoadError::Json(_))));
    }

    #[test]
    fn missing_file_and_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.csv");
        assert!(matches!(load_file(&missing), Err(LoadError::NotFound(_))));

        let txt = dir.path().join("table.txt");
        std::fs::write(&txt, b"REGION").unwrap();
        assert!(matches!(
            load_file(&txt),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn corrupt_workbook_is_a_spreadsheet_error() {
        let dir = tempfile::tempdir().unwrap();
        let xlsx = dir.path().join("table.xlsx");
        std::fs::write(&xlsx, b"binary").unwrap();
        let err = load_file(&xlsx).unwrap_err();
        assert!(matches!(err, LoadError::Spreadsheet(_)));
        assert!(err.to_string().starts_with("spreadsheet error: "));
    }

    #[test]
    fn wrapped_errors_show_their_cause() {
        let text = format!("{HEADER}Americas,USA\n");
        let msg = read_csv(text.as_bytes()).unwrap_err().to_string();
        assert!(msg.starts_with("CSV error: "), "{msg}");
        assert!(msg.contains("fields"), "{msg}");

        let msg = read_json("not json").unwrap_err().to_string();
        assert!(msg.starts_with("JSON error: "), "{msg}");
        assert!(msg.contains("line 1"), "{msg}");
    }
}
