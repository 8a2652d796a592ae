use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use methane_tracker::data::cache::DatasetCache;
use methane_tracker::data::error::LoadError;
use methane_tracker::data::loader::load_file;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::Workbook;

const CSV: &str = "\u{20}REGION , COUNTRY ,SOURCES,SEGMENT,REASON, EMISSION (KT)\n\
                   Americas,USA,Energy,Oil,Vented,12.5\n\
                   Americas,USA,Energy,Gas,Fugitive,N/A\n\
                   Global,World,Energy,Oil,,12,500\n";

#[test]
fn csv_file_with_padded_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("METHANE TRACKER.csv");
    // The last row has an unquoted "12,500", which adds a seventh field.
    std::fs::write(&path, CSV).unwrap();
    assert!(matches!(load_file(&path), Err(LoadError::Csv(_))));

    let quoted = CSV.replace("12,500", "\"12,500\"");
    std::fs::write(&path, quoted).unwrap();
    let ds = load_file(&path).unwrap();
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.records()[0].emission_kt, Some(12.5));
    assert_eq!(ds.records()[1].emission_kt, None);
    assert_eq!(ds.records()[2].emission_kt, None);
    assert_eq!(ds.coerced_cells(), 2);
    assert_eq!(ds.max_emission(), Some(12.5));
}

#[test]
fn json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("methane.json");
    std::fs::write(
        &path,
        r#"[{"REGION":"Europe","COUNTRY":"Norway","SOURCES":"Energy","SEGMENT":"Offshore gas",
             "REASON":"Vented","EMISSION (KT)":3.25}]"#,
    )
    .unwrap();
    let ds = load_file(&path).unwrap();
    assert_eq!(ds.records()[0].segment.as_deref(), Some("Offshore gas"));
    assert_eq!(ds.records()[0].emission_kt, Some(3.25));
}

#[test]
fn parquet_file_with_numeric_measure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("methane.parquet");

    let text = |name: &str| Field::new(name, DataType::Utf8, true);
    let schema = Arc::new(Schema::new(vec![
        text("REGION"),
        text("COUNTRY"),
        text("SOURCES "),
        text("SEGMENT"),
        text("REASON"),
        Field::new("EMISSION (KT)", DataType::Float64, true),
    ]));
    let strings = |values: [Option<&str>; 3]| Arc::new(StringArray::from(values.to_vec())) as ArrayRef;
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            strings([Some("Asia"), Some("Asia"), None]),
            strings([Some("India"), Some("China"), Some("World")]),
            strings([Some("Agriculture"), Some("Energy"), Some("Energy")]),
            strings([None, Some("Coal"), Some("")]),
            strings([Some("Enteric"), None, None]),
            Arc::new(Float64Array::from(vec![Some(40.0), None, Some(f64::NAN)])) as ArrayRef,
        ],
    )
    .unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.len(), 3);
    let [india, china, world] = ds.records() else {
        panic!("expected three records");
    };
    assert_eq!(india.emission_kt, Some(40.0));
    assert_eq!(india.segment, None);
    assert_eq!(china.segment.as_deref(), Some("Coal"));
    assert_eq!(china.emission_kt, None);
    assert_eq!(world.region, None);
    assert_eq!(world.segment, None);
    assert_eq!(world.emission_kt, None);
    assert_eq!(ds.coerced_cells(), 1);
}

#[test]
fn xlsx_workbook_first_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("METHANE TRACKER.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let header = ["Region ", "COUNTRY", " SOURCES", "SEGMENT", "REASON", "EMISSION (KT)"];
    for (col, name) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    let rows = [
        ["Americas", "United States", "Energy", "Onshore oil", "Vented"],
        ["Europe", "France", "Agriculture", "", "Enteric"],
        ["World", "World", "Energy", "Onshore oil", ""],
    ];
    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                sheet.write_string(r, col as u16, *cell).unwrap();
            }
        }
    }
    sheet.write_number(1, 5, 1250.5).unwrap();
    sheet.write_string(2, 5, "N/A").unwrap();
    sheet.write_number(3, 5, 90000.0).unwrap();
    workbook.save(&path).unwrap();

    let ds = load_file(&path).unwrap();
    assert_eq!(ds.len(), 3);
    let [usa, france, world] = ds.records() else {
        panic!("expected three records");
    };
    assert_eq!(usa.country.as_deref(), Some("United States"));
    assert_eq!(usa.emission_kt, Some(1250.5));
    assert_eq!(france.segment, None);
    assert_eq!(france.emission_kt, None);
    assert_eq!(world.reason, None);
    assert_eq!(world.emission_kt, Some(90000.0));
    assert_eq!(ds.coerced_cells(), 1);
}

#[test]
fn cache_shares_one_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::write(&path, CSV.replace("12,500", "7")).unwrap();

    let cache = DatasetCache::new(&path);
    let a = cache.get().unwrap();
    let b = cache.get().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.len(), 3);
}
