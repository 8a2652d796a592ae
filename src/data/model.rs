use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column names as they appear in the source table (after header trimming)
// ---------------------------------------------------------------------------

/// Header of the emission measure column.
pub const EMISSION_COLUMN: &str = "EMISSION (KT)";

/// Labels that stand for pre-aggregated totals rather than a real entity.
const PLACEHOLDER_LABELS: [&str; 2] = ["world", "total"];

/// Whether a geographic label is a "World"/"Total" placeholder row.
/// Comparison ignores surrounding whitespace and ASCII case.
pub fn is_placeholder(label: &str) -> bool {
    let label = label.trim();
    PLACEHOLDER_LABELS
        .iter()
        .any(|p| label.eq_ignore_ascii_case(p))
}

// ---------------------------------------------------------------------------
// Dimension – a categorical column usable as filter / group key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Region,
    Country,
    Source,
    Segment,
    Reason,
}

impl Dimension {
    /// All dimensions in cascading-filter order.
    pub const ALL: [Dimension; 5] = [
        Dimension::Region,
        Dimension::Country,
        Dimension::Source,
        Dimension::Segment,
        Dimension::Reason,
    ];

    /// Header name in the source table.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Region => "REGION",
            Dimension::Country => "COUNTRY",
            Dimension::Source => "SOURCES",
            Dimension::Segment => "SEGMENT",
            Dimension::Reason => "REASON",
        }
    }

    /// Human-readable label for filter widgets.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Region => "Region",
            Dimension::Country => "Country",
            Dimension::Source => "Source",
            Dimension::Segment => "Segment",
            Dimension::Reason => "Reason",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the emission table
// ---------------------------------------------------------------------------

/// A single row. `None` marks a missing cell.
///
/// `emission_kt` is always either a finite number or `None`; the loader
/// never stores a placeholder string or NaN here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "REGION")]
    pub region: Option<String>,
    #[serde(rename = "COUNTRY")]
    pub country: Option<String>,
    #[serde(rename = "SOURCES")]
    pub source: Option<String>,
    #[serde(rename = "SEGMENT")]
    pub segment: Option<String>,
    #[serde(rename = "REASON")]
    pub reason: Option<String>,
    #[serde(rename = "EMISSION (KT)")]
    pub emission_kt: Option<f64>,
}

impl Record {
    /// Value of a categorical dimension, if present.
    pub fn value(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Region => self.region.as_deref(),
            Dimension::Country => self.country.as_deref(),
            Dimension::Source => self.source.as_deref(),
            Dimension::Segment => self.segment.as_deref(),
            Dimension::Reason => self.reason.as_deref(),
        }
    }

    /// Whether the country is a "World"/"Total" placeholder.
    pub fn has_placeholder_country(&self) -> bool {
        self.country.as_deref().is_some_and(is_placeholder)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table. Immutable after load.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    /// Number of emission cells that could not be read as a number.
    coerced_cells: usize,
}

impl Dataset {
    pub fn new(records: Vec<Record>, coerced_cells: usize) -> Self {
        Dataset {
            records,
            coerced_cells,
        }
    }

    /// All records in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn coerced_cells(&self) -> usize {
        self.coerced_cells
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest emission over the whole table, ignoring missing cells.
    /// Placeholder rows are included, matching the map's colour range.
    pub fn max_emission(&self) -> Option<f64> {
        self.records
            .iter()
            .filter_map(|r| r.emission_kt)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Dataset::new(records, 0)
    }
}
