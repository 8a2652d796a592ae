use std::collections::BTreeMap;

use super::model::{is_placeholder, Record};

/// Default length of the country ranking.
pub const TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Projection – chart input, or an explicit "nothing to show"
// ---------------------------------------------------------------------------

/// Rows for one chart. An empty aggregation is [`Projection::NoData`],
/// never an error and never an empty `Rows`.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection<T> {
    Rows(Vec<T>),
    NoData,
}

impl<T> Projection<T> {
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            Projection::NoData
        } else {
            Projection::Rows(rows)
        }
    }

    /// Rows to draw; empty for `NoData`.
    pub fn rows(&self) -> &[T] {
        match self {
            Projection::Rows(rows) => rows,
            Projection::NoData => &[],
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Projection::NoData)
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_no_data()
    }
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CountryTotal {
    pub country: String,
    /// First non-missing region seen for the country.
    pub region: Option<String>,
    pub emission_kt: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositionSlice {
    pub source: String,
    /// Segment for energy rows, country otherwise.
    pub outer: String,
    pub emission_kt: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryRank {
    pub country: String,
    pub emission_kt: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSourceTotal {
    pub region: String,
    pub source: String,
    pub emission_kt: f64,
}

// ---------------------------------------------------------------------------
// a. Geographic totals (map)
// ---------------------------------------------------------------------------

/// Country totals plus the colour range they are drawn against.
#[derive(Debug, Clone, PartialEq)]
pub struct MapProjection {
    pub totals: Projection<CountryTotal>,
    /// `(0, global max)` of the unfiltered table, so intensity stays
    /// comparable between filter states.
    pub color_range: Option<(f64, f64)>,
}

/// Sum emissions per country. Rows without a country or emission, and
/// "World"/"Total" rows, are skipped.
pub fn geographic_totals<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    global_max: Option<f64>,
) -> MapProjection {
    let mut groups: BTreeMap<&str, (Option<&str>, f64)> = BTreeMap::new();

    for r in records {
        let (Some(country), Some(emission)) = (r.country.as_deref(), r.emission_kt) else {
            continue;
        };
        if is_placeholder(country) {
            continue;
        }
        let entry = groups.entry(country).or_insert((None, 0.0));
        if entry.0.is_none() {
            entry.0 = r.region.as_deref();
        }
        entry.1 += emission;
    }

    let rows = groups
        .into_iter()
        .map(|(country, (region, emission_kt))| CountryTotal {
            country: country.to_string(),
            region: region.map(str::to_string),
            emission_kt,
        })
        .collect();

    MapProjection {
        totals: Projection::from_rows(rows),
        color_range: global_max.map(|max| (0.0, max)),
    }
}

// ---------------------------------------------------------------------------
// b. Source composition (two-level hierarchy)
// ---------------------------------------------------------------------------

/// How placeholder rows are treated by [`source_composition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositionOptions {
    /// Also drop rows whose *country* is "World"/"Total", not only rows
    /// whose outer key is. Without it, energy rows keyed by segment let
    /// global totals through and double-count them.
    pub exclude_placeholder_countries: bool,
}

impl Default for CompositionOptions {
    fn default() -> Self {
        CompositionOptions {
            exclude_placeholder_countries: true,
        }
    }
}

fn is_energy(source: &str) -> bool {
    source.trim().eq_ignore_ascii_case("energy")
}

/// Outer-ring key of a record: the segment for energy rows, the country
/// for every other source. Energy rows without a segment have no key.
pub fn composition_key(record: &Record) -> Option<&str> {
    match record.source.as_deref() {
        Some(source) if is_energy(source) => record.segment.as_deref(),
        _ => record.country.as_deref(),
    }
}

/// Sum emissions per (source, outer key).
pub fn source_composition<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    options: CompositionOptions,
) -> Projection<CompositionSlice> {
    let mut groups: BTreeMap<(&str, &str), f64> = BTreeMap::new();

    for r in records {
        let (Some(source), Some(outer), Some(emission)) =
            (r.source.as_deref(), composition_key(r), r.emission_kt)
        else {
            continue;
        };
        if is_placeholder(outer) {
            continue;
        }
        if options.exclude_placeholder_countries && r.has_placeholder_country() {
            continue;
        }
        *groups.entry((source, outer)).or_insert(0.0) += emission;
    }

    Projection::from_rows(
        groups
            .into_iter()
            .map(|((source, outer), emission_kt)| CompositionSlice {
                source: source.to_string(),
                outer: outer.to_string(),
                emission_kt,
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// c. Top-N country ranking
// ---------------------------------------------------------------------------

/// The `limit` largest country totals, descending. Equal totals keep
/// ascending country order.
pub fn top_countries<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    limit: usize,
) -> Projection<CountryRank> {
    let mut groups: BTreeMap<&str, f64> = BTreeMap::new();

    for r in records {
        let (Some(country), Some(emission)) = (r.country.as_deref(), r.emission_kt) else {
            continue;
        };
        if is_placeholder(country) {
            continue;
        }
        *groups.entry(country).or_insert(0.0) += emission;
    }

    let mut ranked: Vec<CountryRank> = groups
        .into_iter()
        .map(|(country, emission_kt)| CountryRank {
            country: country.to_string(),
            emission_kt,
        })
        .collect();
    ranked.sort_by(|a, b| b.emission_kt.total_cmp(&a.emission_kt));
    ranked.truncate(limit);

    Projection::from_rows(ranked)
}

// ---------------------------------------------------------------------------
// d. Regional breakdown by source (stacked bars)
// ---------------------------------------------------------------------------

/// Sum emissions per (region, source). Rows with a placeholder country are
/// skipped; rows with no country at all are kept.
pub fn region_by_source<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> Projection<RegionSourceTotal> {
    let mut groups: BTreeMap<(&str, &str), f64> = BTreeMap::new();

    for r in records {
        let (Some(region), Some(source), Some(emission)) =
            (r.region.as_deref(), r.source.as_deref(), r.emission_kt)
        else {
            continue;
        };
        if r.has_placeholder_country() {
            continue;
        }
        *groups.entry((region, source)).or_insert(0.0) += emission;
    }

    Projection::from_rows(
        groups
            .into_iter()
            .map(|((region, source), emission_kt)| RegionSourceTotal {
                region: region.to_string(),
                source: source.to_string(),
                emission_kt,
            })
            .collect(),
    )
}
