use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dataset, Dimension, Record};

// ---------------------------------------------------------------------------
// Filter selection: which values are allowed per dimension
// ---------------------------------------------------------------------------

/// Per-dimension selection state.
///
/// A dimension that is absent or has an empty set imposes no constraint
/// (show all). Within a dimension the selected values are OR-ed; across
/// dimensions the constraints are AND-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: BTreeMap<Dimension, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`FilterSelection::set`].
    pub fn with<I, S>(mut self, dimension: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(dimension, values);
        self
    }

    /// Replace the selection of one dimension.
    pub fn set<I, S>(&mut self, dimension: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.selected.remove(&dimension);
        } else {
            self.selected.insert(dimension, values);
        }
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle(&mut self, dimension: Dimension, value: &str) {
        let set = self.selected.entry(dimension).or_default();
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        if set.is_empty() {
            self.selected.remove(&dimension);
        }
    }

    pub fn clear(&mut self, dimension: Dimension) {
        self.selected.remove(&dimension);
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    /// Selected values of a constrained dimension, `None` when unconstrained.
    pub fn selected(&self, dimension: Dimension) -> Option<&BTreeSet<String>> {
        self.selected.get(&dimension).filter(|s| !s.is_empty())
    }

    pub fn is_selected(&self, dimension: Dimension, value: &str) -> bool {
        self.selected(dimension)
            .is_some_and(|set| set.contains(value))
    }

    pub fn is_constrained(&self, dimension: Dimension) -> bool {
        self.selected(dimension).is_some()
    }

    /// Whether no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.selected.values().all(BTreeSet::is_empty)
    }

    /// A record passes when, for every constrained dimension, its value is
    /// present and selected. Missing values never match a constraint.
    pub fn matches(&self, record: &Record) -> bool {
        self.selected
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .all(|(dim, set)| record.value(*dim).is_some_and(|v| set.contains(v)))
    }
}

// ---------------------------------------------------------------------------
// Filtered view: the surviving rows, in dataset order
// ---------------------------------------------------------------------------

/// Return indices of records that pass all active filters.
pub fn filtered_indices(records: &[Record], selection: &FilterSelection) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// A stable subsequence of a dataset's records.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    records: &'a [Record],
    indices: Vec<usize>,
}

/// Apply a selection to the whole dataset.
pub fn apply_filters<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    FilteredView {
        records: dataset.records(),
        indices: filtered_indices(dataset.records(), selection),
    }
}

impl<'a> FilteredView<'a> {
    /// The unfiltered view over every record.
    pub fn all(dataset: &'a Dataset) -> Self {
        FilteredView {
            records: dataset.records(),
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Rebuild a view from previously computed indices. Out-of-range
    /// indices are dropped.
    pub fn from_indices(dataset: &'a Dataset, indices: &[usize]) -> Self {
        FilteredView {
            records: dataset.records(),
            indices: indices
                .iter()
                .copied()
                .filter(|&i| i < dataset.len())
                .collect(),
        }
    }

    /// Apply a further selection to the rows of this view.
    pub fn refine(&self, selection: &FilterSelection) -> Self {
        FilteredView {
            records: self.records,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| selection.matches(&self.records[i]))
                .collect(),
        }
    }

    /// Positions of the surviving records in the dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.indices.iter().map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Option lists and the cascading filter walk
// ---------------------------------------------------------------------------

/// Distinct non-missing values of a dimension, sorted.
pub fn options_for<'a>(
    dimension: Dimension,
    records: impl IntoIterator<Item = &'a Record>,
) -> Vec<String> {
    records
        .into_iter()
        .filter_map(|r| r.value(dimension))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Result of walking the filter dimensions in order.
#[derive(Debug, Clone)]
pub struct Cascade<'a> {
    /// Choices offered for each dimension, given all earlier dimensions.
    pub options: BTreeMap<Dimension, Vec<String>>,
    /// The requested selection minus values no longer offered.
    pub selection: FilterSelection,
    /// Rows passing the pruned selection.
    pub view: FilteredView<'a>,
}

impl Cascade<'_> {
    pub fn options(&self, dimension: Dimension) -> &[String] {
        self.options
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Walk Region → Country → Source → Segment → Reason. The options for each
/// dimension come from the rows left after every earlier dimension is
/// applied, so choosing a region narrows the countries offered next.
pub fn cascade<'a>(dataset: &'a Dataset, requested: &FilterSelection) -> Cascade<'a> {
    let mut view = FilteredView::all(dataset);
    let mut options = BTreeMap::new();
    let mut selection = FilterSelection::new();

    for dim in Dimension::ALL {
        let offered = options_for(dim, view.iter());
        if let Some(wanted) = requested.selected(dim) {
            let kept: Vec<&String> = offered.iter().filter(|v| wanted.contains(*v)).collect();
            if kept.len() < wanted.len() {
                log::debug!(
                    "Dropping {} stale {dim} selection(s)",
                    wanted.len() - kept.len()
                );
            }
            selection.set(dim, kept.into_iter().cloned());
            if let Some(values) = selection.selected(dim) {
                let step = FilterSelection::new().with(dim, values.iter().cloned());
                view = view.refine(&step);
            }
        }
        options.insert(dim, offered);
    }

    Cascade {
        options,
        selection,
        view,
    }
}
