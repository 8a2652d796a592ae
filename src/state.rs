use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::Assets;
use crate::color::ColorMap;
use crate::data::dashboard::{Dashboard, DashboardSettings};
use crate::data::filter::{cascade, options_for, FilterSelection, FilteredView};
use crate::data::model::{Dataset, Dimension};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Emission,
    Glossary,
    Dashboard,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Emission, Tab::Glossary, Tab::Dashboard];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Emission => "Methane Emission",
            Tab::Glossary => "Emission Glossary",
            Tab::Dashboard => "Dashboard",
        }
    }
}

/// The full UI state, independent of rendering. Every filter change
/// recomputes the view and all projections before the next frame.
pub struct AppState {
    /// Loaded dataset, shared read-only.
    pub dataset: Option<Arc<Dataset>>,

    /// File the dataset came from.
    pub source_path: Option<PathBuf>,

    /// Largest emission in the unfiltered table (map colour range).
    pub global_max: Option<f64>,

    /// Current selection, pruned to the values still offered.
    pub selection: FilterSelection,

    /// Choices per dimension, narrowed by the dimensions before it.
    pub options: BTreeMap<Dimension, Vec<String>>,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Projections for the dashboard tab.
    pub dashboard: Option<Dashboard>,

    pub settings: DashboardSettings,

    /// Colour per emission source, fixed for the whole dataset.
    pub source_colors: ColorMap,

    pub assets: Assets,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: DashboardSettings, assets: Assets) -> Self {
        Self {
            dataset: None,
            source_path: None,
            global_max: None,
            selection: FilterSelection::new(),
            options: BTreeMap::new(),
            visible_indices: Vec::new(),
            dashboard: None,
            settings,
            source_colors: ColorMap::default(),
            assets,
            tab: Tab::Dashboard,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset the filters.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>, path: Option<PathBuf>) {
        self.global_max = dataset.max_emission();
        let sources = options_for(Dimension::Source, dataset.records());
        self.source_colors = ColorMap::new(sources.iter().map(String::as_str));
        self.selection = FilterSelection::new();
        self.dataset = Some(dataset);
        self.source_path = path;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute options, `visible_indices` and the dashboard after a
    /// filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = self.dataset.clone() else {
            return;
        };
        let result = cascade(&ds, &self.selection);
        let dashboard = Dashboard::compute(&result.view, self.global_max, &self.settings);

        self.selection = result.selection;
        self.options = result.options;
        self.visible_indices = result.view.into_indices();
        self.dashboard = Some(dashboard);
    }

    /// The current filtered rows.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_deref()
            .map(|ds| FilteredView::from_indices(ds, &self.visible_indices))
    }

    pub fn options(&self, dimension: Dimension) -> &[String] {
        self.options
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle_filter_value(&mut self, dimension: Dimension, value: &str) {
        self.selection.toggle(dimension, value);
        self.refilter();
    }

    /// Remove the constraint on one dimension.
    pub fn clear_filter(&mut self, dimension: Dimension) {
        self.selection.clear(dimension);
        self.refilter();
    }

    pub fn clear_all_filters(&mut self) {
        self.selection.clear_all();
        self.refilter();
    }
}
