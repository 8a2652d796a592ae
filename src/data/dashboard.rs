use super::filter::FilteredView;
use super::projection::{
    geographic_totals, region_by_source, source_composition, top_countries, CompositionOptions,
    CompositionSlice, CountryRank, MapProjection, Projection, RegionSourceTotal, TOP_N,
};

/// Knobs that shape the projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSettings {
    pub top_n: usize,
    pub composition: CompositionOptions,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        DashboardSettings {
            top_n: TOP_N,
            composition: CompositionOptions::default(),
        }
    }
}

/// Everything the dashboard tab draws for one filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub map: MapProjection,
    pub composition: Projection<CompositionSlice>,
    pub top_countries: Projection<CountryRank>,
    pub region_sources: Projection<RegionSourceTotal>,
    /// Rows in the filtered view (raw table).
    pub row_count: usize,
}

impl Dashboard {
    /// Recompute all projections from a filtered view. `global_max` is the
    /// unfiltered table's largest emission.
    pub fn compute(
        view: &FilteredView<'_>,
        global_max: Option<f64>,
        settings: &DashboardSettings,
    ) -> Self {
        let dashboard = Dashboard {
            map: geographic_totals(view.iter(), global_max),
            composition: source_composition(view.iter(), settings.composition),
            top_countries: top_countries(view.iter(), settings.top_n),
            region_sources: region_by_source(view.iter()),
            row_count: view.len(),
        };
        log::debug!(
            "Dashboard: {} rows, {} countries, {} slices, {} ranked, {} stacked",
            dashboard.row_count,
            dashboard.map.totals.len(),
            dashboard.composition.len(),
            dashboard.top_countries.len(),
            dashboard.region_sources.len()
        );
        dashboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply_filters, FilterSelection};
    use crate::data::model::{Dataset, Dimension, Record};

    fn dataset() -> Dataset {
        let row = |region: &str, country: &str, source: &str, emission: f64| Record {
            region: Some(region.into()),
            country: Some(country.into()),
            source: Some(source.into()),
            segment: Some("Gas".into()),
            reason: None,
            emission_kt: Some(emission),
        };
        Dataset::from(vec![
            row("Europe", "France", "Energy", 5.0),
            row("Asia", "India", "Waste", 20.0),
            row("Global", "World", "Energy", 400.0),
        ])
    }

    #[test]
    fn filtered_dashboard_uses_global_max() {
        let ds = dataset();
        let sel = FilterSelection::new().with(Dimension::Region, ["Europe"]);
        let view = apply_filters(&ds, &sel);
        let dash = Dashboard::compute(&view, ds.max_emission(), &DashboardSettings::default());

        assert_eq!(dash.row_count, 1);
        assert_eq!(dash.map.color_range, Some((0.0, 400.0)));
        assert_eq!(dash.map.totals.len(), 1);
        assert_eq!(dash.top_countries.rows()[0].country, "France");
        assert_eq!(dash.region_sources.len(), 1);
    }

    #[test]
    fn empty_view_is_no_data_everywhere() {
        let ds = dataset();
        let sel = FilterSelection::new().with(Dimension::Country, ["Atlantis"]);
        let view = apply_filters(&ds, &sel);
        let dash = Dashboard::compute(&view, ds.max_emission(), &DashboardSettings::default());

        assert_eq!(dash.row_count, 0);
        assert!(dash.map.totals.is_no_data());
        assert!(dash.composition.is_no_data());
        assert!(dash.top_countries.is_no_data());
        assert!(dash.region_sources.is_no_data());
    }

    #[test]
    fn top_n_setting_limits_ranking() {
        let ds = dataset();
        let view = apply_filters(&ds, &FilterSelection::new());
        let settings = DashboardSettings {
            top_n: 1,
            ..Default::default()
        };
        let dash = Dashboard::compute(&view, ds.max_emission(), &settings);
        assert_eq!(dash.top_countries.rows().len(), 1);
        assert_eq!(dash.top_countries.rows()[0].country, "India");
    }
}
