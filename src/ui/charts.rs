use eframe::egui::{self, Color32, RichText, ScrollArea, Sense, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot};

use crate::color::{intensity_color, ColorMap};
use crate::data::dashboard::Dashboard;
use crate::data::filter::FilteredView;
use crate::data::model::{Dimension, EMISSION_COLUMN};
use crate::data::projection::{
    CompositionSlice, CountryRank, MapProjection, Projection, RegionSourceTotal,
};
use crate::state::AppState;

const NO_DATA: &str = "No data available for the current filters.";

// ---------------------------------------------------------------------------
// Dashboard tab (central panel)
// ---------------------------------------------------------------------------

/// Render every projection of the current filter state.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let (Some(dash), Some(view)) = (&state.dashboard, state.view()) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore emissions  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Global Methane Tracker");
            ui.label("Explore methane emissions by country, region, source, segment, and reason.");
            ui.add_space(8.0);

            section(ui, "Global View");
            map_view(ui, &dash.map);

            section(ui, "Composition");
            composition_view(ui, &dash.composition, &state.source_colors);

            section(ui, &format!("Top {} Countries", state.settings.top_n));
            top_countries_chart(ui, &dash.top_countries);

            section(ui, "Regional Profile by Source");
            region_source_chart(ui, &dash.region_sources, &state.source_colors);

            section(ui, "Detailed Records");
            records_table(ui, dash, &view);
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.heading(title);
    ui.separator();
}

fn no_data(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).italics().color(Color32::GRAY));
}

fn format_kt(v: f64) -> String {
    format!("{v:.1} kt")
}

// ---------------------------------------------------------------------------
// Map: country intensity list on a shared colour range
// ---------------------------------------------------------------------------

fn map_view(ui: &mut Ui, map: &MapProjection) {
    let Projection::Rows(rows) = &map.totals else {
        no_data(ui, NO_DATA);
        return;
    };
    let max = map.color_range.map(|(_, hi)| hi);

    ui.horizontal(|ui: &mut Ui| {
        ui.label("0");
        for step in 0..=20 {
            swatch(ui, intensity_color(step as f64 / 20.0, Some(1.0)), 8.0);
        }
        ui.label(max.map_or_else(|| "n/a".to_string(), format_kt));
    });

    egui::Grid::new("map_grid")
        .striped(true)
        .num_columns(4)
        .show(ui, |ui: &mut Ui| {
            ui.strong("");
            ui.strong("Country");
            ui.strong("Region");
            ui.strong("KT");
            ui.end_row();

            for row in rows {
                swatch(ui, intensity_color(row.emission_kt, max), 14.0);
                ui.label(row.country.as_str());
                ui.label(row.region.as_deref().unwrap_or("–"));
                ui.label(format!("{:.0}", row.emission_kt));
                ui.end_row();
            }
        });
}

fn swatch(ui: &mut Ui, color: Color32, width: f32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 14.0), Sense::hover());
    ui.painter().rect_filled(rect, 2.0, color);
}

// ---------------------------------------------------------------------------
// Composition: inner = source, outer = segment / country
// ---------------------------------------------------------------------------

fn composition_view(ui: &mut Ui, slices: &Projection<CompositionSlice>, colors: &ColorMap) {
    let Projection::Rows(rows) = slices else {
        no_data(ui, NO_DATA);
        return;
    };

    let grand_total: f64 = rows.iter().map(|s| s.emission_kt).sum();
    let full_width = ui.available_width().min(600.0);

    // Rows arrive grouped by source.
    for group in rows.chunk_by(|a, b| a.source == b.source) {
        let source = &group[0].source;
        let source_total: f64 = group.iter().map(|s| s.emission_kt).sum();
        let color = colors.color_for(source);

        let share = if grand_total > 0.0 {
            source_total / grand_total * 100.0
        } else {
            0.0
        };
        let header = format!("{source}  {}  ({share:.1}%)", format_kt(source_total));

        egui::CollapsingHeader::new(RichText::new(header).strong().color(color))
            .id_salt(("composition", source))
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                for slice in group {
                    let fraction = if source_total > 0.0 {
                        (slice.emission_kt / source_total) as f32
                    } else {
                        0.0
                    };
                    ui.horizontal(|ui: &mut Ui| {
                        swatch(ui, color, (full_width * fraction).max(1.0));
                        ui.label(format!("{}  {}", slice.outer, format_kt(slice.emission_kt)));
                    });
                }
            });
    }
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Axis formatter that prints category names at integer positions.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let pos = mark.value;
        if pos.fract().abs() > f64::EPSILON || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

fn top_countries_chart(ui: &mut Ui, ranked: &Projection<CountryRank>) {
    let Projection::Rows(rows) = ranked else {
        no_data(ui, NO_DATA);
        return;
    };

    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.emission_kt)
                .name(&r.country)
                .width(0.7)
        })
        .collect();
    let labels = rows.iter().map(|r| r.country.clone()).collect();
    let chart = BarChart::new(bars)
        .name(EMISSION_COLUMN)
        .color(Color32::from_rgb(240, 100, 50));

    Plot::new("top_countries")
        .height(360.0)
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("KT")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

fn region_source_chart(ui: &mut Ui, stacked: &Projection<RegionSourceTotal>, colors: &ColorMap) {
    let Projection::Rows(rows) = stacked else {
        no_data(ui, NO_DATA);
        return;
    };

    let mut regions: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
    regions.dedup();
    let mut sources: Vec<&str> = rows.iter().map(|r| r.source.as_str()).collect();
    sources.sort_unstable();
    sources.dedup();

    let mut charts: Vec<BarChart> = Vec::with_capacity(sources.len());
    for source in &sources {
        let bars: Vec<Bar> = regions
            .iter()
            .enumerate()
            .map(|(i, region)| {
                let value = rows
                    .iter()
                    .find(|r| r.region == *region && r.source == *source)
                    .map_or(0.0, |r| r.emission_kt);
                Bar::new(i as f64, value).name(*region).width(0.7)
            })
            .collect();

        let chart = {
            let below: Vec<&BarChart> = charts.iter().collect();
            BarChart::new(bars)
                .name(*source)
                .color(colors.color_for(source))
                .stack_on(&below)
        };
        charts.push(chart);
    }

    let labels = regions.iter().map(|r| r.to_string()).collect();
    Plot::new("region_by_source")
        .height(380.0)
        .legend(Legend::default())
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("KT")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Raw records
// ---------------------------------------------------------------------------

fn records_table(ui: &mut Ui, dash: &Dashboard, view: &FilteredView<'_>) {
    if dash.row_count == 0 {
        no_data(ui, "No rows match the current filters.");
        return;
    }

    let records: Vec<_> = view.iter().collect();
    ui.push_id("records_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(420.0)
            .columns(Column::auto().at_least(90.0), Dimension::ALL.len())
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for dim in Dimension::ALL {
                    header.col(|ui: &mut Ui| {
                        ui.strong(dim.column());
                    });
                }
                header.col(|ui: &mut Ui| {
                    ui.strong(EMISSION_COLUMN);
                });
            })
            .body(|body| {
                body.rows(18.0, records.len(), |mut row| {
                    let record = records[row.index()];
                    for dim in Dimension::ALL {
                        row.col(|ui: &mut Ui| {
                            ui.label(record.value(dim).unwrap_or(""));
                        });
                    }
                    row.col(|ui: &mut Ui| {
                        ui.label(
                            record
                                .emission_kt
                                .map_or_else(String::new, |v| format!("{v:.2}")),
                        );
                    });
                });
            });
    });
}
