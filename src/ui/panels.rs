use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::assets::Asset;
use crate::data::export::export_csv;
use crate::data::model::Dimension;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered) ----
    match &state.assets.logo {
        Asset::Ready(path) => {
            let uri = format!("file://{}", path.display());
            ui.vertical_centered(|ui: &mut Ui| {
                ui.add(
                    egui::Image::new(uri)
                        .max_width(ui.available_width() * 0.8)
                        .max_height(120.0)
                        .rounding(4.0),
                );
            });
        }
        Asset::Missing(msg) => {
            ui.small(msg.as_str());
        }
    }
    ui.add_space(4.0);

    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    if ui
        .add_enabled(!state.selection.is_empty(), egui::Button::new("Clear all"))
        .clicked()
    {
        state.clear_all_filters();
    }

    // Changes are applied after the loop so that every dimension is drawn
    // from the same cascade.
    let mut toggled: Option<(Dimension, String)> = None;
    let mut cleared: Option<Dimension> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::ALL {
                let offered = state.options(dim);
                let n_selected = state
                    .selection
                    .selected(dim)
                    .map_or(0, |set| set.len());
                let header_text = if n_selected == 0 {
                    format!("{dim}  (all {})", offered.len())
                } else {
                    format!("{dim}  ({n_selected}/{})", offered.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.column())
                    .default_open(dim == Dimension::Region)
                    .show(ui, |ui: &mut Ui| {
                        if n_selected > 0 && ui.small_button("Clear").clicked() {
                            cleared = Some(dim);
                        }

                        for value in offered {
                            let mut checked = state.selection.is_selected(dim, value);
                            let mut text = RichText::new(value);
                            if dim == Dimension::Source {
                                text = text.color(state.source_colors.color_for(value));
                            }
                            if ui.checkbox(&mut checked, text).changed() {
                                toggled = Some((dim, value.clone()));
                            }
                        }
                    });
            }
        });

    if let Some(dim) = cleared {
        state.clear_filter(dim);
    }
    if let Some((dim, value)) = toggled {
        state.toggle_filter_value(dim, &value);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.title());
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open methane emission data")
        .add_filter("Supported files", &["csv", "xlsx", "xls", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(Arc::new(dataset), Some(path)),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

fn export_file_dialog(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export filtered records")
        .add_filter("CSV", &["csv"])
        .set_file_name("methane_filtered.csv")
        .save_file()
    else {
        return;
    };

    let result = match state.view() {
        Some(view) => export_csv(&view, &path),
        None => return,
    };
    if let Err(e) = result {
        log::error!("Export failed: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}
