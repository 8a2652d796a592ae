use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::assets::{Asset, Narrative};

// ---------------------------------------------------------------------------
// Narrative tabs: shown as plain text, not rendered markdown
// ---------------------------------------------------------------------------

pub fn emission_tab(ui: &mut Ui, doc: &Asset<Narrative>) {
    match doc {
        Asset::Ready(narrative) => {
            ScrollArea::vertical()
                .id_salt("emission_doc")
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    if let Some(image) = &narrative.image {
                        ui.add(
                            egui::Image::new(format!("file://{}", image.display()))
                                .max_width(ui.available_width())
                                .max_height(360.0),
                        );
                        ui.add_space(8.0);
                    }
                    ui.label(narrative.text.as_str());
                });
        }
        Asset::Missing(msg) => info(ui, msg),
    }
}

pub fn glossary_tab(ui: &mut Ui, doc: &Asset<String>) {
    match doc {
        Asset::Ready(text) => {
            ScrollArea::vertical()
                .id_salt("glossary_doc")
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.label(text.as_str());
                });
        }
        Asset::Missing(msg) => info(ui, msg),
    }
}

fn info(ui: &mut Ui, msg: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(RichText::new(msg).italics());
    });
}
