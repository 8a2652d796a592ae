use eframe::egui;

use methane_tracker::app::MethaneTrackerApp;
use methane_tracker::assets::Assets;
use methane_tracker::config::AppConfig;
use methane_tracker::data::cache::DatasetCache;
use methane_tracker::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    log::info!("Configuration: {config:?}");

    // A missing or unreadable table is fatal.
    let cache = DatasetCache::new(&config.data_path);
    let dataset = match cache.get() {
        Ok(ds) => ds,
        Err(e) => {
            log::error!("Failed to load {}: {e}", cache.path().display());
            eprintln!("error: cannot load {}: {e}", cache.path().display());
            std::process::exit(1);
        }
    };

    let mut state = AppState::new(config.settings, Assets::load(&config.asset_dir));
    state.set_dataset(dataset, Some(config.data_path.clone()));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Methane Tracker",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render png/jpg/etc.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(MethaneTrackerApp::new(state)))
        }),
    )
}
