use car_price_predictor::config::{AppConfig, CONFIG_FILE};
use car_price_predictor::ui::{self, PredictorApp};
use car_price_predictor::{init_tracing, loader};
use eframe::egui;
use std::path::Path;

fn main() -> eframe::Result<()> {
    init_tracing();

    let cfg = AppConfig::load(Path::new(CONFIG_FILE));

    // Loaded once; every prediction in this process shares the handle.
    let (model, source) = loader::load_for_session(&cfg.model_path, cfg.allow_placeholder);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cfg.window_width, cfg.window_height])
            .with_min_inner_size([640.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Car Price Predictor",
        options,
        Box::new(move |cc| {
            ui::set_custom_style(&cc.egui_ctx);
            Ok(Box::new(PredictorApp::new(model, source)))
        }),
    )
}
