mod app;
mod color;
mod config;
mod data;
mod error;
mod report;
mod state;
mod ui;

use std::path::PathBuf;

use app::StudentDashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default();
    let mut state = AppState::new(config);

    // Optional snapshot to open at start-up.
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state.open(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "学生数据分析系统",
        options,
        Box::new(|cc| {
            let font = state.config.font_path.clone();
            if ui::fonts::install_cjk_font(&cc.egui_ctx, font.as_deref()).is_none() {
                log::warn!("No CJK font found; Chinese text will not render");
            }
            Ok(Box::new(StudentDashboardApp::new(state)))
        }),
    )
}
