// src/app.rs
use std::sync::Arc;
use eframe::egui;
use tracing::info;

use crate::client::AnalysisService;
use crate::config::Settings;
use crate::controller::AppController;
use crate::ui::{dialog, intake, results};

pub struct TaxiOptimizerApp {
    controller: AppController,
}

impl TaxiOptimizerApp {
    pub fn new(ctx: &egui::Context, service: Arc<dyn AnalysisService>, settings: &Settings) -> Self {
        let repaint_ctx = ctx.clone();
        let mut controller = AppController::new(
            service,
            settings.download_dir.clone(),
            Arc::new(move || repaint_ctx.request_repaint()),
        );
        info!(api = %settings.api_base_url, downloads = %settings.download_dir.display(), "client ready");
        controller.check_health();

        Self { controller }
    }
}

impl eframe::App for TaxiOptimizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading("🚕 Taxi Trip Optimizer");
            ui.label("Upload taxi trip data to find the best times and zones for highest fares");
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            dialog::show_footer(ui, &mut self.controller);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            dialog::show_error_banner(ui, &mut self.controller);

            if self.controller.results_view().is_some() {
                results::show_results_view(ui, &mut self.controller);
            } else {
                // drops only count while the upload form is showing and idle
                if !self.controller.session().is_loading() {
                    intake::handle_file_drops(ctx, &mut self.controller);
                }
                intake::show_intake_view(ui, &mut self.controller);
            }
        });

        dialog::show_loading_overlay(ctx, &self.controller);
        dialog::show_export_alert(ctx, &mut self.controller);
    }
}
