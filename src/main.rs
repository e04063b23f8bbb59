// src/main.rs
use std::sync::Arc;
use eframe::egui;
use anyhow::{Result, Context};

mod analysis;
mod app;
mod client;
mod config;
mod controller;
mod error;
mod file;
mod logging;
mod render;
mod state;
mod ui;

use app::TaxiOptimizerApp;
use client::HttpAnalysisService;
use config::Settings;

fn main() -> Result<()> {
    let settings = Settings::load()?;
    logging::init_logging(&settings.log_level)?;

    let service = HttpAnalysisService::new(settings.clone())
        .context("Failed to build HTTP client")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_title("Taxi Trip Optimizer"),
        ..Default::default()
    };

    eframe::run_native(
        "Taxi Trip Optimizer",
        options,
        Box::new(move |cc| {
            Box::new(TaxiOptimizerApp::new(&cc.egui_ctx, Arc::new(service), &settings))
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}
