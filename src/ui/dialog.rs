// src/ui/dialog.rs
use eframe::egui;

use crate::controller::{AppController, HealthState};

pub fn show_error_banner(ui: &mut egui::Ui, controller: &mut AppController) {
    let Some(message) = controller.session().error().map(str::to_owned) else {
        return;
    };

    egui::Frame::none()
        .fill(egui::Color32::from_rgb(253, 226, 226))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(220, 90, 90)))
        .rounding(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Error:").strong().color(egui::Color32::DARK_RED));
                ui.label(egui::RichText::new(message).color(egui::Color32::DARK_RED));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("×").clicked() {
                        controller.reset();
                    }
                });
            });
        });
    ui.add_space(8.0);
}

pub fn show_loading_overlay(ctx: &egui::Context, controller: &AppController) {
    if !controller.session().is_loading() {
        return;
    }

    egui::Window::new("loading")
        .title_bar(false)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.spinner();
                ui.label("Analyzing taxi trip data...");
            });
        });
}

/// Export failures must be acknowledged before anything else
pub fn show_export_alert(ctx: &egui::Context, controller: &mut AppController) {
    let Some(alert) = controller.export().alert().map(str::to_owned) else {
        return;
    };

    egui::Window::new("Download failed")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(&alert);
            if ui.button("OK").clicked() {
                controller.dismiss_alert();
            }
        });
}

pub fn show_footer(ui: &mut egui::Ui, controller: &mut AppController) {
    ui.horizontal(|ui| {
        match controller.health() {
            HealthState::Unknown => {
                ui.label("Backend: not checked");
            }
            HealthState::Checking => {
                ui.spinner();
                ui.label("Backend: checking...");
            }
            HealthState::Healthy(status) => {
                ui.colored_label(
                    egui::Color32::from_rgb(40, 150, 60),
                    format!("Backend: {} ({})", status.status, status.engine),
                );
            }
            HealthState::Unreachable(message) => {
                ui.colored_label(egui::Color32::RED, "Backend: unreachable")
                    .on_hover_text(message.as_str());
            }
        }

        let checking = *controller.health() == HealthState::Checking;
        if ui.add_enabled(!checking, egui::Button::new("Check connection")).clicked() {
            controller.check_health();
        }
    });
}
