// src/ui/intake.rs
use eframe::egui;
use rfd::FileDialog;

use crate::controller::AppController;
use crate::state::intake_state::PendingFile;

const DROP_ZONE_HEIGHT: f32 = 180.0;

/// Window-level drag-and-drop. egui reports hovered and dropped files for
/// the whole window, so the drop zone is the window itself.
pub fn handle_file_drops(ctx: &egui::Context, controller: &mut AppController) {
    let (hovering, dropped) = ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));

    if !dropped.is_empty() {
        let files = dropped
            .into_iter()
            .filter_map(|file| match (file.path, file.bytes) {
                (Some(path), _) => Some(PendingFile::from_path(&path)),
                (None, Some(bytes)) => Some(PendingFile::from_bytes(file.name, bytes)),
                (None, None) => None,
            })
            .collect();
        controller.drop_files(files);
    } else if hovering {
        if controller.intake().is_drag_active() {
            controller.drag_over();
        } else {
            controller.drag_enter();
        }
    } else if controller.intake().is_drag_active() {
        controller.drag_leave();
    }
}

pub fn show_intake_view(ui: &mut egui::Ui, controller: &mut AppController) {
    ui.vertical_centered(|ui| {
        ui.heading("Upload Taxi Trip Data");
        ui.label("Upload a CSV file containing taxi trip data with columns like pickup_datetime and fare_amount");
        ui.add_space(12.0);

        let active = controller.intake().is_drag_active();
        let (fill, stroke) = if active {
            (egui::Color32::from_rgb(230, 240, 255), egui::Color32::from_rgb(70, 130, 230))
        } else {
            (ui.visuals().faint_bg_color, ui.visuals().widgets.noninteractive.bg_stroke.color)
        };

        egui::Frame::group(ui.style())
            .fill(fill)
            .stroke(egui::Stroke::new(2.0, stroke))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_size(egui::vec2(ui.available_width().min(520.0), DROP_ZONE_HEIGHT));
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("📁").size(36.0));

                    match controller.intake().pending() {
                        Some(file) => {
                            ui.strong(&file.name);
                            ui.label(file.size_mb());
                        }
                        None => {
                            ui.label("Drag & drop your CSV file here");
                            ui.label("or");
                        }
                    }

                    let loading = controller.session().is_loading();
                    if ui.add_enabled(!loading, egui::Button::new("Browse Files")).clicked() {
                        browse(controller);
                    }
                });
            });

        if controller.intake().pending().is_some() {
            ui.add_space(12.0);
            let analyze = egui::Button::new(egui::RichText::new("Analyze Trips").strong())
                .min_size(egui::vec2(160.0, 32.0));
            if ui.add_enabled(!controller.session().is_loading(), analyze).clicked() {
                controller.submit();
            }
        }
    });
}

fn browse(controller: &mut AppController) {
    let file_dialog = FileDialog::new()
        .add_filter("CSV files", &["csv"])
        .set_title("Select Taxi Trip Data");

    if let Some(path) = file_dialog.pick_file() {
        controller.select_file(PendingFile::from_path(&path));
    }
}
