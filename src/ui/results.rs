// src/ui/results.rs
use eframe::egui;
use egui_plot::{Bar, BarChart, Plot};

use crate::analysis::Section;
use crate::controller::AppController;
use crate::render::{ResultsView, TableView};

const HIGHLIGHT: egui::Color32 = egui::Color32::from_rgb(255, 243, 205);
const BAR_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);

pub fn show_results_view(ui: &mut egui::Ui, controller: &mut AppController) {
    // Cloned so the controller stays free for the button handlers below
    let Some(view) = controller.results_view().cloned() else {
        return;
    };
    let downloading = controller.export().is_downloading();
    let mut export_request = None;
    let mut reset = false;

    ui.horizontal(|ui| {
        ui.heading("📊 Analysis Results");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Upload New File").clicked() {
                reset = true;
            }
        });
    });
    if let Some(received) = controller.received_at() {
        ui.label(format!("Received: {}", received.format("%Y-%m-%d %H:%M:%S")));
    }
    if let Some(path) = controller.export().last_saved() {
        ui.label(format!("Last export saved to {}", path.display()));
    }
    ui.add_space(8.0);

    egui::ScrollArea::vertical()
        .id_source("results_scroll")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for section in [Section::BestHours, Section::BestZones] {
                let Some(table) = view.table(section) else {
                    continue;
                };
                ui.group(|ui| {
                    ui.set_width(ui.available_width());
                    if draw_table(ui, table, downloading) {
                        export_request = Some(table.section);
                    }
                    if section == Section::BestHours {
                        draw_hourly_chart(ui, &view);
                    }
                });
                ui.add_space(8.0);
            }

            ui.group(|ui| {
                ui.set_width(ui.available_width());
                ui.heading("💡 Key Insights");
                for insight in &view.insights {
                    ui.horizontal_wrapped(|ui| {
                        ui.strong(format!("{}:", insight.label));
                        ui.label(&insight.text);
                    });
                }
            });
        });

    if let Some(section) = export_request {
        controller.request_export(section);
    }
    if reset {
        controller.reset();
    }
}

/// Returns true when the table's download button was clicked.
fn draw_table(ui: &mut egui::Ui, table: &TableView, downloading: bool) -> bool {
    let mut clicked = false;

    ui.horizontal(|ui| {
        ui.heading(table.title());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = if downloading { "Downloading..." } else { "📥 Download CSV" };
            if ui.add_enabled(!downloading, egui::Button::new(label)).clicked() {
                clicked = true;
            }
        });
    });
    ui.add_space(4.0);

    egui::Grid::new(("results_table", table.section.wire_name()))
        .num_columns(table.headers.len())
        .striped(true)
        .spacing([40.0, 6.0])
        .show(ui, |ui| {
            for header in table.headers {
                ui.strong(header);
            }
            ui.end_row();

            for row in &table.rows {
                for cell in &row.cells {
                    if row.highlighted {
                        ui.label(egui::RichText::new(cell).strong().background_color(HIGHLIGHT).color(egui::Color32::BLACK));
                    } else {
                        ui.label(cell);
                    }
                }
                ui.end_row();
            }
        });

    clicked
}

fn draw_hourly_chart(ui: &mut egui::Ui, view: &ResultsView) {
    if view.hourly_fares.is_empty() {
        return;
    }

    ui.add_space(8.0);
    ui.label("Average fare by hour of day");
    let bars: Vec<Bar> = view.hourly_fares
        .iter()
        .map(|(hour, fare)| Bar::new(*hour, *fare).width(0.8).fill(BAR_COLOR))
        .collect();

    Plot::new(("hourly_fares", view.hourly_fares.len()))
        .height(180.0)
        .allow_zoom(false)
        .allow_drag(false)
        .include_y(0.0)
        .include_x(-0.5)
        .include_x(23.5)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Average fare ($)"));
        });
}
