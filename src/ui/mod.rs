//! User interface of the area check form.
//!
//! # Module Organization
//!
//! - `state` - The application struct and every state transition
//! - this module - Drawing the form, the results table and the error toasts

mod state;

#[cfg(test)]
mod tests;

pub use state::{AreaCheckApp, FieldBuffer};

use crate::constants::SCALE_VALUES;
use crate::submission::TableRow;
use crate::types::Axis;
use eframe::egui;
use web_time::Instant;

impl eframe::App for AreaCheckApp {
    /// Main update function called by egui for each frame.
    ///
    /// Draws the form and the results, then runs whatever timers and replies
    /// are due and asks for a repaint when the next one will be.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_form(ui, now);
            ui.separator();
            self.draw_results(ui);
        });

        if let Some(deadline) = self.tick(now) {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        self.draw_errors(ctx);
    }
}

impl AreaCheckApp {
    /// Draws the coordinate fields, the scale selector and the submit button.
    pub fn draw_form(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.heading("Area check");

        egui::Grid::new("point_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("X:");
                self.draw_coordinate_input(ui, Axis::X, now);
                ui.end_row();

                ui.label("Y:");
                self.draw_coordinate_input(ui, Axis::Y, now);
                ui.end_row();

                ui.label("Scale:");
                ui.horizontal(|ui| {
                    for value in SCALE_VALUES {
                        // Checked state always mirrors the form, so a click
                        // on the selected box keeps it selected.
                        let mut checked = self.form.scale() == value;
                        if ui.checkbox(&mut checked, value.to_string()).clicked() {
                            self.select_scale(value, now);
                        }
                    }
                });
                ui.end_row();
            });

        ui.add_space(8.0);
        if ui.button("Check").clicked() {
            self.submit();
        }
    }

    fn draw_coordinate_input(&mut self, ui: &mut egui::Ui, axis: Axis, now: Instant) {
        let field = match axis {
            Axis::X => &mut self.x_input,
            Axis::Y => &mut self.y_input,
        };

        let mut edit = egui::TextEdit::singleline(&mut field.text)
            .id_salt(("coordinate_input", axis))
            .desired_width(140.0);
        if field.invalid.is_some() {
            edit = edit.text_color(ui.visuals().error_fg_color);
        }
        let response = ui.add(edit);
        let changed = response.changed();
        if let Some(message) = &field.invalid {
            response.on_hover_text(message.as_str());
        }

        if changed {
            self.input.on_input(axis, now);
        }
    }

    /// Draws the check history, newest first.
    pub fn draw_results(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("results_table")
                .num_columns(TableRow::HEADERS.len())
                .striped(true)
                .show(ui, |ui| {
                    for header in TableRow::HEADERS {
                        ui.strong(header);
                    }
                    ui.end_row();

                    for row in &self.results.rows {
                        for cell in row.cells() {
                            ui.label(cell);
                        }
                        ui.end_row();
                    }
                });
        });
    }

    fn draw_errors(&self, ctx: &egui::Context) {
        if self.errors.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("error_toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .show(ctx, |ui| {
                let color = ui.visuals().error_fg_color;
                for message in self.errors.messages() {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.colored_label(color, message);
                    });
                }
            });
    }
}
