use crate::app::OverviewApp;
use crate::io::export::ExportFormat;
use crate::state::{Action, ViewMode};
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut OverviewApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  Open Snapshot...").clicked() {
                app.open_snapshot();
                ui.close_menu();
            }
            if ui.button("  Save Snapshot...").clicked() {
                app.save_snapshot();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Export XLSX...").clicked() {
                app.export(ExportFormat::Xlsx);
                ui.close_menu();
            }
            if ui.button("  Export CSV...").clicked() {
                app.export(ExportFormat::Csv);
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button("  Refresh          F5").clicked() {
                app.refresh(ui.ctx());
                ui.close_menu();
            }
            ui.separator();
            let mut view = app.state.view;
            ui.radio_value(&mut view, ViewMode::Table, "Table");
            ui.radio_value(&mut view, ViewMode::Gantt, "Gantt");
            if view != app.state.view {
                app.dispatch(Action::ToggleView);
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        // Right-aligned service address
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(&app.settings.api_base_url)
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
