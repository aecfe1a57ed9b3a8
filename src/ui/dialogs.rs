use crate::app::OverviewApp;
use crate::state::{Action, Notice};
use crate::ui::theme;
use egui::{Context, RichText, Ui, Window};

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut OverviewApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::ABOUT_DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Task Overview").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Cross-project task overview");
                ui.label("built with Rust and egui.");
                ui.add_space(6.0);
                ui.label(
                    RichText::new(format!("Service: {}", app.settings.api_base_url))
                        .small()
                        .color(theme::TEXT_DIM),
                );
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}

/// Render the current notice in the status bar. Returns a dismiss
/// action when the user closes it.
pub fn show_notice(notice: Option<&Notice>, ui: &mut Ui) -> Option<Action> {
    let notice = notice?;
    let mut action = None;
    ui.label(
        RichText::new(&notice.text)
            .font(theme::font_status())
            .color(theme::notice_color(notice.level)),
    );
    let close = egui::Button::new(RichText::new("✕").size(10.0).color(theme::TEXT_DIM)).frame(false);
    if ui.add(close).on_hover_text("Dismiss").clicked() {
        action = Some(Action::DismissNotice);
    }
    action
}
