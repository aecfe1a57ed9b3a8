use egui::{RichText, Ui};
use egui_phosphor::regular as icons;

use crate::io::payload::User;
use crate::model::FilterCriteria;
use crate::state::{FilterEdit, ViewMode};
use crate::ui::theme;

/// Actions the filter bar can request.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterBarAction {
    None,
    Edit(FilterEdit),
    Search,
    Reset,
    Export,
    ToggleView,
}

/// Render the filter row: month range, member, task keyword and the
/// action buttons. Edits only touch the draft; nothing filters until
/// Search is pressed.
pub fn show_filter_bar(
    draft: &FilterCriteria,
    users: &[User],
    view: ViewMode,
    loading: bool,
    ui: &mut Ui,
) -> FilterBarAction {
    let mut action = FilterBarAction::None;

    ui.horizontal_centered(|ui| {
        ui.label(RichText::new("From").color(theme::TEXT_SECONDARY));
        let mut start = draft.start_date;
        ui.add(egui_extras::DatePickerButton::new(&mut start).id_salt("filter_start").format("%Y-%m"));
        if start != draft.start_date {
            action = FilterBarAction::Edit(FilterEdit::StartDate(start));
        }

        ui.label(RichText::new("To").color(theme::TEXT_SECONDARY));
        let mut end = draft.end_date;
        ui.add(egui_extras::DatePickerButton::new(&mut end).id_salt("filter_end").format("%Y-%m"));
        if end != draft.end_date {
            action = FilterBarAction::Edit(FilterEdit::EndDate(end));
        }

        ui.separator();
        ui.label(RichText::new(icons::USER).color(theme::TEXT_SECONDARY));
        let selected = if draft.member_key.is_empty() {
            "All members".to_string()
        } else {
            draft.member_key.clone()
        };
        egui::ComboBox::from_id_salt("filter_member")
            .selected_text(selected)
            .width(140.0)
            .show_ui(ui, |ui| {
                if ui.selectable_label(draft.member_key.is_empty(), "All members").clicked() {
                    action = FilterBarAction::Edit(FilterEdit::MemberKey(String::new()));
                }
                for user in users {
                    if ui.selectable_label(draft.member_key == user.name, &user.name).clicked() {
                        action = FilterBarAction::Edit(FilterEdit::MemberKey(user.name.clone()));
                    }
                }
            });

        ui.label(RichText::new(icons::MAGNIFYING_GLASS).color(theme::TEXT_SECONDARY));
        let mut task_key = draft.task_key.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut task_key)
                .hint_text("Task keyword or pattern")
                .desired_width(180.0),
        );
        if response.changed() {
            action = FilterBarAction::Edit(FilterEdit::TaskKey(task_key));
        } else if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            action = FilterBarAction::Search;
        }

        ui.separator();
        if ui.button(format!("{} Reset", icons::ARROW_COUNTER_CLOCKWISE)).clicked() {
            action = FilterBarAction::Reset;
        }
        let search = egui::Button::new(
            RichText::new(format!("{} Search", icons::FUNNEL)).color(egui::Color32::WHITE),
        )
        .fill(theme::ACCENT);
        if ui.add_enabled(!loading, search).clicked() {
            action = FilterBarAction::Search;
        }
        if ui.button(format!("{} Export", icons::FILE_XLS)).clicked() {
            action = FilterBarAction::Export;
        }
        let toggle = match view {
            ViewMode::Table => format!("{} Gantt", icons::CHART_BAR_HORIZONTAL),
            ViewMode::Gantt => format!("{} Table", icons::TABLE),
        };
        if ui.button(toggle).clicked() {
            action = FilterBarAction::ToggleView;
        }

        if loading {
            ui.spinner();
        }
    });

    action
}
