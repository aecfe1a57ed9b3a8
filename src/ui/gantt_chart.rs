use egui::scroll_area::ScrollBarVisibility;
use egui::{Align2, CursorIcon, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};

use crate::layout::brief::{column_dividers, header_labels};
use crate::layout::{BriefGeometry, GridGeometry, LayoutConfig, OverviewLayout, ScrollSync, TimelineGeometry};
use crate::model::{StatusCounter, TaskState};
use crate::ui::theme;

/// What the user asked for while interacting with the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartInteraction {
    pub open_project: Option<i64>,
    pub open_task: Option<i64>,
}

/// Render the Gantt overview: state summary, then the brief panel and
/// timeline header around the scrollable grid.
pub fn show_gantt_chart(
    overview: Option<&OverviewLayout>,
    counter: &StatusCounter,
    config: &LayoutConfig,
    sync: &mut ScrollSync,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();

    show_status_summary(counter, ui);
    ui.add_space(6.0);

    let Some(overview) = overview else {
        ui.centered_and_justified(|ui| {
            ui.label(
                RichText::new("No tasks to show. Adjust the filter and press Search.")
                    .color(theme::TEXT_DIM),
            );
        });
        return interaction;
    };

    ui.spacing_mut().item_spacing = Vec2::ZERO;
    let offsets = sync.synced();

    ui.horizontal_top(|ui| {
        paint_brief_header(ui, config);
        egui::ScrollArea::horizontal()
            .id_salt("overview-timeline")
            .enable_scrolling(false)
            .scroll_bar_visibility(ScrollBarVisibility::AlwaysHidden)
            .horizontal_scroll_offset(offsets.timeline_x)
            .auto_shrink([false, true])
            .show(ui, |ui| paint_timeline(ui, &overview.timeline));
    });

    let grid_height = ui.available_height();
    ui.horizontal_top(|ui| {
        egui::ScrollArea::vertical()
            .id_salt("overview-brief")
            .enable_scrolling(false)
            .scroll_bar_visibility(ScrollBarVisibility::AlwaysHidden)
            .vertical_scroll_offset(offsets.brief_y)
            .max_height(sync.brief_visible_height(grid_height))
            .max_width(config.brief_width)
            .auto_shrink([true, false])
            .show(ui, |ui| paint_brief(ui, &overview.brief, config, &mut interaction));

        sync.measure(|| ui.spacing().scroll.allocated_width());
        let mut grid_area = egui::ScrollArea::both()
            .id_salt("overview-grid")
            .max_height(grid_height)
            .auto_shrink([false, false]);
        if let Some(x) = sync.take_jump() {
            grid_area = grid_area.horizontal_scroll_offset(x).vertical_scroll_offset(0.0);
        }
        let output = grid_area.show(ui, |ui| paint_grid(ui, overview, &mut interaction));

        let before = sync.synced();
        if sync.on_grid_scroll(output.state.offset) != before {
            // followers were drawn with last frame's offset
            ui.ctx().request_repaint();
        }
    });

    interaction
}

fn show_status_summary(counter: &StatusCounter, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for &state in TaskState::all() {
            egui::Frame::none()
                .fill(theme::BG_BADGE)
                .inner_margin(egui::Margin::symmetric(8.0, 2.0))
                .show(ui, |ui| {
                    ui.label(RichText::new(state.label()).color(theme::TEXT_PRIMARY));
                });
            egui::Frame::none()
                .fill(theme::state_color(state))
                .inner_margin(egui::Margin::symmetric(8.0, 2.0))
                .show(ui, |ui| {
                    ui.label(RichText::new(counter.get(state).to_string()).color(theme::TEXT_ON_BAR));
                });
            ui.add_space(16.0);
        }
    });
}

fn paint_brief_header(ui: &mut Ui, config: &LayoutConfig) {
    let height = config.header_height();
    let (response, painter) = ui.allocate_painter(Vec2::new(config.brief_width, height), Sense::hover());
    let offset = response.rect.min.to_vec2();
    painter.rect_filled(response.rect, 0.0, theme::BG_HEADER);

    let stroke = Stroke::new(1.0, theme::BORDER_HEADER);
    for x in column_dividers(config) {
        painter.line_segment([Pos2::new(x, 0.0) + offset, Pos2::new(x, height) + offset], stroke);
    }
    for (pos, label) in header_labels(config) {
        painter.text(pos + offset, Align2::CENTER_CENTER, label, theme::font_header(), theme::TEXT_HEADER);
    }
    painter.rect_stroke(response.rect, 0.0, stroke);
}

fn paint_timeline(ui: &mut Ui, timeline: &TimelineGeometry) {
    let (response, painter) = ui.allocate_painter(Vec2::new(timeline.width, timeline.height), Sense::hover());
    let offset = response.rect.min.to_vec2();
    painter.rect_filled(response.rect, 0.0, theme::BG_HEADER);

    let stroke = Stroke::new(1.0, theme::BORDER_HEADER);
    for [a, b] in &timeline.rules {
        painter.line_segment([*a + offset, *b + offset], stroke);
    }
    for month in &timeline.months {
        painter.text(
            month.label_pos + offset,
            Align2::CENTER_CENTER,
            &month.label,
            theme::font_header(),
            theme::TEXT_HEADER,
        );
        let [a, b] = month.separator;
        painter.line_segment([a + offset, b + offset], stroke);
    }
    for day in &timeline.days {
        let color = if day.is_weekend { theme::TEXT_WEEKEND } else { theme::TEXT_HEADER };
        painter.text(day.weekday_pos + offset, Align2::CENTER_CENTER, &day.weekday, theme::font_cell(), color);
        painter.text(day.day_pos + offset, Align2::CENTER_CENTER, day.day.to_string(), theme::font_cell(), color);
        let [a, b] = day.separator;
        painter.line_segment([a + offset, b + offset], stroke);
    }
}

fn paint_brief(ui: &mut Ui, brief: &BriefGeometry, config: &LayoutConfig, interaction: &mut ChartInteraction) {
    let (response, painter) = ui.allocate_painter(Vec2::new(brief.width, brief.height), Sense::click());
    let offset = response.rect.min.to_vec2();
    painter.rect_filled(response.rect, 0.0, theme::BG_HEADER);

    let stroke = Stroke::new(1.0, theme::BORDER_HEADER);
    for [a, b] in &brief.lines {
        painter.line_segment([*a + offset, *b + offset], stroke);
    }

    let pointer = response.hover_pos().map(|p| p - offset);
    let describe_width = config.describe_right - config.name_width - config.leader_width;

    for group in &brief.groups {
        let hovered = pointer.is_some_and(|p| group.name_rect.contains(p));
        let color = if hovered { theme::ACCENT } else { theme::TEXT_PRIMARY };
        painter.text(
            group.name_rect.center() + offset,
            Align2::CENTER_CENTER,
            &group.name,
            theme::font_cell(),
            color,
        );
        painter.text(
            group.leader_rect.center() + offset,
            Align2::CENTER_CENTER,
            &group.leader,
            theme::font_cell(),
            theme::TEXT_HEADER,
        );
        if hovered {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
            if response.clicked() {
                interaction.open_project = Some(group.project_id);
            }
        }
    }

    for row in &brief.rows {
        let describe_rect = Rect::from_center_size(row.describe_pos, Vec2::new(describe_width, config.cell_height));
        let hovered = pointer.is_some_and(|p| describe_rect.contains(p));
        let color = if hovered { theme::ACCENT } else { theme::TEXT_HEADER };
        painter.text(row.describe_pos + offset, Align2::CENTER_CENTER, &row.describe, theme::font_cell(), color);
        painter.text(row.member_pos + offset, Align2::CENTER_CENTER, &row.member, theme::font_cell(), theme::TEXT_HEADER);
        if hovered {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
            if response.clicked() {
                interaction.open_task = Some(row.task_id);
            }
        }
    }
}

fn paint_grid(ui: &mut Ui, overview: &OverviewLayout, interaction: &mut ChartInteraction) {
    let grid: &GridGeometry = &overview.grid;
    let (response, painter) = ui.allocate_painter(Vec2::new(grid.width, grid.height), Sense::click());
    let offset = response.rect.min.to_vec2();
    painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

    let stroke = Stroke::new(1.0, theme::GRID_LINE);
    for [a, b] in &grid.lines {
        painter.line_segment([*a + offset, *b + offset], stroke);
    }

    let hovered = response.hover_pos().and_then(|p| grid.bar_at(p - offset));
    for bar in &grid.bars {
        let rect = bar.rect.translate(offset);
        painter.rect_filled(rect, bar.rounding, theme::state_color(bar.state));
        if hovered.is_some_and(|h| h.row == bar.row) {
            painter.rect_stroke(rect.expand(1.0), bar.rounding + 1.0, Stroke::new(1.5, theme::TEXT_ON_BAR));
        }
        painter.text(bar.label_pos + offset, Align2::CENTER_CENTER, &bar.label, theme::font_bar(), theme::TEXT_ON_BAR);
    }

    if response.clicked() {
        if let Some(bar) = response.interact_pointer_pos().and_then(|p| grid.bar_at(p - offset)) {
            interaction.open_task = Some(bar.task_id);
        }
    }

    if let Some(bar) = hovered {
        ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
        let row = overview.brief.rows.get(bar.row);
        let describe = row.map(|r| r.describe.as_str()).unwrap_or_default();
        let member = row.map(|r| r.member.as_str()).unwrap_or_default();
        response.on_hover_ui_at_pointer(|ui| {
            ui.strong(describe);
            ui.label(member);
            ui.label(format!("{} · {}", bar.state.label(), bar.label));
        });
    }
}
