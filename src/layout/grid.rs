use egui::{Pos2, Rect, Vec2};

use super::{LayoutConfig, RowRef};
use crate::model::timeline::{span_days, task_date};
use crate::model::{ProjectGroup, TaskState, TimeWindow};

/// A task's bar in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskBar {
    pub row: usize,
    pub project_id: i64,
    pub task_id: i64,
    pub state: TaskState,
    pub rect: Rect,
    pub rounding: f32,
    /// Inclusive duration in days.
    pub days: i64,
    pub label: String,
    pub label_pos: Pos2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    pub width: f32,
    pub height: f32,
    pub columns: usize,
    pub rows: usize,
    /// Background grid lines.
    pub lines: Vec<[Pos2; 2]>,
    pub bars: Vec<TaskBar>,
}

impl GridGeometry {
    /// The bar under `pos`, if any.
    pub fn bar_at(&self, pos: Pos2) -> Option<&TaskBar> {
        self.bars.iter().find(|b| b.rect.contains(pos))
    }
}

pub(crate) fn build(
    projects: &[ProjectGroup],
    rows: &[RowRef],
    window: TimeWindow,
    config: &LayoutConfig,
) -> GridGeometry {
    let cw = config.cell_width;
    let ch = config.cell_height;
    let columns = window.days().max(0) as usize;
    let width = columns as f32 * cw;
    let height = rows.len() as f32 * ch;

    let mut lines = Vec::with_capacity(columns + rows.len());
    for i in 1..columns {
        let x = cw * i as f32 + 0.5;
        lines.push([Pos2::new(x, 0.0), Pos2::new(x, height)]);
    }
    for i in 1..rows.len() {
        let y = ch * i as f32 + 0.5;
        lines.push([Pos2::new(0.0, y), Pos2::new(width, y)]);
    }
    lines.push([Pos2::new(0.0, height - 0.5), Pos2::new(width, height - 0.5)]);

    let mut bars = Vec::with_capacity(rows.len());
    let tasks = projects
        .iter()
        .flat_map(|p| p.task_slice.iter().map(move |t| (p.id, t)));
    for (row, (project_id, task)) in tasks.enumerate() {
        debug_assert_eq!(rows.get(row).map(|r| r.task_id), Some(task.id));
        let (Some(start), Some(end)) = (task_date(&task.start_time), task_date(&task.end_time)) else {
            tracing::debug!(task = task.id, "task has unreadable dates, no bar drawn");
            continue;
        };
        let days = span_days(start, end).max(1);
        let offset = window.offset_days(start) as f32;
        let x = offset * cw + config.bar_inset;
        let y = row as f32 * ch + config.bar_inset;
        let rect = Rect::from_min_size(
            Pos2::new(x, y),
            Vec2::new(days as f32 * cw - config.bar_inset * 2.0, ch - config.bar_inset * 2.0),
        );
        bars.push(TaskBar {
            row,
            project_id,
            task_id: task.id,
            state: task.state,
            rect,
            rounding: config.bar_rounding,
            days,
            label: format!("{}d", days),
            label_pos: rect.center(),
        });
    }

    GridGeometry {
        width,
        height,
        columns,
        rows: rows.len(),
        lines,
        bars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::flatten_rows;
    use crate::layout::tests::{two_projects, ymd};
    use pretty_assertions::assert_eq;

    #[test]
    fn bars_sit_at_day_offsets_with_inclusive_widths() {
        let config = LayoutConfig::default();
        let projects = two_projects();
        let window = TimeWindow { start: ymd(2024, 1, 1), end: ymd(2024, 2, 15) };
        let geo = build(&projects, &flatten_rows(&projects), window, &config);

        let first = &geo.bars[0];
        assert_eq!(first.row, 0);
        assert_eq!(first.days, 5);
        assert_eq!(first.rect, Rect::from_min_size(Pos2::new(2.0, 2.0), Vec2::new(176.0, 18.0)));
        assert_eq!(first.label, "5d");
        assert_eq!(first.label_pos, Pos2::new(90.0, 11.0));

        let single_day = &geo.bars[1];
        assert_eq!(single_day.days, 1);
        assert_eq!(single_day.rect.min, Pos2::new(74.0, 24.0));
        assert_eq!(single_day.rect.width(), 32.0);

        let borealis = geo.bars.iter().find(|b| b.task_id == 20).unwrap();
        assert_eq!(borealis.row, 3);
        assert_eq!(borealis.project_id, 2);
        assert_eq!(borealis.state, TaskState::Testing);
    }

    #[test]
    fn background_grid_covers_every_cell_boundary() {
        let config = LayoutConfig::default();
        let projects = two_projects();
        let window = TimeWindow { start: ymd(2024, 1, 1), end: ymd(2024, 2, 15) };
        let geo = build(&projects, &flatten_rows(&projects), window, &config);

        assert_eq!(geo.columns, 46);
        assert_eq!(geo.width, 46.0 * 36.0);
        // 45 inner verticals, 4 inner horizontals, 1 bottom edge
        assert_eq!(geo.lines.len(), 45 + 4 + 1);
    }

    #[test]
    fn hit_testing_finds_the_clicked_bar() {
        let config = LayoutConfig::default();
        let projects = two_projects();
        let window = TimeWindow { start: ymd(2024, 1, 1), end: ymd(2024, 2, 15) };
        let geo = build(&projects, &flatten_rows(&projects), window, &config);
        assert_eq!(geo.bar_at(Pos2::new(90.0, 11.0)).map(|b| b.task_id), Some(10));
        assert_eq!(geo.bar_at(Pos2::new(1500.0, 11.0)), None);
    }
}
