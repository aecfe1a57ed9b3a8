//! Geometry of the Gantt overview.
//!
//! Everything here is pure: the filtered project set and a [`TimeWindow`]
//! go in, pixel coordinates for the three panels come out. The painter in
//! [`crate::ui::gantt_chart`] only draws what these structs describe.

pub mod brief;
pub mod grid;
pub mod scroll;
pub mod timeline;

use chrono::{Duration, NaiveDate};

use crate::config::Settings;
use crate::model::timeline::MIN_WINDOW_DAYS;
use crate::model::{ProjectGroup, TimeWindow};

pub use brief::{BriefGeometry, BriefGroup, BriefRow};
pub use grid::{GridGeometry, TaskBar};
pub use scroll::{ScrollSync, SyncedOffsets};
pub use timeline::{DayCell, MonthSegment, TimelineGeometry};

/// Sizes shared by the timeline, brief panel and grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub cell_width: f32,
    pub cell_height: f32,
    /// Brief panel: project-name column width.
    pub name_width: f32,
    /// Brief panel: leader column width.
    pub leader_width: f32,
    /// Brief panel: right edge of the task description column.
    pub describe_right: f32,
    /// Brief panel: total width (right edge of the member column).
    pub brief_width: f32,
    /// Descriptions longer than this many characters are cut with "...".
    pub describe_max_chars: usize,
    /// Gap between a bar and its cell edges.
    pub bar_inset: f32,
    pub bar_rounding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_width: 36.0,
            cell_height: 22.0,
            name_width: 100.0,
            leader_width: 60.0,
            describe_right: 420.0,
            brief_width: 540.0,
            describe_max_chars: 16,
            bar_inset: 2.0,
            bar_rounding: 8.0,
        }
    }
}

impl LayoutConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            cell_width: settings.cell_width,
            cell_height: settings.cell_height,
            ..Default::default()
        }
    }

    /// Height of the timeline header and of the brief column header.
    pub fn header_height(&self) -> f32 {
        self.cell_height * 3.0
    }
}

/// Identity of one grid row: the task it shows and the project it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRef {
    pub project_id: i64,
    pub task_id: i64,
}

/// Flatten projects into rows: grouped by project, tasks in insertion order.
///
/// Both the brief panel and the grid are built from this one list.
pub fn flatten_rows(projects: &[ProjectGroup]) -> Vec<RowRef> {
    projects
        .iter()
        .flat_map(|p| {
            p.task_slice.iter().map(move |t| RowRef {
                project_id: p.id,
                task_id: t.id,
            })
        })
        .collect()
}

/// Complete geometry of one overview render.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewLayout {
    pub window: TimeWindow,
    pub rows: Vec<RowRef>,
    pub timeline: TimelineGeometry,
    pub brief: BriefGeometry,
    pub grid: GridGeometry,
}

/// Lay out `projects` over `window`. `None` for an empty project set,
/// in which case the caller shows the empty-state placeholder.
pub fn layout(
    projects: &[ProjectGroup],
    window: TimeWindow,
    config: &LayoutConfig,
) -> Option<OverviewLayout> {
    if projects.is_empty() {
        return None;
    }
    let rows = flatten_rows(projects);
    let timeline = timeline::build(window, config);
    let brief = brief::build(projects, &rows, config);
    let grid = grid::build(projects, &rows, window, config);
    tracing::debug!(
        rows = rows.len(),
        days = window.days(),
        width = grid.width,
        height = grid.height,
        "overview layout computed"
    );
    Some(OverviewLayout {
        window,
        rows,
        timeline,
        brief,
        grid,
    })
}

/// Window for `projects`, falling back to a minimum-length window from
/// `today` when no task carries a readable date.
pub fn window_for(projects: &[ProjectGroup], today: NaiveDate) -> TimeWindow {
    TimeWindow::from_projects(projects).unwrap_or(TimeWindow {
        start: today,
        end: today + Duration::days(MIN_WINDOW_DAYS),
    })
}

/// Horizontal grid offset that brings `filter_start` to the left edge.
pub fn initial_scroll_x(window: TimeWindow, filter_start: NaiveDate, config: &LayoutConfig) -> f32 {
    window.date_to_x(filter_start, config.cell_width).max(0.0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{TaskRecord, TaskState};
    use pretty_assertions::assert_eq;

    pub(crate) fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn task(id: i64, start: &str, end: &str, state: TaskState) -> TaskRecord {
        TaskRecord {
            id,
            describe: format!("Task number {}", id),
            member: "Ann, Bob".into(),
            start_time: start.into(),
            end_time: end.into(),
            state,
        }
    }

    /// Two projects with 3 and 2 tasks.
    pub(crate) fn two_projects() -> Vec<ProjectGroup> {
        vec![
            ProjectGroup {
                id: 1,
                name: "Apollo".into(),
                deadline: "2024-03-31".into(),
                leader: "Ann，Cid".into(),
                task_slice: vec![
                    task(10, "2024-01-01 00:00:00", "2024-01-05 00:00:00", TaskState::Created),
                    task(11, "2024-01-03 00:00:00", "2024-01-03 00:00:00", TaskState::Underway),
                    task(12, "2024-01-20 00:00:00", "2024-02-10 00:00:00", TaskState::Finished),
                ],
            },
            ProjectGroup {
                id: 2,
                name: "Borealis".into(),
                deadline: "2024-04-30".into(),
                leader: "Bob".into(),
                task_slice: vec![
                    task(20, "2024-01-15 00:00:00", "2024-01-16 00:00:00", TaskState::Testing),
                    task(21, "bogus", "2024-01-16 00:00:00", TaskState::Testing),
                ],
            },
        ]
    }

    #[test]
    fn empty_project_set_has_no_layout() {
        let window = TimeWindow { start: ymd(2024, 1, 1), end: ymd(2024, 2, 15) };
        assert_eq!(layout(&[], window, &LayoutConfig::default()), None);
    }

    #[test]
    fn five_tasks_make_five_rows_with_spans_three_then_two() {
        let projects = two_projects();
        let config = LayoutConfig::default();
        let window = window_for(&projects, ymd(2024, 1, 1));
        let out = layout(&projects, window, &config).unwrap();

        assert_eq!(out.rows.len(), 5);
        assert_eq!(out.grid.rows, 5);
        assert_eq!(out.grid.height, 5.0 * config.cell_height);
        let spans: Vec<usize> = out.brief.groups.iter().map(|g| g.row_span).collect();
        assert_eq!(spans, vec![3, 2]);
        assert_eq!(out.brief.groups[1].first_row, 3);
    }

    #[test]
    fn brief_and_grid_share_row_order() {
        let projects = two_projects();
        let config = LayoutConfig::default();
        let out = layout(&projects, window_for(&projects, ymd(2024, 1, 1)), &config).unwrap();

        let brief_order: Vec<i64> = out.brief.rows.iter().map(|r| r.task_id).collect();
        let row_order: Vec<i64> = out.rows.iter().map(|r| r.task_id).collect();
        assert_eq!(brief_order, row_order);
        for (i, row) in out.brief.rows.iter().enumerate() {
            assert_eq!(row.row, i);
        }
        for bar in &out.grid.bars {
            assert_eq!(out.rows[bar.row].task_id, bar.task_id);
            assert_eq!(out.brief.rows[bar.row].task_id, bar.task_id);
        }
    }

    #[test]
    fn unreadable_task_keeps_its_row_without_a_bar() {
        let projects = two_projects();
        let out = layout(
            &projects,
            window_for(&projects, ymd(2024, 1, 1)),
            &LayoutConfig::default(),
        )
        .unwrap();
        assert_eq!(out.grid.bars.len(), 4);
        assert!(out.grid.bars.iter().all(|b| b.task_id != 21));
        assert_eq!(out.brief.rows[4].task_id, 21);
    }

    #[test]
    fn window_falls_back_to_today_when_no_dates_parse() {
        let mut projects = two_projects();
        projects.truncate(1);
        for t in &mut projects[0].task_slice {
            t.start_time = "tbd".into();
            t.end_time = "tbd".into();
        }
        let window = window_for(&projects, ymd(2024, 5, 1));
        assert_eq!(window.start, ymd(2024, 5, 1));
        assert_eq!(window.days(), MIN_WINDOW_DAYS + 1);
    }

    #[test]
    fn initial_scroll_points_at_filter_start() {
        let config = LayoutConfig::default();
        let window = TimeWindow { start: ymd(2024, 1, 1), end: ymd(2024, 3, 1) };
        assert_eq!(initial_scroll_x(window, ymd(2024, 1, 11), &config), 360.0);
        assert_eq!(initial_scroll_x(window, ymd(2023, 12, 1), &config), 0.0);
    }
}
