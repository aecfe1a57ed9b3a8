use egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_phosphor::regular as icons;

use crate::model::schema::cell_text;
use crate::model::{ColumnKey, DisplaySchema, ProjectGroup, TaskRecord};
use crate::ui::theme;

/// Task rows shown per table page.
pub const PAGE_SIZE: usize = 15;

/// One table row: a task and the project it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRow<'a> {
    pub project: &'a ProjectGroup,
    pub task: &'a TaskRecord,
    /// Position of the task inside its project.
    pub index: usize,
}

impl TableRow<'_> {
    /// Project-level cells are shown on a project's first row, and again at
    /// the top of a page so a project continued from the previous page
    /// stays identified.
    fn shows_project(&self, page_position: usize) -> bool {
        self.index == 0 || page_position == 0
    }
}

/// Flatten projects into table rows, in project then task order.
pub fn table_rows(projects: &[ProjectGroup]) -> Vec<TableRow<'_>> {
    projects
        .iter()
        .flat_map(|project| {
            project
                .task_slice
                .iter()
                .enumerate()
                .map(move |(index, task)| TableRow { project, task, index })
        })
        .collect()
}

/// Number of pages needed for `rows` rows; at least one.
pub fn page_count(rows: usize) -> usize {
    rows.div_ceil(PAGE_SIZE).max(1)
}

/// Rows of page `page`, clamped to the last page.
pub fn page_rows<'r, 'a>(rows: &'r [TableRow<'a>], page: usize) -> (usize, &'r [TableRow<'a>]) {
    let page = page.min(page_count(rows.len()) - 1);
    let start = page * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(rows.len());
    (page, &rows[start..end])
}

/// Actions that the task table can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTableAction {
    None,
    OpenProject(i64),
    OpenTask(i64),
}

/// Render the filtered projects as a paged table, one row per task.
///
/// Project-level columns are written once per project on each page, so a
/// project reads as one block. `None` means no search has run. The current
/// page lives in egui memory.
pub fn show_task_table(
    projects: Option<&[ProjectGroup]>,
    schema: &DisplaySchema,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;

    let Some(projects) = projects else {
        placeholder(ui, "Press Search to load the overview.");
        return action;
    };
    if projects.is_empty() {
        placeholder(ui, "No tasks match the filter.");
        return action;
    }

    let rows = table_rows(projects);
    let page_id = ui.id().with("task_table_page");
    let stored = ui.data(|d| d.get_temp::<usize>(page_id)).unwrap_or(0);
    let (mut page, shown) = page_rows(&rows, stored);
    let pages = page_count(rows.len());

    egui::TopBottomPanel::bottom("task_table_pager")
        .frame(egui::Frame::none().inner_margin(egui::Margin::symmetric(0.0, 4.0)))
        .show_inside(ui, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(page + 1 < pages, egui::Button::new(icons::CARET_RIGHT))
                    .on_hover_text("Next page")
                    .clicked()
                {
                    page += 1;
                }
                ui.label(
                    RichText::new(format!("Page {} / {} · {} tasks", page + 1, pages, rows.len()))
                        .font(theme::font_status())
                        .color(theme::TEXT_SECONDARY),
                );
                if ui
                    .add_enabled(page > 0, egui::Button::new(icons::CARET_LEFT))
                    .on_hover_text("Previous page")
                    .clicked()
                {
                    page -= 1;
                }
            });
        });
    ui.data_mut(|d| d.insert_temp(page_id, page));

    let available = ui.available_width();
    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
    for column in &schema.columns {
        table = table.column(Column::initial(column.width * available).at_least(40.0).clip(true));
    }

    table
        .header(theme::TABLE_ROW_HEIGHT, |mut header| {
            for column in &schema.columns {
                header.col(|ui| {
                    ui.label(RichText::new(&column.label).font(theme::font_header()).strong());
                });
            }
        })
        .body(|body| {
            body.rows(theme::TABLE_ROW_HEIGHT, shown.len(), |mut row| {
                let position = row.index();
                let TableRow { project, task, .. } = shown[position];
                let shows_project = shown[position].shows_project(position);
                for column in &schema.columns {
                    row.col(|ui| {
                        if column.key.is_project_level() && !shows_project {
                            return;
                        }
                        let text = cell_text(column.key, project, task);
                        match column.key {
                            ColumnKey::ProjectName => {
                                if ui.link(text).clicked() {
                                    action = TaskTableAction::OpenProject(project.id);
                                }
                            }
                            ColumnKey::Describe => {
                                if ui.link(text).on_hover_text(&task.describe).clicked() {
                                    action = TaskTableAction::OpenTask(task.id);
                                }
                            }
                            ColumnKey::State => {
                                ui.label(
                                    RichText::new(task.state.label())
                                        .color(theme::state_color(task.state)),
                                );
                            }
                            _ => {
                                ui.label(RichText::new(text).font(theme::font_cell()));
                            }
                        }
                    });
                }
            });
        });

    action
}

fn placeholder(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui| {
        ui.label(RichText::new(text).color(theme::TEXT_DIM));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskState;
    use pretty_assertions::assert_eq;

    fn project(id: i64, tasks: usize) -> ProjectGroup {
        ProjectGroup {
            id,
            name: format!("P{}", id),
            deadline: String::new(),
            leader: String::new(),
            task_slice: (0..tasks)
                .map(|i| TaskRecord {
                    id: id * 100 + i as i64,
                    describe: format!("task {}", i),
                    member: String::new(),
                    start_time: String::new(),
                    end_time: String::new(),
                    state: TaskState::Created,
                })
                .collect(),
        }
    }

    fn task_ids(rows: &[TableRow<'_>]) -> Vec<i64> {
        rows.iter().map(|r| r.task.id).collect()
    }

    #[test]
    fn rows_follow_project_then_task_order() {
        let projects = vec![project(1, 2), project(2, 1)];
        let rows = table_rows(&projects);
        assert_eq!(task_ids(&rows), vec![100, 101, 200]);
        assert_eq!(rows.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1, 0]);
    }

    #[test]
    fn pages_hold_fifteen_rows_and_clamp_past_the_end() {
        let projects = vec![project(1, 10), project(2, 22)];
        let rows = table_rows(&projects);
        assert_eq!(page_count(rows.len()), 3);
        assert_eq!(page_count(0), 1);

        let (page, first) = page_rows(&rows, 0);
        assert_eq!((page, first.len()), (0, PAGE_SIZE));

        let (page, last) = page_rows(&rows, 9);
        assert_eq!(page, 2);
        assert_eq!(task_ids(last), vec![220, 221]);
    }

    #[test]
    fn continued_project_is_labelled_at_the_top_of_a_page() {
        let projects = vec![project(1, 20)];
        let rows = table_rows(&projects);
        let (_, second) = page_rows(&rows, 1);
        assert!(second[0].shows_project(0));
        assert!(!second[1].shows_project(1));
        assert!(rows[0].shows_project(0));
    }
}
