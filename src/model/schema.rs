use super::{ProjectGroup, TaskRecord, TaskState};

/// Which field a display column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    ProjectName,
    Deadline,
    Leader,
    Describe,
    StartTime,
    EndTime,
    Member,
    State,
}

impl ColumnKey {
    /// Project-level columns are shown once per project and merged across its rows.
    pub fn is_project_level(self) -> bool {
        matches!(self, ColumnKey::ProjectName | ColumnKey::Deadline | ColumnKey::Leader)
    }
}

/// One column of the overview table and the exported sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: String,
    pub key: ColumnKey,
    /// Relative width; the table view scales these to the panel, the
    /// sheet writer to character widths.
    pub width: f32,
}

impl Column {
    fn new(label: &str, key: ColumnKey, width: f32) -> Self {
        Self {
            label: label.to_string(),
            key,
            width,
        }
    }
}

/// The ordered set of columns used by the table view and the export.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySchema {
    pub columns: Vec<Column>,
}

impl Default for DisplaySchema {
    fn default() -> Self {
        Self {
            columns: vec![
                Column::new("Project", ColumnKey::ProjectName, 0.10),
                Column::new("Deadline", ColumnKey::Deadline, 0.10),
                Column::new("Leader", ColumnKey::Leader, 0.10),
                Column::new("Task", ColumnKey::Describe, 0.35),
                Column::new("Start", ColumnKey::StartTime, 0.10),
                Column::new("End", ColumnKey::EndTime, 0.10),
                Column::new("Members", ColumnKey::Member, 0.10),
                Column::new("Status", ColumnKey::State, 0.05),
            ],
        }
    }
}

impl DisplaySchema {
    /// Status header annotated with the numeric code of every state.
    pub fn status_legend(label: &str) -> String {
        let codes: Vec<String> = TaskState::all()
            .iter()
            .map(|s| format!("{}={}", s.code(), s.label().to_lowercase()))
            .collect();
        format!("{} ({})", label, codes.join(", "))
    }
}

/// Text of a project-level or task-level cell.
pub fn cell_text(key: ColumnKey, project: &ProjectGroup, task: &TaskRecord) -> String {
    match key {
        ColumnKey::ProjectName => project.name.clone(),
        ColumnKey::Deadline => project.deadline.clone(),
        ColumnKey::Leader => project.leader.clone(),
        ColumnKey::Describe => task.describe.clone(),
        ColumnKey::StartTime => task.start_time.clone(),
        ColumnKey::EndTime => task.end_time.clone(),
        ColumnKey::Member => task.member.clone(),
        ColumnKey::State => task.state.code().to_string(),
    }
}
