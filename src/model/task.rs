use serde::{Deserialize, Serialize};

/// Workflow state of a task as reported by the service (`state` 0..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TaskState {
    #[default]
    Created,
    Underway,
    Testing,
    Finished,
    /// A code outside 0..=3, kept verbatim.
    Unknown(i64),
}

impl TaskState {
    /// The known states, in workflow order.
    pub fn all() -> &'static [TaskState] {
        &[
            TaskState::Created,
            TaskState::Underway,
            TaskState::Testing,
            TaskState::Finished,
        ]
    }

    /// Numeric code used on the wire and in exported sheets.
    pub fn code(self) -> i64 {
        match self {
            TaskState::Created => 0,
            TaskState::Underway => 1,
            TaskState::Testing => 2,
            TaskState::Finished => 3,
            TaskState::Unknown(code) => code,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskState::Created => "Pending",
            TaskState::Underway => "In Progress",
            TaskState::Testing => "Testing",
            TaskState::Finished => "Done",
            TaskState::Unknown(_) => "Unknown",
        }
    }
}

impl From<i64> for TaskState {
    fn from(code: i64) -> Self {
        match code {
            0 => TaskState::Created,
            1 => TaskState::Underway,
            2 => TaskState::Testing,
            3 => TaskState::Finished,
            other => TaskState::Unknown(other),
        }
    }
}

impl From<TaskState> for i64 {
    fn from(state: TaskState) -> Self {
        state.code()
    }
}

/// A single task row of the overview.
///
/// Times are kept as the service sends them; parsing happens in
/// [`crate::model::timeline`] so a malformed value never drops the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: i64,
    pub describe: String,
    /// Distinct creator/developer/tester names, joined with ", ".
    pub member: String,
    pub start_time: String,
    pub end_time: String,
    pub state: TaskState,
}
