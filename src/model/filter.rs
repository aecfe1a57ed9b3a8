use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Regex, RegexBuilder};

use super::timeline::{add_months, comparison_time, month_start};
use super::{ProjectGroup, TaskRecord};

/// User-editable overview filter. Applied only on an explicit search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Case-insensitive pattern matched against the member string.
    pub member_key: String,
    /// Case-insensitive pattern matched against the task description.
    pub task_key: String,
}

impl FilterCriteria {
    /// The criteria a fresh overview starts with: from the start of last
    /// month to the start of next month, no text keys.
    pub fn initial(today: NaiveDate) -> Self {
        let this_month = month_start(today);
        Self {
            start_date: add_months(this_month, -1),
            end_date: add_months(this_month, 1),
            member_key: String::new(),
            task_key: String::new(),
        }
    }

    /// Criteria that keep every task with a readable date range.
    pub fn match_all() -> Self {
        Self {
            start_date: NaiveDate::MIN,
            end_date: NaiveDate::MAX,
            member_key: String::new(),
            task_key: String::new(),
        }
    }
}

/// Compiled form of [`FilterCriteria`], built once per search.
struct TaskMatcher {
    task: Option<Regex>,
    member: Option<Regex>,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TaskMatcher {
    fn new(criteria: &FilterCriteria) -> Self {
        Self {
            task: compile_key(&criteria.task_key),
            member: compile_key(&criteria.member_key),
            start: criteria.start_date.and_time(NaiveTime::MIN),
            end: criteria.end_date.and_time(NaiveTime::MIN),
        }
    }

    fn matches(&self, task: &TaskRecord) -> bool {
        if let Some(re) = &self.task {
            if !re.is_match(&task.describe) {
                return false;
            }
        }
        if let Some(re) = &self.member {
            if !re.is_match(&task.member) {
                return false;
            }
        }
        self.overlaps(task)
    }

    /// Range-overlap test. An unreadable bound never excludes a task.
    fn overlaps(&self, task: &TaskRecord) -> bool {
        let starts_after_task = comparison_time(&task.end_time)
            .map(|end| self.start > end)
            .unwrap_or(false);
        let ends_before_task = comparison_time(&task.start_time)
            .map(|start| self.end < start)
            .unwrap_or(false);
        !(starts_after_task || ends_before_task)
    }
}

/// Empty keys match everything. A key that is not a valid regex is matched
/// literally.
fn compile_key(key: &str) -> Option<Regex> {
    if key.is_empty() {
        return None;
    }
    let built = RegexBuilder::new(key)
        .case_insensitive(true)
        .build()
        .or_else(|e| {
            tracing::debug!(key, error = %e, "filter key is not a regex, matching literally");
            RegexBuilder::new(&regex::escape(key))
                .case_insensitive(true)
                .build()
        });
    match built {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring unusable filter key");
            None
        }
    }
}

/// Keep the tasks matching `criteria`, dropping projects left empty.
///
/// Project fields pass through unchanged and both project and task order
/// are preserved.
pub fn filter_projects(projects: &[ProjectGroup], criteria: &FilterCriteria) -> Vec<ProjectGroup> {
    let matcher = TaskMatcher::new(criteria);
    projects
        .iter()
        .filter_map(|project| {
            let task_slice: Vec<TaskRecord> = project
                .task_slice
                .iter()
                .filter(|task| matcher.matches(task))
                .cloned()
                .collect();
            if task_slice.is_empty() {
                None
            } else {
                Some(ProjectGroup {
                    id: project.id,
                    name: project.name.clone(),
                    deadline: project.deadline.clone(),
                    leader: project.leader.clone(),
                    task_slice,
                })
            }
        })
        .collect()
}
