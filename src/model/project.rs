use serde::{Deserialize, Serialize};

use super::task::{TaskRecord, TaskState};
use crate::io::payload::{RawMember, RawProject, RawTask};

/// Separator between leader names (full-width comma, as the service's own UI uses).
pub const LEADER_SEPARATOR: &str = "，";

/// A project together with the ordered slice of its tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGroup {
    pub id: i64,
    pub name: String,
    pub deadline: String,
    pub leader: String,
    pub task_slice: Vec<TaskRecord>,
}

impl ProjectGroup {
    pub fn from_raw(raw: &RawProject) -> Self {
        Self {
            id: raw.id,
            name: raw.name.clone(),
            deadline: raw.finish.clone().unwrap_or_default(),
            leader: project_leader(&raw.members),
            task_slice: raw.tasks.iter().map(task_record).collect(),
        }
    }

    /// Number of grid rows this project occupies.
    pub fn row_span(&self) -> usize {
        self.task_slice.len()
    }
}

/// Build project groups from the raw `totalDetail` payload.
///
/// Order-preserving and deterministic. Repeated project ids are folded into
/// the first occurrence so a project never appears split across groups.
pub fn aggregate(payload: &[RawProject]) -> Vec<ProjectGroup> {
    let mut groups: Vec<ProjectGroup> = Vec::with_capacity(payload.len());
    for raw in payload {
        match groups.iter_mut().find(|g| g.id == raw.id) {
            Some(existing) => {
                tracing::warn!(project = raw.id, "duplicate project id in payload, merging tasks");
                existing.task_slice.extend(raw.tasks.iter().map(task_record));
            }
            None => groups.push(ProjectGroup::from_raw(raw)),
        }
    }
    groups
}

fn task_record(raw: &RawTask) -> TaskRecord {
    TaskRecord {
        id: raw.id,
        describe: raw.name.clone(),
        member: compose_member(raw),
        start_time: raw.start_time.clone(),
        end_time: raw.end_time.clone(),
        state: TaskState::from(raw.state),
    }
}

/// Distinct creator, developer and tester names in that order.
pub fn compose_member(task: &RawTask) -> String {
    let mut names: Vec<&str> = Vec::with_capacity(3);
    for user in [&task.creator, &task.developer, &task.tester]
        .into_iter()
        .flatten()
    {
        if !names.contains(&user.name.as_str()) {
            names.push(&user.name);
        }
    }
    names.join(", ")
}

/// Names of the admin members, joined with [`LEADER_SEPARATOR`].
pub fn project_leader(members: &[RawMember]) -> String {
    members
        .iter()
        .filter(|m| m.is_admin)
        .map(|m| m.user.name.as_str())
        .collect::<Vec<_>>()
        .join(LEADER_SEPARATOR)
}

/// Task counts per workflow state across a set of projects. Tasks with an
/// unknown state code are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounter {
    pub created: usize,
    pub underway: usize,
    pub testing: usize,
    pub finished: usize,
}

impl StatusCounter {
    pub fn count(projects: &[ProjectGroup]) -> Self {
        let mut counter = Self::default();
        for task in projects.iter().flat_map(|p| &p.task_slice) {
            match task.state {
                TaskState::Created => counter.created += 1,
                TaskState::Underway => counter.underway += 1,
                TaskState::Testing => counter.testing += 1,
                TaskState::Finished => counter.finished += 1,
                TaskState::Unknown(code) => {
                    tracing::debug!(task = task.id, code, "task has an unknown state code");
                }
            }
        }
        counter
    }

    pub fn get(&self, state: TaskState) -> usize {
        match state {
            TaskState::Created => self.created,
            TaskState::Underway => self.underway,
            TaskState::Testing => self.testing,
            TaskState::Finished => self.finished,
            TaskState::Unknown(_) => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.underway + self.testing + self.finished
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::io::payload::RawUserRef;
    use pretty_assertions::assert_eq;

    pub(crate) fn user(name: &str) -> Option<RawUserRef> {
        Some(RawUserRef {
            id: None,
            name: name.to_string(),
        })
    }

    pub(crate) fn raw_task(id: i64, name: &str, start: &str, end: &str, state: i64) -> RawTask {
        RawTask {
            id,
            name: name.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            state,
            creator: user("Ann"),
            developer: user("Bob"),
            tester: None,
        }
    }

    pub(crate) fn raw_project(id: i64, name: &str, tasks: Vec<RawTask>) -> RawProject {
        RawProject {
            id,
            name: name.to_string(),
            finish: Some("2024-06-30".to_string()),
            members: vec![
                RawMember {
                    is_admin: true,
                    user: RawUserRef { id: Some(1), name: "Ann".into() },
                },
                RawMember {
                    is_admin: false,
                    user: RawUserRef { id: Some(2), name: "Bob".into() },
                },
                RawMember {
                    is_admin: true,
                    user: RawUserRef { id: Some(3), name: "Cid".into() },
                },
            ],
            tasks,
        }
    }

    #[test]
    fn member_skips_duplicates_and_absent_roles() {
        let mut task = raw_task(1, "t", "", "", 0);
        task.tester = user("Ann");
        assert_eq!(compose_member(&task), "Ann, Bob");

        task.creator = None;
        task.developer = None;
        task.tester = None;
        assert_eq!(compose_member(&task), "");
    }

    #[test]
    fn leader_joins_admins_with_full_width_comma() {
        let project = raw_project(1, "p", vec![]);
        assert_eq!(project_leader(&project.members), "Ann，Cid");
        assert_eq!(project_leader(&project.members[1..2]), "");
    }

    #[test]
    fn aggregation_preserves_order_and_is_deterministic() {
        let payload = vec![
            raw_project(2, "Beta", vec![raw_task(20, "b1", "", "", 1)]),
            raw_project(
                1,
                "Alpha",
                vec![raw_task(10, "a1", "", "", 0), raw_task(11, "a2", "", "", 3)],
            ),
        ];
        let first = aggregate(&payload);
        let second = aggregate(&payload);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(
            first[1].task_slice.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![10, 11]
        );
        assert_eq!(first[1].deadline, "2024-06-30");
        assert_eq!(first[1].leader, "Ann，Cid");
    }

    #[test]
    fn repeated_project_ids_fold_into_one_group() {
        let payload = vec![
            raw_project(1, "Alpha", vec![raw_task(10, "a1", "", "", 0)]),
            raw_project(2, "Beta", vec![raw_task(20, "b1", "", "", 0)]),
            raw_project(1, "Alpha", vec![raw_task(12, "a3", "", "", 0)]),
        ];
        let groups = aggregate(&payload);
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[0].task_slice.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![10, 12]
        );
    }

    #[test]
    fn counters_split_known_states_and_skip_unknown_codes() {
        let payload = vec![
            raw_project(1, "A", vec![raw_task(1, "", "", "", 0), raw_task(2, "", "", "", 1)]),
            raw_project(
                2,
                "B",
                vec![
                    raw_task(3, "", "", "", 1),
                    raw_task(4, "", "", "", 2),
                    raw_task(5, "", "", "", 3),
                    raw_task(6, "", "", "", 9),
                ],
            ),
        ];
        let groups = aggregate(&payload);
        let counter = StatusCounter::count(&groups);
        assert_eq!(
            counter,
            StatusCounter { created: 1, underway: 2, testing: 1, finished: 1 }
        );
        assert_eq!(counter.total(), 5);
        assert_eq!(groups[1].task_slice[3].state, TaskState::Unknown(9));
        assert_eq!(counter.get(TaskState::Unknown(9)), 0);
    }
}
