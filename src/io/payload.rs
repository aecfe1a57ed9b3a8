//! Wire shapes of the project-management service.
//!
//! These mirror the JSON the service returns and are only read by
//! [`crate::model::project::aggregate`] and the snapshot loader. Unknown
//! fields are ignored; optional fields default (also when sent as `null`)
//! so a sparse payload still decodes.

use serde::{Deserialize, Deserializer, Serialize};

/// Response envelope wrapping every API payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub err: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// One entry of `GET /api/project/totalDetail`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProject {
    pub id: i64,
    pub name: String,
    /// Project deadline, passed through verbatim.
    #[serde(default)]
    pub finish: Option<String>,
    #[serde(default)]
    pub members: Vec<RawMember>,
    #[serde(default, rename = "task")]
    pub tasks: Vec<RawTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMember {
    #[serde(default)]
    pub is_admin: bool,
    pub user: RawUserRef,
}

/// A user reference embedded in a project or task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUserRef {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: i64,
    #[serde(default)]
    pub creator: Option<RawUserRef>,
    #[serde(default)]
    pub developer: Option<RawUserRef>,
    #[serde(default)]
    pub tester: Option<RawUserRef>,
}

/// Reads an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One entry of `GET /api/user/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_total_detail_entry() {
        let json = r#"{
            "id": 7,
            "name": "Apollo",
            "finish": "2024-03-31",
            "members": [{"isAdmin": true, "user": {"id": 1, "name": "Ann"}}],
            "task": [{
                "id": 70,
                "name": "Wire up login",
                "startTime": "2024-01-10 00:00:00",
                "endTime": "2024-01-20 00:00:00",
                "state": 1,
                "creator": {"name": "Ann"},
                "developer": null
            }],
            "extra": "ignored"
        }"#;
        let project: RawProject = serde_json::from_str(json).unwrap();
        assert_eq!(project.tasks.len(), 1);
        assert!(project.members[0].is_admin);
        assert_eq!(project.tasks[0].start_time, "2024-01-10 00:00:00");
        assert!(project.tasks[0].developer.is_none());
        assert!(project.tasks[0].tester.is_none());
    }

    #[test]
    fn null_times_and_state_decode_as_unscheduled() {
        let json = r#"{
            "id": 8,
            "name": "Backlog",
            "task": [{
                "id": 80,
                "name": "Someday",
                "startTime": null,
                "endTime": null,
                "state": null,
                "tester": {"name": "Cid"}
            }]
        }"#;
        let project: RawProject = serde_json::from_str(json).unwrap();
        let task = &project.tasks[0];
        assert_eq!(task.start_time, "");
        assert_eq!(task.end_time, "");
        assert_eq!(task.state, 0);
        assert_eq!(task.tester.as_ref().map(|u| u.name.as_str()), Some("Cid"));
    }

    #[test]
    fn envelope_carries_server_error() {
        let env: Envelope<Vec<User>> = serde_json::from_str(r#"{"err": "not logged in"}"#).unwrap();
        assert_eq!(env.err.as_deref(), Some("not logged in"));
        assert!(env.data.is_none());
    }
}
