pub mod filter;
pub mod project;
pub mod schema;
pub mod task;
pub mod timeline;

pub use filter::{filter_projects, FilterCriteria};
pub use project::{aggregate, ProjectGroup, StatusCounter};
pub use schema::{ColumnKey, DisplaySchema};
pub use task::{TaskRecord, TaskState};
pub use timeline::TimeWindow;
