//! View state of the overview and the reducer that drives it.
//!
//! The UI never mutates [`OverviewState`] directly: panels return
//! [`Action`]s and the app folds them in with [`OverviewState::reduce`].

use std::sync::Arc;

use chrono::NaiveDate;

use crate::io::payload::{RawProject, User};
use crate::model::timeline::month_start;
use crate::model::{aggregate, filter_projects, FilterCriteria, ProjectGroup, StatusCounter};

/// Which presentation of the filtered set is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Table,
    Gantt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-visible message shown in the status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }
}

/// A single edit of the draft filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEdit {
    StartDate(NaiveDate),
    EndDate(NaiveDate),
    MemberKey(String),
    TaskKey(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchStarted,
    /// One started fetch finished, whatever its outcome.
    FetchSettled,
    UsersLoaded(Vec<User>),
    ProjectsLoaded(Vec<RawProject>),
    FetchFailed(String),
    EditFilter(FilterEdit),
    Search,
    ResetFilter,
    ToggleView,
    Notify(Notice),
    DismissNotice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewState {
    pub today: NaiveDate,
    pub users: Arc<Vec<User>>,
    /// Last raw payload, kept for saving snapshots.
    pub raw: Arc<Vec<RawProject>>,
    pub projects: Arc<Vec<ProjectGroup>>,
    /// Criteria being edited in the filter bar.
    pub draft: FilterCriteria,
    /// Criteria of the current result.
    pub applied: FilterCriteria,
    /// `None` until the first search after start or reset.
    pub filtered: Option<Arc<Vec<ProjectGroup>>>,
    pub counter: StatusCounter,
    pub view: ViewMode,
    pub pending_fetches: usize,
    pub notice: Option<Notice>,
    /// Bumped whenever `filtered` is replaced; views re-layout on change.
    pub generation: u64,
}

impl OverviewState {
    pub fn new(today: NaiveDate) -> Self {
        let criteria = FilterCriteria::initial(today);
        Self {
            today,
            users: Arc::default(),
            raw: Arc::default(),
            projects: Arc::default(),
            draft: criteria.clone(),
            applied: criteria,
            filtered: None,
            counter: StatusCounter::default(),
            view: ViewMode::Table,
            pending_fetches: 0,
            notice: None,
            generation: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending_fetches > 0
    }

    /// The filtered projects, or an empty slice before the first search.
    pub fn filtered_projects(&self) -> &[ProjectGroup] {
        self.filtered.as_deref().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::FetchStarted => Self {
                pending_fetches: self.pending_fetches + 1,
                ..self
            },
            Action::FetchSettled => Self {
                pending_fetches: self.pending_fetches.saturating_sub(1),
                ..self
            },
            Action::UsersLoaded(users) => Self {
                users: Arc::new(users),
                ..self
            },
            Action::ProjectsLoaded(raw) => {
                let projects = aggregate(&raw);
                tracing::info!(projects = projects.len(), "overview projects loaded");
                let next = Self {
                    raw: Arc::new(raw),
                    projects: Arc::new(projects),
                    ..self
                };
                if next.filtered.is_some() {
                    next.apply_filter()
                } else {
                    next
                }
            }
            Action::FetchFailed(message) => Self {
                notice: Some(Notice::error(message)),
                ..self
            },
            Action::EditFilter(edit) => {
                let mut draft = self.draft.clone();
                match edit {
                    FilterEdit::StartDate(d) => draft.start_date = month_start(d),
                    FilterEdit::EndDate(d) => draft.end_date = month_start(d),
                    FilterEdit::MemberKey(k) => draft.member_key = k,
                    FilterEdit::TaskKey(k) => draft.task_key = k,
                }
                Self { draft, ..self }
            }
            Action::Search => Self {
                applied: self.draft.clone(),
                ..self
            }
            .apply_filter(),
            Action::ResetFilter => {
                let criteria = FilterCriteria::initial(self.today);
                Self {
                    draft: criteria.clone(),
                    applied: criteria,
                    filtered: None,
                    counter: StatusCounter::default(),
                    generation: self.generation + 1,
                    ..self
                }
            }
            Action::ToggleView => Self {
                view: match self.view {
                    ViewMode::Table => ViewMode::Gantt,
                    ViewMode::Gantt => ViewMode::Table,
                },
                ..self
            },
            Action::Notify(notice) => Self {
                notice: Some(notice),
                ..self
            },
            Action::DismissNotice => Self { notice: None, ..self },
        }
    }

    fn apply_filter(self) -> Self {
        let filtered = filter_projects(&self.projects, &self.applied);
        let counter = StatusCounter::count(&filtered);
        tracing::info!(
            projects = filtered.len(),
            tasks = counter.total(),
            "overview filter applied"
        );
        Self {
            filtered: Some(Arc::new(filtered)),
            counter,
            generation: self.generation + 1,
            ..self
        }
    }
}
