use chrono::NaiveDate;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::Settings;
use crate::io::api::{ApiClient, ApiError};
use crate::io::csv_export::write_csv;
use crate::io::export::{build_sheet, ExportFormat, ExportSheet};
use crate::io::payload::{RawProject, User};
use crate::io::xlsx_export::write_xlsx;
use crate::layout::{self, LayoutConfig, OverviewLayout, ScrollSync};
use crate::model::{DisplaySchema, ProjectGroup};
use crate::state::{Action, Notice, OverviewState, ViewMode};
use crate::ui;

/// Outcome of one background request.
#[derive(Debug)]
pub enum FetchResult {
    Users(Result<Vec<User>, ApiError>),
    Projects(Result<Vec<RawProject>, ApiError>),
}

/// A fetch result tagged with the load it belongs to.
#[derive(Debug)]
pub struct FetchMessage {
    pub load: Uuid,
    pub result: FetchResult,
}

/// Turn a finished fetch into reducer actions. Results of a superseded
/// load only settle the pending count.
pub fn route_fetch(message: FetchMessage, current_load: Uuid) -> Vec<Action> {
    if message.load != current_load {
        tracing::debug!(load = %message.load, "dropping result of superseded load");
        return vec![Action::FetchSettled];
    }
    let loaded = match message.result {
        FetchResult::Users(Ok(users)) => Action::UsersLoaded(users),
        FetchResult::Projects(Ok(projects)) => Action::ProjectsLoaded(projects),
        FetchResult::Users(Err(ApiError::Cancelled)) | FetchResult::Projects(Err(ApiError::Cancelled)) => {
            return vec![Action::FetchSettled];
        }
        FetchResult::Users(Err(e)) => {
            tracing::warn!(error = %e, "loading users failed");
            Action::FetchFailed(format!("Loading users failed: {}", e))
        }
        FetchResult::Projects(Err(e)) => {
            tracing::warn!(error = %e, "loading projects failed");
            Action::FetchFailed(format!("Loading projects failed: {}", e))
        }
    };
    vec![loaded, Action::FetchSettled]
}

/// Sheet for the current filtered result, or the warning shown instead of
/// the save dialog when there is nothing to export.
pub fn prepare_export(state: &OverviewState, schema: &DisplaySchema) -> Result<ExportSheet, Notice> {
    let projects = state.filtered.as_deref().map(Vec::as_slice);
    build_sheet(projects, schema).map_err(|e| Notice::warning(e.to_string()))
}

/// Main application state.
pub struct OverviewApp {
    pub settings: Settings,
    pub state: OverviewState,
    pub schema: DisplaySchema,
    pub layout_config: LayoutConfig,
    pub scroll: ScrollSync,
    pub show_about: bool,

    // Gantt geometry of the current result
    overview: Option<OverviewLayout>,
    layout_generation: u64,

    // Background fetching
    runtime: Runtime,
    client: Result<ApiClient, String>,
    cancel: CancellationToken,
    current_load: Uuid,
    tx: mpsc::UnboundedSender<FetchMessage>,
    rx: mpsc::UnboundedReceiver<FetchMessage>,
}

impl OverviewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> std::io::Result<Self> {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("overview-fetch")
            .enable_all()
            .build()?;
        let client = ApiClient::new(&settings).map_err(|e| {
            tracing::error!(error = %e, "could not build API client");
            e.to_string()
        });
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            layout_config: LayoutConfig::from_settings(&settings),
            state: OverviewState::new(today()),
            schema: DisplaySchema::default(),
            scroll: ScrollSync::new(),
            show_about: false,
            overview: None,
            layout_generation: 0,
            runtime,
            client,
            cancel: CancellationToken::new(),
            current_load: Uuid::nil(),
            tx,
            rx,
            settings,
        };
        if app.settings.fetch_on_start {
            app.refresh(&cc.egui_ctx);
        }
        Ok(app)
    }

    pub fn dispatch(&mut self, action: Action) {
        self.state = self.state.clone().reduce(action);
    }

    // --- Fetching ---

    /// Start a new load of users and projects, superseding any in flight.
    pub fn refresh(&mut self, ctx: &egui::Context) {
        let client = match &self.client {
            Ok(client) => client.clone(),
            Err(e) => {
                let text = format!("Cannot reach the service: {}", e);
                self.dispatch(Action::Notify(Notice::error(text)));
                return;
            }
        };

        self.supersede_load();
        tracing::info!(load = %self.current_load, url = %self.settings.api_base_url, "loading overview");

        self.dispatch(Action::FetchStarted);
        self.dispatch(Action::FetchStarted);

        let load = self.current_load;
        {
            let (client, cancel, tx, ctx) = (client.clone(), self.cancel.clone(), self.tx.clone(), ctx.clone());
            self.runtime.spawn(async move {
                let result = FetchResult::Users(client.fetch_users(&cancel).await);
                let _ = tx.send(FetchMessage { load, result });
                ctx.request_repaint();
            });
        }
        {
            let (cancel, tx, ctx) = (self.cancel.clone(), self.tx.clone(), ctx.clone());
            self.runtime.spawn(async move {
                let result = FetchResult::Projects(client.fetch_projects(&cancel).await);
                let _ = tx.send(FetchMessage { load, result });
                ctx.request_repaint();
            });
        }
    }

    /// Stop waiting for the current load; its results will be dropped.
    fn supersede_load(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.current_load = Uuid::new_v4();
    }

    fn drain_fetches(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            for action in route_fetch(message, self.current_load) {
                self.dispatch(action);
            }
        }
    }

    // --- Layout ---

    fn sync_layout(&mut self) {
        if self.layout_generation == self.state.generation {
            return;
        }
        self.layout_generation = self.state.generation;
        self.overview = self.state.filtered.as_deref().and_then(|projects| {
            let window = layout::window_for(projects, self.state.today);
            layout::layout(projects, window, &self.layout_config)
        });
        let jump = self
            .overview
            .as_ref()
            .map(|o| layout::initial_scroll_x(o.window, self.state.applied.start_date, &self.layout_config));
        self.scroll.on_data_loaded(jump);
    }

    // --- File operations ---

    pub fn open_snapshot(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Overview Snapshot", &["json"])
            .pick_file()
        {
            match crate::io::load_snapshot(&path) {
                Ok(projects) => {
                    self.supersede_load();
                    let count = projects.len();
                    self.dispatch(Action::ProjectsLoaded(projects));
                    self.dispatch(Action::Notify(Notice::info(format!(
                        "Loaded {} projects from {}",
                        count,
                        path.display()
                    ))));
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not load snapshot");
                    self.dispatch(Action::Notify(Notice::error(format!("Error loading: {}", e))));
                }
            }
        }
    }

    pub fn save_snapshot(&mut self) {
        if self.state.raw.is_empty() {
            self.dispatch(Action::Notify(Notice::warning("Nothing to save, no projects loaded")));
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Overview Snapshot", &["json"])
            .set_file_name("overview.json")
            .save_file()
        {
            let notice = match crate::io::save_snapshot(&self.state.raw, &path) {
                Ok(()) => Notice::info("Snapshot saved"),
                Err(e) => Notice::error(format!("Error saving: {}", e)),
            };
            self.dispatch(Action::Notify(notice));
        }
    }

    /// Build the sheet, ask where to save it, then write it.
    pub fn export(&mut self, format: ExportFormat) {
        let sheet = match prepare_export(&self.state, &self.schema) {
            Ok(sheet) => sheet,
            Err(notice) => {
                self.dispatch(Action::Notify(notice));
                return;
            }
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter(format.filter_name(), &[format.extension()])
            .set_file_name(format.default_file_name())
            .save_file()
        else {
            return;
        };

        let written = match format {
            ExportFormat::Xlsx => write_xlsx(&sheet, &path),
            ExportFormat::Csv => write_csv(&sheet, &path),
        };
        let notice = match written {
            Ok(count) => Notice::info(format!("Exported {} tasks to {}", count, path.display())),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "export failed");
                Notice::error(format!("Export failed: {}", e))
            }
        };
        self.dispatch(Action::Notify(notice));
    }

    // --- Navigation ---

    fn open_url(&mut self, url: String) {
        tracing::debug!(%url, "opening in browser");
        if let Err(e) = open::that(&url) {
            tracing::warn!(%url, error = %e, "could not open browser");
            self.dispatch(Action::Notify(Notice::error(format!("Could not open {}: {}", url, e))));
        }
    }

    pub fn open_project(&mut self, project_id: i64) {
        let url = self.settings.project_url(project_id);
        self.open_url(url);
    }

    pub fn open_task(&mut self, task_id: i64) {
        let url = self.settings.task_url(task_id);
        self.open_url(url);
    }
}

impl Drop for OverviewApp {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl eframe::App for OverviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_fetches();

        if ctx.input(|i| i.key_pressed(egui::Key::F5)) {
            self.refresh(ctx);
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Filter row
        let filter_action = egui::TopBottomPanel::top("filter_bar")
            .exact_height(ui::theme::FILTER_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui::filter_bar::show_filter_bar(
                    &self.state.draft,
                    &self.state.users,
                    self.state.view,
                    self.state.is_loading(),
                    ui,
                )
            })
            .inner;
        match filter_action {
            ui::filter_bar::FilterBarAction::Edit(edit) => self.dispatch(Action::EditFilter(edit)),
            ui::filter_bar::FilterBarAction::Search => self.dispatch(Action::Search),
            ui::filter_bar::FilterBarAction::Reset => self.dispatch(Action::ResetFilter),
            ui::filter_bar::FilterBarAction::Export => self.export(ExportFormat::Xlsx),
            ui::filter_bar::FilterBarAction::ToggleView => self.dispatch(Action::ToggleView),
            ui::filter_bar::FilterBarAction::None => {}
        }

        // Bottom panel: status bar
        let dismiss = egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_STATUS_BAR)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    let dismiss = ui::dialogs::show_notice(self.state.notice.as_ref(), ui);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Projects: {} · Tasks: {}",
                                self.state.filtered_projects().len(),
                                self.state
                                    .filtered_projects()
                                    .iter()
                                    .map(ProjectGroup::row_span)
                                    .sum::<usize>()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                    dismiss
                })
                .inner
            })
            .inner;
        if let Some(action) = dismiss {
            self.dispatch(action);
        }

        self.sync_layout();

        // Central panel: table or Gantt chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::same(8.0));
        let (open_project, open_task) = egui::CentralPanel::default()
            .frame(chart_frame)
            .show(ctx, |ui| match self.state.view {
                ViewMode::Table => {
                    let projects = self.state.filtered.as_deref().map(Vec::as_slice);
                    match ui::task_table::show_task_table(projects, &self.schema, ui) {
                        ui::task_table::TaskTableAction::OpenProject(id) => (Some(id), None),
                        ui::task_table::TaskTableAction::OpenTask(id) => (None, Some(id)),
                        ui::task_table::TaskTableAction::None => (None, None),
                    }
                }
                ViewMode::Gantt => {
                    let interaction = ui::gantt_chart::show_gantt_chart(
                        self.overview.as_ref(),
                        &self.state.counter,
                        &self.layout_config,
                        &mut self.scroll,
                        ui,
                    );
                    (interaction.open_project, interaction.open_task)
                }
            })
            .inner;
        if let Some(id) = open_project {
            self.open_project(id);
        }
        if let Some(id) = open_task {
            self.open_task(id);
        }

        // Dialogs
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NoticeLevel;
    use pretty_assertions::assert_eq;

    #[test]
    fn stale_results_only_settle() {
        let current = Uuid::new_v4();
        let message = FetchMessage {
            load: Uuid::new_v4(),
            result: FetchResult::Users(Ok(vec![User { id: 1, name: "Ann".into() }])),
        };
        assert_eq!(route_fetch(message, current), vec![Action::FetchSettled]);
    }

    #[test]
    fn current_results_load_then_settle() {
        let current = Uuid::new_v4();
        let users = vec![User { id: 1, name: "Ann".into() }];
        let message = FetchMessage {
            load: current,
            result: FetchResult::Users(Ok(users.clone())),
        };
        assert_eq!(
            route_fetch(message, current),
            vec![Action::UsersLoaded(users), Action::FetchSettled]
        );
    }

    #[test]
    fn failures_become_notices_but_cancellation_is_silent() {
        let current = Uuid::new_v4();
        let failed = FetchMessage {
            load: current,
            result: FetchResult::Projects(Err(ApiError::Server("no session".into()))),
        };
        let actions = route_fetch(failed, current);
        assert!(matches!(&actions[0], Action::FetchFailed(msg) if msg.contains("no session")));

        let cancelled = FetchMessage {
            load: current,
            result: FetchResult::Projects(Err(ApiError::Cancelled)),
        };
        assert_eq!(route_fetch(cancelled, current), vec![Action::FetchSettled]);
    }

    #[test]
    fn exporting_nothing_warns_instead_of_saving() {
        let schema = DisplaySchema::default();
        let today = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();

        let never_searched = OverviewState::new(today);
        let notice = prepare_export(&never_searched, &schema).unwrap_err();
        assert_eq!(notice.level, NoticeLevel::Warning);

        let searched_empty = OverviewState::new(today).reduce(Action::Search);
        assert_eq!(searched_empty.filtered.as_deref().map(Vec::len), Some(0));
        let notice = prepare_export(&searched_empty, &schema).unwrap_err();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(notice.text.contains("nothing to export"));
    }
}
