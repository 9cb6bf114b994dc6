mod fetch;
mod run;
mod state;
mod ui_state;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;

use crate::config::Config;
use crate::ingest::SessionSource;
use crate::ingest::api::ApiClient;
use crate::ingest::snapshot::{self, SnapshotSource};

pub use run::run;
pub use state::{DashboardState, FollowUp};
pub use ui_state::{Banner, Tab};

use fetch::Fetcher;

pub struct SessionAtlasApp {
    pub state: DashboardState,
    fetcher: Fetcher,
    api: Arc<ApiClient>,
    /// Path of the export being browsed, if any.
    pub export_path: Option<PathBuf>,
}

impl eframe::App for SessionAtlasApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.process_results();
        crate::ui::render_app(ctx, frame, self);
    }
}

impl SessionAtlasApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &Config,
        api: Arc<ApiClient>,
        export: Option<SnapshotSource>,
    ) -> Self {
        let export_path = export.as_ref().map(|s| s.path().to_path_buf());
        let source: Arc<dyn SessionSource> = match export {
            Some(export) => Arc::new(export),
            None => api.clone(),
        };
        let ctx = cc.egui_ctx.clone();
        let fetcher = Fetcher::new(source, move || ctx.request_repaint());

        let mut state = DashboardState::default();
        state.ui.selected_user = config.user.clone();

        let mut app = Self {
            state,
            fetcher,
            api,
            export_path,
        };
        app.reload_users();
        app
    }

    pub fn source_label(&self) -> String {
        self.fetcher.source().describe()
    }

    pub fn reload_users(&mut self) {
        let generation = self.state.begin_users();
        self.fetcher.fetch_users(generation);
    }

    /// Re-query sessions and timeline for the selected user.
    pub fn refresh(&mut self) {
        let generation = self.state.begin_refresh();
        tracing::debug!(generation, user = ?self.state.ui.selected_user, "refreshing dashboard");
        self.fetcher
            .fetch_dashboard(generation, self.state.ui.selected_user.clone());
    }

    pub fn select_user(&mut self, user: Option<String>) {
        if self.state.ui.selected_user != user {
            self.state.ui.selected_user = user;
            self.state.ui.selected_session = None;
            self.refresh();
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.state.ui.tab != tab {
            self.state.ui.tab = tab;
            self.refresh();
        }
    }

    /// Fetch a session's events and open the detail window when they arrive.
    pub fn open_session(&mut self, logon_id: &str) {
        let generation = self.state.begin_session_detail();
        self.fetcher.fetch_session_events(
            generation,
            logon_id.to_string(),
            self.state.ui.selected_user.clone(),
        );
    }

    pub fn open_export(&mut self, path: PathBuf) -> anyhow::Result<()> {
        let export = SnapshotSource::load(&path)?;
        self.fetcher.set_source(Arc::new(export));
        self.export_path = Some(path);
        self.reset_selection();
        self.reload_users();
        Ok(())
    }

    /// Go back to querying the API after browsing an export.
    pub fn use_api(&mut self) {
        if self.export_path.take().is_some() {
            self.fetcher.set_source(self.api.clone());
            self.reset_selection();
            self.reload_users();
        }
    }

    /// Write the loaded timeline as an export.
    pub fn save_export(&self, path: &Path) -> anyhow::Result<()> {
        if !self.state.dataset.is_loaded() {
            anyhow::bail!("nothing to save yet, wait for the data to load");
        }
        snapshot::save(path, &self.state.dataset.timeline)
            .with_context(|| format!("saving {}", path.display()))
    }

    fn reset_selection(&mut self) {
        self.state.ui.selected_user = None;
        self.state.ui.selected_session = None;
        self.state.ui.show_detail = false;
        self.state.detail = None;
    }

    fn process_results(&mut self) {
        for result in self.fetcher.drain() {
            if let Some(FollowUp::Refresh) = self.state.apply(result) {
                self.refresh();
            }
        }
    }
}
