use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;

use crate::app::SessionAtlasApp;
use crate::config::Config;
use crate::ingest::api::ApiClient;
use crate::ingest::snapshot::SnapshotSource;

pub fn run(config: Config) -> anyhow::Result<()> {
    let api = Arc::new(
        ApiClient::new(config.api_url.clone(), config.timeout).context("building HTTP client")?,
    );
    let export = config
        .open
        .as_deref()
        .map(SnapshotSource::load)
        .transpose()
        .context("opening events export")?;

    tracing::info!(
        api_url = %config.api_url,
        export = ?config.open,
        "starting Session Atlas"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Session Atlas")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Session Atlas",
        native_options,
        Box::new(move |cc| Box::new(SessionAtlasApp::new(cc, &config, api, export))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
