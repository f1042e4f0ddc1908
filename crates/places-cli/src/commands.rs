//! Subcommand implementations.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, Utc};
use tracing::info;

use places_backup::{BackupConfig, BackupOutcome, BackupScheduler};
use places_codec::{export_all, import};
use places_core::defaults::{BACKUP_FILE_NAME, SETTINGS_FILE_NAME, STORE_FILE_NAME};
use places_core::{
    display_url, relative_day_label, write_atomic, BookmarksView, HistoryView,
    JsonFileSettingsStore, PlacesStore, Record, SystemClock,
};
use places_rpc::PlacesClient;
use places_store::{JsonFilePlacesStore, LocalPort};

use crate::Commands;

/// Store client and settings for one data directory.
struct App {
    places: Arc<PlacesClient>,
    settings: Arc<JsonFileSettingsStore>,
    data_dir: PathBuf,
}

impl App {
    async fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let store_path = data_dir.join(STORE_FILE_NAME);
        let store = JsonFilePlacesStore::open(&store_path)
            .await
            .with_context(|| format!("failed to open {}", store_path.display()))?;
        let places = PlacesClient::new(Arc::new(LocalPort::new(Arc::new(store))));
        Ok(Self {
            places: Arc::new(places),
            settings: Arc::new(JsonFileSettingsStore::new(
                data_dir.join(SETTINGS_FILE_NAME),
            )),
            data_dir: data_dir.to_path_buf(),
        })
    }

    fn store(&self) -> Arc<dyn PlacesStore> {
        self.places.clone()
    }

    fn scheduler(&self) -> anyhow::Result<BackupScheduler> {
        let config = BackupConfig::from_env()
            .context("invalid backup configuration")?
            .with_path(self.data_dir.join(BACKUP_FILE_NAME));
        Ok(BackupScheduler::new(
            self.store(),
            self.settings.clone(),
            Arc::new(SystemClock),
            config,
        ))
    }
}

pub(crate) async fn run(command: Commands, data_dir: &Path) -> anyhow::Result<()> {
    let app = App::open(data_dir).await?;
    match command {
        Commands::Import { file } => cmd_import(&app, &file).await,
        Commands::Export { output } => cmd_export(&app, output.as_deref()).await,
        Commands::List { history, search } => {
            let term = search.unwrap_or_default();
            if history {
                cmd_list_history(&app, &term).await
            } else {
                cmd_list_bookmarks(&app, &term).await
            }
        }
        Commands::Add { url, title } => cmd_add(&app, &url, title.as_deref()).await,
        Commands::Delete { url, history } => cmd_delete(&app, &url, history).await,
        Commands::ClearHistory => {
            HistoryView::new(app.store()).clear().await?;
            println!("History cleared");
            Ok(())
        }
        Commands::Backup => cmd_backup(&app).await,
        Commands::Watch => cmd_watch(&app).await,
    }
}

async fn cmd_import(app: &App, file: &Path) -> anyhow::Result<()> {
    let html = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let summary = import(app.places.as_ref(), &html, &SystemClock).await?;
    println!(
        "Imported {} bookmarks ({} skipped)",
        summary.imported, summary.skipped
    );
    Ok(())
}

async fn cmd_export(app: &App, output: Option<&Path>) -> anyhow::Result<()> {
    let html = export_all(app.places.as_ref()).await?;
    match output {
        Some(path) => {
            write_atomic(path, html.as_bytes())
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {} bytes to {}", html.len(), path.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}

fn print_row(record: &Record) {
    let tags = if record.tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", record.tags.join(", "))
    };
    println!(
        "{}  <{}>{}",
        record.display_title(),
        display_url(&record.url),
        tags
    );
}

async fn cmd_list_bookmarks(app: &App, term: &str) -> anyhow::Result<()> {
    let mut view = BookmarksView::new(app.store());
    view.refresh().await?;
    for record in view.filter(term) {
        print_row(record);
    }
    Ok(())
}

async fn cmd_list_history(app: &App, term: &str) -> anyhow::Result<()> {
    let mut view = HistoryView::new(app.store());
    view.refresh().await?;
    let today = Utc::now().with_timezone(&Local).date_naive();
    let matching: HashSet<&str> = view.filter(term).iter().map(|r| r.url.as_str()).collect();

    for group in view.group_by_day(&Local) {
        let rows: Vec<&Record> = group
            .records
            .iter()
            .filter(|r| matching.contains(r.url.as_str()))
            .collect();
        if rows.is_empty() {
            continue;
        }
        println!("{}", relative_day_label(group.day, today));
        for record in rows {
            print!("  ");
            print_row(record);
        }
    }
    Ok(())
}

async fn cmd_add(app: &App, input: &str, title: Option<&str>) -> anyhow::Result<()> {
    let mut view = BookmarksView::new(app.store());
    let now = Utc::now().timestamp_millis();
    match view.add(input, title.unwrap_or(""), now).await? {
        Some(url) => println!("Bookmarked {url}"),
        None => anyhow::bail!("nothing to bookmark: empty URL"),
    }
    Ok(())
}

async fn cmd_delete(app: &App, url: &str, history: bool) -> anyhow::Result<()> {
    if history {
        app.places.delete_one(url).await?;
        println!("Deleted {url}");
    } else {
        app.places.unbookmark(url).await?;
        println!("Removed bookmark {url}");
    }
    Ok(())
}

async fn cmd_backup(app: &App) -> anyhow::Result<()> {
    let outcome = app.scheduler()?.check_now().await?;
    println!("{}", describe(&outcome));
    Ok(())
}

async fn cmd_watch(app: &App) -> anyhow::Result<()> {
    let scheduler = app.scheduler()?;
    if !scheduler.config().enabled {
        anyhow::bail!("bookmark backups are disabled (BOOKMARK_BACKUP_ENABLED)");
    }
    scheduler.start();
    info!(
        path = %scheduler.config().path.display(),
        "Watching for bookmark backups, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    scheduler.stop();
    Ok(())
}

fn describe(outcome: &BackupOutcome) -> String {
    match outcome {
        BackupOutcome::Written { path, bytes } => {
            format!("Backup written to {} ({bytes} bytes)", path.display())
        }
        BackupOutcome::TooSoon { last_backup_ms } => {
            let when = chrono::DateTime::from_timestamp_millis(*last_backup_ms)
                .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| last_backup_ms.to_string());
            format!("Backup skipped: last backup at {when} is recent")
        }
        BackupOutcome::TooSmall { bytes } => {
            format!("Backup skipped: export is only {bytes} bytes")
        }
        BackupOutcome::Busy => "Backup skipped: another check is running".to_string(),
    }
}
