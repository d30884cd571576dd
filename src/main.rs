use profile_page::fetch::{GithubStatFetcher, StatFetcher};
use profile_page::storage::KeyValueStore;
use profile_page::{JsonFileStore, Page};
use std::{env, path::PathBuf, sync::Arc};
use tokio::fs;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let store_path = resolve_store_path();
    if let Some(parent) = store_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let account = env::var("PROFILE_ACCOUNT").unwrap_or_else(|_| "octocat".to_string());

    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(store_path).await);
    let fetcher: Arc<dyn StatFetcher> = Arc::new(GithubStatFetcher::new());
    // a headless host has no live color-scheme signal; report light once
    let (_system, system_rx) = watch::channel(false);

    let mut page = Page::open(store, fetcher, Some(system_rx), &account).await?;
    info!(
        theme = page.theme.current_theme().await.as_str(),
        stat = %page.stat_record.display_value,
        "profile page initialized"
    );

    // walk the window down the page so every reveal fires
    for offset in [0.0, 200.0, 400.0, 800.0] {
        page.scroll_to(offset).await;
    }
    page.settle().await;

    let surface = page.state.surface.lock().await;
    info!(
        projects = %surface
            .text(profile_page::stats::PROJECTS_STAT_ID)
            .unwrap_or_default(),
        "final stat rendered"
    );

    Ok(())
}

fn resolve_store_path() -> PathBuf {
    match env::var("PROFILE_DATA_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => PathBuf::from("data/prefs.json"),
    }
}
