use crate::fetch::StatFetcher;
use crate::models::StatRecord;
use crate::state::PageState;
use tracing::{info, warn};

/// Node id of the remotely-synced projects counter.
pub const PROJECTS_STAT_ID: &str = "github-projects";

/// Display value used whenever the remote fetch fails.
pub const FALLBACK_DISPLAY: &str = "20+";

/// Rounds a raw count down to its nearest ten.
pub fn bucket(raw: u64) -> u64 {
    raw / 10 * 10
}

pub fn display_for(raw: Option<u64>) -> String {
    match raw {
        Some(raw) => format!("{}+", bucket(raw)),
        None => FALLBACK_DISPLAY.to_string(),
    }
}

/// Resolves the display value for an account. Never fails: transport
/// errors, bad statuses, and malformed payloads all degrade to the fixed
/// fallback.
pub async fn fetch_stat(fetcher: &dyn StatFetcher, account: &str) -> String {
    display_for(fetch_raw(fetcher, account).await)
}

async fn fetch_raw(fetcher: &dyn StatFetcher, account: &str) -> Option<u64> {
    match fetcher.fetch_account(account).await {
        Ok(stats) => Some(stats.public_repos),
        Err(err) => {
            warn!(account, "stat fetch failed, using fallback: {err}");
            None
        }
    }
}

/// Awaits the fetch, writes the resolved text into the target node, and
/// mirrors it into the profile model. Always settles; a missing target node
/// is logged, not fatal. Counter registration for the node must wait for
/// this to return, or the animation would run toward the stale placeholder.
pub async fn sync_and_inject(
    state: &PageState,
    fetcher: &dyn StatFetcher,
    element_id: &str,
    account: &str,
) -> StatRecord {
    let raw_value = fetch_raw(fetcher, account).await;
    let display_value = display_for(raw_value);

    let injected = state.surface.lock().await.set_text(element_id, &display_value);
    if injected {
        info!(element_id, value = %display_value, "stat injected");
    } else {
        warn!(element_id, "stat target node absent, skipping injection");
    }

    let mut profile = state.profile.lock().await;
    if let Some(stat) = profile
        .stats
        .iter_mut()
        .find(|stat| stat.id.as_deref() == Some(element_id))
    {
        stat.number = display_value.clone();
    }

    StatRecord {
        key: element_id.to_string(),
        raw_value,
        display_value,
    }
}
