use crate::animate::{AnimationTarget, RevealScheduler};
use crate::errors::EngineError;
use crate::fetch::StatFetcher;
use crate::models::StatRecord;
use crate::profile;
use crate::state::PageState;
use crate::stats::{self, PROJECTS_STAT_ID};
use crate::storage::KeyValueStore;
use crate::theme::ThemeController;
use crate::ui::{self, COUNTER_CLASS, SKILL_CLASS, SOCIAL_CLASS, STAT_ITEM_CLASS};
use crate::visibility::Viewport;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// A fully-initialized page. `open` runs the strict startup sequence; the
/// caller then drives it with scroll updates and event pumps.
pub struct Page {
    pub state: PageState,
    pub theme: Arc<ThemeController>,
    pub stat_record: StatRecord,
    scheduler: RevealScheduler,
    system_listener: Option<JoinHandle<()>>,
}

impl Page {
    /// Startup order is load-bearing:
    /// 1. the theme controller initializes first,
    /// 2. generic reveal elements register immediately,
    /// 3. the stat sync settles (success or fallback),
    /// 4. only then are the counters registered, so no counter ever
    ///    animates toward the pre-fetch placeholder.
    pub async fn open(
        store: Arc<dyn KeyValueStore>,
        fetcher: Arc<dyn StatFetcher>,
        system: Option<watch::Receiver<bool>>,
        account: &str,
    ) -> Result<Page, EngineError> {
        let profile = profile::load_stored(store.as_ref()).await;
        let surface = ui::build_surface(&profile);
        let (viewport, events) = Viewport::new(ui::VIEWPORT_HEIGHT);
        let state = PageState::new(surface, store, viewport, profile);

        let theme = Arc::new(ThemeController::initialize(&state, system).await?);
        let system_listener = theme.spawn_system_listener();

        profile::apply_profile(&state).await;

        let mut scheduler = RevealScheduler::new(&state, events);
        let early = {
            let surface = state.surface.lock().await;
            let mut ids = surface.ids_with_class(SKILL_CLASS);
            ids.extend(surface.ids_with_class(SOCIAL_CLASS));
            ids.extend(surface.ids_with_class(STAT_ITEM_CLASS));
            ids
        };
        scheduler.register_reveal(&early).await;

        let stat_record =
            stats::sync_and_inject(&state, fetcher.as_ref(), PROJECTS_STAT_ID, account).await;

        let counters = state.surface.lock().await.ids_with_class(COUNTER_CLASS);
        scheduler.register_reveal(&counters).await;

        info!(account, stat = %stat_record.display_value, "page ready");

        Ok(Page {
            state,
            theme,
            stat_record,
            scheduler,
            system_listener,
        })
    }

    /// Moves the viewport and dispatches whatever reveals that uncovered.
    pub async fn scroll_to(&mut self, offset: f64) {
        self.state.viewport.lock().await.set_scroll(offset);
        self.scheduler.pump().await;
    }

    /// Dispatches any queued visibility events.
    pub async fn pump(&mut self) {
        self.scheduler.pump().await;
    }

    /// Awaits every running counter animation.
    pub async fn settle(&mut self) {
        self.scheduler.settle().await;
    }

    pub async fn animation_target(&self, id: &str) -> Option<AnimationTarget> {
        self.scheduler.target(id).await
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        if let Some(listener) = self.system_listener.take() {
            listener.abort();
        }
    }
}
