use crate::errors::EngineError;
use crate::models::Theme;
use crate::state::PageState;
use crate::storage::THEME_KEY;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const TOGGLE_ID: &str = "theme-toggle";
pub const THUMB_ID: &str = "toggle-thumb";
pub const THEME_ATTR: &str = "data-theme";
pub const LABEL_ATTR: &str = "aria-label";
pub const PULSE_CLASS: &str = "pressed";

/// How long the toggle thumb stays pulsed after a toggle.
pub const PULSE_MS: u64 = 150;

/// Reconciles the stored theme preference with the live system color
/// scheme and owns every theme write. The system signal arrives as a watch
/// channel carrying "prefers dark"; hosts without that capability pass
/// `None` and the controller defaults to light.
pub struct ThemeController {
    state: PageState,
    system: Option<watch::Receiver<bool>>,
}

impl ThemeController {
    /// Fails when the toggle control is absent: the controller cannot
    /// initialize without it.
    pub async fn initialize(
        state: &PageState,
        system: Option<watch::Receiver<bool>>,
    ) -> Result<Self, EngineError> {
        if !state.surface.lock().await.contains(TOGGLE_ID) {
            return Err(EngineError::MissingNode(TOGGLE_ID.to_string()));
        }

        let controller = ThemeController {
            state: state.clone(),
            system,
        };
        let initial = controller.resolve_initial_theme().await;
        controller.apply_theme(initial).await?;
        Ok(controller)
    }

    /// Stored preference if present and parseable, else the system scheme,
    /// else light. Read-only.
    pub async fn resolve_initial_theme(&self) -> Theme {
        if let Some(stored) = self.state.store.get(THEME_KEY).await {
            match Theme::parse(&stored) {
                Some(theme) => return theme,
                None => warn!(%stored, "ignoring malformed stored theme"),
            }
        }
        self.system_theme().unwrap_or(Theme::Light)
    }

    fn system_theme(&self) -> Option<Theme> {
        self.system.as_ref().map(|rx| {
            if *rx.borrow() {
                Theme::Dark
            } else {
                Theme::Light
            }
        })
    }

    /// Sets the root theme attribute, persists the choice unconditionally
    /// (system-derived values become explicit for future loads), and points
    /// the toggle's label at the opposite theme.
    pub async fn apply_theme(&self, theme: Theme) -> Result<(), EngineError> {
        {
            let mut surface = self.state.surface.lock().await;
            surface.set_root_attr(THEME_ATTR, theme.as_str());
            let label = format!("Switch to {} theme", theme.flip().as_str());
            surface.set_attr(TOGGLE_ID, LABEL_ATTR, &label);
        }
        self.state.store.set(THEME_KEY, theme.as_str()).await?;
        info!(theme = theme.as_str(), "theme applied");
        Ok(())
    }

    pub async fn current_theme(&self) -> Theme {
        self.state
            .surface
            .lock()
            .await
            .root_attr(THEME_ATTR)
            .and_then(Theme::parse)
            .unwrap_or(Theme::Light)
    }

    /// Flips the theme and pulses the toggle thumb for a fixed window.
    pub async fn toggle_theme(&self) -> Result<Theme, EngineError> {
        let next = self.current_theme().await.flip();
        self.apply_theme(next).await?;
        self.pulse_toggle().await;
        Ok(next)
    }

    async fn pulse_toggle(&self) {
        let surface = Arc::clone(&self.state.surface);
        surface.lock().await.add_class(THUMB_ID, PULSE_CLASS);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(PULSE_MS)).await;
            surface.lock().await.remove_class(THUMB_ID, PULSE_CLASS);
        });
    }

    /// Applies the system-derived theme only while no stored preference
    /// exists. Stays subscribed either way, so clearing the stored key
    /// re-enables system-driven updates on the next change event.
    pub async fn on_system_preference_change(&self, matches_dark: bool) -> Result<(), EngineError> {
        if self.state.store.get(THEME_KEY).await.is_some() {
            debug!("stored preference shadows system change");
            return Ok(());
        }
        let theme = if matches_dark { Theme::Dark } else { Theme::Light };
        self.apply_theme(theme).await
    }

    /// Long-lived consumer of the system scheme channel. Returns `None`
    /// when no system signal was injected.
    pub fn spawn_system_listener(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut receiver = self.system.clone()?;
        let controller = Arc::clone(self);
        Some(tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                let matches_dark = *receiver.borrow();
                if let Err(err) = controller.on_system_preference_change(matches_dark).await {
                    warn!("system preference update failed: {err}");
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile;
    use crate::storage::{KeyValueStore, MemoryStore};
    use crate::surface::{Node, Surface};
    use crate::visibility::Viewport;

    fn toggle_surface() -> Surface {
        let mut surface = Surface::default();
        surface.insert(Node::new(TOGGLE_ID).at(0.0, 40.0));
        surface.insert(Node::new(THUMB_ID).at(0.0, 24.0));
        surface
    }

    fn state_with(surface: Surface, store: Arc<MemoryStore>) -> PageState {
        let (viewport, _events) = Viewport::new(600.0);
        PageState::new(surface, store, viewport, profile::default_profile())
    }

    #[tokio::test]
    async fn missing_toggle_is_fatal() {
        let state = state_with(Surface::default(), Arc::new(MemoryStore::new()));
        let result = ThemeController::initialize(&state, None).await;
        assert!(matches!(result, Err(EngineError::MissingNode(_))));
    }

    #[tokio::test]
    async fn stored_preference_wins_over_system() {
        let store = Arc::new(MemoryStore::new());
        store.set(THEME_KEY, "dark").await.unwrap();
        let state = state_with(toggle_surface(), store);

        let (_tx, rx) = watch::channel(false); // system says light
        let controller = ThemeController::initialize(&state, Some(rx)).await.unwrap();
        assert_eq!(controller.current_theme().await, Theme::Dark);
    }

    #[tokio::test]
    async fn no_system_capability_defaults_to_light() {
        let state = state_with(toggle_surface(), Arc::new(MemoryStore::new()));
        let controller = ThemeController::initialize(&state, None).await.unwrap();
        assert_eq!(controller.current_theme().await, Theme::Light);
    }

    #[tokio::test]
    async fn malformed_stored_theme_falls_back_to_system() {
        let store = Arc::new(MemoryStore::new());
        store.set(THEME_KEY, "solarized").await.unwrap();
        let state = state_with(toggle_surface(), store);

        let (_tx, rx) = watch::channel(true); // system says dark
        let controller = ThemeController::initialize(&state, Some(rx)).await.unwrap();
        assert_eq!(controller.current_theme().await, Theme::Dark);
    }

    #[tokio::test]
    async fn apply_theme_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(toggle_surface(), Arc::clone(&store));
        let controller = ThemeController::initialize(&state, None).await.unwrap();

        controller.apply_theme(Theme::Dark).await.unwrap();
        let first_attr = state.surface.lock().await.root_attr(THEME_ATTR).map(str::to_string);
        let first_stored = store.get(THEME_KEY).await;

        controller.apply_theme(Theme::Dark).await.unwrap();
        let second_attr = state.surface.lock().await.root_attr(THEME_ATTR).map(str::to_string);
        let second_stored = store.get(THEME_KEY).await;

        assert_eq!(first_attr.as_deref(), Some("dark"));
        assert_eq!(first_attr, second_attr);
        assert_eq!(first_stored.as_deref(), Some("dark"));
        assert_eq!(first_stored, second_stored);
    }

    #[tokio::test]
    async fn toggle_updates_label_to_opposite_action() {
        let state = state_with(toggle_surface(), Arc::new(MemoryStore::new()));
        let controller = ThemeController::initialize(&state, None).await.unwrap();
        assert_eq!(
            state.surface.lock().await.attr(TOGGLE_ID, LABEL_ATTR).as_deref(),
            Some("Switch to dark theme")
        );

        controller.toggle_theme().await.unwrap();
        assert_eq!(
            state.surface.lock().await.attr(TOGGLE_ID, LABEL_ATTR).as_deref(),
            Some("Switch to light theme")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_pulse_reverts_after_fixed_window() {
        let state = state_with(toggle_surface(), Arc::new(MemoryStore::new()));
        let controller = ThemeController::initialize(&state, None).await.unwrap();

        controller.toggle_theme().await.unwrap();
        assert!(state.surface.lock().await.has_class(THUMB_ID, PULSE_CLASS));

        tokio::time::sleep(Duration::from_millis(PULSE_MS + 10)).await;
        assert!(!state.surface.lock().await.has_class(THUMB_ID, PULSE_CLASS));
    }

    #[tokio::test]
    async fn stored_preference_shadows_system_changes_until_cleared() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(toggle_surface(), Arc::clone(&store));
        let controller = ThemeController::initialize(&state, None).await.unwrap();

        // initialize persisted light, so the stored preference exists
        controller.on_system_preference_change(true).await.unwrap();
        assert_eq!(controller.current_theme().await, Theme::Light);

        store.remove(THEME_KEY).await.unwrap();
        controller.on_system_preference_change(true).await.unwrap();
        assert_eq!(controller.current_theme().await, Theme::Dark);
    }

    #[tokio::test]
    async fn system_listener_applies_changes_while_unstored() {
        let store = Arc::new(MemoryStore::new());
        let state = state_with(toggle_surface(), Arc::clone(&store));

        let (tx, rx) = watch::channel(false);
        let controller = Arc::new(ThemeController::initialize(&state, Some(rx)).await.unwrap());
        // initialize persisted the resolved theme; clear it so the system
        // signal drives again
        store.remove(THEME_KEY).await.unwrap();

        let listener = controller.spawn_system_listener().unwrap();
        tx.send(true).unwrap();
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        assert_eq!(controller.current_theme().await, Theme::Dark);
        drop(tx);
        let _ = listener.await;
    }
}
