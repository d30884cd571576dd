use crate::models::CountTarget;
use crate::state::PageState;
use crate::surface::Surface;
use crate::ui::COUNTER_CLASS;
use crate::visibility::{BOTTOM_MARGIN, VISIBILITY_THRESHOLD, VisibilityEvent};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Class marking a generic reveal node as entered.
pub const ENTERED_CLASS: &str = "animate-in";

/// Fixed step of the counter interpolation timer.
pub const TICK_MS: u64 = 30;

/// Number of increments a counter is divided into; together with the tick
/// step this fixes the animation at ~1.5 s regardless of magnitude.
pub const TICK_DIVISOR: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Pending,
    Running,
    Done,
}

/// One registered reveal element. The state machine advances
/// Pending -> Running -> Done exactly once per page load.
#[derive(Debug, Clone)]
pub struct AnimationTarget {
    pub node: String,
    pub target_text: String,
    pub count: Option<CountTarget>,
    pub state: TargetState,
}

/// Extracts the numeric magnitude and suffix flags from target text.
/// Text without digits parses to magnitude zero.
pub fn parse_count_target(text: &str) -> CountTarget {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    CountTarget {
        magnitude: digits.parse().unwrap_or(0),
        percent: text.contains('%'),
        plus: text.contains('+'),
    }
}

/// Registers elements for visibility-triggered one-shot animations and
/// drives them as entered events arrive. Counter nodes interpolate from
/// zero to their recorded target on independent timers; generic nodes just
/// gain the entered class.
pub struct RevealScheduler {
    state: PageState,
    events: mpsc::UnboundedReceiver<VisibilityEvent>,
    targets: Arc<Mutex<BTreeMap<String, AnimationTarget>>>,
    running: Vec<JoinHandle<()>>,
}

impl RevealScheduler {
    pub fn new(state: &PageState, events: mpsc::UnboundedReceiver<VisibilityEvent>) -> Self {
        RevealScheduler {
            state: state.clone(),
            events,
            targets: Arc::new(Mutex::new(BTreeMap::new())),
            running: Vec::new(),
        }
    }

    /// Records each node's current text as its animation target, resets the
    /// visible content to a neutral placeholder, and subscribes the node to
    /// the viewport. Nodes already registered this page load are skipped.
    pub async fn register_reveal(&mut self, ids: &[String]) {
        for id in ids {
            let mut targets = self.targets.lock().await;
            if targets.contains_key(id) {
                warn!(node = %id, "already registered, skipping");
                continue;
            }

            let mut surface = self.state.surface.lock().await;
            let Some((top, height)) = surface.geometry(id) else {
                warn!(node = %id, "reveal node absent, skipping");
                continue;
            };
            let target_text = surface.text(id).unwrap_or_default();

            let count = if surface.has_class(id, COUNTER_CLASS) {
                surface.set_text(id, "0");
                Some(parse_count_target(&target_text))
            } else {
                surface.remove_class(id, ENTERED_CLASS);
                None
            };
            drop(surface);

            targets.insert(
                id.clone(),
                AnimationTarget {
                    node: id.clone(),
                    target_text,
                    count,
                    state: TargetState::Pending,
                },
            );
            drop(targets);

            self.state.viewport.lock().await.observe(
                id.clone(),
                top,
                height,
                VISIBILITY_THRESHOLD,
                BOTTOM_MARGIN,
            );
        }
    }

    /// Drains every queued visibility event and dispatches its animation.
    pub async fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_entered(event).await;
        }
    }

    /// One-shot trigger: unsubscribes the node, then runs its animation.
    /// Events for nodes already running or done have no effect.
    pub async fn handle_entered(&mut self, event: VisibilityEvent) {
        self.state.viewport.lock().await.unobserve(&event.node);

        let mut targets = self.targets.lock().await;
        let Some(target) = targets.get_mut(&event.node) else {
            debug!(node = %event.node, "entered event for unregistered node");
            return;
        };
        if target.state != TargetState::Pending {
            debug!(node = %event.node, "duplicate entered event ignored");
            return;
        }
        target.state = TargetState::Running;

        match target.count {
            Some(count) => {
                let surface = Arc::clone(&self.state.surface);
                let shared = Arc::clone(&self.targets);
                let node = event.node.clone();
                drop(targets);
                self.running.push(tokio::spawn(async move {
                    let ticks = run_counter(&surface, &node, count).await;
                    debug!(node = %node, ticks, "counter finished");
                    if let Some(target) = shared.lock().await.get_mut(&node) {
                        target.state = TargetState::Done;
                    }
                }));
            }
            None => {
                self.state
                    .surface
                    .lock()
                    .await
                    .add_class(&event.node, ENTERED_CLASS);
                target.state = TargetState::Done;
            }
        }
    }

    /// Awaits every spawned counter timer.
    pub async fn settle(&mut self) {
        for handle in self.running.drain(..) {
            let _ = handle.await;
        }
    }

    pub async fn target(&self, id: &str) -> Option<AnimationTarget> {
        self.targets.lock().await.get(id).cloned()
    }
}

/// Fixed-step interpolation from zero to the target magnitude. The percent
/// suffix renders on every frame, the plus suffix only on the final one,
/// which snaps to the exact magnitude. Returns the number of ticks taken.
pub async fn run_counter(surface: &Arc<Mutex<Surface>>, node: &str, count: CountTarget) -> u64 {
    let magnitude = count.magnitude as f64;
    let increment = magnitude / TICK_DIVISOR as f64;

    let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
    interval.tick().await; // the first tick completes immediately

    let mut current = 0.0;
    let mut ticks = 0u64;
    loop {
        interval.tick().await;
        ticks += 1;
        current += increment;

        // the tick bound also covers float drift in the accumulator
        if current >= magnitude || ticks >= TICK_DIVISOR {
            let mut text = count.magnitude.to_string();
            if count.percent {
                text.push('%');
            }
            if count.plus {
                text.push('+');
            }
            surface.lock().await.set_text(node, &text);
            break;
        }

        let mut text = (current.floor() as u64).to_string();
        if count.percent {
            text.push('%');
        }
        surface.lock().await.set_text(node, &text);
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile;
    use crate::storage::MemoryStore;
    use crate::surface::Node;
    use crate::visibility::Viewport;

    fn counter_node(id: &str, text: &str, top: f64) -> Node {
        Node::new(id).with_class(COUNTER_CLASS).with_text(text).at(top, 30.0)
    }

    fn scheduler_with(surface: Surface) -> RevealScheduler {
        let (viewport, events) = Viewport::new(600.0);
        let state = PageState::new(
            surface,
            Arc::new(MemoryStore::new()),
            viewport,
            profile::default_profile(),
        );
        RevealScheduler::new(&state, events)
    }

    #[test]
    fn parse_extracts_magnitude_and_suffixes() {
        assert_eq!(
            parse_count_target("47+"),
            CountTarget {
                magnitude: 47,
                percent: false,
                plus: true
            }
        );
        assert_eq!(
            parse_count_target("100%"),
            CountTarget {
                magnitude: 100,
                percent: true,
                plus: false
            }
        );
        assert_eq!(
            parse_count_target("n/a"),
            CountTarget {
                magnitude: 0,
                percent: false,
                plus: false
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn counter_for_47_plus_takes_fifty_ticks_and_snaps() {
        let mut surface = Surface::default();
        surface.insert(counter_node("stat", "47+", 0.0));
        let surface = Arc::new(Mutex::new(surface));

        let ticks = run_counter(&surface, "stat", parse_count_target("47+")).await;

        assert_eq!(ticks, 50);
        assert_eq!(surface.lock().await.text("stat").as_deref(), Some("47+"));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_magnitude_terminates_on_first_tick() {
        let mut surface = Surface::default();
        surface.insert(counter_node("stat", "n/a", 0.0));
        let surface = Arc::new(Mutex::new(surface));

        let ticks = run_counter(&surface, "stat", parse_count_target("n/a")).await;

        assert_eq!(ticks, 1);
        assert_eq!(surface.lock().await.text("stat").as_deref(), Some("0"));
    }

    #[tokio::test(start_paused = true)]
    async fn percent_suffix_renders_during_interpolation() {
        let mut surface = Surface::default();
        surface.insert(counter_node("stat", "100%", 0.0));
        let surface = Arc::new(Mutex::new(surface));

        run_counter(&surface, "stat", parse_count_target("100%")).await;
        assert_eq!(surface.lock().await.text("stat").as_deref(), Some("100%"));
    }

    #[tokio::test]
    async fn registration_resets_counter_text_to_placeholder() {
        let mut surface = Surface::default();
        surface.insert(counter_node("stat", "47+", 900.0));
        let mut scheduler = scheduler_with(surface);

        scheduler.register_reveal(&["stat".to_string()]).await;

        assert_eq!(
            scheduler.state.surface.lock().await.text("stat").as_deref(),
            Some("0")
        );
        let target = scheduler.target("stat").await.unwrap();
        assert_eq!(target.target_text, "47+");
        assert_eq!(target.state, TargetState::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn entered_event_is_one_shot() {
        let mut surface = Surface::default();
        surface.insert(counter_node("stat", "5+", 900.0));
        let mut scheduler = scheduler_with(surface);
        scheduler.register_reveal(&["stat".to_string()]).await;

        let event = VisibilityEvent {
            node: "stat".to_string(),
        };
        scheduler.handle_entered(event.clone()).await;
        assert!(!scheduler.state.viewport.lock().await.observed("stat"));
        scheduler.settle().await;
        assert_eq!(scheduler.target("stat").await.unwrap().state, TargetState::Done);
        let after_first = scheduler.state.surface.lock().await.text("stat");

        // a second entered event must have no observable effect
        scheduler.handle_entered(event).await;
        scheduler.settle().await;
        assert_eq!(scheduler.target("stat").await.unwrap().state, TargetState::Done);
        assert_eq!(scheduler.state.surface.lock().await.text("stat"), after_first);
    }

    #[tokio::test]
    async fn generic_reveal_gains_entered_class_without_timer() {
        let mut surface = Surface::default();
        surface.insert(Node::new("skill").with_class("skill-item").at(900.0, 40.0));
        let mut scheduler = scheduler_with(surface);
        scheduler.register_reveal(&["skill".to_string()]).await;

        scheduler
            .handle_entered(VisibilityEvent {
                node: "skill".to_string(),
            })
            .await;

        assert!(scheduler.state.surface.lock().await.has_class("skill", ENTERED_CLASS));
        assert_eq!(scheduler.target("skill").await.unwrap().state, TargetState::Done);
        assert!(scheduler.running.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_counters_animate_independently() {
        let mut surface = Surface::default();
        surface.insert(counter_node("a", "30+", 900.0));
        surface.insert(counter_node("b", "90%", 905.0));
        let mut scheduler = scheduler_with(surface);
        scheduler
            .register_reveal(&["a".to_string(), "b".to_string()])
            .await;

        scheduler.state.viewport.lock().await.set_scroll(400.0);
        scheduler.pump().await;
        scheduler.settle().await;

        let surface = scheduler.state.surface.lock().await;
        assert_eq!(surface.text("a").as_deref(), Some("30+"));
        assert_eq!(surface.text("b").as_deref(), Some("90%"));
        drop(surface);
        assert_eq!(scheduler.target("a").await.unwrap().state, TargetState::Done);
        assert_eq!(scheduler.target("b").await.unwrap().state, TargetState::Done);
    }

    #[tokio::test]
    async fn double_registration_is_skipped() {
        let mut surface = Surface::default();
        surface.insert(counter_node("stat", "47+", 900.0));
        let mut scheduler = scheduler_with(surface);
        scheduler.register_reveal(&["stat".to_string()]).await;
        scheduler.register_reveal(&["stat".to_string()]).await;

        // the second pass must not re-capture the "0" placeholder
        assert_eq!(scheduler.target("stat").await.unwrap().target_text, "47+");
    }
}
