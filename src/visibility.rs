use tokio::sync::mpsc;
use tracing::debug;

/// Fraction of a node that must sit inside the (margin-biased) viewport
/// window before its entered event fires.
pub const VISIBILITY_THRESHOLD: f64 = 0.1;

/// Negative bias applied to the window bottom, matching an observer root
/// margin of `0px 0px -50px 0px`.
pub const BOTTOM_MARGIN: f64 = -50.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityEvent {
    pub node: String,
}

#[derive(Debug)]
struct Registration {
    node: String,
    top: f64,
    height: f64,
    threshold: f64,
    bottom_margin: f64,
    fired: bool,
}

/// Visibility notification source: tracks registered regions against a
/// scrolling window and emits a one-shot entered event when a region
/// crosses its threshold. Registrations are evaluated on registration
/// (the region may already be on screen) and on every scroll change.
#[derive(Debug)]
pub struct Viewport {
    height: f64,
    scroll: f64,
    registrations: Vec<Registration>,
    events: mpsc::UnboundedSender<VisibilityEvent>,
}

impl Viewport {
    pub fn new(height: f64) -> (Self, mpsc::UnboundedReceiver<VisibilityEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let viewport = Viewport {
            height,
            scroll: 0.0,
            registrations: Vec::new(),
            events,
        };
        (viewport, receiver)
    }

    pub fn observe(
        &mut self,
        node: impl Into<String>,
        top: f64,
        height: f64,
        threshold: f64,
        bottom_margin: f64,
    ) {
        let mut registration = Registration {
            node: node.into(),
            top,
            height,
            threshold,
            bottom_margin,
            fired: false,
        };
        self.evaluate(&mut registration);
        self.registrations.push(registration);
    }

    pub fn unobserve(&mut self, node: &str) {
        self.registrations.retain(|reg| reg.node != node);
    }

    pub fn observed(&self, node: &str) -> bool {
        self.registrations.iter().any(|reg| reg.node == node)
    }

    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    pub fn set_scroll(&mut self, offset: f64) {
        self.scroll = offset;
        let mut registrations = std::mem::take(&mut self.registrations);
        for registration in &mut registrations {
            self.evaluate(registration);
        }
        self.registrations = registrations;
    }

    fn evaluate(&self, registration: &mut Registration) {
        if registration.fired {
            return;
        }
        if self.visible_ratio(registration) >= registration.threshold {
            registration.fired = true;
            debug!(node = %registration.node, "visibility entered");
            let _ = self.events.send(VisibilityEvent {
                node: registration.node.clone(),
            });
        }
    }

    fn visible_ratio(&self, registration: &Registration) -> f64 {
        let window_top = self.scroll;
        let window_bottom = self.scroll + self.height + registration.bottom_margin;
        if window_bottom <= window_top {
            return 0.0;
        }

        let node_top = registration.top;
        let node_bottom = registration.top + registration.height;
        let overlap = (node_bottom.min(window_bottom) - node_top.max(window_top)).max(0.0);

        if registration.height <= 0.0 {
            if node_top >= window_top && node_top <= window_bottom {
                return 1.0;
            }
            return 0.0;
        }

        overlap / registration.height
    }
}
