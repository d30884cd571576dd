use crate::models::ProfileData;
use crate::storage::KeyValueStore;
use crate::surface::Surface;
use crate::visibility::Viewport;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handles every controller works against. Cloning is cheap; all
/// clones point at the same page.
#[derive(Clone)]
pub struct PageState {
    pub surface: Arc<Mutex<Surface>>,
    pub store: Arc<dyn KeyValueStore>,
    pub viewport: Arc<Mutex<Viewport>>,
    pub profile: Arc<Mutex<ProfileData>>,
}

impl PageState {
    pub fn new(
        surface: Surface,
        store: Arc<dyn KeyValueStore>,
        viewport: Viewport,
        profile: ProfileData,
    ) -> Self {
        PageState {
            surface: Arc::new(Mutex::new(surface)),
            store,
            viewport: Arc::new(Mutex::new(viewport)),
            profile: Arc::new(Mutex::new(profile)),
        }
    }
}
