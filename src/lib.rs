pub mod animate;
pub mod app;
pub mod errors;
pub mod fetch;
pub mod models;
pub mod profile;
pub mod state;
pub mod stats;
pub mod storage;
pub mod surface;
pub mod theme;
pub mod ui;
pub mod visibility;

pub use app::Page;
pub use errors::EngineError;
pub use state::PageState;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
