pub mod app;
pub mod config;
pub mod cooldown;
pub mod errors;
pub mod handlers;
pub mod machine;
pub mod models;
pub mod registry;
pub mod session;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::Config;
pub use registry::Registry;
pub use state::AppState;
