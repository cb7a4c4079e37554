pub mod app_config;
pub mod catalog_file;
pub mod events;

pub use app_config::Config;
pub use catalog_file::{load_catalog, load_configured_catalog, parse_catalog, StoreError};
pub use events::BroadcastNotifier;
