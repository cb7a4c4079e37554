pub mod models;
pub mod configurator;
pub mod service;

pub use models::{ConfigurationResult, UpsertReport};
pub use configurator::{configure, configure_selection, ConfigureError, Configurator};
pub use service::ConfiguratorService;
