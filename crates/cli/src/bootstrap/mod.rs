pub mod config;
pub mod logging;
pub mod signal;

pub use config::load_config;
pub use logging::init_logging;
pub use signal::shutdown_token;
