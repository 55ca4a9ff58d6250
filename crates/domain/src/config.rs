pub mod errors;
pub mod http;
pub mod logging;
pub mod query;
pub mod root;
pub mod server;
pub mod upstream;

pub use errors::ConfigError;
pub use http::{HttpConfig, ResolverNetwork};
pub use logging::LoggingConfig;
pub use query::{QueryConfig, SourceApi};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;
