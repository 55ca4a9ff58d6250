pub mod provider;
pub mod registry;

pub use provider::{default_parallelism, ProviderSource};
pub use registry::SourceRegistry;
