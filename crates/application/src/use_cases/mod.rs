pub mod query_sources;

pub use query_sources::{QueryOptions, QuerySourcesUseCase, QuerySummary};
