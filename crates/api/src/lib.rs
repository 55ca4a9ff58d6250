pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use errors::DohResponseError;
pub use routes::create_doh_routes;
pub use state::DohState;
