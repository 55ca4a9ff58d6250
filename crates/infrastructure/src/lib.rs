pub mod dns;
pub mod doh;
pub mod sources;
pub mod transport;
