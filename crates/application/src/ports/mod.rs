mod doh_handler;
mod result_sink;
mod source;

pub use doh_handler::DohHandler;
pub use result_sink::ResultSink;
pub use source::Source;
