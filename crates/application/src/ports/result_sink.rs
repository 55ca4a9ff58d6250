use ferrous_doh_domain::{DomainError, OutputItem};

/// Output collaborator for the multi-source query.
pub trait ResultSink: Send {
    /// Streaming mode: called once per result as it arrives.
    fn emit(&mut self, item: &OutputItem) -> Result<(), DomainError>;

    /// Joined mode: called exactly once at the end, possibly with no items.
    fn emit_joined(&mut self, items: &[OutputItem]) -> Result<(), DomainError>;
}
