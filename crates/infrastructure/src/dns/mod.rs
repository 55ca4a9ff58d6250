pub mod wire;

pub use wire::{MessageBuilder, RecordTypeMapper, ResponseNormalizer, ResponseParser};
