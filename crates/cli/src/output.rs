use ferrous_doh_application::ports::ResultSink;
use ferrous_doh_domain::{DomainError, OutputItem};
use std::io::Write;

/// Writes results as JSON: one object per line when streaming, a single
/// array when joined. Flushes after every write.
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_json<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DomainError> {
        serde_json::to_writer(&mut self.writer, value)
            .map_err(|e| DomainError::IoError(format!("Failed to write result: {}", e)))?;
        self.writer
            .write_all(b"\n")
            .and_then(|_| self.writer.flush())
            .map_err(|e| DomainError::IoError(format!("Failed to write result: {}", e)))
    }
}

impl<W: Write + Send> ResultSink for JsonLinesSink<W> {
    fn emit(&mut self, item: &OutputItem) -> Result<(), DomainError> {
        self.write_json(item)
    }

    fn emit_joined(&mut self, items: &[OutputItem]) -> Result<(), DomainError> {
        self.write_json(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrous_doh_domain::{LabeledResult, NormalizedResponse};

    fn response(status: u16) -> NormalizedResponse {
        NormalizedResponse {
            status,
            ..NormalizedResponse::default()
        }
    }

    #[test]
    fn test_streaming_writes_one_line_per_item() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.emit(&OutputItem::Plain(response(0))).unwrap();
        sink.emit(&OutputItem::Labeled(LabeledResult {
            label: "google".to_string(),
            resp: response(3),
        }))
        .unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["Status"], 0);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["label"], "google");
        assert_eq!(second["resp"]["Status"], 3);
    }

    #[test]
    fn test_joined_writes_single_array() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.emit_joined(&[OutputItem::Plain(response(0)), OutputItem::Plain(response(2))])
            .unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_joined_output_is_empty_array() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.emit_joined(&[]).unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "[]\n");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let mut sink = JsonLinesSink::new(BrokenPipe);
        let err = sink.emit(&OutputItem::Plain(response(0))).unwrap_err();
        assert!(matches!(err, DomainError::IoError(_)));
    }
}
