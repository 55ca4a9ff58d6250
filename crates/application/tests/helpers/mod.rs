#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_doh_application::ports::{ResultSink, Source};
use ferrous_doh_domain::{
    DnsQuery, DomainError, NormalizedAnswer, NormalizedQuestion, NormalizedResponse, OutputItem,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub fn answer_for(query: &DnsQuery, data: &str) -> NormalizedResponse {
    NormalizedResponse {
        status: 0,
        recursion_desired: true,
        recursion_available: true,
        question: vec![NormalizedQuestion {
            name: query.fqdn(),
            record_type: query.record_type.to_u16(),
        }],
        answer: vec![NormalizedAnswer {
            name: query.fqdn(),
            record_type: query.record_type.to_u16(),
            ttl: 300,
            data: data.to_string(),
        }],
        ..Default::default()
    }
}

pub enum Behavior {
    Answer(String),
    Fail(DomainError),
    Hang,
}

/// Source that answers (or fails) after a delay, honouring cancellation.
pub struct MockSource {
    name: String,
    delay: Duration,
    behavior: Behavior,
    pub calls: AtomicUsize,
    pub saw_cancel: AtomicBool,
}

impl MockSource {
    pub fn answering(name: &str, data: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self::new(name, delay, Behavior::Answer(data.to_string())))
    }

    pub fn failing(name: &str, error: DomainError) -> Arc<Self> {
        Arc::new(Self::new(name, Duration::ZERO, Behavior::Fail(error)))
    }

    pub fn hanging(name: &str) -> Arc<Self> {
        Arc::new(Self::new(name, Duration::ZERO, Behavior::Hang))
    }

    fn new(name: &str, delay: Duration, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            delay,
            behavior,
            calls: AtomicUsize::new(0),
            saw_cancel: AtomicBool::new(false),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn was_cancelled(&self) -> bool {
        self.saw_cancel.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Source for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(
        &self,
        cancel: &CancellationToken,
        query: &DnsQuery,
    ) -> Result<NormalizedResponse, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let wait = async {
            match &self.behavior {
                Behavior::Hang => std::future::pending::<()>().await,
                _ => tokio::time::sleep(self.delay).await,
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                self.saw_cancel.store(true, Ordering::SeqCst);
                Err(DomainError::Cancelled)
            }
            _ = wait => match &self.behavior {
                Behavior::Answer(data) => Ok(answer_for(query, data)),
                Behavior::Fail(e) => Err(e.clone()),
                Behavior::Hang => Err(DomainError::Cancelled),
            }
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub streamed: Vec<OutputItem>,
    pub joined: Vec<Vec<OutputItem>>,
    pub fail_writes: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }
}

impl ResultSink for RecordingSink {
    fn emit(&mut self, item: &OutputItem) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::IoError("broken pipe".to_string()));
        }
        self.streamed.push(item.clone());
        Ok(())
    }

    fn emit_joined(&mut self, items: &[OutputItem]) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::IoError("broken pipe".to_string()));
        }
        self.joined.push(items.to_vec());
        Ok(())
    }
}
