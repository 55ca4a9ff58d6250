use crate::ports::{ResultSink, Source};
use ferrous_doh_domain::{DnsQuery, DomainError, LabeledResult, OutputItem, RecordType};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub record_type: RecordType,
    /// Overall deadline; `None` runs until the limit, exhaustion or the
    /// caller cancels.
    pub timeout: Option<Duration>,
    /// Results to collect before stopping; `None` collects everything.
    pub limit: Option<usize>,
    pub verbose: bool,
    pub labels: bool,
    pub joined: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            record_type: RecordType::A,
            timeout: Some(Duration::from_secs(30)),
            limit: Some(1),
            verbose: false,
            labels: false,
            joined: false,
        }
    }
}

impl QueryOptions {
    /// A limit smaller than the domain count would stop before every
    /// domain had a chance to answer.
    pub fn validate(&self, domain_count: usize) -> Result<(), DomainError> {
        if domain_count == 0 {
            return Err(DomainError::ConfigError("No domains to query".to_string()));
        }
        if let Some(limit) = self.limit {
            if limit < domain_count {
                return Err(DomainError::ConfigError(format!(
                    "Limit {} is lower than the number of domains ({})",
                    limit, domain_count
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuerySummary {
    /// Jobs spawned (domains × sources).
    pub jobs: usize,
    /// Results handed to the sink.
    pub emitted: usize,
    pub limit_reached: bool,
    pub timed_out: bool,
}

/// Fans one query per (domain, source) out concurrently and funnels the
/// answers into a single consumer that applies the limit and writes to the
/// sink.
pub struct QuerySourcesUseCase {
    sources: Vec<Arc<dyn Source>>,
}

impl QuerySourcesUseCase {
    pub fn new(sources: Vec<Arc<dyn Source>>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[Arc<dyn Source>] {
        &self.sources
    }

    pub async fn execute(
        &self,
        domains: &[String],
        options: &QueryOptions,
        cancel: &CancellationToken,
        sink: &mut dyn ResultSink,
    ) -> Result<QuerySummary, DomainError> {
        options.validate(domains.len())?;
        if self.sources.is_empty() {
            return Err(DomainError::ConfigError("No sources to query".to_string()));
        }

        let run = cancel.child_token();

        if let Some(timeout) = options.timeout {
            let run = run.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(timeout) => {
                        debug!(timeout_ms = timeout.as_millis() as u64, "Query deadline reached");
                        run.cancel();
                    }
                    _ = run.cancelled() => {}
                }
            });
        }

        let (tx, mut rx) = mpsc::channel::<LabeledResult>(1);
        let mut summary = QuerySummary::default();

        for domain in domains {
            for source in &self.sources {
                let job = QueryJob {
                    source: Arc::clone(source),
                    query: DnsQuery::new(domain.as_str(), options.record_type),
                    verbose: options.verbose,
                };
                let tx = tx.clone();
                let run = run.clone();
                tokio::spawn(async move { job.run(run, tx).await });
                summary.jobs += 1;
            }
        }

        // Channel closes once every job has dropped its sender.
        drop(tx);

        debug!(
            jobs = summary.jobs,
            domains = domains.len(),
            sources = self.sources.len(),
            record_type = %options.record_type,
            "Queries dispatched"
        );

        let mut collected = Vec::new();

        loop {
            let labeled = tokio::select! {
                biased;
                _ = run.cancelled() => break,
                labeled = rx.recv() => match labeled {
                    Some(labeled) => labeled,
                    None => break,
                },
            };

            let item = if options.labels {
                OutputItem::Labeled(labeled)
            } else {
                OutputItem::Plain(labeled.resp)
            };

            if options.joined {
                collected.push(item);
            } else if let Err(e) = sink.emit(&item) {
                run.cancel();
                return Err(e);
            }

            summary.emitted += 1;

            if let Some(limit) = options.limit {
                if summary.emitted >= limit {
                    summary.limit_reached = true;
                    break;
                }
            }
        }

        summary.timed_out =
            !summary.limit_reached && run.is_cancelled() && !cancel.is_cancelled();

        // Stops in-flight jobs and the deadline timer.
        run.cancel();

        if options.joined {
            sink.emit_joined(&collected)?;
        }

        info!(
            jobs = summary.jobs,
            emitted = summary.emitted,
            limit_reached = summary.limit_reached,
            timed_out = summary.timed_out,
            "Multi-source query finished"
        );

        Ok(summary)
    }
}

struct QueryJob {
    source: Arc<dyn Source>,
    query: DnsQuery,
    verbose: bool,
}

impl QueryJob {
    async fn run(self, run: CancellationToken, tx: mpsc::Sender<LabeledResult>) {
        if run.is_cancelled() {
            return;
        }

        let resp = match self.source.query(&run, &self.query).await {
            Ok(resp) => resp,
            Err(e) if e.is_cancelled() => {
                debug!(source = self.source.name(), domain = %self.query.domain, "Query cancelled");
                return;
            }
            Err(e) if self.verbose => {
                warn!(source = self.source.name(), domain = %self.query.domain, error = %e, "Query failed");
                return;
            }
            Err(e) => {
                debug!(source = self.source.name(), domain = %self.query.domain, error = %e, "Query failed");
                return;
            }
        };

        let labeled = LabeledResult {
            label: self.source.name().to_string(),
            resp,
        };

        tokio::select! {
            _ = run.cancelled() => {}
            _ = tx.send(labeled) => {}
        }
    }
}
