//! Run orchestration
//!
//! The EdgeDnsEngine ties the components together for each run:
//!
//! ```text
//! ┌──────────────────┐   Resolution   ┌──────────────┐   RunOutcome   ┌──────────┐
//! │ IpSourceResolver │ ─────────────► │ DnsReconciler│ ─────────────► │ Notifier │
//! └──────────────────┘                └──────────────┘   (RunReport)  └──────────┘
//!          │ Unresolved                                                     ▲
//!          └──────────────── SourceUnavailable report ──────────────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Resolve the candidate set (retries and fallback live in the resolver)
//! 2. Unresolved: stop with `SourceUnavailable`, no provider calls at all
//! 3. Reconcile the record against the resolved set
//! 4. Build a `RunReport` and hand it to the notifier, if one is configured
//! 5. Emit events for monitoring/logging
//!
//! A run never returns an error. Notifier failures are logged and do not
//! change the outcome.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::config::{EdgeDnsConfig, default_notify_title};
use crate::error::Result;
use crate::reconciler::DnsReconciler;
use crate::report::{OperationResult, RunOutcome, RunReport};
use crate::resolver::{IpSourceResolver, Resolution};
use crate::traits::{DnsProvider, IpFeed, Notifier};

/// Events emitted by the EdgeDnsEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A run began
    RunStarted { record_name: String },

    /// Candidate set resolved
    SourceResolved { count: usize, origin: String },

    /// No source or fallback produced an address
    SourceUnavailable { failed_attempts: usize },

    /// One provider call finished (successfully or not)
    OperationCompleted(OperationResult),

    /// A run ended
    RunFinished { headline: String, failures: usize },

    /// The engine stopped on a shutdown signal
    Stopped { reason: String },
}

/// Edge DNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`EdgeDnsEngine::new()`]
/// 2. Either call [`EdgeDnsEngine::run_once()`] for a single run, or
///    [`EdgeDnsEngine::run()`] to repeat every `interval_secs` until a
///    shutdown signal arrives
///
/// Runs are sequential; one run finishes before the next starts, and a
/// shutdown request is honored between runs only.
pub struct EdgeDnsEngine {
    resolver: IpSourceResolver,

    reconciler: DnsReconciler,

    /// Optional summary channel
    notifier: Option<Box<dyn Notifier>>,

    notify_title: String,

    /// Period between runs in interval mode
    interval: Option<Duration>,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl EdgeDnsEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `feed`: upstream feed implementation
    /// - `provider`: DNS provider implementation
    /// - `notifier`: notification channel (None = run silently)
    /// - `config`: edgedns configuration
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        feed: Box<dyn IpFeed>,
        provider: Box<dyn DnsProvider>,
        notifier: Option<Box<dyn Notifier>>,
        config: EdgeDnsConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let resolver = IpSourceResolver::new(feed, &config.source)?;
        let reconciler = DnsReconciler::new(provider, &config.record)?;
        let notify_title = config
            .notifier
            .as_ref()
            .map(|n| n.title().to_string())
            .unwrap_or_else(default_notify_title);

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);

        let engine = Self {
            resolver,
            reconciler,
            notifier,
            notify_title,
            interval: config.engine.interval_secs.map(Duration::from_secs),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Execute one full run and return its report
    pub async fn run_once(&self) -> RunReport {
        let started_at = Utc::now();
        let record_name = self.reconciler.record_name().to_string();

        info!(
            "Starting run for {} ({} strategy)",
            record_name,
            self.reconciler.strategy()
        );
        self.emit_event(EngineEvent::RunStarted {
            record_name: record_name.clone(),
        });

        let outcome = match self.resolver.resolve().await {
            Resolution::Resolved(resolved) => {
                self.emit_event(EngineEvent::SourceResolved {
                    count: resolved.len(),
                    origin: resolved.origin().to_string(),
                });
                self.reconciler.reconcile(resolved).await
            }
            Resolution::Unresolved { failures } => {
                error!(
                    "No edge IPs resolved after {} failed fetch(es); leaving {} untouched",
                    failures.len(),
                    record_name
                );
                self.emit_event(EngineEvent::SourceUnavailable {
                    failed_attempts: failures.len(),
                });
                RunOutcome::SourceUnavailable { failures }
            }
        };

        for result in outcome.results() {
            self.emit_event(EngineEvent::OperationCompleted(result.clone()));
        }

        let report = RunReport {
            record_name,
            started_at,
            finished_at: Utc::now(),
            outcome,
        };

        let headline = report.outcome.headline();
        match &report.outcome {
            RunOutcome::Reconciled { .. } if report.outcome.failure_count() == 0 => {
                info!("{}", headline)
            }
            _ => warn!("{}", headline),
        }

        self.notify(&report).await;

        self.emit_event(EngineEvent::RunFinished {
            headline,
            failures: report.outcome.failure_count(),
        });

        report
    }

    /// Run the engine
    ///
    /// Without an interval this is a single run. With one, runs repeat until
    /// SIGINT is received. SIGINT during a run abandons that run.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown
    /// - `Err(Error)`: Fatal error
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Run with a programmatic shutdown signal instead of SIGINT
    ///
    /// Used by the daemon (which also listens for SIGTERM) and by tests.
    pub async fn run_with_shutdown(&self, shutdown_rx: Option<oneshot::Receiver<()>>) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(&self, shutdown_rx: Option<oneshot::Receiver<()>>) -> Result<()> {
        let shutdown = async move {
            match shutdown_rx {
                Some(rx) => {
                    // A dropped sender counts as a request to stop
                    let _ = rx.await;
                }
                None => {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!("Failed to listen for shutdown signal: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            }
        };
        tokio::pin!(shutdown);

        match self.interval {
            Some(interval) => info!("Interval mode: running every {:?}", interval),
            None => debug!("Single-run mode"),
        }

        loop {
            // A signal mid-run abandons it like an external kill; applied
            // mutations stay applied
            tokio::select! {
                _ = self.run_once() => {}

                _ = &mut shutdown => {
                    warn!("Shutdown signal received during a run, abandoning it");
                    self.emit_event(EngineEvent::Stopped {
                        reason: "Shutdown signal during run".to_string(),
                    });
                    break;
                }
            }

            let Some(interval) = self.interval else {
                break;
            };

            debug!("Next run in {:?}", interval);
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    self.emit_event(EngineEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    break;
                }
            }
        }

        info!("Engine stopped");
        Ok(())
    }

    async fn notify(&self, report: &RunReport) {
        let Some(notifier) = &self.notifier else {
            debug!("No notifier configured, skipping summary");
            return;
        };

        match notifier
            .notify(&self.notify_title, &report.to_markdown())
            .await
        {
            Ok(()) => info!("Run summary sent via {}", notifier.notifier_name()),
            Err(e) => warn!(
                "Failed to send run summary via {}: {}",
                notifier.notifier_name(),
                e
            ),
        }
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => warn!(
                "Event channel full, dropping {:?}. Consider increasing event_channel_capacity.",
                event
            ),
            Err(TrySendError::Closed(_)) => debug!("No event listener, dropping event"),
        }
    }
}
