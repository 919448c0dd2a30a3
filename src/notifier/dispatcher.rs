//! # Notification Dispatcher
//!
//! Bounded queue plus a fixed pool of delivery workers.
//!
//! ## Architecture
//!
//! ```text
//! RegistrationService                  NotificationDispatcher
//!       |                                     |
//!       | try_send(Deliver)                   | start() spawns N workers
//!       v                                     v
//! mpsc::Sender<DispatchCommand>  →  Arc<Mutex<mpsc::Receiver>>
//!                                             |
//!                                             v
//!                                     Mailer.send() → MailTransport
//! ```
//!
//! - `dispatch()` never blocks. A full queue drops the message, logs a warning and
//!   bumps the `dropped` counter.
//! - Each message gets at most one delivery attempt. Outcomes only feed statistics.
//! - `DispatcherRuntime::shutdown()` first stops accepting new messages, then queues
//!   one stop marker per worker behind the pending ones. Once the workers exit the
//!   queue is closed and whatever slipped in behind the markers is delivered too, so
//!   every accepted message is attempted within the configured timeout.
//! - If the timeout expires the workers are aborted and the messages still queued
//!   are counted as dropped.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::mailer::{DeliveryOutcome, Mailer};
use super::message::NotificationMessage;
use super::Notifier;
use crate::config::NotifierConfig;
use crate::logging::log_notification_operation;

#[derive(Debug)]
enum DispatchCommand {
    Deliver(NotificationMessage),
    Shutdown,
}

type SharedReceiver = Arc<Mutex<mpsc::Receiver<DispatchCommand>>>;

/// Atomic statistics for thread-safe updates
#[derive(Debug, Default)]
struct AtomicStats {
    enqueued: AtomicU64,
    delivered: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
    last_attempt_at: RwLock<Option<DateTime<Utc>>>,
}

impl AtomicStats {
    fn record(&self, outcome: DeliveryOutcome) {
        let counter = match outcome {
            DeliveryOutcome::Delivered => &self.delivered,
            DeliveryOutcome::Skipped => &self.skipped,
            DeliveryOutcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::SeqCst);
        *self.last_attempt_at.write() = Some(Utc::now());
    }

    fn processed(&self) -> u64 {
        self.delivered.load(Ordering::SeqCst)
            + self.skipped.load(Ordering::SeqCst)
            + self.failed.load(Ordering::SeqCst)
    }
}

/// Point-in-time view of the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationStats {
    pub enqueued: u64,
    pub delivered: u64,
    pub skipped: u64,
    pub failed: u64,
    pub dropped: u64,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub queue_depth: usize,
    pub queue_capacity: usize,
    pub is_running: bool,
}

/// Outcome of draining the queue at shutdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShutdownResult {
    /// Every worker stopped before the drain timeout
    pub success: bool,
    pub notifications_drained: u64,
    pub duration_ms: u64,
}

/// Cloneable, non-blocking entry point into the dispatcher
#[derive(Clone)]
pub struct NotificationHandle {
    sender: mpsc::Sender<DispatchCommand>,
    stats: Arc<AtomicStats>,
    config: NotifierConfig,
    is_running: Arc<AtomicBool>,
    closing: Arc<AtomicBool>,
}

impl std::fmt::Debug for NotificationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationHandle")
            .field("queue_capacity", &self.sender.max_capacity())
            .field("is_running", &self.is_running.load(Ordering::SeqCst))
            .field("closing", &self.closing.load(Ordering::SeqCst))
            .finish()
    }
}

impl NotificationHandle {
    /// Queue a message for background delivery (fire-and-forget)
    ///
    /// Returns `false` if the message was dropped because the queue is full or the
    /// dispatcher is shutting down.
    pub fn dispatch(&self, message: NotificationMessage) -> bool {
        let notification_id = message.id;
        let recipient = message.recipient.clone();

        if self.closing.load(Ordering::SeqCst) {
            self.stats.dropped.fetch_add(1, Ordering::SeqCst);
            warn!(
                notification_id = %notification_id,
                recipient = %recipient,
                "Notification dropped; dispatcher is shutting down"
            );
            return false;
        }

        match self.sender.try_send(DispatchCommand::Deliver(message)) {
            Ok(()) => {
                self.stats.enqueued.fetch_add(1, Ordering::SeqCst);
                debug!(
                    notification_id = %notification_id,
                    recipient = %recipient,
                    "Notification queued for delivery"
                );
                true
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::SeqCst);
                if self.config.log_dropped_notifications {
                    warn!(
                        notification_id = %notification_id,
                        recipient = %recipient,
                        queue_capacity = self.sender.max_capacity(),
                        "Notification dropped due to queue backpressure"
                    );
                }
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::SeqCst);
                error!(
                    notification_id = %notification_id,
                    recipient = %recipient,
                    "Notification queue closed"
                );
                false
            }
        }
    }

    pub fn stats(&self) -> NotificationStats {
        NotificationStats {
            enqueued: self.stats.enqueued.load(Ordering::SeqCst),
            delivered: self.stats.delivered.load(Ordering::SeqCst),
            skipped: self.stats.skipped.load(Ordering::SeqCst),
            failed: self.stats.failed.load(Ordering::SeqCst),
            dropped: self.stats.dropped.load(Ordering::SeqCst),
            last_attempt_at: *self.stats.last_attempt_at.read(),
            queue_depth: self.sender.max_capacity() - self.sender.capacity(),
            queue_capacity: self.sender.max_capacity(),
            is_running: self.is_running(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }
}

impl Notifier for NotificationHandle {
    fn notify(&self, message: NotificationMessage) -> bool {
        self.dispatch(message)
    }
}

/// Not-yet-started dispatcher owning the queue's receiving end
pub struct NotificationDispatcher {
    receiver: mpsc::Receiver<DispatchCommand>,
    sender: mpsc::Sender<DispatchCommand>,
    mailer: Arc<Mailer>,
    stats: Arc<AtomicStats>,
    config: NotifierConfig,
    is_running: Arc<AtomicBool>,
    closing: Arc<AtomicBool>,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("config", &self.config)
            .field("mail_configured", &self.mailer.is_configured())
            .finish()
    }
}

impl NotificationDispatcher {
    /// Create a dispatcher and the handle used to feed it
    pub fn new(mailer: Arc<Mailer>, config: NotifierConfig) -> (Self, NotificationHandle) {
        let (sender, receiver) = mpsc::channel(config.channel_buffer_size.max(1));
        let stats = Arc::new(AtomicStats::default());
        let is_running = Arc::new(AtomicBool::new(false));
        let closing = Arc::new(AtomicBool::new(false));

        let handle = NotificationHandle {
            sender: sender.clone(),
            stats: Arc::clone(&stats),
            config: config.clone(),
            is_running: Arc::clone(&is_running),
            closing: Arc::clone(&closing),
        };

        let dispatcher = Self {
            receiver,
            sender,
            mailer,
            stats,
            config,
            is_running,
            closing,
        };

        (dispatcher, handle)
    }

    /// Spawn the worker pool on the current Tokio runtime
    pub fn start(self) -> DispatcherRuntime {
        let worker_count = self.config.worker_count.max(1);
        let receiver: SharedReceiver = Arc::new(Mutex::new(self.receiver));

        let workers = (0..worker_count)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    Arc::clone(&receiver),
                    Arc::clone(&self.mailer),
                    Arc::clone(&self.stats),
                ))
            })
            .collect();

        self.is_running.store(true, Ordering::SeqCst);
        info!(
            worker_count = worker_count,
            queue_capacity = self.config.channel_buffer_size,
            mail_configured = self.mailer.is_configured(),
            "Notification dispatcher started"
        );

        DispatcherRuntime {
            workers,
            receiver,
            sender: self.sender,
            mailer: self.mailer,
            stats: self.stats,
            config: self.config,
            is_running: self.is_running,
            closing: self.closing,
        }
    }
}

#[instrument(skip(receiver, mailer, stats), name = "notification_worker")]
async fn run_worker(
    worker_id: usize,
    receiver: SharedReceiver,
    mailer: Arc<Mailer>,
    stats: Arc<AtomicStats>,
) {
    debug!("Notification worker started");

    loop {
        let command = { receiver.lock().await.recv().await };

        match command {
            Some(DispatchCommand::Deliver(message)) => {
                let outcome = mailer.send(&message).await;
                stats.record(outcome);
            }
            Some(DispatchCommand::Shutdown) | None => break,
        }
    }

    debug!("Notification worker stopped");
}

/// Close the queue and deliver whatever was accepted behind the stop markers
async fn deliver_late_arrivals(receiver: &SharedReceiver, mailer: &Mailer, stats: &AtomicStats) {
    let mut receiver = receiver.lock().await;
    receiver.close();

    let mut late = 0u64;
    while let Some(command) = receiver.recv().await {
        if let DispatchCommand::Deliver(message) = command {
            stats.record(mailer.send(&message).await);
            late += 1;
        }
    }

    if late > 0 {
        debug!(
            late_notifications = late,
            "Delivered notifications queued during shutdown"
        );
    }
}

/// Close the queue after a timed-out drain and count what is left as dropped
fn abandon_queued(receiver: &mut mpsc::Receiver<DispatchCommand>, stats: &AtomicStats) -> u64 {
    receiver.close();

    let mut abandoned = 0u64;
    while let Ok(command) = receiver.try_recv() {
        if let DispatchCommand::Deliver(message) = command {
            stats.dropped.fetch_add(1, Ordering::SeqCst);
            warn!(
                notification_id = %message.id,
                recipient = %message.recipient,
                "Notification abandoned at shutdown"
            );
            abandoned += 1;
        }
    }
    abandoned
}

/// Running worker pool
#[derive(Debug)]
pub struct DispatcherRuntime {
    workers: Vec<JoinHandle<()>>,
    receiver: SharedReceiver,
    sender: mpsc::Sender<DispatchCommand>,
    mailer: Arc<Mailer>,
    stats: Arc<AtomicStats>,
    config: NotifierConfig,
    is_running: Arc<AtomicBool>,
    closing: Arc<AtomicBool>,
}

impl DispatcherRuntime {
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Stop the workers after draining already-accepted notifications
    pub async fn shutdown(mut self) -> ShutdownResult {
        let start = Instant::now();
        let processed_before = self.stats.processed();
        let timeout = self.config.shutdown_drain_timeout();

        self.closing.store(true, Ordering::SeqCst);
        info!(
            timeout_ms = self.config.shutdown_drain_timeout_ms,
            queue_depth = self.sender.max_capacity() - self.sender.capacity(),
            "Processing notification dispatcher shutdown"
        );

        let worker_count = self.workers.len();
        let sender = self.sender.clone();
        let receiver = Arc::clone(&self.receiver);
        let mailer = Arc::clone(&self.mailer);
        let stats = Arc::clone(&self.stats);
        let workers = &mut self.workers;
        let drain = async move {
            for _ in 0..worker_count {
                if sender.send(DispatchCommand::Shutdown).await.is_err() {
                    break;
                }
            }
            let results = futures::future::join_all(workers.iter_mut()).await;
            deliver_late_arrivals(&receiver, &mailer, &stats).await;
            results.iter().all(Result::is_ok)
        };

        let drained = tokio::time::timeout(timeout, drain).await;
        let success = match drained {
            Ok(all_stopped) => all_stopped,
            Err(_) => {
                warn!("Shutdown drain timeout reached; aborting notification workers");
                for worker in &self.workers {
                    worker.abort();
                }
                let _ = futures::future::join_all(self.workers.iter_mut()).await;
                let abandoned = abandon_queued(&mut *self.receiver.lock().await, &self.stats);
                warn!(
                    abandoned = abandoned,
                    "Notification queue closed after timeout"
                );
                false
            }
        };

        self.is_running.store(false, Ordering::SeqCst);

        let notifications_drained = self.stats.processed() - processed_before;
        let duration_ms = start.elapsed().as_millis() as u64;
        log_notification_operation(
            "shutdown",
            "-",
            "-",
            if success { "drained" } else { "timed_out" },
            Some(&format!("{notifications_drained} drained in {duration_ms}ms")),
        );

        ShutdownResult {
            success,
            notifications_drained,
            duration_ms,
        }
    }
}
