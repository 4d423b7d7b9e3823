//! Tokio-backed [`JobScheduler`].
//!
//! A single dispatcher task drains the queue and spawns one task per job.
//! Each task sleeps for the job's delay, then runs the handler under a hard
//! timeout. Follow-up ticks go back through the queue via a weak sender, so
//! dropping every [`TokioScheduler`] handle lets the dispatcher drain and
//! exit.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, warn};

use super::{
    AutoCombatJob, JobHandler, JobScheduler, SchedulerError, TickOutcome, TimeoutWatchdog,
};

#[derive(Clone, Copy, Debug)]
pub struct SchedulerConfig {
    pub tick_delay: Duration,
    pub tick_timeout: Duration,
    pub queue_size: usize,
}

struct Scheduled {
    job: AutoCombatJob,
    delay: Duration,
}

/// Cloneable handle to the dispatcher.
#[derive(Clone)]
pub struct TokioScheduler {
    tx: mpsc::Sender<Scheduled>,
}

impl TokioScheduler {
    /// Spawns the dispatcher loop on the current runtime.
    pub fn spawn(
        handler: Arc<dyn JobHandler>,
        watchdog: Arc<dyn TimeoutWatchdog>,
        config: SchedulerConfig,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(config.queue_size.max(1));
        let dispatcher = Dispatcher {
            rx,
            context: Arc::new(TaskContext {
                tx: tx.downgrade(),
                handler,
                watchdog,
                tick_delay: config.tick_delay,
                tick_timeout: config.tick_timeout,
            }),
            tasks: JoinSet::new(),
        };
        let handle = tokio::spawn(dispatcher.run());
        (Self { tx }, handle)
    }
}

#[async_trait]
impl JobScheduler for TokioScheduler {
    async fn dispatch_after(
        &self,
        job: AutoCombatJob,
        delay: Duration,
    ) -> Result<(), SchedulerError> {
        self.tx
            .send(Scheduled { job, delay })
            .await
            .map_err(|_| SchedulerError::Closed)
    }
}

struct TaskContext {
    tx: mpsc::WeakSender<Scheduled>,
    handler: Arc<dyn JobHandler>,
    watchdog: Arc<dyn TimeoutWatchdog>,
    tick_delay: Duration,
    tick_timeout: Duration,
}

struct Dispatcher {
    rx: mpsc::Receiver<Scheduled>,
    context: Arc<TaskContext>,
    tasks: JoinSet<()>,
}

impl Dispatcher {
    /// Main dispatcher loop.
    async fn run(mut self) {
        loop {
            tokio::select! {
                Some(scheduled) = self.rx.recv() => {
                    self.tasks.spawn(execute(scheduled, Arc::clone(&self.context)));
                }
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(err) = joined
                        && err.is_panic()
                    {
                        error!(target: "combat::scheduler", "auto-combat tick panicked: {err}");
                    }
                }
                else => break,
            }
        }
        debug!(target: "combat::scheduler", "dispatcher stopped");
    }
}

async fn execute(scheduled: Scheduled, context: Arc<TaskContext>) {
    let Scheduled { job, delay } = scheduled;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let character_id = job.character_id.0;
    match tokio::time::timeout(context.tick_timeout, context.handler.run(job.clone())).await {
        Ok(TickOutcome::Continue) => {
            let Some(tx) = context.tx.upgrade() else {
                debug!(
                    target: "combat::scheduler",
                    character_id,
                    "scheduler shut down, dropping follow-up tick"
                );
                return;
            };
            let next = Scheduled {
                job: job.follow_up(),
                delay: context.tick_delay,
            };
            if tx.send(next).await.is_err() {
                warn!(
                    target: "combat::scheduler",
                    character_id,
                    "failed to queue follow-up tick"
                );
            }
        }
        Ok(TickOutcome::Stopped(reason)) => {
            debug!(target: "combat::scheduler", character_id, ?reason, "auto-combat stopped");
        }
        Ok(TickOutcome::Cancelled) => {
            debug!(target: "combat::scheduler", character_id, "auto-combat cancelled");
        }
        Err(_) => {
            warn!(
                target: "combat::scheduler",
                character_id,
                timeout_ms = context.tick_timeout.as_millis() as u64,
                "auto-combat tick timed out"
            );
            context.watchdog.on_timeout(&job).await;
        }
    }
}
