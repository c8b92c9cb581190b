//! Background session driving the scheduler on its timer.
//!
//! The loop re-reads the config before every sleep, so a speed change
//! takes effect on the next interval. Stopping is immediate: a pending
//! sleep is abandoned and the in-flight tick (ticks never await) has
//! already finished.

use pulse_env::{EnvError, PulseContext};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::scheduler::{EngagementScheduler, EngagementStats, LiveInbox};
use crate::store::{ActorRegistry, ContentRepository, NotificationSink};

impl<Ctx, C, A, N> EngagementScheduler<Ctx, C, A, N>
where
    Ctx: PulseContext,
    C: ContentRepository + ?Sized + 'static,
    A: ActorRegistry + ?Sized + 'static,
    N: NotificationSink + ?Sized + 'static,
{
    /// Moves the scheduler onto a background task ticking every
    /// `tick_interval()`. The session ends when the handle is stopped or
    /// dropped.
    pub fn start(self) -> SessionHandle {
        let context = Arc::clone(&self.context);
        let live = self.live_inbox();
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let (stats_tx, stats_rx) = watch::channel(self.stats().clone());

        let ctx = Arc::clone(&context);
        let task = context.spawn("engagement-session", async move {
            let mut scheduler = self;
            info!(
                "Engagement session started (seed {}, speed {}x)",
                ctx.seed(),
                scheduler.control.snapshot().speed_multiplier
            );

            loop {
                let interval = scheduler.control.snapshot().tick_interval();
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = ctx.sleep(interval) => {
                        scheduler.tick();
                        stats_tx.send_replace(scheduler.stats().clone());
                    }
                }
            }

            let stats = scheduler.stats();
            info!(
                "Engagement session stopped after {} ticks ({} likes, {} notifications)",
                stats.ticks, stats.likes, stats.notifications
            );
        });

        SessionHandle {
            stop_tx,
            stats_rx,
            live,
            task: Some(task),
        }
    }
}

/// Control handle for a running session.
pub struct SessionHandle {
    stop_tx: watch::Sender<bool>,
    stats_rx: watch::Receiver<EngagementStats>,
    live: LiveInbox,
    task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Totals as of the last completed tick.
    pub fn stats(&self) -> EngagementStats {
        self.stats_rx.borrow().clone()
    }

    pub fn live_inbox(&self) -> LiveInbox {
        self.live.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the loop and waits for it to exit. No tick runs after this
    /// returns.
    pub async fn stop(mut self) -> Result<EngagementStats, EnvError> {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take() {
            task.await?;
        }
        Ok(self.stats())
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
