use futures::future::BoxFuture;
use log::{debug, trace};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Something that can bring local snapshots back in line with the service.
///
/// The returned future must own everything it touches so each tick can run
/// it as an independent task.
pub trait Synchronizer: Send + Sync + 'static {
    fn resync(&self) -> BoxFuture<'static, ()>;
}

/// Single-owner slot for the repeating poll task.
///
/// Arming a new timer aborts the one already held, and dropping the slot
/// aborts whatever it holds, so at most one poll task exists per slot.
#[derive(Default)]
pub struct PollTimer {
    /// Handle to the background tick task
    task: Option<JoinHandle<()>>,
}

impl PollTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking every `period`, first tick one period from now.
    /// Each tick launches a resync without waiting for earlier ones.
    pub fn arm(&mut self, period: Duration, sync: Arc<dyn Synchronizer>) {
        self.disarm();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                trace!("Poll tick");
                tokio::spawn(sync.resync());
            }
        });

        debug!("Poll timer armed ({}ms)", period.as_millis());
        self.task = Some(task);
    }

    /// Abort the held task, if any. Returns whether one was running.
    pub fn disarm(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                debug!("Poll timer cleared");
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}
