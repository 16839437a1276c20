//! Repeating activities with an explicit start and stop.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Stop signal handed to a task body. Resolves once `TaskHandle::stop` runs
/// or the handle is dropped.
#[derive(Debug, Clone)]
pub struct StopSignal(watch::Receiver<bool>);

impl StopSignal {
    pub async fn stopped(&mut self) {
        // An Err means the handle is gone, which also counts as stop.
        let _ = self.0.wait_for(|stop| *stop).await;
    }

    pub fn is_stopped(&self) -> bool {
        *self.0.borrow()
    }
}

/// Owner side of a spawned activity.
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    stop: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    /// Spawns `body` with a fresh stop signal.
    pub fn spawn<F, Fut>(name: &'static str, body: F) -> Self
    where
        F: FnOnce(StopSignal) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop, signal) = watch::channel(false);
        let join = tokio::spawn(body(StopSignal(signal)));
        log::debug!("Started task {name}");
        Self { name, stop, join }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Signals the task and waits for it to return.
    pub async fn stop(self) {
        self.stop.send_replace(true);
        if let Err(err) = self.join.await {
            log::warn!("Task {} ended abnormally: {err}", self.name);
        } else {
            log::debug!("Stopped task {}", self.name);
        }
    }
}

/// Runs `tick` every `period` until stopped. The first tick fires at once;
/// ticks missed while the runtime was busy are skipped, not replayed.
pub fn spawn_repeating<F>(name: &'static str, period: Duration, mut tick: F) -> TaskHandle
where
    F: FnMut() + Send + 'static,
{
    TaskHandle::spawn(name, move |mut stop| async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = stop.stopped() => break,
                _ = interval.tick() => tick(),
            }
        }
    })
}
