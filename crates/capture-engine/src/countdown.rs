//! Cancellable countdown before each capture.

use std::time::Duration;

use tokio::sync::watch;

/// How a countdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    Finished,
    Cancelled,
}

/// Cancels a running countdown. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CountdownHandle {
    tx: watch::Sender<bool>,
}

impl CountdownHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Ticks `steps` times, `tick` apart, publishing the remaining count at the
/// start of each tick (`steps, steps - 1, .., 1`).
#[derive(Debug)]
pub struct Countdown {
    steps: u32,
    tick: Duration,
    rx: watch::Receiver<bool>,
}

impl Countdown {
    pub fn new(steps: u32, tick: Duration) -> (Self, CountdownHandle) {
        let (tx, rx) = watch::channel(false);
        (Self { steps, tick, rx }, CountdownHandle { tx })
    }

    pub async fn run(mut self, mut on_tick: impl FnMut(u32)) -> CountdownOutcome {
        for remaining in (1..=self.steps).rev() {
            if *self.rx.borrow() {
                return CountdownOutcome::Cancelled;
            }
            on_tick(remaining);
            tracing::debug!(remaining, "countdown tick");

            tokio::select! {
                _ = tokio::time::sleep(self.tick) => {}
                _ = wait_cancelled(&mut self.rx) => return CountdownOutcome::Cancelled,
            }
        }
        if *self.rx.borrow() {
            return CountdownOutcome::Cancelled;
        }
        CountdownOutcome::Finished
    }
}

async fn wait_cancelled(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        // Handle dropped without cancelling: never fires.
        std::future::pending::<()>().await;
    }
}
