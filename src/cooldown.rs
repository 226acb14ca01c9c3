use crate::machine::TickOutcome;
use crate::state::AppState;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, error};

/// The once-per-period cooldown tick, running only while the widget is
/// locked. Dropping the handle does not stop the task; call `cancel`.
#[derive(Debug)]
pub struct CooldownTask {
    handle: JoinHandle<()>,
}

impl CooldownTask {
    pub fn spawn(state: AppState, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                let mut widget = state.widget.lock().await;
                let widget = &mut *widget;
                match widget.machine.tick(&mut widget.registry).await {
                    Ok(TickOutcome::Counting(remaining)) => {
                        debug!(remaining, "cooldown tick");
                    }
                    Ok(TickOutcome::Expired) | Ok(TickOutcome::Idle) => break,
                    Err(err) => {
                        error!("cooldown expiry failed to persist: {err}");
                        break;
                    }
                }
            }
        });

        Self { handle }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
