//! Coarse-grained behavior threads: at most one runs at a time.
//!
//! Starting a behavior signals the running one to stop and joins it first, so
//! the navigator behind the shared mutex only ever has one driver.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use anyhow::{Context, anyhow};
use tracing::{info, warn};

/// Cooperative stop flag handed to a behavior.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }
}

struct ActiveBehavior {
    name: String,
    stop: StopSignal,
    handle: JoinHandle<anyhow::Result<()>>,
}

#[derive(Default)]
pub struct BehaviorRunner {
    active: Option<ActiveBehavior>,
}

impl BehaviorRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the current behavior, if any, then runs `behavior` on a new thread named `name`.
    pub fn start<F>(&mut self, name: &str, behavior: F) -> anyhow::Result<()>
    where
        F: FnOnce(StopSignal) -> anyhow::Result<()> + Send + 'static,
    {
        if let Some(Err(e)) = self.stop() {
            warn!(error = %e, "Previous behavior ended with an error");
        }

        let stop = StopSignal::default();
        let handle = thread::Builder::new()
            .name(name.into())
            .spawn({
                let stop = stop.clone();
                move || behavior(stop)
            })
            .with_context(|| format!("failed to spawn behavior thread '{name}'"))?;

        info!(behavior = name, "Behavior started");
        self.active = Some(ActiveBehavior {
            name: name.to_string(),
            stop,
            handle,
        });
        Ok(())
    }

    /// Signals the current behavior to stop and waits for it.
    /// Returns its outcome, or `None` if nothing was running.
    pub fn stop(&mut self) -> Option<anyhow::Result<()>> {
        let active = self.active.take()?;
        active.stop.request();
        let outcome = active
            .handle
            .join()
            .unwrap_or_else(|_| Err(anyhow!("behavior '{}' panicked", active.name)));
        info!(behavior = %active.name, ok = outcome.is_ok(), "Behavior joined");
        Some(outcome)
    }

    /// True while the current behavior's thread is still executing.
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.name.as_str())
    }
}

impl Drop for BehaviorRunner {
    fn drop(&mut self) {
        if let Some(Err(e)) = self.stop() {
            warn!(error = %e, "Behavior ended with an error during shutdown");
        }
    }
}
