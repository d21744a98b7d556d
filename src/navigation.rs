use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use parking_lot::Mutex;
use spin_sleep::SpinSleeper;
use tracing::{info, warn};
use wavefront_navigation::{GridCell, Navigator, OccupancyUpdate, TickReport};

use crate::behavior::StopSignal;
use crate::bus::Topic;
use crate::config::{ObstacleEvent, SimulationSettings};

/// The navigator is driven by one behavior thread at a time and read by the
/// main thread once that behavior is joined.
pub type SharedNavigator = Arc<Mutex<Navigator>>;

/// Occupancy changes scripted for `tick`, if any.
pub fn events_at(events: &[ObstacleEvent], tick: u64) -> Option<OccupancyUpdate> {
    let update: OccupancyUpdate = events
        .iter()
        .filter(|event| event.tick == tick)
        .map(|event| (GridCell::new(event.x, event.y), event.occupied))
        .collect();
    (!update.is_empty()).then_some(update)
}

/// Navigate behavior: ticks the navigator at a fixed rate until the goal is
/// reached, the tick budget runs out or a stop is requested.
pub fn navigate(
    navigator: SharedNavigator,
    sim: &SimulationSettings,
    reports: Topic<TickReport>,
    stop: StopSignal,
) -> anyhow::Result<()> {
    info!(
        tick_ms = sim.tick_ms,
        max_ticks = sim.max_ticks,
        events = sim.obstacle_events.len(),
        "Navigate behavior started."
    );
    let sleeper = SpinSleeper::new(100_000);
    let period = Duration::from_millis(sim.tick_ms);

    for tick in 1..=sim.max_ticks {
        if stop.is_set() {
            info!(tick, "Stop requested, leaving navigate behavior.");
            return Ok(());
        }

        let update = events_at(&sim.obstacle_events, tick);
        if let Some(update) = &update {
            info!(tick, cells = update.len(), "Injecting obstacle event");
        }

        let report = navigator
            .lock()
            .tick(update.as_deref())
            .with_context(|| format!("navigation tick {tick} failed"))?;
        let reached = report.reached_goal;
        reports.publish(report);
        if reached {
            info!(tick, "Navigate behavior finished at the goal.");
            return Ok(());
        }

        sleeper.sleep(period);
    }

    warn!(
        max_ticks = sim.max_ticks,
        "Tick budget exhausted before reaching the goal"
    );
    Ok(())
}
