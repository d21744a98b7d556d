mod behavior; // one behavior thread at a time
mod bus; // broadcast topics
mod config; // layered settings
mod monitor; // tick report consumer
mod navigation; // the navigate behavior

use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use wavefront_navigation::{Navigator, TickReport};

use behavior::BehaviorRunner;
use bus::Topic;
use navigation::SharedNavigator;

const REPORT_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Wavefront navigator starting.");
    let settings = crate::config::load_settings().context("failed to load configuration")?;

    let mut navigator =
        Navigator::new(settings.navigator_config()).context("invalid navigator configuration")?;
    if let Some(path) = &settings.simulation.map_path {
        // Already logged by the navigator; an unreadable map is not fatal.
        if navigator.bootstrap(path).is_err() {
            info!("Continuing with the configured occupancy.");
        }
    }
    let navigator: SharedNavigator = Arc::new(Mutex::new(navigator));

    let reports: Topic<TickReport> = Topic::new(REPORT_CAPACITY);
    let monitor = tokio::spawn(monitor::run_monitor(
        reports.subscribe(),
        settings.simulation.log_every,
    ));

    debug!(subscribers = reports.subscriber_count(), "Topic ready");

    let mut runner = BehaviorRunner::new();
    runner.start("navigate", {
        let navigator = Arc::clone(&navigator);
        let sim = settings.simulation.clone();
        // The topic moves into the behavior so the monitor sees the channel
        // close when the behavior ends.
        move |stop| navigation::navigate(navigator, &sim, reports, stop)
    })?;

    let summary = tokio::select! {
        summary = monitor => Some(summary.context("monitor task failed")?),
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl-C")?;
            warn!("Interrupted, stopping the navigate behavior.");
            None
        }
    };

    if let Some(name) = runner.active_name() {
        info!(
            behavior = name,
            running = runner.is_running(),
            "Joining behavior"
        );
    }
    let outcome = tokio::task::spawn_blocking(move || runner.stop())
        .await
        .context("failed to join the navigate behavior")?;
    if let Some(Err(e)) = outcome {
        error!(error = %e, "Navigate behavior failed");
        return Err(e);
    }

    let navigator = navigator.lock();
    info!("Final cost field:\n{}", navigator.planner().grid());
    match summary {
        Some(summary) => info!(
            ticks = summary.ticks,
            replans = summary.replans,
            avoidance_ticks = summary.avoidance_ticks,
            missed_reports = summary.missed_reports,
            reached_goal = summary.reached_goal,
            pose = %navigator.pose(),
            "Run finished."
        ),
        None => info!(pose = %navigator.pose(), ticks = navigator.ticks(), "Run interrupted."),
    }
    Ok(())
}
