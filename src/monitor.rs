use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};
use wavefront_kinematics::Pose;
use wavefront_navigation::{HeadingSource, TickReport};

/// What the monitor saw over one run.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub replans: u64,
    pub avoidance_ticks: u64,
    pub missed_reports: u64,
    pub reached_goal: bool,
    pub last_pose: Option<Pose>,
}

/// Consumes tick reports until the goal is reached or the publisher goes away.
pub async fn run_monitor(
    mut reports: broadcast::Receiver<Arc<TickReport>>,
    log_every: u64,
) -> RunSummary {
    info!("Monitor task started.");
    let mut summary = RunSummary::default();

    loop {
        match reports.recv().await {
            Ok(report) => {
                summary.ticks += 1;
                summary.last_pose = Some(report.pose);
                if let Some(stats) = report.plan {
                    summary.replans += 1;
                    info!(
                        tick = report.tick,
                        expansions = stats.expansions,
                        reached = stats.reached,
                        "Plan recomputed"
                    );
                }
                if report.heading.source == HeadingSource::ObstacleAvoidance {
                    summary.avoidance_ticks += 1;
                }

                if log_every > 0 && report.tick % log_every == 0 {
                    info!(tick = report.tick, pose = %report.pose, cost = report.cost, "Progress");
                } else {
                    debug!(
                        tick = report.tick,
                        cell = %report.cell,
                        velocity = %report.velocity,
                        "Report received"
                    );
                }

                if report.reached_goal {
                    summary.reached_goal = true;
                    info!(tick = report.tick, cell = %report.cell, "Robot reached the goal");
                    break;
                }
            }
            Err(RecvError::Lagged(n)) => {
                warn!("Report receiver lagged by {} messages in monitor.", n);
                summary.missed_reports += n;
            }
            Err(RecvError::Closed) => {
                info!("Report channel closed.");
                break;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Topic;
    use wavefront_navigation::{Navigator, NavigatorConfig};

    fn reports(count: u64) -> Vec<TickReport> {
        let mut nav = Navigator::new(NavigatorConfig::default()).unwrap();
        (0..count).map(|_| nav.tick(None).unwrap()).collect()
    }

    #[tokio::test]
    async fn test_monitor_stops_on_goal() {
        let topic: Topic<TickReport> = Topic::new(32);
        let rx = topic.subscribe();
        for report in reports(12) {
            topic.publish(report);
        }

        let summary = run_monitor(rx, 5).await;
        assert!(summary.reached_goal);
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.replans, 1);
        assert_eq!(summary.avoidance_ticks, 0);
    }

    #[tokio::test]
    async fn test_monitor_stops_when_publisher_drops() {
        let topic: Topic<TickReport> = Topic::new(32);
        let rx = topic.subscribe();
        for report in reports(3) {
            topic.publish(report);
        }
        drop(topic);

        let summary = run_monitor(rx, 0).await;
        assert!(!summary.reached_goal);
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.last_pose.map(|p| p.x.round()), Some(4.0));
    }

    #[tokio::test]
    async fn test_monitor_counts_lag() {
        let topic: Topic<TickReport> = Topic::new(2);
        let rx = topic.subscribe();
        for report in reports(5) {
            topic.publish(report);
        }
        drop(topic);

        let summary = run_monitor(rx, 0).await;
        assert_eq!(summary.missed_reports, 3);
        assert_eq!(summary.ticks, 2);
    }
}
