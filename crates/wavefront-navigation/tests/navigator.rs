mod common;

use std::fs;

use wavefront_kinematics::Pose;
use wavefront_navigation::{GridCell, Navigator, NavigatorConfig, UNREACHED_COST};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn run_to_goal(nav: &mut Navigator, budget: u64) -> Option<u64> {
    for _ in 0..budget {
        let report = nav.tick(None).unwrap();
        assert!(
            !nav.planner().grid().is_occupied(report.cell),
            "robot entered occupied cell {} at tick {}",
            report.cell,
            report.tick
        );
        if report.reached_goal {
            return Some(report.tick);
        }
    }
    None
}

#[test]
fn test_open_field_reaches_goal() {
    init_tracing();
    let mut nav = Navigator::new(NavigatorConfig::default()).unwrap();
    let reached = run_to_goal(&mut nav, 12);
    assert_eq!(reached, Some(10));
    assert_eq!(nav.robot_cell(), GridCell::new(9, 9));

    // Standing on the goal: no further motion.
    let pose = nav.pose();
    let report = nav.tick(None).unwrap();
    assert!(report.reached_goal);
    assert_eq!(report.pose, pose);
}

#[test]
fn test_detours_around_obstacle_on_the_diagonal() {
    init_tracing();
    let mut nav = Navigator::new(NavigatorConfig::default()).unwrap();
    nav.apply_update(&[(GridCell::new(5, 5), true)]).unwrap();
    assert!(run_to_goal(&mut nav, 60).is_some());
}

#[test]
fn test_obstacle_event_mid_run_triggers_replan() {
    init_tracing();
    let mut nav = Navigator::new(NavigatorConfig::default()).unwrap();
    let first = nav.tick(None).unwrap();
    assert!(first.plan.is_some());

    let blocked = [(GridCell::new(7, 7), true), (GridCell::new(6, 7), true)];
    let report = nav.tick(Some(&blocked)).unwrap();
    let stats = report.plan.expect("occupancy changed");
    let blocked_cost = nav.planner().grid().cost_of(GridCell::new(7, 7));
    assert_eq!(blocked_cost, UNREACHED_COST);
    // 10x10 interior minus the two new obstacles.
    assert_eq!(stats.reached, 98);
    assert_eq!(nav.obstacles().len(), 2);

    let report = nav.tick(Some(&blocked)).unwrap();
    assert!(
        report.plan.is_none(),
        "repeating the same occupancy changes nothing"
    );
}

#[test]
fn test_bootstrap_from_map_file() {
    init_tracing();
    let map = "\
############
#..........#
#.......G..#
#..........#
#...OOOOO..#
#..........#
#..........#
#..........#
#..........#
#.R........#
#..........#
############
";
    let path = std::env::temp_dir().join(format!("wavefront-nav-{}.map", std::process::id()));
    fs::write(&path, map).unwrap();

    let mut nav = Navigator::new(NavigatorConfig::default()).unwrap();
    let layout = nav.bootstrap(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(layout.obstacles.len(), 5);
    assert_eq!(nav.goal(), GridCell::new(8, 9));
    assert_eq!(nav.pose(), Pose::new(2.0, 2.0, 0.0));
    assert!(nav.obstacles().is_obstacle(4, 7));

    let report = nav.tick(None).unwrap();
    assert_eq!(report.plan.map(|s| s.reached), Some(95));
    common::assert_matches_reference(
        nav.planner().grid(),
        nav.goal(),
        nav.planner().diagonal_rule(),
    );
}

#[test]
fn test_bootstrap_rejects_malformed_map() {
    init_tracing();
    let path = std::env::temp_dir().join(format!("wavefront-bad-{}.map", std::process::id()));
    fs::write(&path, "#G..G#\n").unwrap();

    let mut nav = Navigator::new(NavigatorConfig::default()).unwrap();
    assert!(nav.bootstrap(&path).is_err());
    fs::remove_file(&path).unwrap();

    assert_eq!(nav.goal(), GridCell::new(9, 9));
    assert!(nav.tick(None).is_ok());
}
