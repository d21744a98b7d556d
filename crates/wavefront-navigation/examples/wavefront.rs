use std::f64::consts::PI;

use wavefront_navigation::{GridCell, Navigator, NavigatorConfig, Planner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 12x12 grid with the goal in the north-east corner
    let goal = GridCell::new(9, 9);
    let mut planner = Planner::new(12, goal)?;

    // A wall with a gap on its eastern end
    for x in 2..8 {
        planner.grid_mut().set_occupied(GridCell::new(x, 6), true);
    }
    planner.grid_mut().set_occupied(GridCell::new(4, 3), true);

    let stats = planner.replan()?;
    println!(
        "Wavefront from {}: {} expansions, {} cost evaluations, {} cells reached",
        goal, stats.expansions, stats.cost_evaluations, stats.reached
    );
    println!("{}", planner.grid());

    let samples = [GridCell::new(2, 2), GridCell::new(5, 7), GridCell::new(3, 5)];
    for cell in samples {
        let heading = planner.select_heading(cell);
        println!(
            "Heading at {}: {:>7.2} deg ({:?})",
            cell,
            heading.radians * 180.0 / PI,
            heading.source
        );
    }

    // Drive a robot through the same layout
    let mut navigator = Navigator::new(NavigatorConfig {
        goal,
        ..NavigatorConfig::default()
    })?;
    let walls: Vec<_> = (2..8)
        .map(|x| (GridCell::new(x, 6), true))
        .chain([(GridCell::new(4, 3), true)])
        .collect();
    navigator.apply_update(&walls)?;

    println!("\nDriving from {}:", navigator.pose());
    for _ in 0..40 {
        let report = navigator.tick(None)?;
        println!(
            "Tick {:>2}: cell {} cost {:>5.2} pose {}",
            report.tick, report.cell, report.cost, report.pose
        );
        if report.reached_goal {
            println!("Goal reached after {} ticks", report.tick);
            break;
        }
    }

    Ok(())
}
