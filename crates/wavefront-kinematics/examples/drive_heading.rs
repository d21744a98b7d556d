use core::f64::consts::FRAC_PI_4;

use wavefront_kinematics::*;

fn main() {
    let speed = 0.5;
    let heading = FRAC_PI_4; // North-east
    let num_steps = 10;

    let integrator = match MotionIntegrator::new(speed) {
        Ok(integrator) => integrator,
        Err(e) => {
            eprintln!("Failed to initialize integrator: {}", e);
            return;
        }
    };

    let mut current_pose = Pose::new(2.0, 2.0, 0.0);

    println!("Initializing simulation...");
    println!("  {}", integrator);
    println!("  Initial Pose:   {}", current_pose);
    println!("  Heading:        {:.3} rad", heading);
    println!("  Num Steps:      {}", num_steps);

    for i in 0..num_steps {
        match integrator.move_robot(current_pose, heading) {
            Ok(new_pose) => {
                current_pose = new_pose;
                println!("Step {:>2}: Pose: {}", i + 1, current_pose);
            }
            Err(e) => {
                eprintln!("Error during simulation step {}: {}", i + 1, e);
                break;
            }
        }
    }

    if let Ok(velocity) = integrator.velocity_for(heading) {
        println!("Drive command: {}", velocity);
    }
    println!("Final Pose: {:?}", current_pose);
}
