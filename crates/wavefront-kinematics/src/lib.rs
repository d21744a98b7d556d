#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for turning planner headings into planar robot motion."]
#![doc = ""]
#![doc = "This crate provides the robot pose, the omnidirectional velocity command"]
#![doc = "handed to the drive, and the fixed-speed Euler integrator used to track the"]
#![doc = "robot in simulation."]

use core::f64::consts::PI;
use core::fmt;
use libm::{cos, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::KinematicsError;

/// A 2‑D pose `(x, y, θ)` in grid-cell units and radians (θ measured counter‑clockwise
/// from the x‑axis, so `0` points east and `PI / 2` points north).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Position along the grid columns (cells).
    pub x: f64,
    /// Position along the grid rows (cells).
    pub y: f64,
    /// Heading (rad), normalized to `[-PI, PI)`.
    pub theta: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: Column position in cell units.
    /// * `y`: Row position in cell units.
    /// * `theta`: Heading in radians.
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }

    /// Normalize an angle to be within `[-PI, PI)`.
    ///
    /// Angles at `PI` will be normalized to `-PI`.
    pub fn normalize_angle(angle: f64) -> f64 {
        let a = angle % (2.0 * PI);
        if a >= PI {
            a - 2.0 * PI
        } else if a < -PI {
            a + 2.0 * PI
        } else {
            a
        }
    }

    /// Euclidean distance between the positions of two poses.
    pub fn distance_to(&self, other: &Pose) -> f64 {
        libm::hypot(other.x - self.x, other.y - self.y)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x: {:.2}, y: {:.2}, θ: {:.2} rad)",
            self.x, self.y, self.theta
        )
    }
}

/// Velocity command for an omnidirectional base, expressed in the grid frame.
///
/// The drive collaborator consumes this as `(vx, vy, omega)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChassisVelocity {
    /// Velocity along x (cells per tick).
    pub vx: f64,
    /// Velocity along y (cells per tick).
    pub vy: f64,
    /// Angular velocity (rad per tick).
    pub omega: f64,
}

impl ChassisVelocity {
    /// Construct a velocity command.
    pub const fn new(vx: f64, vy: f64, omega: f64) -> Self {
        ChassisVelocity { vx, vy, omega }
    }

    /// Magnitude of the translational part.
    pub fn speed(&self) -> f64 {
        libm::hypot(self.vx, self.vy)
    }
}

impl fmt::Display for ChassisVelocity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(vx: {:.2}, vy: {:.2}, ω: {:.2})",
            self.vx, self.vy, self.omega
        )
    }
}

/// Fixed-speed Euler integrator.
///
/// Each call advances the robot by exactly `speed` along the commanded heading.
/// It stands in for the drive actuator when the navigator runs in simulation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionIntegrator {
    /// Distance covered per tick (cells).
    speed: f64,
}

impl MotionIntegrator {
    /// Construct a new integrator.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidSpeed)` if `speed` is not finite and positive.
    pub fn new(speed: f64) -> Result<Self, KinematicsError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(KinematicsError::InvalidSpeed("must be finite and positive"));
        }
        Ok(MotionIntegrator { speed })
    }

    /// Returns the per-tick speed.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Velocity command that drives at `speed` along `heading`.
    ///
    /// The planner never asks for rotation, so `omega` is always zero.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidHeading)` if `heading` is NaN or infinite.
    pub fn velocity_for(&self, heading: f64) -> Result<ChassisVelocity, KinematicsError> {
        if !heading.is_finite() {
            return Err(KinematicsError::InvalidHeading("must be finite"));
        }
        Ok(ChassisVelocity::new(
            self.speed * cos(heading),
            self.speed * sin(heading),
            0.0,
        ))
    }

    /// Advances `pose` one tick along `heading`.
    ///
    /// The returned pose faces the commanded heading.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidHeading)` if `heading` is NaN or infinite.
    pub fn move_robot(&self, pose: Pose, heading: f64) -> Result<Pose, KinematicsError> {
        let velocity = self.velocity_for(heading)?;
        Ok(Pose {
            x: pose.x + velocity.vx,
            y: pose.y + velocity.vy,
            theta: Pose::normalize_angle(heading),
        })
    }
}

impl fmt::Display for MotionIntegrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MotionIntegrator (speed: {:.2} cells/tick)", self.speed)
    }
}
