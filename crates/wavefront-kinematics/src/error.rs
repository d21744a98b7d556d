//! Error types for the kinematics library.
//!
//! This module defines the errors that can occur when configuring the
//! motion integrator.

use core::fmt;

/// Errors that can occur in kinematic calculations.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Error for an invalid per-tick speed.
    /// This variant is returned when the speed is not a finite, positive number.
    InvalidSpeed(&'static str),
    /// Error for a non-finite heading.
    /// This variant is returned when a NaN or infinite heading is integrated.
    InvalidHeading(&'static str),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidSpeed(msg) => write!(f, "Invalid speed: {}", msg),
            KinematicsError::InvalidHeading(msg) => write!(f, "Invalid heading: {}", msg),
        }
    }
}

impl core::error::Error for KinematicsError {}
