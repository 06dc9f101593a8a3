//! Grade, SGPA/CGPA, and projection engine with its service plumbing.

pub mod config;
pub mod error;
pub mod grading;
pub mod report;
pub mod telemetry;

pub use grading::{GradeEngine, GradeError};
