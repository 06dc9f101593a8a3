//! Presentation-ready views and CSV export of evaluation results.

mod export;
pub mod views;

pub use export::{write_csv, COURSE_COLUMNS, SUMMARY_COLUMNS};
pub use views::{CourseRow, EvaluationReport, SummaryView};
