use super::views::round2;
use crate::grading::EvaluationResult;
use serde::Serialize;
use std::io::Write;

pub const COURSE_COLUMNS: [&str; 6] = [
    "name",
    "credits",
    "weighted_percent",
    "grade",
    "point",
    "passed",
];

pub const SUMMARY_COLUMNS: [&str; 3] = ["sgpa", "cgpa", "overall_passed"];

#[derive(Debug, Serialize)]
struct CourseCsvRow<'a> {
    name: &'a str,
    credits: Option<f64>,
    weighted_percent: String,
    grade: &'a str,
    point: u8,
    passed: bool,
}

/// Writes one row per course followed by a summary section.
pub fn write_csv<W: Write>(result: &EvaluationResult, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);

    csv_writer.write_record(COURSE_COLUMNS)?;
    for course in &result.courses {
        csv_writer.serialize(CourseCsvRow {
            name: &course.name,
            credits: course.credits,
            weighted_percent: format!("{:.2}", course.weighted_percent),
            grade: &course.grade,
            point: course.point,
            passed: course.passed,
        })?;
    }

    csv_writer.write_record(SUMMARY_COLUMNS)?;
    csv_writer.write_record([
        format!("{:.2}", round2(result.sgpa)),
        format!("{:.2}", round2(result.cgpa)),
        result.overall_passed.to_string(),
    ])?;

    csv_writer.flush()?;
    Ok(())
}
