use crate::grading::{CourseResult, EvaluationResult, SgpaWeighting};
use serde::Serialize;

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) const fn status_label(passed: bool) -> &'static str {
    if passed {
        "Pass"
    } else {
        "Fail"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRow {
    pub name: String,
    pub credits: Option<f64>,
    pub weighted_percent: f64,
    pub grade: String,
    pub point: u8,
    pub passed: bool,
    pub status_label: &'static str,
}

impl From<&CourseResult> for CourseRow {
    fn from(result: &CourseResult) -> Self {
        Self {
            name: result.name.clone(),
            credits: result.credits,
            weighted_percent: round2(result.weighted_percent),
            grade: result.grade.clone(),
            point: result.point,
            passed: result.passed,
            status_label: status_label(result.passed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub sgpa: f64,
    pub cgpa: f64,
    pub overall_passed: bool,
    pub status_label: &'static str,
    pub sgpa_weighting: SgpaWeighting,
    pub sgpa_weighting_label: &'static str,
    pub total_credits: Option<f64>,
}

/// Rounded, labelled rendering of an [`EvaluationResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub rows: Vec<CourseRow>,
    pub summary: SummaryView,
}

impl EvaluationReport {
    pub fn from_result(result: &EvaluationResult) -> Self {
        let rows = result.courses.iter().map(CourseRow::from).collect();
        let summary = SummaryView {
            sgpa: round2(result.sgpa),
            cgpa: round2(result.cgpa),
            overall_passed: result.overall_passed,
            status_label: if result.overall_passed { "PASS" } else { "FAIL" },
            sgpa_weighting: result.sgpa_weighting,
            sgpa_weighting_label: result.sgpa_weighting.label(),
            total_credits: result.total_credits,
        };
        Self { rows, summary }
    }

    pub fn failed_courses(&self) -> impl Iterator<Item = &CourseRow> {
        self.rows.iter().filter(|row| !row.passed)
    }
}
