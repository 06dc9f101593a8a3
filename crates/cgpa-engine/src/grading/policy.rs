use super::domain::SgpaWeighting;
use super::scale::GradeScale;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COURSE_PASS_POINT: f64 = 4.5;
pub const DEFAULT_OVERALL_PASS_CGPA: f64 = 5.5;
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 0.01;

/// Grade table and pass thresholds shared by every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingPolicy {
    pub scale: GradeScale,
    pub course_pass_point: f64,
    pub overall_pass_cgpa: f64,
    pub weight_tolerance: f64,
    pub sgpa_weighting: SgpaWeighting,
}

impl GradingPolicy {
    pub fn standard() -> Self {
        Self {
            scale: GradeScale::standard(),
            course_pass_point: DEFAULT_COURSE_PASS_POINT,
            overall_pass_cgpa: DEFAULT_OVERALL_PASS_CGPA,
            weight_tolerance: DEFAULT_WEIGHT_TOLERANCE,
            sgpa_weighting: SgpaWeighting::Unweighted,
        }
    }

    pub fn course_passed(&self, point: u8) -> bool {
        f64::from(point) >= self.course_pass_point
    }

    pub fn overall_passed(&self, cgpa: f64, all_courses_passed: bool) -> bool {
        all_courses_passed && cgpa >= self.overall_pass_cgpa
    }
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
