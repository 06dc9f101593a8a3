use super::domain::{Course, GradingMode};
use super::error::GradeError;
use super::policy::GradingPolicy;
use super::rules::{grade_table, normalise, weighted_score};
use serde::{Deserialize, Serialize};

/// Score needed in one pending component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRequirement {
    pub id: String,
    pub weight: f64,
    /// Percentage of the component, clamped to 0-100.
    pub required_score: f64,
    /// Same requirement expressed as marks out of the component weight.
    pub required_marks: f64,
}

/// Back-solved scores for reaching a target grade point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub course: String,
    pub target_grade: String,
    pub target_point: u8,
    pub target_percent: f64,
    pub achieved_percent: f64,
    pub pending_weight: f64,
    /// Uniform score needed across pending components; may exceed 100 or drop below 0.
    pub required_percent: f64,
    pub unreachable: bool,
    pub already_achieved: bool,
    pub requirements: Vec<PendingRequirement>,
    pub max_attainable_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_attainable_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_attainable_point: Option<u8>,
}

impl ProjectionResult {
    pub fn summary(&self) -> String {
        if self.already_achieved {
            format!(
                "{} ({}) already secured in {}",
                self.target_grade, self.target_point, self.course
            )
        } else if self.unreachable {
            let best = match (&self.best_attainable_grade, self.best_attainable_point) {
                (Some(grade), Some(point)) => format!("; best attainable is {grade} ({point})"),
                _ => String::new(),
            };
            format!(
                "{} ({}) not achievable in {}, would need {:.2}% in pending components{}",
                self.target_grade, self.target_point, self.course, self.required_percent, best
            )
        } else {
            format!(
                "{} ({}) in {} needs {:.2}% in each pending component",
                self.target_grade, self.target_point, self.course, self.required_percent
            )
        }
    }
}

pub(crate) fn project(
    course: &Course,
    target_point: u8,
    default_mode: GradingMode,
    policy: &GradingPolicy,
) -> Result<ProjectionResult, GradeError> {
    let score = weighted_score(course, policy)?;
    let mode = course.effective_mode(default_mode);
    let table = grade_table(mode, course.relative_cutoffs.as_deref(), policy, &course.name)?;

    let target = table
        .threshold_for_point(target_point)
        .ok_or(GradeError::UnknownGradeTarget {
            point: target_point,
        })?;

    if score.pending_weight <= 0.0 {
        return Err(GradeError::NoPendingComponents(course.name.clone()));
    }

    // Targets live on the normalised scale; solve on the raw one.
    let target_raw = match score.class_highest {
        Some(highest) => target.min_percent * highest / 100.0,
        None => target.min_percent,
    };
    let required_percent = (target_raw - score.achieved) * 100.0 / score.pending_weight;
    let unreachable = required_percent > 100.0;
    let already_achieved = required_percent <= 0.0;

    let required_score = required_percent.clamp(0.0, 100.0);
    let requirements = course
        .pending_components()
        .map(|component| PendingRequirement {
            id: component.id.clone(),
            weight: component.weight,
            required_score,
            required_marks: required_score * component.weight / 100.0,
        })
        .collect();

    let max_attainable_percent =
        normalise(score.achieved + score.pending_weight, score.class_highest).min(100.0);
    let best = table.lookup(max_attainable_percent);

    tracing::debug!(
        course = %course.name,
        target_point,
        required_percent,
        unreachable,
        "projected pending component scores"
    );

    Ok(ProjectionResult {
        course: course.name.clone(),
        target_grade: target.grade.clone(),
        target_point,
        target_percent: target.min_percent,
        achieved_percent: score.percent(),
        pending_weight: score.pending_weight,
        required_percent,
        unreachable,
        already_achieved,
        requirements,
        max_attainable_percent,
        best_attainable_grade: best.map(|band| band.grade.clone()),
        best_attainable_point: best.map(|band| band.point),
    })
}
