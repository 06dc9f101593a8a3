//! Course grading, SGPA/CGPA aggregation, and target-grade projection.
//!
//! Every operation is a pure function of its inputs and the engine's
//! [`GradingPolicy`]; the engine itself never mutates.

mod aggregate;
pub mod domain;
mod error;
mod policy;
mod projection;
pub mod router;
mod rules;
mod scale;

#[cfg(test)]
mod tests;

pub use domain::{
    Component, Course, CourseResult, Cutoff, EvaluationOutcome, EvaluationRequest,
    EvaluationResult, GradingMode, ProjectionRequest, SgpaWeighting, TermRecord,
};
pub use error::GradeError;
pub use policy::{
    GradingPolicy, DEFAULT_COURSE_PASS_POINT, DEFAULT_OVERALL_PASS_CGPA,
    DEFAULT_WEIGHT_TOLERANCE,
};
pub use projection::{PendingRequirement, ProjectionResult};
pub use router::grading_router;
pub use scale::{GradeBand, GradeScale};

use tracing::debug;

/// Stateless evaluator that applies the grading policy to course data.
#[derive(Debug, Clone, Default)]
pub struct GradeEngine {
    policy: GradingPolicy,
}

impl GradeEngine {
    pub fn new(policy: GradingPolicy) -> Self {
        Self { policy }
    }

    pub fn standard() -> Self {
        Self::new(GradingPolicy::standard())
    }

    pub fn policy(&self) -> &GradingPolicy {
        &self.policy
    }

    /// Weighted course total in percent; pending components count as zero.
    pub fn compute_weighted_percent(&self, course: &Course) -> Result<f64, GradeError> {
        rules::weighted_score(course, &self.policy).map(|score| score.percent())
    }

    pub fn map_to_grade(
        &self,
        percent: f64,
        mode: GradingMode,
        cutoffs: Option<&[Cutoff]>,
    ) -> Result<GradeBand, GradeError> {
        let table = rules::grade_table(mode, cutoffs, &self.policy, "unnamed course")?;
        rules::map_to_grade(&table, percent)
    }

    pub fn evaluate_course(
        &self,
        course: &Course,
        default_mode: GradingMode,
    ) -> Result<CourseResult, GradeError> {
        let score = rules::weighted_score(course, &self.policy)?;
        let mode = course.effective_mode(default_mode);
        let table = rules::grade_table(
            mode,
            course.relative_cutoffs.as_deref(),
            &self.policy,
            &course.name,
        )?;
        let weighted_percent = score.percent();
        let band = rules::map_to_grade(&table, weighted_percent)?;
        let passed = self.policy.course_passed(band.point);

        debug!(
            course = %course.name,
            mode = mode.label(),
            weighted_percent,
            grade = %band.grade,
            passed,
            "course graded"
        );

        Ok(CourseResult {
            name: course.name.clone(),
            mode,
            weighted_percent,
            grade: band.grade,
            point: band.point,
            passed,
            credits: course.credits,
            pending_weight: score.pending_weight,
        })
    }

    pub fn aggregate(
        &self,
        results: &[CourseResult],
        prior_terms: &[TermRecord],
        weighting: SgpaWeighting,
    ) -> Result<EvaluationResult, GradeError> {
        aggregate::aggregate(results, prior_terms, weighting, &self.policy)
    }

    pub fn project(
        &self,
        course: &Course,
        target_point: u8,
        default_mode: GradingMode,
    ) -> Result<ProjectionResult, GradeError> {
        projection::project(course, target_point, default_mode, &self.policy)
    }

    /// Grades every course, aggregates the term, and runs the requested projection.
    pub fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationOutcome, GradeError> {
        let results = request
            .courses
            .iter()
            .map(|course| self.evaluate_course(course, request.default_mode))
            .collect::<Result<Vec<_>, _>>()?;

        let weighting = request
            .sgpa_weighting
            .unwrap_or(self.policy.sgpa_weighting);
        let result = self.aggregate(&results, &request.prior_terms, weighting)?;

        let projection = match &request.projection {
            Some(projection) => {
                let course = request
                    .courses
                    .iter()
                    .find(|course| course.name == projection.course)
                    .ok_or_else(|| GradeError::UnknownCourse(projection.course.clone()))?;
                Some(self.project(course, projection.target_point, request.default_mode)?)
            }
            None => None,
        };

        debug!(
            courses = result.courses.len(),
            sgpa = result.sgpa,
            cgpa = result.cgpa,
            overall_passed = result.overall_passed,
            "evaluation complete"
        );

        Ok(EvaluationOutcome { result, projection })
    }
}
