use super::domain::{Course, Cutoff, GradingMode};
use super::error::GradeError;
use super::policy::GradingPolicy;
use super::scale::{GradeBand, GradeScale};
use std::borrow::Cow;
use std::collections::HashSet;

/// Achieved and pending weight of a validated course, in percent of the course.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WeightedScore {
    pub achieved: f64,
    pub pending_weight: f64,
    pub class_highest: Option<f64>,
}

impl WeightedScore {
    /// Course total after class-highest normalisation, capped at 100.
    pub fn percent(&self) -> f64 {
        normalise(self.achieved, self.class_highest).min(100.0)
    }
}

pub(crate) fn normalise(raw: f64, class_highest: Option<f64>) -> f64 {
    match class_highest {
        Some(highest) => (raw / highest * 100.0).min(100.0),
        None => raw,
    }
}

pub(crate) fn weighted_score(
    course: &Course,
    policy: &GradingPolicy,
) -> Result<WeightedScore, GradeError> {
    let mut seen = HashSet::new();
    let mut total_weight = 0.0;
    let mut achieved = 0.0;
    let mut pending_weight = 0.0;

    for component in &course.components {
        if !seen.insert(component.id.as_str()) {
            return Err(GradeError::DuplicateComponent {
                course: course.name.clone(),
                component: component.id.clone(),
            });
        }

        if !component.weight.is_finite() || !(0.0..=100.0).contains(&component.weight) {
            return Err(GradeError::WeightOutOfRange {
                course: course.name.clone(),
                component: component.id.clone(),
                weight: component.weight,
            });
        }
        total_weight += component.weight;

        let points = component.contribution(&course.name)?;
        if component.pending {
            pending_weight += component.weight;
        } else if let Some(points) = points {
            achieved += points;
        }
    }

    if (total_weight - 100.0).abs() > policy.weight_tolerance {
        return Err(GradeError::InvalidWeight {
            course: course.name.clone(),
            total: total_weight,
        });
    }

    if let Some(highest) = course.class_highest {
        if !highest.is_finite() || highest <= 0.0 || highest > 100.0 {
            return Err(GradeError::InvalidClassHighest {
                course: course.name.clone(),
                value: highest,
            });
        }
    }

    if let Some(credits) = course.credits {
        if !credits.is_finite() || credits <= 0.0 {
            return Err(GradeError::InvalidCredits {
                course: course.name.clone(),
                credits,
            });
        }
    }

    Ok(WeightedScore {
        achieved,
        pending_weight,
        class_highest: course.class_highest,
    })
}

/// Grading table for a mode: the policy scale, or one built from cutoffs.
pub(crate) fn grade_table<'a>(
    mode: GradingMode,
    cutoffs: Option<&[Cutoff]>,
    policy: &'a GradingPolicy,
    course: &str,
) -> Result<Cow<'a, GradeScale>, GradeError> {
    match mode {
        GradingMode::Absolute => Ok(Cow::Borrowed(&policy.scale)),
        GradingMode::Relative => match cutoffs {
            Some(cutoffs) if !cutoffs.is_empty() => {
                GradeScale::from_cutoffs(cutoffs, &policy.scale).map(Cow::Owned)
            }
            _ => Err(GradeError::MissingCutoff(course.to_string())),
        },
    }
}

pub(crate) fn map_to_grade(table: &GradeScale, percent: f64) -> Result<GradeBand, GradeError> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(GradeError::InvalidPercent { percent });
    }
    table
        .lookup(percent)
        .cloned()
        .ok_or(GradeError::NoMatchingGrade { percent })
}
