/// Failures raised while grading, aggregating, or projecting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GradeError {
    #[error("weights for course '{course}' sum to {total:.2}, expected 100")]
    InvalidWeight { course: String, total: f64 },
    #[error("component '{component}' of course '{course}' has weight {weight}, expected 0-100")]
    WeightOutOfRange {
        course: String,
        component: String,
        weight: f64,
    },
    #[error("component '{component}' of course '{course}' has an invalid score: {detail}")]
    InvalidScore {
        course: String,
        component: String,
        detail: String,
    },
    #[error("course '{course}' lists component '{component}' more than once")]
    DuplicateComponent { course: String, component: String },
    #[error("class highest for course '{course}' must be within (0, 100], got {value}")]
    InvalidClassHighest { course: String, value: f64 },
    #[error("course '{course}' has invalid credits {credits}")]
    InvalidCredits { course: String, credits: f64 },
    #[error("course '{course}' has no credits but SGPA is credit weighted")]
    MissingCredits { course: String },
    #[error("term '{label}' is invalid: {detail}")]
    InvalidTerm { label: String, detail: String },
    #[error("no course named '{0}' in the request")]
    UnknownCourse(String),
    #[error("course '{0}' has no pending components to project")]
    NoPendingComponents(String),
    #[error("percent {percent} is not a course total within 0-100")]
    InvalidPercent { percent: f64 },
    #[error("no grade matches {percent:.2}% in the grading table")]
    NoMatchingGrade { percent: f64 },
    #[error("grade point {point} is not on the grading table")]
    UnknownGradeTarget { point: u8 },
    #[error("cutoff grade '{grade}' is not on the grade scale")]
    UnknownCutoffGrade { grade: String },
    #[error("cutoff for grade '{grade}' has invalid threshold {min_percent}")]
    InvalidCutoff { grade: String, min_percent: f64 },
    #[error("course '{0}' uses relative grading but has no cutoff table")]
    MissingCutoff(String),
}

impl GradeError {
    /// Stable identifier for API payloads.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidWeight { .. } | Self::WeightOutOfRange { .. } => "invalid_weight",
            Self::InvalidScore { .. } => "invalid_score",
            Self::DuplicateComponent { .. } => "duplicate_component",
            Self::InvalidClassHighest { .. } => "invalid_class_highest",
            Self::InvalidCredits { .. } => "invalid_credits",
            Self::MissingCredits { .. } => "missing_credits",
            Self::InvalidTerm { .. } => "invalid_term",
            Self::UnknownCourse(_) => "unknown_course",
            Self::NoPendingComponents(_) => "no_pending_components",
            Self::InvalidPercent { .. } => "invalid_percent",
            Self::NoMatchingGrade { .. } => "no_matching_grade",
            Self::UnknownGradeTarget { .. } => "unknown_grade_target",
            Self::UnknownCutoffGrade { .. } | Self::InvalidCutoff { .. } => "invalid_cutoff",
            Self::MissingCutoff(_) => "missing_cutoff",
        }
    }

    /// Malformed grade tables, as opposed to correctable user input.
    pub const fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            Self::NoMatchingGrade { .. }
                | Self::UnknownGradeTarget { .. }
                | Self::UnknownCutoffGrade { .. }
                | Self::InvalidCutoff { .. }
                | Self::MissingCutoff(_)
        )
    }
}
