use super::error::GradeError;
use super::projection::ProjectionResult;
use serde::{Deserialize, Serialize};

/// Grading policy applied to a course total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradingMode {
    #[default]
    Absolute,
    Relative,
}

impl GradingMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Absolute => "Absolute",
            Self::Relative => "Relative",
        }
    }
}

/// How course points are combined into the term SGPA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SgpaWeighting {
    #[default]
    Unweighted,
    CreditWeighted,
}

impl SgpaWeighting {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unweighted => "Unweighted",
            Self::CreditWeighted => "Credit weighted",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "unweighted" | "equal" => Some(Self::Unweighted),
            "credit_weighted" | "credits" | "credit" => Some(Self::CreditWeighted),
            _ => None,
        }
    }
}

/// A single evaluation component (EC1, EC2, ...) of a course.
///
/// The score may be given either as a percentage (`score`) or as marks out of
/// the component weight (`marks`), never both. Pending components are excluded
/// from the achieved total whatever their score says.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<f64>,
    #[serde(default)]
    pub pending: bool,
}

impl Component {
    pub fn scored(id: impl Into<String>, weight: f64, score: f64) -> Self {
        Self {
            id: id.into(),
            weight,
            score: Some(score),
            marks: None,
            pending: false,
        }
    }

    pub fn with_marks(id: impl Into<String>, weight: f64, marks: f64) -> Self {
        Self {
            id: id.into(),
            weight,
            score: None,
            marks: Some(marks),
            pending: false,
        }
    }

    pub fn pending(id: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            weight,
            score: None,
            marks: None,
            pending: true,
        }
    }

    /// Points this component adds to the course total. Marks already count
    /// against the weight and are taken as-is.
    pub(crate) fn contribution(&self, course: &str) -> Result<Option<f64>, GradeError> {
        let invalid = |detail: String| GradeError::InvalidScore {
            course: course.to_string(),
            component: self.id.clone(),
            detail,
        };

        match (self.score, self.marks) {
            (Some(_), Some(_)) => Err(invalid("both score and marks supplied".to_string())),
            (Some(score), None) => {
                if score.is_finite() && (0.0..=100.0).contains(&score) {
                    Ok(Some(self.weight * score / 100.0))
                } else {
                    Err(invalid(format!("score {score} outside 0-100")))
                }
            }
            (None, Some(marks)) => {
                if !marks.is_finite() || marks < 0.0 || marks > self.weight {
                    return Err(invalid(format!(
                        "marks {marks} outside 0-{}",
                        self.weight
                    )));
                }
                Ok(Some(marks))
            }
            (None, None) => Ok(None),
        }
    }
}

/// Externally supplied relative-grading threshold for one grade letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cutoff {
    pub grade: String,
    pub min_percent: f64,
}

impl Cutoff {
    pub fn new(grade: impl Into<String>, min_percent: f64) -> Self {
        Self {
            grade: grade.into(),
            min_percent,
        }
    }
}

/// Course definition as entered by the student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading_mode: Option<GradingMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_cutoffs: Option<Vec<Cutoff>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
    /// Highest course total in the class; totals are rescaled against it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_highest: Option<f64>,
}

impl Course {
    pub fn new(name: impl Into<String>, components: Vec<Component>) -> Self {
        Self {
            name: name.into(),
            components,
            grading_mode: None,
            relative_cutoffs: None,
            credits: None,
            class_highest: None,
        }
    }

    pub fn with_mode(mut self, mode: GradingMode) -> Self {
        self.grading_mode = Some(mode);
        self
    }

    pub fn with_cutoffs(mut self, cutoffs: Vec<Cutoff>) -> Self {
        self.relative_cutoffs = Some(cutoffs);
        self
    }

    pub fn with_credits(mut self, credits: f64) -> Self {
        self.credits = Some(credits);
        self
    }

    pub fn with_class_highest(mut self, class_highest: f64) -> Self {
        self.class_highest = Some(class_highest);
        self
    }

    pub fn effective_mode(&self, default_mode: GradingMode) -> GradingMode {
        self.grading_mode.unwrap_or(default_mode)
    }

    pub fn pending_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|component| component.pending)
    }
}

/// SGPA of a completed term, supplied by the caller for CGPA computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRecord {
    pub label: String,
    pub sgpa: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
}

impl TermRecord {
    pub fn new(label: impl Into<String>, sgpa: f64) -> Self {
        Self {
            label: label.into(),
            sgpa,
            credits: None,
        }
    }

    pub fn with_credits(mut self, credits: f64) -> Self {
        self.credits = Some(credits);
        self
    }
}

/// Graded outcome for a single course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResult {
    pub name: String,
    pub mode: GradingMode,
    pub weighted_percent: f64,
    pub grade: String,
    pub point: u8,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
    pub pending_weight: f64,
}

/// Term aggregate over the evaluated courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub courses: Vec<CourseResult>,
    pub sgpa: f64,
    pub cgpa: f64,
    pub overall_passed: bool,
    pub sgpa_weighting: SgpaWeighting,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_credits: Option<f64>,
}

/// Names the course to project and the grade point to reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub course: String,
    pub target_point: u8,
}

/// Everything the presentation layer sends for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub courses: Vec<Course>,
    #[serde(default)]
    pub default_mode: GradingMode,
    #[serde(default)]
    pub prior_terms: Vec<TermRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sgpa_weighting: Option<SgpaWeighting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<ProjectionRequest>,
}

impl EvaluationRequest {
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            courses,
            default_mode: GradingMode::Absolute,
            prior_terms: Vec::new(),
            sgpa_weighting: None,
            projection: None,
        }
    }
}

/// Evaluation output with the optional projection attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    #[serde(flatten)]
    pub result: EvaluationResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<ProjectionResult>,
}
