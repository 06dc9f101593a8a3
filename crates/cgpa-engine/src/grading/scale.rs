use super::domain::Cutoff;
use super::error::GradeError;
use serde::{Deserialize, Serialize};

const STANDARD_BANDS: [(&str, u8, f64); 8] = [
    ("A", 10, 90.0),
    ("A-", 9, 80.0),
    ("B", 8, 70.0),
    ("B-", 7, 60.0),
    ("C", 6, 50.0),
    ("C-", 5, 45.0),
    ("D", 4, 35.0),
    ("E", 2, 0.0),
];

/// One row of a grading table: inclusive lower bound, letter, and point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub grade: String,
    pub point: u8,
    pub min_percent: f64,
}

/// Ordered grading table, highest threshold first.
///
/// Absolute grading uses the standard table; relative grading builds a table
/// from the course's cutoffs so both modes share [`GradeScale::lookup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeScale {
    bands: Vec<GradeBand>,
}

impl GradeScale {
    pub fn standard() -> Self {
        let bands = STANDARD_BANDS
            .iter()
            .map(|(grade, point, min_percent)| GradeBand {
                grade: (*grade).to_string(),
                point: *point,
                min_percent: *min_percent,
            })
            .collect();
        Self::new(bands)
    }

    pub fn new(mut bands: Vec<GradeBand>) -> Self {
        bands.sort_by(|a, b| b.min_percent.total_cmp(&a.min_percent));
        Self { bands }
    }

    /// Builds a relative table, resolving each cutoff letter's point from `reference`.
    pub fn from_cutoffs(cutoffs: &[Cutoff], reference: &GradeScale) -> Result<Self, GradeError> {
        let bands = cutoffs
            .iter()
            .map(|cutoff| {
                if !cutoff.min_percent.is_finite() {
                    return Err(GradeError::InvalidCutoff {
                        grade: cutoff.grade.clone(),
                        min_percent: cutoff.min_percent,
                    });
                }
                let point = reference.point_for(&cutoff.grade).ok_or_else(|| {
                    GradeError::UnknownCutoffGrade {
                        grade: cutoff.grade.clone(),
                    }
                })?;
                Ok(GradeBand {
                    grade: cutoff.grade.trim().to_string(),
                    point,
                    min_percent: cutoff.min_percent,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(bands))
    }

    pub fn bands(&self) -> &[GradeBand] {
        &self.bands
    }

    /// First band whose threshold the percent reaches, scanning highest first.
    pub fn lookup(&self, percent: f64) -> Option<&GradeBand> {
        self.bands.iter().find(|band| percent >= band.min_percent)
    }

    pub fn point_for(&self, grade: &str) -> Option<u8> {
        let grade = grade.trim();
        self.bands
            .iter()
            .find(|band| band.grade.eq_ignore_ascii_case(grade))
            .map(|band| band.point)
    }

    /// Lowest threshold that still earns `point`.
    pub fn threshold_for_point(&self, point: u8) -> Option<&GradeBand> {
        self.bands.iter().rev().find(|band| band.point == point)
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_scale_is_ordered_highest_first() {
        let scale = GradeScale::standard();
        let points: Vec<u8> = scale.bands().iter().map(|band| band.point).collect();
        assert_eq!(points, vec![10, 9, 8, 7, 6, 5, 4, 2]);
    }

    #[test]
    fn lookup_uses_inclusive_lower_bounds() {
        let scale = GradeScale::standard();
        assert_eq!(scale.lookup(90.0).map(|band| band.point), Some(10));
        assert_eq!(scale.lookup(89.999).map(|band| band.point), Some(9));
        assert_eq!(scale.lookup(45.0).map(|band| band.grade.as_str()), Some("C-"));
        assert_eq!(scale.lookup(34.999).map(|band| band.point), Some(2));
        assert_eq!(scale.lookup(0.0).map(|band| band.point), Some(2));
    }

    #[test]
    fn threshold_for_point_returns_smallest_minimum() {
        let scale = GradeScale::new(vec![
            GradeBand {
                grade: "B".to_string(),
                point: 8,
                min_percent: 72.0,
            },
            GradeBand {
                grade: "B".to_string(),
                point: 8,
                min_percent: 68.0,
            },
        ]);
        let band = scale.threshold_for_point(8).expect("band present");
        assert_eq!(band.min_percent, 68.0);
        assert!(scale.threshold_for_point(3).is_none());
    }

    #[test]
    fn cutoff_letters_resolve_points_case_insensitively() {
        let reference = GradeScale::standard();
        let scale = GradeScale::from_cutoffs(
            &[Cutoff::new("e", 0.0), Cutoff::new("a", 78.0), Cutoff::new("B", 55.0)],
            &reference,
        )
        .expect("cutoffs resolve");

        let grades: Vec<(&str, u8)> = scale
            .bands()
            .iter()
            .map(|band| (band.grade.as_str(), band.point))
            .collect();
        assert_eq!(grades, vec![("a", 10), ("B", 8), ("e", 2)]);
    }

    #[test]
    fn unknown_cutoff_letter_is_rejected() {
        let err = GradeScale::from_cutoffs(&[Cutoff::new("F", 0.0)], &GradeScale::standard())
            .expect_err("F is not on the scale");
        assert_eq!(
            err,
            GradeError::UnknownCutoffGrade {
                grade: "F".to_string()
            }
        );
    }
}
