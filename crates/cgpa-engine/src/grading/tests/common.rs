use crate::grading::{Component, Course, Cutoff, GradeEngine};

pub(crate) fn engine() -> GradeEngine {
    GradeEngine::standard()
}

pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// EC1 30 at 80%, EC2 40 at 80%, EC3 30 pending: 56% achieved.
pub(crate) fn course_with_pending_final() -> Course {
    Course::new(
        "Operating Systems",
        vec![
            Component::scored("EC1", 30.0, 80.0),
            Component::scored("EC2", 40.0, 80.0),
            Component::pending("EC3", 30.0),
        ],
    )
}

pub(crate) fn fully_scored(name: &str, ec1: f64, ec2: f64, ec3: f64) -> Course {
    Course::new(
        name,
        vec![
            Component::scored("EC1", 30.0, ec1),
            Component::scored("EC2", 30.0, ec2),
            Component::scored("EC3", 40.0, ec3),
        ],
    )
}

pub(crate) fn uniform_course(name: &str, percent: f64) -> Course {
    fully_scored(name, percent, percent, percent)
}

pub(crate) fn relative_cutoffs() -> Vec<Cutoff> {
    vec![
        Cutoff::new("A", 75.0),
        Cutoff::new("A-", 65.0),
        Cutoff::new("B", 55.0),
        Cutoff::new("B-", 45.0),
        Cutoff::new("C", 38.0),
        Cutoff::new("C-", 30.0),
        Cutoff::new("D", 20.0),
        Cutoff::new("E", 0.0),
    ]
}
