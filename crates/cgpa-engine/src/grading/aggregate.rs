use super::domain::{CourseResult, EvaluationResult, SgpaWeighting, TermRecord};
use super::error::GradeError;
use super::policy::GradingPolicy;

const MAX_GRADE_POINT: f64 = 10.0;

struct TermWeight {
    sgpa: f64,
    credits: Option<f64>,
}

pub(crate) fn aggregate(
    results: &[CourseResult],
    prior_terms: &[TermRecord],
    weighting: SgpaWeighting,
    policy: &GradingPolicy,
) -> Result<EvaluationResult, GradeError> {
    for term in prior_terms {
        validate_term(term)?;
    }

    let (sgpa, total_credits) = term_sgpa(results, weighting)?;

    let mut terms: Vec<TermWeight> = prior_terms
        .iter()
        .map(|term| TermWeight {
            sgpa: term.sgpa,
            credits: term.credits,
        })
        .collect();
    if !results.is_empty() {
        terms.push(TermWeight {
            sgpa,
            credits: total_credits,
        });
    }

    let cgpa = cumulative(&terms);
    let all_passed = results.iter().all(|result| result.passed);

    Ok(EvaluationResult {
        courses: results.to_vec(),
        sgpa,
        cgpa,
        overall_passed: policy.overall_passed(cgpa, all_passed),
        sgpa_weighting: weighting,
        total_credits,
    })
}

fn term_sgpa(
    results: &[CourseResult],
    weighting: SgpaWeighting,
) -> Result<(f64, Option<f64>), GradeError> {
    match weighting {
        SgpaWeighting::Unweighted => {
            if results.is_empty() {
                return Ok((0.0, None));
            }
            let total: f64 = results.iter().map(|result| f64::from(result.point)).sum();
            Ok((total / results.len() as f64, None))
        }
        SgpaWeighting::CreditWeighted => {
            let mut weighted_points = 0.0;
            let mut credits_total = 0.0;
            for result in results {
                let credits = result.credits.ok_or_else(|| GradeError::MissingCredits {
                    course: result.name.clone(),
                })?;
                weighted_points += f64::from(result.point) * credits;
                credits_total += credits;
            }
            if credits_total > 0.0 {
                Ok((weighted_points / credits_total, Some(credits_total)))
            } else {
                Ok((0.0, Some(0.0)))
            }
        }
    }
}

/// Terms weigh by credits only when every term carries them.
fn cumulative(terms: &[TermWeight]) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }

    let by_credits = terms.iter().all(|term| term.credits.is_some());
    let (weighted, total_weight) = terms.iter().fold((0.0, 0.0), |(sum, weight), term| {
        let term_weight = if by_credits {
            term.credits.unwrap_or(1.0)
        } else {
            1.0
        };
        (sum + term.sgpa * term_weight, weight + term_weight)
    });

    if total_weight > 0.0 {
        weighted / total_weight
    } else {
        0.0
    }
}

fn validate_term(term: &TermRecord) -> Result<(), GradeError> {
    if !term.sgpa.is_finite() || !(0.0..=MAX_GRADE_POINT).contains(&term.sgpa) {
        return Err(GradeError::InvalidTerm {
            label: term.label.clone(),
            detail: format!("SGPA {} outside 0-10", term.sgpa),
        });
    }
    if let Some(credits) = term.credits {
        if !credits.is_finite() || credits <= 0.0 {
            return Err(GradeError::InvalidTerm {
                label: term.label.clone(),
                detail: format!("credits {credits} must be positive"),
            });
        }
    }
    Ok(())
}
