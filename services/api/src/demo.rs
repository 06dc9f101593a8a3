use crate::infra::{build_engine, read_json_file};
use cgpa_engine::config::AppConfig;
use cgpa_engine::error::AppError;
use cgpa_engine::grading::{
    Component, Course, EvaluationOutcome, EvaluationRequest, GradingMode, ProjectionRequest,
    ProjectionResult, SgpaWeighting, TermRecord,
};
use cgpa_engine::report::{write_csv, EvaluationReport};
use chrono::{DateTime, Local};
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_EC_WEIGHTS: [(&str, f64); 3] = [("EC1", 30.0), ("EC2", 30.0), ("EC3", 40.0)];

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding the evaluation request
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Also write the results as CSV to this path
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Grading mode for courses that do not set one (absolute or relative)
    #[arg(long, value_parser = crate::infra::parse_mode)]
    pub(crate) default_mode: Option<GradingMode>,
    /// Weight SGPA by course credits
    #[arg(long)]
    pub(crate) credit_weighted: bool,
    /// Print the raw JSON outcome instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ProjectArgs {
    /// JSON file holding a single course with pending components
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Grade point to reach (10, 9, 8, 7, 6, 5, 4 or 2)
    #[arg(long)]
    pub(crate) target_point: u8,
    /// Grading mode when the course does not set one
    #[arg(long, value_parser = crate::infra::parse_mode)]
    pub(crate) mode: Option<GradingMode>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Write the demo results as CSV to this path
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Grade point targeted for the course with a pending final
    #[arg(long, default_value_t = 8)]
    pub(crate) target_point: u8,
    /// Weight SGPA by course credits, as the unit-based calculator does
    #[arg(long)]
    pub(crate) credit_weighted: bool,
}

pub(crate) fn run_evaluate(config: &AppConfig, args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        input,
        csv,
        default_mode,
        credit_weighted,
        json,
    } = args;

    let mut request: EvaluationRequest = read_json_file(&input)?;
    if let Some(mode) = default_mode {
        request.default_mode = mode;
    }
    if credit_weighted {
        request.sgpa_weighting = Some(SgpaWeighting::CreditWeighted);
    }

    let engine = build_engine(config);
    let outcome = engine.evaluate(&request)?;
    info!(
        input = %input.display(),
        courses = outcome.result.courses.len(),
        "evaluated request file"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render_evaluation(&outcome, Local::now());
    }

    if let Some(path) = csv {
        export_csv(&outcome, &path)?;
    }

    Ok(())
}

pub(crate) fn run_project(config: &AppConfig, args: ProjectArgs) -> Result<(), AppError> {
    let ProjectArgs {
        input,
        target_point,
        mode,
    } = args;

    let course: Course = read_json_file(&input)?;
    let engine = build_engine(config);
    let projection = engine.project(&course, target_point, mode.unwrap_or_default())?;
    render_projection(&projection);
    Ok(())
}

pub(crate) fn run_demo(config: &AppConfig, args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        csv,
        target_point,
        credit_weighted,
    } = args;

    let mut request = demo_request(target_point);
    if credit_weighted {
        request.sgpa_weighting = Some(SgpaWeighting::CreditWeighted);
    }

    println!("CGPA calculator demo");
    println!(
        "Weights -> {}",
        DEFAULT_EC_WEIGHTS
            .iter()
            .map(|(id, weight)| format!("{id}: {weight}%"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let engine = build_engine(config);
    let outcome = engine.evaluate(&request)?;
    render_evaluation(&outcome, Local::now());

    if let Some(path) = csv {
        export_csv(&outcome, &path)?;
    }

    Ok(())
}

fn export_csv(outcome: &EvaluationOutcome, path: &Path) -> Result<(), AppError> {
    let file = File::create(path)?;
    write_csv(&outcome.result, BufWriter::new(file))?;
    println!("\nCSV written to {}", path.display());
    Ok(())
}

/// Four-course term: three graded, one with the final still pending.
fn demo_request(target_point: u8) -> EvaluationRequest {
    let course = |name: &str, units: f64, marks: [Option<f64>; 3]| {
        let components = DEFAULT_EC_WEIGHTS
            .iter()
            .zip(marks)
            .map(|((id, weight), marks)| match marks {
                Some(marks) => Component::with_marks(*id, *weight, marks),
                None => Component::pending(*id, *weight),
            })
            .collect();
        Course::new(name, components).with_credits(units)
    };

    let mut request = EvaluationRequest::new(vec![
        course("Data Structures", 4.0, [Some(26.5), Some(24.0), Some(35.0)]),
        course("Probability & Statistics", 5.0, [Some(21.0), Some(19.5), Some(27.0)]),
        course("Digital Design", 4.0, [Some(18.0), Some(16.0), Some(22.5)]),
        course("Microeconomics", 4.0, [Some(22.0), Some(20.0), None]),
    ]);
    request.prior_terms = vec![TermRecord::new("Term 1", 7.4)];
    request.projection = Some(ProjectionRequest {
        course: "Microeconomics".to_string(),
        target_point,
    });
    request
}

pub(crate) fn render_evaluation(outcome: &EvaluationOutcome, generated_at: DateTime<Local>) {
    let report = EvaluationReport::from_result(&outcome.result);

    println!("\nResults (generated {})", generated_at.format("%Y-%m-%d %H:%M"));
    println!(
        "{:<28} {:>5} {:>9} {:>5} {:>3}  Result",
        "Course", "Units", "Total (%)", "Grade", "GP"
    );
    for row in &report.rows {
        let units = row
            .credits
            .map(|credits| format!("{credits}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:>5} {:>9.2} {:>5} {:>3}  {}",
            row.name, units, row.weighted_percent, row.grade, row.point, row.status_label
        );
    }

    let summary = &report.summary;
    println!(
        "\nSGPA ({}): {:.2}",
        summary.sgpa_weighting_label, summary.sgpa
    );
    println!(
        "Weighted CGPA: {:.2} - {}",
        summary.cgpa, summary.status_label
    );

    let failed: Vec<&str> = report.failed_courses().map(|row| row.name.as_str()).collect();
    if !failed.is_empty() {
        println!("Courses below the pass point: {}", failed.join(", "));
    }

    if let Some(projection) = &outcome.projection {
        println!();
        render_projection(projection);
    }
}

pub(crate) fn render_projection(projection: &ProjectionResult) {
    println!("Projection for {}", projection.course);
    println!(
        "- achieved {:.2}% with {:.0}% of the weight still pending",
        projection.achieved_percent, projection.pending_weight
    );
    println!("- {}", projection.summary());
    if projection.unreachable || projection.already_achieved {
        return;
    }
    for requirement in &projection.requirements {
        println!(
            "  - {}: {:.2}% ({:.2} of {} marks)",
            requirement.id, requirement.required_score, requirement.required_marks, requirement.weight
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgpa_engine::config::{AppEnvironment, GradingConfig, ServerConfig, TelemetryConfig};
    use cgpa_engine::grading::{GradeEngine, GradeError, GradingPolicy};
    use tempfile::tempdir;

    fn test_config() -> AppConfig {
        let policy = GradingPolicy::standard();
        AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            telemetry: TelemetryConfig {
                log_level: "warn".to_string(),
            },
            grading: GradingConfig {
                course_pass_point: policy.course_pass_point,
                overall_pass_cgpa: policy.overall_pass_cgpa,
                weight_tolerance: policy.weight_tolerance,
                sgpa_weighting: policy.sgpa_weighting,
            },
        }
    }

    #[test]
    fn evaluate_command_writes_csv_from_a_request_file() {
        let dir = tempdir().expect("temp dir");
        let input = dir.path().join("term.json");
        let output = dir.path().join("grades.csv");
        std::fs::write(
            &input,
            serde_json::to_vec(&demo_request(8)).expect("request encodes"),
        )
        .expect("request written");

        run_evaluate(
            &test_config(),
            EvaluateArgs {
                input,
                csv: Some(output.clone()),
                default_mode: None,
                credit_weighted: true,
                json: false,
            },
        )
        .expect("evaluation succeeds");

        let text = std::fs::read_to_string(&output).expect("csv written");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("name,credits,weighted_percent,grade,point,passed")
        );
        assert!(text.contains("Data Structures,4.0,85.50,A-,9,true"));
        assert!(text.contains("sgpa,cgpa,overall_passed"));
    }

    #[test]
    fn project_command_reads_a_single_course() {
        let dir = tempdir().expect("temp dir");
        let input = dir.path().join("course.json");
        let course = demo_request(8)
            .courses
            .into_iter()
            .find(|course| course.name == "Microeconomics")
            .expect("demo has a pending course");
        std::fs::write(&input, serde_json::to_vec(&course).expect("course encodes"))
            .expect("course written");

        run_project(
            &test_config(),
            ProjectArgs {
                input: input.clone(),
                target_point: 8,
                mode: None,
            },
        )
        .expect("projection succeeds");

        let err = run_project(
            &test_config(),
            ProjectArgs {
                input,
                target_point: 3,
                mode: None,
            },
        )
        .expect_err("3 is not a grade point");
        assert!(matches!(
            err,
            AppError::Grading(GradeError::UnknownGradeTarget { point: 3 })
        ));
    }

    #[test]
    fn demo_request_grades_cleanly() {
        let outcome = GradeEngine::standard()
            .evaluate(&demo_request(8))
            .expect("demo data is valid");

        assert_eq!(outcome.result.courses.len(), 4);
        assert!(outcome.result.courses.iter().all(|course| course.credits.is_some()));
        let projection = outcome.projection.expect("demo projects the pending course");
        assert_eq!(projection.course, "Microeconomics");
        assert_eq!(projection.target_grade, "B");
    }

    #[test]
    fn demo_request_supports_credit_weighting() {
        let mut request = demo_request(10);
        request.sgpa_weighting = Some(SgpaWeighting::CreditWeighted);

        let outcome = GradeEngine::standard()
            .evaluate(&request)
            .expect("demo data is valid");

        assert_eq!(outcome.result.total_credits, Some(17.0));
        assert!(outcome.projection.expect("projection").unreachable);
    }
}
