use num_rational::Rational64;

use super::coefficients::{extract_linear, Polynomial};
use super::solution::{exact_integer, format_value, Solution};
use super::error::ComputationError;
use super::step::{OperationKind, SolutionStep, StepTrace};
use super::{negligible, verify, Problem, Solver, SolverResult};

/// Solves `a*x + b = 0`.
#[derive(Debug, Clone, Default)]
pub struct LinearSolver;

impl Solver for LinearSolver {
    fn name(&self) -> &'static str {
        "linear"
    }

    #[tracing::instrument(level = "debug", skip_all, fields(variable = problem.variable))]
    fn solve(&self, problem: &Problem, trace: &mut StepTrace) -> SolverResult<Vec<Solution>> {
        let (a, b) = extract_linear(problem.equation, problem.variable, &problem.evaluator())?;
        solve_linear(a, b, problem, trace)
    }
}

/// Case analysis on the coefficients of `a*x + b = 0`; shared with the
/// quadratic solver when its leading coefficient vanishes. A root that fails
/// verification is an error so that dispatch can try the next solver.
pub(crate) fn solve_linear(
    a: f64,
    b: f64,
    problem: &Problem,
    trace: &mut StepTrace,
) -> SolverResult<Vec<Solution>> {
    let a = if negligible(a, &[a, b]) { 0.0 } else { a };
    let b = if a == 0.0 && negligible(b, &[b]) { 0.0 } else { b };
    let variable = problem.variable;
    let precision = problem.config.precision;
    let form = Polynomial::monomial(a, 1)
        .add(&Polynomial::constant(b))
        .to_equation(variable, precision);

    trace.record(
        SolutionStep::new(OperationKind::Identify, "Identify the linear form a*x + b = 0")
            .before(problem.equation.to_string())
            .after(form.clone())
            .explanation(format!(
                "a = {}, b = {}",
                format_value(a, precision),
                format_value(b, precision)
            )),
    );

    if a == 0.0 {
        if b == 0.0 {
            trace.record(
                SolutionStep::new(OperationKind::Analyze, "Degenerate equation")
                    .before(form)
                    .after("0 = 0")
                    .explanation(format!("The equation holds for every value of {}", variable)),
            );
            return Ok(vec![Solution::symbolic(variable, "all real numbers", None)
                .with_condition(format!("{} ∈ ℝ", variable))]);
        }
        trace.record(
            SolutionStep::new(OperationKind::Analyze, "Contradiction")
                .before(form)
                .after(format!("{} = 0", format_value(b, precision)))
                .explanation(format!("No value of {} satisfies the equation", variable)),
        );
        return Ok(Vec::new());
    }

    let term = Polynomial::monomial(a, 1).to_expression(variable, precision);
    let isolated = format!("{} = {}", term, format_value(-b, precision));
    trace.record(
        SolutionStep::new(OperationKind::Isolate, "Move the constant term to the right side")
            .before(form)
            .after(isolated.clone())
            .explanation(format!("Subtract {} from both sides", format_value(b, precision))),
    );

    let solution = linear_root(a, b, problem);
    trace.record(
        SolutionStep::new(OperationKind::Divide, format!("Solve for {}", variable))
            .before(isolated)
            .after(format!("{} = {}", variable, solution.value))
            .explanation(format!("Divide both sides by {}", format_value(a, precision))),
    );

    if !verify(problem, &solution, trace) {
        return Err(ComputationError::VerificationFailed {
            variable: variable.to_string(),
            value: solution.value,
        }
        .into());
    }
    Ok(vec![solution])
}

fn linear_root(a: f64, b: f64, problem: &Problem) -> Solution {
    match (exact_integer(a), exact_integer(b)) {
        (Some(a), Some(b)) if problem.config.exact => {
            Solution::rational(problem.variable, Rational64::new(-b, a))
        }
        _ => Solution::approximate(problem.variable, -b / a, problem.config.precision),
    }
}
