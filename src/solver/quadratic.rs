use num_integer::Roots;
use num_rational::Rational64;

use super::coefficients::{extract_quadratic, Polynomial};
use super::error::ComputationError;
use super::linear::solve_linear;
use super::solution::{exact_integer, format_value, Solution};
use super::step::{OperationKind, SolutionStep, StepTrace};
use super::{negligible, verify, Problem, Solver, SolverResult};

/// Solves `a*x^2 + b*x + c = 0` by discriminant case analysis.
#[derive(Debug, Clone, Default)]
pub struct QuadraticSolver;

impl Solver for QuadraticSolver {
    fn name(&self) -> &'static str {
        "quadratic"
    }

    #[tracing::instrument(level = "debug", skip_all, fields(variable = problem.variable))]
    fn solve(&self, problem: &Problem, trace: &mut StepTrace) -> SolverResult<Vec<Solution>> {
        let (a, b, c) = extract_quadratic(problem.equation, problem.variable, &problem.evaluator())?;
        let a = if negligible(a, &[a, b, c]) { 0.0 } else { a };
        let variable = problem.variable;
        let precision = problem.config.precision;
        let fmt = |v: f64| format_value(v, precision);
        let form = Polynomial::monomial(a, 2)
            .add(&Polynomial::monomial(b, 1))
            .add(&Polynomial::constant(c))
            .to_equation(variable, precision);

        trace.record(
            SolutionStep::new(
                OperationKind::Identify,
                "Identify the quadratic form a*x^2 + b*x + c = 0",
            )
            .before(problem.equation.to_string())
            .after(form.clone())
            .explanation(format!("a = {}, b = {}, c = {}", fmt(a), fmt(b), fmt(c))),
        );

        if a == 0.0 {
            let reduced = Polynomial::monomial(b, 1)
                .add(&Polynomial::constant(c))
                .to_equation(variable, precision);
            trace.record(
                SolutionStep::new(OperationKind::Simplify, "Reduce to a linear equation")
                    .before(form)
                    .after(reduced)
                    .explanation("The leading coefficient a is 0"),
            );
            return solve_linear(b, c, problem, trace);
        }

        let exact = integer_coefficients(a, b, c).filter(|_| problem.config.exact);
        let discriminant = match exact {
            Some((a, b, c)) => (b * b - 4 * a * c) as f64,
            None => {
                let d = b * b - 4.0 * a * c;
                if negligible(d, &[b * b, 4.0 * a * c]) {
                    0.0
                } else {
                    d
                }
            }
        };
        trace.record(
            SolutionStep::new(OperationKind::Discriminant, "Compute the discriminant")
                .before("D = b^2 - 4*a*c")
                .after(format!("D = {}", fmt(discriminant)))
                .explanation(format!("D = ({})^2 - 4*({})*({})", fmt(b), fmt(a), fmt(c))),
        );

        let (description, explanation) = if discriminant < 0.0 {
            ("D < 0", "No real roots: the square root of D is not real")
        } else if discriminant == 0.0 {
            ("D = 0", "One repeated real root")
        } else {
            ("D > 0", "Two distinct real roots")
        };
        trace.record(
            SolutionStep::new(OperationKind::Analyze, format!("Analyze the discriminant: {}", description))
                .before(format!("D = {}", fmt(discriminant)))
                .after(description)
                .explanation(explanation),
        );

        let solutions = if discriminant < 0.0 {
            Vec::new()
        } else if discriminant == 0.0 {
            let root = match exact {
                Some((a, b, _)) => rational(-b, 2 * a).map(|r| Solution::rational(variable, r)),
                None => None,
            }
            .unwrap_or_else(|| Solution::approximate(variable, -b / (2.0 * a), precision));
            vec![root.with_multiplicity(2)]
        } else {
            distinct_roots(a, b, discriminant, exact, problem)
        };

        let after = if solutions.is_empty() {
            "no real solutions".to_string()
        } else {
            solutions
                .iter()
                .map(|s| format!("{} = {}", variable, s.value))
                .collect::<Vec<_>>()
                .join(", ")
        };
        trace.record(
            SolutionStep::new(OperationKind::Formula, "Apply the quadratic formula")
                .before(format!("{} = (-b ± √D) / (2*a)", variable))
                .after(after)
                .explanation(format!(
                    "{} = (-({}) ± √{}) / (2*{})",
                    variable,
                    fmt(b),
                    fmt(discriminant),
                    fmt(a)
                )),
        );

        let candidates = solutions.len();
        let mut rejected = None;
        let verified: Vec<Solution> = solutions
            .into_iter()
            .filter_map(|solution| {
                if verify(problem, &solution, trace) {
                    Some(solution)
                } else {
                    tracing::debug!(value = %solution.value, "root dropped after verification");
                    rejected = Some(solution.value);
                    None
                }
            })
            .collect();
        match rejected {
            Some(value) if verified.is_empty() && candidates > 0 => {
                Err(ComputationError::VerificationFailed {
                    variable: variable.to_string(),
                    value,
                }
                .into())
            }
            _ => Ok(verified),
        }
    }
}

fn integer_coefficients(a: f64, b: f64, c: f64) -> Option<(i128, i128, i128)> {
    Some((
        exact_integer(a)? as i128,
        exact_integer(b)? as i128,
        exact_integer(c)? as i128,
    ))
}

fn rational(numer: i128, denom: i128) -> Option<Rational64> {
    Some(Rational64::new(
        i64::try_from(numer).ok()?,
        i64::try_from(denom).ok()?,
    ))
}

/// `(-b + √D) / 2a` then `(-b - √D) / 2a`; exact when D is a perfect square.
fn distinct_roots(
    a: f64,
    b: f64,
    discriminant: f64,
    exact: Option<(i128, i128, i128)>,
    problem: &Problem,
) -> Vec<Solution> {
    let variable = problem.variable;
    if let Some((ia, ib, ic)) = exact {
        let d = ib * ib - 4 * ia * ic;
        let root = d.sqrt();
        if root * root == d {
            if let (Some(plus), Some(minus)) = (rational(-ib + root, 2 * ia), rational(-ib - root, 2 * ia)) {
                return vec![Solution::rational(variable, plus), Solution::rational(variable, minus)];
            }
        }
    }
    let sqrt_d = discriminant.sqrt();
    [(-b + sqrt_d) / (2.0 * a), (-b - sqrt_d) / (2.0 * a)]
        .into_iter()
        .map(|x| Solution::approximate(variable, x, problem.config.precision))
        .collect()
}
