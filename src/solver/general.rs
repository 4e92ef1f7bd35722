use std::f64::consts::TAU;

use super::backend::{BackendChain, SymbolicBackend};
use super::coefficients::normalize;
use super::domain::restrictions;
use super::error::{BackendError, ComputationError, SolverResult};
use super::numeric::RootFinder;
use super::solution::{format_value, Solution};
use super::step::{OperationKind, SolutionStep, StepTrace};
use super::{verify, Problem, Solver};
use crate::analyzer::AstBuilder;
use crate::classifier::EquationType;
use crate::eval::Evaluator;
use crate::rewrite::simplify;
use crate::tokenizer::Tokenizer;

/// Handles every equation without a closed-form solver: symbolic backends
/// first, then numeric root finding.
#[derive(Debug, Clone, Default)]
pub struct GeneralSolver {
    backends: BackendChain,
}

impl GeneralSolver {
    pub fn new(backends: BackendChain) -> Self {
        Self { backends }
    }

    pub fn backends(&self) -> &BackendChain {
        &self.backends
    }

    pub fn backends_mut(&mut self) -> &mut BackendChain {
        &mut self.backends
    }

    fn solve_with_backend(
        &self,
        backend: &dyn SymbolicBackend,
        problem: &Problem,
    ) -> Result<Vec<Solution>, BackendError> {
        let values = backend.solve(&problem.equation.to_string(), problem.variable)?;
        let mut evaluator = problem.evaluator();
        let solutions: Vec<Solution> = values
            .into_iter()
            .filter_map(|value| {
                let approximation = evaluate_text(&value, problem)?;
                evaluator.bind(problem.variable, approximation);
                let residual = evaluator.residual(problem.equation).ok()?;
                (residual.abs() <= super::VERIFY_TOLERANCE)
                    .then(|| Solution::symbolic(problem.variable, value, Some(approximation)))
            })
            .collect();
        if solutions.is_empty() {
            return Err(BackendError::InvalidResult(
                "no returned value satisfies the equation".to_string(),
            ));
        }
        Ok(solutions)
    }

    fn solve_numerically(&self, problem: &Problem, trace: &mut StepTrace) -> SolverResult<Vec<Solution>> {
        let numeric = &problem.config.numeric;
        let (mut min, mut max) = (numeric.search_min, numeric.search_max);
        let mut periodic = false;
        let mut roots = Vec::new();

        if problem.equation_type == EquationType::Trigonometric {
            let candidates: Vec<f64> = search(problem, 0.0, TAU)
                .into_iter()
                .filter(|x| *x < TAU - 1e-9)
                .collect();
            periodic = !candidates.is_empty() && candidates.iter().all(|x| repeats_after(problem, *x, TAU));
            trace.record(
                SolutionStep::new(OperationKind::Analyze, "Check for period 2π")
                    .before(problem.equation.to_string())
                    .after(if periodic {
                        "search [0, 2π) and repeat every 2π".to_string()
                    } else {
                        format!("search [{}, {}] without periodicity", min, max)
                    })
                    .explanation("Every root in [0, 2π) must also solve the equation at x ± 2π"),
            );
            if periodic {
                (min, max) = (0.0, TAU);
                roots = candidates;
            }
        }
        if !periodic {
            roots = search(problem, min, max);
        }

        trace.record(
            SolutionStep::new(
                OperationKind::Numeric,
                format!("Search [{}, {}] for sign changes and refine with Newton-Raphson", min, max),
            )
            .before(problem.equation.to_string())
            .after(if roots.is_empty() {
                "no roots found".to_string()
            } else {
                roots
                    .iter()
                    .map(|x| format!("{} ≈ {}", problem.variable, format_value(*x, problem.config.precision)))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .explanation(format!(
                "{} samples, tolerance {:e}, at most {} iterations per root",
                numeric.samples, numeric.tolerance, numeric.max_iterations
            )),
        );

        let solutions: Vec<Solution> = roots
            .into_iter()
            .map(|x| {
                let solution = Solution::approximate(problem.variable, x, problem.config.precision);
                if periodic {
                    let condition = format!("{} = {} + 2πn, n ∈ ℤ", problem.variable, solution.value);
                    solution.with_condition(condition)
                } else {
                    solution
                }
            })
            .filter(|solution| verify(problem, solution, trace))
            .collect();

        if solutions.is_empty() {
            return Err(ComputationError::NoSolutionFound {
                variable: problem.variable.to_string(),
                min,
                max,
            }
            .into());
        }
        Ok(solutions)
    }
}

impl Solver for GeneralSolver {
    fn name(&self) -> &'static str {
        "general"
    }

    #[tracing::instrument(level = "debug", skip_all, fields(variable = problem.variable))]
    fn solve(&self, problem: &Problem, trace: &mut StepTrace) -> SolverResult<Vec<Solution>> {
        match problem.equation_type {
            EquationType::Differential => {
                return Err(ComputationError::Unsupported("differential equations".into()).into())
            }
            EquationType::System => {
                return Err(ComputationError::Unsupported("systems of equations".into()).into())
            }
            _ => {}
        }

        trace.record(
            SolutionStep::new(
                OperationKind::Identify,
                format!("Identify a {} equation in {}", problem.equation_type, problem.variable),
            )
            .before(problem.equation.to_string())
            .after(format!("{} = 0", simplify(&normalize(problem.equation))))
            .explanation("No closed-form method applies; look for the zeros of lhs - rhs"),
        );

        let domain = restrictions(problem.equation, problem.variable);
        if !domain.is_empty() {
            trace.record(
                SolutionStep::new(OperationKind::Domain, "Determine the domain")
                    .before(problem.equation.to_string())
                    .after(domain.join(", "))
                    .explanation("Values outside the domain are discarded"),
            );
        }

        for backend in self.backends.iter() {
            match self.solve_with_backend(backend.as_ref(), problem) {
                Ok(solutions) => {
                    trace.record(
                        SolutionStep::new(OperationKind::Backend, format!("Solve with {}", backend.name()))
                            .before(problem.equation.to_string())
                            .after(
                                solutions
                                    .iter()
                                    .map(|s| format!("{} = {}", s.variable, s.value))
                                    .collect::<Vec<_>>()
                                    .join(", "),
                            ),
                    );
                    for solution in &solutions {
                        verify(problem, solution, trace);
                    }
                    return Ok(solutions);
                }
                Err(e) => {
                    tracing::debug!(backend = backend.name(), error = %e, "backend failed");
                    trace.record(
                        SolutionStep::new(
                            OperationKind::Fallback,
                            format!("{} could not solve the equation", backend.name()),
                        )
                        .before(problem.equation.to_string())
                        .explanation(e.to_string()),
                    );
                }
            }
        }

        self.solve_numerically(problem, trace)
    }
}

/// Roots of `lhs - rhs` in `[min, max]`.
fn search(problem: &Problem, min: f64, max: f64) -> Vec<f64> {
    let mut evaluator = problem.evaluator();
    RootFinder::new(problem.config.numeric.clone()).find_roots(
        |x| {
            evaluator.bind(problem.variable, x);
            evaluator.residual(problem.equation).ok()
        },
        min,
        max,
    )
}

/// True if `root + period` and `root - period` also satisfy the equation.
fn repeats_after(problem: &Problem, root: f64, period: f64) -> bool {
    let mut evaluator = problem.evaluator();
    [root + period, root - period].into_iter().all(|x| {
        evaluator.bind(problem.variable, x);
        evaluator
            .residual(problem.equation)
            .is_ok_and(|r| r.abs() <= super::VERIFY_TOLERANCE)
    })
}

/// Numeric value of a backend result such as `sqrt(2)` or `-3/4`.
fn evaluate_text(text: &str, problem: &Problem) -> Option<f64> {
    let tokens = Tokenizer::new().tokenize(text).ok()?;
    let ast = AstBuilder::new().build(&tokens).ok()?;
    Evaluator::with_bindings(problem.bindings.clone())
        .evaluate(&ast)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::solver::backend::MockSymbolicBackend;
    use crate::solver::SolverError;
    use crate::test_support::parse;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn solve_with(
        solver: &GeneralSolver,
        source: &str,
        equation_type: EquationType,
    ) -> (SolverResult<Vec<Solution>>, StepTrace) {
        let equation = parse(source);
        let bindings = HashMap::new();
        let config = EngineConfig::default();
        let problem = Problem {
            equation: &equation,
            variable: "x",
            equation_type,
            bindings: &bindings,
            config: &config,
        };
        let mut trace = StepTrace::new();
        let result = solver.solve(&problem, &mut trace);
        (result, trace)
    }

    #[test]
    fn test_cubic_falls_back_to_numeric() {
        let (result, trace) = solve_with(&GeneralSolver::default(), "x^3 - 8 = 0", EquationType::Polynomial);
        let solutions = result.unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].value, "2");
        assert!(!solutions[0].is_exact);
        assert_eq!(solutions[0].approximation, Some(2.0));
        assert!(trace
            .steps()
            .iter()
            .any(|s| s.operation_kind == OperationKind::Numeric));
    }

    #[test]
    fn test_trigonometric_roots_are_periodic() {
        let (result, _) = solve_with(&GeneralSolver::default(), "sin(x) = 0.5", EquationType::Trigonometric);
        let solutions = result.unwrap();
        assert_eq!(solutions.len(), 2);
        assert_eq!(solutions[0].value, "0.5235987756");
        assert_eq!(solutions[1].value, "2.617993878");
        assert!(solutions[0].conditions[0].ends_with("+ 2πn, n ∈ ℤ"));
    }

    #[test]
    fn test_non_periodic_trigonometric_equation() {
        let (result, trace) = solve_with(&GeneralSolver::default(), "sin(x) + x = 0", EquationType::Trigonometric);
        let solutions = result.unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].value, "0");
        assert!(solutions[0].conditions.is_empty());
        assert!(trace
            .steps()
            .iter()
            .any(|s| s.operation_kind == OperationKind::Analyze && s.after.ends_with("without periodicity")));
    }

    #[test]
    fn test_longer_period_gets_no_condition() {
        let (result, _) = solve_with(&GeneralSolver::default(), "sin(x/2) = 0.5", EquationType::Trigonometric);
        let solutions = result.unwrap();
        assert!(solutions.len() > 2);
        assert!(solutions.iter().all(|s| s.conditions.is_empty()));
        assert!(solutions.iter().any(|s| s.value == "1.047197551"));
        assert!(solutions.iter().any(|s| s.value == "5.235987756"));
        assert!(solutions.iter().all(|s| s.value != "7.330382858"));
    }

    #[test]
    fn test_domain_step_and_logarithm() {
        let (result, trace) = solve_with(&GeneralSolver::default(), "ln(x) = 1", EquationType::Logarithmic);
        let solutions = result.unwrap();
        assert_eq!(solutions[0].value, "2.718281828");
        assert!(trace
            .steps()
            .iter()
            .any(|s| s.operation_kind == OperationKind::Domain && s.after == "x > 0"));
    }

    #[test]
    fn test_no_solution_is_an_error() {
        let (result, trace) = solve_with(&GeneralSolver::default(), "exp(x) = -1", EquationType::Exponential);
        assert!(matches!(
            result,
            Err(SolverError::Computation(ComputationError::NoSolutionFound { .. }))
        ));
        assert_eq!(trace.last().unwrap().after, "no roots found");
    }

    #[test]
    fn test_differential_is_unsupported() {
        let (result, _) = solve_with(&GeneralSolver::default(), "dy/dx = 2*x", EquationType::Differential);
        assert!(matches!(
            result,
            Err(SolverError::Computation(ComputationError::Unsupported(_)))
        ));
    }

    #[test]
    fn test_backend_result_is_used_and_checked() {
        let mut backend = MockSymbolicBackend::new();
        backend.expect_name().return_const("mock");
        backend
            .expect_solve()
            .returning(|_, _| Ok(vec!["2".to_string(), "5".to_string()]));
        let solver = GeneralSolver::new(BackendChain::new().with(Arc::new(backend)));

        let (result, trace) = solve_with(&solver, "x^3 = 8", EquationType::Polynomial);
        let solutions = result.unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].value, "2");
        assert!(solutions[0].is_exact);
        assert!(trace
            .steps()
            .iter()
            .any(|s| s.operation_kind == OperationKind::Backend));
    }

    #[test]
    fn test_failing_backend_records_fallback() {
        let mut backend = MockSymbolicBackend::new();
        backend.expect_name().return_const("mock");
        backend
            .expect_solve()
            .returning(|_, _| Err(BackendError::Failed("timeout".to_string())));
        let solver = GeneralSolver::new(BackendChain::new().with(Arc::new(backend)));

        let (result, trace) = solve_with(&solver, "x^3 = 8", EquationType::Polynomial);
        assert_eq!(result.unwrap()[0].value, "2");
        let fallback = trace
            .steps()
            .iter()
            .find(|s| s.operation_kind == OperationKind::Fallback)
            .unwrap();
        assert_eq!(fallback.explanation, "backend failure: timeout");
    }
}
