use std::sync::Arc;

use super::backend::{BackendChain, SymbolicBackend};
use super::domain::restrictions;
use super::error::{ComputationError, SolverError, SolverResult};
use super::general::GeneralSolver;
use super::linear::LinearSolver;
use super::quadratic::QuadraticSolver;
use super::solution::{Solution, SolveResult};
use super::step::{OperationKind, SolutionStep, StepTrace};
use super::{Problem, Solver};
use crate::ast::{Node, NodeKind};
use crate::classifier::EquationType;

/// Routes an equation to the solvers for its type, in order, until one succeeds.
#[derive(Debug, Clone, Default)]
pub struct SolverDispatch {
    linear: LinearSolver,
    quadratic: QuadraticSolver,
    general: GeneralSolver,
}

impl SolverDispatch {
    pub fn new(backends: BackendChain) -> Self {
        Self {
            general: GeneralSolver::new(backends),
            ..Self::default()
        }
    }

    pub fn push_backend(&mut self, backend: Arc<dyn SymbolicBackend>) {
        self.general.backends_mut().push(backend);
    }

    pub fn backends(&self) -> &BackendChain {
        self.general.backends()
    }

    /// Solvers tried for `equation_type`, most specific first.
    pub fn route(&self, equation_type: EquationType) -> Vec<&dyn Solver> {
        match equation_type {
            EquationType::Linear => vec![&self.linear as &dyn Solver, &self.quadratic, &self.general],
            EquationType::Quadratic => vec![&self.quadratic as &dyn Solver, &self.general],
            _ => vec![&self.general],
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(variable = problem.variable, equation_type = %problem.equation_type))]
    pub fn solve(&self, problem: &Problem) -> SolverResult<SolveResult> {
        if matches!(problem.equation.kind, NodeKind::Inequality { .. }) {
            return Err(ComputationError::Unsupported("inequalities".to_string()).into());
        }
        let equation = as_equation(problem.equation);
        let problem = Problem {
            equation: &equation,
            variable: problem.variable,
            equation_type: problem.equation_type,
            bindings: problem.bindings,
            config: problem.config,
        };

        let mut trace = StepTrace::new();
        let route = self.route(problem.equation_type);
        let mut last_error = None;

        for (index, solver) in route.iter().enumerate() {
            let mut attempt = StepTrace::new();
            match solver.solve(&problem, &mut attempt) {
                Ok(solutions) => {
                    trace.append(attempt);
                    trace.record(conclusion(&equation, problem.variable, solver.name(), &solutions));
                    let steps = if problem.config.show_steps {
                        trace.into_steps()
                    } else {
                        trace.into_steps().into_iter().last().into_iter().collect()
                    };
                    return Ok(SolveResult {
                        solutions,
                        steps,
                        equation_type: problem.equation_type,
                        variables: equation.variables(),
                        domain_restrictions: restrictions(&equation, problem.variable),
                    });
                }
                Err(e) => {
                    tracing::debug!(solver = solver.name(), error = %e, "solver failed");
                    let next = route.get(index + 1).map(|s| s.name());
                    trace.record(
                        SolutionStep::new(
                            OperationKind::Fallback,
                            format!("The {} solver does not apply", solver.name()),
                        )
                        .before(equation.to_string())
                        .after(match next {
                            Some(next) => format!("try the {} solver", next),
                            None => "no solver left".to_string(),
                        })
                        .explanation(e.to_string()),
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(SolverError::Computation(e)) => SolverError::Computation(e),
            Some(other) => ComputationError::Unsupported(other.to_string()).into(),
            None => ComputationError::Unsupported(format!("no solver for {}", problem.equation_type)).into(),
        })
    }
}

/// Closing step naming every returned solution.
fn conclusion(equation: &Node, variable: &str, solver: &str, solutions: &[Solution]) -> SolutionStep {
    let after = if solutions.is_empty() {
        "no real solutions".to_string()
    } else {
        solutions
            .iter()
            .map(|s| format!("{} = {}", s.variable, s.value))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let conditions: Vec<&str> = solutions
        .iter()
        .flat_map(|s| s.conditions.iter().map(String::as_str))
        .collect();
    let explanation = if conditions.is_empty() {
        format!("{} solution(s) for {} from the {} solver", solutions.len(), variable, solver)
    } else {
        format!(
            "{} solution(s) for {} from the {} solver, where {}",
            solutions.len(),
            variable,
            solver,
            conditions.join("; ")
        )
    };
    SolutionStep::new(OperationKind::Conclude, "State the solution set")
        .before(equation.to_string())
        .after(after)
        .explanation(explanation)
}

/// A bare expression `e` is solved as `e = 0`.
fn as_equation(node: &Node) -> Node {
    match node.kind {
        NodeKind::Equation { .. } => node.clone(),
        _ => Node::equation(node.clone(), Node::number(0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::solver::Solution;
    use crate::test_support::parse;
    use std::collections::HashMap;

    fn dispatch(
        source: &str,
        equation_type: EquationType,
        config: &EngineConfig,
    ) -> SolverResult<SolveResult> {
        let equation = parse(source);
        let bindings = HashMap::new();
        let problem = Problem {
            equation: &equation,
            variable: "x",
            equation_type,
            bindings: &bindings,
            config,
        };
        SolverDispatch::default().solve(&problem)
    }

    fn values(solutions: &[Solution]) -> Vec<&str> {
        solutions.iter().map(|s| s.value.as_str()).collect()
    }

    #[test]
    fn test_routes() {
        let dispatch = SolverDispatch::default();
        let names = |t| dispatch.route(t).iter().map(|s| s.name()).collect::<Vec<_>>();
        assert_eq!(names(EquationType::Linear), vec!["linear", "quadratic", "general"]);
        assert_eq!(names(EquationType::Quadratic), vec!["quadratic", "general"]);
        assert_eq!(names(EquationType::Radical), vec!["general"]);
    }

    #[test]
    fn test_misrouted_quadratic_records_fallback() {
        let result = dispatch("x^2 - 4 = 0", EquationType::Linear, &EngineConfig::default()).unwrap();
        assert_eq!(values(&result.solutions), vec!["2", "-2"]);
        assert_eq!(result.steps[0].operation_kind, OperationKind::Fallback);
        assert_eq!(result.steps[0].after, "try the quadratic solver");
        let ids: Vec<usize> = result.steps.iter().map(|s| s.id).collect();
        assert_eq!(ids, (1..=result.steps.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_bare_expression_is_solved_against_zero() {
        let result = dispatch("3*x - 9", EquationType::Linear, &EngineConfig::default()).unwrap();
        assert_eq!(values(&result.solutions), vec!["3"]);
        assert_eq!(result.variables, vec!["x".to_string()]);
    }

    #[test]
    fn test_hidden_steps_keep_only_the_last() {
        let config = EngineConfig {
            show_steps: false,
            ..EngineConfig::default()
        };
        let result = dispatch("2*x = 4", EquationType::Linear, &config).unwrap();
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].operation_kind, OperationKind::Conclude);
        assert_eq!(result.steps[0].after, "x = 2");
    }

    #[test]
    fn test_last_step_names_every_solution() {
        let test_cases = [
            ("2*x + 3 = 7", EquationType::Linear),
            ("x^2 - 5*x + 6 = 0", EquationType::Quadratic),
            ("x^3 - 6*x^2 + 11*x - 6 = 0", EquationType::Polynomial),
            ("sin(x) = 0.5", EquationType::Trigonometric),
        ];
        for (source, equation_type) in test_cases {
            let result = dispatch(source, equation_type, &EngineConfig::default()).unwrap();
            let last = result.steps.last().unwrap();
            assert_eq!(last.operation_kind, OperationKind::Conclude, "{}", source);
            assert!(!result.solutions.is_empty(), "{}", source);
            for solution in &result.solutions {
                assert!(last.after.contains(&solution.value), "{}: {}", source, last.after);
            }
        }
    }

    #[test]
    fn test_inequality_is_unsupported() {
        let result = dispatch("x < 3", EquationType::Linear, &EngineConfig::default());
        assert!(matches!(
            result,
            Err(SolverError::Computation(ComputationError::Unsupported(_)))
        ));
    }

    #[test]
    fn test_exhausted_route_returns_computation_error() {
        let result = dispatch("x^2 + 1 = 0", EquationType::Polynomial, &EngineConfig::default());
        assert!(matches!(
            result,
            Err(SolverError::Computation(ComputationError::NoSolutionFound { .. }))
        ));
    }

    #[test]
    fn test_domain_restrictions_are_reported() {
        let result = dispatch("sqrt(x) = 3", EquationType::Radical, &EngineConfig::default()).unwrap();
        assert_eq!(values(&result.solutions), vec!["9"]);
        assert_eq!(result.domain_restrictions, vec!["x ≥ 0".to_string()]);
    }
}
