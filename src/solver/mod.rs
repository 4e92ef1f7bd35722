//! Equation solvers and the dispatch that routes between them.
//!
//! Every solver records its derivation into a [`StepTrace`]. A solver that
//! cannot handle an equation returns an error; [`SolverDispatch`] records a
//! fallback step and tries the next solver for the equation type.

pub mod backend;
pub mod coefficients;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod general;
pub mod linear;
pub mod numeric;
pub mod quadratic;
pub mod solution;
pub mod step;

use std::collections::HashMap;

pub use backend::{BackendChain, SymbolicBackend};
pub use coefficients::{extract_linear, extract_quadratic, Polynomial};
pub use dispatch::SolverDispatch;
pub use error::{BackendError, ComputationError, SolverError, SolverResult};
pub use general::GeneralSolver;
pub use linear::LinearSolver;
pub use numeric::RootFinder;
pub use quadratic::QuadraticSolver;
pub use solution::{Solution, SolveResult};
pub use step::{OperationKind, SolutionStep, StepTrace};

use crate::ast::Node;
use crate::classifier::EquationType;
use crate::config::EngineConfig;
use crate::eval::Evaluator;
use crate::rewrite::substitute;

/// Largest residual accepted when a solution is substituted back.
pub const VERIFY_TOLERANCE: f64 = 1e-6;

/// Relative size below which an extracted coefficient is cancellation noise.
pub const COEFFICIENT_EPSILON: f64 = 1e-14;

/// True when `value` is negligible next to the largest of `coefficients`
/// (and never larger than 1 in absolute terms).
pub(crate) fn negligible(value: f64, coefficients: &[f64]) -> bool {
    let scale = coefficients.iter().fold(1.0_f64, |m, c| m.max(c.abs()));
    value.abs() <= COEFFICIENT_EPSILON * scale
}

/// Everything a solver needs to know about one equation.
#[derive(Debug, Clone, Copy)]
pub struct Problem<'a> {
    pub equation: &'a Node,
    pub variable: &'a str,
    pub equation_type: EquationType,
    pub bindings: &'a HashMap<String, f64>,
    pub config: &'a EngineConfig,
}

impl Problem<'_> {
    pub fn evaluator(&self) -> Evaluator {
        Evaluator::with_bindings(self.bindings.clone())
    }
}

pub trait Solver: Send + Sync {
    fn name(&self) -> &'static str;
    fn solve(&self, problem: &Problem, trace: &mut StepTrace) -> SolverResult<Vec<Solution>>;
}

/// Substitutes `solution` back into the equation and records the residual.
/// Returns whether the residual is within [`VERIFY_TOLERANCE`].
pub(crate) fn verify(problem: &Problem, solution: &Solution, trace: &mut StepTrace) -> bool {
    let Some(value) = solution.numeric_value() else {
        return true;
    };
    let substituted = substitute(problem.equation, problem.variable, &Node::number(value));
    let step = SolutionStep::new(
        OperationKind::Verify,
        format!("Substitute {} = {} into the equation", solution.variable, solution.value),
    )
    .before(substituted.to_string());

    match problem.evaluator().residual(&substituted) {
        Ok(residual) if residual.abs() <= VERIFY_TOLERANCE => {
            trace.record(
                step.after(format!("{} = {} ✓", solution.variable, solution.value))
                    .explanation(format!("Both sides agree (residual {:e})", residual)),
            );
            true
        }
        Ok(residual) => {
            trace.record(
                step.after(format!("{} = {} ✗", solution.variable, solution.value))
                    .explanation(format!("Residual {:e} exceeds {:e}", residual, VERIFY_TOLERANCE)),
            );
            false
        }
        Err(e) => {
            trace.record(
                step.after(format!("{} = {} ✗", solution.variable, solution.value))
                    .explanation(format!("Could not evaluate: {}", e)),
            );
            false
        }
    }
}
