//! The solving pipeline: tokenize, validate, parse, classify, solve.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analyzer::AstBuilder;
use crate::ast::Node;
use crate::cache::{cache_key, ResultCache};
use crate::classifier::{Classification, EquationClassifier};
use crate::config::EngineConfig;
use crate::eval::Evaluator;
use crate::rewrite::simplify;
use crate::solver::{
    BackendChain, ComputationError, OperationKind, Problem, SolutionStep, SolveResult, SolverDispatch,
    StepTrace, SymbolicBackend,
};
use crate::tokenizer::{BuiltinFunction, TokenSpan, Tokenizer};
use crate::validator::{ValidationLimits, ValidationResult, Validator};
use crate::{Error, InternalResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub ast: Node,
    pub variables: Vec<String>,
    pub functions: Vec<BuiltinFunction>,
    pub complexity: usize,
    pub validation: ValidationResult,
    pub steps: Vec<SolutionStep>,
}

pub struct Engine {
    config: EngineConfig,
    validator: Validator,
    builder: AstBuilder,
    classifier: EquationClassifier,
    dispatch: SolverDispatch,
    cache: Option<Arc<dyn ResultCache>>,
    bindings: HashMap<String, f64>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            validator: Validator::new(ValidationLimits::from(&config)),
            builder: AstBuilder::new(),
            classifier: EquationClassifier::new(),
            dispatch: SolverDispatch::default(),
            cache: None,
            bindings: HashMap::new(),
            config,
        }
    }

    pub fn from_config_file<P: AsRef<Path>>(path: P) -> InternalResult<Self> {
        let config = EngineConfig::from_file(path)?;
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn with_backend(mut self, backend: Arc<dyn SymbolicBackend>) -> Self {
        self.dispatch.push_backend(backend);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Binds `name` to a value; bound names are never chosen as the unknown.
    pub fn with_binding(mut self, name: &str, value: f64) -> Self {
        self.bindings.insert(name.to_string(), value);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bindings(&self) -> &HashMap<String, f64> {
        &self.bindings
    }

    pub fn backends(&self) -> &BackendChain {
        self.dispatch.backends()
    }

    pub fn tokenize(&self, source: &str) -> InternalResult<Vec<TokenSpan>> {
        Ok(Tokenizer::new().tokenize(source)?)
    }

    pub fn validate(&self, source: &str) -> InternalResult<ValidationResult> {
        let tokens = self.tokenize(source)?;
        Ok(self.validator.validate(&tokens))
    }

    /// Validates and parses `source`. Validation errors abort before parsing;
    /// warnings are carried in the result.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse(&self, source: &str) -> InternalResult<ParseResult> {
        let tokens = self.tokenize(source)?;
        let mut validation = self.validator.validate(&tokens);
        if !validation.is_valid {
            tracing::warn!(errors = validation.errors.len(), "validation failed");
            return Err(Error::Validation {
                errors: validation.errors,
                suggestions: validation.suggestions,
            });
        }

        let parsed = self.builder.build(&tokens)?;
        let mut trace = StepTrace::new();
        let ast = if self.config.auto_simplify {
            let simplified = simplify(&parsed);
            if simplified != parsed {
                trace.record(
                    SolutionStep::new(OperationKind::Simplify, "Simplify the expression")
                        .before(parsed.to_string())
                        .after(simplified.to_string())
                        .explanation("Remove identity terms and fold constants"),
                );
            }
            simplified
        } else {
            parsed
        };

        let complexity = ast.complexity();
        if complexity > self.config.max_complexity {
            let message = format!(
                "Expression complexity {} exceeds the configured maximum {}",
                complexity, self.config.max_complexity
            );
            tracing::warn!("{}", message);
            validation.warnings.push(message);
        }

        Ok(ParseResult {
            variables: ast.variables(),
            functions: ast.functions(),
            complexity,
            ast,
            validation,
            steps: trace.into_steps(),
        })
    }

    pub fn classify(&self, source: &str, variables: &[String]) -> InternalResult<Classification> {
        let parsed = self.parse(source)?;
        Ok(self
            .classifier
            .classify(&parsed.ast, source, variables, &self.bound_names()))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn solve(&self, source: &str, variable: Option<&str>) -> InternalResult<SolveResult> {
        let key = cache_key(source, variable, &self.bindings, &self.config);
        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            tracing::debug!(key = %key, "cache hit");
            return Ok(hit);
        }

        let parsed = self.parse(source)?;
        let requested: Vec<String> = variable.map(|v| vec![v.to_string()]).unwrap_or_default();
        let classification =
            self.classifier
                .classify(&parsed.ast, source, &requested, &self.bound_names());
        let unknown = classification.variable.ok_or_else(|| {
            ComputationError::Unsupported("the equation has no unknown to solve for".to_string())
        })?;

        let problem = Problem {
            equation: &parsed.ast,
            variable: &unknown,
            equation_type: classification.equation_type,
            bindings: &self.bindings,
            config: &self.config,
        };
        let mut result = self.dispatch.solve(&problem)?;

        if self.config.show_steps && !parsed.steps.is_empty() {
            let mut trace = StepTrace::new();
            for step in parsed.steps.into_iter().chain(result.steps) {
                trace.record(step);
            }
            result.steps = trace.into_steps();
        }

        if let Some(cache) = &self.cache {
            cache.put(&key, result.clone(), self.config.cache_ttl);
        }
        Ok(result)
    }

    /// Numeric value of an expression under the engine's bindings.
    pub fn evaluate(&self, source: &str) -> InternalResult<f64> {
        let parsed = self.parse(source)?;
        let evaluator = Evaluator::with_bindings(self.bindings.clone());
        Ok(evaluator.evaluate(&parsed.ast)?)
    }

    fn bound_names(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }
}
