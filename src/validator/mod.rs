//! Rule-based validation of a raw token stream.
//!
//! Runs independently of the parser: every rule sees the whole stream and
//! contributes zero or more issues. Errors make the input invalid, warnings
//! never do.

pub mod error;
pub mod rules;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::tokenizer::TokenSpan;
pub use error::ValidationError;
pub use rules::{default_rules, ValidationRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    pub error: ValidationError,
}

impl Issue {
    pub fn error(error: ValidationError) -> Self {
        Self {
            severity: Severity::Error,
            error,
        }
    }

    pub fn warning(error: ValidationError) -> Self {
        Self {
            severity: Severity::Warning,
            error,
        }
    }
}

/// Resource ceilings checked by the validator.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationLimits {
    pub max_expression_length: usize,
    pub max_variables: usize,
    pub max_tokens: usize,
    pub max_variable_name_length: usize,
    /// Report exceeded limits as errors instead of warnings.
    pub strict_limits: bool,
}

impl ValidationLimits {
    /// Wraps a limit violation with the configured severity.
    pub fn limit(&self, error: ValidationError) -> Issue {
        if self.strict_limits {
            Issue::error(error)
        } else {
            Issue::warning(error)
        }
    }
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for ValidationLimits {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_expression_length: config.max_expression_length,
            max_variables: config.max_variables,
            max_tokens: config.max_tokens,
            max_variable_name_length: config.max_variable_name_length,
            strict_limits: config.strict_limits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ValidationResult {
    fn from_issues(issues: Vec<Issue>) -> Self {
        let mut result = ValidationResult::default();
        for issue in issues {
            let suggestion = issue.error.suggestion();
            if !result.suggestions.contains(&suggestion) {
                result.suggestions.push(suggestion);
            }
            match issue.severity {
                Severity::Error => result.errors.push(issue.error),
                Severity::Warning => result.warnings.push(issue.error.to_string()),
            }
        }
        result.is_valid = result.errors.is_empty();
        result
    }
}

pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
    limits: ValidationLimits,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationLimits::default())
    }
}

impl Validator {
    pub fn new(limits: ValidationLimits) -> Self {
        Self::with_rules(default_rules(), limits)
    }

    pub fn with_rules(rules: Vec<Box<dyn ValidationRule>>, limits: ValidationLimits) -> Self {
        Self { rules, limits }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    #[tracing::instrument(level = "debug", skip(self, tokens))]
    pub fn validate(&self, tokens: &[TokenSpan]) -> ValidationResult {
        let issues = self
            .rules
            .iter()
            .flat_map(|rule| {
                let issues = rule.check(tokens, &self.limits);
                if !issues.is_empty() {
                    tracing::debug!(rule = rule.name(), count = issues.len(), "validation issues");
                }
                issues
            })
            .collect::<Vec<_>>();
        ValidationResult::from_issues(issues)
    }
}
