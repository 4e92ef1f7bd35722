use std::fmt;
use std::sync::Arc;

use super::error::BackendError;

/// An external computer-algebra engine. Expressions cross the boundary as
/// text in the crate's own expression syntax.
#[cfg_attr(test, mockall::automock)]
pub trait SymbolicBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn differentiate(&self, expression: &str, variable: &str) -> Result<String, BackendError>;

    fn integrate(&self, expression: &str, variable: &str) -> Result<String, BackendError>;

    fn factor(&self, expression: &str, variable: &str) -> Result<String, BackendError>;

    fn expand(&self, expression: &str, variable: &str) -> Result<String, BackendError>;

    fn simplify(&self, expression: &str, variable: &str) -> Result<String, BackendError>;

    /// Solutions of `equation` for `variable`, one expression each.
    fn solve(&self, _equation: &str, _variable: &str) -> Result<Vec<String>, BackendError> {
        Err(BackendError::Unsupported("solve".to_string()))
    }
}

/// Backends in priority order; the first one that succeeds wins.
#[derive(Clone, Default)]
pub struct BackendChain {
    backends: Vec<Arc<dyn SymbolicBackend>>,
}

impl BackendChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, backend: Arc<dyn SymbolicBackend>) {
        tracing::debug!(backend = backend.name(), "backend registered");
        self.backends.push(backend);
    }

    pub fn with(mut self, backend: Arc<dyn SymbolicBackend>) -> Self {
        self.push(backend);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn SymbolicBackend>> {
        self.backends.iter()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl fmt::Debug for BackendChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_keeps_priority_order() {
        let mut first = MockSymbolicBackend::new();
        first.expect_name().return_const("first");
        let mut second = MockSymbolicBackend::new();
        second.expect_name().return_const("second");

        let chain = BackendChain::new()
            .with(Arc::new(first))
            .with(Arc::new(second));
        assert_eq!(chain.names(), vec!["first", "second"]);
        assert_eq!(chain.len(), 2);
        assert_eq!(format!("{:?}", chain), "[\"first\", \"second\"]");
    }

    #[test]
    fn test_default_solve_is_unsupported() {
        struct Echo;
        impl SymbolicBackend for Echo {
            fn name(&self) -> &'static str {
                "echo"
            }
            fn differentiate(&self, e: &str, _: &str) -> Result<String, BackendError> {
                Ok(e.to_string())
            }
            fn integrate(&self, e: &str, _: &str) -> Result<String, BackendError> {
                Ok(e.to_string())
            }
            fn factor(&self, e: &str, _: &str) -> Result<String, BackendError> {
                Ok(e.to_string())
            }
            fn expand(&self, e: &str, _: &str) -> Result<String, BackendError> {
                Ok(e.to_string())
            }
            fn simplify(&self, e: &str, _: &str) -> Result<String, BackendError> {
                Ok(e.to_string())
            }
        }
        assert_eq!(
            Echo.solve("x = 1", "x"),
            Err(BackendError::Unsupported("solve".to_string()))
        );
    }
}
