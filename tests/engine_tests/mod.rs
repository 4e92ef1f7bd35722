use eqsolve::{BackendError, SymbolicBackend};

pub mod backend_test;
pub mod classify_test;
pub mod solve_test;

/// Backend that answers `solve` from a fixed table and rejects everything else.
pub struct TableBackend {
    pub answers: Vec<(&'static str, Vec<&'static str>)>,
}

impl TableBackend {
    fn unsupported(operation: &str) -> BackendError {
        BackendError::Unsupported(operation.to_string())
    }
}

impl SymbolicBackend for TableBackend {
    fn name(&self) -> &'static str {
        "table"
    }

    fn differentiate(&self, _: &str, _: &str) -> Result<String, BackendError> {
        Err(Self::unsupported("differentiate"))
    }

    fn integrate(&self, _: &str, _: &str) -> Result<String, BackendError> {
        Err(Self::unsupported("integrate"))
    }

    fn factor(&self, _: &str, _: &str) -> Result<String, BackendError> {
        Err(Self::unsupported("factor"))
    }

    fn expand(&self, _: &str, _: &str) -> Result<String, BackendError> {
        Err(Self::unsupported("expand"))
    }

    fn simplify(&self, _: &str, _: &str) -> Result<String, BackendError> {
        Err(Self::unsupported("simplify"))
    }

    fn solve(&self, equation: &str, _: &str) -> Result<Vec<String>, BackendError> {
        self.answers
            .iter()
            .find(|(known, _)| *known == equation)
            .map(|(_, values)| values.iter().map(|v| v.to_string()).collect())
            .ok_or_else(|| BackendError::Failed(format!("no entry for {}", equation)))
    }
}
