use std::sync::Arc;

use eqsolve::{Engine, OperationKind};

use super::TableBackend;

fn engine() -> Engine {
    Engine::default().with_backend(Arc::new(TableBackend {
        answers: vec![
            ("2^x = 8", vec!["log(8)/log(2)"]),
            ("x^4 = 16", vec!["2", "-2", "7"]),
        ],
    }))
}

#[test]
fn test_backend_answer_is_kept_symbolic() {
    let result = engine().solve("2^x = 8", None).unwrap();
    assert_eq!(result.values(), vec!["log(8)/log(2)"]);
    let approximation = result.solutions[0].approximation.unwrap();
    assert!((approximation - 3.0).abs() < 1e-9);
    assert!(result
        .steps
        .iter()
        .any(|s| s.operation_kind == OperationKind::Backend && s.description == "Solve with table"));
}

#[test]
fn test_backend_values_are_verified() {
    let result = engine().solve("x^4 = 16", None).unwrap();
    assert_eq!(result.values(), vec!["2", "-2"]);
}

#[test]
fn test_missing_backend_answer_falls_back_to_numeric() {
    let result = engine().solve("x^3 - 2*x - 5 = 0", None).unwrap();
    assert_eq!(result.solutions.len(), 1);
    assert!(result.solutions[0].value.starts_with("2.0945"));
    assert!(!result.solutions[0].is_exact);

    let fallback = result
        .steps
        .iter()
        .find(|s| s.operation_kind == OperationKind::Fallback)
        .unwrap();
    assert!(fallback.explanation.starts_with("backend failure: no entry for"));
    assert!(result
        .steps
        .iter()
        .any(|s| s.operation_kind == OperationKind::Numeric));
}

#[test]
fn test_registered_backends_are_listed() {
    assert_eq!(engine().backends().names(), vec!["table"]);
    assert!(Engine::default().backends().is_empty());
}
