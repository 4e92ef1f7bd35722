use std::sync::Arc;
use std::time::Duration;

use eqsolve::{Engine, EngineConfig, EquationType, InMemoryCache, OperationKind};
use pretty_assertions::assert_eq;

use crate::ENGINE;

fn kinds(steps: &[eqsolve::SolutionStep]) -> Vec<OperationKind> {
    steps.iter().map(|s| s.operation_kind).collect()
}

#[test]
fn test_linear() {
    let result = ENGINE.solve("2*x + 3 = 7", None).unwrap();
    assert_eq!(result.equation_type, EquationType::Linear);
    assert_eq!(result.values(), vec!["2"]);
    assert!(result.solutions[0].is_exact);
    assert_eq!(
        kinds(&result.steps),
        vec![
            OperationKind::Identify,
            OperationKind::Isolate,
            OperationKind::Divide,
            OperationKind::Verify,
            OperationKind::Conclude,
        ]
    );
    assert_eq!(result.steps[1].after, "2*x = 4");
    assert_eq!(result.steps[3].after, "x = 2 ✓");
}

#[test]
fn test_final_step_states_every_solution() {
    for source in [
        "2*x + 3 = 7",
        "x^2 - 5*x + 6 = 0",
        "x^3 - 8 = 0",
        "sin(x) = 0.5",
        "sqrt(x) = 3",
    ] {
        let result = ENGINE.solve(source, None).unwrap();
        let last = result.steps.last().unwrap();
        assert_eq!(last.operation_kind, OperationKind::Conclude, "{}", source);
        for value in result.values() {
            assert!(last.after.contains(value), "{} lacks {}", last.after, value);
        }
    }
}

#[test]
fn test_cancelled_coefficient_is_a_contradiction() {
    let result = ENGINE.solve("0.1*x + 0.2*x = 0.3*x + 1", None).unwrap();
    assert!(result.solutions.is_empty());
    assert_eq!(result.steps.last().unwrap().after, "no real solutions");
}

#[test]
fn test_linear_fraction() {
    let result = ENGINE.solve("2*x = 3", None).unwrap();
    assert_eq!(result.values(), vec!["3/2"]);
    assert_eq!(result.solutions[0].approximation, Some(1.5));
}

#[test]
fn test_quadratic_roots() {
    let result = ENGINE.solve("x^2 - 4 = 0", None).unwrap();
    assert_eq!(result.equation_type, EquationType::Quadratic);
    assert_eq!(result.values(), vec!["2", "-2"]);

    let discriminant = result
        .steps
        .iter()
        .find(|s| s.operation_kind == OperationKind::Discriminant)
        .unwrap();
    assert_eq!(discriminant.after, "D = 16");
}

#[test]
fn test_quadratic_without_real_roots() {
    let result = ENGINE.solve("x^2 + 1 = 0", None).unwrap();
    assert!(result.solutions.is_empty());
    assert_eq!(result.steps.last().unwrap().after, "no real solutions");
}

#[test]
fn test_repeated_root() {
    let result = ENGINE.solve("x^2 - 6*x + 9 = 0", None).unwrap();
    assert_eq!(result.values(), vec!["3"]);
    assert_eq!(result.solutions[0].multiplicity, Some(2));
}

#[test]
fn test_cubic_numeric() {
    let result = ENGINE.solve("x^3 - 8 = 0", None).unwrap();
    assert_eq!(result.equation_type, EquationType::Polynomial);
    assert_eq!(result.values(), vec!["2"]);
    assert!(!result.solutions[0].is_exact);
}

#[test]
fn test_radical_domain() {
    let result = ENGINE.solve("sqrt(x) = 3", None).unwrap();
    assert_eq!(result.values(), vec!["9"]);
    assert_eq!(result.domain_restrictions, vec!["x ≥ 0".to_string()]);
}

#[test]
fn test_step_ids_are_sequential() {
    let result = ENGINE.solve("(x + 0)^2 - 4 = 0", None).unwrap();
    assert_eq!(result.steps[0].operation_kind, OperationKind::Simplify);
    let ids: Vec<usize> = result.steps.iter().map(|s| s.id).collect();
    assert_eq!(ids, (1..=result.steps.len()).collect::<Vec<_>>());
}

#[test]
fn test_hidden_steps() {
    let engine = Engine::new(EngineConfig {
        show_steps: false,
        ..EngineConfig::default()
    });
    let result = engine.solve("x^2 - 4 = 0", None).unwrap();
    assert_eq!(result.steps.len(), 1);
}

#[test]
fn test_approximate_mode() {
    let engine = Engine::new(EngineConfig {
        exact: false,
        precision: 4,
        ..EngineConfig::default()
    });
    let result = engine.solve("3*x = 1", None).unwrap();
    assert_eq!(result.values(), vec!["0.3333"]);
    assert!(!result.solutions[0].is_exact);
}

#[test]
fn test_cached_result_expires() {
    let cache = Arc::new(InMemoryCache::new());
    let engine = Engine::new(EngineConfig {
        cache_ttl: Duration::ZERO,
        ..EngineConfig::default()
    })
    .with_cache(cache.clone());

    engine.solve("x + 1 = 2", None).unwrap();
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.purge_expired(), 1);
    assert!(cache.is_empty());
}

#[test]
fn test_shared_cache_keeps_settings_apart() {
    let cache = Arc::new(InMemoryCache::new());
    let exact = Engine::default().with_cache(cache.clone());
    let approximate = Engine::new(EngineConfig {
        exact: false,
        precision: 4,
        ..EngineConfig::default()
    })
    .with_cache(cache.clone());

    assert_eq!(exact.solve("3*x = 1", None).unwrap().values(), vec!["1/3"]);
    assert_eq!(approximate.solve("3*x = 1", None).unwrap().values(), vec!["0.3333"]);

    let scaled = Engine::default().with_binding("a", 2.0).with_cache(cache.clone());
    let doubled = Engine::default().with_binding("a", 4.0).with_cache(cache.clone());
    assert_eq!(scaled.solve("a*x = 8", None).unwrap().values(), vec!["4"]);
    assert_eq!(doubled.solve("a*x = 8", None).unwrap().values(), vec!["2"]);
    assert_eq!(cache.len(), 4);
}

#[test]
fn test_result_serializes() {
    let result = ENGINE.solve("x^2 - 4 = 0", None).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["equation_type"], "QUADRATIC");
    assert_eq!(json["solutions"][0]["value"], "2");
    assert_eq!(json["steps"][0]["operation_kind"], "identify");
}
