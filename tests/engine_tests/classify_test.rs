use eqsolve::EquationType;
use pretty_assertions::assert_eq;

use crate::ENGINE;

#[test]
fn test_equation_types() {
    let test_cases = [
        ("2*x + 3 = 7", EquationType::Linear),
        ("x^2 - 5*x + 6 = 0", EquationType::Quadratic),
        ("x^3 - 8 = 0", EquationType::Polynomial),
        ("sin(x) = 0.5", EquationType::Trigonometric),
        ("2^x = 8", EquationType::Exponential),
        ("ln(x) = 1", EquationType::Logarithmic),
        ("1/(x - 1) = 2", EquationType::Rational),
        ("sqrt(x + 1) = 3", EquationType::Radical),
        ("dy/dx = 2*x", EquationType::Differential),
    ];
    for (source, expected) in test_cases {
        let classification = ENGINE.classify(source, &[]).unwrap();
        assert_eq!(classification.equation_type, expected, "{}", source);
    }
}

#[test]
fn test_degree_and_variable() {
    let classification = ENGINE.classify("x^2 - 4 = 0", &[]).unwrap();
    assert_eq!(classification.variable.as_deref(), Some("x"));
    assert_eq!(classification.degree, Some(2));

    let classification = ENGINE.classify("t^2 = 9", &[]).unwrap();
    assert_eq!(classification.variable.as_deref(), Some("t"));
}

#[test]
fn test_requested_variable_changes_the_type() {
    let classification = ENGINE
        .classify("y^2 + x = 0", &["x".to_string()])
        .unwrap();
    assert_eq!(classification.equation_type, EquationType::Linear);

    let classification = ENGINE
        .classify("y^2 + x = 0", &["y".to_string()])
        .unwrap();
    assert_eq!(classification.equation_type, EquationType::Quadratic);
}

#[test]
fn test_type_serializes_in_upper_case() {
    let classification = ENGINE.classify("x^2 = 1", &[]).unwrap();
    let json = serde_json::to_value(&classification).unwrap();
    assert_eq!(json["equation_type"], "QUADRATIC");
}
