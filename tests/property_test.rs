use eqsolve::{Engine, Error, ValidationError};
use proptest::prelude::*;

proptest! {
    #[test]
    fn balanced_groups_validate(depth in 1usize..12, value in 0u32..1000) {
        let source = format!("{}{}{}", "(".repeat(depth), value, ")".repeat(depth));
        let engine = Engine::default();
        prop_assert!(engine.validate(&source).unwrap().is_valid);
        prop_assert_eq!(engine.evaluate(&source).unwrap(), value as f64);
    }

    #[test]
    fn unbalanced_groups_are_rejected(depth in 2usize..12) {
        let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth - 1));
        match Engine::default().parse(&source) {
            Err(Error::Validation { errors, .. }) => {
                let unmatched = matches!(errors[0], ValidationError::UnmatchedOpening { .. });
                prop_assert!(unmatched);
            }
            other => prop_assert!(false, "unexpected result: {:?}", other),
        }
    }

    #[test]
    fn integer_linear_roots_are_exact(a in 1i64..50, root in -50i64..50) {
        let source = format!("{}*x - {} = 0", a, a * root);
        let result = Engine::default().solve(&source, None).unwrap();
        let expected = root.to_string();
        prop_assert_eq!(result.values(), vec![expected.as_str()]);
        prop_assert!(result.solutions[0].is_exact);
    }

    #[test]
    fn factored_quadratics_recover_their_roots(p in -20i64..20, q in -20i64..20) {
        prop_assume!(p != q);
        let source = format!("(x - ({}))*(x - ({})) = 0", p, q);
        let result = Engine::default().solve(&source, None).unwrap();
        let mut values: Vec<i64> = result
            .values()
            .iter()
            .map(|v| v.parse().unwrap())
            .collect();
        values.sort();
        prop_assert_eq!(values, vec![p.min(q), p.max(q)]);
    }
}
