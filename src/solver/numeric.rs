//! Bounded numeric root finding.
//!
//! The search interval is sampled at evenly spaced points. Each sign change is
//! refined by Newton-Raphson kept inside its bracket by bisection; local
//! minima of `|f|` without a sign change are tried with plain Newton to catch
//! roots of even multiplicity. Every candidate must pass a residual check.

use super::VERIFY_TOLERANCE;
use crate::config::NumericConfig;

#[derive(Debug, Clone)]
pub struct RootFinder {
    config: NumericConfig,
}

impl RootFinder {
    pub fn new(config: NumericConfig) -> Self {
        Self { config }
    }

    /// Real roots of `f` in `[min, max]`, ascending. `f` returns `None` where
    /// it is undefined.
    #[tracing::instrument(level = "debug", skip(self, f))]
    pub fn find_roots<F: FnMut(f64) -> Option<f64>>(&self, mut f: F, min: f64, max: f64) -> Vec<f64> {
        let samples = self.config.samples.max(2);
        let step = (max - min) / samples as f64;
        let points: Vec<(f64, Option<f64>)> = (0..=samples)
            .map(|i| {
                let x = min + step * i as f64;
                (x, f(x).filter(|v| v.is_finite()))
            })
            .collect();

        let mut candidates = Vec::new();
        for window in points.windows(2) {
            let ((x0, f0), (x1, f1)) = (window[0], window[1]);
            match (f0, f1) {
                (Some(f0), _) if f0 == 0.0 => candidates.push(x0),
                (Some(f0), Some(f1)) if f1 != 0.0 && f0.signum() != f1.signum() => {
                    if let Some(root) = self.refine(&mut f, x0, f0, x1) {
                        candidates.push(root);
                    }
                }
                _ => {}
            }
        }
        if let Some((x, Some(fx))) = points.last() {
            if *fx == 0.0 {
                candidates.push(*x);
            }
        }
        for window in points.windows(3) {
            if let [(_, Some(a)), (x, Some(b)), (_, Some(c))] = window {
                let touches = a.signum() == b.signum() && b.signum() == c.signum();
                if touches && b.abs() < a.abs() && b.abs() <= c.abs() {
                    if let Some(root) = self.newton(&mut f, *x) {
                        candidates.push(root);
                    }
                }
            }
        }

        let mut roots: Vec<f64> = candidates
            .into_iter()
            .filter(|x| f(*x).is_some_and(|v| v.abs() <= VERIFY_TOLERANCE))
            .map(snap)
            .collect();
        roots.sort_by(f64::total_cmp);
        roots.dedup_by(|a, b| (*a - *b).abs() <= VERIFY_TOLERANCE * b.abs().max(1.0));
        tracing::debug!(count = roots.len(), "numeric roots");
        roots
    }

    /// Safeguarded Newton on a bracket `[lo, hi]` whose ends differ in sign.
    fn refine<F: FnMut(f64) -> Option<f64>>(&self, f: &mut F, lo: f64, f_lo: f64, hi: f64) -> Option<f64> {
        let (mut lo, mut hi, mut f_lo) = (lo, hi, f_lo);
        let mut x = 0.5 * (lo + hi);
        for _ in 0..self.config.max_iterations {
            let fx = f(x)?;
            if fx.abs() <= self.config.tolerance {
                return Some(x);
            }
            if fx.signum() == f_lo.signum() {
                lo = x;
                f_lo = fx;
            } else {
                hi = x;
            }
            if (hi - lo).abs() <= self.config.tolerance * x.abs().max(1.0) {
                return Some(0.5 * (lo + hi));
            }
            let next = derivative(f, x)
                .map(|d| x - fx / d)
                .filter(|n| *n > lo && *n < hi);
            x = next.unwrap_or(0.5 * (lo + hi));
        }
        Some(x)
    }

    /// Unbracketed Newton from `x`, for roots where `f` touches zero.
    fn newton<F: FnMut(f64) -> Option<f64>>(&self, f: &mut F, mut x: f64) -> Option<f64> {
        for _ in 0..self.config.max_iterations {
            let fx = f(x)?;
            if fx.abs() <= self.config.tolerance {
                return Some(x);
            }
            let next = x - fx / derivative(f, x)?;
            if !next.is_finite() {
                return None;
            }
            if (next - x).abs() <= self.config.tolerance * x.abs().max(1.0) {
                return Some(next);
            }
            x = next;
        }
        Some(x)
    }
}

/// Central difference; `None` where it vanishes or `f` is undefined.
fn derivative<F: FnMut(f64) -> Option<f64>>(f: &mut F, x: f64) -> Option<f64> {
    let h = 1e-7 * x.abs().max(1.0);
    let d = (f(x + h)? - f(x - h)?) / (2.0 * h);
    (d.is_finite() && d != 0.0).then_some(d)
}

/// Rounds away floating point noise around integers.
fn snap(x: f64) -> f64 {
    let rounded = x.round();
    if (x - rounded).abs() <= 1e-9 * x.abs().max(1.0) {
        rounded
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finder() -> RootFinder {
        RootFinder::new(NumericConfig::default())
    }

    #[test]
    fn test_cubic_root() {
        let roots = finder().find_roots(|x| Some(x * x * x - 8.0), -100.0, 100.0);
        assert_eq!(roots, vec![2.0]);
    }

    #[test]
    fn test_several_roots_ascending() {
        let roots = finder().find_roots(|x| Some((x - 1.5) * (x + 3.25) * (x - 7.0)), -10.0, 10.0);
        assert_eq!(roots.len(), 3);
        assert!((roots[0] + 3.25).abs() < 1e-9);
        assert!((roots[1] - 1.5).abs() < 1e-9);
        assert!((roots[2] - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_touching_root() {
        let roots = finder().find_roots(|x| Some((x - 2.3) * (x - 2.3)), -10.0, 10.0);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 2.3).abs() < 1e-3);
    }

    #[test]
    fn test_poles_and_undefined_regions_are_skipped() {
        let roots = finder().find_roots(|x| (x != 0.0).then(|| 1.0 / x), -5.0, 5.0);
        assert!(roots.is_empty());

        let roots = finder().find_roots(|x| (x > 0.0).then(|| x.ln() - 1.0), -5.0, 5.0);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - std::f64::consts::E).abs() < 1e-9);
    }

    #[test]
    fn test_no_roots() {
        assert!(finder().find_roots(|x| Some(x * x + 1.0), -100.0, 100.0).is_empty());
    }
}
