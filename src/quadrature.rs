//! Gauss-Legendre Quadrature tables: abscissas (roots of the Legendre
//! polynomial `P_N`) and their weights, on `[-1,1]` with support for affine
//! rescaling to an arbitrary `[a,b]`.
//!
//! Root finding follows the Newton iteration with explicit deflation
//! described by Barrera-Figueroa et al. (2006), the same scheme used by the
//! reference `Abscissas.h`/`Weights.h` pair this module is ported from.

use crate::constants::{NEWTON_MAX_ITERATIONS, NEWTON_TOLERANCE};
use crate::error::{CoreError, CoreResult};
use log::warn;
use std::f64::consts::PI;

/// Evaluate `P_n(x)` and `P_{n-1}(x)` simultaneously via the three-term
/// recurrence `P_n(x) = ((2n-1) x P_{n-1}(x) - (n-1) P_{n-2}(x)) / n`.
///
/// Returns `(P_n(x), P_{n-1}(x))`.
fn legendre_pair(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }
    let (mut p_prev, mut p_curr) = (1.0, x);
    for k in 2..=n {
        let k = k as f64;
        let p_next = ((2.0 * k - 1.0) * x * p_curr - (k - 1.0) * p_prev) / k;
        p_prev = p_curr;
        p_curr = p_next;
    }
    (p_curr, p_prev)
}

/// `P_N'(x) = N (x P_N(x) - P_{N-1}(x)) / (x^2 - 1)`.
fn legendre_derivative(n: usize, x: f64, p_n: f64, p_n_minus_1: f64) -> f64 {
    (n as f64) * (x * p_n - p_n_minus_1) / (x * x - 1.0)
}

/// The `N` roots of the Legendre polynomial `P_N` on `[-1,1]`, together with
/// a tesseroid-local rescaled copy.
#[derive(Clone, Debug)]
pub struct AbscissaSet {
    order: usize,
    unscaled: Vec<f64>,
    scaled: Vec<f64>,
}

impl AbscissaSet {
    /// Compute the `order` roots of `P_order` by Newton iteration with
    /// deflation, in canonical order `k = 0..order`, with initial guess
    /// `cos(pi (k+0.75)/(order+0.5))`.
    pub fn new(order: usize) -> CoreResult<Self> {
        if order < 2 {
            return Err(CoreError::OrderTooSmall(order));
        }
        let n = order;
        let mut roots: Vec<f64> = Vec::with_capacity(n);
        for k in 0..n {
            let mut x = ((PI * (k as f64 + 0.75)) / (n as f64 + 0.5)).cos();
            let mut stagnated = true;
            for _ in 0..NEWTON_MAX_ITERATIONS {
                let (p_n, p_n_minus_1) = legendre_pair(n, x);
                let dp = legendre_derivative(n, x, p_n, p_n_minus_1);
                let deflation: f64 = roots.iter().map(|&xm| 1.0 / (x - xm)).sum();
                let delta = p_n / (dp - p_n * deflation);
                x -= delta;
                if delta.abs() < NEWTON_TOLERANCE {
                    stagnated = false;
                    break;
                }
            }
            if stagnated {
                warn!(
                    "Legendre root {k} of order {n} did not converge within {NEWTON_MAX_ITERATIONS} iterations"
                );
            }
            roots.push(x);
        }
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let scaled = roots.clone();
        Ok(Self {
            order: n,
            unscaled: roots,
            scaled,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn unscaled(&self) -> &[f64] {
        &self.unscaled
    }

    pub fn scaled(&self) -> &[f64] {
        &self.scaled
    }

    /// Rescale the unscaled roots linearly onto `[a,b]`:
    /// `s_k = ((b-a)/2) x_k + (b+a)/2`.
    pub fn rescale(&mut self, a: f64, b: f64) {
        let half_span = (b - a) / 2.0;
        let mid = (b + a) / 2.0;
        for (s, &x) in self.scaled.iter_mut().zip(self.unscaled.iter()) {
            *s = half_span * x + mid;
        }
    }
}

/// Weights for an [`AbscissaSet`], `w_k = 2 / ((1-x_k^2) P_N'(x_k)^2)`.
#[derive(Clone, Debug)]
pub struct WeightSet {
    weights: Vec<f64>,
}

impl WeightSet {
    pub fn new(abscissas: &AbscissaSet) -> Self {
        let n = abscissas.order();
        let weights = abscissas
            .unscaled()
            .iter()
            .map(|&x| {
                let (p_n, p_n_minus_1) = legendre_pair(n, x);
                let dp = legendre_derivative(n, x, p_n, p_n_minus_1);
                2.0 / ((1.0 - x * x) * dp * dp)
            })
            .collect();
        Self { weights }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_are_zeros_of_the_legendre_polynomial() {
        for n in 2..64 {
            let abs = AbscissaSet::new(n).unwrap();
            for &x in abs.unscaled() {
                assert!(x > -1.0 && x < 1.0, "root {x} out of (-1,1) for n={n}");
                let (p_n, _) = legendre_pair(n, x);
                assert!(p_n.abs() < 1e-12, "P_{n}({x}) = {p_n} too large");
            }
        }
    }

    #[test]
    fn roots_are_symmetric_about_zero() {
        let abs = AbscissaSet::new(8).unwrap();
        let roots = abs.unscaled();
        let mut mirrored: Vec<f64> = roots.iter().map(|x| -x).collect();
        mirrored.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (a, b) in roots.iter().zip(mirrored.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn weights_sum_to_two_and_are_positive() {
        for n in 2..64 {
            let abs = AbscissaSet::new(n).unwrap();
            let w = WeightSet::new(&abs);
            let sum: f64 = w.weights().iter().sum();
            assert!((sum - 2.0).abs() < n as f64 * 1e-14);
            assert!(w.weights().iter().all(|&wk| wk > 0.0));
        }
    }

    #[test]
    fn integrates_polynomials_up_to_degree_two_n_minus_one() {
        for n in 2..=10 {
            let abs = AbscissaSet::new(n).unwrap();
            let w = WeightSet::new(&abs);
            let degree = 2 * n - 2; // x^degree, degree <= 2N-1
            let integral: f64 = abs
                .unscaled()
                .iter()
                .zip(w.weights())
                .map(|(&x, &wk)| wk * x.powi(degree as i32))
                .sum();
            let expected = 2.0 / (degree as f64 + 1.0);
            assert!(
                (integral - expected).abs() < 1e-10,
                "n={n} degree={degree} got {integral} expected {expected}"
            );
        }
    }

    #[test]
    fn rescale_to_minus_one_one_is_identity() {
        let mut abs = AbscissaSet::new(6).unwrap();
        abs.rescale(-1.0, 1.0);
        for (s, u) in abs.scaled().iter().zip(abs.unscaled()) {
            assert!((s - u).abs() < 1e-12);
        }
    }

    #[test]
    fn order_too_small_is_rejected() {
        assert!(matches!(
            AbscissaSet::new(1),
            Err(CoreError::OrderTooSmall(1))
        ));
    }
}
