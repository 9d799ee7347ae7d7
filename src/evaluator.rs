//! The field evaluator: for a chosen component and algorithm variant,
//! iterates model x grid, accumulates the quadrature of the kernel into the
//! result grid, and applies the scale factor and unit conversion.

use crate::constants::GRAVITATIONAL_CONSTANT;
use crate::error::{CoreError, CoreResult};
use crate::grid::{GridSpec, ResultGrid};
use crate::kernel::{kernel_2d, kernel_3d, Algorithm, AngularGeometry, Component};
use crate::model::{Model, Tesseroid};
use crate::quadrature::{AbscissaSet, WeightSet};
use itertools::iproduct;
use rayon::prelude::*;

/// Gauss-Legendre orders along each axis: `(n_lat, n_lon, n_r)`. `n_r` is
/// ignored by the 2-D algorithm.
#[derive(Clone, Copy, Debug)]
pub struct Orders {
    pub lat: usize,
    pub lon: usize,
    pub r: usize,
}

/// `evaluate(model, grid_spec, component, algorithm, orders) -> ResultGrid`.
///
/// Summation order is element-outer, node-inner, quadrature-innermost
/// (matching the contract); the node loop is parallelised with `rayon`
/// since each tesseroid contributes an additive, independent scalar to a
/// single grid cell.
pub fn evaluate(
    model: &Model,
    grid: &GridSpec,
    component: Component,
    algorithm: Algorithm,
    orders: Orders,
) -> CoreResult<ResultGrid> {
    if model.is_empty() {
        return Err(CoreError::EmptyModel);
    }

    let mut result = ResultGrid::zeroed(grid);
    let r_obs = grid.radius();

    let lat_abscissas = AbscissaSet::new(orders.lat)?;
    let lat_weights = WeightSet::new(&lat_abscissas);
    let lon_abscissas = AbscissaSet::new(orders.lon)?;
    let lon_weights = WeightSet::new(&lon_abscissas);
    let r_tables = if algorithm == Algorithm::ThreeD {
        let abs = AbscissaSet::new(orders.r)?;
        let w = WeightSet::new(&abs);
        Some((abs, w))
    } else {
        None
    };

    for tess in model.tesseroids() {
        accumulate_tesseroid(
            tess,
            component,
            algorithm,
            r_obs,
            &lat_abscissas,
            &lat_weights,
            &lon_abscissas,
            &lon_weights,
            r_tables.as_ref(),
            &mut result,
        );
    }

    Ok(result)
}

#[allow(clippy::too_many_arguments)]
fn accumulate_tesseroid(
    tess: &Tesseroid,
    component: Component,
    algorithm: Algorithm,
    r_obs: f64,
    lat_abscissas: &AbscissaSet,
    lat_weights: &WeightSet,
    lon_abscissas: &AbscissaSet,
    lon_weights: &WeightSet,
    r_tables: Option<&(AbscissaSet, WeightSet)>,
    result: &mut ResultGrid,
) {
    // Tesseroid-local rescaled copies: the spec requires each tesseroid
    // iteration to own its scaled abscissas rather than share a single
    // mutable buffer, so a parallel node loop can safely borrow them.
    let mut lat_abs = lat_abscissas.clone();
    lat_abs.rescale(tess.s, tess.n);
    let mut lon_abs = lon_abscissas.clone();
    lon_abs.rescale(tess.w, tess.e);

    let delta_phi = tess.delta_lat();
    let delta_lambda = tess.delta_lon();
    let r_bot = tess.r_bottom();
    let r_top = tess.r_top();
    let num_axes = algorithm.num_axes();
    let unit_factor = component.unit_factor();

    let scale_factor = match algorithm {
        Algorithm::TwoD => {
            unit_factor * delta_phi * delta_lambda * tess.density * GRAVITATIONAL_CONSTANT
                / 2f64.powi(num_axes as i32)
        }
        Algorithm::ThreeD => {
            let delta_r = r_top - r_bot;
            unit_factor
                * delta_phi
                * delta_lambda
                * delta_r
                * tess.density
                * GRAVITATIONAL_CONSTANT
                / 2f64.powi(num_axes as i32)
        }
    };

    match algorithm {
        Algorithm::TwoD => {
            result.nodes_mut().par_iter_mut().for_each(|node| {
                let phi = node.lat.to_radians();
                let lambda = node.lon.to_radians();
                let sum: f64 = iproduct!(
                    lat_abs.scaled().iter().zip(lat_weights.weights()),
                    lon_abs.scaled().iter().zip(lon_weights.weights())
                )
                .map(|((&phi_prime, &w_lat), (&lambda_prime, &w_lon))| {
                    let g = AngularGeometry::new(phi, lambda, phi_prime, lambda_prime);
                    w_lat * w_lon * kernel_2d(component, &g, r_obs, r_bot, r_top)
                })
                .sum();
                node.value += sum * scale_factor;
            });
        }
        Algorithm::ThreeD => {
            let (r_abscissas, r_weights) = r_tables.expect("3-D algorithm requires radial tables");
            let mut r_abs = r_abscissas.clone();
            r_abs.rescale(r_bot, r_top);
            result.nodes_mut().par_iter_mut().for_each(|node| {
                let phi = node.lat.to_radians();
                let lambda = node.lon.to_radians();
                let sum: f64 = iproduct!(
                    lat_abs.scaled().iter().zip(lat_weights.weights()),
                    lon_abs.scaled().iter().zip(lon_weights.weights()),
                    r_abs.scaled().iter().zip(r_weights.weights())
                )
                .map(|((&phi_prime, &w_lat), (&lambda_prime, &w_lon), (&r_prime, &w_r))| {
                    let g = AngularGeometry::new(phi, lambda, phi_prime, lambda_prime);
                    w_lat * w_lon * w_r * kernel_3d(component, &g, r_obs, r_prime)
                })
                .sum();
                node.value += sum * scale_factor;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tesseroid;

    fn unit_tesseroid() -> Model {
        let mut m = Model::new();
        m.push(Tesseroid::new(-0.5, 0.5, -0.5, 0.5, 0.0, 10_000.0, 2670.0).unwrap());
        m
    }

    fn default_orders() -> Orders {
        Orders { lat: 5, lon: 5, r: 5 }
    }

    #[test]
    fn scenario_a_single_tesseroid_vertical_gravity() {
        let model = unit_tesseroid();
        let grid = GridSpec::new(-1.0, 1.0, -1.0, 1.0, 3, 3, 10_000.0).unwrap();
        let result = evaluate(&model, &grid, Component::Gz, Algorithm::TwoD, default_orders()).unwrap();
        let centre = result.node(1, 1).value;
        assert!(
            (centre - 0.112).abs() / 0.112 < 0.01,
            "expected gz ~= 0.112 mGal, got {centre}"
        );
    }

    #[test]
    fn scenario_c_zero_density_model_is_exactly_zero() {
        let mut model = Model::new();
        model.push(Tesseroid::new(-1.0, 1.0, -1.0, 1.0, 0.0, 10_000.0, 0.0).unwrap());
        let grid = GridSpec::new(-2.0, 2.0, -2.0, 2.0, 3, 3, 0.0).unwrap();
        let result = evaluate(&model, &grid, Component::Gz, Algorithm::TwoD, default_orders()).unwrap();
        assert!(result.nodes().iter().all(|n| n.value == 0.0));
    }

    #[test]
    fn scenario_d_empty_model_is_an_error() {
        let model = Model::new();
        let grid = GridSpec::new(-1.0, 1.0, -1.0, 1.0, 3, 3, 0.0).unwrap();
        assert!(matches!(
            evaluate(&model, &grid, Component::Gz, Algorithm::TwoD, default_orders()),
            Err(CoreError::EmptyModel)
        ));
    }

    #[test]
    fn linearity_of_two_disjoint_tesseroids() {
        let t1 = Tesseroid::new(-1.0, 0.0, -1.0, 0.0, 0.0, 5_000.0, 2670.0).unwrap();
        let t2 = Tesseroid::new(0.0, 1.0, 0.0, 1.0, 0.0, 5_000.0, 2900.0).unwrap();
        let grid = GridSpec::new(-2.0, 2.0, -2.0, 2.0, 3, 3, 20_000.0).unwrap();

        let mut m1 = Model::new();
        m1.push(t1);
        let mut m2 = Model::new();
        m2.push(t2);
        let mut both = Model::new();
        both.push(t1);
        both.push(t2);

        let r1 = evaluate(&m1, &grid, Component::Gz, Algorithm::TwoD, default_orders()).unwrap();
        let r2 = evaluate(&m2, &grid, Component::Gz, Algorithm::TwoD, default_orders()).unwrap();
        let rboth = evaluate(&both, &grid, Component::Gz, Algorithm::TwoD, default_orders()).unwrap();

        for ((a, b), c) in r1.nodes().iter().zip(r2.nodes()).zip(rboth.nodes()) {
            let sum = a.value + b.value;
            assert!(
                (sum - c.value).abs() <= 1e-9 * sum.abs().max(1e-12),
                "sum={sum} combined={}",
                c.value
            );
        }
    }

    #[test]
    fn far_field_limit_matches_point_mass() {
        use crate::constants::{GRAVITATIONAL_CONSTANT, MEAN_EARTH_RADIUS, SI_TO_MGAL};
        let t = Tesseroid::new(-0.01, 0.01, -0.01, 0.01, 0.0, 100.0, 2670.0).unwrap();
        let mass = {
            let delta_phi = t.delta_lat();
            let delta_lambda = t.delta_lon();
            let r_top = t.r_top();
            let r_bot = t.r_bottom();
            // approximate volume of a thin tesseroid: r^2 cos(phi) dphi dlambda dr
            let avg_r = (r_top + r_bot) / 2.0;
            avg_r * avg_r * delta_phi * delta_lambda * (r_top - r_bot) * t.density
        };
        let mut model = Model::new();
        model.push(t);
        let height = 5_000_000.0; // far above the small tesseroid
        let grid = GridSpec::new(-0.01, 0.01, -0.01, 0.01, 2, 2, height).unwrap();
        let result = evaluate(&model, &grid, Component::Gz, Algorithm::TwoD, default_orders()).unwrap();
        let d = MEAN_EARTH_RADIUS + height - MEAN_EARTH_RADIUS;
        let expected_mgal = GRAVITATIONAL_CONSTANT * mass / (d * d) * SI_TO_MGAL;
        let got = result.node(0, 0).value;
        assert!(
            (got - expected_mgal).abs() / expected_mgal.abs() < 0.2,
            "expected ~={expected_mgal} got={got}"
        );
    }

    #[test]
    fn randomized_linearity_holds_across_many_tesseroid_pairs() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let grid = GridSpec::new(-3.0, 3.0, -3.0, 3.0, 2, 2, 50_000.0).unwrap();

        for _ in 0..20 {
            let w1 = rng.gen_range(-2.0..0.0);
            let w2 = rng.gen_range(0.0..2.0);
            let t1 = Tesseroid::new(w1, w1 + 0.5, -0.5, 0.5, 0.0, 5_000.0, rng.gen_range(1000.0..3000.0)).unwrap();
            let t2 = Tesseroid::new(w2, w2 + 0.5, -0.5, 0.5, 0.0, 5_000.0, rng.gen_range(1000.0..3000.0)).unwrap();

            let mut m1 = Model::new();
            m1.push(t1);
            let mut m2 = Model::new();
            m2.push(t2);
            let mut both = Model::new();
            both.push(t1);
            both.push(t2);

            let r1 = evaluate(&m1, &grid, Component::Gz, Algorithm::TwoD, default_orders()).unwrap();
            let r2 = evaluate(&m2, &grid, Component::Gz, Algorithm::TwoD, default_orders()).unwrap();
            let rboth = evaluate(&both, &grid, Component::Gz, Algorithm::TwoD, default_orders()).unwrap();

            for ((a, b), c) in r1.nodes().iter().zip(r2.nodes()).zip(rboth.nodes()) {
                let sum = a.value + b.value;
                assert!((sum - c.value).abs() <= 1e-9 * sum.abs().max(1e-12));
            }
        }
    }
}
