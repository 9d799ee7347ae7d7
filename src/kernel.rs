//! Closed-form integrand kernels for the ten field components, in both the
//! 3-D (direct triple GLQ) and 2-D (analytic radial integration + 2-D GLQ)
//! formulations.
//!
//! Each kernel is a pure function of an observation point `P=(r,phi,lambda)`
//! and a tesseroid sample. For the 3-D variant the sample is a single
//! quadrature node `Q=(r',phi',lambda')`; for the 2-D variant the radial
//! integral over `[r_bot, r_top]` has already been carried out in closed
//! form, so the sample is `(phi',lambda')` together with the tesseroid's
//! radial bounds.
//!
//! Formulas are grounded on the reference `GxCalculator3D`/`GxzCalculator3D`
//! (3-D) and `Gxy`/`Gyy`/`Gyz`/`Gzz` `Calculator2D` (2-D) kernels, ported
//! term-for-term where a literal reference exists. `gxx` uses the trace-free
//! property of the gravity gradient tensor (`gxx+gyy+gzz=0` outside the
//! source mass) rather than an independent derivation; `gxz` is built by the
//! same phi/r differencing pattern the reference applies to `gyz`'s
//! lambda/r pair, substituting `psi_phi` for `psi_lambda` and dropping the
//! `1/cos(phi)` factor the east-pointing components carry. See DESIGN.md.

/// The field component being evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    V,
    Gx,
    Gy,
    Gz,
    Gxx,
    Gxy,
    Gxz,
    Gyy,
    Gyz,
    Gzz,
}

impl Component {
    /// All ten components, in the canonical order used by output and CLI
    /// naming.
    pub const ALL: [Component; 10] = [
        Component::V,
        Component::Gx,
        Component::Gy,
        Component::Gz,
        Component::Gxx,
        Component::Gxy,
        Component::Gxz,
        Component::Gyy,
        Component::Gyz,
        Component::Gzz,
    ];

    /// Unit-conversion factor applied by the evaluator's scale factor: 1 for
    /// the potential, SI-to-mGal for the gravity vector, SI-to-Eotvos for
    /// the gradient tensor.
    pub fn unit_factor(self) -> f64 {
        use crate::constants::{SI_TO_EOTVOS, SI_TO_MGAL};
        match self {
            Component::V => 1.0,
            Component::Gx | Component::Gy | Component::Gz => SI_TO_MGAL,
            _ => SI_TO_EOTVOS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Component::V => "v",
            Component::Gx => "gx",
            Component::Gy => "gy",
            Component::Gz => "gz",
            Component::Gxx => "gxx",
            Component::Gxy => "gxy",
            Component::Gxz => "gxz",
            Component::Gyy => "gyy",
            Component::Gyz => "gyz",
            Component::Gzz => "gzz",
        }
    }
}

/// Algorithm variant: direct 3-axis GLQ, or analytic radial integration with
/// 2-axis GLQ in latitude/longitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    ThreeD,
    TwoD,
}

impl Algorithm {
    /// Number of GLQ axes the variant uses (2 or 3), i.e. `D` in the scale
    /// factor `U . dphi . dlambda . [dr] . rho . G / 2^D`.
    pub fn num_axes(self) -> u32 {
        match self {
            Algorithm::ThreeD => 3,
            Algorithm::TwoD => 2,
        }
    }
}

/// The angular subexpressions shared by every kernel, for a fixed
/// observation latitude/longitude and a fixed quadrature sample
/// latitude/longitude. Computed once per (phi, lambda, phi', lambda') pair
/// and reused across components and, for the 2-D variant, across the radial
/// bounds.
#[derive(Clone, Copy, Debug)]
pub struct AngularGeometry {
    pub cos_phi: f64,
    pub sin_phi: f64,
    pub cos_phi_prime: f64,
    pub sin_phi_prime: f64,
    pub cos_delta_lambda: f64,
    pub sin_delta_lambda: f64,
    pub cos_psi: f64,
    pub psi_phi: f64,
    pub psi_lambda: f64,
}

impl AngularGeometry {
    pub fn new(phi: f64, lambda: f64, phi_prime: f64, lambda_prime: f64) -> Self {
        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_phi_prime, cos_phi_prime) = phi_prime.sin_cos();
        let delta_lambda = lambda - lambda_prime;
        let (sin_dl, cos_dl) = delta_lambda.sin_cos();
        let cos_psi = sin_phi * sin_phi_prime + cos_phi * cos_phi_prime * cos_dl;
        let psi_phi = cos_phi * sin_phi_prime - sin_phi * cos_phi_prime * cos_dl;
        let psi_lambda = -cos_phi * cos_phi_prime * sin_dl;
        Self {
            cos_phi,
            sin_phi,
            cos_phi_prime,
            sin_phi_prime,
            cos_delta_lambda: cos_dl,
            sin_delta_lambda: sin_dl,
            cos_psi,
            psi_phi,
            psi_lambda,
        }
    }

    /// `d(psi_phi)/d(lambda) = d(psi_lambda)/d(phi) = sin(phi) cos(phi') sin(dlambda)`.
    fn psi_phi_lambda(&self) -> f64 {
        self.sin_phi * self.cos_phi_prime * self.sin_delta_lambda
    }

    /// `d(psi_lambda)/d(lambda) = sin(phi) sin(phi') - cosPsi`.
    fn psi_lambda_lambda(&self) -> f64 {
        self.sin_phi * self.sin_phi_prime - self.cos_psi
    }
}

// ---------------------------------------------------------------------
// 3-D variant: direct kernels over (r, phi, lambda; r', phi', lambda').
// ---------------------------------------------------------------------

/// Evaluate the 3-D kernel `K_c(r, phi, lambda; r', phi', lambda')` for
/// component `c`, given the precomputed angular geometry and the pair of
/// radii.
pub fn kernel_3d(component: Component, g: &AngularGeometry, r: f64, r_prime: f64) -> f64 {
    let c = g.cos_psi;
    let l2 = r * r + r_prime * r_prime - 2.0 * r * r_prime * c;
    let l = l2.sqrt();
    let l3 = l2 * l;
    let l5 = l3 * l2;
    let volume = r_prime * r_prime * g.cos_phi_prime;
    let r_minus_rc = r - r_prime * c;
    let cc = g.cos_phi * g.cos_phi;

    match component {
        Component::V => volume / l,
        Component::Gx => volume * r_prime * g.psi_phi / l3,
        Component::Gy => volume * r_prime * g.psi_lambda / (g.cos_phi * l3),
        Component::Gz => volume * r_minus_rc / l3,
        Component::Gxx => {
            volume * (3.0 * r_prime * r_prime * g.psi_phi * g.psi_phi / l5 - 1.0 / l3)
        }
        Component::Gyy => {
            volume
                * (3.0 * r_prime * r_prime * g.psi_lambda * g.psi_lambda / (cc * l5) - 1.0 / l3)
        }
        Component::Gzz => volume * (3.0 * r_minus_rc * r_minus_rc / l5 - 1.0 / l3),
        Component::Gxy => {
            volume
                * (3.0 * r_prime * g.psi_phi * g.psi_lambda / (g.cos_phi * l5)
                    - g.sin_phi * g.psi_lambda / (r * cc * l3))
        }
        Component::Gxz => 3.0 * volume * r_prime * g.psi_phi * r_minus_rc / l5,
        Component::Gyz => 3.0 * volume * r_prime * g.psi_lambda * r_minus_rc / (g.cos_phi * l5),
    }
}

// ---------------------------------------------------------------------
// 2-D variant: analytic radial integral + 2-D GLQ over (phi', lambda').
// ---------------------------------------------------------------------

/// Shared scalar building blocks for the 2-D (analytic-in-r) kernels,
/// computed once per (observation point, sample angle, tesseroid radial
/// bounds) combination. Named to match the reference `Calculator2D`
/// sources: `rr1_l1 = r r1 / l1`, `sumt3`/`sumt6` the running partial sums
/// in the `BracketA` radial antiderivative, `k = 3 cosPsi^2 - 1`.
struct RadialGeometry {
    r: f64,
    cos_psi: f64,
    k: f64,
    r1: f64,
    r2: f64,
    l1: f64,
    l2: f64,
    rr1_l1: f64,
    rr2_l2: f64,
    lnbot: f64,
    lntop: f64,
    ln: f64,
    bracket_a: f64,
}

impl RadialGeometry {
    fn new(r: f64, cos_psi: f64, r1: f64, r2: f64) -> Self {
        let l1 = (r * r + r1 * r1 - 2.0 * r * r1 * cos_psi).sqrt();
        let l2 = (r * r + r2 * r2 - 2.0 * r * r2 * cos_psi).sqrt();
        let rr1_l1 = r * r1 / l1;
        let rr2_l2 = r * r2 / l2;
        let lnbot = l1 + r1 - r * cos_psi;
        let lntop = l2 + r2 - r * cos_psi;
        let ln = (lntop / lnbot).abs().ln();
        let k = 3.0 * cos_psi * cos_psi - 1.0;
        let sumt3 = l2 - l1 + cos_psi * (rr1_l1 - rr2_l2);
        let sumt6 = (r1 + l1) / (l1 * lnbot) - (r2 + l2) / (l2 * lntop);
        let bracket_a = rr1_l1 * r1 - rr2_l2 * r2
            + 3.0 * r * sumt3
            + 6.0 * r * r * cos_psi * ln
            + r * r * r * k * sumt6;
        Self {
            r,
            cos_psi,
            k,
            r1,
            r2,
            l1,
            l2,
            rr1_l1,
            rr2_l2,
            lnbot,
            lntop,
            ln,
            bracket_a,
        }
    }

    /// `KVr`, the r-related term of the `Gyy` metric expansion, ported
    /// literally from `GyyCalculator2D`'s own `KVr` building block.
    fn kv_r(&self) -> f64 {
        let r = self.r;
        (self.r2 * self.l2 - self.r1 * self.l1 + 3.0 * r * self.cos_psi * (self.l2 - self.l1)
            + r * r * self.k * self.ln
            - (self.r2.powi(3) / self.l2 + self.r1.powi(3) / self.l1))
            / r
    }
}

/// The V-specific radial antiderivative `F_V(r')`, evaluated at one radial
/// bound. Derived independently (verified by direct differentiation) since
/// no literal V kernel exists in the retrieved reference material.
/// `d(F_V)/d(r') = r'^2 / l`, so `V = cp . (F_V(r_top) - F_V(r_bot))`.
fn f_v(r: f64, c: f64, k: f64, r_prime: f64) -> f64 {
    let a = r * c;
    let l = (r * r + r_prime * r_prime - 2.0 * r * r_prime * c).sqrt();
    (r_prime + 3.0 * a) / 2.0 * l + (r * r * k) / 2.0 * (r_prime - a + l).ln()
}

/// `d(F_V)/dr`, holding `r'` fixed at one radial bound. Since
/// `d(F_V)/d(r') = r'^2/l`, differentiating under the integral sign gives
/// `gz`'s radial antiderivative as `-d(F_V)/dr`: `d/dr'[-d(F_V)/dr] =
/// -d/dr[r'^2/l] = r'^2(r - r'cosPsi)/l^3`, which is exactly the 3-D `Gz`
/// kernel (sans the `cosPhi'` factor applied outside). Derived independently
/// by direct differentiation of `f_v`; no literal 2-D `gz` kernel exists in
/// the retrieved reference material.
fn d_f_v_dr(r: f64, c: f64, k: f64, r_prime: f64) -> f64 {
    let a = r * c;
    let l = (r * r + r_prime * r_prime - 2.0 * r * r_prime * c).sqrt();
    let u = r_prime - a + l;
    let d_a = 1.5 * c * l + (r_prime + 3.0 * a) * (r - r_prime * c) / (2.0 * l);
    let d_b = r * k * u.ln() + (r * r * k / 2.0) * (r - r_prime * c - c * l) / (l * u);
    d_a + d_b
}

/// `gz`'s radial antiderivative, evaluated over `[r_bot, r_top]`:
/// `-[d(F_V)/dr]` from `r_bot` to `r_top`.
fn gz_radial(r: f64, c: f64, k: f64, r_bot: f64, r_top: f64) -> f64 {
    d_f_v_dr(r, c, k, r_bot) - d_f_v_dr(r, c, k, r_top)
}

/// Evaluate the 2-D kernel `K_c(r, phi, lambda; phi', lambda')` for
/// component `c`, given the precomputed angular geometry and the
/// tesseroid's radial bounds `(r_bot, r_top)`.
pub fn kernel_2d(component: Component, g: &AngularGeometry, r: f64, r_bot: f64, r_top: f64) -> f64 {
    let cp = g.cos_phi_prime;
    let rad = RadialGeometry::new(r, g.cos_psi, r_bot, r_top);

    match component {
        Component::V => cp * (f_v(r, g.cos_psi, rad.k, r_top) - f_v(r, g.cos_psi, rad.k, r_bot)),
        Component::Gx => cp * 0.5 * g.psi_phi * rad.bracket_a / r,
        Component::Gy => (cp / g.cos_phi) * 0.5 * g.psi_lambda * rad.bracket_a / r,
        Component::Gz => cp * gz_radial(r, g.cos_psi, rad.k, rad.r1, rad.r2),
        Component::Gzz => cp * gzz_2d(&rad),
        Component::Gyy => cp * gyy_2d(g, &rad),
        Component::Gxy => cp * gxy_2d(g, &rad),
        Component::Gyz => cp * gyz_2d(g, &rad),
        Component::Gxz => cp * gxz_2d(g, &rad),
        // Trace-free gravity gradient tensor: gxx + gyy + gzz = 0 away from
        // the source mass (Laplace's equation for the harmonic potential).
        // No independent closed form was retrieved for gxx in 2-D, so it is
        // derived from the two that were.
        Component::Gxx => {
            -cp * (gyy_2d(g, &rad) + gzz_2d(&rad))
        }
    }
}

/// Literal port of `GzzCalculator2D`'s `KV` (before the outer `cosPhil`
/// factor).
fn gzz_2d(rad: &RadialGeometry) -> f64 {
    let r = rad.r;
    let r_2 = r * r;
    let r1_2 = rad.r1 * rad.r1;
    let r2_2 = rad.r2 * rad.r2;
    let r1l1 = (r1_2 * rad.r1) / (2.0 * rad.l1);
    let r2l2 = (r2_2 * rad.r2) / (2.0 * rad.l2);
    (r1l1 - r2l2 - rad.r1 * rad.l1 + rad.r2 * rad.l2
        - r1l1 * (r_2 - r1_2) / (rad.l1 * rad.l1)
        + r2l2 * (r_2 - r2_2) / (rad.l2 * rad.l2)
        + 3.0 * r * rad.cos_psi * (rad.l2 - rad.l1)
        + r_2 * rad.k * rad.ln)
        / r_2
}

/// Literal port of `GyyCalculator2D`'s `KV` (before the outer `cosPhil`
/// factor).
fn gyy_2d(g: &AngularGeometry, rad: &RadialGeometry) -> f64 {
    let r = rad.r;
    let r_2 = r * r;
    let r1l1 = rad.r1 / rad.l1;
    let r2l2 = rad.r2 / rad.l2;
    let l1_2 = rad.l1 * rad.l1;
    let l2_2 = rad.l2 * rad.l2;
    let cos_psi_lamb = g.psi_lambda;
    let cos_psi_lamb_2 = cos_psi_lamb * cos_psi_lamb;
    let cos_psi_lamb_lamb = g.psi_lambda_lambda();

    let t1 = (r * r2l2 * r2l2 / rad.l2) * (r * rad.r2 * cos_psi_lamb_2 + l2_2 * cos_psi_lamb_lamb);
    let t2 = (r * r1l1 * r1l1 / rad.l1) * (r * rad.r1 * cos_psi_lamb_2 + l1_2 * cos_psi_lamb_lamb);
    let t3 = 3.0 * r_2 * cos_psi_lamb_2
        * (2.0 * (r1l1 - r2l2) + r * rad.cos_psi * ((r1l1 * r1l1 / rad.l1) - (r2l2 * r2l2 / rad.l2)));
    let t4 = 3.0 * r * cos_psi_lamb_lamb * (rad.l2 - rad.l1 + r * rad.cos_psi * (r1l1 - r2l2));
    let t5 = 6.0 * r_2 * rad.ln * (cos_psi_lamb_2 + cos_psi_lamb_lamb * rad.cos_psi);
    let t6 = r_2 * r * (12.0 * rad.cos_psi * cos_psi_lamb_2 + cos_psi_lamb_lamb * rad.k)
        * ((rad.r1 + rad.l1) / (rad.l1 * rad.lnbot) - (rad.r2 + rad.l2) / (rad.l2 * rad.lntop));
    let t7 = r_2 * r_2 * cos_psi_lamb_2 * rad.k
        * ((rad.r1 * rad.lnbot - (rad.r1 + rad.l1) * (r1l1 * rad.lnbot + rad.r1 + rad.l1))
            / (rad.l1 * rad.l1 * rad.lnbot * rad.lnbot)
            - (rad.r2 * rad.lntop - (rad.r2 + rad.l2) * (r2l2 * rad.lntop + rad.r2 + rad.l2))
                / (rad.l2 * rad.l2 * rad.lntop * rad.lntop));
    let kv_lamb_2 = 0.5 * (t2 - t1 + t3 + t4 + t5 + t6 - t7);

    let kv_phi = 0.5 * g.psi_phi * rad.bracket_a;
    let kv_r = rad.kv_r();
    let cc = g.cos_phi * g.cos_phi;
    (kv_lamb_2 + r * cc * kv_r - g.cos_phi * g.sin_phi * kv_phi) / (r_2 * cc)
}

/// Literal port of `GxyCalculator2D`'s `KV` (before the outer `cosPhil`
/// factor).
fn gxy_2d(g: &AngularGeometry, rad: &RadialGeometry) -> f64 {
    let r = rad.r;
    let r_2 = r * r;
    let l1_2 = rad.l1 * rad.l1;
    let l2_2 = rad.l2 * rad.l2;
    let cos_psi_phi_lamb = g.psi_phi_lambda();
    let cos_psi_phi_x_lamb = g.psi_phi * g.psi_lambda;

    let t1 = (rad.rr2_l2 * rad.r2 / l2_2) * (l2_2 * cos_psi_phi_lamb + r * rad.r2 * cos_psi_phi_x_lamb);
    let t2 = (rad.rr1_l1 * rad.r1 / l1_2) * (l1_2 * cos_psi_phi_lamb + r * rad.r1 * cos_psi_phi_x_lamb);
    let t3 = 3.0 * r * cos_psi_phi_lamb * (rad.l2 - rad.l1 + rad.cos_psi * (rad.rr1_l1 - rad.rr2_l2));
    let t4 = 6.0 * r_2 * rad.ln * (rad.cos_psi * cos_psi_phi_lamb + cos_psi_phi_x_lamb);
    let t5 = 3.0 * r * cos_psi_phi_x_lamb
        * (2.0 * (rad.rr1_l1 - rad.rr2_l2)
            + rad.cos_psi * g.psi_lambda * ((rad.rr1_l1 * rad.rr1_l1 / rad.l1) - (rad.rr2_l2 * rad.rr2_l2 / rad.l2)));
    let t6 = r_2 * r * (rad.k * cos_psi_phi_lamb + 12.0 * rad.cos_psi * cos_psi_phi_x_lamb)
        * ((rad.r1 + rad.l1) / (rad.l1 * rad.lnbot) - (rad.r2 + rad.l2) / (rad.l2 * rad.lntop));
    let t7 = r_2 * r_2 * rad.k * cos_psi_phi_x_lamb
        * ((rad.r1 * rad.lnbot - (rad.r1 + rad.l1) * ((rad.r1 / rad.l1) * rad.lnbot + rad.r1 + rad.l1))
            / (l1_2 * rad.lnbot * rad.lnbot)
            - (rad.r2 * rad.lntop - (rad.r2 + rad.l2) * ((rad.r2 / rad.l2) * rad.lntop + rad.r2 + rad.l2))
                / (l2_2 * rad.lntop * rad.lntop));
    let kv_phi_lamb = 0.5 * (t2 - t1 + t3 + t4 + t5 + t6 - t7);

    let kv_lamb = 0.5 * g.psi_lambda * rad.bracket_a;
    (kv_phi_lamb + (g.sin_phi / g.cos_phi) * kv_lamb) / (r_2 * g.cos_phi)
}

/// Literal port of `GyzCalculator2D`'s `KV` (before the outer `cosPhil`
/// factor).
fn gyz_2d(g: &AngularGeometry, rad: &RadialGeometry) -> f64 {
    let r = rad.r;
    let r1_2 = rad.r1 * rad.r1;
    let r2_2 = rad.r2 * rad.r2;
    let l1_2 = rad.l1 * rad.l1;
    let l2_2 = rad.l2 * rad.l2;
    let kv_lambr = (g.psi_lambda / r)
        * (rad.rr1_l1 * rad.r1 * r1_2 / l1_2 - rad.rr2_l2 * rad.r2 * r2_2 / l2_2 + rad.bracket_a);
    let kv_lamb = 0.5 * g.psi_lambda * rad.bracket_a;
    ((kv_lamb / r) - kv_lambr) / (r * g.cos_phi)
}

/// `gxz`: built by the same `phi`/`r` differencing pattern `GyzCalculator2D`
/// applies to `lambda`/`r`, substituting `psi_phi` for `psi_lambda` and
/// dropping the `1/cos(phi)` factor (the east-pointing longitude metric
/// correction does not apply to the north-pointing latitude direction). See
/// DESIGN.md for the justification.
fn gxz_2d(g: &AngularGeometry, rad: &RadialGeometry) -> f64 {
    let r = rad.r;
    let r1_2 = rad.r1 * rad.r1;
    let r2_2 = rad.r2 * rad.r2;
    let l1_2 = rad.l1 * rad.l1;
    let l2_2 = rad.l2 * rad.l2;
    let kv_phir = (g.psi_phi / r)
        * (rad.rr1_l1 * rad.r1 * r1_2 / l1_2 - rad.rr2_l2 * rad.r2 * r2_2 / l2_2 + rad.bracket_a);
    let kv_phi = 0.5 * g.psi_phi * rad.bracket_a;
    ((kv_phi / r) - kv_phir) / r
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const R: f64 = 6_378_137.0;

    #[test]
    fn three_d_and_two_d_v_agree_for_a_thin_shell() {
        // For a radially thin tesseroid, the 2-D analytic-radial result
        // should match the 3-D single-sample midpoint approximation.
        let phi = 0.0;
        let lambda = 0.0;
        let phi_prime = 0.01;
        let lambda_prime = 0.0;
        let g = AngularGeometry::new(phi, lambda, phi_prime, lambda_prime);
        let r = R + 10_000.0;
        let r_bot = R - 1.0;
        let r_top = R + 1.0;
        let r_mid = R;

        let v_2d = kernel_2d(Component::V, &g, r, r_bot, r_top);
        let v_3d_mid = kernel_3d(Component::V, &g, r, r_mid) * (r_top - r_bot);
        assert!(
            (v_2d - v_3d_mid).abs() / v_3d_mid.abs() < 1e-3,
            "v_2d={v_2d} v_3d_mid={v_3d_mid}"
        );
    }

    #[test]
    fn gz_is_positive_for_mass_below_the_observer() {
        let g = AngularGeometry::new(0.0, 0.0, 0.0, 0.0);
        let r = R + 10_000.0;
        let val = kernel_2d(Component::Gz, &g, r, R - 10_000.0, R);
        assert!(val > 0.0, "gz should be positive for mass straight below: {val}");
    }

    #[test]
    fn gxx_plus_gyy_plus_gzz_is_trace_free_in_3d() {
        let g = AngularGeometry::new(0.3, 0.1, 0.31, 0.12);
        let r = R + 50_000.0;
        let r_prime = R - 5_000.0;
        let trace = kernel_3d(Component::Gxx, &g, r, r_prime)
            + kernel_3d(Component::Gyy, &g, r, r_prime)
            + kernel_3d(Component::Gzz, &g, r, r_prime);
        assert!(trace.abs() < 1e-20, "trace should vanish, got {trace}");
    }

    #[test]
    fn gx_matches_the_literal_reference_kernel() {
        // KV = ((sinPhil*cosPhi - cosPhil*sinPhi*cosLambLambl)*rl_2*rl*cosPhil) / l^3
        let phi = 0.2;
        let lambda = 0.05;
        let phi_prime = 0.05;
        let lambda_prime = 0.0;
        let g = AngularGeometry::new(phi, lambda, phi_prime, lambda_prime);
        let r = R + 1_000.0;
        let r_prime = R - 2_000.0;
        let cos_ll = (lambda - lambda_prime).cos();
        let l = (r * r + r_prime * r_prime - 2.0 * r * r_prime * g.cos_psi).sqrt();
        let reference = ((phi_prime.sin() * phi.cos() - phi_prime.cos() * phi.sin() * cos_ll)
            * r_prime
            * r_prime
            * r_prime
            * phi_prime.cos())
            / (l * l * l);
        let ours = kernel_3d(Component::Gx, &g, r, r_prime);
        assert!((ours - reference).abs() / reference.abs() < 1e-10);
    }

    #[test]
    fn all_components_are_finite_away_from_the_mass() {
        let g = AngularGeometry::new(0.1, 0.2, 0.15, 0.25);
        let r = R + 20_000.0;
        for c in Component::ALL {
            assert!(kernel_3d(c, &g, r, R - 1_000.0).is_finite());
            assert!(kernel_2d(c, &g, r, R - 2_000.0, R - 1_000.0).is_finite());
        }
    }

    #[test]
    fn at_the_pole_the_cos_phi_prime_factor_vanishes() {
        let g = AngularGeometry::new(0.0, 0.0, PI / 2.0, 0.0);
        let r = R + 1_000.0;
        assert_eq!(kernel_3d(Component::V, &g, r, R - 1_000.0), 0.0);
    }
}
