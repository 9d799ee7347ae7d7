//! Tesseroid subdivision: split a single tesseroid into `n_lon * n_lat * n_r`
//! equal sub-tesseroids of the same density. Used both as a standalone tool
//! (`tessdivmod`) and, potentially, by a future adaptive evaluator.

use crate::error::CoreResult;
use crate::model::Tesseroid;

/// Split `tess` into a grid of `n_lon * n_lat * n_r` sub-tesseroids, each
/// `1/n_lon` the longitude span, `1/n_lat` the latitude span and `1/n_r` the
/// radial (top/bottom) span of the original, carrying the same density.
///
/// Sub-tesseroids are produced radial-outer, latitude-middle,
/// longitude-inner, matching the provenance ordering the subdivision tool
/// writes to its output header.
pub fn subdivide(tess: &Tesseroid, n_lon: usize, n_lat: usize, n_r: usize) -> CoreResult<Vec<Tesseroid>> {
    let w_deg = tess.w.to_degrees();
    let e_deg = tess.e.to_degrees();
    let s_deg = tess.s.to_degrees();
    let n_deg = tess.n.to_degrees();

    let lon_step = (e_deg - w_deg) / n_lon as f64;
    let lat_step = (n_deg - s_deg) / n_lat as f64;
    let depth_step = (tess.bottom - tess.top) / n_r as f64;

    let mut out = Vec::with_capacity(n_lon * n_lat * n_r);
    for k in 0..n_r {
        let top = tess.top + k as f64 * depth_step;
        let bottom = top + depth_step;
        for i in 0..n_lat {
            let s = s_deg + i as f64 * lat_step;
            let n = s + lat_step;
            for j in 0..n_lon {
                let w = w_deg + j as f64 * lon_step;
                let e = w + lon_step;
                out.push(Tesseroid::new(w, e, s, n, top, bottom, tess.density)?);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdivision_preserves_total_span_and_count() {
        let t = Tesseroid::new(-2.0, 2.0, -1.0, 1.0, 0.0, 9000.0, 2670.0).unwrap();
        let parts = subdivide(&t, 4, 2, 3).unwrap();
        assert_eq!(parts.len(), 4 * 2 * 3);

        let min_w = parts.iter().map(|p| p.w).fold(f64::INFINITY, f64::min);
        let max_e = parts.iter().map(|p| p.e).fold(f64::NEG_INFINITY, f64::max);
        let min_s = parts.iter().map(|p| p.s).fold(f64::INFINITY, f64::min);
        let max_n = parts.iter().map(|p| p.n).fold(f64::NEG_INFINITY, f64::max);
        let min_top = parts.iter().map(|p| p.top).fold(f64::INFINITY, f64::min);
        let max_bottom = parts.iter().map(|p| p.bottom).fold(f64::NEG_INFINITY, f64::max);

        assert!((min_w - t.w).abs() < 1e-9);
        assert!((max_e - t.e).abs() < 1e-9);
        assert!((min_s - t.s).abs() < 1e-9);
        assert!((max_n - t.n).abs() < 1e-9);
        assert!((min_top - t.top).abs() < 1e-9);
        assert!((max_bottom - t.bottom).abs() < 1e-9);

        for p in &parts {
            assert_eq!(p.density, t.density);
        }
    }

    #[test]
    fn trivial_one_by_one_by_one_subdivision_is_the_original() {
        let t = Tesseroid::new(-1.0, 1.0, -1.0, 1.0, 0.0, 5000.0, 3000.0).unwrap();
        let parts = subdivide(&t, 1, 1, 1).unwrap();
        assert_eq!(parts.len(), 1);
        assert!((parts[0].w - t.w).abs() < 1e-9);
        assert!((parts[0].bottom - t.bottom).abs() < 1e-9);
    }
}
