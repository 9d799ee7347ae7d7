//! Tesseroid mass model: a single validated volume element and an ordered
//! collection of them, plus the whitespace-separated text loader.

use crate::constants::MEAN_EARTH_RADIUS;
use crate::error::{CoreError, CoreResult};
use log::warn;
use std::fs;
use std::path::Path;

/// A single tesseroid: bounded by two meridians, two parallels and two
/// concentric spherical surfaces, with a constant density.
///
/// Angular bounds are stored in radians; `top`/`bottom` are depths in
/// metres, positive downward from the mean Earth radius. Invariants
/// (`w < e`, `s < n`, `top < bottom`) are checked once, at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tesseroid {
    pub w: f64,
    pub e: f64,
    pub s: f64,
    pub n: f64,
    pub top: f64,
    pub bottom: f64,
    pub density: f64,
}

impl Tesseroid {
    /// Construct a tesseroid from bounds in **degrees** and depths in
    /// metres, validating the monotonicity invariants.
    pub fn new(
        w_deg: f64,
        e_deg: f64,
        s_deg: f64,
        n_deg: f64,
        top: f64,
        bottom: f64,
        density: f64,
    ) -> CoreResult<Self> {
        if !(w_deg < e_deg) {
            return Err(CoreError::InvalidBounds(format!(
                "W ({w_deg}) must be < E ({e_deg})"
            )));
        }
        if !(s_deg < n_deg) {
            return Err(CoreError::InvalidBounds(format!(
                "S ({s_deg}) must be < N ({n_deg})"
            )));
        }
        if !(top < bottom) {
            return Err(CoreError::InvalidBounds(format!(
                "top ({top}) must be < bottom ({bottom})"
            )));
        }
        Ok(Self {
            w: w_deg.to_radians(),
            e: e_deg.to_radians(),
            s: s_deg.to_radians(),
            n: n_deg.to_radians(),
            top,
            bottom,
            density,
        })
    }

    /// Radius of the tesseroid's outer (shallower) surface.
    pub fn r_top(&self) -> f64 {
        MEAN_EARTH_RADIUS - self.top
    }

    /// Radius of the tesseroid's inner (deeper) surface. `r_bot < r_top`.
    pub fn r_bottom(&self) -> f64 {
        MEAN_EARTH_RADIUS - self.bottom
    }

    pub fn delta_lon(&self) -> f64 {
        self.e - self.w
    }

    pub fn delta_lat(&self) -> f64 {
        self.n - self.s
    }
}

/// An ordered collection of tesseroids. Order does not affect results:
/// summation over the model is commutative within double-precision
/// rounding.
#[derive(Clone, Debug, Default)]
pub struct Model {
    tesseroids: Vec<Tesseroid>,
}

impl Model {
    pub fn new() -> Self {
        Self {
            tesseroids: Vec::new(),
        }
    }

    pub fn push(&mut self, t: Tesseroid) {
        self.tesseroids.push(t);
    }

    pub fn tesseroids(&self) -> &[Tesseroid] {
        &self.tesseroids
    }

    pub fn is_empty(&self) -> bool {
        self.tesseroids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tesseroids.len()
    }

    /// Load a model from a text file: seven whitespace-separated fields per
    /// line, `W E S N top bottom density`. Lines starting with `#` are
    /// comments. Lines with the wrong field count, unparsable numbers, or
    /// that fail the tesseroid invariants are skipped with a warning;
    /// everything else is appended.
    pub fn load_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|source| CoreError::FileOpen {
            path: path_ref.display().to_string(),
            source,
        })?;
        let model = Self::parse(&contents);
        if model.is_empty() {
            return Err(CoreError::EmptyModel);
        }
        Ok(model)
    }

    /// Parse model text, as [`load_file`](Self::load_file) does, without
    /// touching the filesystem. Never fails: an input with no valid lines
    /// yields an empty model, which the caller (or `load_file`) is
    /// responsible for rejecting.
    pub fn parse(contents: &str) -> Self {
        let mut model = Self::new();
        for (line_no, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 7 {
                warn!("model line {}: expected 7 fields, found {}, skipping", line_no + 1, fields.len());
                continue;
            }
            let parsed: Result<Vec<f64>, _> = fields.iter().map(|f| f.parse::<f64>()).collect();
            let values = match parsed {
                Ok(v) => v,
                Err(_) => {
                    warn!("model line {}: unparsable number, skipping", line_no + 1);
                    continue;
                }
            };
            let (w, e, s, n, top, bottom, density) =
                (values[0], values[1], values[2], values[3], values[4], values[5], values[6]);
            match Tesseroid::new(w, e, s, n, top, bottom, density) {
                Ok(t) => model.push(t),
                Err(err) => warn!("model line {}: {err}, skipping", line_no + 1),
            }
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_monotonic_bounds() {
        assert!(Tesseroid::new(1.0, 0.0, -1.0, 1.0, 0.0, 1000.0, 2670.0).is_err());
        assert!(Tesseroid::new(-1.0, 1.0, 1.0, -1.0, 0.0, 1000.0, 2670.0).is_err());
        assert!(Tesseroid::new(-1.0, 1.0, -1.0, 1.0, 1000.0, 0.0, 2670.0).is_err());
    }

    #[test]
    fn radii_are_derived_from_depth() {
        let t = Tesseroid::new(-1.0, 1.0, -1.0, 1.0, 0.0, 10_000.0, 2670.0).unwrap();
        assert!((t.r_top() - MEAN_EARTH_RADIUS).abs() < 1e-9);
        assert!((t.r_bottom() - (MEAN_EARTH_RADIUS - 10_000.0)).abs() < 1e-9);
        assert!(t.r_bottom() < t.r_top());
    }

    #[test]
    fn parse_skips_comments_and_invalid_lines() {
        let text = "\
# a comment
-1 1 -1 1 0 10000 2670
garbage line with wrong field count
1 -1 -1 1 0 10000 2670
";
        let model = Model::parse(text);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn parse_all_invalid_yields_empty_model() {
        let model = Model::parse("# only comments\n");
        assert!(model.is_empty());
    }
}
