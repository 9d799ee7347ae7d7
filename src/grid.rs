//! The regular observation grid and the companion result grid the evaluator
//! fills in.

use crate::constants::MEAN_EARTH_RADIUS;
use crate::error::{CoreError, CoreResult};
use ndarray::Array2;

/// An implementation-chosen cap on `nlon * nlat`, guarding against
/// accidental multi-gigabyte allocations from a typo'd `-B` flag.
pub const MAX_GRID_NODES: usize = 1 << 24;

/// A regular longitude/latitude grid at a single height above the sphere.
#[derive(Clone, Copy, Debug)]
pub struct GridSpec {
    pub w: f64,
    pub e: f64,
    pub s: f64,
    pub n: f64,
    pub nlon: usize,
    pub nlat: usize,
    pub height: f64,
}

impl GridSpec {
    pub fn new(
        w_deg: f64,
        e_deg: f64,
        s_deg: f64,
        n_deg: f64,
        nlon: usize,
        nlat: usize,
        height: f64,
    ) -> CoreResult<Self> {
        if !(w_deg < e_deg) {
            return Err(CoreError::InvalidBounds(format!(
                "grid W ({w_deg}) must be < E ({e_deg})"
            )));
        }
        if !(s_deg < n_deg) {
            return Err(CoreError::InvalidBounds(format!(
                "grid S ({s_deg}) must be < N ({n_deg})"
            )));
        }
        if nlon < 2 || nlat < 2 {
            return Err(CoreError::InvalidBounds(
                "grid dimensions nlon and nlat must both be >= 2".to_string(),
            ));
        }
        if nlon.saturating_mul(nlat) > MAX_GRID_NODES {
            return Err(CoreError::InvalidBounds(format!(
                "grid has {}x{} = {} nodes, exceeding the cap of {MAX_GRID_NODES}",
                nlon,
                nlat,
                nlon * nlat
            )));
        }
        Ok(Self {
            w: w_deg,
            e: e_deg,
            s: s_deg,
            n: n_deg,
            nlon,
            nlat,
            height,
        })
    }

    /// Longitude of node column `j`, in degrees.
    pub fn lon_at(&self, j: usize) -> f64 {
        self.w + (j as f64) * (self.e - self.w) / (self.nlon as f64 - 1.0)
    }

    /// Latitude of node row `i`, in degrees.
    pub fn lat_at(&self, i: usize) -> f64 {
        self.s + (i as f64) * (self.n - self.s) / (self.nlat as f64 - 1.0)
    }

    /// Observation radius, common to every node: mean Earth radius plus
    /// height.
    pub fn radius(&self) -> f64 {
        MEAN_EARTH_RADIUS + self.height
    }
}

/// One grid node's coordinates plus the evaluator's accumulated value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridNode {
    pub lon: f64,
    pub lat: f64,
    pub value: f64,
}

/// An `nlat x nlon` array of `(lon, lat, value)` triples, row index =
/// latitude index, column index = longitude index.
#[derive(Clone, Debug)]
pub struct ResultGrid {
    nodes: Array2<GridNode>,
}

impl ResultGrid {
    /// Zero-initialised grid with each cell's coordinate set from `spec`.
    pub fn zeroed(spec: &GridSpec) -> Self {
        let nodes = Array2::from_shape_fn((spec.nlat, spec.nlon), |(i, j)| GridNode {
            lon: spec.lon_at(j),
            lat: spec.lat_at(i),
            value: 0.0,
        });
        Self { nodes }
    }

    pub fn nlon(&self) -> usize {
        self.nodes.ncols()
    }

    pub fn nlat(&self) -> usize {
        self.nodes.nrows()
    }

    /// Flat row-major view of the grid (row = latitude, column = longitude).
    pub fn nodes(&self) -> &[GridNode] {
        self.nodes
            .as_slice()
            .expect("ResultGrid is always allocated in standard (row-major) layout")
    }

    pub fn nodes_mut(&mut self) -> &mut [GridNode] {
        self.nodes
            .as_slice_mut()
            .expect("ResultGrid is always allocated in standard (row-major) layout")
    }

    pub fn node(&self, row: usize, col: usize) -> &GridNode {
        &self.nodes[(row, col)]
    }

    /// Rows of the grid, latitude-outer, longitude-inner, matching the
    /// output format (one blank line between rows).
    pub fn rows(&self) -> impl Iterator<Item = &[GridNode]> {
        self.nodes().chunks(self.nlon())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_coordinates_span_the_bounds() {
        let spec = GridSpec::new(-1.0, 1.0, -1.0, 1.0, 3, 3, 0.0).unwrap();
        let grid = ResultGrid::zeroed(&spec);
        assert_eq!(grid.node(0, 0).lon, -1.0);
        assert_eq!(grid.node(0, 0).lat, -1.0);
        assert_eq!(grid.node(2, 2).lon, 1.0);
        assert_eq!(grid.node(2, 2).lat, 1.0);
        assert!(grid.nodes().iter().all(|n| n.value == 0.0));
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(GridSpec::new(-1.0, 1.0, -1.0, 1.0, 1, 3, 0.0).is_err());
    }

    #[test]
    fn rejects_oversized_grid() {
        assert!(GridSpec::new(-1.0, 1.0, -1.0, 1.0, 1 << 13, 1 << 13, 0.0).is_err());
    }
}
