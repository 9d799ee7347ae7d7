//! # tesseroids
//!
//! Gravitational potential, gravity vector and gravity-gradient tensor
//! forward modelling for tesseroid (spherical-prism) mass models, by
//! Gauss-Legendre quadrature in either a direct 3-D or an analytic-radial
//! 2-D formulation.

pub mod cli;
pub mod constants;
pub mod error;
pub mod evaluator;
pub mod grid;
pub mod kernel;
pub mod model;
pub mod quadrature;
pub mod subdivision;

pub use error::{CliError, CliResult, CoreError, CoreResult};
pub use evaluator::{evaluate, Orders};
pub use grid::{GridNode, GridSpec, ResultGrid};
pub use kernel::{Algorithm, Component};
pub use model::{Model, Tesseroid};
pub use quadrature::{AbscissaSet, WeightSet};
