//! Error taxonomy for the tesseroid forward-modelling core.
//!
//! The core library never terminates the process; it reports failures as a
//! tagged [`CoreError`] and lets collaborators (the model loader, the CLI
//! binaries) decide how to surface them.

use thiserror::Error;

/// Errors the quadrature, model and evaluator layers can report.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A tesseroid or grid specification violates a monotonicity invariant
    /// (`W<E`, `S<N`, `top<bottom`) at construction time.
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    /// The evaluator was invoked before bounds, height or dimensions were
    /// supplied.
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// The model file could not be opened.
    #[error("could not open model file {path}: {source}")]
    FileOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The loader produced zero valid tesseroids.
    #[error("model is empty: no valid tesseroids were loaded")]
    EmptyModel,

    /// A Gauss-Legendre order below 2 was requested.
    #[error("quadrature order too small: {0} (must be >= 2)")]
    OrderTooSmall(usize),
}

/// Errors surfaced by the CLI flag parser. Kept distinct from [`CoreError`]
/// because CLI failures are always fatal and always followed by a usage
/// message, never a tagged-result recovery path.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("unrecognized flag: {0}")]
    UnrecognizedFlag(String),

    #[error("malformed value for {flag}: {value}")]
    MalformedValue { flag: String, value: String },

    #[error("duplicated flag: {0}")]
    DuplicatedFlag(String),

    #[error("missing required flag: {0}")]
    MissingFlag(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type CoreResult<T> = Result<T, CoreError>;
pub type CliResult<T> = Result<T, CliError>;
