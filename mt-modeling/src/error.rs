//! Error types for model generation
//!
//! Generator parameters are validated eagerly at construction; microgrid
//! construction failures pass through from mt-core.

use mt_core::MtError;
use thiserror::Error;

/// Result type alias for mt-modeling operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Error type for synthetic model generators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A generator needs at least one layer
    #[error("at least one layer is required")]
    EmptyLayers,

    /// Per-layer parameter vectors must agree in length
    #[error(
        "per-layer parameters must have equal lengths: power_max={power_max}, \
         power_min={power_min}, exist_probability={probability}, resistivity={resistivity}"
    )]
    ParameterLengthMismatch {
        power_max: usize,
        power_min: usize,
        probability: usize,
        resistivity: usize,
    },

    /// Layer power bounds are inverted or negative
    #[error("layer {layer}: power range [{min}, {max}] m is invalid")]
    InvalidPowerRange { layer: usize, min: f64, max: f64 },

    /// Existence probability outside [0, 1]
    #[error("layer {layer}: existence probability {value} is outside [0, 1]")]
    InvalidProbability { layer: usize, value: f64 },

    /// Layer resistivity must be strictly positive
    #[error("layer {layer}: resistivity must be positive, got {value} Ohm*m")]
    NonPositiveResistivity { layer: usize, value: f64 },

    /// Resistivity sampling range is inverted or non-positive
    #[error("resistivity range ({min}, {max}) Ohm*m is invalid")]
    InvalidResistivityRange { min: f64, max: f64 },

    /// Boundary walk smoothness must be strictly positive
    #[error("smoothness alpha must be positive, got {value}")]
    InvalidAlpha { value: f64 },

    /// Requested grid has a zero-sized axis
    #[error("grid must be non-empty, got width={width}, depth={depth} pixels")]
    EmptyGrid { width: usize, depth: usize },

    /// Microgrid construction failure propagated from mt-core
    #[error(transparent)]
    Core(#[from] MtError),
}
