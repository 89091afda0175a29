//! Error types for the magnetotelluric direct task
//!
//! Provides typed failures for:
//! - Validation errors (array ranks, shape mismatches)
//! - Domain errors (non-physical layer parameters)
//! - Numerical errors (degenerate interfaces in the recursion)
//! - State errors (reading responses before they are computed)

use thiserror::Error;

/// Result type alias for mt-core operations
pub type Result<T> = std::result::Result<T, MtError>;

/// Error type for direct task computation and microgrid handling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MtError {
    // ==========================================================================
    // Validation Errors
    // ==========================================================================
    /// Resistivity array rank outside the supported 1D/2D/3D set
    #[error(
        "direct task is implemented only for 1D, 2D and 3D resistivity microgrids, \
         got {ndim}D array with shape {shape:?}"
    )]
    UnsupportedRank { ndim: usize, shape: Vec<usize> },

    /// Resistivity and layer power arrays do not agree in shape
    #[error("resistivity shape {resistivity:?} does not match layer power shape {power:?}")]
    ShapeMismatch {
        resistivity: Vec<usize>,
        power: Vec<usize>,
    },

    /// Grid pixel size must be strictly positive
    #[error("grid pixel size must be positive, got {value} m")]
    NonPositivePixelSize { value: f64 },

    // ==========================================================================
    // Domain Errors
    // ==========================================================================
    /// Layer resistivity must be strictly positive
    #[error("layer {layer}: resistivity must be positive, got {value} Ohm*m")]
    NonPositiveResistivity { layer: usize, value: f64 },

    /// Layer power (thickness) must be strictly positive
    #[error("layer {layer}: power must be positive, got {value} m")]
    NonPositivePower { layer: usize, value: f64 },

    /// Oscillation period must be strictly positive
    #[error("period {index}: period must be positive, got {value} s")]
    NonPositivePeriod { index: usize, value: f64 },

    // ==========================================================================
    // Numerical Errors
    // ==========================================================================
    /// The recursion denominator (r + a_m) vanished at an interface
    #[error(
        "degenerate interface above layer {layer} at period {period} s: \
         impedance denominator vanished"
    )]
    DegenerateInterface { layer: usize, period: f64 },

    // ==========================================================================
    // State Errors
    // ==========================================================================
    /// A derived response field was read before any successful compute
    #[error("{field} does not exist, compute it first with compute_direct_task")]
    NotComputed { field: &'static str },
}

impl MtError {
    /// Check if the error stems from input validation (as opposed to a
    /// failure detected mid-recursion or a premature read)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MtError::UnsupportedRank { .. }
                | MtError::ShapeMismatch { .. }
                | MtError::NonPositivePixelSize { .. }
                | MtError::NonPositiveResistivity { .. }
                | MtError::NonPositivePower { .. }
                | MtError::NonPositivePeriod { .. }
        )
    }
}
