//! One-dimensional magnetotelluric direct task and its 2D/3D liftings
//!
//! `direct_task_1d` computes the surface response (apparent resistivity and
//! impedance phase) of a vertical layer stack with the bottom-up Cagniard
//! layer-stripping recursion. `direct_task_2d` / `direct_task_3d` lift the
//! 1D solver independently over every spatial cell of a grid whose last axis
//! is the depth/layer axis.
//!
//! # Parallelism
//! Cells are independent of each other, so the lifted variants map over the
//! leading spatial axis with Rayon. Grids narrower than
//! [`PARALLEL_THRESHOLD`] fall back to a sequential loop, where the thread
//! pool overhead outweighs the work.
//!
//! # Phase convention
//! The phase is atan(Im r / Re r) in degrees with a fixed -45 degree shift
//! applied to the whole output vector. This convention is a fixed numerical
//! contract: a homogeneous half-space reads exactly -45 degrees.

use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, ArrayView3, Axis};
use num_complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::PI;

use crate::error::{MtError, Result};

/// Vacuum magnetic permeability, in H/m
pub const MU_ZERO: f64 = 4.0 * PI * 1.0e-7;

/// Reference shift subtracted from the impedance phase, in degrees
pub const PHASE_SHIFT_DEGREES: f64 = 45.0;

/// Minimum leading-axis width to benefit from parallel lifting
/// Below this, the sequential loop is faster than spawning Rayon tasks
pub const PARALLEL_THRESHOLD: usize = 32;

// =============================================================================
// Input Validation
// =============================================================================

/// Checks a single layer stack: positive resistivities, positive powers,
/// and a power count of either N-1 (pure stack) or N (per-pixel power whose
/// trailing half-space entry is never read).
fn validate_stack(layer_resistivity: ArrayView1<f64>, layer_power: ArrayView1<f64>) -> Result<()> {
    let num_layers = layer_resistivity.len();
    if num_layers == 0 || (layer_power.len() + 1 != num_layers && layer_power.len() != num_layers)
    {
        return Err(MtError::ShapeMismatch {
            resistivity: layer_resistivity.shape().to_vec(),
            power: layer_power.shape().to_vec(),
        });
    }
    for (layer, &rho) in layer_resistivity.iter().enumerate() {
        if rho <= 0.0 {
            return Err(MtError::NonPositiveResistivity { layer, value: rho });
        }
    }
    // Only the N-1 finite-layer powers are consumed by the recursion.
    for layer in 0..num_layers - 1 {
        let value = layer_power[layer];
        if value <= 0.0 {
            return Err(MtError::NonPositivePower { layer, value });
        }
    }
    Ok(())
}

fn validate_periods(periods: ArrayView1<f64>) -> Result<()> {
    for (index, &value) in periods.iter().enumerate() {
        if value <= 0.0 {
            return Err(MtError::NonPositivePeriod { index, value });
        }
    }
    Ok(())
}

/// Checks that a lifted power grid matches the resistivity grid: identical
/// leading axes, trailing axis equal to N or N-1.
fn validate_grid_shapes(resistivity: &[usize], power: &[usize]) -> Result<()> {
    let ndim = resistivity.len();
    let compatible = power.len() == ndim && {
        let depth = resistivity[ndim - 1];
        depth > 0
            && resistivity[..ndim - 1] == power[..ndim - 1]
            && (power[ndim - 1] == depth || power[ndim - 1] + 1 == depth)
    };
    if !compatible {
        return Err(MtError::ShapeMismatch {
            resistivity: resistivity.to_vec(),
            power: power.to_vec(),
        });
    }
    Ok(())
}

// =============================================================================
// 1D Direct Task (Cagniard Recursion)
// =============================================================================

/// Calculates the one-dimensional direct task of MT.
///
/// # Arguments
/// * `periods` - Oscillation periods in seconds, e.g. `[0.01, 0.02, ...]`
/// * `layer_resistivity` - Electrical resistivity by layer, in Ohm * m.
///   The last layer is the semi-infinite half-space.
/// * `layer_power` - Power (thickness) of the finite layers, in m
///
/// # Returns
/// `(apparent_resistivity, impedance_phase)`, both with one entry per
/// period. Apparent resistivity in Ohm * m, phase in degrees.
///
/// # Errors
/// Non-positive resistivities, powers or periods fail eagerly; a vanishing
/// recursion denominator (degenerate interface) fails mid-recursion with
/// [`MtError::DegenerateInterface`].
pub fn direct_task_1d(
    periods: ArrayView1<f64>,
    layer_resistivity: ArrayView1<f64>,
    layer_power: ArrayView1<f64>,
) -> Result<(Array1<f64>, Array1<f64>)> {
    validate_stack(layer_resistivity, layer_power)?;
    validate_periods(periods)?;

    let num_layers = layer_resistivity.len();
    let mu_zero_j = Complex64::new(0.0, -MU_ZERO);
    let one = Complex64::new(1.0, 0.0);

    // Interface constants are period-independent. Precompute them once per
    // stack, ordered from the bottom interface (m = N-1) up to the surface.
    let k_array: Vec<Complex64> = (1..num_layers)
        .rev()
        .map(|m| (mu_zero_j / layer_resistivity[m - 1]).sqrt())
        .collect();
    let a_array: Vec<f64> = (1..num_layers)
        .rev()
        .map(|m| (layer_resistivity[m - 1] / layer_resistivity[m]).sqrt())
        .collect();

    let mut rho_t = Array1::<f64>::zeros(periods.len());
    let mut phi_t = Array1::<f64>::zeros(periods.len());

    for (i, &period) in periods.iter().enumerate() {
        let omega = (2.0 * PI / period).sqrt();
        // r = 1 is the normalized response of the bottom half-space.
        let mut r = one;
        for m in (1..num_layers).rev() {
            let idx = num_layers - 1 - m;
            let a = a_array[idx];
            let denominator = r + a;
            if denominator.norm() == 0.0 {
                return Err(MtError::DegenerateInterface { layer: m, period });
            }
            let b = (-2.0 * k_array[idx] * omega * layer_power[m - 1]).exp() * (r - a)
                / denominator;
            r = (one + b) / (one - b);
        }
        rho_t[i] = layer_resistivity[0] * r.norm().powi(2);
        phi_t[i] = (r.im / r.re).atan().to_degrees();
    }

    phi_t -= PHASE_SHIFT_DEGREES;

    Ok((rho_t, phi_t))
}

// =============================================================================
// Dimensional Lifting
// =============================================================================

/// Calculates the direct task over a 2D grid.
///
/// # Arguments
/// * `periods` - Oscillation periods in seconds
/// * `layer_resistivity` - Resistivity grid with shape `(W, N)`, last axis
///   is depth
/// * `layer_power` - Power grid with shape `(W, N)` or `(W, N-1)`
///
/// # Returns
/// `(apparent_resistivity, impedance_phase)` with shape `(W, P)`.
pub fn direct_task_2d(
    periods: ArrayView1<f64>,
    layer_resistivity: ArrayView2<f64>,
    layer_power: ArrayView2<f64>,
) -> Result<(Array2<f64>, Array2<f64>)> {
    validate_grid_shapes(layer_resistivity.shape(), layer_power.shape())?;

    let width = layer_resistivity.nrows();
    let solve_row = |i: usize| {
        direct_task_1d(periods, layer_resistivity.row(i), layer_power.row(i))
    };
    let rows: Vec<(Array1<f64>, Array1<f64>)> = if width >= PARALLEL_THRESHOLD {
        (0..width)
            .into_par_iter()
            .map(solve_row)
            .collect::<Result<_>>()?
    } else {
        (0..width).map(solve_row).collect::<Result<_>>()?
    };

    let mut rho_t = Array2::<f64>::zeros((width, periods.len()));
    let mut phi_t = Array2::<f64>::zeros((width, periods.len()));
    for (i, (rho, phi)) in rows.into_iter().enumerate() {
        rho_t.row_mut(i).assign(&rho);
        phi_t.row_mut(i).assign(&phi);
    }

    Ok((rho_t, phi_t))
}

/// Calculates the direct task over a 3D grid.
///
/// # Arguments
/// * `periods` - Oscillation periods in seconds
/// * `layer_resistivity` - Resistivity grid with shape `(WX, WY, N)`, last
///   axis is depth
/// * `layer_power` - Power grid with shape `(WX, WY, N)` or `(WX, WY, N-1)`
///
/// # Returns
/// `(apparent_resistivity, impedance_phase)` with shape `(WX, WY, P)`.
pub fn direct_task_3d(
    periods: ArrayView1<f64>,
    layer_resistivity: ArrayView3<f64>,
    layer_power: ArrayView3<f64>,
) -> Result<(Array3<f64>, Array3<f64>)> {
    validate_grid_shapes(layer_resistivity.shape(), layer_power.shape())?;

    let size_x = layer_resistivity.shape()[0];
    let solve_slice = |i: usize| {
        direct_task_2d(
            periods,
            layer_resistivity.index_axis(Axis(0), i),
            layer_power.index_axis(Axis(0), i),
        )
    };
    let slices: Vec<(Array2<f64>, Array2<f64>)> = if size_x >= PARALLEL_THRESHOLD {
        (0..size_x)
            .into_par_iter()
            .map(solve_slice)
            .collect::<Result<_>>()?
    } else {
        (0..size_x).map(solve_slice).collect::<Result<_>>()?
    };

    let size_y = layer_resistivity.shape()[1];
    let mut rho_t = Array3::<f64>::zeros((size_x, size_y, periods.len()));
    let mut phi_t = Array3::<f64>::zeros((size_x, size_y, periods.len()));
    for (i, (rho, phi)) in slices.into_iter().enumerate() {
        rho_t.index_axis_mut(Axis(0), i).assign(&rho);
        phi_t.index_axis_mut(Axis(0), i).assign(&phi);
    }

    Ok((rho_t, phi_t))
}
