//! N-dimensional resistivity microgrid for MT data
//!
//! [`ResistivityMicrogrid`] bundles a resistivity grid (last axis is depth)
//! with a matching layer power grid and, once computed, the derived surface
//! response. The derived state is a sum type: either nothing has been
//! computed yet, or periods, apparent resistivity and impedance phase are
//! all present together. A failed compute never leaves a half-replaced
//! state behind.

use ndarray::{Array1, ArrayD, ArrayView1, Ix1, Ix2, Ix3};

use crate::direct_task::{direct_task_1d, direct_task_2d, direct_task_3d};
use crate::error::{MtError, Result};

/// Derived response state of a microgrid
#[derive(Debug, Clone, PartialEq)]
enum DirectTaskState {
    Uncomputed,
    Computed(DirectTaskResponse),
}

/// Surface response of one compute pass: all three fields live and die
/// together
#[derive(Debug, Clone, PartialEq)]
pub struct DirectTaskResponse {
    /// Periods the response was computed for, in seconds
    pub periods: Array1<f64>,
    /// Modulus of apparent resistivity, in Ohm * m
    pub apparent_resistivity: ArrayD<f64>,
    /// Phase of impedance, in degrees
    pub impedance_phase: ArrayD<f64>,
}

/// N-dimensional grid entity for MT data.
///
/// The last dimension is z (depth), used for direct task computation.
/// Example shapes for depth = 100 microgrid points:
/// - 1D: `(100,)`
/// - 2D: `(32, 100)`
/// - 3D: `(32, 72, 100)`
#[derive(Debug, Clone)]
pub struct ResistivityMicrogrid {
    resistivity: ArrayD<f64>,
    layer_power: ArrayD<f64>,
    grid_element_size: f64,
    response: DirectTaskState,
}

impl ResistivityMicrogrid {
    /// Creates a microgrid with a uniform pixel size: the layer power array
    /// is synthesized by broadcasting `grid_pixel_size` over the resistivity
    /// shape.
    ///
    /// # Errors
    /// `grid_pixel_size` must be strictly positive.
    pub fn new(resistivity: ArrayD<f64>, grid_pixel_size: f64) -> Result<Self> {
        if grid_pixel_size <= 0.0 {
            return Err(MtError::NonPositivePixelSize {
                value: grid_pixel_size,
            });
        }
        let layer_power = ArrayD::from_elem(resistivity.raw_dim(), grid_pixel_size);
        Ok(Self {
            resistivity,
            layer_power,
            grid_element_size: grid_pixel_size,
            response: DirectTaskState::Uncomputed,
        })
    }

    /// Creates a microgrid with an explicit layer power array.
    ///
    /// The power array must match the resistivity shape exactly, or match on
    /// the leading axes with a trailing (depth) axis one shorter, since the
    /// half-space carries no power.
    pub fn with_layer_power(
        resistivity: ArrayD<f64>,
        layer_power: ArrayD<f64>,
        grid_element_size: f64,
    ) -> Result<Self> {
        if grid_element_size <= 0.0 {
            return Err(MtError::NonPositivePixelSize {
                value: grid_element_size,
            });
        }
        let res_shape = resistivity.shape();
        let pow_shape = layer_power.shape();
        let compatible = res_shape.len() == pow_shape.len()
            && !res_shape.is_empty()
            && res_shape[..res_shape.len() - 1] == pow_shape[..pow_shape.len() - 1]
            && (pow_shape[pow_shape.len() - 1] == res_shape[res_shape.len() - 1]
                || pow_shape[pow_shape.len() - 1] + 1 == res_shape[res_shape.len() - 1]);
        if !compatible {
            return Err(MtError::ShapeMismatch {
                resistivity: res_shape.to_vec(),
                power: pow_shape.to_vec(),
            });
        }
        Ok(Self {
            resistivity,
            layer_power,
            grid_element_size,
            response: DirectTaskState::Uncomputed,
        })
    }

    /// Resistivity microgrid, in Ohm * m
    pub fn resistivity(&self) -> &ArrayD<f64> {
        &self.resistivity
    }

    /// Power of layers, in m
    pub fn layer_power(&self) -> &ArrayD<f64> {
        &self.layer_power
    }

    /// Pixel (one point in microgrid) size, in m
    pub fn grid_element_size(&self) -> f64 {
        self.grid_element_size
    }

    /// Whether a direct task has been computed for this grid
    pub fn is_computed(&self) -> bool {
        matches!(self.response, DirectTaskState::Computed(_))
    }

    /// Periods used to compute the current response, in seconds
    ///
    /// # Errors
    /// [`MtError::NotComputed`] until a compute succeeds.
    pub fn periods(&self) -> Result<&Array1<f64>> {
        match &self.response {
            DirectTaskState::Computed(response) => Ok(&response.periods),
            DirectTaskState::Uncomputed => Err(MtError::NotComputed { field: "periods" }),
        }
    }

    /// Apparent resistivity, in Ohm * m
    ///
    /// # Errors
    /// [`MtError::NotComputed`] until a compute succeeds.
    pub fn apparent_resistivity(&self) -> Result<&ArrayD<f64>> {
        match &self.response {
            DirectTaskState::Computed(response) => Ok(&response.apparent_resistivity),
            DirectTaskState::Uncomputed => Err(MtError::NotComputed {
                field: "apparent_resistivity",
            }),
        }
    }

    /// Impedance phase, in degrees
    ///
    /// # Errors
    /// [`MtError::NotComputed`] until a compute succeeds.
    pub fn impedance_phase(&self) -> Result<&ArrayD<f64>> {
        match &self.response {
            DirectTaskState::Computed(response) => Ok(&response.impedance_phase),
            DirectTaskState::Uncomputed => Err(MtError::NotComputed {
                field: "impedance_phase",
            }),
        }
    }

    /// Computes the direct task for the given periods and replaces the
    /// derived response wholesale.
    ///
    /// Dispatches on the resistivity rank: the 1D recursion for profiles,
    /// the lifted solvers for 2D/3D grids. All three derived arrays are
    /// produced before the state is touched, so a failed compute leaves the
    /// previous response (if any) readable.
    ///
    /// # Errors
    /// [`MtError::UnsupportedRank`] for ranks outside 1..=3, plus anything
    /// the underlying solver reports.
    pub fn compute_direct_task(&mut self, periods: ArrayView1<f64>) -> Result<()> {
        let unsupported = || MtError::UnsupportedRank {
            ndim: self.resistivity.ndim(),
            shape: self.resistivity.shape().to_vec(),
        };

        let (rho, phi) = match self.resistivity.ndim() {
            1 => {
                let resistivity = self
                    .resistivity
                    .view()
                    .into_dimensionality::<Ix1>()
                    .map_err(|_| unsupported())?;
                let power = self
                    .layer_power
                    .view()
                    .into_dimensionality::<Ix1>()
                    .map_err(|_| unsupported())?;
                let (rho, phi) = direct_task_1d(periods, resistivity, power)?;
                (rho.into_dyn(), phi.into_dyn())
            }
            2 => {
                let resistivity = self
                    .resistivity
                    .view()
                    .into_dimensionality::<Ix2>()
                    .map_err(|_| unsupported())?;
                let power = self
                    .layer_power
                    .view()
                    .into_dimensionality::<Ix2>()
                    .map_err(|_| unsupported())?;
                let (rho, phi) = direct_task_2d(periods, resistivity, power)?;
                (rho.into_dyn(), phi.into_dyn())
            }
            3 => {
                let resistivity = self
                    .resistivity
                    .view()
                    .into_dimensionality::<Ix3>()
                    .map_err(|_| unsupported())?;
                let power = self
                    .layer_power
                    .view()
                    .into_dimensionality::<Ix3>()
                    .map_err(|_| unsupported())?;
                let (rho, phi) = direct_task_3d(periods, resistivity, power)?;
                (rho.into_dyn(), phi.into_dyn())
            }
            _ => return Err(unsupported()),
        };

        self.response = DirectTaskState::Computed(DirectTaskResponse {
            periods: periods.to_owned(),
            apparent_resistivity: rho,
            impedance_phase: phi,
        });
        Ok(())
    }
}
