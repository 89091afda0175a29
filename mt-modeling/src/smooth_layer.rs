//! Laterally-smoothed layered model generator (correlated boundary walk)
//!
//! Layer boundaries are a fraction vector over the depth axis. Each column
//! derives its vector from the previous column's by a small uniform
//! perturbation, then renormalization and clipping. The result is a
//! correlated random walk: neighboring columns share smoothly drifting
//! layer boundaries.
//! The walk along the width axis is strictly sequential; for 3D grids every
//! height slice runs its own independent walk.
//!
//! One deterministic RNG stream per invocation: seeded runs are
//! bit-identical.

use ndarray::{s, Array1, Array2, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mt_core::{MtError, ResistivityMicrogrid};

use crate::error::{ModelError, Result};
use crate::model::{LateralSize, ResistivityModel};

// =============================================================================
// Functional Layer
// =============================================================================

/// Advances the boundary-fraction vector by one column: perturb every entry
/// by uniform noise scaled by `alpha`, renormalize to unit sum, clip to
/// [0, 1].
pub fn perturb_boundary_fractions<R: Rng>(
    fractions: &mut Array1<f64>,
    alpha: f64,
    rng: &mut R,
) {
    for f in fractions.iter_mut() {
        *f += (rng.gen::<f64>() - 0.5) * alpha;
    }
    let sum = fractions.sum();
    *fractions /= sum;
    fractions.mapv_inplace(|v| v.clamp(0.0, 1.0));
}

/// Converts the cumulative fraction vector into integer pixel boundaries.
/// The first boundary is forced to the surface and the last to the bottom
/// of the column.
fn pixel_boundaries(fractions: &Array1<f64>, depth: usize) -> Vec<usize> {
    let mut boundaries = Vec::with_capacity(fractions.len());
    let mut cumulative = 0.0;
    for &f in fractions.iter() {
        cumulative += f;
        boundaries.push(((cumulative * depth as f64) as usize).min(depth));
    }
    boundaries[0] = 0;
    let last = boundaries.len() - 1;
    boundaries[last] = depth;
    boundaries
}

/// Runs one boundary walk over `grid`, a `(width, depth)` view.
fn walk<R: Rng>(
    mut grid: ndarray::ArrayViewMut2<f64>,
    num_layers: usize,
    resistivity_range: (f64, f64),
    alpha: f64,
    rng: &mut R,
) {
    let (width, depth) = grid.dim();
    let num_boundaries = num_layers + 1;
    let mut fractions = Array1::from_shape_fn(num_boundaries, |_| rng.gen::<f64>());
    let layer_values: Vec<f64> = (0..num_boundaries)
        .map(|_| rng.gen_range(resistivity_range.0..resistivity_range.1))
        .collect();

    for x in 0..width {
        perturb_boundary_fractions(&mut fractions, alpha, rng);
        let boundaries = pixel_boundaries(&fractions, depth);
        for j in 1..num_boundaries {
            // An inverted range paints nothing, matching slice semantics of
            // the boundary construction.
            let (lo, hi) = (boundaries[j - 1], boundaries[j]);
            if lo < hi {
                grid.slice_mut(s![x, lo..hi]).fill(layer_values[j - 1]);
            }
        }
    }
}

/// Generates a 2D `(width, depth)` grid of smoothly drifting layers.
pub fn generate_smooth_layers_2d<R: Rng>(
    width: usize,
    depth: usize,
    num_layers: usize,
    resistivity_range: (f64, f64),
    alpha: f64,
    rng: &mut R,
) -> Array2<f64> {
    let mut grid = Array2::zeros((width, depth));
    walk(grid.view_mut(), num_layers, resistivity_range, alpha, rng);
    grid
}

/// Generates a 3D `(width, height, depth)` grid: one independent walk per
/// height slice, drawn from the same stream in slice order.
pub fn generate_smooth_layers_3d<R: Rng>(
    width: usize,
    height: usize,
    depth: usize,
    num_layers: usize,
    resistivity_range: (f64, f64),
    alpha: f64,
    rng: &mut R,
) -> Array3<f64> {
    let mut grid = Array3::zeros((width, height, depth));
    for y in 0..height {
        walk(
            grid.slice_mut(s![.., y, ..]),
            num_layers,
            resistivity_range,
            alpha,
            rng,
        );
    }
    grid
}

// =============================================================================
// Model
// =============================================================================

/// Smoothly layered model generator.
///
/// # Example
/// ```
/// use mt_modeling::{LateralSize, ResistivityModel, SmoothLayerModel};
///
/// let model = SmoothLayerModel::new(64, 4, (1.0, 20_000.0), 0.01)
///     .unwrap()
///     .with_seed(11);
/// let grid = model.to_microgrid(LateralSize::Line(128), 100.0).unwrap();
/// assert_eq!(grid.resistivity().shape(), &[128, 64]);
/// ```
#[derive(Debug, Clone)]
pub struct SmoothLayerModel {
    depth: usize,
    num_layers: usize,
    resistivity_range: (f64, f64),
    alpha: f64,
    seed: Option<u64>,
}

impl SmoothLayerModel {
    /// Creates a model.
    ///
    /// # Arguments
    /// * `depth` - Depth-axis pixel count of generated grids
    /// * `num_layers` - Number of painted layers
    /// * `resistivity_range` - Half-open sampling range for layer
    ///   resistivities, in Ohm * m
    /// * `alpha` - Boundary walk smoothness; smaller is smoother
    ///
    /// # Errors
    /// Depth and layer count must be at least 1, alpha positive, the range
    /// ordered with a positive lower bound.
    pub fn new(
        depth: usize,
        num_layers: usize,
        resistivity_range: (f64, f64),
        alpha: f64,
    ) -> Result<Self> {
        if num_layers == 0 {
            return Err(ModelError::EmptyLayers);
        }
        if depth == 0 {
            return Err(ModelError::EmptyGrid { width: 0, depth });
        }
        if alpha <= 0.0 {
            return Err(ModelError::InvalidAlpha { value: alpha });
        }
        let (min, max) = resistivity_range;
        if min <= 0.0 || max <= min {
            return Err(ModelError::InvalidResistivityRange { min, max });
        }
        Ok(Self {
            depth,
            num_layers,
            resistivity_range,
            alpha,
            seed: None,
        })
    }

    /// Fixes the RNG seed: two runs with the same seed produce bit-identical
    /// grids
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl ResistivityModel for SmoothLayerModel {
    fn to_microgrid(
        &self,
        size: LateralSize,
        grid_pixel_size: f64,
    ) -> Result<ResistivityMicrogrid> {
        if grid_pixel_size <= 0.0 {
            return Err(MtError::NonPositivePixelSize {
                value: grid_pixel_size,
            }
            .into());
        }
        let degenerate = match size {
            LateralSize::Line(width) => width == 0,
            LateralSize::Plane(width, height) => width == 0 || height == 0,
        };
        if degenerate {
            return Err(ModelError::EmptyGrid {
                width: size.width(),
                depth: self.depth,
            });
        }

        let mut rng = self.rng();
        let resistivity = match size {
            LateralSize::Line(width) => generate_smooth_layers_2d(
                width,
                self.depth,
                self.num_layers,
                self.resistivity_range,
                self.alpha,
                &mut rng,
            )
            .into_dyn(),
            LateralSize::Plane(width, height) => generate_smooth_layers_3d(
                width,
                height,
                self.depth,
                self.num_layers,
                self.resistivity_range,
                self.alpha,
                &mut rng,
            )
            .into_dyn(),
        };

        Ok(ResistivityMicrogrid::new(resistivity, grid_pixel_size)?)
    }
}
