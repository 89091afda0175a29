//! Random layered model generator (parametric existence sampling)
//!
//! Each layer is described by a power range, an existence probability and a
//! resistivity. Every spatial column is filled top-down: per layer, a
//! Bernoulli draw decides whether the layer exists at that column; if it
//! does, its power is drawn uniformly from the range and converted to whole
//! pixels. A failed draw leaves a zero-width layer: the paint offset does
//! not move, so deeper layers keep their bucket boundaries.
//!
//! All columns are filled from one deterministic RNG stream per invocation:
//! seeded runs are bit-identical.

use ndarray::{s, Array2, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mt_core::{MtError, ResistivityMicrogrid};

use crate::error::{ModelError, Result};
use crate::model::{LateralSize, ResistivityModel};

// =============================================================================
// Functional Layer
// =============================================================================

/// Draws one column worth of layers into `column[offset..]`.
fn fill_column<R: Rng>(
    column: &mut ndarray::ArrayViewMut1<f64>,
    step_z: f64,
    layer_power_max: &[f64],
    layer_power_min: &[f64],
    layer_exist_probability: &[f64],
    layer_resistivity: &[f64],
    rng: &mut R,
) {
    let depth = column.len();
    let mut offset = 0usize;
    for i in 0..layer_resistivity.len() {
        let mut power = 0.0;
        if rng.gen::<f64>() <= layer_exist_probability[i] {
            power = layer_power_min[i]
                + rng.gen::<f64>() * (layer_power_max[i] - layer_power_min[i]);
        }
        let num_blocks = (power / step_z).floor() as usize;
        let end = (offset + num_blocks).min(depth);
        column.slice_mut(s![offset..end]).fill(layer_resistivity[i]);
        offset = end;
    }
}

/// Generates a 2D `(size, depth)` random layered resistivity grid. The
/// depth pixel count is `floor(sum(layer_power_max) / step_z)`; pixels below
/// the deepest painted layer keep `default_resistivity`.
#[allow(clippy::too_many_arguments)]
pub fn generate_random_layers_2d<R: Rng>(
    size: usize,
    step_z: f64,
    default_resistivity: f64,
    layer_power_max: &[f64],
    layer_power_min: &[f64],
    layer_exist_probability: &[f64],
    layer_resistivity: &[f64],
    rng: &mut R,
) -> Array2<f64> {
    let depth = (layer_power_max.iter().sum::<f64>() / step_z).floor() as usize;
    let mut grid = Array2::from_elem((size, depth), default_resistivity);
    for x in 0..size {
        fill_column(
            &mut grid.row_mut(x),
            step_z,
            layer_power_max,
            layer_power_min,
            layer_exist_probability,
            layer_resistivity,
            rng,
        );
    }
    grid
}

/// Generates a 3D `(size_x, size_y, depth)` random layered resistivity grid.
#[allow(clippy::too_many_arguments)]
pub fn generate_random_layers_3d<R: Rng>(
    size_x: usize,
    size_y: usize,
    step_z: f64,
    default_resistivity: f64,
    layer_power_max: &[f64],
    layer_power_min: &[f64],
    layer_exist_probability: &[f64],
    layer_resistivity: &[f64],
    rng: &mut R,
) -> Array3<f64> {
    let depth = (layer_power_max.iter().sum::<f64>() / step_z).floor() as usize;
    let mut grid = Array3::from_elem((size_x, size_y, depth), default_resistivity);
    for x in 0..size_x {
        for y in 0..size_y {
            fill_column(
                &mut grid.slice_mut(s![x, y, ..]),
                step_z,
                layer_power_max,
                layer_power_min,
                layer_exist_probability,
                layer_resistivity,
                rng,
            );
        }
    }
    grid
}

// =============================================================================
// Model
// =============================================================================

/// Random "layered" model generator.
///
/// # Example
/// ```
/// use mt_modeling::{LateralSize, RandomLayerModel, ResistivityModel};
///
/// let model = RandomLayerModel::new(
///     vec![100.0, 2000.0, 100.0],
///     vec![50.0, 1000.0, 50.0],
///     vec![1.0, 1.0, 0.9],
///     vec![2000.0, 1500.0, 8000.0],
/// )
/// .unwrap()
/// .with_seed(7);
///
/// let grid = model.to_microgrid(LateralSize::Line(32), 50.0).unwrap();
/// assert_eq!(grid.resistivity().shape()[0], 32);
/// ```
#[derive(Debug, Clone)]
pub struct RandomLayerModel {
    layer_power_max: Vec<f64>,
    layer_power_min: Vec<f64>,
    layer_exist_probability: Vec<f64>,
    layer_resistivity: Vec<f64>,
    default_resistivity: f64,
    seed: Option<u64>,
}

impl RandomLayerModel {
    /// Creates a model from per-layer parameters.
    ///
    /// # Arguments
    /// * `layer_power_max` - Max power for each layer in meters, e.g.
    ///   `[100.0, 2000.0, 100.0]`
    /// * `layer_power_min` - Min power for each layer in meters
    /// * `layer_exist_probability` - Existence probability of each layer in
    ///   each column, e.g. `[1.0, 1.0, 0.9]`
    /// * `layer_resistivity` - Layer resistivity in Ohm * m
    ///
    /// # Errors
    /// All vectors must be non-empty and of equal length, power ranges
    /// ordered and non-negative, probabilities inside [0, 1], resistivities
    /// positive.
    pub fn new(
        layer_power_max: Vec<f64>,
        layer_power_min: Vec<f64>,
        layer_exist_probability: Vec<f64>,
        layer_resistivity: Vec<f64>,
    ) -> Result<Self> {
        if layer_resistivity.is_empty() {
            return Err(ModelError::EmptyLayers);
        }
        if layer_power_max.len() != layer_resistivity.len()
            || layer_power_min.len() != layer_resistivity.len()
            || layer_exist_probability.len() != layer_resistivity.len()
        {
            return Err(ModelError::ParameterLengthMismatch {
                power_max: layer_power_max.len(),
                power_min: layer_power_min.len(),
                probability: layer_exist_probability.len(),
                resistivity: layer_resistivity.len(),
            });
        }
        for layer in 0..layer_resistivity.len() {
            let (min, max) = (layer_power_min[layer], layer_power_max[layer]);
            if min < 0.0 || max < min {
                return Err(ModelError::InvalidPowerRange { layer, min, max });
            }
            let p = layer_exist_probability[layer];
            if !(0.0..=1.0).contains(&p) {
                return Err(ModelError::InvalidProbability { layer, value: p });
            }
            let rho = layer_resistivity[layer];
            if rho <= 0.0 {
                return Err(ModelError::NonPositiveResistivity { layer, value: rho });
            }
        }
        Ok(Self {
            layer_power_max,
            layer_power_min,
            layer_exist_probability,
            layer_resistivity,
            default_resistivity: 0.0,
            seed: None,
        })
    }

    /// Resistivity painted below the deepest generated layer (default 0.0)
    pub fn with_default_resistivity(mut self, resistivity: f64) -> Self {
        self.default_resistivity = resistivity;
        self
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

impl ResistivityModel for RandomLayerModel {
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
        let depth =
            (self.layer_power_max.iter().sum::<f64>() / grid_pixel_size).floor() as usize;
        let degenerate = match size {
            LateralSize::Line(width) => width == 0,
            LateralSize::Plane(width, height) => width == 0 || height == 0,
        };
        if degenerate || depth == 0 {
            return Err(ModelError::EmptyGrid {
                width: size.width(),
                depth,
            });
        }

        let mut rng = self.rng();
        let resistivity = match size {
            LateralSize::Line(width) => generate_random_layers_2d(
                width,
                grid_pixel_size,
                self.default_resistivity,
                &self.layer_power_max,
                &self.layer_power_min,
                &self.layer_exist_probability,
                &self.layer_resistivity,
                &mut rng,
            )
            .into_dyn(),
            LateralSize::Plane(width, height) => {
                generate_random_layers_3d(
                    width,
                    height,
                    grid_pixel_size,
                    self.default_resistivity,
                    &self.layer_power_max,
                    &self.layer_power_min,
                    &self.layer_exist_probability,
                    &self.layer_resistivity,
                    &mut rng,
                )
                .into_dyn()
            }
        };

        Ok(ResistivityMicrogrid::new(resistivity, grid_pixel_size)?)
    }
}
