//! # mt-modeling
//!
//! Stochastic layered-earth model generators for MT forward modeling.
//!
//! Two independent strategies produce synthetic resistivity microgrids:
//! - [`RandomLayerModel`] - parametric existence sampling: per-layer power
//!   ranges and existence probabilities, independent columns
//! - [`SmoothLayerModel`] - a correlated boundary walk: layer boundaries
//!   drift smoothly along the width axis
//!
//! Both implement the [`ResistivityModel`] capability and draw from a single
//! deterministic RNG stream per invocation, so seeded runs reproduce
//! bit-identically.

pub mod error;
pub mod model;
pub mod random_layer;
pub mod smooth_layer;

pub use error::{ModelError, Result};
pub use model::{LateralSize, ResistivityModel};
pub use random_layer::{generate_random_layers_2d, generate_random_layers_3d, RandomLayerModel};
pub use smooth_layer::{
    generate_smooth_layers_2d, generate_smooth_layers_3d, perturb_boundary_fractions,
    SmoothLayerModel,
};
