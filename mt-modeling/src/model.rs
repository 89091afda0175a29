//! Model capability trait and grid sizing
//!
//! A resistivity model is anything that can materialize itself into a
//! [`ResistivityMicrogrid`]. Strategies are independent implementations of
//! the trait; there is no shared generator state.

use mt_core::ResistivityMicrogrid;

use crate::error::Result;

/// Lateral extent of a generated grid. The depth axis is always derived
/// from the generator's own parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LateralSize {
    /// A single profile line of the given width: produces a 2D
    /// `(width, depth)` grid
    Line(usize),
    /// A `(width, height)` areal footprint: produces a 3D
    /// `(width, height, depth)` grid
    Plane(usize, usize),
}

impl LateralSize {
    pub fn width(&self) -> usize {
        match *self {
            LateralSize::Line(w) => w,
            LateralSize::Plane(w, _) => w,
        }
    }
}

/// Capability of generating a ResistivityMicrogrid from model parameters
pub trait ResistivityModel {
    /// Generates a microgrid of the given lateral size with the given depth
    /// pixel size in meters.
    fn to_microgrid(
        &self,
        size: LateralSize,
        grid_pixel_size: f64,
    ) -> Result<ResistivityMicrogrid>;
}
