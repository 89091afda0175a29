//! # mt-core
//!
//! One-dimensional magnetotelluric (MT) direct task solver and its 2D/3D
//! grid liftings.
//!
//! This crate provides the building blocks of the forward problem:
//! - Cagniard layer-stripping impedance recursion over a layer stack
//! - Dimensional lifting of the recursion across 2D/3D spatial grids
//! - The [`ResistivityMicrogrid`] entity holding a resistivity grid and its
//!   lazily computed surface response
//! - A typed error taxonomy for validation, domain, numerical and state
//!   failures

pub mod direct_task;
pub mod error;
pub mod microgrid;

pub use direct_task::{
    direct_task_1d, direct_task_2d, direct_task_3d, MU_ZERO, PARALLEL_THRESHOLD,
    PHASE_SHIFT_DEGREES,
};
pub use error::{MtError, Result};
pub use microgrid::{DirectTaskResponse, ResistivityMicrogrid};
