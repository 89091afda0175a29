//! State machine tests for ResistivityMicrogrid.
//!
//! Derived response fields must be unreadable before the first successful
//! compute, readable afterwards, replaced wholesale on recompute, and left
//! untouched by a failed compute.

use ndarray::{arr1, ArrayD, IxDyn};

use mt_core::{MtError, ResistivityMicrogrid};

fn uniform_grid(shape: &[usize], resistivity: f64) -> ResistivityMicrogrid {
    ResistivityMicrogrid::new(ArrayD::from_elem(IxDyn(shape), resistivity), 100.0).unwrap()
}

#[test]
fn test_uncomputed_grid_rejects_reads() {
    let grid = uniform_grid(&[8, 20], 500.0);

    assert!(matches!(
        grid.periods().unwrap_err(),
        MtError::NotComputed { field: "periods" }
    ));
    assert!(matches!(
        grid.apparent_resistivity().unwrap_err(),
        MtError::NotComputed {
            field: "apparent_resistivity"
        }
    ));
    assert!(matches!(
        grid.impedance_phase().unwrap_err(),
        MtError::NotComputed {
            field: "impedance_phase"
        }
    ));
}

#[test]
fn test_compute_then_read() {
    let mut grid = uniform_grid(&[8, 20], 500.0);
    let periods = arr1(&[0.01, 0.1, 1.0]);
    grid.compute_direct_task(periods.view()).unwrap();

    assert!(grid.is_computed());
    assert_eq!(grid.periods().unwrap(), &periods);
    assert_eq!(grid.apparent_resistivity().unwrap().shape(), &[8, 3]);
    assert_eq!(grid.impedance_phase().unwrap().shape(), &[8, 3]);
}

#[test]
fn test_recompute_replaces_response() {
    let mut grid = uniform_grid(&[4, 10], 100.0);

    let first = arr1(&[0.01, 0.1]);
    grid.compute_direct_task(first.view()).unwrap();
    assert_eq!(grid.apparent_resistivity().unwrap().shape(), &[4, 2]);

    let second = arr1(&[0.01, 0.1, 1.0, 10.0, 100.0]);
    grid.compute_direct_task(second.view()).unwrap();
    assert_eq!(grid.periods().unwrap(), &second);
    assert_eq!(grid.apparent_resistivity().unwrap().shape(), &[4, 5]);
    assert_eq!(grid.impedance_phase().unwrap().shape(), &[4, 5]);
}

#[test]
fn test_failed_compute_leaves_state_untouched() {
    let mut grid = uniform_grid(&[4, 10], 100.0);
    let good = arr1(&[0.01, 0.1]);
    grid.compute_direct_task(good.view()).unwrap();

    // Non-positive period fails validation inside the solver.
    let bad = arr1(&[0.01, -1.0]);
    let err = grid.compute_direct_task(bad.view()).unwrap_err();
    assert!(matches!(err, MtError::NonPositivePeriod { index: 1, .. }));

    // The previous response is still readable.
    assert_eq!(grid.periods().unwrap(), &good);
    assert_eq!(grid.apparent_resistivity().unwrap().shape(), &[4, 2]);
}

#[test]
fn test_rank_4_grid_is_rejected() {
    let mut grid = uniform_grid(&[2, 3, 4, 5], 100.0);
    let periods = arr1(&[0.01]);
    let err = grid.compute_direct_task(periods.view()).unwrap_err();
    assert_eq!(
        err,
        MtError::UnsupportedRank {
            ndim: 4,
            shape: vec![2, 3, 4, 5]
        }
    );
    // Failure must not advance the state.
    assert!(!grid.is_computed());
    assert!(grid.periods().is_err());
}

#[test]
fn test_compute_3d_grid() {
    let mut grid = uniform_grid(&[3, 4, 12], 800.0);
    let periods = arr1(&[0.01, 1.0]);
    grid.compute_direct_task(periods.view()).unwrap();

    let rho = grid.apparent_resistivity().unwrap();
    assert_eq!(rho.shape(), &[3, 4, 2]);
    // Uniform resistivity behaves as a homogeneous half-space everywhere.
    for &r in rho.iter() {
        assert!((r - 800.0).abs() < 1e-6);
    }
    for &p in grid.impedance_phase().unwrap().iter() {
        assert!((p - -45.0).abs() < 1e-6);
    }
}
