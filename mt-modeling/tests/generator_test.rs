//! Integration tests for the synthetic model generators.

use ndarray::arr1;
use std::collections::BTreeSet;

use mt_modeling::{LateralSize, RandomLayerModel, ResistivityModel, SmoothLayerModel};

fn random_layer_model() -> RandomLayerModel {
    RandomLayerModel::new(
        vec![100.0, 2000.0, 100.0, 3000.0],
        vec![50.0, 1000.0, 50.0, 1500.0],
        vec![1.0, 1.0, 0.9, 0.7],
        vec![2000.0, 1500.0, 8000.0, 300.0],
    )
    .unwrap()
}

#[test]
fn test_random_layer_column_invariants() {
    let model = random_layer_model()
        .with_default_resistivity(0.5)
        .with_seed(42);
    let grid = model.to_microgrid(LateralSize::Line(64), 50.0).unwrap();
    let resistivity = grid.resistivity();
    let depth = resistivity.shape()[1];

    let layer_values: BTreeSet<u64> = [2000.0f64, 1500.0, 8000.0, 300.0]
        .iter()
        .map(|v| v.to_bits())
        .collect();

    for x in 0..64 {
        let column = resistivity.index_axis(ndarray::Axis(0), x);
        let painted: Vec<f64> = column.iter().copied().filter(|&v| v != 0.5).collect();
        // Painted pixels can only carry configured layer values, and at most
        // one distinct value per layer.
        let distinct: BTreeSet<u64> = painted.iter().map(|v| v.to_bits()).collect();
        assert!(distinct.len() <= 4);
        assert!(distinct.is_subset(&layer_values));
        assert!(painted.len() <= depth);
        // Layers paint a contiguous prefix of the column: once the default
        // shows up, it runs to the bottom.
        let first_default = column.iter().position(|&v| v == 0.5);
        if let Some(start) = first_default {
            assert!(column.iter().skip(start).all(|&v| v == 0.5));
        }
    }
}

#[test]
fn test_random_layer_seeded_runs_are_bit_identical() {
    let model = random_layer_model().with_seed(1234);
    let a = model.to_microgrid(LateralSize::Line(32), 50.0).unwrap();
    let b = model.to_microgrid(LateralSize::Line(32), 50.0).unwrap();
    assert_eq!(a.resistivity(), b.resistivity());

    let c = model.to_microgrid(LateralSize::Plane(8, 6), 50.0).unwrap();
    let d = model.to_microgrid(LateralSize::Plane(8, 6), 50.0).unwrap();
    assert_eq!(c.resistivity(), d.resistivity());
    assert_eq!(c.resistivity().shape()[..2], [8, 6]);
}

#[test]
fn test_smooth_layer_seeded_runs_are_bit_identical() {
    let model = SmoothLayerModel::new(64, 4, (1.0, 20_000.0), 0.01)
        .unwrap()
        .with_seed(77);
    let a = model.to_microgrid(LateralSize::Line(128), 100.0).unwrap();
    let b = model.to_microgrid(LateralSize::Line(128), 100.0).unwrap();
    assert_eq!(a.resistivity(), b.resistivity());

    let c = model.to_microgrid(LateralSize::Plane(16, 4), 100.0).unwrap();
    let d = model.to_microgrid(LateralSize::Plane(16, 4), 100.0).unwrap();
    assert_eq!(c.resistivity(), d.resistivity());
    assert_eq!(c.resistivity().shape(), &[16, 4, 64]);
}

#[test]
fn test_different_seeds_differ() {
    let a = random_layer_model()
        .with_seed(1)
        .to_microgrid(LateralSize::Line(32), 50.0)
        .unwrap();
    let b = random_layer_model()
        .with_seed(2)
        .to_microgrid(LateralSize::Line(32), 50.0)
        .unwrap();
    assert_ne!(a.resistivity(), b.resistivity());
}

#[test]
fn test_generated_grid_feeds_direct_task() {
    // End to end: generate, then compute the surface response. The random
    // layer default resistivity must be positive for the solver's domain
    // checks.
    let model = random_layer_model()
        .with_default_resistivity(100.0)
        .with_seed(5);
    let mut grid = model.to_microgrid(LateralSize::Line(16), 50.0).unwrap();
    let periods = arr1(&[0.01, 0.1, 1.0, 10.0]);
    grid.compute_direct_task(periods.view()).unwrap();

    let depth = grid.resistivity().shape()[1];
    assert_eq!(grid.apparent_resistivity().unwrap().shape(), &[16, 4]);
    assert_eq!(grid.impedance_phase().unwrap().shape(), &[16, 4]);
    assert!(depth > 0);

    let smooth = SmoothLayerModel::new(48, 5, (1.0, 20_000.0), 0.01)
        .unwrap()
        .with_seed(6);
    let mut grid = smooth.to_microgrid(LateralSize::Plane(8, 4), 100.0).unwrap();
    grid.compute_direct_task(periods.view()).unwrap();
    assert_eq!(grid.apparent_resistivity().unwrap().shape(), &[8, 4, 4]);
}
