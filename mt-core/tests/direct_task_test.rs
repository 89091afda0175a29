//! Acceptance tests for the 1D direct task against the reference fixture.
//!
//! The fixture holds the canonical two-layer case (1000 Ohm*m sediment over
//! a 1 Ohm*m half-space, 5 km thick, periods 0.01 * 2^i for i = 0..=26)
//! with expected outputs pre-rounded to 2 decimal places. The solver must
//! reproduce them bit-for-bit after the same rounding.

use ndarray::{arr1, Array1};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use mt_core::{direct_task_1d, direct_task_2d};

#[derive(Debug, Deserialize)]
struct DirectTaskCase {
    periods: Vec<f64>,
    layer_resistivity: Vec<f64>,
    layer_power: Vec<f64>,
    rho: Vec<f64>,
    phi: Vec<f64>,
}

fn load_case(name: &str) -> DirectTaskCase {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&raw)
        .unwrap_or_else(|e| panic!("failed to parse fixture {}: {}", path.display(), e))
}

fn round2(values: &Array1<f64>) -> Vec<f64> {
    values.iter().map(|x| (x * 100.0).round() / 100.0).collect()
}

#[test]
fn test_two_layer_reference_case() {
    let case = load_case("two_layer_case.json");

    let (rho, phi) = direct_task_1d(
        Array1::from(case.periods.clone()).view(),
        Array1::from(case.layer_resistivity.clone()).view(),
        Array1::from(case.layer_power.clone()).view(),
    )
    .unwrap();

    assert_eq!(round2(&rho), case.rho);
    assert_eq!(round2(&phi), case.phi);
}

#[test]
fn test_homogeneous_half_space_is_exact() {
    for rho_1 in [1.0, 42.0, 10_000.0] {
        let periods = arr1(&[0.01, 0.5, 7.0, 1.0e4]);
        let (rho, phi) = direct_task_1d(
            periods.view(),
            arr1(&[rho_1]).view(),
            arr1(&[] as &[f64]).view(),
        )
        .unwrap();
        for i in 0..periods.len() {
            assert_eq!(rho[i], rho_1, "apparent resistivity must equal rho_1");
            assert_eq!(phi[i], -45.0, "half-space phase must be exactly -45");
        }
    }
}

#[test]
fn test_lifted_rows_match_leaf_solver() {
    let case = load_case("two_layer_case.json");
    let periods = Array1::from(case.periods);

    // Three columns with progressively thicker sediment cover.
    let width = 3;
    let mut resistivity = ndarray::Array2::<f64>::zeros((width, 2));
    let mut power = ndarray::Array2::<f64>::zeros((width, 1));
    for i in 0..width {
        resistivity[[i, 0]] = 1000.0;
        resistivity[[i, 1]] = 1.0;
        power[[i, 0]] = 2500.0 * (i + 1) as f64;
    }

    let (rho2, phi2) = direct_task_2d(periods.view(), resistivity.view(), power.view()).unwrap();
    assert_eq!(rho2.shape(), &[width, periods.len()]);

    for i in 0..width {
        let (rho1, phi1) =
            direct_task_1d(periods.view(), resistivity.row(i), power.row(i)).unwrap();
        assert_eq!(rho2.row(i).to_owned(), rho1, "row {} rho mismatch", i);
        assert_eq!(phi2.row(i).to_owned(), phi1, "row {} phi mismatch", i);
    }

    // The middle column is the reference stack itself.
    let (rho_mid, phi_mid) = direct_task_1d(
        periods.view(),
        resistivity.row(1),
        power.row(1),
    )
    .unwrap();
    assert_eq!(round2(&rho_mid), case.rho);
    assert_eq!(round2(&phi_mid), case.phi);
}
