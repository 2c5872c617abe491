//! Common test fixtures.
//!
//! Provides the shared 10 m x 10 m test costmap and engine helpers used by
//! the scoring integration tests.

use routescore_lib::costmap::{MapCell, LETHAL_OBSTACLE};
use routescore_lib::{Coordinates, Costmap, ScorerConfig, ScoringConfig, ScoringEngine};

/// 100 x 100 cells at 0.1 m, origin at (0, 0).
///
/// ```text
/// * = 100, - = 0, / = 254 (x to the right, y upwards)
/// * * * * - - - - - - - -
/// * * * * - - - - - - - -
/// * * * * / / / / - - - -
/// * * * * / / / / - - - -
/// * * * * / / / / - - - -
/// * * * * - - - - - - - -
/// * * * * - - - - - - - -
/// ```
///
/// Cells with x below 40 cost 100; cells 40..=60 on both axes are lethal.
#[allow(dead_code)]
pub fn demo_costmap() -> Costmap {
    let mut costmap =
        Costmap::new(100, 100, 0.1, Coordinates::new(0.0, 0.0), 0).expect("valid costmap");
    for x in 40..=60 {
        for y in 40..=60 {
            costmap.set_cost(MapCell::new(x, y), LETHAL_OBSTACLE);
        }
    }
    for x in 0..40 {
        for y in 0..100 {
            costmap.set_cost(MapCell::new(x, y), 100);
        }
    }
    costmap
}

/// Engine running a single scorer configured as `name` with `config`.
#[allow(dead_code)]
pub fn single_scorer_engine(name: &str, config: ScorerConfig) -> ScoringEngine {
    let config = ScoringConfig::with_scorers([name]).with_scorer(name, config);
    ScoringEngine::new(&config).expect("scorer configuration resolves")
}

/// Assert two floats are within `tolerance`.
#[allow(dead_code)]
pub fn assert_near(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
