// Test-only helpers for `routescore-lib` unit tests
#![allow(dead_code)]

use crate::graph::Node;

/// Float comparison with a tolerance suited to the scorers' arithmetic.
pub fn approx_eq(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

/// Two nodes `length` metres apart along the x axis.
pub fn line_nodes(length: f64) -> (Node, Node) {
    (Node::new(1, 0.0, 0.0), Node::new(2, length, 0.0))
}
