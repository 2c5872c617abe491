mod common;

use common::single_scorer_engine;
use routescore_lib::{
    DirectionalEdge, Error, Metadata, Node, ScorerConfig, ScorerKind, ScoringConfig,
    ScoringEngine,
};
use serde_json::json;

#[test]
fn default_engine_scores_distance() {
    let engine = ScoringEngine::new(&ScoringConfig::default()).expect("defaults resolve");
    assert_eq!(engine.num_plugins(), 2);
    assert_eq!(engine.scorer_names(), vec!["DistanceScorer", "AdjustEdgesScorer"]);

    let mut n1 = Node::new(1, 0.0, 0.0);
    let n2 = Node::new(2, 0.0, 0.0);
    {
        let edge = DirectionalEdge::new(10, &n1, &n2);
        assert_eq!(engine.score(&edge).cost(), Some(0.0));
    }

    n1.coords.x = 1.0;
    let edge = DirectionalEdge::new(10, &n1, &n2);
    assert_eq!(engine.score(&edge).cost(), Some(1.0));

    let edge = edge.with_metadata(Metadata::new().with("speed_limit", 0.8));
    let cost = engine.score(&edge).cost().expect("traversable");
    assert!((cost - 1.25).abs() < 1e-9);
}

#[test]
fn unknown_plugin_fails_construction() {
    let config = ScoringConfig::with_scorers(["FakeScorer"])
        .with_scorer("FakeScorer", ScorerConfig::plugin("FakePluginPath"));
    let err = ScoringEngine::new(&config).expect_err("plugin does not exist");
    match err {
        Error::UnknownScorer { name, plugin, .. } => {
            assert_eq!(name, "FakeScorer");
            assert_eq!(plugin, "FakePluginPath");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_options_fail_construction() {
    let config = ScoringConfig::with_scorers(["TimeScorer"]).with_scorer(
        "TimeScorer",
        ScorerConfig::plugin("TimeScorer").with_option("max_vel", 0.0),
    );
    assert!(ScoringEngine::new(&config).is_err());

    let config = ScoringConfig::with_scorers(["PenaltyScorer"]).with_scorer(
        "PenaltyScorer",
        ScorerConfig::plugin("PenaltyScorer").with_option("penalty_tga", "p"),
    );
    let err = ScoringEngine::new(&config).expect_err("unknown option");
    assert!(matches!(err, Error::InvalidScorerOptions { .. }));
}

#[test]
fn penalty_scorer_reads_metadata() {
    let engine = single_scorer_engine("PenaltyScorer", ScorerConfig::plugin("PenaltyScorer"));
    assert_eq!(engine.num_plugins(), 1);

    let n1 = Node::new(1, 1.0, 0.0);
    let n2 = Node::new(2, 0.0, 0.0);
    let edge = DirectionalEdge::new(10, &n1, &n2);
    assert_eq!(engine.score(&edge).cost(), Some(0.0));

    let edge = edge.with_metadata(Metadata::new().with("penalty", 10.0));
    assert_eq!(engine.score(&edge).cost(), Some(10.0));
}

#[test]
fn time_scorer_prefers_measured_time() {
    let engine = single_scorer_engine("TimeScorer", ScorerConfig::plugin("TimeScorer"));

    let n1 = Node::new(1, 1.0, 0.0);
    let n2 = Node::new(2, 0.0, 0.0);
    let mut edge = DirectionalEdge::new(10, &n1, &n2)
        .with_metadata(Metadata::new().with("abs_time_taken", 10.0));
    assert_eq!(engine.score(&edge).cost(), Some(10.0));

    // 1 m at the default 0.5 m/s.
    edge.metadata.clear();
    assert_eq!(engine.score(&edge).cost(), Some(2.0));

    edge.metadata.set("abs_speed_limit", 0.85);
    let cost = engine.score(&edge).cost().expect("traversable");
    assert!((cost - 1.0 / 0.85).abs() < 1e-6);

    edge.metadata.set("abs_time_taken", 10.0);
    assert_eq!(engine.score(&edge).cost(), Some(10.0));
}

fn semantic_config(semantic_key: &str) -> ScorerConfig {
    ScorerConfig::plugin("SemanticScorer")
        .with_option("semantic_key", semantic_key)
        .with_option("semantic_classes", json!(["Test", "Test1", "Test2"]))
        .with_option("Test", 0.0)
        .with_option("Test1", 1.0)
        .with_option("Test2", 2.0)
}

#[test]
fn semantic_scorer_looks_up_class_value() {
    let engine = single_scorer_engine("SemanticScorer", semantic_config("class"));

    let n1 = Node::new(1, 1.0, 0.0);
    let n2 = Node::new(2, 0.0, 0.0);
    let edge = DirectionalEdge::new(10, &n1, &n2);
    assert_eq!(engine.score(&edge).cost(), Some(0.0));

    let edge = edge.with_metadata(Metadata::new().with("class", "Test1"));
    assert_eq!(engine.score(&edge).cost(), Some(1.0));

    let n2 = Node::new(2, 0.0, 0.0).with_metadata(Metadata::new().with("class", "Test2"));
    let edge = DirectionalEdge::new(10, &n1, &n2)
        .with_metadata(Metadata::new().with("class", "Test2"));
    assert_eq!(engine.score(&edge).cost(), Some(4.0));

    let n2 = Node::new(2, 0.0, 0.0).with_metadata(Metadata::new().with("class", "Test4"));
    let edge = DirectionalEdge::new(10, &n1, &n2)
        .with_metadata(Metadata::new().with("class", "Test4"));
    assert_eq!(engine.score(&edge).cost(), Some(0.0));
}

#[test]
fn semantic_scorer_matches_class_keys() {
    let engine = single_scorer_engine("SemanticScorer", semantic_config(""));

    let n1 = Node::new(1, 1.0, 0.0);
    let n2 = Node::new(2, 0.0, 0.0);

    // Class names are keys in this mode; a `class` entry means nothing.
    let edge = DirectionalEdge::new(10, &n1, &n2)
        .with_metadata(Metadata::new().with("class", "Test1"));
    assert_eq!(engine.score(&edge).cost(), Some(0.0));

    let edge = DirectionalEdge::new(10, &n1, &n2)
        .with_metadata(Metadata::new().with("Test1", "present"));
    assert_eq!(engine.score(&edge).cost(), Some(1.0));

    let n2 = Node::new(2, 0.0, 0.0).with_metadata(Metadata::new().with("Test2", 1));
    let mut edge =
        DirectionalEdge::new(10, &n1, &n2).with_metadata(Metadata::new().with("Test2", 1));
    assert_eq!(engine.score(&edge).cost(), Some(4.0));

    edge.metadata.set("Test1", "present");
    assert_eq!(engine.score(&edge).cost(), Some(5.0));
}

#[test]
fn semantic_scorer_ignores_unknown_class_keys() {
    let engine = single_scorer_engine("SemanticScorer", semantic_config(""));

    let n1 = Node::new(1, 1.0, 0.0);
    let n2 = Node::new(2, 0.0, 0.0);
    let mut edge =
        DirectionalEdge::new(10, &n1, &n2).with_metadata(Metadata::new().with("Test2", 1));
    assert_eq!(engine.score(&edge).cost(), Some(2.0));

    edge.metadata.clear();
    edge.metadata.set("Test4", 1);
    assert_eq!(engine.score(&edge).cost(), Some(0.0));
}

#[test]
fn namespaced_plugin_names_resolve() {
    let config = ScoringConfig::with_scorers(["Closures", "Length"])
        .with_scorer("Closures", ScorerConfig::plugin("routescore::AdjustEdgesScorer"))
        .with_scorer("Length", ScorerConfig::plugin("routescore::DistanceScorer"));
    let engine = ScoringEngine::new(&config).expect("config resolves");
    assert_eq!(
        engine.scorer_kinds(),
        vec![ScorerKind::AdjustEdges, ScorerKind::Distance]
    );
    assert!(engine.adjust_edges_handle("Closures").is_some());
    assert!(engine.adjust_edges_handle("Length").is_none());
}

#[test]
fn engine_config_parses_from_json() {
    let config: ScoringConfig = serde_json::from_value(json!({
        "edge_cost_functions": ["DistanceScorer", "PenaltyScorer"],
        "scorers": {
            "PenaltyScorer": { "plugin": "PenaltyScorer", "weight": 3.0, "penalty_tag": "toll" }
        }
    }))
    .expect("config parses");
    let engine = ScoringEngine::new(&config).expect("config resolves");

    let n1 = Node::new(1, 0.0, 0.0);
    let n2 = Node::new(2, 2.0, 0.0);
    let edge = DirectionalEdge::new(3, &n1, &n2).with_metadata(Metadata::new().with("toll", 1.5));
    assert_eq!(engine.score(&edge).cost(), Some(2.0 + 3.0 * 1.5));
}
