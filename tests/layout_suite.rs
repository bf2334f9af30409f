use std::collections::HashSet;
use std::path::Path;

use flow_layout::layout::{EdgeKind, NodeKind, PositionedGraph, StepSlot, subgraph_end_id};
use flow_layout::{Config, FlowVersion, LayoutConfig, build_graph, layout_json, parse_flow};

fn load_fixture(name: &str) -> FlowVersion {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_flow(&input).expect("fixture parse failed")
}

fn layout_fixture(name: &str) -> PositionedGraph {
    build_graph(&load_fixture(name), &LayoutConfig::default()).expect("layout failed")
}

fn position(graph: &PositionedGraph, id: &str) -> (f32, f32) {
    let node = graph.node(id).unwrap_or_else(|| panic!("missing node {id}"));
    (node.x, node.y)
}

fn step_names(graph: &PositionedGraph) -> Vec<String> {
    graph
        .nodes
        .iter()
        .filter_map(|node| match &node.kind {
            NodeKind::Step(data) => Some(data.step_name.clone()),
            _ => None,
        })
        .collect()
}

fn count_edges(graph: &PositionedGraph, pred: impl Fn(&EdgeKind) -> bool) -> usize {
    graph.edges.iter().filter(|edge| pred(&edge.kind)).count()
}

#[test]
fn trigger_only_flow() {
    let graph = layout_fixture("trigger_only.json");
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(
        graph.edges[0].kind,
        EdgeKind::StraightLine {
            draw_arrow_head: false,
            parent_step: "trigger".to_string(),
        }
    );
}

#[test]
fn linear_flow_carries_step_payload() {
    let graph = layout_fixture("linear.json");
    assert_eq!(step_names(&graph), vec!["trigger", "step_1", "step_2"]);
    assert_eq!(position(&graph, "step_2"), (0.0, 120.0));
    match &graph.node("step_2").unwrap().kind {
        NodeKind::Step(data) => {
            assert_eq!(data.display_name, "Transform");
            assert_eq!(data.step_type, "CODE");
            assert!(!data.valid);
            assert!(!data.skip);
        }
        other => panic!("unexpected node kind {other:?}"),
    }
}

#[test]
fn loop_fixture_has_one_return_per_filled_loop() {
    let graph = layout_fixture("loops.json");
    assert_eq!(count_edges(&graph, |k| matches!(k, EdgeKind::LoopStart { .. })), 2);
    assert_eq!(count_edges(&graph, |k| matches!(k, EdgeKind::LoopReturn { .. })), 1);

    // step_1 at y=60, body at y=240; step_2 then step_3 stacked in the body.
    assert_eq!(position(&graph, "step_2"), (312.0, 240.0));
    assert_eq!(position(&graph, "step_3"), (312.0, 300.0));
    assert_eq!(position(&graph, "step_1-subgraph-end"), (116.0, 360.0));
    assert_eq!(position(&graph, "step_4"), (0.0, 360.0));

    let ret = graph
        .edges
        .iter()
        .find(|edge| matches!(edge.kind, EdgeKind::LoopReturn { .. }))
        .unwrap();
    assert_eq!(ret.source, "step_2-subgraph-end");
    assert_eq!(ret.target, "step_1");

    let button = graph.node("step_4-big-add-button-inside-loop").unwrap();
    assert_eq!(
        button.kind,
        NodeKind::BigAddButton {
            parent_step: "step_4".to_string(),
            slot: StepSlot::InsideLoop,
        }
    );
}

#[test]
fn router_fixture_fans_out_in_fixed_columns() {
    let graph = layout_fixture("router.json");
    let column = 232.0 + 80.0;
    let heads = ["step_2", "step_3", "step_1-big-add-button-inside-branch-2", "step_5"];
    for (index, head) in heads.iter().enumerate() {
        assert_eq!(position(&graph, head), (index as f32 * column, 270.0), "{head}");
    }
    for pair in heads.windows(2) {
        let (left, _) = position(&graph, pair[0]);
        let (right, _) = position(&graph, pair[1]);
        assert_eq!(right - left, column);
    }

    assert_eq!(count_edges(&graph, |k| matches!(k, EdgeKind::RouterStart { .. })), 4);
    assert_eq!(count_edges(&graph, |k| matches!(k, EdgeKind::RouterEnd { .. })), 4);
    assert_eq!(
        count_edges(&graph, |k| matches!(
            k,
            EdgeKind::RouterStart {
                draw_starting_vertical_line: true,
                ..
            }
        )),
        1
    );
    assert_eq!(
        count_edges(&graph, |k| matches!(
            k,
            EdgeKind::RouterEnd {
                draw_ending_vertical_line: true,
                ..
            }
        )),
        1
    );

    let labels: Vec<&str> = graph
        .edges
        .iter()
        .filter_map(|edge| match &edge.kind {
            EdgeKind::RouterStart { label, .. } => Some(label.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["High priority", "Low priority", "Branch 3", "Otherwise"]);

    // The empty loop in the last branch is the deepest point under the router.
    assert_eq!(position(&graph, "step_5-big-add-button-inside-loop"), (1248.0, 450.0));
    assert_eq!(position(&graph, "step_1-subgraph-end"), (116.0, 500.0));
    assert_eq!(position(&graph, "step_6"), (0.0, 500.0));

    let note = graph.node("note-1").unwrap();
    assert_eq!((note.x, note.y), (-300.0, 40.0));
}

#[test]
fn sentinels_are_unique_and_well_wired() {
    for fixture in ["trigger_only.json", "linear.json", "loops.json", "router.json"] {
        let graph = layout_fixture(fixture);
        let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), graph.nodes.len(), "{fixture}: duplicate node ids");

        for step in step_names(&graph) {
            let end = subgraph_end_id(&step);
            let sentinels = graph.nodes.iter().filter(|n| n.id == end).count();
            assert_eq!(sentinels, 1, "{fixture}: {step}");
            assert!(graph.edges_to(&end).any(|e| e.source == step
                && matches!(e.kind, EdgeKind::StraightLine { .. })));
            assert!(graph.edges_from(&end).all(|e| matches!(
                e.kind,
                EdgeKind::LoopReturn { .. } | EdgeKind::RouterEnd { .. }
            )));
        }

        for edge in &graph.edges {
            assert!(ids.contains(edge.source.as_str()), "{fixture}: {}", edge.id);
            assert!(ids.contains(edge.target.as_str()), "{fixture}: {}", edge.id);
        }
    }
}

#[test]
fn repeated_layout_is_identical() {
    let flow = load_fixture("router.json");
    let first = build_graph(&flow, &LayoutConfig::default()).unwrap();
    let second = build_graph(&flow, &LayoutConfig::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn json_round_trip_through_public_helper() {
    let input = std::fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/router.json"),
    )
    .unwrap();
    let json = layout_json(&input, &Config::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["flow_id"], "flow-router");
    assert_eq!(value["left"], -300.0);
    assert!(value["nodes"].as_array().unwrap().len() > 10);
}

#[test]
fn long_chain_json_lays_out_end_to_end() {
    let steps = 1500;
    let mut input = String::from(r#"{"id":"flow-long","trigger":{"name":"trigger","type":"PIECE_TRIGGER""#);
    for i in 1..=steps {
        input.push_str(&format!(r#","nextAction":{{"name":"step_{i}","type":"PIECE""#));
    }
    input.push_str(&"}".repeat(steps + 2));

    let json = layout_json(&input, &Config::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["flow_id"], "flow-long");
    assert_eq!(value["nodes"].as_array().unwrap().len(), 2 * (steps + 1));
    assert_eq!(value["height"], 60.0 * (steps + 1) as f64);
}
