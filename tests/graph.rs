//! Tests for graph editing: connection rules, product drops and canvas documents.
mod common;
use common::*;
use flowline::graph::{Bounds, DEFAULT_PRODUCT_COLOR};
use flowline::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_store_assigns_unique_increasing_ids() {
    let mut store = GraphStore::new();
    let a = store.add_machine(Position::new(0.0, 0.0));
    let b = store.add_queue(Position::new(0.0, 0.0));
    let c = store.drop_item(NodeKind::Machine, Position::new(5.0, 5.0)).unwrap();

    assert_eq!(a.as_str(), "dndnode_0");
    assert_eq!(b.as_str(), "dndnode_1");
    assert_eq!(c.as_str(), "dndnode_2");
    assert_eq!(store.node(c.as_str()).unwrap().seq, Some(2));
}

#[test]
fn test_same_kind_connections_are_rejected() {
    let mut store = GraphStore::new();
    let m1 = store.add_machine(Position::default());
    let m2 = store.add_machine(Position::default());
    let q1 = store.add_queue(Position::default());
    let q2 = store.add_queue(Position::default());

    let err = store.connect(m1.as_str(), m2.as_str()).unwrap_err();
    assert!(err.to_string().contains("same-kind connection"));
    assert_eq!(
        store.connect(q1.as_str(), q2.as_str()),
        Err(ConnectionRejected::SameKind {
            kind: NodeKind::Queue
        })
    );
    assert!(store.edges().is_empty());
}

#[test]
fn test_machine_gets_at_most_one_output() {
    let (mut store, _, machine, _) = create_simple_line();
    let extra = store.add_queue(Position::new(400.0, 200.0));

    let err = store.connect(machine.as_str(), extra.as_str()).unwrap_err();
    assert!(err.to_string().contains("machine already has an output"));
    assert_eq!(store.edges().len(), 2);
}

#[test]
fn test_queue_fans_out_and_machine_fans_in() {
    let mut store = GraphStore::new();
    let q1 = store.add_queue(Position::default());
    let q2 = store.add_queue(Position::default());
    let m1 = store.add_machine(Position::default());
    let m2 = store.add_machine(Position::default());

    assert!(store.connect(q1.as_str(), m1.as_str()).is_ok());
    assert!(store.connect(q1.as_str(), m2.as_str()).is_ok());
    assert!(store.connect(q2.as_str(), m1.as_str()).is_ok());
    assert_eq!(store.edges().len(), 3);
    assert!(store.edges().iter().all(|e| e.kind == EdgeKind::Link));
}

#[test]
fn test_connecting_unknown_node_is_rejected() {
    let mut store = GraphStore::new();
    let q = store.add_queue(Position::default());
    assert_eq!(
        store.connect(q.as_str(), "dndnode_42"),
        Err(ConnectionRejected::UnknownEndpoint {
            node_id: "dndnode_42".to_string()
        })
    );
}

#[test]
fn test_validator_checks_rules_in_order() {
    let validator = ConnectionValidator::new();
    let nodes = vec![
        node("dndnode_0", NodeKind::Machine),
        node("dndnode_1", NodeKind::Queue),
        node("dndnode_2", NodeKind::Machine),
    ];
    let edges = vec![Edge::link("dndnode_0", "dndnode_1")];

    // Same kind wins over the output rule.
    assert!(matches!(
        validator.validate(&nodes, "dndnode_0", "dndnode_2", &edges),
        Err(ConnectionRejected::SameKind { .. })
    ));
    assert!(matches!(
        validator.validate(&nodes, "dndnode_0", "dndnode_1", &edges),
        Err(ConnectionRejected::MachineAlreadyHasOutput { .. })
    ));
    assert_eq!(
        validator.validate(&nodes, "dndnode_1", "dndnode_2", &edges),
        Ok(EdgeKind::Link)
    );
}

#[test]
fn test_dropped_product_lands_in_queue_under_point() {
    let mut store = GraphStore::new();
    let q = store.add_queue(Position::new(100.0, 100.0));

    assert_eq!(store.drop_product(Position::new(150.0, 120.0)), Some(q.clone()));
    let products = &store.node(q.as_str()).unwrap().data.products;
    assert_eq!(products, &vec![Product::new(DEFAULT_PRODUCT_COLOR)]);
}

#[test]
fn test_queue_hitbox_grows_with_products() {
    let mut store = GraphStore::new();
    let q = store.add_queue(Position::new(0.0, 0.0));

    // Empty queue: 90 x 50, edges inclusive.
    assert!(store.drop_product(Position::new(90.0, 50.0)).is_some());
    // One product now: height 70.
    assert!(store.drop_product(Position::new(45.0, 70.0)).is_some());
    assert!(store.drop_product(Position::new(45.0, 90.0 + 0.5)).is_none());
    assert_eq!(store.node(q.as_str()).unwrap().data.products.len(), 2);
}

#[test]
fn test_product_missing_every_queue_is_discarded() {
    let mut store = GraphStore::new();
    let m = store.add_machine(Position::new(0.0, 0.0));
    store.add_queue(Position::new(500.0, 500.0));
    let before = store.clone();

    assert_eq!(store.drop_item(NodeKind::Product, Position::new(10.0, 10.0)), None);
    assert_eq!(store.nodes(), before.nodes());
    assert!(store.node(m.as_str()).unwrap().data.products.is_empty());
}

#[test]
fn test_overlapping_queues_first_wins() {
    let mut store = GraphStore::new();
    let first = store.add_queue(Position::new(0.0, 0.0));
    let second = store.add_queue(Position::new(10.0, 10.0));

    assert_eq!(store.drop_product(Position::new(20.0, 20.0)), Some(first));
    assert!(store.node(second.as_str()).unwrap().data.products.is_empty());
}

#[test]
fn test_product_drop_builds_new_sequence() {
    let mut store = GraphStore::new();
    let q = store.add_queue(Position::new(0.0, 0.0));
    store.drop_product(Position::new(1.0, 1.0));
    let snapshot = store.clone();

    store.drop_product(Position::new(1.0, 1.0));
    assert_eq!(snapshot.node(q.as_str()).unwrap().data.products.len(), 1);
    assert_eq!(store.node(q.as_str()).unwrap().data.products.len(), 2);
}

#[test]
fn test_placement_bounds_only_for_queues() {
    let resolver = ProductPlacementResolver::default();
    let queue = queue_with("dndnode_0", &["#e0e0e0", "#e0e0e0"]);
    assert_eq!(
        resolver.bounds(&queue),
        Some(Bounds {
            x: 0.0,
            y: 0.0,
            width: 90.0,
            height: 90.0
        })
    );
    assert_eq!(resolver.bounds(&node("dndnode_1", NodeKind::Machine)), None);
}

#[test]
fn test_remove_and_move_nodes() {
    let (mut store, input, machine, output) = create_simple_line();

    store.move_node(output.as_str(), Position::new(1.0, 2.0)).unwrap();
    assert_eq!(store.node(output.as_str()).unwrap().position, Position::new(1.0, 2.0));

    let removed = store.remove_node(machine.as_str()).unwrap();
    assert_eq!(removed.kind, NodeKind::Machine);
    assert!(store.edges().is_empty());
    assert!(store.node(input.as_str()).is_some());

    assert_eq!(
        store.remove_node("dndnode_99"),
        Err(GraphError::NodeNotFound("dndnode_99".to_string()))
    );
}

#[test]
fn test_remove_edge_frees_machine_output() {
    let (mut store, _, machine, output) = create_simple_line();
    let edge_id = store
        .edges()
        .iter()
        .find(|e| e.source == machine)
        .unwrap()
        .id
        .clone();

    assert!(store.remove_edge(&edge_id).is_some());
    assert!(store.remove_edge(&edge_id).is_none());
    assert!(store.connect(machine.as_str(), output.as_str()).is_ok());
}

#[test]
fn test_clear_restarts_ids() {
    let (mut store, ..) = create_simple_line();
    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.add_queue(Position::default()).as_str(), "dndnode_0");
}

#[test]
fn test_loads_canvas_document() {
    let json = r##"{
        "nodes": [
            {"id": "dndnode_0", "type": "Machine", "position": {"x": 10, "y": 20}, "data": {"label": "Press", "products": []}},
            {"id": " dndnode_1", "type": "Queue", "position": {"x": 0, "y": 0}, "data": {"products": [{"color": "#ff0000"}]}},
            {"id": "dndnode_2", "type": "Queue", "position": {"x": 300, "y": 0}}
        ],
        "edges": [
            {"source": " dndnode_1", "target": "dndnode_0"},
            {"source": "dndnode_0", "target": "dndnode_2", "type": "Link"},
            {"source": " dndnode_1", "target": "dndnode_2"}
        ]
    }"##;

    let store = UiGraph::from_json(json).unwrap().into_graph().unwrap();
    assert_eq!(store.nodes().len(), 3);
    // The queue-to-queue edge never enters the store.
    assert_eq!(store.edges().len(), 2);
    assert_eq!(store.node("dndnode_0").unwrap().data.label, "Press");

    let structure = GraphCompiler::default().compile_store(&store);
    let machine = structure.machine(0).unwrap();
    assert_eq!(machine.input_queue_ids, vec![1]);
    assert_eq!(machine.output_queue_ids, vec![2]);
    assert_eq!(structure.queue(1).unwrap().products[0].color, "#ff0000");
}

#[test]
fn test_loaded_store_continues_id_sequence() {
    let graph = UiGraph::from(&create_simple_line().0);
    let mut store = graph.into_graph().unwrap();
    assert_eq!(store.add_machine(Position::default()).as_str(), "dndnode_3");
}

#[test]
fn test_unknown_node_type_fails_conversion() {
    let json = r#"{"nodes": [{"id": "dndnode_0", "type": "Conveyor"}]}"#;
    let result = UiGraph::from_json(json).unwrap().into_graph();
    assert!(matches!(
        result,
        Err(GraphConversionError::UnknownNodeType { ref type_name, .. }) if type_name == "Conveyor"
    ));
}

#[test]
fn test_invalid_json_fails_conversion() {
    assert!(matches!(
        UiGraph::from_json("{nodes: ["),
        Err(GraphConversionError::JsonParse(_))
    ));
}

#[test]
fn test_canvas_round_trip_keeps_type_names() {
    let (store, ..) = create_simple_line();
    let graph = UiGraph::from(&store);
    let json = serde_json::to_value(&graph).unwrap();
    assert_eq!(json["nodes"][0]["type"], "Queue");
    assert_eq!(json["nodes"][1]["type"], "Machine");
    assert_eq!(json["edges"][0]["source"], "dndnode_0");
}

#[test]
fn test_duplicate_ids_in_canvas_keep_first_node() {
    let json = r#"{"nodes": [
        {"id": "dndnode_0", "type": "Machine"},
        {"id": "dndnode_0", "type": "Queue"}
    ]}"#;
    let store = UiGraph::from_json(json).unwrap().into_graph().unwrap();

    assert_eq!(store.nodes().len(), 1);
    assert_eq!(store.node("dndnode_0").unwrap().kind, NodeKind::Machine);
}

#[test]
fn test_snapshot_with_repeated_ids_keeps_first_node() {
    let mut store = GraphStore::new();
    store.replace_nodes(vec![
        queue_with("dndnode_5", &["#aaaaaa"]),
        queue_with("dndnode_5", &["#bbbbbb"]),
    ]);

    assert_eq!(store.nodes().len(), 1);
    assert_eq!(store.node("dndnode_5").unwrap().data.products[0].color, "#aaaaaa");
    assert_eq!(store.add_machine(Position::default()).as_str(), "dndnode_6");
}

#[test]
fn test_snapshot_drops_edges_to_missing_nodes() {
    let (mut store, input, machine, output) = create_simple_line();
    let snapshot: Vec<Node> = store
        .nodes()
        .iter()
        .filter(|n| n.id != output)
        .cloned()
        .collect();

    store.replace_nodes(snapshot);
    assert_eq!(store.edges().len(), 1);
    assert_eq!(store.edges()[0].source, input);

    // The machine's output slot is free again.
    let fresh = store.add_queue(Position::new(600.0, 0.0));
    assert!(store.connect(machine.as_str(), fresh.as_str()).is_ok());
}
