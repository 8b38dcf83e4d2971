//! Integration tests: flow canvas session driven by raw input (wf-editor).
//!
//! Replays pointer and keyboard sequences against a resumed graph and checks
//! the model and the frame geometry the host would draw.

use pretty_assertions::assert_eq;
use wf_core::{
    ConnectionId, EditorConfig, GraphSnapshot, NodeId, NodeKind, Point, ViewTransform, ViewportSize,
};
use wf_editor::{CanvasSession, InputEvent, Modifiers};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn onboarding() -> CanvasSession {
    let json = include_str!("fixtures/onboarding.json");
    let snapshot: GraphSnapshot = serde_json::from_str(json).unwrap();
    CanvasSession::from_snapshot(snapshot, EditorConfig::default()).unwrap()
}

fn click(session: &mut CanvasSession, x: f32, y: f32) -> bool {
    let changed = session.handle(&InputEvent::from_pointer_down(x, y, Modifiers::NONE));
    session.handle(&InputEvent::from_pointer_up(x, y, Modifiers::NONE));
    changed
}

fn press(session: &mut CanvasSession, key: &str) -> bool {
    session.handle(&InputEvent::key(key, Modifiers::NONE))
}

#[test]
fn resumed_graph_renders_every_connection() {
    init();
    let session = onboarding();
    let frame = session.frame();
    assert_eq!(frame.nodes.len(), 4);
    assert_eq!(frame.connections.len(), 3);
    assert!(frame.preview.is_none());

    let ids: Vec<String> = frame.nodes.iter().map(|n| n.id.to_string()).collect();
    assert_eq!(ids, vec!["hired", "accounts", "welcome", "ready"]);
}

#[test]
fn connect_by_keyboard_then_click() {
    init();
    let mut session = onboarding();
    let hired = NodeId::intern("hired");
    let ready = NodeId::intern("ready");

    assert!(click(&mut session, 30.0, 30.0));
    assert_eq!(session.selected(), Some(hired));
    assert!(press(&mut session, "c"));

    session.handle(&InputEvent::from_pointer_move(500.0, 200.0, Modifiers::NONE));
    let preview = session.frame().preview.unwrap();
    assert_eq!(preview.from, Point::new(30.0, 30.0));
    assert_eq!(preview.to, Point::new(500.0, 200.0));

    assert!(click(&mut session, 690.0, 30.0));
    assert_eq!(session.graph().connection_count(), 4);
    assert_eq!(session.graph().connections_of(ready).len(), 2);
    assert!(session.frame().preview.is_none());
}

#[test]
fn deleting_a_middle_step_cascades() {
    init();
    let mut session = onboarding();
    assert!(click(&mut session, 200.0, 20.0));
    assert_eq!(session.selected(), Some(NodeId::intern("accounts")));

    assert!(press(&mut session, "Delete"));
    assert_eq!(session.graph().node_count(), 3);
    let left: Vec<ConnectionId> = session.graph().connections().map(|c| c.id).collect();
    assert_eq!(left, vec![ConnectionId::intern("e3")]);
    assert!(!press(&mut session, "Delete"), "nothing selected any more");
}

#[test]
fn fit_then_drop_lands_under_the_cursor() {
    init();
    let mut session = onboarding();
    session.resize(ViewportSize {
        width: 400.0,
        height: 300.0,
    });
    assert!(session.fit_to_content());
    assert!(session.viewport().scale() < 1.0);

    let screen = Point::new(200.0, 250.0);
    let id = session.drop_node(NodeKind::Timer, screen);
    let node = session.graph().node(id).unwrap();
    let back = session.viewport().to_screen_point(node.position);
    assert!((back.x - screen.x).abs() < 1e-3);
    assert!((back.y - screen.y).abs() < 1e-3);
}

#[test]
fn view_survives_pan_zoom_and_reset() {
    init();
    let mut session = onboarding();
    session.handle(&InputEvent::from_pointer_down(300.0, 400.0, Modifiers::NONE));
    session.handle(&InputEvent::from_pointer_move(350.0, 420.0, Modifiers::NONE));
    session.handle(&InputEvent::from_pointer_up(350.0, 420.0, Modifiers::NONE));
    assert!(press(&mut session, "+"));
    assert_ne!(session.view(), ViewTransform::default());

    let saved = session.view();
    assert!(press(&mut session, "0"));
    session.set_view(saved);
    assert_eq!(session.view(), saved);
}

#[test]
fn frame_serializes_for_the_host() {
    init();
    let mut session = onboarding();
    session.begin_connection(NodeId::intern("welcome"));
    session.handle(&InputEvent::from_pointer_move(10.0, 300.0, Modifiers::NONE));

    let json = serde_json::to_value(session.frame()).unwrap();
    assert_eq!(json["nodes"][1]["kind"], "integration");
    assert_eq!(json["connections"][1]["curve"], "bezier");
    assert_eq!(json["preview"]["to"]["y"], 300.0);
}
