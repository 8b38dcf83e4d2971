//! WASM bridge for WF: exposes the flow canvas and form designer to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. Structured values cross the
//! boundary as JSON strings; fallible calls answer `{"ok":true,...}` or
//! `{"ok":false,"error":"..."}` and never panic on bad host input.

mod form;

pub use form::FormGrid;

use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wf_core::{
    ConnectionId, EditorConfig, FieldKind, GraphError, GraphSnapshot, GridError, NodeData, NodeId,
    NodeKind, NodeOverrides, Point, Size, ViewTransform, ViewportSize,
};
use wf_editor::{CanvasSession, InputEvent, Modifiers, ShortcutMap};

// ─── Errors & responses ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown node kind '{0}'")]
    UnknownNodeKind(String),

    #[error("Unknown field kind '{0}'")]
    UnknownFieldKind(String),

    #[error("Unknown id '{0}'")]
    UnknownId(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// `{"ok":true,"value":...}` or `{"ok":false,"error":"..."}`.
pub(crate) fn respond<T: Serialize>(result: Result<T, BridgeError>) -> String {
    let body = match result.and_then(|value| Ok(serde_json::to_value(value)?)) {
        Ok(value) => json!({ "ok": true, "value": value }),
        Err(err) => {
            log::warn!("bridge: {err}");
            json!({ "ok": false, "error": err.to_string() })
        }
    };
    body.to_string()
}

/// Parse an optional JSON argument; blank input means "all defaults".
pub(crate) fn parse_or_default<T>(json: &str) -> Result<T, BridgeError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if json.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(json)?)
}

/// Host config, falling back to defaults (with a warning) when unreadable.
pub(crate) fn config_from_json(json: &str) -> EditorConfig {
    parse_or_default(json).unwrap_or_else(|err| {
        log::warn!("bridge: ignoring editor config: {err}");
        EditorConfig::default()
    })
}

/// Resolve a host id that must already exist. Unknown strings are not interned.
pub(crate) fn known<T>(id: Option<T>, raw: &str) -> Result<T, BridgeError> {
    id.ok_or_else(|| BridgeError::UnknownId(raw.to_string()))
}

fn node_kind(key: &str) -> Result<NodeKind, BridgeError> {
    NodeKind::from_key(key).ok_or_else(|| BridgeError::UnknownNodeKind(key.to_string()))
}

// ─── Flow canvas ─────────────────────────────────────────────────────────

/// The WASM-facing workflow canvas.
///
/// Owns one [`CanvasSession`]; every interaction from the page goes
/// through this struct. Boolean returns mean "re-render needed".
#[wasm_bindgen]
pub struct FlowCanvas {
    session: CanvasSession,
}

#[wasm_bindgen]
impl FlowCanvas {
    /// Create a canvas for a surface of the given size. `config_json` may be
    /// empty or a partial `EditorConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, config_json: &str) -> Self {
        console_error_panic_hook_setup();

        let mut session = CanvasSession::new(config_from_json(config_json));
        session.resize(ViewportSize { width, height });
        Self { session }
    }

    /// Replace the graph with a saved snapshot. The view is left as is.
    /// Answers with the number of nodes loaded.
    pub fn load(&mut self, snapshot_json: &str) -> String {
        respond(self.try_load(snapshot_json))
    }

    pub fn snapshot(&self) -> String {
        respond(Ok(self.session.snapshot()))
    }

    /// Screen-space geometry for the current frame.
    pub fn frame(&self) -> String {
        respond(Ok(self.session.frame()))
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(ViewportSize { width, height });
    }

    // ─── Input ───────────────────────────────────────────────────────────

    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = Modifiers { shift, ctrl, alt, meta };
        self.session.handle(&InputEvent::from_pointer_down(x, y, mods))
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = Modifiers { shift, ctrl, alt, meta };
        self.session.handle(&InputEvent::from_pointer_move(x, y, mods))
    }

    pub fn handle_pointer_up(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let mods = Modifiers { shift, ctrl, alt, meta };
        self.session.handle(&InputEvent::from_pointer_up(x, y, mods))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn handle_wheel(
        &mut self,
        dx: f32,
        dy: f32,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = Modifiers { shift, ctrl, alt, meta };
        self.session.handle(&InputEvent::Wheel {
            dx,
            dy,
            x,
            y,
            modifiers,
        })
    }

    /// Handle a keyboard event. Returns `{"changed":bool,"action":"<name>"}`.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let mods = Modifiers { shift, ctrl, alt, meta };
        let Some(action) = ShortcutMap::resolve(key, mods) else {
            return r#"{"changed":false,"action":"none"}"#.to_string();
        };
        let changed = self.session.apply_shortcut(action);
        json!({ "changed": changed, "action": action.name() }).to_string()
    }

    // ─── Graph edits ─────────────────────────────────────────────────────

    /// Add a node at a canvas position. `overrides_json` may be empty.
    /// Answers with the new node id.
    pub fn add_node(&mut self, kind: &str, x: f32, y: f32, overrides_json: &str) -> String {
        let result = node_kind(kind).and_then(|kind| {
            let overrides: NodeOverrides = parse_or_default(overrides_json)?;
            Ok(self.session.add_node(kind, Point::new(x, y), overrides))
        });
        respond(result)
    }

    /// Add a palette node dropped at a screen position.
    pub fn drop_node(&mut self, kind: &str, screen_x: f32, screen_y: f32) -> String {
        let result =
            node_kind(kind).map(|kind| self.session.drop_node(kind, Point::new(screen_x, screen_y)));
        respond(result)
    }

    pub fn remove_node(&mut self, node_id: &str) -> bool {
        NodeId::get(node_id).is_some_and(|id| self.session.remove_node(id).is_some())
    }

    /// Move a node's top-left corner to a canvas position.
    pub fn move_node_to(&mut self, node_id: &str, x: f32, y: f32) -> bool {
        NodeId::get(node_id).is_some_and(|id| self.session.set_node_position(id, Point::new(x, y)))
    }

    /// `false` for unknown ids and non-positive sizes.
    pub fn resize_node(&mut self, node_id: &str, width: f32, height: f32) -> bool {
        NodeId::get(node_id).is_some_and(|id| self.session.resize_node(id, Size::new(width, height)))
    }

    /// Replace a node's label, description, properties and style.
    pub fn set_node_data(&mut self, node_id: &str, data_json: &str) -> String {
        let result = known(NodeId::get(node_id), node_id).and_then(|id| {
            let data: NodeData = serde_json::from_str(data_json)?;
            Ok(self.session.set_node_data(id, data)?)
        });
        respond(result)
    }

    pub fn connect(&mut self, source: &str, target: &str) -> String {
        let result = known(NodeId::get(source), source).and_then(|source| {
            let target = known(NodeId::get(target), target)?;
            Ok(self.session.connect(source, target)?)
        });
        respond(result)
    }

    pub fn remove_connection(&mut self, connection_id: &str) -> String {
        let result = known(ConnectionId::get(connection_id), connection_id)
            .and_then(|id| Ok(self.session.remove_connection(id)?));
        respond(result)
    }

    // ─── Modes & selection ───────────────────────────────────────────────

    pub fn begin_connection(&mut self, node_id: &str) -> bool {
        NodeId::get(node_id).is_some_and(|id| self.session.begin_connection(id))
    }

    pub fn cancel_connection(&mut self) -> bool {
        self.session.cancel_connection()
    }

    pub fn is_connecting(&self) -> bool {
        self.session.connection().is_connecting()
    }

    /// Selected node id, or an empty string.
    pub fn get_selected_id(&self) -> String {
        self.session
            .selected()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    /// Select by id; an empty string clears the selection.
    pub fn select_by_id(&mut self, node_id: &str) -> bool {
        if node_id.is_empty() {
            return self.session.select(None);
        }
        NodeId::get(node_id).is_some_and(|id| self.session.select(Some(id)))
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn fit_to_content(&mut self) -> bool {
        self.session.fit_to_content()
    }

    pub fn reset_view(&mut self) {
        self.session.reset_view();
    }

    /// Current `{"scale":..,"offset":{"x":..,"y":..}}`.
    pub fn get_view(&self) -> String {
        respond(Ok(self.session.view()))
    }

    pub fn set_view(&mut self, view_json: &str) -> bool {
        match serde_json::from_str::<ViewTransform>(view_json) {
            Ok(view) => {
                self.session.set_view(view);
                true
            }
            Err(err) => {
                log::warn!("bridge: rejected view: {err}");
                false
            }
        }
    }
}

impl FlowCanvas {
    fn try_load(&mut self, snapshot_json: &str) -> Result<usize, BridgeError> {
        let snapshot: GraphSnapshot = serde_json::from_str(snapshot_json)?;
        self.session.load(snapshot)?;
        Ok(self.session.graph().node_count())
    }
}

// ─── Catalogs ────────────────────────────────────────────────────────────

/// Node palette: `[{"key","label","width","height"}, ...]`.
#[wasm_bindgen]
pub fn node_catalog() -> String {
    let entries: Vec<_> = NodeKind::ALL
        .iter()
        .map(|kind| {
            let size = kind.default_size();
            json!({
                "key": kind.key(),
                "label": kind.default_label(),
                "width": size.width,
                "height": size.height,
            })
        })
        .collect();
    serde_json::Value::Array(entries).to_string()
}

/// Field palette: `[{"key","label","category"}, ...]`.
#[wasm_bindgen]
pub fn field_catalog() -> String {
    let entries: Vec<_> = FieldKind::ALL
        .iter()
        .map(|kind| {
            json!({
                "key": kind.key(),
                "label": kind.label(),
                "category": kind.category(),
            })
        })
        .collect();
    serde_json::Value::Array(entries).to_string()
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

pub(crate) fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("WF WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    fn canvas() -> FlowCanvas {
        FlowCanvas::new(800.0, 600.0, "")
    }

    #[test]
    fn bad_json_is_reported_not_panicked() {
        let mut canvas = canvas();
        let answer = parse(&canvas.load("{ nope"));
        assert_eq!(answer["ok"], false);
        assert!(answer["error"].as_str().unwrap().starts_with("Invalid JSON"));
        assert!(!canvas.set_view("[]"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut canvas = canvas();
        let answer = parse(&canvas.add_node("gateway", 0.0, 0.0, ""));
        assert_eq!(answer["error"], "Unknown node kind 'gateway'");
    }

    #[test]
    fn build_connect_and_delete() {
        let mut canvas = canvas();
        let a = parse(&canvas.add_node("task", 0.0, 0.0, r#"{"label":"Draft"}"#));
        let b = parse(&canvas.add_node("end", 300.0, 0.0, ""));
        let a = a["value"].as_str().unwrap().to_string();
        let b = b["value"].as_str().unwrap().to_string();

        let self_loop = parse(&canvas.connect(&a, &a));
        assert_eq!(self_loop["ok"], false);
        assert_eq!(parse(&canvas.connect(&a, &b))["ok"], true);

        let frame = parse(&canvas.frame());
        assert_eq!(frame["value"]["nodes"][0]["label"], "Draft");
        assert_eq!(frame["value"]["connections"].as_array().unwrap().len(), 1);

        assert!(canvas.remove_node(&a));
        assert!(!canvas.remove_node(&a));
        let snapshot = parse(&canvas.snapshot());
        assert_eq!(snapshot["value"]["connections"], serde_json::json!([]));
    }

    #[test]
    fn unknown_ids_are_reported_without_interning() {
        let mut canvas = canvas();
        let a = parse(&canvas.add_node("task", 0.0, 0.0, ""));
        let a = a["value"].as_str().unwrap().to_string();

        let answer = parse(&canvas.connect(&a, "bridge_missing_target"));
        assert_eq!(answer["error"], "Unknown id 'bridge_missing_target'");
        assert!(!canvas.remove_node("bridge_missing_node"));
        assert!(!canvas.select_by_id("bridge_missing_node"));
        assert_eq!(parse(&canvas.remove_connection("bridge_missing_conn"))["ok"], false);
        assert_eq!(NodeId::get("bridge_missing_target"), None);
        assert_eq!(NodeId::get("bridge_missing_node"), None);
        assert_eq!(ConnectionId::get("bridge_missing_conn"), None);
    }

    #[test]
    fn move_and_resize_by_id() {
        let mut canvas = canvas();
        let a = parse(&canvas.add_node("timer", 0.0, 0.0, ""));
        let a = a["value"].as_str().unwrap().to_string();

        assert!(canvas.move_node_to(&a, 50.0, 60.0));
        assert!(canvas.resize_node(&a, 100.0, 40.0));
        assert!(!canvas.resize_node(&a, 0.0, 40.0));
        assert!(!canvas.move_node_to("bridge_nowhere", 1.0, 1.0));

        let snapshot = parse(&canvas.snapshot());
        let node = &snapshot["value"]["nodes"][0];
        assert_eq!(node["position"], serde_json::json!({ "x": 50.0, "y": 60.0 }));
        assert_eq!(node["size"], serde_json::json!({ "width": 100.0, "height": 40.0 }));
    }

    #[test]
    fn nan_wheel_position_is_ignored() {
        let mut canvas = canvas();
        let before = canvas.get_view();
        assert!(!canvas.handle_wheel(0.0, -100.0, f32::NAN, 10.0, false, false, false, false));
        assert_eq!(canvas.get_view(), before);
    }

    #[test]
    fn keyboard_reports_action_names() {
        let mut canvas = canvas();
        let answer = parse(&canvas.handle_key("+", false, false, false, false));
        assert_eq!(answer, serde_json::json!({ "changed": true, "action": "zoomIn" }));
        let none = parse(&canvas.handle_key("q", false, false, false, false));
        assert_eq!(none["action"], "none");
    }

    #[test]
    fn load_keeps_surface_size_and_view() {
        let mut canvas = FlowCanvas::new(400.0, 300.0, r#"{"fit_padding": 10}"#);
        canvas.handle_key("+", false, false, false, false);
        let before = canvas.get_view();

        let snapshot = r#"{"nodes":[{"id":"n1","kind":"timer","position":{"x":0,"y":0},
            "size":{"width":80,"height":80},"data":{"label":"Wait"}}]}"#;
        let answer = parse(&canvas.load(snapshot));
        assert_eq!(answer["value"], 1);
        assert_eq!(canvas.get_view(), before);
        assert!(canvas.fit_to_content());
        // 400 / (80 + 20) caps at 1.0
        assert_eq!(parse(&canvas.get_view())["value"]["scale"], 1.0);
    }

    #[test]
    fn catalogs_list_every_kind() {
        let nodes = parse(&node_catalog());
        assert_eq!(nodes.as_array().unwrap().len(), NodeKind::ALL.len());
        assert_eq!(nodes[0]["key"], "start");
        let fields = parse(&field_catalog());
        assert_eq!(fields.as_array().unwrap().len(), FieldKind::ALL.len());
        assert_eq!(fields[0]["category"], "basic");
    }
}
