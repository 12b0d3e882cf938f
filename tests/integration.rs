//! Integration tests for tktui.
//!
//! Drive headless sessions through the Pilot: pack layouts, routing order,
//! propagation, focus, re-entrant callbacks and layout snapshots.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use tktui::app::{AppConfig, Ui};
use tktui::backend::StyleToken;
use tktui::dom::{NodeData, NodeId};
use tktui::event::{
    ArgValue, HandlerArgs, InputEvent, Key, MouseAction, MouseBtn, MouseEvent, Routed,
};
use tktui::geometry::Region;
use tktui::layout::{Anchor, Fill, GridOptions, PackOptions, PlaceOptions, Side};
use tktui::testing::Pilot;
use tktui::Error;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Log = Rc<RefCell<Vec<&'static str>>>;

fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Subscribe `node` with a callback that appends `name` to `log`.
fn record_mouse(pilot: &mut Pilot, node: NodeId, name: &'static str, log: &Log) {
    let log = Rc::clone(log);
    pilot
        .ui_mut()
        .on_mouse(node, move |_, _, _| {
            log.borrow_mut().push(name);
            Ok(())
        })
        .unwrap();
}

fn record_key(pilot: &mut Pilot, node: NodeId, name: &'static str, log: &Log) {
    let log = Rc::clone(log);
    pilot
        .ui_mut()
        .on_key(node, move |_, _, _| {
            log.borrow_mut().push(name);
            Ok(())
        })
        .unwrap();
}

/// Place a new node of the given size at (x, y) in `parent`.
fn placed(pilot: &mut Pilot, parent: NodeId, data: NodeData, x: i32, y: i32) -> NodeId {
    let ui = pilot.ui_mut();
    let id = ui.insert(parent, data).unwrap();
    ui.place(id, PlaceOptions::new().at(x, y)).unwrap();
    id
}

/// Widget `a` at depth 1 and widget `b` at depth 3, both covering (0..10, 0..10).
fn nested_overlap(pilot: &mut Pilot) -> (NodeId, NodeId) {
    let root = pilot.ui().root();
    let a = placed(pilot, root, NodeData::widget().named("a").size(10, 10), 0, 0);
    let outer = placed(pilot, root, NodeData::frame().size(10, 10), 0, 0);
    let inner = placed(pilot, outer, NodeData::frame().size(10, 10), 0, 0);
    let b = placed(pilot, inner, NodeData::widget().named("b").size(10, 10), 0, 0);
    (a, b)
}

// ---------------------------------------------------------------------------
// Pack layout
// ---------------------------------------------------------------------------

#[test]
fn test_left_right_then_expanding_middle() {
    let mut pilot = Pilot::new(100, 10);
    let root = pilot.ui().root();
    let ui = pilot.ui_mut();
    let left = ui.insert(root, NodeData::widget().size(20, 10)).unwrap();
    let right = ui.insert(root, NodeData::widget().size(20, 10)).unwrap();
    let middle = ui.insert(root, NodeData::widget().size(5, 3)).unwrap();
    ui.pack(left, PackOptions::new().side(Side::Left)).unwrap();
    ui.pack(right, PackOptions::new().side(Side::Right)).unwrap();
    ui.pack(middle, PackOptions::new().side(Side::Left).expand(true).fill(Fill::Both)).unwrap();

    let regions: Vec<Region> = [left, right, middle]
        .iter()
        .map(|&id| ui.geometry(id).unwrap().region())
        .collect();
    assert_eq!(
        regions,
        vec![
            Region::new(0, 0, 20, 10),
            Region::new(80, 0, 20, 10),
            Region::new(20, 0, 60, 10),
        ]
    );
}

#[test]
fn test_expansion_is_fair() {
    let mut pilot = Pilot::new(31, 4);
    let root = pilot.ui().root();
    let ui = pilot.ui_mut();
    let ids: Vec<NodeId> = (0..3)
        .map(|_| ui.insert(root, NodeData::widget().size(1, 1)).unwrap())
        .collect();
    for &id in &ids {
        ui.pack(id, PackOptions::new().side(Side::Left).expand(true).fill(Fill::X)).unwrap();
    }
    let widths: Vec<i32> = ids.iter().map(|&id| ui.geometry(id).unwrap().width).collect();
    assert_eq!(widths, vec![10, 10, 10]);
    let max = widths.iter().max().unwrap();
    let min = widths.iter().min().unwrap();
    assert!(max - min <= 1);
}

#[test]
fn test_failed_pack_keeps_sibling_geometry() {
    let mut pilot = Pilot::new(40, 10);
    let root = pilot.ui().root();
    let ui = pilot.ui_mut();
    let a = ui.insert(root, NodeData::widget().size(10, 10)).unwrap();
    let b = ui.insert(root, NodeData::widget().size(10, 10)).unwrap();
    let c = ui.insert(root, NodeData::widget().size(10, 10)).unwrap();
    ui.pack(a, PackOptions::new().side(Side::Left)).unwrap();
    ui.pack(b, PackOptions::new().side(Side::Left)).unwrap();
    let before = (ui.geometry(a).unwrap(), ui.geometry(b).unwrap());

    let err = ui.pack(c, PackOptions::new().after(b).before(a)).unwrap_err();
    assert!(matches!(err, Error::ImpossibleOrder { .. }));
    assert_eq!((ui.geometry(a).unwrap(), ui.geometry(b).unwrap()), before);
    assert!(!ui.geometry(c).unwrap().placed);
}

#[test]
fn test_option_strings_parse_or_fail() {
    let side: Side = "left".parse().unwrap();
    let fill: Fill = " BOTH ".parse().unwrap();
    let anchor: Anchor = "center".parse().unwrap();
    assert_eq!((side, fill, anchor), (Side::Left, Fill::Both, Anchor::Center));
    assert!(matches!("sideways".parse::<Side>(), Err(Error::InvalidOption { kind: "side", .. })));
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[test]
fn test_deepest_node_runs_first() {
    let mut pilot = Pilot::new(20, 10);
    let (a, b) = nested_overlap(&mut pilot);
    let calls = log();
    record_mouse(&mut pilot, a, "a", &calls);
    record_mouse(&mut pilot, b, "b", &calls);

    let dispatch = pilot.click(5, 5).unwrap();
    assert_eq!(dispatch.hits, vec![b, a]);
    assert_eq!(*calls.borrow(), vec!["b", "a"]);
    assert_eq!(pilot.ui().focused(), Some(b));
}

#[test]
fn test_equal_depth_keeps_registration_order() {
    let mut pilot = Pilot::new(20, 10);
    let root = pilot.ui().root();
    let first = placed(&mut pilot, root, NodeData::widget().size(6, 6), 0, 0);
    let second = placed(&mut pilot, root, NodeData::widget().size(6, 6), 2, 2);
    let calls = log();
    record_mouse(&mut pilot, second, "second", &calls);
    record_mouse(&mut pilot, first, "first", &calls);

    pilot.click(3, 3).unwrap();
    assert_eq!(*calls.borrow(), vec!["second", "first"]);
    // Re-registering keeps the original slot.
    record_mouse(&mut pilot, second, "second again", &calls);
    calls.borrow_mut().clear();
    pilot.click(3, 3).unwrap();
    assert_eq!(*calls.borrow(), vec!["second again", "first"]);
}

#[test]
fn test_propagation_stops_at_non_propagating_node() {
    let mut pilot = Pilot::new(20, 10);
    let (a, b) = nested_overlap(&mut pilot);
    let calls = log();
    record_mouse(&mut pilot, a, "a", &calls);
    record_mouse(&mut pilot, b, "b", &calls);
    pilot.ui_mut().set_propagates_mouse_event(b, false).unwrap();

    let dispatch = pilot.click(5, 5).unwrap();
    assert_eq!(dispatch.hits, vec![b, a]);
    assert_eq!(dispatch.visited, vec![b]);
    assert_eq!(*calls.borrow(), vec!["b"]);
}

#[test]
fn test_callback_can_stop_explicitly() {
    let mut pilot = Pilot::new(20, 10);
    let (a, b) = nested_overlap(&mut pilot);
    let calls = log();
    record_mouse(&mut pilot, a, "a", &calls);
    let inner = Rc::clone(&calls);
    pilot
        .ui_mut()
        .on_mouse(b, move |_, event, _| {
            inner.borrow_mut().push("b");
            event.stop();
            Ok(())
        })
        .unwrap();

    pilot.click(5, 5).unwrap();
    assert_eq!(*calls.borrow(), vec!["b"]);
}

#[test]
fn test_missing_callback_never_stops_propagation() {
    let mut pilot = Pilot::new(20, 10);
    let (a, b) = nested_overlap(&mut pilot);
    let calls = log();
    record_mouse(&mut pilot, a, "a", &calls);
    pilot.ui_mut().register_for_mouse_event(b, None, HandlerArgs::new()).unwrap();

    let dispatch = pilot.click(5, 5).unwrap();
    assert_eq!(dispatch.visited, vec![b, a]);
    assert_eq!(*calls.borrow(), vec!["a"]);

    // Only a node whose callback ran can stop the event.
    pilot.ui_mut().set_propagates_mouse_event(b, false).unwrap();
    calls.borrow_mut().clear();
    let dispatch = pilot.click(5, 5).unwrap();
    assert_eq!(dispatch.visited, vec![b, a]);
    assert_eq!(*calls.borrow(), vec!["a"]);
}

#[test]
fn test_missing_key_callback_never_stops_propagation() {
    let mut pilot = Pilot::new(20, 10);
    let (a, b) = nested_overlap(&mut pilot);
    let calls = log();
    record_key(&mut pilot, a, "a", &calls);
    pilot.ui_mut().register_for_key_event(b, None, HandlerArgs::new()).unwrap();
    pilot.ui_mut().set_propagates_key_event(b, false).unwrap();
    pilot.ui_mut().set_cursor(5, 5);

    pilot.press_key(Key::Enter).unwrap();
    assert_eq!(*calls.borrow(), vec!["a"]);
}

#[test]
fn test_only_primary_press_dispatches() {
    let mut pilot = Pilot::new(20, 10);
    let (a, _) = nested_overlap(&mut pilot);
    let calls = log();
    record_mouse(&mut pilot, a, "a", &calls);
    let right = MouseEvent { kind: MouseAction::Down(MouseBtn::Right), ..MouseEvent::click(4, 4) };
    let release = MouseEvent { kind: MouseAction::Up(MouseBtn::Left), ..MouseEvent::click(4, 4) };
    assert!(!pilot.mouse(right).unwrap().is_hit());
    assert!(!pilot.mouse(release).unwrap().is_hit());
    assert!(calls.borrow().is_empty());
    // The right press still moved the text cursor.
    assert_eq!(pilot.ui().cursor(), (4, 4));
}

#[test]
fn test_unplaced_nodes_are_never_hit() {
    let mut pilot = Pilot::new(20, 10);
    let root = pilot.ui().root();
    let ghost = pilot.ui_mut().insert(root, NodeData::widget()).unwrap();
    let calls = log();
    record_mouse(&mut pilot, ghost, "ghost", &calls);
    assert!(!pilot.click(1, 1).unwrap().is_hit());

    let cell = pilot.ui_mut().insert(root, NodeData::widget().size(4, 4)).unwrap();
    pilot.ui_mut().grid(cell, GridOptions::cell(0, 0)).unwrap();
    record_mouse(&mut pilot, cell, "cell", &calls);
    assert!(!pilot.click(1, 1).unwrap().is_hit());
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_handler_receives_stored_args() {
    let mut pilot = Pilot::new(20, 10);
    let (a, _) = nested_overlap(&mut pilot);
    let seen: Rc<RefCell<Option<HandlerArgs>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let args = HandlerArgs::new().arg("ok").named("count", 2);
    pilot
        .ui_mut()
        .register_for_mouse_event(
            a,
            Some(Box::new(move |_: &mut Ui, event: &mut Routed<MouseEvent>, args: &HandlerArgs| {
                assert_eq!(event.widget(), Some(a));
                *sink.borrow_mut() = Some(args.clone());
                Ok(())
            })),
            args.clone(),
        )
        .unwrap();
    pilot.click(0, 0).unwrap();
    let seen = seen.borrow().clone().unwrap();
    assert_eq!(seen, args);
    assert_eq!(seen.get("count"), Some(&ArgValue::Int(2)));
}

// ---------------------------------------------------------------------------
// Re-entrancy and errors
// ---------------------------------------------------------------------------

#[test]
fn test_callback_can_repack() {
    let mut pilot = Pilot::new(30, 10);
    let root = pilot.ui().root();
    let ui = pilot.ui_mut();
    let button = ui.insert(root, NodeData::widget().size(10, 10)).unwrap();
    let panel = ui.insert(root, NodeData::widget().size(10, 10)).unwrap();
    ui.pack(button, PackOptions::new().side(Side::Left)).unwrap();
    ui.pack(panel, PackOptions::new().side(Side::Left)).unwrap();
    assert_eq!(ui.geometry(panel).unwrap().x, 10);

    ui.on_mouse(button, move |ui, _, _| ui.pack(panel, PackOptions::new().side(Side::Right)))
        .unwrap();
    pilot.click(2, 2).unwrap();
    assert_eq!(pilot.ui().geometry(panel).unwrap().x, 20);

    // The callback was put back and runs again.
    pilot.ui_mut().pack(panel, PackOptions::new().side(Side::Left)).unwrap();
    pilot.click(2, 2).unwrap();
    assert_eq!(pilot.ui().geometry(panel).unwrap().x, 20);
}

#[test]
fn test_callback_replacing_itself_is_not_restored() {
    let mut pilot = Pilot::new(20, 10);
    let (a, _) = nested_overlap(&mut pilot);
    let calls = log();
    let outer = Rc::clone(&calls);
    pilot
        .ui_mut()
        .on_mouse(a, move |ui, event, _| {
            outer.borrow_mut().push("original");
            let node = event.widget().unwrap();
            let inner = Rc::clone(&outer);
            ui.on_mouse(node, move |_, _, _| {
                inner.borrow_mut().push("replacement");
                Ok(())
            })
        })
        .unwrap();

    pilot.click(1, 1).unwrap();
    pilot.click(1, 1).unwrap();
    assert_eq!(*calls.borrow(), vec!["original", "replacement"]);
}

#[test]
fn test_callback_error_propagates_and_keeps_subscription() {
    let mut pilot = Pilot::new(20, 10);
    let (a, b) = nested_overlap(&mut pilot);
    let calls = log();
    record_mouse(&mut pilot, a, "a", &calls);
    pilot
        .ui_mut()
        .on_mouse(b, |_, _, _| Err(Error::InvalidOption { kind: "test", value: "boom".into() }))
        .unwrap();

    let err = pilot.click(5, 5).unwrap_err();
    assert!(matches!(err, Error::InvalidOption { kind: "test", .. }));
    assert!(calls.borrow().is_empty());
    assert!(pilot.ui().mouse_subscriptions().contains(b));
    assert!(pilot.click(5, 5).is_err());
}

#[test]
fn test_unregister_during_dispatch_skips_node() {
    let mut pilot = Pilot::new(20, 10);
    let (a, b) = nested_overlap(&mut pilot);
    let calls = log();
    record_mouse(&mut pilot, a, "a", &calls);
    pilot
        .ui_mut()
        .on_mouse(b, move |ui, _, _| {
            ui.unregister_for_mouse_event(a);
            Ok(())
        })
        .unwrap();

    let dispatch = pilot.click(5, 5).unwrap();
    assert_eq!(dispatch.visited, vec![b]);
    assert!(calls.borrow().is_empty());
}

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[test]
fn test_focus_moves_exclusively_between_widgets() {
    let mut pilot = Pilot::new(20, 10);
    let root = pilot.ui().root();
    let left = placed(&mut pilot, root, NodeData::widget().size(5, 5), 0, 0);
    let right = placed(&mut pilot, root, NodeData::widget().size(5, 5), 10, 0);
    let calls = log();
    record_mouse(&mut pilot, left, "left", &calls);
    record_mouse(&mut pilot, right, "right", &calls);

    assert_eq!(pilot.click(1, 1).unwrap().focused, Some(left));
    assert_eq!(pilot.click(11, 1).unwrap().focused, Some(right));
    // Clicking the holder again changes nothing.
    assert_eq!(pilot.click(11, 1).unwrap().focused, None);

    let dom = pilot.ui().dom();
    assert!(!dom.get(left).unwrap().focused);
    assert!(dom.get(right).unwrap().focused);

    let region = |id: NodeId| dom.get(id).unwrap().region.unwrap();
    let backend = pilot.backend().unwrap();
    assert_eq!(
        backend.background_log(),
        &[
            (region(left), StyleToken::Focused),
            (region(left), StyleToken::Default),
            (region(right), StyleToken::Focused),
        ]
    );
}

#[test]
fn test_non_focusable_hit_passes_focus_down_the_order() {
    let mut pilot = Pilot::new(20, 10);
    let root = pilot.ui().root();
    let below = placed(&mut pilot, root, NodeData::widget().size(8, 8), 0, 0);
    let holder = placed(&mut pilot, root, NodeData::frame().size(8, 8), 0, 0);
    let label = placed(&mut pilot, holder, NodeData::widget().focusable(false).size(8, 8), 0, 0);
    let calls = log();
    record_mouse(&mut pilot, below, "below", &calls);
    record_mouse(&mut pilot, label, "label", &calls);

    let dispatch = pilot.click(2, 2).unwrap();
    assert_eq!(dispatch.hits, vec![label, below]);
    assert_eq!(dispatch.focused, Some(below));
    assert!(!pilot.ui_mut().set_focus(label).unwrap());
    assert_eq!(pilot.ui().focused(), Some(below));
}

// ---------------------------------------------------------------------------
// Keys and cursor
// ---------------------------------------------------------------------------

#[test]
fn test_keys_route_at_text_cursor_without_focus_change() {
    let mut pilot = Pilot::new(20, 10);
    let root = pilot.ui().root();
    let left = placed(&mut pilot, root, NodeData::widget().size(5, 5), 0, 0);
    let right = placed(&mut pilot, root, NodeData::widget().size(5, 5), 10, 0);
    let calls = log();
    record_key(&mut pilot, left, "left", &calls);
    record_key(&mut pilot, right, "right", &calls);

    pilot.ui_mut().set_focus(left).unwrap();
    pilot.ui_mut().set_cursor(12, 2);
    let dispatch = pilot.press_key(Key::Enter).unwrap();
    assert_eq!(dispatch.hits, vec![right]);
    assert_eq!(*calls.borrow(), vec!["right"]);
    assert_eq!(pilot.ui().focused(), Some(left));

    // A press anywhere moves the cursor, even with no mouse subscribers.
    pilot.click(1, 1).unwrap();
    pilot.press_key(Key::Char('x')).unwrap();
    assert_eq!(*calls.borrow(), vec!["right", "left"]);
}

#[test]
fn test_every_mouse_report_moves_cursor() {
    let mut pilot = Pilot::new(20, 10);
    let release = MouseEvent { kind: MouseAction::Up(MouseBtn::Left), ..MouseEvent::click(6, 2) };
    pilot.mouse(release).unwrap();
    assert_eq!(pilot.ui().cursor(), (6, 2));

    let motion = MouseEvent { kind: MouseAction::Moved, ..MouseEvent::click(9, 3) };
    pilot.mouse(motion).unwrap();
    assert_eq!(pilot.ui().cursor(), (9, 3));

    let scroll = MouseEvent { kind: MouseAction::ScrollDown, ..MouseEvent::click(1, 8) };
    pilot.mouse(scroll).unwrap();
    assert_eq!(pilot.ui().cursor(), (1, 8));
}

#[test]
fn test_cursor_can_stay_put() {
    let mut pilot = Pilot::with_config(20, 10, AppConfig::new().with_cursor_follows_mouse(false));
    pilot.click(7, 7).unwrap();
    assert_eq!(pilot.ui().cursor(), (0, 0));
}

#[test]
fn test_key_propagation_flag() {
    let mut pilot = Pilot::new(20, 10);
    let (a, b) = nested_overlap(&mut pilot);
    let calls = log();
    record_key(&mut pilot, a, "a", &calls);
    record_key(&mut pilot, b, "b", &calls);
    pilot.ui_mut().set_propagates_key_event(b, false).unwrap();
    pilot.ui_mut().set_cursor(3, 3);
    pilot.press_key(Key::Tab).unwrap();
    assert_eq!(*calls.borrow(), vec!["b"]);
}

// ---------------------------------------------------------------------------
// Step loop
// ---------------------------------------------------------------------------

#[test]
fn test_queued_input_is_processed_in_order() {
    let mut pilot = Pilot::new(20, 10);
    let (a, _) = nested_overlap(&mut pilot);
    let calls = log();
    record_mouse(&mut pilot, a, "a", &calls);
    pilot.queue(InputEvent::Mouse(MouseEvent::click(1, 1)));
    pilot.queue(InputEvent::Resize { width: 40, height: 20 });
    pilot.queue(InputEvent::Mouse(MouseEvent::click(2, 2)));
    assert_eq!(pilot.process().unwrap(), 3);
    assert!(pilot.is_running());
    assert_eq!(*calls.borrow(), vec!["a", "a"]);
    assert_eq!(pilot.ui().geometry(pilot.ui().root()).unwrap().width, 40);
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[test]
fn test_layout_snapshot() {
    let mut pilot = Pilot::new(40, 12);
    let root = pilot.ui().root();
    let ui = pilot.ui_mut();

    let header = ui.insert(root, NodeData::widget().named("header").size(40, 2)).unwrap();
    ui.pack(header, PackOptions::new()).unwrap();
    let main = ui.insert(root, NodeData::frame().named("main").size(1, 1)).unwrap();
    ui.pack(main, PackOptions::new().expand(true).fill(Fill::Both)).unwrap();
    let badge = ui.insert(root, NodeData::widget().named("badge").size(3, 1)).unwrap();
    ui.place(badge, PlaceOptions::new().rel(1.0, 0.0).at(-3, 0)).unwrap();

    let sidebar = ui.insert(main, NodeData::frame().named("sidebar").size(10, 10)).unwrap();
    ui.pack(sidebar, PackOptions::new().side(Side::Left)).unwrap();
    let ok = ui.insert(main, NodeData::widget().named("ok").size(6, 1)).unwrap();
    ui.pack(ok, PackOptions::new().side(Side::Left).expand(true).anchor(Anchor::Center)).unwrap();
    let cancel = ui.insert(main, NodeData::widget().named("cancel").size(6, 1)).unwrap();
    ui.pack(cancel, PackOptions::new().side(Side::Right).pad(1, 0)).unwrap();
    let cell = ui.insert(sidebar, NodeData::widget().named("cell").size(2, 1)).unwrap();
    ui.grid(cell, GridOptions::cell(0, 0)).unwrap();

    ui.on_mouse(ok, |_, _, _| Ok(())).unwrap();
    pilot.click(20, 6).unwrap();

    insta::assert_snapshot!(pilot.layout_dump(), @r"
    root 0,0 40x12
      header 0,0 40x2 [pack]
      main 0,2 40x10 [pack]
        sidebar 0,0 10x10 [pack]
          cell unplaced 2x1 [grid]
        ok 18,4 6x1 [pack] *
        cancel 33,0 6x1 [pack]
      badge 37,0 3x1 [place]
    ");
}
