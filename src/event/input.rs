//! Raw input events, decoupled from crossterm.
//!
//! Backends hand the router [`InputEvent`]s. Crossterm events are converted with
//! [`InputEvent::from_crossterm`] so nothing outside the terminal backend depends on
//! crossterm's types.

use std::ops::BitOr;

use crossterm::event as ct;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A bare character key with no modifiers.
    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c), Modifiers::NONE)
    }
}

// ---------------------------------------------------------------------------
// Mouse
// ---------------------------------------------------------------------------

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// What the mouse did: the button state of a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(MouseBtn),
    Up(MouseBtn),
    Drag(MouseBtn),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// A mouse event at a screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub x: i32,
    pub y: i32,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// A primary-button press at (x, y).
    pub fn click(x: i32, y: i32) -> Self {
        Self { kind: MouseAction::Down(MouseBtn::Left), x, y, modifiers: Modifiers::NONE }
    }

    /// Whether this is a primary-button press, the only mouse event the router
    /// dispatches.
    pub fn is_primary_press(&self) -> bool {
        self.kind == MouseAction::Down(MouseBtn::Left)
    }

    /// Whether any button went down.
    pub fn is_press(&self) -> bool {
        matches!(self.kind, MouseAction::Down(_))
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// A raw input event delivered by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
}

impl InputEvent {
    /// Convert a crossterm event. Focus, paste, key release and unmapped keys
    /// yield `None`.
    pub fn from_crossterm(event: ct::Event) -> Option<Self> {
        match event {
            ct::Event::Key(ke) if ke.kind != ct::KeyEventKind::Release => {
                let code = convert_key_code(ke.code)?;
                Some(InputEvent::Key(KeyEvent::new(code, convert_modifiers(ke.modifiers))))
            }
            ct::Event::Mouse(me) => {
                let kind = match me.kind {
                    ct::MouseEventKind::Down(b) => MouseAction::Down(convert_mouse_button(b)),
                    ct::MouseEventKind::Up(b) => MouseAction::Up(convert_mouse_button(b)),
                    ct::MouseEventKind::Drag(b) => MouseAction::Drag(convert_mouse_button(b)),
                    ct::MouseEventKind::Moved => MouseAction::Moved,
                    ct::MouseEventKind::ScrollUp => MouseAction::ScrollUp,
                    ct::MouseEventKind::ScrollDown => MouseAction::ScrollDown,
                    ct::MouseEventKind::ScrollLeft | ct::MouseEventKind::ScrollRight => return None,
                };
                Some(InputEvent::Mouse(MouseEvent {
                    kind,
                    x: i32::from(me.column),
                    y: i32::from(me.row),
                    modifiers: convert_modifiers(me.modifiers),
                }))
            }
            ct::Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
            _ => None,
        }
    }
}

fn convert_modifiers(m: ct::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(ct::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(ct::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(ct::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

fn convert_key_code(code: ct::KeyCode) -> Option<Key> {
    let key = match code {
        ct::KeyCode::Char(c) => Key::Char(c),
        ct::KeyCode::Enter => Key::Enter,
        ct::KeyCode::Esc => Key::Escape,
        ct::KeyCode::Tab => Key::Tab,
        ct::KeyCode::BackTab => Key::BackTab,
        ct::KeyCode::Backspace => Key::Backspace,
        ct::KeyCode::Delete => Key::Delete,
        ct::KeyCode::Left => Key::Left,
        ct::KeyCode::Right => Key::Right,
        ct::KeyCode::Up => Key::Up,
        ct::KeyCode::Down => Key::Down,
        ct::KeyCode::Home => Key::Home,
        ct::KeyCode::End => Key::End,
        ct::KeyCode::PageUp => Key::PageUp,
        ct::KeyCode::PageDown => Key::PageDown,
        ct::KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(key)
}

fn convert_mouse_button(b: ct::MouseButton) -> MouseBtn {
    match b {
        ct::MouseButton::Left => MouseBtn::Left,
        ct::MouseButton::Right => MouseBtn::Right,
        ct::MouseButton::Middle => MouseBtn::Middle,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
