//! Pilot: programmatic interaction with a headless session.
//!
//! The `Pilot` wraps a [`Ui`] over a [`HeadlessBackend`] and provides methods to
//! simulate user input (clicks, key presses, resize), drive the step loop, and
//! dump the layout for snapshot testing.

use crate::app::{AppConfig, Step, Ui};
use crate::backend::HeadlessBackend;
use crate::error::Result;
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers, MouseEvent};
use crate::event::router::Dispatch;

use super::snapshot::layout_to_string;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless session driver for testing.
///
/// # Examples
///
/// ```
/// use tktui::testing::Pilot;
///
/// let mut pilot = Pilot::new(80, 24);
/// let root = pilot.ui().root();
/// let button = pilot.ui_mut().widget(root).unwrap();
/// pilot.ui_mut().on_mouse(button, |_, _, _| Ok(())).unwrap();
/// assert!(pilot.click(3, 3).unwrap().hits.is_empty());
/// ```
pub struct Pilot {
    ui: Ui,
    quit: bool,
}

impl Pilot {
    /// A headless session with the given surface size and default config.
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_config(width, height, AppConfig::default())
    }

    /// A headless session with a custom config.
    pub fn with_config(width: u16, height: u16, config: AppConfig) -> Self {
        Self {
            ui: Ui::new(HeadlessBackend::new(width, height), config),
            quit: false,
        }
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Route a primary-button press at (x, y).
    pub fn click(&mut self, x: i32, y: i32) -> Result<Dispatch> {
        self.ui.route_mouse(MouseEvent::click(x, y))
    }

    /// Route a mouse event as-is.
    pub fn mouse(&mut self, event: MouseEvent) -> Result<Dispatch> {
        self.ui.route_mouse(event)
    }

    /// Route a key press with no modifiers at the text cursor.
    pub fn press_key(&mut self, key: Key) -> Result<Dispatch> {
        self.ui.route_key(KeyEvent::new(key, Modifiers::NONE))
    }

    /// Route a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> Result<Dispatch> {
        self.ui.route_key(KeyEvent::new(key, modifiers))
    }

    /// Resize the surface and re-lay out the tree.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.ui.resize(width, height)
    }

    /// Queue an event in the backend for the next [`process`](Self::process).
    pub fn queue(&mut self, event: InputEvent) {
        if let Some(backend) = self.ui.backend_as_mut::<HeadlessBackend>() {
            backend.push_input(event);
        }
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Step until the input queue is drained or the quit key arrives.
    ///
    /// Returns the number of events handled.
    pub fn process(&mut self) -> Result<usize> {
        let mut handled = 0;
        loop {
            match self.ui.step()? {
                Step::Idle => return Ok(handled),
                Step::Handled => handled += 1,
                Step::Quit => {
                    self.quit = true;
                    return Ok(handled);
                }
            }
        }
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Borrow the session immutably.
    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    /// Borrow the session mutably.
    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    /// The headless backend behind the session.
    pub fn backend(&self) -> Option<&HeadlessBackend> {
        self.ui.backend_as::<HeadlessBackend>()
    }

    /// Whether the quit key has not been seen yet.
    pub fn is_running(&self) -> bool {
        !self.quit
    }

    /// Indented dump of every box in the tree.
    pub fn layout_dump(&self) -> String {
        layout_to_string(self.ui.dom())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
