//! Crossterm terminal backend.
//!
//! `TerminalBackend` wraps a buffered stdout writer, keeps region bookkeeping in a
//! [`RegionTable`], paints focus feedback as solid backgrounds and polls crossterm
//! for input without blocking. Color strings are parsed as named colors or
//! `#rrggbb` hex values.

use std::any::Any;
use std::io::{self, BufWriter, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, event as ct, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{debug, warn};

use super::{Backend, RegionId, RegionTable, StyleToken, Surface};
use crate::error::{Error, Result};
use crate::event::input::InputEvent;
use crate::geometry::{Offset, Region, Size};

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Background colors for the two style tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub focused: Color,
    pub default: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self { focused: Color::Blue, default: Color::Green }
    }
}

impl Palette {
    /// The default palette: blue when focused, green otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the focused background from a color string.
    pub fn with_focused(mut self, color: &str) -> Result<Self> {
        self.focused = parse_color(color).ok_or_else(|| invalid_color(color))?;
        Ok(self)
    }

    /// Set the default background from a color string.
    pub fn with_default(mut self, color: &str) -> Result<Self> {
        self.default = parse_color(color).ok_or_else(|| invalid_color(color))?;
        Ok(self)
    }

    /// The color painted for a style token.
    pub fn color(&self, style: StyleToken) -> Color {
        match style {
            StyleToken::Default => self.default,
            StyleToken::Focused => self.focused,
        }
    }
}

fn invalid_color(value: &str) -> Error {
    Error::InvalidOption { kind: "color", value: value.to_string() }
}

// ---------------------------------------------------------------------------
// TerminalBackend
// ---------------------------------------------------------------------------

/// Backend driving a real terminal through crossterm.
///
/// Creation does not touch the terminal; call [`enter`](Self::enter) to switch
/// to the alternate screen and [`leave`](Self::leave) to restore it.
pub struct TerminalBackend {
    writer: BufWriter<Stdout>,
    regions: RegionTable,
    size: Size,
    palette: Palette,
    poll_timeout: Duration,
}

impl TerminalBackend {
    /// A backend sized to the current terminal.
    pub fn new(palette: Palette) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let size = Size::new(i32::from(width), i32::from(height));
        Ok(Self {
            writer: BufWriter::new(io::stdout()),
            regions: RegionTable::new(size),
            size,
            palette,
            poll_timeout: Duration::from_millis(50),
        })
    }

    /// How long `poll_input` waits for an event (builder).
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Enter the alternate screen, enable raw mode and mouse capture.
    pub fn enter(&mut self) -> Result<()> {
        execute!(self.writer, EnterAlternateScreen, ct::EnableMouseCapture, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        debug!(width = self.size.width, height = self.size.height, "entered terminal");
        Ok(())
    }

    /// Restore the terminal.
    pub fn leave(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.writer, cursor::Show, ct::DisableMouseCapture, LeaveAlternateScreen)?;
        Ok(())
    }

    /// The palette in use.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    fn missing(region: RegionId) -> Error {
        Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("unknown region {region:?}"),
        ))
    }

    /// Paint a region's visible cells with a solid background.
    fn paint(&mut self, area: Region, color: Color) -> io::Result<()> {
        let screen = Region::new(0, 0, self.size.width, self.size.height);
        let left = area.x.max(screen.x);
        let top = area.y.max(screen.y);
        let right = area.right().min(screen.right());
        let bottom = area.bottom().min(screen.bottom());
        if right <= left || bottom <= top {
            return Ok(());
        }
        let row = " ".repeat((right - left) as usize);
        queue!(self.writer, SetBackgroundColor(color))?;
        for y in top..bottom {
            queue!(self.writer, cursor::MoveTo(left as u16, y as u16), Print(&row))?;
        }
        queue!(self.writer, ResetColor)?;
        self.writer.flush()
    }
}

impl Backend for TerminalBackend {
    fn surface(&self) -> Surface {
        Surface { region: self.regions.root(), size: self.size }
    }

    fn create_region(
        &mut self,
        parent: RegionId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<RegionId> {
        match self.regions.create(parent, Region::new(x, y, width.max(0), height.max(0))) {
            Some(region) => Ok(region),
            None => {
                warn!(?parent, "create_region on unknown parent");
                Err(Self::missing(parent))
            }
        }
    }

    fn region_contains(&self, region: RegionId, x: i32, y: i32) -> bool {
        self.regions.contains(region, x, y)
    }

    fn resize_region(&mut self, region: RegionId, width: i32, height: i32) -> Result<()> {
        if region == self.regions.root() {
            self.size = Size::new(width, height).clamped();
        }
        if self.regions.resize(region, Size::new(width, height)) {
            Ok(())
        } else {
            warn!(?region, "resize_region on unknown region");
            Err(Self::missing(region))
        }
    }

    fn move_region(&mut self, region: RegionId, x: i32, y: i32) -> Result<()> {
        if self.regions.move_to(region, Offset::new(x, y)) {
            Ok(())
        } else {
            warn!(?region, "move_region on unknown region");
            Err(Self::missing(region))
        }
    }

    fn poll_input(&mut self) -> Result<Option<InputEvent>> {
        if !ct::poll(self.poll_timeout)? {
            return Ok(None);
        }
        Ok(InputEvent::from_crossterm(ct::read()?))
    }

    fn set_background(&mut self, region: RegionId, style: StyleToken) -> Result<()> {
        let entry = self.regions.get_mut(region).ok_or_else(|| Self::missing(region))?;
        entry.style = style;
        let Some(area) = self.regions.absolute(region) else {
            return Ok(());
        };
        let color = self.palette.color(style);
        if let Err(err) = self.paint(area, color) {
            warn!(?region, %err, "failed to paint background");
            return Err(err.into());
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Color parsing
// ---------------------------------------------------------------------------

/// Parse a color string into a crossterm `Color`.
///
/// Accepts `#rrggbb`, `#rgb` and the sixteen ANSI color names (`dark_` prefixed
/// variants included, `grey`/`gray` either way). Case and surrounding
/// whitespace are ignored.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    let name = s.to_ascii_lowercase().replace('_', "");
    let color = match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        "darkred" => Color::DarkRed,
        "darkgreen" => Color::DarkGreen,
        "darkyellow" => Color::DarkYellow,
        "darkblue" => Color::DarkBlue,
        "darkmagenta" => Color::DarkMagenta,
        "darkcyan" => Color::DarkCyan,
        "darkgrey" | "darkgray" => Color::DarkGrey,
        _ => return None,
    };
    Some(color)
}

/// Hex digits without the leading `#`: six (`rrggbb`) or three (`rgb`).
fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb { r: channel(0..2)?, g: channel(2..4)?, b: channel(4..6)? }),
        3 => {
            let (r, g, b) = (channel(0..1)?, channel(1..2)?, channel(2..3)?);
            Some(Color::Rgb { r: r * 17, g: g * 17, b: b * 17 })
        }
        _ => None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
