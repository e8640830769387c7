//! Text rendering of query results and charts.
//!
//! Charts are drawn with ratatui widgets into an off-screen buffer and then
//! flattened to plain text, so they can be printed to any stream.

mod chart;
mod table;

pub use chart::render_chart;
pub use table::ResultTable;

use ratatui::buffer::Buffer;
use std::fmt;
use std::str::FromStr;

/// Smallest canvas either dimension may have.
const MIN_DIMENSION: u16 = 10;

/// Width used when the terminal size is unknown.
const FALLBACK_WIDTH: u16 = 80;

/// Widest canvas taken from the terminal.
const MAX_TERMINAL_WIDTH: u16 = 120;

/// Height of bar and line charts unless overridden.
const DEFAULT_HEIGHT: u16 = 20;

/// Canvas dimensions for chart drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u16,
    pub height: u16,
}

impl CanvasSize {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Sizes the canvas from the attached terminal, if any.
    pub fn from_terminal() -> Self {
        let width = crossterm::terminal::size()
            .map(|(cols, _)| cols.clamp(MIN_DIMENSION * 4, MAX_TERMINAL_WIDTH))
            .unwrap_or(FALLBACK_WIDTH);
        Self::new(width, DEFAULT_HEIGHT)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(FALLBACK_WIDTH, DEFAULT_HEIGHT)
    }
}

impl FromStr for CanvasSize {
    type Err = String;

    /// Parses `WIDTHxHEIGHT`, e.g. `100x30`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("Invalid size '{s}': expected WIDTHxHEIGHT"))?;

        let parse = |part: &str| {
            part.trim()
                .parse::<u16>()
                .map_err(|_| format!("Invalid size '{s}': '{part}' is not a number"))
        };
        let size = Self::new(parse(w)?, parse(h)?);

        if size.width < MIN_DIMENSION || size.height < MIN_DIMENSION {
            return Err(format!(
                "Invalid size '{s}': both dimensions must be at least {MIN_DIMENSION}"
            ));
        }
        Ok(size)
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Flattens a ratatui buffer to plain text.
///
/// Trailing spaces on each line and trailing blank lines are dropped.
pub fn buffer_to_text(buffer: &Buffer) -> String {
    let area = buffer.area;

    let mut lines: Vec<String> = (area.y..area.y + area.height)
        .map(|y| {
            let line: String = (area.x..area.x + area.width)
                .map(|x| buffer.cell((x, y)).map(|cell| cell.symbol()).unwrap_or(" "))
                .collect();
            line.trim_end_matches(' ').to_string()
        })
        .collect();

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}
