//! Terrain layouts drawn as text.
//!
//! A [`TerrainLayout`] parses ASCII art into a rectangle of terrain
//! characters. The first line of text is the far edge of the map (highest
//! `y`), so a layout reads the same way it appears on a top-down render.

use std::fmt;

use wayfind_core::{Point, Range};

/// A rectangle of terrain characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainLayout {
    /// Rows bottom to top, so `rows[y][x]` is cell `(x, y)`.
    rows: Vec<Vec<char>>,
    size: Point,
}

impl TerrainLayout {
    /// Parse a layout accepting any character.
    ///
    /// Leading and trailing whitespace of the whole text is trimmed, but
    /// not of individual lines. Every line must have the same width.
    pub fn parse(s: &str) -> Result<Self, LayoutError> {
        Self::parse_with_runes(s, "")
    }

    /// Parse a layout, rejecting characters outside `runes`. An empty
    /// `runes` accepts everything.
    pub fn parse_with_runes(s: &str, runes: &str) -> Result<Self, LayoutError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut rows: Vec<Vec<char>> = Vec::new();
        let mut width = None;
        for (line_no, line) in s.lines().enumerate() {
            let row: Vec<char> = line.chars().collect();
            match width {
                None => width = Some(row.len()),
                Some(w) if w != row.len() => {
                    return Err(LayoutError::InconsistentSize {
                        line: line_no,
                        expected: w,
                        found: row.len(),
                    });
                }
                Some(_) => {}
            }
            if !runes.is_empty() {
                if let Some(x) = row.iter().position(|&ch| !runes.contains(ch)) {
                    return Err(LayoutError::InvalidRune {
                        ch: row[x],
                        line: line_no,
                        column: x,
                    });
                }
            }
            rows.push(row);
        }
        rows.reverse();

        let size = Point::new(width.unwrap_or(0) as i32, rows.len() as i32);
        Ok(Self { rows, size })
    }

    /// Width and height in cells.
    #[inline]
    pub fn size(&self) -> Point {
        self.size
    }

    #[inline]
    pub fn range(&self) -> Range {
        Range::with_size(self.size.x, self.size.y)
    }

    /// Character at cell `p`, `y` up.
    pub fn get(&self, p: Point) -> Option<char> {
        if !self.range().contains(p) {
            return None;
        }
        Some(self.rows[p.y as usize][p.x as usize])
    }

    /// Every cell with its character, row by row from `y = 0`.
    pub fn cells(&self) -> impl Iterator<Item = (Point, char)> + '_ {
        self.range().into_iter().map(|p| (p, self.rows[p.y as usize][p.x as usize]))
    }

    /// Find the first cell holding `ch`.
    pub fn find(&self, ch: char) -> Option<Point> {
        self.cells().find(|&(_, c)| c == ch).map(|(p, _)| p)
    }
}

impl fmt::Display for TerrainLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().rev().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for &ch in row {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Errors that can occur when parsing a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// No non-blank text.
    Empty,
    /// A line's width differs from the first line's.
    InconsistentSize {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A character outside the accepted set. `line` and `column` count from
    /// the top-left of the text.
    InvalidRune { ch: char, line: usize, column: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("layout: no terrain"),
            Self::InconsistentSize {
                line,
                expected,
                found,
            } => write!(
                f,
                "layout: line {line} is {found} cells wide, expected {expected}"
            ),
            Self::InvalidRune { ch, line, column } => write!(
                f,
                "layout: invalid rune \u{201c}{ch}\u{201d} at line {line}, column {column}"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}
