use crate::tile::{is_solid, CellCode, TileType, WALL};

/// The tile map: a fixed-size row-major array of cell codes.
///
/// A grid is built once per level and never mutated afterwards; any lookup
/// outside the index range reads as solid wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<CellCode>,
}

impl Grid {
    /// Wrap a finished cell buffer. Short buffers are padded with wall.
    pub(crate) fn from_cells(width: usize, height: usize, mut cells: Vec<CellCode>) -> Self {
        cells.resize(width * height, WALL);
        Self { width, height, cells }
    }

    /// Build a grid from hand-authored rows. Ragged rows are padded with wall.
    pub fn from_rows(rows: &[Vec<CellCode>]) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            cells.extend_from_slice(row);
            cells.extend(std::iter::repeat(WALL).take(width - row.len()));
        }
        Self { width, height, cells }
    }

    /// Build a grid from an ASCII sketch, one line per row (see `TileType::from_glyph`).
    pub fn from_ascii(text: &str) -> Self {
        let rows: Vec<Vec<CellCode>> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().map(|c| TileType::from_glyph(c).code()).collect())
            .collect();
        Self::from_rows(&rows)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<CellCode> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    /// Cell code with out-of-range cells reported as plain wall
    pub fn code_or_wall(&self, x: i32, y: i32) -> CellCode {
        self.get(x, y).unwrap_or(WALL)
    }

    pub fn tile(&self, x: i32, y: i32) -> TileType {
        TileType::from_code(self.code_or_wall(x, y))
    }

    /// Whether the cell blocks movement and sight. Out of bounds is blocked.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map(is_solid).unwrap_or(true)
    }

    /// Whether a continuous point (tile units) lies in a blocked cell.
    pub fn is_blocked_at(&self, x: f32, y: f32) -> bool {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return true;
        }
        self.is_blocked(x.floor() as i32, y.floor() as i32)
    }

    pub fn cells(&self) -> &[CellCode] {
        &self.cells
    }

    pub fn passable_count(&self) -> usize {
        self.cells.iter().filter(|&&c| !is_solid(c)).count()
    }

    /// True when every cell of the outer ring is solid
    pub fn has_solid_border(&self) -> bool {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..w).all(|x| self.is_blocked(x, 0) && self.is_blocked(x, h - 1))
            && (0..h).all(|y| self.is_blocked(0, y) && self.is_blocked(w - 1, y))
    }

    /// Render as ASCII, the inverse of `from_ascii`
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            out.extend(row.iter().map(|&c| TileType::from_code(c).glyph()));
            out.push('\n');
        }
        out
    }
}
