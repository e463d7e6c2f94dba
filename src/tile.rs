/// Raw cell code as stored in the grid.
///
/// `0` is open floor; every code above zero is solid. The exact value only
/// selects how a wall is drawn.
pub type CellCode = u8;

/// Cell code for open floor
pub const FLOOR: CellCode = 0;
/// Cell code for a plain stone wall
pub const WALL: CellCode = 1;

/// Known cell kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileType {
    Floor,
    Wall,
    Pillar,
    Platform,
    Bridge,
    Stair,
    FlowerWallpaper,
    FlowerWallpaperLeaves,
}

impl TileType {
    /// Decode a cell code. Unknown solid codes read as plain walls so they
    /// still collide and block sight.
    pub fn from_code(code: CellCode) -> Self {
        match code {
            0 => TileType::Floor,
            1 => TileType::Wall,
            2 => TileType::Pillar,
            3 => TileType::Platform,
            4 => TileType::Bridge,
            5 => TileType::Stair,
            6 => TileType::FlowerWallpaper,
            7 => TileType::FlowerWallpaperLeaves,
            _ => TileType::Wall,
        }
    }

    pub fn code(self) -> CellCode {
        match self {
            TileType::Floor => 0,
            TileType::Wall => 1,
            TileType::Pillar => 2,
            TileType::Platform => 3,
            TileType::Bridge => 4,
            TileType::Stair => 5,
            TileType::FlowerWallpaper => 6,
            TileType::FlowerWallpaperLeaves => 7,
        }
    }

    pub fn is_walkable(self) -> bool {
        self == TileType::Floor
    }

    pub fn blocks_vision(self) -> bool {
        !self.is_walkable()
    }

    /// ASCII glyph used by `Grid::from_ascii` and debug dumps
    pub fn glyph(self) -> char {
        match self {
            TileType::Floor => '.',
            TileType::Wall => '#',
            TileType::Pillar => 'P',
            TileType::Platform => '=',
            TileType::Bridge => 'B',
            TileType::Stair => 'S',
            TileType::FlowerWallpaper => 'f',
            TileType::FlowerWallpaperLeaves => 'F',
        }
    }

    pub fn from_glyph(glyph: char) -> Self {
        match glyph {
            '.' | ' ' | '0' => TileType::Floor,
            'P' | '2' => TileType::Pillar,
            '=' | '3' => TileType::Platform,
            'B' | '4' => TileType::Bridge,
            'S' | '5' => TileType::Stair,
            'f' | '6' => TileType::FlowerWallpaper,
            'F' | '7' => TileType::FlowerWallpaperLeaves,
            _ => TileType::Wall,
        }
    }
}

/// Passability predicate on a raw code
#[inline]
pub fn is_solid(code: CellCode) -> bool {
    code > FLOOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip_for_known_kinds() {
        for code in 0..=7 {
            assert_eq!(TileType::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_unknown_codes_are_solid_walls() {
        assert_eq!(TileType::from_code(42), TileType::Wall);
        assert!(is_solid(42));
    }

    #[test]
    fn test_only_floor_is_walkable() {
        assert!(TileType::Floor.is_walkable());
        for code in 1..=7 {
            let tile = TileType::from_code(code);
            assert!(!tile.is_walkable());
            assert!(tile.blocks_vision());
        }
    }
}
