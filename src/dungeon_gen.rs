use std::collections::VecDeque;

use log::{debug, warn};
use noise::{NoiseFn, Perlin};
use rand::Rng;

use crate::constants::*;
use crate::grid::Grid;
use crate::tile::{is_solid, CellCode, TileType, FLOOR, WALL};

/// A rectangle representing a room or region
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// One past the last column
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the last row
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Grow the rectangle by `margin` cells on every side
    pub fn inflate(&self, margin: i32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2 * margin,
            self.height + 2 * margin,
        )
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Clip to the inclusive cell range `[min_x, max_x] x [min_y, max_y]`.
    /// Returns `None` when nothing is left.
    pub fn clip(&self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Rect> {
        let x0 = self.x.max(min_x);
        let y0 = self.y.max(min_y);
        let x1 = self.right().min(max_x + 1);
        let y1 = self.bottom().min(max_y + 1);
        (x1 > x0 && y1 > y0).then(|| Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// How rooms are chosen for a level
#[derive(Clone, Debug, PartialEq)]
pub enum RoomLayout {
    /// Random sizes and positions, connected to the nearest earlier room
    Random,
    /// Hand-placed rooms and the room pairs to join with corridors
    Authored {
        rooms: Vec<Rect>,
        connections: Vec<(usize, usize)>,
    },
}

impl RoomLayout {
    /// Sample 40x40 manor: a central hall with six wings.
    pub fn manor() -> Self {
        RoomLayout::Authored {
            rooms: vec![
                Rect::new(5, 5, 8, 8),
                Rect::new(15, 5, 10, 10),
                Rect::new(5, 15, 8, 8),
                Rect::new(15, 17, 10, 8),
                Rect::new(27, 15, 8, 8),
                Rect::new(27, 5, 8, 8),
                Rect::new(5, 25, 15, 10),
            ],
            connections: vec![(0, 1), (1, 2), (1, 3), (3, 4), (1, 5), (2, 6), (3, 6)],
        }
    }
}

/// Parameters for one generated level
#[derive(Clone, Debug)]
pub struct LevelParams {
    pub width: usize,
    pub height: usize,
    /// Rooms requested by a random layout
    pub room_count: usize,
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub room_margin: i32,
    pub corridor_half_width: i32,
    pub placement_attempts: usize,
    pub corridor_retries: usize,
    pub decorate: bool,
    pub layout: RoomLayout,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            width: DUNGEON_DEFAULT_WIDTH,
            height: DUNGEON_DEFAULT_HEIGHT,
            room_count: DUNGEON_DEFAULT_ROOM_COUNT,
            min_room_size: DUNGEON_MIN_ROOM_SIZE,
            max_room_size: DUNGEON_MAX_ROOM_SIZE,
            room_margin: DUNGEON_ROOM_MARGIN,
            corridor_half_width: DUNGEON_CORRIDOR_HALF_WIDTH,
            placement_attempts: DUNGEON_PLACEMENT_ATTEMPTS,
            corridor_retries: DUNGEON_CORRIDOR_RETRIES,
            decorate: true,
            layout: RoomLayout::Random,
        }
    }
}

/// What the generator managed to build
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    pub requested_rooms: usize,
    pub placed_rooms: usize,
    pub reachable_rooms: usize,
    pub corridor_attempts: usize,
    pub fully_connected: bool,
}

/// Result of dungeon generation
pub struct DungeonResult {
    pub grid: Grid,
    /// Carved rooms; index 0 is the spawn room
    pub rooms: Vec<Rect>,
    /// The starting room where the player spawns
    pub spawn_room: Rect,
    pub report: GenerationReport,
}

pub struct DungeonGenerator {
    width: usize,
    height: usize,
    cells: Vec<CellCode>,
}

impl DungeonGenerator {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![WALL; width * height],
        }
    }

    /// Generate a level. Never fails: a crowded grid yields fewer rooms and an
    /// unlucky corridor pass yields a partially connected level.
    pub fn generate(params: &LevelParams, rng: &mut impl Rng) -> DungeonResult {
        puffin::profile_function!();
        let width = params.width.max(DUNGEON_MIN_DIMENSION);
        let height = params.height.max(DUNGEON_MIN_DIMENSION);
        let mut gen = Self::new(width, height);

        let (requested_rooms, mut rooms, connections) = match &params.layout {
            RoomLayout::Random => {
                let rooms = gen.place_random_rooms(params, rng);
                let connections = plan_connections(&rooms, rng);
                (params.room_count, rooms, connections)
            }
            RoomLayout::Authored { rooms, connections } => {
                let (kept, links) = gen.clip_authored(rooms, connections);
                (rooms.len(), kept, links)
            }
        };
        let placed_rooms = rooms.len();

        if rooms.is_empty() {
            let fallback = gen.fallback_room();
            debug!("No rooms placed, carving fallback room {:?}", fallback);
            rooms.push(fallback);
        }

        for room in &rooms {
            gen.carve_room(room);
        }

        // Corridor phase: retried on a clean copy of the carved rooms
        let carved = gen.cells.clone();
        let max_attempts = params.corridor_retries + 1;
        let mut best_cells = carved.clone();
        let mut best_reached = 0;
        let mut corridor_attempts = 0;
        for attempt in 1..=max_attempts {
            corridor_attempts = attempt;
            gen.cells.clone_from(&carved);
            for &(a, b) in &connections {
                gen.connect_rooms(&rooms[a], &rooms[b], params.corridor_half_width, rng);
            }

            let reached = reachable_rooms(width, height, &gen.cells, &rooms);
            if reached > best_reached {
                best_reached = reached;
                best_cells.clone_from(&gen.cells);
            }
            if reached == rooms.len() {
                break;
            }
            debug!(
                "Corridor attempt {}/{} reached {}/{} rooms",
                attempt,
                max_attempts,
                reached,
                rooms.len()
            );
        }
        gen.cells = best_cells;

        if best_reached < rooms.len() {
            warn!(
                "Level only partially connected after {} corridor attempts: {}/{} rooms reachable",
                corridor_attempts,
                best_reached,
                rooms.len()
            );
        }

        // The spawn room stays open whatever the corridors did
        gen.carve_room(&rooms[0]);

        if params.decorate {
            let perlin = Perlin::new(rng.gen());
            gen.place_pillars();
            gen.apply_wallpaper(&rooms, &perlin);
        }

        let reachable = reachable_rooms(width, height, &gen.cells, &rooms);
        let report = GenerationReport {
            requested_rooms,
            placed_rooms,
            reachable_rooms: reachable,
            corridor_attempts,
            fully_connected: reachable == rooms.len(),
        };

        let spawn_room = rooms[0];
        DungeonResult {
            grid: Grid::from_cells(width, height, gen.cells),
            rooms,
            spawn_room,
            report,
        }
    }

    fn get_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Interior cells only; the outer ring is never carved.
    fn is_interior(&self, x: i32, y: i32) -> bool {
        x >= 1 && y >= 1 && x <= self.width as i32 - 2 && y <= self.height as i32 - 2
    }

    fn carve_cell(&mut self, x: i32, y: i32) {
        if !self.is_interior(x, y) {
            return;
        }
        if let Some(idx) = self.get_index(x, y) {
            self.cells[idx] = FLOOR;
        }
    }

    fn carve_room(&mut self, room: &Rect) {
        for y in room.y..room.bottom() {
            for x in room.x..room.right() {
                self.carve_cell(x, y);
            }
        }
    }

    fn place_random_rooms(&self, params: &LevelParams, rng: &mut impl Rng) -> Vec<Rect> {
        let w = self.width as i32;
        let h = self.height as i32;
        let max_w = params.max_room_size.min(w - 2).max(1);
        let max_h = params.max_room_size.min(h - 2).max(1);
        let min_w = params.min_room_size.clamp(1, max_w);
        let min_h = params.min_room_size.clamp(1, max_h);
        let margin = params.room_margin.max(0);

        let mut rooms: Vec<Rect> = Vec::with_capacity(params.room_count);
        for _ in 0..params.placement_attempts {
            if rooms.len() >= params.room_count {
                break;
            }
            let room_w = rng.gen_range(min_w..=max_w);
            let room_h = rng.gen_range(min_h..=max_h);
            let x = rng.gen_range(1..=w - 1 - room_w);
            let y = rng.gen_range(1..=h - 1 - room_h);
            let candidate = Rect::new(x, y, room_w, room_h);

            let inflated = candidate.inflate(margin);
            if rooms.iter().any(|r| inflated.intersects(r)) {
                continue;
            }
            rooms.push(candidate);
        }
        rooms
    }

    /// Clip authored rooms to the interior and remap connection indices.
    fn clip_authored(
        &self,
        rooms: &[Rect],
        connections: &[(usize, usize)],
    ) -> (Vec<Rect>, Vec<(usize, usize)>) {
        let max_x = self.width as i32 - 2;
        let max_y = self.height as i32 - 2;

        let mut index = Vec::with_capacity(rooms.len());
        let mut kept = Vec::with_capacity(rooms.len());
        for room in rooms {
            match room.clip(1, 1, max_x, max_y) {
                Some(clipped) => {
                    index.push(Some(kept.len()));
                    kept.push(clipped);
                }
                None => {
                    debug!("Authored room {:?} lies outside the grid, dropped", room);
                    index.push(None);
                }
            }
        }

        let links = connections
            .iter()
            .filter_map(|&(a, b)| {
                let from = index.get(a).copied().flatten();
                let to = index.get(b).copied().flatten();
                match (from, to) {
                    (Some(from), Some(to)) if from != to => Some((from, to)),
                    _ => {
                        debug!("Skipping connection {}-{}: room missing", a, b);
                        None
                    }
                }
            })
            .collect();
        (kept, links)
    }

    fn fallback_room(&self) -> Rect {
        let w = self.width as i32;
        let h = self.height as i32;
        let side = 3.min(w - 2).min(h - 2).max(1);
        Rect::new(w / 2 - side / 2, h / 2 - side / 2, side, side)
    }

    /// Connect two rooms with an L- or Z-shaped corridor between random
    /// interior points.
    fn connect_rooms(&mut self, room1: &Rect, room2: &Rect, half_width: i32, rng: &mut impl Rng) {
        let start = random_point(room1, rng);
        let end = random_point(room2, rng);
        let waypoints = corridor_waypoints(start, end, rng);
        for pair in waypoints.windows(2) {
            self.carve_segment(pair[0], pair[1], half_width);
        }
    }

    /// Walk x then y from `from` to `to`, stamping the brush on every cell.
    fn carve_segment(&mut self, from: (i32, i32), to: (i32, i32), half_width: i32) {
        let (mut x, mut y) = from;
        self.stamp(x, y, half_width);
        while x != to.0 {
            x += (to.0 - x).signum();
            self.stamp(x, y, half_width);
        }
        while y != to.1 {
            y += (to.1 - y).signum();
            self.stamp(x, y, half_width);
        }
    }

    /// Disc brush of the given radius
    fn stamp(&mut self, cx: i32, cy: i32, radius: i32) {
        let r = radius.max(0);
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.carve_cell(cx + dx, cy + dy);
                }
            }
        }
    }

    fn is_open(&self, x: i32, y: i32) -> bool {
        self.get_index(x, y)
            .map(|idx| !is_solid(self.cells[idx]))
            .unwrap_or(false)
    }

    /// Turn wall stubs poking into open space into pillars.
    fn place_pillars(&mut self) {
        let width = self.width as i32;
        let height = self.height as i32;

        // First pass: collect, so new pillars don't influence their neighbours
        let mut stubs = Vec::new();
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let Some(idx) = self.get_index(x, y) else {
                    continue;
                };
                if self.cells[idx] != WALL {
                    continue;
                }
                let open_sides = [(0, -1), (0, 1), (1, 0), (-1, 0)]
                    .iter()
                    .filter(|(dx, dy)| self.is_open(x + dx, y + dy))
                    .count();
                if open_sides >= DUNGEON_PILLAR_MIN_OPEN_SIDES {
                    stubs.push(idx);
                }
            }
        }

        for idx in stubs {
            self.cells[idx] = TileType::Pillar.code();
        }
    }

    /// Paper the walls around large rooms, alternating patterns in noise patches.
    fn apply_wallpaper(&mut self, rooms: &[Rect], perlin: &Perlin) {
        for room in rooms {
            if room.width < DUNGEON_WALLPAPER_MIN_ROOM || room.height < DUNGEON_WALLPAPER_MIN_ROOM {
                continue;
            }
            let ring = room.inflate(1);
            for y in ring.y..ring.bottom() {
                for x in ring.x..ring.right() {
                    if room.contains(x, y) {
                        continue;
                    }
                    let Some(idx) = self.get_index(x, y) else {
                        continue;
                    };
                    if self.cells[idx] != WALL {
                        continue;
                    }
                    let sample = perlin.get([
                        (x as f64 + 0.5) * DUNGEON_WALLPAPER_NOISE_SCALE,
                        (y as f64 + 0.5) * DUNGEON_WALLPAPER_NOISE_SCALE,
                    ]);
                    let paper = if sample >= 0.0 {
                        TileType::FlowerWallpaper
                    } else {
                        TileType::FlowerWallpaperLeaves
                    };
                    self.cells[idx] = paper.code();
                }
            }
        }
    }
}

fn random_point(room: &Rect, rng: &mut impl Rng) -> (i32, i32) {
    (
        rng.gen_range(room.x..room.right().max(room.x + 1)),
        rng.gen_range(room.y..room.bottom().max(room.y + 1)),
    )
}

/// Corner points of an orthogonal path: L (either orientation) or Z.
fn corridor_waypoints(start: (i32, i32), end: (i32, i32), rng: &mut impl Rng) -> Vec<(i32, i32)> {
    let (x1, y1) = start;
    let (x2, y2) = end;
    match rng.gen_range(0..3) {
        0 => vec![start, (x2, y1), end],
        1 => vec![start, (x1, y2), end],
        _ => {
            if rng.gen_bool(0.5) {
                let mid_x = rng.gen_range(x1.min(x2)..=x1.max(x2));
                vec![start, (mid_x, y1), (mid_x, y2), end]
            } else {
                let mid_y = rng.gen_range(y1.min(y2)..=y1.max(y2));
                vec![start, (x1, mid_y), (x2, mid_y), end]
            }
        }
    }
}

/// Link every room to its nearest earlier room, with occasional extra loops.
fn plan_connections(rooms: &[Rect], rng: &mut impl Rng) -> Vec<(usize, usize)> {
    let mut links = Vec::with_capacity(rooms.len() * 2);
    for i in 1..rooms.len() {
        let (cx, cy) = rooms[i].center();
        let nearest = (0..i)
            .min_by_key(|&j| {
                let (jx, jy) = rooms[j].center();
                (jx - cx).pow(2) + (jy - cy).pow(2)
            })
            .unwrap_or(0);
        links.push((nearest, i));

        if i >= 2 && rng.gen_bool(DUNGEON_EXTRA_CONNECTION_CHANCE) {
            let other = rng.gen_range(0..i);
            if other != nearest {
                links.push((other, i));
            }
        }
    }
    links
}

/// Label 4-connected regions of passable cells. Solid cells get `u32::MAX`.
fn label_components(width: usize, height: usize, cells: &[CellCode]) -> Vec<u32> {
    let mut labels = vec![u32::MAX; cells.len()];
    let mut next = 0;
    let mut queue = VecDeque::new();

    for start in 0..cells.len() {
        if is_solid(cells[start]) || labels[start] != u32::MAX {
            continue;
        }
        labels[start] = next;
        queue.push_back(start);
        while let Some(idx) = queue.pop_front() {
            let x = idx % width;
            let y = idx / width;
            let mut visit = |n: usize| {
                if !is_solid(cells[n]) && labels[n] == u32::MAX {
                    labels[n] = next;
                    queue.push_back(n);
                }
            };
            if x > 0 {
                visit(idx - 1);
            }
            if x + 1 < width {
                visit(idx + 1);
            }
            if y > 0 {
                visit(idx - width);
            }
            if y + 1 < height {
                visit(idx + width);
            }
        }
        next += 1;
    }
    labels
}

/// Count rooms reachable from room 0 through passable cells.
fn reachable_rooms(width: usize, height: usize, cells: &[CellCode], rooms: &[Rect]) -> usize {
    if rooms.is_empty() {
        return 0;
    }
    let labels = label_components(width, height, cells);

    // Regions touching each room's box (grown by one to catch doorways)
    let room_regions: Vec<Vec<u32>> = rooms
        .iter()
        .map(|room| {
            let area = room.inflate(1);
            let mut regions = Vec::new();
            for y in area.y.max(0)..area.bottom().min(height as i32) {
                for x in area.x.max(0)..area.right().min(width as i32) {
                    let label = labels[y as usize * width + x as usize];
                    if label != u32::MAX {
                        regions.push(label);
                    }
                }
            }
            regions.sort_unstable();
            regions.dedup();
            regions
        })
        .collect();

    let mut reached = vec![false; rooms.len()];
    reached[0] = true;
    let mut queue = VecDeque::from([0]);
    while let Some(current) = queue.pop_front() {
        for other in 0..rooms.len() {
            if reached[other] {
                continue;
            }
            let shared = room_regions[current]
                .iter()
                .any(|label| room_regions[other].binary_search(label).is_ok());
            if shared {
                reached[other] = true;
                queue.push_back(other);
            }
        }
    }
    reached.iter().filter(|&&r| r).count()
}

/// Number of `rooms` reachable from the first one in a finished grid.
pub fn verify_connectivity(grid: &Grid, rooms: &[Rect]) -> usize {
    reachable_rooms(grid.width, grid.height, grid.cells(), rooms)
}
