//! Terrain grid. Immutable after load, queried for walkability.

/// A grid coordinate. Signed so neighbour offsets can step off the map edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }

    pub fn manhattan(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Draw-order key: cells further down-screen sort later.
    pub fn depth(self) -> i32 {
        self.row + self.col
    }
}

/// 8-neighbourhood offsets, orthogonal first.
pub const NEIGHBOURS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Terrain {
    #[default]
    Empty,
    Grass,
    Sand,
    Water,
    Rock,
    Tree,
    Block,
}

impl Terrain {
    /// Villagers can stand on grass, sand, rock and blocks. Trees, water and
    /// empty space are impassable.
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            Terrain::Grass | Terrain::Sand | Terrain::Rock | Terrain::Block
        )
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Terrain::Empty),
            'G' => Some(Terrain::Grass),
            'S' => Some(Terrain::Sand),
            'W' => Some(Terrain::Water),
            'R' => Some(Terrain::Rock),
            'T' => Some(Terrain::Tree),
            'B' => Some(Terrain::Block),
            _ => None,
        }
    }
}

/// Row-major terrain matrix. Dimensions are fixed for the simulation's lifetime.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Terrain>,
}

impl Grid {
    /// Build from a row-major terrain vector. Returns `None` when the length
    /// does not match `rows * cols`.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Terrain>) -> Option<Self> {
        if cells.len() != rows * cols {
            return None;
        }
        Some(Self { rows, cols, cells })
    }

    /// Grid filled with a single terrain type.
    pub fn filled(rows: usize, cols: usize, terrain: Terrain) -> Self {
        Self {
            rows,
            cols,
            cells: vec![terrain; rows * cols],
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.row < 0 || cell.col < 0 {
            return None;
        }
        let (r, c) = (cell.row as usize, cell.col as usize);
        if r >= self.rows || c >= self.cols {
            return None;
        }
        Some(r * self.cols + c)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        self.index(cell).is_some()
    }

    /// Terrain at `cell`; out-of-bounds reads as `Empty`.
    pub fn terrain_at(&self, cell: Cell) -> Terrain {
        self.index(cell)
            .map(|i| self.cells[i])
            .unwrap_or(Terrain::Empty)
    }

    /// False for out-of-bounds or impassable terrain. Never an error.
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.terrain_at(cell).is_walkable()
    }

    /// Walkable cells in the 8-neighbourhood of `cell`.
    pub fn walkable_neighbours(&self, cell: Cell) -> Vec<Cell> {
        NEIGHBOURS
            .iter()
            .map(|&(dr, dc)| cell.offset(dr, dc))
            .filter(|&c| self.is_walkable(c))
            .collect()
    }

    /// Uniformly sample a cell, up to `attempts` times, until one is walkable
    /// and passes `accept`.
    pub fn sample_walkable(
        &self,
        rng: &mut fastrand::Rng,
        attempts: u32,
        mut accept: impl FnMut(Cell) -> bool,
    ) -> Option<Cell> {
        if self.rows == 0 || self.cols == 0 {
            return None;
        }
        for _ in 0..attempts {
            let cell = Cell::new(
                rng.usize(0..self.rows) as i32,
                rng.usize(0..self.cols) as i32,
            );
            if self.is_walkable(cell) && accept(cell) {
                return Some(cell);
            }
        }
        None
    }

    pub fn center(&self) -> Cell {
        Cell::new((self.rows / 2) as i32, (self.cols / 2) as i32)
    }

    /// First walkable cell in row-major order.
    pub fn first_walkable(&self) -> Option<Cell> {
        self.cells.iter().position(|t| t.is_walkable()).map(|i| {
            Cell::new((i / self.cols) as i32, (i % self.cols) as i32)
        })
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|t| t.is_walkable()).count()
    }
}
