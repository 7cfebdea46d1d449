//! Map providers. The simulation only ever sees the finished [`Grid`].

use std::path::Path;

use crate::error::{Result, SimError};
use crate::grid::{Cell, Grid, Terrain};

/// Side length of the default island.
pub const ISLAND_SIZE: usize = 15;
/// Chance an inland cell of the default island grows a tree.
const ISLAND_TREE_CHANCE: f32 = 0.1;

/// Source of terrain for a [`Grid`].
pub trait MapProvider {
    fn dimensions(&self) -> (usize, usize);
    fn terrain_at(&self, row: usize, col: usize) -> Terrain;

    /// Snapshot the provider into an immutable grid.
    fn build_grid(&self) -> Grid {
        let (rows, cols) = self.dimensions();
        let mut cells = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                cells.push(self.terrain_at(r, c));
            }
        }
        Grid::from_cells(rows, cols, cells).unwrap_or_else(|| Grid::filled(rows, cols, Terrain::Empty))
    }
}

/// A map parsed from text, one row per non-blank line.
#[derive(Debug, Clone)]
pub struct TextMap {
    rows: Vec<Vec<Terrain>>,
    cols: usize,
}

impl TextMap {
    /// Parse map text. Unknown characters become `Empty`; short rows are
    /// padded with `Empty` to the widest row.
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .collect();
        if lines.is_empty() {
            return Err(SimError::EmptyMap);
        }

        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let rows = lines
            .iter()
            .map(|line| {
                let mut row: Vec<Terrain> = line
                    .chars()
                    .map(|c| Terrain::from_char(c).unwrap_or(Terrain::Empty))
                    .collect();
                row.resize(cols, Terrain::Empty);
                row
            })
            .collect();

        Ok(Self { rows, cols })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }
}

impl MapProvider for TextMap {
    fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.cols)
    }

    fn terrain_at(&self, row: usize, col: usize) -> Terrain {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(Terrain::Empty)
    }
}

/// The default diamond island: water ring, sand beach, grass interior
/// sprinkled with trees.
#[derive(Debug, Clone)]
pub struct IslandMap {
    grid: Grid,
}

impl IslandMap {
    pub fn generate(rng: &mut fastrand::Rng) -> Self {
        let center = Cell::new((ISLAND_SIZE / 2) as i32, (ISLAND_SIZE / 2) as i32);
        let mut cells = Vec::with_capacity(ISLAND_SIZE * ISLAND_SIZE);
        for r in 0..ISLAND_SIZE {
            for c in 0..ISLAND_SIZE {
                let dist = Cell::new(r as i32, c as i32).manhattan(center);
                let terrain = if dist > 6 {
                    Terrain::Empty
                } else if dist > 5 {
                    Terrain::Water
                } else if dist > 4 {
                    Terrain::Sand
                } else if rng.f32() < ISLAND_TREE_CHANCE {
                    Terrain::Tree
                } else {
                    Terrain::Grass
                };
                cells.push(terrain);
            }
        }
        let grid = Grid::from_cells(ISLAND_SIZE, ISLAND_SIZE, cells)
            .unwrap_or_else(|| Grid::filled(ISLAND_SIZE, ISLAND_SIZE, Terrain::Grass));
        Self { grid }
    }
}

impl MapProvider for IslandMap {
    fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    fn terrain_at(&self, row: usize, col: usize) -> Terrain {
        self.grid.terrain_at(Cell::new(row as i32, col as i32))
    }

    fn build_grid(&self) -> Grid {
        self.grid.clone()
    }
}

/// Load the map at `path`, or generate the default island when there is no
/// path or the file is unusable.
pub fn load_or_island(path: Option<&Path>, rng: &mut fastrand::Rng) -> Grid {
    if let Some(path) = path {
        match TextMap::load(path) {
            Ok(map) => {
                let grid = map.build_grid();
                log::info!("Map loaded: {}x{}", grid.rows(), grid.cols());
                return grid;
            }
            Err(e) => log::warn!("{e}, using the default island"),
        }
    }
    IslandMap::generate(rng).build_grid()
}
