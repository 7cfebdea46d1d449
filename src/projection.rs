use glam::Vec2;

use crate::grid::Cell;

/// Grid-to-screen mapping used for sub-cell interpolation and draw placement.
pub trait Projection {
    /// Top-left of the terrain tile for `cell`.
    fn cell_to_screen(&self, cell: Cell) -> Vec2;
    /// Placement point on the walkable top surface of `cell`. Entities stand
    /// here, slightly above the terrain tile origin.
    fn cell_to_walkable(&self, cell: Cell) -> Vec2;
    /// On-screen tile footprint (width, height).
    fn tile_size(&self) -> Vec2;

    /// Top-left of a body of size `body` standing on `cell`: horizontally
    /// centred on the tile, feet on the tile's lower edge.
    fn anchor(&self, cell: Cell, body: Vec2) -> Vec2 {
        let tile = self.tile_size();
        self.cell_to_walkable(cell) + Vec2::new((tile.x - body.x) * 0.5, tile.y - body.y)
    }
}

/// Foot point of a body whose top-left is at `pos`.
pub fn foot(pos: Vec2, body: Vec2) -> Vec2 {
    Vec2::new(pos.x + body.x * 0.5, pos.y + body.y)
}

/// Inverse of [`foot`]: top-left for a body of size `body` with feet at `foot`.
pub fn from_foot(foot: Vec2, body: Vec2) -> Vec2 {
    Vec2::new(foot.x - body.x * 0.5, foot.y - body.y)
}

/// Isometric diamond projection with the map's top corner at `origin`.
#[derive(Debug, Clone, Copy)]
pub struct IsoProjection {
    origin: Vec2,
    tile_w: f32,
    tile_h: f32,
    /// Horizontal / vertical step per cell.
    step: Vec2,
}

impl IsoProjection {
    /// `scale` is the nominal tile size in pixels (100 for the stock sprites).
    pub fn new(scale: f32, origin: Vec2) -> Self {
        let tile_w = scale * 0.9;
        let tile_h = (scale / 2.2).floor();
        let half_w = (tile_w / 2.0).floor();
        let half_h = (tile_h / 2.0).floor();
        Self {
            origin,
            tile_w,
            tile_h,
            step: Vec2::new((half_w / 2.0).floor(), (half_h / 2.0).floor()),
        }
    }
}

impl Projection for IsoProjection {
    fn cell_to_screen(&self, cell: Cell) -> Vec2 {
        let (i, j) = (cell.row as f32, cell.col as f32);
        Vec2::new(
            (i - j) * self.step.x + self.origin.x,
            (i + j) * self.step.y + self.origin.y,
        )
    }

    fn cell_to_walkable(&self, cell: Cell) -> Vec2 {
        self.cell_to_screen(cell) - Vec2::new(self.tile_w * 0.2, self.tile_h * 0.6)
    }

    fn tile_size(&self) -> Vec2 {
        Vec2::new(self.tile_w, self.tile_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_scale_steps() {
        let p = IsoProjection::new(100.0, Vec2::new(400.0, 0.0));
        assert_eq!(p.tile_size(), Vec2::new(90.0, 45.0));
        assert_eq!(p.cell_to_screen(Cell::new(0, 0)), Vec2::new(400.0, 0.0));
        assert_eq!(p.cell_to_screen(Cell::new(1, 0)), Vec2::new(422.0, 11.0));
        assert_eq!(p.cell_to_screen(Cell::new(0, 1)), Vec2::new(378.0, 11.0));
    }

    #[test]
    fn anchor_keeps_feet_on_tile_edge() {
        let p = IsoProjection::new(100.0, Vec2::ZERO);
        let cell = Cell::new(3, 5);
        let adult = Vec2::new(40.0, 60.0);
        let baby = adult * 0.6;
        let a = foot(p.anchor(cell, adult), adult);
        let b = foot(p.anchor(cell, baby), baby);
        assert!((a - b).length() < 1e-4);
        assert!((from_foot(a, adult) - p.anchor(cell, adult)).length() < 1e-4);
    }
}
