//! 2D cost raster and line walking over its cells.
//!
//! The raster mirrors the usual navigation costmap encoding: one byte per
//! cell, `0` is free space, values up to [`MAX_NON_OBSTACLE`] are traversable
//! with increasing cost, and [`LETHAL_OBSTACLE`] and above mark cells that
//! must not be entered.
//!
//! # Cell walking
//!
//! [`LineIterator`] walks the cells crossed by a straight segment using
//! Bresenham's integer algorithm. Both end cells are visited and every step
//! advances exactly one cell along the major axis:
//!
//! ```text
//! From (0,0) to (7,3):
//!
//!     3 │        ●
//!     2 │     ●●
//!     1 │  ●●
//!     0 ●●
//!       └──────────
//!        0 1 2 3 4 5 6 7
//! ```
//!
//! Costmaps are produced elsewhere and handed to scorers through a
//! [`CostmapHandle`], which swaps whole rasters so readers never observe a
//! partially updated map.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::graph::Coordinates;

pub const FREE_SPACE: u8 = 0;
/// Highest cost that still counts as traversable.
pub const MAX_NON_OBSTACLE: u8 = 252;
pub const INSCRIBED_INFLATED_OBSTACLE: u8 = 253;
pub const LETHAL_OBSTACLE: u8 = 254;
pub const NO_INFORMATION: u8 = 255;

/// Index of a raster cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapCell {
    pub x: u32,
    pub y: u32,
}

impl MapCell {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Row-major grid of per-cell traversal costs.
#[derive(Debug, Clone, PartialEq)]
pub struct Costmap {
    size_x: u32,
    size_y: u32,
    /// Metres per cell.
    resolution: f64,
    /// World position of the lower-left corner of cell (0, 0).
    origin: Coordinates,
    costs: Vec<u8>,
}

impl Costmap {
    /// Create a raster filled with `default_value`.
    pub fn new(
        size_x: u32,
        size_y: u32,
        resolution: f64,
        origin: Coordinates,
        default_value: u8,
    ) -> Result<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(Error::invalid(format!(
                "costmap resolution must be finite and positive, got {}",
                resolution
            )));
        }
        if size_x == 0 || size_y == 0 {
            return Err(Error::invalid(format!(
                "costmap must have at least one cell, got {}x{}",
                size_x, size_y
            )));
        }

        Ok(Self {
            size_x,
            size_y,
            resolution,
            origin,
            costs: vec![default_value; size_x as usize * size_y as usize],
        })
    }

    /// Build a raster from existing row-major cell data.
    pub fn from_cells(
        size_x: u32,
        size_y: u32,
        resolution: f64,
        origin: Coordinates,
        costs: Vec<u8>,
    ) -> Result<Self> {
        let mut costmap = Self::new(size_x, size_y, resolution, origin, FREE_SPACE)?;
        if costs.len() != costmap.costs.len() {
            return Err(Error::invalid(format!(
                "costmap data has {} cells, expected {}",
                costs.len(),
                costmap.costs.len()
            )));
        }
        costmap.costs = costs;
        Ok(costmap)
    }

    pub fn size_x(&self) -> u32 {
        self.size_x
    }

    pub fn size_y(&self) -> u32 {
        self.size_y
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn origin(&self) -> Coordinates {
        self.origin
    }

    /// Cost of a cell. Cells outside the raster read as [`NO_INFORMATION`].
    pub fn cost(&self, cell: MapCell) -> u8 {
        self.index(cell)
            .map(|idx| self.costs[idx])
            .unwrap_or(NO_INFORMATION)
    }

    /// Set the cost of a cell. Returns `false` when the cell is outside the raster.
    pub fn set_cost(&mut self, cell: MapCell, cost: u8) -> bool {
        match self.index(cell) {
            Some(idx) => {
                self.costs[idx] = cost;
                true
            }
            None => false,
        }
    }

    /// Convert a world point to the cell containing it.
    pub fn world_to_map(&self, point: &Coordinates) -> Option<MapCell> {
        if point.x < self.origin.x || point.y < self.origin.y {
            return None;
        }

        let mx = ((point.x - self.origin.x) / self.resolution).floor();
        let my = ((point.y - self.origin.y) / self.resolution).floor();
        if mx >= f64::from(self.size_x) || my >= f64::from(self.size_y) {
            return None;
        }

        Some(MapCell::new(mx as u32, my as u32))
    }

    /// Clip a world segment to the raster and return the cells at either end
    /// of the part that lies inside it.
    ///
    /// Uses Liang-Barsky clipping in map units. Returns `None` when no part of
    /// the segment lies within the raster.
    pub fn clip_to_map(
        &self,
        start: &Coordinates,
        end: &Coordinates,
    ) -> Option<(MapCell, MapCell)> {
        let (x0, y0) = self.to_map_units(start);
        let (x1, y1) = self.to_map_units(end);
        let (dx, dy) = (x1 - x0, y1 - y0);
        let (width, height) = (f64::from(self.size_x), f64::from(self.size_y));

        let mut t_enter = 0.0_f64;
        let mut t_exit = 1.0_f64;
        for (p, q) in [(-dx, x0), (dx, width - x0), (-dy, y0), (dy, height - y0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t_enter = t_enter.max(t);
            } else {
                t_exit = t_exit.min(t);
            }
            if t_enter > t_exit {
                return None;
            }
        }

        // A segment grazing the far edge of the raster touches no cell.
        let t_mid = 0.5 * (t_enter + t_exit);
        let (mid_x, mid_y) = (x0 + t_mid * dx, y0 + t_mid * dy);
        if !(0.0..width).contains(&mid_x) || !(0.0..height).contains(&mid_y) {
            return None;
        }

        let cell_at = |t: f64| {
            MapCell::new(
                clamp_to_cells(x0 + t * dx, self.size_x),
                clamp_to_cells(y0 + t * dy, self.size_y),
            )
        };
        Some((cell_at(t_enter), cell_at(t_exit)))
    }

    /// World coordinates of a cell centre.
    pub fn map_to_world(&self, cell: MapCell) -> Coordinates {
        Coordinates::new(
            self.origin.x + (f64::from(cell.x) + 0.5) * self.resolution,
            self.origin.y + (f64::from(cell.y) + 0.5) * self.resolution,
        )
    }

    fn index(&self, cell: MapCell) -> Option<usize> {
        if cell.x < self.size_x && cell.y < self.size_y {
            Some(cell.y as usize * self.size_x as usize + cell.x as usize)
        } else {
            None
        }
    }

    fn to_map_units(&self, point: &Coordinates) -> (f64, f64) {
        (
            (point.x - self.origin.x) / self.resolution,
            (point.y - self.origin.y) / self.resolution,
        )
    }
}

/// Cell index containing `value`, with rounding noise at the borders pulled
/// back inside `0..size`.
fn clamp_to_cells(value: f64, size: u32) -> u32 {
    (value.floor().max(0.0) as u32).min(size - 1)
}

/// Whether a cell cost blocks traversal.
pub fn is_lethal(cost: u8) -> bool {
    cost >= LETHAL_OBSTACLE
}

/// Bresenham walk over the cells between two raster cells, both inclusive.
#[derive(Debug, Clone)]
pub struct LineIterator {
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
    x_inc: i64,
    y_inc: i64,
    error: i64,
    steep: bool,
    end_x: i64,
    done: bool,
}

impl LineIterator {
    pub fn new(start: MapCell, end: MapCell) -> Self {
        let (sx, sy) = (i64::from(start.x), i64::from(start.y));
        let (ex, ey) = (i64::from(end.x), i64::from(end.y));
        let dx = (ex - sx).abs();
        let dy = (ey - sy).abs();
        let steep = dy > dx;

        let (x, y, end_x, end_y, dx, dy) = if steep {
            (sy, sx, ey, ex, dy, dx)
        } else {
            (sx, sy, ex, ey, dx, dy)
        };

        Self {
            x,
            y,
            dx,
            dy,
            x_inc: if end_x >= x { 1 } else { -1 },
            y_inc: if end_y >= y { 1 } else { -1 },
            error: dx / 2,
            steep,
            end_x,
            done: false,
        }
    }
}

impl Iterator for LineIterator {
    type Item = MapCell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Coordinates stay within the u32 range spanned by the two end cells.
        let cell = if self.steep {
            MapCell::new(self.y as u32, self.x as u32)
        } else {
            MapCell::new(self.x as u32, self.y as u32)
        };

        if self.x == self.end_x {
            self.done = true;
            return Some(cell);
        }

        self.error -= self.dy;
        if self.error < 0 {
            self.y += self.y_inc;
            self.error += self.dx;
        }
        self.x += self.x_inc;

        Some(cell)
    }
}

/// Shared slot through which the latest costmap reaches its scorers.
///
/// Cloning the handle shares the slot. Readers take a snapshot `Arc` and
/// keep scoring against it even if a newer raster is published meanwhile.
#[derive(Debug, Clone, Default)]
pub struct CostmapHandle {
    slot: Arc<RwLock<Option<Arc<Costmap>>>>,
}

impl CostmapHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new raster, replacing the previous one.
    pub fn replace(&self, costmap: impl Into<Arc<Costmap>>) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(costmap.into());
    }

    /// Forget the current raster.
    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    /// Snapshot of the current raster, if one was published.
    pub fn current(&self) -> Option<Arc<Costmap>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
