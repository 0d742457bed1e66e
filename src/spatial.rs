//! Uniform-grid spatial hashing for neighbor queries.
//!
//! Connector segments need all point pairs within a radius; the naive scan is
//! O(n²) and dominates frame cost for starfield-sized populations. The grid
//! buckets points into cells of at least the query radius so each pair check
//! only scans the 3x3 cell neighborhood.
//!
//! Buckets are intrusive singly-linked lists (`head`/`next` index arrays), so
//! a rebuild allocates nothing once capacity is reached.

use crate::field::Viewport;
use glam::Vec2;

const INVALID: usize = usize::MAX;
const MIN_CELL_SIZE: f32 = 1.0e-6;

/// A rebuild-per-frame neighbor grid over 2D positions.
pub struct NeighborGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    head: Vec<usize>,
    next: Vec<usize>,
    positions: Vec<Vec2>,
}

impl NeighborGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(MIN_CELL_SIZE),
            cols: 0,
            rows: 0,
            head: Vec::new(),
            next: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Re-bucket all positions. Call once per frame before querying.
    pub fn rebuild(&mut self, positions: &[Vec2], viewport: &Viewport) {
        self.cols = ((viewport.width / self.cell_size).ceil() as usize).max(1);
        self.rows = ((viewport.height / self.cell_size).ceil() as usize).max(1);

        self.head.clear();
        self.head.resize(self.cols * self.rows, INVALID);
        self.next.clear();
        self.next.resize(positions.len(), INVALID);
        self.positions.clear();
        self.positions.extend_from_slice(positions);

        for (i, pos) in positions.iter().enumerate() {
            let cell = self.cell_index(*pos);
            self.next[i] = self.head[cell];
            self.head[cell] = i;
        }
    }

    /// Visit every unordered pair `(i, j)` with `i < j` whose distance is at
    /// most `radius`. The callback receives the pair's actual distance so
    /// callers don't recompute it.
    pub fn for_each_pair<F>(&self, radius: f32, mut callback: F)
    where
        F: FnMut(usize, usize, f32),
    {
        let radius = radius.max(0.0);
        let radius_sq = radius * radius;
        let cell_reach = (radius / self.cell_size).ceil() as isize;

        for i in 0..self.positions.len() {
            let pos = self.positions[i];
            let cx = self.cell_x(pos.x);
            let cy = self.cell_y(pos.y);

            for dy in -cell_reach..=cell_reach {
                let y = cy + dy;
                if y < 0 || y >= self.rows as isize {
                    continue;
                }
                for dx in -cell_reach..=cell_reach {
                    let x = cx + dx;
                    if x < 0 || x >= self.cols as isize {
                        continue;
                    }
                    let mut j = self.head[y as usize * self.cols + x as usize];
                    while j != INVALID {
                        if j > i {
                            let d_sq = pos.distance_squared(self.positions[j]);
                            if d_sq <= radius_sq {
                                callback(i, j, d_sq.sqrt());
                            }
                        }
                        j = self.next[j];
                    }
                }
            }
        }
    }

    fn cell_index(&self, pos: Vec2) -> usize {
        self.cell_y(pos.y) as usize * self.cols + self.cell_x(pos.x) as usize
    }

    fn cell_x(&self, x: f32) -> isize {
        ((x / self.cell_size).floor() as isize).clamp(0, self.cols as isize - 1)
    }

    fn cell_y(&self, y: f32) -> isize {
        ((y / self.cell_size).floor() as isize).clamp(0, self.rows as isize - 1)
    }
}
