/// Axis-separated obstacle resolution and mask-accurate overlap tests.

use crate::entities::Obstacle;
use crate::geometry::{Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Push `hitbox` flush against every obstacle it overlaps, on one axis only.
///
/// The edge facing the direction of travel is clamped to the obstacle's
/// opposing edge. Callers move and resolve X before Y so that corners never
/// leave the hitbox embedded.
pub fn resolve_axis(hitbox: &mut Rect, direction: Vec2, axis: Axis, obstacles: &[Obstacle]) {
    for obstacle in obstacles {
        let wall = &obstacle.rect;
        if !wall.intersects(hitbox) {
            continue;
        }
        match axis {
            Axis::Horizontal => {
                if direction.x > 0.0 {
                    hitbox.set_right(wall.left());
                }
                if direction.x < 0.0 {
                    hitbox.set_left(wall.right());
                }
            }
            Axis::Vertical => {
                if direction.y > 0.0 {
                    hitbox.set_bottom(wall.top());
                }
                if direction.y < 0.0 {
                    hitbox.set_top(wall.bottom());
                }
            }
        }
    }
}

/// Opacity bitmask of a glyph sprite. Each opaque cell covers a
/// `cell_w` x `cell_h` block of world pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    cols: usize,
    rows: usize,
    cell_w: i32,
    cell_h: i32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn from_rows(rows: &[Vec<char>], cell_w: i32, cell_h: i32) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut bits = vec![false; cols * rows.len()];
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.iter().enumerate() {
                bits[r * cols + c] = *ch != ' ';
            }
        }
        Self {
            cols,
            rows: rows.len(),
            cell_w,
            cell_h,
            bits,
        }
    }

    /// Same footprint with every cell opaque.
    pub fn filled(cols: usize, rows: usize, cell_w: i32, cell_h: i32) -> Self {
        Self {
            cols,
            rows,
            cell_w,
            cell_h,
            bits: vec![true; cols * rows],
        }
    }

    pub fn width(&self) -> i32 {
        self.cols as i32 * self.cell_w
    }

    pub fn height(&self) -> i32 {
        self.rows as i32 * self.cell_h
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn is_set(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.bits[row * self.cols + col]
    }

    fn opaque_blocks(&self) -> impl Iterator<Item = (i32, i32, i32, i32)> + '_ {
        self.bits.iter().enumerate().filter(|(_, &b)| b).map(move |(i, _)| {
            let c = (i % self.cols) as i32;
            let r = (i / self.cols) as i32;
            (c * self.cell_w, r * self.cell_h, self.cell_w, self.cell_h)
        })
    }

    /// True if any opaque pixel of `self` overlaps one of `other`, with
    /// `other`'s top-left placed at `offset` relative to `self`'s top-left.
    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        let (dx, dy) = offset;
        if dx >= self.width() || dy >= self.height() || -dx >= other.width() || -dy >= other.height() {
            return false;
        }
        self.opaque_blocks().any(|(ax, ay, aw, ah)| {
            other.opaque_blocks().any(|(bx, by, bw, bh)| {
                let bx = bx + dx;
                let by = by + dy;
                ax < bx + bw && bx < ax + aw && ay < by + bh && by < ay + ah
            })
        })
    }
}

/// Mask test between two placed sprites.
pub fn masks_collide(a_rect: &Rect, a_mask: &Mask, b_rect: &Rect, b_mask: &Mask) -> bool {
    let offset = (
        (b_rect.x - a_rect.x).round() as i32,
        (b_rect.y - a_rect.y).round() as i32,
    );
    a_mask.overlaps(b_mask, offset)
}
