//! Integer grid geometry for the partitioned domain.
//!
//! Regions are axis-aligned integer rectangles with half-open bounds:
//! `IntRect2D { ul, br }` covers every point `p` with `ul.x <= p.x < br.x`
//! and `ul.y <= p.y < br.y`.  The same rule applies to continuous agent
//! locations (`Double2D`), so an agent standing exactly on a shared edge
//! belongs to the region whose lower bound that edge is.
//!
//! A rectangle with `ul.x == br.x` (or `ul.y == br.y`) is empty.  Empty
//! rectangles are legal: they appear when a split origin touches an edge.

use std::fmt;

// ── Points ────────────────────────────────────────────────────────────────────

/// An integer grid point.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Int2D {
    pub x: i32,
    pub y: i32,
}

impl Int2D {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Int2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Int2D {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Int2D::new(x, y)
    }
}

/// A continuous location, as carried by agents that move in real space.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Double2D {
    pub x: f64,
    pub y: f64,
}

impl Double2D {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Floor both components onto the integer grid.
    #[inline]
    pub fn floor(self) -> Int2D {
        Int2D::new(self.x.floor() as i32, self.y.floor() as i32)
    }
}

impl fmt::Display for Double2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<Int2D> for Double2D {
    #[inline]
    fn from(p: Int2D) -> Self {
        Double2D::new(p.x as f64, p.y as f64)
    }
}

impl From<(f64, f64)> for Double2D {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Double2D::new(x, y)
    }
}

impl From<(i32, i32)> for Double2D {
    #[inline]
    fn from(p: (i32, i32)) -> Self {
        Int2D::from(p).into()
    }
}

// ── IntRect2D ─────────────────────────────────────────────────────────────────

/// Half-open axis-aligned integer rectangle `[ul.x, br.x) × [ul.y, br.y)`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntRect2D {
    /// Inclusive lower corner.
    pub ul: Int2D,
    /// Exclusive upper corner.
    pub br: Int2D,
}

impl IntRect2D {
    #[inline]
    pub const fn new(ul: Int2D, br: Int2D) -> Self {
        Self { ul, br }
    }

    /// `[0, width) × [0, height)`.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(Int2D::new(0, 0), Int2D::new(width, height))
    }

    /// Build a rectangle from per-dimension corner arrays.
    pub(crate) fn from_corners(ul: [i32; 2], br: [i32; 2]) -> Self {
        Self::new(Int2D::new(ul[0], ul[1]), Int2D::new(br[0], br[1]))
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.br.x - self.ul.x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.br.y - self.ul.y
    }

    /// Number of grid cells covered.  Zero for empty rectangles.
    #[inline]
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width() as i64 * self.height() as i64
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.br.x <= self.ul.x || self.br.y <= self.ul.y
    }

    /// Half-open containment test for an integer or continuous point.
    #[inline]
    pub fn contains(&self, p: impl Into<Double2D>) -> bool {
        let p = p.into();
        self.ul.x as f64 <= p.x
            && p.x < self.br.x as f64
            && self.ul.y as f64 <= p.y
            && p.y < self.br.y as f64
    }

    /// `true` if every cell of `other` is also a cell of `self`.
    /// An empty `other` is contained in anything.
    pub fn contains_rect(&self, other: &IntRect2D) -> bool {
        other.is_empty()
            || (self.ul.x <= other.ul.x
                && other.br.x <= self.br.x
                && self.ul.y <= other.ul.y
                && other.br.y <= self.br.y)
    }

    /// `true` if the interiors overlap (at least one shared cell).
    pub fn intersects(&self, other: &IntRect2D) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.ul.x < other.br.x
            && other.ul.x < self.br.x
            && self.ul.y < other.br.y
            && other.ul.y < self.br.y
    }

    /// Geometric center in continuous coordinates.
    #[inline]
    pub fn center(&self) -> Double2D {
        Double2D::new(
            (self.ul.x as f64 + self.br.x as f64) * 0.5,
            (self.ul.y as f64 + self.br.y as f64) * 0.5,
        )
    }

    /// Grow (or shrink, for negative `n`) every side by `n` cells.
    pub fn expand(&self, n: i32) -> IntRect2D {
        IntRect2D::new(
            Int2D::new(self.ul.x - n, self.ul.y - n),
            Int2D::new(self.br.x + n, self.br.y + n),
        )
    }

    #[inline]
    pub(crate) fn corners(&self) -> ([i32; 2], [i32; 2]) {
        ([self.ul.x, self.ul.y], [self.br.x, self.br.y])
    }
}

impl fmt::Display for IntRect2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{})x[{},{})",
            self.ul.x, self.br.x, self.ul.y, self.br.y
        )
    }
}

// ── Split geometry ────────────────────────────────────────────────────────────

/// Rectangle of child `child` when `shape` is split into `num_children`
/// pieces around `origin`.
///
/// | `num_children` | Tiling                                                  |
/// |----------------|---------------------------------------------------------|
/// | 2              | along x: `[ul.x, o.x)` then `[o.x, br.x)`, full height  |
/// | 3              | child 0 as for 2; the right half split along y at `o.y` |
/// | 4              | quadrants: bit `1 - d` of `child` picks the upper half of dimension `d` |
///
/// Returns `None` for a child count outside `2..=4` or an index past the end.
/// The caller guarantees `origin` lies inside `shape`.
pub fn split_rect(
    shape:        &IntRect2D,
    origin:       Int2D,
    child:        usize,
    num_children: usize,
) -> Option<IntRect2D> {
    if !(2..=4).contains(&num_children) || child >= num_children {
        return None;
    }

    let (mut ul, sbr) = shape.corners();
    let mut br = [origin.x, origin.y];

    match (num_children, child) {
        (2 | 3, 0) => {
            br[1] = sbr[1];
        }
        (2, _) => {
            ul[0] = br[0];
            br = sbr;
        }
        (3, 1) => {
            ul[0] = br[0];
            br[0] = sbr[0];
        }
        (3, _) => {
            ul = [origin.x, origin.y];
            br = sbr;
        }
        _ => {
            for dim in 0..2 {
                if (child >> (1 - dim)) & 1 == 1 {
                    ul[dim] = br[dim];
                    br[dim] = sbr[dim];
                }
            }
        }
    }

    Some(IntRect2D::from_corners(ul, br))
}

/// Floor-rounded geometric center of `shape` as a grid point.
pub fn floor_center(shape: &IntRect2D) -> Int2D {
    shape.center().floor()
}
