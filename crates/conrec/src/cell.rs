//! Per-cell classification: which edges of a [`Cell`] a level crosses, where, and how the
//! crossings pair up into [`Segment`]s.

use glam::DVec2;

use crate::segment::Segment;

/// The quad spanned by the grid points `(row, col)`, `(row, col + 1)`, `(row + 1, col)` and
/// `(row + 1, col + 1)`.
///
/// "Lower" and "upper" refer to the row index, "left" and "right" to the column index. They say
/// nothing about the geometric orientation, since axes may be descending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Row of the lower corners
    pub row: usize,
    /// Column of the left corners
    pub col: usize,
    /// Corner samples: lower-left, lower-right, upper-left, upper-right.
    pub values: [f64; 4],
    /// The x coordinates of the left and right columns.
    pub x: [f64; 2],
    /// The y coordinates of the lower and upper rows.
    pub y: [f64; 2],
}

bitflags::bitflags! {
    /// The corners of a [`Cell`] whose sample is at or above a level.
    ///
    /// A sample exactly equal to the level counts as above.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CornerMask: u8 {
        /// Corner `(row, col)`
        const LOWER_LEFT = 1;
        /// Corner `(row, col + 1)`
        const LOWER_RIGHT = 2;
        /// Corner `(row + 1, col)`
        const UPPER_LEFT = 4;
        /// Corner `(row + 1, col + 1)`
        const UPPER_RIGHT = 8;
    }
}

/// An edge of a [`Cell`]. The declaration order is the edge visitation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Edge {
    /// Between lower-left and lower-right, along x at `y[0]`.
    South,
    /// Between lower-right and upper-right, along y at `x[1]`.
    East,
    /// Between upper-left and upper-right, along x at `y[1]`.
    North,
    /// Between lower-left and upper-left, along y at `x[0]`.
    West,
}

impl Edge {
    /// All edges in visitation order.
    pub const ALL: [Edge; 4] = [Edge::South, Edge::East, Edge::North, Edge::West];

    /// Indices into [`Cell::values`] of the edge endpoints, lower grid index first.
    #[inline]
    pub fn corners(self) -> [usize; 2] {
        match self {
            Edge::South => [0, 1],
            Edge::East => [1, 3],
            Edge::North => [2, 3],
            Edge::West => [0, 2],
        }
    }
}

impl Cell {
    /// Whether all four corner samples are finite. Cells touching NaN or infinite samples
    /// produce no segments.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// The corners at or above `level`.
    pub fn mask(&self, level: f64) -> CornerMask {
        let mut mask = CornerMask::empty();
        for (i, value) in self.values.iter().enumerate() {
            if *value >= level {
                mask |= CornerMask::from_bits_retain(1 << i);
            }
        }
        mask
    }

    /// The position of a corner, indexed like [`Cell::values`].
    #[inline]
    pub fn corner_point(&self, corner: usize) -> DVec2 {
        DVec2::new(self.x[corner & 1], self.y[corner >> 1])
    }

    /// Whether `segment` connects the two corners of `edge`, in either direction.
    ///
    /// This only happens when both corner samples of the edge equal the level.
    pub fn runs_along(&self, segment: &Segment, edge: Edge) -> bool {
        let [a, b] = edge.corners().map(|corner| self.corner_point(corner));
        (segment.start == a && segment.end == b) || (segment.start == b && segment.end == a)
    }

    /// The mean of the four corners, used as the estimate of the value at the cell center.
    #[inline]
    pub fn center_value(&self) -> f64 {
        (self.values[0] + self.values[1] + self.values[2] + self.values[3]) / 4.0
    }

    /// Where `level` crosses `edge`, or `None` if both endpoints lie on the same side.
    ///
    /// The result only depends on the edge's two samples and two coordinates, which the
    /// neighbouring cell sharing this edge sees identically, so both cells produce bit-identical
    /// points.
    pub fn crossing(&self, edge: Edge, level: f64) -> Option<DVec2> {
        let [a, b] = edge.corners();
        let (va, vb) = (self.values[a], self.values[b]);
        if (va >= level) == (vb >= level) {
            return None;
        }
        let point = match edge {
            Edge::South => DVec2::new(interpolate(va, vb, self.x[0], self.x[1], level), self.y[0]),
            Edge::East => DVec2::new(self.x[1], interpolate(va, vb, self.y[0], self.y[1], level)),
            Edge::North => DVec2::new(interpolate(va, vb, self.x[0], self.x[1], level), self.y[1]),
            Edge::West => DVec2::new(self.x[0], interpolate(va, vb, self.y[0], self.y[1], level)),
        };
        Some(point)
    }

    /// The segments `level` cuts through this cell: zero, one, or two for a saddle.
    ///
    /// Saddles pair their four crossings according to the center estimate: if the center is at
    /// or above the level, the two corners below the level are cut off; otherwise the two
    /// corners above it are. Segments whose endpoints coincide (a level touching a single
    /// corner) are dropped.
    pub fn segments(&self, level: f64) -> impl Iterator<Item = Segment> {
        self.edge_pairs(level)
            .into_iter()
            .flatten()
            .filter_map(move |(from, to)| {
                let start = self.crossing(from, level)?;
                let end = self.crossing(to, level)?;
                Some(Segment::new(start, end))
            })
            .filter(|segment| !segment.is_degenerate())
    }

    fn edge_pairs(&self, level: f64) -> [Option<(Edge, Edge)>; 2] {
        if !self.is_finite() {
            return [None, None];
        }
        let mask = self.mask(level);
        let saddle_lower_left = CornerMask::LOWER_LEFT | CornerMask::UPPER_RIGHT;
        let saddle_lower_right = CornerMask::LOWER_RIGHT | CornerMask::UPPER_LEFT;
        if mask == saddle_lower_left || mask == saddle_lower_right {
            let center_above = self.center_value() >= level;
            // Cut off lower-right and upper-left, or lower-left and upper-right.
            let isolate_lower_right = (mask == saddle_lower_left) == center_above;
            return if isolate_lower_right {
                [
                    Some((Edge::South, Edge::East)),
                    Some((Edge::North, Edge::West)),
                ]
            } else {
                [
                    Some((Edge::South, Edge::West)),
                    Some((Edge::East, Edge::North)),
                ]
            };
        }

        let mut crossed = Edge::ALL.into_iter().filter(|edge| {
            let [a, b] = edge.corners();
            mask.contains(CornerMask::from_bits_retain(1 << a))
                != mask.contains(CornerMask::from_bits_retain(1 << b))
        });
        match (crossed.next(), crossed.next()) {
            (Some(from), Some(to)) => [Some((from, to)), None],
            _ => [None, None],
        }
    }
}

/// Linear interpolation of the crossing coordinate along one axis, evaluated from the
/// lower-index endpoint `a`. Endpoints exactly on the level return their coordinate verbatim.
#[inline]
fn interpolate(va: f64, vb: f64, ca: f64, cb: f64, level: f64) -> f64 {
    if va == level {
        return ca;
    }
    if vb == level {
        return cb;
    }
    let t = ((level - va) / (vb - va)).clamp(0.0, 1.0);
    ca + t * (cb - ca)
}
