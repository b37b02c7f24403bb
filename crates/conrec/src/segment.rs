use glam::DVec2;

/// A two-point piece of an iso-line, produced by a single grid cell for a single level.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// The crossing on the first crossed edge, in [`Edge`](crate::Edge) visitation order.
    pub start: DVec2,
    /// The crossing on the second crossed edge.
    pub end: DVec2,
}

impl Segment {
    /// Creates a new segment.
    #[inline]
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// Whether both endpoints coincide exactly.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// The endpoints as an array, `[start, end]`.
    #[inline]
    pub fn endpoints(&self) -> [DVec2; 2] {
        [self.start, self.end]
    }
}

/// Exact hash key of a point. `-0.0` and `0.0` map to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PointKey(u64, u64);

impl From<DVec2> for PointKey {
    #[inline]
    fn from(point: DVec2) -> Self {
        // Adding positive zero turns negative zero into positive zero and leaves everything else alone.
        PointKey((point.x + 0.0).to_bits(), (point.y + 0.0).to_bits())
    }
}
