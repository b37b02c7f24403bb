//! Flattening of per-level segments or chains into parallel output buffers.

use glam::DVec2;

use crate::error::ContourError;

/// The flat result of a contouring call.
///
/// `x` and `y` hold the points of all units (segments in plain mode, chains in sorted mode)
/// back to back. `lengths` holds the point count of each unit, and `level_counts` holds the
/// number of units belonging to each requested level, in level order.
///
/// Invariants: `x.len() == y.len() == lengths.iter().sum()` and
/// `level_counts.iter().sum() == lengths.len()`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ContourOutput {
    /// X coordinates of all points
    pub x: Vec<f64>,
    /// Y coordinates of all points
    pub y: Vec<f64>,
    /// Points per unit
    pub lengths: Vec<usize>,
    /// Units per level
    pub level_counts: Vec<usize>,
}

impl ContourOutput {
    /// Total number of points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.x.len()
    }

    /// Total number of units (segments or chains).
    #[inline]
    pub fn unit_count(&self) -> usize {
        self.lengths.len()
    }

    /// Iterates all units as `(level_index, xs, ys)`.
    pub fn units(&self) -> impl Iterator<Item = (usize, &[f64], &[f64])> + '_ {
        let level_of_unit = self
            .level_counts
            .iter()
            .enumerate()
            .flat_map(|(level, &count)| std::iter::repeat_n(level, count));
        let mut offset = 0;
        level_of_unit
            .zip(self.lengths.iter())
            .map(move |(level, &len)| {
                let range = offset..offset + len;
                offset += len;
                (level, &self.x[range.clone()], &self.y[range])
            })
    }

    /// Iterates the units belonging to one level as point lists.
    pub fn level_units(&self, level_index: usize) -> impl Iterator<Item = Vec<DVec2>> + '_ {
        self.units()
            .filter(move |(level, _, _)| *level == level_index)
            .map(|(_, xs, ys)| {
                xs.iter()
                    .zip(ys)
                    .map(|(&x, &y)| DVec2::new(x, y))
                    .collect()
            })
    }
}

/// Collects units level by level into a [`ContourOutput`].
///
/// The buffers are reserved up front with fallible allocation so that running out of memory is
/// reported as [`ContourError::AllocationFailure`] instead of aborting.
#[derive(Debug)]
pub(crate) struct OutputBuilder {
    output: ContourOutput,
    current_level_units: usize,
}

impl OutputBuilder {
    pub(crate) fn with_capacity(
        points: usize,
        units: usize,
        levels: usize,
    ) -> Result<Self, ContourError> {
        let mut output = ContourOutput::default();
        reserve(&mut output.x, points)?;
        reserve(&mut output.y, points)?;
        reserve(&mut output.lengths, units)?;
        reserve(&mut output.level_counts, levels)?;
        Ok(Self {
            output,
            current_level_units: 0,
        })
    }

    /// Appends one unit to the level currently being built.
    pub(crate) fn push_unit(&mut self, points: impl IntoIterator<Item = DVec2>) {
        let before = self.output.x.len();
        for point in points {
            self.output.x.push(point.x);
            self.output.y.push(point.y);
        }
        self.output.lengths.push(self.output.x.len() - before);
        self.current_level_units += 1;
    }

    /// Closes the level currently being built and starts the next one.
    pub(crate) fn finish_level(&mut self) {
        self.output.level_counts.push(self.current_level_units);
        self.current_level_units = 0;
    }

    pub(crate) fn build(self) -> ContourOutput {
        debug_assert_eq!(self.current_level_units, 0, "unfinished level");
        self.output
    }
}

fn reserve<T>(buffer: &mut Vec<T>, elements: usize) -> Result<(), ContourError> {
    buffer
        .try_reserve_exact(elements)
        .map_err(|_| ContourError::AllocationFailure { elements })
}
