//! The grid module contains the read-only [`Grid`] view contours are extracted from.
//!
//! A grid is a row-major matrix of samples together with one coordinate per row (the y axis) and
//! one coordinate per column (the x axis). Neighbouring samples form [`Cell`]s.

use glam::DVec2;

use crate::{
    cell::Cell,
    error::{Axis, ContourError},
};

/// A borrowed, validated view over a rectilinear grid of samples.
///
/// Row index `r` maps to `y_axis[r]`, column index `c` maps to `x_axis[c]`.
/// Build with [`Grid::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid<'a> {
    values: &'a [f64],
    rows: usize,
    cols: usize,
    y_axis: &'a [f64],
    x_axis: &'a [f64],
}

impl<'a> Grid<'a> {
    /// Validates the inputs and creates a grid view.
    ///
    /// # Arguments
    ///
    /// - `values` - Samples in row-major order. [Length: `rows * cols`]
    /// - `rows` - Number of rows, i.e. samples along y. [Limit: >= 2]
    /// - `cols` - Number of columns, i.e. samples along x. [Limit: >= 2]
    /// - `y_axis` - Row coordinates, strictly ascending or descending. [Length: `rows`]
    /// - `x_axis` - Column coordinates, strictly ascending or descending. [Length: `cols`]
    pub fn new(
        values: &'a [f64],
        rows: usize,
        cols: usize,
        y_axis: &'a [f64],
        x_axis: &'a [f64],
    ) -> Result<Self, ContourError> {
        if y_axis.len() != rows {
            return Err(ContourError::AxisLengthMismatch {
                axis: Axis::Y,
                expected: rows,
                actual: y_axis.len(),
            });
        }
        if x_axis.len() != cols {
            return Err(ContourError::AxisLengthMismatch {
                axis: Axis::X,
                expected: cols,
                actual: x_axis.len(),
            });
        }
        if rows < 2 || cols < 2 {
            return Err(ContourError::GridTooSmall { rows, cols });
        }
        let expected = rows
            .checked_mul(cols)
            .ok_or(ContourError::ValueCountMismatch {
                expected: usize::MAX,
                actual: values.len(),
            })?;
        if values.len() != expected {
            return Err(ContourError::ValueCountMismatch {
                expected,
                actual: values.len(),
            });
        }
        check_monotonic(Axis::Y, y_axis)?;
        check_monotonic(Axis::X, x_axis)?;

        Ok(Self {
            values,
            rows,
            cols,
            y_axis,
            x_axis,
        })
    }

    /// Number of rows (samples along y).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (samples along x).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells, i.e. `(rows - 1) * (cols - 1)`.
    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.rows - 1) * (self.cols - 1)
    }

    /// The sample at the given row and column.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of bounds.
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> f64 {
        assert!(col < self.cols, "column {col} out of bounds");
        self.values[row * self.cols + col]
    }

    /// The x coordinate of the given column.
    #[inline]
    pub fn x(&self, col: usize) -> f64 {
        self.x_axis[col]
    }

    /// The y coordinate of the given row.
    #[inline]
    pub fn y(&self, row: usize) -> f64 {
        self.y_axis[row]
    }

    /// The raw samples in row-major order.
    #[inline]
    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    /// The cell whose lower-index corner is at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows - 1` or `col >= cols - 1`.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        assert!(
            row + 1 < self.rows && col + 1 < self.cols,
            "cell ({row}, {col}) out of bounds"
        );
        let lower = row * self.cols + col;
        let upper = lower + self.cols;
        Cell {
            row,
            col,
            values: [
                self.values[lower],
                self.values[lower + 1],
                self.values[upper],
                self.values[upper + 1],
            ],
            x: [self.x_axis[col], self.x_axis[col + 1]],
            y: [self.y_axis[row], self.y_axis[row + 1]],
        }
    }

    /// Iterates all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows - 1).flat_map(move |row| (0..self.cols - 1).map(move |col| self.cell(row, col)))
    }

    /// Whether the point lies exactly on the outer boundary of the grid.
    ///
    /// Crossing points on boundary edges carry the boundary coordinate verbatim, so exact
    /// comparison is sufficient.
    pub fn is_on_boundary(&self, point: DVec2) -> bool {
        let (x_first, x_last) = (self.x_axis[0], self.x_axis[self.cols - 1]);
        let (y_first, y_last) = (self.y_axis[0], self.y_axis[self.rows - 1]);
        point.x == x_first || point.x == x_last || point.y == y_first || point.y == y_last
    }
}

fn check_monotonic(axis: Axis, coords: &[f64]) -> Result<(), ContourError> {
    if let Some(index) = coords.iter().position(|c| !c.is_finite()) {
        return Err(ContourError::AxisNotMonotonic { axis, index });
    }
    let ascending = coords[1] > coords[0];
    for (i, pair) in coords.windows(2).enumerate() {
        let ordered = if ascending {
            pair[1] > pair[0]
        } else {
            pair[1] < pair[0]
        };
        if !ordered {
            return Err(ContourError::AxisNotMonotonic {
                axis,
                index: i + 1,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const AXIS: [f64; 3] = [0.0, 1.0, 2.0];

    #[test]
    fn accepts_descending_axes() {
        let values = [0.0; 6];
        let grid = Grid::new(&values, 2, 3, &[5.0, 1.0], &[3.0, 2.0, -1.0]).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.cell_count(), 2);
    }

    #[test]
    fn rejects_too_small_grid() {
        let values = [0.0; 3];
        let err = Grid::new(&values, 1, 3, &[0.0], &AXIS).unwrap_err();
        assert_eq!(err, ContourError::GridTooSmall { rows: 1, cols: 3 });
    }

    #[test]
    fn rejects_axis_length_mismatch() {
        let values = [0.0; 9];
        let err = Grid::new(&values, 3, 3, &AXIS, &[0.0, 1.0]).unwrap_err();
        assert_eq!(
            err,
            ContourError::AxisLengthMismatch {
                axis: Axis::X,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_value_count_mismatch() {
        let values = [0.0; 8];
        let err = Grid::new(&values, 3, 3, &AXIS, &AXIS).unwrap_err();
        assert_eq!(
            err,
            ContourError::ValueCountMismatch {
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn rejects_non_monotonic_axis() {
        let values = [0.0; 9];
        let err = Grid::new(&values, 3, 3, &[0.0, 2.0, 1.0], &AXIS).unwrap_err();
        assert_eq!(
            err,
            ContourError::AxisNotMonotonic {
                axis: Axis::Y,
                index: 2
            }
        );
        let err = Grid::new(&values, 3, 3, &AXIS, &[0.0, f64::NAN, 1.0]).unwrap_err();
        assert_eq!(
            err,
            ContourError::AxisNotMonotonic {
                axis: Axis::X,
                index: 1
            }
        );
    }

    #[test]
    fn cell_corners_follow_row_major_layout() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let grid = Grid::new(&values, 3, 3, &[10.0, 20.0, 30.0], &AXIS).unwrap();
        let cell = grid.cell(1, 0);
        assert_eq!(cell.values, [3.0, 4.0, 6.0, 7.0]);
        assert_eq!(cell.x, [0.0, 1.0]);
        assert_eq!(cell.y, [20.0, 30.0]);

        let visited: Vec<_> = grid.cells().map(|c| (c.row, c.col)).collect();
        assert_eq!(visited, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn boundary_detection() {
        let values = [0.0; 9];
        let grid = Grid::new(&values, 3, 3, &AXIS, &AXIS).unwrap();
        assert!(grid.is_on_boundary(DVec2::new(0.0, 1.5)));
        assert!(grid.is_on_boundary(DVec2::new(0.5, 2.0)));
        assert!(!grid.is_on_boundary(DVec2::new(0.5, 1.5)));
    }
}
