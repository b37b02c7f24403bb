//! Segment extraction: runs the cell classifier over every cell of a [`Grid`] for every level.

use rayon::prelude::*;

use crate::{
    cell::{Cell, Edge},
    config::ContourConfig,
    grid::Grid,
    levels::LevelSet,
    segment::Segment,
};

/// The unordered segments of a single level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelSegments {
    /// The iso-value
    pub level: f64,
    /// Segments in cell visitation order (row-major).
    pub segments: Vec<Segment>,
    /// Cells that were skipped because a corner sample is NaN or infinite.
    pub skipped_cells: usize,
}

/// Extracts the segments of one level.
///
/// Cells are visited row by row, and within a row column by column. Each cell contributes its
/// segments in the order described by [`Cell::segments`].
///
/// A grid edge whose two samples both equal the level is a segment of both cells sharing it when
/// those cells lie below the level. It is only emitted by the cell visited first.
pub fn extract_level(grid: &Grid<'_>, level: f64) -> LevelSegments {
    let mut segments = Vec::new();
    let mut skipped_cells = 0;
    for cell in grid.cells() {
        if !cell.is_finite() {
            skipped_cells += 1;
            continue;
        }
        segments.extend(
            cell.segments(level)
                .filter(|segment| !emitted_by_previous_cell(grid, &cell, segment, level)),
        );
    }
    tracing::trace!(level, segments = segments.len(), "extracted level");
    LevelSegments {
        level,
        segments,
        skipped_cells,
    }
}

/// Whether `segment` lies on the edge `cell` shares with the cell below or to its left, and that
/// cell emits it too. The neighbour does exactly when it is finite and its two far corners are
/// below the level.
fn emitted_by_previous_cell(grid: &Grid<'_>, cell: &Cell, segment: &Segment, level: f64) -> bool {
    if cell.row > 0 && cell.runs_along(segment, Edge::South) {
        let below = grid.cell(cell.row - 1, cell.col);
        return below.is_finite() && below.values[0] < level && below.values[1] < level;
    }
    if cell.col > 0 && cell.runs_along(segment, Edge::West) {
        let left = grid.cell(cell.row, cell.col - 1);
        return left.is_finite() && left.values[0] < level && left.values[2] < level;
    }
    false
}

/// Extracts the segments of every level, in level order.
pub fn extract_segments(
    grid: &Grid<'_>,
    levels: &LevelSet<'_>,
    config: &ContourConfig,
) -> Vec<LevelSegments> {
    map_levels(levels, config.parallel, |level| extract_level(grid, level))
}

/// Applies `f` to every level, optionally on the rayon pool. The result is in level order
/// either way.
pub(crate) fn map_levels<T, F>(levels: &LevelSet<'_>, parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(f64) -> T + Sync + Send,
{
    if parallel && levels.len() > 1 {
        levels.as_slice().par_iter().map(|&level| f(level)).collect()
    } else {
        levels.iter().map(f).collect()
    }
}
