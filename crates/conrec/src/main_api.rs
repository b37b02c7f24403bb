use crate::{
    assemble::{Chain, assemble_chains},
    config::{ChainOrder, ContourConfig},
    error::ContourError,
    extract::{extract_level, extract_segments, map_levels},
    grid::Grid,
    levels::LevelSet,
    output::{ContourOutput, OutputBuilder},
};

impl Grid<'_> {
    /// Extracts the raw contour segments of every level.
    ///
    /// Each unit of the output is a single two-point segment, and `level_counts` holds the number
    /// of segments per level. Segments appear in cell visitation order.
    pub fn contour_segments(
        &self,
        levels: &LevelSet<'_>,
        config: &ContourConfig,
    ) -> Result<ContourOutput, ContourError> {
        tracing::debug!(
            rows = self.rows(),
            cols = self.cols(),
            levels = levels.len(),
            "extracting contour segments"
        );
        let extracted = extract_segments(self, levels, config);
        let skipped = extracted.first().map_or(0, |level| level.skipped_cells);
        if skipped > 0 {
            tracing::debug!(skipped, "skipped cells with non-finite samples");
        }

        let units: usize = extracted.iter().map(|level| level.segments.len()).sum();
        let points = units
            .checked_mul(2)
            .ok_or(ContourError::AllocationFailure { elements: units })?;
        let mut builder = OutputBuilder::with_capacity(points, units, levels.len())?;
        for level in &extracted {
            for segment in &level.segments {
                builder.push_unit(segment.endpoints());
            }
            builder.finish_level();
        }
        Ok(builder.build())
    }

    /// Extracts the contours of every level and joins them into maximal chains.
    ///
    /// Each unit of the output is a chain, and `level_counts` holds the number of chains per
    /// level.
    pub fn contour_chains(
        &self,
        levels: &LevelSet<'_>,
        config: &ContourConfig,
    ) -> Result<ContourOutput, ContourError> {
        tracing::debug!(
            rows = self.rows(),
            cols = self.cols(),
            levels = levels.len(),
            "extracting contour chains"
        );
        let chain_order = config.chain_order;
        let assembled = map_levels(levels, config.parallel, |level| {
            let extracted = extract_level(self, level);
            let chains = assemble_chains(&extracted.segments, chain_order);
            tracing::trace!(level, chains = chains.len(), "assembled level");
            (extracted.skipped_cells, chains)
        });
        let skipped = assembled.first().map_or(0, |(skipped, _)| *skipped);
        if skipped > 0 {
            tracing::debug!(skipped, "skipped cells with non-finite samples");
        }

        let units: usize = assembled.iter().map(|(_, chains)| chains.len()).sum();
        let points: usize = assembled
            .iter()
            .flat_map(|(_, chains)| chains.iter().map(Chain::len))
            .sum();
        let mut builder = OutputBuilder::with_capacity(points, units, levels.len())?;
        for (_, chains) in &assembled {
            for chain in chains {
                builder.push_unit(chain.points.iter().copied());
            }
            builder.finish_level();
        }
        Ok(builder.build())
    }

    /// The chains of a single level.
    pub fn level_chains(&self, level: f64, order: ChainOrder) -> Vec<Chain> {
        assemble_chains(&extract_level(self, level).segments, order)
    }
}

/// Plain extraction: validates the inputs and returns every contour segment, two points each.
///
/// # Arguments
///
/// - `values` - Samples in row-major order. [Length: `rows * cols`]
/// - `rows` - Number of rows. [Limit: >= 2]
/// - `cols` - Number of columns. [Limit: >= 2]
/// - `y_axis` - Row coordinates, strictly monotonic. [Length: `rows`]
/// - `x_axis` - Column coordinates, strictly monotonic. [Length: `cols`]
/// - `levels` - Iso-values, strictly increasing. [Limit: non-empty]
/// - `config` - Scheduling and ordering settings.
pub fn contours(
    values: &[f64],
    rows: usize,
    cols: usize,
    y_axis: &[f64],
    x_axis: &[f64],
    levels: &[f64],
    config: &ContourConfig,
) -> Result<ContourOutput, ContourError> {
    let grid = Grid::new(values, rows, cols, y_axis, x_axis)?;
    let levels = LevelSet::new(levels)?;
    grid.contour_segments(&levels, config)
}

/// Sorted extraction: validates the inputs and returns the contours joined into chains, with the
/// number of chains per level in [`ContourOutput::level_counts`].
///
/// Takes the same arguments as [`contours`].
pub fn contours_sorted(
    values: &[f64],
    rows: usize,
    cols: usize,
    y_axis: &[f64],
    x_axis: &[f64],
    levels: &[f64],
    config: &ContourConfig,
) -> Result<ContourOutput, ContourError> {
    let grid = Grid::new(values, rows, cols, y_axis, x_axis)?;
    let levels = LevelSet::new(levels)?;
    grid.contour_chains(&levels, config)
}
