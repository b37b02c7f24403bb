use thiserror::Error;

/// Errors detected while validating the inputs of a contouring call or while allocating its output.
///
/// All of these are reported before any extraction work has been done, so a failed call never
/// yields partial output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContourError {
    /// The grid has fewer than two rows or columns, so it contains no cells.
    #[error("grid must be at least 2x2, got {rows}x{cols}")]
    GridTooSmall {
        /// Number of rows (y samples)
        rows: usize,
        /// Number of columns (x samples)
        cols: usize,
    },
    /// The number of samples does not equal `rows * cols`.
    #[error("expected {expected} grid values (rows * cols), got {actual}")]
    ValueCountMismatch {
        /// `rows * cols`
        expected: usize,
        /// Length of the value buffer
        actual: usize,
    },
    /// A coordinate axis does not have one entry per grid row or column.
    #[error("{axis} axis has {actual} coordinates but the grid has {expected}")]
    AxisLengthMismatch {
        /// The offending axis
        axis: Axis,
        /// Grid extent along that axis
        expected: usize,
        /// Length of the axis buffer
        actual: usize,
    },
    /// A coordinate axis is not finite and strictly monotonic.
    #[error("{axis} axis is not strictly monotonic at index {index}")]
    AxisNotMonotonic {
        /// The offending axis
        axis: Axis,
        /// First index where monotonicity breaks
        index: usize,
    },
    /// No levels were requested.
    #[error("at least one contour level is required")]
    EmptyLevels,
    /// A level is NaN or infinite.
    #[error("contour level at index {index} is not finite")]
    NonFiniteLevel {
        /// Index of the offending level
        index: usize,
    },
    /// The levels are not sorted in strictly increasing order.
    #[error("contour levels must be strictly increasing, violated at index {index}")]
    LevelsNotIncreasing {
        /// Index of the first level that is not greater than its predecessor
        index: usize,
    },
    /// The output buffers could not be allocated.
    #[error("failed to allocate output for {elements} elements")]
    AllocationFailure {
        /// Number of elements that were requested
        elements: usize,
    },
}

impl ContourError {
    /// The coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AllocationFailure { .. } => ErrorKind::AllocationFailure,
            _ => ErrorKind::InvalidInput,
        }
    }
}

/// Coarse error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The grid, its axes or the levels are malformed.
    InvalidInput,
    /// Output memory could not be reserved.
    AllocationFailure,
}

/// A grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The column axis
    X,
    /// The row axis
    Y,
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}
