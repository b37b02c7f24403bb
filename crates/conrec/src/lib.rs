#![doc = include_str!("../../../readme.md")]

mod assemble;
mod cell;
mod config;
mod error;
mod extract;
mod grid;
mod levels;
mod main_api;
mod output;
mod segment;

pub use assemble::{Chain, assemble_chains};
pub use cell::{Cell, CornerMask, Edge};
pub use config::{ChainOrder, ContourConfig};
pub use error::{Axis, ContourError, ErrorKind};
pub use extract::{LevelSegments, extract_level, extract_segments};
pub use grid::Grid;
pub use levels::LevelSet;
pub use main_api::{contours, contours_sorted};
pub use output::ContourOutput;
pub use segment::Segment;
