//! C ABI over [`conrec`], built as the `contour` shared library.
//!
//! Both entry points return `0` on success and `-1` on any failure. On failure every output
//! pointer is set to null and every output count to zero, so there is nothing to release. On
//! success each returned buffer belongs to the caller and must be released with
//! [`contour_free`]. The matching declarations live in `include/contour_capi.h`.

use std::{ffi::c_void, os::raw::c_int, ptr, slice};

use conrec::{ContourConfig, ContourError, ContourOutput};
use thiserror::Error;

mod buffer;

use buffer::{ExportBuffer, release};

const SUCCESS: c_int = 0;
const FAILURE: c_int = -1;

#[derive(Error, Debug)]
enum CallError {
    #[error("`{0}` is null")]
    NullPointer(&'static str),
    #[error("a {rows}x{cols} grid does not fit in memory")]
    GridOverflow { rows: usize, cols: usize },
    #[error(transparent)]
    Contour(#[from] ContourError),
    #[error("failed to allocate the output buffers")]
    Export,
}

/// Borrows `len` values from a caller-provided array. A null pointer is only accepted when `len`
/// is zero.
///
/// # Safety
///
/// A non-null `data` must point to `len` readable values that outlive `'a`.
unsafe fn input<'a>(
    data: *const f64,
    len: usize,
    name: &'static str,
) -> Result<&'a [f64], CallError> {
    if data.is_null() {
        return if len == 0 {
            Ok(&[])
        } else {
            Err(CallError::NullPointer(name))
        };
    }
    // SAFETY: upheld by the caller.
    Ok(unsafe { slice::from_raw_parts(data, len) })
}

/// Raw arguments shared by both entry points.
struct Request {
    data: *const f64,
    rows: usize,
    cols: usize,
    y_axis: *const f64,
    y_len: usize,
    x_axis: *const f64,
    x_len: usize,
    levels: *const f64,
    level_len: usize,
}

impl Request {
    /// Validates the inputs and runs either the plain or the sorted extraction.
    ///
    /// # Safety
    ///
    /// See [`contour_compute`].
    unsafe fn run(&self, sorted: bool) -> Result<ContourOutput, CallError> {
        let count = self
            .rows
            .checked_mul(self.cols)
            .ok_or(CallError::GridOverflow {
                rows: self.rows,
                cols: self.cols,
            })?;
        // SAFETY: the caller guarantees each array holds the advertised number of values.
        let (values, y_axis, x_axis, levels) = unsafe {
            (
                input(self.data, count, "pData")?,
                input(self.y_axis, self.y_len, "pY")?,
                input(self.x_axis, self.x_len, "pX")?,
                input(self.levels, self.level_len, "pLevels")?,
            )
        };
        let config = ContourConfig::default();
        let output = if sorted {
            conrec::contours_sorted(
                values, self.rows, self.cols, y_axis, x_axis, levels, &config,
            )?
        } else {
            conrec::contours(
                values, self.rows, self.cols, y_axis, x_axis, levels, &config,
            )?
        };
        Ok(output)
    }
}

/// Buffers that are either all handed to the caller or all released.
struct Exported {
    y: ExportBuffer<f64>,
    x: ExportBuffer<f64>,
    lengths: ExportBuffer<usize>,
    level_counts: Option<ExportBuffer<usize>>,
}

impl Exported {
    fn new(output: &ContourOutput, with_level_counts: bool) -> Result<Self, CallError> {
        let y = ExportBuffer::copy_from(&output.y).ok_or(CallError::Export)?;
        let x = ExportBuffer::copy_from(&output.x).ok_or(CallError::Export)?;
        let lengths = ExportBuffer::copy_from(&output.lengths).ok_or(CallError::Export)?;
        let level_counts = if with_level_counts {
            Some(ExportBuffer::copy_from(&output.level_counts).ok_or(CallError::Export)?)
        } else {
            None
        };
        Ok(Self {
            y,
            x,
            lengths,
            level_counts,
        })
    }
}

/// Output locations shared by both entry points.
struct Outputs {
    y: *mut *mut f64,
    y_len: *mut usize,
    x: *mut *mut f64,
    x_len: *mut usize,
    lengths: *mut *mut usize,
    unit_count: *mut usize,
    level_counts: Option<(*mut *mut usize, *mut usize)>,
}

impl Outputs {
    fn check(&self) -> Result<(), CallError> {
        let pointers = [
            (self.y.is_null(), "ppOutY"),
            (self.y_len.is_null(), "nOutY"),
            (self.x.is_null(), "ppOutX"),
            (self.x_len.is_null(), "nOutX"),
            (self.lengths.is_null(), "nOutLengths"),
            (self.unit_count.is_null(), "nOutSegments"),
        ];
        if let Some((_, name)) = pointers.into_iter().find(|(null, _)| *null) {
            return Err(CallError::NullPointer(name));
        }
        if let Some((counts, len)) = self.level_counts {
            if counts.is_null() {
                return Err(CallError::NullPointer("nLevelSegments"));
            }
            if len.is_null() {
                return Err(CallError::NullPointer("nLevels2"));
            }
        }
        Ok(())
    }

    /// Hands the buffers to the caller.
    ///
    /// # Safety
    ///
    /// All locations must have passed [`Outputs::check`] and be writable.
    unsafe fn write(&self, exported: Exported) {
        // SAFETY: upheld by the caller.
        unsafe {
            *self.y_len = exported.y.len();
            *self.y = exported.y.into_raw();
            *self.x_len = exported.x.len();
            *self.x = exported.x.into_raw();
            *self.unit_count = exported.lengths.len();
            *self.lengths = exported.lengths.into_raw();
            if let (Some((counts, len)), Some(level_counts)) =
                (self.level_counts, exported.level_counts)
            {
                *len = level_counts.len();
                *counts = level_counts.into_raw();
            }
        }
    }

    /// Nulls every non-null output location.
    ///
    /// # Safety
    ///
    /// Every non-null location must be writable.
    unsafe fn clear(&self) {
        // SAFETY: upheld by the caller; null locations are skipped.
        unsafe {
            clear_slot(self.y, ptr::null_mut());
            clear_slot(self.y_len, 0);
            clear_slot(self.x, ptr::null_mut());
            clear_slot(self.x_len, 0);
            clear_slot(self.lengths, ptr::null_mut());
            clear_slot(self.unit_count, 0);
            if let Some((counts, len)) = self.level_counts {
                clear_slot(counts, ptr::null_mut());
                clear_slot(len, 0);
            }
        }
    }
}

unsafe fn clear_slot<T>(slot: *mut T, value: T) {
    if !slot.is_null() {
        // SAFETY: non-null locations are writable per the caller's contract.
        unsafe { slot.write(value) };
    }
}

/// Runs one call end to end and maps the outcome to a status code.
///
/// # Safety
///
/// See [`contour_compute`].
unsafe fn compute(request: Request, outputs: Outputs, entry_point: &'static str) -> c_int {
    let sorted = outputs.level_counts.is_some();
    let result = outputs.check().and_then(|()| {
        // SAFETY: upheld by the caller.
        let output = unsafe { request.run(sorted) }?;
        Exported::new(&output, sorted)
    });
    match result {
        Ok(exported) => {
            // SAFETY: the output locations were checked above.
            unsafe { outputs.write(exported) };
            SUCCESS
        }
        Err(err) => {
            tracing::warn!("{entry_point} failed: {err}");
            // SAFETY: upheld by the caller.
            unsafe { outputs.clear() };
            FAILURE
        }
    }
}

/// Releases a buffer returned by [`contour_compute`] or [`contour_compute_sorted`].
///
/// Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or a buffer returned by this library that has not been released yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn contour_free(ptr: *mut c_void) {
    // SAFETY: upheld by the caller.
    unsafe { release(ptr.cast()) }
}

/// Computes the raw contour segments of a row-major grid.
///
/// On success `*nOutSegments` is the number of segments, `*nOutLengths` holds `2` for each of
/// them, and `*ppOutX`/`*ppOutY` hold their endpoints back to back.
///
/// # Safety
///
/// - `p_data` must point to `n_y_data * n_x_data` readable values.
/// - `p_y`, `p_x` and `p_levels` must point to `n_y`, `n_x` and `n_levels` readable values.
/// - Every output pointer must be writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn contour_compute(
    p_data: *const f64,
    n_y_data: usize,
    n_x_data: usize,
    p_y: *const f64,
    n_y: usize,
    p_x: *const f64,
    n_x: usize,
    p_levels: *const f64,
    n_levels: usize,
    pp_out_y: *mut *mut f64,
    n_out_y: *mut usize,
    pp_out_x: *mut *mut f64,
    n_out_x: *mut usize,
    n_out_lengths: *mut *mut usize,
    n_out_segments: *mut usize,
) -> c_int {
    let request = Request {
        data: p_data,
        rows: n_y_data,
        cols: n_x_data,
        y_axis: p_y,
        y_len: n_y,
        x_axis: p_x,
        x_len: n_x,
        levels: p_levels,
        level_len: n_levels,
    };
    let outputs = Outputs {
        y: pp_out_y,
        y_len: n_out_y,
        x: pp_out_x,
        x_len: n_out_x,
        lengths: n_out_lengths,
        unit_count: n_out_segments,
        level_counts: None,
    };
    // SAFETY: upheld by the caller.
    unsafe { compute(request, outputs, "contour_compute") }
}

/// Computes the contours of a row-major grid joined into polylines and polygons.
///
/// On success `*nOutSegments` is the number of chains, `*nOutLengths` holds the point count of
/// each chain, and `*nLevelSegments` holds the number of chains of each level (`*nLevels2`
/// entries). A closed polygon repeats its first point as its last.
///
/// # Safety
///
/// Same as [`contour_compute`]; `nLevelSegments` and `nLevels2` must be writable too.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn contour_compute_sorted(
    p_data: *const f64,
    n_y_data: usize,
    n_x_data: usize,
    p_y: *const f64,
    n_y: usize,
    p_x: *const f64,
    n_x: usize,
    p_levels: *const f64,
    n_levels: usize,
    pp_out_y: *mut *mut f64,
    n_out_y: *mut usize,
    pp_out_x: *mut *mut f64,
    n_out_x: *mut usize,
    n_out_lengths: *mut *mut usize,
    n_out_segments: *mut usize,
    n_level_segments: *mut *mut usize,
    n_levels2: *mut usize,
) -> c_int {
    let request = Request {
        data: p_data,
        rows: n_y_data,
        cols: n_x_data,
        y_axis: p_y,
        y_len: n_y,
        x_axis: p_x,
        x_len: n_x,
        levels: p_levels,
        level_len: n_levels,
    };
    let outputs = Outputs {
        y: pp_out_y,
        y_len: n_out_y,
        x: pp_out_x,
        x_len: n_out_x,
        lengths: n_out_lengths,
        unit_count: n_out_segments,
        level_counts: Some((n_level_segments, n_levels2)),
    };
    // SAFETY: upheld by the caller.
    unsafe { compute(request, outputs, "contour_compute_sorted") }
}
