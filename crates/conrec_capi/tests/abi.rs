//! Exercises the exported functions the way a C caller would.

use std::ptr;

use approx::assert_abs_diff_eq;
use contour::{contour_compute, contour_compute_sorted, contour_free};

const PEAK: [f64; 9] = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
const AXIS: [f64; 3] = [0.0, 1.0, 2.0];

/// Output slots of one call, released on drop.
struct Outputs {
    y: *mut f64,
    y_len: usize,
    x: *mut f64,
    x_len: usize,
    lengths: *mut usize,
    units: usize,
    level_counts: *mut usize,
    levels: usize,
}

impl Outputs {
    fn new() -> Self {
        Self {
            y: ptr::null_mut(),
            y_len: usize::MAX,
            x: ptr::null_mut(),
            x_len: usize::MAX,
            lengths: ptr::null_mut(),
            units: usize::MAX,
            level_counts: ptr::null_mut(),
            levels: usize::MAX,
        }
    }

    fn x(&self) -> &[f64] {
        unsafe { std::slice::from_raw_parts(self.x, self.x_len) }
    }

    fn y(&self) -> &[f64] {
        unsafe { std::slice::from_raw_parts(self.y, self.y_len) }
    }

    fn lengths(&self) -> &[usize] {
        unsafe { std::slice::from_raw_parts(self.lengths, self.units) }
    }

    fn level_counts(&self) -> &[usize] {
        unsafe { std::slice::from_raw_parts(self.level_counts, self.levels) }
    }

    fn assert_cleared(&self, sorted: bool) {
        assert!(self.y.is_null() && self.x.is_null() && self.lengths.is_null());
        assert_eq!((self.y_len, self.x_len, self.units), (0, 0, 0));
        if sorted {
            assert!(self.level_counts.is_null());
            assert_eq!(self.levels, 0);
        }
    }
}

impl Drop for Outputs {
    fn drop(&mut self) {
        unsafe {
            contour_free(self.y.cast());
            contour_free(self.x.cast());
            contour_free(self.lengths.cast());
            contour_free(self.level_counts.cast());
        }
    }
}

fn plain(values: &[f64], rows: usize, cols: usize, levels: &[f64]) -> (i32, Outputs) {
    let mut out = Outputs::new();
    let status = unsafe {
        contour_compute(
            values.as_ptr(),
            rows,
            cols,
            AXIS.as_ptr(),
            AXIS.len(),
            AXIS.as_ptr(),
            AXIS.len(),
            levels.as_ptr(),
            levels.len(),
            &mut out.y,
            &mut out.y_len,
            &mut out.x,
            &mut out.x_len,
            &mut out.lengths,
            &mut out.units,
        )
    };
    (status, out)
}

fn sorted(values: &[f64], rows: usize, cols: usize, levels: &[f64]) -> (i32, Outputs) {
    let mut out = Outputs::new();
    let status = unsafe {
        contour_compute_sorted(
            values.as_ptr(),
            rows,
            cols,
            AXIS.as_ptr(),
            AXIS.len(),
            AXIS.as_ptr(),
            AXIS.len(),
            levels.as_ptr(),
            levels.len(),
            &mut out.y,
            &mut out.y_len,
            &mut out.x,
            &mut out.x_len,
            &mut out.lengths,
            &mut out.units,
            &mut out.level_counts,
            &mut out.levels,
        )
    };
    (status, out)
}

#[test]
fn plain_peak_returns_four_segments() {
    let (status, out) = plain(&PEAK, 3, 3, &[0.5]);
    assert_eq!(status, 0);
    assert_eq!(out.units, 4);
    assert_eq!(out.lengths(), &[2, 2, 2, 2]);
    assert_eq!(out.x_len, 8);
    assert_eq!(out.y_len, 8);
    for (&x, &y) in out.x().iter().zip(out.y()) {
        assert_abs_diff_eq!((x - 1.0).abs() + (y - 1.0).abs(), 0.5, epsilon = 1e-12);
    }
}

#[test]
fn sorted_peak_returns_one_closed_polygon() {
    let (status, out) = sorted(&PEAK, 3, 3, &[0.5]);
    assert_eq!(status, 0);
    assert_eq!(out.lengths(), &[5]);
    assert_eq!(out.level_counts(), &[1]);
    assert_eq!(out.x()[0], out.x()[4]);
    assert_eq!(out.y()[0], out.y()[4]);
}

#[test]
fn empty_result_buffers_are_valid() {
    let (status, out) = sorted(&PEAK, 3, 3, &[-1.0, 2.0]);
    assert_eq!(status, 0);
    assert!(!out.x.is_null() && !out.y.is_null() && !out.lengths.is_null());
    assert_eq!((out.x_len, out.y_len, out.units), (0, 0, 0));
    assert_eq!(out.level_counts(), &[0, 0]);
}

#[test]
fn invalid_levels_fail() {
    let (status, out) = plain(&PEAK, 3, 3, &[]);
    assert_eq!(status, -1);
    out.assert_cleared(false);

    let (status, out) = sorted(&PEAK, 3, 3, &[0.7, 0.3]);
    assert_eq!(status, -1);
    out.assert_cleared(true);
}

#[test]
fn dimension_mismatch_fails() {
    // The grid claims 2 columns but both axes have 3 entries.
    let (status, out) = sorted(&PEAK[..6], 3, 2, &[0.5]);
    assert_eq!(status, -1);
    out.assert_cleared(true);
}

#[test]
fn null_arguments_fail() {
    let mut out = Outputs::new();
    let levels = [0.5];
    let status = unsafe {
        contour_compute(
            ptr::null(),
            3,
            3,
            AXIS.as_ptr(),
            AXIS.len(),
            AXIS.as_ptr(),
            AXIS.len(),
            levels.as_ptr(),
            levels.len(),
            &mut out.y,
            &mut out.y_len,
            &mut out.x,
            &mut out.x_len,
            &mut out.lengths,
            &mut out.units,
        )
    };
    assert_eq!(status, -1);
    out.assert_cleared(false);

    let status = unsafe {
        contour_compute(
            PEAK.as_ptr(),
            3,
            3,
            AXIS.as_ptr(),
            AXIS.len(),
            AXIS.as_ptr(),
            AXIS.len(),
            levels.as_ptr(),
            levels.len(),
            &mut out.y,
            &mut out.y_len,
            ptr::null_mut(),
            &mut out.x_len,
            &mut out.lengths,
            &mut out.units,
        )
    };
    assert_eq!(status, -1);
    assert!(out.y.is_null());
}

#[test]
fn free_accepts_null() {
    unsafe { contour_free(ptr::null_mut()) };
}
