//! Sub-slice classification against element bounds.

/// Longitudinal tolerance for matching a probe position against an
/// element boundary, m.
pub const SLICE_TOL: f64 = 1e-6;

/// Where a sub-slice sits within its element's full extent.
///
/// Entrance-only corrections apply exactly once, when `first` holds;
/// exit-only corrections exactly once, when `last` holds; body physics
/// on every slice. A slice spanning the whole element (and any slice
/// of a thin element) is both first and last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliceSpan {
    /// The slice starts at the element entrance.
    pub first: bool,
    /// The slice ends at the element exit.
    pub last: bool,
}

impl SliceSpan {
    /// Classify the slice `[probe_s, probe_s + sub_length]` against an
    /// element occupying `[start, start + length]`.
    pub fn locate(probe_s: f64, sub_length: f64, start: f64, length: f64) -> Self {
        if length <= SLICE_TOL {
            // Thin element: never sliced.
            return Self {
                first: true,
                last: true,
            };
        }
        Self {
            first: (probe_s - start).abs() < SLICE_TOL,
            last: ((probe_s + sub_length) - (start + length)).abs() < SLICE_TOL,
        }
    }

    /// A span covering the entire element.
    pub fn entire() -> Self {
        Self {
            first: true,
            last: true,
        }
    }

    /// An interior span touching neither boundary.
    pub fn interior() -> Self {
        Self {
            first: false,
            last: false,
        }
    }
}
