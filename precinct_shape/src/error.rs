// Copyright 2025 the Precinct Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction errors.

use core::fmt;

/// Coordinate axis named in a [`ShapeError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis3 {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl fmt::Display for Axis3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

/// Why a shape could not be constructed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// A parameter was NaN or infinite.
    #[error("shape parameters must be finite")]
    NonFinite,
    /// A box edge has zero length.
    #[error("box has zero extent along {axis}")]
    ZeroExtent {
        /// Offending axis.
        axis: Axis3,
    },
    /// A range has its minimum above its maximum.
    #[error("{axis} range is inverted (min > max)")]
    InvertedRange {
        /// Offending axis.
        axis: Axis3,
    },
    /// A radius was zero or negative.
    #[error("radius must be positive")]
    NonPositiveRadius,
}

/// Check that `min <= max` (or `min < max` when `strict`) on one axis.
pub(crate) fn check_range(axis: Axis3, min: f64, max: f64, strict: bool) -> Result<(), ShapeError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ShapeError::NonFinite);
    }
    if min > max {
        return Err(ShapeError::InvertedRange { axis });
    }
    if strict && min == max {
        return Err(ShapeError::ZeroExtent { axis });
    }
    Ok(())
}

pub(crate) fn check_radius(radius: f64) -> Result<(), ShapeError> {
    if !radius.is_finite() {
        return Err(ShapeError::NonFinite);
    }
    if radius <= 0.0 {
        return Err(ShapeError::NonPositiveRadius);
    }
    Ok(())
}

pub(crate) fn check_finite(values: &[f64]) -> Result<(), ShapeError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ShapeError::NonFinite)
    }
}
