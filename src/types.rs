//! Core data types for the area check form.
//!
//! This module defines the validated form model ([`Point`], [`FormState`]),
//! the value snapping rule they share, and the shapes of the data exchanged
//! with the area check endpoint.

use crate::constants::*;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maps `value` onto the first entry of `allowed` within [`SNAP_TOLERANCE`].
///
/// Entries are checked in the order given and the first one close enough wins,
/// even when a later entry is equally close. NaN never matches.
///
/// # Arguments
///
/// * `value` - The raw number to snap
/// * `allowed` - The permitted values, in priority order
///
/// # Returns
///
/// The matching allowed value, or `None` if no entry is within tolerance.
pub fn snap(value: f64, allowed: &[f64]) -> Option<f64> {
    allowed
        .iter()
        .copied()
        .find(|candidate| (candidate - value).abs() <= SNAP_TOLERANCE)
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The two coordinate inputs of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal coordinate
    X,
    /// Vertical coordinate
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("X"),
            Axis::Y => f.write_str("Y"),
        }
    }
}

/// A validated point.
///
/// `x` is always one of [`X_VALUES`] and `y` always lies in
/// `[Y_MIN, Y_MAX]`. A rejected assignment leaves the stored value untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Default for Point {
    fn default() -> Self {
        Self {
            x: DEFAULT_COORDINATE,
            y: DEFAULT_COORDINATE,
        }
    }
}

impl Point {
    /// Creates a point from optional raw coordinates.
    ///
    /// # Arguments
    ///
    /// * `x` - Raw X value; `None` selects the default
    /// * `y` - Raw Y value; `None` selects the default
    ///
    /// # Returns
    ///
    /// The validated point, or the first validation error encountered.
    pub fn new(x: Option<f64>, y: Option<f64>) -> Result<Self, ValidationError> {
        let mut point = Self::default();
        point.set_x(x)?;
        point.set_y(y)?;
        Ok(point)
    }

    /// Current X coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Current Y coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Assigns X, snapping it onto [`X_VALUES`].
    ///
    /// `None` resets X to the default. A value with no allowed neighbour is
    /// rejected and X keeps its previous value.
    pub fn set_x(&mut self, x: Option<f64>) -> Result<(), ValidationError> {
        let Some(x) = x else {
            self.x = DEFAULT_COORDINATE;
            return Ok(());
        };

        let snapped = snap(x, &X_VALUES).ok_or_else(|| {
            ValidationError::new(format!("X should be one of {}", join_values(&X_VALUES)))
        })?;
        self.x = snapped;
        Ok(())
    }

    /// Assigns Y if it lies in the inclusive range `[Y_MIN, Y_MAX]`.
    ///
    /// `None` resets Y to the default. Out-of-range values are rejected and Y
    /// keeps its previous value.
    pub fn set_y(&mut self, y: Option<f64>) -> Result<(), ValidationError> {
        let Some(y) = y else {
            self.y = DEFAULT_COORDINATE;
            return Ok(());
        };

        if !(Y_MIN..=Y_MAX).contains(&y) {
            return Err(ValidationError::new(format!(
                "Should be number in range [{Y_MIN}, {Y_MAX}]. Got {y}"
            )));
        }
        // `+ 0.0` turns -0 into 0 so it is never written to the URL as "-0".
        self.y = y + 0.0;
        Ok(())
    }

    /// Assigns the coordinate of the given axis.
    pub fn set(&mut self, axis: Axis, value: Option<f64>) -> Result<(), ValidationError> {
        match axis {
            Axis::X => self.set_x(value),
            Axis::Y => self.set_y(value),
        }
    }

    /// Reads the coordinate of the given axis.
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Raw, unvalidated coordinates and scale as read from the page URL, where
/// every field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointParams {
    /// X coordinate, if present
    pub x: Option<f64>,
    /// Y coordinate, if present
    pub y: Option<f64>,
    /// Scale, if present
    pub scale: Option<f64>,
}

/// Everything the user currently has selected in the form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormState {
    point: Point,
    scale: f64,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            point: Point::default(),
            scale: DEFAULT_SCALE,
        }
    }
}

impl FormState {
    /// Builds the form state, propagating the first validation error.
    ///
    /// A missing scale defaults to [`DEFAULT_SCALE`].
    pub fn new(params: PointParams) -> Result<Self, ValidationError> {
        let point = Point::new(params.x, params.y)?;
        let mut state = Self {
            point,
            scale: DEFAULT_SCALE,
        };
        state.set_scale(params.scale.unwrap_or(DEFAULT_SCALE))?;
        Ok(state)
    }

    /// Builds the form state from values found in the page URL.
    ///
    /// Each field is applied on its own; a field the setters reject keeps its
    /// default so a stale or hand-edited link still opens the form.
    pub fn from_query(params: PointParams) -> Self {
        let mut state = Self::default();
        if let Err(e) = state.point.set_x(params.x) {
            log::warn!("ignoring {POINT_X_PARAM} from URL: {e}");
        }
        if let Err(e) = state.point.set_y(params.y) {
            log::warn!("ignoring {POINT_Y_PARAM} from URL: {e}");
        }
        if let Err(e) = state.set_scale(params.scale.unwrap_or(DEFAULT_SCALE)) {
            log::warn!("ignoring {SCALE_PARAM} from URL: {e}");
        }
        state
    }

    /// The selected point.
    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Mutable access to the point, whose setters keep it valid.
    pub fn point_mut(&mut self) -> &mut Point {
        &mut self.point
    }

    /// The selected scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Assigns the scale, storing the allowed value it snaps to.
    ///
    /// # Returns
    ///
    /// `Ok(())` on success, or a [`ValidationError`] listing [`SCALE_VALUES`]
    /// when the value has no allowed neighbour (the scale is left unchanged).
    pub fn set_scale(&mut self, scale: f64) -> Result<(), ValidationError> {
        let snapped = snap(scale, &SCALE_VALUES).ok_or_else(|| {
            ValidationError::new(format!(
                "Should be one of the following: {}",
                join_values(&SCALE_VALUES)
            ))
        })?;
        self.scale = snapped;
        Ok(())
    }
}

/// A point as echoed back by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckedPoint {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Scale the point was checked at
    pub scale: f64,
}

/// One entry of the check history returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaCheckResult {
    /// The point that was checked, as the endpoint normalized it
    pub point: CheckedPoint,
    /// Whether the point lies inside the area
    pub result: bool,
    /// How long the check took
    pub calculation_time: f64,
    /// When the check ran, in milliseconds since the Unix epoch
    pub calculated_at: f64,
}

/// Body of a successful check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaCheckResponse {
    /// The user's session data
    pub user: UserPoints,
}

/// Check history of the current session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPoints {
    /// Results in the order the endpoint stored them (oldest first)
    pub points: Vec<AreaCheckResult>,
}

impl AreaCheckResponse {
    /// Deserialize a response from its JSON body
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
