//! Shared application-wide constants.
//! Centralizes tweakable values used by validation, URL syncing and submission.

// Allowed values
/// Values the X coordinate may snap to, in snapping order.
pub const X_VALUES: [f64; 9] = [-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
/// Values the scale may snap to, in snapping order.
pub const SCALE_VALUES: [f64; 5] = [1.0, 1.5, 2.0, 2.5, 3.0];
/// Inclusive lower bound of the Y coordinate.
pub const Y_MIN: f64 = -3.0;
/// Inclusive upper bound of the Y coordinate.
pub const Y_MAX: f64 = 5.0;
/// Maximum distance between an input and an allowed value for it to snap.
pub const SNAP_TOLERANCE: f64 = 0.25;

// Defaults
/// Coordinate used when an axis has no value.
pub const DEFAULT_COORDINATE: f64 = 0.0;
/// Scale used when none is provided.
pub const DEFAULT_SCALE: f64 = 1.0;

// URL query parameters
/// Query parameter holding the X coordinate.
pub const POINT_X_PARAM: &str = "pointX";
/// Query parameter holding the Y coordinate.
pub const POINT_Y_PARAM: &str = "pointY";
/// Query parameter holding the scale.
pub const SCALE_PARAM: &str = "scale";
/// Marker parameter asking the endpoint for a JSON body.
pub const JSON_MARKER_PARAM: &str = "isJson";

// Input handling
/// Quiet period (ms) after the last keystroke before a text input is validated.
pub const DEBOUNCE_MS: u64 = 400;
/// Longest text accepted from a coordinate input.
pub const MAX_FLOAT_INPUT_LENGTH: usize = 15;

// Submission
/// Path of the area check endpoint, relative to the page origin.
pub const INTERSECT_ENDPOINT: &str = "/app";
/// Status code the endpoint answers with when it rejects the point.
pub const INVALID_DATA_STATUS: u16 = 422;
/// Status code of a successful check.
pub const OK_STATUS: u16 = 200;

// Notifications
/// How long (ms) an error notification stays on screen.
pub const ERROR_HIDE_TIMEOUT_MS: u64 = 4000;
/// Message shown when the endpoint rejects the submitted data.
pub const INVALID_DATA_MESSAGE: &str = "Invalid data! Check input";
/// Fallback message for every other failure.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong! Please contact the developer";

/// `chrono` format of the "calculated at" column (24-hour local time).
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Starting URL for native runs when `AREA_CHECK_URL` is not set.
pub const DEFAULT_PAGE_URL: &str = "http://localhost:8080/";
