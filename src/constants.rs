//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

use std::time::Duration;

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Meters per degree of longitude at the equator, used to back-derive a circle's
/// radius point from its center and radius.
pub const LATITUDE_FACTOR: f64 = 111_300.0;

/// Mean earth radius in meters for haversine distances.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Delay before map click/move handlers are re-attached after a polygon center drag.
/// Swallows the click produced on release.
pub const CENTER_DRAG_REARM_DELAY: Duration = Duration::from_millis(50);

/// Screen size of vertex markers in pixels
pub const VERTEX_ICON_SIZE: f32 = 24.0;

/// Screen size of midpoint markers in pixels
pub const MIDPOINT_ICON_SIZE: f32 = 20.0;

/// Screen size of the polygon center-drag marker in pixels
pub const DRAG_ICON_SIZE: f32 = 30.0;

/// Arrowhead size for arrow polylines in pixels
pub const ARROW_HEAD_PIXEL_SIZE: f32 = 15.0;

/// World units per degree of the planar map projection
pub const PIXELS_PER_DEGREE: f32 = 4000.0;

/// Distance a midpoint must travel before a drag splits its segment
pub const MIDPOINT_INSERT_THRESHOLD_METERS: f64 = 0.0;
