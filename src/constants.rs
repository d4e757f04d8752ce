//! Shared crate-wide constants.

/// Distance, in device pixels, within which an area side is pulled onto an
/// edge. Converted to percent against the live field size on every query.
pub const DEFAULT_MAGNET_PX: f64 = 7.0;

/// Smallest width an area may be resized to, in percent of the field.
pub const DEFAULT_MIN_AREA_WIDTH: f64 = 5.0;

/// Smallest height an area may be resized to, in percent of the field.
pub const DEFAULT_MIN_AREA_HEIGHT: f64 = 5.0;

/// Cooldown between two executed pointer moves of one gesture.
pub const DEFAULT_THROTTLE_MS: u64 = 10;

/// Idle poll interval of the event loop. Kept below the throttle window so a
/// parked pointer move is replayed promptly once the pointer stops.
pub const DEFAULT_TICK_MS: u64 = 5;

/// Positions of the field's own edges on each axis.
pub const FIELD_EDGE_POSITIONS: [f64; 3] = [0.0, 50.0, 100.0];

/// Choices offered by the setup prompt.
pub const AREA_COUNT_CHOICES: [usize; 9] = [2, 5, 10, 30, 50, 100, 300, 500, 1000];

pub const MAX_AREAS: usize = 1000;

/// Random area width range, in percent.
pub const AREA_WIDTH_RANGE: (f64, f64) = (20.0, 25.0);

/// Random area height deviation from its width, as a fraction.
pub const AREA_HEIGHT_SPREAD: f64 = 0.2;
