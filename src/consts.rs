// src/consts.rs
//
// Range limits and scale factors shared by every filter topology.
// Changing any of these changes the filter response.

/// Lowest cutoff/center frequency in Hz.
pub const MIN_FREQ: f64 = 20.0;

/// Highest cutoff/center frequency in Hz. Also the full-scale value of a frequency CV.
pub const MAX_FREQ: f64 = 20_000.0;

pub const Q_MIN: f64 = 0.001;
pub const Q_MAX: f64 = 1.0;

/// Port range of the shelf/peak gain offset, in dB.
pub const DBGAIN_MIN: f64 = 6.0;
pub const DBGAIN_MAX: f64 = 24.0;

/// dB per unit of gain CV.
pub const DBGAIN_SCALE: f64 = 5.0;

/// Resonance-to-bandwidth scale: `alpha = sin(w) / (Q_SCALE * q)`.
pub const Q_SCALE: f64 = 32.0;

/// Sample rate the ladder cutoff mapping was tuned at.
pub const LADDER_RATE: f64 = 44_100.0;

pub const LADDER_FREQ_SCALE: f64 = 2.85;

/// Upper bound of the normalized ladder cutoff. Keeps `1 - f` away from zero.
pub const LADDER_F_MAX: f64 = 0.9999;
