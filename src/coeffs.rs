// src/coeffs.rs
//
// Coefficient calculation: RBJ cookbook biquads plus the ladder mapping.
//
// The resonance scale differs from the cookbook: alpha = sin(w) / (Q_SCALE * q),
// so q = 1.0 corresponds to a cookbook Q of 16.

use std::f64::consts::PI;

use crate::consts::Q_SCALE;
use crate::parameter::ResolvedSample;
use crate::topology::Topology;

/// Un-normalized biquad coefficients, straight from the cookbook table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawBiquad {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
}

impl RawBiquad {
    /// Divide everything by `a0`.
    #[inline]
    pub fn normalize(&self) -> BiquadCoeffs {
        let inv_a0 = 1.0 / self.a0;
        BiquadCoeffs {
            b0: self.b0 * inv_a0,
            b1: self.b1 * inv_a0,
            b2: self.b2 * inv_a0,
            a1: self.a1 * inv_a0,
            a2: self.a2 * inv_a0,
        }
    }
}

/// Biquad coefficients with `a0` divided out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Pass-through: `y = x`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };
}

/// Ladder coefficients: cutoff `f`, its complement `fa`, and feedback `fb`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LadderCoeffs {
    pub f: f64,
    pub fa: f64,
    pub fb: f64,
}

impl LadderCoeffs {
    /// `f` is the normalized cutoff (already clamped to 0..=0.9999).
    #[inline]
    pub fn new(f: f64, q: f64) -> Self {
        let fa = 1.0 - f;
        Self {
            f,
            fa,
            fb: q * (1.0 + 1.0 / fa),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coefficients {
    Biquad(BiquadCoeffs),
    Ladder(LadderCoeffs),
}

/// Coefficients for one resolved sample.
#[inline]
pub fn compute(topology: Topology, sample_rate: f64, s: &ResolvedSample) -> Coefficients {
    match raw_biquad(topology, sample_rate, s) {
        Some(raw) => Coefficients::Biquad(raw.normalize()),
        None => Coefficients::Ladder(LadderCoeffs::new(s.freq, s.q)),
    }
}

/// Cookbook coefficients before normalization, or `None` for the ladder,
/// which has no biquad form.
pub fn raw_biquad(topology: Topology, sample_rate: f64, s: &ResolvedSample) -> Option<RawBiquad> {
    let w0 = 2.0 * PI / sample_rate * s.freq;
    let sin_w0 = w0.sin();
    let cos_w0 = w0.cos();
    let alpha = sin_w0 / (Q_SCALE * s.q);

    // A is used only by PeakEq, LowShelf, HighShelf
    let a_lin = 10.0_f64.powf(s.db_gain.unwrap_or(0.0) / 40.0);

    let raw = match topology {
        Topology::Lowpass => {
            let b0 = (1.0 - cos_w0) / 2.0;
            RawBiquad {
                b0,
                b1: 1.0 - cos_w0,
                b2: b0,
                a0: 1.0 + alpha,
                a1: -2.0 * cos_w0,
                a2: 1.0 - alpha,
            }
        }
        Topology::Highpass => {
            let b0 = (1.0 + cos_w0) / 2.0;
            RawBiquad {
                b0,
                b1: -1.0 - cos_w0,
                b2: b0,
                a0: 1.0 + alpha,
                a1: -2.0 * cos_w0,
                a2: 1.0 - alpha,
            }
        }
        Topology::BandpassSkirt => RawBiquad {
            b0: s.q * alpha,
            b1: 0.0,
            b2: -s.q * alpha,
            a0: 1.0 + alpha,
            a1: -2.0 * cos_w0,
            a2: 1.0 - alpha,
        },
        Topology::BandpassPeak => RawBiquad {
            b0: alpha,
            b1: 0.0,
            b2: -alpha,
            a0: 1.0 + alpha,
            a1: -2.0 * cos_w0,
            a2: 1.0 - alpha,
        },
        Topology::Notch => RawBiquad {
            b0: 1.0,
            b1: -2.0 * cos_w0,
            b2: 1.0,
            a0: 1.0 + alpha,
            a1: -2.0 * cos_w0,
            a2: 1.0 - alpha,
        },
        Topology::PeakEq => RawBiquad {
            b0: 1.0 + alpha * a_lin,
            b1: -2.0 * cos_w0,
            b2: 1.0 - alpha * a_lin,
            a0: 1.0 + alpha / a_lin,
            a1: -2.0 * cos_w0,
            a2: 1.0 - alpha / a_lin,
        },
        Topology::LowShelf => {
            let a = a_lin;
            let beta_sin = a.sqrt() / s.q * sin_w0;
            RawBiquad {
                b0: a * (a + 1.0 - (a - 1.0) * cos_w0 + beta_sin),
                b1: 2.0 * a * (a - 1.0 - (a + 1.0) * cos_w0),
                b2: a * (a + 1.0 - (a - 1.0) * cos_w0 - beta_sin),
                a0: a + 1.0 + (a - 1.0) * cos_w0 + beta_sin,
                a1: -2.0 * (a - 1.0 + (a + 1.0) * cos_w0),
                a2: a + 1.0 + (a - 1.0) * cos_w0 - beta_sin,
            }
        }
        Topology::HighShelf => {
            let a = a_lin;
            let beta_sin = a.sqrt() / s.q * sin_w0;
            RawBiquad {
                b0: a * (a + 1.0 + (a - 1.0) * cos_w0 + beta_sin),
                b1: -2.0 * a * (a - 1.0 + (a + 1.0) * cos_w0),
                b2: a * (a + 1.0 + (a - 1.0) * cos_w0 - beta_sin),
                a0: a + 1.0 - (a - 1.0) * cos_w0 + beta_sin,
                a1: 2.0 * (a - 1.0 - (a + 1.0) * cos_w0),
                a2: a + 1.0 - (a - 1.0) * cos_w0 - beta_sin,
            }
        }
        Topology::ResonantLowpass => return None,
    };
    Some(raw)
}
