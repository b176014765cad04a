// src/parameter.rs
//
// Parameter resolution: raw port values -> effective (freq, q, dB gain) per sample.

use crate::consts::{
    DBGAIN_MIN, DBGAIN_SCALE, LADDER_F_MAX, LADDER_FREQ_SCALE, LADDER_RATE, MAX_FREQ, MIN_FREQ,
    Q_MAX, Q_MIN,
};
use crate::modulation::ModInput;
use crate::topology::Topology;

pub const DEFAULT_GAIN: f32 = 1.0;
pub const DEFAULT_FREQ: f32 = 1_000.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_RESO: f32 = 0.05;
pub const DEFAULT_DBGAIN: f32 = DBGAIN_MIN as f32;

/// Values supplied by the host for one block.
///
/// Parameters do not own their modulation sources.
/// They only read from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams<'a> {
    /// Output gain, applied to the feed-forward sum.
    pub gain: f32,
    /// Base frequency in Hz.
    pub freq_offset: f32,
    /// Pitch control; see [`pitch_factor`].
    pub freq_pitch: f32,
    /// Base resonance, nominally 0.001..=1.0.
    pub reso_offset: f32,
    /// Shelf/peak gain in dB. Ignored by the other topologies.
    pub db_gain_offset: f32,

    pub freq_mod: ModInput<'a>,
    pub reso_mod: ModInput<'a>,
    pub db_gain_mod: ModInput<'a>,
}

impl Default for FilterParams<'_> {
    fn default() -> Self {
        Self {
            gain: DEFAULT_GAIN,
            freq_offset: DEFAULT_FREQ,
            freq_pitch: DEFAULT_PITCH,
            reso_offset: DEFAULT_RESO,
            db_gain_offset: DEFAULT_DBGAIN,
            freq_mod: ModInput::Disconnected,
            reso_mod: ModInput::Disconnected,
            db_gain_mod: ModInput::Disconnected,
        }
    }
}

impl<'a> FilterParams<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    pub fn freq(mut self, hz: f32) -> Self {
        self.freq_offset = hz;
        self
    }

    pub fn pitch(mut self, pitch: f32) -> Self {
        self.freq_pitch = pitch;
        self
    }

    pub fn reso(mut self, reso: f32) -> Self {
        self.reso_offset = reso;
        self
    }

    pub fn db_gain(mut self, db: f32) -> Self {
        self.db_gain_offset = db;
        self
    }

    pub fn freq_mod(mut self, input: impl Into<ModInput<'a>>) -> Self {
        self.freq_mod = input.into();
        self
    }

    pub fn reso_mod(mut self, input: impl Into<ModInput<'a>>) -> Self {
        self.reso_mod = input.into();
        self
    }

    pub fn db_gain_mod(mut self, input: impl Into<ModInput<'a>>) -> Self {
        self.db_gain_mod = input.into();
        self
    }
}

/// Frequency multiplier for a pitch control value.
///
/// Asymmetric: `1 + p/2` above zero, `1 / (1 - p/2)` at or below zero.
#[inline]
pub fn pitch_factor(pitch: f32) -> f32 {
    let p = pitch as f64;
    let factor = if p > 0.0 { 1.0 + p / 2.0 } else { 1.0 / (1.0 - p / 2.0) };
    factor as f32
}

/// Effective parameters for one sample, after clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSample {
    /// Hz for biquads, normalized 0..=0.9999 for the ladder.
    pub freq: f64,
    pub q: f64,
    /// `None` for topologies without a gain parameter.
    pub db_gain: Option<f64>,
}

/// Resolves one block of [`FilterParams`] for a given topology.
///
/// Modulation inputs the topology cannot use are dropped here, so they never
/// force the audio-rate path.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    topology: Topology,
    freq_offset: f64,
    pitch: f64,
    reso_offset: f64,
    db_gain_offset: f64,
    ladder_rate: f64,
    freq_mod: ModInput<'a>,
    reso_mod: ModInput<'a>,
    db_gain_mod: ModInput<'a>,
    block: ResolvedSample,
}

impl<'a> Resolver<'a> {
    pub fn new(topology: Topology, sample_rate: f64, params: &FilterParams<'a>) -> Self {
        let targets = topology.mod_targets();
        let keep = |enabled: bool, input: ModInput<'a>| {
            if enabled { input } else { ModInput::Disconnected }
        };

        let mut resolver = Self {
            topology,
            freq_offset: params.freq_offset as f64,
            pitch: pitch_factor(params.freq_pitch) as f64,
            reso_offset: params.reso_offset as f64,
            db_gain_offset: params.db_gain_offset as f64,
            ladder_rate: LADDER_RATE / sample_rate,
            freq_mod: keep(targets.freq, params.freq_mod),
            reso_mod: keep(targets.reso, params.reso_mod),
            db_gain_mod: keep(targets.gain, params.db_gain_mod),
            block: ResolvedSample {
                freq: 0.0,
                q: 0.0,
                db_gain: None,
            },
        };
        resolver.block = ResolvedSample {
            freq: resolver.base_freq(),
            q: clamp_q(resolver.reso_offset),
            db_gain: topology.uses_db_gain().then_some(resolver.db_gain_offset),
        };
        resolver
    }

    /// True when any usable modulation input is connected.
    #[inline]
    pub fn is_audio_rate(&self) -> bool {
        self.freq_mod.is_connected()
            || self.reso_mod.is_connected()
            || self.db_gain_mod.is_connected()
    }

    /// Block-rate values, ignoring every modulation input.
    #[inline]
    pub fn block(&self) -> ResolvedSample {
        self.block
    }

    /// Values at `frame`. Disconnected inputs contribute their block-rate value.
    #[inline]
    pub fn at(&self, frame: usize) -> ResolvedSample {
        let freq = match self.freq_mod.value_audio(frame) {
            Some(m) if m > 0.0 => self.modulated_freq(m as f64),
            _ => self.block.freq,
        };
        let q = match self.reso_mod.value_audio(frame) {
            Some(m) => clamp_q(self.reso_offset + m as f64),
            None => self.block.q,
        };
        let db_gain = match (self.block.db_gain, self.db_gain_mod.value_audio(frame)) {
            (Some(ofs), Some(m)) => Some(ofs + DBGAIN_SCALE * m as f64),
            (db_gain, _) => db_gain,
        };
        ResolvedSample { freq, q, db_gain }
    }

    fn base_freq(&self) -> f64 {
        if self.topology.is_ladder() {
            let f0 = self.freq_offset / MAX_FREQ * self.ladder_rate * LADDER_FREQ_SCALE;
            clamp_ladder(f0 * self.pitch)
        } else {
            clamp_freq(self.freq_offset * self.pitch)
        }
    }

    // Positive CV spans the whole range above the offset; the floor is subtracted
    // so that a CV of 0+ starts at the offset itself.
    fn modulated_freq(&self, m: f64) -> f64 {
        if self.topology.is_ladder() {
            let f = (m * MAX_FREQ * LADDER_FREQ_SCALE + (self.freq_offset - MIN_FREQ)) / MAX_FREQ
                * self.pitch
                * self.ladder_rate;
            clamp_ladder(f)
        } else {
            clamp_freq((m * MAX_FREQ + self.freq_offset - MIN_FREQ) * self.pitch)
        }
    }
}

#[inline]
fn clamp_freq(f: f64) -> f64 {
    f.clamp(MIN_FREQ, MAX_FREQ)
}

#[inline]
fn clamp_ladder(f: f64) -> f64 {
    f.clamp(0.0, LADDER_F_MAX)
}

#[inline]
fn clamp_q(q: f64) -> f64 {
    q.clamp(Q_MIN, Q_MAX)
}
