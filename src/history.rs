// src/history.rs
//
// Per-instance filter memory and the recursive state update.

use crate::coeffs::{BiquadCoeffs, Coefficients, LadderCoeffs};
use crate::topology::Topology;

/// Direct-form I history for the biquad topologies.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadState {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

impl BiquadState {
    /// One step of the difference equation.
    ///
    /// `gain` scales only the feed-forward sum. The feedback history holds the
    /// `f32` value actually written out.
    #[inline(always)]
    pub fn tick(&mut self, c: &BiquadCoeffs, gain: f64, x: f32) -> f32 {
        let x = x as f64;
        let y = (gain * (c.b0 * x + c.b1 * self.x1 + c.b2 * self.x2)
            - c.a1 * self.y1
            - c.a2 * self.y2) as f32;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y as f64;
        y
    }

    /// Run a whole block with fixed coefficients.
    #[inline]
    pub fn run(&mut self, c: &BiquadCoeffs, gain: f64, input: &[f32], output: &mut [f32]) {
        for (out, &x) in output.iter_mut().zip(input) {
            *out = self.tick(c, gain, x);
        }
    }
}

/// Two cascaded one-pole stages with resonance feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LadderState {
    pub y1: f64,
    pub y2: f64,
}

impl LadderState {
    #[inline(always)]
    pub fn tick(&mut self, c: &LadderCoeffs, gain: f64, x: f32) -> f32 {
        self.y1 = c.fa * self.y1 + c.f * (x as f64 + c.fb * (self.y1 - self.y2));
        self.y2 = c.fa * self.y2 + c.f * self.y1;
        (gain * self.y2) as f32
    }

    #[inline]
    pub fn run(&mut self, c: &LadderCoeffs, gain: f64, input: &[f32], output: &mut [f32]) {
        for (out, &x) in output.iter_mut().zip(input) {
            *out = self.tick(c, gain, x);
        }
    }
}

/// Filter memory, exclusively owned by one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterState {
    Biquad(BiquadState),
    Ladder(LadderState),
}

impl FilterState {
    /// Zeroed memory of the right shape for `topology`.
    pub fn for_topology(topology: Topology) -> Self {
        if topology.is_ladder() {
            FilterState::Ladder(LadderState::default())
        } else {
            FilterState::Biquad(BiquadState::default())
        }
    }

    pub fn reset(&mut self) {
        match self {
            FilterState::Biquad(s) => *s = BiquadState::default(),
            FilterState::Ladder(s) => *s = LadderState::default(),
        }
    }

    /// One sample with per-sample coefficients.
    ///
    /// The coefficient kind must match the memory shape. A mismatch panics in
    /// debug builds and writes silence otherwise.
    #[inline]
    pub fn tick(&mut self, c: &Coefficients, gain: f64, x: f32) -> f32 {
        match (self, c) {
            (FilterState::Biquad(s), Coefficients::Biquad(c)) => s.tick(c, gain, x),
            (FilterState::Ladder(s), Coefficients::Ladder(c)) => s.tick(c, gain, x),
            (state, c) => {
                debug_assert!(false, "{c:?} applied to {state:?}");
                0.0
            }
        }
    }

    /// A block with fixed coefficients. Same mismatch rule as [`FilterState::tick`].
    pub fn run(&mut self, c: &Coefficients, gain: f64, input: &[f32], output: &mut [f32]) {
        match (self, c) {
            (FilterState::Biquad(s), Coefficients::Biquad(c)) => s.run(c, gain, input, output),
            (FilterState::Ladder(s), Coefficients::Ladder(c)) => s.run(c, gain, input, output),
            (state, c) => {
                debug_assert!(false, "{c:?} applied to {state:?}");
                output.fill(0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_biquad_passes_input() {
        let mut s = BiquadState::default();
        let input = [1.0, -0.5, 0.25, 0.0];
        let mut output = [0.0; 4];
        s.run(&BiquadCoeffs::IDENTITY, 1.0, &input, &mut output);
        assert_eq!(output, input);
        assert_eq!(s.x1, 0.0);
        assert_eq!(s.y2, 0.25);
    }

    #[test]
    fn gain_is_not_applied_to_feedback() {
        // y = g*x - a1*y1 with a1 = -0.5: impulse gives g, 0.5g, 0.25g...
        let c = BiquadCoeffs {
            a1: -0.5,
            ..BiquadCoeffs::IDENTITY
        };
        let mut s = BiquadState::default();
        let input = [1.0, 0.0, 0.0];
        let mut output = [0.0; 3];
        s.run(&c, 2.0, &input, &mut output);
        assert_eq!(output, [2.0, 1.0, 0.5]);
    }

    #[test]
    fn ladder_with_zero_cutoff_stays_silent() {
        let c = LadderCoeffs::new(0.0, 1.0);
        let mut s = LadderState::default();
        let input = [1.0; 64];
        let mut output = [1.0; 64];
        s.run(&c, 1.0, &input, &mut output);
        assert!(output.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn ladder_settles_to_dc_gain_without_resonance() {
        let c = LadderCoeffs::new(0.3, 0.0);
        let mut s = LadderState::default();
        let input = [1.0; 512];
        let mut output = [0.0; 512];
        s.run(&c, 0.5, &input, &mut output);
        assert!((output[511] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn reset_zeroes_history() {
        let mut state = FilterState::for_topology(Topology::Lowpass);
        let c = Coefficients::Biquad(BiquadCoeffs::IDENTITY);
        state.tick(&c, 1.0, 0.75);
        assert_ne!(state, FilterState::for_topology(Topology::Lowpass));
        state.reset();
        assert_eq!(state, FilterState::Biquad(BiquadState::default()));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "applied to")]
    fn mismatched_coefficients_are_rejected() {
        let mut state = FilterState::for_topology(Topology::ResonantLowpass);
        let c = Coefficients::Biquad(BiquadCoeffs::IDENTITY);
        state.tick(&c, 1.0, 0.5);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "applied to")]
    fn mismatched_block_coefficients_are_rejected() {
        let mut state = FilterState::for_topology(Topology::Lowpass);
        let c = Coefficients::Ladder(LadderCoeffs::new(0.2, 0.1));
        let mut output = [0.0; 4];
        state.run(&c, 1.0, &[1.0; 4], &mut output);
    }

    #[test]
    fn state_shape_follows_topology() {
        assert!(matches!(
            FilterState::for_topology(Topology::ResonantLowpass),
            FilterState::Ladder(_)
        ));
        assert!(matches!(
            FilterState::for_topology(Topology::HighShelf),
            FilterState::Biquad(_)
        ));
    }
}
