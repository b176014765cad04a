// src/filter.rs
//
// The filter engine: one instance, one topology, one mono stream.

use crate::coeffs::{self, Coefficients};
use crate::error::{VcfError, VcfResult};
use crate::history::FilterState;
use crate::parameter::{FilterParams, Resolver};
use crate::topology::Topology;

/// A time-varying filter instance.
///
/// The engine:
/// - does NOT allocate while processing
/// - does NOT lock
/// - does NOT log from the sample loop
///
/// The sample rate and topology are fixed at construction. The filter memory
/// exists only while the instance is active.
#[derive(Debug, Clone)]
pub struct VcfFilter {
    topology: Topology,
    sample_rate: f64,
    state: Option<FilterState>,
}

impl VcfFilter {
    pub fn new(topology: Topology, sample_rate: f64) -> VcfResult<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(VcfError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            topology,
            sample_rate,
            state: None,
        })
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Zero the filter memory. Safe to call again on an active filter.
    pub fn activate(&mut self) {
        self.state = Some(FilterState::for_topology(self.topology));
    }

    /// Drop the filter memory.
    pub fn deactivate(&mut self) {
        self.state = None;
    }

    /// Current memory, if active.
    pub fn state(&self) -> Option<&FilterState> {
        self.state.as_ref()
    }

    /// Process one block.
    ///
    /// The block length is `output.len()`; a shorter `input` reads as silence past
    /// its end. An inactive filter is activated first.
    pub fn process(&mut self, params: &FilterParams<'_>, input: &[f32], output: &mut [f32]) {
        let topology = self.topology;
        let sample_rate = self.sample_rate;
        let state = self
            .state
            .get_or_insert_with(|| FilterState::for_topology(topology));

        let resolver = Resolver::new(topology, sample_rate, params);
        let gain = params.gain as f64;

        let frames = input.len().min(output.len());
        let (head, tail) = output.split_at_mut(frames);
        let input = &input[..frames];

        if resolver.is_audio_rate() {
            for (i, (out, &x)) in head.iter_mut().zip(input).enumerate() {
                let c = coeffs::compute(topology, sample_rate, &resolver.at(i));
                *out = state.tick(&c, gain, x);
            }
            let end = frames;
            for (i, out) in tail.iter_mut().enumerate() {
                let c = coeffs::compute(topology, sample_rate, &resolver.at(end + i));
                *out = state.tick(&c, gain, 0.0);
            }
        } else {
            let c: Coefficients = coeffs::compute(topology, sample_rate, &resolver.block());
            state.run(&c, gain, input, head);
            for out in tail.iter_mut() {
                *out = state.tick(&c, gain, 0.0);
            }
        }
    }
}
