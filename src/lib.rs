// src/lib.rs
//
// Library entry point for Rust, C (LV2-style) and WebAssembly hosts.

mod coeffs;
mod consts;
mod descriptor;
mod error;
mod filter;
mod history;
mod modulation;
mod parameter;
mod port_info;
mod topology;

pub mod ffi;

#[cfg(feature = "web")]
pub mod wasm;

// Re-export key types for Rust consumers
pub use coeffs::{BiquadCoeffs, Coefficients, LadderCoeffs, RawBiquad, compute, raw_biquad};
pub use consts::*;
pub use descriptor::{
    PluginDescriptor, descriptor, descriptor_count, descriptor_for, descriptors, find_descriptor,
};
pub use error::{VcfError, VcfResult};
pub use filter::VcfFilter;
pub use history::{BiquadState, FilterState, LadderState};
pub use modulation::ModInput;
pub use parameter::{
    DEFAULT_DBGAIN, DEFAULT_FREQ, DEFAULT_GAIN, DEFAULT_PITCH, DEFAULT_RESO, FilterParams,
    ResolvedSample, Resolver, pitch_factor,
};
pub use port_info::{ParamUnit, PortInfo, PortKind, PortRole};
pub use topology::{ModTargets, Topology};
